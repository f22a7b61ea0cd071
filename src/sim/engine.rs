//! Simulation engine that turns a household configuration into a daily result.

use tracing::debug;

use crate::devices::{BatteryState, EnergyModel};

use super::cost::{
    Rollup, appliance_daily_cost, peak_hour, producer_daily_credit, settle,
};
use super::optimizer::suggest_load_shifts;
use super::power_balance::solve_battery_dispatch;
use super::series::{
    Hourly, HOURS_PER_DAY, compress_to_hourly, expand_to_minutes, sum_hourlies, total,
};
use super::types::{
    BatterySummary, DeviceBreakdown, HouseholdConfig, SimulationDelta, SimulationResult,
};

/// Simulates one household day.
///
/// The engine is pure: inputs are never mutated and nothing is retained
/// between calls. Malformed numbers degrade to zero rather than failing.
///
/// # Examples
///
/// ```
/// use household_sim::sim::{simulate, types::HouseholdConfig};
///
/// let result = simulate(&HouseholdConfig::default());
/// assert_eq!(result.total_daily_kwh, 0.0);
/// assert!(result.savings_actions.is_empty());
/// ```
pub fn simulate(config: &HouseholdConfig) -> SimulationResult {
    let profile = &config.profile;
    let tariff = &config.tariff;

    let appliance_hourly: Vec<Hourly> = config.appliances.iter().map(|a| a.hourly_kwh()).collect();
    let mut producer_hourly: Vec<Hourly> = config.producers.iter().map(|p| p.hourly_kwh()).collect();

    let hourly_consumption = sum_hourlies(&appliance_hourly);
    let hourly_fixed_production = sum_hourlies(&producer_hourly);

    let consumption_per_minute = expand_to_minutes(&hourly_consumption);
    let fixed_production_per_minute = expand_to_minutes(&hourly_fixed_production);
    let rates_by_minute = tariff.rates_by_minute(profile);
    let peak_threshold = tariff.peak_rate_threshold(profile);

    let batteries: Vec<BatteryState> = config
        .producers
        .iter()
        .enumerate()
        .filter_map(|(index, producer)| BatteryState::from_producer(index, producer))
        .collect();

    let balance = solve_battery_dispatch(
        &consumption_per_minute,
        &fixed_production_per_minute,
        &rates_by_minute,
        peak_threshold,
        batteries,
    );

    for battery in &balance.batteries {
        if let Some(slot) = producer_hourly.get_mut(battery.producer_index) {
            *slot = battery.hourly_output();
        }
    }

    let production_per_minute: Vec<f64> = fixed_production_per_minute
        .iter()
        .zip(&balance.battery_output_per_minute)
        .map(|(fixed, battery)| fixed + battery)
        .collect();

    let settlement = settle(
        &consumption_per_minute,
        &production_per_minute,
        &rates_by_minute,
        tariff.sell_back_rate(),
    );

    let hourly_production = compress_to_hourly(&production_per_minute);
    let mut hourly_totals = [0.0; HOURS_PER_DAY];
    for (hour, slot) in hourly_totals.iter_mut().enumerate() {
        *slot = hourly_consumption[hour] - hourly_production[hour];
    }

    let appliances = config
        .appliances
        .iter()
        .zip(&appliance_hourly)
        .map(|(appliance, hourly)| DeviceBreakdown {
            id: appliance.id.clone(),
            name: appliance.name.clone(),
            model_kind: appliance.model_kind().to_string(),
            hourly_kwh: *hourly,
            daily_kwh: total(hourly),
            daily_cost: appliance_daily_cost(hourly, &hourly_consumption, &settlement),
        })
        .collect();

    let producers = config
        .producers
        .iter()
        .zip(&producer_hourly)
        .map(|(producer, hourly)| DeviceBreakdown {
            id: producer.id.clone(),
            name: producer.name.clone(),
            model_kind: producer.model_kind().to_string(),
            hourly_kwh: *hourly,
            daily_kwh: total(hourly),
            daily_cost: -producer_daily_credit(hourly, &hourly_production, &settlement),
        })
        .collect();

    let batteries = balance
        .batteries
        .iter()
        .filter_map(|battery| {
            let producer = config.producers.get(battery.producer_index)?;
            Some(BatterySummary {
                id: producer.id.clone(),
                name: producer.name.clone(),
                captured_kwh: battery.captured_kwh,
                delivered_kwh: battery.delivered_kwh(),
                final_charge_kwh: battery.charge_kwh,
            })
        })
        .collect();

    let total_daily_consumption_kwh = total(&hourly_consumption);
    let total_daily_production_kwh = total(&hourly_production);
    let energy = Rollup::from_daily(total_daily_consumption_kwh - total_daily_production_kwh);
    let cost = Rollup::from_daily(total(&settlement.net_cost));
    let savings = Rollup::from_daily(total(&settlement.gross_import_cost) - cost.daily);

    let savings_actions = suggest_load_shifts(
        &config.appliances,
        profile,
        tariff,
        &hourly_production,
        &hourly_consumption,
    );

    debug!(
        appliances = config.appliances.len(),
        producers = config.producers.len(),
        daily_kwh = energy.daily,
        daily_cost = cost.daily,
        savings_actions = savings_actions.len(),
        "household day simulated"
    );

    SimulationResult {
        currency: tariff.currency().to_string(),
        hourly_totals_kwh: hourly_totals,
        hourly_consumption_kwh: hourly_consumption,
        hourly_production_kwh: hourly_production,
        hourly_import_kwh: settlement.import_kwh,
        hourly_export_kwh: settlement.export_kwh,
        hourly_cost: settlement.net_cost,
        appliances,
        producers,
        batteries,
        total_daily_consumption_kwh,
        total_daily_production_kwh,
        total_daily_kwh: energy.daily,
        total_weekly_kwh: energy.weekly,
        total_monthly_kwh: energy.monthly,
        total_daily_cost: cost.daily,
        total_weekly_cost: cost.weekly,
        total_monthly_cost: cost.monthly,
        total_daily_savings: savings.daily,
        total_weekly_savings: savings.weekly,
        total_monthly_savings: savings.monthly,
        peak_hour: peak_hour(&hourly_totals),
        savings_actions,
    }
}

/// Field-wise difference `current - baseline` of the headline totals.
pub fn compare_simulation(current: &SimulationResult, baseline: &SimulationResult) -> SimulationDelta {
    SimulationDelta {
        daily_kwh_delta: current.total_daily_kwh - baseline.total_daily_kwh,
        monthly_kwh_delta: current.total_monthly_kwh - baseline.total_monthly_kwh,
        daily_cost_delta: current.total_daily_cost - baseline.total_daily_cost,
        monthly_cost_delta: current.total_monthly_cost - baseline.total_monthly_cost,
    }
}
