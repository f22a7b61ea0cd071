//! Settlement of minute-level grid flows and attribution to devices.

use serde::{Deserialize, Serialize};

use super::series::{Hourly, HOURS_PER_DAY, compress_to_hourly, zero_minutes};
use super::types::{DAYS_PER_MONTH, DAYS_PER_WEEK};
use super::window::MINUTES_PER_DAY;

/// Hourly grid flows and their prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub import_kwh: Hourly,
    pub export_kwh: Hourly,
    pub import_cost: Hourly,
    pub export_credit: Hourly,
    /// Import cost minus export credit.
    pub net_cost: Hourly,
    /// What consumption would have cost with no production at all.
    pub gross_import_cost: Hourly,
}

/// Prices each minute's import and export and sums them by hour.
///
/// # Arguments
///
/// * `consumption_per_minute` - Total consumption per minute (kWh)
/// * `production_per_minute` - Total production per minute, batteries included (kWh)
/// * `rates_by_minute` - Import rate at each minute
/// * `sell_back_rate` - Export credit per kWh
pub fn settle(
    consumption_per_minute: &[f64],
    production_per_minute: &[f64],
    rates_by_minute: &[f64],
    sell_back_rate: f64,
) -> Settlement {
    let mut import = zero_minutes();
    let mut export = zero_minutes();
    let mut import_cost = zero_minutes();
    let mut export_credit = zero_minutes();
    let mut net_cost = zero_minutes();
    let mut gross = zero_minutes();

    for minute in 0..MINUTES_PER_DAY {
        let consumption = consumption_per_minute.get(minute).copied().unwrap_or(0.0);
        let production = production_per_minute.get(minute).copied().unwrap_or(0.0);
        let rate = rates_by_minute.get(minute).copied().unwrap_or(0.0);

        let import_kwh = (consumption - production).max(0.0);
        let export_kwh = (production - consumption).max(0.0);
        import[minute] = import_kwh;
        export[minute] = export_kwh;
        import_cost[minute] = import_kwh * rate;
        export_credit[minute] = export_kwh * sell_back_rate;
        net_cost[minute] = import_cost[minute] - export_credit[minute];
        gross[minute] = consumption * rate;
    }

    Settlement {
        import_kwh: compress_to_hourly(&import),
        export_kwh: compress_to_hourly(&export),
        import_cost: compress_to_hourly(&import_cost),
        export_credit: compress_to_hourly(&export_credit),
        net_cost: compress_to_hourly(&net_cost),
        gross_import_cost: compress_to_hourly(&gross),
    }
}

/// An appliance's share of each hour's import cost, summed over the day.
pub fn appliance_daily_cost(
    appliance_hourly: &Hourly,
    hourly_consumption: &Hourly,
    settlement: &Settlement,
) -> f64 {
    (0..HOURS_PER_DAY)
        .filter(|&hour| hourly_consumption[hour] > 0.0)
        .map(|hour| settlement.import_cost[hour] * appliance_hourly[hour] / hourly_consumption[hour])
        .sum()
}

/// A producer's share of each hour's avoided import value and export credit.
///
/// Returned as a positive credit; results store it negated.
pub fn producer_daily_credit(
    producer_hourly: &Hourly,
    hourly_production: &Hourly,
    settlement: &Settlement,
) -> f64 {
    (0..HOURS_PER_DAY)
        .filter(|&hour| hourly_production[hour] > 0.0)
        .map(|hour| {
            let share = producer_hourly[hour] / hourly_production[hour];
            let avoided =
                (settlement.gross_import_cost[hour] - settlement.import_cost[hour]).max(0.0);
            (avoided + settlement.export_credit[hour]) * share
        })
        .sum()
}

/// Hour with the highest value; the earliest hour wins ties.
pub fn peak_hour(hourly_totals: &Hourly) -> usize {
    let mut peak = 0;
    for hour in 1..HOURS_PER_DAY {
        if hourly_totals[hour] > hourly_totals[peak] {
            peak = hour;
        }
    }
    peak
}

/// A daily figure extended to a week and an average month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl Rollup {
    pub fn from_daily(daily: f64) -> Self {
        Self {
            daily,
            weekly: daily * DAYS_PER_WEEK,
            monthly: daily * DAYS_PER_MONTH,
        }
    }
}
