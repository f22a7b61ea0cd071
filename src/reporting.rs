//! Human-readable rendering of a simulated day.

use std::fmt;

use crate::sim::series::HOURS_PER_DAY;
use crate::sim::types::{SimulationDelta, SimulationResult};
use crate::sim::window::{HOUR_MINUTES, format_minute};

/// Plain-text report of a [`SimulationResult`].
///
/// Renders one line per hour, a summary block, per-device rows, battery
/// outcomes and the load-shift suggestions.
pub struct Report<'a> {
    pub result: &'a SimulationResult,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a SimulationResult) -> Self {
        Self { result }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        let currency = &r.currency;

        writeln!(f, "--- Hourly Energy ---")?;
        for hour in 0..HOURS_PER_DAY {
            writeln!(
                f,
                "{} | use={:>7.3} kWh | prod={:>7.3} kWh | net={:>7.3} kWh | cost={:>8.4} {currency}",
                format_minute(hour as f64 * HOUR_MINUTES),
                r.hourly_consumption_kwh[hour],
                r.hourly_production_kwh[hour],
                r.hourly_totals_kwh[hour],
                r.hourly_cost[hour],
            )?;
        }

        writeln!(f)?;
        writeln!(f, "--- Summary ---")?;
        writeln!(f, "Consumption:      {:.3} kWh/day", r.total_daily_consumption_kwh)?;
        writeln!(f, "Production:       {:.3} kWh/day", r.total_daily_production_kwh)?;
        writeln!(
            f,
            "Net energy:       {:.3} kWh/day, {:.2} kWh/week, {:.2} kWh/month",
            r.total_daily_kwh, r.total_weekly_kwh, r.total_monthly_kwh
        )?;
        writeln!(
            f,
            "Cost:             {:.2} {currency}/day, {:.2} {currency}/week, {:.2} {currency}/month",
            r.total_daily_cost, r.total_weekly_cost, r.total_monthly_cost
        )?;
        writeln!(
            f,
            "Production value: {:.2} {currency}/day, {:.2} {currency}/month",
            r.total_daily_savings, r.total_monthly_savings
        )?;
        writeln!(f, "Peak hour:        {}", format_minute(r.peak_hour as f64 * HOUR_MINUTES))?;

        if !r.appliances.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Appliances ---")?;
            for device in &r.appliances {
                writeln!(
                    f,
                    "{:<24} {:<16} {:>8.3} kWh {:>8.2} {currency}",
                    device.name, device.model_kind, device.daily_kwh, device.daily_cost
                )?;
            }
        }

        if !r.producers.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- Producers ---")?;
            for device in &r.producers {
                writeln!(
                    f,
                    "{:<24} {:<16} {:>8.3} kWh {:>8.2} {currency}",
                    device.name, device.model_kind, device.daily_kwh, device.daily_cost
                )?;
            }
        }

        for battery in &r.batteries {
            writeln!(
                f,
                "Battery {}: captured {:.3} kWh, delivered {:.3} kWh, left {:.3} kWh",
                battery.name, battery.captured_kwh, battery.delivered_kwh, battery.final_charge_kwh
            )?;
        }

        writeln!(f)?;
        writeln!(f, "--- Savings Suggestions ---")?;
        if r.savings_actions.is_empty() {
            write!(f, "No load shift saves money under this tariff.")
        } else {
            for (i, action) in r.savings_actions.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write!(
                    f,
                    "{}: move {} -> {}, saves {:.2} {currency}/day ({})",
                    action.appliance_name,
                    format_minute(action.from_start_min),
                    format_minute(action.to_start_min),
                    action.estimated_daily_savings,
                    action.reason
                )?;
            }
            Ok(())
        }
    }
}

/// Plain-text rendering of a [`SimulationDelta`].
pub struct DeltaReport<'a> {
    pub delta: &'a SimulationDelta,
    pub currency: &'a str,
}

impl fmt::Display for DeltaReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.delta;
        let currency = self.currency;
        writeln!(f, "--- Compared With Baseline ---")?;
        writeln!(
            f,
            "Energy: {:+.3} kWh/day, {:+.2} kWh/month",
            d.daily_kwh_delta, d.monthly_kwh_delta
        )?;
        write!(
            f,
            "Cost:   {:+.2} {currency}/day, {:+.2} {currency}/month",
            d.daily_cost_delta, d.monthly_cost_delta
        )
    }
}
