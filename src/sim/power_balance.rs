//! Minute-by-minute energy balance with battery arbitration.

use tracing::trace;

use crate::devices::BatteryState;

use super::series::zero_minutes;
use super::window::MINUTES_PER_DAY;

/// Net energy at one minute before any battery acts.
///
/// Positive values are surplus available for charging, negative values are
/// deficit the batteries (then the grid) must cover.
pub fn net_without_battery(production_kwh: f64, consumption_kwh: f64) -> f64 {
    production_kwh - consumption_kwh
}

/// Battery activity after the day has been balanced.
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    /// Final state of every battery, in declaration order.
    pub batteries: Vec<BatteryState>,
    /// Combined battery output per minute (kWh).
    pub battery_output_per_minute: Vec<f64>,
}

/// Runs the battery solver over one day.
///
/// # Arguments
///
/// * `consumption_per_minute` - Total appliance consumption per minute (kWh)
/// * `production_per_minute` - Non-battery production per minute (kWh)
/// * `rates_by_minute` - Import rate at each minute
/// * `peak_threshold` - Day-wide peak rate for `peak_shaving` batteries
/// * `batteries` - Fresh battery states in declaration order
///
/// # Returns
///
/// A [`BalanceOutcome`] with the updated battery states and their combined
/// per-minute output.
///
/// Surplus charges batteries in declaration order and any remainder is
/// curtailed. Deficit is covered by each battery in declaration order
/// within its window and strategy; the grid supplies what is left.
pub fn solve_battery_dispatch(
    consumption_per_minute: &[f64],
    production_per_minute: &[f64],
    rates_by_minute: &[f64],
    peak_threshold: f64,
    mut batteries: Vec<BatteryState>,
) -> BalanceOutcome {
    let mut battery_output_per_minute = zero_minutes();
    if batteries.is_empty() {
        return BalanceOutcome {
            batteries,
            battery_output_per_minute,
        };
    }

    for minute in 0..MINUTES_PER_DAY {
        let consumption = consumption_per_minute.get(minute).copied().unwrap_or(0.0);
        let production = production_per_minute.get(minute).copied().unwrap_or(0.0);
        let net = net_without_battery(production, consumption);

        if net > 0.0 {
            let mut excess = net;
            for battery in &mut batteries {
                if excess <= 0.0 {
                    break;
                }
                excess -= battery.charge(excess);
            }
        } else if net < 0.0 {
            let rate = rates_by_minute.get(minute).copied().unwrap_or(0.0);
            let mut deficit = -net;
            for battery in &mut batteries {
                if deficit <= 0.0 {
                    break;
                }
                let delivered = battery.discharge(minute, deficit, rate, peak_threshold);
                deficit -= delivered;
                battery_output_per_minute[minute] += delivered;
            }
        }
    }

    for battery in &batteries {
        trace!(
            producer = battery.producer_index,
            captured_kwh = battery.captured_kwh,
            delivered_kwh = battery.delivered_kwh(),
            final_charge_kwh = battery.charge_kwh,
            "battery balanced"
        );
    }

    BalanceOutcome {
        batteries,
        battery_output_per_minute,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::devices::{BatteryStrategy, Producer, ProducerModel};
    use crate::sim::series::total;

    fn battery_state(index: usize, capacity_kwh: f64, strategy: BatteryStrategy) -> BatteryState {
        let producer = Producer {
            id: format!("battery-{index}"),
            name: "Battery".to_string(),
            enabled: true,
            quantity: 1,
            model: ProducerModel::BatteryDischarge {
                capacity_kwh,
                max_output_kw: 3.0,
                start_min: 0.0,
                end_min: 1440.0,
                strategy,
            },
        };
        BatteryState::from_producer(index, &producer).expect("battery state")
    }

    #[test]
    fn net_is_production_minus_consumption() {
        assert_abs_diff_eq!(net_without_battery(0.05, 0.02), 0.03, epsilon = 1e-12);
        assert_eq!(net_without_battery(0.0, 0.02), -0.02);
    }

    #[test]
    fn no_batteries_means_no_output() {
        let outcome = solve_battery_dispatch(&[0.01; 1440], &[0.0; 1440], &[0.2; 1440], 0.2, Vec::new());
        assert!(outcome.batteries.is_empty());
        assert_eq!(total(&outcome.battery_output_per_minute), 0.0);
    }

    #[test]
    fn battery_without_surplus_stays_empty() {
        let outcome = solve_battery_dispatch(
            &[0.01; 1440],
            &[0.0; 1440],
            &[0.2; 1440],
            0.2,
            vec![battery_state(0, 5.0, BatteryStrategy::SelfConsumption)],
        );
        assert_eq!(outcome.batteries[0].captured_kwh, 0.0);
        assert_eq!(total(&outcome.battery_output_per_minute), 0.0);
    }

    #[test]
    fn surplus_shifts_to_later_deficit() {
        // Surplus for the first 600 minutes, deficit afterwards.
        let mut production = vec![0.0; 1440];
        production[..600].fill(0.01);
        let consumption = vec![0.005; 1440];
        let outcome = solve_battery_dispatch(
            &consumption,
            &production,
            &[0.2; 1440],
            0.2,
            vec![battery_state(0, 10.0, BatteryStrategy::SelfConsumption)],
        );
        let battery = &outcome.batteries[0];
        assert_abs_diff_eq!(battery.captured_kwh, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(battery.delivered_kwh(), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(total(&outcome.battery_output_per_minute), 3.0, epsilon = 1e-9);
        assert!(battery.delivered_kwh() <= battery.captured_kwh + 1e-12);
        assert_eq!(outcome.battery_output_per_minute[100], 0.0);
    }

    #[test]
    fn first_declared_battery_charges_first() {
        let mut production = vec![0.0; 1440];
        production[..60].fill(0.1);
        let outcome = solve_battery_dispatch(
            &[0.0; 1440],
            &production,
            &[0.2; 1440],
            0.2,
            vec![
                battery_state(0, 4.0, BatteryStrategy::SelfConsumption),
                battery_state(1, 4.0, BatteryStrategy::SelfConsumption),
            ],
        );
        assert_abs_diff_eq!(outcome.batteries[0].charge_kwh, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(outcome.batteries[1].charge_kwh, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn first_declared_battery_discharges_first() {
        let mut production = vec![0.0; 1440];
        production[..60].fill(0.1);
        let mut consumption = vec![0.0; 1440];
        consumption[600..660].fill(0.02);
        let outcome = solve_battery_dispatch(
            &consumption,
            &production,
            &[0.2; 1440],
            0.2,
            vec![
                battery_state(0, 4.0, BatteryStrategy::SelfConsumption),
                battery_state(1, 4.0, BatteryStrategy::SelfConsumption),
            ],
        );
        let (first, second) = (&outcome.batteries[0], &outcome.batteries[1]);
        assert_abs_diff_eq!(first.delivered_kwh(), 1.2, epsilon = 1e-9);
        assert_abs_diff_eq!(first.charge_kwh, 2.8, epsilon = 1e-9);
        assert_eq!(second.delivered_kwh(), 0.0);
        assert_eq!(second.output_at(630), 0.0);
        assert_abs_diff_eq!(second.charge_kwh, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn peak_shaving_holds_charge_for_peak_minutes() {
        let mut production = vec![0.0; 1440];
        production[..60].fill(0.05);
        let mut rates = vec![0.1; 1440];
        rates[1080..1260].fill(0.5);
        let outcome = solve_battery_dispatch(
            &[0.01; 1440],
            &production,
            &rates,
            0.5,
            vec![battery_state(0, 10.0, BatteryStrategy::PeakShaving)],
        );
        let output = &outcome.battery_output_per_minute;
        assert_eq!(total(&output[60..1080]), 0.0);
        assert!(total(&output[1080..1260]) > 0.0);
        assert_eq!(total(&output[1260..]), 0.0);
    }
}
