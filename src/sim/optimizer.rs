//! Load-shift optimizer.
//!
//! Movable loads are re-priced at every half-hour start using a weighted
//! hourly rate that discounts hours already covered by production. The best
//! start per appliance becomes a [`SavingsAction`] when it saves enough.

use tracing::trace;

use crate::devices::types::rounded_quantity;
use crate::devices::{Appliance, ApplianceModel, scheduled_window_hourly};
use crate::tariff::{HouseholdProfile, TariffModel};

use super::series::{Hourly, HOURS_PER_DAY, clamp, positive};
use super::types::{SavingsAction, ShiftableKind};
use super::window::{
    DAY_MINUTES, MINUTES_PER_DAY, center_duration_in_window, is_minute_in_window,
    normalize_minute, split_window, window_length,
};

/// Spacing of candidate start times in minutes.
pub const SHIFT_STEP_MIN: usize = 30;
/// Fraction of an hour's rate removed when production fully covers it.
pub const SOLAR_DISCOUNT: f64 = 0.8;
/// Smallest daily saving worth suggesting.
pub const MIN_SAVINGS: f64 = 0.01;
/// Maximum number of suggestions returned.
pub const MAX_SAVINGS_ACTIONS: usize = 3;

const SHIFT_REASON: &str = "Shift to cheaper tariff hours with stronger solar overlap";

/// The movable part of an appliance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ShiftShape {
    kind: ShiftableKind,
    current_start_min: f64,
    duration_min: f64,
    watts: f64,
    window_start_min: f64,
    window_end_min: f64,
}

fn shift_shape(appliance: &Appliance) -> Option<ShiftShape> {
    if !appliance.enabled {
        return None;
    }
    let quantity = rounded_quantity(appliance.quantity);

    match &appliance.model {
        ApplianceModel::ScheduledWindow {
            watts,
            start_min,
            duration_min,
        } => Some(ShiftShape {
            kind: ShiftableKind::ScheduledWindow,
            current_start_min: normalize_minute(*start_min),
            duration_min: clamp(*duration_min, 0.0, DAY_MINUTES),
            watts: positive(*watts) * quantity,
            window_start_min: 0.0,
            window_end_min: DAY_MINUTES,
        }),
        ApplianceModel::DailyDuration {
            watts,
            minutes_per_day,
            window: Some(window),
        } => {
            let duration = clamp(*minutes_per_day, 0.0, DAY_MINUTES);
            let window_len = window_length(window.start_min, window.end_min);
            if window_len <= 0.0 || duration <= 0.0 {
                return None;
            }
            let duration = duration.min(window_len);
            let (current_start_min, _) =
                center_duration_in_window(duration, window.start_min, window.end_min);
            Some(ShiftShape {
                kind: ShiftableKind::DailyDuration,
                current_start_min,
                duration_min: duration,
                watts: positive(*watts) * quantity,
                window_start_min: normalize_minute(window.start_min),
                window_end_min: normalize_minute(window.end_min),
            })
        }
        _ => None,
    }
}

/// Returns `true` if a run of `duration_min` starting at `start_min` stays
/// inside `[window_start_min, window_end_min)`.
///
/// The full-day window admits every start. Otherwise the first and last
/// minute of each midnight-split piece of the run must fall in the window.
pub fn can_start_within_window(
    start_min: f64,
    duration_min: f64,
    window_start_min: f64,
    window_end_min: f64,
) -> bool {
    if window_start_min == 0.0 && window_end_min == DAY_MINUTES {
        return true;
    }
    if duration_min <= 0.0 {
        return false;
    }

    let end_min = (start_min + duration_min) % DAY_MINUTES;
    let slices = split_window(start_min, end_min);
    if slices.is_empty() {
        return false;
    }
    slices.iter().all(|slice| {
        let last_minute = (slice.end - 1.0).rem_euclid(DAY_MINUTES);
        is_minute_in_window(slice.start, window_start_min, window_end_min)
            && is_minute_in_window(last_minute, window_start_min, window_end_min)
    })
}

/// Per-hour rate discounted by how much of the hour production already covers.
pub fn weighted_hourly_rates(
    hourly_rates: &Hourly,
    hourly_production: &Hourly,
    hourly_consumption: &Hourly,
) -> Hourly {
    let mut weighted = [0.0; HOURS_PER_DAY];
    for (hour, slot) in weighted.iter_mut().enumerate() {
        let coverage = clamp(
            hourly_production[hour] / hourly_consumption[hour].max(0.001),
            0.0,
            1.0,
        );
        *slot = hourly_rates[hour] * (1.0 - coverage * SOLAR_DISCOUNT);
    }
    weighted
}

fn weighted_cost(hourly_kwh: &Hourly, weighted_rates: &Hourly) -> f64 {
    hourly_kwh
        .iter()
        .zip(weighted_rates)
        .map(|(kwh, rate)| kwh * rate)
        .sum()
}

/// Suggests cheaper start times for movable appliances.
///
/// Only enabled `scheduled_window` appliances and `daily_duration`
/// appliances with an allowed window are considered. Returns at most
/// [`MAX_SAVINGS_ACTIONS`] suggestions, largest saving first.
///
/// # Arguments
///
/// * `appliances` - Household appliances in declaration order
/// * `profile` - Day context for the tariff
/// * `tariff` - Tariff used to price each hour
/// * `hourly_production` - Total production per hour (kWh)
/// * `hourly_consumption` - Total consumption per hour (kWh)
pub fn suggest_load_shifts(
    appliances: &[Appliance],
    profile: &HouseholdProfile,
    tariff: &TariffModel,
    hourly_production: &Hourly,
    hourly_consumption: &Hourly,
) -> Vec<SavingsAction> {
    let rates = weighted_hourly_rates(
        &tariff.hourly_average_rates(profile),
        hourly_production,
        hourly_consumption,
    );
    let mut actions = Vec::new();

    for appliance in appliances {
        let Some(shape) = shift_shape(appliance) else {
            continue;
        };
        if shape.duration_min <= 0.0 || shape.watts <= 0.0 {
            continue;
        }

        let current = scheduled_window_hourly(shape.watts, shape.current_start_min, shape.duration_min);
        let current_cost = weighted_cost(&current, &rates);
        let mut best_cost = current_cost;
        let mut best_start = shape.current_start_min;

        for candidate in (0..MINUTES_PER_DAY).step_by(SHIFT_STEP_MIN) {
            let candidate = candidate as f64;
            if !can_start_within_window(
                candidate,
                shape.duration_min,
                shape.window_start_min,
                shape.window_end_min,
            ) {
                continue;
            }
            let hourly = scheduled_window_hourly(shape.watts, candidate, shape.duration_min);
            let cost = weighted_cost(&hourly, &rates);
            if cost < best_cost {
                best_cost = cost;
                best_start = candidate;
            }
        }

        let savings = current_cost - best_cost;
        trace!(
            appliance = %appliance.id,
            current_cost,
            best_cost,
            best_start,
            "load shift evaluated"
        );
        if savings > MIN_SAVINGS && best_start != shape.current_start_min {
            actions.push(SavingsAction {
                appliance_id: appliance.id.clone(),
                appliance_name: appliance.name.clone(),
                model_kind: shape.kind,
                from_start_min: shape.current_start_min,
                to_start_min: best_start,
                estimated_daily_savings: savings,
                reason: SHIFT_REASON.to_string(),
            });
        }
    }

    actions.sort_by(|a, b| b.estimated_daily_savings.total_cmp(&a.estimated_daily_savings));
    actions.truncate(MAX_SAVINGS_ACTIONS);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::window::TimeWindow;
    use crate::tariff::TariffWindow;

    fn peak_evening_tariff() -> TariffModel {
        TariffModel::Tou {
            currency: "USD".to_string(),
            default_rate_per_kwh: 0.1,
            sell_back_rate_per_kwh: None,
            windows: vec![TariffWindow {
                id: "peak".to_string(),
                start_min: 1020.0,
                end_min: 1320.0,
                rate_per_kwh: 0.5,
                day_types: Vec::new(),
                seasons: Vec::new(),
            }],
        }
    }

    fn appliance(id: &str, model: ApplianceModel) -> Appliance {
        Appliance {
            id: id.to_string(),
            name: id.to_string(),
            enabled: true,
            quantity: 1,
            model,
        }
    }

    fn no_energy() -> Hourly {
        [0.0; HOURS_PER_DAY]
    }

    #[test]
    fn full_day_window_admits_any_start() {
        assert!(can_start_within_window(1410.0, 120.0, 0.0, 1440.0));
        assert!(can_start_within_window(0.0, 0.0, 0.0, 1440.0));
    }

    #[test]
    fn run_must_fit_inside_window() {
        assert!(can_start_within_window(600.0, 60.0, 600.0, 720.0));
        assert!(can_start_within_window(660.0, 60.0, 600.0, 720.0));
        assert!(!can_start_within_window(690.0, 60.0, 600.0, 720.0));
        assert!(!can_start_within_window(570.0, 60.0, 600.0, 720.0));
        assert!(!can_start_within_window(600.0, 0.0, 600.0, 720.0));
    }

    #[test]
    fn run_may_wrap_inside_overnight_window() {
        assert!(can_start_within_window(1380.0, 120.0, 1320.0, 240.0));
        assert!(!can_start_within_window(1380.0, 360.0, 1320.0, 240.0));
    }

    #[test]
    fn solar_coverage_discounts_rate() {
        let rates = [0.5; HOURS_PER_DAY];
        let mut production = [0.0; HOURS_PER_DAY];
        production[12] = 2.0;
        production[13] = 0.5;
        let consumption = [1.0; HOURS_PER_DAY];
        let weighted = weighted_hourly_rates(&rates, &production, &consumption);
        assert!((weighted[12] - 0.1).abs() < 1e-12);
        assert!((weighted[13] - 0.3).abs() < 1e-12);
        assert_eq!(weighted[0], 0.5);
    }

    #[test]
    fn suggests_moving_evening_load_off_peak() {
        let dishwasher = appliance(
            "dishwasher",
            ApplianceModel::ScheduledWindow {
                watts: 1000.0,
                start_min: 1080.0,
                duration_min: 120.0,
            },
        );
        let actions = suggest_load_shifts(
            &[dishwasher],
            &HouseholdProfile::default(),
            &peak_evening_tariff(),
            &no_energy(),
            &no_energy(),
        );
        assert_eq!(actions.len(), 1);
        let action = &actions[0];
        assert_eq!(action.appliance_id, "dishwasher");
        assert_eq!(action.model_kind, ShiftableKind::ScheduledWindow);
        assert_eq!(action.from_start_min, 1080.0);
        assert_eq!(action.to_start_min, 0.0);
        assert!((action.estimated_daily_savings - 0.8).abs() < 1e-9);
    }

    #[test]
    fn daily_duration_stays_inside_allowed_window() {
        let heater = appliance(
            "heater",
            ApplianceModel::DailyDuration {
                watts: 2000.0,
                minutes_per_day: 60.0,
                window: Some(TimeWindow::new(960.0, 1200.0)),
            },
        );
        let actions = suggest_load_shifts(
            &[heater],
            &HouseholdProfile::default(),
            &peak_evening_tariff(),
            &no_energy(),
            &no_energy(),
        );
        assert_eq!(actions.len(), 1);
        let action = &actions[0];
        assert_eq!(action.from_start_min, 1050.0);
        assert_eq!(action.to_start_min, 960.0);
        assert!(is_minute_in_window(action.to_start_min, 960.0, 1200.0));
        assert!(action.estimated_daily_savings > 0.0);
    }

    #[test]
    fn flat_tariff_without_production_suggests_nothing() {
        let load = appliance(
            "oven",
            ApplianceModel::ScheduledWindow {
                watts: 2000.0,
                start_min: 1080.0,
                duration_min: 60.0,
            },
        );
        let actions = suggest_load_shifts(
            &[load],
            &HouseholdProfile::default(),
            &TariffModel::default(),
            &no_energy(),
            &no_energy(),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn non_movable_and_disabled_loads_are_skipped() {
        let mut disabled = appliance(
            "dryer",
            ApplianceModel::ScheduledWindow {
                watts: 3000.0,
                start_min: 1080.0,
                duration_min: 60.0,
            },
        );
        disabled.enabled = false;
        let fridge = appliance("fridge", ApplianceModel::AlwaysOn { watts: 90.0 });
        let unwindowed = appliance(
            "pump",
            ApplianceModel::DailyDuration {
                watts: 500.0,
                minutes_per_day: 120.0,
                window: None,
            },
        );
        let actions = suggest_load_shifts(
            &[disabled, fridge, unwindowed],
            &HouseholdProfile::default(),
            &peak_evening_tariff(),
            &no_energy(),
            &no_energy(),
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn keeps_top_three_by_savings() {
        let loads: Vec<Appliance> = [500.0, 3000.0, 1000.0, 2000.0]
            .iter()
            .enumerate()
            .map(|(i, watts)| {
                appliance(
                    &format!("load-{i}"),
                    ApplianceModel::ScheduledWindow {
                        watts: *watts,
                        start_min: 1080.0,
                        duration_min: 60.0,
                    },
                )
            })
            .collect();
        let actions = suggest_load_shifts(
            &loads,
            &HouseholdProfile::default(),
            &peak_evening_tariff(),
            &no_energy(),
            &no_energy(),
        );
        let ids: Vec<&str> = actions.iter().map(|a| a.appliance_id.as_str()).collect();
        assert_eq!(ids, vec!["load-1", "load-3", "load-2"]);
    }
}
