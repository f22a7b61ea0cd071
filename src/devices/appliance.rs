use crate::sim::series::{Hourly, HOURS_PER_DAY, clamp, positive, scale};
use crate::sim::window::{
    DAY_MINUTES, HOUR_MINUTES, center_duration_in_window, end_from_duration, overlap_minutes,
    split_window, window_length,
};

use super::types::{Appliance, ApplianceModel, EnergyModel, rounded_quantity};

/// Run start used by `daily_duration` appliances without an allowed window (08:00).
pub const DEFAULT_DAILY_START_MIN: f64 = 480.0;

/// Upper bound on the number of units a `count_based` appliance may have.
pub const MAX_COUNT: u32 = 200;

/// Computes an appliance's energy for each hour of the day in kWh.
///
/// Returns all zeros when the appliance is disabled. The result is scaled by
/// `max(1, quantity)`.
///
/// # Examples
///
/// ```
/// use household_sim::devices::{Appliance, ApplianceModel, compute_appliance_hourly};
///
/// let lamp = Appliance {
///     id: "lamp".into(),
///     name: "Lamp".into(),
///     enabled: true,
///     quantity: 2,
///     model: ApplianceModel::ScheduledWindow { watts: 500.0, start_min: 1200.0, duration_min: 60.0 },
/// };
/// let hourly = compute_appliance_hourly(&lamp);
/// assert_eq!(hourly[20], 1.0);
/// ```
pub fn compute_appliance_hourly(appliance: &Appliance) -> Hourly {
    if !appliance.enabled {
        return [0.0; HOURS_PER_DAY];
    }

    let base = match &appliance.model {
        ApplianceModel::AlwaysOn { watts } => [positive(*watts) / 1000.0; HOURS_PER_DAY],
        ApplianceModel::ScheduledWindow {
            watts,
            start_min,
            duration_min,
        } => scheduled_window_hourly(*watts, *start_min, *duration_min),
        ApplianceModel::DailyDuration {
            watts,
            minutes_per_day,
            window,
        } => {
            let duration = clamp(*minutes_per_day, 0.0, DAY_MINUTES);
            if duration <= 0.0 {
                return [0.0; HOURS_PER_DAY];
            }
            match window {
                Some(window) => {
                    let len = window_length(window.start_min, window.end_min);
                    let (start, end) = center_duration_in_window(
                        duration.min(len),
                        window.start_min,
                        window.end_min,
                    );
                    fixed_window_hourly(*watts, start, end)
                }
                None => daily_duration_default_hourly(*watts, duration),
            }
        }
        ApplianceModel::CountBased {
            count,
            watts_each,
            minutes_per_day,
            schedule,
        } => {
            let watts = f64::from((*count).min(MAX_COUNT)) * positive(*watts_each);
            if let Some(schedule) = schedule {
                fixed_window_hourly(watts, schedule.start_min, schedule.end_min)
            } else if let Some(minutes) = minutes_per_day {
                let duration = clamp(*minutes, 0.0, DAY_MINUTES);
                if duration <= 0.0 {
                    [0.0; HOURS_PER_DAY]
                } else {
                    daily_duration_default_hourly(watts, duration)
                }
            } else {
                [0.0; HOURS_PER_DAY]
            }
        }
        // Forward-compatible fallback: unknown kinds draw nothing.
        ApplianceModel::Unsupported => [0.0; HOURS_PER_DAY],
    };

    scale(base, rounded_quantity(appliance.quantity))
}

/// Hourly energy of a load drawing `watts` from `start_min` for `duration_min`.
///
/// The window is `(start, start + duration) mod 1440`, so a full-day
/// duration collapses to an empty window.
pub fn scheduled_window_hourly(watts: f64, start_min: f64, duration_min: f64) -> Hourly {
    let safe_watts = positive(watts);
    let duration = clamp(duration_min, 0.0, DAY_MINUTES);
    if safe_watts <= 0.0 || duration <= 0.0 {
        return [0.0; HOURS_PER_DAY];
    }
    let end_min = end_from_duration(start_min, duration);
    spread_over_hours(safe_watts, start_min, end_min)
}

/// Hourly energy of a load drawing `watts` across `[start_min, end_min)`.
pub fn fixed_window_hourly(watts: f64, start_min: f64, end_min: f64) -> Hourly {
    let safe_watts = positive(watts);
    if safe_watts <= 0.0 {
        return [0.0; HOURS_PER_DAY];
    }
    spread_over_hours(safe_watts, start_min, end_min)
}

fn daily_duration_default_hourly(watts: f64, duration: f64) -> Hourly {
    let end = (DEFAULT_DAILY_START_MIN + duration) % DAY_MINUTES;
    fixed_window_hourly(watts, DEFAULT_DAILY_START_MIN, end)
}

fn spread_over_hours(watts: f64, start_min: f64, end_min: f64) -> Hourly {
    let kw = watts / 1000.0;
    let mut hourly = [0.0; HOURS_PER_DAY];
    for span in split_window(start_min, end_min) {
        for (hour, slot) in hourly.iter_mut().enumerate() {
            let hour_start = hour as f64 * HOUR_MINUTES;
            let minutes = overlap_minutes(span.start, span.end, hour_start, hour_start + HOUR_MINUTES);
            if minutes > 0.0 {
                *slot += (minutes / 60.0) * kw;
            }
        }
    }
    hourly
}

impl EnergyModel for Appliance {
    fn hourly_kwh(&self) -> Hourly {
        compute_appliance_hourly(self)
    }

    fn model_kind(&self) -> &'static str {
        self.model.kind()
    }
}
