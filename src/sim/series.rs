//! Fixed-length daily series and the numeric guards applied to raw inputs.

use super::window::MINUTES_PER_DAY;

/// Number of hourly slots in a day.
pub const HOURS_PER_DAY: usize = 24;

/// One value per hour of the day (kWh, or currency for cost series).
pub type Hourly = [f64; HOURS_PER_DAY];

/// Clamps `value` into `[min, max]`. Non-finite input collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.max(min).min(max)
}

/// Replaces NaN, infinities and negatives with zero.
pub fn positive(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// A zeroed per-minute series for one day.
pub fn zero_minutes() -> Vec<f64> {
    vec![0.0; MINUTES_PER_DAY]
}

/// Spreads each hour's value evenly over its sixty minutes.
pub fn expand_to_minutes(hourly: &Hourly) -> Vec<f64> {
    let mut per_minute = zero_minutes();
    for (hour, chunk) in per_minute.chunks_exact_mut(60).enumerate() {
        chunk.fill(hourly[hour] / 60.0);
    }
    per_minute
}

/// Sums each run of sixty minutes back into its hour.
pub fn compress_to_hourly(per_minute: &[f64]) -> Hourly {
    let mut hourly = [0.0; HOURS_PER_DAY];
    for (minute, value) in per_minute.iter().take(MINUTES_PER_DAY).enumerate() {
        hourly[minute / 60] += value;
    }
    hourly
}

/// Element-wise sum of any number of hourly series.
pub fn sum_hourlies<'a>(series: impl IntoIterator<Item = &'a Hourly>) -> Hourly {
    let mut total = [0.0; HOURS_PER_DAY];
    for hourly in series {
        for (acc, value) in total.iter_mut().zip(hourly) {
            *acc += value;
        }
    }
    total
}

/// Multiplies every slot by `factor`.
pub fn scale(hourly: Hourly, factor: f64) -> Hourly {
    if factor == 1.0 {
        return hourly;
    }
    hourly.map(|value| value * factor)
}

/// Sum of all slots.
pub fn total(values: &[f64]) -> f64 {
    values.iter().sum()
}
