//! Minute-of-day arithmetic over the circular 1440-minute day.
//!
//! Windows are half-open `[start, end)` intervals that wrap past midnight
//! when `end < start`. The value `1440` is kept as an end-of-day sentinel
//! rather than folded back to `0`.

use serde::{Deserialize, Deserializer, Serialize};

use super::series::clamp;

/// Minutes in one simulated day.
pub const DAY_MINUTES: f64 = 1440.0;
/// Minutes in one hour.
pub const HOUR_MINUTES: f64 = 60.0;
/// Number of one-minute slots in a day.
pub const MINUTES_PER_DAY: usize = 1440;

/// A non-wrapping half-open `[start, end)` interval in minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

/// A possibly-wrapping window on the minute-of-day circle.
///
/// Minute fields accept either a number or an `"HH:MM"` string when
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeWindow {
    /// Window start (inclusive).
    #[serde(deserialize_with = "deserialize_minute")]
    pub start_min: f64,
    /// Window end (exclusive).
    #[serde(deserialize_with = "deserialize_minute")]
    pub end_min: f64,
}

impl TimeWindow {
    pub fn new(start_min: f64, end_min: f64) -> Self {
        Self { start_min, end_min }
    }

    /// The unrestricted `[0, 1440)` window.
    pub fn full_day() -> Self {
        Self::new(0.0, DAY_MINUTES)
    }

    /// Circular length of the window in minutes.
    pub fn len_minutes(&self) -> f64 {
        window_length(self.start_min, self.end_min)
    }

    pub fn contains(&self, minute: f64) -> bool {
        is_minute_in_window(minute, self.start_min, self.end_min)
    }

    pub fn spans(&self) -> Vec<Span> {
        split_window(self.start_min, self.end_min)
    }
}

/// Maps a minute value onto `[0, 1440]`.
///
/// Values are clamped into range first; `1440` survives as the end-of-day
/// sentinel, everything else is reduced modulo the day length.
pub fn normalize_minute(minute: f64) -> f64 {
    let clamped = clamp(minute, 0.0, DAY_MINUTES);
    if clamped == DAY_MINUTES {
        DAY_MINUTES
    } else {
        clamped.rem_euclid(DAY_MINUTES)
    }
}

/// Circular length of `[start, end)`, wrapping through midnight when `end < start`.
pub fn window_length(start_min: f64, end_min: f64) -> f64 {
    let start = normalize_minute(start_min);
    let end = normalize_minute(end_min);
    if start == DAY_MINUTES && end == DAY_MINUTES {
        return 0.0;
    }
    if end >= start {
        end - start
    } else {
        DAY_MINUTES - start + end
    }
}

/// Decomposes a window into zero, one or two non-wrapping spans.
///
/// # Examples
///
/// ```
/// use household_sim::sim::window::{split_window, Span};
///
/// let spans = split_window(1380.0, 120.0);
/// assert_eq!(
///     spans,
///     vec![Span { start: 1380.0, end: 1440.0 }, Span { start: 0.0, end: 120.0 }]
/// );
/// assert!(split_window(600.0, 600.0).is_empty());
/// ```
pub fn split_window(start_min: f64, end_min: f64) -> Vec<Span> {
    let start = clamp(start_min, 0.0, DAY_MINUTES);
    let end = clamp(end_min, 0.0, DAY_MINUTES);
    if start == end {
        Vec::new()
    } else if end > start {
        vec![Span { start, end }]
    } else {
        vec![
            Span {
                start,
                end: DAY_MINUTES,
            },
            Span { start: 0.0, end },
        ]
    }
}

/// Length of the intersection of two half-open intervals, never negative.
pub fn overlap_minutes(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> f64 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0.0)
}

/// End minute of a run that starts at `start_min` and lasts `duration_min`.
pub fn end_from_duration(start_min: f64, duration_min: f64) -> f64 {
    let start = clamp(start_min, 0.0, DAY_MINUTES);
    let duration = clamp(duration_min, 0.0, DAY_MINUTES);
    (start + duration) % DAY_MINUTES
}

/// Membership test honouring wraparound. An empty window (`start == end`)
/// contains no minute.
pub fn is_minute_in_window(minute: f64, start_min: f64, end_min: f64) -> bool {
    let m = minute.rem_euclid(DAY_MINUTES);
    let start = clamp(start_min, 0.0, DAY_MINUTES);
    let end = clamp(end_min, 0.0, DAY_MINUTES);

    if start == end {
        false
    } else if end > start {
        m >= start && m < end
    } else {
        m >= start || m < end
    }
}

/// Centres a run of `duration_min` inside `[start_min, end_min)`.
///
/// The duration is clamped to the window length. Returns the concrete
/// `(start, end)` of the centred run, both reduced modulo the day.
pub fn center_duration_in_window(duration_min: f64, start_min: f64, end_min: f64) -> (f64, f64) {
    let start = normalize_minute(start_min);
    let len = window_length(start_min, end_min);
    if len <= 0.0 || duration_min <= 0.0 {
        return (start, start);
    }

    let duration = duration_min.min(len);
    let offset = (len - duration) / 2.0;
    let absolute_start = start + offset;
    let absolute_end = absolute_start + duration;
    (
        absolute_start.rem_euclid(DAY_MINUTES),
        absolute_end.rem_euclid(DAY_MINUTES),
    )
}

/// Formats a minute-of-day as `HH:MM`. `1440` renders as `00:00`.
pub fn format_minute(minute: f64) -> String {
    let safe = clamp(minute.round(), 0.0, DAY_MINUTES) as u32;
    let hours = (safe % 1440) / 60;
    let minutes = safe % 60;
    format!("{hours:02}:{minutes:02}")
}

/// Parses `HH:MM` into a minute-of-day clamped to `[0, 1440]`.
///
/// Returns `None` when either component is missing or not a finite number.
pub fn parse_hour_minute(text: &str) -> Option<f64> {
    let (hours, minutes) = text.trim().split_once(':')?;
    let hours: f64 = hours.trim().parse().ok()?;
    let minutes: f64 = minutes.trim().parse().ok()?;
    if !hours.is_finite() || !minutes.is_finite() {
        return None;
    }
    Some(clamp(hours * HOUR_MINUTES + minutes, 0.0, DAY_MINUTES))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MinuteRepr {
    Minutes(f64),
    Clock(String),
}

/// Deserializes a minute-of-day written either as a number or as `"HH:MM"`.
pub fn deserialize_minute<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match MinuteRepr::deserialize(deserializer)? {
        MinuteRepr::Minutes(minutes) => Ok(minutes),
        MinuteRepr::Clock(text) => parse_hour_minute(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time of day \"{text}\", expected HH:MM"))
        }),
    }
}
