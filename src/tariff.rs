//! Tariff records and the import/export rate resolver.
//!
//! A tariff is either flat or time-of-use. Time-of-use windows are filtered
//! by the household's day type and season, then checked in declaration
//! order; the last window covering a minute sets the rate.

use serde::{Deserialize, Serialize};

use crate::sim::series::{Hourly, compress_to_hourly, positive};
use crate::sim::window::{MINUTES_PER_DAY, deserialize_minute, is_minute_in_window};

/// Whether the simulated day is a working day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    #[default]
    Weekday,
    Weekend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Summer,
    Winter,
}

/// Day context used to select active tariff windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdProfile {
    pub day_type: DayType,
    pub season: Season,
}

/// A time-of-use price window.
///
/// Empty `day_types` or `seasons` filters match every profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffWindow {
    #[serde(default)]
    pub id: String,
    #[serde(deserialize_with = "deserialize_minute")]
    pub start_min: f64,
    #[serde(deserialize_with = "deserialize_minute")]
    pub end_min: f64,
    pub rate_per_kwh: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub day_types: Vec<DayType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<Season>,
}

impl TariffWindow {
    /// Returns `true` if the window's filters admit `profile`.
    pub fn matches(&self, profile: &HouseholdProfile) -> bool {
        let day_ok = self.day_types.is_empty() || self.day_types.contains(&profile.day_type);
        let season_ok = self.seasons.is_empty() || self.seasons.contains(&profile.season);
        day_ok && season_ok
    }

    pub fn contains(&self, minute: f64) -> bool {
        is_minute_in_window(minute, self.start_min, self.end_min)
    }
}

/// Electricity price schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TariffModel {
    /// One import rate around the clock.
    Flat {
        currency: String,
        rate_per_kwh: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sell_back_rate_per_kwh: Option<f64>,
    },
    /// A default rate overridden by time-of-use windows.
    Tou {
        currency: String,
        default_rate_per_kwh: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sell_back_rate_per_kwh: Option<f64>,
        #[serde(default)]
        windows: Vec<TariffWindow>,
    },
}

impl Default for TariffModel {
    fn default() -> Self {
        Self::Flat {
            currency: "USD".to_string(),
            rate_per_kwh: 0.18,
            sell_back_rate_per_kwh: Some(0.06),
        }
    }
}

impl TariffModel {
    pub fn currency(&self) -> &str {
        match self {
            Self::Flat { currency, .. } | Self::Tou { currency, .. } => currency,
        }
    }

    /// Import price per kWh at `minute` for the given profile.
    pub fn import_rate_at_minute(&self, profile: &HouseholdProfile, minute: f64) -> f64 {
        match self {
            Self::Flat { rate_per_kwh, .. } => positive(*rate_per_kwh),
            Self::Tou {
                default_rate_per_kwh,
                windows,
                ..
            } => windows
                .iter()
                .rev()
                .find(|window| window.matches(profile) && window.contains(minute))
                .map_or(positive(*default_rate_per_kwh), |window| {
                    positive(window.rate_per_kwh)
                }),
        }
    }

    /// Export credit per kWh; zero when the tariff has none.
    pub fn sell_back_rate(&self) -> f64 {
        match self {
            Self::Flat {
                sell_back_rate_per_kwh,
                ..
            }
            | Self::Tou {
                sell_back_rate_per_kwh,
                ..
            } => positive(sell_back_rate_per_kwh.unwrap_or(0.0)),
        }
    }

    /// Highest import rate the day can reach for `profile`.
    ///
    /// Peak-shaving batteries discharge only at minutes priced at this level.
    pub fn peak_rate_threshold(&self, profile: &HouseholdProfile) -> f64 {
        match self {
            Self::Flat { rate_per_kwh, .. } => positive(*rate_per_kwh),
            Self::Tou {
                default_rate_per_kwh,
                windows,
                ..
            } => windows
                .iter()
                .filter(|window| window.matches(profile))
                .map(|window| positive(window.rate_per_kwh))
                .fold(positive(*default_rate_per_kwh), f64::max),
        }
    }

    /// Import rate for every minute of the day.
    pub fn rates_by_minute(&self, profile: &HouseholdProfile) -> Vec<f64> {
        (0..MINUTES_PER_DAY)
            .map(|minute| self.import_rate_at_minute(profile, minute as f64))
            .collect()
    }

    /// Mean import rate of each hour.
    pub fn hourly_average_rates(&self, profile: &HouseholdProfile) -> Hourly {
        compress_to_hourly(&self.rates_by_minute(profile)).map(|sum| sum / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn window(start_min: f64, end_min: f64, rate_per_kwh: f64) -> TariffWindow {
        TariffWindow {
            id: String::new(),
            start_min,
            end_min,
            rate_per_kwh,
            day_types: Vec::new(),
            seasons: Vec::new(),
        }
    }

    fn tou(windows: Vec<TariffWindow>) -> TariffModel {
        TariffModel::Tou {
            currency: "EUR".to_string(),
            default_rate_per_kwh: 0.1,
            sell_back_rate_per_kwh: None,
            windows,
        }
    }

    #[test]
    fn flat_rate_ignores_minute_and_profile() {
        let tariff = TariffModel::Flat {
            currency: "USD".to_string(),
            rate_per_kwh: 0.2,
            sell_back_rate_per_kwh: None,
        };
        let weekend = HouseholdProfile {
            day_type: DayType::Weekend,
            season: Season::Winter,
        };
        assert_eq!(tariff.import_rate_at_minute(&HouseholdProfile::default(), 10.0), 0.2);
        assert_eq!(tariff.import_rate_at_minute(&weekend, 1200.0), 0.2);
        assert_eq!(tariff.sell_back_rate(), 0.0);
        assert_eq!(tariff.peak_rate_threshold(&weekend), 0.2);
    }

    #[test]
    fn negative_rates_clamp_to_zero() {
        let tariff = TariffModel::Flat {
            currency: "USD".to_string(),
            rate_per_kwh: -0.2,
            sell_back_rate_per_kwh: Some(f64::NAN),
        };
        assert_eq!(tariff.import_rate_at_minute(&HouseholdProfile::default(), 0.0), 0.0);
        assert_eq!(tariff.sell_back_rate(), 0.0);
    }

    #[test]
    fn tou_window_crossing_midnight() {
        let tariff = tou(vec![window(1320.0, 120.0, 0.5)]);
        let profile = HouseholdProfile::default();
        assert_eq!(tariff.import_rate_at_minute(&profile, 1380.0), 0.5);
        assert_eq!(tariff.import_rate_at_minute(&profile, 30.0), 0.5);
        assert_eq!(tariff.import_rate_at_minute(&profile, 120.0), 0.1);
        assert_eq!(tariff.import_rate_at_minute(&profile, 720.0), 0.1);
    }

    #[test]
    fn last_matching_window_wins_over_higher_rate() {
        let tariff = tou(vec![window(1020.0, 1260.0, 0.6), window(1080.0, 1140.0, 0.3)]);
        let profile = HouseholdProfile::default();
        assert_eq!(tariff.import_rate_at_minute(&profile, 1050.0), 0.6);
        assert_eq!(tariff.import_rate_at_minute(&profile, 1100.0), 0.3);
        assert_eq!(tariff.import_rate_at_minute(&profile, 1200.0), 0.6);
    }

    #[test]
    fn filters_select_active_windows() {
        let mut weekday_peak = window(1020.0, 1260.0, 0.45);
        weekday_peak.day_types = vec![DayType::Weekday];
        let mut winter_night = window(0.0, 360.0, 0.05);
        winter_night.seasons = vec![Season::Winter];
        let tariff = tou(vec![weekday_peak, winter_night]);

        let summer_weekday = HouseholdProfile::default();
        let winter_weekend = HouseholdProfile {
            day_type: DayType::Weekend,
            season: Season::Winter,
        };
        assert_eq!(tariff.import_rate_at_minute(&summer_weekday, 1100.0), 0.45);
        assert_eq!(tariff.import_rate_at_minute(&winter_weekend, 1100.0), 0.1);
        assert_eq!(tariff.import_rate_at_minute(&summer_weekday, 60.0), 0.1);
        assert_eq!(tariff.import_rate_at_minute(&winter_weekend, 60.0), 0.05);

        assert_eq!(tariff.peak_rate_threshold(&summer_weekday), 0.45);
        assert_eq!(tariff.peak_rate_threshold(&winter_weekend), 0.1);
    }

    #[test]
    fn hourly_average_blends_partial_hours() {
        let tariff = tou(vec![window(1050.0, 1080.0, 0.5)]);
        let hourly = tariff.hourly_average_rates(&HouseholdProfile::default());
        assert_abs_diff_eq!(hourly[17], 0.3, epsilon = 1e-9);
        assert_abs_diff_eq!(hourly[18], 0.1, epsilon = 1e-9);
        assert_eq!(tariff.rates_by_minute(&HouseholdProfile::default()).len(), MINUTES_PER_DAY);
    }

    #[test]
    fn default_tariff_is_flat_with_sell_back() {
        let tariff = TariffModel::default();
        assert_eq!(tariff.currency(), "USD");
        assert_eq!(tariff.sell_back_rate(), 0.06);
        assert_eq!(tariff.import_rate_at_minute(&HouseholdProfile::default(), 0.0), 0.18);
    }

    #[test]
    fn tou_tariff_parses_from_toml() {
        let tariff: TariffModel = toml::from_str(
            r#"
kind = "tou"
currency = "GBP"
default_rate_per_kwh = 0.24
sell_back_rate_per_kwh = 0.15

[[windows]]
id = "overnight"
start_min = "00:30"
end_min = "04:30"
rate_per_kwh = 0.07
seasons = ["winter"]
"#,
        )
        .expect("tariff should parse");
        let winter = HouseholdProfile {
            day_type: DayType::Weekday,
            season: Season::Winter,
        };
        assert_eq!(tariff.import_rate_at_minute(&winter, 60.0), 0.07);
        assert_eq!(tariff.import_rate_at_minute(&HouseholdProfile::default(), 60.0), 0.24);
        assert_eq!(tariff.currency(), "GBP");
    }
}
