//! Household scenario loading, built-in presets and pre-submission validation.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::devices::{Appliance, ApplianceModel, BatteryStrategy, Producer, ProducerModel};
use crate::sim::types::HouseholdConfig;
use crate::sim::window::{DAY_MINUTES, TimeWindow};
use crate::tariff::{DayType, HouseholdProfile, TariffModel, TariffWindow};

/// Largest accepted appliance power.
pub const MAX_WATTS: f64 = 50_000.0;
/// Largest accepted `count_based` unit count.
pub const MAX_APPLIANCE_COUNT: u32 = 200;

/// Failure to obtain a household scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML scenario: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },
    #[error("unsupported scenario format \"{0}\", expected .toml or .json")]
    UnsupportedFormat(String),
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"appliances[2].model.watts"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl HouseholdConfig {
    /// Available preset names.
    pub const PRESETS: &'static [&'static str] = &[
        "starter_flat",
        "family_home",
        "high_efficiency",
        "solar_battery",
        "tou_evening",
    ];

    /// Loads a household from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownPreset`] if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ScenarioError> {
        match name {
            "starter_flat" => Ok(Self::starter_flat()),
            "family_home" => Ok(Self::family_home()),
            "high_efficiency" => Ok(Self::high_efficiency()),
            "solar_battery" => Ok(Self::solar_battery()),
            "tou_evening" => Ok(Self::tou_evening()),
            _ => Err(ScenarioError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// One-bedroom flat on the default flat tariff.
    pub fn starter_flat() -> Self {
        Self {
            profile: HouseholdProfile::default(),
            tariff: TariffModel::default(),
            appliances: catalog_appliances(&["fridge", "router", "tv", "lighting", "washing-machine"]),
            producers: Vec::new(),
        }
    }

    /// Two-bedroom home with efficient, shorter-running versions of the
    /// starter appliances on the default flat tariff.
    pub fn high_efficiency() -> Self {
        let mut appliances =
            catalog_appliances(&["fridge", "router", "tv", "lighting", "washing-machine"]);
        for appliance in &mut appliances {
            let efficient = match appliance.id.as_str() {
                "fridge" => Some(ApplianceModel::AlwaysOn { watts: 70.0 }),
                "tv" => Some(ApplianceModel::ScheduledWindow {
                    watts: 80.0,
                    start_min: 1140.0,
                    duration_min: 180.0,
                }),
                "lighting" => Some(ApplianceModel::CountBased {
                    count: 8,
                    watts_each: 7.0,
                    minutes_per_day: None,
                    schedule: Some(TimeWindow::new(1080.0, 1320.0)),
                }),
                "washing-machine" => Some(ApplianceModel::ScheduledWindow {
                    watts: 600.0,
                    start_min: 1140.0,
                    duration_min: 70.0,
                }),
                _ => None,
            };
            if let Some(model) = efficient {
                appliance.model = model;
            }
        }
        Self {
            profile: HouseholdProfile::default(),
            tariff: TariffModel::default(),
            appliances,
            producers: Vec::new(),
        }
    }

    /// Three-bedroom home with air conditioning on a time-of-use tariff.
    pub fn family_home() -> Self {
        Self {
            profile: HouseholdProfile::default(),
            tariff: default_time_of_use(),
            appliances: family_appliances(),
            producers: Vec::new(),
        }
    }

    /// The family home on a flat tariff with solar and an evening battery.
    pub fn solar_battery() -> Self {
        Self {
            profile: HouseholdProfile::default(),
            tariff: TariffModel::default(),
            appliances: family_appliances(),
            producers: vec![
                solar_panel("medium-solar-panel", "Medium Solar Panel", 1.6),
                battery("small-battery", BatteryStrategy::SelfConsumption),
            ],
        }
    }

    /// The family home on a time-of-use tariff with a peak-shaving battery.
    pub fn tou_evening() -> Self {
        Self {
            profile: HouseholdProfile::default(),
            tariff: default_time_of_use(),
            appliances: family_appliances(),
            producers: vec![
                solar_panel("small-solar-panel", "Small Solar Panel", 0.8),
                battery("small-battery", BatteryStrategy::PeakShaving),
            ],
        }
    }

    /// Parses a household from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ScenarioError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_toml_str(&read(path)?)
    }

    /// Parses a household from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ScenarioError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(s)?)
    }

    /// Parses a household from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `ScenarioError` if the JSON is invalid or contains unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parses a household file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns a `ScenarioError` for unreadable files, parse failures, or an
    /// extension other than `.toml` or `.json`.
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Self::from_toml_file(path),
            "json" => Self::from_json_str(&read(path)?),
            _ => Err(ScenarioError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. The engine accepts
    /// invalid values too; this is for rejecting input before simulating.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (i, appliance) in self.appliances.iter().enumerate() {
            validate_appliance(&format!("appliances[{i}]"), appliance, &mut errors);
        }
        for (i, producer) in self.producers.iter().enumerate() {
            validate_producer(&format!("producers[{i}]"), producer, &mut errors);
        }
        validate_tariff(&self.tariff, &mut errors);

        errors
    }
}

fn read(path: &Path) -> Result<String, ScenarioError> {
    fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

fn check(errors: &mut Vec<ConfigError>, ok: bool, field: String, message: &str) {
    if !ok {
        errors.push(ConfigError {
            field,
            message: message.to_string(),
        });
    }
}

fn check_watts(errors: &mut Vec<ConfigError>, field: String, watts: f64) {
    check(errors, in_range(watts, 0.0, MAX_WATTS), field, "must be between 0 and 50000 W");
}

fn check_minute(errors: &mut Vec<ConfigError>, field: String, minute: f64) {
    check(errors, in_range(minute, 0.0, DAY_MINUTES), field, "must be between 0 and 1440 (00:00-24:00)");
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: String, value: f64) {
    check(errors, in_range(value, 0.0, f64::MAX), field, "must be a finite number >= 0");
}

fn check_window(errors: &mut Vec<ConfigError>, prefix: &str, window: &TimeWindow) {
    check_minute(errors, format!("{prefix}.start_min"), window.start_min);
    check_minute(errors, format!("{prefix}.end_min"), window.end_min);
}

fn validate_appliance(prefix: &str, appliance: &Appliance, errors: &mut Vec<ConfigError>) {
    check(
        errors,
        !appliance.name.trim().is_empty(),
        format!("{prefix}.name"),
        "must not be empty",
    );

    let model = format!("{prefix}.model");
    match &appliance.model {
        ApplianceModel::AlwaysOn { watts } => check_watts(errors, format!("{model}.watts"), *watts),
        ApplianceModel::ScheduledWindow {
            watts,
            start_min,
            duration_min,
        } => {
            check_watts(errors, format!("{model}.watts"), *watts);
            check_minute(errors, format!("{model}.start_min"), *start_min);
            check_minute(errors, format!("{model}.duration_min"), *duration_min);
        }
        ApplianceModel::DailyDuration {
            watts,
            minutes_per_day,
            window,
        } => {
            check_watts(errors, format!("{model}.watts"), *watts);
            check_minute(errors, format!("{model}.minutes_per_day"), *minutes_per_day);
            if let Some(window) = window {
                check_window(errors, &format!("{model}.window"), window);
            }
        }
        ApplianceModel::CountBased {
            count,
            watts_each,
            minutes_per_day,
            schedule,
        } => {
            check(
                errors,
                *count <= MAX_APPLIANCE_COUNT,
                format!("{model}.count"),
                "must be an integer between 0 and 200",
            );
            check_watts(errors, format!("{model}.watts_each"), *watts_each);
            if let Some(minutes) = minutes_per_day {
                check_minute(errors, format!("{model}.minutes_per_day"), *minutes);
            }
            if let Some(schedule) = schedule {
                check_window(errors, &format!("{model}.schedule"), schedule);
            }
        }
        ApplianceModel::Unsupported => {}
    }
}

fn validate_producer(prefix: &str, producer: &Producer, errors: &mut Vec<ConfigError>) {
    check(
        errors,
        !producer.name.trim().is_empty(),
        format!("{prefix}.name"),
        "must not be empty",
    );

    let model = format!("{prefix}.model");
    match &producer.model {
        ProducerModel::SolarCurve {
            peak_kw,
            start_min,
            end_min,
        } => {
            check_non_negative(errors, format!("{model}.peak_kw"), *peak_kw);
            check_minute(errors, format!("{model}.start_min"), *start_min);
            check_minute(errors, format!("{model}.end_min"), *end_min);
        }
        ProducerModel::BatteryDischarge {
            capacity_kwh,
            max_output_kw,
            start_min,
            end_min,
            ..
        } => {
            check_non_negative(errors, format!("{model}.capacity_kwh"), *capacity_kwh);
            check_non_negative(errors, format!("{model}.max_output_kw"), *max_output_kw);
            check_minute(errors, format!("{model}.start_min"), *start_min);
            check_minute(errors, format!("{model}.end_min"), *end_min);
        }
        ProducerModel::Unsupported => {}
    }
}

fn validate_tariff(tariff: &TariffModel, errors: &mut Vec<ConfigError>) {
    match tariff {
        TariffModel::Flat {
            rate_per_kwh,
            sell_back_rate_per_kwh,
            ..
        } => {
            check_non_negative(errors, "tariff.rate_per_kwh".into(), *rate_per_kwh);
            if let Some(rate) = sell_back_rate_per_kwh {
                check_non_negative(errors, "tariff.sell_back_rate_per_kwh".into(), *rate);
            }
        }
        TariffModel::Tou {
            default_rate_per_kwh,
            sell_back_rate_per_kwh,
            windows,
            ..
        } => {
            check_non_negative(errors, "tariff.default_rate_per_kwh".into(), *default_rate_per_kwh);
            if let Some(rate) = sell_back_rate_per_kwh {
                check_non_negative(errors, "tariff.sell_back_rate_per_kwh".into(), *rate);
            }
            for (i, window) in windows.iter().enumerate() {
                let prefix = format!("tariff.windows[{i}]");
                check_minute(errors, format!("{prefix}.start_min"), window.start_min);
                check_minute(errors, format!("{prefix}.end_min"), window.end_min);
                check_non_negative(errors, format!("{prefix}.rate_per_kwh"), window.rate_per_kwh);
            }
        }
    }
}

fn appliance(id: &str, name: &str, model: ApplianceModel) -> Appliance {
    Appliance {
        id: id.to_string(),
        name: name.to_string(),
        enabled: true,
        quantity: 1,
        model,
    }
}

/// Catalog appliance with the given id, or `None` for an unknown id.
fn preset_appliance(id: &str) -> Option<Appliance> {
    let record = match id {
        "fridge" => appliance(id, "Fridge", ApplianceModel::AlwaysOn { watts: 90.0 }),
        "router" => appliance(id, "Router", ApplianceModel::AlwaysOn { watts: 10.0 }),
        "tv" => appliance(
            id,
            "TV",
            ApplianceModel::ScheduledWindow {
                watts: 100.0,
                start_min: 1140.0,
                duration_min: 180.0,
            },
        ),
        "dishwasher" => appliance(
            id,
            "Dishwasher",
            ApplianceModel::ScheduledWindow {
                watts: 800.0,
                start_min: 1200.0,
                duration_min: 90.0,
            },
        ),
        "washing-machine" => appliance(
            id,
            "Washing Machine",
            ApplianceModel::ScheduledWindow {
                watts: 640.0,
                start_min: 1140.0,
                duration_min: 75.0,
            },
        ),
        "lighting" => appliance(
            id,
            "Lighting",
            ApplianceModel::CountBased {
                count: 10,
                watts_each: 9.0,
                minutes_per_day: None,
                schedule: Some(TimeWindow::new(1080.0, 1380.0)),
            },
        ),
        "ac" => appliance(
            id,
            "Air Conditioner",
            ApplianceModel::DailyDuration {
                watts: 1500.0,
                minutes_per_day: 240.0,
                window: Some(TimeWindow::new(780.0, 1380.0)),
            },
        ),
        _ => return None,
    };
    Some(record)
}

fn catalog_appliances(ids: &[&str]) -> Vec<Appliance> {
    ids.iter().filter_map(|id| preset_appliance(id)).collect()
}

fn family_appliances() -> Vec<Appliance> {
    catalog_appliances(&["fridge", "router", "tv", "lighting", "dishwasher", "washing-machine", "ac"])
}

fn solar_panel(id: &str, name: &str, peak_kw: f64) -> Producer {
    Producer {
        id: id.to_string(),
        name: name.to_string(),
        enabled: true,
        quantity: 1,
        model: ProducerModel::SolarCurve {
            peak_kw,
            start_min: 420.0,
            end_min: 1080.0,
        },
    }
}

fn battery(id: &str, strategy: BatteryStrategy) -> Producer {
    Producer {
        id: id.to_string(),
        name: "Small Battery".to_string(),
        enabled: true,
        quantity: 1,
        model: ProducerModel::BatteryDischarge {
            capacity_kwh: 2.5,
            max_output_kw: 0.6,
            start_min: 1080.0,
            end_min: DAY_MINUTES,
            strategy,
        },
    }
}

fn default_time_of_use() -> TariffModel {
    TariffModel::Tou {
        currency: "USD".to_string(),
        default_rate_per_kwh: 0.16,
        sell_back_rate_per_kwh: Some(0.06),
        windows: vec![
            TariffWindow {
                id: "tou-offpeak".to_string(),
                start_min: 0.0,
                end_min: 420.0,
                rate_per_kwh: 0.11,
                day_types: vec![DayType::Weekday, DayType::Weekend],
                seasons: Vec::new(),
            },
            TariffWindow {
                id: "tou-peak".to_string(),
                start_min: 1020.0,
                end_min: 1320.0,
                rate_per_kwh: 0.28,
                day_types: vec![DayType::Weekday],
                seasons: Vec::new(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_loads_and_validates() {
        for name in HouseholdConfig::PRESETS {
            let cfg = HouseholdConfig::from_preset(name).expect("preset should load");
            let errors = cfg.validate();
            assert!(errors.is_empty(), "{name} should be valid: {errors:?}");
        }
    }

    #[test]
    fn catalog_ignores_unknown_appliance_ids() {
        assert!(preset_appliance("jacuzzi").is_none());
        assert_eq!(catalog_appliances(&["fridge", "jacuzzi", "ac"]).len(), 2);
        let ac = preset_appliance("ac").expect("ac is in the catalog");
        assert_eq!(ac.model.kind(), "daily_duration");
        assert_eq!(HouseholdConfig::family_home().appliances.len(), 7);
    }

    #[test]
    fn high_efficiency_uses_lighter_loads() {
        let efficient = HouseholdConfig::high_efficiency();
        let starter = HouseholdConfig::starter_flat();
        let ids = |cfg: &HouseholdConfig| -> Vec<String> {
            cfg.appliances.iter().map(|a| a.id.clone()).collect()
        };
        assert_eq!(ids(&efficient), ids(&starter));
        assert_eq!(efficient.appliances[0].model, ApplianceModel::AlwaysOn { watts: 70.0 });
        assert!(
            crate::sim::simulate(&efficient).total_daily_kwh
                < crate::sim::simulate(&starter).total_daily_kwh
        );
    }

    #[test]
    fn from_preset_unknown() {
        let err = HouseholdConfig::from_preset("nonexistent").expect_err("unknown preset");
        assert!(matches!(err, ScenarioError::UnknownPreset { .. }));
        assert!(err.to_string().contains("starter_flat"));
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = HouseholdConfig::from_toml_str("").expect("empty scenario should parse");
        assert_eq!(cfg, HouseholdConfig::default());
        assert_eq!(cfg.tariff.sell_back_rate(), 0.06);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[profile]
day_type = "weekend"
season = "winter"

[tariff]
kind = "tou"
currency = "EUR"
default_rate_per_kwh = 0.2

[[tariff.windows]]
start_min = "17:00"
end_min = "21:00"
rate_per_kwh = 0.4
day_types = ["weekend"]

[[appliances]]
id = "kettle"
name = "Kettle"
quantity = 2

[appliances.model]
kind = "scheduled_window"
watts = 2000
start_min = "07:00"
duration_min = 6

[[producers]]
id = "pv"
name = "PV"

[producers.model]
kind = "solar_curve"
peak_kw = 3.5
start_min = 360
end_min = 1200
"#;
        let cfg = HouseholdConfig::from_toml_str(toml).expect("valid TOML should parse");
        assert_eq!(cfg.profile.day_type, DayType::Weekend);
        assert_eq!(cfg.tariff.currency(), "EUR");
        assert_eq!(cfg.appliances[0].quantity, 2);
        assert_eq!(cfg.producers[0].model.kind(), "solar_curve");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let result = HouseholdConfig::from_toml_str("bogus_field = true\n");
        assert!(matches!(result, Err(ScenarioError::Toml(_))));
    }

    #[test]
    fn json_round_trips_presets() {
        let preset = HouseholdConfig::solar_battery();
        let json = serde_json::to_string(&preset).expect("preset should serialize");
        let parsed = HouseholdConfig::from_json_str(&json).expect("JSON should parse");
        assert_eq!(parsed, preset);
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let err = HouseholdConfig::from_path(Path::new("household.yaml")).expect_err("yaml");
        assert!(matches!(err, ScenarioError::UnsupportedFormat(_)));
        let err = HouseholdConfig::from_path(Path::new("missing.toml")).expect_err("missing");
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[test]
    fn validation_reports_dotted_paths() {
        let mut cfg = HouseholdConfig::starter_flat();
        cfg.appliances[0].model = ApplianceModel::AlwaysOn { watts: 60_000.0 };
        cfg.appliances[1].name = "  ".to_string();
        cfg.appliances[3].model = ApplianceModel::CountBased {
            count: 500,
            watts_each: 9.0,
            minutes_per_day: Some(2000.0),
            schedule: None,
        };
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"appliances[0].model.watts"));
        assert!(fields.contains(&"appliances[1].name"));
        assert!(fields.contains(&"appliances[3].model.count"));
        assert!(fields.contains(&"appliances[3].model.minutes_per_day"));
    }

    #[test]
    fn validation_catches_bad_producers_and_tariff() {
        let mut cfg = HouseholdConfig::solar_battery();
        if let ProducerModel::BatteryDischarge { capacity_kwh, .. } = &mut cfg.producers[1].model {
            *capacity_kwh = f64::NAN;
        }
        cfg.tariff = TariffModel::Flat {
            currency: "USD".to_string(),
            rate_per_kwh: -0.1,
            sell_back_rate_per_kwh: None,
        };
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "producers[1].model.capacity_kwh"));
        assert!(errors.iter().any(|e| e.field == "tariff.rate_per_kwh"));
    }

    #[test]
    fn config_error_display_names_field() {
        let error = ConfigError {
            field: "tariff.rate_per_kwh".to_string(),
            message: "must be a finite number >= 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "config error: tariff.rate_per_kwh: must be a finite number >= 0"
        );
    }
}
