//! Appliance and producer records, and the trait shared by their energy models.

use serde::{Deserialize, Serialize};

use crate::sim::series::Hourly;
use crate::sim::window::{TimeWindow, deserialize_minute};

/// Trait implemented by every household device with a daily energy curve.
///
/// This is the seam the simulation engine uses to turn a declarative record
/// into hourly energy, regardless of the model variant behind it.
pub trait EnergyModel {
    /// Returns the device's energy for each hour of the day in kWh.
    ///
    /// Disabled devices return all zeros. Devices whose output is decided
    /// during the energy balance (batteries) also return zeros here.
    fn hourly_kwh(&self) -> Hourly;

    /// Returns the snake_case tag of the device's model variant.
    fn model_kind(&self) -> &'static str;
}

/// An electricity-consuming device in the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appliance {
    pub id: String,
    pub name: String,
    /// Disabled appliances contribute zero energy everywhere.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Number of identical units; values below 1 behave as 1.
    #[serde(default = "single_unit")]
    pub quantity: u32,
    pub model: ApplianceModel,
}

/// How an appliance draws power over the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApplianceModel {
    /// Constant draw around the clock.
    AlwaysOn { watts: f64 },
    /// One daily active window starting at `start_min`, possibly wrapping midnight.
    ScheduledWindow {
        watts: f64,
        #[serde(deserialize_with = "deserialize_minute")]
        start_min: f64,
        duration_min: f64,
    },
    /// A total daily runtime centred inside an optional allowed window.
    /// Without a window the run starts at 08:00.
    DailyDuration {
        watts: f64,
        minutes_per_day: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<TimeWindow>,
    },
    /// `count` identical units of `watts_each`.
    CountBased {
        count: u32,
        watts_each: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minutes_per_day: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schedule: Option<TimeWindow>,
    },
    /// A model kind this build does not know. Contributes zero energy.
    #[serde(other)]
    Unsupported,
}

impl ApplianceModel {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlwaysOn { .. } => "always_on",
            Self::ScheduledWindow { .. } => "scheduled_window",
            Self::DailyDuration { .. } => "daily_duration",
            Self::CountBased { .. } => "count_based",
            Self::Unsupported => "unsupported",
        }
    }
}

/// An electricity-producing device in the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Producer {
    pub id: String,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "single_unit")]
    pub quantity: u32,
    pub model: ProducerModel,
}

impl Producer {
    /// Returns `true` for storage whose output the balance solver decides.
    pub fn is_battery(&self) -> bool {
        matches!(self.model, ProducerModel::BatteryDischarge { .. })
    }
}

/// How a producer generates or releases energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProducerModel {
    /// Half-sine solar output across `[start_min, end_min)`.
    SolarCurve {
        peak_kw: f64,
        #[serde(deserialize_with = "deserialize_minute")]
        start_min: f64,
        #[serde(deserialize_with = "deserialize_minute")]
        end_min: f64,
    },
    /// Storage charged from surplus and discharged inside `[start_min, end_min)`.
    BatteryDischarge {
        capacity_kwh: f64,
        max_output_kw: f64,
        #[serde(deserialize_with = "deserialize_minute")]
        start_min: f64,
        #[serde(deserialize_with = "deserialize_minute")]
        end_min: f64,
        #[serde(default)]
        strategy: BatteryStrategy,
    },
    /// A model kind this build does not know. Produces nothing.
    #[serde(other)]
    Unsupported,
}

impl ProducerModel {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SolarCurve { .. } => "solar_curve",
            Self::BatteryDischarge { .. } => "battery_discharge",
            Self::Unsupported => "unsupported",
        }
    }
}

/// When a battery is allowed to cover a deficit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryStrategy {
    /// Discharge whenever there is a deficit.
    #[default]
    SelfConsumption,
    /// Discharge only when the import rate reaches the day's peak rate.
    PeakShaving,
}

/// Effective unit multiplier: `max(1, quantity)`.
pub fn rounded_quantity(quantity: u32) -> f64 {
    f64::from(quantity.max(1))
}

fn enabled_by_default() -> bool {
    true
}

fn single_unit() -> u32 {
    1
}
