//! Simulation inputs and result records.

use serde::{Deserialize, Serialize};

use crate::devices::{Appliance, Producer};
use crate::tariff::{HouseholdProfile, TariffModel};

use super::series::Hourly;

/// Days in a week, used for weekly rollups.
pub const DAYS_PER_WEEK: f64 = 7.0;
/// Average days in a month, used for monthly rollups.
pub const DAYS_PER_MONTH: f64 = 30.4;

/// Everything the engine needs to simulate one household day.
///
/// # Examples
///
/// ```
/// use household_sim::sim::types::HouseholdConfig;
///
/// let config = HouseholdConfig::default();
/// assert!(config.appliances.is_empty());
/// assert_eq!(config.tariff.currency(), "USD");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdConfig {
    pub profile: HouseholdProfile,
    pub tariff: TariffModel,
    pub appliances: Vec<Appliance>,
    pub producers: Vec<Producer>,
}

/// Per-device daily figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceBreakdown {
    pub id: String,
    pub name: String,
    pub model_kind: String,
    /// Energy per hour (kWh).
    pub hourly_kwh: Hourly,
    pub daily_kwh: f64,
    /// Attributed daily cost. Producers carry a negative value (a credit).
    pub daily_cost: f64,
}

/// How a battery fared over the simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySummary {
    pub id: String,
    pub name: String,
    /// Surplus absorbed over the day (kWh).
    pub captured_kwh: f64,
    /// Energy discharged to cover deficits (kWh).
    pub delivered_kwh: f64,
    /// Charge left at the end of the day (kWh).
    pub final_charge_kwh: f64,
}

/// Model kinds the load-shift optimizer can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftableKind {
    ScheduledWindow,
    DailyDuration,
}

impl ShiftableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScheduledWindow => "scheduled_window",
            Self::DailyDuration => "daily_duration",
        }
    }
}

/// A suggested start-time change for a movable load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAction {
    pub appliance_id: String,
    pub appliance_name: String,
    pub model_kind: ShiftableKind,
    pub from_start_min: f64,
    pub to_start_min: f64,
    pub estimated_daily_savings: f64,
    pub reason: String,
}

/// Complete outcome of simulating one household day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub currency: String,
    /// Net energy per hour: consumption minus production (kWh).
    pub hourly_totals_kwh: Hourly,
    pub hourly_consumption_kwh: Hourly,
    pub hourly_production_kwh: Hourly,
    pub hourly_import_kwh: Hourly,
    pub hourly_export_kwh: Hourly,
    /// Import cost minus export credit per hour.
    pub hourly_cost: Hourly,
    /// Appliances in declaration order.
    pub appliances: Vec<DeviceBreakdown>,
    /// Producers in declaration order, batteries included.
    pub producers: Vec<DeviceBreakdown>,
    /// Enabled batteries in declaration order.
    pub batteries: Vec<BatterySummary>,
    pub total_daily_consumption_kwh: f64,
    pub total_daily_production_kwh: f64,
    pub total_daily_kwh: f64,
    pub total_weekly_kwh: f64,
    pub total_monthly_kwh: f64,
    pub total_daily_cost: f64,
    pub total_weekly_cost: f64,
    pub total_monthly_cost: f64,
    pub total_daily_savings: f64,
    pub total_weekly_savings: f64,
    pub total_monthly_savings: f64,
    /// Hour with the highest net usage; ties resolve to the earliest hour.
    pub peak_hour: usize,
    pub savings_actions: Vec<SavingsAction>,
}

impl SimulationResult {
    /// First appliance breakdown with the given id.
    pub fn appliance(&self, id: &str) -> Option<&DeviceBreakdown> {
        self.appliances.iter().find(|device| device.id == id)
    }

    /// First producer breakdown with the given id.
    pub fn producer(&self, id: &str) -> Option<&DeviceBreakdown> {
        self.producers.iter().find(|device| device.id == id)
    }

    pub fn battery(&self, id: &str) -> Option<&BatterySummary> {
        self.batteries.iter().find(|battery| battery.id == id)
    }
}

/// Differences between two results: `current - baseline`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationDelta {
    pub daily_kwh_delta: f64,
    pub monthly_kwh_delta: f64,
    pub daily_cost_delta: f64,
    pub monthly_cost_delta: f64,
}
