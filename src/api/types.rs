//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::sim::types::{HouseholdConfig, SimulationResult};
use crate::tariff::{HouseholdProfile, TariffModel};

/// Day context, daily totals and rollups of the simulated day.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Day type and season the tariff was resolved for.
    pub profile: HouseholdProfile,
    /// `flat` or `tou`.
    pub tariff_kind: String,
    pub currency: String,
    pub total_daily_consumption_kwh: f64,
    pub total_daily_production_kwh: f64,
    pub total_daily_kwh: f64,
    pub total_weekly_kwh: f64,
    pub total_monthly_kwh: f64,
    pub total_daily_cost: f64,
    pub total_weekly_cost: f64,
    pub total_monthly_cost: f64,
    pub total_daily_savings: f64,
    pub total_monthly_savings: f64,
    /// Hour of the day (0-23) with the highest net usage.
    pub peak_hour: usize,
    pub appliance_count: usize,
    /// Appliances switched on in the configuration.
    pub enabled_appliance_count: usize,
    pub producer_count: usize,
}

impl SummaryResponse {
    /// Summarizes `result`, the outcome of simulating `config`.
    pub fn new(config: &HouseholdConfig, r: &SimulationResult) -> Self {
        let tariff_kind = match &config.tariff {
            TariffModel::Flat { .. } => "flat",
            TariffModel::Tou { .. } => "tou",
        };
        Self {
            profile: config.profile,
            tariff_kind: tariff_kind.to_string(),
            currency: r.currency.clone(),
            total_daily_consumption_kwh: r.total_daily_consumption_kwh,
            total_daily_production_kwh: r.total_daily_production_kwh,
            total_daily_kwh: r.total_daily_kwh,
            total_weekly_kwh: r.total_weekly_kwh,
            total_monthly_kwh: r.total_monthly_kwh,
            total_daily_cost: r.total_daily_cost,
            total_weekly_cost: r.total_weekly_cost,
            total_monthly_cost: r.total_monthly_cost,
            total_daily_savings: r.total_daily_savings,
            total_monthly_savings: r.total_monthly_savings,
            peak_hour: r.peak_hour,
            appliance_count: r.appliances.len(),
            enabled_appliance_count: config.appliances.iter().filter(|a| a.enabled).count(),
            producer_count: r.producers.len(),
        }
    }
}

/// One hour of the day, with the same columns as the CSV export.
#[derive(Debug, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub hour: usize,
    pub consumption_kwh: f64,
    pub production_kwh: f64,
    /// Consumption minus production.
    pub net_kwh: f64,
    pub import_kwh: f64,
    pub export_kwh: f64,
    pub cost: f64,
}

impl HourlyRecord {
    /// Extracts `hour` from a result. The caller keeps `hour` below 24.
    pub fn from_result(r: &SimulationResult, hour: usize) -> Self {
        Self {
            hour,
            consumption_kwh: r.hourly_consumption_kwh[hour],
            production_kwh: r.hourly_production_kwh[hour],
            net_kwh: r.hourly_totals_kwh[hour],
            import_kwh: r.hourly_import_kwh[hour],
            export_kwh: r.hourly_export_kwh[hour],
            cost: r.hourly_cost[hour],
        }
    }
}

/// Optional range query parameters for the hourly endpoint.
#[derive(Debug, Deserialize)]
pub struct HourlyQuery {
    /// First hour (inclusive).
    pub from: Option<usize>,
    /// Last hour (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
