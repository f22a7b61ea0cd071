//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use household_sim::devices::{Appliance, ApplianceModel, BatteryStrategy, Producer, ProducerModel};
use household_sim::sim::types::HouseholdConfig;
use household_sim::tariff::{TariffModel, TariffWindow};

/// Enabled single-unit appliance with the given model.
pub fn appliance(id: &str, model: ApplianceModel) -> Appliance {
    Appliance {
        id: id.to_string(),
        name: id.to_string(),
        enabled: true,
        quantity: 1,
        model,
    }
}

/// Constant draw of `watts`.
pub fn always_on(id: &str, watts: f64) -> Appliance {
    appliance(id, ApplianceModel::AlwaysOn { watts })
}

/// One run of `duration_min` starting at `start_min`.
pub fn scheduled(id: &str, watts: f64, start_min: f64, duration_min: f64) -> Appliance {
    appliance(
        id,
        ApplianceModel::ScheduledWindow {
            watts,
            start_min,
            duration_min,
        },
    )
}

/// Half-sine solar producer over `[start_min, end_min)`.
pub fn solar(id: &str, peak_kw: f64, start_min: f64, end_min: f64) -> Producer {
    Producer {
        id: id.to_string(),
        name: id.to_string(),
        enabled: true,
        quantity: 1,
        model: ProducerModel::SolarCurve {
            peak_kw,
            start_min,
            end_min,
        },
    }
}

/// Battery allowed to discharge over `[start_min, end_min)`.
pub fn battery(
    id: &str,
    capacity_kwh: f64,
    max_output_kw: f64,
    start_min: f64,
    end_min: f64,
    strategy: BatteryStrategy,
) -> Producer {
    Producer {
        id: id.to_string(),
        name: id.to_string(),
        enabled: true,
        quantity: 1,
        model: ProducerModel::BatteryDischarge {
            capacity_kwh,
            max_output_kw,
            start_min,
            end_min,
            strategy,
        },
    }
}

/// Flat tariff with no export credit.
pub fn flat(rate_per_kwh: f64) -> TariffModel {
    TariffModel::Flat {
        currency: "USD".to_string(),
        rate_per_kwh,
        sell_back_rate_per_kwh: None,
    }
}

/// Time-of-use tariff with one window that applies every day.
pub fn single_window_tou(default_rate: f64, start_min: f64, end_min: f64, rate: f64) -> TariffModel {
    TariffModel::Tou {
        currency: "USD".to_string(),
        default_rate_per_kwh: default_rate,
        sell_back_rate_per_kwh: None,
        windows: vec![TariffWindow {
            id: "window".to_string(),
            start_min,
            end_min,
            rate_per_kwh: rate,
            day_types: Vec::new(),
            seasons: Vec::new(),
        }],
    }
}

/// Household with the given devices on a default weekday.
pub fn household(
    tariff: TariffModel,
    appliances: Vec<Appliance>,
    producers: Vec<Producer>,
) -> HouseholdConfig {
    HouseholdConfig {
        tariff,
        appliances,
        producers,
        ..HouseholdConfig::default()
    }
}

/// 1 kW constant load, a 3 kW morning array and a 2 kWh all-day battery
/// on a tariff with an evening peak.
pub fn morning_solar_with_battery(strategy: BatteryStrategy) -> HouseholdConfig {
    household(
        single_window_tou(0.16, 1020.0, 1320.0, 0.28),
        vec![always_on("base", 1000.0)],
        vec![
            solar("pv", 3.0, 360.0, 720.0),
            battery("battery", 2.0, 1.0, 0.0, 1440.0, strategy),
        ],
    )
}
