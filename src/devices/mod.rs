//! Household devices and their daily energy curves.

/// Appliance consumption curves.
pub mod appliance;
/// Battery state driven by the energy balance.
pub mod battery;
/// Solar production curves.
pub mod solar;
pub mod types;

pub use appliance::{compute_appliance_hourly, scheduled_window_hourly};
pub use battery::BatteryState;
pub use solar::compute_producer_hourly;
pub use types::{
    Appliance, ApplianceModel, BatteryStrategy, EnergyModel, Producer, ProducerModel,
};
