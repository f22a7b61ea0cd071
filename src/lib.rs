//! Household electricity simulator for a single 24-hour day.
//!
//! Builds hourly consumption, production and cost from appliance, producer
//! and tariff records, balances batteries minute by minute and suggests
//! cheaper start times for movable loads.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod devices;
pub mod io;
pub mod reporting;
/// Simulation engine, energy balance, cost and optimizer modules.
pub mod sim;
pub mod tariff;
