/// Bill calibration guidance.
pub mod calibration;
/// Grid settlement and per-device attribution.
pub mod cost;
pub mod engine;
/// Load-shift suggestions.
pub mod optimizer;
pub mod power_balance;
/// Hourly and per-minute series helpers.
pub mod series;
pub mod types;
/// Minute-of-day interval arithmetic.
pub mod window;

pub use engine::{compare_simulation, simulate};
