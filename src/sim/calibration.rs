//! Comparison of the estimated monthly cost against a real bill.

use std::fmt;

use serde::Serialize;

use crate::devices::Appliance;

use super::types::SimulationResult;

/// Estimates at or below this monthly cost cannot be calibrated.
pub const NEAR_ZERO_ESTIMATE: f64 = 0.001;
/// Relative difference under which the estimate counts as calibrated.
pub const CALIBRATION_TOLERANCE: f64 = 0.08;
/// Number of appliances named when the estimate is too low.
pub const TOP_LOADS: usize = 3;

/// Guidance derived from a real monthly bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Calibration {
    MissingBill,
    EstimateNearZero,
    Calibrated,
    /// The real bill is higher than the estimate.
    UnderEstimated { factor_pct: i64, top_loads: Vec<String> },
    /// The real bill is lower than the estimate.
    OverEstimated { factor_pct: i64 },
}

/// Compares `real_monthly_bill` with the result's monthly cost.
///
/// `factor_pct` is the bill as a rounded percentage of the estimate.
/// `top_loads` names the first appliances in declaration order.
pub fn calibrate(
    result: &SimulationResult,
    appliances: &[Appliance],
    real_monthly_bill: f64,
) -> Calibration {
    if !real_monthly_bill.is_finite() || real_monthly_bill <= 0.0 {
        return Calibration::MissingBill;
    }

    let estimate = result.total_monthly_cost;
    if estimate <= NEAR_ZERO_ESTIMATE {
        return Calibration::EstimateNearZero;
    }

    let ratio = real_monthly_bill / estimate;
    if (1.0 - ratio).abs() < CALIBRATION_TOLERANCE {
        return Calibration::Calibrated;
    }

    let factor_pct = (ratio * 100.0).round() as i64;
    if ratio > 1.0 {
        Calibration::UnderEstimated {
            factor_pct,
            top_loads: appliances
                .iter()
                .take(TOP_LOADS)
                .map(|appliance| appliance.name.clone())
                .collect(),
        }
    } else {
        Calibration::OverEstimated { factor_pct }
    }
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBill => write!(f, "Enter your real monthly bill to calibrate assumptions."),
            Self::EstimateNearZero => write!(
                f,
                "Estimated monthly bill is near zero; increase load or tariff data before calibrating."
            ),
            Self::Calibrated => write!(
                f,
                "Calibration is good. Keep values as-is and refine only specific appliance schedules if needed."
            ),
            Self::UnderEstimated {
                factor_pct,
                top_loads,
            } => write!(
                f,
                "Your real bill is higher than estimate. Increase watts or daily runtime for top loads \
                 (for example: {}). Suggested factor: {factor_pct}% of current assumptions.",
                top_loads.join(", ")
            ),
            Self::OverEstimated { factor_pct } => write!(
                f,
                "Your real bill is lower than estimate. Reduce watts or runtime assumptions. \
                 Suggested factor: {factor_pct}% of current assumptions."
            ),
        }
    }
}
