use std::path::PathBuf;

use clap::Parser;

/// Household electricity consumption, production and cost estimator.
///
/// Simulates one 24-hour day of a household scenario and prints the hourly
/// energy, costs and load-shift suggestions. Without `--scenario` or
/// `--preset` the `starter_flat` preset is used.
#[derive(Debug, Parser)]
#[command(name = "household-sim", version)]
pub struct Args {
    /// Load the household from a TOML or JSON scenario file.
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (starter_flat, family_home, high_efficiency, solar_battery, tou_evening).
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Compare against a baseline scenario file.
    #[arg(long, value_name = "PATH", conflicts_with = "baseline_preset")]
    pub baseline: Option<PathBuf>,

    /// Compare against a built-in preset.
    #[arg(long, value_name = "NAME")]
    pub baseline_preset: Option<String>,

    /// Export the hourly series to CSV.
    #[arg(long, value_name = "PATH")]
    pub telemetry_out: Option<PathBuf>,

    /// Print the full result as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Real monthly bill used to calibrate the estimate.
    #[arg(long, value_name = "AMOUNT")]
    pub monthly_bill: Option<f64>,

    /// Simulate even when the scenario fails validation.
    #[arg(long)]
    pub skip_validation: bool,

    /// Start the REST API server after simulating.
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port.
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000, env = "HOUSEHOLD_SIM_PORT")]
    pub port: u16,
}

/// Where a household scenario comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Preset(String),
}

pub const DEFAULT_PRESET: &str = "starter_flat";

impl Args {
    /// The scenario to simulate, falling back to the default preset.
    pub fn source(&self) -> Source {
        match (&self.scenario, &self.preset) {
            (Some(path), _) => Source::File(path.clone()),
            (None, Some(name)) => Source::Preset(name.clone()),
            (None, None) => Source::Preset(DEFAULT_PRESET.to_string()),
        }
    }

    /// The optional comparison scenario.
    pub fn baseline_source(&self) -> Option<Source> {
        match (&self.baseline, &self.baseline_preset) {
            (Some(path), _) => Some(Source::File(path.clone())),
            (None, Some(name)) => Some(Source::Preset(name.clone())),
            (None, None) => None,
        }
    }
}
