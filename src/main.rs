//! Household simulator entry point: CLI wiring, scenario loading and output.

mod cli;
mod telemetry;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use household_sim::config::ConfigError;
use household_sim::io::export::export_csv;
use household_sim::reporting::{DeltaReport, Report};
use household_sim::sim::calibration::{Calibration, calibrate};
use household_sim::sim::types::{HouseholdConfig, SimulationDelta, SimulationResult};
use household_sim::sim::{compare_simulation, simulate};

use cli::{Args, Source};

/// Everything printed by `--json`, so stdout stays one JSON document.
#[derive(Serialize)]
struct JsonOutput<'a> {
    result: &'a SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<SimulationDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calibration: Option<Calibration>,
}

fn load(source: &Source) -> Result<HouseholdConfig> {
    match source {
        Source::File(path) => HouseholdConfig::from_path(path)
            .with_context(|| format!("failed to load scenario {}", path.display())),
        Source::Preset(name) => {
            HouseholdConfig::from_preset(name).with_context(|| format!("failed to load preset {name}"))
        }
    }
}

fn report_validation(label: &str, errors: &[ConfigError], skip: bool) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    for e in errors {
        if skip {
            warn!("{label}: {e}");
        } else {
            error!("{label}: {e}");
        }
    }
    if skip {
        warn!(count = errors.len(), "simulating {label} despite validation errors");
        Ok(())
    } else {
        bail!("{label} has {} validation error(s); use --skip-validation to simulate anyway", errors.len())
    }
}

fn main() -> Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();

    let source = args.source();
    let config = load(&source)?;
    report_validation("scenario", &config.validate(), args.skip_validation)?;

    let result = simulate(&config);
    info!(
        appliances = config.appliances.len(),
        producers = config.producers.len(),
        daily_cost = result.total_daily_cost,
        "simulated {source:?}"
    );

    let comparison = match args.baseline_source() {
        Some(baseline_source) => {
            let baseline_config = load(&baseline_source)?;
            report_validation("baseline", &baseline_config.validate(), args.skip_validation)?;
            Some(compare_simulation(&result, &simulate(&baseline_config)))
        }
        None => None,
    };

    let calibration = args
        .monthly_bill
        .map(|bill| calibrate(&result, &config.appliances, bill));

    if args.json {
        let output = JsonOutput {
            result: &result,
            comparison,
            calibration,
        };
        let json = serde_json::to_string_pretty(&output).context("failed to serialize result")?;
        println!("{json}");
    } else {
        println!("{}", Report::new(&result));
        if let Some(delta) = &comparison {
            println!(
                "\n{}",
                DeltaReport {
                    delta,
                    currency: &result.currency,
                }
            );
        }
        if let Some(calibration) = &calibration {
            println!("\n--- Calibration ---\n{calibration}");
        }
    }

    if let Some(path) = &args.telemetry_out {
        export_csv(&result, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!("hourly series written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        use household_sim::api::{AppState, serve};

        let state = Arc::new(AppState { config, result });
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(serve(state, addr))
            .with_context(|| format!("API server on {addr} failed"))?;
    }

    Ok(())
}
