//! CSV export for hourly simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::series::HOURS_PER_DAY;
use crate::sim::types::SimulationResult;

/// Column header for the hourly CSV export.
pub const HEADER: &str = "hour,consumption_kwh,production_kwh,net_kwh,import_kwh,export_kwh,cost";

/// Exports the hourly series of a result to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour of the day. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `result` - Outcome of a simulated day
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &SimulationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes the hourly series of a result as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &SimulationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for hour in 0..HOURS_PER_DAY {
        wtr.write_record(&[
            hour.to_string(),
            format!("{:.4}", result.hourly_consumption_kwh[hour]),
            format!("{:.4}", result.hourly_production_kwh[hour]),
            format!("{:.4}", result.hourly_totals_kwh[hour]),
            format!("{:.4}", result.hourly_import_kwh[hour]),
            format!("{:.4}", result.hourly_export_kwh[hour]),
            format!("{:.4}", result.hourly_cost[hour]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
