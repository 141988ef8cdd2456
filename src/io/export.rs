//! CSV export for simulation time series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::engine::SimulationResult;

/// Exports a run's time series to a CSV file at the given path.
///
/// Writes a header row followed by one row per step: `timestep,time_sec`,
/// then `freq_hz_<i>,tie_flow_pu_<i>,ace_<i>,agc_output_<i>` for every
/// area. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &SimulationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes a run's time series as CSV to any writer.
pub fn write_csv(result: &SimulationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let n = result.num_areas();

    let mut header = vec!["timestep".to_string(), "time_sec".to_string()];
    for i in 0..n {
        header.push(format!("freq_hz_{i}"));
        header.push(format!("tie_flow_pu_{i}"));
        header.push(format!("ace_{i}"));
        header.push(format!("agc_output_{i}"));
    }
    wtr.write_record(&header)?;

    // column-major series gathered once, written row by row
    let freq: Vec<Vec<f64>> = (0..n).map(|i| result.freq_hz(i)).collect();
    let tie: Vec<Vec<f64>> = (0..n).map(|i| result.tie_flow(i)).collect();
    let ace: Vec<Vec<f64>> = (0..n).map(|i| result.ace(i)).collect();
    let agc: Vec<Vec<f64>> = (0..n).map(|i| result.agc_output(i)).collect();

    for t in 0..result.total_steps() {
        let mut row = vec![
            t.to_string(),
            format!("{:.4}", t as f64 * result.config.time_step_sec),
        ];
        for i in 0..n {
            row.push(format!("{:.8}", freq[i][t]));
            row.push(format!("{:.8}", tie[i][t]));
            row.push(format!("{:.8}", ace[i][t]));
            row.push(format!("{:.8}", agc[i][t]));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
