//! Reporting: progress lines, measurement dump, interactive chart grid.

use std::fmt::Write as _;
use std::io;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::aggregate::AggregatedMeasurement;
use crate::parser::SpeedupRecord;

pub mod chart;

/// Progress line written after each run completes.
pub fn write_record<W: io::Write>(out: &mut W, rec: &SpeedupRecord) -> io::Result<()> {
    writeln!(
        out,
        "Finished size {} ({} workers):\n\t1d: {}\n\t2d: {}",
        rec.grid_size.to_string().cyan(),
        rec.worker_count,
        rec.speedup_1d.green(),
        rec.speedup_2d.green()
    )
}

pub fn print_record(rec: &SpeedupRecord) {
    let _ = write_record(&mut io::stdout(), rec);
}

/// Same as [`print_record`] but on stderr, keeping stdout for the JSON dump.
pub fn eprint_record(rec: &SpeedupRecord) {
    let _ = write_record(&mut io::stderr(), rec);
}

/// Pretty JSON of every measurement.
pub fn format_json(measurements: &[AggregatedMeasurement]) -> Result<String> {
    Ok(serde_json::to_string_pretty(measurements)?)
}

/// Plain-text dump of every measurement.
pub fn format_measurements(measurements: &[AggregatedMeasurement]) -> String {
    let mut out = String::new();
    for m in measurements {
        let _ = writeln!(out, "grid_size: {}", m.grid_size);
        let _ = writeln!(out, "  worker_count: {:?}", m.worker_counts);
        let _ = writeln!(out, "  speedup_1d:   {:?}", m.speedup_1d);
        let _ = writeln!(out, "  speedup_2d:   {:?}", m.speedup_2d);
    }
    out
}

pub fn print_measurements(measurements: &[AggregatedMeasurement], json: bool) -> Result<()> {
    if json {
        println!("{}", format_json(measurements)?);
    } else {
        println!();
        print!("{}", format_measurements(measurements).magenta());
    }
    Ok(())
}

/// Prints the aggregated structure, then shows the chart grid when `plot` is set.
pub fn report(measurements: &[AggregatedMeasurement], json: bool, plot: bool) -> Result<()> {
    print_measurements(measurements, json)?;
    if plot {
        chart::show(measurements)?;
    }
    Ok(())
}
