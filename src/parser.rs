//! Timing artifact parsing and speedup derivation.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SweepError};
use crate::run::{ArtifactLayout, RunDescriptor};

/// The three timing files the executable writes per grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Artifact {
    Serial,
    Parallel1d,
    Parallel2d,
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [Artifact::Serial, Artifact::Parallel1d, Artifact::Parallel2d];

    /// File name suffix, e.g. `bacteria10_parallel1d.txt`.
    pub fn suffix(self) -> &'static str {
        match self {
            Artifact::Serial => "serial",
            Artifact::Parallel1d => "parallel1d",
            Artifact::Parallel2d => "parallel2d",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Elapsed seconds read back from one run's artifacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingTriple {
    pub serial_time: f64,
    pub parallel1d_time: f64,
    pub parallel2d_time: f64,
}

/// Speedups of one `(grid_size, worker_count)` completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedupRecord {
    pub grid_size: u32,
    pub worker_count: u32,
    pub speedup_1d: f64,
    pub speedup_2d: f64,
}

/// Reads the serial, 1-D and 2-D timings for `run`.
///
/// Must only be called after the run's process has exited; the files are
/// shared by every worker count of a grid size and an earlier run's values
/// are indistinguishable from fresh ones.
pub fn parse(run: &RunDescriptor, layout: &ArtifactLayout) -> Result<TimingTriple> {
    Ok(TimingTriple {
        serial_time: read_artifact(run, layout, Artifact::Serial)?,
        parallel1d_time: read_artifact(run, layout, Artifact::Parallel1d)?,
        parallel2d_time: read_artifact(run, layout, Artifact::Parallel2d)?,
    })
}

fn read_artifact(run: &RunDescriptor, layout: &ArtifactLayout, artifact: Artifact) -> Result<f64> {
    let path = run.artifact_path(layout, artifact);
    let line = first_line(&path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SweepError::MissingArtifact {
                grid_size: run.grid_size,
                worker_count: run.worker_count,
                artifact,
                path: path.clone(),
            }
        } else {
            SweepError::ReadArtifact {
                grid_size: run.grid_size,
                worker_count: run.worker_count,
                artifact,
                path: path.clone(),
                source,
            }
        }
    })?;

    match line.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SweepError::MalformedArtifact {
            grid_size: run.grid_size,
            worker_count: run.worker_count,
            artifact,
            path,
            line,
        }),
    }
}

fn first_line(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(fs::File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// `serial / parallel` for both decompositions.
///
/// A zero serial time is valid and yields zero speedups. A non-positive
/// parallel time or a negative serial time is rejected.
pub fn compute_speedups(run: &RunDescriptor, triple: &TimingTriple) -> Result<SpeedupRecord> {
    let degenerate = |artifact, value| SweepError::DegenerateTiming {
        grid_size: run.grid_size,
        worker_count: run.worker_count,
        artifact,
        value,
    };
    if triple.serial_time < 0.0 {
        return Err(degenerate(Artifact::Serial, triple.serial_time));
    }
    if triple.parallel1d_time <= 0.0 {
        return Err(degenerate(Artifact::Parallel1d, triple.parallel1d_time));
    }
    if triple.parallel2d_time <= 0.0 {
        return Err(degenerate(Artifact::Parallel2d, triple.parallel2d_time));
    }

    Ok(SpeedupRecord {
        grid_size: run.grid_size,
        worker_count: run.worker_count,
        speedup_1d: triple.serial_time / triple.parallel1d_time,
        speedup_2d: triple.serial_time / triple.parallel2d_time,
    })
}
