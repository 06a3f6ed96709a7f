//! Sweep fault taxonomy.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use crate::parser::Artifact;

pub type Result<T> = std::result::Result<T, SweepError>;

#[derive(Error, Debug)]
pub enum SweepError {
    /// The executable (or its launcher) could not be started.
    #[error("grid size {grid_size}, workers {worker_count}: failed to launch `{program}`: {source}")]
    Launch {
        grid_size: u32,
        worker_count: u32,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("grid size {grid_size}, workers {worker_count}: failed waiting for process: {source}")]
    Wait {
        grid_size: u32,
        worker_count: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("grid size {grid_size}, workers {worker_count}: {artifact} artifact missing at {}", path.display())]
    MissingArtifact {
        grid_size: u32,
        worker_count: u32,
        artifact: Artifact,
        path: PathBuf,
    },

    #[error("grid size {grid_size}, workers {worker_count}: {artifact} artifact at {} has no timing on its first line (found {line:?})", path.display())]
    MalformedArtifact {
        grid_size: u32,
        worker_count: u32,
        artifact: Artifact,
        path: PathBuf,
        line: String,
    },

    #[error("grid size {grid_size}, workers {worker_count}: failed to read {artifact} artifact at {}: {source}", path.display())]
    ReadArtifact {
        grid_size: u32,
        worker_count: u32,
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A leftover artifact that could not be deleted before its run.
    #[error("grid size {grid_size}, workers {worker_count}: failed to remove stale {artifact} artifact at {}: {source}", path.display())]
    ClearArtifact {
        grid_size: u32,
        worker_count: u32,
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A timing that makes the speedup ratio meaningless (non-positive parallel
    /// time or negative serial time).
    #[error("grid size {grid_size}, workers {worker_count}: {artifact} timing {value} is not usable for a speedup")]
    DegenerateTiming {
        grid_size: u32,
        worker_count: u32,
        artifact: Artifact,
        value: f64,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SweepError {
    /// Process exit code for this fault kind.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::from(2),
            Self::Launch { .. } | Self::Wait { .. } => ExitCode::from(3),
            Self::MissingArtifact { .. } => ExitCode::from(4),
            Self::MalformedArtifact { .. } | Self::ReadArtifact { .. } | Self::ClearArtifact { .. } => {
                ExitCode::from(5)
            }
            Self::DegenerateTiming { .. } => ExitCode::from(6),
        }
    }

    /// The `(grid_size, worker_count)` run this fault belongs to, if any.
    pub fn run(&self) -> Option<(u32, u32)> {
        match self {
            Self::Launch { grid_size, worker_count, .. }
            | Self::Wait { grid_size, worker_count, .. }
            | Self::MissingArtifact { grid_size, worker_count, .. }
            | Self::MalformedArtifact { grid_size, worker_count, .. }
            | Self::ReadArtifact { grid_size, worker_count, .. }
            | Self::ClearArtifact { grid_size, worker_count, .. }
            | Self::DegenerateTiming { grid_size, worker_count, .. } => {
                Some((*grid_size, *worker_count))
            }
            Self::Config(_) => None,
        }
    }

    pub fn artifact(&self) -> Option<Artifact> {
        match self {
            Self::MissingArtifact { artifact, .. }
            | Self::MalformedArtifact { artifact, .. }
            | Self::ReadArtifact { artifact, .. }
            | Self::ClearArtifact { artifact, .. }
            | Self::DegenerateTiming { artifact, .. } => Some(*artifact),
            _ => None,
        }
    }
}
