//! Benchmark sweep harness: runs a simulation executable over every
//! (grid size, worker count) pair, reads back the timing artifacts it leaves
//! on disk, and reports serial/parallel speedups.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod process;
pub mod report;
pub mod run;
pub mod scheduler;

pub use aggregate::{AggregatedMeasurement, Aggregator};
pub use error::{Result, SweepError};
pub use parser::{Artifact, SpeedupRecord, TimingTriple};
pub use run::{ArtifactLayout, RunDescriptor};
pub use scheduler::BatchScheduler;
