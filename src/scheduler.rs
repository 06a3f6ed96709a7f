//! Batch scheduling: one concurrent batch per worker count, batches in sequence.

use tracing::info;

use crate::aggregate::Aggregator;
use crate::error::Result;
use crate::parser::{self, SpeedupRecord};
use crate::process::{Launcher, ProcessHandle};
use crate::run::RunDescriptor;

#[derive(Debug, Clone)]
pub struct BatchScheduler {
    pub launcher: Launcher,
    pub sizes: Vec<u32>,
    pub workers: Vec<u32>,
    /// Delete each run's artifacts before launching it.
    pub clear_artifacts: bool,
}

impl BatchScheduler {
    pub fn new(launcher: Launcher, sizes: Vec<u32>, workers: Vec<u32>) -> Self {
        Self { launcher, sizes, workers, clear_artifacts: false }
    }

    /// Every run of the sweep in scheduling order (worker count outer, size inner).
    pub fn runs(&self) -> impl Iterator<Item = RunDescriptor> + '_ {
        self.workers
            .iter()
            .flat_map(move |&w| self.sizes.iter().map(move |&g| RunDescriptor::new(g, w)))
    }

    /// Runs the whole sweep, feeding each record to `aggregator` and then to
    /// `on_record`. Any fault aborts the sweep; processes still running in the
    /// failing batch are killed when their handles drop.
    pub async fn run<F>(&self, aggregator: &mut Aggregator, mut on_record: F) -> Result<()>
    where
        F: FnMut(&SpeedupRecord),
    {
        for &workers in &self.workers {
            self.run_batch(workers, aggregator, &mut on_record).await?;
        }
        Ok(())
    }

    /// Launches every size for `workers` back to back, then waits on the
    /// handles in launch order. Results become available in launch order, not
    /// in real completion order.
    pub async fn run_batch<F>(&self, workers: u32, aggregator: &mut Aggregator, on_record: &mut F) -> Result<()>
    where
        F: FnMut(&SpeedupRecord),
    {
        info!(worker_count = workers, runs = self.sizes.len(), "starting batch");
        let mut handles: Vec<ProcessHandle> = Vec::with_capacity(self.sizes.len());
        for &size in &self.sizes {
            let run = RunDescriptor::new(size, workers);
            if self.clear_artifacts {
                run.clear_artifacts(&self.launcher.layout)?;
            }
            handles.push(self.launcher.launch(run)?);
        }

        for handle in handles {
            let done = handle.await_completion().await?;
            let triple = parser::parse(&done.run, &self.launcher.layout)?;
            let record = parser::compute_speedups(&done.run, &triple)?;
            aggregator.record_speedup(&record);
            on_record(&record);
        }
        Ok(())
    }
}
