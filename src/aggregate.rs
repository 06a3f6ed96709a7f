//! Per-grid-size speedup series accumulated across the worker-count sweep.

use serde::Serialize;

use crate::parser::SpeedupRecord;

/// Reporting-ready series for one grid size. All three vectors are index aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedMeasurement {
    pub grid_size: u32,
    pub worker_counts: Vec<u32>,
    pub speedup_1d: Vec<f64>,
    pub speedup_2d: Vec<f64>,
}

impl AggregatedMeasurement {
    fn empty(grid_size: u32) -> Self {
        Self {
            grid_size,
            worker_counts: Vec::new(),
            speedup_1d: Vec::new(),
            speedup_2d: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.worker_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worker_counts.is_empty()
    }
}

/// Append-only mapping from grid size to its speedup series.
///
/// Series are kept in first-seen order. Sizes passed to [`Aggregator::new`]
/// are seeded up front so the snapshot follows the configured size order even
/// for sizes that never recorded anything.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    series: Vec<AggregatedMeasurement>,
}

impl Aggregator {
    pub fn new(sizes: &[u32]) -> Self {
        let mut agg = Self::default();
        for &size in sizes {
            agg.slot(size);
        }
        agg
    }

    fn slot(&mut self, grid_size: u32) -> &mut AggregatedMeasurement {
        let idx = match self.series.iter().position(|m| m.grid_size == grid_size) {
            Some(idx) => idx,
            None => {
                self.series.push(AggregatedMeasurement::empty(grid_size));
                self.series.len() - 1
            }
        };
        &mut self.series[idx]
    }

    /// Appends one completion. Worker-count ordering is the caller's contract.
    pub fn record(&mut self, grid_size: u32, worker_count: u32, speedup_1d: f64, speedup_2d: f64) {
        let m = self.slot(grid_size);
        m.worker_counts.push(worker_count);
        m.speedup_1d.push(speedup_1d);
        m.speedup_2d.push(speedup_2d);
    }

    pub fn record_speedup(&mut self, rec: &SpeedupRecord) {
        self.record(rec.grid_size, rec.worker_count, rec.speedup_1d, rec.speedup_2d);
    }

    /// Current state of every series. Partial if the sweep has not finished.
    pub fn snapshot(&self) -> Vec<AggregatedMeasurement> {
        self.series.clone()
    }

    pub fn get(&self, grid_size: u32) -> Option<&AggregatedMeasurement> {
        self.series.iter().find(|m| m.grid_size == grid_size)
    }
}
