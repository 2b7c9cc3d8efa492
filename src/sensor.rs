//! Aggregation of raw motion samples between simulation ticks.
//!
//! Samples arrive from a producer thread at whatever rate the hardware delivers
//! them; the engine pulls the aggregate exactly once per tick.

use parking_lot::Mutex;
use tracing::trace;

/// Number of axes in a motion sample.
pub const AXES: usize = 3;

/// Running statistics for a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStats {
    pub average: f32,
    pub count: u32,
    pub min: f32,
    pub max: f32,
}

impl Default for AxisStats {
    fn default() -> Self {
        // Extremes are seeded so that the first sample establishes both bounds
        Self {
            average: 0.0,
            count: 0,
            min: f32::MAX,
            max: f32::MIN,
        }
    }
}

impl AxisStats {
    fn record(&mut self, value: f32) {
        let count = self.count as f32;
        self.average = (self.average * count + value) / (count + 1.0);
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// A snapshot of every axis, taken (and reset) by [`SensorAggregator::pull_stats`].
pub type SensorStats = [AxisStats; AXES];

/// Thread-safe accumulator of 3-axis motion samples.
///
/// All axes are updated under a single lock, so a pull never observes a
/// partially recorded sample.
#[derive(Debug, Default)]
pub struct SensorAggregator {
    stats: Mutex<SensorStats>,
}

impl SensorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one sample into the running statistics. Callable from any thread.
    pub fn record(&self, sample: [f32; AXES]) {
        let mut stats = self.stats.lock();
        for (axis, value) in stats.iter_mut().zip(sample) {
            axis.record(value);
        }
    }

    /// Returns the per-axis averages and resets all accumulators.
    pub fn pull(&self) -> [f32; AXES] {
        self.pull_stats().map(|axis| axis.average)
    }

    /// Returns the full per-axis statistics and resets all accumulators.
    pub fn pull_stats(&self) -> SensorStats {
        let stats = std::mem::take(&mut *self.stats.lock());
        trace!(samples = stats[0].count, "Pulled sensor aggregate");
        stats
    }
}
