//! Wall-clock metrics for controller calls.
//!
//! Virtual time decides every verdict; these numbers only describe how long
//! the controller took on the host, for reporting and the optional
//! per-call budget.

use serde::Serialize;
use std::time::Duration;

/// Controller call durations with a ring buffer for percentiles.
#[derive(Debug)]
pub struct StepMetrics {
    /// Ring buffer of call durations in nanoseconds.
    samples: Box<[u64]>,
    write_pos: usize,
    /// Number of samples collected (saturates at buffer size).
    sample_count: usize,
    total_steps: u64,
    min_ns: u64,
    max_ns: u64,
    sum_ns: u64,
    /// Calls that exceeded the budget.
    over_budget: u64,
    budget_ns: Option<u64>,
}

impl StepMetrics {
    /// Create a collector retaining `histogram_size` samples.
    #[must_use]
    pub fn new(histogram_size: usize, budget: Option<Duration>) -> Self {
        let size = histogram_size.max(1);
        Self {
            samples: vec![0u64; size].into_boxed_slice(),
            write_pos: 0,
            sample_count: 0,
            total_steps: 0,
            min_ns: u64::MAX,
            max_ns: 0,
            sum_ns: 0,
            over_budget: 0,
            budget_ns: budget.map(duration_ns),
        }
    }

    /// Record one controller call.
    pub fn record(&mut self, duration: Duration) {
        let ns = duration_ns(duration);

        self.samples[self.write_pos] = ns;
        self.write_pos = (self.write_pos + 1) % self.samples.len();
        self.sample_count = self.sample_count.saturating_add(1).min(self.samples.len());

        self.total_steps += 1;
        self.min_ns = self.min_ns.min(ns);
        self.max_ns = self.max_ns.max(ns);
        self.sum_ns = self.sum_ns.wrapping_add(ns);

        if self.budget_ns.is_some_and(|budget| ns > budget) {
            self.over_budget += 1;
        }
    }

    /// Samples retained for percentiles.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Total calls recorded.
    #[must_use]
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Calls that exceeded the budget.
    #[must_use]
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }

    /// Compute a percentile (0.0 to 100.0) from the ring buffer.
    ///
    /// Returns `None` without samples or for an out-of-range percentile.
    #[must_use]
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.sample_count == 0 || !(0.0..=100.0).contains(&percentile) {
            return None;
        }

        let mut sorted: Vec<u64> = self.samples[..self.sample_count].to_vec();
        sorted.sort_unstable();
        Some(Duration::from_nanos(sorted[rank(percentile, sorted.len())]))
    }

    /// Get a snapshot of current metrics.
    #[must_use]
    pub fn snapshot(&self, percentiles: &[f64]) -> MetricsSnapshot {
        let recorded = self.total_steps > 0;
        let mut sorted: Vec<u64> = self.samples[..self.sample_count].to_vec();
        sorted.sort_unstable();

        MetricsSnapshot {
            total_steps: self.total_steps,
            min_ns: recorded.then_some(self.min_ns),
            max_ns: recorded.then_some(self.max_ns),
            mean_ns: recorded.then(|| self.sum_ns / self.total_steps),
            over_budget: self.over_budget,
            percentiles_ns: if sorted.is_empty() {
                Vec::new()
            } else {
                percentiles
                    .iter()
                    .filter(|p| (0.0..=100.0).contains(*p))
                    .map(|&p| (p, sorted[rank(p, sorted.len())]))
                    .collect()
            },
        }
    }

    /// Reset all metrics to initial state.
    pub fn reset(&mut self) {
        self.samples.fill(0);
        self.write_pos = 0;
        self.sample_count = 0;
        self.total_steps = 0;
        self.min_ns = u64::MAX;
        self.max_ns = 0;
        self.sum_ns = 0;
        self.over_budget = 0;
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rank(percentile: f64, len: usize) -> usize {
    let idx = ((percentile / 100.0) * (len - 1) as f64).round() as usize;
    idx.min(len - 1)
}

fn duration_ns(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Immutable snapshot of step metrics for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Total controller calls.
    pub total_steps: u64,
    /// Fastest call in nanoseconds.
    pub min_ns: Option<u64>,
    /// Slowest call in nanoseconds.
    pub max_ns: Option<u64>,
    /// Mean call time in nanoseconds.
    pub mean_ns: Option<u64>,
    /// Calls over budget.
    pub over_budget: u64,
    /// Requested percentiles as `(percentile, nanoseconds)`.
    pub percentiles_ns: Vec<(f64, u64)>,
}
