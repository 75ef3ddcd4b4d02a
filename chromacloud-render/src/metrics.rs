//! Per-session timing of labelled operations

use log::debug;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Accumulated time spent under one label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingSummary {
    pub total: Duration,
    pub count: u64,
}

impl TimingSummary {
    /// Average duration of one measurement, zero when nothing was measured
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total / count,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.count as f64),
        }
    }
}

/// Timing context owned by whoever drives the frames
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    timings: BTreeMap<String, TimingSummary>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, adding its wall-clock time to `label`
    pub fn measure<T, F>(&mut self, label: &str, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        self.record(label, start.elapsed());
        result
    }

    /// Add an externally measured duration to `label`
    pub fn record(&mut self, label: &str, elapsed: Duration) {
        let entry = self.timings.entry(label.to_string()).or_default();
        entry.total += elapsed;
        entry.count += 1;
        debug!(
            "{label}: {:.3} ms (mean {:.3} ms over {})",
            elapsed.as_secs_f64() * 1e3,
            entry.mean().as_secs_f64() * 1e3,
            entry.count
        );
    }

    pub fn summary(&self, label: &str) -> Option<TimingSummary> {
        self.timings.get(label).copied()
    }

    /// Labels measured so far, sorted
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.timings.keys().map(String::as_str)
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }
}
