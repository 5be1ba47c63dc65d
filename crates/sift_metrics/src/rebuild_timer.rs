//! Rolling timer for grid rebuild durations

use super::sample_window::SampleWindow;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RebuildTimer {
    started: Instant,
    durations: SampleWindow,
}

impl RebuildTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            started: Instant::now(),
            durations: SampleWindow::new(capacity),
        }
    }

    pub fn begin(&mut self) {
        self.started = Instant::now();
    }

    pub fn end(&mut self) {
        let elapsed = self.started.elapsed();
        self.durations.push(elapsed);
    }

    /// Record a duration measured elsewhere (e.g. returned in rebuild stats).
    pub fn record(&mut self, elapsed: Duration) {
        self.durations.push(elapsed);
    }

    pub fn average_ms(&self) -> f64 {
        self.durations.mean().as_secs_f64() * 1000.0
    }

    pub fn latest_ms(&self) -> f64 {
        self.durations.latest().unwrap_or_default().as_secs_f64() * 1000.0
    }

    /// 95th percentile over the window; tracks spikes the average hides.
    pub fn p95_ms(&self) -> f64 {
        self.durations.percentile(0.95).as_secs_f64() * 1000.0
    }

    pub fn range_ms(&self) -> (f64, f64) {
        let (min, max) = self.durations.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }

    pub fn samples(&self) -> usize {
        self.durations.len()
    }
}

impl Default for RebuildTimer {
    fn default() -> Self {
        Self::new(60)
    }
}
