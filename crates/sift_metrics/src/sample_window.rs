//! Sliding window over the most recent rebuild durations

use std::collections::VecDeque;
use std::time::Duration;

/// Keeps the last `capacity` samples, oldest first.
#[derive(Debug)]
pub struct SampleWindow {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl SampleWindow {
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<Duration> {
        self.samples.back().copied()
    }

    pub fn mean(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    /// `(fastest, slowest)`; zeros while empty.
    pub fn min_max(&self) -> (Duration, Duration) {
        self.samples
            .iter()
            .fold(None, |range: Option<(Duration, Duration)>, &sample| {
                Some(match range {
                    Some((min, max)) => (min.min(sample), max.max(sample)),
                    None => (sample, sample),
                })
            })
            .unwrap_or_default()
    }

    /// Nearest-rank percentile, `fraction` in `[0, 1]`.
    pub fn percentile(&self, fraction: f64) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<Duration> = self.samples.iter().copied().collect();
        sorted.sort_unstable();
        let rank = (fraction.clamp(0.0, 1.0) * sorted.len() as f64).ceil() as usize;
        sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
    }
}
