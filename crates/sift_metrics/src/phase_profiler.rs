//! Per-phase timings for a rebuild (clear / map / commit)

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
struct PhaseTiming {
    last: Duration,
    total: Duration,
}

#[derive(Debug, Default)]
pub struct PhaseProfiler {
    phases: HashMap<&'static str, PhaseTiming>,
}

impl PhaseProfiler {
    pub fn new() -> Self {
        Self {
            phases: HashMap::new(),
        }
    }

    pub fn time_phase<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let timing = self.phases.entry(name).or_default();
        timing.last = elapsed;
        timing.total += elapsed;
        result
    }

    /// Duration of the most recent run of `name`.
    pub fn last(&self, name: &str) -> Duration {
        self.phases.get(name).map(|t| t.last).unwrap_or(Duration::ZERO)
    }

    /// Accumulated duration of every run of `name`.
    pub fn total(&self, name: &str) -> Duration {
        self.phases.get(name).map(|t| t.total).unwrap_or(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.phases.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.phases.iter().map(|(name, t)| (*name, t.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_accumulate_across_runs() {
        let mut profiler = PhaseProfiler::new();
        for _ in 0..3 {
            profiler.time_phase("commit", || std::thread::sleep(Duration::from_millis(1)));
        }
        assert!(profiler.total("commit") >= Duration::from_millis(3));
        assert!(profiler.last("commit") <= profiler.total("commit"));
        assert_eq!(profiler.last("map"), Duration::ZERO);
    }
}
