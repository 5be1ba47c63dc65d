//! Sift Metrics - rebuild instrumentation for the spatial index
//!
//! Provides zero-cost abstractions for timing grid rebuilds and counting
//! indexed / dropped entities. Everything here completely vanishes in
//! production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use sift_metrics::{PhaseProfiler, RebuildTimer};
//!
//! let mut timer = RebuildTimer::new(60); // Track last 60 rebuilds
//! let mut phases = PhaseProfiler::new();
//! timer.begin();
//! phases.time_phase("map", || { /* ... */ });
//! timer.end();
//! println!("avg rebuild: {:.3} ms", timer.average_ms());
//! ```
//!
//! In production builds (without `metrics` feature), all instrumentation
//! is compiled out to zero overhead.

#[cfg(feature = "metrics")]
mod counter;
#[cfg(feature = "metrics")]
mod phase_profiler;
#[cfg(feature = "metrics")]
mod rebuild_timer;
#[cfg(feature = "metrics")]
mod sample_window;

#[cfg(feature = "metrics")]
pub use counter::Counter;
#[cfg(feature = "metrics")]
pub use phase_profiler::PhaseProfiler;
#[cfg(feature = "metrics")]
pub use rebuild_timer::RebuildTimer;
#[cfg(feature = "metrics")]
pub use sample_window::SampleWindow;

/// Whether instrumentation was compiled in.
pub const ENABLED: bool = cfg!(feature = "metrics");

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct RebuildTimer;

#[cfg(not(feature = "metrics"))]
impl RebuildTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn record(&mut self, _elapsed: std::time::Duration) {}
    pub fn average_ms(&self) -> f64 { 0.0 }
    pub fn latest_ms(&self) -> f64 { 0.0 }
    pub fn p95_ms(&self) -> f64 { 0.0 }
    pub fn range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
    pub fn samples(&self) -> usize { 0 }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct SampleWindow;

#[cfg(not(feature = "metrics"))]
impl SampleWindow {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn push(&mut self, _sample: std::time::Duration) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
    pub fn latest(&self) -> Option<std::time::Duration> { None }
    pub fn mean(&self) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn min_max(&self) -> (std::time::Duration, std::time::Duration) {
        (std::time::Duration::ZERO, std::time::Duration::ZERO)
    }
    pub fn percentile(&self, _fraction: f64) -> std::time::Duration { std::time::Duration::ZERO }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct Counter;

#[cfg(not(feature = "metrics"))]
impl Counter {
    pub fn new() -> Self { Self }
    pub fn increment(&mut self, _name: &'static str, _value: usize) {}
    pub fn set(&mut self, _name: &'static str, _value: usize) {}
    pub fn get(&self, _name: &str) -> usize { 0 }
    pub fn reset_all(&mut self) {}
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct PhaseProfiler;

#[cfg(not(feature = "metrics"))]
impl PhaseProfiler {
    pub fn new() -> Self { Self }
    pub fn time_phase<F, R>(&mut self, _name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        f()
    }
    pub fn last(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn total(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn reset(&mut self) {}
}
