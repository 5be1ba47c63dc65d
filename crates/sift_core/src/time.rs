//! Deterministic tick clock
//!
//! Fixed 60Hz simulation steps. Every grid rebuild is stamped with the tick
//! it was built for.

use std::time::Duration;

/// Fixed simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Simulation time tracker
#[derive(Debug, Clone, Default)]
pub struct SimulationTime {
    tick: u64,
    elapsed: Duration,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one fixed step and return the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.elapsed += TICK_DURATION;
        self.tick
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fixed step as seconds, for integrating velocities.
    pub fn delta_seconds(&self) -> f32 {
        TICK_DURATION.as_secs_f32()
    }
}
