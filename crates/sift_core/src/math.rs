//! Deterministic math utilities
//!
//! Re-exports glam with a seeded generator used for reproducible swarms and
//! randomized tests.

pub use glam::*;

/// Deterministic random number generator (LCG, not for anything security related)
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    seed: u64,
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, state: seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the original seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    pub fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG constants, 64-bit state
        const A: u64 = 6364136223846793005;
        const C: u64 = 1442695040888963407;

        self.state = A.wrapping_mul(self.state).wrapping_add(C);
        (self.state >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[min, max)`.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform point inside the axis-aligned box `[min, max)`.
    pub fn point_in(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.range_f32(min.x, max.x), self.range_f32(min.y, max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = DeterministicRng::new(99);
        let mut b = DeterministicRng::new(99);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        a.reset();
        b.reset();
        assert_eq!(a.next_f32(), b.next_f32());
    }

    #[test]
    fn floats_stay_in_range() {
        let mut rng = DeterministicRng::new(3);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
            let p = rng.point_in(Vec2::new(-5.0, 2.0), Vec2::new(5.0, 4.0));
            assert!(p.x >= -5.0 && p.x < 5.0);
            assert!(p.y >= 2.0 && p.y < 4.0);
        }
    }
}
