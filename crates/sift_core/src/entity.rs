//! Entity handles indexed by the grid
//!
//! The grid is a back-reference index: it stores handles, never the entities
//! themselves. Lifetime of the underlying objects belongs to the host
//! simulation.

use glam::{Vec2, Vec3};

/// Entity handle (generation-indexed)
///
/// Format: [32-bit index | 32-bit generation]
/// - Index: slot of the entity in the host's storage
/// - Generation: bumped by the host whenever the slot is reused, so stale
///   handles stop resolving in position lookups
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    index: u32,
    generation: u32,
}

impl EntityRef {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Serialize to 64-bit integer (for logs and replays)
    pub fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Deserialize from 64-bit integer
    pub fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// One entry of the per-tick input snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackedEntity {
    pub entity: EntityRef,
    pub position: Vec2,
}

impl TrackedEntity {
    pub fn new(entity: EntityRef, position: Vec2) -> Self {
        Self { entity, position }
    }

    /// Build from a 3D world transform; the grid is planar so z is dropped.
    pub fn planar(entity: EntityRef, world_position: Vec3) -> Self {
        Self {
            entity,
            position: world_position.truncate(),
        }
    }
}
