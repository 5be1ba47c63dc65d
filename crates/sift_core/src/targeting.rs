//! Auto-targeting for a single shooter (the player).

use crate::entity::EntityRef;
use crate::grid::{NearestHit, SpatialIndex};
use glam::Vec2;

/// Current aim of an auto-targeting shooter.
///
/// A zero `direction` means there is nothing to shoot at this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutoTarget {
    pub entity: Option<EntityRef>,
    pub direction: Vec2,
    pub distance: f32,
}

impl AutoTarget {
    /// Re-aim at the entity nearest to `shooter` in the latest snapshot.
    pub fn acquire(&mut self, index: &SpatialIndex, shooter: Vec2) -> Option<NearestHit> {
        let hit = index.find_nearest(shooter);
        *self = match hit {
            Some(hit) => Self {
                entity: Some(hit.entity),
                direction: hit.direction,
                distance: hit.distance,
            },
            None => Self::default(),
        };
        hit
    }

    pub fn has_target(&self) -> bool {
        self.direction != Vec2::ZERO
    }
}
