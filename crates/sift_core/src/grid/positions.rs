//! Position resolution for grid queries.

use crate::entity::{EntityRef, TrackedEntity};
use glam::Vec2;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Resolves the current position of an indexed entity.
///
/// Returning `None` means the handle no longer refers to a live entity;
/// queries skip such entries instead of failing.
pub trait PositionLookup {
    fn position(&self, entity: EntityRef) -> Option<Vec2>;
}

impl<S: BuildHasher> PositionLookup for HashMap<EntityRef, Vec2, S> {
    fn position(&self, entity: EntityRef) -> Option<Vec2> {
        self.get(&entity).copied()
    }
}

impl<L: PositionLookup + ?Sized> PositionLookup for &L {
    fn position(&self, entity: EntityRef) -> Option<Vec2> {
        (**self).position(entity)
    }
}

/// Positions captured from one snapshot. Refilled every rebuild; the map's
/// allocation is kept between ticks.
#[derive(Debug, Default, Clone)]
pub struct PositionTable {
    positions: HashMap<EntityRef, Vec2>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with the positions from `snapshot`.
    ///
    /// Each handle must appear at most once: a repeated handle keeps only its
    /// last position while the grid would index every occurrence.
    pub fn refill(&mut self, snapshot: &[TrackedEntity]) {
        self.positions.clear();
        self.positions.reserve(snapshot.len());
        self.positions
            .extend(snapshot.iter().map(|tracked| (tracked.entity, tracked.position)));
        debug_assert_eq!(
            self.positions.len(),
            snapshot.len(),
            "snapshot lists the same entity more than once"
        );
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl PositionLookup for PositionTable {
    fn position(&self, entity: EntityRef) -> Option<Vec2> {
        self.positions.get(&entity).copied()
    }
}
