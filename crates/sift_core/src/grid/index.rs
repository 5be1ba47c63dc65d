//! Double-buffered spatial index: the per-tick entry point for hosts.

use super::{
    entities_in_radius, BuilderOptions, GridBuilder, GridConfig, NearestHit, NearestQuery,
    PositionTable, RebuildStats, SpatialGrid,
};
use crate::entity::{EntityRef, TrackedEntity};
use glam::Vec2;

/// A fully built grid together with the positions it was built from.
///
/// This is the read-only view handed to queries. It is `Sync`, so any number
/// of threads may query the same snapshot between rebuilds.
#[derive(Debug, Clone)]
pub struct GridSnapshot {
    grid: SpatialGrid,
    positions: PositionTable,
    tick: u64,
}

impl GridSnapshot {
    fn new(config: GridConfig) -> Self {
        Self {
            grid: SpatialGrid::new(config),
            positions: PositionTable::new(),
            tick: 0,
        }
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    /// Tick this snapshot was built for (0 before the first rebuild).
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn find_nearest(&self, query: &NearestQuery, point: Vec2) -> Option<NearestHit> {
        query.find_nearest(&self.grid, &self.positions, point)
    }

    pub fn entities_in_radius(&self, point: Vec2, radius: f32, out: &mut Vec<EntityRef>) -> usize {
        entities_in_radius(&self.grid, &self.positions, point, radius, out)
    }
}

/// Owns the grid buffers and the builder.
///
/// `rebuild` fills the back buffer and swaps it to the front only once it is
/// complete, and it needs `&mut self`, so no query can observe a half-built
/// grid.
pub struct SpatialIndex {
    front: GridSnapshot,
    back: GridSnapshot,
    builder: GridBuilder,
    query: NearestQuery,
}

impl SpatialIndex {
    pub fn new(config: GridConfig, options: BuilderOptions, query: NearestQuery) -> Self {
        tracing::info!(
            dimensions = %config.dimensions(),
            cell_size = %config.cell_size(),
            origin = %config.origin(),
            max_search_radius = query.max_search_radius(),
            "spatial index created"
        );
        Self {
            front: GridSnapshot::new(config),
            back: GridSnapshot::new(config),
            builder: GridBuilder::new(options),
            query,
        }
    }

    /// Replace the builder, e.g. to attach a dedicated thread pool.
    pub fn with_builder(mut self, builder: GridBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn config(&self) -> &GridConfig {
        self.front.grid.config()
    }

    pub fn builder(&self) -> &GridBuilder {
        &self.builder
    }

    pub fn query(&self) -> &NearestQuery {
        &self.query
    }

    /// Rebuild from this tick's snapshot and publish it.
    pub fn rebuild(&mut self, tick: u64, snapshot: &[TrackedEntity]) -> RebuildStats {
        self.back.positions.refill(snapshot);
        let stats = self.builder.rebuild(&mut self.back.grid, snapshot);
        self.back.tick = tick;
        std::mem::swap(&mut self.front, &mut self.back);
        stats
    }

    /// The most recently published grid.
    pub fn snapshot(&self) -> &GridSnapshot {
        &self.front
    }

    pub fn tick(&self) -> u64 {
        self.front.tick
    }

    pub fn find_nearest(&self, point: Vec2) -> Option<NearestHit> {
        self.front.find_nearest(&self.query, point)
    }

    pub fn entities_in_radius(&self, point: Vec2, radius: f32, out: &mut Vec<EntityRef>) -> usize {
        self.front.entities_in_radius(point, radius, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use rayon::prelude::*;

    fn index() -> SpatialIndex {
        let config = GridConfig::new(Vec2::ONE, IVec2::splat(10), Vec2::ZERO).unwrap();
        SpatialIndex::new(config, BuilderOptions::default(), NearestQuery::default())
    }

    fn tracked(index: u32, x: f32, y: f32) -> TrackedEntity {
        TrackedEntity::new(EntityRef::new(index, 0), Vec2::new(x, y))
    }

    #[test]
    fn empty_index_finds_nothing() {
        let index = index();
        assert_eq!(index.tick(), 0);
        assert!(index.find_nearest(Vec2::splat(5.0)).is_none());
    }

    #[test]
    fn rebuild_publishes_new_snapshot() {
        let mut index = index();
        index.rebuild(1, &[tracked(0, 2.5, 2.5)]);
        assert_eq!(index.tick(), 1);
        assert_eq!(index.find_nearest(Vec2::ZERO).unwrap().entity, EntityRef::new(0, 0));

        // Entity 0 moved away, entity 1 appeared near the origin.
        index.rebuild(2, &[tracked(0, 9.5, 9.5), tracked(1, 0.5, 0.5)]);
        assert_eq!(index.tick(), 2);
        let hit = index.find_nearest(Vec2::ZERO).unwrap();
        assert_eq!(hit.entity, EntityRef::new(1, 0));
        assert_eq!(index.snapshot().grid().entity_count(), 2);
    }

    #[test]
    fn back_buffer_is_fully_replaced_on_each_swap() {
        let mut index = index();
        index.rebuild(1, &[tracked(0, 1.5, 1.5), tracked(1, 2.5, 2.5)]);
        index.rebuild(2, &[tracked(2, 8.5, 8.5)]);
        // The buffer built at tick 1 is reused for tick 3.
        index.rebuild(3, &[tracked(3, 5.5, 5.5)]);

        let snapshot = index.snapshot();
        assert_eq!(snapshot.tick(), 3);
        assert_eq!(snapshot.grid().entity_count(), 1);
        assert_eq!(snapshot.positions().len(), 1);
        assert_eq!(index.find_nearest(Vec2::ZERO).unwrap().entity, EntityRef::new(3, 0));
    }

    #[test]
    fn snapshot_supports_concurrent_queries() {
        let mut index = index();
        let snapshot: Vec<TrackedEntity> = (0..100)
            .map(|i| tracked(i, (i % 10) as f32 + 0.5, (i / 10) as f32 + 0.5))
            .collect();
        index.rebuild(1, &snapshot);

        let view = index.snapshot();
        let query = *index.query();
        let hits: Vec<Option<EntityRef>> = snapshot
            .par_iter()
            .map(|t| view.find_nearest(&query, t.position + Vec2::splat(0.1)).map(|h| h.entity))
            .collect();

        for (t, hit) in snapshot.iter().zip(hits) {
            assert_eq!(hit, Some(t.entity));
        }
    }

    #[test]
    fn radius_query_reads_front_buffer() {
        let mut index = index();
        index.rebuild(1, &[tracked(0, 5.0, 5.0), tracked(1, 5.5, 5.0), tracked(2, 9.0, 9.0)]);
        let mut found = Vec::new();
        assert_eq!(index.entities_in_radius(Vec2::new(5.2, 5.0), 1.0, &mut found), 2);
        found.sort();
        assert_eq!(found, vec![EntityRef::new(0, 0), EntityRef::new(1, 0)]);
    }
}
