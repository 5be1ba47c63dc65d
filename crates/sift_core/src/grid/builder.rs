//! Per-tick grid rebuild: parallel cell mapping, serial commit.

use super::{CellIndex, GridConfig, SpatialGrid};
use crate::entity::{EntityRef, TrackedEntity};
use rayon::prelude::*;
use rayon::ThreadPool;
use sift_metrics::{Counter, PhaseProfiler, RebuildTimer};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Smallest batch handed to a rayon worker during the mapping phase.
const MIN_MAPPING_BATCH: usize = 256;

/// Entity paired with the cell it mapped into for the current rebuild.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EntityCellMapping {
    pub entity: EntityRef,
    pub cell: CellIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Snapshots at least this long are mapped on the rayon pool.
    pub parallel_threshold: usize,
    /// Log every placement and every dropped entity at `trace` level.
    pub diagnostics: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: 1024,
            diagnostics: false,
        }
    }
}

/// Outcome of one rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildStats {
    pub indexed: usize,
    pub out_of_bounds: usize,
    pub parallel: bool,
    pub elapsed: Duration,
}

/// Rebuilds a [`SpatialGrid`] from a snapshot of tracked entities.
///
/// The mapping scratch buffer lives here and is reused across ticks.
pub struct GridBuilder {
    options: BuilderOptions,
    mappings: Vec<EntityCellMapping>,
    pool: Option<Arc<ThreadPool>>,
    profiler: PhaseProfiler,
    counters: Counter,
    timer: RebuildTimer,
}

impl GridBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options,
            mappings: Vec::new(),
            pool: None,
            profiler: PhaseProfiler::new(),
            counters: Counter::new(),
            timer: RebuildTimer::new(120),
        }
    }

    /// Run the mapping phase on a dedicated pool instead of rayon's global one.
    pub fn with_thread_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Mappings produced by the last rebuild, in snapshot order.
    pub fn last_mappings(&self) -> &[EntityCellMapping] {
        &self.mappings
    }

    pub fn profiler(&self) -> &PhaseProfiler {
        &self.profiler
    }

    pub fn counters(&self) -> &Counter {
        &self.counters
    }

    pub fn timer(&self) -> &RebuildTimer {
        &self.timer
    }

    /// Clear `grid` and repopulate it from `snapshot`.
    ///
    /// Entities that map outside the grid are left out for this tick.
    /// The mapping phase is fully joined before anything is committed.
    pub fn rebuild(&mut self, grid: &mut SpatialGrid, snapshot: &[TrackedEntity]) -> RebuildStats {
        let started = Instant::now();
        let config = *grid.config();
        let parallel = snapshot.len() >= self.options.parallel_threshold.max(1);
        let diagnostics = self.options.diagnostics;
        let mappings = &mut self.mappings;
        let pool = self.pool.as_deref();

        self.profiler.time_phase("clear", || grid.clear());

        self.profiler.time_phase("map", || match (parallel, pool) {
            (true, Some(pool)) => {
                pool.install(|| map_parallel(&config, snapshot, &mut *mappings))
            }
            (true, None) => map_parallel(&config, snapshot, &mut *mappings),
            (false, _) => map_sequential(&config, snapshot, &mut *mappings),
        });

        let (indexed, out_of_bounds) = self.profiler.time_phase("commit", || {
            commit(&mut *grid, snapshot, mappings.as_slice(), diagnostics)
        });

        let elapsed = started.elapsed();
        self.timer.record(elapsed);
        self.counters.increment("rebuilds", 1);
        self.counters.set("indexed", indexed);
        self.counters.set("out_of_bounds", out_of_bounds);

        tracing::debug!(
            indexed,
            out_of_bounds,
            parallel,
            elapsed_us = elapsed.as_micros() as u64,
            "grid rebuilt"
        );

        RebuildStats {
            indexed,
            out_of_bounds,
            parallel,
            elapsed,
        }
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new(BuilderOptions::default())
    }
}

#[inline]
fn map_one(config: &GridConfig, tracked: &TrackedEntity) -> EntityCellMapping {
    EntityCellMapping {
        entity: tracked.entity,
        cell: config.cell_index_of(tracked.position),
    }
}

fn map_sequential(
    config: &GridConfig,
    snapshot: &[TrackedEntity],
    out: &mut Vec<EntityCellMapping>,
) {
    out.clear();
    out.extend(snapshot.iter().map(|tracked| map_one(config, tracked)));
}

fn map_parallel(
    config: &GridConfig,
    snapshot: &[TrackedEntity],
    out: &mut Vec<EntityCellMapping>,
) {
    // Each task writes only its own slots; collect_into_vec is the join point.
    snapshot
        .par_iter()
        .with_min_len(MIN_MAPPING_BATCH)
        .map(|tracked| map_one(config, tracked))
        .collect_into_vec(out);
}

fn commit(
    grid: &mut SpatialGrid,
    snapshot: &[TrackedEntity],
    mappings: &[EntityCellMapping],
    diagnostics: bool,
) -> (usize, usize) {
    let mut indexed = 0;
    let mut out_of_bounds = 0;

    for (mapping, tracked) in mappings.iter().zip(snapshot) {
        if grid.add_entity(mapping.cell, mapping.entity) {
            indexed += 1;
            if diagnostics {
                tracing::trace!(
                    entity = %mapping.entity,
                    cell = %mapping.cell,
                    "entity added to cell"
                );
            }
        } else {
            out_of_bounds += 1;
            if diagnostics {
                tracing::trace!(
                    entity = %mapping.entity,
                    x = tracked.position.x,
                    y = tracked.position.y,
                    "entity is out of bounds"
                );
            }
        }
    }

    (indexed, out_of_bounds)
}
