//! Grid-accelerated proximity queries.
//!
//! Both queries walk square rings of cells around the cell containing the
//! query point (ring `r` = cells at Chebyshev distance `r`). Rings are
//! clipped to the grid, so query points outside the grid still search
//! inward without visiting empty space.

use super::{PositionLookup, QueryError, SpatialGrid};
use crate::entity::EntityRef;
use glam::{IVec2, Vec2};

/// Search radius used when none is configured.
pub const DEFAULT_MAX_SEARCH_RADIUS: f32 = 10_000.0;

/// Closest entity found by [`NearestQuery::find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    pub entity: EntityRef,
    /// Resolved position of the entity.
    pub position: Vec2,
    /// `position - query point`.
    pub delta: Vec2,
    /// Unit vector from the query point toward the entity.
    pub direction: Vec2,
    pub distance: f32,
}

/// Nearest-entity search over a built [`SpatialGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestQuery {
    max_search_radius: f32,
}

impl Default for NearestQuery {
    fn default() -> Self {
        Self {
            max_search_radius: DEFAULT_MAX_SEARCH_RADIUS,
        }
    }
}

impl NearestQuery {
    /// Candidates must lie strictly closer than `max_search_radius`.
    /// `f32::INFINITY` searches the whole grid; zero, negative and NaN radii
    /// are rejected.
    pub fn new(max_search_radius: f32) -> Result<Self, QueryError> {
        if !(max_search_radius > 0.0) {
            return Err(QueryError::NonPositiveSearchRadius {
                radius: max_search_radius,
            });
        }
        Ok(Self { max_search_radius })
    }

    pub fn max_search_radius(&self) -> f32 {
        self.max_search_radius
    }

    /// Find the entity closest to `point`.
    ///
    /// Ties go to the first entity encountered: inner rings before outer
    /// ones, rows (`y`) before columns (`x`) inside a ring, then insertion
    /// order inside a cell. Entities the lookup cannot resolve are skipped.
    ///
    /// Returns `None` when nothing lies within the search radius, and also
    /// when the closest entity sits exactly on `point`, because no direction
    /// toward it exists.
    pub fn find_nearest<L>(
        &self,
        grid: &SpatialGrid,
        lookup: &L,
        point: Vec2,
    ) -> Option<NearestHit>
    where
        L: PositionLookup + ?Sized,
    {
        if grid.is_empty() || !point.is_finite() {
            return None;
        }

        let config = grid.config();
        let min_extent = config.min_cell_extent();
        let center = config.world_to_cell(point);
        let max_rings = self.max_search_radius / min_extent;
        let span = RingSpan::new(center, config.dimensions(), max_rings)?;

        let mut best: Option<(EntityRef, Vec2)> = None;
        let mut best_sq = self.max_search_radius * self.max_search_radius;

        for ring in span.first..=span.last {
            for_each_ring_cell(grid, center, ring, |cell| {
                for &entity in cell {
                    let Some(position) = lookup.position(entity) else {
                        continue;
                    };
                    let dist_sq = (position - point).length_squared();
                    if dist_sq < best_sq {
                        best_sq = dist_sq;
                        best = Some((entity, position));
                    }
                }
            });

            // Nothing in ring + 1 can be closer than `ring` whole cells.
            if best.is_some() {
                let reach = ring as f32 * min_extent;
                if reach * reach >= best_sq {
                    break;
                }
            }
        }

        let (entity, position) = best?;
        let delta = position - point;
        let Some(direction) = delta.try_normalize() else {
            tracing::trace!(%entity, "nearest entity coincides with query point");
            return None;
        };

        Some(NearestHit {
            entity,
            position,
            delta,
            direction,
            distance: best_sq.sqrt(),
        })
    }
}

/// Collect every entity strictly within `radius` of `point` into `out`.
///
/// `out` is cleared first so callers can reuse one buffer across ticks.
/// Returns the number of entities written.
pub fn entities_in_radius<L>(
    grid: &SpatialGrid,
    lookup: &L,
    point: Vec2,
    radius: f32,
    out: &mut Vec<EntityRef>,
) -> usize
where
    L: PositionLookup + ?Sized,
{
    out.clear();
    if grid.is_empty() || !point.is_finite() || !(radius > 0.0) {
        return 0;
    }

    let config = grid.config();
    let center = config.world_to_cell(point);
    let Some(span) = RingSpan::new(center, config.dimensions(), radius / config.min_cell_extent())
    else {
        return 0;
    };
    let radius_sq = radius * radius;

    for ring in span.first..=span.last {
        for_each_ring_cell(grid, center, ring, |cell| {
            out.extend(cell.iter().copied().filter(|&entity| {
                lookup
                    .position(entity)
                    .is_some_and(|position| (position - point).length_squared() < radius_sq)
            }));
        });
    }

    out.len()
}

/// Range of rings worth visiting for a query centred on `center`.
struct RingSpan {
    first: i64,
    last: i64,
}

impl RingSpan {
    /// `max_rings_f` is the search radius in units of the smallest cell extent.
    fn new(center: IVec2, dimensions: IVec2, max_rings_f: f32) -> Option<Self> {
        let (cx, cy) = (center.x as i64, center.y as i64);
        let (w, h) = (dimensions.x as i64, dimensions.y as i64);

        // Chebyshev distance from the centre cell to the nearest and farthest grid cells.
        let near_x = (-cx).max(cx - (w - 1)).max(0);
        let near_y = (-cy).max(cy - (h - 1)).max(0);
        let far_x = cx.abs().max((cx - (w - 1)).abs());
        let far_y = cy.abs().max((cy - (h - 1)).abs());

        let by_radius = if max_rings_f.is_finite() {
            max_rings_f.ceil() as i64
        } else {
            i64::MAX
        };

        let first = near_x.max(near_y);
        let last = far_x.max(far_y).min(by_radius);
        (first <= last).then_some(Self { first, last })
    }
}

/// Visit the in-grid cells of ring `ring` around `center`, row by row.
fn for_each_ring_cell<F>(grid: &SpatialGrid, center: IVec2, ring: i64, mut visit: F)
where
    F: FnMut(&[EntityRef]),
{
    let dims = grid.config().dimensions();
    let (cx, cy) = (center.x as i64, center.y as i64);
    let (w, h) = (dims.x as i64, dims.y as i64);

    let y_min = (cy - ring).max(0);
    let y_max = (cy + ring).min(h - 1);
    let x_lo = (cx - ring).max(0);
    let x_hi = (cx + ring).min(w - 1);

    let mut visit_cell = |x: i64, y: i64| {
        visit(grid.cell_at(IVec2::new(x as i32, y as i32)));
    };

    for y in y_min..=y_max {
        if (y - cy).abs() == ring {
            // Top or bottom edge: the whole clipped row.
            for x in x_lo..=x_hi {
                visit_cell(x, y);
            }
        } else {
            // Side edges only.
            let left = cx - ring;
            let right = cx + ring;
            if (0..w).contains(&left) {
                visit_cell(left, y);
            }
            if right != left && (0..w).contains(&right) {
                visit_cell(right, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TrackedEntity;
    use crate::grid::{GridBuilder, GridConfig, PositionTable};
    use crate::math::DeterministicRng;
    use std::collections::HashMap;

    fn build(config: GridConfig, snapshot: &[TrackedEntity]) -> (SpatialGrid, PositionTable) {
        let mut grid = SpatialGrid::new(config);
        let mut positions = PositionTable::new();
        positions.refill(snapshot);
        GridBuilder::default().rebuild(&mut grid, snapshot);
        (grid, positions)
    }

    fn ten_by_ten() -> GridConfig {
        GridConfig::new(Vec2::ONE, IVec2::splat(10), Vec2::ZERO).unwrap()
    }

    fn tracked(index: u32, x: f32, y: f32) -> TrackedEntity {
        TrackedEntity::new(EntityRef::new(index, 0), Vec2::new(x, y))
    }

    #[test]
    fn finds_nearest_in_concrete_scenario() {
        let snapshot = [tracked(0, 2.5, 2.5), tracked(1, 7.5, 7.5)];
        let (grid, positions) = build(ten_by_ten(), &snapshot);
        let query = NearestQuery::default();

        let hit = query.find_nearest(&grid, &positions, Vec2::ZERO).unwrap();
        assert_eq!(hit.entity, snapshot[0].entity);
        assert_eq!(hit.position, Vec2::new(2.5, 2.5));
        assert!((hit.distance - 3.5355339).abs() < 1e-4);
        assert!((hit.direction.length() - 1.0).abs() < 1e-6);

        let hit = query.find_nearest(&grid, &positions, Vec2::splat(9.0)).unwrap();
        assert_eq!(hit.entity, snapshot[1].entity);
        assert!((hit.distance - 2.1213203).abs() < 1e-4);
        assert_eq!(hit.delta, Vec2::splat(-1.5));
    }

    #[test]
    fn out_of_bounds_entity_is_never_found() {
        let (grid, positions) = build(ten_by_ten(), &[tracked(0, -5.0, -5.0)]);
        assert!(grid.is_empty());
        assert!(NearestQuery::default()
            .find_nearest(&grid, &positions, Vec2::ZERO)
            .is_none());
    }

    #[test]
    fn coincident_entity_reports_not_found() {
        let (grid, positions) = build(ten_by_ten(), &[tracked(0, 4.0, 4.0)]);
        let result = NearestQuery::default().find_nearest(&grid, &positions, Vec2::new(4.0, 4.0));
        assert!(result.is_none());
    }

    #[test]
    fn matches_brute_force_for_random_sets() {
        let config =
            GridConfig::new(Vec2::new(3.0, 2.0), IVec2::new(20, 25), Vec2::new(-30.0, -25.0))
                .unwrap();
        let (min, max) = config.bounds();
        let mut rng = DeterministicRng::new(0x5eed);

        for round in 0..20u32 {
            let count = 1 + round * 7;
            let snapshot: Vec<TrackedEntity> = (0..count)
                .map(|i| TrackedEntity::new(EntityRef::new(i, round), rng.point_in(min, max)))
                .collect();
            let (grid, positions) = build(config, &snapshot);
            let query = NearestQuery::default();

            for _ in 0..50 {
                // Include query points well outside the grid.
                let point = rng.point_in(min - Vec2::splat(15.0), max + Vec2::splat(15.0));
                let expected = snapshot
                    .iter()
                    .filter(|t| !config.cell_index_of(t.position).is_out_of_bounds())
                    .map(|t| (t.position - point).length_squared())
                    .fold(f32::INFINITY, f32::min);

                let found = query
                    .find_nearest(&grid, &positions, point)
                    .map(|hit| (hit.position - point).length_squared())
                    .unwrap_or(f32::INFINITY);
                assert_eq!(found, expected, "round {round}, query {point}");
            }
        }
    }

    #[test]
    fn respects_max_search_radius() {
        let (grid, positions) = build(ten_by_ten(), &[tracked(0, 9.5, 0.5)]);
        let point = Vec2::new(0.5, 0.5);

        let query = |radius: f32| NearestQuery::new(radius).unwrap();

        assert!(query(8.0).find_nearest(&grid, &positions, point).is_none());
        // Strictly closer than the radius.
        assert!(query(9.0).find_nearest(&grid, &positions, point).is_none());
        let hit = query(9.5).find_nearest(&grid, &positions, point).unwrap();
        assert!((hit.distance - 9.0).abs() < 1e-6);
        assert!(query(f32::INFINITY)
            .find_nearest(&grid, &positions, point)
            .is_some());
    }

    #[test]
    fn rejects_unusable_search_radius() {
        for radius in [-1.0, 0.0, -0.0, f32::NAN, f32::NEG_INFINITY] {
            assert!(
                matches!(
                    NearestQuery::new(radius),
                    Err(QueryError::NonPositiveSearchRadius { .. })
                ),
                "radius {radius} must be rejected"
            );
        }
        assert_eq!(NearestQuery::new(0.5).unwrap().max_search_radius(), 0.5);
    }

    #[test]
    fn equidistant_entities_resolve_by_iteration_order() {
        // Same cell: insertion order wins.
        let snapshot = [tracked(0, 5.25, 5.5), tracked(1, 5.75, 5.5)];
        let (grid, positions) = build(ten_by_ten(), &snapshot);
        let hit = NearestQuery::default()
            .find_nearest(&grid, &positions, Vec2::new(5.5, 5.5))
            .unwrap();
        assert_eq!(hit.entity, snapshot[0].entity);

        // Different cells in the same ring: the lower row is visited first.
        let snapshot = [tracked(0, 5.5, 7.5), tracked(1, 5.5, 3.5)];
        let (grid, positions) = build(ten_by_ten(), &snapshot);
        let hit = NearestQuery::default()
            .find_nearest(&grid, &positions, Vec2::new(5.5, 5.5))
            .unwrap();
        assert_eq!(hit.entity, snapshot[1].entity);
    }

    #[test]
    fn stale_handles_are_skipped() {
        let snapshot = [tracked(0, 1.5, 1.5), tracked(1, 6.5, 6.5)];
        let (grid, _) = build(ten_by_ten(), &snapshot);

        // Entity 0 was despawned after the rebuild; only entity 1 still resolves.
        let mut live = HashMap::new();
        live.insert(snapshot[1].entity, snapshot[1].position);

        let hit = NearestQuery::default()
            .find_nearest(&grid, &live, Vec2::ZERO)
            .unwrap();
        assert_eq!(hit.entity, snapshot[1].entity);
    }

    #[test]
    fn far_away_query_point_still_searches_inward() {
        let (grid, positions) = build(ten_by_ten(), &[tracked(0, 9.5, 9.5)]);
        let hit = NearestQuery::new(f32::INFINITY)
            .unwrap()
            .find_nearest(&grid, &positions, Vec2::new(-1.0e9, 5.0e8))
            .unwrap();
        assert_eq!(hit.entity, EntityRef::new(0, 0));
        assert!(NearestQuery::default()
            .find_nearest(&grid, &positions, Vec2::new(f32::NAN, 0.0))
            .is_none());
    }

    #[test]
    fn radius_query_matches_brute_force() {
        let config = GridConfig::centered(Vec2::splat(2.5), IVec2::new(16, 16)).unwrap();
        let (min, max) = config.bounds();
        let mut rng = DeterministicRng::new(11);
        let snapshot: Vec<TrackedEntity> = (0..400)
            .map(|i| TrackedEntity::new(EntityRef::new(i, 0), rng.point_in(min, max)))
            .collect();
        let (grid, positions) = build(config, &snapshot);
        let mut found = Vec::new();

        for _ in 0..40 {
            let point = rng.point_in(min, max);
            let radius = rng.range_f32(0.5, 12.0);
            let count = entities_in_radius(&grid, &positions, point, radius, &mut found);

            let mut expected: Vec<EntityRef> = snapshot
                .iter()
                .filter(|t| !config.cell_index_of(t.position).is_out_of_bounds())
                .filter(|t| (t.position - point).length_squared() < radius * radius)
                .map(|t| t.entity)
                .collect();
            found.sort();
            expected.sort();
            assert_eq!(count, expected.len());
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn radius_query_reuses_and_clears_buffer() {
        let (grid, positions) = build(ten_by_ten(), &[tracked(0, 1.0, 1.0)]);
        let mut found = vec![EntityRef::new(99, 0)];
        assert_eq!(entities_in_radius(&grid, &positions, Vec2::new(8.0, 8.0), 1.0, &mut found), 0);
        assert!(found.is_empty());
        assert_eq!(entities_in_radius(&grid, &positions, Vec2::ONE, 0.5, &mut found), 1);
        assert_eq!(found, vec![EntityRef::new(0, 0)]);
    }
}
