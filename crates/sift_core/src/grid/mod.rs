//! Uniform-grid spatial index.
//!
//! The grid is rebuilt from scratch every tick and then queried:
//!
//! 1. [`GridConfig`] maps world positions to cells (pure, immutable).
//! 2. [`GridBuilder`] clears a [`SpatialGrid`] and repopulates it from a
//!    snapshot of [`TrackedEntity`](crate::entity::TrackedEntity) values,
//!    mapping entities to cells in parallel and committing serially.
//! 3. [`NearestQuery`] and [`entities_in_radius`] search outward from the
//!    query cell in rings.
//!
//! [`SpatialIndex`] ties these together with double buffering so hosts only
//! deal with `rebuild` and the queries.

mod builder;
mod config;
mod config_error;
mod index;
mod positions;
mod query;
mod spatial_grid;

pub use builder::{BuilderOptions, EntityCellMapping, GridBuilder, RebuildStats};
pub use config::{CellIndex, GridConfig};
pub use config_error::{GridConfigError, QueryError};
pub use index::{GridSnapshot, SpatialIndex};
pub use positions::{PositionLookup, PositionTable};
pub use query::{entities_in_radius, NearestHit, NearestQuery, DEFAULT_MAX_SEARCH_RADIUS};
pub use spatial_grid::SpatialGrid;
