//! Sift Core
//!
//! Contains the spatial indexing building blocks:
//! - Uniform grid configuration and coordinate mapping
//! - Per-tick grid rebuild (parallel mapping, serial commit)
//! - Nearest-entity and radius queries
//! - Auto-targeting on top of the index
//! - Deterministic time and math

pub mod entity;
pub mod grid;
pub mod math;
pub mod targeting;
pub mod time;

pub use glam;

pub use entity::{EntityRef, TrackedEntity};
pub use grid::{
    BuilderOptions, GridConfig, GridConfigError, NearestHit, NearestQuery, QueryError, SpatialGrid,
    SpatialIndex,
};
pub use targeting::AutoTarget;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
