use glam::{IVec2, Vec2};
use thiserror::Error;

/// Errors that can occur while validating a grid configuration.
///
/// All of these are fatal at initialization: a misconfigured grid would
/// answer queries wrongly instead of failing loudly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridConfigError {
    #[error("cell size must be finite and positive on both axes, got {cell_size}")]
    NonPositiveCellSize { cell_size: Vec2 },

    #[error("grid dimensions must be positive on both axes, got {dimensions}")]
    NonPositiveDimensions { dimensions: IVec2 },

    #[error("grid origin must be finite, got {origin}")]
    NonFiniteOrigin { origin: Vec2 },

    #[error("grid of {dimensions} cells exceeds the addressable cell count")]
    TooManyCells { dimensions: IVec2 },
}

/// Errors that can occur while configuring a [`NearestQuery`](super::NearestQuery).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error("max search radius must be positive, got {radius}")]
    NonPositiveSearchRadius { radius: f32 },
}
