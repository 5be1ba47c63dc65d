//! Grid configuration and world <-> cell coordinate mapping.

use super::GridConfigError;
use glam::{IVec2, Vec2};

/// Flat index of a cell: `y * dimensions.x + x`.
///
/// `CellIndex::OUT_OF_BOUNDS` marks positions that fall outside the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex(u32);

impl CellIndex {
    pub const OUT_OF_BOUNDS: CellIndex = CellIndex(u32::MAX);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_out_of_bounds(self) -> bool {
        self == Self::OUT_OF_BOUNDS
    }

    #[inline]
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CellIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_out_of_bounds() {
            write!(f, "out-of-bounds")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Static parameters of the uniform grid.
///
/// Built once through [`GridConfig::new`] (or [`GridConfig::centered`]) and
/// read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    cell_size: Vec2,
    dimensions: IVec2,
    origin: Vec2,
}

impl GridConfig {
    /// Validate and build a configuration.
    pub fn new(cell_size: Vec2, dimensions: IVec2, origin: Vec2) -> Result<Self, GridConfigError> {
        if !cell_size.is_finite() || cell_size.x <= 0.0 || cell_size.y <= 0.0 {
            return Err(GridConfigError::NonPositiveCellSize { cell_size });
        }
        if dimensions.x <= 0 || dimensions.y <= 0 {
            return Err(GridConfigError::NonPositiveDimensions { dimensions });
        }
        if !origin.is_finite() {
            return Err(GridConfigError::NonFiniteOrigin { origin });
        }
        // u32::MAX is reserved for the out-of-bounds sentinel
        let cells = dimensions.x as u64 * dimensions.y as u64;
        if cells >= u32::MAX as u64 {
            return Err(GridConfigError::TooManyCells { dimensions });
        }

        Ok(Self {
            cell_size,
            dimensions,
            origin,
        })
    }

    /// Grid centred on the world origin: `origin = -(dimensions * cell_size) / 2`.
    pub fn centered(cell_size: Vec2, dimensions: IVec2) -> Result<Self, GridConfigError> {
        let origin = -(dimensions.as_vec2() * cell_size) / 2.0;
        Self::new(cell_size, dimensions, origin)
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    pub fn dimensions(&self) -> IVec2 {
        self.dimensions
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Smaller of the two cell extents; used to bound ring searches.
    pub fn min_cell_extent(&self) -> f32 {
        self.cell_size.x.min(self.cell_size.y)
    }

    pub fn cell_count(&self) -> usize {
        self.dimensions.x as usize * self.dimensions.y as usize
    }

    /// World-space rectangle `[min, max)` covered by the grid.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (
            self.origin,
            self.origin + self.dimensions.as_vec2() * self.cell_size,
        )
    }

    /// Map a world position to cell coordinates.
    ///
    /// Components are truncated toward zero, not floored: positions up to one
    /// cell below the origin still land in column/row 0.
    #[inline]
    pub fn world_to_cell(&self, position: Vec2) -> IVec2 {
        let local = (position - self.origin) / self.cell_size;
        IVec2::new(local.x as i32, local.y as i32)
    }

    #[inline]
    pub fn is_in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.dimensions.x && cell.y >= 0 && cell.y < self.dimensions.y
    }

    /// World-space centre of a cell.
    pub fn cell_to_world_center(&self, cell: IVec2) -> Vec2 {
        self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }

    #[inline]
    pub fn flat_index(&self, cell: IVec2) -> Option<CellIndex> {
        if !self.is_in_bounds(cell) {
            return None;
        }
        // In-bounds cells are non-negative and the product stays below u32::MAX.
        let width = self.dimensions.x as u32;
        Some(CellIndex(cell.y as u32 * width + cell.x as u32))
    }

    /// Inverse of [`GridConfig::flat_index`]. Meaningless for the sentinel.
    pub fn cell_of(&self, index: CellIndex) -> IVec2 {
        let width = self.dimensions.x as u32;
        IVec2::new((index.0 % width) as i32, (index.0 / width) as i32)
    }

    /// Flat cell index for a position, or the sentinel when the position is
    /// outside the grid or not finite.
    #[inline]
    pub fn cell_index_of(&self, position: Vec2) -> CellIndex {
        if !position.is_finite() {
            return CellIndex::OUT_OF_BOUNDS;
        }
        self.flat_index(self.world_to_cell(position))
            .unwrap_or(CellIndex::OUT_OF_BOUNDS)
    }
}
