//! Cell storage for the uniform grid.

use super::{CellIndex, GridConfig};
use crate::entity::EntityRef;
use glam::IVec2;

/// Flat array of cells, each holding the handles of the entities that
/// mapped into it at the last rebuild.
///
/// Cell vectors are allocated once and cleared (not freed) between
/// rebuilds. There is no internal locking; mutation requires `&mut self`.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    config: GridConfig,
    cells: Vec<Vec<EntityRef>>,
    entity_count: usize,
}

impl SpatialGrid {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            cells: vec![Vec::new(); config.cell_count()],
            entity_count: 0,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Empty every cell, keeping each cell's capacity for the next rebuild.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.entity_count = 0;
    }

    /// Append an entity to a cell.
    ///
    /// Returns `false` and leaves the grid untouched for the out-of-bounds
    /// sentinel or any index past the last cell.
    pub fn add_entity(&mut self, index: CellIndex, entity: EntityRef) -> bool {
        match self.cells.get_mut(index.as_usize()) {
            Some(cell) if !index.is_out_of_bounds() => {
                cell.push(entity);
                self.entity_count += 1;
                true
            }
            _ => false,
        }
    }

    /// Entities in a cell, in insertion order. Empty for invalid indices.
    pub fn cell(&self, index: CellIndex) -> &[EntityRef] {
        self.cells
            .get(index.as_usize())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entities in the cell at 2D coordinates. Empty when out of bounds.
    pub fn cell_at(&self, cell: IVec2) -> &[EntityRef] {
        match self.config.flat_index(cell) {
            Some(index) => self.cell(index),
            None => &[],
        }
    }

    /// Every cell with its flat index, in index order.
    pub fn cells(&self) -> impl Iterator<Item = (CellIndex, &[EntityRef])> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (CellIndex::new(i as u32), cell.as_slice()))
    }

    /// Total number of handles currently stored across all cells.
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count == 0
    }

    /// Sum of per-cell capacities; stays flat across rebuilds of similar size.
    pub fn reserved_capacity(&self) -> usize {
        self.cells.iter().map(Vec::capacity).sum()
    }
}
