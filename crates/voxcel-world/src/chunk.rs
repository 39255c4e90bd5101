use crate::cell::Cell;
use voxcel_core::types::{CellCoord, ChunkCoord};

/// A bounded group of cells of one array, the unit of rendering.
///
/// The chunk only owns the cells and a dirty flag. Derived render state
/// (instance order, batches, LOD) lives with the renderer and is rebuilt
/// whenever the flag is set.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk coordinate in chunk-space.
    pub coord: ChunkCoord,
    cells: Vec<Cell>,
    dirty: bool,
}

impl Chunk {
    /// Create an empty chunk. New chunks start dirty so the renderer picks
    /// them up on first access.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            cells: Vec::new(),
            dirty: true,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.iter().find(|c| c.coord == coord)
    }

    pub fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.dirty = true;
        self.cells.iter_mut().find(|c| c.coord == coord)
    }

    /// Insert or replace the cell at `cell.coord`.
    pub fn upsert(&mut self, cell: Cell) {
        self.dirty = true;
        match self.cells.iter_mut().find(|c| c.coord == cell.coord) {
            Some(existing) => *existing = cell,
            None => self.cells.push(cell),
        }
    }

    /// Remove the cell at `coord`. Returns the removed cell, if any.
    pub fn remove(&mut self, coord: CellCoord) -> Option<Cell> {
        let idx = self.cells.iter().position(|c| c.coord == coord)?;
        self.dirty = true;
        Some(self.cells.swap_remove(idx))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag once derived state has been rebuilt.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
