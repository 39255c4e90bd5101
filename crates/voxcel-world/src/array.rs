use crate::cell::{Cell, CellMeta, CellValue};
use crate::chunk::Chunk;
use crate::chunk_map::ChunkMap;
use crate::occlusion::OcclusionData;
use glam::{IVec3, Quat};
use voxcel_core::axis::Axis;
use voxcel_core::types::{ArrayId, CellCoord, ChunkCoord};

/// Resting placement for arrays whose offset is animated over time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimedPlacement {
    pub base_offset: IVec3,
    pub base_rotation: Option<Quat>,
}

/// A sparse 3D grid of cells with a world placement.
#[derive(Debug, Clone)]
pub struct CellArray {
    pub id: ArrayId,
    /// Extent in cells along x, y, z. Every component is at least 1.
    pub size: IVec3,
    /// World placement of the array frame, in whole cells.
    pub offset: IVec3,
    pub hidden: bool,
    pub occlusion: Option<OcclusionData>,
    pub physics_enabled: bool,
    pub voxel_scale: f32,
    pub timed: Option<TimedPlacement>,
    chunks: ChunkMap,
}

impl CellArray {
    pub fn new(id: ArrayId, size: IVec3) -> Self {
        Self {
            id,
            size: size.max(IVec3::ONE),
            offset: IVec3::ZERO,
            hidden: false,
            occlusion: None,
            physics_enabled: false,
            voxel_scale: 1.0,
            timed: None,
            chunks: ChunkMap::new(),
        }
    }

    /// Whether `coord` lies inside the array extent.
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.cmpge(IVec3::ZERO).all() && coord.cmplt(self.size).all()
    }

    /// Highest valid layer index along `axis`.
    pub fn max_layer(&self, axis: Axis) -> i32 {
        (axis.of(self.size) - 1).max(0)
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.chunks.chunk_for_cell(coord)?.cell(coord)
    }

    /// Insert or replace a cell. Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, cell: Cell) -> bool {
        if !self.contains(cell.coord) {
            log::debug!(
                "array {}: ignoring cell outside extent at {:?}",
                self.id,
                cell.coord
            );
            return false;
        }
        self.chunks.chunk_for_cell_mut(cell.coord).upsert(cell);
        true
    }

    pub fn set_value(&mut self, coord: CellCoord, value: Option<CellValue>) -> bool {
        self.update_cell(coord, |cell| cell.value = value)
    }

    pub fn set_formula(&mut self, coord: CellCoord, formula: Option<String>) -> bool {
        self.update_cell(coord, |cell| cell.formula = formula)
    }

    pub fn set_meta(&mut self, coord: CellCoord, meta: CellMeta) -> bool {
        self.update_cell(coord, |cell| cell.meta = meta)
    }

    /// Apply `f` to the cell at `coord`, creating an empty cell first when
    /// none exists.
    fn update_cell(&mut self, coord: CellCoord, f: impl FnOnce(&mut Cell)) -> bool {
        if !self.contains(coord) {
            return false;
        }
        let chunk = self.chunks.chunk_for_cell_mut(coord);
        if chunk.cell(coord).is_none() {
            chunk.upsert(Cell::empty(coord));
        }
        match chunk.cell_mut(coord) {
            Some(cell) => {
                f(cell);
                true
            }
            None => false,
        }
    }

    pub fn remove_cell(&mut self, coord: CellCoord) -> Option<Cell> {
        let chunk = self.chunks.get_mut(&voxcel_core::math::chunk_of(coord))?;
        chunk.remove(coord)
    }

    pub fn chunk(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    pub fn chunk_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    pub fn chunks(&self) -> &ChunkMap {
        &self.chunks
    }

    pub fn chunks_mut(&mut self) -> &mut ChunkMap {
        &mut self.chunks
    }

    pub fn cell_count(&self) -> u32 {
        self.chunks.cell_count()
    }

    /// Force every chunk to rebuild, e.g. after a palette or scale change.
    pub fn mark_all_dirty(&mut self) {
        for (_, chunk) in self.chunks.iter_mut() {
            chunk.mark_dirty();
        }
    }

    /// Fill the whole extent with empty cells (a fresh spreadsheet).
    pub fn fill_empty(&mut self) {
        for z in 0..self.size.z {
            for y in 0..self.size.y {
                for x in 0..self.size.x {
                    let coord = IVec3::new(x, y, z);
                    if self.cell(coord).is_none() {
                        self.set_cell(Cell::empty(coord));
                    }
                }
            }
        }
    }
}
