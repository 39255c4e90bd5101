use crate::chunk::Chunk;
use std::collections::HashMap;
use voxcel_core::math::chunk_of;
use voxcel_core::types::{CellCoord, ChunkCoord};

/// Spatial container for the chunks of one array.
#[derive(Debug, Clone, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk holding `cell`, created on demand.
    pub fn chunk_for_cell_mut(&mut self, cell: CellCoord) -> &mut Chunk {
        let coord = chunk_of(cell);
        self.chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new(coord))
    }

    pub fn chunk_for_cell(&self, cell: CellCoord) -> Option<&Chunk> {
        self.chunks.get(&chunk_of(cell))
    }

    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    pub fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    /// Drop a chunk entirely.
    pub fn remove(&mut self, coord: &ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ChunkCoord, &mut Chunk)> {
        self.chunks.iter_mut()
    }

    /// Chunk coordinates in a deterministic (z, y, x) order.
    pub fn sorted_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_by_key(|c| (c.z, c.y, c.x));
        coords
    }

    pub fn loaded_count(&self) -> u32 {
        self.chunks.len() as u32
    }

    /// Total number of cells across all chunks.
    pub fn cell_count(&self) -> u32 {
        self.chunks.values().map(|c| c.len() as u32).sum()
    }
}
