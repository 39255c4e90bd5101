pub mod array;
pub mod cell;
pub mod chunk;
pub mod chunk_map;
pub mod occlusion;
pub mod selection;

pub use array::{CellArray, TimedPlacement};
pub use cell::{Cell, CellMeta, CellProvenance, CellValue, NoProvenance};
pub use occlusion::OcclusionData;
pub use selection::Selection;

use glam::IVec3;
use std::collections::HashMap;
use voxcel_core::types::ArrayId;

/// Owns every array known to the engine, keyed by id.
///
/// The renderer and picker only read through this registry; the host
/// application is the sole writer.
#[derive(Debug, Default)]
pub struct ArrayRegistry {
    arrays: HashMap<ArrayId, CellArray>,
    next_id: u32,
}

impl ArrayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty array of `size` and return its id.
    pub fn create(&mut self, size: IVec3) -> ArrayId {
        self.next_id += 1;
        let id = ArrayId(self.next_id);
        self.arrays.insert(id, CellArray::new(id, size));
        log::info!("created array {} with size {:?}", id, size);
        id
    }

    /// Insert an array built elsewhere. Replaces any array with the same id.
    pub fn insert(&mut self, array: CellArray) -> Option<CellArray> {
        self.next_id = self.next_id.max(array.id.0);
        self.arrays.insert(array.id, array)
    }

    pub fn remove(&mut self, id: ArrayId) -> Option<CellArray> {
        let removed = self.arrays.remove(&id);
        if removed.is_some() {
            log::info!("removed array {}", id);
        }
        removed
    }

    pub fn get(&self, id: ArrayId) -> Option<&CellArray> {
        self.arrays.get(&id)
    }

    pub fn get_mut(&mut self, id: ArrayId) -> Option<&mut CellArray> {
        self.arrays.get_mut(&id)
    }

    pub fn contains(&self, id: ArrayId) -> bool {
        self.arrays.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellArray> {
        self.arrays.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CellArray> {
        self.arrays.values_mut()
    }

    /// Array ids in ascending order.
    pub fn ids(&self) -> Vec<ArrayId> {
        let mut ids: Vec<ArrayId> = self.arrays.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Counts for debug display: (arrays, chunks, cells).
    pub fn counts(&self) -> (u32, u32, u32) {
        self.arrays.values().fold((0, 0, 0), |(a, ch, ce), arr| {
            (a + 1, ch + arr.chunks().loaded_count(), ce + arr.cell_count())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut reg = ArrayRegistry::new();
        let a = reg.create(IVec3::splat(2));
        let b = reg.create(IVec3::splat(2));
        assert!(b > a);
        assert_eq!(reg.ids(), vec![a, b]);
    }

    #[test]
    fn test_insert_bumps_next_id() {
        let mut reg = ArrayRegistry::new();
        reg.insert(CellArray::new(ArrayId(10), IVec3::ONE));
        let next = reg.create(IVec3::ONE);
        assert_eq!(next, ArrayId(11));
    }

    #[test]
    fn test_counts() {
        let mut reg = ArrayRegistry::new();
        let id = reg.create(IVec3::new(20, 1, 1));
        if let Some(arr) = reg.get_mut(id) {
            arr.fill_empty();
        }
        assert_eq!(reg.counts(), (1, 2, 20));
        assert!(reg.remove(id).is_some());
        assert!(reg.is_empty());
    }
}
