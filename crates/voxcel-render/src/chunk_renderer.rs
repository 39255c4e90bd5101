//! Per-chunk instanced batches.
//!
//! Each chunk of an array is mirrored by a [`ChunkMesh`] holding three
//! parallel batches (solid, ghost, shell) and the stable index order used to
//! map a picked instance back to its cell. Meshes are rebuilt lazily when the
//! world chunk is dirty.

use crate::batch::{BatchKind, InstanceBatch, MaterialState, HIDDEN_TRANSFORM};
use crate::error::RenderError;
use crate::layout::{cell_transform, CellLayout, CenteredLayout};
use std::collections::HashMap;
use voxcel_core::config::RenderSettings;
use voxcel_core::math::zyx_key;
use voxcel_core::types::{ArrayId, CellCoord, ChunkCoord, Lod};
use voxcel_world::occlusion::is_ghosted;
use voxcel_world::{CellArray, CellProvenance, Selection};

/// Render-side mirror of one world chunk.
#[derive(Debug)]
pub struct ChunkMesh {
    pub array_id: ArrayId,
    pub coord: ChunkCoord,
    index_to_cell: Vec<CellCoord>,
    cell_index: HashMap<CellCoord, usize>,
    pub solid: InstanceBatch,
    pub ghost: InstanceBatch,
    pub shell: InstanceBatch,
    current_lod: Option<Lod>,
}

impl ChunkMesh {
    /// Cell drawn by instance `index`.
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        self.index_to_cell.get(index).copied()
    }

    /// Instance index of the cell at `coord`.
    pub fn index_of(&self, coord: CellCoord) -> Option<usize> {
        self.cell_index.get(&coord).copied()
    }

    pub fn index_to_cell(&self) -> &[CellCoord] {
        &self.index_to_cell
    }

    pub fn current_lod(&self) -> Option<Lod> {
        self.current_lod
    }

    pub fn len(&self) -> usize {
        self.index_to_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_cell.is_empty()
    }

    pub fn batch(&self, kind: BatchKind) -> &InstanceBatch {
        match kind {
            BatchKind::Solid => &self.solid,
            BatchKind::Ghost => &self.ghost,
            BatchKind::Shell => &self.shell,
        }
    }

    pub fn batches_mut(&mut self) -> [&mut InstanceBatch; 3] {
        [&mut self.solid, &mut self.ghost, &mut self.shell]
    }

    /// Picking considers the solid batch whenever it is visible. At LOD2 it
    /// draws nothing but still takes rays.
    pub fn is_pickable(&self) -> bool {
        self.solid.visible
    }
}

/// Outcome of syncing one array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub rebuilt: u32,
    pub failed: u32,
    pub dropped: u32,
}

/// Owns every chunk mesh, keyed by array and chunk coordinate. The only
/// writer of instance batches.
pub struct ChunkRenderer {
    settings: RenderSettings,
    layout: Box<dyn CellLayout>,
    meshes: HashMap<(ArrayId, ChunkCoord), ChunkMesh>,
}

impl ChunkRenderer {
    pub fn new(settings: RenderSettings, layout: Box<dyn CellLayout>) -> Self {
        Self {
            settings,
            layout,
            meshes: HashMap::new(),
        }
    }

    pub fn with_centered_layout(settings: RenderSettings) -> Self {
        Self::new(settings, Box::new(CenteredLayout))
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn layout(&self) -> &dyn CellLayout {
        self.layout.as_ref()
    }

    /// Toggle the shell pass. Chunks at LOD1 pick up the change immediately.
    pub fn set_fancy_graphics(&mut self, enabled: bool) {
        self.settings.fancy_graphics = enabled;
        for mesh in self.meshes.values_mut() {
            if mesh.current_lod != Some(Lod::Aggregate) {
                mesh.shell.visible = !enabled;
            }
        }
    }

    pub fn mesh(&self, array: ArrayId, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&(array, coord))
    }

    pub fn mesh_mut(&mut self, array: ArrayId, coord: ChunkCoord) -> Option<&mut ChunkMesh> {
        self.meshes.get_mut(&(array, coord))
    }

    pub fn meshes(&self) -> impl Iterator<Item = &ChunkMesh> {
        self.meshes.values()
    }

    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut ChunkMesh> {
        self.meshes.values_mut()
    }

    pub fn meshes_for(&self, array: ArrayId) -> impl Iterator<Item = &ChunkMesh> {
        self.meshes.values().filter(move |m| m.array_id == array)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn allocate(&self, kind: BatchKind, capacity: usize) -> Result<InstanceBatch, RenderError> {
        InstanceBatch::allocate(
            kind,
            capacity,
            self.settings.max_batch_instances as usize,
            MaterialState::default_for(kind, self.settings.ghost_opacity),
        )
    }

    /// Make sure the chunk at `coord` has batches large enough for its cells
    /// and that they reflect the current cell data. Returns whether a rebuild
    /// happened. A clean chunk with existing batches is left untouched.
    pub fn ensure_batches(
        &mut self,
        array: &mut CellArray,
        coord: ChunkCoord,
        provenance: &dyn CellProvenance,
    ) -> Result<bool, RenderError> {
        let Some(chunk) = array.chunk(&coord) else {
            return Ok(false);
        };
        let key = (array.id, coord);
        if self.meshes.contains_key(&key) && !chunk.is_dirty() {
            return Ok(false);
        }

        let needed = chunk.len().max(1);
        let outgrown = self
            .meshes
            .get(&key)
            .map_or(true, |m| m.solid.capacity() < needed);
        if outgrown {
            let mut solid = self.allocate(BatchKind::Solid, needed)?;
            let mut ghost = self.allocate(BatchKind::Ghost, needed)?;
            let mut shell = self.allocate(BatchKind::Shell, needed)?;
            let previous_lod = self.meshes.get(&key).and_then(|m| m.current_lod);
            if let Some(old) = self.meshes.get(&key) {
                let pairs = [
                    (&mut solid, &old.solid),
                    (&mut ghost, &old.ghost),
                    (&mut shell, &old.shell),
                ];
                for (new, old) in pairs {
                    new.visible = old.visible;
                    new.material = old.material;
                }
            }
            log::debug!(
                "array {}: allocated batches for chunk {:?} with capacity {}",
                array.id,
                coord,
                needed
            );
            self.meshes.insert(
                key,
                ChunkMesh {
                    array_id: array.id,
                    coord,
                    index_to_cell: Vec::new(),
                    cell_index: HashMap::new(),
                    solid,
                    ghost,
                    shell,
                    current_lod: previous_lod,
                },
            );
        }

        self.rebuild(array, coord, provenance);
        if let Some(chunk) = array.chunk_mut(&coord) {
            chunk.clear_dirty();
        }
        Ok(true)
    }

    /// Rewrite order, transforms and colors of an allocated chunk mesh from
    /// the current cells. Does nothing if the mesh has not been allocated.
    pub fn rebuild(
        &mut self,
        array: &CellArray,
        coord: ChunkCoord,
        provenance: &dyn CellProvenance,
    ) {
        let Some(chunk) = array.chunk(&coord) else {
            return;
        };
        let Some(mesh) = self.meshes.get_mut(&(array.id, coord)) else {
            return;
        };

        let mut cells: Vec<_> = chunk.cells().iter().collect();
        cells.sort_by_key(|c| zyx_key(c.coord));

        mesh.index_to_cell.clear();
        mesh.cell_index.clear();
        let fill = self.settings.cell_fill_ratio;
        let palette = &self.settings.palette;

        for (i, cell) in cells.iter().enumerate() {
            mesh.index_to_cell.push(cell.coord);
            mesh.cell_index.insert(cell.coord, i);

            let transform = cell_transform(self.layout.as_ref(), array, cell.coord, fill);
            mesh.solid.set_transform(i, transform);
            mesh.ghost.set_transform(i, HIDDEN_TRANSFORM);
            mesh.shell.set_transform(i, transform);

            let emitted = provenance.is_emitted(array.id, cell.coord);
            let base = cell
                .meta
                .color
                .unwrap_or_else(|| palette.color(cell.color_class(emitted)));
            let solid = base.to_linear();
            mesh.solid.set_color(i, solid);
            mesh.ghost.set_color(i, solid.scale(self.settings.ghost_darken));
            mesh.shell
                .set_color(i, solid.offset_lightness(self.settings.shell_lightness_offset));
        }

        let count = cells.len();
        for batch in mesh.batches_mut() {
            batch.set_count(count);
        }
    }

    /// Switch a chunk between full instancing and the aggregate level. A
    /// dirty chunk is rebuilt first; an unchanged clean chunk is a no-op.
    pub fn set_lod(
        &mut self,
        array: &mut CellArray,
        coord: ChunkCoord,
        level: Lod,
        provenance: &dyn CellProvenance,
    ) -> Result<(), RenderError> {
        let dirty = array.chunk(&coord).is_some_and(|c| c.is_dirty());
        if !dirty
            && self
                .meshes
                .get(&(array.id, coord))
                .is_some_and(|m| m.current_lod == Some(level))
        {
            return Ok(());
        }
        self.ensure_batches(array, coord, provenance)?;

        let fancy = self.settings.fancy_graphics;
        let Some(mesh) = self.meshes.get_mut(&(array.id, coord)) else {
            return Ok(());
        };
        mesh.solid.visible = true;
        match level {
            Lod::Instanced => {
                mesh.solid.material = MaterialState::OPAQUE;
                mesh.ghost.visible = true;
                mesh.shell.visible = !fancy;
            }
            Lod::Aggregate => {
                mesh.solid.material = MaterialState::INVISIBLE;
                mesh.ghost.visible = false;
                mesh.shell.visible = false;
            }
        }
        mesh.current_lod = Some(level);
        Ok(())
    }

    /// Show ghost instances for cells on blocked layers and hide their
    /// shells. Everything else gets a hidden ghost and a visible shell.
    pub fn apply_ghosting(&mut self, array: &CellArray, selection: Option<&Selection>) {
        let layout = self.layout.as_ref();
        for mesh in self.meshes.values_mut().filter(|m| m.array_id == array.id) {
            for i in 0..mesh.index_to_cell.len() {
                let coord = mesh.index_to_cell[i];
                let Some(solid) = mesh.solid.transform(i) else {
                    continue;
                };
                if is_ghosted(array, coord, selection) {
                    mesh.ghost
                        .set_transform(i, cell_transform(layout, array, coord, 1.0));
                    mesh.shell.set_transform(i, HIDDEN_TRANSFORM);
                } else {
                    mesh.ghost.set_transform(i, HIDDEN_TRANSFORM);
                    mesh.shell.set_transform(i, solid);
                }
            }
        }
    }

    /// Bring every chunk of `array` up to date: rebuild dirty chunks, drop
    /// meshes whose chunk is gone, then reapply ghosting. Allocation failures
    /// are logged and leave the chunk's previous state in place.
    pub fn sync_array(
        &mut self,
        array: &mut CellArray,
        provenance: &dyn CellProvenance,
        selection: Option<&Selection>,
    ) -> SyncStats {
        let mut stats = SyncStats::default();
        let id = array.id;

        let before = self.meshes.len();
        self.meshes
            .retain(|(aid, coord), _| *aid != id || array.chunk(coord).is_some());
        stats.dropped = (before - self.meshes.len()) as u32;

        for coord in array.chunks().sorted_coords() {
            match self.ensure_batches(array, coord, provenance) {
                Ok(true) => stats.rebuilt += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!("array {}: chunk {:?} not rebuilt: {}", id, coord, e);
                    stats.failed += 1;
                }
            }
        }

        self.apply_ghosting(array, selection);
        stats
    }

    /// Hide or show every batch of an array without touching LOD state.
    pub fn set_array_visible(&mut self, array: ArrayId, visible: bool) {
        let fancy = self.settings.fancy_graphics;
        for mesh in self.meshes.values_mut().filter(|m| m.array_id == array) {
            mesh.solid.visible = visible;
            let full = mesh.current_lod != Some(Lod::Aggregate);
            mesh.ghost.visible = visible && full;
            mesh.shell.visible = visible && full && !fancy;
        }
    }

    /// Forget every mesh of an array. Returns how many were dropped.
    pub fn remove_array(&mut self, array: ArrayId) -> usize {
        let before = self.meshes.len();
        self.meshes.retain(|(aid, _), _| *aid != array);
        let removed = before - self.meshes.len();
        if removed > 0 {
            log::debug!("array {}: dropped {} chunk meshes", array, removed);
        }
        removed
    }
}
