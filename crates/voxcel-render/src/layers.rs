//! Per-layer batches, one per (array, z, kind).
//!
//! This is the older draw path for arrays that are not chunked: each z layer
//! is split into one batch per cell kind. Ghost layers hold cells on blocked
//! layers and are never pickable.

use crate::batch::{BatchKind, InstanceBatch, MaterialState};
use crate::error::RenderError;
use crate::layout::{cell_transform, CellLayout};
use std::collections::{BTreeMap, HashMap};
use voxcel_core::color::{ColorClass, Rgb};
use voxcel_core::config::RenderSettings;
use voxcel_core::types::{ArrayId, CellCoord};
use voxcel_world::occlusion::is_ghosted;
use voxcel_world::{CellArray, CellProvenance, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Empty,
    Filled,
    Formula,
    Ghost,
}

impl LayerKind {
    fn of(class: ColorClass) -> Self {
        match class {
            ColorClass::Formula => LayerKind::Formula,
            ColorClass::Emitted | ColorClass::Value => LayerKind::Filled,
            ColorClass::Empty => LayerKind::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerKey {
    pub array: ArrayId,
    pub z: i32,
    pub kind: LayerKind,
}

#[derive(Debug)]
pub struct LayerBatch {
    pub key: LayerKey,
    pub batch: InstanceBatch,
    index_to_cell: Vec<CellCoord>,
}

impl LayerBatch {
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        self.index_to_cell.get(index).copied()
    }

    pub fn is_ghost(&self) -> bool {
        self.key.kind == LayerKind::Ghost
    }

    pub fn is_pickable(&self) -> bool {
        self.batch.visible && !self.is_ghost()
    }
}

#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: HashMap<LayerKey, LayerBatch>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &LayerKey) -> Option<&LayerBatch> {
        self.layers.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerBatch> {
        self.layers.values()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Replace every layer batch of `array` from its current cells. Returns
    /// the number of batches built. On failure the previous batches of the
    /// array are kept.
    pub fn rebuild_array(
        &mut self,
        array: &CellArray,
        layout: &dyn CellLayout,
        provenance: &dyn CellProvenance,
        selection: Option<&Selection>,
        settings: &RenderSettings,
    ) -> Result<usize, RenderError> {
        let mut groups: BTreeMap<LayerKey, Vec<(CellCoord, Rgb)>> = BTreeMap::new();
        for (_, chunk) in array.chunks().iter() {
            for cell in chunk.cells() {
                let (kind, color) = if is_ghosted(array, cell.coord, selection) {
                    (LayerKind::Ghost, Rgb::from_hex(settings.palette.ghost))
                } else {
                    let class = cell.color_class(provenance.is_emitted(array.id, cell.coord));
                    let color = cell
                        .meta
                        .color
                        .unwrap_or_else(|| settings.palette.color(class));
                    (LayerKind::of(class), color)
                };
                let key = LayerKey {
                    array: array.id,
                    z: cell.coord.z,
                    kind,
                };
                groups.entry(key).or_default().push((cell.coord, color.to_linear()));
            }
        }

        let mut built = HashMap::with_capacity(groups.len());
        for (key, mut cells) in groups {
            cells.sort_by_key(|(c, _)| (c.y, c.x));
            let (batch_kind, material) = if key.kind == LayerKind::Ghost {
                (BatchKind::Ghost, MaterialState::ghost(settings.ghost_opacity))
            } else {
                (BatchKind::Solid, MaterialState::OPAQUE)
            };
            let mut batch = InstanceBatch::allocate(
                batch_kind,
                cells.len(),
                settings.max_batch_instances as usize,
                material,
            )?;
            for (i, (coord, color)) in cells.iter().enumerate() {
                batch.set_transform(
                    i,
                    cell_transform(layout, array, *coord, settings.cell_fill_ratio),
                );
                batch.set_color(i, *color);
            }
            batch.set_count(cells.len());
            batch.visible = !array.hidden;
            built.insert(
                key,
                LayerBatch {
                    key,
                    batch,
                    index_to_cell: cells.into_iter().map(|(c, _)| c).collect(),
                },
            );
        }

        self.remove_array(array.id);
        let count = built.len();
        self.layers.extend(built);
        Ok(count)
    }

    pub fn remove_array(&mut self, array: ArrayId) -> usize {
        let before = self.layers.len();
        self.layers.retain(|key, _| key.array != array);
        before - self.layers.len()
    }
}
