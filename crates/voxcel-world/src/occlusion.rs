//! Layer ghosting.
//!
//! An array may carry occlusion metadata naming an axis and a set of blocked
//! layers along it. Cells on a blocked layer are drawn as ghosts and cannot be
//! picked, except on the layer the active selection is focused on.

use crate::array::CellArray;
use crate::selection::Selection;
use std::collections::HashSet;
use voxcel_core::axis::Axis;
use voxcel_core::types::CellCoord;

/// Occlusion metadata computed by the host for one array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcclusionData {
    pub axis: Axis,
    pub blocked_layers: HashSet<i32>,
}

impl OcclusionData {
    pub fn new(axis: Axis, blocked: impl IntoIterator<Item = i32>) -> Self {
        Self {
            axis,
            blocked_layers: blocked.into_iter().collect(),
        }
    }

    pub fn is_blocked(&self, layer: i32) -> bool {
        self.blocked_layers.contains(&layer)
    }
}

/// Layer of `coord` along the array's occlusion axis (Z when unset).
pub fn layer_of(array: &CellArray, coord: CellCoord) -> i32 {
    let axis = array.occlusion.as_ref().map(|o| o.axis).unwrap_or_default();
    axis.of(coord)
}

/// Layer the selection focuses on for this array, if any.
///
/// Only a selection on the same array with a focus set exempts a layer.
pub fn focus_layer(array: &CellArray, selection: Option<&Selection>) -> Option<i32> {
    let sel = selection.filter(|s| s.array_id == array.id)?;
    let focus = sel.focus?;
    Some(layer_of(array, focus))
}

/// Whether the cell at `coord` is ghosted and therefore not interactive.
pub fn is_ghosted(array: &CellArray, coord: CellCoord, selection: Option<&Selection>) -> bool {
    let Some(occ) = array.occlusion.as_ref() else {
        return false;
    };
    let layer = occ.axis.of(coord);
    occ.is_blocked(layer) && focus_layer(array, selection) != Some(layer)
}
