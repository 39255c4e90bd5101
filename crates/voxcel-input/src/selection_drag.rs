use crate::collaborators::{Collaborators, InteractionContext};
use crate::pick::{CandidateFilter, PickResolver, PickView, ResolvedCell};
use crate::pointer::PointerEvent;
use voxcel_core::types::{ArrayId, CellCoord};
use voxcel_world::{ArrayRegistry, CellArray};

/// What a drag-move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMove {
    /// The range now ends at this cell.
    Extended(CellCoord),
    /// Nothing under the pointer; the range was re-applied up to this cell.
    Held(CellCoord),
    /// The event did not change the selection.
    Ignored,
    /// The dragged array no longer exists; nothing was done.
    Aborted,
}

/// Rubber-band range selection inside one array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDrag {
    array: ArrayId,
    start: CellCoord,
    /// Layer the drag started on.
    lock_z: i32,
    /// Start layer came from the 2D view.
    view_lock: bool,
    last_valid: Option<CellCoord>,
    source: String,
}

impl SelectionDrag {
    /// Anchor a drag at `cell`, select it, pulse it and take the pointer
    /// away from the orbit controls.
    pub fn begin(
        array: &CellArray,
        cell: &ResolvedCell,
        source: &str,
        collab: &mut Collaborators,
    ) -> Self {
        let mut start_layer = cell.coord.z;
        let mut view_lock = false;
        if collab.view.last_interaction() == InteractionContext::TwoD {
            if let Some(layer) = collab.view.view_layer() {
                start_layer = layer;
                view_lock = true;
            }
        }
        let start_layer = clamp_layer(start_layer, array.size.z);
        let start = CellCoord::new(cell.coord.x, cell.coord.y, start_layer);

        collab.selection.set_selection(array.id, start, None, source);
        collab
            .placement
            .pulse_cell(array.id, cell.coord, cell.layer.unwrap_or(start_layer));
        collab.placement.suspend_orbit_controls();

        Self {
            array: array.id,
            start,
            lock_z: start_layer,
            view_lock,
            last_valid: None,
            source: source.to_string(),
        }
    }

    pub fn array(&self) -> ArrayId {
        self.array
    }

    pub fn start(&self) -> CellCoord {
        self.start
    }

    pub fn lock_z(&self) -> i32 {
        self.lock_z
    }

    pub fn view_lock(&self) -> bool {
        self.view_lock
    }

    pub fn last_valid(&self) -> Option<CellCoord> {
        self.last_valid
    }

    /// Layer a hit at `depth` maps to, clamped into the array. Hits without
    /// depth stay on the start layer.
    pub fn target_layer(&self, depth: Option<i32>, size_z: i32) -> i32 {
        depth.map_or(self.lock_z, |z| clamp_layer(z, size_z))
    }

    pub fn on_move(
        &mut self,
        event: &PointerEvent,
        resolver: &PickResolver,
        view: &PickView,
        arrays: &ArrayRegistry,
        collab: &mut Collaborators,
    ) -> DragMove {
        let Some(array) = arrays.get(self.array) else {
            return DragMove::Aborted;
        };

        let ray = view.ray(event);
        let hits = resolver.intersect(&ray, view, arrays, collab, CandidateFilter::DRAG_MOVE);
        let Some(hit) = hits.first() else {
            let Some(end) = self.last_valid else {
                return DragMove::Ignored;
            };
            collab
                .selection
                .set_selection_range(self.array, self.start, end, &self.source);
            return DragMove::Held(end);
        };

        let Some(cell) = PickResolver::resolve_cell(hit, view) else {
            return DragMove::Ignored;
        };
        if cell.array != self.array {
            return DragMove::Ignored;
        }
        if !PickResolver::is_interactive(arrays, &cell, collab) {
            log::debug!("drag over ghosted cell {:?} ignored", cell.coord);
            return DragMove::Ignored;
        }

        let layer = self.target_layer(cell.layer, array.size.z);
        let end = CellCoord::new(cell.coord.x, cell.coord.y, layer);
        collab
            .selection
            .set_selection_range(self.array, self.start, end, &self.source);
        self.last_valid = Some(end);
        DragMove::Extended(end)
    }

    /// Release the pointer. The selection stays as it is.
    pub fn on_up(self, collab: &mut Collaborators) {
        collab.placement.resume_orbit_controls();
    }
}

fn clamp_layer(layer: i32, size_z: i32) -> i32 {
    layer.clamp(0, (size_z - 1).max(0))
}
