use glam::IVec3;
use voxcel_core::types::{ArrayId, CellCoord};

/// The active cell selection on one array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub array_id: ArrayId,
    pub anchor: CellCoord,
    pub focus: Option<CellCoord>,
}

impl Selection {
    pub fn single(array_id: ArrayId, anchor: CellCoord) -> Self {
        Self {
            array_id,
            anchor,
            focus: None,
        }
    }

    pub fn range(array_id: ArrayId, anchor: CellCoord, focus: CellCoord) -> Self {
        Self {
            array_id,
            anchor,
            focus: Some(focus),
        }
    }

    /// Inclusive (min, max) box spanned by anchor and focus.
    pub fn bounds(&self) -> (IVec3, IVec3) {
        let focus = self.focus.unwrap_or(self.anchor);
        (self.anchor.min(focus), self.anchor.max(focus))
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        let (min, max) = self.bounds();
        coord.cmpge(min).all() && coord.cmple(max).all()
    }
}
