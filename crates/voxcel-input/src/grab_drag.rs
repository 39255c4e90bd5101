use crate::collaborators::{Collaborators, OffsetUpdate};
use crate::pick::{PickHit, PickView};
use crate::pointer::PointerEvent;
use glam::{IVec3, Vec3};
use voxcel_core::axis::Axis;
use voxcel_core::math::{round_half_up, sign_ivec, Ray};
use voxcel_core::types::ArrayId;
use voxcel_world::ArrayRegistry;

/// Snap a raw frame position so that the array's cells land on the integer
/// grid. A frame with an even extent lands on a half cell.
pub fn snap_axis(axis: Axis, size: i32, raw: f32) -> f32 {
    let half = size as f32 / 2.0;
    let base = match axis {
        Axis::X | Axis::Y => -half + 0.5,
        Axis::Z => half - 0.5,
    };
    round_half_up(raw + base) - base
}

/// Snapped integer offset for a drag that moved `delta` from `start_offset`
/// across the plane with normal `locked`. The locked axis keeps its start
/// value, and a zero delta returns `start_offset`.
///
/// The layout already puts the cells of an even extent on half cells, so an
/// integer offset keeps them on the grid and even axes round the raw offset
/// directly.
pub fn snapped_offset(start_offset: IVec3, size: IVec3, locked: Axis, delta: Vec3) -> IVec3 {
    let raw = start_offset.as_vec3() + delta;
    let mut offset = start_offset;
    for axis in locked.complement() {
        let extent = axis.of(size);
        let component = axis.of_f32(raw);
        let snapped = if extent % 2 == 0 {
            round_half_up(component)
        } else {
            snap_axis(axis, extent, component)
        };
        let value = round_half_up(snapped) as i32;
        match axis {
            Axis::X => offset.x = value,
            Axis::Y => offset.y = value,
            Axis::Z => offset.z = value,
        }
    }
    offset
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabPhase {
    Dragging,
    Settling,
    Idle,
}

/// Moving a whole array by its grab handle, constrained to the plane of the
/// face that was grabbed.
#[derive(Debug, Clone, PartialEq)]
pub struct GrabDrag {
    array: ArrayId,
    start_offset: IVec3,
    plane_normal: Axis,
    plane_point: Vec3,
    start_point: Vec3,
    phase: GrabPhase,
}

impl GrabDrag {
    pub fn begin(
        array: ArrayId,
        hit: &PickHit,
        ray: &Ray,
        arrays: &ArrayRegistry,
        collab: &mut Collaborators,
    ) -> Option<Self> {
        let arr = arrays.get(array)?;
        let plane_normal = Axis::dominant(hit.normal);
        let start_point = ray
            .intersect_plane(hit.point, plane_normal.unit())
            .unwrap_or(hit.point);
        collab.placement.suspend_orbit_controls();
        log::debug!("grab {} on {:?} plane", array, plane_normal);
        Some(Self {
            array,
            start_offset: arr.offset,
            plane_normal,
            plane_point: hit.point,
            start_point,
            phase: GrabPhase::Dragging,
        })
    }

    pub fn array(&self) -> ArrayId {
        self.array
    }

    pub fn start_offset(&self) -> IVec3 {
        self.start_offset
    }

    pub fn plane_normal(&self) -> Axis {
        self.plane_normal
    }

    pub fn phase(&self) -> GrabPhase {
        self.phase
    }

    /// Offset the array should take for a pointer ray, or `None` when the
    /// ray misses the drag plane.
    pub fn offset_for(&self, ray: &Ray, size: IVec3) -> Option<IVec3> {
        let point = ray.intersect_plane(self.plane_point, self.plane_normal.unit())?;
        Some(snapped_offset(
            self.start_offset,
            size,
            self.plane_normal,
            point - self.start_point,
        ))
    }

    /// Follow the pointer. Returns the new offset, if one was applied.
    pub fn on_move(
        &mut self,
        event: &PointerEvent,
        view: &PickView,
        arrays: &mut ArrayRegistry,
        collab: &mut Collaborators,
    ) -> Option<IVec3> {
        if self.phase != GrabPhase::Dragging {
            return None;
        }
        let arr = arrays.get_mut(self.array)?;
        let offset = self.offset_for(&view.ray(event), arr.size)?;
        arr.offset = offset;
        collab
            .placement
            .set_array_offset(self.array, offset, OffsetUpdate::Interactive);
        Some(offset)
    }

    /// Release: let the host settle the array, then record the new timed
    /// placement base. Host failures are logged and otherwise ignored.
    pub fn on_up(&mut self, arrays: &mut ArrayRegistry, collab: &mut Collaborators) {
        collab.placement.resume_orbit_controls();
        self.phase = GrabPhase::Settling;

        if let Some(arr) = arrays.get(self.array) {
            let direction = sign_ivec(arr.offset - self.start_offset);
            if let Err(e) = collab.placement.settle_after_drag(self.array, direction) {
                log::debug!("settle after grab of {} failed: {}", self.array, e);
            }
        }

        let rotation = collab.placement.array_rotation(self.array);
        if let Some(arr) = arrays.get_mut(self.array) {
            let offset = arr.offset;
            if let Some(timed) = arr.timed.as_mut() {
                timed.base_offset = offset;
                if rotation.is_some() {
                    timed.base_rotation = rotation;
                }
            }
        }
        self.phase = GrabPhase::Idle;
    }
}
