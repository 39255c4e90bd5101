use crate::layout::{frame_matrix, CellLayout};
use glam::{Mat4, Quat, Vec3};
use voxcel_core::color::Rgb;
use voxcel_core::math::{Ray, RayBoxHit};
use voxcel_core::types::ArrayId;
use voxcel_world::CellArray;

/// Pickable cube used to drag a whole array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabHandle {
    pub array_id: ArrayId,
    /// World-space centre.
    pub center: Vec3,
    pub size: f32,
    pub visible: bool,
}

impl GrabHandle {
    /// Handle for `array`, sitting just outside the top-left-front corner of
    /// its cell block. The centre goes through the same frame as the cells;
    /// the cube itself stays axis-aligned.
    pub fn for_array(
        array: &CellArray,
        layout: &dyn CellLayout,
        rotation: Option<Quat>,
        size: f32,
    ) -> Self {
        let half = array.size.as_vec3() * layout.voxel_scale(array) * 0.5;
        let local = Vec3::new(-half.x - size * 0.5, half.y + size * 0.5, half.z);
        Self {
            array_id: array.id,
            center: frame_matrix(array, rotation).transform_point3(local),
            size,
            visible: !array.hidden,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - Vec3::splat(self.size * 0.5)
    }

    pub fn max(&self) -> Vec3 {
        self.center + Vec3::splat(self.size * 0.5)
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.size),
            Quat::IDENTITY,
            self.center,
        )
    }

    pub fn color(&self, grab_hex: u32) -> Rgb {
        Rgb::from_hex(grab_hex).to_linear()
    }

    pub fn raycast(&self, ray: &Ray) -> Option<RayBoxHit> {
        if !self.visible {
            return None;
        }
        ray.intersect_aabb(self.min(), self.max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CenteredLayout;
    use glam::IVec3;

    #[test]
    fn test_handle_follows_offset() {
        let mut arr = CellArray::new(ArrayId(2), IVec3::splat(3));
        let a = GrabHandle::for_array(&arr, &CenteredLayout, None, 0.6);
        arr.offset = IVec3::new(5, 0, 0);
        let b = GrabHandle::for_array(&arr, &CenteredLayout, None, 0.6);
        assert!((b.center - a.center - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        assert!((a.center - Vec3::new(-1.8, 1.8, 1.5)).length() < 1e-5);
    }

    #[test]
    fn test_hidden_handle_is_not_hit() {
        let mut arr = CellArray::new(ArrayId(2), IVec3::splat(3));
        let handle = GrabHandle::for_array(&arr, &CenteredLayout, None, 0.6);
        let ray = Ray::new(handle.center + Vec3::Z * 10.0, Vec3::NEG_Z);
        let hit = handle.raycast(&ray).expect("hit");
        assert_eq!(hit.normal, Vec3::Z);

        arr.hidden = true;
        let hidden = GrabHandle::for_array(&arr, &CenteredLayout, None, 0.6);
        assert!(hidden.raycast(&ray).is_none());
    }

    #[test]
    fn test_handle_follows_rotation() {
        let mut arr = CellArray::new(ArrayId(2), IVec3::splat(3));
        arr.offset = IVec3::new(4, 0, 0);
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let handle = GrabHandle::for_array(&arr, &CenteredLayout, Some(rotation), 0.6);
        assert!((handle.center - Vec3::new(5.5, 1.8, 1.8)).length() < 1e-5);
    }
}
