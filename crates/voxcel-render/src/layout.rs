use glam::{Mat4, Quat, Vec3};
use voxcel_core::types::CellCoord;
use voxcel_world::CellArray;

/// Places cells inside their array frame.
pub trait CellLayout {
    /// Centre of the cell in array-local space.
    fn local_position(&self, array: &CellArray, coord: CellCoord) -> Vec3;

    /// Edge length of one cell in array-local units.
    fn voxel_scale(&self, array: &CellArray) -> f32;
}

/// Array centred on its frame origin, with y and z counted from the far side
/// so that row 0 is on top and layer 0 is nearest the viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenteredLayout;

impl CellLayout for CenteredLayout {
    fn local_position(&self, array: &CellArray, coord: CellCoord) -> Vec3 {
        let s = self.voxel_scale(array);
        let size = array.size.as_vec3();
        let lx = coord.x as f32 - size.x / 2.0 + 0.5;
        let ly = (size.y - 1.0 - coord.y as f32) - size.y / 2.0 + 0.5;
        let lz = (size.z - 1.0 - coord.z as f32) - size.z / 2.0 + 0.5;
        Vec3::new(lx, ly, lz) * s
    }

    fn voxel_scale(&self, array: &CellArray) -> f32 {
        if array.voxel_scale > 0.0 {
            array.voxel_scale
        } else {
            1.0
        }
    }
}

/// Array frame to world: rotation about the frame origin, then translation
/// by the integer offset.
pub fn frame_matrix(array: &CellArray, rotation: Option<Quat>) -> Mat4 {
    Mat4::from_rotation_translation(
        rotation.unwrap_or(Quat::IDENTITY),
        array.offset.as_vec3(),
    )
}

/// Model matrix of one cell instance, scaled by `fill_ratio`.
pub fn cell_transform(
    layout: &dyn CellLayout,
    array: &CellArray,
    coord: CellCoord,
    fill_ratio: f32,
) -> Mat4 {
    let scale = layout.voxel_scale(array) * fill_ratio;
    Mat4::from_scale_rotation_translation(
        Vec3::splat(scale),
        Quat::IDENTITY,
        layout.local_position(array, coord),
    )
}
