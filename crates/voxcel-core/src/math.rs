use crate::constants::CHUNK_SIZE;
use crate::types::{CellCoord, ChunkCoord};
use glam::{IVec3, Mat4, Vec2, Vec3};

/// Convert a cell coordinate to its containing chunk coordinate.
pub fn chunk_of(cell: CellCoord) -> ChunkCoord {
    IVec3::new(
        cell.x.div_euclid(CHUNK_SIZE),
        cell.y.div_euclid(CHUNK_SIZE),
        cell.z.div_euclid(CHUNK_SIZE),
    )
}

/// Whether `chunk` lies within a Chebyshev `radius` of `focus`.
pub fn in_chunk_window(chunk: ChunkCoord, focus: ChunkCoord, radius: i32) -> bool {
    let d = (chunk - focus).abs();
    d.x <= radius && d.y <= radius && d.z <= radius
}

/// Round to nearest, ties toward +infinity. Offsets produced by grid snapping
/// must agree with the store, which rounds this way.
pub fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Per-component sign of an integer vector (-1, 0 or 1).
pub fn sign_ivec(v: IVec3) -> IVec3 {
    IVec3::new(v.x.signum(), v.y.signum(), v.z.signum())
}

/// Ordering key for the stable instance order: z, then y, then x.
pub fn zyx_key(c: CellCoord) -> (i32, i32, i32) {
    (c.z, c.y, c.x)
}

/// A half-line in world space. `dir` is not required to be normalized; all
/// `t` values are in units of `dir`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Where a ray entered a box, and through which face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayBoxHit {
    pub t: f32,
    pub point: Vec3,
    /// Outward normal of the face that was crossed.
    pub normal: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Build a ray through a point in normalized device coordinates
    /// (x, y in [-1, 1], +y up) by unprojecting the near and far planes.
    pub fn from_ndc(inv_view_proj: Mat4, ndc: Vec2) -> Self {
        let near = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Self {
            origin: near,
            dir: (far - near).normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Express this ray in the space described by `inverse` (typically the
    /// inverse of an instance model matrix). `t` values are preserved.
    pub fn transformed(&self, inverse: &Mat4) -> Self {
        Self {
            origin: inverse.transform_point3(self.origin),
            dir: inverse.transform_vector3(self.dir),
        }
    }

    /// Slab test against an axis-aligned box.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<RayBoxHit> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_normal = Vec3::ZERO;
        let mut exit_normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.dir[axis];
            if d.abs() < 1e-12 {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t1 = (min[axis] - o) * inv;
            let mut t2 = (max[axis] - o) * inv;
            // Face crossed first is -axis when travelling in +axis
            let mut n1 = Vec3::ZERO;
            n1[axis] = -1.0;
            let mut n2 = Vec3::ZERO;
            n2[axis] = 1.0;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
                std::mem::swap(&mut n1, &mut n2);
            }
            if t1 > t_enter {
                t_enter = t1;
                enter_normal = n1;
            }
            if t2 < t_exit {
                t_exit = t2;
                exit_normal = n2;
            }
            if t_enter > t_exit {
                return None;
            }
        }

        if t_exit < 0.0 {
            return None;
        }
        let (t, normal) = if t_enter >= 0.0 {
            (t_enter, enter_normal)
        } else {
            (t_exit, exit_normal)
        };
        Some(RayBoxHit {
            t,
            point: self.at(t),
            normal,
        })
    }

    /// Intersect with the plane through `point` with normal `normal`.
    /// Returns None for parallel planes and planes behind the origin.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<Vec3> {
        let denom = normal.dot(self.dir);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_of_positive() {
        assert_eq!(chunk_of(IVec3::new(0, 0, 0)), IVec3::ZERO);
        assert_eq!(chunk_of(IVec3::new(15, 15, 15)), IVec3::ZERO);
        assert_eq!(chunk_of(IVec3::new(16, 0, 33)), IVec3::new(1, 0, 2));
    }

    #[test]
    fn test_chunk_of_negative() {
        assert_eq!(chunk_of(IVec3::new(-1, 0, 0)), IVec3::new(-1, 0, 0));
        assert_eq!(chunk_of(IVec3::new(-17, 0, 0)), IVec3::new(-2, 0, 0));
    }

    #[test]
    fn test_chunk_window() {
        let focus = IVec3::new(2, 2, 2);
        assert!(in_chunk_window(IVec3::new(3, 1, 2), focus, 1));
        assert!(!in_chunk_window(IVec3::new(4, 2, 2), focus, 1));
        assert!(in_chunk_window(IVec3::new(4, 2, 2), focus, 2));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(1.4), 1.0);
        assert_eq!(round_half_up(-1.6), -2.0);
    }

    #[test]
    fn test_sign_ivec() {
        assert_eq!(sign_ivec(IVec3::new(5, 0, -3)), IVec3::new(1, 0, -1));
    }

    #[test]
    fn test_ray_hits_box_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = ray
            .intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5))
            .expect("ray should hit");
        assert!((hit.t - 9.5).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
        assert!((hit.point.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_box() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray
            .intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5))
            .is_none());
    }

    #[test]
    fn test_ray_box_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray
            .intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5))
            .is_none());
    }

    #[test]
    fn test_ray_plane() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let p = ray.intersect_plane(Vec3::new(3.0, 1.0, 3.0), Vec3::Y);
        assert_eq!(p, Some(Vec3::new(0.0, 1.0, 0.0)));
        // Parallel
        let flat = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(flat.intersect_plane(Vec3::Y, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_from_ndc_center_looks_forward() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 100.0);
        let ray = Ray::from_ndc((proj * view).inverse(), Vec2::ZERO);
        assert!(ray.dir.z < -0.99, "dir = {:?}", ray.dir);
        assert!(ray.origin.x.abs() < 1e-4 && ray.origin.y.abs() < 1e-4);
    }

    #[test]
    fn test_transformed_preserves_t() {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::IDENTITY,
            Vec3::new(5.0, 0.0, 0.0),
        );
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let local = ray.transformed(&model.inverse());
        let hit = local
            .intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5))
            .expect("hit");
        // Box spans z in [-1, 1] in world space
        assert!((hit.t - 9.0).abs() < 1e-4);
    }
}
