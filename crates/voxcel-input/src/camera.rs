use crate::pointer::{PointerEvent, Viewport};
use glam::{Mat4, Vec3};
use voxcel_core::math::Ray;

/// Anything that can turn a pointer position into a world-space ray.
pub trait PickCamera {
    fn view_proj(&self, viewport: &Viewport) -> Mat4;

    fn ray_through(&self, viewport: &Viewport, pointer: &PointerEvent) -> Ray {
        let inv = self.view_proj(viewport).inverse();
        Ray::from_ndc(inv, viewport.to_ndc(pointer.x, pointer.y))
    }
}

/// Free-orbit camera around a target point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_rad: f32,
    /// While suspended, orbit/pan/zoom input is ignored (a drag owns the
    /// pointer).
    suspended: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 20.0,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: -0.4,
            fov_y_rad: std::f32::consts::FRAC_PI_4,
            suspended: false,
        }
    }

    /// Camera looking straight down -z at `target` from `distance`.
    pub fn facing(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            yaw: 0.0,
            pitch: 0.0,
            ..Self::new()
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        if self.suspended {
            return;
        }
        self.yaw += dx * 0.005;
        self.pitch = (self.pitch - dy * 0.005).clamp(-1.5, 1.5);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.suspended {
            return;
        }
        let eye = self.eye_position();
        let forward = (self.target - eye).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();

        let speed = self.distance * 0.002;
        self.target += right * (-dx * speed) + up * (dy * speed);
    }

    pub fn zoom(&mut self, delta: f32) {
        if self.suspended {
            return;
        }
        self.distance = (self.distance - delta * self.distance * 0.1).clamp(2.0, 500.0);
    }

    /// Re-target the orbit on a world-space point, keeping angles.
    pub fn center_on(&mut self, point: Vec3) {
        self.target = point;
    }
}

impl PickCamera for OrbitCamera {
    fn view_proj(&self, viewport: &Viewport) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y_rad, viewport.aspect(), 0.1, 1000.0);
        proj * view
    }
}
