//! CPU-side instanced draw batches.
//!
//! A batch holds one transform and one linear color per instance. Only the
//! first `count` slots are drawn or picked. Writes set upload flags that the
//! GPU layer consumes.

use crate::error::RenderError;
use glam::{Mat4, Vec3, Vec4};
use voxcel_core::color::Rgb;
use voxcel_core::math::Ray;

/// Which pass a batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Solid,
    Ghost,
    Shell,
}

/// Blend and depth state of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialState {
    pub transparent: bool,
    pub opacity: f32,
    pub color_write: bool,
    pub depth_write: bool,
}

impl MaterialState {
    pub const OPAQUE: MaterialState = MaterialState {
        transparent: false,
        opacity: 1.0,
        color_write: true,
        depth_write: true,
    };

    /// Present for picking, draws nothing.
    pub const INVISIBLE: MaterialState = MaterialState {
        transparent: true,
        opacity: 0.0,
        color_write: false,
        depth_write: false,
    };

    pub fn ghost(opacity: f32) -> Self {
        Self {
            transparent: true,
            opacity,
            color_write: true,
            depth_write: false,
        }
    }

    pub fn default_for(kind: BatchKind, ghost_opacity: f32) -> Self {
        match kind {
            BatchKind::Ghost => Self::ghost(ghost_opacity),
            BatchKind::Solid | BatchKind::Shell => Self::OPAQUE,
        }
    }
}

/// Pending GPU work for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadFlags {
    pub transforms: bool,
    pub colors: bool,
}

impl UploadFlags {
    pub fn any(self) -> bool {
        self.transforms || self.colors
    }
}

/// Nearest instance hit by a ray, in the space the ray was given in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchHit {
    pub instance: usize,
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Zero-scale transform that hides an instance.
pub const HIDDEN_TRANSFORM: Mat4 = Mat4::from_cols(Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::W);

#[derive(Debug, Clone)]
pub struct InstanceBatch {
    kind: BatchKind,
    transforms: Vec<Mat4>,
    colors: Vec<Rgb>,
    count: usize,
    pub visible: bool,
    pub material: MaterialState,
    upload: UploadFlags,
}

impl InstanceBatch {
    /// Allocate a batch with room for `capacity` instances.
    pub fn allocate(
        kind: BatchKind,
        capacity: usize,
        limit: usize,
        material: MaterialState,
    ) -> Result<Self, RenderError> {
        if capacity > limit {
            return Err(RenderError::BatchAllocation {
                requested: capacity,
                reason: format!("limit is {limit}"),
            });
        }
        let mut transforms = Vec::new();
        transforms
            .try_reserve_exact(capacity)
            .map_err(|e| RenderError::BatchAllocation {
                requested: capacity,
                reason: e.to_string(),
            })?;
        let mut colors = Vec::new();
        colors
            .try_reserve_exact(capacity)
            .map_err(|e| RenderError::BatchAllocation {
                requested: capacity,
                reason: e.to_string(),
            })?;
        transforms.resize(capacity, HIDDEN_TRANSFORM);
        colors.resize(capacity, Rgb::WHITE);

        Ok(Self {
            kind,
            transforms,
            colors,
            count: 0,
            visible: true,
            material,
            upload: UploadFlags::default(),
        })
    }

    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Set the drawn instance count. Clamped to capacity.
    pub fn set_count(&mut self, count: usize) {
        self.count = count.min(self.capacity());
        self.upload.transforms = true;
    }

    pub fn transform(&self, index: usize) -> Option<Mat4> {
        self.transforms.get(index).copied()
    }

    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms[..self.count]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors[..self.count]
    }

    pub fn set_transform(&mut self, index: usize, transform: Mat4) {
        if let Some(slot) = self.transforms.get_mut(index) {
            *slot = transform;
            self.upload.transforms = true;
        }
    }

    pub fn set_color(&mut self, index: usize, color: Rgb) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color;
            self.upload.colors = true;
        }
    }

    pub fn is_hidden(&self, index: usize) -> bool {
        self.transforms
            .get(index)
            .map_or(true, is_collapsed)
    }

    pub fn upload_flags(&self) -> UploadFlags {
        self.upload
    }

    /// Take the pending flags, leaving them cleared.
    pub fn take_upload_flags(&mut self) -> UploadFlags {
        std::mem::take(&mut self.upload)
    }

    /// Nearest drawn instance hit by `ray`. Instances are unit cubes centred
    /// on their transform; zero-scale instances are skipped.
    pub fn raycast(&self, ray: &Ray) -> Option<BatchHit> {
        let mut best: Option<BatchHit> = None;
        for (instance, model) in self.transforms[..self.count].iter().enumerate() {
            if is_collapsed(model) {
                continue;
            }
            let inverse = model.inverse();
            let local = ray.transformed(&inverse);
            let Some(hit) = local.intersect_aabb(Vec3::splat(-0.5), Vec3::splat(0.5)) else {
                continue;
            };
            if best.is_some_and(|b| b.t <= hit.t) {
                continue;
            }
            let normal = inverse
                .transpose()
                .transform_vector3(hit.normal)
                .normalize_or_zero();
            best = Some(BatchHit {
                instance,
                t: hit.t,
                point: ray.at(hit.t),
                normal,
            });
        }
        best
    }
}

/// An instance is hidden when any basis axis has been scaled to exactly zero.
fn is_collapsed(model: &Mat4) -> bool {
    [model.x_axis, model.y_axis, model.z_axis]
        .iter()
        .any(|axis| axis.truncate() == Vec3::ZERO)
}
