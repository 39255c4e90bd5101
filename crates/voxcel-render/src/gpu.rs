use crate::batch::{BatchKind, InstanceBatch};
use crate::chunk_renderer::ChunkRenderer;
use glam::Mat4;
use std::collections::HashMap;
use voxcel_core::types::{ArrayId, ChunkCoord};

/// One instance as uploaded to the GPU. Must match InstanceInput in voxel.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Pack the drawn instances of a batch into world space using the array
/// `frame`. Alpha carries the material opacity.
pub fn pack_batch(batch: &InstanceBatch, frame: Mat4) -> Vec<InstanceRaw> {
    let alpha = batch.material.opacity;
    batch
        .transforms()
        .iter()
        .zip(batch.colors())
        .map(|(m, c)| InstanceRaw {
            model: (frame * *m).to_cols_array_2d(),
            color: [c.r, c.g, c.b, alpha],
        })
        .collect()
}

/// GPU vertex buffer backing one batch.
pub struct GpuBatch {
    pub buffer: wgpu::Buffer,
    capacity: usize,
    frame: Mat4,
    pub count: u32,
}

/// GPU buffers for every chunk mesh, one per batch kind. Buffers are
/// re-created only when a batch outgrows them.
#[derive(Default)]
pub struct GpuChunkBuffers {
    buffers: HashMap<(ArrayId, ChunkCoord, BatchKind), GpuBatch>,
}

impl GpuChunkBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, array: ArrayId, coord: ChunkCoord, kind: BatchKind) -> Option<&GpuBatch> {
        self.buffers.get(&(array, coord, kind))
    }

    /// Write every batch with pending upload flags, or whose array frame
    /// moved since the last upload, then clear the flags. `frame_of` maps an
    /// array to its frame-to-world matrix. Returns the number of batches
    /// written.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        renderer: &mut ChunkRenderer,
        frame_of: &dyn Fn(ArrayId) -> Mat4,
    ) -> u32 {
        let mut written = 0;
        for mesh in renderer.meshes_mut() {
            let (array, coord) = (mesh.array_id, mesh.coord);
            let frame = frame_of(array);
            for batch in mesh.batches_mut() {
                let key = (array, coord, batch.kind());
                let moved = self.buffers.get(&key).is_some_and(|b| b.frame != frame);
                if !batch.take_upload_flags().any() && !moved {
                    continue;
                }
                let needed = batch.capacity();
                let entry = self
                    .buffers
                    .entry(key)
                    .or_insert_with(|| create_batch_buffer(device, needed));
                if entry.capacity < needed {
                    *entry = create_batch_buffer(device, needed);
                }
                entry.frame = frame;
                let data = pack_batch(batch, frame);
                if !data.is_empty() {
                    queue.write_buffer(&entry.buffer, 0, bytemuck::cast_slice(&data));
                }
                entry.count = data.len() as u32;
                written += 1;
            }
        }
        written
    }

    /// Release buffers of meshes the renderer no longer has.
    pub fn retain_live(&mut self, renderer: &ChunkRenderer) {
        self.buffers
            .retain(|(array, coord, _), _| renderer.mesh(*array, *coord).is_some());
    }
}

fn create_batch_buffer(device: &wgpu::Device, capacity: usize) -> GpuBatch {
    let size = (capacity.max(1) * std::mem::size_of::<InstanceRaw>()) as u64;
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("chunk-instances"),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    GpuBatch {
        buffer,
        capacity: capacity.max(1),
        frame: Mat4::IDENTITY,
        count: 0,
    }
}
