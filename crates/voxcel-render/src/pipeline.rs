use crate::batch::BatchKind;
use crate::chunk_renderer::ChunkRenderer;
use crate::gpu::{GpuChunkBuffers, InstanceRaw};
use glam::Mat4;

/// Depth format shared by all voxel passes.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Shell cubes are drawn slightly inflated with front faces culled, leaving
/// a dark rim around each solid cube.
const SHELL_INFLATE: f32 = 1.06;

/// Camera uniforms. Must match Camera in voxel.wgsl.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub params: [f32; 4],
}

impl CameraUniforms {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            params: [SHELL_INFLATE, 0.0, 0.0, 0.0],
        }
    }
}

/// Render pipelines for the solid, ghost and shell passes. All GPU objects
/// are created once at init.
pub struct VoxelPipelines {
    solid: wgpu::RenderPipeline,
    ghost: wgpu::RenderPipeline,
    shell: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl VoxelPipelines {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("voxel-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/voxel.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("voxel-camera"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("voxel-camera-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("voxel-camera-bg"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("voxel-pipeline-layout"),
            bind_group_layouts: &[&camera_bgl],
            push_constant_ranges: &[],
        });

        let build = |label: &str,
                     vs: &str,
                     fs: &str,
                     cull: wgpu::Face,
                     blend: Option<wgpu::BlendState>,
                     depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(vs),
                    buffers: &[InstanceRaw::layout()],
                    compilation_options: Default::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(cull),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                multiview: None,
                cache: None,
            })
        };

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };

        let solid = build("voxel-solid", "vs_main", "fs_solid", wgpu::Face::Back, None, true);
        let ghost = build(
            "voxel-ghost",
            "vs_main",
            "fs_flat",
            wgpu::Face::Back,
            Some(additive),
            false,
        );
        let shell = build("voxel-shell", "vs_shell", "fs_flat", wgpu::Face::Front, None, true);

        log::info!("voxel pipelines created for {:?}", surface_format);

        Self {
            solid,
            ghost,
            shell,
            camera_buffer,
            camera_bind_group,
        }
    }

    pub fn write_camera(&self, queue: &wgpu::Queue, view_proj: Mat4) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms::new(view_proj)),
        );
    }

    /// Draw every visible batch: solids first, then shells, then ghosts.
    /// Batches whose material suppresses color writes are skipped.
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        renderer: &ChunkRenderer,
        buffers: &'a GpuChunkBuffers,
    ) {
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        for (kind, pipeline) in [
            (BatchKind::Solid, &self.solid),
            (BatchKind::Shell, &self.shell),
            (BatchKind::Ghost, &self.ghost),
        ] {
            pass.set_pipeline(pipeline);
            for mesh in renderer.meshes() {
                let batch = mesh.batch(kind);
                if !batch.visible || !batch.material.color_write {
                    continue;
                }
                let Some(gpu) = buffers.get(mesh.array_id, mesh.coord, kind) else {
                    continue;
                };
                if gpu.count == 0 {
                    continue;
                }
                pass.set_vertex_buffer(0, gpu.buffer.slice(..));
                pass.draw(0..36, 0..gpu.count);
            }
        }
    }
}
