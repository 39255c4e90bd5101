pub mod batch;
pub mod chunk_renderer;
pub mod error;
pub mod gpu;
pub mod handles;
pub mod layers;
pub mod layout;
pub mod lod;
pub mod pipeline;

pub use batch::{BatchHit, BatchKind, InstanceBatch, MaterialState};
pub use chunk_renderer::{ChunkMesh, ChunkRenderer, SyncStats};
pub use error::RenderError;
pub use gpu::{GpuChunkBuffers, InstanceRaw};
pub use handles::GrabHandle;
pub use layers::{LayerBatch, LayerKey, LayerKind, LayerRegistry};
pub use layout::{CellLayout, CenteredLayout};
pub use lod::{LodController, LodStats};
pub use pipeline::{CameraUniforms, VoxelPipelines};
