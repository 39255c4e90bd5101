pub mod axis;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod types;

pub use axis::Axis;
pub use color::{ColorClass, Palette, Rgb};
pub use config::EngineConfig;
pub use error::ConfigError;
pub use math::Ray;
pub use types::{ArrayId, CellCoord, ChunkCoord, Lod};
