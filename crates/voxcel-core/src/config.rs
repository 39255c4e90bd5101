//! Engine configuration loaded from RON.
//!
//! Every field has a default, so an empty document `()` is a valid config and
//! callers only spell out what they change.

use crate::color::Palette;
use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Top-level configuration for rendering, LOD and interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub render: RenderSettings,
    pub lod: LodSettings,
    pub interaction: InteractionSettings,
}

/// Chunk batch styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// When on, the shell/outline pass is never drawn.
    pub fancy_graphics: bool,
    pub cell_fill_ratio: f32,
    pub ghost_darken: f32,
    pub shell_lightness_offset: f32,
    pub ghost_opacity: f32,
    /// Upper bound on instances per batch; larger requests fail allocation.
    pub max_batch_instances: u32,
    pub palette: Palette,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fancy_graphics: false,
            cell_fill_ratio: CELL_FILL_RATIO,
            ghost_darken: GHOST_DARKEN_FACTOR,
            shell_lightness_offset: SHELL_LIGHTNESS_OFFSET,
            ghost_opacity: GHOST_OPACITY,
            max_batch_instances: CELLS_PER_CHUNK,
            palette: Palette::default(),
        }
    }
}

/// Level-of-detail selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodSettings {
    pub enabled: bool,
    pub window_radius: i32,
    pub greedy_threshold: u32,
    /// Frames after startup during which every chunk stays at LOD1.
    pub warmup_frames: u32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            window_radius: WINDOW_CHUNK_RADIUS,
            greedy_threshold: INACTIVE_GREEDY_THRESHOLD,
            warmup_frames: 0,
        }
    }
}

/// Picking and dragging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub handle_size: f32,
    pub source_context: String,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            handle_size: GRAB_HANDLE_SIZE,
            source_context: SOURCE_CONTEXT_3D.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from a RON string and validate it.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: EngineConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.render;
        if !(r.cell_fill_ratio > 0.0 && r.cell_fill_ratio <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "render.cell_fill_ratio",
                reason: format!("{} is outside (0, 1]", r.cell_fill_ratio),
            });
        }
        if r.max_batch_instances == 0 {
            return Err(ConfigError::InvalidValue {
                field: "render.max_batch_instances",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.lod.window_radius < 0 {
            return Err(ConfigError::InvalidValue {
                field: "lod.window_radius",
                reason: format!("{} is negative", self.lod.window_radius),
            });
        }
        if self.interaction.handle_size <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "interaction.handle_size",
                reason: format!("{} is not positive", self.interaction.handle_size),
            });
        }
        Ok(())
    }
}
