//! Single source of truth for shared constants.
//! Runtime-tunable values have a matching field in `EngineConfig`; these are
//! the defaults it falls back to.

/// Side length of a chunk in cells.
pub const CHUNK_SIZE: i32 = 16;

/// Maximum number of cells a single chunk can hold (16^3).
pub const CELLS_PER_CHUNK: u32 = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as u32;

/// Fraction of the voxel pitch a drawn cell occupies. The gap keeps
/// neighbouring cells visually separate.
pub const CELL_FILL_RATIO: f32 = 0.9;

/// Multiplier applied to the solid color to derive the ghost tint.
pub const GHOST_DARKEN_FACTOR: f32 = 0.6;

/// HSL lightness offset applied to the solid color for the shell pass.
pub const SHELL_LIGHTNESS_OFFSET: f32 = -0.22;

/// Opacity of the additive ghost pass.
pub const GHOST_OPACITY: f32 = 0.20;

/// Arrays with more cells than this switch distant chunks to LOD2.
pub const INACTIVE_GREEDY_THRESHOLD: u32 = 4096;

/// Chebyshev radius (in chunks) around the focus chunk kept at LOD1.
pub const WINDOW_CHUNK_RADIUS: i32 = 1;

/// Edge length of a grab-handle marker, in voxel units.
pub const GRAB_HANDLE_SIZE: f32 = 0.6;

/// Selection source tag reported to the selection store for 3D picks.
pub const SOURCE_CONTEXT_3D: &str = "3d";

/// Transaction tag used for click actions fired from the 3D view.
pub const CLICK_ACTION_TX_TAG: &str = "onclick.3d";

/// Human-readable transaction description for click actions.
pub const CLICK_ACTION_TX_DESCRIPTION: &str = "Click action (3D)";

/// Prefix of the tag-prefixed base64 click-action encoding.
pub const ACTION_B64_TAG: &str = "B64:";
