use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for array identifiers handed out by the array store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ArrayId(pub u32);

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cell coordinate inside its array (x, y, z), always non-negative.
pub type CellCoord = IVec3;

/// Chunk coordinate in chunk-space (each unit = CHUNK_SIZE cells).
pub type ChunkCoord = IVec3;

/// Level of detail a chunk is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Lod {
    /// Full per-cell instancing (solid, ghost and shell passes).
    Instanced = 1,
    /// Cheap aggregate representation; the solid batch stays pickable but
    /// draws nothing.
    Aggregate = 2,
}

impl Lod {
    pub fn level(self) -> u8 {
        self as u8
    }
}
