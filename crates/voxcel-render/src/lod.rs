use crate::chunk_renderer::ChunkRenderer;
use voxcel_core::config::LodSettings;
use voxcel_core::math::{chunk_of, in_chunk_window};
use voxcel_core::types::{ArrayId, CellCoord, ChunkCoord, Lod};
use voxcel_world::{ArrayRegistry, CellArray, CellProvenance};

/// Per-frame tally of LOD assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LodStats {
    pub instanced: u32,
    pub aggregate: u32,
    pub failed: u32,
}

/// Chooses, per chunk, between full instancing and the aggregate level.
///
/// Small arrays always stay fully instanced. Large arrays keep full detail
/// only in a window of chunks around the focused cell.
pub struct LodController {
    settings: LodSettings,
    warmup_remaining: u32,
}

impl LodController {
    pub fn new(settings: LodSettings) -> Self {
        let warmup_remaining = settings.warmup_frames;
        Self {
            settings,
            warmup_remaining,
        }
    }

    pub fn settings(&self) -> &LodSettings {
        &self.settings
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
    }

    pub fn warmup_remaining(&self) -> u32 {
        self.warmup_remaining
    }

    /// Level for one chunk. `focus` is the focused chunk of this array, if the
    /// focus lies in it.
    pub fn choose(&self, array: &CellArray, chunk: ChunkCoord, focus: Option<ChunkCoord>) -> Lod {
        if !self.settings.enabled || self.warmup_remaining > 0 {
            return Lod::Instanced;
        }
        if array.cell_count() <= self.settings.greedy_threshold {
            return Lod::Instanced;
        }
        match focus {
            Some(f) if in_chunk_window(chunk, f, self.settings.window_radius) => Lod::Instanced,
            _ => Lod::Aggregate,
        }
    }

    /// Apply the chosen level to every chunk of every visible array, and hide
    /// the batches of hidden arrays.
    pub fn update(
        &mut self,
        renderer: &mut ChunkRenderer,
        registry: &mut ArrayRegistry,
        focus: Option<(ArrayId, CellCoord)>,
        provenance: &dyn CellProvenance,
    ) -> LodStats {
        let mut stats = LodStats::default();

        for array in registry.iter_mut() {
            if array.hidden {
                renderer.set_array_visible(array.id, false);
                continue;
            }
            renderer.set_array_visible(array.id, true);
            let focus_chunk = focus
                .filter(|(id, _)| *id == array.id)
                .map(|(_, cell)| chunk_of(cell));

            for coord in array.chunks().sorted_coords() {
                let level = self.choose(array, coord, focus_chunk);
                match renderer.set_lod(array, coord, level, provenance) {
                    Ok(()) => match level {
                        Lod::Instanced => stats.instanced += 1,
                        Lod::Aggregate => stats.aggregate += 1,
                    },
                    Err(e) => {
                        log::warn!("array {}: LOD change for {:?} failed: {}", array.id, coord, e);
                        stats.failed += 1;
                    }
                }
            }
        }

        self.warmup_remaining = self.warmup_remaining.saturating_sub(1);
        stats
    }
}
