use std::time::Instant;

use glam::{IVec3, Quat, Vec3};
use voxcel_core::config::EngineConfig;
use voxcel_core::types::{ArrayId, CellCoord};
use voxcel_input::pick::CandidateFilter;
use voxcel_input::{
    CellRef, CollaboratorError, Collaborators, CollisionMode, DeletionGuard, FormulaWriter,
    InteractionContext, OffsetUpdate, OrbitCamera, PhysicsMode, PickResolver, PickView,
    PointerEvent, ScenePlacement, SelectionStore, TxId, ViewContext, Viewport,
};
use voxcel_render::{ChunkRenderer, LayerRegistry, LodController};
use voxcel_world::{ArrayRegistry, NoProvenance, Selection};

use crate::scenes::SceneConfig;

/// Pointer samples per pick pass, as a square grid over the viewport.
const PICK_GRID: u32 = 24;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub cells: u32,
    pub chunk_count: u32,
    pub iterations: u32,
    /// Full rebuild of every chunk plus one LOD pass.
    pub rebuild: TimingSeries,
    /// One grid of picks over the viewport.
    pub pick: TimingSeries,
    /// Picks in the last pass that resolved to a cell.
    pub picks_resolved: u32,
}

/// Host stand-in: no physics, no deletions, nothing selected.
#[derive(Default)]
struct NullHost {
    selection: Option<Selection>,
}

impl ScenePlacement for NullHost {
    fn set_array_offset(&mut self, _array: ArrayId, _offset: IVec3, _update: OffsetUpdate) {}

    fn settle_after_drag(
        &mut self,
        _array: ArrayId,
        _direction: IVec3,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn suspend_orbit_controls(&mut self) {}

    fn resume_orbit_controls(&mut self) {}

    fn center_on_array(&mut self, _array: ArrayId) {}

    fn pulse_cell(&mut self, _array: ArrayId, _coord: CellCoord, _layer: i32) {}

    fn array_rotation(&self, _array: ArrayId) -> Option<Quat> {
        None
    }
}

impl FormulaWriter for NullHost {
    fn begin_transaction(&mut self, _tag: &str, _description: &str) -> TxId {
        TxId(0)
    }

    fn run_once_at(
        &mut self,
        _anchor: CellRef,
        _formula: &str,
        _tx: TxId,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn commit(&mut self, _tx: TxId) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

impl SelectionStore for NullHost {
    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(
        &mut self,
        array: ArrayId,
        anchor: CellCoord,
        focus: Option<CellCoord>,
        _source: &str,
    ) {
        self.selection = Some(Selection {
            array_id: array,
            anchor,
            focus,
        });
    }

    fn set_selection_range(
        &mut self,
        array: ArrayId,
        start: CellCoord,
        end: CellCoord,
        _source: &str,
    ) {
        self.selection = Some(Selection::range(array, start, end));
    }
}

impl PhysicsMode for NullHost {
    fn is_active(&self) -> bool {
        false
    }

    fn debug_all(&self) -> bool {
        false
    }

    fn collision_mode(&self, _array: ArrayId, _coord: CellCoord, _debug: bool) -> CollisionMode {
        CollisionMode::Physics
    }

    fn exit_physics_mode(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

impl DeletionGuard for NullHost {
    fn is_locked(&self) -> bool {
        false
    }

    fn is_deleting(&self, _array: ArrayId) -> bool {
        false
    }
}

impl ViewContext for NullHost {
    fn last_interaction(&self) -> InteractionContext {
        InteractionContext::ThreeD
    }

    fn view_layer(&self) -> Option<i32> {
        None
    }
}

/// Runs CPU-side rebuild and picking benchmarks.
pub struct BenchmarkRunner {
    config: EngineConfig,
    iterations: u32,
}

impl BenchmarkRunner {
    pub fn new(config: EngineConfig, iterations: u32) -> Self {
        Self {
            config,
            iterations: iterations.max(1),
        }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, scene: &SceneConfig) -> BenchmarkResult {
        log::info!("Running scene '{}'...", scene.name);

        let mut registry = crate::scenes::build_registry(scene);
        let (_, chunk_count, cells) = registry.counts();
        log::info!("  Populated {} cells across {} chunks", cells, chunk_count);

        let mut renderer = ChunkRenderer::with_centered_layout(self.config.render.clone());
        let mut lod = LodController::new(self.config.lod.clone());
        let layers = LayerRegistry::new();

        let mut rebuild_times = Vec::with_capacity(self.iterations as usize);
        for _ in 0..self.iterations {
            for arr in registry.iter_mut() {
                arr.mark_all_dirty();
            }
            let start = Instant::now();
            for arr in registry.iter_mut() {
                let stats = renderer.sync_array(arr, &NoProvenance, None);
                if stats.failed > 0 {
                    log::warn!("  {} chunks of {} failed to rebuild", stats.failed, arr.id);
                }
            }
            lod.update(&mut renderer, &mut registry, None, &NoProvenance);
            rebuild_times.push(start.elapsed().as_secs_f64() * 1000.0);
        }

        let resolver = PickResolver::new(self.config.interaction.clone());
        let viewport = Viewport::new(640.0, 480.0);
        let camera = scene_camera(&registry, &renderer);
        let view = PickView {
            camera: &camera,
            viewport,
            renderer: &renderer,
            layers: &layers,
        };
        let mut placement = NullHost::default();
        let mut formulas = NullHost::default();
        let mut selection = NullHost::default();
        let mut physics = NullHost::default();
        let host = NullHost::default();
        let collab = Collaborators {
            placement: &mut placement,
            formulas: &mut formulas,
            selection: &mut selection,
            physics: &mut physics,
            deletion: &host,
            view: &host,
        };

        let mut pick_times = Vec::with_capacity(self.iterations as usize);
        let mut picks_resolved = 0;
        for _ in 0..self.iterations {
            picks_resolved = 0;
            let start = Instant::now();
            for gy in 0..PICK_GRID {
                for gx in 0..PICK_GRID {
                    let event = PointerEvent::at(
                        (gx as f32 + 0.5) / PICK_GRID as f32 * viewport.width,
                        (gy as f32 + 0.5) / PICK_GRID as f32 * viewport.height,
                    );
                    let ray = view.ray(&event);
                    let hits =
                        resolver.intersect(&ray, &view, &registry, &collab, CandidateFilter::DRAG_MOVE);
                    if PickResolver::select_hit(&hits)
                        .and_then(|h| PickResolver::resolve_cell(h, &view))
                        .is_some()
                    {
                        picks_resolved += 1;
                    }
                }
            }
            pick_times.push(start.elapsed().as_secs_f64() * 1000.0);
        }

        let rebuild = compute_timings(&rebuild_times);
        let pick = compute_timings(&pick_times);
        log::info!(
            "  Done: rebuild mean={:.2}ms, pick mean={:.2}ms ({} of {} resolved)",
            rebuild.mean_ms,
            pick.mean_ms,
            picks_resolved,
            PICK_GRID * PICK_GRID
        );

        BenchmarkResult {
            scene_name: scene.name.to_string(),
            cells,
            chunk_count,
            iterations: self.iterations,
            rebuild,
            pick,
            picks_resolved,
        }
    }
}

/// Camera looking at the middle of all arrays from far enough to see them.
fn scene_camera(registry: &ArrayRegistry, renderer: &ChunkRenderer) -> OrbitCamera {
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for arr in registry.iter() {
        let half = arr.size.as_vec3() * renderer.layout().voxel_scale(arr) * 0.5;
        let center = arr.offset.as_vec3();
        min = min.min(center - half);
        max = max.max(center + half);
    }
    if registry.is_empty() {
        return OrbitCamera::new();
    }
    let target = (min + max) * 0.5;
    let extent = (max - min).max_element();
    let mut camera = OrbitCamera::facing(target, extent * 1.5 + 5.0);
    camera.yaw = 0.3;
    camera.pitch = -0.3;
    camera
}

/// Compute timing statistics from a list of samples in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
