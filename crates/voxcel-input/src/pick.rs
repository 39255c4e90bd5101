//! Ray picking against chunk batches, legacy layer batches and grab handles.
//!
//! Batches are built in array-local space, so the world ray is taken into
//! each array's frame before testing. Rigid frames keep `t` comparable across
//! arrays.

use crate::action::decode_click_action;
use crate::camera::PickCamera;
use crate::collaborators::{CellRef, CollisionMode, Collaborators, ScenePlacement};
use crate::grab_drag::GrabDrag;
use crate::pointer::{PointerEvent, Viewport};
use crate::selection_drag::SelectionDrag;
use glam::{Mat4, Vec3};
use std::collections::HashMap;
use voxcel_core::config::InteractionSettings;
use voxcel_core::constants::{CLICK_ACTION_TX_DESCRIPTION, CLICK_ACTION_TX_TAG};
use voxcel_core::math::Ray;
use voxcel_core::types::{ArrayId, CellCoord, ChunkCoord};
use voxcel_render::layout::frame_matrix;
use voxcel_render::{ChunkRenderer, GrabHandle, LayerKey, LayerRegistry};
use voxcel_world::occlusion::is_ghosted;
use voxcel_world::{ArrayRegistry, CellArray};

/// What a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Chunk {
        array: ArrayId,
        chunk: ChunkCoord,
        instance: usize,
    },
    LegacyLayer {
        key: LayerKey,
        instance: usize,
    },
    GrabHandle {
        array: ArrayId,
    },
}

impl HitTarget {
    pub fn array(&self) -> ArrayId {
        match *self {
            HitTarget::Chunk { array, .. } => array,
            HitTarget::LegacyLayer { key, .. } => key.array,
            HitTarget::GrabHandle { array } => array,
        }
    }

    pub fn instance(&self) -> Option<usize> {
        match *self {
            HitTarget::Chunk { instance, .. } | HitTarget::LegacyLayer { instance, .. } => {
                Some(instance)
            }
            HitTarget::GrabHandle { .. } => None,
        }
    }

    pub fn is_grab_handle(&self) -> bool {
        matches!(self, HitTarget::GrabHandle { .. })
    }
}

/// A ray hit in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub target: HitTarget,
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// A hit resolved to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCell {
    pub array: ArrayId,
    pub coord: CellCoord,
    /// Layer of the batch that was hit; `None` when the geometry carries no
    /// depth.
    pub layer: Option<i32>,
}

/// Read-only view of the scene used for ray casting.
pub struct PickView<'a> {
    pub camera: &'a dyn PickCamera,
    pub viewport: Viewport,
    pub renderer: &'a ChunkRenderer,
    pub layers: &'a LayerRegistry,
}

impl PickView<'_> {
    pub fn ray(&self, event: &PointerEvent) -> Ray {
        self.camera.ray_through(&self.viewport, event)
    }
}

/// Which geometry takes part in an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateFilter {
    pub grab_handles: bool,
    /// Drop arrays with physics enabled while physics mode runs (unless
    /// debug-all is on).
    pub physics_arrays: bool,
}

impl CandidateFilter {
    pub const POINTER_DOWN: CandidateFilter = CandidateFilter {
        grab_handles: true,
        physics_arrays: true,
    };

    pub const DRAG_MOVE: CandidateFilter = CandidateFilter {
        grab_handles: false,
        physics_arrays: false,
    };
}

/// Result of a pointer-down pick.
#[derive(Debug)]
pub enum PickOutcome {
    /// Nothing pickable under the pointer.
    Miss,
    /// A cell was hit but is ghosted.
    Rejected(ResolvedCell),
    /// The click left physics mode; no drag starts.
    ExitedPhysics(ResolvedCell),
    Select(SelectionDrag),
    Grab(GrabDrag),
}

pub struct PickResolver {
    settings: InteractionSettings,
}

impl PickResolver {
    pub fn new(settings: InteractionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// Grab handles of every array, in id order, placed with the host's
    /// current array rotations.
    pub fn grab_handles(
        &self,
        arrays: &ArrayRegistry,
        renderer: &ChunkRenderer,
        placement: &dyn ScenePlacement,
    ) -> Vec<GrabHandle> {
        arrays
            .ids()
            .into_iter()
            .filter_map(|id| arrays.get(id))
            .map(|a| {
                GrabHandle::for_array(
                    a,
                    renderer.layout(),
                    placement.array_rotation(a.id),
                    self.settings.handle_size,
                )
            })
            .collect()
    }

    /// Intersect `ray` with every candidate, nearest first. Hits on arrays
    /// being deleted are dropped while the deletion guard is locked.
    pub fn intersect(
        &self,
        ray: &Ray,
        view: &PickView,
        arrays: &ArrayRegistry,
        collab: &Collaborators,
        filter: CandidateFilter,
    ) -> Vec<PickHit> {
        let physics_on = collab.physics.is_active() && !collab.physics.debug_all();
        let mut local_rays: HashMap<ArrayId, (Ray, Mat4)> = HashMap::new();
        let mut frame_for = |array: &CellArray| {
            *local_rays.entry(array.id).or_insert_with(|| {
                let frame = frame_matrix(array, collab.placement.array_rotation(array.id));
                (ray.transformed(&frame.inverse()), frame)
            })
        };
        let mut hits = Vec::new();

        for layer in view.layers.iter().filter(|l| l.is_pickable()) {
            let Some(array) = arrays.get(layer.key.array) else {
                continue;
            };
            let (local, frame) = frame_for(array);
            if let Some(hit) = layer.batch.raycast(&local) {
                hits.push(to_world(
                    HitTarget::LegacyLayer {
                        key: layer.key,
                        instance: hit.instance,
                    },
                    ray,
                    &frame,
                    hit.t,
                    hit.normal,
                ));
            }
        }

        for mesh in view.renderer.meshes().filter(|m| m.is_pickable()) {
            let Some(array) = arrays.get(mesh.array_id) else {
                continue;
            };
            if array.hidden {
                continue;
            }
            if filter.physics_arrays && physics_on && array.physics_enabled {
                log::trace!("skipping physics array {} while picking", array.id);
                continue;
            }
            let (local, frame) = frame_for(array);
            if let Some(hit) = mesh.solid.raycast(&local) {
                hits.push(to_world(
                    HitTarget::Chunk {
                        array: mesh.array_id,
                        chunk: mesh.coord,
                        instance: hit.instance,
                    },
                    ray,
                    &frame,
                    hit.t,
                    hit.normal,
                ));
            }
        }

        if filter.grab_handles {
            for handle in self.grab_handles(arrays, view.renderer, &*collab.placement) {
                if let Some(hit) = handle.raycast(ray) {
                    hits.push(PickHit {
                        target: HitTarget::GrabHandle {
                            array: handle.array_id,
                        },
                        t: hit.t,
                        point: hit.point,
                        normal: hit.normal,
                    });
                }
            }
        }

        if collab.deletion.is_locked() {
            hits.retain(|h| !collab.deletion.is_deleting(h.target.array()));
        }
        hits.sort_by(|a, b| a.t.total_cmp(&b.t));
        hits
    }

    /// Grab handle first, then the nearest hit carrying an instance index,
    /// then the nearest hit. `hits` must be sorted by distance.
    pub fn select_hit(hits: &[PickHit]) -> Option<&PickHit> {
        hits.iter()
            .find(|h| h.target.is_grab_handle())
            .or_else(|| hits.iter().find(|h| h.target.instance().is_some()))
            .or_else(|| hits.first())
    }

    /// Map a batch hit back to its cell.
    pub fn resolve_cell(hit: &PickHit, view: &PickView) -> Option<ResolvedCell> {
        match hit.target {
            HitTarget::Chunk {
                array,
                chunk,
                instance,
            } => {
                let coord = view.renderer.mesh(array, chunk)?.cell_at(instance)?;
                Some(ResolvedCell {
                    array,
                    coord,
                    layer: Some(coord.z),
                })
            }
            HitTarget::LegacyLayer { key, instance } => {
                let coord = view.layers.get(&key)?.cell_at(instance)?;
                Some(ResolvedCell {
                    array: key.array,
                    coord,
                    layer: Some(key.z),
                })
            }
            HitTarget::GrabHandle { .. } => None,
        }
    }

    /// Whether a resolved cell may be interacted with given the current
    /// selection.
    pub fn is_interactive(arrays: &ArrayRegistry, cell: &ResolvedCell, collab: &Collaborators) -> bool {
        let Some(array) = arrays.get(cell.array) else {
            return false;
        };
        let selection = collab.selection.selection();
        !is_ghosted(array, cell.coord, selection.as_ref())
    }

    /// Full pointer-down handling: pick, then start a grab or a selection
    /// drag, run the cell's click action, or leave physics mode.
    pub fn pointer_down(
        &self,
        event: &PointerEvent,
        view: &PickView,
        arrays: &ArrayRegistry,
        collab: &mut Collaborators,
    ) -> PickOutcome {
        let ray = view.ray(event);
        let hits = self.intersect(&ray, view, arrays, collab, CandidateFilter::POINTER_DOWN);
        let Some(hit) = Self::select_hit(&hits).copied() else {
            return PickOutcome::Miss;
        };

        if let HitTarget::GrabHandle { array } = hit.target {
            return match GrabDrag::begin(array, &hit, &ray, arrays, collab) {
                Some(drag) => PickOutcome::Grab(drag),
                None => PickOutcome::Miss,
            };
        }

        let Some(cell) = Self::resolve_cell(&hit, view) else {
            return PickOutcome::Miss;
        };
        if !Self::is_interactive(arrays, &cell, collab) {
            log::debug!(
                "pick on {} {:?} rejected: layer is ghosted",
                cell.array,
                cell.coord
            );
            return PickOutcome::Rejected(cell);
        }
        let Some(array) = arrays.get(cell.array) else {
            return PickOutcome::Miss;
        };
        let layer = cell.layer.unwrap_or(cell.coord.z);

        if let Some(raw) = array.cell(cell.coord).and_then(|c| c.meta.click_action.clone()) {
            self.run_click_action(&raw, &cell, layer, collab);
        }

        let source = self.settings.source_context.as_str();
        if collab.physics.is_active() && !collab.physics.debug_all() {
            if collab.physics.collision_mode(cell.array, cell.coord, false) == CollisionMode::Edit {
                collab
                    .selection
                    .set_selection(cell.array, cell.coord, None, source);
                collab.placement.center_on_array(cell.array);
                if let Err(e) = collab.physics.exit_physics_mode() {
                    log::warn!("failed to leave physics mode: {}", e);
                }
                return PickOutcome::ExitedPhysics(cell);
            }
        }

        PickOutcome::Select(SelectionDrag::begin(array, &cell, source, collab))
    }

    fn run_click_action(&self, raw: &str, cell: &ResolvedCell, layer: i32, collab: &mut Collaborators) {
        let formula = match decode_click_action(raw) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("click action on {} {:?}: {}", cell.array, cell.coord, e);
                return;
            }
        };
        let tx = collab
            .formulas
            .begin_transaction(CLICK_ACTION_TX_TAG, CLICK_ACTION_TX_DESCRIPTION);
        let anchor = CellRef {
            array: cell.array,
            coord: cell.coord,
        };
        let result = collab
            .formulas
            .run_once_at(anchor, &formula, tx)
            .and_then(|()| collab.formulas.commit(tx));
        match result {
            Ok(()) => collab.placement.pulse_cell(cell.array, cell.coord, layer),
            Err(e) => log::warn!("click action {} failed: {}", formula, e),
        }
    }
}

fn to_world(target: HitTarget, ray: &Ray, frame: &Mat4, t: f32, local_normal: Vec3) -> PickHit {
    PickHit {
        target,
        t,
        point: ray.at(t),
        normal: frame.transform_vector3(local_normal).normalize_or_zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{Fakes, Scene};
    use glam::IVec3;
    use voxcel_core::axis::Axis;
    use glam::Quat;
    use voxcel_core::color::ColorClass;
    use voxcel_core::types::Lod;
    use voxcel_render::LayerKind;
    use voxcel_world::{CellMeta, OcclusionData, Selection};

    fn hits_for(
        scene: &Scene,
        fakes: &mut Fakes,
        ev: &PointerEvent,
        filter: CandidateFilter,
    ) -> Vec<PickHit> {
        let ray = scene.view().ray(ev);
        let collab = fakes.collaborators();
        scene
            .resolver
            .intersect(&ray, &scene.view(), &scene.arrays, &collab, filter)
    }

    #[test]
    fn test_scenario_pick_resolves_value_cell() {
        let scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 1));
        let ray = scene.view().ray(&ev);
        let collab = fakes.collaborators();
        let hits = scene
            .resolver
            .intersect(&ray, &scene.view(), &scene.arrays, &collab, CandidateFilter::POINTER_DOWN);
        let hit = PickResolver::select_hit(&hits).expect("hit");
        let cell = PickResolver::resolve_cell(hit, &scene.view()).expect("cell");
        assert_eq!(cell.array, scene.id);
        assert_eq!(cell.coord, IVec3::new(1, 1, 1));

        let arr = scene.arrays.get(scene.id).unwrap();
        let c = arr.cell(cell.coord).unwrap();
        assert_eq!(c.color_class(false), ColorClass::Value);
        let mesh = scene.renderer.mesh(scene.id, IVec3::ZERO).unwrap();
        let instance = hit.target.instance().unwrap();
        let expected = scene
            .renderer
            .settings()
            .palette
            .color(ColorClass::Value)
            .to_linear();
        assert_eq!(mesh.solid.color(instance), Some(expected));
    }

    #[test]
    fn test_scenario_blocked_layer_rejects_pick() {
        let mut scene = Scene::cube_with_value();
        scene.set_occlusion(OcclusionData::new(Axis::Z, [1]));
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 1));
        let outcome = scene.pointer_down(&ev, &mut fakes);
        assert!(matches!(outcome, PickOutcome::Rejected(c) if c.coord == IVec3::new(1, 1, 1)));
        assert!(fakes.selection.calls.is_empty());
        assert_eq!(fakes.placement.orbit_suspended, 0);
    }

    #[test]
    fn test_focus_layer_unblocks_pick() {
        let mut scene = Scene::cube_with_value();
        scene.set_occlusion(OcclusionData::new(Axis::Z, [2]));
        let mut fakes = Fakes::default();
        let target = IVec3::new(1, 1, 2);
        let ev = scene.aim_at_cell(target);
        assert!(matches!(
            scene.pointer_down(&ev, &mut fakes),
            PickOutcome::Rejected(_)
        ));

        fakes.selection.current = Some(Selection::range(
            scene.id,
            IVec3::new(0, 0, 2),
            IVec3::new(2, 2, 2),
        ));
        scene.resync(&fakes);
        match scene.pointer_down(&ev, &mut fakes) {
            PickOutcome::Select(drag) => assert_eq!(drag.start(), target),
            other => panic!("expected selection drag, got {:?}", other),
        }
    }

    #[test]
    fn test_pick_starts_selection_and_suspends_orbit() {
        let scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(2, 0, 1));
        let outcome = scene.pointer_down(&ev, &mut fakes);
        assert!(matches!(outcome, PickOutcome::Select(_)));
        assert_eq!(
            fakes.selection.current,
            Some(Selection::single(scene.id, IVec3::new(2, 0, 1)))
        );
        assert_eq!(fakes.placement.pulses, vec![(scene.id, IVec3::new(2, 0, 1), 1)]);
        assert_eq!(fakes.placement.orbit_suspended, 1);
    }

    #[test]
    fn test_click_action_runs_in_transaction() {
        let mut scene = Scene::cube_with_value();
        let coord = IVec3::new(1, 1, 0);
        scene.edit(|arr| {
            arr.set_meta(coord, CellMeta::default().with_click_action("B64:PUExKzE="));
        });
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(coord);
        scene.pointer_down(&ev, &mut fakes);
        assert_eq!(fakes.formulas.transactions, vec![(
            CLICK_ACTION_TX_TAG.to_string(),
            CLICK_ACTION_TX_DESCRIPTION.to_string()
        )]);
        assert_eq!(fakes.formulas.runs, vec![(scene.id, coord, "=A1+1".to_string())]);
        assert_eq!(fakes.formulas.commits, 1);
    }

    #[test]
    fn test_failed_click_action_still_selects() {
        let mut scene = Scene::cube_with_value();
        let coord = IVec3::new(0, 0, 0);
        scene.edit(|arr| {
            arr.set_meta(coord, CellMeta::default().with_click_action("BOOM()"));
        });
        let mut fakes = Fakes::default();
        fakes.formulas.fail_runs = true;
        let ev = scene.aim_at_cell(coord);
        let outcome = scene.pointer_down(&ev, &mut fakes);
        assert!(matches!(outcome, PickOutcome::Select(_)));
        assert_eq!(fakes.formulas.commits, 0);
        assert_eq!(fakes.selection.current, Some(Selection::single(scene.id, coord)));
    }

    #[test]
    fn test_edit_collision_exits_physics_without_drag() {
        let scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        fakes.physics.active = true;
        fakes.physics.mode = CollisionMode::Edit;
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 0));
        let outcome = scene.pointer_down(&ev, &mut fakes);
        assert!(matches!(outcome, PickOutcome::ExitedPhysics(_)));
        assert_eq!(fakes.physics.exits, 1);
        assert_eq!(fakes.placement.centered, vec![scene.id]);
        assert_eq!(fakes.placement.orbit_suspended, 0);
    }

    #[test]
    fn test_physics_arrays_are_not_pickable_while_simulating() {
        let mut scene = Scene::cube_with_value();
        scene.edit(|arr| arr.physics_enabled = true);
        let mut fakes = Fakes::default();
        fakes.physics.active = true;
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 0));
        assert!(matches!(scene.pointer_down(&ev, &mut fakes), PickOutcome::Miss));

        fakes.physics.debug_all = true;
        assert!(matches!(
            scene.pointer_down(&ev, &mut fakes),
            PickOutcome::Select(_)
        ));
    }

    #[test]
    fn test_deleting_arrays_are_skipped_under_lock() {
        let scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        fakes.deletion.locked = true;
        fakes.deletion.deleting.insert(scene.id);
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 0));
        assert!(matches!(scene.pointer_down(&ev, &mut fakes), PickOutcome::Miss));

        fakes.deletion.locked = false;
        assert!(!matches!(scene.pointer_down(&ev, &mut fakes), PickOutcome::Miss));
    }

    #[test]
    fn test_grab_handle_wins_tie_break() {
        let hits = [
            PickHit {
                target: HitTarget::Chunk {
                    array: ArrayId(1),
                    chunk: IVec3::ZERO,
                    instance: 4,
                },
                t: 1.0,
                point: Vec3::ZERO,
                normal: Vec3::Z,
            },
            PickHit {
                target: HitTarget::GrabHandle { array: ArrayId(2) },
                t: 5.0,
                point: Vec3::ZERO,
                normal: Vec3::Y,
            },
        ];
        let chosen = PickResolver::select_hit(&hits).unwrap();
        assert_eq!(chosen.target, HitTarget::GrabHandle { array: ArrayId(2) });
        assert!(PickResolver::select_hit(&[]).is_none());
    }

    #[test]
    fn test_hits_follow_array_offset() {
        let mut scene = Scene::cube_with_value();
        scene.edit(|arr| arr.offset = IVec3::new(10, 0, 0));
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(0, 1, 0));
        match scene.pointer_down(&ev, &mut fakes) {
            PickOutcome::Select(drag) => assert_eq!(drag.start(), IVec3::new(0, 1, 0)),
            other => panic!("expected selection drag, got {:?}", other),
        }
    }

    #[test]
    fn test_hidden_arrays_are_not_hit() {
        let mut scene = Scene::cube_with_value();
        scene.edit(|arr| arr.hidden = true);
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 0));
        assert!(matches!(scene.pointer_down(&ev, &mut fakes), PickOutcome::Miss));
    }

    #[test]
    fn test_aggregate_chunks_stay_pickable() {
        let mut scene = Scene::filled(IVec3::new(64, 8, 9));
        let stats = scene.apply_lod();
        assert_eq!(stats.instanced, 0);
        assert_eq!(stats.aggregate, 4);
        assert_eq!(
            scene.renderer.mesh(scene.id, IVec3::ZERO).and_then(|m| m.current_lod()),
            Some(Lod::Aggregate)
        );

        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 0));
        match scene.pointer_down(&ev, &mut fakes) {
            PickOutcome::Select(drag) => assert_eq!(drag.start(), IVec3::new(1, 1, 0)),
            other => panic!("expected selection drag, got {:?}", other),
        }
    }

    #[test]
    fn test_layer_batch_pick_resolves_cell() {
        let mut scene = Scene::cube_with_value();
        scene.use_layer_batches();
        assert_eq!(scene.renderer.meshes().count(), 0);
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 1));

        let hits = hits_for(&scene, &mut fakes, &ev, CandidateFilter::POINTER_DOWN);
        let hit = PickResolver::select_hit(&hits).expect("hit");
        assert!(matches!(
            hit.target,
            HitTarget::LegacyLayer { key, .. } if key.z == 1 && key.kind == LayerKind::Filled
        ));
        let cell = PickResolver::resolve_cell(hit, &scene.view()).expect("cell");
        assert_eq!(cell.coord, IVec3::new(1, 1, 1));
        assert_eq!(cell.layer, Some(1));

        match scene.pointer_down(&ev, &mut fakes) {
            PickOutcome::Select(drag) => assert_eq!(drag.start(), IVec3::new(1, 1, 1)),
            other => panic!("expected selection drag, got {:?}", other),
        }
    }

    #[test]
    fn test_ghost_layer_batches_are_never_hit() {
        let mut scene = Scene::cube_with_value();
        scene.set_occlusion(OcclusionData::new(Axis::Z, [1]));
        scene.use_layer_batches();
        assert!(scene.layers.iter().any(|l| l.is_ghost()));
        let mut fakes = Fakes::default();
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 1));

        for filter in [CandidateFilter::POINTER_DOWN, CandidateFilter::DRAG_MOVE] {
            let hits = hits_for(&scene, &mut fakes, &ev, filter);
            assert!(!hits.is_empty());
            assert!(hits.iter().all(|h| !matches!(
                h.target,
                HitTarget::LegacyLayer { key, .. } if key.kind == LayerKind::Ghost
            )));
            assert!(matches!(
                hits[0].target,
                HitTarget::LegacyLayer { key, .. } if key.z == 2
            ));
        }

        match scene.pointer_down(&ev, &mut fakes) {
            PickOutcome::Select(drag) => assert_eq!(drag.start(), IVec3::new(1, 1, 2)),
            other => panic!("expected selection drag, got {:?}", other),
        }
    }

    #[test]
    fn test_grab_handle_turns_with_array() {
        let scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        fakes.placement.rotation = Some(rotation);

        let ev = scene.aim_at_handle_from_above();
        assert!(matches!(scene.pointer_down(&ev, &mut fakes), PickOutcome::Miss));

        let ev = scene.aim_at_rotated_handle(Some(rotation));
        assert!(matches!(scene.pointer_down(&ev, &mut fakes), PickOutcome::Grab(_)));
    }
}
