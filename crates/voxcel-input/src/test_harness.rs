//! Recording fakes for the host collaborators and a small scene builder.
//!
//! `AimCamera` ignores projection: pointer coordinates are world-space
//! offsets across the aim plane, so tests can point at a cell exactly.

use crate::camera::PickCamera;
use crate::collaborators::{
    CellRef, CollaboratorError, Collaborators, CollisionMode, DeletionGuard, FormulaWriter,
    InteractionContext, OffsetUpdate, PhysicsMode, ScenePlacement, SelectionStore, TxId,
    ViewContext,
};
use crate::grab_drag::GrabDrag;
use crate::pick::{PickOutcome, PickResolver, PickView};
use crate::pointer::{PointerEvent, Viewport};
use crate::selection_drag::{DragMove, SelectionDrag};
use glam::{IVec3, Mat4, Quat, Vec3};
use std::cell::Cell;
use std::collections::HashSet;
use voxcel_core::config::{InteractionSettings, LodSettings, RenderSettings};
use voxcel_core::math::Ray;
use voxcel_core::types::{ArrayId, CellCoord};
use voxcel_render::layout::frame_matrix;
use voxcel_render::{ChunkRenderer, GrabHandle, LayerRegistry, LodController, LodStats};
use voxcel_world::{ArrayRegistry, CellArray, CellValue, NoProvenance, OcclusionData, Selection};

#[derive(Default)]
pub struct FakePlacement {
    pub offsets: Vec<(ArrayId, IVec3, OffsetUpdate)>,
    pub settles: Vec<(ArrayId, IVec3)>,
    pub fail_settle: bool,
    pub orbit_suspended: u32,
    pub orbit_resumed: u32,
    pub centered: Vec<ArrayId>,
    pub pulses: Vec<(ArrayId, CellCoord, i32)>,
    pub rotation: Option<Quat>,
}

impl ScenePlacement for FakePlacement {
    fn set_array_offset(&mut self, array: ArrayId, offset: IVec3, update: OffsetUpdate) {
        self.offsets.push((array, offset, update));
    }

    fn settle_after_drag(
        &mut self,
        array: ArrayId,
        direction: IVec3,
    ) -> Result<(), CollaboratorError> {
        self.settles.push((array, direction));
        if self.fail_settle {
            return Err(CollaboratorError::UnknownArray(array));
        }
        Ok(())
    }

    fn suspend_orbit_controls(&mut self) {
        self.orbit_suspended += 1;
    }

    fn resume_orbit_controls(&mut self) {
        self.orbit_resumed += 1;
    }

    fn center_on_array(&mut self, array: ArrayId) {
        self.centered.push(array);
    }

    fn pulse_cell(&mut self, array: ArrayId, coord: CellCoord, layer: i32) {
        self.pulses.push((array, coord, layer));
    }

    fn array_rotation(&self, _array: ArrayId) -> Option<Quat> {
        self.rotation
    }
}

#[derive(Default)]
pub struct FakeFormulas {
    pub transactions: Vec<(String, String)>,
    pub runs: Vec<(ArrayId, CellCoord, String)>,
    pub commits: u32,
    pub fail_runs: bool,
}

impl FormulaWriter for FakeFormulas {
    fn begin_transaction(&mut self, tag: &str, description: &str) -> TxId {
        self.transactions
            .push((tag.to_string(), description.to_string()));
        TxId(self.transactions.len() as u64)
    }

    fn run_once_at(
        &mut self,
        anchor: CellRef,
        formula: &str,
        _tx: TxId,
    ) -> Result<(), CollaboratorError> {
        if self.fail_runs {
            return Err(CollaboratorError::Formula(format!("{formula}: #ERROR")));
        }
        self.runs
            .push((anchor.array, anchor.coord, formula.to_string()));
        Ok(())
    }

    fn commit(&mut self, _tx: TxId) -> Result<(), CollaboratorError> {
        self.commits += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSelection {
    pub current: Option<Selection>,
    pub calls: Vec<(Selection, String)>,
}

impl SelectionStore for FakeSelection {
    fn selection(&self) -> Option<Selection> {
        self.current
    }

    fn set_selection(
        &mut self,
        array: ArrayId,
        anchor: CellCoord,
        focus: Option<CellCoord>,
        source: &str,
    ) {
        let sel = Selection {
            array_id: array,
            anchor,
            focus,
        };
        self.current = Some(sel);
        self.calls.push((sel, source.to_string()));
    }

    fn set_selection_range(
        &mut self,
        array: ArrayId,
        start: CellCoord,
        end: CellCoord,
        source: &str,
    ) {
        let sel = Selection::range(array, start, end);
        self.current = Some(sel);
        self.calls.push((sel, source.to_string()));
    }
}

pub struct FakePhysics {
    pub active: bool,
    pub debug_all: bool,
    pub mode: CollisionMode,
    pub exits: u32,
}

impl Default for FakePhysics {
    fn default() -> Self {
        Self {
            active: false,
            debug_all: false,
            mode: CollisionMode::Physics,
            exits: 0,
        }
    }
}

impl PhysicsMode for FakePhysics {
    fn is_active(&self) -> bool {
        self.active
    }

    fn debug_all(&self) -> bool {
        self.debug_all
    }

    fn collision_mode(&self, _array: ArrayId, _coord: CellCoord, _debug_all: bool) -> CollisionMode {
        self.mode
    }

    fn exit_physics_mode(&mut self) -> Result<(), CollaboratorError> {
        self.exits += 1;
        self.active = false;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDeletion {
    pub locked: bool,
    pub deleting: HashSet<ArrayId>,
}

impl DeletionGuard for FakeDeletion {
    fn is_locked(&self) -> bool {
        self.locked
    }

    fn is_deleting(&self, array: ArrayId) -> bool {
        self.deleting.contains(&array)
    }
}

#[derive(Default)]
pub struct FakeView {
    pub last: InteractionContext,
    pub layer: Option<i32>,
}

impl ViewContext for FakeView {
    fn last_interaction(&self) -> InteractionContext {
        self.last
    }

    fn view_layer(&self) -> Option<i32> {
        self.layer
    }
}

#[derive(Default)]
pub struct Fakes {
    pub placement: FakePlacement,
    pub formulas: FakeFormulas,
    pub selection: FakeSelection,
    pub physics: FakePhysics,
    pub deletion: FakeDeletion,
    pub view: FakeView,
}

impl Fakes {
    pub fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            placement: &mut self.placement,
            formulas: &mut self.formulas,
            selection: &mut self.selection,
            physics: &mut self.physics,
            deletion: &self.deletion,
            view: &self.view,
        }
    }
}

/// Parallel-ray camera. Pointer x/y move the ray origin across the plane
/// perpendicular to the aim direction.
pub struct AimCamera {
    origin: Cell<Vec3>,
    dir: Cell<Vec3>,
}

impl AimCamera {
    fn new() -> Self {
        Self {
            origin: Cell::new(Vec3::Z * 100.0),
            dir: Cell::new(Vec3::NEG_Z),
        }
    }

    fn aim(&self, origin: Vec3, dir: Vec3) {
        self.origin.set(origin);
        self.dir.set(dir);
    }

    fn basis(&self) -> (Vec3, Vec3) {
        let dir = self.dir.get();
        let right = if dir.x.abs() > 0.9 { Vec3::Z } else { Vec3::X };
        (right, (-dir).cross(right))
    }
}

impl PickCamera for AimCamera {
    fn view_proj(&self, _viewport: &Viewport) -> Mat4 {
        Mat4::IDENTITY
    }

    fn ray_through(&self, _viewport: &Viewport, pointer: &PointerEvent) -> Ray {
        let (right, up) = self.basis();
        Ray::new(
            self.origin.get() + right * pointer.x + up * pointer.y,
            self.dir.get(),
        )
    }
}

/// One array of cells synced into a renderer, picked through an
/// [`AimCamera`].
pub struct Scene {
    pub id: ArrayId,
    pub arrays: ArrayRegistry,
    pub renderer: ChunkRenderer,
    pub layers: LayerRegistry,
    pub resolver: PickResolver,
    camera: AimCamera,
    viewport: Viewport,
}

impl Scene {
    /// 3x3x3 empty cells with value "5" at (1, 1, 1).
    pub fn cube_with_value() -> Self {
        let mut scene = Self::filled(IVec3::splat(3));
        scene.edit(|arr| {
            arr.set_value(IVec3::new(1, 1, 1), Some(CellValue::from("5")));
        });
        scene
    }

    /// Every cell of a `size` array present and empty.
    pub fn filled(size: IVec3) -> Self {
        let mut arrays = ArrayRegistry::new();
        let id = arrays.create(size);
        if let Some(arr) = arrays.get_mut(id) {
            arr.fill_empty();
        }
        let mut scene = Self {
            id,
            arrays,
            renderer: ChunkRenderer::with_centered_layout(RenderSettings::default()),
            layers: LayerRegistry::new(),
            resolver: PickResolver::new(InteractionSettings::default()),
            camera: AimCamera::new(),
            viewport: Viewport::new(800.0, 600.0),
        };
        scene.sync(None);
        scene
    }

    fn sync(&mut self, selection: Option<&Selection>) {
        if let Some(arr) = self.arrays.get_mut(self.id) {
            self.renderer.sync_array(arr, &NoProvenance, selection);
        }
    }

    pub fn edit(&mut self, f: impl FnOnce(&mut CellArray)) {
        if let Some(arr) = self.arrays.get_mut(self.id) {
            f(arr);
        }
        self.sync(None);
    }

    pub fn set_occlusion(&mut self, occlusion: OcclusionData) {
        self.edit(|arr| arr.occlusion = Some(occlusion));
    }

    /// Run the LOD pass with no focus.
    pub fn apply_lod(&mut self) -> LodStats {
        LodController::new(LodSettings::default()).update(
            &mut self.renderer,
            &mut self.arrays,
            None,
            &NoProvenance,
        )
    }

    /// Draw the array through per-layer batches only, dropping its chunk
    /// meshes.
    pub fn use_layer_batches(&mut self) {
        let Some(arr) = self.arrays.get(self.id) else {
            return;
        };
        self.renderer.remove_array(self.id);
        self.layers
            .rebuild_array(
                arr,
                self.renderer.layout(),
                &NoProvenance,
                None,
                self.renderer.settings(),
            )
            .expect("layer batches");
    }

    /// Re-apply ghosting for the fakes' current selection.
    pub fn resync(&mut self, fakes: &Fakes) {
        self.sync(fakes.selection.current.as_ref());
    }

    pub fn view(&self) -> PickView<'_> {
        PickView {
            camera: &self.camera,
            viewport: self.viewport,
            renderer: &self.renderer,
            layers: &self.layers,
        }
    }

    /// Run `f` with the pick view and mutable access to the arrays.
    pub fn with_view<R>(&mut self, f: impl FnOnce(&PickView, &mut ArrayRegistry) -> R) -> R {
        let view = PickView {
            camera: &self.camera,
            viewport: self.viewport,
            renderer: &self.renderer,
            layers: &self.layers,
        };
        f(&view, &mut self.arrays)
    }

    pub fn world_center(&self, coord: CellCoord) -> Vec3 {
        let Some(arr) = self.arrays.get(self.id) else {
            return Vec3::ZERO;
        };
        frame_matrix(arr, None)
            .transform_point3(self.renderer.layout().local_position(arr, coord))
    }

    /// Aim straight down -z from the gap just in front of `coord`.
    pub fn aim_at_cell(&self, coord: CellCoord) -> PointerEvent {
        self.camera
            .aim(self.world_center(coord) + Vec3::Z * 0.5, Vec3::NEG_Z);
        PointerEvent::at(0.0, 0.0)
    }

    /// Pointer position that keeps the current aim depth but lines up with
    /// `coord`.
    pub fn pointer_to_cell(&self, coord: CellCoord) -> PointerEvent {
        let (right, up) = self.camera.basis();
        let d = self.world_center(coord) - self.camera.origin.get();
        PointerEvent::at(d.dot(right), d.dot(up))
    }

    pub fn pointer_off(&self) -> PointerEvent {
        PointerEvent::at(1000.0, 1000.0)
    }

    /// Aim down -y at the top face of the array's grab handle.
    pub fn aim_at_handle_from_above(&self) -> PointerEvent {
        self.aim_at_rotated_handle(None)
    }

    /// Same as [`Scene::aim_at_handle_from_above`] for an array the host
    /// reports as rotated.
    pub fn aim_at_rotated_handle(&self, rotation: Option<Quat>) -> PointerEvent {
        if let Some(arr) = self.arrays.get(self.id) {
            let handle = GrabHandle::for_array(
                arr,
                self.renderer.layout(),
                rotation,
                self.resolver.settings().handle_size,
            );
            self.camera
                .aim(handle.center + Vec3::Y * handle.size * 2.0, Vec3::NEG_Y);
        }
        PointerEvent::at(0.0, 0.0)
    }

    pub fn pointer_down(&self, event: &PointerEvent, fakes: &mut Fakes) -> PickOutcome {
        self.resolver
            .pointer_down(event, &self.view(), &self.arrays, &mut fakes.collaborators())
    }

    pub fn drag_move(
        &self,
        drag: &mut SelectionDrag,
        event: &PointerEvent,
        fakes: &mut Fakes,
    ) -> DragMove {
        drag.on_move(
            event,
            &self.resolver,
            &self.view(),
            &self.arrays,
            &mut fakes.collaborators(),
        )
    }

    pub fn grab_move(
        &mut self,
        drag: &mut GrabDrag,
        event: &PointerEvent,
        fakes: &mut Fakes,
    ) -> Option<IVec3> {
        self.with_view(|view, arrays| drag.on_move(event, view, arrays, &mut fakes.collaborators()))
    }
}
