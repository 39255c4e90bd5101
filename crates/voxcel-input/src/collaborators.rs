//! Host services the input handlers call into.
//!
//! The engine owns geometry and cell data; everything else (the selection
//! model, formula evaluation, physics, camera controls) belongs to the host
//! and is reached through these traits.

use glam::{IVec3, Quat};
use thiserror::Error;
use voxcel_core::types::{ArrayId, CellCoord};
use voxcel_world::Selection;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("array {0} is not known to the host")]
    UnknownArray(ArrayId),

    #[error("formula evaluation failed: {0}")]
    Formula(String),

    #[error("{0}")]
    Host(String),
}

/// Whether an offset change is a live drag preview or a settled position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetUpdate {
    Interactive,
    Final,
}

/// Scene-level placement and camera control.
pub trait ScenePlacement {
    /// Move the array frame. Called after the engine has updated its own copy.
    fn set_array_offset(&mut self, array: ArrayId, offset: IVec3, update: OffsetUpdate);

    /// Let the host resolve overlaps after a grab, nudging in `direction`.
    fn settle_after_drag(&mut self, array: ArrayId, direction: IVec3)
        -> Result<(), CollaboratorError>;

    fn suspend_orbit_controls(&mut self);

    fn resume_orbit_controls(&mut self);

    fn center_on_array(&mut self, array: ArrayId);

    /// Brief highlight of a cell. `layer` is the layer the pick happened on.
    fn pulse_cell(&mut self, array: ArrayId, coord: CellCoord, layer: i32);

    fn array_rotation(&self, array: ArrayId) -> Option<Quat>;
}

/// Opaque handle of an open formula transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(pub u64);

/// Evaluation anchor for a click action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub array: ArrayId,
    pub coord: CellCoord,
}

pub trait FormulaWriter {
    fn begin_transaction(&mut self, tag: &str, description: &str) -> TxId;

    fn run_once_at(
        &mut self,
        anchor: CellRef,
        formula: &str,
        tx: TxId,
    ) -> Result<(), CollaboratorError>;

    fn commit(&mut self, tx: TxId) -> Result<(), CollaboratorError>;
}

/// The host's selection model. The engine only reads the current selection
/// for ghosting and writes through the setters.
pub trait SelectionStore {
    fn selection(&self) -> Option<Selection>;

    fn set_selection(
        &mut self,
        array: ArrayId,
        anchor: CellCoord,
        focus: Option<CellCoord>,
        source: &str,
    );

    fn set_selection_range(
        &mut self,
        array: ArrayId,
        start: CellCoord,
        end: CellCoord,
        source: &str,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    /// Clicking the cell edits it (and leaves physics mode).
    Edit,
    /// The cell takes part in the simulation.
    Physics,
}

pub trait PhysicsMode {
    fn is_active(&self) -> bool;

    /// Debug mode where every array is interactive.
    fn debug_all(&self) -> bool;

    fn collision_mode(&self, array: ArrayId, coord: CellCoord, debug_all: bool) -> CollisionMode;

    fn exit_physics_mode(&mut self) -> Result<(), CollaboratorError>;
}

/// Arrays in the middle of being deleted must not be hit.
pub trait DeletionGuard {
    fn is_locked(&self) -> bool;

    fn is_deleting(&self, array: ArrayId) -> bool;
}

/// Where the user last interacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionContext {
    TwoD,
    #[default]
    ThreeD,
}

pub trait ViewContext {
    fn last_interaction(&self) -> InteractionContext;

    /// Layer shown by the 2D view, if any.
    fn view_layer(&self) -> Option<i32>;
}

/// Everything a pointer handler may touch on the host side.
pub struct Collaborators<'a> {
    pub placement: &'a mut dyn ScenePlacement,
    pub formulas: &'a mut dyn FormulaWriter,
    pub selection: &'a mut dyn SelectionStore,
    pub physics: &'a mut dyn PhysicsMode,
    pub deletion: &'a dyn DeletionGuard,
    pub view: &'a dyn ViewContext,
}
