pub mod action;
pub mod camera;
pub mod collaborators;
pub mod coordinator;
pub mod grab_drag;
pub mod pick;
pub mod pointer;
pub mod selection_drag;

#[cfg(test)]
mod test_harness;

pub use action::{decode_click_action, ActionDecodeError, ActionEncoding};
pub use camera::{OrbitCamera, PickCamera};
pub use collaborators::{
    CellRef, CollaboratorError, Collaborators, CollisionMode, DeletionGuard, FormulaWriter,
    InteractionContext, OffsetUpdate, PhysicsMode, ScenePlacement, SelectionStore, TxId,
    ViewContext,
};
pub use coordinator::{ActiveDrag, DragKind, InputCoordinator, MoveOutcome};
pub use grab_drag::{snap_axis, GrabDrag, GrabPhase};
pub use pick::{HitTarget, PickHit, PickOutcome, PickResolver, PickView, ResolvedCell};
pub use pointer::{PointerButton, PointerEvent, Viewport};
pub use selection_drag::{DragMove, SelectionDrag};
