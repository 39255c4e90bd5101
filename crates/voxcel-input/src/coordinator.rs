//! Pointer routing. At most one drag is active at a time; a new pointer-down
//! always replaces whatever drag was in flight.

use crate::collaborators::Collaborators;
use crate::grab_drag::GrabDrag;
use crate::pick::{PickOutcome, PickResolver, PickView};
use crate::pointer::PointerEvent;
use crate::selection_drag::{DragMove, SelectionDrag};
use glam::IVec3;
use voxcel_core::config::InteractionSettings;
use voxcel_world::ArrayRegistry;

#[derive(Debug)]
pub enum ActiveDrag {
    Selection(SelectionDrag),
    Grab(GrabDrag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Selection,
    Grab,
}

impl ActiveDrag {
    pub fn kind(&self) -> DragKind {
        match self {
            ActiveDrag::Selection(_) => DragKind::Selection,
            ActiveDrag::Grab(_) => DragKind::Grab,
        }
    }
}

/// What a pointer-move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    NoDrag,
    Selection(DragMove),
    /// New array offset, if the grab moved it.
    Grab(Option<IVec3>),
}

pub struct InputCoordinator {
    resolver: PickResolver,
    active: Option<ActiveDrag>,
    generation: u64,
}

impl InputCoordinator {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            resolver: PickResolver::new(settings),
            active: None,
            generation: 0,
        }
    }

    pub fn resolver(&self) -> &PickResolver {
        &self.resolver
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// Generation of the most recently installed drag.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Pick under the pointer and install the drag it starts, if any. Any
    /// drag still in flight is dropped first. Returns the kind and
    /// generation of the new drag.
    pub fn pointer_down(
        &mut self,
        event: &PointerEvent,
        view: &PickView,
        arrays: &ArrayRegistry,
        collab: &mut Collaborators,
    ) -> Option<(DragKind, u64)> {
        if let Some(old) = self.active.take() {
            log::debug!(
                "drag {} ({:?}) replaced by a new pointer-down",
                self.generation,
                old.kind()
            );
            collab.placement.resume_orbit_controls();
        }

        let drag = match self.resolver.pointer_down(event, view, arrays, collab) {
            PickOutcome::Select(drag) => ActiveDrag::Selection(drag),
            PickOutcome::Grab(drag) => ActiveDrag::Grab(drag),
            PickOutcome::Miss | PickOutcome::Rejected(_) | PickOutcome::ExitedPhysics(_) => {
                return None
            }
        };
        self.generation += 1;
        let kind = drag.kind();
        self.active = Some(drag);
        Some((kind, self.generation))
    }

    pub fn pointer_move(
        &mut self,
        event: &PointerEvent,
        view: &PickView,
        arrays: &mut ArrayRegistry,
        collab: &mut Collaborators,
    ) -> MoveOutcome {
        match self.active.as_mut() {
            None => MoveOutcome::NoDrag,
            Some(ActiveDrag::Selection(drag)) => {
                MoveOutcome::Selection(drag.on_move(event, &self.resolver, view, arrays, collab))
            }
            Some(ActiveDrag::Grab(drag)) => {
                MoveOutcome::Grab(drag.on_move(event, view, arrays, collab))
            }
        }
    }

    /// Finish the active drag. Returns whether there was one.
    pub fn pointer_up(&mut self, arrays: &mut ArrayRegistry, collab: &mut Collaborators) -> bool {
        match self.active.take() {
            None => false,
            Some(ActiveDrag::Selection(drag)) => {
                drag.on_up(collab);
                true
            }
            Some(ActiveDrag::Grab(mut drag)) => {
                drag.on_up(arrays, collab);
                true
            }
        }
    }

    /// Drop the active drag without finishing it.
    pub fn cancel(&mut self, collab: &mut Collaborators) {
        if self.active.take().is_some() {
            collab.placement.resume_orbit_controls();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::pointer::Viewport;
    use crate::test_harness::{Fakes, Scene};
    use voxcel_world::Selection;

    fn coordinator() -> InputCoordinator {
        InputCoordinator::new(InteractionSettings::default())
    }

    #[test]
    fn test_new_drag_replaces_old() {
        let mut scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let mut input = coordinator();

        let ev = scene.aim_at_cell(IVec3::ZERO);
        let first = scene.with_view(|view, arrays| {
            input.pointer_down(&ev, view, arrays, &mut fakes.collaborators())
        });
        assert_eq!(first, Some((DragKind::Selection, 1)));

        let ev = scene.aim_at_handle_from_above();
        let second = scene.with_view(|view, arrays| {
            input.pointer_down(&ev, view, arrays, &mut fakes.collaborators())
        });
        assert_eq!(second, Some((DragKind::Grab, 2)));
        assert_eq!(fakes.placement.orbit_resumed, 1);

        let selection_calls = fakes.selection.calls.len();
        let moved = scene.with_view(|view, arrays| {
            input.pointer_move(
                &PointerEvent::at(1.4, 0.0),
                view,
                arrays,
                &mut fakes.collaborators(),
            )
        });
        assert_eq!(moved, MoveOutcome::Grab(Some(IVec3::new(1, 0, 0))));
        assert_eq!(fakes.selection.calls.len(), selection_calls);
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let mut scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let mut input = coordinator();
        let ev = scene.aim_at_cell(IVec3::ZERO);
        let outcome = scene.with_view(|view, arrays| {
            input.pointer_move(&ev, view, arrays, &mut fakes.collaborators())
        });
        assert_eq!(outcome, MoveOutcome::NoDrag);
        assert!(fakes.selection.calls.is_empty());
    }

    #[test]
    fn test_up_ends_drag_once() {
        let mut scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let mut input = coordinator();
        let ev = scene.aim_at_cell(IVec3::new(1, 1, 0));
        scene.with_view(|view, arrays| {
            input.pointer_down(&ev, view, arrays, &mut fakes.collaborators())
        });
        assert!(input.is_dragging());

        assert!(input.pointer_up(&mut scene.arrays, &mut fakes.collaborators()));
        assert!(!input.pointer_up(&mut scene.arrays, &mut fakes.collaborators()));
        assert_eq!(fakes.placement.orbit_resumed, 1);
        assert_eq!(
            fakes.selection.current,
            Some(Selection::single(scene.id, IVec3::new(1, 1, 0)))
        );
    }

    #[test]
    fn test_cancel_resumes_orbit() {
        let mut scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let mut input = coordinator();
        let ev = scene.aim_at_handle_from_above();
        scene.with_view(|view, arrays| {
            input.pointer_down(&ev, view, arrays, &mut fakes.collaborators())
        });
        input.cancel(&mut fakes.collaborators());
        assert!(input.active().is_none());
        assert_eq!(fakes.placement.orbit_resumed, 1);
        assert!(fakes.placement.settles.is_empty());
    }

    #[test]
    fn test_miss_installs_nothing() {
        let mut scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let mut input = coordinator();
        scene.aim_at_cell(IVec3::ZERO);
        let ev = scene.pointer_off();
        let down = scene.with_view(|view, arrays| {
            input.pointer_down(&ev, view, arrays, &mut fakes.collaborators())
        });
        assert_eq!(down, None);
        assert_eq!(input.generation(), 0);
    }

    #[test]
    fn test_orbit_camera_pick_through_projection() {
        let scene = Scene::cube_with_value();
        let mut fakes = Fakes::default();
        let mut input = coordinator();
        let target = scene.world_center(IVec3::new(1, 1, 0));
        let camera = OrbitCamera::facing(target, 10.0);
        let viewport = Viewport::new(800.0, 600.0);
        let view = PickView {
            camera: &camera,
            viewport,
            renderer: &scene.renderer,
            layers: &scene.layers,
        };
        let down = input.pointer_down(
            &PointerEvent::at(400.0, 300.0),
            &view,
            &scene.arrays,
            &mut fakes.collaborators(),
        );
        assert_eq!(down, Some((DragKind::Selection, 1)));
        assert_eq!(
            fakes.selection.current,
            Some(Selection::single(scene.id, IVec3::new(1, 1, 0)))
        );
    }
}
