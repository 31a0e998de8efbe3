//! Input model: pointer events and the interaction state machine.
//!
//! `InteractionState` is the gesture in progress between pointer-down and
//! pointer-up. [`dispatch`] maps `(state, event)` to the next state plus a
//! list of [`Effect`]s. It only reads the registry, so the whole machine is
//! testable without a rendering surface; the editor applies the effects.
//!
//! Placement has priority: while a palette item is armed, pointer-downs on
//! existing shapes do not start a drag.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use tracing::warn;

use crate::geometry::Point;
use crate::registry::Registry;
use crate::shape::{ShapeId, ShapeKind};

/// A pointer or palette event in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A palette item was pressed; the next click places a shape of this kind.
    PalettePressed(ShapeKind),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    /// Escape / pointer capture lost.
    Cancel,
}

/// The active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A palette item is armed and waiting for a click on the canvas.
    PlacingNew(ShapeKind),
    /// An existing shape follows the pointer.
    Dragging {
        /// Shape being dragged.
        id: ShapeId,
        /// Pointer position minus the shape's top-left at press time.
        offset: Point,
        /// Shape center at press time; a release at the same spot is not a change.
        origin: Point,
    },
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Place a new shape centered at `at`.
    Create { kind: ShapeKind, at: Point },
    Select(ShapeId),
    Deselect,
    /// Move a shape's center during a drag. Not an undo point.
    MoveTo { id: ShapeId, center: Point },
    /// A drag ended; record it in history if the shape left `origin`.
    CommitDrag { id: ShapeId, origin: Point },
}

/// Advance the state machine by one event.
#[must_use]
pub fn dispatch(state: InteractionState, event: InputEvent, registry: &Registry) -> (InteractionState, Vec<Effect>) {
    use InteractionState::{Dragging, Idle, PlacingNew};

    match (state, event) {
        (Idle | PlacingNew(_), InputEvent::PalettePressed(kind)) => (PlacingNew(kind), vec![]),

        (PlacingNew(kind), InputEvent::PointerUp(p)) => {
            if registry.canvas().contains(p) {
                (Idle, vec![Effect::Create { kind, at: p }])
            } else {
                (Idle, vec![])
            }
        }

        (Idle, InputEvent::PointerDown(p)) => match registry.topmost_at(p) {
            Some(shape) => {
                let offset = p.offset_from(shape.top_left());
                let next = Dragging { id: shape.id, offset, origin: shape.position };
                (next, vec![Effect::Select(shape.id)])
            }
            None if registry.canvas().contains(p) => (Idle, vec![Effect::Deselect]),
            None => (Idle, vec![]),
        },

        (Dragging { id, offset, origin }, InputEvent::PointerMove(p)) => {
            let Some(shape) = registry.get(&id) else {
                warn!(%id, "input: dragged shape vanished; dropping drag");
                return (Idle, vec![]);
            };
            let extent = shape.extent();
            let top_left = p.offset_from(offset);
            let center = Point::new(top_left.x - extent.left, top_left.y - extent.top);
            (Dragging { id, offset, origin }, vec![Effect::MoveTo { id, center }])
        }

        (Dragging { id, origin, .. }, InputEvent::PointerUp(_) | InputEvent::Cancel) => {
            (Idle, vec![Effect::CommitDrag { id, origin }])
        }

        (PlacingNew(_), InputEvent::Cancel) => (Idle, vec![]),

        // Everything else leaves the gesture as it is: pointer-downs while
        // placing or dragging, palette presses mid-drag, stray moves and ups.
        (state, _) => (state, vec![]),
    }
}
