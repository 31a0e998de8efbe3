//! Editor — the canvas editing surface as the host sees it.
//!
//! DESIGN
//! ======
//! The editor owns a [`Registry`], its [`History`] and the active gesture.
//! Every public operation returns a list of [`Action`]s describing what the
//! host must redraw or announce; the editor never touches a rendering
//! surface itself.
//!
//! HISTORY
//! =======
//! A snapshot is committed after each completed mutation: placement, a
//! property change, delete, clear, and a drag that actually moved the shape.
//! Intermediate drag moves are not recorded. Undo restores the previous
//! snapshot and drops the selection.

use tracing::{debug, info};

use crate::config::CanvasSettings;
use crate::consts::DEFAULT_BRUSH;
use crate::geometry::{Canvas, Point};
use crate::history::{History, Snapshot};
use crate::input::{self, Effect, InputEvent, InteractionState};
use crate::registry::Registry;
use crate::shape::{Rgb, Shape, ShapeId, ShapeKind, ShapePatch, SizeRange};

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A short, transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Pointer cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Crosshair,
}

/// Actions returned from editor operations for the host to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShapeCreated(ShapeId),
    ShapeUpdated(ShapeId),
    ShapeDeleted(ShapeId),
    SelectionChanged(Option<ShapeId>),
    CanvasCleared,
    /// The registry was replaced from history; redraw everything.
    Restored,
    SetCursor(Cursor),
    Notify(Notice),
}

/// One editing session on one canvas: registry, undo history, the active
/// gesture, and the brush color used for new shapes.
#[derive(Debug, Clone)]
pub struct Editor {
    registry: Registry,
    history: History,
    state: InteractionState,
    brush: Rgb,
    /// A mutation landed mid-drag and waits for the drag to end.
    pending: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&CanvasSettings::default())
    }
}

impl Editor {
    #[must_use]
    pub fn new(settings: &CanvasSettings) -> Self {
        let canvas = Canvas::new(settings.width, settings.height);
        let range = SizeRange { min: settings.min_size, max: settings.max_size };
        let registry = Registry::new(canvas, range, settings.default_size);
        let mut history = History::new(settings.history_cap);
        history.reset(registry.snapshot());
        Self { registry, history, state: InteractionState::Idle, brush: DEFAULT_BRUSH, pending: false }
    }

    // --- Input events ---

    /// Run one event through the state machine and apply its effects.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        let before = self.state;
        let (next, effects) = input::dispatch(before, event, &self.registry);
        self.state = next;

        let mut actions = Vec::new();
        match (before, next) {
            (InteractionState::PlacingNew(_), InteractionState::PlacingNew(_)) => {}
            (_, InteractionState::PlacingNew(_)) => {
                actions.push(Action::SetCursor(Cursor::Crosshair));
                actions.push(Action::Notify(Notice::info("Click on canvas to place shape")));
            }
            (InteractionState::PlacingNew(_), _) => actions.push(Action::SetCursor(Cursor::Default)),
            _ => {}
        }
        for effect in effects {
            self.apply(effect, &mut actions);
        }
        if self.pending && !self.is_dragging() {
            self.commit();
        }
        actions
    }

    pub fn press_palette(&mut self, kind: ShapeKind) -> Vec<Action> {
        self.handle(InputEvent::PalettePressed(kind))
    }

    pub fn on_pointer_down(&mut self, p: Point) -> Vec<Action> {
        self.handle(InputEvent::PointerDown(p))
    }

    pub fn on_pointer_move(&mut self, p: Point) -> Vec<Action> {
        self.handle(InputEvent::PointerMove(p))
    }

    pub fn on_pointer_up(&mut self, p: Point) -> Vec<Action> {
        self.handle(InputEvent::PointerUp(p))
    }

    pub fn cancel(&mut self) -> Vec<Action> {
        self.handle(InputEvent::Cancel)
    }

    fn apply(&mut self, effect: Effect, actions: &mut Vec<Action>) {
        match effect {
            Effect::Create { kind, at } => {
                let Some(id) = self.registry.create(kind, at, self.brush).map(|s| s.id) else {
                    return;
                };
                info!(%id, %kind, "editor: shape placed");
                self.commit();
                actions.push(Action::ShapeCreated(id));
                actions.push(Action::SelectionChanged(Some(id)));
                actions.push(Action::Notify(Notice::success(format!("Added {kind} shape!"))));
            }
            Effect::Select(id) => {
                if self.registry.select(&id) {
                    if let Some(shape) = self.registry.get(&id) {
                        self.brush = shape.color;
                    }
                    actions.push(Action::SelectionChanged(Some(id)));
                }
            }
            Effect::Deselect => {
                if self.registry.selected_id().is_some() {
                    self.registry.deselect();
                    actions.push(Action::SelectionChanged(None));
                }
            }
            Effect::MoveTo { id, center } => {
                if self.registry.update(&id, &ShapePatch::position(center)) {
                    actions.push(Action::ShapeUpdated(id));
                }
            }
            Effect::CommitDrag { id, origin } => {
                let moved = self.registry.get(&id).is_some_and(|s| s.position != origin);
                if moved || self.pending {
                    debug!(%id, "editor: drag committed");
                    self.commit();
                }
            }
        }
    }

    // --- Property controls ---

    /// Change the brush color and recolor the selected shape, if any.
    pub fn set_color(&mut self, color: Rgb) -> Vec<Action> {
        self.brush = color;
        self.update_selected(ShapePatch::color(color))
    }

    /// Resize the selected shape to a nominal slider size.
    pub fn set_size(&mut self, size: f64) -> Vec<Action> {
        self.update_selected(ShapePatch::size(size))
    }

    /// Set explicit width and height on the selected rectangle.
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.update_selected(ShapePatch::dimensions(width, height))
    }

    /// Rotate the selected shape to `degrees`.
    pub fn set_rotation(&mut self, degrees: f64) -> Vec<Action> {
        self.update_selected(ShapePatch::rotation(degrees))
    }

    /// Apply a committed update to `id`. Unknown ids, rejected patches and
    /// updates that change nothing are ignored.
    pub fn update(&mut self, id: &ShapeId, patch: &ShapePatch) -> Vec<Action> {
        let Some(before) = self.registry.get(id).cloned() else {
            return vec![];
        };
        if patch.is_empty() || !self.registry.update(id, patch) {
            return vec![];
        }
        if self.registry.get(id) == Some(&before) {
            return vec![];
        }
        self.commit();
        vec![Action::ShapeUpdated(*id)]
    }

    fn update_selected(&mut self, patch: ShapePatch) -> Vec<Action> {
        match self.registry.selected_id() {
            Some(id) => self.update(&id, &patch),
            None => vec![],
        }
    }

    // --- Commands ---

    /// Delete the selected shape.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.registry.selected_id() else {
            return vec![Action::Notify(Notice::info("No shape selected"))];
        };
        let mut actions = self.delete(&id);
        if !actions.is_empty() {
            actions.push(Action::Notify(Notice::info("Shape deleted!")));
        }
        actions
    }

    /// Delete `id`. Unknown ids are ignored.
    pub fn delete(&mut self, id: &ShapeId) -> Vec<Action> {
        if !self.registry.delete(id) {
            return vec![];
        }
        self.abandon_drag_of(id);
        self.commit();
        vec![Action::ShapeDeleted(*id), Action::SelectionChanged(self.registry.selected_id())]
    }

    /// Remove every shape. Clearing an empty canvas records nothing.
    pub fn clear(&mut self) -> Vec<Action> {
        if self.registry.is_empty() {
            return vec![];
        }
        self.registry.clear();
        self.state = InteractionState::Idle;
        self.commit();
        vec![
            Action::CanvasCleared,
            Action::SelectionChanged(None),
            Action::Notify(Notice::info("Canvas cleared!")),
        ]
    }

    /// Revert the last committed mutation.
    pub fn undo(&mut self) -> Vec<Action> {
        if self.pending {
            self.history.push(self.registry.snapshot());
            self.pending = false;
        }
        let Some(previous) = self.history.undo() else {
            return vec![Action::Notify(Notice::info("Nothing to undo"))];
        };
        self.registry.restore(previous);
        self.state = InteractionState::Idle;
        debug!(shapes = self.registry.len(), "editor: undo");
        vec![Action::Restored, Action::SelectionChanged(None), Action::Notify(Notice::info("Undo successful!"))]
    }

    /// Drop all shapes and history, as when a new task loads.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.history.reset(Snapshot::default());
        self.state = InteractionState::Idle;
        self.pending = false;
    }

    /// Record the registry in history. During a drag the record is deferred
    /// to the drag's end so intermediate positions never become undo points.
    fn commit(&mut self) {
        if self.is_dragging() {
            self.pending = true;
            return;
        }
        self.history.push(self.registry.snapshot());
        self.pending = false;
    }

    fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    fn abandon_drag_of(&mut self, id: &ShapeId) {
        if let InteractionState::Dragging { id: dragged, .. } = self.state {
            if dragged == *id {
                self.state = InteractionState::Idle;
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    #[must_use]
    pub fn brush(&self) -> Rgb {
        self.brush
    }

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.registry.selected_id()
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.registry.shapes()
    }
}
