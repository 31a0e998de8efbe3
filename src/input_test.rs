#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::geometry::Canvas;
use crate::shape::{Rgb, SizeRange};

fn registry() -> Registry {
    Registry::new(Canvas::new(600.0, 600.0), SizeRange { min: 20.0, max: 140.0 }, 60.0)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn with_square_at(x: f64, y: f64) -> (Registry, ShapeId) {
    let mut reg = registry();
    let id = reg.create(ShapeKind::Square, pt(x, y), Rgb::new(0, 0, 0)).map(|s| s.id).unwrap();
    (reg, id)
}

// =============================================================
// Palette / placement
// =============================================================

#[test]
fn default_state_is_idle() {
    assert_eq!(InteractionState::default(), InteractionState::Idle);
}

#[test]
fn palette_press_arms_placement() {
    let reg = registry();
    let (next, effects) = dispatch(InteractionState::Idle, InputEvent::PalettePressed(ShapeKind::Circle), &reg);
    assert_eq!(next, InteractionState::PlacingNew(ShapeKind::Circle));
    assert!(effects.is_empty());
}

#[test]
fn palette_press_while_placing_switches_kind() {
    let reg = registry();
    let state = InteractionState::PlacingNew(ShapeKind::Circle);
    let (next, _) = dispatch(state, InputEvent::PalettePressed(ShapeKind::Triangle), &reg);
    assert_eq!(next, InteractionState::PlacingNew(ShapeKind::Triangle));
}

#[test]
fn click_inside_canvas_places_shape() {
    let reg = registry();
    let state = InteractionState::PlacingNew(ShapeKind::Square);
    let (next, effects) = dispatch(state, InputEvent::PointerUp(pt(120.0, 80.0)), &reg);
    assert_eq!(next, InteractionState::Idle);
    assert_eq!(effects, vec![Effect::Create { kind: ShapeKind::Square, at: pt(120.0, 80.0) }]);
}

#[test]
fn click_outside_canvas_cancels_placement() {
    let reg = registry();
    let state = InteractionState::PlacingNew(ShapeKind::Square);
    let (next, effects) = dispatch(state, InputEvent::PointerUp(pt(700.0, 80.0)), &reg);
    assert_eq!(next, InteractionState::Idle);
    assert!(effects.is_empty());
}

#[test]
fn placement_takes_priority_over_drag() {
    let (reg, _) = with_square_at(100.0, 100.0);
    let state = InteractionState::PlacingNew(ShapeKind::Circle);
    let (next, effects) = dispatch(state, InputEvent::PointerDown(pt(100.0, 100.0)), &reg);
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn cancel_while_placing_returns_to_idle() {
    let reg = registry();
    let (next, effects) = dispatch(InteractionState::PlacingNew(ShapeKind::Circle), InputEvent::Cancel, &reg);
    assert_eq!(next, InteractionState::Idle);
    assert!(effects.is_empty());
}

// =============================================================
// Selection / drag
// =============================================================

#[test]
fn pointer_down_on_shape_starts_drag() {
    let (reg, id) = with_square_at(100.0, 100.0);
    let (next, effects) = dispatch(InteractionState::Idle, InputEvent::PointerDown(pt(110.0, 90.0)), &reg);
    assert_eq!(next, InteractionState::Dragging { id, offset: pt(40.0, 20.0), origin: pt(100.0, 100.0) });
    assert_eq!(effects, vec![Effect::Select(id)]);
}

#[test]
fn pointer_down_on_empty_canvas_deselects() {
    let (reg, _) = with_square_at(100.0, 100.0);
    let (next, effects) = dispatch(InteractionState::Idle, InputEvent::PointerDown(pt(400.0, 400.0)), &reg);
    assert_eq!(next, InteractionState::Idle);
    assert_eq!(effects, vec![Effect::Deselect]);
}

#[test]
fn pointer_down_off_canvas_does_nothing() {
    let reg = registry();
    let (next, effects) = dispatch(InteractionState::Idle, InputEvent::PointerDown(pt(-10.0, 10.0)), &reg);
    assert_eq!(next, InteractionState::Idle);
    assert!(effects.is_empty());
}

#[test]
fn drag_move_keeps_grab_offset() {
    let (reg, id) = with_square_at(100.0, 100.0);
    let state = InteractionState::Dragging { id, offset: pt(40.0, 20.0), origin: pt(100.0, 100.0) };
    let (next, effects) = dispatch(state, InputEvent::PointerMove(pt(210.0, 190.0)), &reg);
    assert_eq!(next, state);
    // New top-left is (170, 170); the 60px square's center is 30px further.
    assert_eq!(effects, vec![Effect::MoveTo { id, center: pt(200.0, 200.0) }]);
}

#[test]
fn drag_release_commits_once() {
    let (reg, id) = with_square_at(100.0, 100.0);
    let state = InteractionState::Dragging { id, offset: pt(30.0, 30.0), origin: pt(100.0, 100.0) };
    let (next, effects) = dispatch(state, InputEvent::PointerUp(pt(300.0, 300.0)), &reg);
    assert_eq!(next, InteractionState::Idle);
    assert_eq!(effects, vec![Effect::CommitDrag { id, origin: pt(100.0, 100.0) }]);
}

#[test]
fn drag_cancel_still_commits() {
    let (reg, id) = with_square_at(100.0, 100.0);
    let state = InteractionState::Dragging { id, offset: pt(30.0, 30.0), origin: pt(100.0, 100.0) };
    let (next, effects) = dispatch(state, InputEvent::Cancel, &reg);
    assert_eq!(next, InteractionState::Idle);
    assert!(matches!(effects.as_slice(), [Effect::CommitDrag { .. }]));
}

#[test]
fn drag_of_vanished_shape_drops_to_idle() {
    let reg = registry();
    let state = InteractionState::Dragging { id: Uuid::new_v4(), offset: pt(0.0, 0.0), origin: pt(0.0, 0.0) };
    let (next, effects) = dispatch(state, InputEvent::PointerMove(pt(10.0, 10.0)), &reg);
    assert_eq!(next, InteractionState::Idle);
    assert!(effects.is_empty());
}

#[test]
fn palette_press_mid_drag_is_ignored() {
    let (reg, id) = with_square_at(100.0, 100.0);
    let state = InteractionState::Dragging { id, offset: pt(30.0, 30.0), origin: pt(100.0, 100.0) };
    let (next, effects) = dispatch(state, InputEvent::PalettePressed(ShapeKind::Circle), &reg);
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn stray_events_in_idle_are_ignored() {
    let reg = registry();
    for event in [InputEvent::PointerMove(pt(1.0, 1.0)), InputEvent::PointerUp(pt(1.0, 1.0)), InputEvent::Cancel] {
        let (next, effects) = dispatch(InteractionState::Idle, event, &reg);
        assert_eq!(next, InteractionState::Idle);
        assert!(effects.is_empty());
    }
}
