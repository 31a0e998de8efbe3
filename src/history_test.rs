use uuid::Uuid;

use super::*;
use crate::geometry::Point;
use crate::shape::{Dimensions, Rgb};

fn snap(n: usize) -> Snapshot {
    let shapes = (0..n)
        .map(|_| Shape {
            id: Uuid::new_v4(),
            dims: Dimensions::Square { side: 60.0 },
            color: Rgb::new(0, 0, 0),
            rotation: 0.0,
            position: Point::new(100.0, 100.0),
        })
        .collect();
    Snapshot::new(shapes)
}

#[test]
fn new_history_is_empty() {
    let h = History::new(20);
    assert!(h.is_empty());
    assert!(!h.can_undo());
    assert_eq!(h.capacity(), 20);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    assert_eq!(History::new(0).capacity(), 1);
}

#[test]
fn undo_on_empty_returns_none() {
    let mut h = History::new(5);
    assert!(h.undo().is_none());
}

#[test]
fn undo_on_single_entry_is_noop() {
    let mut h = History::new(5);
    h.push(snap(0));
    assert!(h.undo().is_none());
    assert_eq!(h.len(), 1);
}

#[test]
fn undo_returns_prior_state() {
    let mut h = History::new(5);
    let base = snap(0);
    let one = snap(1);
    h.push(base.clone());
    h.push(one);
    assert_eq!(h.undo(), Some(&base));
    assert_eq!(h.len(), 1);
    assert!(!h.can_undo());
}

#[test]
fn push_past_capacity_evicts_oldest() {
    let mut h = History::new(3);
    let entries: Vec<Snapshot> = (0..4).map(snap).collect();
    for e in &entries {
        h.push(e.clone());
    }
    assert_eq!(h.len(), 3);
    assert_eq!(h.top(), Some(&entries[3]));
    // Oldest (0 shapes) is gone: undoing twice lands on entry 1.
    h.undo();
    assert_eq!(h.undo(), Some(&entries[1]));
    assert!(h.undo().is_none());
}

#[test]
fn never_exceeds_capacity() {
    let mut h = History::new(20);
    for i in 0..100 {
        h.push(snap(i % 3));
        assert!(h.len() <= 20);
    }
    assert_eq!(h.len(), 20);
}

#[test]
fn reset_leaves_single_base_entry() {
    let mut h = History::new(5);
    h.push(snap(1));
    h.push(snap(2));
    h.reset(Snapshot::default());
    assert_eq!(h.len(), 1);
    assert!(h.top().is_some_and(Snapshot::is_empty));
    assert!(!h.can_undo());
}

#[test]
fn snapshot_is_independent_copy() {
    let mut shapes = snap(1).shapes().to_vec();
    let s = Snapshot::new(shapes.clone());
    shapes[0].rotation = 90.0;
    assert_eq!(s.shapes()[0].rotation.to_bits(), 0.0f64.to_bits());
    assert_eq!(s.len(), 1);
}
