//! Undo history: a capacity-bounded stack of registry snapshots.
//!
//! The top of the stack always mirrors the registry right after the last
//! committed mutation. Undo discards the top and hands back the entry below
//! it for the registry to restore. Once capacity is exceeded the oldest entry
//! is evicted; entries are never reordered.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::trace;

use crate::shape::Shape;

/// Immutable value copy of the registry's shapes at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    shapes: Vec<Shape>,
}

impl Snapshot {
    #[must_use]
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Bounded snapshot log with FIFO eviction.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` snapshots
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity + 1), capacity }
    }

    /// Record a committed state, evicting the oldest entry when full.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        trace!(depth = self.entries.len(), "history: pushed");
    }

    /// Drop the current state and return the one before it.
    ///
    /// Returns `None`, leaving the stack untouched, when there is nothing
    /// earlier to go back to.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop_back();
        self.entries.back()
    }

    /// Forget everything and start over from `base`.
    pub fn reset(&mut self, base: Snapshot) {
        self.entries.clear();
        self.entries.push_back(base);
    }

    /// The most recently committed state.
    #[must_use]
    pub fn top(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.entries.len() > 1
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
