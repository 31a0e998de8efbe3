//! Shape registry: the authoritative, ordered collection of placed shapes.
//!
//! The registry owns creation, mutation and deletion of shapes and enforces
//! the geometric invariants: every dimension stays inside the configured size
//! range and every shape's rotated bounding box stays on the canvas. At most
//! one shape is selected at a time.
//!
//! References to ids that are no longer present (stale handlers, double
//! deletes) are logged and ignored rather than reported to the caller.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::geometry::{Canvas, Point};
use crate::history::Snapshot;
use crate::shape::{
    Dimensions, Rgb, SerializedShape, Shape, ShapeId, ShapeKind, ShapePatch, SizeRange, normalize_rotation,
};

/// Ordered, in-memory collection of shapes on one canvas.
#[derive(Debug, Clone)]
pub struct Registry {
    canvas: Canvas,
    range: SizeRange,
    default_size: f64,
    shapes: Vec<Shape>,
    selected: Option<ShapeId>,
}

impl Registry {
    /// Create an empty registry for `canvas`.
    #[must_use]
    pub fn new(canvas: Canvas, range: SizeRange, default_size: f64) -> Self {
        Self { canvas, range, default_size, shapes: Vec::new(), selected: None }
    }

    // --- Mutations ---

    /// Place a new shape of `kind` centered at `center` and select it.
    ///
    /// Returns `None` without changing anything when `center` is off the
    /// canvas. A shape that would overhang an edge is nudged inward.
    pub fn create(&mut self, kind: ShapeKind, center: Point, color: Rgb) -> Option<&Shape> {
        if !center.is_finite() {
            warn!(?center, %kind, "registry: create at non-finite point ignored");
            return None;
        }
        if !self.canvas.contains(center) {
            debug!(?center, %kind, "registry: create outside canvas ignored");
            return None;
        }
        let dims = Dimensions::for_kind(kind, self.default_size, self.range);
        let position = self.canvas.clamp_center(center, dims.extent(0.0));
        let shape = Shape { id: Uuid::new_v4(), dims, color, rotation: 0.0, position };
        debug!(id = %shape.id, %kind, ?position, "registry: shape created");
        self.selected = Some(shape.id);
        self.shapes.push(shape);
        self.shapes.last()
    }

    /// Remove the shape with `id`. Returns false if it was not present.
    pub fn delete(&mut self, id: &ShapeId) -> bool {
        let Some(index) = self.index_of(id) else {
            warn!(%id, "registry: delete of unknown shape ignored");
            return false;
        };
        self.shapes.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        true
    }

    /// Apply a sparse update. Sizes are clamped to the size range and the
    /// final position is clamped to the canvas. Returns false if `id` is
    /// unknown or the patch carries a non-finite number.
    pub fn update(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        if !patch.is_finite() {
            warn!(%id, ?patch, "registry: non-finite update ignored");
            return false;
        }
        let (canvas, range) = (self.canvas, self.range);
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == *id) else {
            warn!(%id, "registry: update of unknown shape ignored");
            return false;
        };

        if let Some(color) = patch.color {
            shape.color = color;
        }
        if let Some(size) = patch.size {
            shape.dims = Dimensions::for_kind(shape.kind(), size, range);
        }
        if let Some((width, height)) = patch.dimensions {
            if let Dimensions::Rectangle { .. } = shape.dims {
                shape.dims = Dimensions::Rectangle { width: range.clamp(width), height: range.clamp(height) };
            } else {
                warn!(%id, kind = %shape.kind(), "registry: width/height ignored for non-rectangle");
            }
        }
        if let Some(rotation) = patch.rotation {
            shape.rotation = normalize_rotation(rotation);
        }
        if let Some(position) = patch.position {
            shape.position = position;
        }
        shape.position = canvas.clamp_center(shape.position, shape.extent());
        true
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
    }

    /// Select `id`, deselecting any other shape. Returns false if unknown.
    pub fn select(&mut self, id: &ShapeId) -> bool {
        if self.index_of(id).is_none() {
            warn!(%id, "registry: select of unknown shape ignored");
            return false;
        }
        self.selected = Some(*id);
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    // --- Snapshots ---

    /// Immutable copy of the current shape data.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.shapes.clone())
    }

    /// Replace all shapes with a snapshot's contents. Clears the selection.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.shapes = snapshot.shapes().to_vec();
        self.selected = None;
    }

    // --- Queries ---

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == *id)
    }

    /// Shapes in insertion order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Shape> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// The most recently placed shape whose bounding box contains `p`.
    #[must_use]
    pub fn topmost_at(&self, p: Point) -> Option<&Shape> {
        self.shapes.iter().rev().find(|s| s.contains(p))
    }

    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    #[must_use]
    pub fn size_range(&self) -> SizeRange {
        self.range
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Center of `shape` as whole percentages of the canvas size.
    #[must_use]
    pub fn position_percent(&self, shape: &Shape) -> (i64, i64) {
        self.canvas.percent(shape.position)
    }

    /// Wire form of every shape, in insertion order.
    #[must_use]
    pub fn to_serializable(&self) -> Vec<SerializedShape> {
        self.shapes
            .iter()
            .map(|shape| {
                let (x, y) = self.position_percent(shape);
                SerializedShape {
                    kind: shape.kind(),
                    color: shape.color,
                    position: format!("{x}% {y}%"),
                    size: shape.size().css(),
                    rotation: format!("{}deg", shape.rotation),
                }
            })
            .collect()
    }

    fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == *id)
    }
}
