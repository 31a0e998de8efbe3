//! Shape model: the closed set of shape kinds, their kind-specific
//! dimensions, colors, and the sparse update type used by the registry.
//!
//! A [`Shape`] is a plain value with no rendering handles, so cloning one is a
//! full structural copy. History snapshots rely on that.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{RECT_HEIGHT_RATIO, RECT_WIDTH_RATIO};
use crate::geometry::{Extent, Point};

/// Unique identifier for a placed shape. Never reused after deletion.
pub type ShapeId = Uuid;

/// The kind of a shape. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    Rectangle,
    Triangle,
}

impl ShapeKind {
    /// Every kind, in palette order.
    pub const ALL: [ShapeKind; 4] = [Self::Circle, Self::Square, Self::Rectangle, Self::Triangle];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// COLOR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #RRGGBB")]
pub struct ParseColorError(pub String);

/// An RGB color. Written as `#RRGGBB` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_owned());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

// =============================================================================
// SIZE
// =============================================================================

/// Inclusive range every shape dimension is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Kind-specific dimensions. The variant fixes the shape's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimensions {
    /// Disc of the given diameter.
    Circle { diameter: f64 },
    /// Square with the given side.
    Square { side: f64 },
    /// Axis-aligned (before rotation) rectangle.
    Rectangle { width: f64, height: f64 },
    /// Isosceles triangle, apex up, with base and height equal to `side`.
    Triangle { side: f64 },
}

impl Dimensions {
    /// Dimensions for `kind` at a nominal slider size.
    ///
    /// Rectangles keep the 2:1 aspect of the palette item (90×45 at 60).
    #[must_use]
    pub fn for_kind(kind: ShapeKind, nominal: f64, range: SizeRange) -> Self {
        let n = range.clamp(nominal);
        match kind {
            ShapeKind::Circle => Self::Circle { diameter: n },
            ShapeKind::Square => Self::Square { side: n },
            ShapeKind::Rectangle => Self::Rectangle {
                width: range.clamp(nominal * RECT_WIDTH_RATIO),
                height: range.clamp(nominal * RECT_HEIGHT_RATIO),
            },
            ShapeKind::Triangle => Self::Triangle { side: n },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Square { .. } => ShapeKind::Square,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Triangle { .. } => ShapeKind::Triangle,
        }
    }

    /// Scalar or width/height view of these dimensions.
    #[must_use]
    pub fn size(&self) -> Size {
        match *self {
            Self::Circle { diameter: s } | Self::Square { side: s } | Self::Triangle { side: s } => Size::Side(s),
            Self::Rectangle { width, height } => Size::Box { width, height },
        }
    }

    /// Extent around the center when rotated by `degrees`.
    #[must_use]
    pub fn extent(&self, degrees: f64) -> Extent {
        match *self {
            Self::Circle { diameter } => Extent::centered(diameter, diameter),
            Self::Square { side } => Extent::rotated_box(side, side, degrees),
            Self::Rectangle { width, height } => Extent::rotated_box(width, height, degrees),
            Self::Triangle { side } => {
                let h = side / 2.0;
                let vertices = [Point::new(0.0, -h), Point::new(h, h), Point::new(-h, h)];
                Extent::enclosing(&vertices.map(|v| v.rotated(degrees)))
            }
        }
    }
}

/// A shape's size: one dimension, or a width/height pair for rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    Side(f64),
    Box { width: f64, height: f64 },
}

impl Size {
    /// CSS length form: `60px`, or `90px 45px` for a box.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::Side(s) => format!("{s}px"),
            Self::Box { width, height } => format!("{width}px {height}px"),
        }
    }
}

// =============================================================================
// SHAPE
// =============================================================================

/// A placed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub dims: Dimensions,
    pub color: Rgb,
    /// Clockwise rotation in degrees, always in `[0, 360)`.
    pub rotation: f64,
    /// Center in canvas-local coordinates.
    pub position: Point,
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.dims.kind()
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.dims.size()
    }

    /// Axis-aligned extent around the center, rotation included.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.dims.extent(self.rotation)
    }

    /// Top-left corner of the rotated bounding box.
    #[must_use]
    pub fn top_left(&self) -> Point {
        let e = self.extent();
        Point::new(self.position.x + e.left, self.position.y + e.top)
    }

    /// Bottom-right corner of the rotated bounding box.
    #[must_use]
    pub fn bottom_right(&self) -> Point {
        let e = self.extent();
        Point::new(self.position.x + e.right, self.position.y + e.bottom)
    }

    /// Whether `p` falls inside the rotated bounding box.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let (tl, br) = (self.top_left(), self.bottom_right());
        (tl.x..=br.x).contains(&p.x) && (tl.y..=br.y).contains(&p.y)
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Sparse update for a shape. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapePatch {
    pub color: Option<Rgb>,
    /// Nominal slider size; rectangles derive width and height from it.
    pub size: Option<f64>,
    /// Explicit rectangle width and height. Ignored for other kinds.
    pub dimensions: Option<(f64, f64)>,
    pub rotation: Option<f64>,
    /// New center; clamped so the shape stays on the canvas.
    pub position: Option<Point>,
}

impl ShapePatch {
    #[must_use]
    pub fn color(color: Rgb) -> Self {
        Self { color: Some(color), ..Self::default() }
    }

    #[must_use]
    pub fn size(size: f64) -> Self {
        Self { size: Some(size), ..Self::default() }
    }

    #[must_use]
    pub fn dimensions(width: f64, height: f64) -> Self {
        Self { dimensions: Some((width, height)), ..Self::default() }
    }

    #[must_use]
    pub fn rotation(degrees: f64) -> Self {
        Self { rotation: Some(degrees), ..Self::default() }
    }

    #[must_use]
    pub fn position(center: Point) -> Self {
        Self { position: Some(center), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether every numeric field present is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.size.is_none_or(f64::is_finite)
            && self.dimensions.is_none_or(|(w, h)| w.is_finite() && h.is_finite())
            && self.rotation.is_none_or(f64::is_finite)
            && self.position.is_none_or(Point::is_finite)
    }
}

/// Wire form of a shape sent to the validation backend.
///
/// Lengths and angles are CSS strings (`"50% 50%"`, `"60px"`, `"45deg"`), the
/// format the task backend compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedShape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub color: Rgb,
    pub position: String,
    pub size: String,
    pub rotation: String,
}
