//! Canvas-local geometry: points, the fixed canvas rectangle, and the
//! axis-aligned extents of rotated shapes.
//!
//! All coordinates are canvas-local CSS pixels with the origin at the top-left
//! corner and y growing downward. Rotation is clockwise in degrees, matching
//! CSS `rotate()`.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in canvas-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Vector from `origin` to `self`.
    #[must_use]
    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    /// Rotate around the origin by `degrees` (clockwise in screen space).
    #[must_use]
    pub fn rotated(self, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Axis-aligned bounds of a shape relative to its center.
///
/// `left` and `top` are non-positive, `right` and `bottom` non-negative. A
/// rotated triangle is not symmetric around its center, so all four sides are
/// kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Extent {
    /// Symmetric extent of a `width × height` box.
    #[must_use]
    pub fn centered(width: f64, height: f64) -> Self {
        Self { left: -width / 2.0, top: -height / 2.0, right: width / 2.0, bottom: height / 2.0 }
    }

    /// Tightest extent containing every point.
    #[must_use]
    pub fn enclosing(points: &[Point]) -> Self {
        points.iter().fold(
            Self { left: 0.0, top: 0.0, right: 0.0, bottom: 0.0 },
            |acc, p| Self {
                left: acc.left.min(p.x),
                top: acc.top.min(p.y),
                right: acc.right.max(p.x),
                bottom: acc.bottom.max(p.y),
            },
        )
    }

    /// Extent of a `width × height` box rotated around its center.
    #[must_use]
    pub fn rotated_box(width: f64, height: f64, degrees: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let corners = [Point::new(-hw, -hh), Point::new(hw, -hh), Point::new(hw, hh), Point::new(-hw, hh)];
        Self::enclosing(&corners.map(|c| c.rotated(degrees)))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The fixed, axis-aligned editing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `p` lies on the canvas (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Move `center` the minimum distance needed for `extent` to sit fully
    /// inside the canvas. An extent larger than the canvas is centered.
    #[must_use]
    pub fn clamp_center(&self, center: Point, extent: Extent) -> Point {
        Point::new(
            clamp_axis(center.x, extent.left, extent.right, self.width),
            clamp_axis(center.y, extent.top, extent.bottom, self.height),
        )
    }

    /// Position of `p` as whole percentages of the canvas width and height.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(&self, p: Point) -> (i64, i64) {
        let x = (p.x / self.width * 100.0).round() as i64;
        let y = (p.y / self.height * 100.0).round() as i64;
        (x, y)
    }

    /// The canvas center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

fn clamp_axis(value: f64, low: f64, high: f64, span: f64) -> f64 {
    let min = -low;
    let max = span - high;
    if min > max {
        return (span - low - high) / 2.0;
    }
    value.max(min).min(max)
}
