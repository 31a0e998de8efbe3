//! Shared constants for the shape editor.

use crate::shape::Rgb;

// ── Canvas ──────────────────────────────────────────────────────

/// Default canvas width in CSS pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;

/// Default canvas height in CSS pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

// ── Shapes ──────────────────────────────────────────────────────

/// Nominal size given to a freshly placed shape.
pub const DEFAULT_SHAPE_SIZE: f64 = 60.0;

/// Smallest size any shape dimension may take.
pub const MIN_SHAPE_SIZE: f64 = 20.0;

/// Largest size any shape dimension may take.
pub const MAX_SHAPE_SIZE: f64 = 140.0;

/// Rectangle width as a multiple of the nominal size (90 for 60).
pub const RECT_WIDTH_RATIO: f64 = 1.5;

/// Rectangle height as a multiple of the nominal size (45 for 60).
pub const RECT_HEIGHT_RATIO: f64 = 0.75;

/// Brush color selected when the editor opens.
pub const DEFAULT_BRUSH: Rgb = Rgb::new(0xFF, 0x6B, 0x6B);

// ── History ─────────────────────────────────────────────────────

/// Snapshots kept before the oldest is evicted.
pub const DEFAULT_HISTORY_CAP: usize = 20;

// ── Backend ─────────────────────────────────────────────────────

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
