//! Page-space geometry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle in page-pixel space.
///
/// The origin is the top-left corner of the page and the y-axis grows
/// downward, matching raster image coordinates. A well-formed rectangle
/// satisfies `x0 <= x1` and `y0 <= y1`.
///
/// Serialized as a `[x0, y0, x1, y1]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Check the `x0 <= x1`, `y0 <= y1` invariant (NaN edges fail it).
    pub fn is_valid(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Check whether the spans overlap on both axes once the comparison is
    /// widened by `threshold` in every direction.
    pub fn is_near(&self, other: &Rect, threshold: f32) -> bool {
        let horizontal = self.x0 <= other.x1 + threshold && other.x0 <= self.x1 + threshold;
        let vertical = self.y0 <= other.y1 + threshold && other.y0 <= self.y1 + threshold;
        horizontal && vertical
    }
}

impl From<[f32; 4]> for Rect {
    fn from(v: [f32; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [f32; 4] {
    fn from(r: Rect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x0, self.y0, self.x1, self.y1)
    }
}
