//! Final sizing of figure regions.

use crate::model::Rect;

/// Pad a rectangle on every side, clamped to `[0, width] x [0, height]`.
pub fn pad(bbox: Rect, page_width: f32, page_height: f32, padding: f32) -> Rect {
    Rect::new(
        (bbox.x0 - padding).max(0.0),
        (bbox.y0 - padding).max(0.0),
        (bbox.x1 + padding).min(page_width),
        (bbox.y1 + padding).min(page_height),
    )
}

/// Check that both sides of a cluster reach `min_size`.
pub fn meets_min_size(bbox: &Rect, min_size: f32) -> bool {
    bbox.width() >= min_size && bbox.height() >= min_size
}
