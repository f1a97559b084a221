use egui::Rect;

use crate::geometry::TransformMatrix;

// Hit-test tolerances, in image units
pub const STROKE_HIT_PADDING: f32 = 10.0;
pub const TEXT_HIT_PADDING: f32 = 20.0;

pub const MIN_STROKE_WIDTH: f32 = 1.0;

pub(crate) fn clamp_stroke_width(width: f32) -> f32 {
    if width.is_finite() { width.max(MIN_STROKE_WIDTH) } else { MIN_STROKE_WIDTH }
}

/// Grow `rect` by half the stroke width so it covers what is actually drawn.
pub(crate) fn inflate_for_stroke(rect: Rect, width: f32) -> Rect {
    rect.expand(width / 2.0)
}

/// Stroke width after a remap. Quarter turns and flips keep it unchanged.
pub(crate) fn scaled_width(width: f32, matrix: &TransformMatrix) -> f32 {
    clamp_stroke_width(width * matrix.uniform_scale())
}
