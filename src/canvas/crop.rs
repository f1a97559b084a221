//! Crop rectangle manipulation. Everything here is in view space.

use egui::{Pos2, Rect, Vec2, pos2};

use crate::geometry::ViewTransform;
use crate::geometry::hit_testing::distance_to_segment;

/// Part of the crop rectangle grabbed by a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    /// Inside the region: moves it as a whole.
    Body,
}

impl CropHandle {
    pub const CORNERS: [CropHandle; 4] = [
        CropHandle::TopLeft,
        CropHandle::TopRight,
        CropHandle::BottomRight,
        CropHandle::BottomLeft,
    ];

    pub const EDGES: [CropHandle; 4] = [
        CropHandle::Top,
        CropHandle::Right,
        CropHandle::Bottom,
        CropHandle::Left,
    ];

    fn moves_left(self) -> bool {
        matches!(self, CropHandle::TopLeft | CropHandle::Left | CropHandle::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, CropHandle::TopRight | CropHandle::Right | CropHandle::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, CropHandle::TopLeft | CropHandle::Top | CropHandle::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, CropHandle::BottomLeft | CropHandle::Bottom | CropHandle::BottomRight)
    }
}

/// The pending crop rectangle.
///
/// While a handle is dragged the edges may cross; [`CropRegion::normalize`]
/// restores `left < right` and `top < bottom` when the gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl CropRegion {
    pub fn new(a: Pos2, b: Pos2) -> Self {
        let mut region = Self {
            left: a.x,
            top: a.y,
            right: b.x,
            bottom: b.y,
        };
        region.normalize();
        region
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.min, rect.max)
    }

    /// Zero-size region at `point`, grown by dragging a corner.
    pub(crate) fn at_point(point: Pos2) -> Self {
        Self {
            left: point.x,
            top: point.y,
            right: point.x,
            bottom: point.y,
        }
    }

    /// Normalized rectangle, regardless of drag state.
    pub fn rect(&self) -> Rect {
        Rect::from_two_pos(pos2(self.left, self.top), pos2(self.right, self.bottom))
    }

    pub fn normalize(&mut self) {
        if self.left > self.right {
            std::mem::swap(&mut self.left, &mut self.right);
        }
        if self.top > self.bottom {
            std::mem::swap(&mut self.top, &mut self.bottom);
        }
    }

    pub fn is_at_least(&self, min_size: f32) -> bool {
        let rect = self.rect();
        rect.width() >= min_size && rect.height() >= min_size
    }

    pub fn handle_position(&self, handle: CropHandle) -> Pos2 {
        let rect = self.rect();
        match handle {
            CropHandle::TopLeft => rect.left_top(),
            CropHandle::Top => rect.center_top(),
            CropHandle::TopRight => rect.right_top(),
            CropHandle::Right => rect.right_center(),
            CropHandle::BottomRight => rect.right_bottom(),
            CropHandle::Bottom => rect.center_bottom(),
            CropHandle::BottomLeft => rect.left_bottom(),
            CropHandle::Left => rect.left_center(),
            CropHandle::Body => rect.center(),
        }
    }

    /// Handle under `pos`. Corners win over edges, edges over the body.
    pub fn handle_at(&self, pos: Pos2, radius: f32) -> Option<CropHandle> {
        let rect = self.rect();
        if let Some(corner) = CropHandle::CORNERS
            .into_iter()
            .find(|&corner| self.handle_position(corner).distance(pos) <= radius)
        {
            return Some(corner);
        }
        let edge_segment = |edge: CropHandle| match edge {
            CropHandle::Top => (rect.left_top(), rect.right_top()),
            CropHandle::Right => (rect.right_top(), rect.right_bottom()),
            CropHandle::Bottom => (rect.left_bottom(), rect.right_bottom()),
            _ => (rect.left_top(), rect.left_bottom()),
        };
        if let Some(edge) = CropHandle::EDGES.into_iter().find(|&edge| {
            let (a, b) = edge_segment(edge);
            distance_to_segment(pos, a, b) <= radius
        }) {
            return Some(edge);
        }
        rect.contains(pos).then_some(CropHandle::Body)
    }

    /// Move `handle` to `pos`, or shift the body by `delta`. Everything stays
    /// inside `bounds`.
    pub fn drag(&mut self, handle: CropHandle, pos: Pos2, delta: Vec2, bounds: Rect) {
        if handle == CropHandle::Body {
            let rect = self.rect();
            let dx = delta.x.clamp(bounds.min.x - rect.min.x, (bounds.max.x - rect.max.x).max(bounds.min.x - rect.min.x));
            let dy = delta.y.clamp(bounds.min.y - rect.min.y, (bounds.max.y - rect.max.y).max(bounds.min.y - rect.min.y));
            self.left += dx;
            self.right += dx;
            self.top += dy;
            self.bottom += dy;
            return;
        }
        let pos = pos.clamp(bounds.min, bounds.max);
        if handle.moves_left() {
            self.left = pos.x;
        }
        if handle.moves_right() {
            self.right = pos.x;
        }
        if handle.moves_top() {
            self.top = pos.y;
        }
        if handle.moves_bottom() {
            self.bottom = pos.y;
        }
    }

    /// Map back through `view` to a whole-pixel block of a `raster_size`
    /// raster, as `(x, y, width, height)`. `None` if nothing of the raster is
    /// covered.
    pub fn to_pixel_rect(&self, view: &ViewTransform, raster_size: Vec2) -> Option<(u32, u32, u32, u32)> {
        let image = view.view_rect_to_image(self.rect());
        let left = image.min.x.max(0.0).floor();
        let top = image.min.y.max(0.0).floor();
        let right = image.max.x.min(raster_size.x).ceil();
        let bottom = image.max.y.min(raster_size.y).ceil();
        if !(right > left && bottom > top) {
            return None;
        }
        Some((left as u32, top as u32, (right - left) as u32, (bottom - top) as u32))
    }
}
