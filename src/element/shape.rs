use egui::{Color32, Painter, Pos2, Rect, Shape as EguiShape, Stroke, Vec2};
use image::RgbaImage;

use super::ObjectId;
use super::common::{clamp_stroke_width, inflate_for_stroke, scaled_width};
use crate::geometry::hit_testing::{distance_to_rect_outline, near_ellipse_outline};
use crate::geometry::{TransformMatrix, ViewTransform};
use crate::raster::paint::{stroke_ellipse, stroke_rect};

/// Two-point shape shared by rectangles and ellipses.
///
/// `start` and `end` are opposite corners in whatever order the user dragged
/// them; [`Shape::rect`] normalizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ObjectId,
    start: Pos2,
    end: Pos2,
    color: Color32,
    width: f32,
}

impl Shape {
    pub fn new(start: Pos2, color: Color32, width: f32) -> Self {
        Self {
            id: ObjectId::new(),
            start,
            end: start,
            color,
            width: clamp_stroke_width(width),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn end(&self) -> Pos2 {
        self.end
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_end(&mut self, point: Pos2) {
        self.end = point;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_two_pos(self.start, self.end)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    pub fn transform(&mut self, matrix: &TransformMatrix) {
        self.start = matrix.map_point(self.start);
        self.end = matrix.map_point(self.end);
        self.width = scaled_width(self.width, matrix);
    }

    pub fn bounds(&self) -> Rect {
        inflate_for_stroke(self.rect(), self.width)
    }

    pub fn hit_test_rectangle(&self, pos: Pos2, padding: f32) -> bool {
        distance_to_rect_outline(pos, self.rect()) <= self.width + padding
    }

    pub fn hit_test_ellipse(&self, pos: Pos2, padding: f32) -> bool {
        near_ellipse_outline(pos, self.rect(), self.width + padding)
    }

    pub fn render_rectangle(&self, target: &mut RgbaImage) {
        stroke_rect(target, self.rect(), self.color, self.width);
    }

    pub fn render_ellipse(&self, target: &mut RgbaImage) {
        stroke_ellipse(target, self.rect(), self.color, self.width);
    }

    pub fn paint_rectangle(&self, painter: &Painter, view: &ViewTransform) {
        let rect = view.image_rect_to_view(self.rect());
        painter.rect_stroke(rect, 0.0, Stroke::new(self.width * view.scale(), self.color));
    }

    pub fn paint_ellipse(&self, painter: &Painter, view: &ViewTransform) {
        let rect = view.image_rect_to_view(self.rect());
        painter.add(EguiShape::ellipse_stroke(
            rect.center(),
            rect.size() / 2.0,
            Stroke::new(self.width * view.scale(), self.color),
        ));
    }
}
