use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use image::RgbaImage;

use super::ObjectId;
use super::common::{clamp_stroke_width, inflate_for_stroke, scaled_width};
use crate::geometry::hit_testing::{bounds_of, distance_to_polyline};
use crate::geometry::{TransformMatrix, ViewTransform};
use crate::raster::paint::stroke_polyline;

/// Freehand path. Points are in image space, in the order they were drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    id: ObjectId,
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

impl Line {
    pub fn new(start: Pos2, color: Color32, width: f32) -> Self {
        Self {
            id: ObjectId::new(),
            points: vec![start],
            color,
            width: clamp_stroke_width(width),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn start(&self) -> Option<Pos2> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Pos2> {
        self.points.last().copied()
    }

    pub fn push(&mut self, point: Pos2) {
        self.points.push(point);
    }

    /// Move the last point, or start the path if it is empty.
    pub fn set_end(&mut self, point: Pos2) {
        match self.points.last_mut() {
            Some(last) => *last = point,
            None => self.points.push(point),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    pub fn transform(&mut self, matrix: &TransformMatrix) {
        for point in &mut self.points {
            *point = matrix.map_point(*point);
        }
        self.width = scaled_width(self.width, matrix);
    }

    pub fn hit_test(&self, pos: Pos2, padding: f32) -> bool {
        distance_to_polyline(pos, &self.points).is_some_and(|d| d <= self.width + padding)
    }

    pub fn bounds(&self) -> Rect {
        bounds_of(&self.points)
            .map(|rect| inflate_for_stroke(rect, self.width))
            .unwrap_or(Rect::NOTHING)
    }

    pub fn render(&self, target: &mut RgbaImage) {
        stroke_polyline(target, &self.points, self.color, self.width);
    }

    pub fn paint(&self, painter: &Painter, view: &ViewTransform) {
        let width = self.width * view.scale();
        match self.points.as_slice() {
            [] => {}
            [only] => {
                painter.circle_filled(view.image_to_view(*only), width / 2.0, self.color);
            }
            points => {
                let mapped = points.iter().map(|p| view.image_to_view(*p)).collect();
                painter.add(Shape::line(mapped, Stroke::new(width, self.color)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn zigzag() -> Line {
        let mut line = Line::new(pos2(0.0, 0.0), Color32::RED, 2.0);
        line.push(pos2(100.0, 0.0));
        line.push(pos2(100.0, 100.0));
        line
    }

    #[test]
    fn test_hit_uses_width_plus_padding() {
        let line = zigzag();
        assert!(line.hit_test(pos2(50.0, 11.0), 10.0));
        assert!(!line.hit_test(pos2(50.0, 13.0), 10.0));
        assert!(line.hit_test(pos2(105.0, 50.0), 10.0));
        assert!(!line.hit_test(pos2(50.0, 50.0), 10.0));
    }

    #[test]
    fn test_translate_moves_every_point() {
        let mut line = zigzag();
        line.translate(vec2(5.0, -5.0));
        assert_eq!(line.points(), &[pos2(5.0, -5.0), pos2(105.0, -5.0), pos2(105.0, 95.0)]);
        assert_eq!(line.start(), Some(pos2(5.0, -5.0)));
        assert_eq!(line.end(), Some(pos2(105.0, 95.0)));
    }

    #[test]
    fn test_bounds_cover_stroke() {
        let bounds = zigzag().bounds();
        assert_eq!(bounds.min, pos2(-1.0, -1.0));
        assert_eq!(bounds.max, pos2(101.0, 101.0));
    }

    #[test]
    fn test_render_draws_path() {
        let mut img = RgbaImage::new(120, 120);
        zigzag().render(&mut img);
        assert_eq!(img.get_pixel(50, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(50, 50).0, [0, 0, 0, 0]);
    }
}
