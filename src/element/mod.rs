//! Vector annotations drawn over the raster.
//!
//! Every coordinate stored here is in image space. View-space positions are
//! only computed when painting.

use std::fmt;

use egui::{Color32, Painter, Pos2, Rect, Vec2};
use image::RgbaImage;
use uuid::Uuid;

mod common;
mod line;
mod shape;
mod text;

pub use common::{MIN_STROKE_WIDTH, STROKE_HIT_PADDING, TEXT_HIT_PADDING};
pub use line::Line;
pub use shape::Shape;
pub use text::{FontFace, FontStyle, TextLabel, TextProperties};

use crate::geometry::{TransformMatrix, ViewTransform};

/// Stable identity of a drawing object, independent of its list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drag-created object kinds. Text is placed with [`DrawingObject::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Line,
    Rectangle,
    Ellipse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawingObject {
    Line(Line),
    Rectangle(Shape),
    Ellipse(Shape),
    Text(TextLabel),
}

impl DrawingObject {
    /// New object with `end == start`.
    pub fn create(kind: ObjectKind, start: Pos2, color: Color32, stroke_width: f32) -> Self {
        match kind {
            ObjectKind::Line => DrawingObject::Line(Line::new(start, color, stroke_width)),
            ObjectKind::Rectangle => DrawingObject::Rectangle(Shape::new(start, color, stroke_width)),
            ObjectKind::Ellipse => DrawingObject::Ellipse(Shape::new(start, color, stroke_width)),
        }
    }

    pub fn text(origin: Pos2, properties: &TextProperties) -> Self {
        DrawingObject::Text(TextLabel::new(origin, properties.clone()))
    }

    pub fn id(&self) -> ObjectId {
        match self {
            DrawingObject::Line(line) => line.id(),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.id(),
            DrawingObject::Text(label) => label.id(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DrawingObject::Line(_) => "line",
            DrawingObject::Rectangle(_) => "rectangle",
            DrawingObject::Ellipse(_) => "ellipse",
            DrawingObject::Text(_) => "text",
        }
    }

    pub fn start(&self) -> Pos2 {
        self.anchor_points().0
    }

    pub fn end(&self) -> Pos2 {
        self.anchor_points().1
    }

    /// `(start, end)`. A text label's end is its origin.
    pub fn anchor_points(&self) -> (Pos2, Pos2) {
        match self {
            DrawingObject::Line(line) => {
                let start = line.start().unwrap_or(Pos2::ZERO);
                (start, line.end().unwrap_or(start))
            }
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => {
                (shape.start(), shape.end())
            }
            DrawingObject::Text(label) => (label.origin(), label.origin()),
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            DrawingObject::Line(line) => line.color(),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.color(),
            DrawingObject::Text(label) => label.properties().color,
        }
    }

    /// Text is filled, not stroked, and reports the minimum width.
    pub fn stroke_width(&self) -> f32 {
        match self {
            DrawingObject::Line(line) => line.width(),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.width(),
            DrawingObject::Text(_) => MIN_STROKE_WIDTH,
        }
    }

    /// Gesture-move update: lines grow, shapes move their end corner, text
    /// ignores it.
    pub fn extend(&mut self, point: Pos2) {
        match self {
            DrawingObject::Line(line) => line.push(point),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.set_end(point),
            DrawingObject::Text(_) => {}
        }
    }

    pub fn set_end(&mut self, point: Pos2) {
        match self {
            DrawingObject::Line(line) => line.set_end(point),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.set_end(point),
            DrawingObject::Text(_) => {}
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            DrawingObject::Line(line) => line.translate(delta),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.translate(delta),
            DrawingObject::Text(label) => label.translate(delta),
        }
    }

    /// Map every defining point through `matrix`.
    pub fn transform(&mut self, matrix: &TransformMatrix) {
        match self {
            DrawingObject::Line(line) => line.transform(matrix),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.transform(matrix),
            DrawingObject::Text(label) => label.transform(matrix),
        }
    }

    /// Hit test with the default tolerances.
    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.hit_test_padded(pos, STROKE_HIT_PADDING, TEXT_HIT_PADDING)
    }

    /// `stroke_padding` is added to the stroke width for lines and shapes;
    /// `text_padding` grows the measured box of text labels.
    pub fn hit_test_padded(&self, pos: Pos2, stroke_padding: f32, text_padding: f32) -> bool {
        match self {
            DrawingObject::Line(line) => line.hit_test(pos, stroke_padding),
            DrawingObject::Rectangle(shape) => shape.hit_test_rectangle(pos, stroke_padding),
            DrawingObject::Ellipse(shape) => shape.hit_test_ellipse(pos, stroke_padding),
            DrawingObject::Text(label) => label.hit_test(pos, text_padding),
        }
    }

    /// Image-space extent of what [`DrawingObject::render`] draws.
    pub fn bounds(&self) -> Rect {
        match self {
            DrawingObject::Line(line) => line.bounds(),
            DrawingObject::Rectangle(shape) | DrawingObject::Ellipse(shape) => shape.bounds(),
            DrawingObject::Text(label) => label.bounds(),
        }
    }

    /// Whether the object may be committed to the overlay.
    pub fn is_committable(&self) -> bool {
        match self {
            DrawingObject::Line(line) => !line.points().is_empty(),
            DrawingObject::Rectangle(_) | DrawingObject::Ellipse(_) => true,
            DrawingObject::Text(label) => !label.text().is_empty(),
        }
    }

    /// Rasterize into `target`, in image coordinates.
    pub fn render(&self, target: &mut RgbaImage) {
        match self {
            DrawingObject::Line(line) => line.render(target),
            DrawingObject::Rectangle(shape) => shape.render_rectangle(target),
            DrawingObject::Ellipse(shape) => shape.render_ellipse(target),
            DrawingObject::Text(label) => label.render(target),
        }
    }

    /// Draw on screen through the view transform.
    pub fn paint(&self, painter: &Painter, view: &ViewTransform) {
        match self {
            DrawingObject::Line(line) => line.paint(painter, view),
            DrawingObject::Rectangle(shape) => shape.paint_rectangle(painter, view),
            DrawingObject::Ellipse(shape) => shape.paint_ellipse(painter, view),
            DrawingObject::Text(label) => label.paint(painter, view),
        }
    }
}
