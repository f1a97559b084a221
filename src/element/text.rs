use egui::{Align2, Color32, FontFamily, FontId, Painter, Pos2, Rect, Vec2, pos2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::ObjectId;
use crate::geometry::{TransformMatrix, ViewTransform};
use crate::raster::text::{TextMetrics, draw_text, measure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFace {
    #[default]
    SansSerif,
    Serif,
    Monospace,
}

impl FontFace {
    pub const ALL: [FontFace; 3] = [FontFace::SansSerif, FontFace::Serif, FontFace::Monospace];

    pub fn label(self) -> &'static str {
        match self {
            FontFace::SansSerif => "Sans-serif",
            FontFace::Serif => "Serif",
            FontFace::Monospace => "Monospace",
        }
    }

    fn egui_family(self) -> FontFamily {
        match self {
            FontFace::Monospace => FontFamily::Monospace,
            FontFace::SansSerif | FontFace::Serif => FontFamily::Proportional,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Normal,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];

    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }

    pub fn label(self) -> &'static str {
        match self {
            FontStyle::Normal => "Normal",
            FontStyle::Bold => "Bold",
            FontStyle::Italic => "Italic",
            FontStyle::BoldItalic => "Bold italic",
        }
    }
}

/// What the next placed text label will look like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProperties {
    pub text: String,
    pub font_family: FontFace,
    pub style: FontStyle,
    pub size: f32,
    pub color: Color32,
}

impl Default for TextProperties {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_family: FontFace::default(),
            style: FontStyle::default(),
            size: 40.0,
            color: Color32::BLACK,
        }
    }
}

/// A single line of text anchored at its baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    id: ObjectId,
    origin: Pos2,
    properties: TextProperties,
}

impl TextLabel {
    pub fn new(origin: Pos2, properties: TextProperties) -> Self {
        let mut properties = properties;
        if !(properties.size.is_finite() && properties.size > 0.0) {
            log::warn!("Invalid text size {}, using 1", properties.size);
            properties.size = 1.0;
        }
        Self {
            id: ObjectId::new(),
            origin,
            properties,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn origin(&self) -> Pos2 {
        self.origin
    }

    pub fn properties(&self) -> &TextProperties {
        &self.properties
    }

    pub fn text(&self) -> &str {
        &self.properties.text
    }

    pub fn metrics(&self) -> TextMetrics {
        let p = &self.properties;
        measure(&p.text, p.font_family, p.style, p.size)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    /// Only the origin moves; glyphs stay upright.
    pub fn transform(&mut self, matrix: &TransformMatrix) {
        self.origin = matrix.map_point(self.origin);
    }

    /// Measured glyph box, extending upward from the baseline.
    pub fn bounds(&self) -> Rect {
        let metrics = self.metrics();
        Rect::from_min_max(
            pos2(self.origin.x, self.origin.y - metrics.ascent),
            pos2(self.origin.x + metrics.width, self.origin.y + metrics.descent),
        )
    }

    pub fn hit_test(&self, pos: Pos2, padding: f32) -> bool {
        self.bounds().expand(padding).contains(pos)
    }

    pub fn render(&self, target: &mut RgbaImage) {
        let p = &self.properties;
        draw_text(target, self.origin, &p.text, p.font_family, p.style, p.size, p.color);
    }

    pub fn paint(&self, painter: &Painter, view: &ViewTransform) {
        let p = &self.properties;
        let font = FontId::new(p.size * view.scale(), p.font_family.egui_family());
        painter.text(
            view.image_to_view(self.origin),
            Align2::LEFT_BOTTOM,
            &p.text,
            font,
            p.color,
        );
    }
}
