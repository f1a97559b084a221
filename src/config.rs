use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::{FontFace, FontStyle, TextProperties};

/// Engine tunables. Distances are in image units unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Extra tolerance added to a stroke's width when hit testing lines and shapes.
    pub hit_padding: f32,
    /// Tolerance around the measured box of a text label.
    pub text_hit_padding: f32,
    /// Crop regions smaller than this (view units) on either axis are discarded.
    pub min_crop_size: f32,
    /// Radius of crop handles (view units).
    pub crop_handle_radius: f32,
    /// Upper bound on pixels alive at once during a raster operation
    /// (old bitmap plus new bitmap). `None` means only the allocator decides.
    pub max_working_pixels: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_padding: 10.0,
            text_hit_padding: 20.0,
            min_crop_size: 10.0,
            crop_handle_radius: 15.0,
            max_working_pixels: None,
        }
    }
}

/// User tool settings, persisted by the host between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub brush_color: Color32,
    pub brush_width: f32,
    pub text: String,
    pub font_family: FontFace,
    pub font_style: FontStyle,
    pub text_size: f32,
    pub text_color: Color32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let text = TextProperties::default();
        Self {
            brush_color: Color32::BLACK,
            brush_width: 5.0,
            text: text.text,
            font_family: text.font_family,
            font_style: text.style,
            text_size: text.size,
            text_color: text.color,
        }
    }
}

impl EditorSettings {
    pub fn text_properties(&self) -> TextProperties {
        TextProperties {
            text: self.text.clone(),
            font_family: self.font_family,
            style: self.font_style,
            size: self.text_size,
            color: self.text_color,
        }
    }
}
