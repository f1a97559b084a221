//! Glyph layout and rasterization for text labels.
//!
//! Fonts are the ones egui bundles, so on-screen text and exported text use the
//! same faces. Bold and italic are synthesized.

use std::collections::HashMap;

use ab_glyph::{Font as _, FontArc, FontVec, ScaleFont as _, point};
use egui::{Color32, Pos2};
use image::RgbaImage;
use once_cell::sync::Lazy;

use super::paint::blend_pixel_checked;
use crate::element::{FontFace, FontStyle};

/// Horizontal shear applied to italic glyph rows, as a fraction of the row's
/// height above the baseline.
const ITALIC_SHEAR: f32 = 0.2;

/// Fraction of the font size used as the synthetic bold offset.
const BOLD_OFFSET: f32 = 1.0 / 24.0;

/// Layout extents of a single line, relative to its baseline origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    /// Distance above the baseline (positive).
    pub ascent: f32,
    /// Distance below the baseline (positive).
    pub descent: f32,
}

struct FontSet {
    proportional: Option<FontArc>,
    monospace: Option<FontArc>,
}

static FONTS: Lazy<FontSet> = Lazy::new(|| FontSet {
    proportional: load_default_font(&egui::FontFamily::Proportional),
    monospace: load_default_font(&egui::FontFamily::Monospace),
});

fn load_default_font(family: &egui::FontFamily) -> Option<FontArc> {
    let definitions = egui::FontDefinitions::default();
    let font_name = definitions.families.get(family)?.first()?;
    let data = definitions.font_data.get(font_name)?;
    let bytes: Vec<u8> = data.font.to_vec();
    match FontVec::try_from_vec_and_index(bytes, data.index) {
        Ok(font) => Some(FontArc::from(font)),
        Err(err) => {
            log::warn!("Failed to parse bundled font {}: {}", font_name, err);
            None
        }
    }
}

fn font_for(face: FontFace) -> Option<&'static FontArc> {
    let fonts = &*FONTS;
    match face {
        // egui ships no serif face; the proportional font stands in.
        FontFace::SansSerif | FontFace::Serif => fonts.proportional.as_ref(),
        FontFace::Monospace => fonts.monospace.as_ref().or(fonts.proportional.as_ref()),
    }
}

fn bold_offset(style: FontStyle, size: f32) -> f32 {
    if style.is_bold() { (size * BOLD_OFFSET).max(1.0) } else { 0.0 }
}

pub fn measure(text: &str, face: FontFace, style: FontStyle, size: f32) -> TextMetrics {
    let extra = bold_offset(style, size);
    let Some(font) = font_for(face) else {
        let slant = if style.is_italic() { size * 0.8 * ITALIC_SHEAR } else { 0.0 };
        return TextMetrics {
            width: text.chars().count() as f32 * size * 0.6 + extra + slant,
            ascent: size * 0.8,
            descent: size * 0.2,
        };
    };
    let scaled = font.as_scaled(size);
    let mut width = 0.0;
    let mut previous = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    let slant = if style.is_italic() { scaled.ascent() * ITALIC_SHEAR } else { 0.0 };
    TextMetrics {
        width: width + extra + slant,
        ascent: scaled.ascent(),
        descent: -scaled.descent(),
    }
}

/// Draw `text` with its baseline starting at `origin`.
pub fn draw_text(
    img: &mut RgbaImage,
    origin: Pos2,
    text: &str,
    face: FontFace,
    style: FontStyle,
    size: f32,
    color: Color32,
) {
    if text.is_empty() || size <= 0.0 {
        return;
    }
    let Some(font) = font_for(face) else {
        log::warn!("No font available, text label not rasterized");
        return;
    };
    let scaled = font.as_scaled(size);
    let extra = bold_offset(style, size);
    let passes: &[f32] = if extra > 0.0 { &[0.0, 1.0] } else { &[0.0] };
    let shear = if style.is_italic() { ITALIC_SHEAR } else { 0.0 };

    // Coverage is accumulated first so the bold passes don't double-blend.
    let mut coverage: HashMap<(i32, i32), f32> = HashMap::new();
    for &pass in passes {
        let mut caret = point(origin.x + extra * pass, origin.y);
        let mut previous = None;
        for ch in text.chars() {
            let mut glyph = scaled.scaled_glyph(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, glyph.id);
            }
            glyph.position = caret;
            caret.x += scaled.h_advance(glyph.id);
            previous = Some(glyph.id);
            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, c| {
                let py = y as f32 + bounds.min.y;
                let skew = ((origin.y - py) * shear).round();
                let px = (x as f32 + bounds.min.x + skew) as i32;
                let entry = coverage.entry((px, py as i32)).or_insert(0.0);
                *entry = entry.max(c);
            });
        }
    }

    for ((x, y), c) in coverage {
        let alpha = (color.a() as f32 * c).round().clamp(0.0, 255.0) as u8;
        if alpha == 0 {
            continue;
        }
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        blend_pixel_checked(img, x, y, Color32::from_rgba_unmultiplied(r, g, b, alpha));
    }
}
