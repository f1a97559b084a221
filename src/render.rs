//! Output paths: flattening into a raster, and painting on screen.

use egui::{Color32, Painter, Rect, Stroke, pos2};
use image::RgbaImage;

use crate::canvas::{CropHandle, CropRegion};
use crate::element::DrawingObject;
use crate::error::EditorResult;
use crate::geometry::ViewTransform;
use crate::raster;

const CROP_SHADE: Color32 = Color32::from_black_alpha(140);
const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);

/// Copy of `raster` with `objects` drawn on top, back to front, in image space.
pub fn compose(
    raster: &RgbaImage,
    objects: &[DrawingObject],
    budget: Option<u64>,
) -> EditorResult<RgbaImage> {
    let mut output = raster::duplicate(raster, budget)?;
    for object in objects {
        object.render(&mut output);
    }
    Ok(output)
}

pub fn paint_objects<'a>(
    painter: &Painter,
    objects: impl IntoIterator<Item = &'a DrawingObject>,
    view: &ViewTransform,
) {
    for object in objects {
        object.paint(painter, view);
    }
}

/// Thin outline around the selected object's bounds.
pub fn paint_selection(painter: &Painter, object: &DrawingObject, view: &ViewTransform) {
    let rect = view.image_rect_to_view(object.bounds()).expand(2.0);
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SELECTION_COLOR));
}

/// Shade everything in `bounds` outside the region, then outline it and mark
/// its handles.
pub fn paint_crop(painter: &Painter, region: &CropRegion, bounds: Rect, handle_radius: f32) {
    let rect = region.rect();
    let shades = [
        Rect::from_min_max(bounds.min, pos2(bounds.max.x, rect.min.y)),
        Rect::from_min_max(pos2(bounds.min.x, rect.max.y), bounds.max),
        Rect::from_min_max(pos2(bounds.min.x, rect.min.y), pos2(rect.min.x, rect.max.y)),
        Rect::from_min_max(pos2(rect.max.x, rect.min.y), pos2(bounds.max.x, rect.max.y)),
    ];
    for shade in shades {
        if shade.is_positive() {
            painter.rect_filled(shade, 0.0, CROP_SHADE);
        }
    }
    painter.rect_stroke(rect, 0.0, Stroke::new(2.0, Color32::WHITE));

    let marker = (handle_radius / 2.0).max(3.0);
    for handle in CropHandle::CORNERS.into_iter().chain(CropHandle::EDGES) {
        let center = region.handle_position(handle);
        painter.circle(center, marker, Color32::WHITE, Stroke::new(1.0, Color32::DARK_GRAY));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ObjectKind, TextProperties};
    use crate::geometry::TransformMatrix;
    use egui::vec2;

    #[test]
    fn test_compose_leaves_source_untouched() {
        let raster = RgbaImage::from_pixel(50, 50, image::Rgba([255, 255, 255, 255]));
        let mut line = DrawingObject::create(ObjectKind::Line, pos2(0.0, 25.0), Color32::RED, 4.0);
        line.extend(pos2(50.0, 25.0));

        let output = compose(&raster, std::slice::from_ref(&line), None).unwrap();
        assert_eq!(output.get_pixel(25, 25).0, [255, 0, 0, 255]);
        assert_eq!(raster.get_pixel(25, 25).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_compose_respects_budget() {
        let raster = RgbaImage::new(10, 10);
        assert!(compose(&raster, &[], Some(150)).is_err());
        assert!(compose(&raster, &[], Some(200)).is_ok());
    }

    #[test]
    fn test_paint_smoke() {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let view = ViewTransform::new(TransformMatrix::scale(0.5, 0.5));
            let mut rect = DrawingObject::create(ObjectKind::Rectangle, pos2(10.0, 10.0), Color32::RED, 2.0);
            rect.extend(pos2(60.0, 40.0));
            let text = DrawingObject::text(
                pos2(20.0, 80.0),
                &TextProperties {
                    text: "Note".to_owned(),
                    ..Default::default()
                },
            );
            paint_objects(&painter, [&rect, &text], &view);
            paint_selection(&painter, &rect, &view);

            let region = CropRegion::new(pos2(10.0, 10.0), pos2(40.0, 40.0));
            paint_crop(&painter, &region, Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0)), 15.0);
        });
    }
}
