use egui::{Color32, Key, Pos2, Rect, Sense, pos2};

use crate::PaintApp;
use crate::canvas::CropRegion;
use crate::geometry::{TransformMatrix, ViewTransform};
use crate::render;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
        let rect = response.rect;
        // The engine's view space has its origin at the panel's top-left corner.
        let offset = rect.min.to_vec2();
        app.canvas_mut().fit_to_view(rect.width(), rect.height());

        handle_input(app, ctx, &response, offset);

        let Some(texture) = app.raster_texture(ctx) else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open an image by passing its path on the command line",
                egui::FontId::proportional(16.0),
                Color32::GRAY,
            );
            return;
        };
        let canvas = app.canvas();
        let screen = ViewTransform::new(
            canvas
                .view_transform()
                .forward()
                .then(&TransformMatrix::translate(offset)),
        );
        let image_rect = Rect::from_min_size(Pos2::ZERO, canvas.raster_size());
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        painter.image(texture, screen.image_rect_to_view(image_rect), uv, Color32::WHITE);

        render::paint_objects(&painter, canvas.overlay().iter(), &screen);
        if let Some(object) = canvas.in_progress() {
            object.paint(&painter, &screen);
        }
        if let Some(object) = canvas.selected().and_then(|id| canvas.overlay().get(id)) {
            render::paint_selection(&painter, object, &screen);
        }
        if let Some(region) = canvas.crop_region() {
            let shifted = CropRegion::from_rect(region.rect().translate(offset));
            let bounds = canvas.raster_view_rect().translate(offset);
            render::paint_crop(&painter, &shifted, bounds, canvas.config().crop_handle_radius);
        }
    });
}

fn handle_input(app: &mut PaintApp, ctx: &egui::Context, response: &egui::Response, offset: egui::Vec2) {
    let (pressed, down, released, pos) = ctx.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
        )
    });
    let canvas = app.canvas_mut();
    if let Some(pos) = pos {
        let local = pos - offset;
        if pressed && response.hovered() {
            canvas.on_pointer_down(local);
        } else if down && !canvas.gesture().is_idle() {
            canvas.on_pointer_move(local);
        }
        if released && !canvas.gesture().is_idle() {
            canvas.on_pointer_up(local);
        }
    }

    if ctx.wants_keyboard_input() {
        return;
    }
    let (delete, undo, redo) = ctx.input(|i| {
        (
            i.key_pressed(Key::Delete),
            i.modifiers.command && i.key_pressed(Key::Z),
            i.modifiers.command && i.key_pressed(Key::Y),
        )
    });
    if delete {
        canvas.delete_selected();
    }
    if undo {
        canvas.undo();
    }
    if redo {
        canvas.redo();
    }
}
