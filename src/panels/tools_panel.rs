use egui::color_picker::{Alpha, color_edit_button_srgba};
use egui::Slider;

use crate::PaintApp;
use crate::canvas::Mode;
use crate::element::{FontFace, FontStyle};

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let current = app.canvas().mode();
            ui.horizontal_wrapped(|ui| {
                for mode in Mode::ALL {
                    if ui.selectable_label(current == mode, mode.label()).clicked() {
                        log::info!("Mode selected from UI: {}", mode.label());
                        app.canvas_mut().set_mode(mode);
                    }
                }
            });
            ui.separator();

            let mut changed = false;
            ui.label("Brush");
            ui.horizontal(|ui| {
                ui.label("Color:");
                changed |= color_edit_button_srgba(ui, &mut app.settings_mut().brush_color, Alpha::OnlyBlend).changed();
            });
            ui.horizontal(|ui| {
                ui.label("Width:");
                changed |= ui.add(Slider::new(&mut app.settings_mut().brush_width, 1.0..=50.0)).changed();
            });
            ui.separator();

            ui.label("Text");
            changed |= ui.text_edit_singleline(&mut app.settings_mut().text).changed();
            ui.horizontal(|ui| {
                let settings = app.settings_mut();
                egui::ComboBox::from_id_salt("font_face")
                    .selected_text(settings.font_family.label())
                    .show_ui(ui, |ui| {
                        for face in FontFace::ALL {
                            changed |= ui.selectable_value(&mut settings.font_family, face, face.label()).changed();
                        }
                    });
                egui::ComboBox::from_id_salt("font_style")
                    .selected_text(settings.font_style.label())
                    .show_ui(ui, |ui| {
                        for style in FontStyle::ALL {
                            changed |= ui.selectable_value(&mut settings.font_style, style, style.label()).changed();
                        }
                    });
            });
            ui.horizontal(|ui| {
                ui.label("Size:");
                changed |= ui.add(Slider::new(&mut app.settings_mut().text_size, 8.0..=200.0)).changed();
                changed |= color_edit_button_srgba(ui, &mut app.settings_mut().text_color, Alpha::OnlyBlend).changed();
            });
            if changed {
                app.apply_settings();
            }
            ui.separator();

            ui.label("Image");
            ui.horizontal_wrapped(|ui| {
                if ui.button("⟲ Left").clicked() {
                    let result = app.canvas_mut().rotate(-90);
                    app.report("Rotate", result);
                }
                if ui.button("⟳ Right").clicked() {
                    let result = app.canvas_mut().rotate(90);
                    app.report("Rotate", result);
                }
                if ui.button("⇔ Flip").clicked() {
                    let result = app.canvas_mut().flip_horizontal();
                    app.report("Flip", result);
                }
                if ui.button("⇕ Flip").clicked() {
                    let result = app.canvas_mut().flip_vertical();
                    app.report("Flip", result);
                }
            });
            if app.canvas().is_crop_active() {
                ui.horizontal(|ui| {
                    let has_region = app.canvas().crop_region().is_some();
                    if ui.add_enabled(has_region, egui::Button::new("Apply crop")).clicked() {
                        let result = app.canvas_mut().apply_crop();
                        app.report("Crop", result);
                    }
                    if ui.button("Cancel").clicked() {
                        app.canvas_mut().cancel_crop();
                    }
                });
            }
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.canvas().can_undo();
                let can_redo = app.canvas().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.canvas_mut().undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.canvas_mut().redo();
                }
            });
            let history = app.canvas().history();
            ui.label(format!(
                "Undo stack size: {}  Redo stack size: {}",
                history.undo_len(),
                history.redo_len()
            ));
            let selected = app.canvas().selected().is_some();
            if ui.add_enabled(selected, egui::Button::new("Delete selected")).clicked() {
                app.canvas_mut().delete_selected();
            }
            ui.separator();

            ui.horizontal(|ui| {
                let has_objects = !app.canvas().overlay().is_empty();
                if ui.add_enabled(has_objects, egui::Button::new("Flatten")).clicked() {
                    let result = app.canvas_mut().flatten();
                    app.report("Flatten", result);
                }
                if ui.button("Export PNG").clicked() {
                    app.export_png();
                }
            });

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}
