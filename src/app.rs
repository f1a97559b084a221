use std::path::{Path, PathBuf};

use crate::canvas::Canvas;
use crate::config::EditorSettings;
use crate::error::EditorResult;
use crate::panels::{central_panel, tools_panel};
use crate::texture_manager::TextureManager;

/// eframe host around the editing engine.
///
/// Only the tool settings survive a restart; the overlay is never persisted.
pub struct PaintApp {
    canvas: Canvas,
    settings: EditorSettings,
    textures: TextureManager,
    source_path: Option<PathBuf>,
    status: Option<String>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, image_path: Option<PathBuf>) -> Self {
        let settings: EditorSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let mut app = Self::with_settings(settings);
        if let Some(path) = image_path {
            app.open_image(&path);
        }
        app
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let mut app = Self {
            canvas: Canvas::new(),
            settings,
            textures: TextureManager::new(),
            source_path: None,
            status: None,
        };
        app.apply_settings();
        app
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        &mut self.settings
    }

    /// Texture of the current raster, uploaded only when the raster changed.
    pub(crate) fn raster_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let raster = self.canvas.raster()?;
        match self
            .textures
            .raster_texture(ctx, self.canvas.raster_revision(), raster)
        {
            Ok(texture) => Some(texture),
            Err(err) => {
                log::warn!("Raster texture unavailable: {}", err);
                None
            }
        }
    }

    /// Push the tool settings into the engine.
    pub fn apply_settings(&mut self) {
        self.canvas
            .set_brush(self.settings.brush_color, self.settings.brush_width);
        self.canvas.set_text_properties(self.settings.text_properties());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Report the outcome of a raster operation in the status line.
    pub fn report(&mut self, action: &str, result: EditorResult) {
        match result {
            Ok(()) => self.status = None,
            Err(err) => {
                log::warn!("{} failed: {}", action, err);
                self.set_status(format!("{} failed: {}", action, err));
            }
        }
    }

    pub fn open_image(&mut self, path: &Path) {
        match image::open(path) {
            Ok(image) => {
                log::info!("Opened {}", path.display());
                self.canvas.load_image(image.to_rgba8());
                self.textures.clear();
                self.source_path = Some(path.to_path_buf());
                self.status = None;
            }
            Err(err) => {
                log::warn!("Could not open {}: {}", path.display(), err);
                self.set_status(format!("Could not open {}: {}", path.display(), err));
            }
        }
    }

    /// Where an export is written: `<name>_edited.png` next to the source.
    pub fn export_path(&self) -> PathBuf {
        match &self.source_path {
            Some(path) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_owned());
                path.with_file_name(format!("{}_edited.png", stem))
            }
            None => PathBuf::from("export.png"),
        }
    }

    pub fn export_png(&mut self) {
        let path = self.export_path();
        let image = match self.canvas.export_flattened_raster() {
            Ok(image) => image,
            Err(err) => {
                self.report("Export", Err(err));
                return;
            }
        };
        match image.save_with_format(&path, image::ImageFormat::Png) {
            Ok(()) => {
                log::info!("Exported {}", path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(err) => {
                log::warn!("Could not write {}: {}", path.display(), err);
                self.set_status(format!("Could not write {}: {}", path.display(), err));
            }
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::FontFace;

    #[test]
    fn test_settings_reach_the_canvas() {
        let mut settings = EditorSettings::default();
        settings.brush_width = 9.0;
        settings.font_family = FontFace::Serif;
        let app = PaintApp::with_settings(settings);
        assert_eq!(app.canvas().brush().1, 9.0);
        assert_eq!(app.canvas().text_properties().font_family, FontFace::Serif);
    }

    #[test]
    fn test_export_path_follows_source() {
        let mut app = PaintApp::with_settings(EditorSettings::default());
        assert_eq!(app.export_path(), PathBuf::from("export.png"));
        app.source_path = Some(PathBuf::from("/tmp/photo.jpg"));
        assert_eq!(app.export_path(), PathBuf::from("/tmp/photo_edited.png"));
    }

    #[test]
    fn test_export_without_raster_sets_status() {
        let mut app = PaintApp::with_settings(EditorSettings::default());
        app.export_png();
        assert!(app.status().is_some_and(|s| s.contains("Export failed")));
    }
}
