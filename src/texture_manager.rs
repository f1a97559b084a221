use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

/// Errors that can occur during texture upload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureGenerationError {
    #[error("Raster has zero width or height")]
    InvalidDimensions,
}

/// Caches the on-screen texture of the raster, keyed by its revision, so the
/// bitmap is only uploaded again after a raster operation.
#[derive(Default)]
pub struct TextureManager {
    cached: Option<(u64, TextureHandle)>,
    uploads: u64,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `raster` at `revision`, uploading it if the cached one is stale.
    pub fn raster_texture(
        &mut self,
        ctx: &Context,
        revision: u64,
        raster: &RgbaImage,
    ) -> Result<TextureId, TextureGenerationError> {
        if let Some((cached_revision, handle)) = &self.cached {
            if *cached_revision == revision {
                return Ok(handle.id());
            }
        }
        if raster.width() == 0 || raster.height() == 0 {
            self.cached = None;
            return Err(TextureGenerationError::InvalidDimensions);
        }
        let size = [raster.width() as usize, raster.height() as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, raster.as_raw());
        let handle = ctx.load_texture(format!("raster_r{}", revision), image, TextureOptions::LINEAR);
        log::debug!("Uploaded raster texture {}x{} (revision {})", size[0], size[1], revision);
        let id = handle.id();
        self.cached = Some((revision, handle));
        self.uploads += 1;
        Ok(id)
    }

    /// Number of uploads so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("revision", &self.cached.as_ref().map(|(revision, _)| *revision))
            .field("uploads", &self.uploads)
            .finish()
    }
}
