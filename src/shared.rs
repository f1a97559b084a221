//! Lock-guarded access to a [`Canvas`] from more than one thread.
//!
//! Mutations hold the write lock for the whole operation. A presentation
//! thread takes a [`CanvasSnapshot`] under one read lock, so the raster and
//! overlay it sees always belong together.

use std::sync::Arc;

use image::RgbaImage;
use parking_lot::RwLock;

use crate::canvas::{Canvas, CropRegion};
use crate::element::DrawingObject;
use crate::geometry::ViewTransform;

/// Immutable copy of everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct CanvasSnapshot {
    pub raster: Option<RgbaImage>,
    pub objects: Vec<DrawingObject>,
    pub in_progress: Option<DrawingObject>,
    pub view: ViewTransform,
    pub crop: Option<CropRegion>,
    pub revision: u64,
    pub raster_revision: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SharedCanvas {
    inner: Arc<RwLock<Canvas>>,
}

impl SharedCanvas {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            inner: Arc::new(RwLock::new(canvas)),
        }
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&Canvas) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn revision(&self) -> u64 {
        self.inner.read().revision()
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        let canvas = self.inner.read();
        CanvasSnapshot {
            raster: canvas.raster().cloned(),
            objects: canvas.overlay().objects().to_vec(),
            in_progress: canvas.in_progress().cloned(),
            view: *canvas.view_transform(),
            crop: canvas.crop_region().copied(),
            revision: canvas.revision(),
            raster_revision: canvas.raster_revision(),
        }
    }
}
