//! The editing engine: one raster, the overlay above it, and the pointer
//! gestures and raster operations that change them.
//!
//! Pointer positions come in as view coordinates and are converted to image
//! space (clamped to the raster) before they touch any drawing object. Crop
//! handles are the exception and stay in view space.
//!
//! Raster operations build the new bitmap first and only then swap it in,
//! remap the overlay through the same matrix and clear history. A failed
//! operation changes nothing.

mod crop;
mod gesture;
mod mode;

use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;

pub use crop::{CropHandle, CropRegion};
pub use gesture::Gesture;
pub use mode::Mode;

use crate::command::{Command, CommandHistory, Overlay};
use crate::config::EditorConfig;
use crate::element::{DrawingObject, ObjectId, TextProperties};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{
    TransformMatrix, ViewTransform, flip_horizontal_remap, flip_vertical_remap, quarter_turn_remap,
    quarter_turns,
};
use crate::{raster, render};

#[derive(Debug)]
pub struct Canvas {
    config: EditorConfig,
    raster: Option<RgbaImage>,
    overlay: Overlay,
    history: CommandHistory,
    mode: Mode,
    gesture: Gesture,
    crop: Option<CropRegion>,
    selected: Option<ObjectId>,
    view_size: Vec2,
    view: ViewTransform,
    brush_color: Color32,
    brush_width: f32,
    text_properties: TextProperties,
    revision: u64,
    raster_revision: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            raster: None,
            overlay: Overlay::new(),
            history: CommandHistory::new(),
            mode: Mode::None,
            gesture: Gesture::Idle,
            crop: None,
            selected: None,
            view_size: Vec2::ZERO,
            view: ViewTransform::default(),
            brush_color: Color32::BLACK,
            brush_width: 5.0,
            text_properties: TextProperties::default(),
            revision: 0,
            raster_revision: 0,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ---- Accessors ----

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn raster(&self) -> Option<&RgbaImage> {
        self.raster.as_ref()
    }

    /// Raster size in pixels, zero when nothing is loaded.
    pub fn raster_size(&self) -> Vec2 {
        self.raster
            .as_ref()
            .map(|r| Vec2::new(r.width() as f32, r.height() as f32))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn view_transform(&self) -> &ViewTransform {
        &self.view
    }

    /// The raster's rectangle in view space.
    pub fn raster_view_rect(&self) -> Rect {
        self.view
            .image_rect_to_view(Rect::from_min_size(Pos2::ZERO, self.raster_size()))
    }

    pub fn crop_region(&self) -> Option<&CropRegion> {
        self.crop.as_ref()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// The object being drawn by the active gesture, not yet committed.
    pub fn in_progress(&self) -> Option<&DrawingObject> {
        self.gesture.in_progress()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn brush(&self) -> (Color32, f32) {
        (self.brush_color, self.brush_width)
    }

    pub fn text_properties(&self) -> &TextProperties {
        &self.text_properties
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Bumped on every change to what would be drawn.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bumped only when the raster bitmap itself is replaced.
    pub fn raster_revision(&self) -> u64 {
        self.raster_revision
    }

    // ---- Settings ----

    pub fn set_brush(&mut self, color: Color32, width: f32) {
        self.brush_color = color;
        self.brush_width = width;
    }

    pub fn set_text_properties(&mut self, properties: TextProperties) {
        self.text_properties = properties;
    }

    /// Switch interaction mode. Any active gesture is abandoned and a pending
    /// crop region is discarded when leaving crop mode.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Crop {
            self.start_crop();
            return;
        }
        if self.mode == mode {
            return;
        }
        self.abandon_gesture();
        if self.crop.take().is_some() {
            log::debug!("Discarded pending crop region");
        }
        log::debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.selected = None;
        self.touch();
    }

    // ---- Raster and view ----

    /// Replace the raster with `width x height` RGBA pixels, dropping the
    /// overlay and history.
    pub fn load_raster(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> EditorResult {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .unwrap_or(usize::MAX);
        if pixels.len() != expected {
            log::warn!(
                "Rejected raster {}x{}: {} bytes, expected {}",
                width,
                height,
                pixels.len(),
                expected
            );
            return Err(EditorError::InvalidRaster {
                expected,
                actual: pixels.len(),
            });
        }
        let actual = pixels.len();
        let image = RgbaImage::from_raw(width, height, pixels)
            .ok_or(EditorError::InvalidRaster { expected, actual })?;
        self.load_image(image);
        Ok(())
    }

    pub fn load_image(&mut self, image: RgbaImage) {
        log::info!("Loaded raster {}x{}", image.width(), image.height());
        self.raster = Some(image);
        self.overlay.clear();
        self.history.clear();
        self.gesture = Gesture::Idle;
        self.crop = None;
        self.selected = None;
        if self.mode == Mode::Crop {
            self.mode = Mode::None;
        }
        self.refit();
        self.raster_revision += 1;
        self.touch();
    }

    /// Refit the view to a display area of the given size.
    pub fn fit_to_view(&mut self, view_width: f32, view_height: f32) {
        let size = Vec2::new(view_width, view_height);
        if size == self.view_size {
            return;
        }
        self.view_size = size;
        self.refit();
        self.touch();
    }

    /// Use a custom view transform (zoomed or panned) until the next refit.
    pub fn set_view_transform(&mut self, forward: TransformMatrix) {
        self.set_view(ViewTransform::new(forward));
        self.touch();
    }

    fn refit(&mut self) {
        self.set_view(ViewTransform::fit(self.raster_size(), self.view_size));
    }

    /// Install a new view and carry the crop region along with it.
    fn set_view(&mut self, view: ViewTransform) {
        if let Some(region) = &mut self.crop {
            let image = self.view.view_rect_to_image(region.rect());
            *region = CropRegion::from_rect(view.image_rect_to_view(image));
        }
        self.view = view;
    }

    fn image_point(&self, view_pos: Pos2) -> Pos2 {
        self.view.view_to_image_clamped(view_pos, self.raster_size())
    }

    // ---- Pointer input ----

    pub fn on_pointer_down(&mut self, pos: Pos2) {
        if self.raster.is_none() {
            return;
        }
        if !self.gesture.is_idle() {
            log::debug!("Press during {} gesture, finishing it first", self.gesture.name());
            self.finish_gesture();
        }
        let point = self.image_point(pos);
        match self.mode {
            Mode::Crop => self.press_crop(pos),
            Mode::Text => self.place_text(point),
            Mode::Line | Mode::Rectangle | Mode::Ellipse => {
                if let Some(kind) = self.mode.object_kind() {
                    let object =
                        DrawingObject::create(kind, point, self.brush_color, self.brush_width);
                    log::debug!("Started {} at {:?}", object.kind_name(), point);
                    self.gesture = Gesture::Drawing { object };
                    self.touch();
                }
            }
            Mode::None => {
                let hit = self.overlay.hit_test(
                    point,
                    self.config.hit_padding,
                    self.config.text_hit_padding,
                );
                self.selected = hit;
                if let Some(id) = hit {
                    log::debug!("Picked object {} for dragging", id);
                    self.gesture = Gesture::Dragging { id, last: point };
                }
                self.touch();
            }
        }
    }

    pub fn on_pointer_move(&mut self, pos: Pos2) {
        if self.raster.is_none() {
            return;
        }
        let point = self.image_point(pos);
        let bounds = self.raster_view_rect();
        match &mut self.gesture {
            Gesture::Idle => return,
            Gesture::Drawing { object } => {
                if object.end() == point {
                    return;
                }
                object.extend(point);
            }
            Gesture::Dragging { id, last } => {
                let delta = point - *last;
                if delta == Vec2::ZERO {
                    return;
                }
                if let Some(object) = self.overlay.get_mut(*id) {
                    object.translate(delta);
                }
                *last = point;
            }
            Gesture::Cropping { handle, last } => {
                let delta = pos - *last;
                if let Some(region) = &mut self.crop {
                    region.drag(*handle, pos, delta, bounds);
                }
                *last = pos;
            }
        }
        self.touch();
    }

    pub fn on_pointer_up(&mut self, pos: Pos2) {
        self.on_pointer_move(pos);
        self.finish_gesture();
    }

    fn press_crop(&mut self, pos: Pos2) {
        let radius = self.config.crop_handle_radius;
        let handle = self.crop.as_ref().and_then(|region| region.handle_at(pos, radius));
        let (handle, last) = match handle {
            Some(handle) => (handle, pos),
            None => {
                let bounds = self.raster_view_rect();
                let start = pos.clamp(bounds.min, bounds.max);
                self.crop = Some(CropRegion::at_point(start));
                (CropHandle::BottomRight, start)
            }
        };
        log::debug!("Crop gesture on {:?}", handle);
        self.gesture = Gesture::Cropping { handle, last };
        self.touch();
    }

    fn place_text(&mut self, point: Pos2) {
        if self.text_properties.text.is_empty() {
            log::debug!("Text tap ignored, no pending text");
            return;
        }
        let object = DrawingObject::text(point, &self.text_properties);
        self.commit(object);
    }

    fn finish_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Drawing { object } => {
                if object.is_committable() {
                    self.commit(object);
                } else {
                    log::debug!("Discarded empty {}", object.kind_name());
                }
            }
            Gesture::Dragging { id, .. } => log::debug!("Finished dragging {}", id),
            Gesture::Cropping { .. } => {
                let min_size = self.config.min_crop_size;
                if let Some(region) = &mut self.crop {
                    region.normalize();
                    if !region.is_at_least(min_size) {
                        log::debug!("Crop region below {} units, discarded", min_size);
                        self.crop = None;
                    }
                }
            }
        }
        self.touch();
    }

    /// Drop the active gesture without committing anything.
    fn abandon_gesture(&mut self) {
        if let Gesture::Drawing { object } = std::mem::take(&mut self.gesture) {
            log::debug!("Abandoned in-progress {}", object.kind_name());
        }
    }

    fn commit(&mut self, object: DrawingObject) {
        let kind = object.kind_name();
        let command = Command::add(object, &self.overlay);
        match self.history.execute(command, &mut self.overlay) {
            Ok(()) => log::debug!("Committed {}", kind),
            Err(err) => log::warn!("Failed to commit {}: {}", kind, err),
        }
        self.touch();
    }

    /// Remove the selected object as an undoable command.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };
        let Some(index) = self.overlay.index_of(id) else {
            return false;
        };
        let object = self.overlay.objects()[index].clone();
        if matches!(self.gesture, Gesture::Dragging { id: dragged, .. } if dragged == id) {
            self.gesture = Gesture::Idle;
        }
        match self.history.execute(Command::remove(object, index), &mut self.overlay) {
            Ok(()) => {
                self.touch();
                true
            }
            Err(err) => {
                log::warn!("Failed to delete {}: {}", id, err);
                false
            }
        }
    }

    // ---- Crop ----

    /// Enter crop mode with the region covering the whole raster.
    pub fn start_crop(&mut self) {
        if self.raster.is_none() {
            log::warn!("Crop requested with no raster loaded");
            return;
        }
        self.abandon_gesture();
        self.selected = None;
        self.mode = Mode::Crop;
        self.crop = Some(CropRegion::from_rect(self.raster_view_rect()));
        log::debug!("Crop mode started");
        self.touch();
    }

    pub fn is_crop_active(&self) -> bool {
        self.mode == Mode::Crop
    }

    pub fn cancel_crop(&mut self) {
        if self.mode != Mode::Crop {
            return;
        }
        self.gesture = Gesture::Idle;
        self.crop = None;
        self.mode = Mode::None;
        log::debug!("Crop cancelled");
        self.touch();
    }

    /// Crop the raster to the pending region and leave crop mode.
    ///
    /// Objects are shifted with the raster; those left with no overlap with
    /// the new bounds are evicted. The rest keep their geometry, even where
    /// it now extends past the edge.
    pub fn apply_crop(&mut self) -> EditorResult {
        if self.mode != Mode::Crop {
            return Err(EditorError::NoCropRegion);
        }
        let region = self.crop.ok_or(EditorError::NoCropRegion)?;
        let source = self.raster.as_ref().ok_or(EditorError::NoRaster)?;
        let (x, y, width, height) = region
            .to_pixel_rect(&self.view, self.raster_size())
            .ok_or(EditorError::EmptyCrop)?;
        let cropped = raster::crop(source, x, y, width, height, self.config.max_working_pixels)?;

        let remap = TransformMatrix::translate(Vec2::new(-(x as f32), -(y as f32)));
        self.replace_raster(cropped, &remap);
        let bounds = Rect::from_min_size(Pos2::ZERO, self.raster_size());
        let evicted = self.overlay.retain(|object| object.bounds().intersects(bounds));
        if self.selected.is_some_and(|id| !self.overlay.contains(id)) {
            self.selected = None;
        }
        log::info!(
            "Cropped to {}x{} at ({}, {}), evicted {} objects",
            width,
            height,
            x,
            y,
            evicted
        );
        Ok(())
    }

    // ---- Raster operations ----

    /// Rotate clockwise by a multiple of 90 degrees; negative turns left.
    pub fn rotate(&mut self, degrees: i32) -> EditorResult {
        let turns = quarter_turns(degrees)?;
        let source = self.raster.as_ref().ok_or(EditorError::NoRaster)?;
        if turns == 0 {
            return Ok(());
        }
        let (remap, _) = quarter_turn_remap(self.raster_size(), turns);
        let rotated = raster::rotate_quarter_turns(source, turns, self.config.max_working_pixels)?;
        log::info!("Rotated raster by {} degrees to {}x{}", degrees, rotated.width(), rotated.height());
        self.replace_raster(rotated, &remap);
        Ok(())
    }

    pub fn flip_horizontal(&mut self) -> EditorResult {
        let source = self.raster.as_ref().ok_or(EditorError::NoRaster)?;
        let flipped = raster::flip_horizontal(source, self.config.max_working_pixels)?;
        let remap = flip_horizontal_remap(self.raster_size().x);
        log::info!("Flipped raster horizontally");
        self.replace_raster(flipped, &remap);
        Ok(())
    }

    pub fn flip_vertical(&mut self) -> EditorResult {
        let source = self.raster.as_ref().ok_or(EditorError::NoRaster)?;
        let flipped = raster::flip_vertical(source, self.config.max_working_pixels)?;
        let remap = flip_vertical_remap(self.raster_size().y);
        log::info!("Flipped raster vertically");
        self.replace_raster(flipped, &remap);
        Ok(())
    }

    /// Burn the overlay into the raster and empty it. Clears history.
    pub fn flatten(&mut self) -> EditorResult {
        let source = self.raster.as_ref().ok_or(EditorError::NoRaster)?;
        if self.overlay.is_empty() {
            return Ok(());
        }
        let flattened = render::compose(
            source,
            self.overlay.objects(),
            self.config.max_working_pixels,
        )?;
        log::info!("Flattened {} objects into the raster", self.overlay.len());
        self.overlay.clear();
        self.replace_raster(flattened, &TransformMatrix::identity());
        Ok(())
    }

    /// The raster with the overlay drawn on it, in image space. Engine state
    /// is not touched.
    pub fn export_flattened_raster(&self) -> EditorResult<RgbaImage> {
        let source = self.raster.as_ref().ok_or(EditorError::NoRaster)?;
        render::compose(source, self.overlay.objects(), self.config.max_working_pixels)
    }

    /// Swap in a bitmap produced by a raster operation. `remap` takes old
    /// image coordinates to new ones.
    fn replace_raster(&mut self, new_raster: RgbaImage, remap: &TransformMatrix) {
        self.abandon_gesture();
        self.overlay.transform_all(remap);
        self.raster = Some(new_raster);
        self.history.clear();
        self.crop = None;
        if self.mode == Mode::Crop {
            self.mode = Mode::None;
        }
        if self.selected.is_some_and(|id| !self.overlay.contains(id)) {
            self.selected = None;
        }
        self.refit();
        self.raster_revision += 1;
        self.touch();
    }

    // ---- History ----

    pub fn undo(&mut self) {
        if self.history.undo(&mut self.overlay) {
            self.after_history_change();
        }
    }

    pub fn redo(&mut self) {
        if self.history.redo(&mut self.overlay) {
            self.after_history_change();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn after_history_change(&mut self) {
        if self.selected.is_some_and(|id| !self.overlay.contains(id)) {
            self.selected = None;
        }
        if let Gesture::Dragging { id, .. } = self.gesture {
            if !self.overlay.contains(id) {
                self.gesture = Gesture::Idle;
            }
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
