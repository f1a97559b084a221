#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod command;
pub mod config;
pub mod element;
pub mod error;
pub mod geometry;
pub mod panels;
pub mod raster;
pub mod render;
pub mod shared;
pub mod texture_manager;

pub use app::PaintApp;
pub use canvas::{Canvas, CropHandle, CropRegion, Gesture, Mode};
pub use command::{Command, CommandError, CommandHistory, Overlay};
pub use config::{EditorConfig, EditorSettings};
pub use element::{DrawingObject, FontFace, FontStyle, ObjectId, ObjectKind, TextProperties};
pub use error::{EditorError, EditorResult};
pub use geometry::{TransformMatrix, ViewTransform};
pub use shared::{CanvasSnapshot, SharedCanvas};
