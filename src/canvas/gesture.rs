use egui::Pos2;

use super::crop::CropHandle;
use crate::element::{DrawingObject, ObjectId};

/// The press-move-release sequence currently in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// A new object being drawn; owned here until commit or discard.
    Drawing { object: DrawingObject },
    /// A committed object being moved. `last` is in image space.
    Dragging { id: ObjectId, last: Pos2 },
    /// A crop handle being moved. `last` is in view space.
    Cropping { handle: CropHandle, last: Pos2 },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Drawing { .. } => "drawing",
            Gesture::Dragging { .. } => "dragging",
            Gesture::Cropping { .. } => "cropping",
        }
    }

    pub fn in_progress(&self) -> Option<&DrawingObject> {
        match self {
            Gesture::Drawing { object } => Some(object),
            _ => None,
        }
    }
}
