use crate::element::ObjectKind;

/// What a pointer press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Select and drag committed objects.
    #[default]
    None,
    Line,
    Rectangle,
    Ellipse,
    /// Tap to place the pending text.
    Text,
    Crop,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::None,
        Mode::Line,
        Mode::Rectangle,
        Mode::Ellipse,
        Mode::Text,
        Mode::Crop,
    ];

    /// Kind of object a press creates in this mode, if it is a drag-to-draw mode.
    pub fn object_kind(self) -> Option<ObjectKind> {
        match self {
            Mode::Line => Some(ObjectKind::Line),
            Mode::Rectangle => Some(ObjectKind::Rectangle),
            Mode::Ellipse => Some(ObjectKind::Ellipse),
            Mode::None | Mode::Text | Mode::Crop => None,
        }
    }

    pub fn is_drawing(self) -> bool {
        matches!(self, Mode::Line | Mode::Rectangle | Mode::Ellipse | Mode::Text)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::None => "Select",
            Mode::Line => "Line",
            Mode::Rectangle => "Rectangle",
            Mode::Ellipse => "Ellipse",
            Mode::Text => "Text",
            Mode::Crop => "Crop",
        }
    }
}
