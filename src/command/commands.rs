use super::{CommandError, CommandResult, Overlay};
use crate::element::{DrawingObject, ObjectId};

/// Reversible overlay edits.
///
/// Each variant holds the object and the list position it had the last time
/// it left the overlay, so undo/redo reinstates exactly what was removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add an object at `index`.
    AddObject { object: DrawingObject, index: usize },

    /// Remove an object, remembering where it was.
    RemoveObject { object: DrawingObject, index: usize },
}

impl Command {
    /// Append `object` at the top of the overlay.
    pub fn add(object: DrawingObject, overlay: &Overlay) -> Self {
        Command::AddObject {
            object,
            index: overlay.len(),
        }
    }

    pub fn remove(object: DrawingObject, index: usize) -> Self {
        Command::RemoveObject { object, index }
    }

    pub fn object_id(&self) -> ObjectId {
        match self {
            Command::AddObject { object, .. } | Command::RemoveObject { object, .. } => object.id(),
        }
    }

    pub fn execute(&mut self, overlay: &mut Overlay) -> CommandResult {
        match self {
            Command::AddObject { object, index } => {
                if !overlay.contains(object.id()) {
                    *index = overlay.insert(*index, object.clone());
                }
                Ok(())
            }
            Command::RemoveObject { object, index } => take_out(overlay, object, index),
        }
    }

    pub fn undo(&mut self, overlay: &mut Overlay) -> CommandResult {
        match self {
            Command::AddObject { object, index } => take_out(overlay, object, index),
            Command::RemoveObject { object, index } => {
                if !overlay.contains(object.id()) {
                    *index = overlay.insert(*index, object.clone());
                }
                Ok(())
            }
        }
    }
}

/// Remove `object` from the overlay by id and capture its current state.
fn take_out(overlay: &mut Overlay, object: &mut DrawingObject, index: &mut usize) -> CommandResult {
    let id = object.id();
    let (at, current) = overlay.remove(id).ok_or(CommandError::ObjectNotFound(id))?;
    *object = current;
    *index = at;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ObjectKind;
    use egui::{Color32, pos2, vec2};

    fn line() -> DrawingObject {
        let mut object = DrawingObject::create(ObjectKind::Line, pos2(0.0, 0.0), Color32::RED, 3.0);
        object.extend(pos2(10.0, 10.0));
        object
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut overlay = Overlay::new();
        let mut command = Command::add(line(), &overlay);
        command.execute(&mut overlay).unwrap();
        command.execute(&mut overlay).unwrap();
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_undo_add_captures_moved_object() {
        let mut overlay = Overlay::new();
        let mut command = Command::add(line(), &overlay);
        command.execute(&mut overlay).unwrap();
        let id = command.object_id();
        overlay.get_mut(id).unwrap().translate(vec2(5.0, 5.0));

        command.undo(&mut overlay).unwrap();
        assert!(overlay.is_empty());
        command.execute(&mut overlay).unwrap();
        assert_eq!(overlay.get(id).unwrap().start(), pos2(5.0, 5.0));
    }

    #[test]
    fn test_remove_restores_position() {
        let mut overlay = Overlay::new();
        let objects = [line(), line(), line()];
        let middle = objects[1].clone();
        for object in objects {
            overlay.push(object);
        }
        let mut command = Command::remove(middle.clone(), 0);
        command.execute(&mut overlay).unwrap();
        assert_eq!(overlay.len(), 2);
        command.undo(&mut overlay).unwrap();
        assert_eq!(overlay.index_of(middle.id()), Some(1));
    }

    #[test]
    fn test_missing_object_is_an_error() {
        let mut overlay = Overlay::new();
        let object = line();
        let id = object.id();
        let mut command = Command::remove(object, 0);
        assert_eq!(command.execute(&mut overlay), Err(CommandError::ObjectNotFound(id)));
    }
}
