use super::{Command, CommandResult, Overlay};

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and record it if it succeeded.
    /// Any new command invalidates the redo stack.
    pub fn execute(&mut self, mut command: Command, overlay: &mut Overlay) -> CommandResult {
        command.execute(overlay)?;
        log::debug!("Executed {} for object {}", command_name(&command), command.object_id());
        self.undo_stack.push(command);
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the last executed command. Returns false if nothing was undone.
    pub fn undo(&mut self, overlay: &mut Overlay) -> bool {
        let Some(mut command) = self.undo_stack.pop() else {
            return false;
        };
        match command.undo(overlay) {
            Ok(()) => {
                self.redo_stack.push(command);
                true
            }
            Err(err) => {
                log::warn!("Dropping stale command on undo: {}", err);
                false
            }
        }
    }

    /// Redo the last undone command. Returns false if nothing was redone.
    pub fn redo(&mut self, overlay: &mut Overlay) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        match command.execute(overlay) {
            Ok(()) => {
                self.undo_stack.push(command);
                true
            }
            Err(err) => {
                log::warn!("Dropping stale command on redo: {}", err);
                false
            }
        }
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::AddObject { .. } => "AddObject",
        Command::RemoveObject { .. } => "RemoveObject",
    }
}
