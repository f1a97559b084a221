mod commands;
mod history;
mod overlay;

use thiserror::Error;

use crate::element::ObjectId;

pub use commands::Command;
pub use history::CommandHistory;
pub use overlay::Overlay;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("object {0} is not in the overlay")]
    ObjectNotFound(ObjectId),
}
