//! Undo/Redo system for sticker edits.
//!
//! Every committed sticker change (add, remove, drag, text edit, width
//! change) is recorded as a [`ShapeOperation`]. The editing tool only talks
//! to the [`OperationStack`] trait, so a host can plug in its own undo stack;
//! [`CommandHistory`] is the one the desktop editor uses.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last action
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone action
//!
//! ## Module Structure
//!
//! - [`commands`] - ShapeOperation enum and the OperationStack contract
//! - [`command_history`] - CommandHistory resource for tracking state
//! - [`systems`] - Bevy systems for keyboard shortcuts

mod command_history;
mod commands;
mod systems;


// Re-exports
pub use command_history::CommandHistory;
pub use commands::{OperationStack, ShapeOperation};
pub use systems::{handle_redo, handle_undo};
