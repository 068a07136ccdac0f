//! Command history resource for tracking undo/redo state.

use bevy::prelude::*;

use crate::constants::MAX_HISTORY_SIZE;
use crate::shapes::Drawing;

use super::commands::{OperationStack, ShapeOperation};

/// Resource tracking operation history for undo/redo
#[derive(Resource, Default)]
pub struct CommandHistory {
    /// Operations that can be undone (most recent last)
    undo_stack: Vec<ShapeOperation>,
    /// Reverse operations that can be redone (most recent last)
    redo_stack: Vec<ShapeOperation>,
}

impl OperationStack for CommandHistory {
    fn apply(&mut self, drawing: &mut Drawing, operation: ShapeOperation) {
        debug!(
            "Applying {} on sticker {}",
            operation.description(),
            operation.shape_id()
        );
        operation.apply(drawing);
        self.push(operation);
    }
}

impl CommandHistory {
    /// Push an already-applied operation to the history
    pub fn push(&mut self, operation: ShapeOperation) {
        // Clear redo stack when a new action is performed
        self.redo_stack.clear();

        self.undo_stack.push(operation);

        // Trim history if it exceeds max size
        while self.undo_stack.len() > MAX_HISTORY_SIZE {
            self.undo_stack.remove(0);
        }
    }

    /// Revert the most recent operation. Returns false if there was nothing
    /// to undo.
    pub fn undo(&mut self, drawing: &mut Drawing) -> bool {
        let Some(operation) = self.undo_stack.pop() else {
            return false;
        };
        let reverse = operation.inverted();
        reverse.apply(drawing);
        info!("Undo: {}", operation.description());
        self.redo_stack.push(reverse);
        true
    }

    /// Re-apply the most recently undone operation. Returns false if there
    /// was nothing to redo.
    pub fn redo(&mut self, drawing: &mut Drawing) -> bool {
        let Some(reverse) = self.redo_stack.pop() else {
            return false;
        };
        let operation = reverse.inverted();
        operation.apply(drawing);
        info!("Redo: {}", operation.description());
        self.undo_stack.push(operation);
        true
    }

    /// Check if there are operations to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are operations to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the count of undoable operations
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the count of redoable operations
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// The most recent undoable operation
    pub fn last(&self) -> Option<&ShapeOperation> {
        self.undo_stack.last()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
