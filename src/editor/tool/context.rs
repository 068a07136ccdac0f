//! What the tool borrows from its host on every call.

use crate::editor::history::{OperationStack, ShapeOperation};
use crate::shapes::Drawing;

/// The canvas that paints committed stickers.
pub trait RenderSurface {
    /// Request a redraw of the persistent buffer on the next frame
    fn mark_dirty(&mut self);

    /// Redraw every sticker now, so the canvas and the overlay agree when
    /// editing begins
    fn rerender_all(&mut self);
}

/// Borrowed host state for a single tool call.
///
/// The drawing owns the stickers; the tool only keeps the selected
/// sticker's id between calls.
pub struct ToolContext<'a> {
    pub drawing: &'a mut Drawing,
    pub operations: &'a mut dyn OperationStack,
    pub render: &'a mut dyn RenderSurface,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        drawing: &'a mut Drawing,
        operations: &'a mut dyn OperationStack,
        render: &'a mut dyn RenderSurface,
    ) -> Self {
        Self {
            drawing,
            operations,
            render,
        }
    }

    /// Hand an operation to the undo stack, which also applies it
    pub fn apply(&mut self, operation: ShapeOperation) {
        self.operations.apply(self.drawing, operation);
    }
}
