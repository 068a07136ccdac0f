//! Shape operations recorded for undo/redo.

use bevy::math::Rect;

use crate::shapes::{Drawing, ShapeTransform, StickerShape};

/// A reversible change to the drawing.
///
/// Text and width edits carry the bounding rect on each side, because both
/// change the sticker's fitted size and an undo must put the old box back.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeOperation {
    /// A sticker was added to the drawing
    AddShape { shape: StickerShape },
    /// A sticker was removed (the full shape is kept so undo can restore it)
    RemoveShape { shape: StickerShape },
    /// A drag moved, scaled or rotated a sticker
    ChangeTransform {
        id: String,
        from: ShapeTransform,
        to: ShapeTransform,
    },
    /// The text of a sticker changed
    EditText {
        id: String,
        from: String,
        to: String,
        from_bounds: Rect,
        to_bounds: Rect,
    },
    /// The explicit wrap width of a text sticker changed
    ChangeWidth {
        id: String,
        from: Option<f32>,
        to: Option<f32>,
        from_bounds: Rect,
        to_bounds: Rect,
    },
}

impl ShapeOperation {
    pub fn shape_id(&self) -> &str {
        match self {
            ShapeOperation::AddShape { shape } | ShapeOperation::RemoveShape { shape } => {
                &shape.id
            }
            ShapeOperation::ChangeTransform { id, .. }
            | ShapeOperation::EditText { id, .. }
            | ShapeOperation::ChangeWidth { id, .. } => id,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShapeOperation::AddShape { .. } => "Add sticker",
            ShapeOperation::RemoveShape { .. } => "Remove sticker",
            ShapeOperation::ChangeTransform { .. } => "Transform sticker",
            ShapeOperation::EditText { .. } => "Edit text",
            ShapeOperation::ChangeWidth { .. } => "Change width",
        }
    }

    /// Bring the drawing to the "after" state of this operation.
    ///
    /// Operations on a sticker that is no longer in the drawing do nothing.
    pub fn apply(&self, drawing: &mut Drawing) {
        match self {
            ShapeOperation::AddShape { shape } => drawing.insert(shape.clone()),
            ShapeOperation::RemoveShape { shape } => {
                drawing.remove(&shape.id);
            }
            ShapeOperation::ChangeTransform { id, to, .. } => {
                if let Some(shape) = drawing.shape_mut(id) {
                    shape.transform = *to;
                }
            }
            ShapeOperation::EditText {
                id, to, to_bounds, ..
            } => {
                if let Some(shape) = drawing.shape_mut(id) {
                    shape.text = to.clone();
                    shape.bounding_rect = *to_bounds;
                }
            }
            ShapeOperation::ChangeWidth {
                id, to, to_bounds, ..
            } => {
                if let Some(shape) = drawing.shape_mut(id) {
                    shape.set_explicit_width(*to);
                    shape.bounding_rect = *to_bounds;
                }
            }
        }
    }

    /// The operation that undoes this one
    pub fn inverted(&self) -> ShapeOperation {
        match self {
            ShapeOperation::AddShape { shape } => ShapeOperation::RemoveShape {
                shape: shape.clone(),
            },
            ShapeOperation::RemoveShape { shape } => ShapeOperation::AddShape {
                shape: shape.clone(),
            },
            ShapeOperation::ChangeTransform { id, from, to } => ShapeOperation::ChangeTransform {
                id: id.clone(),
                from: *to,
                to: *from,
            },
            ShapeOperation::EditText {
                id,
                from,
                to,
                from_bounds,
                to_bounds,
            } => ShapeOperation::EditText {
                id: id.clone(),
                from: to.clone(),
                to: from.clone(),
                from_bounds: *to_bounds,
                to_bounds: *from_bounds,
            },
            ShapeOperation::ChangeWidth {
                id,
                from,
                to,
                from_bounds,
                to_bounds,
            } => ShapeOperation::ChangeWidth {
                id: id.clone(),
                from: *to,
                to: *from,
                from_bounds: *to_bounds,
                to_bounds: *from_bounds,
            },
        }
    }
}

/// Anything that can record operations: the editor's command history, or a
/// host application's own undo stack.
pub trait OperationStack {
    /// Apply `operation` to `drawing` and record it
    fn apply(&mut self, drawing: &mut Drawing, operation: ShapeOperation);
}
