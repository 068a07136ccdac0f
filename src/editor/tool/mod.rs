//! The sticker tool: selection, text editing and gesture routing for one
//! sticker kind.
//!
//! ## Module Structure
//!
//! - [`context`] - `ToolContext` and the `RenderSurface` contract
//! - [`shape_editor`] - Overlay syncing and bounds fitting

mod context;
mod shape_editor;

pub use context::{RenderSurface, ToolContext};
pub use shape_editor::ShapeEditor;

use bevy::log::{debug, info};
use bevy::math::{Rect, Vec2};

use crate::editor::drag::{
    ChangeWidthHandler, DragHandler, DragKind, MoveHandler, ResizeAndRotateHandler,
};
use crate::editor::history::ShapeOperation;
use crate::editor::overlay::{DragActionType, EditingOverlay, OverlayDelegate, TextSurface};
use crate::shapes::{ShapeTransform, StickerKind, StickerKindTag, StickerShape, UserSettings};

/// Edits stickers of a single kind.
///
/// Holds at most one selected sticker (by id) and at most one in-flight drag
/// handler. Text typed into the overlay updates the sticker live; the undo
/// record for it is written lazily, exactly once per distinct change, when
/// editing ends or another gesture begins.
pub struct StickerTool {
    kind: StickerKindTag,
    selected: Option<String>,
    drag_handler: Option<Box<dyn DragHandler>>,
    /// Text and bounds as of the last committed edit
    original_text: String,
    original_bounds: Rect,
    settings: Option<UserSettings>,
    editor: ShapeEditor,
}

impl StickerTool {
    pub fn new(
        kind: StickerKindTag,
        text_surface: Box<dyn TextSurface>,
        delegate: Option<Box<dyn OverlayDelegate>>,
    ) -> Self {
        Self::with_editor(kind, ShapeEditor::new(kind, text_surface, delegate))
    }

    pub fn emoji() -> Self {
        Self::with_editor(StickerKindTag::Emoji, ShapeEditor::with_defaults(StickerKindTag::Emoji))
    }

    pub fn text() -> Self {
        Self::with_editor(StickerKindTag::Text, ShapeEditor::with_defaults(StickerKindTag::Text))
    }

    fn with_editor(kind: StickerKindTag, editor: ShapeEditor) -> Self {
        Self {
            kind,
            selected: None,
            drag_handler: None,
            original_text: String::new(),
            original_bounds: Rect::default(),
            settings: None,
            editor,
        }
    }

    /// Starting wrap width; grows to the canvas width when editing starts
    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.editor.max_width = max_width;
        self
    }

    /// Settings applied to stickers this tool inserts
    pub fn with_settings(mut self, settings: UserSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn settings(&self) -> Option<UserSettings> {
        self.settings
    }

    pub fn kind(&self) -> StickerKindTag {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    pub fn selected_shape_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn overlay(&self) -> &EditingOverlay {
        self.editor.overlay()
    }

    pub fn max_width(&self) -> f32 {
        self.editor.max_width
    }

    pub fn active_drag(&self) -> Option<DragKind> {
        self.drag_handler.as_ref().map(|handler| handler.kind())
    }

    /// Text the undo stack last saw for the selected sticker
    pub fn committed_text(&self) -> &str {
        &self.original_text
    }

    // ========================================================================
    // Activation
    // ========================================================================

    /// Start using the tool, optionally resuming editing of `shape_id`.
    ///
    /// A sticker of another kind is ignored.
    pub fn activate(&mut self, ctx: &mut ToolContext<'_>, shape_id: Option<&str>) {
        debug!("Activating {} tool", self.kind.as_str());
        let Some(id) = shape_id else {
            return;
        };
        if ctx
            .drawing
            .shape(id)
            .is_some_and(|shape| shape.tag() == self.kind)
        {
            self.begin_editing(ctx, id);
        }
    }

    pub fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        debug!("Deactivating {} tool", self.kind.as_str());
        if let Some(mut handler) = self.drag_handler.take() {
            handler.drag_cancel(ctx, &mut self.editor, Vec2::ZERO);
        }
        self.finish_editing(ctx);
    }

    fn begin_editing(&mut self, ctx: &mut ToolContext<'_>, id: &str) {
        self.editor.max_width = self.editor.max_width.max(ctx.drawing.size.x);
        ctx.render.rerender_all();

        let Some(shape) = ctx.drawing.shape_mut(id) else {
            return;
        };
        self.editor.update_shape_frame(shape);
        self.original_text = shape.text.clone();
        self.original_bounds = shape.bounding_rect;
        self.selected = Some(id.to_string());
        self.editor.overlay_mut().set_attached(true);
        debug!("Editing sticker {}", id);
    }

    /// Stop editing the selected sticker, recording any pending text.
    pub fn finish_editing(&mut self, ctx: &mut ToolContext<'_>) {
        self.apply_edit_text_if_changed(ctx);
        self.selected = None;
        self.editor.overlay_mut().set_attached(false);
        ctx.render.mark_dirty();
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Record one `EditText` operation if the selected sticker's text differs
    /// from the last committed text. Idempotent: a second call with no
    /// intervening change records nothing.
    pub fn apply_edit_text_if_changed(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(id) = self.selected.as_deref() else {
            return;
        };
        let Some(shape) = ctx.drawing.shape(id) else {
            return;
        };
        if shape.text == self.original_text {
            return;
        }

        let operation = ShapeOperation::EditText {
            id: id.to_string(),
            from: std::mem::take(&mut self.original_text),
            to: shape.text.clone(),
            from_bounds: self.original_bounds,
            to_bounds: shape.bounding_rect,
        };
        self.original_text = shape.text.clone();
        self.original_bounds = shape.bounding_rect;
        ctx.apply(operation);
    }

    /// The user changed the text in the overlay. Updates the sticker live
    /// without touching the undo stack.
    pub fn handle_text_input(&mut self, ctx: &mut ToolContext<'_>, text: &str) {
        let Some(id) = self.selected.as_deref() else {
            return;
        };
        let Some(shape) = ctx.drawing.shape_mut(id) else {
            return;
        };
        if shape.text == text {
            return;
        }
        shape.text = text.to_string();
        self.editor.update_shape_frame(shape);
    }

    /// Refit the selected sticker's box to its current text.
    pub fn update_shape_frame(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(shape) = self
            .selected
            .as_deref()
            .and_then(|id| ctx.drawing.shape_mut(id))
        {
            self.editor.update_shape_frame(shape);
        }
    }

    /// Re-sync the overlay with the selected sticker without refitting.
    pub fn update_overlay(&mut self, ctx: &ToolContext<'_>) {
        if let Some(shape) = self
            .selected
            .as_deref()
            .and_then(|id| ctx.drawing.shape(id))
        {
            self.editor.update_overlay(shape);
        }
    }

    /// Fitted local bounds for `shape` with the tool's current wrap width.
    pub fn compute_bounds(&mut self, shape: &StickerShape) -> Rect {
        self.editor.compute_bounds(shape)
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    /// A tap (press and release without dragging).
    ///
    /// With a selection: the delete control removes the sticker, a tap on
    /// the sticker is left alone, and a tap elsewhere ends editing. Without
    /// one: selects the topmost sticker of this kind under the point.
    pub fn handle_tap(&mut self, ctx: &mut ToolContext<'_>, point: Vec2) {
        if let Some(id) = self.selected.clone() {
            let Some(shape) = ctx.drawing.shape(&id) else {
                self.finish_editing(ctx);
                return;
            };

            match self.editor.overlay().hit_test_control(point) {
                Some(DragActionType::Delete) => self.remove_selected(ctx),
                // Caret placement is left to the host's text surface
                _ if shape.hit_test(point) => {}
                _ => self.finish_editing(ctx),
            }
            return;
        }

        let hit = ctx
            .drawing
            .shape_at(point, self.kind)
            .map(|shape| shape.id.clone());
        if let Some(id) = hit {
            self.begin_editing(ctx, &id);
            ctx.render.mark_dirty();
        }
    }

    pub fn handle_drag_start(&mut self, ctx: &mut ToolContext<'_>, point: Vec2) {
        if self.drag_handler.is_some() {
            debug!("Ignoring drag start while a drag is in flight");
            return;
        }
        let Some(id) = self.selected.clone() else {
            return;
        };
        let Some(shape) = ctx.drawing.shape(&id) else {
            return;
        };

        let mut handler: Box<dyn DragHandler> =
            match self.editor.overlay().hit_test_control(point) {
                Some(DragActionType::ResizeAndRotate) => Box::new(ResizeAndRotateHandler::new(&id)),
                Some(DragActionType::ChangeWidth) if self.kind == StickerKindTag::Text => {
                    Box::new(ChangeWidthHandler::new(&id))
                }
                _ if shape.hit_test(point) => Box::new(MoveHandler::new(&id)),
                _ => return,
            };

        self.apply_edit_text_if_changed(ctx);
        handler.drag_start(ctx, &mut self.editor, point);
        self.drag_handler = Some(handler);
    }

    /// Forward to the active handler. With none, a drag that has slid onto
    /// the resize control starts one there.
    pub fn handle_drag_continue(&mut self, ctx: &mut ToolContext<'_>, point: Vec2, velocity: Vec2) {
        if let Some(handler) = self.drag_handler.as_mut() {
            handler.drag_continue(ctx, &mut self.editor, point, velocity);
        } else if self.editor.overlay().hit_test_control(point)
            == Some(DragActionType::ResizeAndRotate)
        {
            self.handle_drag_start(ctx, point);
        }
    }

    pub fn handle_drag_end(&mut self, ctx: &mut ToolContext<'_>, point: Vec2) {
        if let Some(mut handler) = self.drag_handler.take() {
            handler.drag_end(ctx, &mut self.editor, point);
            // Text was flushed at drag start; a width change refits the bounds
            self.resnapshot_bounds(ctx);
        }
        ctx.render.mark_dirty();
        self.update_overlay(ctx);
    }

    pub fn handle_drag_cancel(&mut self, ctx: &mut ToolContext<'_>, point: Vec2) {
        if let Some(mut handler) = self.drag_handler.take() {
            handler.drag_cancel(ctx, &mut self.editor, point);
        }
    }

    // ========================================================================
    // Host commands
    // ========================================================================

    /// Add a new sticker centered on `point` and start editing it. Returns
    /// the new sticker's id.
    pub fn insert_sticker(&mut self, ctx: &mut ToolContext<'_>, point: Vec2, text: &str) -> String {
        if self.selected.is_some() {
            self.finish_editing(ctx);
        }

        let kind = match self.kind {
            StickerKindTag::Emoji => StickerKind::Emoji,
            StickerKindTag::Text => StickerKind::Text {
                explicit_width: None,
            },
        };
        let mut shape = StickerShape::new(kind);
        shape.text = text.to_string();
        shape.transform = ShapeTransform::from_translation(point);
        if let Some(settings) = &self.settings {
            shape.apply_settings(settings);
        }
        self.editor.max_width = self.editor.max_width.max(ctx.drawing.size.x);
        self.editor.update_shape_frame(&mut shape);

        let id = shape.id.clone();
        info!("Inserted {} sticker {}", self.kind.as_str(), id);
        ctx.apply(ShapeOperation::AddShape { shape });
        self.begin_editing(ctx, &id);
        id
    }

    /// Remove the selected sticker, recording pending text first.
    pub fn remove_selected(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        self.apply_edit_text_if_changed(ctx);
        self.drag_handler = None;

        if let Some(shape) = ctx.drawing.shape(&id).cloned() {
            ctx.apply(ShapeOperation::RemoveShape { shape });
        }
        self.selected = None;
        self.editor.overlay_mut().set_attached(false);
        ctx.render.mark_dirty();
    }

    /// Font size changed outside the tool. Applies to the selected sticker
    /// (not recorded for undo) and to stickers inserted later. Pending text
    /// is recorded first so its undo keeps the box it was typed into.
    pub fn apply_settings(&mut self, ctx: &mut ToolContext<'_>, settings: UserSettings) {
        self.settings = Some(settings);
        self.apply_edit_text_if_changed(ctx);
        if let Some(shape) = self
            .selected
            .as_deref()
            .and_then(|id| ctx.drawing.shape_mut(id))
        {
            shape.apply_settings(&settings);
            self.editor.update_shape_frame(shape);
        }
        self.resnapshot_bounds(ctx);
        ctx.render.mark_dirty();
    }

    /// Take the selected sticker's current box as the committed one. Only
    /// valid while no text edit is pending.
    fn resnapshot_bounds(&mut self, ctx: &ToolContext<'_>) {
        if let Some(shape) = self
            .selected
            .as_deref()
            .and_then(|id| ctx.drawing.shape(id))
        {
            self.original_bounds = shape.bounding_rect;
        }
    }

    /// The drawing changed under the tool (undo, redo, load). Drops a
    /// selection whose sticker is gone and re-snapshots the committed text.
    pub fn sync_with_drawing(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        match ctx.drawing.shape(&id) {
            Some(shape) => {
                self.original_text = shape.text.clone();
                self.original_bounds = shape.bounding_rect;
                self.editor.update_overlay(shape);
            }
            None => {
                debug!("Selected sticker {} left the drawing", id);
                self.drag_handler = None;
                self.selected = None;
                self.editor.overlay_mut().set_attached(false);
            }
        }
        ctx.render.mark_dirty();
    }
}
