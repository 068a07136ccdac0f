//! Drag handlers for the selected sticker.
//!
//! A handler lives for exactly one drag. It keeps the sticker's id and the
//! state captured when the drag began, mutates the sticker live while the
//! drag continues, and commits a single undoable operation when it ends. A
//! cancelled drag restores the captured state and records nothing.

use bevy::log::debug;
use bevy::math::{Rect, Vec2};

use crate::constants::MIN_STICKER_WIDTH;
use crate::editor::history::ShapeOperation;
use crate::editor::tool::{ShapeEditor, ToolContext};
use crate::shapes::ShapeTransform;

/// What kind of drag a handler performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    ResizeAndRotate,
    ChangeWidth,
}

pub trait DragHandler: Send + Sync {
    fn kind(&self) -> DragKind;

    fn drag_start(&mut self, ctx: &mut ToolContext<'_>, editor: &mut ShapeEditor, point: Vec2);

    fn drag_continue(
        &mut self,
        ctx: &mut ToolContext<'_>,
        editor: &mut ShapeEditor,
        point: Vec2,
        velocity: Vec2,
    );

    fn drag_end(&mut self, ctx: &mut ToolContext<'_>, editor: &mut ShapeEditor, point: Vec2);

    fn drag_cancel(&mut self, ctx: &mut ToolContext<'_>, editor: &mut ShapeEditor, point: Vec2);
}

/// Put a sticker back to the transform it had when the drag began.
fn restore_transform(
    ctx: &mut ToolContext<'_>,
    editor: &mut ShapeEditor,
    shape_id: &str,
    original: ShapeTransform,
) {
    if let Some(shape) = ctx.drawing.shape_mut(shape_id) {
        shape.transform = original;
        editor.update_overlay(shape);
    }
    ctx.render.mark_dirty();
}

// ============================================================================
// Move
// ============================================================================

/// Translates the sticker by the pointer's displacement.
pub struct MoveHandler {
    shape_id: String,
    original_transform: ShapeTransform,
    start_point: Vec2,
}

impl MoveHandler {
    pub fn new(shape_id: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            original_transform: ShapeTransform::IDENTITY,
            start_point: Vec2::ZERO,
        }
    }

    fn transform_at(&self, point: Vec2) -> ShapeTransform {
        self.original_transform.translated(point - self.start_point)
    }
}

impl DragHandler for MoveHandler {
    fn kind(&self) -> DragKind {
        DragKind::Move
    }

    fn drag_start(&mut self, ctx: &mut ToolContext<'_>, _editor: &mut ShapeEditor, point: Vec2) {
        if let Some(shape) = ctx.drawing.shape(&self.shape_id) {
            self.original_transform = shape.transform;
        }
        self.start_point = point;
    }

    fn drag_continue(
        &mut self,
        ctx: &mut ToolContext<'_>,
        editor: &mut ShapeEditor,
        point: Vec2,
        _velocity: Vec2,
    ) {
        let transform = self.transform_at(point);
        if let Some(shape) = ctx.drawing.shape_mut(&self.shape_id) {
            shape.transform = transform;
            editor.update_overlay(shape);
        }
    }

    fn drag_end(&mut self, ctx: &mut ToolContext<'_>, _editor: &mut ShapeEditor, point: Vec2) {
        if !ctx.drawing.contains(&self.shape_id) {
            return;
        }
        ctx.apply(ShapeOperation::ChangeTransform {
            id: self.shape_id.clone(),
            from: self.original_transform,
            to: self.transform_at(point),
        });
    }

    fn drag_cancel(&mut self, ctx: &mut ToolContext<'_>, editor: &mut ShapeEditor, _point: Vec2) {
        restore_transform(ctx, editor, &self.shape_id, self.original_transform);
    }
}

// ============================================================================
// Resize and rotate
// ============================================================================

/// Scales and rotates the sticker around its own translation.
///
/// The pointer's polar coordinates around the pivot, compared with those at
/// drag start, give the scale factor (distance ratio) and the rotation
/// (angle difference).
pub struct ResizeAndRotateHandler {
    shape_id: String,
    original_transform: ShapeTransform,
    start_point: Vec2,
}

impl ResizeAndRotateHandler {
    pub fn new(shape_id: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            original_transform: ShapeTransform::IDENTITY,
            start_point: Vec2::ZERO,
        }
    }

    fn transform_at(&self, point: Vec2) -> ShapeTransform {
        resize_and_rotate(&self.original_transform, self.start_point, point)
    }
}

/// Scale and rotate `original` around its translation so the grab point
/// `start` follows the pointer to `point`.
///
/// Starting on the pivot itself leaves the transform unchanged, since there
/// is no distance or angle to compare against.
pub fn resize_and_rotate(original: &ShapeTransform, start: Vec2, point: Vec2) -> ShapeTransform {
    let pivot = original.translation;
    let original_delta = start - pivot;
    let new_delta = point - pivot;

    let original_distance = original_delta.length();
    if original_distance < f32::EPSILON {
        return *original;
    }

    let scale_change = new_delta.length() / original_distance;
    let angle_change = new_delta.y.atan2(new_delta.x) - original_delta.y.atan2(original_delta.x);

    original.scaled(scale_change).rotated(angle_change)
}

impl DragHandler for ResizeAndRotateHandler {
    fn kind(&self) -> DragKind {
        DragKind::ResizeAndRotate
    }

    fn drag_start(&mut self, ctx: &mut ToolContext<'_>, _editor: &mut ShapeEditor, point: Vec2) {
        if let Some(shape) = ctx.drawing.shape(&self.shape_id) {
            self.original_transform = shape.transform;
        }
        self.start_point = point;
    }

    fn drag_continue(
        &mut self,
        ctx: &mut ToolContext<'_>,
        editor: &mut ShapeEditor,
        point: Vec2,
        _velocity: Vec2,
    ) {
        let transform = self.transform_at(point);
        if let Some(shape) = ctx.drawing.shape_mut(&self.shape_id) {
            shape.transform = transform;
            editor.update_overlay(shape);
        }
    }

    fn drag_end(&mut self, ctx: &mut ToolContext<'_>, _editor: &mut ShapeEditor, point: Vec2) {
        if !ctx.drawing.contains(&self.shape_id) {
            return;
        }
        let to = self.transform_at(point);
        debug!(
            "Resize/rotate sticker {}: scale {} -> {}, rotation {} -> {}",
            self.shape_id,
            self.original_transform.scale,
            to.scale,
            self.original_transform.rotation,
            to.rotation
        );
        ctx.apply(ShapeOperation::ChangeTransform {
            id: self.shape_id.clone(),
            from: self.original_transform,
            to,
        });
    }

    fn drag_cancel(&mut self, ctx: &mut ToolContext<'_>, editor: &mut ShapeEditor, _point: Vec2) {
        restore_transform(ctx, editor, &self.shape_id, self.original_transform);
    }
}

// ============================================================================
// Change width
// ============================================================================

/// Widens or narrows a text sticker's wrap width.
///
/// Moving the pointer away from the sticker's center by `d` canvas units
/// grows the box by `2d` (both sides move), divided by the sticker's scale to
/// get local units.
pub struct ChangeWidthHandler {
    shape_id: String,
    start_point: Vec2,
    original_width: Option<f32>,
    original_bounds: Rect,
}

impl ChangeWidthHandler {
    pub fn new(shape_id: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            start_point: Vec2::ZERO,
            original_width: None,
            original_bounds: Rect::default(),
        }
    }

    fn width_at(&self, transform: &ShapeTransform, point: Vec2) -> f32 {
        let pivot = transform.translation;
        let distance_change = (point - pivot).length() - (self.start_point - pivot).length();
        let scale = transform.scale.abs().max(f32::EPSILON);
        (self.original_bounds.width() + distance_change * 2.0 / scale).max(MIN_STICKER_WIDTH)
    }

    /// Set the width for `point` and refit the box; returns the new bounds
    fn resize_to(
        &self,
        ctx: &mut ToolContext<'_>,
        editor: &mut ShapeEditor,
        point: Vec2,
    ) -> Option<(f32, Rect)> {
        let shape = ctx.drawing.shape_mut(&self.shape_id)?;
        let width = self.width_at(&shape.transform, point);
        shape.set_explicit_width(Some(width));
        editor.update_shape_frame(shape);
        Some((width, shape.bounding_rect))
    }
}

impl DragHandler for ChangeWidthHandler {
    fn kind(&self) -> DragKind {
        DragKind::ChangeWidth
    }

    fn drag_start(&mut self, ctx: &mut ToolContext<'_>, _editor: &mut ShapeEditor, point: Vec2) {
        if let Some(shape) = ctx.drawing.shape(&self.shape_id) {
            self.original_width = shape.explicit_width();
            self.original_bounds = shape.bounding_rect;
        }
        self.start_point = point;
    }

    fn drag_continue(
        &mut self,
        ctx: &mut ToolContext<'_>,
        editor: &mut ShapeEditor,
        point: Vec2,
        _velocity: Vec2,
    ) {
        self.resize_to(ctx, editor, point);
    }

    fn drag_end(&mut self, ctx: &mut ToolContext<'_>, editor: &mut ShapeEditor, point: Vec2) {
        let Some((width, bounds)) = self.resize_to(ctx, editor, point) else {
            return;
        };
        ctx.apply(ShapeOperation::ChangeWidth {
            id: self.shape_id.clone(),
            from: self.original_width,
            to: Some(width),
            from_bounds: self.original_bounds,
            to_bounds: bounds,
        });
    }

    fn drag_cancel(&mut self, ctx: &mut ToolContext<'_>, editor: &mut ShapeEditor, _point: Vec2) {
        if let Some(shape) = ctx.drawing.shape_mut(&self.shape_id) {
            shape.set_explicit_width(self.original_width);
            shape.bounding_rect = self.original_bounds;
            editor.update_overlay(shape);
        }
        ctx.render.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tool::RenderSurface;
    use crate::editor::history::OperationStack;
    use crate::shapes::{Drawing, StickerKindTag, StickerShape};
    use std::f32::consts::FRAC_PI_2;

    #[derive(Default)]
    struct Recorder {
        operations: Vec<ShapeOperation>,
    }

    impl OperationStack for Recorder {
        fn apply(&mut self, drawing: &mut Drawing, operation: ShapeOperation) {
            operation.apply(drawing);
            self.operations.push(operation);
        }
    }

    #[derive(Default)]
    struct Canvas {
        dirty: usize,
    }

    impl RenderSurface for Canvas {
        fn mark_dirty(&mut self) {
            self.dirty += 1;
        }

        fn rerender_all(&mut self) {}
    }

    fn setup(transform: ShapeTransform) -> (Drawing, String) {
        let mut drawing = Drawing::new(Vec2::new(800.0, 600.0));
        let mut shape = StickerShape::emoji();
        shape.text = "🎉".to_string();
        shape.transform = transform;
        shape.bounding_rect = Rect::new(-20.0, -20.0, 20.0, 20.0);
        let id = shape.id.clone();
        drawing.insert(shape);
        (drawing, id)
    }

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_move_commits_one_transform_change() {
        let (mut drawing, id) = setup(ShapeTransform::from_translation(Vec2::new(100.0, 100.0)));
        let mut ops = Recorder::default();
        let mut canvas = Canvas::default();
        let mut editor = ShapeEditor::with_defaults(StickerKindTag::Emoji);
        let mut ctx = ToolContext::new(&mut drawing, &mut ops, &mut canvas);

        let mut handler = MoveHandler::new(&id);
        handler.drag_start(&mut ctx, &mut editor, Vec2::new(100.0, 100.0));
        handler.drag_continue(&mut ctx, &mut editor, Vec2::new(110.0, 105.0), Vec2::ZERO);
        assert_eq!(
            ctx.drawing.shape(&id).map(|s| s.transform.translation),
            Some(Vec2::new(110.0, 105.0))
        );
        handler.drag_continue(&mut ctx, &mut editor, Vec2::new(125.0, 90.0), Vec2::ZERO);
        handler.drag_end(&mut ctx, &mut editor, Vec2::new(130.0, 90.0));

        assert_eq!(
            ops.operations,
            vec![ShapeOperation::ChangeTransform {
                id: id.clone(),
                from: ShapeTransform::from_translation(Vec2::new(100.0, 100.0)),
                to: ShapeTransform::from_translation(Vec2::new(130.0, 90.0)),
            }]
        );
        assert_eq!(
            drawing.shape(&id).map(|s| s.transform.translation),
            Some(Vec2::new(130.0, 90.0))
        );
    }

    #[test]
    fn test_move_cancel_restores_exactly() {
        let original = ShapeTransform::from_translation(Vec2::new(100.0, 100.0))
            .scaled(1.5)
            .rotated(0.3);
        let (mut drawing, id) = setup(original);
        let mut ops = Recorder::default();
        let mut canvas = Canvas::default();
        let mut editor = ShapeEditor::with_defaults(StickerKindTag::Emoji);
        let mut ctx = ToolContext::new(&mut drawing, &mut ops, &mut canvas);

        let mut handler = MoveHandler::new(&id);
        handler.drag_start(&mut ctx, &mut editor, Vec2::new(90.0, 90.0));
        handler.drag_continue(&mut ctx, &mut editor, Vec2::new(300.0, 40.0), Vec2::ZERO);
        handler.drag_cancel(&mut ctx, &mut editor, Vec2::new(300.0, 40.0));

        assert!(ops.operations.is_empty());
        assert_eq!(canvas.dirty, 1);
        assert_eq!(drawing.shape(&id).map(|s| s.transform), Some(original));
    }

    #[test]
    fn test_resize_and_rotate_quarter_turn_double_distance() {
        let original = ShapeTransform::from_translation(Vec2::new(100.0, 100.0));
        let result = resize_and_rotate(&original, Vec2::new(150.0, 100.0), Vec2::new(100.0, 200.0));

        assert_eq!(result.translation, Vec2::new(100.0, 100.0));
        assert!(approx_eq(result.scale, 2.0));
        assert!(approx_eq(result.rotation, FRAC_PI_2));
    }

    #[test]
    fn test_resize_and_rotate_keeps_existing_scale_and_rotation() {
        let original = ShapeTransform::from_translation(Vec2::new(0.0, 0.0))
            .scaled(2.0)
            .rotated(0.5);
        let result = resize_and_rotate(&original, Vec2::new(10.0, 0.0), Vec2::new(5.0, 0.0));

        assert!(approx_eq(result.scale, 1.0));
        assert!(approx_eq(result.rotation, 0.5));
    }

    #[test]
    fn test_resize_and_rotate_from_pivot_is_identity() {
        let original = ShapeTransform::from_translation(Vec2::new(100.0, 100.0)).scaled(3.0);
        let result = resize_and_rotate(&original, Vec2::new(100.0, 100.0), Vec2::new(180.0, 40.0));
        assert_eq!(result, original);
        assert!(result.is_finite());
    }

    #[test]
    fn test_resize_and_rotate_handler_commits_and_cancels() {
        let (mut drawing, id) = setup(ShapeTransform::from_translation(Vec2::new(100.0, 100.0)));
        let mut ops = Recorder::default();
        let mut canvas = Canvas::default();
        let mut editor = ShapeEditor::with_defaults(StickerKindTag::Emoji);
        let mut ctx = ToolContext::new(&mut drawing, &mut ops, &mut canvas);

        let mut handler = ResizeAndRotateHandler::new(&id);
        handler.drag_start(&mut ctx, &mut editor, Vec2::new(150.0, 100.0));
        handler.drag_continue(&mut ctx, &mut editor, Vec2::new(200.0, 100.0), Vec2::ZERO);
        assert_eq!(ctx.drawing.shape(&id).map(|s| s.transform.scale), Some(2.0));
        handler.drag_cancel(&mut ctx, &mut editor, Vec2::new(200.0, 100.0));
        assert_eq!(ctx.drawing.shape(&id).map(|s| s.transform.scale), Some(1.0));

        let mut handler = ResizeAndRotateHandler::new(&id);
        handler.drag_start(&mut ctx, &mut editor, Vec2::new(150.0, 100.0));
        handler.drag_end(&mut ctx, &mut editor, Vec2::new(100.0, 200.0));

        assert_eq!(ops.operations.len(), 1);
        let Some(ShapeOperation::ChangeTransform { from, to, .. }) = ops.operations.first() else {
            panic!("expected a transform change");
        };
        assert_eq!(from.scale, 1.0);
        assert!(approx_eq(to.scale, 2.0));
        assert!(approx_eq(to.rotation, FRAC_PI_2));
    }

    #[test]
    fn test_resize_and_rotate_ignores_intermediate_points() {
        let start = Vec2::new(150.0, 100.0);
        let waypoint = Vec2::new(40.0, 260.0);
        let target = Vec2::new(130.0, 170.0);

        let mut results = Vec::new();
        for path in [vec![waypoint, target], vec![target]] {
            let (mut drawing, id) =
                setup(ShapeTransform::from_translation(Vec2::new(100.0, 100.0)).scaled(1.5));
            let mut ops = Recorder::default();
            let mut canvas = Canvas::default();
            let mut editor = ShapeEditor::with_defaults(StickerKindTag::Emoji);
            let mut ctx = ToolContext::new(&mut drawing, &mut ops, &mut canvas);

            let mut handler = ResizeAndRotateHandler::new(&id);
            handler.drag_start(&mut ctx, &mut editor, start);
            for point in path {
                handler.drag_continue(&mut ctx, &mut editor, point, Vec2::ZERO);
            }
            results.push(ctx.drawing.shape(&id).map(|s| s.transform));
        }

        assert!(results[0].is_some());
        assert_eq!(results[0], results[1]);
    }

    #[test]
    fn test_change_width_grows_by_twice_the_distance() {
        let mut drawing = Drawing::new(Vec2::new(800.0, 600.0));
        let mut shape = StickerShape::text();
        shape.text = "hello".to_string();
        shape.transform = ShapeTransform::from_translation(Vec2::new(400.0, 300.0));
        shape.bounding_rect = Rect::new(-50.0, -20.0, 50.0, 20.0);
        let id = shape.id.clone();
        drawing.insert(shape);

        let mut ops = Recorder::default();
        let mut canvas = Canvas::default();
        let mut editor = ShapeEditor::with_defaults(StickerKindTag::Text);
        editor.max_width = 800.0;
        let mut ctx = ToolContext::new(&mut drawing, &mut ops, &mut canvas);

        let mut handler = ChangeWidthHandler::new(&id);
        handler.drag_start(&mut ctx, &mut editor, Vec2::new(460.0, 300.0));
        handler.drag_end(&mut ctx, &mut editor, Vec2::new(505.0, 300.0));

        // The grab point moves 45 further from the center
        let Some(ShapeOperation::ChangeWidth { from, to, to_bounds, .. }) = ops.operations.first()
        else {
            panic!("expected a width change");
        };
        assert_eq!(*from, None);
        assert!(approx_eq(to.unwrap_or_default(), 190.0));
        assert!(approx_eq(to_bounds.width(), 190.0));
    }

    #[test]
    fn test_change_width_floors_and_cancels() {
        let mut drawing = Drawing::new(Vec2::new(800.0, 600.0));
        let mut shape = StickerShape::text();
        shape.text = "hello".to_string();
        shape.transform = ShapeTransform::from_translation(Vec2::new(400.0, 300.0));
        shape.bounding_rect = Rect::new(-50.0, -20.0, 50.0, 20.0);
        let id = shape.id.clone();
        drawing.insert(shape);

        let mut ops = Recorder::default();
        let mut canvas = Canvas::default();
        let mut editor = ShapeEditor::with_defaults(StickerKindTag::Text);
        let mut ctx = ToolContext::new(&mut drawing, &mut ops, &mut canvas);

        let mut handler = ChangeWidthHandler::new(&id);
        handler.drag_start(&mut ctx, &mut editor, Vec2::new(500.0, 300.0));
        handler.drag_continue(&mut ctx, &mut editor, Vec2::new(401.0, 300.0), Vec2::ZERO);
        assert_eq!(
            ctx.drawing.shape(&id).and_then(|s| s.explicit_width()),
            Some(MIN_STICKER_WIDTH)
        );

        handler.drag_cancel(&mut ctx, &mut editor, Vec2::new(401.0, 300.0));
        assert!(ops.operations.is_empty());
        let shape = drawing.shape(&id).cloned().unwrap_or_else(StickerShape::text);
        assert_eq!(shape.explicit_width(), None);
        assert_eq!(shape.bounding_rect, Rect::new(-50.0, -20.0, 50.0, 20.0));
    }

    #[test]
    fn test_handler_for_missing_shape_commits_nothing() {
        let mut drawing = Drawing::new(Vec2::new(800.0, 600.0));
        let mut ops = Recorder::default();
        let mut canvas = Canvas::default();
        let mut editor = ShapeEditor::with_defaults(StickerKindTag::Emoji);
        let mut ctx = ToolContext::new(&mut drawing, &mut ops, &mut canvas);

        let mut handler = MoveHandler::new("gone");
        handler.drag_start(&mut ctx, &mut editor, Vec2::ZERO);
        handler.drag_continue(&mut ctx, &mut editor, Vec2::ONE, Vec2::ZERO);
        handler.drag_end(&mut ctx, &mut editor, Vec2::ONE);
        assert!(ops.operations.is_empty());
    }
}
