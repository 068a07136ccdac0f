//! The editing overlay shown on top of the selected sticker.
//!
//! The overlay hosts the editable text surface and a list of control regions
//! (delete, resize/rotate, change width). Its local frame is the sticker's
//! bounding rect; its screen transform is the sticker's affine, so controls
//! follow the sticker as it moves, scales and rotates.
//!
//! ## Module Structure
//!
//! - [`controls`] - Control regions and their soft placement rules
//! - [`text_surface`] - The `TextSurface` contract and a built-in measurer

mod controls;
mod text_surface;

pub use controls::{
    Control, ControlPlacement, DragActionType, HorizontalAnchor, LayoutPriority, VerticalAnchor,
};
pub use text_surface::{ApproxTextSurface, TextSurface};

use bevy::math::{Affine2, Rect, Vec2};

use crate::shapes::{ShapeTransform, StickerKindTag, transformed_bounds};

/// Hooks a host can use to customize the overlay.
pub trait OverlayDelegate: Send + Sync {
    /// The overlay is about to be used for the first time. Add and arrange
    /// controls here.
    fn will_use_overlay(&mut self, overlay: &mut EditingOverlay);

    /// The selected sticker's transform changed and the overlay followed it.
    fn did_update_overlay_transform(
        &mut self,
        _overlay: &mut EditingOverlay,
        _transform: &ShapeTransform,
    ) {
    }
}

/// Standard controls that keep a constant on-screen size no matter how far
/// the sticker is scaled.
pub struct LegibleChrome {
    pub kind: StickerKindTag,
}

impl OverlayDelegate for LegibleChrome {
    fn will_use_overlay(&mut self, overlay: &mut EditingOverlay) {
        overlay.add_standard_controls(self.kind);
    }

    fn did_update_overlay_transform(
        &mut self,
        overlay: &mut EditingOverlay,
        transform: &ShapeTransform,
    ) {
        if transform.scale.abs() > f32::EPSILON {
            overlay.chrome_scale = 1.0 / transform.scale.abs();
        }
    }
}

pub struct EditingOverlay {
    text_surface: Box<dyn TextSurface>,
    /// Local frame, the same rect as the sticker's bounding rect
    bounds: Rect,
    /// Local frame → parent (canvas) space
    transform: Affine2,
    /// Multiplier for control size and gaps
    pub chrome_scale: f32,
    controls: Vec<Control>,
    /// Whether the overlay is currently installed over the canvas
    attached: bool,
}

impl EditingOverlay {
    pub fn new(text_surface: Box<dyn TextSurface>) -> Self {
        Self {
            text_surface,
            bounds: Rect::default(),
            transform: Affine2::IDENTITY,
            chrome_scale: 1.0,
            controls: Vec::new(),
            attached: false,
        }
    }

    pub fn text_surface(&self) -> &dyn TextSurface {
        self.text_surface.as_ref()
    }

    pub fn text_surface_mut(&mut self) -> &mut dyn TextSurface {
        self.text_surface.as_mut()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    pub fn set_layout(&mut self, bounds: Rect, transform: Affine2) {
        self.bounds = bounds;
        self.transform = transform;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn add_control(&mut self, action: DragActionType, placement: ControlPlacement) {
        self.controls.push(Control { action, placement });
    }

    pub fn add_delete_control(&mut self) {
        self.add_control(DragActionType::Delete, ControlPlacement::delete());
    }

    pub fn add_resize_and_rotate_control(&mut self) {
        self.add_control(
            DragActionType::ResizeAndRotate,
            ControlPlacement::resize_and_rotate(),
        );
    }

    pub fn add_change_width_control(&mut self) {
        self.add_control(DragActionType::ChangeWidth, ControlPlacement::change_width());
    }

    /// Delete and resize/rotate, plus change width for text stickers
    pub fn add_standard_controls(&mut self, kind: StickerKindTag) {
        self.add_delete_control();
        self.add_resize_and_rotate_control();
        if kind == StickerKindTag::Text {
            self.add_change_width_control();
        }
    }

    /// Size the text surface wants when wrapped to `max_width`
    pub fn fit_size(&self, max_width: f32) -> Vec2 {
        self.text_surface.size_that_fits(max_width)
    }

    /// Frame of a control in the overlay's local space
    pub fn control_frame(&self, control: &Control) -> Rect {
        control.placement.frame(self.bounds, self.chrome_scale)
    }

    /// Corners of each control in parent space, in declaration order.
    /// Rotated stickers give rotated quads.
    pub fn control_quads(&self) -> Vec<(DragActionType, [Vec2; 4])> {
        self.controls
            .iter()
            .map(|control| {
                let frame = self.control_frame(control);
                let corners = [
                    frame.min,
                    Vec2::new(frame.max.x, frame.min.y),
                    frame.max,
                    Vec2::new(frame.min.x, frame.max.y),
                ]
                .map(|corner| self.transform.transform_point2(corner));
                (control.action, corners)
            })
            .collect()
    }

    /// First control (in declaration order) whose parent-space region
    /// contains `point`. Nothing matches while the overlay is detached.
    pub fn hit_test_control(&self, point: Vec2) -> Option<DragActionType> {
        if !self.attached {
            return None;
        }

        self.controls
            .iter()
            .find(|control| {
                transformed_bounds(self.control_frame(control), &self.transform).contains(point)
            })
            .map(|control| control.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn overlay() -> EditingOverlay {
        let mut overlay = EditingOverlay::new(Box::new(ApproxTextSurface::new(20.0)));
        overlay.add_standard_controls(StickerKindTag::Emoji);
        overlay.set_layout(
            Rect::new(-50.0, -20.0, 50.0, 20.0),
            ShapeTransform::from_translation(Vec2::new(200.0, 100.0)).affine(),
        );
        overlay.set_attached(true);
        overlay
    }

    #[test]
    fn test_standard_controls_per_kind() {
        let emoji = overlay();
        assert_eq!(emoji.controls().len(), 2);

        let mut text = EditingOverlay::new(Box::new(ApproxTextSurface::default()));
        text.add_standard_controls(StickerKindTag::Text);
        let actions: Vec<_> = text.controls().iter().map(|c| c.action).collect();
        assert_eq!(
            actions,
            vec![
                DragActionType::Delete,
                DragActionType::ResizeAndRotate,
                DragActionType::ChangeWidth
            ]
        );
    }

    #[test]
    fn test_hit_test_control_in_parent_space() {
        let overlay = overlay();
        // Delete control spans local x -76..-50, y -49..-23
        assert_eq!(
            overlay.hit_test_control(Vec2::new(140.0, 65.0)),
            Some(DragActionType::Delete)
        );
        // Resize control spans local x 55..81, y 24..50
        assert_eq!(
            overlay.hit_test_control(Vec2::new(270.0, 140.0)),
            Some(DragActionType::ResizeAndRotate)
        );
        // Inside the text itself
        assert_eq!(overlay.hit_test_control(Vec2::new(200.0, 100.0)), None);
    }

    #[test]
    fn test_hit_test_follows_rotation() {
        let mut overlay = overlay();
        let transform = ShapeTransform::from_translation(Vec2::new(200.0, 100.0)).rotated(PI);
        overlay.set_layout(overlay.bounds(), transform.affine());

        // Rotated half a turn, the resize control sits up and to the left
        assert_eq!(
            overlay.hit_test_control(Vec2::new(130.0, 60.0)),
            Some(DragActionType::ResizeAndRotate)
        );
        // ...and delete has swung round to the lower right
        assert_eq!(
            overlay.hit_test_control(Vec2::new(270.0, 140.0)),
            Some(DragActionType::Delete)
        );
    }

    #[test]
    fn test_detached_overlay_hits_nothing() {
        let mut overlay = overlay();
        overlay.set_attached(false);
        assert_eq!(overlay.hit_test_control(Vec2::new(140.0, 65.0)), None);
    }

    #[test]
    fn test_first_declared_control_wins() {
        let mut overlay = EditingOverlay::new(Box::new(ApproxTextSurface::default()));
        overlay.add_resize_and_rotate_control();
        overlay.add_control(DragActionType::ChangeWidth, ControlPlacement::resize_and_rotate());
        overlay.set_layout(Rect::new(-10.0, -10.0, 10.0, 10.0), Affine2::IDENTITY);
        overlay.set_attached(true);

        assert_eq!(
            overlay.hit_test_control(Vec2::new(20.0, 20.0)),
            Some(DragActionType::ResizeAndRotate)
        );
    }

    #[test]
    fn test_fit_size_delegates_to_text_surface() {
        let mut overlay = overlay();
        overlay.text_surface_mut().set_text("hello");
        assert_eq!(
            overlay.fit_size(300.0),
            overlay.text_surface().size_that_fits(300.0)
        );
    }

    #[test]
    fn test_legible_chrome_counters_scale() {
        let mut overlay = overlay();
        let mut delegate = LegibleChrome {
            kind: StickerKindTag::Emoji,
        };
        delegate.did_update_overlay_transform(&mut overlay, &ShapeTransform::IDENTITY.scaled(4.0));
        assert_eq!(overlay.chrome_scale, 0.25);
    }
}
