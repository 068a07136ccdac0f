//! Keeps the overlay in step with the selected sticker and fits sticker
//! bounds to their text.

use bevy::math::{Rect, Vec2};

use crate::constants::{DEFAULT_MAX_WIDTH, MIN_STICKER_WIDTH};
use crate::editor::overlay::{ApproxTextSurface, EditingOverlay, OverlayDelegate, TextSurface};
use crate::shapes::{StickerKindTag, StickerShape};

/// The overlay plus everything needed to lay it out.
///
/// Drag handlers get a `&mut ShapeEditor` instead of a handle to the whole
/// tool: refreshing the overlay is the only thing they ask of it.
pub struct ShapeEditor {
    overlay: EditingOverlay,
    delegate: Option<Box<dyn OverlayDelegate>>,
    /// Right edge of the usable canvas; also the default wrap width
    pub max_width: f32,
}

impl ShapeEditor {
    pub fn new(
        kind: StickerKindTag,
        text_surface: Box<dyn TextSurface>,
        mut delegate: Option<Box<dyn OverlayDelegate>>,
    ) -> Self {
        let mut overlay = EditingOverlay::new(text_surface);
        match delegate.as_mut() {
            Some(delegate) => delegate.will_use_overlay(&mut overlay),
            None => overlay.add_standard_controls(kind),
        }

        Self {
            overlay,
            delegate,
            max_width: DEFAULT_MAX_WIDTH,
        }
    }

    pub fn with_defaults(kind: StickerKindTag) -> Self {
        Self::new(kind, Box::new(ApproxTextSurface::default()), None)
    }

    pub fn overlay(&self) -> &EditingOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut EditingOverlay {
        &mut self.overlay
    }

    /// Push the sticker's text, font and placement into the overlay.
    pub fn update_overlay(&mut self, shape: &StickerShape) {
        let surface = self.overlay.text_surface_mut();
        // Replacing text mid-composition breaks input methods
        if !surface.has_marked_text() {
            surface.set_text(&shape.text);
        }
        surface.set_font_size(shape.font_size);

        self.overlay
            .set_layout(shape.bounding_rect, shape.transform.affine());

        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_update_overlay_transform(&mut self.overlay, &shape.transform);
        }
    }

    /// Recompute the sticker's bounds from its text, then re-sync the
    /// overlay.
    pub fn update_shape_frame(&mut self, shape: &mut StickerShape) {
        shape.bounding_rect = self.compute_bounds(shape);
        self.update_overlay(shape);
    }

    /// Fit a local bounding rect to the sticker's text.
    ///
    /// Measures at the wrap width, keeps at least `MIN_STICKER_WIDTH`, then
    /// clamps the box against the canvas edges using the translation alone
    /// (scale and rotation are ignored) and measures again at the clamped
    /// width. The result is centered on the origin. This is an
    /// approximation: a re-centered box can still poke past the left edge.
    pub fn compute_bounds(&mut self, shape: &StickerShape) -> Rect {
        self.update_overlay(shape);

        let explicit_width = shape.explicit_width();
        let mut size = self
            .overlay
            .fit_size(explicit_width.unwrap_or(self.max_width));
        if let Some(width) = explicit_width {
            size.x = width;
        }
        size.x = size.x.max(MIN_STICKER_WIDTH);

        let rect = centered_rect(size);
        let clamped = clamp_to_canvas(rect, shape.transform.translation, self.max_width);

        let mut final_size = self.overlay.fit_size(clamped.width());
        if explicit_width.is_some() {
            final_size.x = clamped.width();
        }
        final_size.x = final_size.x.max(MIN_STICKER_WIDTH);
        centered_rect(final_size)
    }
}

fn centered_rect(size: Vec2) -> Rect {
    Rect {
        min: -size / 2.0,
        max: size / 2.0,
    }
}

/// Pin the rect's left edge to the canvas and trim any right overrun past
/// `max_width`, with the rect placed by `translation` only.
pub(crate) fn clamp_to_canvas(rect: Rect, translation: Vec2, max_width: f32) -> Rect {
    let mut origin = rect.min;
    let mut size = rect.size();

    let mapped_left = origin.x + translation.x;
    if mapped_left < 0.0 {
        size.x += mapped_left;
        origin.x -= mapped_left;
    }

    let overrun = origin.x + translation.x + size.x - max_width;
    if overrun > 0.0 {
        size.x -= overrun;
    }

    Rect {
        min: origin,
        max: origin + size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeTransform;

    fn editor() -> ShapeEditor {
        let mut editor = ShapeEditor::new(
            StickerKindTag::Emoji,
            Box::new(ApproxTextSurface::new(20.0)),
            None,
        );
        editor.max_width = 400.0;
        editor
    }

    fn shape_at(text: &str, x: f32) -> StickerShape {
        let mut shape = StickerShape::emoji();
        shape.font_size = 20.0;
        shape.text = text.to_string();
        shape.transform = ShapeTransform::from_translation(Vec2::new(x, 100.0));
        shape
    }

    #[test]
    fn test_empty_text_gets_minimum_width() {
        let mut editor = editor();
        let rect = editor.compute_bounds(&shape_at("", 200.0));
        assert_eq!(rect.width(), MIN_STICKER_WIDTH);
        assert_eq!(rect.center(), Vec2::ZERO);
    }

    #[test]
    fn test_bounds_centered_on_origin() {
        let mut editor = editor();
        let rect = editor.compute_bounds(&shape_at("hello", 200.0));
        // 5 glyphs at 10 each plus a 5 inset either side
        assert_eq!(rect, Rect::new(-30.0, -17.0, 30.0, 17.0));
    }

    #[test]
    fn test_never_narrower_than_minimum() {
        let mut editor = editor();
        for x in [-50.0, 0.0, 3.0, 200.0, 399.0, 600.0] {
            for text in ["", "a", "hello world", "🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉🎉"] {
                let rect = editor.compute_bounds(&shape_at(text, x));
                assert!(rect.width() >= MIN_STICKER_WIDTH, "{text:?} at {x}");
            }
        }
    }

    #[test]
    fn test_clamp_pins_left_edge() {
        let rect = Rect::new(-50.0, -10.0, 50.0, 10.0);
        for max_width in [60.0, 320.0, 1000.0] {
            for x in [0.0, 10.0, 49.0, 50.0, 200.0] {
                let clamped = clamp_to_canvas(rect, Vec2::new(x, 0.0), max_width);
                assert!(clamped.min.x + x >= 0.0, "x={x} max_width={max_width}");
            }
        }
    }

    #[test]
    fn test_clamp_trims_right_overrun() {
        let rect = Rect::new(-50.0, -10.0, 50.0, 10.0);
        let clamped = clamp_to_canvas(rect, Vec2::new(300.0, 0.0), 320.0);
        assert_eq!(clamped.min.x + 300.0, 250.0);
        assert_eq!(clamped.max.x + 300.0, 320.0);
    }

    #[test]
    fn test_near_left_edge_wraps_narrower() {
        let mut editor = editor();
        let text = "hello world again";
        let free = editor.compute_bounds(&shape_at(text, 200.0));
        let squeezed = editor.compute_bounds(&shape_at(text, 40.0));
        assert!(squeezed.width() < free.width());
        assert!(squeezed.height() > free.height());
    }

    #[test]
    fn test_explicit_width_sets_box_width() {
        let mut editor = ShapeEditor::new(
            StickerKindTag::Text,
            Box::new(ApproxTextSurface::new(20.0)),
            None,
        );
        editor.max_width = 400.0;
        let mut shape = StickerShape::text();
        shape.font_size = 20.0;
        shape.text = "hello world".to_string();
        shape.transform = ShapeTransform::from_translation(Vec2::new(200.0, 100.0));
        shape.set_explicit_width(Some(80.0));

        let rect = editor.compute_bounds(&shape);
        assert_eq!(rect.width(), 80.0);
        assert_eq!(rect.height(), 2.0 * 24.0 + 10.0);
    }

    #[test]
    fn test_update_overlay_follows_shape() {
        let mut editor = editor();
        let mut shape = shape_at("hi", 120.0);
        editor.update_shape_frame(&mut shape);

        assert_eq!(editor.overlay().bounds(), shape.bounding_rect);
        assert_eq!(editor.overlay().text_surface().text(), "hi");
        assert_eq!(
            editor.overlay().transform().translation,
            Vec2::new(120.0, 100.0)
        );
    }
}
