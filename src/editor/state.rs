//! Editor resources shared by the input, panel and paint systems.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use std::path::PathBuf;

use crate::config::StickerConfigData;
use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, TEXT_CONTAINER_INSET};
use crate::shapes::{Drawing, StickerKindTag, StickerShape, UserSettings};

use super::history::CommandHistory;
use super::overlay::{ApproxTextSurface, LegibleChrome, OverlayDelegate};
use super::tool::{RenderSurface, StickerTool, ToolContext};

/// The drawing being edited and where it lives on disk
#[derive(Resource)]
pub struct StickerDocument {
    pub drawing: Drawing,
    /// File the drawing was last saved to or opened from
    pub path: Option<PathBuf>,
}

impl Default for StickerDocument {
    fn default() -> Self {
        Self {
            drawing: Drawing::new(Vec2::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)),
            path: None,
        }
    }
}

/// Paint data for one committed sticker, in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct StickerPaint {
    pub text: String,
    /// Font size after the sticker's scale
    pub font_size: f32,
    /// Canvas position of the text's top-left corner (the rotation origin)
    pub origin: Vec2,
    pub rotation: f32,
    /// Wrap width after the sticker's scale
    pub wrap_width: f32,
}

impl StickerPaint {
    pub fn from_shape(shape: &StickerShape) -> Self {
        let scale = shape.transform.scale;
        let inset = Vec2::splat(TEXT_CONTAINER_INSET);
        Self {
            text: shape.text.clone(),
            font_size: shape.font_size * scale.abs(),
            origin: shape.transform.apply(shape.bounding_rect.min + inset),
            rotation: shape.transform.rotation,
            wrap_width: ((shape.bounding_rect.width() - 2.0 * TEXT_CONTAINER_INSET) * scale.abs())
                .max(1.0),
        }
    }
}

/// Cached paint list for the committed stickers.
///
/// The selected sticker is left out and painted live on top, so the cache
/// only needs rebuilding when something outside a drag changes.
#[derive(Resource, Default)]
pub struct CanvasRender {
    dirty: bool,
    painted: Vec<StickerPaint>,
}

impl RenderSurface for CanvasRender {
    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn rerender_all(&mut self) {
        debug!("Full canvas redraw requested");
        self.dirty = true;
    }
}

impl CanvasRender {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn painted(&self) -> &[StickerPaint] {
        &self.painted
    }

    /// Rebuild the cache from `drawing`, skipping `selected`
    pub fn rebuild(&mut self, drawing: &Drawing, selected: Option<&str>) {
        self.painted = drawing
            .shapes()
            .iter()
            .filter(|shape| Some(shape.id.as_str()) != selected)
            .map(StickerPaint::from_shape)
            .collect();
        self.dirty = false;
    }
}

/// The emoji and text tools, one of them active
#[derive(Resource)]
pub struct StickerTools {
    pub emoji: StickerTool,
    pub text: StickerTool,
    pub active: StickerKindTag,
}

impl Default for StickerTools {
    fn default() -> Self {
        Self::from_config(&StickerConfigData::default())
    }
}

impl StickerTools {
    pub fn from_config(config: &StickerConfigData) -> Self {
        let make = |kind: StickerKindTag, font_size: f32| {
            let delegate: Option<Box<dyn OverlayDelegate>> = if config.legible_chrome {
                Some(Box::new(LegibleChrome { kind }))
            } else {
                None
            };
            StickerTool::new(kind, Box::new(ApproxTextSurface::new(font_size)), delegate)
                .with_max_width(config.initial_max_width)
                .with_settings(UserSettings { font_size })
        };

        Self {
            emoji: make(StickerKindTag::Emoji, config.emoji_font_size),
            text: make(StickerKindTag::Text, config.text_font_size),
            active: StickerKindTag::Emoji,
        }
    }

    pub fn active(&self) -> &StickerTool {
        match self.active {
            StickerKindTag::Emoji => &self.emoji,
            StickerKindTag::Text => &self.text,
        }
    }

    pub fn active_mut(&mut self) -> &mut StickerTool {
        match self.active {
            StickerKindTag::Emoji => &mut self.emoji,
            StickerKindTag::Text => &mut self.text,
        }
    }
}

/// Transient message shown at the bottom of the side panel
#[derive(Resource, Default)]
pub struct EditorStatus {
    pub message: Option<String>,
    pub is_error: bool,
}

impl EditorStatus {
    pub fn info(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.is_error = false;
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.is_error = true;
    }
}

/// Everything a tool call needs, bundled for systems
#[derive(SystemParam)]
pub struct EditorState<'w> {
    pub document: ResMut<'w, StickerDocument>,
    pub tools: ResMut<'w, StickerTools>,
    pub history: ResMut<'w, CommandHistory>,
    pub render: ResMut<'w, CanvasRender>,
}

impl EditorState<'_> {
    /// Run `f` against the active tool with a context over the document
    pub fn with_tool<R>(
        &mut self,
        f: impl FnOnce(&mut StickerTool, &mut ToolContext<'_>) -> R,
    ) -> R {
        let mut ctx = ToolContext::new(
            &mut self.document.drawing,
            &mut *self.history,
            &mut *self.render,
        );
        f(self.tools.active_mut(), &mut ctx)
    }

    /// Switch tools, ending any edit in progress
    pub fn set_active_tool(&mut self, kind: StickerKindTag) {
        if self.tools.active == kind {
            return;
        }
        self.with_tool(|tool, ctx| tool.deactivate(ctx));
        self.tools.active = kind;
        self.with_tool(|tool, ctx| tool.activate(ctx, None));
        info!("Switched to {} tool", kind.as_str());
    }

    /// Undo the last operation, recording any pending text edit first so it
    /// is the one undone.
    pub fn undo(&mut self) -> bool {
        self.with_tool(|tool, ctx| tool.apply_edit_text_if_changed(ctx));
        let undone = self.history.undo(&mut self.document.drawing);
        self.after_history_change();
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.with_tool(|tool, ctx| tool.apply_edit_text_if_changed(ctx));
        let redone = self.history.redo(&mut self.document.drawing);
        self.after_history_change();
        redone
    }

    fn after_history_change(&mut self) {
        self.with_tool(|tool, ctx| tool.sync_with_drawing(ctx));
        self.render.mark_dirty();
    }

    /// Swap in a freshly loaded drawing. History from the old one is dropped.
    pub fn replace_drawing(&mut self, drawing: Drawing, path: Option<PathBuf>) {
        self.with_tool(|tool, ctx| tool.deactivate(ctx));
        self.document.drawing = drawing;
        self.document.path = path;
        self.history.clear();
        self.render.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeTransform;
    use bevy::math::Rect;

    #[test]
    fn test_paint_follows_transform() {
        let mut shape = StickerShape::emoji();
        shape.text = "🎉".to_string();
        shape.font_size = 20.0;
        shape.bounding_rect = Rect::new(-20.0, -15.0, 20.0, 15.0);
        shape.transform = ShapeTransform::from_translation(Vec2::new(100.0, 50.0)).scaled(2.0);

        let paint = StickerPaint::from_shape(&shape);
        assert_eq!(paint.font_size, 40.0);
        assert_eq!(paint.origin, Vec2::new(70.0, 30.0));
        assert_eq!(paint.wrap_width, 60.0);
    }

    #[test]
    fn test_rebuild_skips_selected() {
        let mut drawing = Drawing::new(Vec2::new(400.0, 300.0));
        let a = StickerShape::emoji();
        let b = StickerShape::text();
        let b_id = b.id.clone();
        drawing.insert(a);
        drawing.insert(b);

        let mut render = CanvasRender::default();
        render.mark_dirty();
        render.rebuild(&drawing, Some(&b_id));

        assert!(!render.is_dirty());
        assert_eq!(render.painted().len(), 1);
    }

    #[test]
    fn test_tools_from_config() {
        let config = StickerConfigData {
            initial_max_width: 500.0,
            ..Default::default()
        };
        let mut tools = StickerTools::from_config(&config);
        assert_eq!(tools.active().kind(), StickerKindTag::Emoji);
        assert_eq!(tools.emoji.max_width(), 500.0);
        tools.active = StickerKindTag::Text;
        assert_eq!(tools.active_mut().kind(), StickerKindTag::Text);
    }
}
