use bevy::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EMOJI_FONT_SIZE, DEFAULT_TEXT_FONT_SIZE};

use super::transform::{ShapeTransform, transformed_bounds};

/// The `type` discriminator written into persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickerKindTag {
    Emoji,
    Text,
}

impl StickerKindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StickerKindTag::Emoji => "Emoji",
            StickerKindTag::Text => "Text",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Emoji" => Some(StickerKindTag::Emoji),
            "Text" => Some(StickerKindTag::Text),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StickerKindTag::Emoji => "Emoji (E)",
            StickerKindTag::Text => "Text (T)",
        }
    }

    pub fn default_font_size(&self) -> f32 {
        match self {
            StickerKindTag::Emoji => DEFAULT_EMOJI_FONT_SIZE,
            StickerKindTag::Text => DEFAULT_TEXT_FONT_SIZE,
        }
    }
}

/// Variant-specific sticker data.
#[derive(Debug, Clone, PartialEq)]
pub enum StickerKind {
    Emoji,
    /// `explicit_width` pins the wrap width; `None` lets text grow up to the
    /// tool's max width.
    Text { explicit_width: Option<f32> },
}

impl StickerKind {
    pub fn tag(&self) -> StickerKindTag {
        match self {
            StickerKind::Emoji => StickerKindTag::Emoji,
            StickerKind::Text { .. } => StickerKindTag::Text,
        }
    }

    pub fn default_font_size(&self) -> f32 {
        self.tag().default_font_size()
    }
}

/// Settings the user controls from outside the tool (currently font size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserSettings {
    pub font_size: f32,
}

/// An emoji or text sticker.
///
/// `bounding_rect` lives in the sticker's own untransformed frame and is
/// centered on the origin; `transform` maps that frame onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerShape {
    pub id: String,
    pub kind: StickerKind,
    pub transform: ShapeTransform,
    pub text: String,
    pub font_size: f32,
    pub bounding_rect: Rect,
}

impl StickerShape {
    pub fn new(kind: StickerKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            font_size: kind.default_font_size(),
            kind,
            transform: ShapeTransform::IDENTITY,
            text: String::new(),
            bounding_rect: Rect::default(),
        }
    }

    pub fn emoji() -> Self {
        Self::new(StickerKind::Emoji)
    }

    pub fn text() -> Self {
        Self::new(StickerKind::Text {
            explicit_width: None,
        })
    }

    pub fn tag(&self) -> StickerKindTag {
        self.kind.tag()
    }

    pub fn explicit_width(&self) -> Option<f32> {
        match self.kind {
            StickerKind::Text { explicit_width } => explicit_width,
            StickerKind::Emoji => None,
        }
    }

    /// No-op for emoji stickers, which have no width of their own.
    pub fn set_explicit_width(&mut self, width: Option<f32>) {
        if let StickerKind::Text { explicit_width } = &mut self.kind {
            *explicit_width = width;
        }
    }

    /// Bounds of the sticker on the canvas (axis aligned, so rotated
    /// stickers report the box around their corners)
    pub fn canvas_bounds(&self) -> Rect {
        transformed_bounds(self.bounding_rect, &self.transform.affine())
    }

    pub fn hit_test(&self, point: Vec2) -> bool {
        self.canvas_bounds().contains(point)
    }

    pub fn apply_settings(&mut self, settings: &UserSettings) {
        self.font_size = settings.font_size;
    }
}
