//! Persisted sticker records.
//!
//! Records are keyed JSON objects with a `type` discriminator. Decoding for a
//! specific kind refuses records of any other kind. A missing
//! `boundingRect` (written by old builds) decodes to a zero rect with a
//! warning; such stickers render wrong until their text is edited again.

use bevy::log::warn;
use bevy::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::sticker::{StickerKind, StickerKindTag, StickerShape};
use super::transform::ShapeTransform;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Wrong shape type: expected {expected}, found {found}")]
    WrongShapeType {
        expected: &'static str,
        found: String,
    },
    #[error("Unknown shape type: {0}")]
    UnknownShapeType(String),
    #[error("Malformed shape record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Origin + size, the persisted form of a local bounding rect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl From<Rect> for SavedRect {
    fn from(rect: Rect) -> Self {
        Self {
            origin: rect.min,
            size: rect.size(),
        }
    }
}

impl From<SavedRect> for Rect {
    fn from(saved: SavedRect) -> Self {
        Rect::from_corners(saved.origin, saved.origin + saved.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSticker {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub id: String,
    pub text: String,
    pub font_size: f32,
    pub transform: ShapeTransform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_rect: Option<SavedRect>,
    /// Explicit wrap width, text stickers only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

impl StickerShape {
    pub fn encode(&self) -> SavedSticker {
        SavedSticker {
            shape_type: self.tag().as_str().to_string(),
            id: self.id.clone(),
            text: self.text.clone(),
            font_size: self.font_size,
            transform: self.transform,
            bounding_rect: Some(self.bounding_rect.into()),
            width: self.explicit_width(),
        }
    }

    /// Decode a record that must be of kind `expected`.
    pub fn decode(record: SavedSticker, expected: StickerKindTag) -> Result<Self, DecodeError> {
        if record.shape_type != expected.as_str() {
            return Err(DecodeError::WrongShapeType {
                expected: expected.as_str(),
                found: record.shape_type,
            });
        }

        let bounding_rect: Rect = record.bounding_rect.map(Rect::from).unwrap_or_default();
        if bounding_rect == Rect::default() {
            warn!(
                "Sticker {} has no bounding rect; it will not render correctly until its text is edited",
                record.id
            );
        }

        let kind = match expected {
            StickerKindTag::Emoji => StickerKind::Emoji,
            StickerKindTag::Text => StickerKind::Text {
                explicit_width: record.width,
            },
        };

        Ok(Self {
            id: record.id,
            kind,
            transform: record.transform,
            text: record.text,
            font_size: record.font_size,
            bounding_rect,
        })
    }

    /// Decode a record of whatever kind its discriminator names.
    pub fn decode_any(record: SavedSticker) -> Result<Self, DecodeError> {
        let Some(tag) = StickerKindTag::parse(&record.shape_type) else {
            return Err(DecodeError::UnknownShapeType(record.shape_type));
        };
        Self::decode(record, tag)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.encode())
    }

    pub fn from_json(json: &str, expected: StickerKindTag) -> Result<Self, DecodeError> {
        let record: SavedSticker = serde_json::from_str(json)?;
        Self::decode(record, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_emoji() -> StickerShape {
        let mut shape = StickerShape::emoji();
        shape.text = "🎉".to_string();
        shape.font_size = 64.0;
        shape.transform = ShapeTransform {
            translation: Vec2::new(120.0, 80.0),
            rotation: 0.5,
            scale: 1.5,
        };
        shape.bounding_rect = Rect::new(-30.0, -20.0, 30.0, 20.0);
        shape
    }

    #[test]
    fn test_emoji_round_trip() {
        let shape = sample_emoji();
        let json = shape.to_json().unwrap();
        let decoded = StickerShape::from_json(&json, StickerKindTag::Emoji).unwrap();

        assert_eq!(decoded.id, shape.id);
        assert_eq!(decoded.text, shape.text);
        assert_eq!(decoded.font_size, shape.font_size);
        assert_eq!(decoded.transform, shape.transform);
        assert_eq!(decoded.bounding_rect, shape.bounding_rect);
    }

    #[test]
    fn test_record_keys() {
        let mut shape = StickerShape::text();
        shape.set_explicit_width(Some(150.0));
        let value = serde_json::to_value(shape.encode()).unwrap();

        assert_eq!(value["type"], "Text");
        assert!(value.get("fontSize").is_some());
        assert!(value.get("boundingRect").is_some());
        assert_eq!(value["width"], 150.0);
        assert!(value["transform"].get("translation").is_some());
    }

    #[test]
    fn test_emoji_record_has_no_width() {
        let value = serde_json::to_value(sample_emoji().encode()).unwrap();
        assert!(value.get("width").is_none());
    }

    #[test]
    fn test_text_record_rejected_by_emoji_decoder() {
        let json = StickerShape::text().to_json().unwrap();
        let result = StickerShape::from_json(&json, StickerKindTag::Emoji);
        assert!(matches!(
            result,
            Err(DecodeError::WrongShapeType { expected: "Emoji", ref found }) if found == "Text"
        ));
    }

    #[test]
    fn test_missing_bounding_rect_defaults_to_zero() {
        let json = r#"{
            "type": "Emoji",
            "id": "legacy-1",
            "text": "🙂",
            "fontSize": 70.0,
            "transform": { "translation": [10.0, 20.0], "rotation": 0.0, "scale": 1.0 }
        }"#;

        let shape = StickerShape::from_json(json, StickerKindTag::Emoji).unwrap();
        assert_eq!(shape.bounding_rect, Rect::default());
        assert_eq!(shape.transform.translation, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let json = r#"{ "id": "x", "text": "", "fontSize": 70.0,
            "transform": { "translation": [0.0, 0.0], "rotation": 0.0, "scale": 1.0 } }"#;
        let result = StickerShape::from_json(json, StickerKindTag::Emoji);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_any_dispatches_on_tag() {
        let mut text = StickerShape::text();
        text.set_explicit_width(Some(200.0));
        let decoded = StickerShape::decode_any(text.encode()).unwrap();
        assert_eq!(decoded.explicit_width(), Some(200.0));

        let mut record = sample_emoji().encode();
        record.shape_type = "Arrow".to_string();
        assert!(matches!(
            StickerShape::decode_any(record),
            Err(DecodeError::UnknownShapeType(_))
        ));
    }

    #[test]
    fn test_saved_rect_conversion() {
        let rect = Rect::new(-5.0, -2.0, 5.0, 2.0);
        let saved = SavedRect::from(rect);
        assert_eq!(saved.origin, Vec2::new(-5.0, -2.0));
        assert_eq!(saved.size, Vec2::new(10.0, 4.0));
        assert_eq!(Rect::from(saved), rect);
    }
}
