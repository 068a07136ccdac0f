use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::codec::{DecodeError, SavedSticker};
use super::sticker::{StickerKindTag, StickerShape};

/// The document: stickers in paint order (last is on top) on a fixed-size
/// canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub size: Vec2,
    shapes: Vec<StickerShape>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDrawing {
    pub size: Vec2,
    #[serde(default)]
    pub shapes: Vec<SavedSticker>,
}

impl Drawing {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[StickerShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, id: &str) -> Option<&StickerShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: &str) -> Option<&mut StickerShape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shape(id).is_some()
    }

    /// Adds the shape on top. A shape with the same id is replaced in place.
    pub fn insert(&mut self, shape: StickerShape) {
        if let Some(existing) = self.shape_mut(&shape.id) {
            *existing = shape;
        } else {
            self.shapes.push(shape);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<StickerShape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        Some(self.shapes.remove(index))
    }

    /// Topmost sticker of `kind` under `point`
    pub fn shape_at(&self, point: Vec2, kind: StickerKindTag) -> Option<&StickerShape> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.tag() == kind && s.hit_test(point))
    }

    pub fn save(&self) -> SavedDrawing {
        SavedDrawing {
            size: self.size,
            shapes: self.shapes.iter().map(StickerShape::encode).collect(),
        }
    }

    pub fn load(saved: SavedDrawing) -> Result<Self, DecodeError> {
        let shapes = saved
            .shapes
            .into_iter()
            .map(StickerShape::decode_any)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            size: saved.size,
            shapes,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.save())
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let saved: SavedDrawing = serde_json::from_str(json)?;
        Self::load(saved)
    }
}
