//! Sticker shapes and the document that owns them.
//!
//! ## Module Structure
//!
//! - [`transform`] - `ShapeTransform`, the translate/rotate/scale placement
//! - [`sticker`] - `StickerShape` with its emoji and text variants
//! - [`codec`] - Keyed records for persistence with type-checked decoding
//! - [`drawing`] - `Drawing`, the ordered set of stickers on a canvas

mod codec;
mod drawing;
mod sticker;
mod transform;

pub use codec::{DecodeError, SavedRect, SavedSticker};
pub use drawing::{Drawing, SavedDrawing};
pub use sticker::{StickerKind, StickerKindTag, StickerShape, UserSettings};
pub use transform::{ShapeTransform, transformed_bounds};
