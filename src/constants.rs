//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

/// Narrowest a sticker's bounding box may get, so tiny or empty text stays
/// grabbable.
pub const MIN_STICKER_WIDTH: f32 = 44.0;

/// Starting max width for text fitting before the drawing size is known
pub const DEFAULT_MAX_WIDTH: f32 = 320.0;

/// Default font size for new emoji stickers
pub const DEFAULT_EMOJI_FONT_SIZE: f32 = 70.0;

/// Default font size for new text stickers
pub const DEFAULT_TEXT_FONT_SIZE: f32 = 24.0;

/// Padding between the text surface edge and its glyphs
pub const TEXT_CONTAINER_INSET: f32 = 5.0;

/// Side length of an overlay control (delete, resize/rotate, change width)
pub const CONTROL_SIZE: f32 = 26.0;

/// Pointer travel (in canvas units) before a press turns into a drag
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Maximum number of operations kept for undo
pub const MAX_HISTORY_SIZE: usize = 100;
