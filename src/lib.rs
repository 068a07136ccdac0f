//! Emoji and text stickers that can be placed on a canvas, then moved,
//! resized, rotated, re-worded and deleted with undo.
//!
//! The editing model (`shapes`, `editor::tool`, `editor::drag`,
//! `editor::overlay`, `editor::history`) is plain Rust and host-agnostic;
//! `editor::EditorPlugin` hosts it in a Bevy window with an egui panel.

pub mod config;
pub mod constants;
pub mod editor;
pub mod paths;
pub mod shapes;
pub mod tint;
