//! Saving and opening drawings.

use bevy::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{StickerConfig, UpdateLastDrawingPathRequest};
use crate::shapes::{DecodeError, Drawing};

use super::state::{EditorState, EditorStatus};

#[derive(Debug, Error)]
pub enum DrawingFileError {
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode drawing: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not decode drawing: {0}")]
    Decode(#[from] DecodeError),
}

/// Message to save the drawing. `None` reuses the current file.
#[derive(Message)]
pub struct SaveDrawingRequest {
    pub path: Option<PathBuf>,
}

/// Message to replace the drawing with one read from disk
#[derive(Message)]
pub struct OpenDrawingRequest {
    pub path: PathBuf,
}

pub fn save_drawing(path: &Path, drawing: &Drawing) -> Result<(), DrawingFileError> {
    let json = drawing.to_json()?;
    std::fs::write(path, json).map_err(|source| DrawingFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_drawing(path: &Path) -> Result<Drawing, DrawingFileError> {
    let json = std::fs::read_to_string(path).map_err(|source| DrawingFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Drawing::from_json(&json)?)
}

/// System to save the drawing when requested
pub fn handle_save_drawing(
    mut events: MessageReader<SaveDrawingRequest>,
    mut editor: EditorState,
    config: Res<StickerConfig>,
    mut status: ResMut<EditorStatus>,
    mut last_path_events: MessageWriter<UpdateLastDrawingPathRequest>,
) {
    for event in events.read() {
        // Text typed since the last commit belongs in the file
        editor.with_tool(|tool, ctx| tool.apply_edit_text_if_changed(ctx));

        let path = event
            .path
            .clone()
            .or_else(|| editor.document.path.clone())
            .or_else(|| config.data.last_drawing_path.clone())
            .unwrap_or_else(crate::paths::default_drawing_file);

        match save_drawing(&path, &editor.document.drawing) {
            Ok(()) => {
                info!(
                    "Saved {} stickers to {:?}",
                    editor.document.drawing.len(),
                    path
                );
                status.info(format!("Saved {}", path.display()));
                editor.document.path = Some(path.clone());
                last_path_events.write(UpdateLastDrawingPathRequest { path });
            }
            Err(e) => {
                error!("Failed to save drawing: {}", e);
                status.error(format!("Save failed: {}", e));
            }
        }
    }
}

/// System to open a drawing when requested
pub fn handle_open_drawing(
    mut events: MessageReader<OpenDrawingRequest>,
    mut editor: EditorState,
    mut status: ResMut<EditorStatus>,
    mut last_path_events: MessageWriter<UpdateLastDrawingPathRequest>,
) {
    for event in events.read() {
        match load_drawing(&event.path) {
            Ok(mut drawing) => {
                // The canvas is the window, whatever size it was saved at
                drawing.size = editor.document.drawing.size;
                info!("Opened {} stickers from {:?}", drawing.len(), event.path);
                status.info(format!("Opened {}", event.path.display()));
                editor.replace_drawing(drawing, Some(event.path.clone()));
                last_path_events.write(UpdateLastDrawingPathRequest {
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                warn!("Failed to open drawing: {}", e);
                status.error(format!("Open failed: {}", e));
            }
        }
    }
}
