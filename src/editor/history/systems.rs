//! Bevy systems for handling undo/redo keyboard shortcuts.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::super::state::EditorState;

fn modifiers(keyboard: &ButtonInput<KeyCode>) -> (bool, bool) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
    (ctrl, shift)
}

fn text_box_focused(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.wants_keyboard_input())
}

/// System to handle undo keyboard shortcut (Ctrl+Z)
pub fn handle_undo(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor: EditorState,
    mut contexts: EguiContexts,
) {
    let (ctrl, shift) = modifiers(&keyboard);

    // Ctrl+Z (without shift) = undo; the text box keeps its own undo
    if ctrl
        && !shift
        && keyboard.just_pressed(KeyCode::KeyZ)
        && !text_box_focused(&mut contexts)
        && editor.undo()
    {
        debug!("Undo");
    }
}

/// System to handle redo keyboard shortcut (Ctrl+Y or Ctrl+Shift+Z)
pub fn handle_redo(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor: EditorState,
    mut contexts: EguiContexts,
) {
    let (ctrl, shift) = modifiers(&keyboard);

    // Ctrl+Y or Ctrl+Shift+Z = redo
    let redo_pressed = (ctrl && keyboard.just_pressed(KeyCode::KeyY))
        || (ctrl && shift && keyboard.just_pressed(KeyCode::KeyZ));

    if redo_pressed && !text_box_focused(&mut contexts) && editor.redo() {
        debug!("Redo");
    }
}
