//! Mouse and keyboard input for the canvas.
//!
//! Raw button state becomes taps and drags here: a press that travels less
//! than `DRAG_THRESHOLD` before release is a tap, anything further is a drag
//! that starts where the button went down. Escape cancels a drag.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::DRAG_THRESHOLD;
use crate::shapes::StickerKindTag;

use super::persistence::SaveDrawingRequest;
use super::state::{EditorState, StickerDocument};

/// In-flight pointer gesture
#[derive(Resource, Default)]
pub struct GestureState {
    /// Where the button went down; `None` when no gesture is live
    pub press: Option<Vec2>,
    pub last: Vec2,
    pub dragging: bool,
}

/// What a pointer sample means for the gesture in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap(Vec2),
    DragStart(Vec2),
    DragContinue(Vec2),
    DragEnd(Vec2),
    DragCancel(Vec2),
}

impl GestureState {
    pub fn press(&mut self, point: Vec2) {
        self.press = Some(point);
        self.last = point;
        self.dragging = false;
    }

    /// Pointer moved with the button held
    pub fn moved(&mut self, point: Vec2) -> Vec<GestureEvent> {
        let Some(start) = self.press else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if !self.dragging {
            if point.distance(start) <= DRAG_THRESHOLD {
                return events;
            }
            self.dragging = true;
            events.push(GestureEvent::DragStart(start));
        } else if point == self.last {
            return events;
        }
        events.push(GestureEvent::DragContinue(point));
        self.last = point;
        events
    }

    pub fn release(&mut self, point: Vec2) -> Option<GestureEvent> {
        let start = self.press.take()?;
        let event = if self.dragging {
            GestureEvent::DragEnd(point)
        } else {
            GestureEvent::Tap(start)
        };
        self.dragging = false;
        Some(event)
    }

    pub fn cancel(&mut self) -> Option<GestureEvent> {
        self.press.take()?;
        let was_dragging = std::mem::take(&mut self.dragging);
        was_dragging.then_some(GestureEvent::DragCancel(self.last))
    }
}

/// Feed pointer input to the active tool
pub fn handle_pointer(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    mut gesture: ResMut<GestureState>,
    mut editor: EditorState,
    mut contexts: EguiContexts,
) {
    let mut events = Vec::new();
    let last = gesture.last;

    if keyboard.just_pressed(KeyCode::Escape) {
        events.extend(gesture.cancel());
    }

    let cursor = window_query
        .single()
        .ok()
        .and_then(|window| window.cursor_position());

    if let Some(cursor) = cursor {
        if mouse_button.just_pressed(MouseButton::Left) {
            // Clicks on the side panel belong to egui
            let over_ui = contexts
                .ctx_mut()
                .is_ok_and(|ctx| ctx.is_pointer_over_area());
            if !over_ui {
                gesture.press(cursor);
            }
        } else if mouse_button.pressed(MouseButton::Left) {
            events.extend(gesture.moved(cursor));
        }
    }

    if mouse_button.just_released(MouseButton::Left) {
        let point = cursor.unwrap_or(gesture.last);
        events.extend(gesture.release(point));
    }

    if events.is_empty() {
        return;
    }

    let velocity_scale = 1.0 / time.delta_secs().max(f32::EPSILON);
    editor.with_tool(|tool, ctx| {
        let mut previous = last;
        for event in events {
            match event {
                GestureEvent::Tap(point) => tool.handle_tap(ctx, point),
                GestureEvent::DragStart(point) => {
                    previous = point;
                    tool.handle_drag_start(ctx, point);
                }
                GestureEvent::DragContinue(point) => {
                    let velocity = (point - previous) * velocity_scale;
                    previous = point;
                    tool.handle_drag_continue(ctx, point, velocity);
                }
                GestureEvent::DragEnd(point) => tool.handle_drag_end(ctx, point),
                GestureEvent::DragCancel(point) => tool.handle_drag_cancel(ctx, point),
            }
        }
    });
}

/// Tool switching, deletion and save shortcuts
pub fn handle_editor_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor: EditorState,
    mut save_events: MessageWriter<SaveDrawingRequest>,
    mut contexts: EguiContexts,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    // Ctrl+S saves even while the text box has focus
    if ctrl && keyboard.just_pressed(KeyCode::KeyS) {
        save_events.write(SaveDrawingRequest { path: None });
        return;
    }

    // Don't steal keys from the sticker text box
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if ctrl {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyE) {
        editor.set_active_tool(StickerKindTag::Emoji);
    } else if keyboard.just_pressed(KeyCode::KeyT) {
        editor.set_active_tool(StickerKindTag::Text);
    } else if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace)
    {
        editor.with_tool(|tool, ctx| tool.remove_selected(ctx));
    }
}

/// Keep the drawing's size in step with the window
pub fn sync_canvas_size(
    window_query: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut document: ResMut<StickerDocument>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if document.drawing.size != size {
        document.drawing.size = size;
    }
}
