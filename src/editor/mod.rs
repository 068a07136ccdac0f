pub mod drag;
pub mod history;
mod input;
pub mod overlay;
mod panel;
mod persistence;
mod render;
mod state;
pub mod tool;

pub use persistence::{
    DrawingFileError, OpenDrawingRequest, SaveDrawingRequest, load_drawing, save_drawing,
};
pub use state::{CanvasRender, EditorStatus, StickerDocument, StickerPaint, StickerTools};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

#[derive(Component)]
pub struct EditorCamera;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, EditorCamera));
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        // `StickerTools` is normally inserted from the loaded config in main
        app.init_resource::<StickerDocument>()
            .init_resource::<StickerTools>()
            .init_resource::<history::CommandHistory>()
            .init_resource::<CanvasRender>()
            .init_resource::<EditorStatus>()
            .init_resource::<input::GestureState>()
            .init_resource::<panel::PanelState>()
            .init_resource::<render::ControlIcons>()
            .add_message::<SaveDrawingRequest>()
            .add_message::<OpenDrawingRequest>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (
                    input::sync_canvas_size,
                    input::handle_pointer,
                    input::handle_editor_shortcuts,
                    history::handle_undo,
                    history::handle_redo,
                    persistence::handle_save_drawing.run_if(on_message::<SaveDrawingRequest>),
                    persistence::handle_open_drawing.run_if(on_message::<OpenDrawingRequest>),
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    render::load_control_icons,
                    panel::sticker_panel_ui,
                    render::paint_canvas,
                    panel::config_reset_notification_ui,
                )
                    .chain(),
            );
    }
}
