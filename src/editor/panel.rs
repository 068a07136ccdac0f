//! Side panel: tool switching, sticker text, font size, history and files.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use std::path::PathBuf;

use crate::config::{ConfigResetNotification, StickerConfig};
use crate::shapes::{StickerKindTag, UserSettings};

use super::persistence::{OpenDrawingRequest, SaveDrawingRequest};
use super::state::{EditorState, EditorStatus};

const PANEL_WIDTH: f32 = 240.0;

/// Text buffers owned by the panel between frames
#[derive(Resource, Default)]
pub struct PanelState {
    /// Text for the next sticker to insert
    pub new_text: String,
    /// Mirror of the selected sticker's text while it is edited
    pub selected_text: String,
    selected_id: Option<String>,
    text_focused: bool,
}

/// Things the panel asks for, applied once the panel is drawn
enum PanelAction {
    SwitchTool(StickerKindTag),
    Insert(String),
    SetFontSize(f32),
    EditText(String),
    FinishEditing,
    Delete,
    Undo,
    Redo,
    Open(PathBuf),
    Save(Option<PathBuf>),
}

fn drawing_dialog() -> rfd::FileDialog {
    rfd::FileDialog::new().add_filter("Sticker drawing", &["json"])
}

/// Keep the text buffer in step with the selection unless the user is
/// typing in it.
fn sync_text_buffer(panel: &mut PanelState, editor: &EditorState) {
    let tool = editor.tools.active();
    let selected = tool.selected_shape_id();
    let shape_text = selected
        .and_then(|id| editor.document.drawing.shape(id))
        .map(|shape| shape.text.as_str());

    if panel.selected_id.as_deref() != selected {
        panel.selected_id = selected.map(str::to_string);
        panel.selected_text = shape_text.unwrap_or_default().to_string();
    } else if !panel.text_focused
        && let Some(text) = shape_text
        && panel.selected_text != text
    {
        panel.selected_text = text.to_string();
    }
}

pub fn sticker_panel_ui(
    mut contexts: EguiContexts,
    mut editor: EditorState,
    mut panel: ResMut<PanelState>,
    status: Res<EditorStatus>,
    mut save_events: MessageWriter<SaveDrawingRequest>,
    mut open_events: MessageWriter<OpenDrawingRequest>,
) -> Result {
    sync_text_buffer(&mut panel, &editor);

    let active_kind = editor.tools.active().kind();
    let has_selection = editor.tools.active().selected_shape_id().is_some();
    let mut font_size = editor
        .tools
        .active()
        .settings()
        .map(|settings| settings.font_size)
        .unwrap_or_else(|| active_kind.default_font_size());
    let can_undo = editor.history.can_undo();
    let can_redo = editor.history.can_redo();
    let file_name = editor
        .document
        .path
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned());

    let mut actions = Vec::new();

    let response = egui::SidePanel::left("sticker_panel")
        .resizable(false)
        .exact_width(PANEL_WIDTH)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(6.0);
            ui.heading("Stickers");
            ui.label(
                egui::RichText::new(file_name.as_deref().unwrap_or("Untitled"))
                    .small()
                    .weak(),
            );
            ui.separator();

            ui.horizontal(|ui| {
                for kind in [StickerKindTag::Emoji, StickerKindTag::Text] {
                    let button = egui::Button::new(egui::RichText::new(kind.display_name()).strong())
                        .min_size(egui::vec2(0.0, 26.0))
                        .selected(active_kind == kind);
                    if ui.add(button).clicked() {
                        actions.push(PanelAction::SwitchTool(kind));
                    }
                }
            });

            ui.add_space(8.0);
            ui.label(format!("New {} sticker", active_kind.as_str().to_lowercase()));
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut panel.new_text)
                        .desired_width(PANEL_WIDTH - 70.0),
                );
                let can_add = !panel.new_text.trim().is_empty();
                if ui.add_enabled(can_add, egui::Button::new("Add")).clicked() {
                    actions.push(PanelAction::Insert(panel.new_text.clone()));
                }
            });

            ui.add_space(8.0);
            let slider = ui.add(egui::Slider::new(&mut font_size, 8.0..=200.0).text("Font size"));
            if slider.changed() {
                actions.push(PanelAction::SetFontSize(font_size));
            }

            ui.separator();

            if has_selection {
                ui.label("Selected sticker");
                let edit = ui.add(
                    egui::TextEdit::multiline(&mut panel.selected_text)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );
                panel.text_focused = edit.has_focus();
                if edit.changed() {
                    actions.push(PanelAction::EditText(panel.selected_text.clone()));
                }

                ui.horizontal(|ui| {
                    if ui.button("Done").clicked() {
                        actions.push(PanelAction::FinishEditing);
                    }
                    if ui.button("Delete").clicked() {
                        actions.push(PanelAction::Delete);
                    }
                });
            } else {
                panel.text_focused = false;
                ui.label(egui::RichText::new("Click a sticker to edit it").weak());
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    actions.push(PanelAction::Undo);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    actions.push(PanelAction::Redo);
                }
            });

            ui.horizontal(|ui| {
                if ui.button("Open...").clicked()
                    && let Some(path) = drawing_dialog().set_title("Open Drawing").pick_file()
                {
                    actions.push(PanelAction::Open(path));
                }
                if ui.button("Save").clicked() {
                    actions.push(PanelAction::Save(None));
                }
                if ui.button("Save As...").clicked()
                    && let Some(path) = drawing_dialog()
                        .set_title("Save Drawing")
                        .set_file_name("stickers.json")
                        .save_file()
                {
                    actions.push(PanelAction::Save(Some(path)));
                }
            });

            if let Some(message) = &status.message {
                ui.add_space(8.0);
                let color = if status.is_error {
                    egui::Color32::RED
                } else {
                    ui.visuals().weak_text_color()
                };
                ui.colored_label(color, egui::RichText::new(message).small());
            }
        });

    let panel_right = response.response.rect.right();
    for action in actions {
        match action {
            PanelAction::SwitchTool(kind) => editor.set_active_tool(kind),
            PanelAction::Insert(text) => {
                // Center of the canvas area not covered by the panel
                let size = editor.document.drawing.size;
                let point = Vec2::new((panel_right + size.x) / 2.0, size.y / 2.0);
                editor.with_tool(|tool, ctx| tool.insert_sticker(ctx, point, &text));
                panel.new_text.clear();
            }
            PanelAction::SetFontSize(font_size) => {
                editor.with_tool(|tool, ctx| tool.apply_settings(ctx, UserSettings { font_size }));
            }
            PanelAction::EditText(text) => {
                editor.with_tool(|tool, ctx| tool.handle_text_input(ctx, &text));
            }
            PanelAction::FinishEditing => editor.with_tool(|tool, ctx| tool.finish_editing(ctx)),
            PanelAction::Delete => editor.with_tool(|tool, ctx| tool.remove_selected(ctx)),
            PanelAction::Undo => {
                editor.undo();
            }
            PanelAction::Redo => {
                editor.redo();
            }
            PanelAction::Open(path) => {
                open_events.write(OpenDrawingRequest { path });
            }
            PanelAction::Save(path) => {
                save_events.write(SaveDrawingRequest { path });
            }
        }
    }

    Ok(())
}

/// Tell the user their config file was replaced with defaults
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
    config: Res<StickerConfig>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Configuration Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your configuration could not be loaded and was reset to defaults.");
            if let Some(reason) = &notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(5.0);
            ui.label(
                egui::RichText::new(config.config_path.to_string_lossy())
                    .small()
                    .weak(),
            );
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}
