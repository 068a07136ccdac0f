//! Paints stickers and the editing overlay with egui.
//!
//! Everything goes on the background layer so the side panel stays on top.
//! Committed stickers come from the `CanvasRender` cache; the selected one
//! is painted live each frame, followed by its overlay chrome.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use std::collections::HashMap;

use crate::config::StickerConfig;
use crate::tint;

use super::overlay::{DragActionType, EditingOverlay};
use super::state::{EditorState, StickerPaint};

const STICKER_COLOR: egui::Color32 = egui::Color32::WHITE;

/// Control icon textures, tinted with the chrome color
#[derive(Resource, Default)]
pub struct ControlIcons {
    textures: HashMap<DragActionType, egui::TextureHandle>,
    loaded: bool,
}

impl ControlIcons {
    pub fn get(&self, action: DragActionType) -> Option<&egui::TextureHandle> {
        self.textures.get(&action)
    }
}

fn chrome_color(config: &StickerConfig) -> egui::Color32 {
    let [r, g, b, a] = config.data.chrome_color;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn pos(point: Vec2) -> egui::Pos2 {
    egui::pos2(point.x, point.y)
}

/// Load and tint the configured control icons once egui is up
pub fn load_control_icons(
    mut contexts: EguiContexts,
    config: Res<StickerConfig>,
    mut icons: ResMut<ControlIcons>,
) {
    if icons.loaded {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    icons.loaded = true;

    let sources = [
        (DragActionType::Delete, &config.data.icon_close),
        (DragActionType::ResizeAndRotate, &config.data.icon_rotate),
        (DragActionType::ChangeWidth, &config.data.icon_expand),
    ];
    for (action, path) in sources {
        let Some(path) = path else {
            continue;
        };
        let resolved = crate::paths::resolve_resource(path);
        match tint::load_tinted(&resolved, config.data.chrome_color) {
            Ok(image) => {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width() as _, image.height() as _],
                    image.as_flat_samples().as_slice(),
                );
                let handle =
                    ctx.load_texture(action.label(), color_image, egui::TextureOptions::LINEAR);
                icons.textures.insert(action, handle);
                debug!("Loaded {} icon from {:?}", action.label(), resolved);
            }
            Err(e) => {
                warn!("Failed to load {} icon {:?}: {}", action.label(), resolved, e);
            }
        }
    }
}

fn paint_sticker(painter: &egui::Painter, paint: &StickerPaint) {
    if paint.text.is_empty() {
        return;
    }
    let galley = painter.layout(
        paint.text.clone(),
        egui::FontId::proportional(paint.font_size),
        STICKER_COLOR,
        paint.wrap_width,
    );
    let text = egui::epaint::TextShape::new(pos(paint.origin), galley, STICKER_COLOR)
        .with_angle(paint.rotation);
    painter.add(text);
}

fn control_glyph(action: DragActionType) -> &'static str {
    match action {
        DragActionType::Delete => "×",
        DragActionType::ResizeAndRotate => "↻",
        DragActionType::ChangeWidth => "↔",
    }
}

fn paint_overlay(
    painter: &egui::Painter,
    overlay: &EditingOverlay,
    icons: &ControlIcons,
    color: egui::Color32,
) {
    let bounds = overlay.bounds();
    let transform = overlay.transform();
    let outline = [
        bounds.min,
        Vec2::new(bounds.max.x, bounds.min.y),
        bounds.max,
        Vec2::new(bounds.min.x, bounds.max.y),
    ]
    .map(|corner| pos(transform.transform_point2(corner)));
    painter.add(egui::Shape::closed_line(
        outline.to_vec(),
        egui::Stroke::new(1.0, color),
    ));

    for (action, corners) in overlay.control_quads() {
        let center = (corners[0] + corners[1] + corners[2] + corners[3]) / 4.0;
        let side = corners[0].distance(corners[1]);
        match icons.get(action) {
            Some(texture) => {
                painter.image(
                    texture.id(),
                    egui::Rect::from_center_size(pos(center), egui::vec2(side, side)),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                painter.circle_filled(pos(center), side / 2.0, color.gamma_multiply(0.35));
                painter.text(
                    pos(center),
                    egui::Align2::CENTER_CENTER,
                    control_glyph(action),
                    egui::FontId::proportional(side * 0.6),
                    color,
                );
            }
        }
    }
}

/// Paint every sticker plus the active tool's overlay
pub fn paint_canvas(
    mut contexts: EguiContexts,
    mut editor: EditorState,
    icons: Res<ControlIcons>,
    config: Res<StickerConfig>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let selected = editor
        .tools
        .active()
        .selected_shape_id()
        .map(str::to_string);
    if editor.render.is_dirty() {
        editor
            .render
            .rebuild(&editor.document.drawing, selected.as_deref());
    }

    let painter = ctx.layer_painter(egui::LayerId::background());
    for paint in editor.render.painted() {
        paint_sticker(&painter, paint);
    }

    let Some(shape) = selected
        .as_deref()
        .and_then(|id| editor.document.drawing.shape(id))
    else {
        return;
    };
    paint_sticker(&painter, &StickerPaint::from_shape(shape));

    let overlay = editor.tools.active().overlay();
    if overlay.is_attached() {
        paint_overlay(&painter, overlay, &icons, chrome_color(&config));
    }
}
