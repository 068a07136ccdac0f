//! Hit-testable control regions placed around the text surface.

use bevy::math::{Rect, Vec2};

use crate::constants::CONTROL_SIZE;

/// What a control does when tapped or dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragActionType {
    Delete,
    ResizeAndRotate,
    /// Text stickers only
    ChangeWidth,
}

impl DragActionType {
    pub fn label(&self) -> &'static str {
        match self {
            DragActionType::Delete => "delete",
            DragActionType::ResizeAndRotate => "resize and rotate",
            DragActionType::ChangeWidth => "change width",
        }
    }
}

/// How strongly a placement holds against the text surface's own size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPriority {
    Required,
    /// Yields to the text surface: a soft control is pushed off the text
    /// frame rather than covering it.
    #[default]
    Low,
}

/// Horizontal anchor of a control against the text frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalAnchor {
    /// Control's right edge sits `gap` left of the text's left edge
    BeforeLeft(f32),
    /// Control's left edge sits `gap` right of the text's right edge
    AfterRight(f32),
}

/// Vertical anchor of a control against the text frame (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalAnchor {
    /// Control's bottom edge sits `gap` above the text's top edge
    AboveTop(f32),
    /// Control's top edge sits `gap` below the text's bottom edge
    BelowBottom(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPlacement {
    pub size: Vec2,
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
    pub priority: LayoutPriority,
}

impl ControlPlacement {
    /// Upper left of the text
    pub fn delete() -> Self {
        Self {
            size: Vec2::splat(CONTROL_SIZE),
            horizontal: HorizontalAnchor::BeforeLeft(0.0),
            vertical: VerticalAnchor::AboveTop(3.0),
            priority: LayoutPriority::Low,
        }
    }

    /// Lower right of the text
    pub fn resize_and_rotate() -> Self {
        Self {
            size: Vec2::splat(CONTROL_SIZE),
            horizontal: HorizontalAnchor::AfterRight(5.0),
            vertical: VerticalAnchor::BelowBottom(4.0),
            priority: LayoutPriority::Low,
        }
    }

    /// Upper right of the text
    pub fn change_width() -> Self {
        Self {
            size: Vec2::splat(CONTROL_SIZE),
            horizontal: HorizontalAnchor::AfterRight(5.0),
            vertical: VerticalAnchor::AboveTop(4.0),
            priority: LayoutPriority::Low,
        }
    }

    /// Frame in the overlay's local space. Size and gaps are multiplied by
    /// `chrome_scale`.
    pub fn frame(&self, text_frame: Rect, chrome_scale: f32) -> Rect {
        let soft = self.priority == LayoutPriority::Low;
        let gap = |g: f32| (if soft { g.max(0.0) } else { g }) * chrome_scale;
        let size = self.size * chrome_scale;

        let min_x = match self.horizontal {
            HorizontalAnchor::BeforeLeft(g) => text_frame.min.x - gap(g) - size.x,
            HorizontalAnchor::AfterRight(g) => text_frame.max.x + gap(g),
        };
        let min_y = match self.vertical {
            VerticalAnchor::AboveTop(g) => text_frame.min.y - gap(g) - size.y,
            VerticalAnchor::BelowBottom(g) => text_frame.max.y + gap(g),
        };

        Rect::from_corners(Vec2::new(min_x, min_y), Vec2::new(min_x, min_y) + size)
    }
}

/// A declared control: its action plus where it sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub action: DragActionType,
    pub placement: ControlPlacement,
}
