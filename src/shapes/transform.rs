//! Translation + uniform scale + rotation, the only placement a sticker has.

use bevy::math::{Affine2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Placement of a sticker on the canvas.
///
/// Stickers store no explicit position: the translation is the position and
/// doubles as the pivot for resize/rotate gestures. Values are immutable in
/// practice; every helper returns a new transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeTransform {
    pub translation: Vec2,
    /// Radians, accumulated without wraparound
    pub rotation: f32,
    pub scale: f32,
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ShapeTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            translation: self.translation + delta,
            ..*self
        }
    }

    /// A zero factor is not guarded here; callers keep the divisor sane.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            scale: self.scale * factor,
            ..*self
        }
    }

    pub fn rotated(&self, delta_radians: f32) -> Self {
        Self {
            rotation: self.rotation + delta_radians,
            ..*self
        }
    }

    /// Matrix form: translate ∘ rotate ∘ scale.
    pub fn affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::splat(self.scale),
            self.rotation,
            self.translation,
        )
    }

    /// Map a point from the sticker's local frame into canvas space
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.affine().transform_point2(local)
    }

    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// Axis-aligned bounds of `rect` after mapping its corners through `affine`.
///
/// Rotated rects grow to the box enclosing all four corners, which is how the
/// overlay and sticker hit tests see them.
pub fn transformed_bounds(rect: Rect, affine: &Affine2) -> Rect {
    let corners = [
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ];

    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for corner in corners {
        let mapped = affine.transform_point2(corner);
        min = min.min(mapped);
        max = max.max(mapped);
    }
    Rect { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_identity_default() {
        let t = ShapeTransform::default();
        assert_eq!(t.translation, Vec2::ZERO);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.rotation, 0.0);
    }

    #[test]
    fn test_helpers_only_touch_their_component() {
        let t = ShapeTransform {
            translation: Vec2::new(3.0, 4.0),
            rotation: 0.25,
            scale: 2.0,
        };

        let moved = t.translated(Vec2::new(1.0, -1.0));
        assert_eq!(moved.translation, Vec2::new(4.0, 3.0));
        assert_eq!(moved.rotation, t.rotation);
        assert_eq!(moved.scale, t.scale);

        let scaled = t.scaled(1.5);
        assert_eq!(scaled.scale, 3.0);
        assert_eq!(scaled.translation, t.translation);

        let rotated = t.rotated(0.5);
        assert_eq!(rotated.rotation, 0.75);
        assert_eq!(rotated.scale, t.scale);
    }

    #[test]
    fn test_rotation_accumulates_without_wrapping() {
        let t = ShapeTransform::IDENTITY.rotated(6.0).rotated(6.0);
        assert_eq!(t.rotation, 12.0);
    }

    #[test]
    fn test_affine_is_translate_rotate_scale() {
        let t = ShapeTransform {
            translation: Vec2::new(10.0, 0.0),
            rotation: FRAC_PI_2,
            scale: 2.0,
        };
        // (1, 0) scaled to (2, 0), rotated to (0, 2), translated to (10, 2)
        assert!(approx(t.apply(Vec2::X), Vec2::new(10.0, 2.0)));
    }

    #[test]
    fn test_transformed_bounds_of_rotated_rect() {
        let rect = Rect::new(-10.0, -5.0, 10.0, 5.0);
        let t = ShapeTransform::IDENTITY.rotated(FRAC_PI_2);
        let bounds = transformed_bounds(rect, &t.affine());
        assert!(approx(bounds.min, Vec2::new(-5.0, -10.0)));
        assert!(approx(bounds.max, Vec2::new(5.0, 10.0)));
    }
}
