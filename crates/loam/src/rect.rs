//! Axis-aligned pixel rectangles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world pixels.
///
/// `x`/`y` are the top-left corner; `y` grows downward. Intersection is strict:
/// rectangles that only share an edge do not overlap, which is what lets a
/// resolved rectangle sit flush against a wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width in pixels
    pub w: f32,
    /// Height in pixels
    pub h: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle of the given size centred on `center`.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// True if the rectangle has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Strict overlap test. Shared edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True if `point` lies inside the rectangle (left/top inclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn translate(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Clamp the rectangle so it lies within `[0, width) x [0, height)`.
    ///
    /// A rectangle larger than the bounds is pinned to the origin.
    #[must_use]
    pub fn clamp_within(&self, width: f32, height: f32) -> Self {
        let max_x = (width - self.w).max(0.0);
        let max_y = (height - self.h).max(0.0);
        Self::new(self.x.clamp(0.0, max_x), self.y.clamp(0.0, max_y), self.w, self.h)
    }
}
