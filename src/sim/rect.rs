//! Axis-aligned rectangles in world space
//!
//! Screen convention: +y points down, so a rectangle's `top` is its smallest y.
//! Every collision test in the game goes through [`intersects`] or
//! [`landing_overlap`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::spans_overlap;

/// An axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Square rectangle with its top-left corner at (x, y)
    pub const fn square(x: f32, y: f32, side: f32) -> Self {
        Self::new(x, y, side, side)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }

    /// Whether the horizontal extents overlap
    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        spans_overlap(self.left(), self.right(), other.left(), other.right())
    }

    /// Same center, each dimension scaled by `scale`
    pub fn shrunk(&self, scale: f32) -> Rect {
        let w = self.w * scale;
        let h = self.h * scale;
        Rect::new(
            self.x + (self.w - w) / 2.0,
            self.y + (self.h - h) / 2.0,
            w,
            h,
        )
    }

    /// Whether `self` sits directly on top of `other` or directly below it
    /// (edges touching, horizontal extents overlapping)
    pub fn stacked_with(&self, other: &Rect) -> bool {
        self.overlaps_horizontally(other)
            && (self.bottom() == other.top() || other.bottom() == self.top())
    }
}

/// Standard AABB overlap test
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// "Hit from below" test for coin and exclamation blocks
///
/// True when the entity is moving upward and its lower edge lies strictly
/// inside the top `band` pixels of the block, with horizontal overlap.
pub fn landing_overlap(entity: &Rect, vel_y: f32, block: &Rect, band: f32) -> bool {
    entity.overlaps_horizontally(block)
        && entity.bottom() > block.top()
        && entity.bottom() < block.top() + band
        && vel_y < 0.0
}
