//! Collision response against static geometry
//!
//! Only the vertical axis is ever corrected: bodies falling into a solid are
//! snapped onto its top, bodies rising into one are snapped under its bottom.
//! Horizontal motion is never pushed back.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::Body;

/// How a solid participates in collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolidKind {
    /// Blocks from above and below (platforms, locked gates)
    Full,
    /// Can be landed on from above; rising bodies pass through (blocks)
    OneSided,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solid {
    pub rect: Rect,
    pub kind: SolidKind,
}

impl Solid {
    pub fn full(rect: Rect) -> Self {
        Self {
            rect,
            kind: SolidKind::Full,
        }
    }

    pub fn one_sided(rect: Rect) -> Self {
        Self {
            rect,
            kind: SolidKind::OneSided,
        }
    }
}

/// Result of resolving one overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Snapped onto the solid's top; vertical speed zeroed
    Landed,
    /// Snapped under the solid's bottom; vertical speed zeroed
    Bumped,
    /// Overlap left as is (no vertical motion, or one-sided pass-through)
    Ignored,
}

/// Resolve an overlapping body against a solid along the vertical axis.
///
/// `prev_bottom` is the body's lower edge before this frame's integration;
/// one-sided solids only catch bodies that started above their top.
pub fn resolve_vertical(body: &mut Body, solid: &Solid, prev_bottom: f32) -> Contact {
    let vy = body.vel.y;
    match solid.kind {
        SolidKind::OneSided => {
            if vy > 0.0 && prev_bottom <= solid.rect.top() {
                land_on(body, &solid.rect)
            } else {
                Contact::Ignored
            }
        }
        SolidKind::Full => {
            if vy > 0.0 {
                land_on(body, &solid.rect)
            } else if vy < 0.0 {
                body.pos.y = solid.rect.bottom();
                body.vel.y = 0.0;
                Contact::Bumped
            } else {
                Contact::Ignored
            }
        }
    }
}

/// Unconditional snap onto a surface's top
pub fn land_on(body: &mut Body, surface: &Rect) -> Contact {
    body.pos.y = surface.top() - body.size.y;
    body.vel.y = 0.0;
    Contact::Landed
}

/// Whether a body's lower edge rests exactly on top of `surface`
pub fn rests_on(body_rect: &Rect, surface: &Rect) -> bool {
    body_rect.overlaps_horizontally(surface) && body_rect.bottom() == surface.top()
}

/// Whether a body is supported by any solid (used to keep grounded bodies
/// grounded between frames without re-applying gravity)
pub fn is_supported<'a>(body_rect: &Rect, mut surfaces: impl Iterator<Item = &'a Rect>) -> bool {
    surfaces.any(|surface| rests_on(body_rect, surface))
}

/// Key landing: the key's lower edge has crossed into the top `band` pixels
/// of a surface it horizontally overlaps
pub fn crossed_top(body_rect: &Rect, surface: &Rect, band: f32) -> bool {
    body_rect.overlaps_horizontally(surface)
        && body_rect.bottom() > surface.top()
        && body_rect.bottom() - surface.top() < band
}
