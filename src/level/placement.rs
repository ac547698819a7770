//! Post-processing shared by every level: hazard splitting, overhead block
//! placement and the goal flag.
//!
//! Everything here is a pure function of the platform/hazard/lock lists.

use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_SIZE, FLAG_SIZE};
use crate::sim::rect::Rect;
use crate::sim::state::{CoinBlock, ExclamationBlock, Flag, Hazard, KeyColor, Lock, Platform};

/// Vertical distance from a host platform's top to its block's top
pub const BLOCK_RISE: f32 = 104.0;
/// Minimum host width for the coin + exclamation pair
pub const PAIR_WIDTH: f32 = 2.0 * BLOCK_SIZE;
/// Flag distance from the level's right edge
pub const FLAG_INSET: f32 = 100.0;

/// Split every platform around the hazard tiles it spans.
///
/// A hazard cuts a platform when both share the same top y and overlap
/// horizontally; each cut leaves zero, one or two remainders. Platforms are
/// cut by every such hazard in turn.
pub fn split_around_hazards(platforms: &[Platform], hazards: &[Hazard]) -> Vec<Platform> {
    let mut out = Vec::with_capacity(platforms.len() + hazards.len());
    for platform in platforms {
        let mut pieces = vec![platform.rect];
        for hazard in hazards.iter().filter(|h| h.rect.y == platform.rect.y) {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| cut(piece, &hazard.rect))
                .collect();
        }
        out.extend(pieces.into_iter().map(|rect| Platform {
            rect,
            surface: platform.surface,
        }));
    }
    out
}

fn cut(piece: Rect, hole: &Rect) -> Vec<Rect> {
    if !piece.overlaps_horizontally(hole) {
        return vec![piece];
    }
    let mut rest = Vec::with_capacity(2);
    if piece.left() < hole.left() {
        rest.push(Rect::new(piece.x, piece.y, hole.left() - piece.x, piece.h));
    }
    if piece.right() > hole.right() {
        rest.push(Rect::new(
            hole.right(),
            piece.y,
            piece.right() - hole.right(),
            piece.h,
        ));
    }
    rest
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPlacement {
    pub coin_blocks: Vec<CoinBlock>,
    pub exclamation_blocks: Vec<ExclamationBlock>,
}

impl BlockPlacement {
    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.coin_blocks
            .iter()
            .map(|b| &b.rect)
            .chain(self.exclamation_blocks.iter().map(|b| &b.rect))
    }
}

/// Place at most one overhead block per stone/wood platform.
///
/// Hosts are visited by (y, x). While `key_color` is still unplaced the host
/// gets the key: a coin + exclamation pair centered as a pair when it is at
/// least [`PAIR_WIDTH`] wide, a single exclamation block otherwise. Every other
/// host gets one centered coin block. A candidate that would overlap or sit
/// directly on/under an already placed block, or overlap any platform or lock,
/// is skipped.
pub fn place_blocks(
    platforms: &[Platform],
    locks: &[Lock],
    key_color: Option<KeyColor>,
) -> BlockPlacement {
    let mut hosts: Vec<&Platform> = platforms
        .iter()
        .filter(|p| p.surface.hosts_blocks() && p.rect.w >= BLOCK_SIZE)
        .collect();
    hosts.sort_by(|a, b| {
        a.rect
            .y
            .total_cmp(&b.rect.y)
            .then(a.rect.x.total_cmp(&b.rect.x))
    });

    let fits = |rect: &Rect, placed: &BlockPlacement| {
        !placed
            .rects()
            .any(|other| other.intersects(rect) || other.stacked_with(rect))
            && !platforms.iter().any(|p| p.rect.intersects(rect))
            && !locks.iter().any(|l| l.rect.intersects(rect))
    };

    let mut placed = BlockPlacement::default();
    let mut pending_key = key_color;

    for host in hosts {
        let y = host.rect.y - BLOCK_RISE;
        if y <= 0.0 {
            continue;
        }
        let center = host.rect.x + (host.rect.w / 2.0).floor();
        let single = Rect::square(center - BLOCK_SIZE / 2.0, y, BLOCK_SIZE);

        if let Some(color) = pending_key {
            if host.rect.w >= PAIR_WIDTH {
                let coin = Rect::square(center - BLOCK_SIZE, y, BLOCK_SIZE);
                let key = Rect::square(center, y, BLOCK_SIZE);
                if fits(&coin, &placed) && fits(&key, &placed) {
                    placed.coin_blocks.push(CoinBlock::new(coin.x, coin.y));
                    placed
                        .exclamation_blocks
                        .push(ExclamationBlock::new(key.x, key.y, color));
                    pending_key = None;
                    continue;
                }
            }
            if fits(&single, &placed) {
                placed
                    .exclamation_blocks
                    .push(ExclamationBlock::new(single.x, single.y, color));
                pending_key = None;
                continue;
            }
        }

        if fits(&single, &placed) {
            placed.coin_blocks.push(CoinBlock::new(single.x, single.y));
        }
    }

    if let Some(color) = pending_key {
        log::warn!("No host platform for the {} key block", color.as_str());
    }
    placed
}

/// Goal flag standing on the ground near the right edge
pub fn flag_for(length: f32, ground_y: f32) -> Flag {
    Flag::new(length - FLAG_INSET, ground_y - FLAG_SIZE)
}
