//! Read-only per-frame view for renderers
//!
//! A snapshot is a flat list of world-space rectangles with a state tag each,
//! plus the camera offset and HUD values. Renderers never see `GameState`.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{
    DecorationKind, EnemyKind, Facing, GamePhase, GameState, HazardKind, KeyColor, PlayerAnim,
    SurfaceKind,
};

/// Text shown while the key notice timer runs
pub const KEY_NOTICE_TEXT: &str = "Key collected!";

/// What a sprite rectangle represents, with the state needed to pick a visual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpriteTag {
    Platform(SurfaceKind),
    Hazard(HazardKind),
    Decoration(DecorationKind),
    Coin,
    CoinBlock { has_coin: bool },
    ExclamationBlock { color: KeyColor, has_key: bool },
    Lock { color: KeyColor, unlocked: bool },
    Key(KeyColor),
    Flag { reached: bool },
    Enemy(EnemyKind),
    Player { facing: Facing, anim: PlayerAnim },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub rect: Rect,
    pub tag: SpriteTag,
}

/// HUD values for the frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub level: u32,
    pub score: u64,
    pub coins: u32,
    pub keys: Vec<KeyColor>,
    /// Transient notice, present while its timer runs
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Draw order back to front
    pub sprites: Vec<Sprite>,
    pub camera_x: f32,
    pub phase: GamePhase,
    pub hud: Hud,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let level = &state.level;
        let mut sprites = Vec::with_capacity(
            level.platforms.len()
                + level.hazards.len()
                + level.decorations.len()
                + level.coins.len()
                + level.coin_blocks.len()
                + level.exclamation_blocks.len()
                + level.locks.len()
                + level.enemies.len()
                + 3,
        );

        let mut push = |rect: Rect, tag: SpriteTag| sprites.push(Sprite { rect, tag });

        for p in &level.platforms {
            push(p.rect, SpriteTag::Platform(p.surface));
        }
        for h in &level.hazards {
            push(h.rect, SpriteTag::Hazard(h.kind));
        }
        for d in &level.decorations {
            push(d.rect, SpriteTag::Decoration(d.kind));
        }
        for c in level.coins.iter().filter(|c| !c.collected) {
            push(c.rect, SpriteTag::Coin);
        }
        for b in &level.coin_blocks {
            push(b.rect, SpriteTag::CoinBlock { has_coin: b.has_coin });
        }
        for lock in &level.locks {
            push(
                lock.rect,
                SpriteTag::Lock {
                    color: lock.color,
                    unlocked: lock.unlocked,
                },
            );
        }
        for b in &level.exclamation_blocks {
            push(
                b.rect,
                SpriteTag::ExclamationBlock {
                    color: b.color,
                    has_key: b.has_key,
                },
            );
        }
        if let Some(key) = level.falling_key.as_ref().filter(|k| !k.collected) {
            push(key.body.rect(), SpriteTag::Key(key.color));
        }
        for e in &level.enemies {
            push(e.rect(), SpriteTag::Enemy(e.kind));
        }
        push(
            level.flag.rect,
            SpriteTag::Flag {
                reached: level.flag.reached,
            },
        );
        push(
            level.player.rect(),
            SpriteTag::Player {
                facing: level.player.facing,
                anim: level.player.anim,
            },
        );

        Self {
            sprites,
            camera_x: state.camera_x(),
            phase: state.phase,
            hud: Hud {
                level: state.level_index,
                score: state.score,
                coins: level.coins_collected,
                keys: state.keyring.iter().copied().collect(),
                notice: (level.key_notice_ticks > 0).then(|| KEY_NOTICE_TEXT.to_string()),
            },
        }
    }

    /// Sprites whose rectangle falls at least partly inside the viewport
    pub fn visible(&self, viewport_width: f32) -> impl Iterator<Item = &Sprite> {
        let left = self.camera_x;
        let right = self.camera_x + viewport_width;
        self.sprites
            .iter()
            .filter(move |s| crate::spans_overlap(s.rect.left(), s.rect.right(), left, right))
    }

    /// Convert a world rectangle to screen space
    pub fn to_screen(&self, rect: &Rect) -> Rect {
        Rect::new(rect.x - self.camera_x, rect.y, rect.w, rect.h)
    }
}
