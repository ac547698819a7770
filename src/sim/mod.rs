//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (entity vectors are never reordered mid-level)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Contact, Solid, SolidKind};
pub use rect::{Rect, intersects, landing_overlap};
pub use snapshot::{Hud, RenderSnapshot, Sprite, SpriteTag};
pub use state::{
    Body, Coin, CoinBlock, Decoration, DecorationKind, Enemy, EnemyKind, ExclamationBlock,
    Facing, FallingKey, Flag, GameEvent, GamePhase, GameState, Hazard, HazardKind, KeyColor,
    LevelState, Lock, Platform, Player, PlayerAnim, SurfaceKind,
};
pub use tick::{TickInput, tick};
