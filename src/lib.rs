//! Keygate - a side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, objects, session state)
//! - `level`: Level assembly (fixed layouts, symbolic grids, block placement)
//! - `tuning`: Data-driven physics and scoring
//! - `platform`: Input/renderer collaborator abstraction
//! - `audio`: Sound cues derived from simulation events

pub mod audio;
pub mod level;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one step per presented frame)
    pub const SIM_HZ: u32 = 60;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Entity sizes (all square)
    pub const PLAYER_SIZE: f32 = 48.0;
    pub const ENEMY_SIZE: f32 = 48.0;
    pub const COIN_SIZE: f32 = 32.0;
    pub const KEY_SIZE: f32 = 32.0;
    pub const BLOCK_SIZE: f32 = 48.0;
    pub const LOCK_SIZE: f32 = 48.0;
    pub const FLAG_SIZE: f32 = 64.0;
    pub const DECORATION_SIZE: f32 = 48.0;
    pub const BUSH_WIDTH: f32 = 64.0;

    /// Static geometry
    pub const GROUND_HEIGHT: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 40.0;
    /// Ground surface y for every authored and generated level
    pub const GROUND_Y: f32 = SCREEN_HEIGHT - GROUND_HEIGHT;

    /// Where the player appears on every level load
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 400.0;

    /// Symbolic grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: usize = 20;
}

/// Horizontal overlap of two spans [a0, a1) and [b0, b1)
#[inline]
pub fn spans_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    a0 < b1 && a1 > b0
}

/// Top-left corner helper used by layouts authored relative to the ground
#[inline]
pub fn above_ground(x: f32, height: f32) -> Vec2 {
    Vec2::new(x, consts::GROUND_Y - height)
}
