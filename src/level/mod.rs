//! Level assembly
//!
//! Turns a level index into the full entity set:
//! 1. Authored layout (opening levels) or provider grid -> world content,
//!    with the fallback layout substituted on any provider failure
//! 2. Platforms split around hazard tiles
//! 3. Overhead blocks placed on stone/wood platforms
//! 4. Goal flag near the right edge
//!
//! Steps 2-4 are pure. The only randomness is the lock color of authored
//! locked levels, drawn from the caller's RNG.

pub mod fixed;
pub mod grid;
pub mod placement;
pub mod provider;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use grid::{Cell, ContractViolation, SymbolicGrid};
pub use placement::{BlockPlacement, flag_for, place_blocks, split_around_hazards};
pub use provider::{
    FailingProvider, GridProvider, LevelContentProvider, NoiseGridProvider, ProviderError,
    fallback_layout,
};

use crate::consts::*;
use crate::sim::state::{
    Coin, CoinBlock, Decoration, Enemy, ExclamationBlock, Flag, Hazard, KeyColor, Lock, Platform,
    SurfaceKind,
};
use crate::tuning::Tuning;

/// World width of a level; grows by 200 per level
pub fn level_length(level: u32) -> f32 {
    1600.0 + level.saturating_sub(1) as f32 * 200.0
}

/// Full-width grass strip every level stands on
pub fn ground_strip(length: f32) -> Platform {
    Platform::new(0.0, GROUND_Y, length, GROUND_HEIGHT, SurfaceKind::Grass)
}

/// World-space content before splitting, block placement and the flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    pub ground_y: f32,
    pub length: f32,
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub locks: Vec<Lock>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub decorations: Vec<Decoration>,
}

/// Everything a level starts with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub index: u32,
    pub length: f32,
    pub ground_y: f32,
    /// Color of this level's gate and key, if it has them
    pub lock_color: Option<KeyColor>,
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub locks: Vec<Lock>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub coin_blocks: Vec<CoinBlock>,
    pub exclamation_blocks: Vec<ExclamationBlock>,
    pub flag: Flag,
    pub decorations: Vec<Decoration>,
}

/// Build the entity set for `index`.
///
/// Never fails: provider errors and contract violations are logged and
/// replaced by [`fallback_layout`].
pub fn assemble(
    index: u32,
    tuning: &Tuning,
    provider: &dyn LevelContentProvider,
    rng: &mut impl Rng,
) -> LevelLayout {
    if tuning.is_fixed_level(index) {
        let lock_color = (tuning.is_locked_level(index) && fixed::has_lock(index))
            .then(|| KeyColor::ALL[rng.random_range(0..KeyColor::ALL.len())]);
        if let Some(world) = fixed::layout(index, lock_color, tuning.enemy_speed) {
            return finish(index, world, lock_color);
        }
    }
    finish(index, generated_world(index, tuning, provider), None)
}

fn generated_world(
    index: u32,
    tuning: &Tuning,
    provider: &dyn LevelContentProvider,
) -> WorldLayout {
    let grid = provider.generate(index).and_then(|grid| {
        grid.check_contract()?;
        Ok(grid)
    });
    match grid {
        Ok(grid) => grid::to_world(&grid, index, tuning.enemy_speed),
        Err(err) => {
            log::warn!("Level {} content unavailable ({}), using fallback layout", index, err);
            fallback_layout(index, tuning.enemy_speed)
        }
    }
}

/// Hazard splitting, block placement and flag for already-built content
pub fn finish(index: u32, world: WorldLayout, lock_color: Option<KeyColor>) -> LevelLayout {
    let platforms = split_around_hazards(&world.platforms, &world.hazards);
    let blocks = place_blocks(&platforms, &world.locks, lock_color);
    let flag = flag_for(world.length, world.ground_y);
    log::debug!(
        "Assembled level {}: {} platforms, {} coin blocks, {} key blocks",
        index,
        platforms.len(),
        blocks.coin_blocks.len(),
        blocks.exclamation_blocks.len()
    );

    LevelLayout {
        index,
        length: world.length,
        ground_y: world.ground_y,
        lock_color,
        platforms,
        hazards: world.hazards,
        locks: world.locks,
        enemies: world.enemies,
        coins: world.coins,
        coin_blocks: blocks.coin_blocks,
        exclamation_blocks: blocks.exclamation_blocks,
        flag,
        decorations: world.decorations,
    }
}
