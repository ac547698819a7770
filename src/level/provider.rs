//! Content sources for generated levels
//!
//! A provider turns a level index into a symbolic grid or fails. Assembly
//! never propagates a provider failure: it substitutes [`fallback_layout`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::grid::{Cell, ContractViolation, SymbolicGrid};
use super::{WorldLayout, ground_strip, level_length};
use crate::consts::*;
use crate::sim::rect::Rect;
use crate::sim::state::{
    Coin, Decoration, DecorationKind, Enemy, EnemyKind, Platform, SurfaceKind,
};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("content generation unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

/// Source of symbolic grids for levels past the authored ones
pub trait LevelContentProvider {
    fn generate(&self, level: u32) -> Result<SymbolicGrid, ProviderError>;
}

/// Seeded threshold noise followed by the playability repair pass
#[derive(Debug, Clone)]
pub struct NoiseGridProvider {
    pub seed: u64,
    /// Chance that any cell starts as a wall
    pub wall_chance: f64,
}

impl NoiseGridProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            wall_chance: 0.12,
        }
    }

    pub fn with_wall_chance(mut self, wall_chance: f64) -> Self {
        self.wall_chance = wall_chance;
        self
    }
}

impl LevelContentProvider for NoiseGridProvider {
    fn generate(&self, level: u32) -> Result<SymbolicGrid, ProviderError> {
        if !(0.0..=1.0).contains(&self.wall_chance) {
            return Err(ProviderError::Unavailable(format!(
                "wall chance {} outside 0..=1",
                self.wall_chance
            )));
        }

        let mut rng = Pcg32::seed_from_u64(
            self.seed ^ u64::from(level).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        );
        let mut grid = SymbolicGrid::empty();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if rng.random_bool(self.wall_chance) {
                    grid.set(row, col, Cell::Wall);
                }
            }
        }
        grid.repair(&mut rng);
        log::debug!("Generated grid for level {}:\n{}", level, grid);
        Ok(grid)
    }
}

/// Serves one fixed grid for every level (replays, tests)
#[derive(Debug, Clone)]
pub struct GridProvider(pub SymbolicGrid);

impl LevelContentProvider for GridProvider {
    fn generate(&self, _level: u32) -> Result<SymbolicGrid, ProviderError> {
        Ok(self.0.clone())
    }
}

/// Never produces content; every generated level uses the fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingProvider;

impl LevelContentProvider for FailingProvider {
    fn generate(&self, _level: u32) -> Result<SymbolicGrid, ProviderError> {
        Err(ProviderError::Unavailable("no content source".into()))
    }
}

/// Deterministic layout used whenever generated content is unavailable
pub fn fallback_layout(level: u32, enemy_speed: f32) -> WorldLayout {
    let length = level_length(level);
    let ledge = |x: f32, rise: f32, w: f32, surface: SurfaceKind| {
        Platform::new(x, GROUND_Y - rise, w, PLATFORM_HEIGHT, surface)
    };

    let platforms = vec![
        ground_strip(length),
        ledge(100.0, 120.0, 150.0, SurfaceKind::Wood),
        ledge(400.0, 200.0, 150.0, SurfaceKind::Stone),
        ledge(700.0, 150.0, 120.0, SurfaceKind::Wood),
        ledge(1000.0, 250.0, 100.0, SurfaceKind::Stone),
        ledge(1300.0, 180.0, 120.0, SurfaceKind::Wood),
        ledge(1600.0, 220.0, 100.0, SurfaceKind::Stone),
    ];

    let enemies = [
        (300.0, EnemyKind::Slime),
        (800.0, EnemyKind::Bee),
        (1400.0, EnemyKind::Slime),
    ]
    .into_iter()
    .map(|(x, kind)| Enemy::new(Vec2::new(x, GROUND_Y - ENEMY_SIZE), kind, enemy_speed))
    .collect();

    let coins = [
        (200.0, 60.0),
        (500.0, 160.0),
        (800.0, 110.0),
        (1100.0, 210.0),
        (1400.0, 140.0),
        (1700.0, 180.0),
    ]
    .into_iter()
    .map(|(x, rise)| Coin::new(x, GROUND_Y - rise))
    .collect();

    let decorations = [350.0, 1200.0]
        .into_iter()
        .map(|x| Decoration {
            rect: Rect::new(x, GROUND_Y - DECORATION_SIZE, BUSH_WIDTH, DECORATION_SIZE),
            kind: DecorationKind::Bush,
        })
        .collect();

    WorldLayout {
        ground_y: GROUND_Y,
        length,
        platforms,
        hazards: Vec::new(),
        locks: Vec::new(),
        enemies,
        coins,
        decorations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_provider_is_seeded() {
        let provider = NoiseGridProvider::new(1234);
        let a = provider.generate(7).unwrap();
        let b = provider.generate(7).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, provider.generate(8).unwrap());
        assert_eq!(a.check_contract(), Ok(()));
    }

    #[test]
    fn test_noise_provider_rejects_bad_chance() {
        let provider = NoiseGridProvider::new(1).with_wall_chance(1.5);
        assert!(matches!(
            provider.generate(7),
            Err(ProviderError::Unavailable(_))
        ));
    }

    #[test]
    fn test_failing_provider() {
        let err = FailingProvider.generate(9).unwrap_err();
        assert_eq!(err.to_string(), "content generation unavailable: no content source");
    }

    #[test]
    fn test_contract_error_is_transparent() {
        let err = ProviderError::from(ContractViolation::MissingGround { col: 2 });
        assert_eq!(err.to_string(), "ground row has a gap at column 2");
    }

    #[test]
    fn test_fallback_layout_shape() {
        let world = fallback_layout(9, 1.0);
        assert_eq!(world.length, 3200.0);
        assert_eq!(world.platforms.len(), 7);
        assert_eq!(world.platforms[0], ground_strip(3200.0));
        assert_eq!(world.enemies.len(), 3);
        assert_eq!(world.coins.len(), 6);
        assert_eq!(world.decorations.len(), 2);
        assert!(world.hazards.is_empty());
        assert!(world.locks.is_empty());
        assert_eq!(world.platforms[1].rect, Rect::new(100.0, 580.0, 150.0, 40.0));
    }

    #[test]
    fn test_fallback_layout_is_stable() {
        let world = fallback_layout(7, 1.0);
        assert_eq!(world, fallback_layout(7, 1.0));
        assert_ne!(world.enemies, fallback_layout(7, 2.0).enemies);
    }
}
