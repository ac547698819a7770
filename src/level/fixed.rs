//! Hand-authored layouts for the opening levels
//!
//! Heights are "rise above the ground line" so every layout reads the same
//! regardless of screen size.

use crate::above_ground;
use crate::consts::*;
use crate::sim::rect::Rect;
use crate::sim::state::{
    Coin, Decoration, DecorationKind, Enemy, EnemyKind, Hazard, HazardKind, KeyColor, Lock,
    Platform, SurfaceKind,
};

use super::{WorldLayout, ground_strip, level_length};

use crate::sim::state::DecorationKind::{MushroomBrown, MushroomRed};
use crate::sim::state::SurfaceKind::{Stone, Wood};

const SNAIL: EnemyKind = EnemyKind::Snail { shelled: false };
const SLIME: EnemyKind = EnemyKind::Slime;
const BEE: EnemyKind = EnemyKind::Bee;

/// Water tiles sit flush with the ground line
const WATER_WIDTH: f32 = 120.0;
/// Lock gates hover this far above the ground line
const LOCK_RISE: f32 = 100.0;

struct Authored {
    /// (x, rise, width, surface)
    ledges: &'static [(f32, f32, f32, SurfaceKind)],
    water: &'static [f32],
    lock: Option<f32>,
    enemies: &'static [(f32, EnemyKind)],
    /// (x, rise)
    coins: &'static [(f32, f32)],
    decorations: &'static [(f32, DecorationKind)],
}

static LEVEL_1: Authored = Authored {
    ledges: &[(400.0, 120.0, 150.0, Wood), (900.0, 200.0, 150.0, Stone)],
    water: &[],
    lock: None,
    enemies: &[(600.0, SLIME)],
    coins: &[(300.0, 60.0), (800.0, 160.0), (1200.0, 60.0)],
    decorations: &[(350.0, MushroomBrown), (1200.0, MushroomRed)],
};

static LEVEL_2: Authored = Authored {
    ledges: &[
        (300.0, 120.0, 150.0, Wood),
        (700.0, 200.0, 150.0, Stone),
        (1200.0, 150.0, 150.0, Wood),
        (1500.0, 250.0, 100.0, Stone),
    ],
    water: &[900.0],
    lock: None,
    enemies: &[(600.0, SLIME), (1300.0, SNAIL)],
    coins: &[(400.0, 60.0), (1000.0, 160.0), (1400.0, 60.0), (1600.0, 200.0)],
    decorations: &[(500.0, MushroomBrown), (1400.0, MushroomRed)],
};

static LEVEL_3: Authored = Authored {
    ledges: &[
        (400.0, 120.0, 150.0, Wood),
        (800.0, 200.0, 150.0, Stone),
        (1200.0, 250.0, 100.0, Wood),
        (1600.0, 180.0, 120.0, Stone),
    ],
    water: &[1100.0],
    lock: None,
    enemies: &[(600.0, SNAIL), (1300.0, BEE), (1700.0, SLIME)],
    coins: &[(400.0, 60.0), (900.0, 160.0), (1400.0, 60.0), (1800.0, 200.0)],
    decorations: &[(500.0, MushroomBrown), (1500.0, MushroomRed)],
};

static LEVEL_4: Authored = Authored {
    ledges: &[
        (300.0, 120.0, 120.0, Wood),
        (700.0, 200.0, 120.0, Stone),
        (1100.0, 250.0, 100.0, Wood),
        (1500.0, 180.0, 120.0, Stone),
        (1900.0, 220.0, 100.0, Wood),
        // Upper route
        (600.0, 300.0, 120.0, Stone),
        (1000.0, 350.0, 120.0, Wood),
        (1400.0, 400.0, 120.0, Stone),
    ],
    water: &[600.0],
    lock: Some(1400.0),
    enemies: &[(900.0, SNAIL)],
    coins: &[
        (350.0, 60.0),
        (800.0, 160.0),
        (1300.0, 60.0),
        (1700.0, 200.0),
        (2100.0, 60.0),
    ],
    decorations: &[(350.0, MushroomBrown), (1200.0, MushroomRed)],
};

static LEVEL_5: Authored = Authored {
    ledges: &[
        (400.0, 120.0, 150.0, Wood),
        (900.0, 200.0, 150.0, Stone),
        (1400.0, 250.0, 100.0, Wood),
        (1800.0, 180.0, 120.0, Stone),
        (2100.0, 220.0, 100.0, Wood),
    ],
    water: &[700.0],
    lock: Some(1600.0),
    enemies: &[(600.0, SNAIL), (1300.0, BEE)],
    coins: &[
        (400.0, 60.0),
        (900.0, 160.0),
        (1400.0, 60.0),
        (1800.0, 200.0),
        (2200.0, 60.0),
    ],
    decorations: &[(500.0, MushroomBrown), (2000.0, MushroomRed)],
};

static LEVEL_6: Authored = Authored {
    ledges: &[
        (400.0, 120.0, 150.0, Wood),
        (900.0, 200.0, 150.0, Stone),
        (1400.0, 250.0, 100.0, Wood),
        (1800.0, 180.0, 120.0, Stone),
        (2300.0, 220.0, 100.0, Wood),
    ],
    water: &[1200.0],
    lock: Some(1800.0),
    enemies: &[(600.0, SNAIL), (1300.0, BEE), (2000.0, SLIME)],
    coins: &[
        (400.0, 60.0),
        (900.0, 160.0),
        (1400.0, 60.0),
        (1800.0, 200.0),
        (2400.0, 60.0),
    ],
    decorations: &[(500.0, MushroomBrown), (2200.0, MushroomRed)],
};

fn authored(level: u32) -> Option<&'static Authored> {
    match level {
        1 => Some(&LEVEL_1),
        2 => Some(&LEVEL_2),
        3 => Some(&LEVEL_3),
        4 => Some(&LEVEL_4),
        5 => Some(&LEVEL_5),
        6 => Some(&LEVEL_6),
        _ => None,
    }
}

/// Number of authored layouts
pub const AUTHORED_LEVELS: u32 = 6;

/// World content for an authored level, or None past the authored range.
/// The lock gate (where the layout has one) takes `lock_color`; without a
/// color the gate is left out.
pub fn layout(level: u32, lock_color: Option<KeyColor>, enemy_speed: f32) -> Option<WorldLayout> {
    let level_def = authored(level)?;
    let length = level_length(level);

    let mut platforms = vec![ground_strip(length)];
    platforms.extend(level_def.ledges.iter().map(|&(x, rise, w, surface)| {
        let pos = above_ground(x, rise);
        Platform::new(pos.x, pos.y, w, PLATFORM_HEIGHT, surface)
    }));

    let hazards = level_def
        .water
        .iter()
        .map(|&x| Hazard {
            rect: Rect::new(x, GROUND_Y, WATER_WIDTH, PLATFORM_HEIGHT),
            kind: HazardKind::Water,
        })
        .collect();

    let locks = level_def
        .lock
        .zip(lock_color)
        .map(|(x, color)| {
            let pos = above_ground(x, LOCK_RISE);
            Lock::new(pos.x, pos.y, color)
        })
        .into_iter()
        .collect();

    let enemies = level_def
        .enemies
        .iter()
        .map(|&(x, kind)| Enemy::new(above_ground(x, ENEMY_SIZE), kind, enemy_speed))
        .collect();

    let coins = level_def
        .coins
        .iter()
        .map(|&(x, rise)| {
            let pos = above_ground(x, rise);
            Coin::new(pos.x, pos.y)
        })
        .collect();

    let decorations = level_def
        .decorations
        .iter()
        .map(|&(x, kind)| {
            let pos = above_ground(x, DECORATION_SIZE);
            Decoration {
                rect: Rect::square(pos.x, pos.y, DECORATION_SIZE),
                kind,
            }
        })
        .collect();

    Some(WorldLayout {
        ground_y: GROUND_Y,
        length,
        platforms,
        hazards,
        locks,
        enemies,
        coins,
        decorations,
    })
}

/// Whether an authored layout has a lock gate
pub fn has_lock(level: u32) -> bool {
    authored(level).is_some_and(|level_def| level_def.lock.is_some())
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn test_level_lengths() {
        let lengths: Vec<f32> = (1..=AUTHORED_LEVELS)
            .filter_map(|level| layout(level, None, 1.0))
            .map(|world| world.length)
            .collect();
        assert_eq!(lengths, vec![1600.0, 1800.0, 2000.0, 2200.0, 2400.0, 2600.0]);
        assert!(layout(7, None, 1.0).is_none());
        assert!(layout(0, None, 1.0).is_none());
    }

    #[test]
    fn test_level_one_contents() {
        let world = layout(1, None, 1.0).unwrap();
        assert_eq!(world.platforms.len(), 3);
        assert_eq!(world.platforms[1].rect, Rect::new(400.0, 580.0, 150.0, 40.0));
        assert_eq!(world.platforms[2].surface, SurfaceKind::Stone);
        assert_eq!(world.enemies[0].body.pos, Vec2::new(600.0, 652.0));
        assert_eq!(world.coins.len(), 3);
        assert_eq!(world.coins[1].rect.y, 540.0);
        assert!(world.hazards.is_empty());
        assert!(world.locks.is_empty());
    }

    #[test]
    fn test_lock_levels() {
        for level in 1..=3 {
            assert!(!has_lock(level));
        }
        for (level, x) in [(4, 1400.0), (5, 1600.0), (6, 1800.0)] {
            assert!(has_lock(level));
            let world = layout(level, Some(KeyColor::Yellow), 1.0).unwrap();
            assert_eq!(world.locks.len(), 1);
            assert_eq!(world.locks[0].rect, Rect::square(x, 600.0, 48.0));
            assert_eq!(world.locks[0].color, KeyColor::Yellow);
            assert!(!world.locks[0].unlocked);
        }
        // No color, no gate
        assert!(layout(4, None, 1.0).unwrap().locks.is_empty());
    }

    #[test]
    fn test_level_four_upper_route() {
        let world = layout(4, Some(KeyColor::Blue), 1.0).unwrap();
        assert_eq!(world.platforms.len(), 9);
        for y in [400.0, 350.0, 300.0] {
            assert!(world.platforms.iter().any(|p| p.rect.y == y));
        }
    }

    #[test]
    fn test_water_sits_on_ground_line() {
        let world = layout(2, None, 1.0).unwrap();
        assert_eq!(world.hazards.len(), 1);
        assert_eq!(world.hazards[0].rect, Rect::new(900.0, 700.0, 120.0, 40.0));
        assert_eq!(world.hazards[0].rect.y, world.platforms[0].rect.y);
    }
}
