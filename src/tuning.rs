//! Data-driven game balance
//!
//! Physics constants, score values and level-progression limits. Loaded from
//! JSON so balance changes never need a rebuild; every field has a default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Failure to read or parse a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics (units per frame) ===
    /// Downward acceleration applied to airborne bodies
    pub gravity: f32,
    /// Maximum downward speed
    pub terminal_velocity: f32,
    /// Initial upward speed of a jump
    pub jump_speed: f32,
    /// Player horizontal speed while a direction is held
    pub run_speed: f32,
    /// Patrol speed of every enemy
    pub enemy_speed: f32,
    /// Depth of the from-below trigger band on coin/exclamation blocks
    pub landing_band: f32,
    /// How far a falling key may sink into a surface and still land on it
    pub key_landing_band: f32,
    /// Enemy platform hitbox as a fraction of the sprite box
    pub enemy_hitbox_scale: f32,

    // === Scoring ===
    pub coin_value: u64,
    /// Bonus for advancing to the next level
    pub level_bonus: u64,
    /// Frames the "key collected" notice stays visible
    pub key_notice_ticks: u32,

    // === Progression ===
    /// Levels 1..=fixed_levels use authored layouts
    pub fixed_levels: u32,
    /// First level that carries a lock gate
    pub first_locked_level: u32,
    /// Completing this level beats the game
    pub final_level: u32,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            terminal_velocity: 20.0,
            jump_speed: 15.0,
            run_speed: 5.0,
            enemy_speed: 1.0,
            landing_band: 10.0,
            key_landing_band: 20.0,
            enemy_hitbox_scale: 0.5,

            coin_value: 100,
            level_bonus: 500,
            key_notice_ticks: 60,

            fixed_levels: 6,
            first_locked_level: 4,
            final_level: 10,

            viewport_width: SCREEN_WIDTH,
            viewport_height: SCREEN_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Whether a level index uses an authored layout
    pub fn is_fixed_level(&self, level: u32) -> bool {
        level <= self.fixed_levels
    }

    /// Whether a level index carries a lock gate and key
    pub fn is_locked_level(&self, level: u32) -> bool {
        level >= self.first_locked_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 1.2, "final_level": 3 }"#).unwrap();
        assert_eq!(tuning.gravity, 1.2);
        assert_eq!(tuning.final_level, 3);
        assert_eq!(tuning.jump_speed, 15.0);
        assert_eq!(tuning.coin_value, 100);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Tuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_level_classification() {
        let tuning = Tuning::default();
        assert!(tuning.is_fixed_level(6));
        assert!(!tuning.is_fixed_level(7));
        assert!(!tuning.is_locked_level(3));
        assert!(tuning.is_locked_level(4));
    }
}
