//! Game state and core simulation types
//!
//! Per-level entities live in [`LevelState`], which is rebuilt from scratch on
//! every level load. Everything that survives a level change (score, keyring,
//! level index, RNG stream) lives in [`GameState`].

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::{Rect, landing_overlap};
use crate::consts::*;
use crate::level::{self, LevelContentProvider, LevelLayout};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Flag reached, waiting for next/previous/home
    LevelComplete,
    /// Player died, waiting for restart
    GameOver,
    /// Flag reached on the final level
    Beaten,
    /// Quit requested; no further ticks have any effect
    Exited,
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Animation state, derived from motion each frame (no effect on physics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerAnim {
    #[default]
    Idle,
    Walk,
    Jump,
    Fall,
}

impl PlayerAnim {
    pub fn derive(on_ground: bool, vel: Vec2) -> Self {
        if on_ground {
            if vel.x != 0.0 {
                PlayerAnim::Walk
            } else {
                PlayerAnim::Idle
            }
        } else if vel.y < 0.0 {
            PlayerAnim::Jump
        } else {
            PlayerAnim::Fall
        }
    }
}

/// Key / lock colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    Blue,
    Green,
    Red,
    Yellow,
}

impl KeyColor {
    pub const ALL: [KeyColor; 4] = [
        KeyColor::Blue,
        KeyColor::Green,
        KeyColor::Red,
        KeyColor::Yellow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyColor::Blue => "blue",
            KeyColor::Green => "green",
            KeyColor::Red => "red",
            KeyColor::Yellow => "yellow",
        }
    }
}

/// Platform surface (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Grass,
    Stone,
    Sand,
    Wood,
}

impl SurfaceKind {
    /// Surfaces that may host an overhead block
    pub fn hosts_blocks(&self) -> bool {
        matches!(self, SurfaceKind::Stone | SurfaceKind::Wood)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Water,
    Lava,
}

/// Enemy variants. Snails can withdraw into a shell, which freezes their
/// motion while leaving their collision box in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Bee,
    Snail { shelled: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    MushroomBrown,
    MushroomRed,
    Bush,
}

/// Position, velocity and extent shared by every moving entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub on_ground: bool,
    pub facing: Facing,
    pub anim: PlayerAnim,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Vec2::splat(PLAYER_SIZE)),
            on_ground: false,
            facing: Facing::Right,
            anim: PlayerAnim::Idle,
        }
    }

    pub fn spawn() -> Self {
        Self::new(Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y))
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    /// Resting on a platform (gravity suspended)
    pub grounded: bool,
}

impl Enemy {
    /// Enemies start walking left at `speed`
    pub fn new(pos: Vec2, kind: EnemyKind, speed: f32) -> Self {
        let mut body = Body::new(pos, Vec2::splat(ENEMY_SIZE));
        body.vel.x = -speed;
        Self {
            body,
            kind,
            grounded: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Motion updates are skipped entirely while frozen
    pub fn is_frozen(&self) -> bool {
        matches!(self.kind, EnemyKind::Snail { shelled: true })
    }

    /// Toggle the shell. Returns false for kinds without a shell.
    pub fn set_shelled(&mut self, value: bool) -> bool {
        match &mut self.kind {
            EnemyKind::Snail { shelled } => {
                *shelled = value;
                true
            }
            _ => false,
        }
    }
}

/// Static solid geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub surface: SurfaceKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, w: f32, h: f32, surface: SurfaceKind) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            surface,
        }
    }
}

/// Water/lava tile; platforms never span one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub rect: Rect,
    pub kind: HazardKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Rect,
    pub collected: bool,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::square(x, y, COIN_SIZE),
            collected: false,
        }
    }

    /// Available -> Collected on full overlap with the player
    pub fn try_collect(&mut self, player: &Rect) -> bool {
        if self.collected || !self.rect.intersects(player) {
            return false;
        }
        self.collected = true;
        true
    }
}

/// Block that pays out one coin when hit from below
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinBlock {
    pub rect: Rect,
    pub has_coin: bool,
}

impl CoinBlock {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::square(x, y, BLOCK_SIZE),
            has_coin: true,
        }
    }

    /// Full -> Empty when the player's feet enter the landing band while rising
    pub fn try_hit(&mut self, player: &Rect, vel_y: f32, band: f32) -> bool {
        if !self.has_coin || !landing_overlap(player, vel_y, &self.rect, band) {
            return false;
        }
        self.has_coin = false;
        true
    }
}

/// Block that releases a key when hit from below
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclamationBlock {
    pub rect: Rect,
    pub color: KeyColor,
    pub has_key: bool,
}

impl ExclamationBlock {
    pub fn new(x: f32, y: f32, color: KeyColor) -> Self {
        Self {
            rect: Rect::square(x, y, BLOCK_SIZE),
            color,
            has_key: true,
        }
    }

    /// Full -> Empty; returns the key color on the transition
    pub fn try_hit(&mut self, player: &Rect, vel_y: f32, band: f32) -> Option<KeyColor> {
        if !self.has_key || !landing_overlap(player, vel_y, &self.rect, band) {
            return None;
        }
        self.has_key = false;
        Some(self.color)
    }

    /// Spawn point for the released key: centered, just above the block
    pub fn key_spawn_point(&self) -> Vec2 {
        Vec2::new(
            self.rect.x + (self.rect.w / 2.0).floor() - KEY_SIZE / 2.0,
            self.rect.y - KEY_SIZE,
        )
    }
}

/// Key released by an exclamation block; falls under gravity only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingKey {
    pub body: Body,
    pub color: KeyColor,
    pub collected: bool,
}

impl FallingKey {
    pub fn new(pos: Vec2, color: KeyColor) -> Self {
        Self {
            body: Body::new(pos, Vec2::splat(KEY_SIZE)),
            color,
            collected: false,
        }
    }

    /// InFlight -> Collected on full overlap with the player
    pub fn try_collect(&mut self, player: &Rect) -> bool {
        if self.collected || !self.body.rect().intersects(player) {
            return false;
        }
        self.collected = true;
        true
    }
}

/// Colored gate; solid until the matching key opens it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lock {
    pub rect: Rect,
    pub color: KeyColor,
    pub unlocked: bool,
}

impl Lock {
    pub fn new(x: f32, y: f32, color: KeyColor) -> Self {
        Self {
            rect: Rect::square(x, y, LOCK_SIZE),
            color,
            unlocked: false,
        }
    }

    /// Locked -> Unlocked; returns true only on the transition
    pub fn unlock(&mut self) -> bool {
        let changed = !self.unlocked;
        self.unlocked = true;
        changed
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        !self.unlocked
    }
}

/// Goal marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub rect: Rect,
    /// Set once the player touches it; never cleared
    pub reached: bool,
}

impl Flag {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::square(x, y, FLAG_SIZE),
            reached: false,
        }
    }

    /// Fires exactly once per level
    pub fn try_reach(&mut self, player: &Rect) -> bool {
        if self.reached || !self.rect.intersects(player) {
            return false;
        }
        self.reached = true;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub rect: Rect,
    pub kind: DecorationKind,
}

/// Things that happened during a tick, for audio and HUD consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { level: u32 },
    Jumped,
    CoinCollected,
    CoinBlockEmptied,
    KeyReleased { color: KeyColor },
    KeyCollected { color: KeyColor },
    LockOpened { color: KeyColor },
    PlayerHit,
    FellOut,
    LevelCompleted { level: u32 },
    GameBeaten,
}

/// All entities of the level being played
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    /// 1-based level index
    pub index: u32,
    /// World width of the level
    pub length: f32,
    pub ground_y: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    /// Uncollected coins only; collected coins are dropped
    pub coins: Vec<Coin>,
    pub coin_blocks: Vec<CoinBlock>,
    pub exclamation_blocks: Vec<ExclamationBlock>,
    /// At most one per level
    pub falling_key: Option<FallingKey>,
    pub locks: Vec<Lock>,
    pub flag: Flag,
    pub decorations: Vec<Decoration>,
    /// Coins (loose and from blocks) picked up on this level
    pub coins_collected: u32,
    /// Frames left on the "key collected" notice
    pub key_notice_ticks: u32,
}

impl LevelState {
    /// Build the live level from an assembled layout. Stateful objects are
    /// constructed here once and mutated in place afterwards.
    pub fn from_layout(layout: LevelLayout) -> Self {
        Self {
            index: layout.index,
            length: layout.length,
            ground_y: layout.ground_y,
            player: Player::spawn(),
            enemies: layout.enemies,
            platforms: layout.platforms,
            hazards: layout.hazards,
            coins: layout.coins,
            coin_blocks: layout.coin_blocks,
            exclamation_blocks: layout.exclamation_blocks,
            falling_key: None,
            locks: layout.locks,
            flag: layout.flag,
            decorations: layout.decorations,
            coins_collected: 0,
            key_notice_ticks: 0,
        }
    }

    /// Horizontal scroll offset, always derived from the player
    pub fn camera_x(&self, viewport_width: f32) -> f32 {
        (self.player.body.pos.x - viewport_width / 2.0).max(0.0)
    }

    /// Release a key from an exclamation block unless one is already out.
    /// Returns true if a key was spawned.
    pub fn spawn_key(&mut self, pos: Vec2, color: KeyColor) -> bool {
        if self.falling_key.is_some() {
            return false;
        }
        self.falling_key = Some(FallingKey::new(pos, color));
        true
    }

    /// Open every lock of `color`; returns how many changed state
    pub fn unlock(&mut self, color: KeyColor) -> usize {
        self.locks
            .iter_mut()
            .filter(|lock| lock.color == color)
            .map(|lock| lock.unlock())
            .filter(|&changed| changed)
            .count()
    }

    /// True if the level has a lock of `color` and all of them are open
    pub fn is_unlocked(&self, color: KeyColor) -> bool {
        let mut matching = self.locks.iter().filter(|lock| lock.color == color).peekable();
        matching.peek().is_some() && matching.all(|lock| lock.unlocked)
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next consumer; advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(
            self.seed
                .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        );
        self.stream += 1;
        rng
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    /// Current 1-based level index
    pub level_index: u32,
    /// Cumulative across forward progress
    pub score: u64,
    /// Collected key colors, carried across level changes
    pub keyring: BTreeSet<KeyColor>,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub level: LevelState,
    /// Events produced by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a session on level 1
    pub fn new(seed: u64, tuning: Tuning, provider: &dyn LevelContentProvider) -> Self {
        Self::starting_at(seed, tuning, provider, 1)
    }

    /// Start a session on an arbitrary level
    pub fn starting_at(
        seed: u64,
        tuning: Tuning,
        provider: &dyn LevelContentProvider,
        level_index: u32,
    ) -> Self {
        let mut rng_state = RngState::new(seed);
        let level_index = level_index.max(1);
        let layout = level::assemble(level_index, &tuning, provider, &mut rng_state.next_rng());
        let mut state = Self {
            seed,
            rng_state,
            tuning,
            level_index,
            score: 0,
            keyring: BTreeSet::new(),
            phase: GamePhase::Playing,
            time_ticks: 0,
            level: LevelState::from_layout(layout),
            events: Vec::new(),
        };
        state.events.push(GameEvent::LevelLoaded { level: level_index });
        state
    }

    /// Re-run level assembly for `index` and replace every per-level entity
    pub fn load_level(&mut self, index: u32, provider: &dyn LevelContentProvider) {
        let index = index.max(1);
        let mut rng = self.rng_state.next_rng();
        let layout = level::assemble(index, &self.tuning, provider, &mut rng);
        self.level_index = index;
        self.level = LevelState::from_layout(layout);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::LevelLoaded { level: index });
        log::info!("Level {} loaded (score {})", index, self.score);
    }

    /// LevelComplete -> next level, with the completion bonus.
    /// Score and keyring carry forward.
    pub fn advance_level(&mut self, provider: &dyn LevelContentProvider) {
        self.score += self.tuning.level_bonus;
        self.load_level(self.level_index + 1, provider);
    }

    /// LevelComplete -> previous level, no bonus. Returns false on level 1.
    pub fn retreat_level(&mut self, provider: &dyn LevelContentProvider) -> bool {
        if self.level_index <= 1 {
            return false;
        }
        self.load_level(self.level_index - 1, provider);
        true
    }

    /// GameOver/Beaten -> replay the current level from a clean slate
    pub fn restart_level(&mut self, provider: &dyn LevelContentProvider) {
        self.score = 0;
        self.keyring.clear();
        self.load_level(self.level_index, provider);
    }

    /// Full reset back to level 1
    pub fn return_home(&mut self, provider: &dyn LevelContentProvider) {
        self.score = 0;
        self.keyring.clear();
        self.load_level(1, provider);
    }

    pub fn camera_x(&self) -> f32 {
        self.level.camera_x(self.tuning.viewport_width)
    }

    pub fn is_final_level(&self) -> bool {
        self.level_index >= self.tuning.final_level
    }
}
