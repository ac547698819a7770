//! Fixed timestep simulation tick
//!
//! One call advances the session by one frame: object triggers, motion,
//! contact checks, then the phase transition check. Operator commands
//! (next/previous level, restart, quit) are handled here too.

use glam::Vec2;

use super::collision::Solid;
use super::motion;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState, KeyColor, LevelState};
use crate::level::LevelContentProvider;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Replay the current level (GameOver / Beaten only)
    pub restart: bool,
    /// Advance after completing a level
    pub next_level: bool,
    /// Go back one level after completing a level
    pub prev_level: bool,
    /// Back to level 1 with a clean slate (LevelComplete only)
    pub home: bool,
    /// Debug hotkey digit while playing: 1..=9 jumps to that level,
    /// 0 to the final level
    pub debug_level: Option<u32>,
    /// Leave the game; accepted in every phase
    pub quit: bool,
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput, provider: &dyn LevelContentProvider) {
    state.events.clear();

    if input.quit {
        if state.phase != GamePhase::Exited {
            log::info!("Quit at level {} with score {}", state.level_index, state.score);
            state.phase = GamePhase::Exited;
        }
        return;
    }

    match state.phase {
        GamePhase::Exited => {}

        GamePhase::Playing => {
            if let Some(digit) = input.debug_level {
                let level = match digit {
                    0 => state.tuning.final_level,
                    n => n,
                };
                log::debug!("Debug jump to level {}", level);
                state.load_level(level, provider);
                return;
            }
            state.time_ticks += 1;
            step_playing(state, input);
        }

        GamePhase::LevelComplete => {
            if input.next_level {
                state.advance_level(provider);
            } else if input.prev_level {
                state.retreat_level(provider);
            } else if input.home {
                state.return_home(provider);
            }
        }

        GamePhase::GameOver | GamePhase::Beaten => {
            if input.restart {
                state.restart_level(provider);
            }
        }
    }
}

/// Solids the player collides with this frame
fn player_solids(level: &LevelState) -> Vec<Solid> {
    level
        .platforms
        .iter()
        .map(|p| Solid::full(p.rect))
        .chain(
            level
                .locks
                .iter()
                .filter(|lock| lock.is_solid())
                .map(|lock| Solid::full(lock.rect)),
        )
        .chain(level.coin_blocks.iter().map(|b| Solid::one_sided(b.rect)))
        .chain(
            level
                .exclamation_blocks
                .iter()
                .map(|b| Solid::one_sided(b.rect)),
        )
        .collect()
}

/// Surfaces a falling key can settle on
fn key_surfaces(level: &LevelState) -> Vec<Rect> {
    level
        .platforms
        .iter()
        .map(|p| p.rect)
        .chain(
            level
                .locks
                .iter()
                .filter(|lock| lock.is_solid())
                .map(|lock| lock.rect),
        )
        .collect()
}

fn step_playing(state: &mut GameState, input: &TickInput) {
    let GameState {
        tuning,
        level,
        level_index,
        score,
        keyring,
        phase,
        events,
        ..
    } = state;

    level.key_notice_ticks = level.key_notice_ticks.saturating_sub(1);

    // --- Object triggers, against the player's position at frame start ---
    let player_rect = level.player.rect();
    let player_vy = level.player.body.vel.y;

    for block in level.coin_blocks.iter_mut() {
        if block.try_hit(&player_rect, player_vy, tuning.landing_band) {
            *score += tuning.coin_value;
            level.coins_collected += 1;
            events.push(GameEvent::CoinBlockEmptied);
        }
    }

    for coin in level.coins.iter_mut() {
        if coin.try_collect(&player_rect) {
            *score += tuning.coin_value;
            level.coins_collected += 1;
            events.push(GameEvent::CoinCollected);
        }
    }

    let released: Vec<(Vec2, KeyColor)> = level
        .exclamation_blocks
        .iter_mut()
        .filter_map(|block| {
            let color = block.try_hit(&player_rect, player_vy, tuning.landing_band)?;
            Some((block.key_spawn_point(), color))
        })
        .collect();
    for (pos, color) in released {
        if level.spawn_key(pos, color) {
            events.push(GameEvent::KeyReleased { color });
        }
    }
    debug_assert!(
        level.falling_key.is_none() || level.exclamation_blocks.iter().any(|b| !b.has_key),
        "key in flight without an emptied exclamation block"
    );

    let surfaces = key_surfaces(level);
    if let Some(key) = level.falling_key.as_mut() {
        motion::step_key(key, &surfaces, tuning);
        if key.try_collect(&player_rect) {
            keyring.insert(key.color);
            level.key_notice_ticks = tuning.key_notice_ticks;
            events.push(GameEvent::KeyCollected { color: key.color });
            log::info!("Collected {} key", key.color.as_str());
        }
    }

    for &color in keyring.iter() {
        if level.unlock(color) > 0 {
            events.push(GameEvent::LockOpened { color });
            log::debug!("Opened {} lock", color.as_str());
        }
    }

    // --- Motion ---
    let solids = player_solids(level);
    let step = motion::step_player(&mut level.player, input, &solids, tuning);
    if step.jumped {
        events.push(GameEvent::Jumped);
    }

    for enemy in level.enemies.iter_mut() {
        motion::step_enemy(enemy, &level.platforms, tuning);
    }

    level.coins.retain(|coin| !coin.collected);

    // --- Transitions ---
    let player_rect = level.player.rect();
    if level
        .enemies
        .iter()
        .any(|enemy| enemy.rect().intersects(&player_rect))
    {
        *phase = GamePhase::GameOver;
        events.push(GameEvent::PlayerHit);
        log::info!("Game over on level {}: hit by enemy", level_index);
        return;
    }

    if step.out_of_bounds {
        *phase = GamePhase::GameOver;
        events.push(GameEvent::FellOut);
        log::info!("Game over on level {}: fell out of the world", level_index);
        return;
    }

    if level.flag.try_reach(&player_rect) {
        events.push(GameEvent::LevelCompleted {
            level: *level_index,
        });
        if *level_index >= tuning.final_level {
            *phase = GamePhase::Beaten;
            events.push(GameEvent::GameBeaten);
            log::info!("Final level {} complete, score {}", level_index, score);
        } else {
            *phase = GamePhase::LevelComplete;
            log::info!("Level {} complete, score {}", level_index, score);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::consts::*;
    use crate::level::FailingProvider;
    use crate::sim::state::{CoinBlock, ExclamationBlock, FallingKey, Player};
    use crate::tuning::Tuning;

    fn state_at(level: u32) -> GameState {
        let mut state = GameState::starting_at(12345, Tuning::default(), &FailingProvider, level);
        state.level.enemies.clear();
        state
    }

    /// Park the player on the ground at `x`
    fn ground_player(x: f32) -> Player {
        let mut player = Player::new(Vec2::new(x, GROUND_Y - PLAYER_SIZE));
        player.on_ground = true;
        player
    }

    #[test]
    fn test_coin_block_hit_from_below_scores() {
        let mut state = state_at(1);
        state.level.coin_blocks = vec![CoinBlock::new(200.0, 92.0)];
        // Feet at y = 100, inside the block's top band, rising
        state.level.player = Player::new(Vec2::new(200.0, 100.0 - PLAYER_SIZE));
        state.level.player.body.vel.y = -15.0;

        tick(&mut state, &TickInput::default(), &FailingProvider);

        assert!(!state.level.coin_blocks[0].has_coin);
        assert_eq!(state.score, 100);
        assert_eq!(state.level.coins_collected, 1);
        assert!(state.events.contains(&GameEvent::CoinBlockEmptied));
    }

    #[test]
    fn test_flag_completes_level_once() {
        let mut state = state_at(1);
        let flag = state.level.flag.rect;
        state.level.player = ground_player(flag.x);

        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.events, vec![GameEvent::LevelCompleted { level: 1 }]);

        // Overlap persists but nothing fires again
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), &FailingProvider);
            assert_eq!(state.phase, GamePhase::LevelComplete);
            assert!(state.events.is_empty());
        }

        let next = TickInput {
            next_level: true,
            ..Default::default()
        };
        tick(&mut state, &next, &FailingProvider);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_index, 2);
        assert_eq!(state.score, 500);
    }

    #[test]
    fn test_final_level_is_beaten() {
        let mut state = state_at(10);
        let flag = state.level.flag.rect;
        state.level.player = ground_player(flag.x);
        state.score = 1200;

        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert_eq!(state.phase, GamePhase::Beaten);
        assert!(state.events.contains(&GameEvent::GameBeaten));

        // Next is not accepted once beaten; restart replays level 10 from scratch
        let next = TickInput {
            next_level: true,
            ..Default::default()
        };
        tick(&mut state, &next, &FailingProvider);
        assert_eq!(state.phase, GamePhase::Beaten);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, &FailingProvider);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_index, 10);
        assert_eq!(state.score, 0);
    }

    /// Player rising with feet 5px into the top band of a block at y = 300
    fn rising_under(x: f32) -> Player {
        let mut player = Player::new(Vec2::new(x, 305.0 - PLAYER_SIZE));
        player.body.vel.y = -5.0;
        player
    }

    #[test]
    fn test_key_released_under_player_is_picked_up_at_once() {
        let mut state = state_at(4);
        state.level.coin_blocks.clear();
        state.level.exclamation_blocks = vec![
            ExclamationBlock::new(300.0, 300.0, KeyColor::Red),
            ExclamationBlock::new(600.0, 300.0, KeyColor::Blue),
        ];

        // The key appears just above the block, inside the player's box
        state.level.player = rising_under(300.0);
        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert!(!state.level.exclamation_blocks[0].has_key);
        assert_eq!(
            &state.events[..2],
            &[
                GameEvent::KeyReleased { color: KeyColor::Red },
                GameEvent::KeyCollected { color: KeyColor::Red },
            ]
        );
        assert!(state.keyring.contains(&KeyColor::Red));
        assert!(state.level.falling_key.as_ref().unwrap().collected);

        // A collected key still occupies the level's single key slot
        state.level.player = rising_under(600.0);
        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert!(!state.level.exclamation_blocks[1].has_key);
        assert!(state.events.is_empty());
        assert_eq!(state.level.falling_key.as_ref().unwrap().color, KeyColor::Red);
        assert!(!state.keyring.contains(&KeyColor::Blue));
    }

    #[test]
    fn test_repeated_block_hits_keep_one_key_in_flight() {
        let mut state = state_at(4);
        state.level.coin_blocks.clear();
        let released = ExclamationBlock::new(1000.0, 300.0, KeyColor::Red);
        let spawn = released.key_spawn_point();
        state.level.exclamation_blocks = vec![
            ExclamationBlock {
                has_key: false,
                ..released
            },
            ExclamationBlock::new(600.0, 300.0, KeyColor::Blue),
        ];
        // Red key already falling, well away from the player
        state.level.falling_key = Some(FallingKey::new(spawn, KeyColor::Red));

        // Two consecutive frames with the feet inside the band of the second block
        state.level.player = rising_under(600.0);
        for _ in 0..2 {
            tick(&mut state, &TickInput::default(), &FailingProvider);
            assert!(!state.level.exclamation_blocks[1].has_key);
            assert!(!state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::KeyReleased { .. })));

            let key = state.level.falling_key.as_ref().unwrap();
            assert_eq!(key.color, KeyColor::Red);
            assert!(!key.collected);
        }
        assert!(state.keyring.is_empty());
    }

    #[test]
    fn test_key_collection_opens_lock() {
        let mut state = state_at(4);
        let color = state.level.locks[0].color;
        let player = ground_player(200.0);
        // As if the level's exclamation block had just released it
        state.level.exclamation_blocks[0].has_key = false;
        state.level.falling_key = Some(FallingKey::new(player.body.pos, color));
        state.level.player = player;

        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert!(state.keyring.contains(&color));
        assert!(state.level.is_unlocked(color));
        assert_eq!(state.level.key_notice_ticks, 60);
        assert!(state.events.contains(&GameEvent::KeyCollected { color }));
        assert!(state.events.contains(&GameEvent::LockOpened { color }));

        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert_eq!(state.level.key_notice_ticks, 59);
        assert!(state.level.falling_key.as_ref().unwrap().collected);
    }

    #[test]
    fn test_keyring_opens_locks_on_later_levels() {
        let mut state = state_at(4);
        let color = state.level.locks[0].color;
        state.keyring.insert(color);
        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert!(state.level.is_unlocked(color));
    }

    #[test]
    fn test_enemy_contact_is_game_over_and_restart_resets() {
        let mut state = state_at(2);
        state.score = 700;
        state.keyring.insert(KeyColor::Yellow);
        state.level.player = ground_player(600.0);
        state.level.enemies = vec![crate::sim::state::Enemy::new(
            Vec2::new(610.0, GROUND_Y - ENEMY_SIZE),
            crate::sim::state::EnemyKind::Slime,
            1.0,
        )];

        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::PlayerHit));

        // Movement input is ignored while dead
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, &FailingProvider);
        assert_eq!(state.phase, GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, &FailingProvider);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_index, 2);
        assert_eq!(state.score, 0);
        assert!(state.keyring.is_empty());
        assert!(!state.level.enemies.is_empty());
    }

    #[test]
    fn test_falling_out_is_game_over() {
        let mut state = state_at(1);
        state.level.player = Player::new(Vec2::new(100.0, SCREEN_HEIGHT - 5.0));
        state.level.player.body.vel.y = 10.0;
        tick(&mut state, &TickInput::default(), &FailingProvider);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::FellOut));
    }

    #[test]
    fn test_previous_level_and_home() {
        let mut state = state_at(3);
        state.score = 900;
        state.phase = GamePhase::LevelComplete;
        let prev = TickInput {
            prev_level: true,
            ..Default::default()
        };
        tick(&mut state, &prev, &FailingProvider);
        assert_eq!(state.level_index, 2);
        assert_eq!(state.score, 900);

        state.phase = GamePhase::LevelComplete;
        let home = TickInput {
            home: true,
            ..Default::default()
        };
        tick(&mut state, &home, &FailingProvider);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_debug_jump_keeps_score() {
        let mut state = state_at(1);
        state.score = 400;
        let jump = TickInput {
            debug_level: Some(5),
            ..Default::default()
        };
        tick(&mut state, &jump, &FailingProvider);
        assert_eq!(state.level_index, 5);
        assert_eq!(state.score, 400);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_debug_digit_zero_selects_final_level() {
        let mut state = state_at(2);
        let jump = TickInput {
            debug_level: Some(0),
            ..Default::default()
        };
        tick(&mut state, &jump, &FailingProvider);
        assert_eq!(state.level_index, 10);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::LevelLoaded { level: 10 }]);
    }

    #[test]
    fn test_quit_from_any_phase() {
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        for phase in [
            GamePhase::Playing,
            GamePhase::LevelComplete,
            GamePhase::GameOver,
            GamePhase::Beaten,
        ] {
            let mut state = state_at(1);
            state.phase = phase;
            tick(&mut state, &quit, &FailingProvider);
            assert_eq!(state.phase, GamePhase::Exited);

            let restart = TickInput {
                restart: true,
                ..Default::default()
            };
            tick(&mut state, &restart, &FailingProvider);
            assert_eq!(state.phase, GamePhase::Exited);
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Tuning::default(), &FailingProvider);
        let mut state2 = GameState::new(99999, Tuning::default(), &FailingProvider);
        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, &FailingProvider);
                tick(&mut state2, input, &FailingProvider);
            }
        }
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.level.player.body, state2.level.player.body);
        assert_eq!(state1.score, state2.score);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(left, right, jump)| TickInput {
            left,
            right,
            jump,
            ..Default::default()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_object_flags_are_monotone(
            seed in any::<u64>(),
            level in 1u32..=8,
            inputs in prop::collection::vec(arb_input(), 1..400),
        ) {
            let mut state = GameState::starting_at(seed, Tuning::default(), &FailingProvider, level);
            let mut emptied_blocks = vec![false; state.level.coin_blocks.len()];
            let mut emptied_ex = vec![false; state.level.exclamation_blocks.len()];
            let mut key_taken = false;
            let mut opened = vec![false; state.level.locks.len()];

            for input in &inputs {
                tick(&mut state, input, &FailingProvider);
                if state.phase != GamePhase::Playing {
                    break;
                }
                for (seen, block) in emptied_blocks.iter_mut().zip(&state.level.coin_blocks) {
                    prop_assert!(!(*seen && block.has_coin));
                    *seen |= !block.has_coin;
                }
                for (seen, block) in emptied_ex.iter_mut().zip(&state.level.exclamation_blocks) {
                    prop_assert!(!(*seen && block.has_key));
                    *seen |= !block.has_key;
                }
                for (seen, lock) in opened.iter_mut().zip(&state.level.locks) {
                    prop_assert!(!(*seen && !lock.unlocked));
                    *seen |= lock.unlocked;
                }
                if let Some(key) = &state.level.falling_key {
                    prop_assert!(!(key_taken && !key.collected));
                    key_taken |= key.collected;
                    // A key only exists once some exclamation block has emptied
                    prop_assert!(state.level.exclamation_blocks.iter().any(|b| !b.has_key));
                }
            }
        }
    }
}
