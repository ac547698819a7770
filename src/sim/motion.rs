//! Entity motion model
//!
//! Gravity, velocity integration and collision response for the three kinds
//! of dynamic body: the player, enemies and the falling key. All quantities are
//! per frame.

use super::collision::{Contact, Solid, crossed_top, is_supported, land_on, resolve_vertical};
use super::rect::Rect;
use super::state::{Enemy, Facing, FallingKey, Platform, Player, PlayerAnim};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// What happened to the player during one motion step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub jumped: bool,
    /// Fell below the viewport
    pub out_of_bounds: bool,
}

/// Apply input, gravity and solid collisions to the player
pub fn step_player(
    player: &mut Player,
    input: &TickInput,
    solids: &[Solid],
    tuning: &Tuning,
) -> PlayerStep {
    let mut step = PlayerStep::default();

    if input.left {
        player.body.vel.x = -tuning.run_speed;
        player.facing = Facing::Left;
    } else if input.right {
        player.body.vel.x = tuning.run_speed;
        player.facing = Facing::Right;
    } else {
        player.body.vel.x = 0.0;
    }

    if input.jump && player.on_ground {
        player.body.vel.y = -tuning.jump_speed;
        player.on_ground = false;
        step.jumped = true;
    }

    if !player.on_ground {
        player.body.vel.y = (player.body.vel.y + tuning.gravity).min(tuning.terminal_velocity);
    }

    let prev_bottom = player.body.bottom();
    player.body.pos += player.body.vel;
    player.on_ground = false;

    for solid in solids {
        if !player.body.rect().intersects(&solid.rect) {
            continue;
        }
        if resolve_vertical(&mut player.body, solid, prev_bottom) == Contact::Landed {
            player.on_ground = true;
        }
    }

    if !player.on_ground
        && player.body.vel.y >= 0.0
        && is_supported(&player.rect(), solids.iter().map(|s| &s.rect))
    {
        player.on_ground = true;
        player.body.vel.y = 0.0;
    }

    player.anim = PlayerAnim::derive(player.on_ground, player.body.vel);
    step.out_of_bounds = player.body.pos.y > tuning.viewport_height;
    step
}

/// Patrol an enemy across the platform set.
///
/// Platform overlap is tested with the enemy's shrunk hitbox. A walking enemy
/// (no vertical speed) that overlaps a platform turns around; a falling one is
/// placed on top instead.
pub fn step_enemy(enemy: &mut Enemy, platforms: &[Platform], tuning: &Tuning) {
    if enemy.is_frozen() {
        return;
    }

    let body = &mut enemy.body;
    if !enemy.grounded {
        body.vel.y = (body.vel.y + tuning.gravity).min(tuning.terminal_velocity);
    }

    let prev_bottom = body.bottom();
    body.pos += body.vel;
    enemy.grounded = false;

    let mut turned = false;
    for platform in platforms {
        let hitbox = body.rect().shrunk(tuning.enemy_hitbox_scale);
        if !hitbox.intersects(&platform.rect) {
            continue;
        }
        // Turn before any vertical correction, at most once per frame
        if body.vel.y == 0.0 && !turned {
            body.vel.x = -body.vel.x;
            turned = true;
        }
        let solid = Solid::full(platform.rect);
        if resolve_vertical(body, &solid, prev_bottom) == Contact::Landed {
            enemy.grounded = true;
        }
    }

    if !enemy.grounded
        && body.vel.y == 0.0
        && is_supported(&body.rect(), platforms.iter().map(|p| &p.rect))
    {
        enemy.grounded = true;
    }
}

/// Drop a released key until it settles on the first surface it crosses
pub fn step_key(key: &mut FallingKey, surfaces: &[Rect], tuning: &Tuning) {
    if key.collected {
        return;
    }

    let body = &mut key.body;
    body.vel.y = (body.vel.y + tuning.gravity).min(tuning.terminal_velocity);
    body.pos.y += body.vel.y;

    // Band never narrower than this frame's drop, so fast keys cannot tunnel
    let band = tuning.key_landing_band.max(body.vel.y + 1.0);
    let rect = body.rect();
    if let Some(surface) = surfaces
        .iter()
        .find(|surface| crossed_top(&rect, surface, band))
    {
        land_on(body, surface);
    }
}
