//! Player integration and arena motion
//!
//! Gravity, platform landing (with carrying on moving platforms), arena
//! clamping, plus the scripted motion of moving platforms and roaming traps.

use super::state::{GameEvent, GameState, Platform, Player, Trap};
use crate::consts::*;
use crate::layout::ArenaSize;

/// Horizontal movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Horizontal {
    Left,
    #[default]
    None,
    Right,
}

impl Horizontal {
    pub fn velocity(self) -> f32 {
        match self {
            Horizontal::Left => -PLAYER_SPEED,
            Horizontal::None => 0.0,
            Horizontal::Right => PLAYER_SPEED,
        }
    }
}

/// Apply held movement and a jump request
///
/// Jumps only count while standing on something; airborne requests are dropped.
pub fn apply_intent(player: &mut Player, horizontal: Horizontal, jump: bool) -> bool {
    player.vel.x = horizontal.velocity();
    if jump && player.on_ground {
        player.vel.y = JUMP_STRENGTH;
        true
    } else {
        false
    }
}

/// What happened to the player this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// No platform under the player
    Airborne,
    /// Resting on platform slot `usize`
    OnPlatform(usize),
    /// Dropped out of the arena and went back to spawn
    FellOut,
}

/// Integrate the player for one frame against `platforms`
///
/// Only the first overlapping platform (slot order) is resolved, and it always
/// puts the player on top of it.
pub fn integrate_player(
    player: &mut Player,
    platforms: &[Platform],
    arena: ArenaSize,
    spawn: glam::Vec2,
) -> Landing {
    player.vel.y = (player.vel.y + GRAVITY).min(MAX_VELOCITY);
    player.pos += player.vel;

    player.on_ground = false;
    let mut landing = Landing::Airborne;

    let rect = player.rect();
    if let Some((index, platform)) = platforms
        .iter()
        .enumerate()
        .find(|(_, p)| rect.overlaps(&p.rect))
    {
        player.pos.y = platform.rect.y - PLAYER_HEIGHT;
        player.vel.y = 0.0;
        player.on_ground = true;
        if platform.is_moving() {
            player.pos.x += platform.vel_x;
        }
        landing = Landing::OnPlatform(index);
    }

    // Lower bound wins if the arena is narrower than the player
    player.pos.x = player.pos.x.min(arena.width - PLAYER_WIDTH).max(0.0);

    if player.pos.y > arena.height {
        player.reset(spawn);
        landing = Landing::FellOut;
    }
    landing
}

/// Move a platform along its band, turning around when the leading edge reaches a bound
pub fn advance_platform(platform: &mut Platform) {
    let Some(band) = platform.travel else {
        return;
    };
    platform.rect.x += platform.vel_x;

    let leading_left = platform.vel_x < 0.0 && platform.rect.x <= band.min_x;
    let leading_right = platform.vel_x > 0.0 && platform.rect.right() >= band.max_x;
    if leading_left || leading_right {
        platform.vel_x = -platform.vel_x;
    }
}

/// Move a live trap, bouncing off the arena edges axis by axis
pub fn advance_trap(trap: &mut Trap, arena: ArenaSize) {
    if !trap.alive {
        return;
    }
    trap.pos += trap.vel;

    let out_x = (trap.vel.x < 0.0 && trap.pos.x < 0.0)
        || (trap.vel.x > 0.0 && trap.pos.x + trap.size > arena.width);
    if out_x {
        trap.vel.x = -trap.vel.x;
    }
    let out_y = (trap.vel.y < 0.0 && trap.pos.y < 0.0)
        || (trap.vel.y > 0.0 && trap.pos.y + trap.size > arena.height);
    if out_y {
        trap.vel.y = -trap.vel.y;
    }
}

/// Physics phase of a frame: player first, then the moving scenery
pub fn step(state: &mut GameState) {
    let world = &mut state.world;
    let landing = integrate_player(&mut world.player, &world.platforms, world.arena, world.spawn);

    for platform in &mut world.platforms {
        advance_platform(platform);
    }
    let arena = world.arena;
    for trap in &mut world.traps {
        advance_trap(trap, arena);
    }

    if landing == Landing::FellOut {
        log::info!("Player fell out of the arena, back to spawn");
        state.session.falls += 1;
        state.emit(GameEvent::PlayerFell);
    }
}
