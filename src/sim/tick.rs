//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame.

use super::physics::{self, Horizontal};
use super::state::{GamePhase, GameState, SessionOutcome};
use super::{interaction, projectile, scheduler};

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held movement direction
    pub horizontal: Horizontal,
    /// Jump pressed this frame
    pub jump: bool,
    /// Fire pressed this frame
    pub fire: bool,
    /// Quit requested this frame
    pub quit: bool,
}

/// Advance the game state by one frame
///
/// Order: input, physics, surprise traps, bullets, player interactions, then
/// terminal conditions. Bullets resolve before the player touches anything,
/// so a trap shot this frame can't also hurt or be absorbed by the player.
///
/// Returns the outcome once the session has ended.
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<SessionOutcome> {
    if let GamePhase::Over(outcome) = state.phase {
        return Some(outcome);
    }

    state.events.clear();
    state.frame += 1;

    // Input
    physics::apply_intent(&mut state.world.player, input.horizontal, input.jump);
    if input.fire {
        projectile::fire(state);
    }

    physics::step(state);
    scheduler::step(state);
    projectile::step(state);

    let exit = interaction::step(state);
    let outcome = exit.or(input.quit.then_some(SessionOutcome::Quit));

    if let Some(outcome) = outcome {
        log::info!(
            "Session over after {} frames: {outcome:?} (score {})",
            state.frame,
            state.session.score
        );
        state.phase = GamePhase::Over(outcome);
    }
    outcome
}
