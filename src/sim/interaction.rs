//! Interaction resolver
//!
//! Game-rule consequences of overlaps between the player and everything else:
//! hazards (through an ordered list of response policies), buffs and the exit.

use super::geom::circle_reaches;
use super::state::{BuffKind, DestroyedBy, GameEvent, GameState, HazardRef, SessionOutcome};
use crate::consts::*;

/// A way of answering a hazard hit, tried in `HAZARD_POLICIES` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardPolicy {
    /// Shooter buff up: destroy the hazard, spend the buff
    Shooter,
    /// Defense buff up: ignore the hit, spend the buff
    Defense,
    /// Back to spawn with a one point penalty
    Reset,
}

/// Evaluated top to bottom, first applicable policy wins
pub const HAZARD_POLICIES: [HazardPolicy; 3] =
    [HazardPolicy::Shooter, HazardPolicy::Defense, HazardPolicy::Reset];

impl HazardPolicy {
    fn applies(self, state: &GameState) -> bool {
        match self {
            HazardPolicy::Shooter => state.session.shooter_active,
            HazardPolicy::Defense => state.session.defense_active,
            HazardPolicy::Reset => true,
        }
    }

    fn apply(self, state: &mut GameState, hazard: HazardRef) {
        match self {
            HazardPolicy::Shooter => {
                state.session.shooter_active = false;
                destroy_hazard(state, hazard);
                log::info!("{hazard:?} destroyed by shooter buff");
                state.session.hazards_destroyed += 1;
                state.emit(GameEvent::HazardDestroyed {
                    hazard,
                    by: DestroyedBy::ShooterBuff,
                });
            }
            HazardPolicy::Defense => {
                state.session.defense_active = false;
                log::info!("{hazard:?} hit absorbed by defense buff");
                state.emit(GameEvent::HazardAbsorbed { hazard });
            }
            HazardPolicy::Reset => {
                reset_player(state);
                state.session.score -= 1;
                state.session.hits += 1;
                log::info!(
                    "Hit by {hazard:?}, back to spawn (score {})",
                    state.session.score
                );
                state.emit(GameEvent::PlayerHit { hazard });
            }
        }
    }
}

/// Send the player back to spawn. Score, buffs and hazards are untouched.
pub fn reset_player(state: &mut GameState) {
    let spawn = state.world.spawn;
    state.world.player.reset(spawn);
}

fn destroy_hazard(state: &mut GameState, hazard: HazardRef) {
    match hazard {
        HazardRef::Trap(i) => state.world.traps[i].destroy(),
        HazardRef::SurpriseTrap(i) => state.world.surprise_traps[i].hide(),
    }
}

/// First hazard touching the player: live traps first, then visible surprise traps
pub fn first_hazard_hit(state: &GameState) -> Option<HazardRef> {
    let player = state.world.player.rect();

    let trap = state
        .world
        .traps
        .iter()
        .position(|t| t.alive && t.rect().overlaps(&player))
        .map(HazardRef::Trap);

    trap.or_else(|| {
        state
            .world
            .surprise_traps
            .iter()
            .position(|t| t.visible && t.rect().overlaps(&player))
            .map(HazardRef::SurpriseTrap)
    })
}

/// Answer at most one hazard hit this frame
pub fn resolve_hazards(state: &mut GameState) -> Option<HazardPolicy> {
    let hazard = first_hazard_hit(state)?;
    let policy = HAZARD_POLICIES.into_iter().find(|p| p.applies(state))?;
    policy.apply(state, hazard);
    Some(policy)
}

/// Collect every buff the player touches; effects fire only from unspent buffs
pub fn resolve_buffs(state: &mut GameState) {
    for buff in &mut state.world.buffs {
        buff.settle();
    }

    let center = state.world.player.center();
    for slot in 0..state.world.buffs.len() {
        let buff = &mut state.world.buffs[slot];
        if !buff.on_field() || !circle_reaches(buff.pos, buff.radius, center, PLAYER_WIDTH / 2.0) {
            continue;
        }
        let kind = buff.kind;
        let effect = buff.collect();

        if let Some(kind) = effect {
            apply_buff(state, kind);
        } else {
            log::debug!("{kind:?} buff collected again, effect already spent");
        }
        state.emit(GameEvent::BuffCollected {
            slot,
            kind,
            applied: effect.is_some(),
        });
    }
}

fn apply_buff(state: &mut GameState, kind: BuffKind) {
    let session = &mut state.session;
    match kind {
        BuffKind::Score => {
            session.score += SCORE_BUFF_BONUS;
            log::info!("Score buff: +{SCORE_BUFF_BONUS} (score {})", session.score);
        }
        BuffKind::Defense => {
            session.defense_active = true;
            log::info!("Defense buff collected, next hit is absorbed");
        }
        BuffKind::Shooter => {
            session.shooter_active = true;
            log::info!("Shooter buff collected, next hazard touched is destroyed");
        }
    }
}

/// Win or lose on touching the exit
pub fn check_exit(state: &mut GameState) -> Option<SessionOutcome> {
    if !state.world.player.rect().overlaps(&state.world.exit) {
        return None;
    }
    let outcome = if state.session.score < state.session.win_threshold {
        SessionOutcome::Lose
    } else {
        SessionOutcome::Win
    };
    log::info!(
        "Exit reached with score {} (needed {}): {outcome:?}",
        state.session.score,
        state.session.win_threshold
    );
    state.emit(GameEvent::ExitReached { outcome });
    Some(outcome)
}

/// Interaction phase of a frame
pub fn step(state: &mut GameState) -> Option<SessionOutcome> {
    resolve_hazards(state);
    resolve_buffs(state);
    check_exit(state)
}
