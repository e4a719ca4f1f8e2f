//! Read-only frame snapshot for renderers
//!
//! Built once per frame from `GameState`. Only things a renderer may draw are
//! included: dead traps, hidden surprise traps, collected buffs and idle
//! bullet slots are left out.

use serde::Serialize;

use super::geom::Rect;
use super::state::{BuffKind, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuffSprite {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub kind: BuffKind,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub arena: Rect,
    pub player: Rect,
    pub platforms: Vec<Rect>,
    /// Live roaming traps
    pub traps: Vec<Rect>,
    /// Visible surprise traps
    pub surprise_traps: Vec<Rect>,
    /// Buffs still on the field
    pub buffs: Vec<BuffSprite>,
    /// Active bullets
    pub bullets: Vec<Rect>,
    pub exit: Rect,
    pub score: i32,
    pub defense_active: bool,
    pub shooter_active: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let world = &state.world;

        Self {
            frame: state.frame,
            phase: state.phase,
            arena: Rect::new(0.0, 0.0, world.arena.width, world.arena.height),
            player: world.player.rect(),
            platforms: world.platforms.iter().map(|p| p.rect).collect(),
            traps: world
                .traps
                .iter()
                .filter(|t| t.alive)
                .map(|t| t.rect())
                .collect(),
            surprise_traps: world
                .surprise_traps
                .iter()
                .filter(|t| t.visible)
                .map(|t| t.rect())
                .collect(),
            buffs: world
                .buffs
                .iter()
                .filter(|b| b.on_field())
                .map(|b| BuffSprite {
                    x: b.pos.x,
                    y: b.pos.y,
                    radius: b.radius,
                    kind: b.kind,
                })
                .collect(),
            bullets: world
                .bullets
                .active()
                .map(|(_, b)| b.rect())
                .collect(),
            exit: world.exit,
            score: state.session.score,
            defense_active: state.session.defense_active,
            shooter_active: state.session.shooter_active,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
