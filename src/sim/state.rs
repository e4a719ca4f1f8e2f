//! World state and core simulation types
//!
//! Entity tables are fixed-order slot vectors. Slot order is iteration order,
//! which keeps first-match collision resolution deterministic.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::projectile::BulletPool;
use super::scheduler::HazardScheduler;
use crate::consts::*;
use crate::layout::{ArenaSize, Layout, TravelBand};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// Reached the exit at or above the score threshold
    Win,
    /// Reached the exit below the score threshold
    Lose,
    /// Quit requested by the input collaborator
    Quit,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Terminal, further ticks are no-ops
    Over(SessionOutcome),
}

/// The player-controlled box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Set only by a platform landing resolved this frame
    pub on_ground: bool,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            on_ground: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0)
    }

    /// Back to spawn, at rest
    pub fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
    }
}

/// A static or moving platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Horizontal velocity (0 for static platforms)
    pub vel_x: f32,
    /// Oscillation band, present only on moving platforms
    pub travel: Option<TravelBand>,
}

impl Platform {
    pub fn is_moving(&self) -> bool {
        self.travel.is_some()
    }
}

/// A roaming hazard that bounces around the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trap {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Cleared when destroyed; a dead trap never moves or collides again
    pub alive: bool,
}

impl Trap {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::splat(self.size))
    }

    /// Park off-arena and stop participating
    pub fn destroy(&mut self) {
        self.pos.x = OFF_ARENA_X;
        self.vel = Vec2::ZERO;
        self.alive = false;
    }
}

/// A hazard revealed on a random platform by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurpriseTrap {
    pub pos: Vec2,
    pub size: f32,
    /// Invisible traps never collide
    pub visible: bool,
    /// Platform slot it currently rests on
    pub platform: Option<usize>,
}

impl SurpriseTrap {
    pub fn new(size: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
            visible: false,
            platform: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::splat(self.size))
    }

    /// Rest centered on top of `platform`
    pub fn place_on(&mut self, index: usize, platform: &Platform) {
        let p = platform.rect;
        self.pos = Vec2::new(p.x + p.width / 2.0 - self.size / 2.0, p.y - self.size);
        self.platform = Some(index);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Buff types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    /// Flat score bonus
    Score,
    /// Absorbs the next hazard hit
    Defense,
    /// Destroys the next hazard touched
    Shooter,
}

impl BuffKind {
    /// Kind for a buff slot (slot order Score, Defense, Shooter, repeating)
    pub fn for_slot(slot: usize) -> Self {
        match slot % 3 {
            0 => BuffKind::Score,
            1 => BuffKind::Defense,
            _ => BuffKind::Shooter,
        }
    }
}

/// Lifecycle of a one-shot buff
///
/// The effect is applied only on `Available -> Collecting`, and nothing
/// leads back to `Available`, so it fires at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffState {
    /// On the field with its effect unspent
    Available,
    /// Picked up this frame, effect applied
    Collecting,
    /// Effect spent. `on_field` marks a buff put back without its effect
    Consumed { on_field: bool },
}

/// A one-shot power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: BuffKind,
    pub state: BuffState,
}

impl Buff {
    pub fn new(pos: Vec2, radius: f32, kind: BuffKind) -> Self {
        Self {
            pos,
            radius,
            kind,
            state: BuffState::Available,
        }
    }

    /// Pick the buff up. Returns the kind whose effect must fire, if any.
    pub fn collect(&mut self) -> Option<BuffKind> {
        match self.state {
            BuffState::Available => {
                self.state = BuffState::Collecting;
                Some(self.kind)
            }
            BuffState::Consumed { on_field: true } => {
                self.state = BuffState::Consumed { on_field: false };
                None
            }
            _ => None,
        }
    }

    /// Finish a pickup from the previous frame
    pub fn settle(&mut self) {
        if self.state == BuffState::Collecting {
            self.state = BuffState::Consumed { on_field: false };
        }
    }

    /// Put a collected buff back on the field. Its effect stays spent.
    pub fn rearm(&mut self) {
        if !self.on_field() {
            self.state = BuffState::Consumed { on_field: true };
        }
    }

    pub fn on_field(&self) -> bool {
        matches!(
            self.state,
            BuffState::Available | BuffState::Consumed { on_field: true }
        )
    }

    pub fn is_active(&self) -> bool {
        self.on_field()
    }

    pub fn is_collected(&self) -> bool {
        !self.on_field()
    }

    pub fn is_used(&self) -> bool {
        self.state != BuffState::Available
    }
}

/// Which hazard slot an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardRef {
    Trap(usize),
    SurpriseTrap(usize),
}

/// What removed a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyedBy {
    Bullet { slot: usize },
    ShooterBuff,
}

/// Discrete events raised during a frame (for audio/HUD collaborators)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fell out of the arena and was sent back to spawn
    PlayerFell,
    /// Unmitigated hazard hit: reset and score penalty
    PlayerHit { hazard: HazardRef },
    HazardDestroyed { hazard: HazardRef, by: DestroyedBy },
    /// Defense buff soaked a hit
    HazardAbsorbed { hazard: HazardRef },
    /// `applied` is false when the buff's effect was already spent
    BuffCollected {
        slot: usize,
        kind: BuffKind,
        applied: bool,
    },
    BulletFired { slot: usize },
    BulletPoolExhausted,
    SurpriseTrapsRevealed,
    ExitReached { outcome: SessionOutcome },
}

/// Score, buff flags and counters for one play session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: i32,
    pub win_threshold: i32,
    /// Next hazard hit is absorbed
    pub defense_active: bool,
    /// Next hazard touched is destroyed
    pub shooter_active: bool,
    /// Hazard hits that sent the player back to spawn
    pub hits: u32,
    /// Falls out of the arena
    pub falls: u32,
    pub hazards_destroyed: u32,
    pub bullets_fired: u32,
}

impl Session {
    pub fn new(starting_score: i32, win_threshold: i32) -> Self {
        Self {
            score: starting_score,
            win_threshold,
            ..Default::default()
        }
    }
}

/// Every entity in the arena
#[derive(Debug, Clone)]
pub struct World {
    pub arena: ArenaSize,
    pub spawn: Vec2,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub traps: Vec<Trap>,
    pub surprise_traps: Vec<SurpriseTrap>,
    pub buffs: Vec<Buff>,
    pub bullets: BulletPool,
    pub exit: Rect,
}

impl World {
    /// Build the world from a layout. Buff positions are drawn from `rng`.
    pub fn from_layout(layout: &Layout, rng: &mut Pcg32) -> Self {
        let platforms = layout
            .platforms
            .iter()
            .map(|p| Platform {
                rect: Rect::new(p.x, p.y, p.width, p.height),
                vel_x: if p.travel.is_some() { p.vel_x } else { 0.0 },
                travel: p.travel,
            })
            .collect();

        let traps = layout
            .traps
            .iter()
            .map(|t| Trap {
                pos: Vec2::new(t.x, t.y),
                vel: Vec2::new(t.vel_x, t.vel_y),
                size: t.size,
                alive: true,
            })
            .collect();

        let surprise_traps = (0..layout.surprise_traps)
            .map(|_| SurpriseTrap::new(layout.surprise_trap_size))
            .collect();

        let buffs = (0..3)
            .map(|slot| {
                let pos = random_buff_position(rng, layout.arena);
                Buff::new(pos, layout.buff_radius, BuffKind::for_slot(slot))
            })
            .collect();

        Self {
            arena: layout.arena,
            spawn: layout.spawn,
            player: Player::new(layout.spawn),
            platforms,
            traps,
            surprise_traps,
            buffs,
            bullets: BulletPool::new(),
            exit: layout.exit,
        }
    }
}

/// Uniform integer coordinates inside the arena, away from the edges
fn random_buff_position(rng: &mut Pcg32, arena: ArenaSize) -> Vec2 {
    let margin = BUFF_EDGE_MARGIN;
    let span_x = (arena.width as u32).saturating_sub(2 * margin).max(1);
    let span_y = (arena.height as u32).saturating_sub(2 * margin).max(1);
    let x = rng.random_range(0..span_x) + margin;
    let y = rng.random_range(0..span_y) + margin;
    Vec2::new(x as f32, y as f32)
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Session-wide RNG (buff placement, surprise traps)
    pub rng: Pcg32,
    /// Frames simulated so far
    pub frame: u64,
    pub phase: GamePhase,
    pub world: World,
    pub session: Session,
    pub scheduler: HazardScheduler,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a new session on `layout`
    pub fn new(layout: &Layout, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::from_layout(layout, &mut rng);
        log::debug!(
            "New session (seed {seed}): buffs at {:?}",
            world.buffs.iter().map(|b| b.pos).collect::<Vec<_>>()
        );

        Self {
            seed,
            rng,
            frame: 0,
            phase: GamePhase::Playing,
            world,
            session: Session::new(layout.starting_score, layout.win_threshold),
            scheduler: HazardScheduler::new(SURPRISE_INTERVAL_FRAMES),
            events: Vec::new(),
        }
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.phase {
            GamePhase::Playing => None,
            GamePhase::Over(outcome) => Some(outcome),
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_from_default_layout() {
        let state = GameState::new(&Layout::default(), 7);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session.score, 100);
        assert_eq!(state.world.player.pos, Vec2::new(50.0, 100.0));
        assert_eq!(state.world.surprise_traps.len(), 3);
        assert!(state.world.surprise_traps.iter().all(|t| !t.visible));
        assert!(state.world.traps.iter().all(|t| t.alive));
    }

    #[test]
    fn test_buffs_one_of_each_kind_inside_arena() {
        let state = GameState::new(&Layout::default(), 1234);
        let kinds: Vec<_> = state.world.buffs.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BuffKind::Score, BuffKind::Defense, BuffKind::Shooter]);
        for buff in &state.world.buffs {
            assert!(buff.pos.x >= 25.0 && buff.pos.x < 775.0);
            assert!(buff.pos.y >= 25.0 && buff.pos.y < 575.0);
            assert_eq!(buff.state, BuffState::Available);
            assert_eq!(buff.pos, buff.pos.round());
        }
    }

    #[test]
    fn test_same_seed_same_buffs() {
        let a = GameState::new(&Layout::default(), 99);
        let b = GameState::new(&Layout::default(), 99);
        assert_eq!(a.world.buffs, b.world.buffs);
    }

    #[test]
    fn test_buff_effect_only_from_available() {
        let mut buff = Buff::new(Vec2::ZERO, 15.0, BuffKind::Score);
        assert!(buff.is_active() && !buff.is_collected() && !buff.is_used());

        assert_eq!(buff.collect(), Some(BuffKind::Score));
        assert_eq!(buff.state, BuffState::Collecting);
        assert!(!buff.is_active() && buff.is_collected() && buff.is_used());

        // Still overlapping next frame: nothing happens
        assert_eq!(buff.collect(), None);
        buff.settle();
        assert_eq!(buff.state, BuffState::Consumed { on_field: false });

        buff.rearm();
        assert!(buff.on_field());
        assert!(buff.is_used());
        assert_eq!(buff.collect(), None);
        assert!(buff.is_collected());
    }

    #[test]
    fn test_rearm_available_buff_is_noop() {
        let mut buff = Buff::new(Vec2::ZERO, 15.0, BuffKind::Defense);
        buff.rearm();
        assert_eq!(buff.state, BuffState::Available);
    }

    #[test]
    fn test_trap_destroy_parks_off_arena() {
        let mut trap = Trap {
            pos: Vec2::new(300.0, 300.0),
            vel: Vec2::new(2.0, 2.0),
            size: TRAP_SIZE,
            alive: true,
        };
        trap.destroy();
        assert!(!trap.alive);
        assert_eq!(trap.pos.x, OFF_ARENA_X);
        assert_eq!(trap.vel, Vec2::ZERO);
    }

    #[test]
    fn test_surprise_trap_placement() {
        let platform = Platform {
            rect: Rect::new(150.0, 160.0, 50.0, 10.0),
            vel_x: 0.0,
            travel: None,
        };
        let mut trap = SurpriseTrap::new(30.0);
        trap.place_on(1, &platform);
        assert!(trap.visible);
        assert_eq!(trap.platform, Some(1));
        assert_eq!(trap.pos, Vec2::new(160.0, 130.0));
    }
}
