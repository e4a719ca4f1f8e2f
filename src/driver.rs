//! Fixed-step session loop
//!
//! Polls an `InputSource`, ticks the simulation, hands each frame to a
//! `FrameObserver` and paces frames with a fixed sleep.

use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::consts::*;
use crate::sim::{
    GameEvent, GameState, Horizontal, RenderSnapshot, SessionOutcome, TickInput, tick,
};

/// Supplies one frame of input
pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> TickInput;
}

/// Receives every simulated frame (renderer, audio, HUD)
pub trait FrameObserver {
    fn observe(&mut self, _snapshot: &RenderSnapshot, _events: &[GameEvent]) {}
}

/// Discards frames
impl FrameObserver for () {}

/// How long to wait between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePacing {
    /// Sleep this long after every frame
    Realtime(Duration),
    /// Run as fast as possible
    Unthrottled,
}

impl FramePacing {
    /// The stock 16 ms frame delay
    pub fn realtime() -> Self {
        Self::Realtime(Duration::from_millis(FRAME_DELAY_MS))
    }
}

/// Summary handed to the score screen when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub score: i32,
    pub frames: u64,
    pub hazards_destroyed: u32,
    pub hits: u32,
    pub falls: u32,
    pub bullets_fired: u32,
}

impl SessionReport {
    fn from_state(state: &GameState, outcome: SessionOutcome) -> Self {
        let session = &state.session;
        Self {
            outcome,
            score: session.score,
            frames: state.frame,
            hazards_destroyed: session.hazards_destroyed,
            hits: session.hits,
            falls: session.falls,
            bullets_fired: session.bullets_fired,
        }
    }
}

/// Run a session until it ends
///
/// A session that is already over returns its report without ticking.
pub fn run_session(
    state: &mut GameState,
    input: &mut impl InputSource,
    observer: &mut impl FrameObserver,
    pacing: FramePacing,
) -> SessionReport {
    let mut running = true;
    let mut outcome = state.outcome();

    while running {
        if outcome.is_some() {
            break;
        }

        let frame_input = input.poll(state);
        outcome = tick(state, &frame_input);

        let snapshot = RenderSnapshot::capture(state);
        observer.observe(&snapshot, &state.events);

        if outcome.is_some() {
            running = false;
        } else if let FramePacing::Realtime(delay) = pacing {
            thread::sleep(delay);
        }
    }

    // Loop only exits with an outcome set
    let outcome = outcome.unwrap_or(SessionOutcome::Quit);
    let report = SessionReport::from_state(state, outcome);
    log::info!(
        "Session report: {:?}, score {}, {} frames, {} destroyed, {} hits, {} falls",
        report.outcome,
        report.score,
        report.frames,
        report.hazards_destroyed,
        report.hits,
        report.falls
    );
    report
}

/// Replays a fixed list of inputs, then quits
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<TickInput>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(frames: Vec<TickInput>) -> Self {
        Self { frames, cursor: 0 }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: &GameState) -> TickInput {
        let input = self.frames.get(self.cursor).copied().unwrap_or(TickInput {
            quit: true,
            ..Default::default()
        });
        self.cursor += 1;
        input
    }
}

/// Demo AI for headless runs
///
/// Walks toward the exit door, hops whenever it is grounded below the door
/// and shoots traps that share its row. Quits once `max_frames` is reached.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    pub max_frames: u64,
}

/// Horizontal slack before the autopilot stops walking
const ARRIVE_TOLERANCE: f32 = 3.0;
/// How far ahead the autopilot looks for traps to shoot
const FIRE_RANGE: f32 = 220.0;
/// Frames between shots
const FIRE_COOLDOWN: u64 = 10;

impl Autopilot {
    pub fn new(max_frames: u64) -> Self {
        Self { max_frames }
    }

    fn steer(state: &GameState) -> Horizontal {
        let target = state.world.exit.center().x;
        let x = state.world.player.center().x;
        if x < target - ARRIVE_TOLERANCE {
            Horizontal::Right
        } else if x > target + ARRIVE_TOLERANCE {
            Horizontal::Left
        } else {
            Horizontal::None
        }
    }

    fn trap_in_sight(state: &GameState, facing: Horizontal) -> bool {
        let center = state.world.player.center();
        let dir = match facing {
            Horizontal::Left => -1.0,
            _ => 1.0,
        };

        state.world.traps.iter().filter(|t| t.alive).any(|trap| {
            let rect = trap.rect();
            let ahead = (rect.center().x - center.x) * dir;
            let same_row = center.y >= rect.y && center.y <= rect.bottom();
            same_row && ahead > 0.0 && ahead < FIRE_RANGE
        })
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> TickInput {
        let horizontal = Self::steer(state);
        let player = &state.world.player;
        let below_exit = player.pos.y > state.world.exit.y;

        TickInput {
            horizontal,
            jump: player.on_ground && below_exit,
            // Bullets always travel right
            fire: state.frame % FIRE_COOLDOWN == 0
                && Self::trap_in_sight(state, Horizontal::Right),
            quit: state.frame + 1 >= self.max_frames,
        }
    }
}
