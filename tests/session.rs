//! Whole-session runs through the driver

use glam::Vec2;
use trapfall::sim::{GameEvent, GameState, Horizontal, RenderSnapshot, SessionOutcome, TickInput};
use trapfall::{
    Autopilot, ConfigError, FrameObserver, FramePacing, Layout, ScriptedInput, run_session,
};

/// One floor spanning the arena with the exit door at its right end
const CORRIDOR: &str = r#"{
    "spawn": [50.0, 450.0],
    "platforms": [{ "x": 0.0, "y": 500.0, "width": 800.0, "height": 20.0 }],
    "traps": [],
    "surprise_traps": 0,
    "exit": { "x": 700.0, "y": 470.0, "width": 40.0, "height": 30.0 }
}"#;

/// A motionless trap on the corridor floor, halfway to the door
const STANDING_TRAP: &str = r#"[{ "x": 400.0, "y": 470.0, "vel_x": 0.0, "vel_y": 0.0 }]"#;

#[derive(Default)]
struct Recorder {
    events: Vec<GameEvent>,
    last: Option<RenderSnapshot>,
}

impl FrameObserver for Recorder {
    fn observe(&mut self, snapshot: &RenderSnapshot, events: &[GameEvent]) {
        self.events.extend_from_slice(events);
        self.last = Some(snapshot.clone());
    }
}

/// Session on the corridor with every buff parked near the ceiling
fn corridor_state(layout: &Layout, seed: u64) -> GameState {
    let mut state = GameState::new(layout, seed);
    for buff in &mut state.world.buffs {
        buff.pos = Vec2::new(400.0, 40.0);
    }
    state
}

fn idle(frames: usize) -> Vec<TickInput> {
    vec![TickInput::default(); frames]
}

fn walk_right(frames: usize) -> Vec<TickInput> {
    vec![
        TickInput {
            horizontal: Horizontal::Right,
            ..Default::default()
        };
        frames
    ]
}

#[test]
fn corridor_walk_wins() {
    let layout = Layout::from_json(CORRIDOR).unwrap();
    let mut state = corridor_state(&layout, 1);
    let mut input = ScriptedInput::new(walk_right(200));
    let mut recorder = Recorder::default();

    let report = run_session(&mut state, &mut input, &mut recorder, FramePacing::Unthrottled);
    assert_eq!(report.outcome, SessionOutcome::Win);
    assert!(report.frames < 200);
    assert_eq!(report.hits, 0);
    assert_eq!(report.falls, 0);
    assert!(recorder.events.contains(&GameEvent::ExitReached {
        outcome: SessionOutcome::Win
    }));

    let last = recorder.last.unwrap();
    assert_eq!(last.frame, report.frames);
    assert!(last.player.overlaps(&last.exit));
}

#[test]
fn corridor_walk_with_low_score_loses() {
    let mut layout = Layout::from_json(CORRIDOR).unwrap();
    layout.starting_score = 50;
    let mut state = corridor_state(&layout, 1);
    let mut input = ScriptedInput::new(walk_right(200));

    let report = run_session(&mut state, &mut input, &mut (), FramePacing::Unthrottled);
    assert_eq!(report.outcome, SessionOutcome::Lose);
    assert!(report.score < 70);
}

#[test]
fn shooting_clears_the_corridor() {
    let mut layout = Layout::from_json(CORRIDOR).unwrap();
    layout.traps = serde_json::from_str(STANDING_TRAP).unwrap();
    let mut state = corridor_state(&layout, 3);

    // Land, fire once, wait for the bullet, then walk to the door
    let mut script = idle(15);
    script.push(TickInput {
        fire: true,
        ..Default::default()
    });
    script.extend(idle(60));
    script.extend(walk_right(200));
    let mut input = ScriptedInput::new(script);
    let mut recorder = Recorder::default();

    let report = run_session(&mut state, &mut input, &mut recorder, FramePacing::Unthrottled);
    assert_eq!(report.outcome, SessionOutcome::Win);
    assert_eq!(report.bullets_fired, 1);
    assert_eq!(report.hazards_destroyed, 1);
    assert_eq!(report.hits, 0);
    assert!(
        recorder
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::HazardDestroyed { .. }))
    );
    assert!(recorder.last.unwrap().traps.is_empty());
}

#[test]
fn standing_trap_blocks_the_corridor() {
    let mut layout = Layout::from_json(CORRIDOR).unwrap();
    layout.traps = serde_json::from_str(STANDING_TRAP).unwrap();
    let mut state = corridor_state(&layout, 3);
    let mut input = ScriptedInput::new(walk_right(120));

    let report = run_session(&mut state, &mut input, &mut (), FramePacing::Unthrottled);
    assert_eq!(report.outcome, SessionOutcome::Quit);
    assert!(report.hits >= 1);
}

#[test]
fn autopilot_sessions_replay_identically() {
    let run = |seed| {
        let mut state = GameState::new(&Layout::default(), seed);
        let mut pilot = Autopilot::new(900);
        let mut recorder = Recorder::default();
        let report = run_session(&mut state, &mut pilot, &mut recorder, FramePacing::Unthrottled);
        (report, recorder.events, recorder.last)
    };

    let (report_a, events_a, last_a) = run(2024);
    let (report_b, events_b, last_b) = run(2024);
    assert_eq!(report_a, report_b);
    assert_eq!(events_a, events_b);
    assert_eq!(last_a, last_b);
}

#[test]
fn surprise_traps_appear_on_schedule() {
    let mut state = GameState::new(&Layout::default(), 9);
    let mut input = ScriptedInput::new(idle(310));
    let mut recorder = Recorder::default();

    run_session(&mut state, &mut input, &mut recorder, FramePacing::Unthrottled);
    let reveals = recorder
        .events
        .iter()
        .filter(|e| **e == GameEvent::SurpriseTrapsRevealed)
        .count();
    assert_eq!(reveals, 1);
    assert_eq!(recorder.last.unwrap().surprise_traps.len(), 3);
}

#[test]
fn broken_layout_is_rejected() {
    let err = Layout::from_json(r#"{ "platforms": [], "surprise_traps": 2 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = Layout::load("does/not/exist.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
