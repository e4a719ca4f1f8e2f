//! Surprise trap scheduler
//!
//! Every `interval` frames each surprise trap is moved onto a random platform
//! and revealed. Traps stay up until destroyed or moved by the next reveal.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};

/// Frame-counted reveal timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardScheduler {
    /// Frames since the last reveal
    pub timer: u32,
    /// Frames between reveals
    pub interval: u32,
}

impl HazardScheduler {
    pub fn new(interval: u32) -> Self {
        Self { timer: 0, interval }
    }

    /// Count one frame. Returns true when a reveal is due (and rewinds the timer).
    pub fn advance(&mut self) -> bool {
        self.timer += 1;
        if self.timer >= self.interval {
            self.timer = 0;
            true
        } else {
            false
        }
    }

    /// Frames left before the next reveal
    pub fn frames_until_reveal(&self) -> u32 {
        self.interval.saturating_sub(self.timer)
    }
}

/// Run the scheduler for one frame
pub fn step(state: &mut GameState) {
    if state.scheduler.advance() {
        reveal_surprise_traps(state);
    }
}

/// Put every surprise trap on a uniformly chosen platform and show it
pub fn reveal_surprise_traps(state: &mut GameState) {
    let world = &mut state.world;
    if world.platforms.is_empty() || world.surprise_traps.is_empty() {
        return;
    }

    for (i, trap) in world.surprise_traps.iter_mut().enumerate() {
        let index = state.rng.random_range(0..world.platforms.len());
        trap.place_on(index, &world.platforms[index]);
        log::debug!(
            "Surprise trap {i} on platform {index} at ({:.1}, {:.1})",
            trap.pos.x,
            trap.pos.y
        );
    }
    state.emit(GameEvent::SurpriseTrapsRevealed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SURPRISE_INTERVAL_FRAMES;
    use crate::layout::Layout;

    #[test]
    fn test_fires_on_threshold_and_rewinds() {
        let mut scheduler = HazardScheduler::new(3);
        assert!(!scheduler.advance());
        assert!(!scheduler.advance());
        assert_eq!(scheduler.frames_until_reveal(), 1);
        assert!(scheduler.advance());
        assert_eq!(scheduler.timer, 0);
        assert!(!scheduler.advance());
    }

    #[test]
    fn test_reveal_after_threshold_places_traps_on_platforms() {
        let mut state = GameState::new(&Layout::default(), 42);

        for _ in 0..SURPRISE_INTERVAL_FRAMES - 1 {
            step(&mut state);
        }
        assert!(state.world.surprise_traps.iter().all(|t| !t.visible));

        step(&mut state);
        assert!(state.events.contains(&GameEvent::SurpriseTrapsRevealed));
        for trap in &state.world.surprise_traps {
            assert!(trap.visible);
            let p = state.world.platforms[trap.platform.unwrap()].rect;
            assert_eq!(trap.pos.x, p.x + p.width / 2.0 - trap.size / 2.0);
            assert_eq!(trap.pos.y, p.y - trap.size);
        }
    }

    #[test]
    fn test_traps_stay_visible_between_reveals() {
        let mut state = GameState::new(&Layout::default(), 3);
        state.scheduler.timer = SURPRISE_INTERVAL_FRAMES - 1;
        step(&mut state);
        let placed: Vec<_> = state.world.surprise_traps.iter().map(|t| t.pos).collect();

        for _ in 0..SURPRISE_INTERVAL_FRAMES - 1 {
            step(&mut state);
        }
        assert!(state.world.surprise_traps.iter().all(|t| t.visible));
        let now: Vec<_> = state.world.surprise_traps.iter().map(|t| t.pos).collect();
        assert_eq!(placed, now);
    }

    #[test]
    fn test_reveal_reshows_destroyed_trap() {
        let mut state = GameState::new(&Layout::default(), 5);
        reveal_surprise_traps(&mut state);
        state.world.surprise_traps[0].hide();

        reveal_surprise_traps(&mut state);
        assert!(state.world.surprise_traps[0].visible);
    }

    #[test]
    fn test_no_surprise_slots_is_quiet() {
        let layout = Layout {
            surprise_traps: 0,
            ..Layout::default()
        };
        let mut state = GameState::new(&layout, 5);
        reveal_surprise_traps(&mut state);
        assert!(state.events.is_empty());
    }
}
