//! Projectile pool
//!
//! Bullets live in a fixed array of slots. Spawning takes the first free slot;
//! a full pool drops the shot instead of growing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::state::{DestroyedBy, GameEvent, GameState, HazardRef, Trap};
use crate::consts::*;
use crate::error::PoolExhausted;

/// A bullet slot. Position is meaningless while inactive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel_x: f32,
    pub active: bool,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::splat(BULLET_SIZE))
    }
}

/// Fixed-capacity bullet storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletPool {
    slots: [Bullet; BULLET_POOL_CAPACITY],
}

impl Default for BulletPool {
    fn default() -> Self {
        Self::new()
    }
}

impl BulletPool {
    pub fn new() -> Self {
        Self {
            slots: [Bullet::default(); BULLET_POOL_CAPACITY],
        }
    }

    /// Fire from `origin` in the first free slot
    pub fn spawn(&mut self, origin: Vec2) -> Result<usize, PoolExhausted> {
        let (slot, bullet) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, b)| !b.active)
            .ok_or(PoolExhausted {
                capacity: BULLET_POOL_CAPACITY,
            })?;

        *bullet = Bullet {
            pos: origin,
            vel_x: BULLET_SPEED,
            active: true,
        };
        Ok(slot)
    }

    /// Move every live bullet; retire the ones that reached the right edge
    pub fn advance(&mut self, arena_width: f32) {
        for bullet in self.slots.iter_mut().filter(|b| b.active) {
            bullet.pos.x += bullet.vel_x;
            if bullet.pos.x >= arena_width {
                bullet.active = false;
            }
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Bullet> {
        self.slots.get(slot)
    }

    /// Active bullets with their slot index
    pub fn active(&self) -> impl Iterator<Item = (usize, &Bullet)> {
        self.slots.iter().enumerate().filter(|(_, b)| b.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|b| b.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Each live bullet destroys the first live trap it overlaps and is consumed.
    /// Returns `(bullet slot, trap slot)` pairs.
    pub fn resolve_trap_hits(&mut self, traps: &mut [Trap]) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        for (slot, bullet) in self.slots.iter_mut().enumerate() {
            if !bullet.active {
                continue;
            }
            let rect = bullet.rect();
            if let Some((trap_idx, trap)) = traps
                .iter_mut()
                .enumerate()
                .find(|(_, t)| t.alive && t.rect().overlaps(&rect))
            {
                trap.destroy();
                bullet.active = false;
                hits.push((slot, trap_idx));
            }
        }
        hits
    }
}

/// Fire a bullet from the player. A full pool is logged and reported, not fatal.
pub fn fire(state: &mut GameState) -> Option<usize> {
    let player = state.world.player.pos;
    let origin = Vec2::new(player.x + PLAYER_WIDTH / 2.0, player.y);
    match state.world.bullets.spawn(origin) {
        Ok(slot) => {
            state.session.bullets_fired += 1;
            state.emit(GameEvent::BulletFired { slot });
            Some(slot)
        }
        Err(err) => {
            log::warn!("{err}");
            state.emit(GameEvent::BulletPoolExhausted);
            None
        }
    }
}

/// Advance bullets and resolve bullet-vs-trap hits for this frame
pub fn step(state: &mut GameState) {
    let arena_width = state.world.arena.width;
    state.world.bullets.advance(arena_width);

    let world = &mut state.world;
    let hits = world.bullets.resolve_trap_hits(&mut world.traps);
    for (slot, trap) in hits {
        log::info!("Trap {trap} destroyed by bullet {slot}");
        state.session.hazards_destroyed += 1;
        state.emit(GameEvent::HazardDestroyed {
            hazard: HazardRef::Trap(trap),
            by: DestroyedBy::Bullet { slot },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trap_at(x: f32, y: f32) -> Trap {
        Trap {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: TRAP_SIZE,
            alive: true,
        }
    }

    #[test]
    fn test_spawn_fills_first_free_slot() {
        let mut pool = BulletPool::new();
        assert_eq!(pool.spawn(Vec2::new(10.0, 10.0)), Ok(0));
        assert_eq!(pool.spawn(Vec2::new(10.0, 10.0)), Ok(1));
        assert_eq!(pool.active_count(), 2);

        let b = pool.get(0).unwrap();
        assert_eq!(b.vel_x, BULLET_SPEED);
        assert!(b.active);
    }

    #[test]
    fn test_full_pool_rejects_spawn() {
        let mut pool = BulletPool::new();
        for i in 0..BULLET_POOL_CAPACITY {
            assert_eq!(pool.spawn(Vec2::new(i as f32, 0.0)), Ok(i));
        }
        let before = pool.clone();
        assert_eq!(
            pool.spawn(Vec2::ZERO),
            Err(PoolExhausted {
                capacity: BULLET_POOL_CAPACITY
            })
        );
        assert_eq!(pool, before);
    }

    #[test]
    fn test_retired_slot_is_reused() {
        let mut pool = BulletPool::new();
        pool.spawn(Vec2::new(795.0, 0.0)).unwrap();
        pool.spawn(Vec2::new(100.0, 0.0)).unwrap();
        pool.advance(ARENA_WIDTH);
        assert!(!pool.get(0).unwrap().active);
        assert_eq!(pool.spawn(Vec2::new(50.0, 0.0)), Ok(0));
    }

    #[test]
    fn test_bullet_destroys_first_overlapping_trap() {
        let mut pool = BulletPool::new();
        let mut traps = vec![trap_at(500.0, 500.0), trap_at(100.0, 100.0), trap_at(105.0, 100.0)];
        pool.spawn(Vec2::new(110.0, 110.0)).unwrap();

        let hits = pool.resolve_trap_hits(&mut traps);
        assert_eq!(hits, vec![(0, 1)]);
        assert!(traps[0].alive);
        assert!(!traps[1].alive);
        assert!(traps[2].alive);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_dead_traps_are_not_targets() {
        let mut pool = BulletPool::new();
        let mut traps = vec![trap_at(100.0, 100.0)];
        traps[0].alive = false;
        traps[0].pos = Vec2::new(100.0, 100.0);
        pool.spawn(Vec2::new(110.0, 110.0)).unwrap();

        assert!(pool.resolve_trap_hits(&mut traps).is_empty());
        assert_eq!(pool.active_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_bullet_leaves_within_expected_frames(
            spawn_px in 0u32..790,
            half in proptest::bool::ANY,
        ) {
            let spawn_x = spawn_px as f32 + if half { 0.5 } else { 0.0 };
            let mut pool = BulletPool::new();
            let slot = pool.spawn(Vec2::new(spawn_x, 100.0)).unwrap();
            let frames = ((ARENA_WIDTH - spawn_x) / BULLET_SPEED).ceil() as u32;

            for _ in 0..frames {
                pool.advance(ARENA_WIDTH);
            }
            prop_assert!(!pool.get(slot).unwrap().active);

            // Never comes back on its own
            for _ in 0..50 {
                pool.advance(ARENA_WIDTH);
                prop_assert!(!pool.get(slot).unwrap().active);
            }
        }
    }
}
