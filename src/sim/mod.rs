//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module stays pure:
//! - One fixed step per call, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (slot order)
//! - No rendering, input or platform dependencies

pub mod geom;
pub mod interaction;
pub mod physics;
pub mod projectile;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use geom::{Rect, circle_reaches};
pub use interaction::{HAZARD_POLICIES, HazardPolicy};
pub use physics::{Horizontal, Landing};
pub use projectile::{Bullet, BulletPool};
pub use scheduler::HazardScheduler;
pub use snapshot::{BuffSprite, RenderSnapshot};
pub use state::{
    Buff, BuffKind, BuffState, DestroyedBy, GameEvent, GamePhase, GameState, HazardRef, Platform,
    Player, Session, SessionOutcome, SurpriseTrap, Trap, World,
};
pub use tick::{TickInput, tick};
