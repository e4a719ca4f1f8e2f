//! Trapfall - a 2D platformer arena simulation
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (physics, hazards, buffs, projectiles)
//! - `driver`: Throttled frame loop and input/observer seams
//! - `layout`: Data-driven arena layout (platforms, traps, exit, score rules)
//! - `settings`: Run settings for the headless binary

pub mod driver;
pub mod error;
pub mod layout;
pub mod settings;
pub mod sim;

pub use driver::{
    Autopilot, FrameObserver, FramePacing, InputSource, ScriptedInput, SessionReport, run_session,
};
pub use error::{ConfigError, PoolExhausted};
pub use layout::Layout;
pub use settings::Settings;

/// Simulation constants
///
/// Velocities are pixels per frame, the simulation has no notion of `dt`.
pub mod consts {
    /// Target frame rate of the driver loop
    pub const FRAME_RATE: u32 = 60;
    /// End-of-frame delay used by the realtime driver (~60 FPS)
    pub const FRAME_DELAY_MS: u64 = 16;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 25.0;
    pub const PLAYER_HEIGHT: f32 = 25.0;
    /// Horizontal speed while a direction is held
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Downward acceleration added every frame
    pub const GRAVITY: f32 = 0.8;
    /// Terminal fall speed
    pub const MAX_VELOCITY: f32 = 10.0;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_STRENGTH: f32 = -10.0;

    /// Hazard sizes (triangle base and height, collided as a square)
    pub const TRAP_SIZE: f32 = 30.0;
    pub const SURPRISE_TRAP_SIZE: f32 = 30.0;
    /// Frames between surprise trap reveals (5 seconds at 60 FPS)
    pub const SURPRISE_INTERVAL_FRAMES: u32 = 300;
    /// Where destroyed traps are parked
    pub const OFF_ARENA_X: f32 = -100.0;

    /// Buff defaults
    pub const BUFF_RADIUS: f32 = 15.0;
    /// Keeps randomly placed buffs away from the arena edges
    pub const BUFF_EDGE_MARGIN: u32 = 25;
    pub const SCORE_BUFF_BONUS: i32 = 10;

    /// Projectile pool
    pub const BULLET_POOL_CAPACITY: usize = 10;
    pub const BULLET_SPEED: f32 = 8.0;
    pub const BULLET_SIZE: f32 = 5.0;
}
