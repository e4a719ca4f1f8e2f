//! Arena layout
//!
//! Load-time data describing one arena: platforms, roaming traps, the exit door
//! and the score rules. `Layout::default()` is the stock arena; custom arenas
//! are read from JSON, where every omitted field falls back to the stock value.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::geom::Rect;

/// Arena bounds (origin at top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaSize {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Horizontal band a moving platform oscillates in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelBand {
    pub min_x: f32,
    pub max_x: f32,
}

/// A platform entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal speed, only meaningful with a travel band
    #[serde(default)]
    pub vel_x: f32,
    /// Present for moving platforms
    #[serde(default)]
    pub travel: Option<TravelBand>,
}

impl PlatformSpec {
    pub const fn fixed(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            vel_x: 0.0,
            travel: None,
        }
    }

    pub const fn moving(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        vel_x: f32,
        travel: TravelBand,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            vel_x,
            travel: Some(travel),
        }
    }
}

fn default_trap_size() -> f32 {
    TRAP_SIZE
}

/// A roaming trap entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapSpec {
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    #[serde(default = "default_trap_size")]
    pub size: f32,
}

/// Band shared by the stock moving platforms
const STOCK_TRAVEL: TravelBand = TravelBand {
    min_x: 600.0,
    max_x: 800.0,
};

/// Complete arena description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub arena: ArenaSize,
    /// Player spawn (top-left of the player box)
    pub spawn: Vec2,
    /// Platforms in resolution order
    pub platforms: Vec<PlatformSpec>,
    /// Roaming traps in resolution order
    pub traps: Vec<TrapSpec>,
    /// Number of surprise trap slots
    pub surprise_traps: usize,
    pub surprise_trap_size: f32,
    /// Radius of every buff
    pub buff_radius: f32,
    pub exit: Rect,
    pub starting_score: i32,
    /// Reaching the exit below this score loses the session
    pub win_threshold: i32,
}

impl Default for Layout {
    fn default() -> Self {
        let platforms = vec![
            PlatformSpec::fixed(0.0, 160.0, 100.0, 10.0),
            PlatformSpec::fixed(150.0, 160.0, 50.0, 10.0),
            PlatformSpec::fixed(190.0, 0.0, 10.0, 160.0),
            PlatformSpec::fixed(190.0, 440.0, 210.0, 10.0),
            PlatformSpec::fixed(400.0, 440.0, 10.0, 590.0),
            PlatformSpec::fixed(410.0, 590.0, 120.0, 10.0),
            PlatformSpec::fixed(530.0, 550.0, 10.0, 50.0),
            PlatformSpec::fixed(530.0, 540.0, 230.0, 10.0),
            PlatformSpec::fixed(640.0, 0.0, 10.0, 170.0),
            // Exit ledge
            PlatformSpec::fixed(640.0, 170.0, 120.0, 10.0),
            PlatformSpec::moving(740.0, 450.0, 40.0, 10.0, 2.0, STOCK_TRAVEL),
            PlatformSpec::moving(620.0, 390.0, 40.0, 10.0, 2.0, STOCK_TRAVEL),
            PlatformSpec::moving(750.0, 360.0, 40.0, 10.0, 2.0, STOCK_TRAVEL),
            PlatformSpec::moving(640.0, 310.0, 40.0, 10.0, 2.0, STOCK_TRAVEL),
            PlatformSpec::moving(670.0, 240.0, 40.0, 10.0, 2.0, STOCK_TRAVEL),
            PlatformSpec::fixed(600.0, 500.0, 40.0, 10.0),
        ];

        let trap = |x, y, vel_x, vel_y| TrapSpec {
            x,
            y,
            vel_x,
            vel_y,
            size: TRAP_SIZE,
        };
        let traps = vec![
            trap(100.0, 300.0, 3.0, 2.0),
            trap(400.0, 200.0, -2.0, 3.0),
            trap(600.0, 400.0, -3.0, -2.0),
            trap(200.0, 100.0, 2.0, -3.0),
            trap(500.0, 300.0, -3.0, 2.0),
        ];

        Self {
            arena: ArenaSize::default(),
            spawn: Vec2::new(50.0, 100.0),
            platforms,
            traps,
            surprise_traps: 3,
            surprise_trap_size: SURPRISE_TRAP_SIZE,
            buff_radius: BUFF_RADIUS,
            // Centered on the exit ledge
            exit: Rect::new(680.0, 140.0, 40.0, 30.0),
            starting_score: 100,
            win_threshold: 70,
        }
    }
}

impl Layout {
    /// Parse and validate a layout from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: Layout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Read a layout file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::from_json(&json)?;
        log::info!(
            "Loaded layout {}: {} platforms, {} traps",
            path.display(),
            layout.platforms.len(),
            layout.traps.len()
        );
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject layouts the simulation can't run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.arena.width < PLAYER_WIDTH || self.arena.height < PLAYER_HEIGHT {
            return invalid(format!(
                "arena {}x{} can't fit the {PLAYER_WIDTH}x{PLAYER_HEIGHT} player",
                self.arena.width, self.arena.height
            ));
        }
        let spawn_fits = self.spawn.x >= 0.0
            && self.spawn.y >= 0.0
            && self.spawn.x + PLAYER_WIDTH <= self.arena.width
            && self.spawn.y + PLAYER_HEIGHT <= self.arena.height;
        if !spawn_fits {
            return invalid(format!(
                "spawn ({}, {}) puts the player outside the arena",
                self.spawn.x, self.spawn.y
            ));
        }
        if self.surprise_traps > 0 && self.platforms.is_empty() {
            return invalid("surprise traps need at least one platform to spawn on".into());
        }
        for (i, p) in self.platforms.iter().enumerate() {
            if p.width <= 0.0 || p.height <= 0.0 {
                return invalid(format!("platform {i} has a non-positive size"));
            }
            if let Some(band) = p.travel {
                if band.max_x - band.min_x < p.width {
                    return invalid(format!("platform {i} is wider than its travel band"));
                }
                if p.vel_x == 0.0 {
                    return invalid(format!("platform {i} has a travel band but no speed"));
                }
            }
        }
        if let Some(i) = self.traps.iter().position(|t| t.size <= 0.0) {
            return invalid(format!("trap {i} has a non-positive size"));
        }
        let arena = Rect::new(0.0, 0.0, self.arena.width, self.arena.height);
        if !arena.overlaps(&self.exit) {
            return invalid("exit door lies outside the arena".into());
        }
        if self.buff_radius <= 0.0 || self.surprise_trap_size <= 0.0 {
            return invalid("buff radius and surprise trap size must be positive".into());
        }
        Ok(())
    }
}
