//! Run settings for the headless binary
//!
//! Read from environment variables; anything missing or unparsable falls back
//! to the default with a warning.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::driver::FramePacing;

/// Environment variable names
pub const ENV_SEED: &str = "TRAPFALL_SEED";
pub const ENV_LAYOUT: &str = "TRAPFALL_LAYOUT";
pub const ENV_MAX_FRAMES: &str = "TRAPFALL_MAX_FRAMES";
pub const ENV_REALTIME: &str = "TRAPFALL_REALTIME";

/// Settings for one run of the binary
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// RNG seed, wall clock when unset
    pub seed: Option<u64>,
    /// Layout JSON file, stock arena when unset
    pub layout_path: Option<PathBuf>,
    /// Autopilot quits after this many frames
    pub max_frames: u64,
    /// Sleep between frames like a real game loop
    pub realtime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            layout_path: None,
            // One minute at 60 FPS
            max_frames: 3600,
            realtime: false,
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment, or a map in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(seed) = lookup(ENV_SEED) {
            match seed.parse() {
                Ok(parsed) => settings.seed = Some(parsed),
                Err(_) => log::warn!("Invalid {ENV_SEED} '{seed}', using a random seed"),
            }
        }

        if let Some(path) = lookup(ENV_LAYOUT).filter(|p| !p.is_empty()) {
            settings.layout_path = Some(PathBuf::from(path));
        }

        if let Some(frames) = lookup(ENV_MAX_FRAMES) {
            match frames.parse::<u64>() {
                Ok(parsed) if parsed > 0 => settings.max_frames = parsed,
                _ => log::warn!(
                    "{ENV_MAX_FRAMES} must be a positive integer, got '{frames}', using {}",
                    settings.max_frames
                ),
            }
        }

        if let Some(flag) = lookup(ENV_REALTIME) {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => settings.realtime = true,
                "0" | "false" | "no" | "off" => settings.realtime = false,
                _ => log::warn!("Invalid {ENV_REALTIME} '{flag}', expected true/false"),
            }
        }

        settings
    }

    /// Seed to use: configured, or derived from the clock
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    pub fn pacing(&self) -> FramePacing {
        if self.realtime {
            FramePacing::realtime()
        } else {
            FramePacing::Unthrottled
        }
    }
}
