//! Error types
//!
//! Nothing inside a frame is fatal. These only surface at load time
//! (`ConfigError`) or as a dropped bullet spawn (`PoolExhausted`).

use std::path::PathBuf;

/// Failure to load or validate an arena layout
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read layout {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed layout JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid layout: {0}")]
    Invalid(String),
}

/// Every bullet slot is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("No bullet slots available (capacity {capacity})")]
pub struct PoolExhausted {
    pub capacity: usize,
}
