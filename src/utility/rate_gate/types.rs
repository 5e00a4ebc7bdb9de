// Standard library
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

// Current module imports
use super::traits::Clock;

/// Rate gate configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RateGateConfig {
    /// Minimum spacing between two permitted requests, in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Extra sleep added to every wait, in milliseconds
    #[serde(default = "default_offset_ms")]
    pub offset_ms: u64,
}

pub(crate) fn default_min_interval_ms() -> u64 {
    3000
}

pub(crate) fn default_offset_ms() -> u64 {
    10
}

/// Single-slot throttle shared by every client.
#[derive(Debug)]
pub struct RateGate {
    pub(crate) min_interval: Duration,
    pub(crate) offset: Duration,
    /// `None` until the first permit is granted.
    pub(crate) last_request: Mutex<Option<Instant>>,
    pub(crate) clock: Arc<dyn Clock>,
}

/// Clock backed by `tokio::time`, so paused test runtimes apply.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;
