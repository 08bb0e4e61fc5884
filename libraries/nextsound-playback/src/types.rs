//! Core types for playback management

use nextsound_core::{Track, TrackKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue runs dry
    #[default]
    Off,

    /// Replay the current track on end
    One,

    /// Cycle position after One; at queue end it behaves like Off
    All,
}

impl RepeatMode {
    /// Next mode in the Off -> One -> All -> Off cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }
}

/// Where the engine is in the load/play lifecycle
///
/// Derived from engine state after every transition; never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    /// No current track
    Idle,

    /// Waiting for a preview URL lookup to finish
    Loading,

    /// Real audio attached and playing
    PlayingReal,

    /// No audio available; progress advanced by the simulation timer
    PlayingSimulated,

    /// Current track set but not advancing
    Paused,
}

/// A preview lookup the host must perform before playback can start
///
/// Hand the resolved track back through `complete_load` with the same
/// token. Results carrying an outdated token are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Monotonic load generation
    pub token: u64,

    /// Track to resolve (no preview URL)
    pub track: Track,
}

/// Result of adding a track to the up-next queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Appended at the tail
    Added,

    /// Same track already queued; queue unchanged
    AlreadyQueued,
}

/// Result of a favorite toggle that reached the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

/// Read-only view of the player state for UI rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    /// 0-100
    pub progress_percent: f64,
    /// 0-100
    pub volume_percent: f64,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub is_minimized: bool,
    pub queue: Vec<Track>,
    pub is_queue_open: bool,
    pub favorites: Vec<TrackKey>,
    pub is_loading_favorites: bool,
    pub phase: EnginePhase,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Progress timer period (default: 250 ms)
    pub tick_interval_ms: u64,

    /// Initial volume, 0-100 (default: 80)
    pub volume: f64,

    /// Preview lookup deadline (default: 8000 ms)
    pub resolve_timeout_ms: u64,

    /// Progress added per simulation tick, in percent (default: 1)
    pub simulation_step: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            volume: 80.0,
            resolve_timeout_ms: 8_000,
            simulation_step: 1.0,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}

/// Clamp an arbitrary number into 0..=100; NaN becomes 0
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
