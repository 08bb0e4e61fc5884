//! Playback Events
//!
//! Event-based communication for UI synchronization. The engine queues
//! events as transitions happen; the host drains them after each call.
//! Ticks do not emit progress events, read progress from the snapshot.

use crate::types::{EnginePhase, RepeatMode};
use nextsound_core::TrackKey;
use serde::Serialize;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Short message meant for a toast or status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlaybackEvent {
    /// Engine phase changed
    StateChanged { phase: EnginePhase },

    /// A different track became current
    TrackChanged {
        track: TrackKey,
        previous: Option<TrackKey>,
    },

    /// Current track has no preview; a lookup was requested
    ResolutionRequested { track: TrackKey, token: u64 },

    /// Lookup produced a preview URL and real audio was attached
    TrackEnhanced { track: TrackKey },

    /// No audio available; progress is simulated
    SimulationStarted { track: TrackKey },

    /// Current track reached its end (real or simulated)
    TrackFinished { track: TrackKey },

    /// Audio output reported a failure
    MediaFailed { track: TrackKey, message: String },

    /// Up-next queue contents changed
    QueueChanged { length: usize },

    VolumeChanged { percent: f64 },

    ShuffleChanged { enabled: bool },

    RepeatChanged { mode: RepeatMode },

    /// Favorites membership changed (load, toggle or revert)
    FavoritesChanged { count: usize },

    /// User-facing notice
    Notice(Notification),
}
