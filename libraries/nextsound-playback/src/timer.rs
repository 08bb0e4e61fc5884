//! Progress timer slot
//!
//! One slot, one timer. Starting a timer replaces whichever was running, so
//! a media poll and the simulation can never advance progress together.

use tracing::trace;

/// What drives progress while a track is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTimer {
    /// Sample position/duration from the audio output
    MediaPoll,

    /// Add a fixed step per tick until 100
    Simulation,
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    active: Option<ProgressTimer>,
}

impl TimerSlot {
    /// Start `kind`, cancelling any other timer. Returns false if it was already running.
    pub fn start(&mut self, kind: ProgressTimer) -> bool {
        if self.active == Some(kind) {
            return false;
        }
        if let Some(previous) = self.active.replace(kind) {
            trace!(?previous, next = ?kind, "Replaced progress timer");
        }
        true
    }

    pub fn stop(&mut self) -> Option<ProgressTimer> {
        self.active.take()
    }

    pub fn active(&self) -> Option<ProgressTimer> {
        self.active
    }
}
