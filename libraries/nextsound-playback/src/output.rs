//! Platform-agnostic audio output trait
//!
//! Abstracts the single media element that plays preview clips. In a browser
//! host this wraps an `<audio>` element; the CLI drives a headless clock.

use crate::error::Result;
use std::time::Duration;

/// Notifications raised by the output outside of a direct call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Attached media played to its end
    Ended,

    /// Attached media failed to load or decode
    Error(String),
}

/// Single audio output handle owned by the playback engine
///
/// At most one source is attached at a time. Replacing or clearing the
/// source stops whatever was playing.
pub trait AudioOutput: Send {
    /// Attach a new source URL, replacing any previous one
    ///
    /// The output starts paused at position zero.
    fn set_source(&mut self, url: &str) -> Result<()>;

    /// Detach the current source
    fn clear_source(&mut self);

    /// Whether a source is attached
    fn has_source(&self) -> bool;

    /// Start or resume playback of the attached source
    ///
    /// # Returns
    /// * `Err(_)` - Playback refused (autoplay policy, unsupported format, no source)
    fn play(&mut self) -> Result<()>;

    /// Pause playback; no-op without a source
    fn pause(&mut self);

    /// Whether the output is paused (true without a source)
    fn is_paused(&self) -> bool;

    /// Set output gain (0.0-1.0)
    fn set_volume(&mut self, gain: f32);

    /// Seek to position in the attached source
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playback position
    fn position(&self) -> Duration;

    /// Total duration, once known
    fn duration(&self) -> Option<Duration>;

    /// Take the next pending media notification
    ///
    /// Polled by the engine on every tick.
    fn poll_event(&mut self) -> Option<MediaEvent> {
        None
    }
}
