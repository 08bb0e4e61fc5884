//! Audio output without a sound device
//!
//! Keeps a virtual clock so that progress, seeking and end-of-media behave
//! like a real preview clip. Used by the command-line host and in tests.

use nextsound_playback::{AudioOutput, MediaEvent, PlaybackError, Result};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Length assumed for every preview clip
pub const PREVIEW_LENGTH: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct HeadlessOutput {
    source: Option<String>,
    clip_length: Duration,
    /// Position accumulated before the current play stretch
    offset: Duration,
    /// Start of the current play stretch; `None` while paused
    playing_since: Option<Instant>,
    gain: f32,
    ended_reported: bool,
}

impl HeadlessOutput {
    pub fn new() -> Self {
        Self::with_clip_length(PREVIEW_LENGTH)
    }

    pub fn with_clip_length(clip_length: Duration) -> Self {
        Self {
            source: None,
            clip_length,
            offset: Duration::ZERO,
            playing_since: None,
            gain: 1.0,
            ended_reported: false,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn freeze(&mut self) {
        if let Some(since) = self.playing_since.take() {
            self.offset = (self.offset + since.elapsed()).min(self.clip_length);
        }
    }
}

impl Default for HeadlessOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for HeadlessOutput {
    fn set_source(&mut self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url)
            .map_err(|e| PlaybackError::output(format!("invalid source {url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https" | "file") {
            return Err(PlaybackError::output(format!(
                "unsupported source scheme: {}",
                parsed.scheme()
            )));
        }

        debug!(url = %url, "Headless source attached");
        self.source = Some(url.to_string());
        self.offset = Duration::ZERO;
        self.playing_since = None;
        self.ended_reported = false;
        Ok(())
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.offset = Duration::ZERO;
        self.playing_since = None;
        self.ended_reported = false;
    }

    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::output("no source attached"));
        }
        if self.playing_since.is_none() {
            // Playing a finished clip starts it over
            if self.offset >= self.clip_length {
                self.offset = Duration::ZERO;
                self.ended_reported = false;
            }
            self.playing_since = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.freeze();
    }

    fn is_paused(&self) -> bool {
        self.playing_since.is_none()
    }

    fn set_volume(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::output("no source attached"));
        }
        self.offset = position.min(self.clip_length);
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
        self.ended_reported = false;
        Ok(())
    }

    fn position(&self) -> Duration {
        let running = self.playing_since.map_or(Duration::ZERO, |since| since.elapsed());
        (self.offset + running).min(self.clip_length)
    }

    fn duration(&self) -> Option<Duration> {
        self.source.as_ref().map(|_| self.clip_length)
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        if self.source.is_none() || self.ended_reported || self.position() < self.clip_length {
            return None;
        }
        self.freeze();
        self.ended_reported = true;
        Some(MediaEvent::Ended)
    }
}
