//! Shared test infrastructure for playback tests

#![allow(dead_code)]

use nextsound_core::{Provider, Track};
use nextsound_playback::{AudioOutput, MediaEvent, PlaybackError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Observable state of a [`FakeOutput`]
#[derive(Debug, Default)]
pub struct OutputState {
    pub source: Option<String>,
    pub paused: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub gain: f32,
    pub events: VecDeque<MediaEvent>,
    /// Reject the next `play()` calls
    pub refuse_play: bool,
    pub sources_set: Vec<String>,
    pub play_calls: usize,
}

/// In-memory audio output whose state stays visible to the test
pub struct FakeOutput {
    state: Arc<Mutex<OutputState>>,
}

/// Test-side handle onto a [`FakeOutput`]
#[derive(Clone)]
pub struct OutputHandle {
    state: Arc<Mutex<OutputState>>,
}

impl FakeOutput {
    pub fn new() -> (Self, OutputHandle) {
        let state = Arc::new(Mutex::new(OutputState {
            paused: true,
            ..OutputState::default()
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            OutputHandle { state },
        )
    }

    fn state(&self) -> MutexGuard<'_, OutputState> {
        self.state.lock().unwrap()
    }
}

impl OutputHandle {
    pub fn state(&self) -> MutexGuard<'_, OutputState> {
        self.state.lock().unwrap()
    }

    /// Move the playhead as if audio had been playing
    pub fn advance_to(&self, position: Duration) {
        self.state().position = position;
    }

    /// Queue an "ended" notification
    pub fn finish(&self) {
        self.state().events.push_back(MediaEvent::Ended);
    }

    pub fn fail(&self, message: &str) {
        self.state()
            .events
            .push_back(MediaEvent::Error(message.to_string()));
    }
}

impl AudioOutput for FakeOutput {
    fn set_source(&mut self, url: &str) -> Result<()> {
        let mut state = self.state();
        state.source = Some(url.to_string());
        state.sources_set.push(url.to_string());
        state.paused = true;
        state.position = Duration::ZERO;
        state.duration = Some(Duration::from_secs(30));
        Ok(())
    }

    fn clear_source(&mut self) {
        let mut state = self.state();
        state.source = None;
        state.paused = true;
        state.position = Duration::ZERO;
        state.duration = None;
    }

    fn has_source(&self) -> bool {
        self.state().source.is_some()
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state();
        state.play_calls += 1;
        if state.refuse_play {
            return Err(PlaybackError::output("autoplay blocked"));
        }
        if state.source.is_none() {
            return Err(PlaybackError::output("no source"));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.state().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn set_volume(&mut self, gain: f32) {
        self.state().gain = gain;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let mut state = self.state();
        if state.source.is_none() {
            return Err(PlaybackError::output("no source"));
        }
        state.position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.state().position
    }

    fn duration(&self) -> Option<Duration> {
        self.state().duration
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.state().events.pop_front()
    }
}

pub fn track(id: &str) -> Track {
    Track::new(Provider::Deezer, id, format!("Song {id}"), format!("Artist {id}"))
}

pub fn track_with_preview(id: &str) -> Track {
    track(id).with_preview(format!("http://x/{id}.mp3"))
}
