//! Playback engine - core state machine
//!
//! Owns the single audio output, the up-next queue, the favorites mirror and
//! the progress timer slot. Every transition is a synchronous method; the
//! host supplies the 250 ms heartbeat through [`PlaybackEngine::tick`] and
//! performs preview lookups handed out as [`LoadRequest`]s.
//!
//! Phases:
//!
//! ```text
//!   Idle --play--> Loading --resolved(url)--> PlayingReal
//!                     |                         |   ^
//!                     +--resolved(none)--+      |   | toggle
//!                                        v      v   |
//!                              PlayingSimulated  Paused
//! ```
//!
//! A track that already carries a preview URL skips `Loading`.

use crate::{
    events::{NoticeLevel, Notification, PlaybackEvent},
    favorites::FavoritesSet,
    output::{AudioOutput, MediaEvent},
    queue::Queue,
    timer::{ProgressTimer, TimerSlot},
    types::{
        clamp_percent, EnginePhase, EnqueueOutcome, LoadRequest, PlaybackConfig, PlaybackSnapshot,
        RepeatMode,
    },
    volume::Volume,
};
use nextsound_core::Track;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Client-side playback state machine
pub struct PlaybackEngine {
    config: PlaybackConfig,

    // State
    phase: EnginePhase,
    current_track: Option<Track>,
    is_playing: bool,
    progress: f64,

    // Settings
    volume: Volume,
    shuffled: bool,
    repeat: RepeatMode,

    // Layout flags
    minimized: bool,
    queue_open: bool,

    queue: Queue,
    favorites: FavoritesSet,
    favorites_loading: bool,

    output: Box<dyn AudioOutput>,
    timer: TimerSlot,

    // Load generation; bumped on every load and on close
    load_token: u64,
    awaiting: Option<u64>,

    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Create new engine around an audio output
    pub fn new(config: PlaybackConfig, output: Box<dyn AudioOutput>) -> Self {
        let volume = Volume::new(config.volume);
        let mut output = output;
        output.set_volume(volume.gain());

        Self {
            config,
            phase: EnginePhase::Idle,
            current_track: None,
            is_playing: false,
            progress: 0.0,
            volume,
            shuffled: false,
            repeat: RepeatMode::Off,
            minimized: false,
            queue_open: false,
            queue: Queue::new(),
            favorites: FavoritesSet::new(),
            favorites_loading: false,
            output,
            timer: TimerSlot::default(),
            load_token: 0,
            awaiting: None,
            rng: StdRng::from_entropy(),
            pending_events: Vec::new(),
        }
    }

    /// Use a fixed shuffle seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Transport =====

    /// Play a track, or toggle play/pause if it is already current
    ///
    /// Returns a lookup to perform when the track has no preview URL.
    pub fn play_track(&mut self, track: Track) -> Option<LoadRequest> {
        if self
            .current_track
            .as_ref()
            .is_some_and(|current| current.same_as(&track))
        {
            self.toggle_play();
            return None;
        }
        self.start_track(track)
    }

    /// Flip play/pause; no-op without a current track
    pub fn toggle_play(&mut self) {
        if self.current_track.is_none() {
            return;
        }
        self.is_playing = !self.is_playing;
        self.apply_transport();
        self.sync_phase();
    }

    /// Advance to the next queued track
    ///
    /// Head of the queue, or a random entry when shuffled. Empty queue is a no-op.
    pub fn skip_next(&mut self) -> Option<LoadRequest> {
        let next = self.queue.dequeue_next(self.shuffled, &mut self.rng)?;
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.start_track(next)
    }

    /// No history is kept, so there is nothing to go back to
    pub fn skip_previous(&mut self) {
        debug!("Skip previous ignored, no playback history");
    }

    /// Jump to a percentage of the current track
    pub fn seek(&mut self, percent: f64) {
        let percent = clamp_percent(percent);
        self.progress = percent;

        if !self.output.has_source() {
            return;
        }
        let Some(duration) = self.output.duration().filter(|d| !d.is_zero()) else {
            return;
        };
        let position = duration.mul_f64(percent / 100.0);
        if let Err(e) = self.output.seek(position) {
            warn!(error = %e, "Seek rejected by output");
        }
    }

    pub fn set_volume(&mut self, percent: f64) {
        self.volume.set_percent(percent);
        self.output.set_volume(self.volume.gain());
        self.emit(PlaybackEvent::VolumeChanged {
            percent: self.volume.percent(),
        });
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffled = !self.shuffled;
        self.emit(PlaybackEvent::ShuffleChanged {
            enabled: self.shuffled,
        });
    }

    /// Cycle Off -> One -> All -> Off
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
        self.emit(PlaybackEvent::RepeatChanged { mode: self.repeat });
    }

    pub fn toggle_minimize(&mut self) {
        self.minimized = !self.minimized;
    }

    pub fn toggle_queue_panel(&mut self) {
        self.queue_open = !self.queue_open;
    }

    /// Stop everything and return to the initial state; favorites survive
    pub fn close_player(&mut self) {
        self.timer.stop();
        self.output.pause();
        self.output.clear_source();
        self.load_token += 1;
        self.awaiting = None;

        self.current_track = None;
        self.is_playing = false;
        self.progress = 0.0;
        self.volume = Volume::new(self.config.volume);
        self.output.set_volume(self.volume.gain());
        self.shuffled = false;
        self.repeat = RepeatMode::Off;
        self.minimized = false;
        self.queue_open = false;
        self.queue.clear();

        info!("Player closed");
        self.sync_phase();
    }

    // ===== Queue =====

    /// Append to the up-next queue unless already present
    pub fn add_to_queue(&mut self, track: Track) -> EnqueueOutcome {
        let title = track.title.clone();
        if !self.queue.enqueue(track) {
            self.notify(
                NoticeLevel::Warning,
                format!("\"{title}\" is already in the queue"),
            );
            return EnqueueOutcome::AlreadyQueued;
        }

        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.notify(NoticeLevel::Success, format!("Added \"{title}\" to queue"));
        EnqueueOutcome::Added
    }

    /// Remove the queue entry at `index`; out of range is a no-op
    pub fn remove_from_queue(&mut self, index: usize) -> Option<Track> {
        let removed = self.queue.remove_at(index)?;
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        Some(removed)
    }

    /// Replace the queue with a new ordering (duplicates dropped)
    pub fn reorder_queue(&mut self, tracks: Vec<Track>) {
        self.queue.replace_all(tracks);
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    /// Play the first track and queue the rest; empty input is a no-op
    pub fn play_all_tracks(&mut self, tracks: Vec<Track>) -> Option<LoadRequest> {
        let total = tracks.len();
        let mut tracks = tracks.into_iter();
        let first = tracks.next()?;

        self.queue.replace_all(tracks);
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.notify(NoticeLevel::Success, format!("Playing {total} tracks"));
        self.start_track(first)
    }

    // ===== Loading =====

    /// Apply a finished preview lookup
    ///
    /// Ignored (returns false) when a newer load or a close happened since
    /// `token` was issued. Only the preview URL is taken from `resolved`.
    pub fn complete_load(&mut self, token: u64, resolved: Track) -> bool {
        if self.awaiting != Some(token) {
            debug!(token, current = self.load_token, "Discarding stale preview lookup");
            return false;
        }
        let Some(current) = self.current_track.as_mut() else {
            return false;
        };
        if !current.same_as(&resolved) {
            warn!(expected = %current.key(), got = %resolved.key(), "Lookup returned a different track");
            return false;
        }

        self.awaiting = None;
        let url = resolved.preview_url.filter(|url| !url.is_empty());
        match url {
            Some(url) => {
                current.preview_url = Some(url.clone());
                let key = current.key();
                self.emit(PlaybackEvent::TrackEnhanced { track: key });
                self.attach_source(&url);
            }
            None => self.start_simulation(),
        }
        self.sync_phase();
        true
    }

    // ===== Heartbeat =====

    /// Drive one timer period
    ///
    /// Drains output notifications, then advances whichever progress timer
    /// is active. May start the next track, in which case a lookup can be
    /// returned.
    pub fn tick(&mut self) -> Option<LoadRequest> {
        let mut request = None;
        while let Some(event) = self.output.poll_event() {
            match event {
                MediaEvent::Ended => {
                    if let Some(next) = self.on_media_ended() {
                        request = Some(next);
                    }
                }
                MediaEvent::Error(message) => self.on_media_error(&message),
            }
        }

        match self.timer.active() {
            Some(ProgressTimer::MediaPoll) => self.sample_progress(),
            Some(ProgressTimer::Simulation) => self.advance_simulation(),
            None => {}
        }

        self.sync_phase();
        request
    }

    /// Real audio reached its end
    pub fn on_media_ended(&mut self) -> Option<LoadRequest> {
        let finished = self.current_track.as_ref()?.key();
        self.emit(PlaybackEvent::TrackFinished {
            track: finished.clone(),
        });

        if self.repeat == RepeatMode::One {
            debug!(track = %finished, "Repeating track");
            self.progress = 0.0;
            self.is_playing = true;
            let restarted = self
                .output
                .seek(Duration::ZERO)
                .and_then(|()| self.output.play());
            match restarted {
                Ok(()) => {
                    self.timer.start(ProgressTimer::MediaPoll);
                }
                Err(e) => self.on_media_error(&e.to_string()),
            }
            self.sync_phase();
            return None;
        }

        if let Some(next) = self.queue.dequeue_next(self.shuffled, &mut self.rng) {
            self.emit(PlaybackEvent::QueueChanged {
                length: self.queue.len(),
            });
            return self.start_track(next);
        }

        self.timer.stop();
        self.is_playing = false;
        self.progress = 0.0;
        // Rewind so a later resume replays the clip instead of ending at once
        self.output.pause();
        if let Err(e) = self.output.seek(Duration::ZERO) {
            warn!(track = %finished, error = %e, "Could not rewind finished track");
        }
        self.sync_phase();
        None
    }

    /// Real audio failed; stop playback, keep the track
    pub fn on_media_error(&mut self, message: &str) {
        let Some(track) = self.current_track.as_ref().map(Track::key) else {
            return;
        };
        error!(track = %track, error = %message, "Audio playback failed");

        self.timer.stop();
        self.output.pause();
        self.is_playing = false;
        self.emit(PlaybackEvent::MediaFailed {
            track,
            message: message.to_string(),
        });
        self.sync_phase();
    }

    // ===== Queries =====

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn volume(&self) -> f64 {
        self.volume.percent()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_queue_open(&self) -> bool {
        self.queue_open
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn active_timer(&self) -> Option<ProgressTimer> {
        self.timer.active()
    }

    /// Token of the most recent load
    pub fn load_token(&self) -> u64 {
        self.load_token
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    pub fn is_favorite(&self, track: &Track) -> bool {
        self.favorites.contains(&track.key())
    }

    pub fn is_loading_favorites(&self) -> bool {
        self.favorites_loading
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.current_track.clone(),
            is_playing: self.is_playing,
            progress_percent: self.progress,
            volume_percent: self.volume.percent(),
            is_shuffled: self.shuffled,
            repeat_mode: self.repeat,
            is_minimized: self.minimized,
            queue: self.queue.to_vec(),
            is_queue_open: self.queue_open,
            favorites: self.favorites.keys(),
            is_loading_favorites: self.favorites_loading,
            phase: self.phase,
        }
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Favorites mirror (driven by the async player) =====

    pub(crate) fn favorites_mut(&mut self) -> &mut FavoritesSet {
        &mut self.favorites
    }

    pub(crate) fn replace_favorites(&mut self, favorites: FavoritesSet) {
        self.favorites = favorites;
        self.emit_favorites_changed();
    }

    pub(crate) fn set_favorites_loading(&mut self, loading: bool) {
        self.favorites_loading = loading;
    }

    pub(crate) fn emit_favorites_changed(&mut self) {
        self.emit(PlaybackEvent::FavoritesChanged {
            count: self.favorites.len(),
        });
    }

    pub(crate) fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.emit(PlaybackEvent::Notice(Notification::new(level, message)));
    }

    // ===== Internal =====

    fn start_track(&mut self, track: Track) -> Option<LoadRequest> {
        let previous = self.current_track.as_ref().map(Track::key);
        info!(track = %track.key(), title = %track.title, "Starting track");
        self.emit(PlaybackEvent::TrackChanged {
            track: track.key(),
            previous,
        });

        self.current_track = Some(track);
        self.is_playing = true;
        self.progress = 0.0;

        let request = self.load_current();
        self.sync_phase();
        request
    }

    /// Tear down whatever was playing and load the current track
    fn load_current(&mut self) -> Option<LoadRequest> {
        self.load_token += 1;
        let token = self.load_token;

        self.timer.stop();
        self.output.pause();
        self.output.clear_source();

        let track = self.current_track.clone()?;
        match track.preview_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => {
                self.awaiting = None;
                self.attach_source(url);
                None
            }
            None => {
                debug!(track = %track.key(), token, "No preview URL, requesting lookup");
                self.awaiting = Some(token);
                self.emit(PlaybackEvent::ResolutionRequested {
                    track: track.key(),
                    token,
                });
                Some(LoadRequest { token, track })
            }
        }
    }

    /// Attach real audio; any failure falls back to simulation
    fn attach_source(&mut self, url: &str) {
        if let Err(e) = self.output.set_source(url) {
            warn!(error = %e, "Could not attach preview, simulating");
            self.start_simulation();
            return;
        }
        self.output.set_volume(self.volume.gain());

        if !self.is_playing {
            return;
        }
        match self.output.play() {
            Ok(()) => {
                self.timer.start(ProgressTimer::MediaPoll);
            }
            Err(e) => {
                warn!(error = %e, "Playback refused, simulating");
                self.start_simulation();
            }
        }
    }

    fn start_simulation(&mut self) {
        self.output.clear_source();
        if let Some(track) = self.current_track.as_ref().map(Track::key) {
            info!(track = %track, "Simulating playback");
            self.emit(PlaybackEvent::SimulationStarted { track });
        }
        if self.is_playing {
            self.timer.start(ProgressTimer::Simulation);
        } else {
            self.timer.stop();
        }
    }

    /// Bring output and timer in line with `is_playing`
    fn apply_transport(&mut self) {
        if !self.is_playing {
            self.output.pause();
            self.timer.stop();
            return;
        }

        // A pending lookup starts playback itself
        if self.awaiting.is_some() {
            return;
        }

        if self.output.has_source() {
            if self.output.is_paused() {
                if let Err(e) = self.output.play() {
                    warn!(error = %e, "Resume refused, simulating");
                    self.start_simulation();
                    return;
                }
            }
            self.timer.start(ProgressTimer::MediaPoll);
        } else {
            self.timer.start(ProgressTimer::Simulation);
        }
    }

    fn sample_progress(&mut self) {
        let Some(duration) = self.output.duration().filter(|d| !d.is_zero()) else {
            return;
        };
        let position = self.output.position();
        self.progress = clamp_percent(position.as_secs_f64() / duration.as_secs_f64() * 100.0);
    }

    fn advance_simulation(&mut self) {
        self.progress = clamp_percent(self.progress + self.config.simulation_step);
        if self.progress < 100.0 {
            return;
        }

        self.timer.stop();
        self.is_playing = false;
        self.progress = 0.0;
        if let Some(track) = self.current_track.as_ref().map(Track::key) {
            debug!(track = %track, "Simulated playback finished");
            self.emit(PlaybackEvent::TrackFinished { track });
        }
    }

    fn sync_phase(&mut self) {
        let phase = if self.current_track.is_none() {
            EnginePhase::Idle
        } else if self.awaiting.is_some() {
            EnginePhase::Loading
        } else if !self.is_playing {
            EnginePhase::Paused
        } else if self.output.has_source() {
            EnginePhase::PlayingReal
        } else {
            EnginePhase::PlayingSimulated
        };

        if phase != self.phase {
            self.phase = phase;
            self.emit(PlaybackEvent::StateChanged { phase });
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("phase", &self.phase)
            .field("current_track", &self.current_track.as_ref().map(Track::key))
            .field("progress", &self.progress)
            .field("queue_len", &self.queue.len())
            .field("load_token", &self.load_token)
            .finish_non_exhaustive()
    }
}
