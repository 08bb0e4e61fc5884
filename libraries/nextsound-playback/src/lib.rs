//! NextSound - Playback Management
//!
//! Client-side playback engine for 30-second catalog previews.
//!
//! This crate provides:
//! - Single-output playback with automatic preview lookup
//! - Simulated progress when no audio can be found
//! - Up-next queue with de-duplication and shuffle selection
//! - Repeat modes (Off, One, All)
//! - Favorites mirror with optimistic updates
//!
//! # Architecture
//!
//! [`PlaybackEngine`] is a synchronous state machine with no I/O of its own:
//! - Audio goes through the [`AudioOutput`] trait
//! - Preview lookups are handed out as [`LoadRequest`]s and applied with
//!   [`PlaybackEngine::complete_load`]; late results are discarded
//! - Progress advances only when the host calls [`PlaybackEngine::tick`]
//!
//! [`Player`] wraps the engine for async hosts: it performs lookups through a
//! [`PreviewResolver`], talks to the favorites backend, and can drive the
//! heartbeat on a tokio task.
//!
//! # Example: Queue and Transport
//!
//! ```rust
//! use nextsound_core::{Provider, Track};
//! use nextsound_playback::{AudioOutput, EnginePhase, PlaybackConfig, PlaybackEngine, Result};
//! use std::time::Duration;
//!
//! // Output that never finds audio, so every track is simulated
//! struct Mute;
//!
//! impl AudioOutput for Mute {
//!     fn set_source(&mut self, _url: &str) -> Result<()> { Ok(()) }
//!     fn clear_source(&mut self) {}
//!     fn has_source(&self) -> bool { false }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn is_paused(&self) -> bool { true }
//!     fn set_volume(&mut self, _gain: f32) {}
//!     fn seek(&mut self, _position: Duration) -> Result<()> { Ok(()) }
//!     fn position(&self) -> Duration { Duration::ZERO }
//!     fn duration(&self) -> Option<Duration> { None }
//! }
//!
//! let mut engine = PlaybackEngine::new(PlaybackConfig::default(), Box::new(Mute));
//! let track = Track::new(Provider::Deezer, "3135556", "Harder, Better, Faster, Stronger", "Daft Punk");
//!
//! // No preview URL: the engine asks for a lookup
//! let request = engine.play_track(track.clone()).expect("lookup requested");
//! assert_eq!(engine.phase(), EnginePhase::Loading);
//!
//! // Lookup came back empty: progress is simulated
//! engine.complete_load(request.token, track);
//! assert_eq!(engine.phase(), EnginePhase::PlayingSimulated);
//!
//! engine.tick();
//! assert_eq!(engine.progress(), 1.0);
//! ```

#![forbid(unsafe_code)]

mod engine;
mod error;
pub mod events;
pub mod favorites;
mod output;
mod player;
pub mod queue;
mod resolver;
mod shuffle;
pub mod timer;
pub mod types;
mod volume;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{NoticeLevel, Notification, PlaybackEvent};
pub use favorites::{FavoritesClient, FavoritesSet, LEGACY_FAVORITES_KEY};
pub use output::{AudioOutput, MediaEvent};
pub use player::{Player, PlayerDeps};
pub use resolver::PreviewResolver;
pub use timer::ProgressTimer;
pub use types::{
    EnginePhase, EnqueueOutcome, FavoriteToggle, LoadRequest, PlaybackConfig, PlaybackSnapshot,
    RepeatMode,
};
pub use volume::Volume;
