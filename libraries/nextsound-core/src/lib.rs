//! NextSound Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! for NextSound.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackKey`, `ArtistSummary`, `AlbumSummary`, `User`
//! - **Collaborator Traits**: `CatalogProvider`, `FavoritesBackend`, `AuthProvider`,
//!   `KeyValueStore`
//! - **Local Storage**: in-memory and JSON-file key-value stores
//! - **Error Handling**: unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use nextsound_core::types::{Provider, Track};
//!
//! let track = Track::new(Provider::Itunes, "1440857781", "Blinding Lights", "The Weeknd")
//!     .with_album("After Hours");
//!
//! assert!(track.preview_url.is_none());
//! let enhanced = track.with_preview("https://audio.example/blinding.m4a");
//! assert_eq!(enhanced.key(), track.key());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use storage::{JsonFileStore, MemoryStore};
pub use traits::{AuthProvider, CatalogProvider, FavoritesBackend, KeyValueStore};
pub use types::{
    AlbumSummary, AlbumWithTracks, ArtistSummary, Provider, Track, TrackKey, User,
};
