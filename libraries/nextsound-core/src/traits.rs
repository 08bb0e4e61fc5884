/// Collaborator traits for NextSound
///
/// The playback core talks to the outside world only through these seams,
/// so every implementation (HTTP clients, local files, test fakes) is
/// injected at construction.
use crate::error::Result;
use crate::types::{AlbumWithTracks, ArtistSummary, Provider, Track, TrackKey, User};
use async_trait::async_trait;

/// Catalog search/lookup backend
///
/// All calls are plain request/response. Implementations are expected to
/// apply their own network-level retry policy; callers treat any returned
/// error as final.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Which catalog this provider serves
    fn provider(&self) -> Provider;

    /// Search for tracks by free text
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>>;

    /// Search for artists by free text
    async fn search_artists(&self, query: &str, limit: usize) -> Result<Vec<ArtistSummary>>;

    /// Fetch an album and its track list
    async fn lookup_album(&self, id: &str) -> Result<AlbumWithTracks>;

    /// Fetch an artist's most popular tracks
    async fn artist_top_tracks(&self, artist_id: &str, limit: usize) -> Result<Vec<Track>>;
}

/// Server-side favorites storage scoped to the current session
///
/// Uniqueness conflicts are reported as `CoreError::Conflict` and missing
/// rows as `CoreError::NotFound`; the favorites client decides which of
/// those count as success.
#[async_trait]
pub trait FavoritesBackend: Send + Sync {
    /// All favorites, most recently added first
    async fn list(&self) -> Result<Vec<Track>>;

    /// Store a favorite
    async fn add(&self, track: &Track) -> Result<()>;

    /// Delete a favorite by its provider-qualified key
    async fn remove(&self, key: &TrackKey) -> Result<()>;
}

/// Authentication state supplied by the host application
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signed-in user, if any
    async fn current_user(&self) -> Result<Option<User>>;
}

/// Client-side persisted blobs (search history, legacy favorites)
///
/// Non-authoritative cache: values are opaque strings, usually JSON.
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
