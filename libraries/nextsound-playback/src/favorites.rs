//! Favorites
//!
//! [`FavoritesSet`] is the in-memory mirror the UI reads; [`FavoritesClient`]
//! wraps the server-side backend and the one-time migration of favorites
//! saved locally before accounts existed.

use nextsound_core::storage::load_json;
use nextsound_core::{CoreError, FavoritesBackend, KeyValueStore, Result, Track, TrackKey};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Local storage key holding pre-account favorites
pub const LEGACY_FAVORITES_KEY: &str = "nextsound_favorites";

/// Favorite tracks, most recently added first, unique by key
#[derive(Debug, Clone, Default)]
pub struct FavoritesSet {
    tracks: Vec<Track>,
    keys: HashSet<TrackKey>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a backend listing, dropping later duplicates
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut set = Self::new();
        for track in tracks {
            if set.keys.insert(track.key()) {
                set.tracks.push(track);
            }
        }
        set
    }

    pub fn contains(&self, key: &TrackKey) -> bool {
        self.keys.contains(key)
    }

    /// Add at the front; false if already present
    pub fn insert(&mut self, track: Track) -> bool {
        if !self.keys.insert(track.key()) {
            return false;
        }
        self.tracks.insert(0, track);
        true
    }

    /// Remove by key, returning the former position and track
    pub fn remove(&mut self, key: &TrackKey) -> Option<(usize, Track)> {
        if !self.keys.remove(key) {
            return None;
        }
        let index = self
            .tracks
            .iter()
            .position(|t| t.provider == key.provider && t.id == key.id)?;
        Some((index, self.tracks.remove(index)))
    }

    /// Put a removed track back where it was
    pub fn restore(&mut self, index: usize, track: Track) {
        if self.keys.insert(track.key()) {
            let index = index.min(self.tracks.len());
            self.tracks.insert(index, track);
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn keys(&self) -> Vec<TrackKey> {
        self.tracks.iter().map(Track::key).collect()
    }
}

/// Favorites backend with idempotent writes and legacy migration
#[derive(Clone)]
pub struct FavoritesClient {
    backend: Arc<dyn FavoritesBackend>,
    local: Arc<dyn KeyValueStore>,
}

impl FavoritesClient {
    pub fn new(backend: Arc<dyn FavoritesBackend>, local: Arc<dyn KeyValueStore>) -> Self {
        Self { backend, local }
    }

    /// All favorites for the current session, newest first
    pub async fn list(&self) -> Result<Vec<Track>> {
        self.backend.list().await
    }

    /// Store a favorite; an existing row counts as success
    pub async fn add(&self, track: &Track) -> Result<()> {
        match self.backend.add(track).await {
            Err(CoreError::Conflict(reason)) => {
                debug!(track = %track.key(), reason = %reason, "Favorite already stored");
                Ok(())
            }
            other => other,
        }
    }

    /// Delete a favorite; a missing row counts as success
    pub async fn remove(&self, key: &TrackKey) -> Result<()> {
        match self.backend.remove(key).await {
            Err(CoreError::NotFound { .. }) => {
                debug!(track = %key, "Favorite already absent");
                Ok(())
            }
            other => other,
        }
    }

    /// Upload locally saved favorites, then clear the local copy
    ///
    /// Returns how many were migrated. The local copy is only cleared once
    /// every upload succeeded, so a failed run is retried next time.
    pub async fn migrate_legacy(&self) -> Result<usize> {
        let legacy: Vec<Track> = load_json(self.local.as_ref(), LEGACY_FAVORITES_KEY)?.unwrap_or_default();
        if legacy.is_empty() {
            return Ok(0);
        }

        info!(count = legacy.len(), "Migrating local favorites");
        for track in &legacy {
            if let Err(e) = self.add(track).await {
                warn!(track = %track.key(), error = %e, "Favorite migration interrupted");
                return Err(e);
            }
        }

        self.local.remove(LEGACY_FAVORITES_KEY)?;
        Ok(legacy.len())
    }
}

impl std::fmt::Debug for FavoritesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesClient").finish_non_exhaustive()
    }
}
