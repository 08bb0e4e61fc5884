//! Async player facade
//!
//! Wraps the synchronous [`PlaybackEngine`] behind a tokio mutex and runs the
//! slow collaborators (preview lookup, favorites backend, auth) outside the
//! lock. The engine lock is never held across an `.await`.

use crate::{
    engine::PlaybackEngine,
    error::{PlaybackError, Result},
    events::{NoticeLevel, PlaybackEvent},
    favorites::{FavoritesClient, FavoritesSet},
    output::AudioOutput,
    resolver::PreviewResolver,
    types::{EnqueueOutcome, FavoriteToggle, LoadRequest, PlaybackConfig, PlaybackSnapshot},
};
use nextsound_core::{AuthProvider, CatalogProvider, FavoritesBackend, KeyValueStore, Track};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Collaborators the player is built from
pub struct PlayerDeps {
    pub output: Box<dyn AudioOutput>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub favorites: Arc<dyn FavoritesBackend>,
    pub auth: Arc<dyn AuthProvider>,
    pub local: Arc<dyn KeyValueStore>,
}

pub struct Player {
    engine: Arc<Mutex<PlaybackEngine>>,
    resolver: PreviewResolver,
    favorites: FavoritesClient,
    auth: Arc<dyn AuthProvider>,
    tick_interval: Duration,
}

impl Player {
    pub fn new(config: PlaybackConfig, deps: PlayerDeps) -> Self {
        let tick_interval = config.tick_interval();
        let resolver = PreviewResolver::new(deps.catalog, config.resolve_timeout());
        let engine = PlaybackEngine::new(config, deps.output);

        Self::from_engine(engine, resolver, FavoritesClient::new(deps.favorites, deps.local), deps.auth)
            .with_tick_interval(tick_interval)
    }

    /// Assemble from pre-built parts
    pub fn from_engine(
        engine: PlaybackEngine,
        resolver: PreviewResolver,
        favorites: FavoritesClient,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            resolver,
            favorites,
            auth,
            tick_interval: PlaybackConfig::default().tick_interval(),
        }
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Shared handle to the engine for hosts that need direct access
    pub fn engine(&self) -> Arc<Mutex<PlaybackEngine>> {
        Arc::clone(&self.engine)
    }

    // ===== Transport =====

    pub async fn play_track(&self, track: Track) {
        let request = self.engine.lock().await.play_track(track);
        self.fulfil(request).await;
    }

    pub async fn toggle_play(&self) {
        self.engine.lock().await.toggle_play();
    }

    pub async fn skip_next(&self) {
        let request = self.engine.lock().await.skip_next();
        self.fulfil(request).await;
    }

    pub async fn skip_previous(&self) {
        self.engine.lock().await.skip_previous();
    }

    pub async fn seek(&self, percent: f64) {
        self.engine.lock().await.seek(percent);
    }

    pub async fn set_volume(&self, percent: f64) {
        self.engine.lock().await.set_volume(percent);
    }

    pub async fn toggle_shuffle(&self) {
        self.engine.lock().await.toggle_shuffle();
    }

    pub async fn toggle_repeat(&self) {
        self.engine.lock().await.toggle_repeat();
    }

    pub async fn toggle_minimize(&self) {
        self.engine.lock().await.toggle_minimize();
    }

    pub async fn toggle_queue_panel(&self) {
        self.engine.lock().await.toggle_queue_panel();
    }

    pub async fn close_player(&self) {
        self.engine.lock().await.close_player();
    }

    // ===== Queue =====

    pub async fn add_to_queue(&self, track: Track) -> EnqueueOutcome {
        self.engine.lock().await.add_to_queue(track)
    }

    pub async fn remove_from_queue(&self, index: usize) -> Option<Track> {
        self.engine.lock().await.remove_from_queue(index)
    }

    pub async fn reorder_queue(&self, tracks: Vec<Track>) {
        self.engine.lock().await.reorder_queue(tracks);
    }

    pub async fn play_all_tracks(&self, tracks: Vec<Track>) {
        let request = self.engine.lock().await.play_all_tracks(tracks);
        self.fulfil(request).await;
    }

    // ===== State =====

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.engine.lock().await.snapshot()
    }

    pub async fn drain_events(&self) -> Vec<PlaybackEvent> {
        self.engine.lock().await.drain_events()
    }

    /// Run one heartbeat and finish any load it triggered
    pub async fn tick(&self) {
        let request = self.engine.lock().await.tick();
        self.fulfil(request).await;
    }

    /// Drive the engine heartbeat until the handle is aborted
    ///
    /// Lookups started by a tick run on their own task so the heartbeat
    /// keeps its cadence.
    pub fn spawn_ticker(self: &Arc<Self>) -> JoinHandle<()> {
        let player = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(player.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let request = player.engine.lock().await.tick();
                if let Some(request) = request {
                    let loader = Arc::clone(&player);
                    tokio::spawn(async move { loader.fulfil(Some(request)).await });
                }
            }
        })
    }

    // ===== Favorites =====

    /// Refresh favorites from the backend
    ///
    /// Signed-out users get an empty set. Locally saved favorites are
    /// migrated first. Returns the number of favorites loaded.
    pub async fn load_favorites(&self) -> Result<usize> {
        let user = match self.auth.current_user().await {
            Ok(user) => user,
            Err(e) => return self.favorites_load_failed(e.into()).await,
        };
        if user.is_none() {
            let mut engine = self.engine.lock().await;
            engine.replace_favorites(FavoritesSet::new());
            return Ok(0);
        }

        self.engine.lock().await.set_favorites_loading(true);

        let migrated = match self.favorites.migrate_legacy().await {
            Ok(count) => count,
            Err(e) => return self.favorites_load_failed(e.into()).await,
        };
        let tracks = match self.favorites.list().await {
            Ok(tracks) => tracks,
            Err(e) => return self.favorites_load_failed(e.into()).await,
        };

        let mut engine = self.engine.lock().await;
        if migrated > 0 {
            engine.notify(
                NoticeLevel::Success,
                format!("Migrated {migrated} favorites to your account"),
            );
        }
        let favorites = FavoritesSet::from_tracks(tracks);
        let count = favorites.len();
        engine.replace_favorites(favorites);
        engine.set_favorites_loading(false);
        info!(count, "Favorites loaded");
        Ok(count)
    }

    /// Add or remove a favorite with an optimistic local update
    ///
    /// The mirror flips before the backend call and flips back if it fails.
    pub async fn toggle_favorite(&self, track: &Track) -> Result<FavoriteToggle> {
        let user = match self.auth.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Could not determine session");
                self.notify(NoticeLevel::Error, "Failed to update favorites").await;
                return Err(e.into());
            }
        };
        if user.is_none() {
            self.notify(NoticeLevel::Error, "Please sign in to save favorites").await;
            return Err(PlaybackError::AuthRequired);
        }

        let key = track.key();
        let removed = {
            let mut engine = self.engine.lock().await;
            let removed = engine.favorites_mut().remove(&key);
            if removed.is_none() {
                engine.favorites_mut().insert(track.clone());
            }
            engine.emit_favorites_changed();
            removed
        };

        let outcome = match removed {
            Some(_) => self.favorites.remove(&key).await,
            None => self.favorites.add(track).await,
        };

        let mut engine = self.engine.lock().await;
        match (outcome, removed) {
            (Ok(()), Some(_)) => {
                engine.notify(NoticeLevel::Info, format!("Removed \"{}\" from favorites", track.title));
                Ok(FavoriteToggle::Removed)
            }
            (Ok(()), None) => {
                engine.notify(NoticeLevel::Success, format!("Added \"{}\" to favorites", track.title));
                Ok(FavoriteToggle::Added)
            }
            (Err(e), removed) => {
                warn!(track = %key, error = %e, "Favorite update failed, reverting");
                match removed {
                    Some((index, previous)) => engine.favorites_mut().restore(index, previous),
                    None => {
                        engine.favorites_mut().remove(&key);
                    }
                }
                engine.emit_favorites_changed();
                engine.notify(NoticeLevel::Error, "Failed to update favorites");
                Err(e.into())
            }
        }
    }

    pub async fn is_favorite(&self, track: &Track) -> bool {
        self.engine.lock().await.is_favorite(track)
    }

    // ===== Internal =====

    /// Perform a lookup and hand the result back to the engine
    async fn fulfil(&self, request: Option<LoadRequest>) {
        let Some(LoadRequest { token, track }) = request else {
            return;
        };

        let resolved = self.resolver.resolve(&track).await;
        let applied = self.engine.lock().await.complete_load(token, resolved);
        if !applied {
            debug!(token, track = %track.key(), "Lookup result superseded");
        }
    }

    async fn favorites_load_failed(&self, error: PlaybackError) -> Result<usize> {
        warn!(error = %error, "Failed to load favorites");
        let mut engine = self.engine.lock().await;
        engine.set_favorites_loading(false);
        engine.notify(NoticeLevel::Error, "Failed to load your favorites");
        Err(error)
    }

    async fn notify(&self, level: NoticeLevel, message: &str) {
        self.engine.lock().await.notify(level, message);
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("resolver", &self.resolver)
            .field("tick_interval", &self.tick_interval)
            .finish_non_exhaustive()
    }
}
