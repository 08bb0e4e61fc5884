//! Wiring of clients, player and palette from configuration

use crate::config::AppConfig;
use crate::error::Result;
use crate::headless::HeadlessOutput;
use async_trait::async_trait;
use nextsound_client::{DeezerCatalog, ItunesCatalog, RestFavorites, StaticSession};
use nextsound_core::{
    AuthProvider, CatalogProvider, CoreError, FavoritesBackend, JsonFileStore, KeyValueStore,
    Track, TrackKey, User,
};
use nextsound_playback::{EnginePhase, PlaybackSnapshot, Player, PlayerDeps};
use nextsound_search::{CommandPalette, SearchHistory, SearchIndexer};
use std::sync::Arc;
use tracing::info;

/// Stand-in used when no favorites service is configured
struct FavoritesUnavailable;

#[async_trait]
impl FavoritesBackend for FavoritesUnavailable {
    async fn list(&self) -> nextsound_core::Result<Vec<Track>> {
        Err(CoreError::AuthRequired)
    }

    async fn add(&self, _track: &Track) -> nextsound_core::Result<()> {
        Err(CoreError::AuthRequired)
    }

    async fn remove(&self, _key: &TrackKey) -> nextsound_core::Result<()> {
        Err(CoreError::AuthRequired)
    }
}

/// Nothing left to play: the player closed, or the queue ran out and parked
pub fn playback_finished(snapshot: &PlaybackSnapshot) -> bool {
    match snapshot.phase {
        EnginePhase::Idle => true,
        EnginePhase::Paused => !snapshot.is_playing && snapshot.queue.is_empty(),
        _ => false,
    }
}

pub struct App {
    pub player: Arc<Player>,
    pub palette: CommandPalette,
    pub itunes: Arc<ItunesCatalog>,
    pub deezer: Arc<DeezerCatalog>,
    pub session: Arc<StaticSession>,
}

impl App {
    pub fn build(config: &AppConfig) -> Result<Self> {
        let itunes = Arc::new(ItunesCatalog::new(&config.client)?);
        let deezer = Arc::new(DeezerCatalog::new(&config.client)?);
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&config.storage.data_dir)?);

        // Without a favorites service there is nobody to sign in to
        let (session, favorites): (Arc<StaticSession>, Arc<dyn FavoritesBackend>) =
            match (&config.client.favorites_url, config.session.credentials()) {
                (Some(_), Some((user_id, token))) => {
                    let session = Arc::new(StaticSession::signed_in(User::new(user_id), token));
                    let backend: Arc<dyn FavoritesBackend> =
                        Arc::new(RestFavorites::new(&config.client, Arc::clone(&session))?);
                    (session, backend)
                }
                _ => {
                    let backend: Arc<dyn FavoritesBackend> = Arc::new(FavoritesUnavailable);
                    (Arc::new(StaticSession::signed_out()), backend)
                }
            };

        // Preview lookups get their own client so retries fit the resolver deadline
        let lookup_config = config.client.within_deadline(config.playback.resolve_timeout());
        let lookup: Arc<dyn CatalogProvider> = Arc::new(ItunesCatalog::new(&lookup_config)?);

        let player = Player::new(
            config.playback.clone(),
            PlayerDeps {
                output: Box::new(HeadlessOutput::new()),
                catalog: lookup,
                favorites,
                auth: Arc::clone(&session) as Arc<dyn AuthProvider>,
                local: Arc::clone(&store),
            },
        );

        let indexer = SearchIndexer::new(
            Arc::clone(&itunes) as Arc<dyn CatalogProvider>,
            Arc::clone(&deezer) as Arc<dyn CatalogProvider>,
        );
        let palette = CommandPalette::new(indexer, SearchHistory::load(store));

        info!(data_dir = %config.storage.data_dir.display(), "NextSound ready");
        Ok(Self {
            player: Arc::new(player),
            palette,
            itunes,
            deezer,
            session,
        })
    }

    /// Id of the user favorites are stored for
    pub async fn signed_in_user(&self) -> Option<String> {
        self.session.credentials().await.map(|(user_id, _)| user_id)
    }
}
