//! Async player tests
//!
//! Collaborators are mocked: catalog lookups with controllable latency,
//! favorites backend and auth through mockall.

mod common;

use async_trait::async_trait;
use common::{track, track_with_preview, FakeOutput, OutputHandle};
use mockall::mock;
use nextsound_core::storage::save_json;
use nextsound_core::{
    AlbumWithTracks, ArtistSummary, AuthProvider, CatalogProvider, CoreError, FavoritesBackend,
    KeyValueStore, MemoryStore, Provider, Track, TrackKey, User,
};
use nextsound_playback::{
    EnginePhase, FavoriteToggle, NoticeLevel, PlaybackConfig, PlaybackError, PlaybackEvent,
    Player, PlayerDeps, LEGACY_FAVORITES_KEY,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Test Infrastructure
// ============================================================================

mock! {
    pub Favorites {}

    #[async_trait]
    impl FavoritesBackend for Favorites {
        async fn list(&self) -> nextsound_core::Result<Vec<Track>>;
        async fn add(&self, track: &Track) -> nextsound_core::Result<()>;
        async fn remove(&self, key: &TrackKey) -> nextsound_core::Result<()>;
    }
}

mock! {
    pub Auth {}

    #[async_trait]
    impl AuthProvider for Auth {
        async fn current_user(&self) -> nextsound_core::Result<Option<User>>;
    }
}

/// Catalog answering from a table, with per-query latency
#[derive(Default)]
struct SlowCatalog {
    previews: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl SlowCatalog {
    fn with(mut self, track: &Track, preview: &str, delay: Duration) -> Self {
        self.previews.insert(track.search_query(), preview.to_string());
        self.delays.insert(track.search_query(), delay);
        self
    }
}

#[async_trait]
impl CatalogProvider for SlowCatalog {
    fn provider(&self) -> Provider {
        Provider::Itunes
    }

    async fn search_tracks(&self, query: &str, _limit: usize) -> nextsound_core::Result<Vec<Track>> {
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self
            .previews
            .get(query)
            .map(|url| vec![Track::new(Provider::Itunes, "hit", "Hit", "Artist").with_preview(url.clone())])
            .unwrap_or_default())
    }

    async fn search_artists(&self, _query: &str, _limit: usize) -> nextsound_core::Result<Vec<ArtistSummary>> {
        Ok(Vec::new())
    }

    async fn lookup_album(&self, id: &str) -> nextsound_core::Result<AlbumWithTracks> {
        Err(CoreError::not_found("album", id))
    }

    async fn artist_top_tracks(&self, _artist_id: &str, _limit: usize) -> nextsound_core::Result<Vec<Track>> {
        Ok(Vec::new())
    }
}

/// Favorites table with a unique constraint on the stored track id
#[derive(Clone, Default)]
struct TableFavorites {
    rows: Arc<Mutex<Vec<(String, Track)>>>,
}

impl TableFavorites {
    fn stored_ids(&self) -> Vec<String> {
        self.rows.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }
}

#[async_trait]
impl FavoritesBackend for TableFavorites {
    async fn list(&self) -> nextsound_core::Result<Vec<Track>> {
        Ok(self.rows.lock().unwrap().iter().rev().map(|(_, t)| t.clone()).collect())
    }

    async fn add(&self, track: &Track) -> nextsound_core::Result<()> {
        let id = track.key().to_string();
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(existing, _)| *existing == id) {
            return Err(CoreError::Conflict(format!("duplicate key {id}")));
        }
        rows.push((id, track.clone()));
        Ok(())
    }

    async fn remove(&self, key: &TrackKey) -> nextsound_core::Result<()> {
        let id = key.to_string();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(existing, _)| *existing != id);
        if rows.len() == before {
            return Err(CoreError::not_found("favorite", &id));
        }
        Ok(())
    }
}

fn signed_in() -> MockAuth {
    let mut auth = MockAuth::new();
    auth.expect_current_user()
        .returning(|| Ok(Some(User::new("user-1"))));
    auth
}

fn signed_out() -> MockAuth {
    let mut auth = MockAuth::new();
    auth.expect_current_user().returning(|| Ok(None));
    auth
}

struct Harness {
    player: Arc<Player>,
    output: OutputHandle,
    local: Arc<MemoryStore>,
}

fn harness(catalog: SlowCatalog, favorites: impl FavoritesBackend + 'static, auth: MockAuth) -> Harness {
    harness_with_store(catalog, favorites, auth, Arc::new(MemoryStore::new()))
}

fn harness_with_store(
    catalog: SlowCatalog,
    favorites: impl FavoritesBackend + 'static,
    auth: MockAuth,
    local: Arc<MemoryStore>,
) -> Harness {
    let (output, handle) = FakeOutput::new();
    let player = Player::new(
        PlaybackConfig::default(),
        PlayerDeps {
            output: Box::new(output),
            catalog: Arc::new(catalog),
            favorites: Arc::new(favorites),
            auth: Arc::new(auth),
            local: Arc::clone(&local) as Arc<dyn KeyValueStore>,
        },
    );
    Harness {
        player: Arc::new(player),
        output: handle,
        local,
    }
}

fn last_notice(events: &[PlaybackEvent]) -> Option<(NoticeLevel, String)> {
    events.iter().rev().find_map(|e| match e {
        PlaybackEvent::Notice(n) => Some((n.level, n.message.clone())),
        _ => None,
    })
}

// ============================================================================
// Loading
// ============================================================================

mod loading {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn resolves_missing_preview_before_playing() {
        let t2 = track("t2");
        let catalog = SlowCatalog::default().with(&t2, "http://x/b.mp3", Duration::from_millis(50));
        let h = harness(catalog, MockFavorites::new(), signed_out());

        h.player.play_track(t2).await;

        let snapshot = h.player.snapshot().await;
        let current = snapshot.current_track.unwrap();
        assert_eq!(current.preview_url.as_deref(), Some("http://x/b.mp3"));
        assert_eq!(snapshot.phase, EnginePhase::PlayingReal);
        assert_eq!(h.output.state().play_calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn later_selection_wins_over_slow_lookup() {
        let a = track("a");
        let b = track("b");
        let catalog = SlowCatalog::default()
            .with(&a, "http://x/a.mp3", Duration::from_millis(800))
            .with(&b, "http://x/b.mp3", Duration::from_millis(10));
        let h = harness(catalog, MockFavorites::new(), signed_out());

        let first = {
            let player = Arc::clone(&h.player);
            let a = a.clone();
            tokio::spawn(async move { player.play_track(a).await })
        };
        while h.player.snapshot().await.current_track.is_none() {
            tokio::task::yield_now().await;
        }
        h.player.play_track(b).await;
        first.await.unwrap();

        let snapshot = h.player.snapshot().await;
        let current = snapshot.current_track.unwrap();
        assert_eq!(current.id, "b");
        assert_eq!(current.preview_url.as_deref(), Some("http://x/b.mp3"));
        assert_eq!(h.output.state().sources_set, vec!["http://x/b.mp3".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_timeout_falls_back_to_simulation() {
        let slow = track("slow");
        let catalog = SlowCatalog::default().with(&slow, "http://x/s.mp3", Duration::from_secs(60));
        let h = harness(catalog, MockFavorites::new(), signed_out());

        h.player.play_track(slow).await;

        let snapshot = h.player.snapshot().await;
        assert_eq!(snapshot.phase, EnginePhase::PlayingSimulated);
        assert!(snapshot.current_track.unwrap().preview_url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_advances_simulated_progress() {
        let h = harness(SlowCatalog::default(), MockFavorites::new(), signed_out());
        h.player.play_track(track("quiet")).await;

        let ticker = h.player.spawn_ticker();
        tokio::time::sleep(Duration::from_millis(250 * 10 + 10)).await;
        ticker.abort();

        let progress = h.player.snapshot().await.progress_percent;
        assert!((10.0..=11.0).contains(&progress), "progress was {progress}");
    }

    #[tokio::test(start_paused = true)]
    async fn queue_advances_on_end() {
        let h = harness(SlowCatalog::default(), MockFavorites::new(), signed_out());
        h.player.play_track(track_with_preview("one")).await;
        h.player.add_to_queue(track_with_preview("two")).await;

        h.output.finish();
        h.player.tick().await;

        let snapshot = h.player.snapshot().await;
        assert_eq!(snapshot.current_track.unwrap().id, "two");
        assert!(snapshot.queue.is_empty());
    }
}

// ============================================================================
// Favorites
// ============================================================================

mod favorites {
    use super::*;

    #[tokio::test]
    async fn signed_out_toggle_is_rejected() {
        let h = harness(SlowCatalog::default(), MockFavorites::new(), signed_out());

        let result = h.player.toggle_favorite(&track("t1")).await;

        assert!(matches!(result, Err(PlaybackError::AuthRequired)));
        assert!(!h.player.is_favorite(&track("t1")).await);
        let notice = last_notice(&h.player.drain_events().await).unwrap();
        assert_eq!(notice.0, NoticeLevel::Error);
        assert!(notice.1.contains("sign in"));
    }

    #[tokio::test]
    async fn toggle_twice_restores_membership() {
        let mut backend = MockFavorites::new();
        backend.expect_add().times(1).returning(|_| Ok(()));
        backend
            .expect_remove()
            .withf(|key: &TrackKey| key.id == "t1" && key.provider == Provider::Deezer)
            .times(1)
            .returning(|_| Ok(()));
        let h = harness(SlowCatalog::default(), backend, signed_in());
        let t1 = track("t1");

        assert_eq!(h.player.toggle_favorite(&t1).await.unwrap(), FavoriteToggle::Added);
        assert!(h.player.is_favorite(&t1).await);

        assert_eq!(h.player.toggle_favorite(&t1).await.unwrap(), FavoriteToggle::Removed);
        assert!(!h.player.is_favorite(&t1).await);
    }

    #[tokio::test]
    async fn same_id_from_two_providers_is_two_favorites() {
        let table = TableFavorites::default();
        let h = harness(SlowCatalog::default(), table.clone(), signed_in());
        let itunes = Track::new(Provider::Itunes, "123", "Song", "Artist");
        let deezer = Track::new(Provider::Deezer, "123", "Other Song", "Other Artist");

        assert_eq!(h.player.toggle_favorite(&itunes).await.unwrap(), FavoriteToggle::Added);
        assert_eq!(h.player.toggle_favorite(&deezer).await.unwrap(), FavoriteToggle::Added);
        assert_eq!(table.stored_ids(), vec!["itunes:123", "deezer:123"]);

        let reloaded = harness(SlowCatalog::default(), table.clone(), signed_in());
        assert_eq!(reloaded.player.load_favorites().await.unwrap(), 2);
        assert!(reloaded.player.is_favorite(&itunes).await);
        assert!(reloaded.player.is_favorite(&deezer).await);

        assert_eq!(reloaded.player.toggle_favorite(&deezer).await.unwrap(), FavoriteToggle::Removed);
        assert_eq!(table.stored_ids(), vec!["itunes:123"]);
        assert!(reloaded.player.is_favorite(&itunes).await);
        assert!(!reloaded.player.is_favorite(&deezer).await);
    }

    #[tokio::test]
    async fn duplicate_add_counts_as_success() {
        let mut backend = MockFavorites::new();
        backend
            .expect_add()
            .returning(|_| Err(CoreError::Conflict("duplicate key".to_string())));
        let h = harness(SlowCatalog::default(), backend, signed_in());

        let result = h.player.toggle_favorite(&track("t1")).await;

        assert_eq!(result.unwrap(), FavoriteToggle::Added);
        assert!(h.player.is_favorite(&track("t1")).await);
    }

    #[tokio::test]
    async fn failed_add_is_reverted() {
        let mut backend = MockFavorites::new();
        backend
            .expect_add()
            .returning(|_| Err(CoreError::Network("connection reset".to_string())));
        let h = harness(SlowCatalog::default(), backend, signed_in());

        let result = h.player.toggle_favorite(&track("t1")).await;

        assert!(matches!(result, Err(PlaybackError::Core(CoreError::Network(_)))));
        assert!(!h.player.is_favorite(&track("t1")).await);
        let notice = last_notice(&h.player.drain_events().await).unwrap();
        assert_eq!(notice, (NoticeLevel::Error, "Failed to update favorites".to_string()));
    }

    #[tokio::test]
    async fn failed_remove_restores_original_position() {
        let mut backend = MockFavorites::new();
        backend
            .expect_list()
            .returning(|| Ok(vec![track("a"), track("b"), track("c")]));
        backend
            .expect_remove()
            .returning(|_| Err(CoreError::Provider { status: 500, message: "boom".to_string() }));
        let h = harness(SlowCatalog::default(), backend, signed_in());
        h.player.load_favorites().await.unwrap();

        assert!(h.player.toggle_favorite(&track("b")).await.is_err());

        let order: Vec<String> = h
            .player
            .snapshot()
            .await
            .favorites
            .into_iter()
            .map(|key| key.id)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn load_migrates_legacy_favorites_once() {
        let local = Arc::new(MemoryStore::new());
        save_json(local.as_ref(), LEGACY_FAVORITES_KEY, &vec![track("old")]).unwrap();

        let mut backend = MockFavorites::new();
        backend
            .expect_add()
            .withf(|t: &Track| t.id == "old")
            .times(1)
            .returning(|_| Ok(()));
        backend
            .expect_list()
            .returning(|| Ok(vec![track("old"), track("new")]));
        let h = harness_with_store(SlowCatalog::default(), backend, signed_in(), local);

        assert_eq!(h.player.load_favorites().await.unwrap(), 2);
        assert!(h.local.get(LEGACY_FAVORITES_KEY).unwrap().is_none());

        // Second load finds nothing to migrate
        assert_eq!(h.player.load_favorites().await.unwrap(), 2);

        let snapshot = h.player.snapshot().await;
        assert!(!snapshot.is_loading_favorites);
        assert_eq!(snapshot.favorites.len(), 2);
    }

    #[tokio::test]
    async fn load_failure_notifies_and_clears_loading() {
        let mut backend = MockFavorites::new();
        backend
            .expect_list()
            .returning(|| Err(CoreError::Network("offline".to_string())));
        let h = harness(SlowCatalog::default(), backend, signed_in());

        assert!(h.player.load_favorites().await.is_err());

        assert!(!h.player.snapshot().await.is_loading_favorites);
        let notice = last_notice(&h.player.drain_events().await).unwrap();
        assert_eq!(notice.1, "Failed to load your favorites");
    }

    #[tokio::test]
    async fn close_keeps_favorites() {
        let mut backend = MockFavorites::new();
        backend.expect_add().returning(|_| Ok(()));
        let h = harness(SlowCatalog::default(), backend, signed_in());

        h.player.toggle_favorite(&track("keep")).await.unwrap();
        h.player.close_player().await;

        assert!(h.player.is_favorite(&track("keep")).await);
    }
}
