//! Tests for the NextSound HTTP clients.
//!
//! These tests use mock servers to verify client behavior without
//! requiring network access.

use nextsound_client::{
    ClientConfig, ClientError, DeezerCatalog, HttpClient, ItunesCatalog, RestFavorites,
    RetryPolicy, StaticSession,
};
use nextsound_core::{CatalogProvider, CoreError, FavoritesBackend, Provider, Track, User};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_http() -> HttpClient {
    HttpClient::new(&ClientConfig::default())
        .unwrap()
        .with_retry(RetryPolicy {
            attempts: 3,
            backoff_ms: 5,
        })
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_default_config_builds_catalogs() {
        let config = ClientConfig::default();
        assert!(ItunesCatalog::new(&config).is_ok());
        assert!(DeezerCatalog::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = ClientConfig {
            deezer_url: "ftp://example.com".to_string(),
            ..ClientConfig::default()
        };

        match DeezerCatalog::new(&config) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("http")),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn test_favorites_require_url() {
        let session = Arc::new(StaticSession::signed_out());
        let result = RestFavorites::new(&ClientConfig::default(), session);
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}

// =============================================================================
// iTunes Tests
// =============================================================================

mod itunes {
    use super::*;

    #[tokio::test]
    async fn test_search_tracks_maps_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("term", "blinding lights"))
            .and(query_param("entity", "song"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultCount": 1,
                "results": [{
                    "wrapperType": "track",
                    "kind": "song",
                    "trackId": 1440857781u64,
                    "trackName": "Blinding Lights",
                    "artistName": "The Weeknd",
                    "collectionName": "After Hours",
                    "artworkUrl100": "https://img/100x100bb.jpg",
                    "previewUrl": "https://audio/blinding.m4a",
                    "trackTimeMillis": 200040
                }]
            })))
            .mount(&server)
            .await;

        let catalog = ItunesCatalog::with_http(fast_http(), &server.uri()).unwrap();
        let tracks = catalog.search_tracks("blinding lights", 1).await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "1440857781");
        assert_eq!(tracks[0].preview_url.as_deref(), Some("https://audio/blinding.m4a"));
        assert_eq!(tracks[0].artwork_url.as_deref(), Some("https://img/600x600bb.jpg"));
    }

    #[tokio::test]
    async fn test_album_lookup_splits_collection_and_songs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("id", "1499378108"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {
                        "wrapperType": "collection",
                        "collectionId": 1499378108u64,
                        "collectionName": "After Hours",
                        "artistName": "The Weeknd",
                        "releaseDate": "2020-03-20T07:00:00Z",
                        "primaryGenreName": "R&B/Soul"
                    },
                    { "wrapperType": "track", "kind": "song", "trackId": 1, "trackName": "Alone Again", "artistName": "The Weeknd" },
                    { "wrapperType": "track", "kind": "song", "trackId": 2, "trackName": "Too Late", "artistName": "The Weeknd" }
                ]
            })))
            .mount(&server)
            .await;

        let catalog = ItunesCatalog::with_http(fast_http(), &server.uri()).unwrap();
        let album = catalog.lookup_album("1499378108").await.unwrap();

        assert_eq!(album.album.title, "After Hours");
        assert_eq!(album.album.year, Some(2020));
        assert_eq!(album.tracks.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_lookup_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let catalog = ItunesCatalog::with_http(fast_http(), &server.uri()).unwrap();
        let err = CatalogProvider::lookup_album(&catalog, "0").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}

// =============================================================================
// Retry Tests
// =============================================================================

mod retry {
    use super::*;

    #[tokio::test]
    async fn test_server_error_retried_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let catalog = ItunesCatalog::with_http(fast_http(), &server.uri()).unwrap();
        let tracks = catalog.search_tracks("anything", 5).await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .expect(3)
            .mount(&server)
            .await;

        let catalog = ItunesCatalog::with_http(fast_http(), &server.uri()).unwrap();
        match catalog.search_tracks("anything", 5).await {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "down");
            }
            other => panic!("Expected ServerError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = ItunesCatalog::with_http(fast_http(), &server.uri()).unwrap();
        assert!(catalog.search_tracks("anything", 5).await.is_err());
    }
}

// =============================================================================
// Deezer Tests
// =============================================================================

mod deezer {
    use super::*;

    #[tokio::test]
    async fn test_search_tracks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "daft punk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": 3135556,
                    "title": "Harder, Better, Faster, Stronger",
                    "duration": 224,
                    "rank": 861234,
                    "preview": "https://cdns-preview/abc.mp3",
                    "artist": { "id": 27, "name": "Daft Punk" },
                    "album": { "id": 302127, "title": "Discovery", "cover_medium": "https://img/m.jpg" }
                }],
                "total": 1
            })))
            .mount(&server)
            .await;

        let catalog = DeezerCatalog::with_http(fast_http(), &server.uri()).unwrap();
        let tracks = catalog.search_tracks("daft punk", 5).await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].provider, Provider::Deezer);
        assert_eq!(tracks[0].duration_ms, 224_000);
        assert_eq!(tracks[0].artwork_url.as_deref(), Some("https://img/m.jpg"));
    }

    #[tokio::test]
    async fn test_search_artists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/artist"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": 27, "name": "Daft Punk", "nb_fan": 4_500_000, "picture_medium": "https://img/dp.jpg" }]
            })))
            .mount(&server)
            .await;

        let catalog = DeezerCatalog::with_http(fast_http(), &server.uri()).unwrap();
        let artists = catalog.search_artists("daft", 3).await.unwrap();

        assert_eq!(artists[0].name, "Daft Punk");
        assert_eq!(artists[0].fan_count, Some(4_500_000));
    }

    #[tokio::test]
    async fn test_error_body_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/album/999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": { "type": "DataException", "message": "no data", "code": 800 }
            })))
            .mount(&server)
            .await;

        let catalog = DeezerCatalog::with_http(fast_http(), &server.uri()).unwrap();
        match catalog.lookup_album("999").await {
            Err(ClientError::NotFound { entity, id }) => {
                assert_eq!(entity, "album");
                assert_eq!(id, "999");
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_album_tracks_inherit_album() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/album/302127"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 302127,
                "title": "Discovery",
                "cover_xl": "https://img/xl.jpg",
                "release_date": "2001-03-07",
                "genres": { "data": [{ "id": 113, "name": "Dance" }] },
                "artist": { "id": 27, "name": "Daft Punk" },
                "tracks": { "data": [
                    { "id": 3135553, "title": "One More Time", "duration": 320, "artist": { "name": "Daft Punk" } }
                ] }
            })))
            .mount(&server)
            .await;

        let catalog = DeezerCatalog::with_http(fast_http(), &server.uri()).unwrap();
        let album = catalog.lookup_album("302127").await.unwrap();

        assert_eq!(album.album.year, Some(2001));
        assert_eq!(album.album.genre.as_deref(), Some("Dance"));
        assert_eq!(album.tracks[0].album, "Discovery");
        assert_eq!(album.tracks[0].artwork_url.as_deref(), Some("https://img/xl.jpg"));
    }
}

// =============================================================================
// Favorites Tests
// =============================================================================

mod favorites {
    use super::*;

    fn favorites(server: &MockServer, session: StaticSession) -> RestFavorites {
        RestFavorites::with_http(
            fast_http(),
            &server.uri(),
            Some("public-key".to_string()),
            Arc::new(session),
        )
        .unwrap()
    }

    fn signed_in() -> StaticSession {
        StaticSession::signed_in(User::new("user-1"), "jwt-token")
    }

    #[tokio::test]
    async fn test_list_sends_auth_and_orders_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/favorites"))
            .and(header("apikey", "public-key"))
            .and(header("authorization", "Bearer jwt-token"))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("order", "created_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "track_data": Track::new(Provider::Deezer, "old", "Old", "A"), "created_at": "2024-01-01T00:00:00Z" },
                { "track_data": Track::new(Provider::Deezer, "new", "New", "A"), "created_at": "2024-06-01T00:00:00Z" }
            ])))
            .mount(&server)
            .await;

        let tracks = favorites(&server, signed_in()).list().await.unwrap();
        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_add_conflict_maps_to_core_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/favorites"))
            .and(body_partial_json(json!({ "user_id": "user-1", "track_id": "itunes:t1" })))
            .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key value"))
            .expect(1)
            .mount(&server)
            .await;

        let backend = favorites(&server, signed_in());
        let track = Track::new(Provider::Itunes, "t1", "Song", "Artist");
        let err = FavoritesBackend::add(&backend, &track).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_row_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/favorites"))
            .and(query_param("track_id", "eq.deezer:t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let key = Track::new(Provider::Deezer, "t1", "Song", "Artist").key();
        let err = favorites(&server, signed_in()).remove(&key).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_same_id_from_two_providers_stores_two_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/favorites"))
            .and(body_partial_json(json!({ "track_id": "itunes:123" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/favorites"))
            .and(body_partial_json(json!({ "track_id": "deezer:123" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/favorites"))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("track_id", "eq.deezer:123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "track_id": "deezer:123" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let backend = favorites(&server, signed_in());
        let itunes = Track::new(Provider::Itunes, "123", "Song", "Artist");
        let deezer = Track::new(Provider::Deezer, "123", "Other Song", "Other Artist");
        backend.add(&itunes).await.unwrap();
        backend.add(&deezer).await.unwrap();
        backend.remove(&deezer.key()).await.unwrap();
    }

    #[tokio::test]
    async fn test_signed_out_calls_fail_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = favorites(&server, StaticSession::signed_out()).list().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired));
    }
}
