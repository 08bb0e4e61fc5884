//! Deezer public API catalog.
//!
//! Deezer reports most failures as HTTP 200 with an `error` object in the
//! body; those are mapped back onto [`ClientError`] here.

use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use crate::types::{normalize_base_url, ClientConfig};
use async_trait::async_trait;
use nextsound_core::{
    AlbumSummary, AlbumWithTracks, ArtistSummary, CatalogProvider, Provider, Track,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_POPULARITY: u8 = 50;

/// Deezer "no data" error code
const NO_DATA: u32 = 800;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failed { error: DeezerError },
    Ok(T),
}

#[derive(Debug, Deserialize)]
struct DeezerError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: u32,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeezerArtistRef {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeezerAlbumRef {
    title: String,
    cover_xl: Option<String>,
    cover_medium: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeezerTrack {
    id: u64,
    #[serde(default)]
    title: String,
    /// Seconds
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    rank: Option<u64>,
    #[serde(default)]
    preview: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    artist: DeezerArtistRef,
    #[serde(default)]
    album: Option<DeezerAlbumRef>,
}

#[derive(Debug, Deserialize)]
struct DeezerArtist {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture_medium: Option<String>,
    #[serde(default)]
    nb_fan: Option<u64>,
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeezerGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DeezerAlbum {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    cover_xl: Option<String>,
    #[serde(default)]
    cover_medium: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    genres: Option<Page<DeezerGenre>>,
    #[serde(default)]
    artist: DeezerArtistRef,
    #[serde(default)]
    tracks: Option<Page<DeezerTrack>>,
}

/// Map a Deezer rank (0 to roughly 1,000,000) onto 0-100
fn popularity(rank: Option<u64>) -> u8 {
    match rank {
        Some(rank) => (rank / 10_000).min(100) as u8,
        None => DEFAULT_POPULARITY,
    }
}

impl DeezerTrack {
    fn into_track(self, album: Option<&DeezerAlbumRef>) -> Track {
        let album = self.album.as_ref().or(album);
        let mut track = Track::new(Provider::Deezer, self.id.to_string(), self.title, self.artist.name);
        if let Some(album) = album {
            track.album.clone_from(&album.title);
            track.artwork_url = album.cover_xl.clone().or_else(|| album.cover_medium.clone());
        }
        track.duration_ms = self.duration.saturating_mul(1000);
        track.preview_url = self.preview.filter(|url| !url.is_empty());
        track.external_url = self.link;
        track.popularity = popularity(self.rank);
        track
    }
}

impl From<DeezerArtist> for ArtistSummary {
    fn from(artist: DeezerArtist) -> Self {
        Self {
            id: artist.id.to_string(),
            provider: Provider::Deezer,
            name: artist.name,
            picture_url: artist.picture_medium,
            fan_count: artist.nb_fan,
            link: artist.link,
        }
    }
}

/// Deezer public API client
#[derive(Debug, Clone)]
pub struct DeezerCatalog {
    http: HttpClient,
    base_url: String,
}

impl DeezerCatalog {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            base_url: normalize_base_url(&config.deezer_url)?,
        })
    }

    /// Use a pre-built HTTP client
    pub fn with_http(http: HttpClient, base_url: &str) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)], entity: &str, id: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Deezer request");

        let envelope: Envelope<T> = self.http.json(|http| http.get(&url).query(query)).await?;
        match envelope {
            Envelope::Ok(value) => Ok(value),
            Envelope::Failed { error } if error.code == NO_DATA => Err(ClientError::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            }),
            Envelope::Failed { error } => Err(ClientError::ServerError {
                status: 200,
                message: format!("{} ({}): {}", error.kind, error.code, error.message),
            }),
        }
    }

    pub async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>> {
        let page: Page<DeezerTrack> = self
            .get(
                "/search",
                &[("q", query.to_string()), ("limit", limit.to_string())],
                "search",
                query,
            )
            .await?;
        Ok(page.data.into_iter().map(|t| t.into_track(None)).collect())
    }

    pub async fn search_artists(&self, query: &str, limit: usize) -> Result<Vec<ArtistSummary>> {
        let page: Page<DeezerArtist> = self
            .get(
                "/search/artist",
                &[("q", query.to_string()), ("limit", limit.to_string())],
                "search",
                query,
            )
            .await?;
        Ok(page.data.into_iter().map(ArtistSummary::from).collect())
    }

    pub async fn lookup_album(&self, id: &str) -> Result<AlbumWithTracks> {
        let album: DeezerAlbum = self.get(&format!("/album/{id}"), &[], "album", id).await?;

        let album_ref = DeezerAlbumRef {
            title: album.title.clone(),
            cover_xl: album.cover_xl.clone(),
            cover_medium: album.cover_medium.clone(),
        };
        let tracks = album
            .tracks
            .map(|page| page.data)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.into_track(Some(&album_ref)))
            .collect();

        let summary = AlbumSummary {
            id: album.id.to_string(),
            provider: Provider::Deezer,
            title: album.title,
            artist: album.artist.name,
            artwork_url: album.cover_xl.or(album.cover_medium),
            year: album
                .release_date
                .as_deref()
                .and_then(|date| date.get(..4))
                .and_then(|year| year.parse().ok()),
            genre: album
                .genres
                .and_then(|page| page.data.into_iter().next())
                .map(|genre| genre.name),
        };

        Ok(AlbumWithTracks {
            album: summary,
            tracks,
        })
    }

    pub async fn artist_top_tracks(&self, artist_id: &str, limit: usize) -> Result<Vec<Track>> {
        let page: Page<DeezerTrack> = self
            .get(
                &format!("/artist/{artist_id}/top"),
                &[("limit", limit.to_string())],
                "artist",
                artist_id,
            )
            .await?;
        Ok(page.data.into_iter().map(|t| t.into_track(None)).collect())
    }
}

#[async_trait]
impl CatalogProvider for DeezerCatalog {
    fn provider(&self) -> Provider {
        Provider::Deezer
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> nextsound_core::Result<Vec<Track>> {
        Ok(DeezerCatalog::search_tracks(self, query, limit).await?)
    }

    async fn search_artists(&self, query: &str, limit: usize) -> nextsound_core::Result<Vec<ArtistSummary>> {
        Ok(DeezerCatalog::search_artists(self, query, limit).await?)
    }

    async fn lookup_album(&self, id: &str) -> nextsound_core::Result<AlbumWithTracks> {
        Ok(DeezerCatalog::lookup_album(self, id).await?)
    }

    async fn artist_top_tracks(&self, artist_id: &str, limit: usize) -> nextsound_core::Result<Vec<Track>> {
        Ok(DeezerCatalog::artist_top_tracks(self, artist_id, limit).await?)
    }
}
