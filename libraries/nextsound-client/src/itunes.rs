//! iTunes Search API catalog.
//!
//! Every iTunes song carries a 30-second `previewUrl`, which makes this the
//! catalog used to resolve previews for tracks found elsewhere.

use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use crate::types::{normalize_base_url, ClientConfig};
use async_trait::async_trait;
use chrono::{DateTime, Datelike};
use nextsound_core::{
    AlbumSummary, AlbumWithTracks, ArtistSummary, CatalogProvider, Provider, Track,
};
use serde::Deserialize;
use tracing::debug;

/// iTunes exposes no popularity metric
const DEFAULT_POPULARITY: u8 = 75;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ItunesItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ItunesItem {
    wrapper_type: Option<String>,
    kind: Option<String>,
    track_id: Option<u64>,
    artist_id: Option<u64>,
    collection_id: Option<u64>,
    track_name: Option<String>,
    artist_name: Option<String>,
    collection_name: Option<String>,
    artwork_url100: Option<String>,
    preview_url: Option<String>,
    track_time_millis: Option<u64>,
    track_view_url: Option<String>,
    collection_view_url: Option<String>,
    artist_link_url: Option<String>,
    release_date: Option<String>,
    primary_genre_name: Option<String>,
}

impl ItunesItem {
    fn is_song(&self) -> bool {
        self.kind.as_deref() == Some("song") || self.wrapper_type.as_deref() == Some("track")
    }

    fn into_track(self) -> Option<Track> {
        let id = self.track_id?;
        let mut track = Track::new(
            Provider::Itunes,
            id.to_string(),
            self.track_name.unwrap_or_default(),
            self.artist_name.unwrap_or_default(),
        );
        track.album = self.collection_name.unwrap_or_default();
        track.artwork_url = self.artwork_url100.as_deref().map(upgrade_artwork);
        track.duration_ms = self.track_time_millis.unwrap_or(0);
        track.preview_url = self.preview_url.filter(|url| !url.is_empty());
        track.external_url = self.track_view_url;
        track.year = self.release_date.as_deref().and_then(release_year);
        track.genre = self.primary_genre_name;
        track.popularity = DEFAULT_POPULARITY;
        Some(track)
    }

    fn into_artist(self) -> Option<ArtistSummary> {
        Some(ArtistSummary {
            id: self.artist_id?.to_string(),
            provider: Provider::Itunes,
            name: self.artist_name.unwrap_or_default(),
            picture_url: None,
            fan_count: None,
            link: self.artist_link_url,
        })
    }

    fn into_album(self) -> Option<AlbumSummary> {
        Some(AlbumSummary {
            id: self.collection_id?.to_string(),
            provider: Provider::Itunes,
            title: self.collection_name.unwrap_or_default(),
            artist: self.artist_name.unwrap_or_default(),
            artwork_url: self.artwork_url100.as_deref().map(upgrade_artwork),
            year: self.release_date.as_deref().and_then(release_year),
            genre: self.primary_genre_name,
        })
    }
}

/// Ask for the 600px rendition instead of the 100px thumbnail
fn upgrade_artwork(url: &str) -> String {
    url.replace("100x100bb", "600x600bb")
}

fn release_year(date: &str) -> Option<u32> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return u32::try_from(parsed.year()).ok();
    }
    date.get(..4).and_then(|year| year.parse().ok())
}

/// iTunes Search API client
#[derive(Debug, Clone)]
pub struct ItunesCatalog {
    http: HttpClient,
    base_url: String,
}

impl ItunesCatalog {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            base_url: normalize_base_url(&config.itunes_url)?,
        })
    }

    /// Use a pre-built HTTP client
    pub fn with_http(http: HttpClient, base_url: &str) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    async fn search(&self, term: &str, entity: &str, limit: usize) -> Result<Vec<ItunesItem>> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, term = %term, entity = %entity, limit, "iTunes search");

        let limit = limit.to_string();
        let response: SearchResponse = self
            .http
            .json(|http| {
                http.get(&url).query(&[
                    ("term", term),
                    ("media", "music"),
                    ("entity", entity),
                    ("limit", limit.as_str()),
                    ("country", "US"),
                ])
            })
            .await?;
        Ok(response.results)
    }

    async fn lookup(&self, id: &str, limit: Option<usize>) -> Result<Vec<ItunesItem>> {
        let url = format!("{}/lookup", self.base_url);
        debug!(url = %url, id = %id, "iTunes lookup");

        let limit = limit.map(|l| l.to_string());
        let response: SearchResponse = self
            .http
            .json(|http| {
                let request = http.get(&url).query(&[("id", id), ("entity", "song")]);
                match &limit {
                    Some(limit) => request.query(&[("limit", limit.as_str())]),
                    None => request,
                }
            })
            .await?;
        Ok(response.results)
    }

    pub async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>> {
        let items = self.search(query, "song", limit).await?;
        Ok(items
            .into_iter()
            .filter(ItunesItem::is_song)
            .filter_map(ItunesItem::into_track)
            .collect())
    }

    pub async fn search_artists(&self, query: &str, limit: usize) -> Result<Vec<ArtistSummary>> {
        let items = self.search(query, "musicArtist", limit).await?;
        Ok(items.into_iter().filter_map(ItunesItem::into_artist).collect())
    }

    pub async fn lookup_album(&self, id: &str) -> Result<AlbumWithTracks> {
        let mut album = None;
        let mut tracks = Vec::new();
        for item in self.lookup(id, None).await? {
            if item.is_song() {
                tracks.extend(item.into_track());
            } else if item.wrapper_type.as_deref() == Some("collection") && album.is_none() {
                album = item.into_album();
            }
        }

        let album = album.ok_or_else(|| ClientError::NotFound {
            entity: "album".to_string(),
            id: id.to_string(),
        })?;
        Ok(AlbumWithTracks { album, tracks })
    }

    pub async fn artist_top_tracks(&self, artist_id: &str, limit: usize) -> Result<Vec<Track>> {
        // First result is the artist itself
        let items = self.lookup(artist_id, Some(limit + 1)).await?;
        Ok(items
            .into_iter()
            .filter(ItunesItem::is_song)
            .filter_map(ItunesItem::into_track)
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl CatalogProvider for ItunesCatalog {
    fn provider(&self) -> Provider {
        Provider::Itunes
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> nextsound_core::Result<Vec<Track>> {
        Ok(ItunesCatalog::search_tracks(self, query, limit).await?)
    }

    async fn search_artists(&self, query: &str, limit: usize) -> nextsound_core::Result<Vec<ArtistSummary>> {
        Ok(ItunesCatalog::search_artists(self, query, limit).await?)
    }

    async fn lookup_album(&self, id: &str) -> nextsound_core::Result<AlbumWithTracks> {
        Ok(ItunesCatalog::lookup_album(self, id).await?)
    }

    async fn artist_top_tracks(&self, artist_id: &str, limit: usize) -> nextsound_core::Result<Vec<Track>> {
        Ok(ItunesCatalog::artist_top_tracks(self, artist_id, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artwork_is_upgraded() {
        assert_eq!(
            upgrade_artwork("https://is1.mzstatic.com/image/abc/100x100bb.jpg"),
            "https://is1.mzstatic.com/image/abc/600x600bb.jpg"
        );
    }

    #[test]
    fn release_year_from_timestamp_or_prefix() {
        assert_eq!(release_year("2019-11-29T12:00:00Z"), Some(2019));
        assert_eq!(release_year("2004-01-01"), Some(2004));
        assert_eq!(release_year("n/a"), None);
    }

    #[test]
    fn song_item_maps_to_track() {
        let item: ItunesItem = serde_json::from_value(serde_json::json!({
            "wrapperType": "track",
            "kind": "song",
            "trackId": 1440857781u64,
            "trackName": "Blinding Lights",
            "artistName": "The Weeknd",
            "collectionName": "After Hours",
            "artworkUrl100": "https://img/100x100bb.jpg",
            "previewUrl": "https://audio/preview.m4a",
            "trackTimeMillis": 200040,
            "releaseDate": "2019-11-29T12:00:00Z",
            "primaryGenreName": "R&B/Soul"
        }))
        .unwrap();

        let track = item.into_track().unwrap();
        assert_eq!(track.id, "1440857781");
        assert_eq!(track.provider, Provider::Itunes);
        assert_eq!(track.artwork_url.as_deref(), Some("https://img/600x600bb.jpg"));
        assert_eq!(track.duration_ms, 200_040);
        assert_eq!(track.year, Some(2019));
        assert_eq!(track.popularity, 75);
        assert!(track.has_preview());
    }
}
