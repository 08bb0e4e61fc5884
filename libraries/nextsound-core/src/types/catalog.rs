/// Artist and album summaries returned by catalog providers
use super::{Provider, Track};
use serde::{Deserialize, Serialize};

/// Artist search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub id: String,
    pub provider: Provider,
    pub name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub fan_count: Option<u64>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Album metadata without its track list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub provider: Provider,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Album lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumWithTracks {
    pub album: AlbumSummary,
    pub tracks: Vec<Track>,
}
