/// Track domain type
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog a track (or artist/album) was obtained from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Apple iTunes Search API
    Itunes,
    /// Deezer public API
    Deezer,
    /// Constructed locally (tests, legacy data without an origin)
    #[default]
    Local,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Itunes => "itunes",
            Self::Deezer => "deezer",
            Self::Local => "local",
        };
        f.write_str(name)
    }
}

/// Identity of a track across providers
///
/// Provider ids are only unique within one catalog, so every identity
/// comparison (queue de-duplication, favorites membership, same-track
/// detection) goes through this composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackKey {
    pub provider: Provider,
    pub id: String,
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.id)
    }
}

/// A playable unit as returned by a catalog provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Provider-scoped identifier
    pub id: String,

    /// Catalog the track came from
    #[serde(default)]
    pub provider: Provider,

    /// Track title
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Album name
    #[serde(default)]
    pub album: String,

    /// Cover art URL
    #[serde(default)]
    pub artwork_url: Option<String>,

    /// Duration in milliseconds (0 = unknown)
    #[serde(default)]
    pub duration_ms: u64,

    /// Short preview clip; absence triggers resolution before playback
    #[serde(default)]
    pub preview_url: Option<String>,

    /// Deep link into the provider's own player
    #[serde(default)]
    pub external_url: Option<String>,

    /// Release year
    #[serde(default)]
    pub year: Option<u32>,

    /// Genre
    #[serde(default)]
    pub genre: Option<String>,

    /// Popularity score (0-100)
    #[serde(default)]
    pub popularity: u8,
}

impl Track {
    /// Create a track with minimal metadata
    pub fn new(
        provider: Provider,
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            provider,
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            artwork_url: None,
            duration_ms: 0,
            preview_url: None,
            external_url: None,
            year: None,
            genre: None,
            popularity: 0,
        }
    }

    /// Composite identity of this track
    pub fn key(&self) -> TrackKey {
        TrackKey {
            provider: self.provider,
            id: self.id.clone(),
        }
    }

    /// Whether two tracks refer to the same catalog entry
    pub fn same_as(&self, other: &Track) -> bool {
        self.provider == other.provider && self.id == other.id
    }

    /// Whether a non-empty preview URL is present
    pub fn has_preview(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Enhanced copy carrying a preview URL; identity is unchanged
    #[must_use]
    pub fn with_preview(&self, url: impl Into<String>) -> Self {
        Self {
            preview_url: Some(url.into()),
            ..self.clone()
        }
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the duration in milliseconds
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Text used when looking the track up in another catalog
    pub fn search_query(&self) -> String {
        format!("{} {}", self.title, self.artist).trim().to_string()
    }
}
