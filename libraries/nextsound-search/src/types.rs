//! Palette result types

use nextsound_core::{AlbumSummary, ArtistSummary, Track};
use serde::{Deserialize, Serialize};

/// Id of the synthetic "see all results" entry
pub const VIEW_ALL_ID: &str = "view-all-results";

/// What a palette entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Track,
    Album,
    Artist,
    Playlist,
    Command,
}

impl ResultKind {
    /// Sort precedence: artists, then tracks, then everything else
    pub fn precedence(self) -> u8 {
        match self {
            Self::Artist => 1,
            Self::Track => 2,
            Self::Album | Self::Playlist | Self::Command => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Navigation,
    Player,
    Search,
    Settings,
    Help,
}

/// Payload carried by a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultData {
    Track(Track),
    Artist(ArtistSummary),
    Album(AlbumSummary),
    Command { category: CommandCategory },
}

/// Effect of choosing an entry, executed by the host
///
/// Never persisted; history entries get theirs back through rehydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    /// Route to a path such as `/artist/27`
    Navigate(String),
    ToggleTheme,
    ToggleSidebar,
    ShowShortcuts,
}

/// One palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub data: ResultData,
    #[serde(skip)]
    pub action: Option<PaletteAction>,
    #[serde(default)]
    pub is_exact_match: bool,
    #[serde(default)]
    pub keep_open: bool,
}

impl SearchResult {
    /// Track hit; tracks carry no action, the caller plays them
    pub fn from_track(track: Track) -> Self {
        let title = non_empty_or(&track.title, "Unknown Track");
        let subtitle = format!(
            "{} • {}",
            non_empty_or(&track.artist, "Unknown Artist"),
            non_empty_or(&track.album, "Unknown Album")
        );
        Self {
            id: format!("track-{}", track.id),
            kind: ResultKind::Track,
            title,
            subtitle,
            image: track.artwork_url.clone(),
            data: ResultData::Track(track),
            action: None,
            is_exact_match: false,
            keep_open: false,
        }
    }

    /// Artist hit, exact when the name equals the query ignoring case
    pub fn from_artist(artist: ArtistSummary, query: &str) -> Self {
        let is_exact_match = artist.name.to_lowercase() == query.trim().to_lowercase();
        Self {
            id: format!("artist-{}", artist.id),
            kind: ResultKind::Artist,
            title: artist.name.clone(),
            subtitle: "Artist".to_string(),
            image: artist.picture_url.clone(),
            action: Some(PaletteAction::Navigate(format!("/artist/{}", artist.id))),
            data: ResultData::Artist(artist),
            is_exact_match,
            keep_open: false,
        }
    }

    pub fn from_album(album: AlbumSummary) -> Self {
        Self {
            id: format!("album-{}", album.id),
            kind: ResultKind::Album,
            title: album.title.clone(),
            subtitle: album.artist.clone(),
            image: album.artwork_url.clone(),
            action: Some(PaletteAction::Navigate(format!("/album/{}", album.id))),
            data: ResultData::Album(album),
            is_exact_match: false,
            keep_open: false,
        }
    }

    /// Trailing entry that opens the full search page
    pub fn view_all(query: &str) -> Self {
        Self {
            id: VIEW_ALL_ID.to_string(),
            kind: ResultKind::Command,
            title: format!("See all results for \"{query}\""),
            subtitle: "View comprehensive search results".to_string(),
            image: None,
            data: ResultData::Command {
                category: CommandCategory::Search,
            },
            action: Some(PaletteAction::Navigate(format!(
                "/search/{}",
                encode_component(query)
            ))),
            is_exact_match: false,
            keep_open: false,
        }
    }

    /// Artist name used by the relevance filter; empty for non-tracks
    pub fn artist_name(&self) -> &str {
        match &self.data {
            ResultData::Track(track) => &track.artist,
            _ => "",
        }
    }

    pub fn track(&self) -> Option<&Track> {
        match &self.data {
            ResultData::Track(track) => Some(track),
            _ => None,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Percent-encode one path segment (spaces become `%20`)
pub fn encode_component(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Output of one palette search
#[derive(Debug, Default)]
pub struct SearchResults {
    pub exact_matches: Vec<SearchResult>,
    pub recommendations: Vec<SearchResult>,
    /// Present whenever any other result exists
    pub view_all: Option<SearchResult>,
    /// Set when the track catalog failed
    pub error: Option<crate::error::SearchError>,
}

impl SearchResults {
    /// Exact matches, then recommendations, then the "see all" entry
    pub fn all(&self) -> Vec<SearchResult> {
        self.exact_matches
            .iter()
            .chain(&self.recommendations)
            .chain(&self.view_all)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.exact_matches.is_empty() && self.recommendations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exact_matches.len() + self.recommendations.len() + usize::from(self.view_all.is_some())
    }
}
