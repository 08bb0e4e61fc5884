//! Catalog fan-out for the command palette

use crate::commands::{match_commands, CommandContext};
use crate::error::SearchError;
use crate::ranking::{dedupe, filter_relevant, rank};
use crate::types::{SearchResult, SearchResults};
use nextsound_core::CatalogProvider;
use std::sync::Arc;
use tracing::{debug, warn};

pub const TRACK_LIMIT: usize = 5;
pub const ARTIST_LIMIT: usize = 3;

/// Queries a track catalog and an artist catalog concurrently and merges
/// the hits with matching commands
pub struct SearchIndexer {
    tracks: Arc<dyn CatalogProvider>,
    artists: Arc<dyn CatalogProvider>,
    track_limit: usize,
    artist_limit: usize,
}

impl SearchIndexer {
    pub fn new(tracks: Arc<dyn CatalogProvider>, artists: Arc<dyn CatalogProvider>) -> Self {
        Self {
            tracks,
            artists,
            track_limit: TRACK_LIMIT,
            artist_limit: ARTIST_LIMIT,
        }
    }

    pub fn with_limits(mut self, track_limit: usize, artist_limit: usize) -> Self {
        self.track_limit = track_limit;
        self.artist_limit = artist_limit;
        self
    }

    /// Run one search
    ///
    /// A failing artist catalog only loses artist hits. A failing track
    /// catalog is also reported through [`SearchResults::error`].
    pub async fn search(&self, query: &str, ctx: &CommandContext) -> SearchResults {
        let query = query.trim();
        if query.is_empty() {
            return SearchResults::default();
        }

        debug!(query = %query, "Palette search");
        let (tracks, artists) = tokio::join!(
            self.tracks.search_tracks(query, self.track_limit),
            self.artists.search_artists(query, self.artist_limit),
        );

        let mut candidates = Vec::new();
        match artists {
            Ok(artists) => candidates.extend(
                artists
                    .into_iter()
                    .map(|a| SearchResult::from_artist(a, query)),
            ),
            Err(e) => warn!(query = %query, error = %e, "Artist search failed"),
        }

        let mut error = None;
        match tracks {
            Ok(tracks) => candidates.extend(tracks.into_iter().map(SearchResult::from_track)),
            Err(e) => {
                warn!(query = %query, error = %e, "Track search failed");
                error = Some(SearchError::Catalog(e));
            }
        }

        let mut results = filter_relevant(candidates, query);
        results.extend(match_commands(query, ctx));
        let (exact_matches, recommendations) = rank(dedupe(results));

        let view_all = (!exact_matches.is_empty() || !recommendations.is_empty())
            .then(|| SearchResult::view_all(query));

        debug!(
            query = %query,
            exact = exact_matches.len(),
            recommendations = recommendations.len(),
            "Palette search complete"
        );

        SearchResults {
            exact_matches,
            recommendations,
            view_all,
            error,
        }
    }
}

impl std::fmt::Debug for SearchIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndexer")
            .field("tracks", &self.tracks.provider())
            .field("artists", &self.artists.provider())
            .field("track_limit", &self.track_limit)
            .field("artist_limit", &self.artist_limit)
            .finish()
    }
}
