//! Preview URL resolution
//!
//! Catalog entries from some sources have no playable preview. The resolver
//! looks the track up by "title artist" in a catalog that does carry
//! previews and returns an enhanced copy. It never fails: every error,
//! timeout or empty result yields the input unchanged.

use nextsound_core::{CatalogProvider, Track};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct PreviewResolver {
    catalog: Arc<dyn CatalogProvider>,
    timeout: Duration,
}

impl PreviewResolver {
    pub fn new(catalog: Arc<dyn CatalogProvider>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    /// Return `track` with a preview URL attached when one can be found
    pub async fn resolve(&self, track: &Track) -> Track {
        if track.has_preview() {
            return track.clone();
        }

        let query = track.search_query();
        if query.is_empty() {
            debug!(track = %track.key(), "Nothing to search for");
            return track.clone();
        }

        debug!(track = %track.key(), query = %query, "Resolving preview");
        let lookup = self.catalog.search_tracks(&query, 1);

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(hits)) => {
                let url = hits
                    .into_iter()
                    .find_map(|hit| hit.preview_url.filter(|url| !url.is_empty()));
                match url {
                    Some(url) => {
                        info!(track = %track.key(), provider = %self.catalog.provider(), "Preview found");
                        track.with_preview(url)
                    }
                    None => {
                        info!(track = %track.key(), "No preview available");
                        track.clone()
                    }
                }
            }
            Ok(Err(e)) => {
                warn!(track = %track.key(), error = %e, "Preview lookup failed");
                track.clone()
            }
            Err(_) => {
                warn!(track = %track.key(), timeout_ms = self.timeout.as_millis() as u64, "Preview lookup timed out");
                track.clone()
            }
        }
    }
}

impl std::fmt::Debug for PreviewResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewResolver")
            .field("provider", &self.catalog.provider())
            .field("timeout", &self.timeout)
            .finish()
    }
}
