//! Persisted palette history
//!
//! Stored under [`HISTORY_KEY`] as `{ "queries": [...], "items": [...] }`,
//! most recent first. Actions are not persisted; [`rehydrate`] rebuilds
//! them from each entry's kind.

use crate::commands::{find_command, CommandContext};
use crate::error::Result;
use crate::types::{encode_component, PaletteAction, ResultData, ResultKind, SearchResult};
use nextsound_core::storage::{load_json, save_json};
use nextsound_core::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const HISTORY_KEY: &str = "nextsound_search_history";
pub const MAX_QUERIES: usize = 10;
pub const MAX_ITEMS: usize = 20;
pub const RECENT_ITEMS: usize = 5;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredHistory {
    #[serde(default)]
    queries: Vec<String>,
    #[serde(default)]
    items: Vec<SearchResult>,
}

pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    queries: Vec<String>,
    items: Vec<SearchResult>,
}

impl SearchHistory {
    /// Load history; unreadable or missing data starts empty
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let stored = match load_json::<StoredHistory>(store.as_ref(), HISTORY_KEY) {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to load search history");
                StoredHistory::default()
            }
        };

        debug!(
            queries = stored.queries.len(),
            items = stored.items.len(),
            "Loaded search history"
        );
        Self {
            store,
            queries: stored.queries,
            items: stored.items,
        }
    }

    /// Remember a selection made while `query` was typed
    ///
    /// Blank queries are not recorded. Both lists move repeats to the front.
    pub fn record(&mut self, query: &str, item: &SearchResult) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        self.queries.retain(|q| q != query);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(MAX_QUERIES);

        let mut entry = item.clone();
        entry.action = None;
        self.items.retain(|h| h.id != entry.id);
        self.items.insert(0, entry);
        self.items.truncate(MAX_ITEMS);

        self.persist()
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn items(&self) -> &[SearchResult] {
        &self.items
    }

    /// Up to [`RECENT_ITEMS`] entries with their actions restored
    pub fn recent_items(&self, ctx: &CommandContext) -> Vec<SearchResult> {
        self.items
            .iter()
            .take(RECENT_ITEMS)
            .cloned()
            .map(|item| rehydrate(item, ctx))
            .collect()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.queries.clear();
        self.items.clear();
        self.store.remove(HISTORY_KEY)?;
        debug!("Cleared search history");
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let stored = StoredHistory {
            queries: self.queries.clone(),
            items: self.items.clone(),
        };
        save_json(self.store.as_ref(), HISTORY_KEY, &stored)?;
        Ok(())
    }
}

impl std::fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistory")
            .field("queries", &self.queries.len())
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

/// Rebuild the action of a stored entry
///
/// Artists with a numeric id route by id, otherwise by name. Tracks get no
/// action; the caller plays them.
pub fn rehydrate(mut item: SearchResult, ctx: &CommandContext) -> SearchResult {
    if item.action.is_some() {
        return item;
    }

    item.action = match item.kind {
        ResultKind::Artist => {
            let id = match &item.data {
                ResultData::Artist(artist) => artist.id.clone(),
                _ => strip_prefix(&item.id, "artist-"),
            };
            if !id.is_empty() && id.parse::<u64>().is_ok() {
                Some(PaletteAction::Navigate(format!("/artist/{id}")))
            } else {
                Some(PaletteAction::Navigate(format!(
                    "/artist/{}",
                    encode_component(&item.title)
                )))
            }
        }
        ResultKind::Album => {
            let id = match &item.data {
                ResultData::Album(album) => album.id.clone(),
                _ => strip_prefix(&item.id, "album-"),
            };
            Some(PaletteAction::Navigate(format!("/album/{id}")))
        }
        ResultKind::Command => find_command(&item.id, ctx).map(|c| c.action),
        ResultKind::Track | ResultKind::Playlist => None,
    };
    item
}

fn strip_prefix(id: &str, prefix: &str) -> String {
    id.strip_prefix(prefix).unwrap_or(id).to_string()
}
