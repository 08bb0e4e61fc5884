//! Stateful command palette: search, selection and history

use crate::commands::CommandContext;
use crate::debounce::Debouncer;
use crate::history::SearchHistory;
use crate::indexer::SearchIndexer;
use crate::types::{PaletteAction, SearchResult, SearchResults};
use tracing::{info, warn};

#[derive(Debug)]
pub struct CommandPalette {
    indexer: SearchIndexer,
    history: SearchHistory,
    context: CommandContext,
    debouncer: Debouncer,
}

impl CommandPalette {
    pub fn new(indexer: SearchIndexer, history: SearchHistory) -> Self {
        Self {
            indexer,
            history,
            context: CommandContext::default(),
            debouncer: Debouncer::default(),
        }
    }

    pub fn with_debouncer(mut self, debouncer: Debouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn set_context(&mut self, context: CommandContext) {
        self.context = context;
    }

    pub fn context(&self) -> CommandContext {
        self.context
    }

    /// Search immediately
    pub async fn search(&self, query: &str) -> SearchResults {
        self.indexer.search(query, &self.context).await
    }

    /// Search after the debounce delay; `None` when a newer query superseded this one
    pub async fn search_debounced(&self, query: &str) -> Option<SearchResults> {
        let query = self.debouncer.settle(query).await?;
        Some(self.search(query).await)
    }

    /// Record the selection in history and return the action to run
    ///
    /// History is a cache: failing to persist it is logged, not returned.
    pub fn select(&mut self, query: &str, item: &SearchResult) -> Option<PaletteAction> {
        if let Err(e) = self.history.record(query, item) {
            warn!(error = %e, "Failed to save search history");
        }
        self.debouncer.cancel();
        info!(id = %item.id, kind = ?item.kind, "Palette selection");
        item.action.clone()
    }

    /// Recent selections for the empty palette
    pub fn recent_items(&self) -> Vec<SearchResult> {
        self.history.recent_items(&self.context)
    }

    pub fn recent_queries(&self) -> &[String] {
        self.history.queries()
    }

    pub fn clear_history(&mut self) -> crate::Result<()> {
        self.history.clear()
    }
}
