//! Error types for palette search

use nextsound_core::CoreError;
use thiserror::Error;

/// Search errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// The track catalog failed; artist and command results may still exist
    #[error("Track search failed: {0}")]
    Catalog(#[source] CoreError),

    /// Search history could not be read or written
    #[error("Search history storage error: {0}")]
    Storage(#[from] CoreError),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
