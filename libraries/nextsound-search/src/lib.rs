//! Command palette search for NextSound
//!
//! Fans a query out to a track catalog and an artist catalog, keeps only
//! hits that plausibly answer it, mixes in matching built-in commands, and
//! orders everything exact-first, artists before tracks. Selections are
//! remembered in a small persisted history whose entries get their actions
//! rebuilt on load.
//!
//! # Example
//!
//! ```rust,ignore
//! let indexer = SearchIndexer::new(itunes, deezer);
//! let results = indexer.search("daft punk", &CommandContext::default()).await;
//! for result in results.all() {
//!     println!("{} - {}", result.title, result.subtitle);
//! }
//! ```

pub mod commands;
pub mod debounce;
pub mod error;
pub mod history;
pub mod indexer;
pub mod palette;
pub mod ranking;
pub mod types;

pub use commands::{builtin_commands, find_command, match_commands, Command, CommandContext};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use error::{Result, SearchError};
pub use history::{rehydrate, SearchHistory, HISTORY_KEY};
pub use indexer::SearchIndexer;
pub use palette::CommandPalette;
pub use types::{
    CommandCategory, PaletteAction, ResultData, ResultKind, SearchResult, SearchResults,
    VIEW_ALL_ID,
};
