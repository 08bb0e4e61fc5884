//! Relevance filtering, de-duplication and ordering of palette results

use crate::types::SearchResult;
use std::collections::HashSet;

/// Queries shorter than this skip the relevance filter
const MIN_FILTERED_QUERY: usize = 3;

/// Whether a catalog hit plausibly answers the query
///
/// Keeps the hit when the full query, or any query word longer than two
/// characters, appears in its title or artist.
pub fn is_relevant(result: &SearchResult, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_FILTERED_QUERY {
        return true;
    }

    let title = result.title.to_lowercase();
    let artist = result.artist_name().to_lowercase();
    if title.contains(&query) || artist.contains(&query) {
        return true;
    }

    let mut words = query
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .peekable();
    if words.peek().is_none() {
        return true;
    }
    words.any(|w| title.contains(w) || artist.contains(w))
}

pub fn filter_relevant(results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|r| is_relevant(r, query))
        .collect()
}

/// Drop later entries whose id was already seen
pub fn dedupe(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}

/// Stable sort by kind precedence, then split into (exact, fuzzy)
pub fn rank(mut results: Vec<SearchResult>) -> (Vec<SearchResult>, Vec<SearchResult>) {
    results.sort_by_key(|r| r.kind.precedence());
    results.into_iter().partition(|r| r.is_exact_match)
}
