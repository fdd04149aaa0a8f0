//! Relevance ranking for catalogue search results.
//!
//! The search endpoint is fuzzy and happily returns remasters, karaoke
//! versions and unrelated hits. Results are narrowed to items whose name
//! actually contains the query, then deduplicated by name and capped.

use std::collections::HashSet;

use crate::types::{Album, Track};

/// Upper bound on ranked results returned to the caller.
pub const MAX_RANKED_RESULTS: usize = 10;

/// Items that can be matched against a query by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Items carrying the externally supplied popularity score.
pub trait Popular: Named {
    fn popularity(&self) -> u32;
}

impl Named for Track {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Popular for Track {
    fn popularity(&self) -> u32 {
        self.popularity
    }
}

impl Named for Album {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Case-insensitive name match.
///
/// A prefix match is a substring match, so a single `contains` covers both.
pub fn matches_query(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Filters by query, sorts by popularity (descending, stable) and keeps the
/// first item per exact name, at most [`MAX_RANKED_RESULTS`] of them.
pub fn rank_track_results<T: Popular>(items: Vec<T>, query: &str) -> Vec<T> {
    let mut filtered: Vec<T> = items
        .into_iter()
        .filter(|item| matches_query(item.name(), query))
        .collect();
    filtered.sort_by(|a, b| b.popularity().cmp(&a.popularity()));

    dedup_by_name(filtered)
}

/// Same as [`rank_track_results`] without reordering: the API order is kept.
pub fn rank_album_results<T: Named>(items: Vec<T>, query: &str) -> Vec<T> {
    let filtered: Vec<T> = items
        .into_iter()
        .filter(|item| matches_query(item.name(), query))
        .collect();

    dedup_by_name(filtered)
}

fn dedup_by_name<T: Named>(items: Vec<T>) -> Vec<T> {
    let mut seen_names = HashSet::new();
    let mut unique = Vec::with_capacity(MAX_RANKED_RESULTS);

    for item in items {
        if unique.len() == MAX_RANKED_RESULTS {
            break;
        }
        if seen_names.insert(item.name().to_string()) {
            unique.push(item);
        }
    }
    unique
}
