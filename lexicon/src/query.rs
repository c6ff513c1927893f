//! Query engine.
//!
//! A pure filter chain over resident entries: region first, then free-text
//! term, then categories. There is no scoring; results keep store order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Category, Entry, Region};

/// Inputs to a single search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text; empty means no term filter.
    #[serde(default)]
    pub term: String,
    /// Empty means no category filter.
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub region: Region,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, categories: Vec<Category>, region: Region) -> Self {
        Self {
            term: term.into(),
            categories,
            region,
        }
    }

    /// The term with surrounding whitespace removed.
    pub fn trimmed_term(&self) -> &str {
        self.term.trim()
    }

    pub fn has_term(&self) -> bool {
        !self.trimmed_term().is_empty()
    }
}

/// Whether an entry belongs to the candidate pool for a region query.
pub fn region_matches(entry: &Entry, region: Region) -> bool {
    entry.region == region || entry.region.is_universal()
}

/// Whether the entry's headword or definition contains `needle`.
///
/// `needle` must already be lowercase.
fn term_matches(entry: &Entry, needle: &str) -> bool {
    entry.term.to_lowercase().contains(needle) || entry.definition.to_lowercase().contains(needle)
}

/// Filter `entries` by `query`.
///
/// The returned copies never carry mention data; attaching it is the
/// caller's job and only for a precise single-term lookup.
pub fn search(entries: &[Entry], query: &SearchQuery) -> Vec<Entry> {
    let needle = query.trimmed_term().to_lowercase();

    let results: Vec<Entry> = entries
        .iter()
        .filter(|e| region_matches(e, query.region))
        .filter(|e| needle.is_empty() || term_matches(e, &needle))
        .filter(|e| query.categories.is_empty() || e.shares_category(&query.categories))
        .map(|e| {
            let mut entry = e.clone();
            entry.in_the_wild = None;
            entry
        })
        .collect();

    debug!(
        term = %query.trimmed_term(),
        categories = query.categories.len(),
        region = %query.region,
        matched = results.len(),
        "Filtered entries"
    );

    results
}

/// Mentions are fetched only for a term-driven search with exactly one hit.
pub fn wants_mentions(results: &[Entry], query: &SearchQuery) -> bool {
    results.len() == 1 && query.has_term()
}

/// Drop any mention data from a result list.
pub fn strip_mentions(results: &mut [Entry]) {
    for entry in results {
        entry.in_the_wild = None;
    }
}

/// Whether the detail panels (community definitions, mentions) should be
/// shown for `entry` within `results`.
///
/// Only a single, human-written result whose headword equals the searched
/// term qualifies.
pub fn detail_visible(entry: &Entry, results: &[Entry], term: &str) -> bool {
    let term = term.trim();
    results.len() == 1
        && !term.is_empty()
        && !entry.is_ai_generated
        && entry.term.to_lowercase() == term.to_lowercase()
}
