//! Trending terms.

use serde::Serialize;

use crate::address::search_link;
use crate::types::{Entry, Freshness};

/// Number of trending terms shown by default.
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingTerm {
    pub id: String,
    pub term: String,
    pub net_score: i64,
    pub link: String,
}

/// Fresh entries first, each group ordered by net score descending, then
/// truncated to `limit`. Generated entries are never trending.
pub fn trending(entries: &[Entry], limit: usize) -> Vec<TrendingTerm> {
    let mut ranked: Vec<&Entry> = entries.iter().filter(|e| !e.is_ai_generated).collect();
    // Stable sort keeps store order for ties.
    ranked.sort_by_key(|e| (e.freshness != Freshness::Fresh, std::cmp::Reverse(e.net_score())));

    ranked
        .into_iter()
        .take(limit)
        .map(|e| TrendingTerm {
            id: e.id.clone(),
            term: e.term.clone(),
            net_score: e.net_score(),
            link: search_link(&e.term),
        })
        .collect()
}
