//! Fallback generation for empty searches.
//!
//! Only the simplest search case falls back to the text-generation
//! collaborator: a non-empty term, no category filter, the Global region and
//! no local hits. The generated entry is shown for the current render only
//! and is never written back to the store here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collaborators::{DefinitionGenerator, GeneratedDefinition};
use crate::query::SearchQuery;
use crate::types::{truncate_categories, Category, Entry, Region};

/// Label stamped on generated entries.
pub const GENERATED_BY: &str = "Lexicon AI";

/// What happened on the generation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum GenerationState {
    NotAttempted,
    Generated,
    Failed(String),
}

/// Results after the fallback decision.
#[derive(Debug, Clone)]
pub struct FallbackResolution {
    pub results: Vec<Entry>,
    pub state: GenerationState,
}

/// Whether an empty result for `query` should trigger generation.
pub fn is_eligible(query: &SearchQuery, results: &[Entry]) -> bool {
    results.is_empty()
        && query.has_term()
        && query.categories.is_empty()
        && query.region == Region::Global
}

/// Lowercase the term and join whitespace runs with `-`.
pub fn slug(term: &str) -> String {
    term.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Build the display entry for a generated definition.
pub fn synthesize(term: &str, generated: GeneratedDefinition, now: DateTime<Utc>) -> Entry {
    let term = term.trim();
    let mut categories = truncate_categories(generated.categories);
    if categories.is_empty() {
        categories.push(Category::Other);
    }

    Entry {
        id: format!("ai-{}-{}", slug(term), now.timestamp_millis()),
        term: term.to_string(),
        definition: generated.definition,
        example: generated.example,
        tone: generated.tone,
        categories,
        freshness: generated.freshness,
        region: Region::Unknown,
        created_at: now,
        upvotes: 0,
        downvotes: 0,
        submitted_by: Some(GENERATED_BY.to_string()),
        is_ai_generated: true,
        then_vs_now: None,
        origin: None,
        pronunciation_url: None,
        community_definitions: Vec::new(),
        in_the_wild: None,
    }
}

/// Decide on and, when eligible, perform fallback generation.
pub async fn resolve(
    generator: &dyn DefinitionGenerator,
    query: &SearchQuery,
    results: Vec<Entry>,
) -> FallbackResolution {
    if !is_eligible(query, &results) {
        return FallbackResolution {
            results,
            state: GenerationState::NotAttempted,
        };
    }

    let term = query.trimmed_term();
    info!(term, "No local results, generating definition");

    match generator.define(term).await {
        Ok(generated) => {
            let entry = synthesize(term, generated, Utc::now());
            info!(term, entry_id = %entry.id, "Generated definition");
            FallbackResolution {
                results: vec![entry],
                state: GenerationState::Generated,
            }
        }
        Err(e) => {
            warn!(term, error = %e, "Definition generation failed");
            FallbackResolution {
                results,
                state: GenerationState::Failed(e.to_string()),
            }
        }
    }
}
