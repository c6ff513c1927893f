//! Address (query string) synchronization.
//!
//! The listing's inputs are mirrored into `search`, `region` and repeated
//! `category` parameters. Parsing an address is only done on first load;
//! rendering one never triggers a search.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

use crate::query::SearchQuery;
use crate::types::{Category, Region};

/// The inputs a user controls on the main listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInputs {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub region: Region,
}

impl QueryInputs {
    /// Parse a query string such as `search=rizz&region=UK&category=social`.
    ///
    /// A leading `?` is accepted. Unknown regions and categories are ignored
    /// rather than rejected, and `Unknown` is not a selectable region.
    pub fn from_address(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut inputs = Self::default();
        let mut categories = Vec::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "search" => inputs.term = value.into_owned(),
                "region" => match value.parse::<Region>() {
                    Ok(region) if region != Region::Unknown => inputs.region = region,
                    _ => debug!(region = %value, "Ignoring unknown region in address"),
                },
                "category" => match value.parse::<Category>() {
                    Ok(category) => categories.push(category),
                    Err(_) => debug!(category = %value, "Ignoring unknown category in address"),
                },
                _ => {}
            }
        }

        inputs.categories = dedup(categories);
        inputs
    }

    /// Render the inputs as a query string without the leading `?`.
    ///
    /// `search` is always present, `region` only when not Global.
    pub fn to_address(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("search", &self.term);
        if self.region != Region::Global {
            serializer.append_pair("region", self.region.as_str());
        }
        for category in &self.categories {
            serializer.append_pair("category", category.as_str());
        }
        serializer.finish()
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.term.clone(), self.categories.clone(), self.region)
    }

    /// Add `category` if absent, remove it if present.
    pub fn toggle_category(&mut self, category: Category) {
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category);
        }
    }
}

fn dedup(categories: Vec<Category>) -> Vec<Category> {
    let mut kept = Vec::with_capacity(categories.len());
    for category in categories {
        if !kept.contains(&category) {
            kept.push(category);
        }
    }
    kept
}

/// Shareable link that opens the listing searched for `term`.
pub fn search_link(term: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();
    format!("/?search={}", encoded)
}
