//! Mention source backed by a JSON HTTP endpoint.
//!
//! The endpoint is called as `GET {base_url}?q={term}` and must answer with a
//! JSON array. Items may use `text`, `caption` or `body` for their content, so
//! tweet, short-video and forum-post services can all be pointed at directly.

use async_trait::async_trait;
use lexicon::{CollaboratorError, Mention, MentionKind, MentionSource};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub struct HttpMentionSource {
    kind: MentionKind,
    client: Client,
    base_url: String,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct RawMention {
    #[serde(default)]
    author: String,
    #[serde(alias = "caption", alias = "body", default)]
    text: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: Option<String>,
}

impl HttpMentionSource {
    pub fn new(
        kind: MentionKind,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CollaboratorError::Unavailable(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            kind,
            client,
            base_url: base_url.into(),
            limit: 5,
        })
    }

    /// Keep at most `limit` mentions per lookup.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn lookup_url(&self, term: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}q={}", self.base_url, separator, urlencoding::encode(term))
    }
}

#[async_trait]
impl MentionSource for HttpMentionSource {
    fn kind(&self) -> MentionKind {
        self.kind
    }

    async fn lookup(&self, term: &str) -> Result<Vec<Mention>, CollaboratorError> {
        let url = self.lookup_url(term);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Unavailable(format!(
                "{} returned HTTP {}",
                self.kind.as_str(),
                status
            )));
        }

        let raw: Vec<RawMention> = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

        let mentions: Vec<Mention> = raw
            .into_iter()
            .filter(|m| !m.text.trim().is_empty() || m.title.is_some())
            .take(self.limit)
            .map(|m| Mention {
                author: m.author,
                text: m.text,
                url: m.url,
                title: m.title,
            })
            .collect();

        debug!(source = self.kind.as_str(), term, count = mentions.len(), "Fetched mentions");
        Ok(mentions)
    }
}
