//! Contracts for the external collaborators the core depends on.
//!
//! Implementations live in `lexicon-agent`; tests use in-crate fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::types::{Category, Freshness, Mention, MentionKind, Tone};

/// Failures reported by any collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Network failure, timeout or non-2xx response.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered with nothing usable.
    #[error("collaborator returned an empty response")]
    Empty,

    /// The collaborator answered with something that failed validation.
    #[error("collaborator returned a malformed response: {0}")]
    Malformed(String),
}

/// Structured definition produced for a term that is not in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDefinition {
    pub definition: String,
    pub example: String,
    pub tone: Tone,
    pub categories: Vec<Category>,
    pub freshness: Freshness,
}

/// Text-generation collaborator for unknown terms.
#[async_trait]
pub trait DefinitionGenerator: Send + Sync {
    async fn define(&self, term: &str) -> Result<GeneratedDefinition, CollaboratorError>;
}

/// Text-generation collaborator for the translator.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Slang phrase to plain language.
    async fn to_plain(&self, slang: &str) -> Result<String, CollaboratorError>;

    /// Plain sentence to slang.
    async fn to_slang(&self, plain: &str) -> Result<String, CollaboratorError>;
}

/// One "in the wild" mention provider.
#[async_trait]
pub trait MentionSource: Send + Sync {
    fn kind(&self) -> MentionKind;

    async fn lookup(&self, term: &str) -> Result<Vec<Mention>, CollaboratorError>;
}

/// Everything a search may need to call out to.
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn DefinitionGenerator>,
    pub mention_sources: Vec<Arc<dyn MentionSource>>,
}

impl Collaborators {
    pub fn new(
        generator: Arc<dyn DefinitionGenerator>,
        mention_sources: Vec<Arc<dyn MentionSource>>,
    ) -> Self {
        Self {
            generator,
            mention_sources,
        }
    }
}
