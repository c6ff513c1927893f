//! LLM-backed collaborators.
//!
//! Implements the core's `DefinitionGenerator` and `Translator` contracts on
//! top of any [`LlmBackend`].

use async_trait::async_trait;
use lexicon::types::truncate_categories;
use lexicon::{
    Category, CollaboratorError, DefinitionGenerator, Freshness, GeneratedDefinition, Tone,
    Translator,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{LlmBackend, Prompt};
use crate::prompts::PromptAssembler;

const DEFINE_MAX_TOKENS: u32 = 512;
const TRANSLATE_MAX_TOKENS: u32 = 256;

/// Definition generator for unknown terms.
pub struct LlmDefinitionGenerator {
    backend: Arc<dyn LlmBackend>,
}

impl LlmDefinitionGenerator {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

/// The JSON object the define prompt asks for, before validation.
#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: String,
    tone: String,
    #[serde(default)]
    categories: Vec<String>,
    freshness: String,
}

/// Remove a Markdown code fence some models wrap JSON in.
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn malformed(what: impl Into<String>) -> CollaboratorError {
    CollaboratorError::Malformed(what.into())
}

/// Parse and validate the model's answer to the define prompt.
pub fn parse_definition(content: &str) -> Result<GeneratedDefinition, CollaboratorError> {
    let body = strip_fence(content);
    if body.is_empty() {
        return Err(CollaboratorError::Empty);
    }

    let raw: RawDefinition =
        serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let definition = raw.definition.trim().to_string();
    if definition.is_empty() {
        return Err(malformed("missing definition"));
    }

    let tone: Tone = raw.tone.parse().map_err(|e| malformed(format!("{}", e)))?;
    let freshness: Freshness = raw.freshness.parse().map_err(|e| malformed(format!("{}", e)))?;
    let categories = raw
        .categories
        .iter()
        .map(|c| c.parse::<Category>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| malformed(format!("{}", e)))?;
    if categories.is_empty() {
        return Err(malformed("no categories"));
    }

    Ok(GeneratedDefinition {
        definition,
        example: raw.example.trim().to_string(),
        tone,
        categories: truncate_categories(categories),
        freshness,
    })
}

#[async_trait]
impl DefinitionGenerator for LlmDefinitionGenerator {
    async fn define(&self, term: &str) -> Result<GeneratedDefinition, CollaboratorError> {
        let system = PromptAssembler::define_system();
        let prompt = Prompt::new(system, PromptAssembler::define_user(term))
            .json()
            .temperature(0.4)
            .max_tokens(DEFINE_MAX_TOKENS);

        let completion = self.backend.complete(&prompt).await?;
        debug!(
            backend = self.backend.id(),
            term,
            truncated = completion.truncated,
            "Definition completion received"
        );

        parse_definition(&completion.text).inspect_err(|e| {
            warn!(backend = self.backend.id(), term, error = %e, "Rejected generated definition");
        })
    }
}

/// Translator in both directions.
pub struct LlmTranslator {
    backend: Arc<dyn LlmBackend>,
}

impl LlmTranslator {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    async fn run(&self, system: String, user: String) -> Result<String, CollaboratorError> {
        let prompt = Prompt::new(system, user)
            .temperature(0.8)
            .max_tokens(TRANSLATE_MAX_TOKENS);

        let completion = self.backend.complete(&prompt).await?;
        let text = completion.text.trim();
        if text.is_empty() {
            return Err(CollaboratorError::Empty);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn to_plain(&self, slang: &str) -> Result<String, CollaboratorError> {
        self.run(
            PromptAssembler::to_plain_system(),
            PromptAssembler::to_plain_user(slang),
        )
        .await
    }

    async fn to_slang(&self, plain: &str) -> Result<String, CollaboratorError> {
        self.run(
            PromptAssembler::to_slang_system(),
            PromptAssembler::to_slang_user(plain),
        )
        .await
    }
}
