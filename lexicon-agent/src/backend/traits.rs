//! The text-generation backend contract.
//!
//! Every call in this crate is a single-turn exchange: one system prompt,
//! one input, one answer. [`Prompt`] models exactly that.

use async_trait::async_trait;
use lexicon::CollaboratorError;
use std::time::Duration;

/// Failure talking to a text-generation backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend answered {code}: {body}")]
    Status { code: u16, body: String },

    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered, but not in a shape we can read.
    #[error("unreadable payload: {0}")]
    BadPayload(String),
}

impl From<LlmError> for CollaboratorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::BadPayload(msg) => CollaboratorError::Malformed(msg),
            other => CollaboratorError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Model or backend name, for logs and /health.
    fn id(&self) -> &str;

    async fn is_available(&self) -> bool;

    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Text,
    /// Ask the backend for a single JSON object.
    Json,
}

/// A single-turn prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub input: String,
    pub output: OutputMode,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Prompt {
    pub const DEFAULT_MAX_TOKENS: u32 = 256;
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    pub fn new(system: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            input: input.into(),
            output: OutputMode::Text,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }

    pub fn json(mut self) -> Self {
        self.output = OutputMode::Json;
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Clamped to the 0.0..=2.0 range OpenAI-style servers accept.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }
}

/// What the backend produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// The token limit cut the answer short.
    pub truncated: bool,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_builder() {
        let prompt = Prompt::new("be brief", "define rizz")
            .json()
            .temperature(3.5)
            .max_tokens(64);
        assert_eq!(prompt.output, OutputMode::Json);
        assert_eq!(prompt.temperature, 2.0);
        assert_eq!(prompt.max_tokens, 64);
        assert_eq!(Prompt::new("", "x").output, OutputMode::Text);
    }

    #[test]
    fn test_llm_error_maps_to_collaborator_error() {
        let err: CollaboratorError = LlmError::BadPayload("bad json".into()).into();
        assert_eq!(err, CollaboratorError::Malformed("bad json".into()));

        let err: CollaboratorError = LlmError::Timeout(Duration::from_millis(500)).into();
        assert!(matches!(err, CollaboratorError::Unavailable(_)));
    }
}
