//! Offline backend for tests and `--mock-llm` deployments.
//!
//! JSON prompts get a well-formed definition object; text prompts get the
//! last line of the input back, tagged `[mock]`.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::traits::{Completion, LlmBackend, LlmError, OutputMode, Prompt};

pub struct MockBackend {
    name: String,
    online: AtomicBool,
    fixed: Option<String>,
    calls: AtomicU32,
}

impl MockBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            online: AtomicBool::new(true),
            fixed: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Answer every prompt with `text`.
    pub fn with_response(mut self, text: impl Into<String>) -> Self {
        self.fixed = Some(text.into());
        self
    }

    /// An offline mock fails every call with `Unavailable`.
    pub fn with_available(self, online: bool) -> Self {
        self.online.store(online, Ordering::SeqCst);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(prompt: &Prompt) -> String {
        let subject = prompt.input.lines().last().unwrap_or_default();
        match prompt.output {
            OutputMode::Json => json!({
                "definition": format!(
                    "An informal expression with no curated definition yet ({}).",
                    subject
                ),
                "example": "People online keep saying it.",
                "tone": "neutral",
                "categories": ["other"],
                "freshness": "fresh",
            })
            .to_string(),
            OutputMode::Text => format!("[mock] {}", subject),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("mock")
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn id(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.online.load(Ordering::SeqCst) {
            return Err(LlmError::Unavailable(format!("{} is offline", self.name)));
        }

        let text = self.fixed.clone().unwrap_or_else(|| Self::answer(prompt));
        Ok(Completion::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_response_and_call_count() {
        let backend = MockBackend::new("fixed").with_response("bet");
        assert!(backend.is_available().await);

        let completion = backend.complete(&Prompt::new("sys", "hi")).await.unwrap();
        assert_eq!(completion.text, "bet");
        assert!(!completion.truncated);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_offline_mock_still_counts_calls() {
        let backend = MockBackend::default().with_available(false);
        assert!(!backend.is_available().await);

        let result = backend.complete(&Prompt::new("sys", "hi")).await;
        assert!(matches!(result, Err(LlmError::Unavailable(_))));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generated_answers_follow_output_mode() {
        let backend = MockBackend::default();

        let json = backend
            .complete(&Prompt::new("sys", "Define it.\n\nTerm: glizzy").json())
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json.text).unwrap();
        assert_eq!(value["tone"], "neutral");
        assert!(value["definition"].as_str().unwrap().contains("Term: glizzy"));

        let text = backend.complete(&Prompt::new("sys", "no cap")).await.unwrap();
        assert_eq!(text.text, "[mock] no cap");
    }
}
