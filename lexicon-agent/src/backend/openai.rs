//! OpenAI-compatible backend.
//!
//! Talks to any server exposing `/chat/completions` and `/models`: vLLM,
//! Ollama, llama.cpp or the hosted API.

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::traits::{Completion, LlmBackend, LlmError, OutputMode, Prompt};

pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl OpenAiBackend {
    /// `base_url` is the API root, e.g. `http://localhost:11434/v1`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Unavailable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            timeout,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<JsonMode>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonMode {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> ChatRequest<'a> {
    fn from_prompt(model: &'a str, prompt: &'a Prompt) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.input,
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
            response_format: match prompt.output {
                OutputMode::Json => Some(JsonMode { kind: "json_object" }),
                OutputMode::Text => None,
            },
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `Retry-After` in its delta-seconds form.
fn retry_after(headers: &header::HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        let request = self.authorized(self.client.get(format!("{}/models", self.base_url)));
        matches!(request.send().await, Ok(r) if r.status().is_success())
    }

    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        let body = ChatRequest::from_prompt(&self.model, prompt);
        debug!(model = %self.model, output = ?prompt.output, "Sending chat completion");

        let response = self
            .authorized(self.client.post(format!("{}/chat/completions", self.base_url)))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited {
                retry_after: retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::BadPayload(e.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::BadPayload("no choices in response".to_string()))?;

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            truncated: choice.finish_reason.as_deref() == Some("length"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::assert_err;
    use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer, key: Option<&str>) -> OpenAiBackend {
        OpenAiBackend::new(
            format!("{}/v1/", server.uri()),
            "slang-model",
            key.map(String::from),
            Duration::from_millis(500),
        )
        .unwrap()
    }

    fn prompt() -> Prompt {
        Prompt::new("sys", "hi")
    }

    #[tokio::test]
    async fn test_json_prompt_sends_system_user_and_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header_eq("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "slang-model",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hi"}
                ],
                "response_format": {"type": "json_object"},
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "{\"ok\":true}"}, "finish_reason": "length"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let completion = backend(&server, Some("sk-test"))
            .complete(&prompt().json())
            .await
            .unwrap();

        assert_eq!(completion.text, "{\"ok\":true}");
        assert!(completion.truncated);
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
            .mount(&server)
            .await;

        let err = assert_err!(backend(&server, None).complete(&prompt()).await);
        assert!(matches!(
            err,
            LlmError::RateLimited { retry_after: Some(d) } if d == Duration::from_secs(2)
        ));
    }

    #[tokio::test]
    async fn test_server_error_and_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let backend = backend(&server, None);
        let err = assert_err!(backend.complete(&prompt()).await);
        assert!(matches!(
            err,
            LlmError::Status { code: 503, ref body } if body.contains("overloaded")
        ));

        let err = assert_err!(backend.complete(&prompt()).await);
        assert!(matches!(err, LlmError::BadPayload(_)));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = assert_err!(backend(&server, None).complete(&prompt()).await);
        assert!(matches!(err, LlmError::Timeout(d) if d == Duration::from_millis(500)));
    }

    #[tokio::test]
    async fn test_availability_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let backend = backend(&server, None);
        assert_eq!(backend.id(), "slang-model");
        assert!(backend.is_available().await);
    }
}
