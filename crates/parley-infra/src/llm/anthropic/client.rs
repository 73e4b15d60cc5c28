//! AnthropicProvider -- [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends non-streaming requests to the Anthropic Messages API
//! (`/v1/messages`). The API key is held as a [`SecretString`] and only
//! exposed while building request headers.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::provider::LlmProvider;
use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use super::types::{
    AnthropicContentBlock, AnthropicErrorBody, AnthropicMessage, AnthropicRequest,
    AnthropicResponse,
};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Connection settings for [`AnthropicProvider`].
pub struct AnthropicConfig {
    pub api_key: SecretString,
    pub base_url: String,
    /// Upper bound on a single HTTP exchange.
    pub request_timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(300),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Anthropic Claude LLM provider.
///
/// Deliberately has no `Debug` impl.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`AnthropicRequest`].
    fn to_anthropic_request(request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
        }
    }
}

/// Map a non-success HTTP status to an [`LlmError`].
///
/// `retry_after` is the raw `retry-after` header, in seconds.
pub(crate) fn map_error_status(status: u16, retry_after: Option<&str>, body: &str) -> LlmError {
    let message = serde_json::from_str::<AnthropicErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000)),
        },
        529 => LlmError::Overloaded(message),
        400 => LlmError::InvalidRequest(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

/// Convert a parsed Anthropic response into a [`CompletionResponse`].
///
/// Text blocks are concatenated in order; other block types are skipped.
pub(crate) fn into_completion(resp: AnthropicResponse) -> CompletionResponse {
    let content = resp
        .content
        .iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text.as_str()),
            AnthropicContentBlock::ToolUse { .. } => None,
        })
        .collect::<String>();

    let stop_reason = resp
        .stop_reason
        .as_deref()
        .and_then(|s| s.parse::<StopReason>().ok())
        .unwrap_or(StopReason::EndTurn);

    CompletionResponse {
        id: resp.id,
        content,
        model: resp.model,
        stop_reason,
        usage: Usage {
            input_tokens: resp.usage.input_tokens,
            output_tokens: resp.usage.output_tokens,
        },
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_anthropic_request(request);
        let url = self.url("/v1/messages");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "anthropic request failed");
            return Err(map_error_status(
                status.as_u16(),
                retry_after.as_deref(),
                &error_body,
            ));
        }

        let anthropic_resp: AnthropicResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        Ok(into_completion(anthropic_resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::llm::Message;

    use crate::llm::anthropic::types::AnthropicUsage;

    #[test]
    fn test_to_anthropic_request_maps_history() {
        let request = CompletionRequest {
            model: "claude-3-haiku-20240307".to_string(),
            messages: vec![Message::user("hi"), Message::assistant("hello"), Message::user("bye?")],
            system: Some("Be brief.".to_string()),
            max_tokens: 64,
            temperature: None,
        };
        let body = AnthropicProvider::to_anthropic_request(&request);
        let roles: Vec<_> = body.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["user", "assistant", "user"]);
        assert_eq!(body.system.as_deref(), Some("Be brief."));
        assert_eq!(body.max_tokens, 64);
    }

    #[test]
    fn test_map_error_status() {
        assert!(matches!(
            map_error_status(401, None, ""),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(429, Some("7"), ""),
            LlmError::RateLimited {
                retry_after_ms: Some(7000)
            }
        ));
        assert!(matches!(
            map_error_status(429, Some("18446744073709551615"), ""),
            LlmError::RateLimited {
                retry_after_ms: Some(u64::MAX)
            }
        ));
        assert!(matches!(
            map_error_status(429, Some("soon"), ""),
            LlmError::RateLimited {
                retry_after_ms: None
            }
        ));

        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        match map_error_status(529, None, body) {
            LlmError::Overloaded(msg) => assert_eq!(msg, "Overloaded"),
            other => panic!("expected Overloaded, got {other:?}"),
        }

        match map_error_status(500, None, "boom") {
            LlmError::Provider { message } => assert_eq!(message, "HTTP 500: boom"),
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_into_completion_joins_text_blocks() {
        let resp = AnthropicResponse {
            id: "msg_1".to_string(),
            content: vec![
                AnthropicContentBlock::Text {
                    text: "Hello".to_string(),
                },
                AnthropicContentBlock::ToolUse {
                    id: "tu".to_string(),
                    name: "noop".to_string(),
                    input: serde_json::Value::Null,
                },
                AnthropicContentBlock::Text {
                    text: ", world".to_string(),
                },
            ],
            model: "claude-3-haiku-20240307".to_string(),
            stop_reason: Some("max_tokens".to_string()),
            usage: AnthropicUsage {
                input_tokens: 5,
                output_tokens: 2,
            },
        };
        let completion = into_completion(resp);
        assert_eq!(completion.content, "Hello, world");
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
        assert_eq!(completion.usage.input_tokens, 5);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AnthropicConfig::new(SecretString::from("sk-test"))
            .with_base_url("http://localhost:8080/");
        let provider = AnthropicProvider::new(config).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:8080");
        assert_eq!(provider.url("/v1/messages"), "http://localhost:8080/v1/messages");
    }
}
