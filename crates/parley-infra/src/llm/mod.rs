//! LLM provider construction from chat configuration.

pub mod anthropic;

use std::time::Duration;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::config::ChatConfig;
use parley_types::llm::LlmError;

use anthropic::{AnthropicConfig, AnthropicProvider};

/// Build the configured provider behind a [`BoxLlmProvider`].
///
/// The HTTP timeout follows `responder_timeout_secs` when set, so the
/// client never outlives the turn loop's own deadline.
pub fn create_provider(
    config: &ChatConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let mut anthropic = AnthropicConfig::new(api_key);
    if let Some(base_url) = &config.provider.base_url {
        anthropic = anthropic.with_base_url(base_url.clone());
    }
    if let Some(secs) = config.responder_timeout_secs {
        anthropic = anthropic.with_request_timeout(Duration::from_secs(secs));
    }

    let provider = AnthropicProvider::new(anthropic)?;
    tracing::debug!(base_url = provider.base_url(), "created anthropic provider");
    Ok(BoxLlmProvider::new(provider))
}
