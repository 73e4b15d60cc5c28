//! Chat configuration types for parley.
//!
//! `ChatConfig` represents `config.toml` in the data directory. Every field
//! has a default, so an empty file (or no file) yields a working setup.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default model for the Anthropic provider.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Top-level configuration for a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Inputs that end the session, matched trimmed and case-insensitively.
    #[serde(default = "default_exit_keywords")]
    pub exit_keywords: Vec<String>,

    /// Printed when the session ends normally.
    #[serde(default = "default_farewell")]
    pub farewell: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Upper bound on a single responder call. `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder_timeout_secs: Option<u64>,

    #[serde(default)]
    pub retry: RetryPolicy,

    #[serde(default)]
    pub provider: ProviderSettings,
}

fn default_exit_keywords() -> Vec<String> {
    vec!["quit".to_string(), "exit".to_string(), "q".to_string()]
}

fn default_farewell() -> String {
    "Goodbye!".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            exit_keywords: default_exit_keywords(),
            farewell: default_farewell(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            system_prompt: None,
            responder_timeout_secs: None,
            retry: RetryPolicy::default(),
            provider: ProviderSettings::default(),
        }
    }
}

impl ChatConfig {
    /// Check the values that deserialization alone cannot rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exit_keywords.is_empty() {
            return Err(ConfigError::Invalid(
                "exit_keywords must contain at least one keyword".to_string(),
            ));
        }
        if self.exit_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "exit_keywords must not contain blank entries".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.responder_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "responder_timeout_secs must be positive".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// How the turn loop reacts when the responder fails.
///
/// The same user turn is re-sent up to `max_attempts` times in total,
/// waiting `backoff_ms * attempt` between tries. After the last failure
/// the session is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    500
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

/// Where the provider lives and where its credential comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: None,
        }
    }
}
