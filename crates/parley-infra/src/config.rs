//! Chat configuration loader for parley.
//!
//! Reads `config.toml` and deserializes it into [`ChatConfig`]. The file in
//! the data directory is optional and loaded leniently; a file named on the
//! command line must exist and parse.

use std::path::Path;

use parley_types::config::ChatConfig;
use parley_types::error::ConfigError;

use crate::paths::config_path;

/// Load `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ChatConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_chat_config(data_dir: &Path) -> ChatConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ChatConfig::default();
        }
    };

    match toml::from_str::<ChatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ChatConfig::default()
        }
    }
}

/// Read a config file the user asked for explicitly.
///
/// Unlike [`load_chat_config`], a missing or malformed file is an error.
pub async fn read_chat_config(path: &Path) -> Result<ChatConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

    toml::from_str::<ChatConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Render a config as TOML for display.
pub fn render_toml(config: &ChatConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|err| ConfigError::Invalid(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_chat_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_chat_config(tmp.path()).await;
        assert_eq!(config, ChatConfig::default());
    }

    #[tokio::test]
    async fn load_chat_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
exit_keywords = ["bye"]
model = "claude-sonnet-4-20250514"

[retry]
max_attempts = 3
"#,
        )
        .await
        .unwrap();

        let config = load_chat_config(tmp.path()).await;
        assert_eq!(config.exit_keywords, vec!["bye"]);
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.farewell, "Goodbye!");
    }

    #[tokio::test]
    async fn load_chat_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_chat_config(tmp.path()).await;
        assert_eq!(config, ChatConfig::default());
    }

    #[tokio::test]
    async fn read_chat_config_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_chat_config(&tmp.path().join("nope.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn read_chat_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.toml");
        tokio::fs::write(&path, "max_tokens = \"lots\"").await.unwrap();

        let err = read_chat_config(&path).await.unwrap_err();
        match err {
            ConfigError::Parse { path: reported, .. } => {
                assert!(reported.ends_with("broken.toml"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_chat_config_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        tokio::fs::write(&path, "farewell = \"Later.\"\n").await.unwrap();

        let config = read_chat_config(&path).await.unwrap();
        assert_eq!(config.farewell, "Later.");
    }

    #[test]
    fn render_toml_roundtrips() {
        let config = ChatConfig {
            system_prompt: Some("Be brief.".to_string()),
            ..ChatConfig::default()
        };
        let rendered = render_toml(&config).unwrap();
        assert!(rendered.contains("exit_keywords"));
        let parsed: ChatConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
