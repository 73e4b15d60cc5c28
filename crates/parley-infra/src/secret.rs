//! Environment variable secret lookup.
//!
//! Credentials are read once at startup and handed to the provider as an
//! explicit [`SecretString`]; nothing downstream reads the environment.

use secrecy::SecretString;

use parley_types::error::ConfigError;

/// Read-only secret source backed by process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }

    /// Look up `key` as an environment variable.
    ///
    /// Unset, blank, and non-Unicode values are all treated as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(val) if !val.trim().is_empty() => Some(val),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }

    /// Resolve a required API key.
    pub fn api_key(&self, key: &str) -> Result<SecretString, ConfigError> {
        self.get(key)
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingCredential {
                var: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_env_provider_get_existing() {
        // SAFETY: the variable name is unique to this test and removed afterwards.
        unsafe { std::env::set_var("PARLEY_TEST_SECRET_1", "test-value-123") };

        let provider = EnvSecretProvider::new();
        assert_eq!(
            provider.get("PARLEY_TEST_SECRET_1"),
            Some("test-value-123".to_string())
        );
        let key = provider.api_key("PARLEY_TEST_SECRET_1").unwrap();
        assert_eq!(key.expose_secret(), "test-value-123");

        // SAFETY: set above in this test only.
        unsafe { std::env::remove_var("PARLEY_TEST_SECRET_1") };
    }

    #[test]
    fn test_env_provider_get_missing() {
        let provider = EnvSecretProvider::new();
        assert!(provider.get("NONEXISTENT_VAR_XYZ_123").is_none());
    }

    #[test]
    fn test_env_provider_blank_is_missing() {
        // SAFETY: the variable name is unique to this test and removed afterwards.
        unsafe { std::env::set_var("PARLEY_TEST_SECRET_BLANK", "   ") };

        let provider = EnvSecretProvider::new();
        let err = provider.api_key("PARLEY_TEST_SECRET_BLANK").unwrap_err();
        match err {
            ConfigError::MissingCredential { var } => assert_eq!(var, "PARLEY_TEST_SECRET_BLANK"),
            other => panic!("expected MissingCredential, got {other:?}"),
        }

        // SAFETY: set above in this test only.
        unsafe { std::env::remove_var("PARLEY_TEST_SECRET_BLANK") };
    }
}
