use thiserror::Error;

/// Contract violations at the conversation-state boundary.
///
/// These are programmer errors: the turn loop never produces them for
/// well-formed input, so callers propagate them instead of recovering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("invalid message role: '{0}'")]
    InvalidRole(String),

    #[error("message content must not be empty")]
    EmptyContent,
}

/// Errors raised while assembling the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
