//! Chat session types for parley.
//!
//! A session is the lifetime of one turn loop: it is created when the
//! loop starts and ends when the user exits or the responder gives up.
//! Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

pub use crate::llm::MessageRole;

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    /// Closed by an exit keyword or end of input.
    Completed,
    /// Closed because the responder stayed unavailable.
    Aborted,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Aborted => write!(f, "aborted"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            "aborted" => Ok(SessionStatus::Aborted),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// Bookkeeping for a single chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Completed user+assistant exchanges.
    pub turn_count: u32,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub status: SessionStatus,
}

impl ChatSession {
    /// Start a new active session for the given model.
    pub fn start(model: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            model: model.into(),
            started_at: Utc::now(),
            ended_at: None,
            turn_count: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            status: SessionStatus::Active,
        }
    }

    /// Short form of the session id for display.
    pub fn short_id(&self) -> String {
        let id = self.id.to_string();
        id[..8].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_roundtrip() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::Aborted,
        ] {
            let s = status.to_string();
            let parsed: SessionStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_session_status_default_is_active() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn test_start_session() {
        let session = ChatSession::start("claude-3-haiku-20240307");
        assert_eq!(session.model, "claude-3-haiku-20240307");
        assert_eq!(session.turn_count, 0);
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.ended_at.is_none());
        assert_eq!(session.short_id().len(), 8);
    }

    #[test]
    fn test_session_serde() {
        let session = ChatSession::start("m");
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"status\":\"active\""));
        let parsed: ChatSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, session.id);
    }
}
