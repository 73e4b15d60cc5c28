//! Session manager for chat sessions.
//!
//! Wraps a [`ChatSession`] with turn counting, token accounting and
//! lifecycle transitions.

use chrono::Utc;

use parley_types::chat::{ChatSession, SessionStatus};
use parley_types::llm::Usage;

/// Manages the lifecycle and bookkeeping of a single chat session.
#[derive(Debug, Clone)]
pub struct SessionManager {
    session: ChatSession,
}

impl SessionManager {
    pub fn new(session: ChatSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn into_session(self) -> ChatSession {
        self.session
    }

    pub fn turn_count(&self) -> u32 {
        self.session.turn_count
    }

    /// Record a completed user+assistant exchange.
    pub fn record_turn(&mut self, usage: Option<Usage>) {
        self.session.turn_count = self.session.turn_count.saturating_add(1);
        if let Some(usage) = usage {
            let session = &mut self.session;
            session.total_input_tokens = session
                .total_input_tokens
                .saturating_add(u64::from(usage.input_tokens));
            session.total_output_tokens = session
                .total_output_tokens
                .saturating_add(u64::from(usage.output_tokens));
        }
    }

    /// Close the session with a terminal status.
    ///
    /// Only the first call has an effect; a closed session stays closed.
    pub fn close(&mut self, status: SessionStatus) {
        if self.session.status != SessionStatus::Active {
            return;
        }
        self.session.status = status;
        self.session.ended_at = Some(Utc::now());
    }

    pub fn is_active(&self) -> bool {
        self.session.status == SessionStatus::Active
    }
}
