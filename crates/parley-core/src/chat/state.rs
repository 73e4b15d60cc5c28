//! Append-only conversation history.
//!
//! [`ConversationState`] is the single source of truth for what has been
//! said in a session. Messages are only ever appended; insertion order is
//! chronological order and is never rewritten.

use parley_types::error::ConversationError;
use parley_types::llm::{Message, MessageRole};

/// Ordered, append-only sequence of messages for one session.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the conversation.
    ///
    /// Content that is empty or whitespace-only is rejected with
    /// [`ConversationError::EmptyContent`]; nothing is appended in that case.
    pub fn append(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<(), ConversationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ConversationError::EmptyContent);
        }

        tracing::trace!(%role, index = self.messages.len(), "appending message");
        self.messages.push(Message { role, content });
        Ok(())
    }

    /// Append with a role given as text (e.g. from a transcript or test fixture).
    ///
    /// Unrecognized roles fail with [`ConversationError::InvalidRole`].
    pub fn append_raw(
        &mut self,
        role: &str,
        content: impl Into<String>,
    ) -> Result<(), ConversationError> {
        let role: MessageRole = role.parse()?;
        self.append(role, content)
    }

    /// The full history, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// An owned copy of the history.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of assistant replies, i.e. completed turns.
    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count()
    }

    /// Whether the newest message is a user message still waiting for a reply.
    pub fn awaiting_reply(&self) -> bool {
        matches!(self.last(), Some(m) if m.role == MessageRole::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let state = ConversationState::new();
        assert!(state.is_empty());
        assert_eq!(state.len(), 0);
        assert!(state.last().is_none());
        assert!(!state.awaiting_reply());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut state = ConversationState::new();
        state.append(MessageRole::User, "a").unwrap();
        state.append(MessageRole::Assistant, "re: a").unwrap();
        state.append(MessageRole::User, "b").unwrap();

        assert_eq!(
            state.messages(),
            &[
                Message::user("a"),
                Message::assistant("re: a"),
                Message::user("b"),
            ]
        );
        assert!(state.awaiting_reply());
        assert_eq!(state.turn_count(), 1);
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let mut state = ConversationState::new();
        state.append(MessageRole::User, "same").unwrap();
        state.append(MessageRole::User, "same").unwrap();
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_append_rejects_empty_content() {
        let mut state = ConversationState::new();
        assert_eq!(
            state.append(MessageRole::User, ""),
            Err(ConversationError::EmptyContent)
        );
        assert_eq!(
            state.append(MessageRole::Assistant, " \n\t"),
            Err(ConversationError::EmptyContent)
        );
        assert!(state.is_empty());
    }

    #[test]
    fn test_append_raw_parses_role() {
        let mut state = ConversationState::new();
        state.append_raw("user", "hi").unwrap();
        state.append_raw("Assistant", "hello").unwrap();
        assert_eq!(state.messages()[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_append_raw_rejects_unknown_role() {
        let mut state = ConversationState::new();
        let err = state.append_raw("system", "be nice").unwrap_err();
        assert_eq!(err, ConversationError::InvalidRole("system".to_string()));
        assert!(state.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut state = ConversationState::new();
        state.append(MessageRole::User, "hi").unwrap();

        let mut copy = state.snapshot();
        copy.clear();

        assert_eq!(state.len(), 1);
        assert_eq!(state.messages()[0], Message::user("hi"));
    }

    #[test]
    fn test_length_never_decreases() {
        let mut state = ConversationState::new();
        let mut previous = state.len();
        for (i, role) in [MessageRole::User, MessageRole::Assistant]
            .iter()
            .cycle()
            .take(10)
            .enumerate()
        {
            let _ = state.append(*role, format!("message {i}"));
            // A rejected append must not shrink the history either.
            let _ = state.append(*role, "");
            assert!(state.len() >= previous);
            previous = state.len();
        }
        assert_eq!(state.len(), 10);
    }
}
