//! The conversation turn loop.
//!
//! A two-state machine with a terminal state:
//!
//! ```text
//! AwaitingInput --line--> Processing --reply--> AwaitingInput
//!       |                      |
//!   exit / EOF          retries exhausted
//!       v                      v
//!     Closed <-----------------+
//! ```
//!
//! Each turn appends the user message, hands the whole history to the
//! [`Responder`], and appends the reply. A failed turn leaves the user
//! message unanswered and never fabricates an assistant message, so the
//! history is always `user, assistant, ...` with at most one trailing
//! unanswered `user`.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use parley_types::chat::{ChatSession, SessionStatus};
use parley_types::config::{ChatConfig, RetryPolicy};
use parley_types::error::ConversationError;
use parley_types::llm::{LlmError, Message, MessageRole};

use super::console::{ConsoleInput, ConsoleOutput, InputEvent};
use super::exit::ExitKeywords;
use super::session::SessionManager;
use super::state::ConversationState;
use crate::llm::responder::{Reply, Responder};

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingInput,
    Processing,
    Closed,
}

/// Result of feeding one line to the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The responder answered; the reply is already in the history.
    Replied(Message),
    /// Blank input; nothing was appended.
    EmptyInput,
    /// An exit keyword closed the loop.
    Exit,
}

/// Errors surfaced by the turn loop.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("responder unavailable after {attempts} attempt(s): {source}")]
    ResponderUnavailable {
        attempts: u32,
        #[source]
        source: LlmError,
    },

    #[error("the conversation is closed")]
    Closed,

    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

/// Knobs the loop needs beyond the responder itself.
#[derive(Debug, Clone)]
pub struct TurnLoopSettings {
    pub exit_keywords: ExitKeywords,
    pub farewell: String,
    pub retry: RetryPolicy,
    pub responder_timeout: Option<Duration>,
}

impl TurnLoopSettings {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            exit_keywords: ExitKeywords::new(&config.exit_keywords),
            farewell: config.farewell.clone(),
            retry: config.retry.clone(),
            responder_timeout: config.responder_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for TurnLoopSettings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

/// Drives a single conversation against a [`Responder`].
pub struct TurnLoop<R> {
    responder: R,
    settings: TurnLoopSettings,
    conversation: ConversationState,
    session: SessionManager,
    state: LoopState,
}

impl<R: Responder> TurnLoop<R> {
    pub fn new(responder: R, settings: TurnLoopSettings, session: ChatSession) -> Self {
        Self {
            responder,
            settings,
            conversation: ConversationState::new(),
            session: SessionManager::new(session),
            state: LoopState::AwaitingInput,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn session(&self) -> &ChatSession {
        self.session.session()
    }

    pub fn settings(&self) -> &TurnLoopSettings {
        &self.settings
    }

    /// Consume the loop, returning the final history and session record.
    pub fn finish(self) -> (ConversationState, ChatSession) {
        (self.conversation, self.session.into_session())
    }

    /// Read and answer lines until the user exits or the responder gives up.
    ///
    /// Returns `Ok(())` when the session ends normally (exit keyword or end
    /// of input) and [`TurnError::ResponderUnavailable`] when it is aborted.
    pub async fn run<I, O>(&mut self, input: &mut I, output: &mut O) -> Result<(), TurnError>
    where
        I: ConsoleInput,
        O: ConsoleOutput,
    {
        info!(session_id = %self.session().id, "conversation started");

        while self.state != LoopState::Closed {
            match input.read_line().await {
                InputEvent::Line(line) => match self.step(&line, output).await? {
                    StepOutcome::Replied(message) => output.reply(&message),
                    StepOutcome::EmptyInput => {}
                    StepOutcome::Exit => output.farewell(&self.settings.farewell),
                },
                InputEvent::Eof => {
                    debug!("end of input");
                    self.close(SessionStatus::Completed);
                    output.farewell(&self.settings.farewell);
                }
                InputEvent::Interrupted => {
                    output.notice(&format!(
                        "Type {} to exit.",
                        self.settings.exit_keywords.hint()
                    ));
                }
            }
        }

        Ok(())
    }

    /// Feed one line of user input through the loop.
    ///
    /// On responder failure the user message stays in the history, the loop
    /// moves to [`LoopState::Closed`], and the error is returned.
    pub async fn step<O: ConsoleOutput>(
        &mut self,
        line: &str,
        output: &mut O,
    ) -> Result<StepOutcome, TurnError> {
        if self.state == LoopState::Closed {
            return Err(TurnError::Closed);
        }

        let utterance = line.trim();
        if self.settings.exit_keywords.matches(utterance) {
            debug!("exit keyword received");
            self.close(SessionStatus::Completed);
            return Ok(StepOutcome::Exit);
        }
        if utterance.is_empty() {
            return Ok(StepOutcome::EmptyInput);
        }

        self.state = LoopState::Processing;
        self.conversation.append(MessageRole::User, utterance)?;

        match self.request_reply(output).await {
            Ok(reply) => {
                self.conversation
                    .append(MessageRole::Assistant, reply.message.content.clone())?;
                self.session.record_turn(reply.usage);
                self.state = LoopState::AwaitingInput;
                debug!(turn = self.session.turn_count(), "turn complete");
                Ok(StepOutcome::Replied(reply.message))
            }
            Err(err) => {
                self.close(SessionStatus::Aborted);
                Err(err)
            }
        }
    }

    async fn request_reply<O: ConsoleOutput>(&self, output: &mut O) -> Result<Reply, TurnError> {
        let max_attempts = self.settings.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            output.thinking_started();
            let result = self.call_responder().await;
            output.thinking_finished();

            let err = match result {
                Ok(reply) => return Ok(reply),
                Err(err) => err,
            };

            warn!(attempt, max_attempts, error = %err, "responder call failed");
            output.responder_failed(&err, attempt, max_attempts);

            if attempt >= max_attempts {
                return Err(TurnError::ResponderUnavailable {
                    attempts: attempt,
                    source: err,
                });
            }

            let backoff = self
                .settings
                .retry
                .backoff_ms
                .saturating_mul(u64::from(attempt));
            if backoff > 0 {
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }
        }
    }

    async fn call_responder(&self) -> Result<Reply, LlmError> {
        let history = self.conversation.messages();

        let reply = match self.settings.responder_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.responder.respond(history)).await {
                    Ok(result) => result?,
                    Err(_) => {
                        return Err(LlmError::Timeout {
                            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                        });
                    }
                }
            }
            None => self.responder.respond(history).await?,
        };

        validate_reply(reply)
    }

    fn close(&mut self, status: SessionStatus) {
        self.state = LoopState::Closed;
        self.session.close(status);

        let session = self.session.session();
        info!(
            session_id = %session.id,
            status = %session.status,
            turns = session.turn_count,
            input_tokens = session.total_input_tokens,
            output_tokens = session.total_output_tokens,
            "conversation closed"
        );
    }
}

/// A reply must be a non-empty assistant message; anything else is a
/// malformed response from the external service.
fn validate_reply(reply: Reply) -> Result<Reply, LlmError> {
    if reply.message.role != MessageRole::Assistant {
        return Err(LlmError::MalformedReply(format!(
            "expected an assistant message, got role '{}'",
            reply.message.role
        )));
    }
    if reply.message.content.trim().is_empty() {
        return Err(LlmError::MalformedReply("empty content".to_string()));
    }
    Ok(reply)
}
