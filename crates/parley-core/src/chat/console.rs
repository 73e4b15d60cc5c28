//! Console ports for the turn loop.
//!
//! The turn loop never touches stdin/stdout directly. The CLI implements
//! these traits over a terminal; tests implement them over scripted
//! inputs and recorded outputs.

use std::future::Future;

use parley_types::llm::{LlmError, Message};

/// What the user did at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line.
    Line(String),
    /// End of input (Ctrl+D, or stdin closed).
    Eof,
    /// Interrupt at the prompt (Ctrl+C).
    Interrupted,
}

/// Source of user utterances.
pub trait ConsoleInput {
    /// Wait for the next line. There is no timeout.
    fn read_line(&mut self) -> impl Future<Output = InputEvent>;
}

/// User-facing output of the turn loop.
pub trait ConsoleOutput {
    /// Show an assistant reply.
    fn reply(&mut self, message: &Message);

    /// Show the farewell line when the session closes normally.
    fn farewell(&mut self, text: &str);

    /// Report a failed responder call for the current turn.
    fn responder_failed(&mut self, error: &LlmError, attempt: u32, max_attempts: u32);

    /// Show an informational line (e.g. how to exit after Ctrl+C).
    fn notice(&mut self, _text: &str) {}

    /// Called right before the responder is invoked.
    fn thinking_started(&mut self) {}

    /// Called once the responder call has finished, successfully or not.
    fn thinking_finished(&mut self) {}
}
