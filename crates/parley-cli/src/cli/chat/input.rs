//! Line input for the chat loop.
//!
//! On a terminal, wraps `rustyline_async::Readline` for editing, history,
//! and Ctrl+C / Ctrl+D handling. When stdin is piped, lines are read with
//! tokio so a conversation can be scripted.

use std::io::IsTerminal;

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use parley_core::chat::console::{ConsoleInput, InputEvent};

type PipedLines = Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>;

pub enum ChatInput {
    Terminal(Readline),
    Piped(PipedLines),
}

impl ChatInput {
    /// Interactive input with the given prompt.
    ///
    /// The returned `SharedWriter` prints above the prompt without
    /// clobbering what the user is typing.
    pub fn terminal(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok((Self::Terminal(rl), writer))
    }

    /// Read lines from process stdin.
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin())
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let boxed: Box<dyn AsyncRead + Unpin + Send> = Box::new(reader);
        Self::Piped(BufReader::new(boxed).lines())
    }

    pub fn stdin_is_terminal() -> bool {
        std::io::stdin().is_terminal()
    }

    /// Flush pending terminal output before the prompt goes away.
    pub fn finish(&mut self) {
        if let Self::Terminal(rl) = self {
            if let Err(e) = rl.flush() {
                tracing::debug!("failed to flush readline output: {e}");
            }
        }
    }
}

impl ConsoleInput for ChatInput {
    async fn read_line(&mut self) -> InputEvent {
        match self {
            Self::Terminal(rl) => match rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.clone());
                    }
                    InputEvent::Line(line)
                }
                Ok(ReadlineEvent::Eof) => InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
                Err(e) => {
                    tracing::warn!("readline failed: {e}");
                    InputEvent::Eof
                }
            },
            Self::Piped(lines) => match lines.next_line().await {
                Ok(Some(line)) => InputEvent::Line(line),
                Ok(None) => InputEvent::Eof,
                Err(e) => {
                    tracing::warn!("failed to read stdin: {e}");
                    InputEvent::Eof
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_piped_lines_then_eof() {
        let mut input = ChatInput::from_reader(b"hello\n  quit \n".as_slice());
        assert_eq!(input.read_line().await, InputEvent::Line("hello".to_string()));
        assert_eq!(input.read_line().await, InputEvent::Line("  quit ".to_string()));
        assert_eq!(input.read_line().await, InputEvent::Eof);
    }

    #[tokio::test]
    async fn test_piped_last_line_without_newline() {
        let mut input = ChatInput::from_reader(b"only".as_slice());
        assert_eq!(input.read_line().await, InputEvent::Line("only".to_string()));
        assert_eq!(input.read_line().await, InputEvent::Eof);
    }
}
