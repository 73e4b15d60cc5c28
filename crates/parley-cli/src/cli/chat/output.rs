//! Terminal output for the chat loop.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use parley_core::chat::console::ConsoleOutput;
use parley_types::llm::{LlmError, Message};

use super::renderer::ChatRenderer;

/// Writes replies and status lines to a terminal (or any writer).
///
/// Errors are reported on stderr; everything that belongs to the
/// conversation goes to `out`.
pub struct TerminalOutput {
    out: Box<dyn Write + Send>,
    renderer: Option<ChatRenderer>,
    spinner: Option<ProgressBar>,
}

impl TerminalOutput {
    /// `renderer: None` prints replies verbatim.
    pub fn new(out: Box<dyn Write + Send>, renderer: Option<ChatRenderer>) -> Self {
        Self {
            out,
            renderer,
            spinner: None,
        }
    }

    pub fn writer(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!("failed to write to terminal: {e}");
        }
    }
}

impl ConsoleOutput for TerminalOutput {
    fn reply(&mut self, message: &Message) {
        let body = match &self.renderer {
            Some(renderer) => renderer.render(&message.content),
            None => message.content.clone(),
        };

        self.write_line("");
        self.write_line(&format!("  {}", style("Assistant:").cyan().bold()));
        for line in body.trim_end().lines() {
            self.write_line(&format!("  {line}"));
        }
        self.write_line("");
    }

    fn farewell(&mut self, text: &str) {
        self.write_line(&format!("\n  {}", style(text).dim()));
    }

    fn responder_failed(&mut self, error: &LlmError, attempt: u32, max_attempts: u32) {
        eprintln!(
            "\n  {} Could not get a reply (attempt {attempt}/{max_attempts}): {error}",
            style("!").red().bold()
        );
        if attempt < max_attempts {
            eprintln!("  {}", style("Retrying...").dim());
        }
    }

    fn notice(&mut self, text: &str) {
        self.write_line(&format!("\n  {}", style(text).dim()));
    }

    fn thinking_started(&mut self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn thinking_finished(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
