//! Welcome banner display for chat sessions.

use std::io::{self, Write};

use console::style;

/// Write the welcome banner at the start of a chat session.
///
/// Shows the model, the short session id, and how to leave.
pub fn write_welcome_banner(
    out: &mut dyn Write,
    model: &str,
    session_id: &str,
    exit_hint: &str,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("parley").cyan().bold())?;
    writeln!(out)?;
    writeln!(out, "  {}    {}", style("Model:").bold(), style(model).dim())?;
    writeln!(out, "  {}  {}", style("Session:").bold(), style(session_id).dim())?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style(format!("Type {exit_hint} to end the conversation")).dim()
    )?;
    writeln!(out, "  {}", style("---").dim())?;
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_mentions_model_session_and_exit() {
        let mut buf = Vec::new();
        write_welcome_banner(
            &mut buf,
            "claude-3-haiku-20240307",
            "0191a2b3",
            "\"quit\", \"exit\", or \"q\"",
        )
        .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("claude-3-haiku-20240307"));
        assert!(text.contains("0191a2b3"));
        assert!(text.contains("\"quit\", \"exit\", or \"q\""));
    }
}
