//! Terminal markdown rendering for assistant replies.

use termimad::MadSkin;
use termimad::crossterm::style::Color;

/// Renders a complete reply as terminal markdown via `termimad`.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
