//! Exit-keyword matching for the turn loop.

/// Set of inputs that close the conversation.
///
/// Keywords are stored trimmed and lowercased; matching applies the same
/// normalization to the input, so `"  EXIT "` matches `exit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitKeywords {
    keywords: Vec<String>,
}

impl ExitKeywords {
    /// Build a keyword set. Blank entries and duplicates are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = normalize(keyword.as_ref());
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self {
            keywords: normalized,
        }
    }

    /// Whether `input` is one of the exit keywords.
    pub fn matches(&self, input: &str) -> bool {
        let input = normalize(input);
        !input.is_empty() && self.keywords.iter().any(|k| *k == input)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Human-readable list for prompts, e.g. `"quit", "exit", or "q"`.
    pub fn hint(&self) -> String {
        let quoted: Vec<String> = self.keywords.iter().map(|k| format!("\"{k}\"")).collect();
        match quoted.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
        }
    }
}

impl Default for ExitKeywords {
    fn default() -> Self {
        Self::new(["quit", "exit", "q"])
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}
