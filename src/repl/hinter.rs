//! Hinter for reedline - provides inline hints based on history

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

/// History hinter for the query shell
pub struct QueryHinter {
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl QueryHinter {
    /// Create a new hinter with default style
    pub fn new() -> Self {
        Self {
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }
}

impl Default for QueryHinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hinter for QueryHinter {
    /// Hint the rest of the most recent history entry starting with `line`
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let entry = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()
            .and_then(|results| results.into_iter().next());

        let Some(entry) = entry else {
            return String::new();
        };

        let Some(hint) = entry.command_line.strip_prefix(line) else {
            return String::new();
        };
        if hint.is_empty() {
            return String::new();
        }

        self.current_hint = hint.to_string();
        if use_ansi_coloring {
            self.style.paint(hint).to_string()
        } else {
            self.current_hint.clone()
        }
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }

    /// Next whitespace-delimited piece of the hint
    fn next_hint_token(&self) -> String {
        let trimmed = self.current_hint.trim_start();
        let leading = self.current_hint.len() - trimmed.len();
        let token_len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        self.current_hint[..leading + token_len].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::{FileBackedHistory, HistoryItem};

    fn create_test_history(lines: &[&str]) -> FileBackedHistory {
        let mut history = FileBackedHistory::new(100).unwrap();
        for line in lines {
            history
                .save(HistoryItem::from_command_line(*line))
                .unwrap();
        }
        history
    }

    #[test]
    fn test_hint_from_history() {
        let mut hinter = QueryHinter::new();
        let history = create_test_history(&["int = 4", "string ~ foo and int > 3"]);

        let hint = hinter.handle("string ~", 8, &history, false, "/tmp");
        assert_eq!(hint, " foo and int > 3");
        assert_eq!(hinter.complete_hint(), " foo and int > 3");
        assert_eq!(hinter.next_hint_token(), " foo");
    }

    #[test]
    fn test_empty_line_no_hint() {
        let mut hinter = QueryHinter::new();
        let history = create_test_history(&["int = 4"]);
        assert_eq!(hinter.handle("", 0, &history, true, "/tmp"), "");
    }

    #[test]
    fn test_cursor_not_at_end_no_hint() {
        let mut hinter = QueryHinter::new();
        let history = create_test_history(&["int = 4"]);
        assert_eq!(hinter.handle("int", 1, &history, true, "/tmp"), "");
        assert_eq!(hinter.complete_hint(), "");
    }

    #[test]
    fn test_default() {
        let hinter = QueryHinter::default();
        assert_eq!(hinter.next_hint_token(), "");
    }
}
