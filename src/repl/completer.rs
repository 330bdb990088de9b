//! Completer for reedline - provides completion suggestions

use reedline::{Completer, Span, Suggestion};
use tracing::warn;

use super::shared_state::SharedState;

/// Query completer for reedline
///
/// Suggestions are whole replacement lines for the text left of the cursor.
pub struct QueryCompleter {
    shared_state: SharedState,
}

impl QueryCompleter {
    /// Create a new query completer
    ///
    /// # Arguments
    /// * `shared_state` - Shared state holding the completion engine
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl Completer for QueryCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let head = line.get(..pos).unwrap_or(line);

        let suggestions = match self.shared_state.engine().complete(head) {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!("Completion failed: {e}");
                return Vec::new();
            }
        };

        suggestions
            .into_iter()
            .map(|value| Suggestion {
                value,
                span: Span::new(0, head.len()),
                append_whitespace: false,
                ..Default::default()
            })
            .collect()
    }
}
