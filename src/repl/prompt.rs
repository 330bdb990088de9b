//! Prompt showing the current schema name

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use super::shared_state::SharedState;

/// Prompt for the query shell
///
/// The schema name is read on every render, so a `:reload` that renames the
/// schema shows up on the next line.
pub struct QueryPrompt {
    shared_state: SharedState,
}

impl QueryPrompt {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl Prompt for QueryPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let name = self.shared_state.schema_name();
        if name.is_empty() {
            "(no schema)> ".into()
        } else {
            format!("{name}> ").into()
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
