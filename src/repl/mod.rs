//! Interactive query shell
//!
//! This module provides the interactive shell on top of reedline:
//! - Grammar-aware completion bound to Tab
//! - Syntax highlighting by token role
//! - History hints and file-backed history
//! - A validator that keeps the line open inside a quoted literal
//! - Meta commands (`:help`, `:fields`, `:reload`, `:quit`)
//!
//! Any other line is validated against the schema and its clauses printed.

mod completer;
mod highlighter;
mod hinter;
mod prompt;
mod shared_state;
mod validator;

#[cfg(test)]
mod tests;

use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::debug;

pub use completer::QueryCompleter;
pub use highlighter::QueryHighlighter;
pub use hinter::QueryHinter;
pub use prompt::QueryPrompt;
pub use shared_state::SharedState;
pub use validator::LineValidator;

use crate::config::HistoryConfig;
use crate::error::{Result, SearchlineError};
use crate::formatter::Formatter;

const COMPLETION_MENU: &str = "completion_menu";

const HELP: &str = "\
Type a query and press Enter to check it against the schema.
Press Tab to complete the token under the cursor.

  field = value            comparison (=, !=, <, <=, >, >=, ~, !~, ^, !^)
  has field / not field    presence (also null? and set?)
  a and b / a or b         connectives (& && | || also accepted)
  'quoted value'           literal containing spaces

Commands:
  :help            show this help
  :fields          list the fields of the current schema
  :reload          re-read the schema file
  :quit, exit      leave the shell";

/// Shell meta command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    Fields,
    Reload,
    Quit,
}

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Meta(MetaCommand),
    Query(String),
}

impl Input {
    /// Classify a submitted line
    ///
    /// # Returns
    /// * `Result<Input>` - Fails on an unknown `:` command
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();

        let command = match line {
            "" => return Ok(Input::Empty),
            "exit" | "quit" | ":quit" | ":q" | ":exit" => MetaCommand::Quit,
            ":help" | ":h" | ":?" => MetaCommand::Help,
            ":fields" | ":f" => MetaCommand::Fields,
            ":reload" | ":r" => MetaCommand::Reload,
            other if other.starts_with(':') => {
                return Err(SearchlineError::Generic(format!(
                    "Unknown command '{other}'. Type :help for help"
                )));
            }
            query => return Ok(Input::Query(query.to_string())),
        };

        Ok(Input::Meta(command))
    }
}

/// What the shell does with an evaluated line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Nothing,
    Print(String),
    Fail(String),
    Quit,
}

/// Evaluate one line against the shared state
pub fn evaluate(state: &SharedState, line: &str) -> Evaluation {
    let formatter = Formatter::new(state.get_format(), state.get_color_enabled());

    let outcome = Input::parse(line).and_then(|input| match input {
        Input::Empty => Ok(Evaluation::Nothing),
        Input::Meta(MetaCommand::Quit) => Ok(Evaluation::Quit),
        Input::Meta(MetaCommand::Help) => Ok(Evaluation::Print(HELP.to_string())),
        Input::Meta(MetaCommand::Fields) => {
            formatter.format_fields(&state.registry()).map(Evaluation::Print)
        }
        Input::Meta(MetaCommand::Reload) => state.reload().map(|registry| {
            Evaluation::Print(format!(
                "Reloaded schema '{}' ({} fields)",
                registry.name(),
                registry.len()
            ))
        }),
        Input::Query(query) => {
            let validated = state.engine().validate(&query)?;
            if validated.is_empty() {
                return Ok(Evaluation::Nothing);
            }
            formatter.format_query(&validated).map(Evaluation::Print)
        }
    });

    outcome.unwrap_or_else(|e| Evaluation::Fail(formatter.format_error(&e)))
}

/// REPL engine for interactive query editing
pub struct ReplEngine {
    /// Line editor for query input
    editor: Reedline,

    prompt: QueryPrompt,

    /// Shared state with the editor components
    shared_state: SharedState,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `shared_state` - Shared state holding the completion engine
    /// * `history_config` - History configuration
    /// * `highlighting_enabled` - Enable syntax highlighting
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(
        shared_state: SharedState,
        history_config: &HistoryConfig,
        highlighting_enabled: bool,
    ) -> Result<Self> {
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );
        keybindings.add_binding(
            KeyModifiers::SHIFT,
            KeyCode::BackTab,
            ReedlineEvent::MenuPrevious,
        );

        let history = if history_config.persist {
            debug!("History file: {}", history_config.file_path.display());
            FileBackedHistory::with_file(history_config.max_size, history_config.file_path.clone())?
        } else {
            FileBackedHistory::new(history_config.max_size)?
        };

        let completion_menu = Box::new(ColumnarMenu::default().with_name(COMPLETION_MENU));

        let editor = Reedline::create()
            .with_completer(Box::new(QueryCompleter::new(shared_state.clone())))
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_hinter(Box::new(QueryHinter::new()))
            .with_highlighter(Box::new(QueryHighlighter::new(
                shared_state.clone(),
                highlighting_enabled,
            )))
            .with_validator(Box::new(LineValidator::new()))
            .with_history(Box::new(history));

        Ok(Self {
            editor,
            prompt: QueryPrompt::new(shared_state.clone()),
            shared_state,
            running: true,
        })
    }

    /// Read a single line of input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, empty on Ctrl-C, `None` on Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlC => Ok(Some(String::new())),
            Signal::CtrlD => Ok(None),
        }
    }

    /// Run until `:quit` or Ctrl-D
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            let Some(line) = self.read_line()? else {
                break;
            };

            match evaluate(&self.shared_state, &line) {
                Evaluation::Nothing => {}
                Evaluation::Print(output) => println!("{output}"),
                Evaluation::Fail(message) => eprintln!("{message}"),
                Evaluation::Quit => self.stop(),
            }
        }

        Ok(())
    }

    pub fn shared_state(&self) -> &SharedState {
        &self.shared_state
    }

    /// Stop the REPL
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Check if REPL is still running
    pub fn is_running(&self) -> bool {
        self.running
    }
}
