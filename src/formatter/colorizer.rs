//! Color output support for terminal formatting
//!
//! Styles are applied with `nu_ansi_term` and can be switched off as a whole,
//! e.g. for `--no-color` or when output is piped.

use nu_ansi_term::{Color, Style};

/// Color scheme for output highlighting
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    /// Enable colors
    enabled: bool,
}

impl Colorizer {
    /// Create a new colorizer
    ///
    /// # Arguments
    /// * `enabled` - Enable color output
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Colorize text as success (green)
    pub fn success(&self, text: &str) -> String {
        self.paint(Color::Green.normal(), text)
    }

    /// Colorize text as error (red), with an `Error: ` prefix
    pub fn error(&self, text: &str) -> String {
        self.paint(Color::Red.normal(), &format!("Error: {text}"))
    }

    /// Field names
    pub fn field(&self, text: &str) -> String {
        self.paint(Color::Cyan.bold(), text)
    }

    /// Comparators, connectives and prefix operators
    pub fn operator(&self, text: &str) -> String {
        self.paint(Color::Yellow.normal(), text)
    }

    /// Literal values
    pub fn value(&self, text: &str) -> String {
        self.paint(Color::Green.normal(), text)
    }

    /// De-emphasised detail such as type names and flags
    pub fn dim(&self, text: &str) -> String {
        self.paint(Style::new().dimmed(), text)
    }
}

impl Default for Colorizer {
    fn default() -> Self {
        Self::new(true)
    }
}
