//! Output formatting for searchline
//!
//! This module renders command results for the terminal or for scripts:
//! - Plain text, optionally colorized
//! - JSON (pretty-printed)
//!
//! Results are completion suggestions, validated queries, the field registry
//! and errors.

mod colorizer;
mod json;

pub use colorizer::Colorizer;
pub use json::{JsonFormatter, error_kind};

use crate::config::{DisplayConfig, OutputFormat};
use crate::error::{Result, SearchlineError};
use crate::query::{Clause, ValidatedQuery, quote_if_needed};
use crate::schema::{FieldDescriptor, SchemaRegistry};

/// Main formatter for command results
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Colorizer for plain output
    colorizer: Colorizer,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            colorizer: Colorizer::new(use_colors),
        }
    }

    /// Create a formatter from display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format, config.color_output)
    }

    pub fn format_type(&self) -> OutputFormat {
        self.format_type
    }

    fn json(&self) -> JsonFormatter {
        JsonFormatter::new(true)
    }

    /// Format completion suggestions
    ///
    /// Plain output has one debug-quoted suggestion per line, so leading and
    /// trailing spaces stay visible.
    pub fn format_suggestions(&self, suggestions: &[String]) -> Result<String> {
        match self.format_type {
            OutputFormat::Json => self.json().format_suggestions(suggestions),
            OutputFormat::Plain => Ok(suggestions
                .iter()
                .map(|s| format!("{s:?}"))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a validated query
    pub fn format_query(&self, query: &ValidatedQuery) -> Result<String> {
        match self.format_type {
            OutputFormat::Json => self.json().format_query(query),
            OutputFormat::Plain => Ok(query
                .clauses
                .iter()
                .map(|clause| self.paint_clause(clause))
                .collect::<Vec<_>>()
                .join(" ")),
        }
    }

    /// Format the field registry
    pub fn format_fields(&self, registry: &SchemaRegistry) -> Result<String> {
        match self.format_type {
            OutputFormat::Json => self.json().format_fields(registry),
            OutputFormat::Plain => Ok(self.fields_table(registry)),
        }
    }

    /// Format an error
    pub fn format_error(&self, error: &SearchlineError) -> String {
        match self.format_type {
            OutputFormat::Json => self.json().format_error(error),
            OutputFormat::Plain => self.colorizer.error(&error.to_string()),
        }
    }

    fn paint_clause(&self, clause: &Clause) -> String {
        let c = &self.colorizer;
        match clause {
            Clause::Comparison {
                field,
                comparator,
                value,
            } => format!(
                "{} {} {}",
                c.field(field),
                c.operator(comparator.symbol()),
                c.value(&quote_if_needed(value))
            ),
            Clause::Presence { operator, field } => {
                format!("{} {}", c.operator(operator.keyword()), c.field(field))
            }
            Clause::FreeText { text } => c.value(&quote_if_needed(text)),
            Clause::Logical { connective } => c.operator(connective.keyword()),
        }
    }

    fn fields_table(&self, registry: &SchemaRegistry) -> String {
        let fields = registry.all_fields();
        let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);

        let mut lines = Vec::with_capacity(fields.len() + 1);
        lines.push(format!(
            "{} ({} fields)",
            self.colorizer.success(registry.name()),
            fields.len()
        ));

        for field in fields {
            let mut line = format!(
                "  {}  {:<8}",
                self.colorizer.field(&format!("{:<width$}", field.name)),
                field.field_type.as_str()
            );
            if !field.aliases.is_empty() {
                line.push_str(&format!("  aliases: {}", field.aliases.join(", ")));
            }
            let flags = field_flags(field);
            if !flags.is_empty() {
                line.push_str(&format!("  {}", self.colorizer.dim(&flags.join(" "))));
            }
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

fn field_flags(field: &FieldDescriptor) -> Vec<String> {
    let mut flags = Vec::new();
    if field.explicit_only {
        flags.push("[explicit]".to_string());
    }
    if !field.completion_enabled {
        flags.push("[disabled]".to_string());
    }
    if field.value_completion {
        flags.push("[values]".to_string());
    }
    if let Some(op) = field.default_operator {
        flags.push(format!("[default {op}]"));
    }
    flags
}
