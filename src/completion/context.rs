//! Completion context definitions
//!
//! A context is what the grammar position and the open partial boil down to:
//! the category to enumerate and the prefix to filter it with.

/// Which field set a field position enumerates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    /// Start of a clause: prefix operators and non-explicit fields
    Clause,
    /// After a prefix operator: fields only, explicit fields included
    AfterPrefix,
}

/// What kind of completion is needed at the cursor
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionContext {
    /// Complete field names, aliases and relation groups
    Field {
        /// Prefix to filter names
        prefix: String,
        scope: FieldScope,
    },

    /// Complete the comparators of a field's type
    Comparator {
        /// Field text as typed (name, alias or dotted path)
        field: String,
        prefix: String,
    },

    /// Complete known values of a field
    Value {
        field: String,
        /// Comparator symbol the value follows
        comparator: String,
        prefix: String,
    },

    /// Complete `and` / `or`
    Connective { prefix: String },

    /// No completion available
    None,
}

impl CompletionContext {
    pub fn field(prefix: impl Into<String>, scope: FieldScope) -> Self {
        Self::Field {
            prefix: prefix.into(),
            scope,
        }
    }

    pub fn comparator(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Comparator {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    pub fn value(
        field: impl Into<String>,
        comparator: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self::Value {
            field: field.into(),
            comparator: comparator.into(),
            prefix: prefix.into(),
        }
    }

    pub fn connective(prefix: impl Into<String>) -> Self {
        Self::Connective {
            prefix: prefix.into(),
        }
    }

    /// Get the prefix for this context
    pub fn prefix(&self) -> Option<&str> {
        match self {
            Self::Field { prefix, .. }
            | Self::Comparator { prefix, .. }
            | Self::Value { prefix, .. }
            | Self::Connective { prefix } => Some(prefix),
            Self::None => None,
        }
    }

    /// Check if this context requires completion
    pub fn needs_completion(&self) -> bool {
        !matches!(self, Self::None)
    }
}
