//! Exact-match validation of typed queries
//!
//! Completion is total and never fails on bad input. Validation is the strict
//! counterpart, used before a query is handed to whatever executes it. It
//! replays the same grammar and turns the token sequence into clauses,
//! rejecting fields the schema does not know or does not allow.

mod validator;

use std::fmt;

use serde::Serialize;

pub use validator::{QueryValidator, parse_datetime};

use crate::completion::{Connective, PrefixOperator};
use crate::schema::Comparator;

/// One element of a validated query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clause {
    /// `field comparator value`; `field` is the canonical name
    Comparison {
        field: String,
        comparator: Comparator,
        value: String,
    },
    /// `has field`, `null? field`, ...
    Presence {
        operator: PrefixOperator,
        field: String,
    },
    /// Bare term matched against the default search fields
    FreeText { text: String },
    Logical { connective: Connective },
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Comparison {
                field,
                comparator,
                value,
            } => write!(f, "{field} {comparator} {}", quote_if_needed(value)),
            Clause::Presence { operator, field } => write!(f, "{operator} {field}"),
            Clause::FreeText { text } => write!(f, "{}", quote_if_needed(text)),
            Clause::Logical { connective } => write!(f, "{connective}"),
        }
    }
}

pub(crate) fn quote_if_needed(text: &str) -> String {
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        format!("\"{text}\"")
    } else {
        text.to_string()
    }
}

/// Clauses of a query that passed validation
///
/// Implicit conjunctions are made explicit; leading, trailing and repeated
/// connectives are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedQuery {
    pub clauses: Vec<Clause>,
}

impl ValidatedQuery {
    /// Canonical names of the fields the query references
    pub fn fields(&self) -> Vec<&str> {
        self.clauses
            .iter()
            .filter_map(|clause| match clause {
                Clause::Comparison { field, .. } | Clause::Presence { field, .. } => {
                    Some(field.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}
