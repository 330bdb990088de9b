//! JSON formatting for command results
//!
//! Suggestions render as an array of strings, validated queries as their
//! clause list, the registry as its descriptors, and errors as an object with
//! a `kind` and a `message`.

use serde::Serialize;
use serde_json::json;

use crate::error::{Result, SearchlineError};
use crate::query::ValidatedQuery;
use crate::schema::SchemaRegistry;

/// JSON formatter with pretty printing support
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable pretty printing
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    pub fn format_suggestions(&self, suggestions: &[String]) -> Result<String> {
        self.render(suggestions)
    }

    pub fn format_query(&self, query: &ValidatedQuery) -> Result<String> {
        self.render(&json!({
            "query": query.to_string(),
            "clauses": query.clauses,
        }))
    }

    pub fn format_fields(&self, registry: &SchemaRegistry) -> Result<String> {
        self.render(&json!({
            "schema": registry.name(),
            "fields": registry.all_fields(),
        }))
    }

    /// Error object; never fails
    pub fn format_error(&self, error: &SearchlineError) -> String {
        let value = json!({
            "error": error_kind(error),
            "message": error.to_string(),
        });
        self.render(&value).unwrap_or_else(|_| value.to_string())
    }
}

/// Stable machine-readable name of an error
pub fn error_kind(error: &SearchlineError) -> &'static str {
    use crate::error::ValidationError as V;

    match error {
        SearchlineError::Validation(e) => match e {
            V::UnknownField(_) => "unknown_field",
            V::UnsupportedField(_) => "unsupported_field",
            V::UnsupportedOperator { .. } => "unsupported_operator",
            V::MissingValue { .. } => "missing_value",
            V::InvalidValue { .. } => "invalid_value",
            V::UnterminatedLiteral => "unterminated_literal",
        },
        SearchlineError::Schema(_) => "schema",
        SearchlineError::Config(_) => "config",
        SearchlineError::Provider(_) => "provider",
        SearchlineError::Io(_) => "io",
        SearchlineError::Generic(_) => "generic",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::query::QueryValidator;
    use crate::schema::fixtures;
    use serde_json::Value;

    #[test]
    fn test_suggestions_array() {
        let formatter = JsonFormatter::new(false);
        let output = formatter
            .format_suggestions(&[" string ".to_string(), " alias ".to_string()])
            .unwrap();
        assert_eq!(output, r#"[" string "," alias "]"#);
    }

    #[test]
    fn test_query_clauses() {
        let registry = fixtures::foos();
        let query = QueryValidator::new(&registry)
            .validate_str("int > 3 or has alias")
            .unwrap();

        let output = JsonFormatter::new(true).format_query(&query).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["query"], "int > 3 or has another");
        assert_eq!(value["clauses"][0]["kind"], "comparison");
        assert_eq!(value["clauses"][0]["comparator"], ">");
        assert_eq!(value["clauses"][1]["connective"], "or");
        assert_eq!(value["clauses"][2]["operator"], "has");
    }

    #[test]
    fn test_fields() {
        let output = JsonFormatter::new(false)
            .format_fields(&fixtures::foos())
            .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["schema"], "foos");
        assert_eq!(value["fields"].as_array().unwrap().len(), 10);
        assert_eq!(value["fields"][1]["aliases"][0], "alias");
        assert_eq!(value["fields"][4]["field_type"], "integer");
    }

    #[test]
    fn test_error_object() {
        let err = SearchlineError::from(ValidationError::UnknownField("nope".into()));
        let value: Value =
            serde_json::from_str(&JsonFormatter::new(false).format_error(&err)).unwrap();

        assert_eq!(value["error"], "unknown_field");
        assert_eq!(value["message"], "Query error: Field 'nope' not recognized");
    }
}
