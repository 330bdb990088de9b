//! Query validator

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

use super::{Clause, ValidatedQuery};
use crate::completion::{Connective, PrefixOperator, QueryPosition, Token, TokenKind, TokenStream};
use crate::error::ValidationError;
use crate::schema::{Comparator, FieldDescriptor, FieldType, SchemaRegistry};

/// Checks typed queries against a registry snapshot
pub struct QueryValidator<'a> {
    registry: &'a SchemaRegistry,
    /// Parse values and require one after every comparator
    check_values: bool,
}

impl<'a> QueryValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            check_values: true,
        }
    }

    /// Check fields and comparators only
    ///
    /// Used on a partially typed query, where the value after the last
    /// comparator may not be there yet.
    pub fn fields_only(mut self) -> Self {
        self.check_values = false;
        self
    }

    /// Validate a whole query string
    pub fn validate_str(&self, input: &str) -> Result<ValidatedQuery, ValidationError> {
        let stream =
            TokenStream::tokenize(input).map_err(|_| ValidationError::UnterminatedLiteral)?;
        self.validate(&stream.tokens)
    }

    /// Validate a token sequence
    ///
    /// # Returns
    /// * `Result<ValidatedQuery, ValidationError>` - Clauses, or the first problem found
    pub fn validate(&self, tokens: &[Token]) -> Result<ValidatedQuery, ValidationError> {
        let kinds = QueryPosition::run(tokens).kinds;
        trace!("Validating {:?}", kinds);

        let mut query = ValidatedQuery::default();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            match kinds[i] {
                TokenKind::LogicalConnective => {
                    if let Some(connective) = Connective::from_token(&token.text) {
                        push_connective(&mut query, connective);
                    }
                    i += 1;
                }
                TokenKind::PrefixOperator if kinds.get(i + 1) == Some(&TokenKind::Field) => {
                    let field = self.check_field(&tokens[i + 1].text)?;
                    if let Some(operator) = PrefixOperator::from_keyword(&token.text) {
                        push_clause(
                            &mut query,
                            Clause::Presence {
                                operator,
                                field: field.name.clone(),
                            },
                        );
                    }
                    i += 2;
                }
                TokenKind::Field if kinds.get(i + 1) == Some(&TokenKind::Comparator) => {
                    i += self.comparison(&mut query, &tokens[i..])?;
                }
                _ => {
                    push_clause(
                        &mut query,
                        Clause::FreeText {
                            text: token.unquoted().to_string(),
                        },
                    );
                    i += 1;
                }
            }
        }

        if matches!(query.clauses.last(), Some(Clause::Logical { .. })) {
            query.clauses.pop();
        }

        Ok(query)
    }

    /// Validate `field comparator [value]`, returning the tokens consumed
    fn comparison(
        &self,
        query: &mut ValidatedQuery,
        tokens: &[Token],
    ) -> Result<usize, ValidationError> {
        let field = self.check_field(&tokens[0].text)?;
        let symbol = tokens[1].text.as_str();
        let comparator = Comparator::from_symbol(symbol)
            .filter(|c| field.field_type.supports(*c))
            .ok_or_else(|| ValidationError::UnsupportedOperator {
                field: field.name.clone(),
                operator: symbol.to_string(),
            })?;

        let Some(value_token) = tokens.get(2) else {
            if self.check_values {
                return Err(ValidationError::MissingValue {
                    field: field.name.clone(),
                });
            }
            return Ok(2);
        };

        let value = value_token.unquoted();
        if self.check_values {
            check_value(field, comparator, value)?;
        }

        push_clause(
            query,
            Clause::Comparison {
                field: field.name.clone(),
                comparator,
                value: value.to_string(),
            },
        );
        Ok(3)
    }

    /// Resolve a field token used as a field
    pub fn check_field(&self, name: &str) -> Result<&'a FieldDescriptor, ValidationError> {
        let field = self
            .registry
            .resolve(name)
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?;

        if !field.completion_enabled {
            return Err(ValidationError::UnsupportedField(name.to_string()));
        }

        Ok(field)
    }
}

fn push_clause(query: &mut ValidatedQuery, clause: Clause) {
    let needs_and = query
        .clauses
        .last()
        .is_some_and(|last| !matches!(last, Clause::Logical { .. }));
    if needs_and {
        query.clauses.push(Clause::Logical {
            connective: Connective::And,
        });
    }
    query.clauses.push(clause);
}

fn push_connective(query: &mut ValidatedQuery, connective: Connective) {
    match query.clauses.last() {
        None | Some(Clause::Logical { .. }) => {}
        Some(_) => query.clauses.push(Clause::Logical { connective }),
    }
}

fn check_value(
    field: &FieldDescriptor,
    comparator: Comparator,
    value: &str,
) -> Result<(), ValidationError> {
    let items: Vec<&str> = if comparator.takes_list() {
        value.split(',').map(str::trim).collect()
    } else {
        vec![value]
    };

    for item in items {
        let valid = match field.field_type {
            FieldType::Integer => item.parse::<i64>().is_ok(),
            FieldType::Decimal => item.parse::<f64>().is_ok(),
            FieldType::Boolean => parse_bool(item).is_some(),
            FieldType::Datetime => parse_datetime(item).is_some(),
            FieldType::String | FieldType::Set => true,
        };

        if !valid {
            return Err(ValidationError::InvalidValue {
                field: field.name.clone(),
                value: item.to_string(),
                expected: field.field_type.to_string(),
            });
        }
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Parse the date and time formats accepted in datetime comparisons
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            ["%Y-%m-%d", "%B %d, %Y"]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures;

    fn validate(input: &str) -> Result<ValidatedQuery, ValidationError> {
        let registry = fixtures::foos();
        QueryValidator::new(&registry).validate_str(input)
    }

    #[test]
    fn test_comparison_resolves_alias() {
        let query = validate("alias = \"temp 1\"").unwrap();
        assert_eq!(
            query.clauses,
            [Clause::Comparison {
                field: "another".into(),
                comparator: Comparator::Eq,
                value: "temp 1".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_and_unsupported_fields() {
        assert_eq!(
            validate("unknown = 10").unwrap_err(),
            ValidationError::UnknownField("unknown".into())
        );
        assert_eq!(
            validate("unindexed = 10").unwrap_err(),
            ValidationError::UnknownField("unindexed".into())
        );
        assert_eq!(
            validate("deprecated = 1").unwrap_err(),
            ValidationError::UnsupportedField("deprecated".into())
        );
        assert_eq!(
            validate("has unknown").unwrap_err(),
            ValidationError::UnknownField("unknown".into())
        );
    }

    #[test]
    fn test_explicit_field_parses_when_typed() {
        let query = validate("explicit = baz and null? explicit").unwrap();
        assert_eq!(query.fields(), ["explicit", "explicit"]);
    }

    #[test]
    fn test_unsupported_operator() {
        assert_eq!(
            validate("date ~ 2011").unwrap_err(),
            ValidationError::UnsupportedOperator {
                field: "date".into(),
                operator: "~".into(),
            }
        );
    }

    #[test]
    fn test_missing_and_invalid_values() {
        assert_eq!(
            validate("int >").unwrap_err(),
            ValidationError::MissingValue { field: "int".into() }
        );
        assert!(matches!(
            validate("int = nine").unwrap_err(),
            ValidationError::InvalidValue { value, .. } if value == "nine"
        ));
        assert!(matches!(
            validate("int ^ 1,x").unwrap_err(),
            ValidationError::InvalidValue { value, .. } if value == "x"
        ));
        assert!(validate("int ^ 1, 2").is_err());
        assert!(validate("int ^ 1,2").is_ok());
    }

    #[test]
    fn test_dates() {
        assert!(validate("date = 2011-02-08").is_ok());
        assert!(validate("date < \"2011-02-08 10:30\"").is_ok());
        assert!(validate("date > 2011-02-08T10:30:00Z").is_ok());
        assert!(validate("date = \"February 8, 2011\"").is_ok());
        assert!(validate("date = yesterday").is_err());
    }

    #[test]
    fn test_free_text_and_implicit_and() {
        let query = validate("or foo 'bar baz' | int = 9 and").unwrap();
        assert_eq!(query.to_string(), "foo and \"bar baz\" or int = 9");
    }

    #[test]
    fn test_unterminated_literal() {
        assert_eq!(
            validate("string = 'abc").unwrap_err(),
            ValidationError::UnterminatedLiteral
        );
    }

    #[test]
    fn test_fields_only_tolerates_dangling_comparator() {
        let registry = fixtures::foos();
        let validator = QueryValidator::new(&registry).fields_only();

        assert!(validator.validate_str("string = ").is_ok());
        assert!(validator.validate_str("int = nine").is_ok());
        assert!(validator.validate_str("unknown = 10").is_err());
    }

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_datetime("February 10, 2011").unwrap();
        assert_eq!(parsed.to_string(), "2011-02-10 00:00:00");
        assert!(parse_datetime("2011-13-01").is_none());
    }
}
