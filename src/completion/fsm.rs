//! Grammar state machine for completion position
//!
//! Replays closed tokens left to right and decides which grammatical category
//! comes next. The machine is tolerant: it never rejects input, it only
//! classifies. Unknown field text is assumed to be a field and validation is
//! deferred to [`crate::query`].

use std::fmt;

use serde::Serialize;

use super::context::{CompletionContext, FieldScope};
use super::token_stream::Token;
use crate::schema::Comparator;

/// Unary keyword preceding a field with no comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    #[serde(rename = "has")]
    Has,
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "null?")]
    Null,
    #[serde(rename = "set?")]
    Set,
}

impl PrefixOperator {
    /// Suggestion order
    pub const ALL: [PrefixOperator; 4] = [
        PrefixOperator::Has,
        PrefixOperator::Not,
        PrefixOperator::Null,
        PrefixOperator::Set,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrefixOperator::Has => "has",
            PrefixOperator::Not => "not",
            PrefixOperator::Null => "null?",
            PrefixOperator::Set => "set?",
        }
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == text)
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Binary keyword joining two clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    /// Suggestion order
    pub const ALL: [Connective; 2] = [Connective::And, Connective::Or];

    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }

    /// Parse any accepted spelling (`and`, `&`, `&&`, `or`, `|`, `||`)
    pub fn from_token(text: &str) -> Option<Self> {
        match text {
            "and" | "&" | "&&" => Some(Connective::And),
            "or" | "|" | "||" => Some(Connective::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Grammatical role assigned to a token during replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Field,
    Comparator,
    LogicalConnective,
    PrefixOperator,
    Value,
    LiteralValue,
}

/// Position in the query grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPosition {
    /// Start of input
    ExpectPrefixOrField,
    /// After a field name
    AfterFieldExpectComparator,
    /// After a comparator
    AfterComparatorExpectValue,
    /// After a complete clause
    AfterValueExpectConnective,
    /// After `has`, `not`, `null?` or `set?`
    AfterPrefixExpectField,
    /// After `and` / `or`
    AfterLogicalExpectPrefixOrField,
}

/// Outcome of replaying a token sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Replay<'t> {
    pub position: QueryPosition,
    /// Kind of each replayed token, index-aligned with the input slice
    pub kinds: Vec<TokenKind>,
    /// Field the pending comparator or value applies to
    pub subject: Option<&'t str>,
    /// Comparator the pending value follows
    pub comparator: Option<&'t str>,
}

impl QueryPosition {
    /// Transition on one closed token
    pub fn next(self, token: &Token) -> (Self, TokenKind) {
        use QueryPosition::*;

        let text = token.text.as_str();
        let is_connective = Connective::from_token(text).is_some();
        let is_prefix = PrefixOperator::from_keyword(text).is_some();

        match self {
            // Every token after a comparator is its value
            AfterComparatorExpectValue if token.literal => {
                (AfterValueExpectConnective, TokenKind::LiteralValue)
            }
            AfterComparatorExpectValue => (AfterValueExpectConnective, TokenKind::Value),

            _ if is_connective => (AfterLogicalExpectPrefixOrField, TokenKind::LogicalConnective),
            _ if is_prefix => (AfterPrefixExpectField, TokenKind::PrefixOperator),

            // A closed literal where a field is expected is a free-text term
            _ if token.literal => (AfterValueExpectConnective, TokenKind::LiteralValue),

            AfterFieldExpectComparator if Comparator::from_symbol(text).is_some() => {
                (AfterComparatorExpectValue, TokenKind::Comparator)
            }

            // `has string` is already a complete clause
            AfterPrefixExpectField => (AfterValueExpectConnective, TokenKind::Field),

            // Any other text starts a new clause (implicit conjunction)
            ExpectPrefixOrField
            | AfterLogicalExpectPrefixOrField
            | AfterFieldExpectComparator
            | AfterValueExpectConnective => (AfterFieldExpectComparator, TokenKind::Field),
        }
    }

    /// Replay a sequence of closed tokens from the start state
    pub fn run(tokens: &[Token]) -> Replay<'_> {
        let mut position = QueryPosition::ExpectPrefixOrField;
        let mut kinds = Vec::with_capacity(tokens.len());
        let mut subject = None;
        let mut comparator = None;

        for token in tokens {
            let (next, kind) = position.next(token);
            match kind {
                TokenKind::Field => {
                    subject = Some(token.text.as_str());
                    comparator = None;
                }
                TokenKind::Comparator => comparator = Some(token.text.as_str()),
                TokenKind::LogicalConnective | TokenKind::PrefixOperator => {
                    subject = None;
                    comparator = None;
                }
                // Free-text literal, not a comparator value
                TokenKind::LiteralValue
                    if position != QueryPosition::AfterComparatorExpectValue =>
                {
                    subject = None
                }
                _ => {}
            }
            kinds.push(kind);
            position = next;
        }

        Replay {
            position,
            kinds,
            subject,
            comparator,
        }
    }
}

impl Replay<'_> {
    /// Completion context for the reached position and the open partial
    pub fn context(&self, partial: &str) -> CompletionContext {
        use QueryPosition::*;

        match self.position {
            ExpectPrefixOrField | AfterLogicalExpectPrefixOrField => {
                CompletionContext::field(partial, FieldScope::Clause)
            }
            AfterPrefixExpectField => CompletionContext::field(partial, FieldScope::AfterPrefix),
            AfterFieldExpectComparator => match self.subject {
                Some(field) => CompletionContext::comparator(field, partial),
                None => CompletionContext::None,
            },
            AfterComparatorExpectValue => match (self.subject, self.comparator) {
                (Some(field), Some(comparator)) => {
                    CompletionContext::value(field, comparator, partial)
                }
                _ => CompletionContext::None,
            },
            AfterValueExpectConnective => CompletionContext::connective(partial),
        }
    }
}

/// Grammar position reached after `closed_tokens`
pub fn current_position(closed_tokens: &[Token]) -> QueryPosition {
    QueryPosition::run(closed_tokens).position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::token_stream::TokenStream;

    fn replay(input: &str) -> (QueryPosition, Vec<TokenKind>, Option<String>) {
        let stream = TokenStream::tokenize(input).unwrap();
        let replay = QueryPosition::run(stream.closed_tokens());
        (
            replay.position,
            replay.kinds,
            replay.subject.map(str::to_string),
        )
    }

    #[test]
    fn test_start_state() {
        assert_eq!(current_position(&[]), QueryPosition::ExpectPrefixOrField);
        assert_eq!(replay("str").0, QueryPosition::ExpectPrefixOrField);
    }

    #[test]
    fn test_field_comparator_value_connective() {
        use QueryPosition::*;

        assert_eq!(replay("int ").0, AfterFieldExpectComparator);
        assert_eq!(replay("int = ").0, AfterComparatorExpectValue);
        assert_eq!(replay("int = 9 ").0, AfterValueExpectConnective);
        assert_eq!(replay("int = 9 and ").0, AfterLogicalExpectPrefixOrField);

        let (_, kinds, subject) = replay("int = 9 and ");
        assert_eq!(
            kinds,
            [
                TokenKind::Field,
                TokenKind::Comparator,
                TokenKind::Value,
                TokenKind::LogicalConnective
            ]
        );
        assert_eq!(subject, None);
    }

    #[test]
    fn test_prefix_operator_clause_is_complete() {
        let (position, kinds, subject) = replay("has string ");

        assert_eq!(position, QueryPosition::AfterValueExpectConnective);
        assert_eq!(kinds, [TokenKind::PrefixOperator, TokenKind::Field]);
        assert_eq!(subject.as_deref(), Some("string"));
        assert_eq!(replay("null? ").0, QueryPosition::AfterPrefixExpectField);
    }

    #[test]
    fn test_subject_survives_comparator() {
        let (position, _, subject) = replay("explicit = ");
        assert_eq!(position, QueryPosition::AfterComparatorExpectValue);
        assert_eq!(subject.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_connective_spellings() {
        for spelling in ["and", "or", "&", "&&", "|", "||"] {
            let input = format!("string = a {spelling} ");
            assert_eq!(
                replay(&input).0,
                QueryPosition::AfterLogicalExpectPrefixOrField,
                "{spelling}"
            );
        }
    }

    #[test]
    fn test_leading_connective_tolerated() {
        assert_eq!(replay("or ").0, QueryPosition::AfterLogicalExpectPrefixOrField);
    }

    #[test]
    fn test_implicit_conjunction() {
        let (position, kinds, subject) = replay("this is ");
        assert_eq!(position, QueryPosition::AfterFieldExpectComparator);
        assert_eq!(kinds, [TokenKind::Field, TokenKind::Field]);
        assert_eq!(subject.as_deref(), Some("is"));

        assert_eq!(replay("string = a b ").0, QueryPosition::AfterFieldExpectComparator);
    }

    #[test]
    fn test_literal_values() {
        let (position, kinds, _) = replay("related = \"a b\" ");
        assert_eq!(position, QueryPosition::AfterValueExpectConnective);
        assert_eq!(kinds[2], TokenKind::LiteralValue);

        let (position, kinds, subject) = replay("'free text' ");
        assert_eq!(position, QueryPosition::AfterValueExpectConnective);
        assert_eq!(kinds, [TokenKind::LiteralValue]);
        assert_eq!(subject, None);
    }

    #[test]
    fn test_context() {
        let context = |input: &str| {
            let stream = TokenStream::tokenize(input).unwrap();
            QueryPosition::run(stream.closed_tokens()).context(stream.open_partial())
        };

        assert_eq!(context("st"), CompletionContext::field("st", FieldScope::Clause));
        assert_eq!(context("has "), CompletionContext::field("", FieldScope::AfterPrefix));
        assert_eq!(context("int <"), CompletionContext::comparator("int", "<"));
        assert_eq!(context("int = 4 o"), CompletionContext::connective("o"));
        assert_eq!(
            context("explicit ~ b"),
            CompletionContext::value("explicit", "~", "b")
        );
    }

    #[test]
    fn test_comparator_cleared_by_new_clause() {
        let stream = TokenStream::tokenize("int = 4 and date ").unwrap();
        let replay = QueryPosition::run(stream.closed_tokens());
        assert_eq!(replay.subject, Some("date"));
        assert_eq!(replay.comparator, None);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(PrefixOperator::from_keyword("null?"), Some(PrefixOperator::Null));
        assert_eq!(PrefixOperator::from_keyword("null"), None);
        assert_eq!(Connective::from_token("&&"), Some(Connective::And));
        assert_eq!(Connective::from_token("AND"), None);
    }
}
