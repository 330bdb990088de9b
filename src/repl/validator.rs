//! Validator for reedline - keeps the line open inside a quoted literal

use reedline::{ValidationResult, Validator};

use crate::completion::TokenStream;

/// Line validator for the query shell
///
/// Only completeness is checked here; schema errors are reported after the
/// line is submitted.
#[derive(Debug, Default)]
pub struct LineValidator;

impl LineValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for LineValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        match TokenStream::tokenize(line) {
            Ok(_) => ValidationResult::Complete,
            Err(_) => ValidationResult::Incomplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines() {
        let validator = LineValidator::new();
        assert!(matches!(validator.validate(""), ValidationResult::Complete));
        assert!(matches!(
            validator.validate("string = 'a b' and int > 3"),
            ValidationResult::Complete
        ));
        assert!(matches!(validator.validate(":fields"), ValidationResult::Complete));
    }

    #[test]
    fn test_open_quote_is_incomplete() {
        let validator = LineValidator::new();
        assert!(matches!(
            validator.validate("string = \"a b"),
            ValidationResult::Incomplete
        ));
        assert!(matches!(
            validator.validate("has 'str"),
            ValidationResult::Incomplete
        ));
    }
}
