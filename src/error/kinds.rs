use std::path::PathBuf;
use std::{fmt, io};

/// Crate-wide `Result` type using [`SearchlineError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, SearchlineError>;

/// Top-level error type for searchline operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum SearchlineError {
    /// Query validation failures (user-facing, non-retryable).
    Validation(ValidationError),

    /// Schema construction or loading errors.
    Schema(SchemaError),

    /// Configuration errors.
    Config(ConfigError),

    /// Value provider lookup failures, propagated as-is.
    Provider(ProviderError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Errors raised when a typed query is checked against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The token matches no field name or alias.
    UnknownField(String),

    /// The token matches a field that cannot be used this way.
    UnsupportedField(String),

    /// The comparator is not in the field type's comparator table.
    UnsupportedOperator { field: String, operator: String },

    /// A comparator was typed but no value follows it.
    MissingValue { field: String },

    /// The value does not parse as the field's type.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// A quote was opened and never closed.
    UnterminatedLiteral,
}

/// Schema-specific errors.
#[derive(Debug)]
pub enum SchemaError {
    /// Field declared with an empty name.
    EmptyName,

    /// A name or alias is declared twice.
    DuplicateName(String),

    /// Unrecognised field type in a schema document.
    UnknownType { field: String, type_name: String },

    /// Unrecognised default operator in a schema document.
    UnknownOperator { field: String, operator: String },

    /// Schema file could not be read.
    Unreadable { path: PathBuf, source: io::Error },

    /// Schema file is not valid TOML for the schema format.
    Malformed { path: PathBuf, message: String },

    /// `extends` chain loops back on itself.
    InheritanceCycle(PathBuf),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Generic configuration error.
    Generic(String),
}

/// Failures reported by a value provider.
#[derive(Debug)]
pub enum ProviderError {
    /// Lookup for the field failed.
    LookupFailed { field: String, message: String },
}

/* ========================= Display implementations ========================= */

impl fmt::Display for SearchlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchlineError::Validation(e) => write!(f, "Query error: {e}"),
            SearchlineError::Schema(e) => write!(f, "Schema error: {e}"),
            SearchlineError::Config(e) => write!(f, "Configuration error: {e}"),
            SearchlineError::Provider(e) => write!(f, "Value provider error: {e}"),
            SearchlineError::Io(e) => write!(f, "I/O error: {e}"),
            SearchlineError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownField(name) => write!(f, "Field '{name}' not recognized"),
            ValidationError::UnsupportedField(name) => {
                write!(f, "Field '{name}' cannot be used in this query")
            }
            ValidationError::UnsupportedOperator { field, operator } => {
                write!(f, "Operator '{operator}' is not supported for field '{field}'")
            }
            ValidationError::MissingValue { field } => {
                write!(f, "Missing value for field '{field}'")
            }
            ValidationError::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "Value '{value}' is not a valid {expected} for field '{field}'"
            ),
            ValidationError::UnterminatedLiteral => write!(f, "Unterminated quoted value"),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptyName => write!(f, "Field name must not be empty"),
            SchemaError::DuplicateName(name) => {
                write!(f, "Name '{name}' is declared more than once")
            }
            SchemaError::UnknownType { field, type_name } => {
                write!(f, "Unknown type '{type_name}' for field '{field}'")
            }
            SchemaError::UnknownOperator { field, operator } => {
                write!(f, "Unknown default operator '{operator}' for field '{field}'")
            }
            SchemaError::Unreadable { path, source } => {
                write!(f, "Cannot read {}: {source}", path.display())
            }
            SchemaError::Malformed { path, message } => {
                write!(f, "Invalid schema file {}: {message}", path.display())
            }
            SchemaError::InheritanceCycle(path) => {
                write!(f, "Schema {} extends itself", path.display())
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing config field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for config field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::LookupFailed { field, message } => {
                write!(f, "Cannot list values of '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for SearchlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchlineError::Io(e) => Some(e),
            SearchlineError::Schema(SchemaError::Unreadable { source, .. }) => Some(source),
            _ => None,
        }
    }
}
impl std::error::Error for ValidationError {}
impl std::error::Error for SchemaError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ProviderError {}

impl SearchlineError {
    /// Validation error carried by this error, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            SearchlineError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/* ========================= Conversions to SearchlineError ========================= */

impl From<io::Error> for SearchlineError {
    fn from(err: io::Error) -> Self {
        SearchlineError::Io(err)
    }
}

impl From<ValidationError> for SearchlineError {
    fn from(err: ValidationError) -> Self {
        SearchlineError::Validation(err)
    }
}

impl From<SchemaError> for SearchlineError {
    fn from(err: SchemaError) -> Self {
        SearchlineError::Schema(err)
    }
}

impl From<ConfigError> for SearchlineError {
    fn from(err: ConfigError) -> Self {
        SearchlineError::Config(err)
    }
}

impl From<ProviderError> for SearchlineError {
    fn from(err: ProviderError) -> Self {
        SearchlineError::Provider(err)
    }
}

impl From<String> for SearchlineError {
    fn from(msg: String) -> Self {
        SearchlineError::Generic(msg)
    }
}

impl From<&str> for SearchlineError {
    fn from(msg: &str) -> Self {
        SearchlineError::Generic(msg.to_owned())
    }
}

impl From<serde_json::Error> for SearchlineError {
    fn from(err: serde_json::Error) -> Self {
        SearchlineError::Generic(format!("JSON error: {err}"))
    }
}

impl From<reedline::ReedlineError> for SearchlineError {
    fn from(err: reedline::ReedlineError) -> Self {
        SearchlineError::Generic(format!("Line editor error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = SearchlineError::from(ValidationError::UnknownField("unknown".to_string()));
        assert_eq!(err.to_string(), "Query error: Field 'unknown' not recognized");
    }

    #[test]
    fn test_as_validation() {
        let err = SearchlineError::from(ValidationError::UnsupportedField("deprecated".into()));
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::UnsupportedField("deprecated".into()))
        );
        assert!(SearchlineError::from("boom").as_validation().is_none());
    }

    #[test]
    fn test_operator_display() {
        let err = ValidationError::UnsupportedOperator {
            field: "date".into(),
            operator: "~".into(),
        };
        assert_eq!(
            err.to_string(),
            "Operator '~' is not supported for field 'date'"
        );
    }
}
