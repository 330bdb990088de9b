//! Error handling module for searchline.
//!
//! Errors are grouped by the layer that raises them:
//! - Validation errors for typed queries (unknown or unsupported fields)
//! - Schema errors raised while building or loading the field registry
//! - Configuration errors
//! - Value provider errors, which are propagated unchanged
//!
//! # Example
//!
//! ```rust
//! use searchline::error::{Result, SearchlineError, ValidationError};
//!
//! fn check(name: &str) -> Result<()> {
//!     Err(ValidationError::UnknownField(name.to_string()).into())
//! }
//!
//! assert!(matches!(check("nope"), Err(SearchlineError::Validation(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ProviderError, Result, SchemaError, SearchlineError, ValidationError,
};
