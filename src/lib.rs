//! Searchline Library
//!
//! Grammar-aware autocompletion for a textual search-query language of the
//! form `field comparator value`, joined by `and` / `or`, with prefix
//! operators (`has`, `not`, `null?`, `set?`) and quoted literals.
//!
//! # Modules
//!
//! - `schema`: Field descriptors, the schema registry and schema files
//! - `completion`: Tokenizer, grammar state machine and completion engine
//! - `query`: Strict validation of typed queries into clauses
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Plain and JSON output
//! - `repl`: Interactive query shell
//! - `cli`: Command-line interface and argument parsing
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use searchline::completion::{CompletionEngine, NoValueProvider};
//! use searchline::schema::{FieldDescriptor, FieldType, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builder("foos")
//!     .field(FieldDescriptor::new("string", FieldType::String))
//!     .field(FieldDescriptor::new("int", FieldType::Integer))
//!     .build()?;
//! let engine = CompletionEngine::new(registry, Arc::new(NoValueProvider));
//!
//! assert_eq!(engine.complete("str")?, [" string "]);
//! assert_eq!(engine.complete("string ~ fo ")?, ["string ~ fo  and ", "string ~ fo  or "]);
//! # Ok::<(), searchline::SearchlineError>(())
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod query;
pub mod repl;
pub mod schema;

// Re-export commonly used types
pub use completion::{CompletionEngine, ValueProvider};
pub use config::Config;
pub use error::{Result, SearchlineError};
pub use formatter::Formatter;
pub use query::{Clause, ValidatedQuery};
pub use repl::{ReplEngine, SharedState};
pub use schema::{FieldDescriptor, FieldType, SchemaRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
