//! Completion system for search queries
//!
//! Given a partially typed query, the engine lists every way to extend it by
//! one grammatical token. The system is built on a small finite state machine
//! that is error-tolerant and works with incomplete input.
//!
//! # Architecture
//!
//! - **TokenStream**: splits input on unquoted whitespace, tracking the open partial
//! - **FSM**: replays closed tokens to find the grammar position
//! - **Context**: what to complete and with which prefix
//! - **Candidates**: expands a context into field names, comparators, values
//!   or connectives, and collapses relation groups
//! - **Render**: turns candidates into replacement strings
//! - **Engine**: orchestrates the entire completion flow
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use searchline::completion::{CompletionEngine, NoValueProvider};
//! use searchline::schema::{FieldDescriptor, FieldType, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builder("products")
//!     .field(FieldDescriptor::new("price", FieldType::Decimal))
//!     .build()
//!     .unwrap();
//! let engine = CompletionEngine::new(registry, Arc::new(NoValueProvider));
//!
//! assert_eq!(engine.complete("pr").unwrap(), [" price "]);
//! assert!(engine.complete("price ").unwrap().contains(&"price  > ".to_string()));
//! ```

mod candidates;
mod context;
mod engine;
mod fsm;
mod provider;
mod render;
mod token_stream;


pub use candidates::{Candidate, CandidateEnumerator};
pub use context::{CompletionContext, FieldScope};
pub use engine::{CompletionEngine, CompletionOptions, DEFAULT_GROUP_THRESHOLD};
pub use fsm::{Connective, PrefixOperator, QueryPosition, Replay, TokenKind, current_position};
pub use provider::{CachedValueProvider, NoValueProvider, StaticValueProvider, ValueProvider};
pub use render::render_suggestions;
pub use token_stream::{LexError, Token, TokenStream, tokenize};
