//! Completion engine - orchestrates the completion flow
//!
//! This module ties the completion components together: tokenizing, grammar
//! replay, context determination, candidate enumeration and formatting.

use std::sync::Arc;

use tracing::{debug, trace};

use super::candidates::CandidateEnumerator;
use super::fsm::QueryPosition;
use super::provider::ValueProvider;
use super::render::render_suggestions;
use super::token_stream::{TokenStream, is_quote};
use crate::error::Result;
use crate::query::{QueryValidator, ValidatedQuery};
use crate::schema::{FieldDescriptor, SchemaHandle, SchemaRegistry};

/// Relation groups collapse when more candidates than this would be listed
pub const DEFAULT_GROUP_THRESHOLD: usize = 10;

/// Tunables for the completion engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOptions {
    pub group_threshold: usize,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            group_threshold: DEFAULT_GROUP_THRESHOLD,
        }
    }
}

/// Main completion engine
///
/// Each call takes one registry snapshot and is a pure function of it and the
/// input, apart from the value provider lookup.
pub struct CompletionEngine {
    schema: SchemaHandle,
    /// Source of known values for value-completable fields
    provider: Arc<dyn ValueProvider>,
    options: CompletionOptions,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `schema` - Registry, or a handle shared with whoever reloads it
    /// * `provider` - Value provider for known-value completion
    pub fn new(schema: impl Into<SchemaHandle>, provider: Arc<dyn ValueProvider>) -> Self {
        Self {
            schema: schema.into(),
            provider,
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &SchemaHandle {
        &self.schema
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    /// Complete a partially typed query
    ///
    /// Each suggestion is the whole input with the open partial replaced.
    /// Input containing a quote character, closed or not, gets no suggestions.
    ///
    /// # Returns
    /// * `Result<Vec<String>>` - Suggestions in grammar order; fails only when
    ///   the value provider fails
    pub fn complete(&self, input: &str) -> Result<Vec<String>> {
        let Some(stream) = completable(input) else {
            return Ok(Vec::new());
        };

        let registry = self.schema.snapshot();
        self.complete_stream(&registry, &stream)
    }

    /// Like [`complete`](Self::complete), but first checks the fields and
    /// comparators already typed
    ///
    /// # Returns
    /// * `Result<Vec<String>>` - `UnknownField` / `UnsupportedField` /
    ///   `UnsupportedOperator` for the closed part of the input
    pub fn complete_checked(&self, input: &str) -> Result<Vec<String>> {
        let Some(stream) = completable(input) else {
            return Ok(Vec::new());
        };

        let registry = self.schema.snapshot();
        QueryValidator::new(&registry)
            .fields_only()
            .validate(stream.closed_tokens())?;

        self.complete_stream(&registry, &stream)
    }

    fn complete_stream(&self, registry: &SchemaRegistry, stream: &TokenStream) -> Result<Vec<String>> {
        trace!("Tokens: {:?}", stream.tokens);

        let replay = QueryPosition::run(stream.closed_tokens());
        let context = replay.context(stream.open_partial());
        debug!("Position {:?}, context {:?}", replay.position, context);

        let candidates =
            CandidateEnumerator::new(registry, self.provider.as_ref(), self.options.group_threshold)
                .enumerate(&context)?;

        Ok(render_suggestions(stream.head(), candidates))
    }

    /// Grammar position at the end of the closed part of `input`
    ///
    /// `None` inside an unterminated literal.
    pub fn position(&self, input: &str) -> Option<QueryPosition> {
        let stream = TokenStream::tokenize(input).ok()?;
        Some(QueryPosition::run(stream.closed_tokens()).position)
    }

    /// Validate a complete query against the current schema
    pub fn validate(&self, input: &str) -> Result<ValidatedQuery> {
        let registry = self.schema.snapshot();
        Ok(QueryValidator::new(&registry).validate_str(input)?)
    }

    /// Check that `name` may be used as a field
    ///
    /// # Returns
    /// * `Result<FieldDescriptor>` - The resolved descriptor, or
    ///   `UnknownField` / `UnsupportedField`
    pub fn validate_field(&self, name: &str) -> Result<FieldDescriptor> {
        let registry = self.schema.snapshot();
        let field = QueryValidator::new(&registry).check_field(name)?;
        Ok(field.clone())
    }
}

/// Token stream for `input`, or `None` when completion is not offered
///
/// Quoted literals are accepted by validation but never completed.
fn completable(input: &str) -> Option<TokenStream<'_>> {
    if input.contains(is_quote) {
        debug!("No completion for {input:?}: quoted literal");
        return None;
    }

    TokenStream::tokenize(input)
        .map_err(|e| debug!("No completion for {input:?}: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::provider::NoValueProvider;
    use crate::error::{SearchlineError, ValidationError};
    use crate::schema::{FieldType, SchemaRegistry, fixtures};

    fn create_test_engine() -> CompletionEngine {
        CompletionEngine::new(fixtures::foos(), Arc::new(NoValueProvider))
    }

    #[test]
    fn test_complete_field_prefix() {
        let engine = create_test_engine();
        assert_eq!(engine.complete("str").unwrap(), [" string "]);
    }

    #[test]
    fn test_position() {
        let engine = create_test_engine();
        assert_eq!(
            engine.position("string = foo and "),
            Some(QueryPosition::AfterLogicalExpectPrefixOrField)
        );
        assert_eq!(engine.position("string = 'fo"), None);
    }

    #[test]
    fn test_validate_field() {
        let engine = create_test_engine();

        assert_eq!(engine.validate_field("alias").unwrap().name, "another");
        assert!(matches!(
            engine.validate_field("unknown"),
            Err(SearchlineError::Validation(ValidationError::UnknownField(_)))
        ));
        assert!(matches!(
            engine.validate_field("deprecated"),
            Err(SearchlineError::Validation(ValidationError::UnsupportedField(_)))
        ));
    }

    #[test]
    fn test_options() {
        let engine = create_test_engine().with_options(CompletionOptions { group_threshold: 50 });
        assert_eq!(engine.options().group_threshold, 50);
        assert_eq!(engine.complete(" ").unwrap().len(), 12);
    }

    #[test]
    fn test_reload_is_seen_by_next_call() {
        let engine = create_test_engine();

        let replacement = SchemaRegistry::builder("other")
            .field(FieldDescriptor::new("status", FieldType::Set))
            .build()
            .unwrap();
        engine.schema().publish(replacement);

        assert_eq!(engine.complete("st").unwrap(), [" status "]);
        assert_eq!(engine.complete("status ").unwrap(), ["status  = ", "status  != "]);
    }
}
