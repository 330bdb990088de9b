//! Candidate enumeration and relation grouping
//!
//! Expands a [`CompletionContext`] into raw candidates, in grammar order:
//! fields (declaration order) then prefix operators, comparators in table
//! order, known values sorted, connectives `and` then `or`. Filtering is a
//! case-sensitive prefix match against the open partial.

use tracing::debug;

use super::context::{CompletionContext, FieldScope};
use super::fsm::{Connective, PrefixOperator};
use super::provider::ValueProvider;
use crate::error::Result;
use crate::schema::{Comparator, FieldDescriptor, SchemaRegistry};

/// A raw completion candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    /// Rendered with a trailing space; false for a collapsed relation group
    pub terminal: bool,
    /// Descriptor the candidate names, for field candidates
    field: Option<String>,
}

impl Candidate {
    pub fn terminal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            terminal: true,
            field: None,
        }
    }

    fn field(text: &str, descriptor: &FieldDescriptor) -> Self {
        Self {
            text: text.to_string(),
            terminal: true,
            field: Some(descriptor.name.clone()),
        }
    }

    fn group(relation_name: &str) -> Self {
        Self {
            text: format!("{relation_name}."),
            terminal: false,
            field: None,
        }
    }
}

/// Enumerates candidates against one registry snapshot
pub struct CandidateEnumerator<'a> {
    registry: &'a SchemaRegistry,
    provider: &'a dyn ValueProvider,
    /// Grouping applies when more candidates than this would be listed
    group_threshold: usize,
}

impl<'a> CandidateEnumerator<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        provider: &'a dyn ValueProvider,
        group_threshold: usize,
    ) -> Self {
        Self {
            registry,
            provider,
            group_threshold,
        }
    }

    /// Candidates for `context`
    ///
    /// # Returns
    /// * `Result<Vec<Candidate>>` - Fails only when the value provider fails
    pub fn enumerate(&self, context: &CompletionContext) -> Result<Vec<Candidate>> {
        let candidates = match context {
            CompletionContext::Field { prefix, scope } => self.fields(prefix, *scope),
            CompletionContext::Comparator { field, prefix } => self.comparators(field, prefix),
            CompletionContext::Value {
                field,
                comparator,
                prefix,
            } => self.values(field, comparator, prefix)?,
            CompletionContext::Connective { prefix } => Connective::ALL
                .iter()
                .map(|c| c.keyword())
                .filter(|k| k.starts_with(prefix.as_str()))
                .map(Candidate::terminal)
                .collect(),
            CompletionContext::None => Vec::new(),
        };

        debug!("{} candidates for {:?}", candidates.len(), context);
        Ok(candidates)
    }

    /// Field names, aliases and prefix operators, grouped by relation
    fn fields(&self, prefix: &str, scope: FieldScope) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for field in self.registry.all_fields() {
            if !field.completion_enabled {
                continue;
            }
            for name in field.advertised_names() {
                if !name.starts_with(prefix) {
                    continue;
                }
                // Outside a prefix operator, explicit fields must be typed in full
                if field.explicit_only && scope == FieldScope::Clause && name != prefix {
                    continue;
                }
                candidates.push(Candidate::field(name, field));
            }
        }

        if scope == FieldScope::Clause {
            candidates.extend(
                PrefixOperator::ALL
                    .iter()
                    .map(|op| op.keyword())
                    .filter(|k| k.starts_with(prefix))
                    .map(Candidate::terminal),
            );
        }

        self.group(candidates, prefix, scope)
    }

    /// Collapse every fully listed relation group into `relation.`
    fn group(&self, mut candidates: Vec<Candidate>, prefix: &str, scope: FieldScope) -> Vec<Candidate> {
        if candidates.len() <= self.group_threshold {
            return candidates;
        }

        for group in self.registry.relation_groups() {
            let dotted = format!("{}.", group.relation_name);
            if prefix.starts_with(&dotted) {
                continue;
            }

            let eligible: Vec<&str> = group
                .members
                .iter()
                .filter(|f| f.completion_enabled)
                .filter(|f| scope == FieldScope::AfterPrefix || !f.explicit_only)
                .map(|f| f.name.as_str())
                .collect();

            let listed = |name: &str| {
                candidates
                    .iter()
                    .any(|c| c.field.as_deref() == Some(name))
            };
            if eligible.is_empty() || !eligible.iter().all(|name| listed(name)) {
                continue;
            }

            let Some(first) = candidates
                .iter()
                .position(|c| c.field.as_deref().is_some_and(|f| eligible.contains(&f)))
            else {
                continue;
            };

            candidates[first] = Candidate::group(group.relation_name);
            candidates.retain(|c| !c.field.as_deref().is_some_and(|f| eligible.contains(&f)));
            debug!("Collapsed relation group '{}'", group.relation_name);
        }

        candidates
    }

    fn comparators(&self, field: &str, prefix: &str) -> Vec<Candidate> {
        let Some(descriptor) = self.registry.resolve(field) else {
            return Vec::new();
        };
        if !descriptor.completion_enabled {
            return Vec::new();
        }

        descriptor
            .field_type
            .comparators()
            .iter()
            .map(|c| c.symbol())
            .filter(|s| s.starts_with(prefix))
            .map(Candidate::terminal)
            .collect()
    }

    /// Known values, only after a comparator the field's type supports
    fn values(&self, field: &str, comparator: &str, prefix: &str) -> Result<Vec<Candidate>> {
        let Some(descriptor) = self.registry.resolve(field) else {
            return Ok(Vec::new());
        };
        if !descriptor.completion_enabled || !descriptor.value_completion {
            return Ok(Vec::new());
        }
        let supported = Comparator::from_symbol(comparator)
            .is_some_and(|c| descriptor.field_type.supports(c));
        if !supported {
            return Ok(Vec::new());
        }

        let values = self.provider.known_values(descriptor)?;

        Ok(values
            .into_iter()
            .filter(|v| v.starts_with(prefix))
            .map(|v| {
                if v.chars().any(char::is_whitespace) {
                    Candidate::terminal(format!("\"{v}\""))
                } else {
                    Candidate::terminal(v)
                }
            })
            .collect())
    }
}
