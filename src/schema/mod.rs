//! Schema registry for searchable fields
//!
//! The registry is an immutable snapshot of field descriptors keyed by
//! external name and alias. It is built once (from code through
//! [`SchemaBuilder`], or from a schema file through [`loader`]) and then only
//! read. Reloading publishes a whole new snapshot through [`SchemaHandle`].
//!
//! # Examples
//!
//! ```
//! use searchline::schema::{FieldDescriptor, FieldType, SchemaRegistry};
//!
//! let registry = SchemaRegistry::builder("foos")
//!     .field(FieldDescriptor::new("string", FieldType::String))
//!     .field(FieldDescriptor::new("another", FieldType::String).with_alias("alias"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.resolve("alias").unwrap().name, "another");
//! ```

mod field;
pub mod loader;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock};

pub use field::{Comparator, FieldDescriptor, FieldType, Relation};
pub use loader::{LoadedSchema, load_schema};

use crate::error::SchemaError;

/// Fields sharing one relation prefix, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct RelationGroup<'a> {
    pub relation_name: &'a str,
    pub members: Vec<&'a FieldDescriptor>,
}

/// Immutable set of field descriptors
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    name: String,
    fields: Vec<FieldDescriptor>,
    /// Name, alias or dotted relation path → index into `fields`
    index: HashMap<String, usize>,
    /// Relation name → member indexes, in first-seen order
    groups: Vec<(String, Vec<usize>)>,
}

impl SchemaRegistry {
    /// Start building a registry
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Registry with no fields
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            fields: Vec::new(),
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Start a new builder seeded with this registry's descriptors
    ///
    /// Used to compose one schema from another instead of inheriting.
    pub fn extend(&self, name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: self.fields.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a descriptor by name, alias or dotted relation path
    pub fn resolve(&self, name_or_alias: &str) -> Option<&FieldDescriptor> {
        self.index.get(name_or_alias).map(|&i| &self.fields[i])
    }

    /// All descriptors in declaration order
    pub fn all_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Relation groups in order of first declaration
    pub fn relation_groups(&self) -> Vec<RelationGroup<'_>> {
        self.groups
            .iter()
            .map(|(name, members)| RelationGroup {
                relation_name: name,
                members: members.iter().map(|&i| &self.fields[i]).collect(),
            })
            .collect()
    }

    /// A single relation group by name
    pub fn relation_group(&self, relation_name: &str) -> Option<RelationGroup<'_>> {
        self.relation_groups()
            .into_iter()
            .find(|g| g.relation_name == relation_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builder collecting descriptors before indexing them
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a descriptor
    ///
    /// A descriptor with the same name as an existing one replaces it in place.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn fields<I>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        fields.into_iter().fold(self, SchemaBuilder::field)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Index the descriptors
    ///
    /// A relation member is renamed to its dotted path, the name completion
    /// advertises and expands it under.
    ///
    /// # Returns
    /// * `Result<SchemaRegistry, SchemaError>` - Fails on empty or duplicate names
    pub fn build(mut self) -> Result<SchemaRegistry, SchemaError> {
        let mut index = HashMap::new();
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

        for field in &mut self.fields {
            if let Some(relation) = &field.relation {
                field.name = relation.path();
            }
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyName);
            }

            let mut keys: Vec<String> = std::iter::once(field.name.clone())
                .chain(field.aliases.iter().cloned())
                .collect();

            if let Some(relation) = &field.relation {
                match groups
                    .iter_mut()
                    .find(|(name, _)| *name == relation.relation_name)
                {
                    Some((_, members)) => members.push(i),
                    None => groups.push((relation.relation_name.clone(), vec![i])),
                }
            }

            for key in keys {
                match index.entry(key) {
                    Entry::Occupied(e) => return Err(SchemaError::DuplicateName(e.key().clone())),
                    Entry::Vacant(e) => {
                        e.insert(i);
                    }
                }
            }
        }

        Ok(SchemaRegistry {
            name: self.name,
            fields: self.fields,
            index,
            groups,
        })
    }
}

/// Shared reference to the current registry snapshot
///
/// Readers take a snapshot once per call; reloads swap the whole `Arc`, so a
/// call in flight never observes a half-updated schema.
#[derive(Debug, Clone)]
pub struct SchemaHandle {
    current: Arc<RwLock<Arc<SchemaRegistry>>>,
}

impl SchemaHandle {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Current registry snapshot
    pub fn snapshot(&self) -> Arc<SchemaRegistry> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the registry, returning the previous snapshot
    pub fn publish(&self, registry: SchemaRegistry) -> Arc<SchemaRegistry> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(registry))
    }
}

impl From<SchemaRegistry> for SchemaHandle {
    fn from(registry: SchemaRegistry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Registry used across the crate's tests
    pub fn foos() -> SchemaRegistry {
        SchemaRegistry::builder("foos")
            .field(FieldDescriptor::new("string", FieldType::String))
            .field(
                FieldDescriptor::new("another", FieldType::String)
                    .with_alias("alias")
                    .with_default_operator(Comparator::Eq),
            )
            .field(
                FieldDescriptor::new("explicit", FieldType::String)
                    .explicit_only()
                    .complete_values(),
            )
            .field(FieldDescriptor::new("deprecated", FieldType::String).completion_disabled())
            .field(FieldDescriptor::new("int", FieldType::Integer))
            .field(FieldDescriptor::new("date", FieldType::Datetime))
            .field(FieldDescriptor::related("bars", "related", FieldType::String))
            .field(FieldDescriptor::related("bars", "other_a", FieldType::String))
            .field(FieldDescriptor::related("bars", "other_b", FieldType::String))
            .field(FieldDescriptor::related("bars", "other_c", FieldType::String))
            .build()
            .expect("fixture schema is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_name_and_alias() {
        let registry = fixtures::foos();

        assert_eq!(registry.resolve("string").unwrap().field_type, FieldType::String);
        assert_eq!(registry.resolve("alias").unwrap().name, "another");
        assert_eq!(registry.resolve("another").unwrap().name, "another");
        assert_eq!(registry.resolve("bars.related").unwrap().name, "bars.related");
        assert!(registry.resolve("unindexed").is_none());
        assert!(registry.resolve("String").is_none());
    }

    #[test]
    fn test_relation_groups() {
        let registry = fixtures::foos();
        let groups = registry.relation_groups();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].relation_name, "bars");
        let names: Vec<&str> = groups[0].members.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["bars.related", "bars.other_a", "bars.other_b", "bars.other_c"]
        );
        assert!(registry.relation_group("foos").is_none());
    }

    #[test]
    fn test_relation_member_renamed_to_path() {
        let mut related = FieldDescriptor::new("related", FieldType::String);
        related.relation = Some(Relation {
            relation_name: "bars".into(),
            remote_field_name: "related".into(),
        });

        let registry = SchemaRegistry::builder("foos").field(related).build().unwrap();

        assert_eq!(registry.all_fields()[0].name, "bars.related");
        assert_eq!(registry.resolve("bars.related").unwrap().name, "bars.related");
        assert!(registry.resolve("related").is_none());
        assert_eq!(registry.relation_group("bars").unwrap().members.len(), 1);
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let result = SchemaRegistry::builder("dup")
            .field(FieldDescriptor::new("a", FieldType::String))
            .field(FieldDescriptor::new("b", FieldType::String).with_alias("a"))
            .build();

        assert!(matches!(result, Err(SchemaError::DuplicateName(name)) if name == "a"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = SchemaRegistry::builder("bad")
            .field(FieldDescriptor::new(" ", FieldType::String))
            .build();
        assert!(matches!(result, Err(SchemaError::EmptyName)));
    }

    #[test]
    fn test_redeclared_field_replaces_in_place() {
        let registry = SchemaRegistry::builder("s")
            .field(FieldDescriptor::new("a", FieldType::String))
            .field(FieldDescriptor::new("b", FieldType::String))
            .field(FieldDescriptor::new("a", FieldType::Integer))
            .build()
            .unwrap();

        let names: Vec<&str> = registry.all_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(registry.resolve("a").unwrap().field_type, FieldType::Integer);
    }

    #[test]
    fn test_extend_composes_base() {
        let base = fixtures::foos();
        let derived = base
            .extend("infoos")
            .field(FieldDescriptor::new("extra", FieldType::Boolean))
            .build()
            .unwrap();

        assert_eq!(derived.name(), "infoos");
        assert_eq!(derived.len(), base.len() + 1);
        assert!(derived.resolve("alias").is_some());
    }

    #[test]
    fn test_handle_publish_swaps_snapshot() {
        let handle = SchemaHandle::new(fixtures::foos());
        let before = handle.snapshot();

        let previous = handle.publish(SchemaRegistry::empty());

        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.len(), 10);
        assert!(handle.snapshot().is_empty());
    }
}
