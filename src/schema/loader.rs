//! Schema file loading
//!
//! Schema files are TOML documents holding an already materialised list of
//! field descriptors:
//!
//! ```toml
//! name = "foos"
//! extends = "base.toml"
//!
//! [[fields]]
//! name = "another"
//! type = "string"
//! aliases = ["alias"]
//!
//! [[fields]]
//! name = "related"
//! type = "string"
//! relation = "bars"          # registered as `bars.related`
//!
//! [[fields]]
//! name = "explicit"
//! type = "string"
//! explicit_only = true
//! complete_value = true
//! values = ["baz"]
//! ```
//!
//! A field redeclared over an `extends` base keeps the base's known values
//! unless it declares `values` itself; `values = []` clears them.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{Comparator, FieldDescriptor, FieldType, SchemaBuilder, SchemaRegistry};
use crate::error::SchemaError;

/// Known values per field (canonical name), as declared in a schema file
pub type KnownValues = BTreeMap<String, BTreeSet<String>>;

/// Result of loading a schema file
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub registry: SchemaRegistry,
    pub values: KnownValues,
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    name: Option<String>,
    extends: Option<PathBuf>,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type", default = "default_type")]
    field_type: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    explicit_only: bool,
    #[serde(default = "default_true")]
    complete_enabled: bool,
    #[serde(default)]
    complete_value: bool,
    default_operator: Option<String>,
    relation: Option<String>,
    values: Option<Vec<String>>,
}

fn default_type() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}

impl FieldEntry {
    fn into_descriptor(self) -> Result<(FieldDescriptor, Option<BTreeSet<String>>), SchemaError> {
        let field_type: FieldType =
            self.field_type
                .parse()
                .map_err(|type_name| SchemaError::UnknownType {
                    field: self.name.clone(),
                    type_name,
                })?;

        let default_operator = self
            .default_operator
            .as_deref()
            .map(|symbol| {
                Comparator::from_symbol(symbol).ok_or_else(|| SchemaError::UnknownOperator {
                    field: self.name.clone(),
                    operator: symbol.to_string(),
                })
            })
            .transpose()?;

        let mut field = match self.relation {
            Some(relation) => FieldDescriptor::related(relation, self.name, field_type),
            None => FieldDescriptor::new(self.name, field_type),
        };
        field.aliases = self.aliases;
        field.explicit_only = self.explicit_only;
        field.completion_enabled = self.complete_enabled;
        field.value_completion = self.complete_value;
        field.default_operator = default_operator;

        let known = self.values.map(|values| values.into_iter().collect());
        Ok((field, known))
    }
}

/// Load a schema file, following `extends` chains
///
/// # Arguments
/// * `path` - Path to the schema TOML file
///
/// # Returns
/// * `Result<LoadedSchema, SchemaError>` - Registry and declared known values
pub fn load_schema(path: &Path) -> Result<LoadedSchema, SchemaError> {
    let mut visiting = Vec::new();
    let (builder, values) = load_document(path, &mut visiting)?;
    let registry = builder.build()?;

    debug!(
        "Loaded schema '{}' with {} fields from {}",
        registry.name(),
        registry.len(),
        path.display()
    );

    Ok(LoadedSchema {
        registry,
        values,
        path: path.to_path_buf(),
    })
}

fn load_document(
    path: &Path,
    visiting: &mut Vec<PathBuf>,
) -> Result<(SchemaBuilder, KnownValues), SchemaError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if visiting.contains(&canonical) {
        return Err(SchemaError::InheritanceCycle(path.to_path_buf()));
    }
    visiting.push(canonical);

    let text = fs::read_to_string(path).map_err(|source| SchemaError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let document: SchemaDocument =
        toml::from_str(&text).map_err(|e| SchemaError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let (mut builder, mut values) = match &document.extends {
        Some(base) => {
            let base_path = path.parent().unwrap_or_else(|| Path::new(".")).join(base);
            load_document(&base_path, visiting)?
        }
        None => (SchemaBuilder::default(), KnownValues::new()),
    };

    let name = document.name.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    builder = builder.name(name);

    for entry in document.fields {
        let (field, known) = entry.into_descriptor()?;
        match known {
            Some(known) if known.is_empty() => {
                values.remove(&field.name);
            }
            Some(known) => {
                values.insert(field.name.clone(), known);
            }
            None => {}
        }
        builder = builder.field(field);
    }

    visiting.pop();
    Ok((builder, values))
}
