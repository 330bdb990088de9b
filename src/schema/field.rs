//! Field descriptors and the type → comparator table

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Type of a searchable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Decimal,
    Datetime,
    Boolean,
    Set,
}

impl FieldType {
    /// Comparators legal for this type, in suggestion order
    pub fn comparators(self) -> &'static [Comparator] {
        use Comparator as C;

        match self {
            FieldType::String => &[C::Eq, C::Ne, C::Like, C::NotLike, C::In, C::NotIn],
            FieldType::Integer | FieldType::Decimal => {
                &[C::Eq, C::Ne, C::Lt, C::Le, C::Gt, C::Ge, C::In, C::NotIn]
            }
            FieldType::Datetime => &[C::Eq, C::Lt, C::Gt],
            FieldType::Boolean | FieldType::Set => &[C::Eq, C::Ne],
        }
    }

    /// Check whether `comparator` may follow a field of this type
    pub fn supports(self, comparator: Comparator) -> bool {
        self.comparators().contains(&comparator)
    }

    /// Lowercase name as used in schema files
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Datetime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Set => "set",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Decimal)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "text" => Ok(FieldType::String),
            "integer" | "int" => Ok(FieldType::Integer),
            "decimal" | "float" | "numeric" => Ok(FieldType::Decimal),
            "datetime" | "date" | "time" | "temporal" => Ok(FieldType::Datetime),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "set" => Ok(FieldType::Set),
            other => Err(other.to_string()),
        }
    }
}

/// Binary operator between a field and a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "~")]
    Like,
    #[serde(rename = "!~")]
    NotLike,
    /// List membership, value is comma separated
    #[serde(rename = "^")]
    In,
    #[serde(rename = "!^")]
    NotIn,
}

impl Comparator {
    pub const ALL: [Comparator; 10] = [
        Comparator::Eq,
        Comparator::Ne,
        Comparator::Lt,
        Comparator::Le,
        Comparator::Gt,
        Comparator::Ge,
        Comparator::Like,
        Comparator::NotLike,
        Comparator::In,
        Comparator::NotIn,
    ];

    /// Symbol as typed in a query
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Like => "~",
            Comparator::NotLike => "!~",
            Comparator::In => "^",
            Comparator::NotIn => "!^",
        }
    }

    /// Parse a typed symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == symbol)
    }

    /// Whether the value is a comma-separated list
    pub fn takes_list(self) -> bool {
        matches!(self, Comparator::In | Comparator::NotIn)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Dotted relation path through which a field is reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    /// Relation prefix, e.g. `bars`
    pub relation_name: String,
    /// Field name on the related entity, e.g. `related`
    pub remote_field_name: String,
}

impl Relation {
    /// Dotted path `relation.remote_field`
    pub fn path(&self) -> String {
        format!("{}.{}", self.relation_name, self.remote_field_name)
    }
}

/// Metadata describing one searchable attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// External name, unique within the schema
    pub name: String,
    pub field_type: FieldType,
    /// Alternate names, all resolving to this descriptor
    pub aliases: Vec<String>,
    /// Excluded from bare-prefix enumeration; must be typed verbatim
    pub explicit_only: bool,
    /// `false` removes the field from every completion list
    pub completion_enabled: bool,
    /// Known distinct values are offered after a comparator
    pub value_completion: bool,
    /// Comparator implied when a query omits it (parsing only)
    pub default_operator: Option<Comparator>,
    pub relation: Option<Relation>,
}

impl FieldDescriptor {
    /// Create a completion-enabled field with no flags set
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            aliases: Vec::new(),
            explicit_only: false,
            completion_enabled: true,
            value_completion: false,
            default_operator: None,
            relation: None,
        }
    }

    /// Create a field reached through `relation.remote_field`
    ///
    /// The external name is the dotted path.
    pub fn related(
        relation: impl Into<String>,
        remote_field: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        let relation = Relation {
            relation_name: relation.into(),
            remote_field_name: remote_field.into(),
        };
        let mut field = Self::new(relation.path(), field_type);
        field.relation = Some(relation);
        field
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn explicit_only(mut self) -> Self {
        self.explicit_only = true;
        self
    }

    pub fn completion_disabled(mut self) -> Self {
        self.completion_enabled = false;
        self
    }

    pub fn complete_values(mut self) -> Self {
        self.value_completion = true;
        self
    }

    pub fn with_default_operator(mut self, comparator: Comparator) -> Self {
        self.default_operator = Some(comparator);
        self
    }

    /// Names offered by completion
    ///
    /// An aliased field is advertised under its aliases; its canonical name
    /// stays resolvable but is not enumerated.
    pub fn advertised_names(&self) -> impl Iterator<Item = &str> {
        let own = self.aliases.is_empty().then_some(self.name.as_str());
        own.into_iter()
            .chain(self.aliases.iter().map(String::as_str))
    }

    /// Relation prefix this field is grouped under, if any
    pub fn relation_name(&self) -> Option<&str> {
        self.relation.as_ref().map(|r| r.relation_name.as_str())
    }
}
