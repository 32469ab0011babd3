//! Declarative schema contract for parsed show-command output.
//!
//! A [`Schema`] is a tagged tree: a node is either a leaf type constraint,
//! a list of items, a set of fixed literal keys, or an open mapping keyed by
//! an identifier only known at parse time.

/// Type a wildcard key must parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// Any string key (interface names, MAC addresses, VRF names).
    Str,
    /// Keys whose text must parse as a signed integer (sequence numbers,
    /// map ids).
    Int,
}

impl KeyType {
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Str => "string",
            KeyType::Int => "integer",
        }
    }

    /// Returns `true` if `key` is acceptable for this key type.
    pub fn accepts(self, key: &str) -> bool {
        match self {
            KeyType::Str => true,
            KeyType::Int => key.parse::<i64>().is_ok(),
        }
    }
}

/// A literal key declared by a [`Schema::Fields`] node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub required: bool,
    pub schema: Schema,
}

impl Field {
    /// A key that must be present.
    pub fn required(key: &str, schema: Schema) -> Self {
        Self {
            key: key.to_string(),
            required: true,
            schema,
        }
    }

    /// A key that may be absent, but must match `schema` when present.
    pub fn optional(key: &str, schema: Schema) -> Self {
        Self {
            key: key.to_string(),
            required: false,
            schema,
        }
    }
}

/// Expected shape of a node in the output tree.
///
/// # Examples
///
/// ```
/// use showparse_core::{Field, Schema};
///
/// let schema = Schema::fields([
///     Field::optional("system_auth_control", Schema::Bool),
///     Field::optional(
///         "interfaces",
///         Schema::any_key(Schema::fields([
///             Field::required("interface", Schema::Str),
///             Field::optional("max_req", Schema::Int),
///         ])),
///     ),
/// ]);
///
/// assert!(schema.field("interfaces").is_some());
/// assert!(schema.field("version").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Str,
    Int,
    Bool,
    /// A string restricted to an enumerated set of values.
    Choice(Vec<String>),
    /// A list whose items all match the inner schema.
    List(Box<Schema>),
    /// A mapping with a fixed set of literal keys.
    Fields(Vec<Field>),
    /// A mapping keyed by runtime-discovered identifiers.
    AnyKey { key: KeyType, value: Box<Schema> },
}

impl Schema {
    pub fn fields(fields: impl IntoIterator<Item = Field>) -> Self {
        Schema::Fields(fields.into_iter().collect())
    }

    /// Open mapping with string keys.
    pub fn any_key(value: Schema) -> Self {
        Schema::AnyKey {
            key: KeyType::Str,
            value: Box::new(value),
        }
    }

    /// Open mapping whose keys must be integers.
    pub fn any_int_key(value: Schema) -> Self {
        Schema::AnyKey {
            key: KeyType::Int,
            value: Box::new(value),
        }
    }

    pub fn list(item: Schema) -> Self {
        Schema::List(Box::new(item))
    }

    pub fn choice(values: &[&str]) -> Self {
        Schema::Choice(values.iter().map(|v| v.to_string()).collect())
    }

    /// Looks up a literal key on a [`Schema::Fields`] node.
    pub fn field(&self, key: &str) -> Option<&Field> {
        match self {
            Schema::Fields(fields) => fields.iter().find(|f| f.key == key),
            _ => None,
        }
    }

    /// Short name of what this node expects, used in error messages.
    pub fn expected(&self) -> &'static str {
        match self {
            Schema::Str => "string",
            Schema::Int => "integer",
            Schema::Bool => "boolean",
            Schema::Choice(_) => "choice",
            Schema::List(_) => "list",
            Schema::Fields(_) | Schema::AnyKey { .. } => "mapping",
        }
    }
}
