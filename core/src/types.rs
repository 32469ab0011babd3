//! Output value tree produced by every show-command parser.
//!
//! Parsed output is a tree of key-ordered mappings that terminates in
//! strings, integers, booleans, or lists of those. Keys are always strings;
//! identifiers discovered at parse time (interface names, VRF names, numeric
//! map ids) are stored in their textual form and the owning
//! [`Schema`](crate::Schema) declares what they must parse as.
//!
//! The tree serializes as plain JSON, so golden fixtures can be stored as
//! `.json` files and loaded straight back into a [`Value`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A mapping level of the output tree.
///
/// `BTreeMap` keeps key order deterministic, so two parses of the same text
/// compare and serialize identically.
pub type Mapping = BTreeMap<String, Value>;

/// A node of the output tree.
///
/// # Examples
///
/// ```
/// use showparse_core::{Mapping, Value};
///
/// let mut intf = Mapping::new();
/// intf.insert("interface".into(), Value::from("GigabitEthernet1/0/9"));
/// intf.insert("max_req".into(), Value::from(2));
///
/// let value = Value::from(intf);
/// assert_eq!(value.get_path(&["max_req"]).and_then(Value::as_int), Some(2));
/// assert_eq!(value.to_string(), r#"{"interface":"GigabitEthernet1/0/9","max_req":2}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(Mapping),
}

impl Value {
    /// Creates an empty mapping node.
    pub fn map() -> Self {
        Value::Map(Mapping::new())
    }

    /// Human-readable name of the node kind, used in schema errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Follows `path` through nested mappings.
    ///
    /// Returns `None` as soon as a segment is missing or a non-mapping node
    /// is reached before the end of the path.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self;
        for segment in path {
            current = current.as_map()?.get(*segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for Value {
    /// Formats the node as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Map(value)
    }
}

/// Nested-mapping navigation helpers for building output trees.
pub trait MappingExt {
    /// Returns the child mapping stored under `key`, inserting an empty one
    /// when the key is absent.
    ///
    /// Returns `None` when `key` already holds a non-mapping value; callers
    /// treat that as a path conflict rather than overwriting the scalar.
    fn child_map(&mut self, key: &str) -> Option<&mut Mapping>;

    /// Walks `path` with [`child_map`](MappingExt::child_map) semantics,
    /// creating every missing level.
    fn descend(&mut self, path: &[String]) -> Option<&mut Mapping>;
}

impl MappingExt for Mapping {
    fn child_map(&mut self, key: &str) -> Option<&mut Mapping> {
        self.entry(key.to_string())
            .or_insert_with(Value::map)
            .as_map_mut()
    }

    fn descend(&mut self, path: &[String]) -> Option<&mut Mapping> {
        let mut current = self;
        for segment in path {
            current = current.child_map(segment)?;
        }
        Some(current)
    }
}
