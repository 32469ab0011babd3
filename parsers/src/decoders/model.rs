//! Helpers for structured model (JSON) documents.
//!
//! Model documents follow the usual JSON encoding of YANG data: container
//! names may carry a `module:` prefix, leaf names are hyphenated, and 64-bit
//! counters may arrive as strings.

use serde_json::{Map, Value as Json};
use showparse_core::{Mapping, Value};

use crate::error::{ParseError, Result};

/// Parses `document` and returns its top-level object.
pub fn parse_document(document: &str) -> Result<Map<String, Json>> {
    if document.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(document)? {
        Json::Object(map) => Ok(map),
        other => Err(ParseError::Model(format!(
            "expected a JSON object at the document root, found {}",
            json_kind(&other)
        ))),
    }
}

/// Looks up `name` in `object`, ignoring any module prefix on the key.
pub fn member<'a>(object: &'a Map<String, Json>, name: &str) -> Option<&'a Json> {
    object
        .iter()
        .find(|(key, _)| local_name(key) == name)
        .map(|(_, value)| value)
}

/// Like [`member`], but the member must be an object.
pub fn container<'a>(object: &'a Map<String, Json>, name: &str) -> Result<Option<&'a Map<String, Json>>> {
    match member(object, name) {
        None => Ok(None),
        Some(Json::Object(map)) => Ok(Some(map)),
        Some(other) => Err(ParseError::Model(format!(
            "`{name}` must be an object, found {}",
            json_kind(other)
        ))),
    }
}

/// Output-tree key for a model leaf: prefix dropped, hyphens to underscores.
pub fn field_name(key: &str) -> String {
    local_name(key).replace('-', "_")
}

/// Integer leaf, encoded either as a JSON number or as a decimal string.
pub fn integer(name: &str, value: &Json) -> Result<i64> {
    let parsed = match value {
        Json::Number(number) => number.as_i64(),
        Json::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ParseError::Model(format!("`{name}` must be an integer, found {value}")))
}

/// Converts every leaf of `object` to an integer field of the output tree.
pub fn integer_leaves(object: &Map<String, Json>) -> Result<Mapping> {
    object
        .iter()
        .map(|(key, value)| Ok((field_name(key), Value::from(integer(key, value)?))))
        .collect()
}

fn local_name(key: &str) -> &str {
    key.rsplit_once(':').map_or(key, |(_, local)| local)
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
