//! Structural validation of output trees against their schema.
//!
//! Validation is total: every node of the candidate must be covered by the
//! schema, every required key must be present, and every leaf must carry the
//! declared type. Errors name the offending path (`$.interfaces.Gi1.pae`).
//!
//! # Examples
//!
//! ```
//! use showparse_core::*;
//!
//! let schema = Schema::fields([Field::required("total", Schema::Int)]);
//!
//! let mut ok = Mapping::new();
//! ok.insert("total".into(), Value::from(3));
//! assert!(validate(&schema, &Value::from(ok)).is_ok());
//!
//! let mut bad = Mapping::new();
//! bad.insert("total".into(), Value::from("three"));
//! let err = validate(&schema, &Value::from(bad)).unwrap_err();
//! assert!(matches!(err, SchemaError::TypeMismatch { .. }));
//! ```

use thiserror::Error;

use crate::{Schema, Value};

/// A single way in which a candidate tree violates its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A required literal key is absent.
    #[error("missing required key `{key}` at {path}")]
    MissingKey { path: String, key: String },
    /// The candidate carries a key the schema does not declare.
    #[error("unexpected key `{key}` at {path}")]
    UnexpectedKey { path: String, key: String },
    /// A node has the wrong kind.
    #[error("type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: String,
    },
    /// A string is not one of the enumerated choices.
    #[error("invalid value at {path}: `{value}` is not one of {choices:?}")]
    InvalidChoice {
        path: String,
        value: String,
        choices: Vec<String>,
    },
    /// A wildcard key does not parse as the declared key type.
    #[error("invalid key `{key}` at {path}: expected {expected} key")]
    InvalidKey {
        path: String,
        key: String,
        expected: &'static str,
    },
}

/// Validates `candidate` against `schema`, returning the first violation.
pub fn validate(schema: &Schema, candidate: &Value) -> Result<(), SchemaError> {
    match violations(schema, candidate).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Collects every violation of `schema` found in `candidate`.
pub fn violations(schema: &Schema, candidate: &Value) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    check(schema, candidate, &mut path, &mut errors);
    errors
}

fn check(schema: &Schema, value: &Value, path: &mut Vec<String>, errors: &mut Vec<SchemaError>) {
    match (schema, value) {
        (Schema::Str, Value::Str(_)) | (Schema::Int, Value::Int(_)) | (Schema::Bool, Value::Bool(_)) => {}
        (Schema::Choice(choices), Value::Str(s)) => {
            if !choices.iter().any(|c| c == s) {
                errors.push(SchemaError::InvalidChoice {
                    path: render_path(path),
                    value: s.clone(),
                    choices: choices.clone(),
                });
            }
        }
        (Schema::List(item), Value::List(items)) => {
            for (index, entry) in items.iter().enumerate() {
                path.push(index.to_string());
                check(item, entry, path, errors);
                path.pop();
            }
        }
        (Schema::Fields(fields), Value::Map(map)) => {
            for field in fields {
                match map.get(&field.key) {
                    Some(child) => {
                        path.push(field.key.clone());
                        check(&field.schema, child, path, errors);
                        path.pop();
                    }
                    None if field.required => errors.push(SchemaError::MissingKey {
                        path: render_path(path),
                        key: field.key.clone(),
                    }),
                    None => {}
                }
            }
            for key in map.keys() {
                if !fields.iter().any(|f| &f.key == key) {
                    errors.push(SchemaError::UnexpectedKey {
                        path: render_path(path),
                        key: key.clone(),
                    });
                }
            }
        }
        (Schema::AnyKey { key: key_type, value: inner }, Value::Map(map)) => {
            for (key, child) in map {
                if !key_type.accepts(key) {
                    errors.push(SchemaError::InvalidKey {
                        path: render_path(path),
                        key: key.clone(),
                        expected: key_type.name(),
                    });
                    continue;
                }
                path.push(key.clone());
                check(inner, child, path, errors);
                path.pop();
            }
        }
        (expected, actual) => errors.push(SchemaError::TypeMismatch {
            path: render_path(path),
            expected: expected.expected(),
            actual: describe(actual),
        }),
    }
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        return "$".to_string();
    }
    format!("$.{}", path.join("."))
}

fn describe(value: &Value) -> String {
    match value {
        Value::Map(_) | Value::List(_) => value.kind_name().to_string(),
        scalar => format!("{} {}", scalar.kind_name(), scalar),
    }
}
