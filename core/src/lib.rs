//! Output tree and schema contract shared by the show-command parsers.
//!
//! This crate defines the two leaf-level building blocks every parser
//! relies on:
//!
//! - [`Value`] / [`Mapping`]: the nested, key-ordered output tree a parser
//!   produces (strings, integers, booleans, lists, mappings).
//! - [`Schema`]: a declarative description of the permitted shape of that
//!   tree: literal required/optional keys, wildcard keys discovered at
//!   parse time, and leaf type constraints.
//!
//! Validation ([`validate`], [`violations`]) checks a candidate tree against
//! its schema and reports the offending path together with the expected and
//! actual type.
//!
//! # Example
//!
//! ```
//! use showparse_core::*;
//!
//! let schema = Schema::fields([
//!     Field::optional("system_auth_control", Schema::Bool),
//!     Field::optional("version", Schema::Int),
//! ]);
//!
//! let mut output = Mapping::new();
//! output.insert("system_auth_control".into(), Value::from(true));
//! assert!(validate(&schema, &Value::from(output)).is_ok());
//!
//! // Devices that do not run the feature emit nothing at all
//! assert!(validate(&schema, &Value::map()).is_ok());
//! ```

mod schema;
mod types;
mod validate;

pub use schema::{Field, KeyType, Schema};
pub use types::{Mapping, MappingExt, Value};
pub use validate::{SchemaError, validate, violations};
