//! Error types for parsing show-command output.
//!
//! Unmatched input is never an error. What is surfaced here is either a
//! schema violation, a rule-table defect detected while scanning, or a
//! failure of the device collaborator.

use showparse_core::SchemaError;
use thiserror::Error;

use crate::device::DeviceError;

/// Errors that can occur while turning device output into a validated tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The decoded tree does not conform to the parser's schema.
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),

    /// A field rule fired while the scope it writes into was unbound.
    #[error("rule `{rule}` fired outside its expected context: scope `{scope}` is not bound")]
    UndefinedContext {
        rule: &'static str,
        scope: &'static str,
    },

    /// A rule needed a value carried from an earlier line that never appeared.
    #[error("rule `{rule}` needs `{name}` carried in scope `{scope}`, but no earlier line set it")]
    MissingCarriedValue {
        rule: &'static str,
        scope: &'static str,
        name: &'static str,
    },

    /// A continuation rule fired with no list field open.
    #[error("rule `{rule}` continues a list, but no list field is open")]
    NoOpenList { rule: &'static str },

    /// A rule tried to descend through or append to a node of the wrong kind.
    #[error("rule `{rule}` writes through `{path}`, which already holds a {found}")]
    PathConflict {
        rule: &'static str,
        path: String,
        found: &'static str,
    },

    /// A handler asked for a capture group that did not participate.
    #[error("rule `{rule}` has no capture for group `{group}`")]
    MissingCapture {
        rule: &'static str,
        group: &'static str,
    },

    /// A non-numeric capture was routed to an integer field.
    #[error("rule `{rule}` captured `{value}` for integer group `{group}`")]
    InvalidInteger {
        rule: &'static str,
        group: &'static str,
        value: String,
    },

    /// A token matched neither side of a strict boolean vocabulary.
    #[error("rule `{rule}` captured `{value}` for boolean group `{group}`, which is in neither vocabulary")]
    InvalidBoolean {
        rule: &'static str,
        group: &'static str,
        value: String,
    },

    /// A command template placeholder had no value.
    #[error("command template `{template}` requires parameter `{name}`")]
    MissingParameter { template: String, name: String },

    /// Malformed XML, or XML without the expected elements.
    #[error("XML decode error: {0}")]
    Xml(String),

    /// A model document whose structure does not match the decoder.
    #[error("model decode error: {0}")]
    Model(String),

    /// JSON parsing failure in a model document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The device collaborator failed to produce output.
    #[error("device execution failed: {0}")]
    Device(#[from] DeviceError),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
