//! Alternate decoder front ends.
//!
//! The text decoders live next to their rule tables. This module holds the
//! structural readers shared by the XML and model decoders, and the helper
//! used to compare decoder outputs modulo fields known to differ.

pub mod model;
pub mod xml;

use showparse_core::Value;

/// Returns `value` with every path in `exclusions` removed.
///
/// Paths are dotted; a `*` segment matches every key at that level.
///
/// # Examples
///
/// ```
/// use showparse_core::Value;
/// use showparse_parsers::decoders::without_paths;
///
/// let value: Value = serde_json::from_str(
///     r#"{"interfaces": {"Gi1": {"uptime": 5, "interface": "Gi1"}}}"#,
/// ).unwrap();
/// let trimmed = without_paths(&value, &["interfaces.*.uptime"]);
/// assert_eq!(trimmed.get_path(&["interfaces", "Gi1", "uptime"]), None);
/// assert!(trimmed.get_path(&["interfaces", "Gi1", "interface"]).is_some());
/// ```
pub fn without_paths(value: &Value, exclusions: &[&str]) -> Value {
    let mut value = value.clone();
    for exclusion in exclusions {
        let segments: Vec<&str> = exclusion.split('.').collect();
        remove_path(&mut value, &segments);
    }
    value
}

fn remove_path(value: &mut Value, segments: &[&str]) {
    let Some(map) = value.as_map_mut() else {
        return;
    };
    match segments {
        [] => {}
        [last] if *last == "*" => map.clear(),
        [last] => {
            map.remove(*last);
        }
        ["*", rest @ ..] => {
            for child in map.values_mut() {
                remove_path(child, rest);
            }
        }
        [head, rest @ ..] => {
            if let Some(child) = map.get_mut(*head) {
                remove_path(child, rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        serde_json::from_str(
            r#"{
                "interfaces": {
                    "Gi1": {"statistics": {"rxtotal": 1, "lastrxsrcmac": "a"}},
                    "Gi2": {"statistics": {"rxtotal": 2, "lastrxsrcmac": "b"}}
                },
                "version": 3
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_wildcard_removes_field_under_every_key() {
        let trimmed = without_paths(&sample(), &["interfaces.*.statistics.lastrxsrcmac"]);
        assert_eq!(
            serde_json::to_value(&trimmed).unwrap(),
            serde_json::json!({
                "interfaces": {
                    "Gi1": {"statistics": {"rxtotal": 1}},
                    "Gi2": {"statistics": {"rxtotal": 2}}
                },
                "version": 3
            })
        );
    }

    #[test]
    fn test_missing_paths_are_ignored() {
        let trimmed = without_paths(&sample(), &["sessions.total", "version.extra"]);
        assert_eq!(trimmed, sample());
    }

    #[test]
    fn test_no_exclusions_is_identity() {
        assert_eq!(without_paths(&sample(), &[]), sample());
    }
}
