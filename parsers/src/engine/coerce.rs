//! Typed coercion of captured text.
//!
//! Integers are plain digit runs. Booleans never get inferred from arbitrary
//! text: every boolean field names the [`BoolCoercion`] it follows, so the
//! polarity of each field is visible in its rule table.

/// How a captured token maps onto a boolean field.
///
/// Comparisons are ASCII case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolCoercion {
    /// `true` iff the token is one of these; anything else is `false`.
    TrueOn(&'static [&'static str]),
    /// `false` iff the token is one of these; anything else is `true`.
    FalseOn(&'static [&'static str]),
    /// Token must appear in one of the two vocabularies.
    Strict {
        truthy: &'static [&'static str],
        falsy: &'static [&'static str],
    },
}

impl BoolCoercion {
    /// `Enabled` is true, every other state is false.
    pub const ENABLED: BoolCoercion = BoolCoercion::TrueOn(&["enabled"]);

    /// `Disabled` is false, every other state is true.
    pub const UNLESS_DISABLED: BoolCoercion = BoolCoercion::FalseOn(&["disabled"]);

    /// The common yes/no vocabulary with no fallback.
    pub const YES_NO: BoolCoercion = BoolCoercion::Strict {
        truthy: &["enabled", "yes", "true", "on"],
        falsy: &["disabled", "no", "false", "off"],
    };

    /// Returns `None` only for [`Strict`](BoolCoercion::Strict) tokens in
    /// neither vocabulary.
    pub fn coerce(self, token: &str) -> Option<bool> {
        let token = token.trim();
        let listed = |set: &[&str]| set.iter().any(|t| t.eq_ignore_ascii_case(token));
        match self {
            BoolCoercion::TrueOn(set) => Some(listed(set)),
            BoolCoercion::FalseOn(set) => Some(!listed(set)),
            BoolCoercion::Strict { truthy, falsy } => {
                if listed(truthy) {
                    Some(true)
                } else if listed(falsy) {
                    Some(false)
                } else {
                    None
                }
            }
        }
    }
}

/// Parses an optionally signed run of ASCII digits.
///
/// No range checks happen beyond what fits in `i64`.
pub fn parse_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_on_defaults_to_false() {
        assert_eq!(BoolCoercion::ENABLED.coerce("Enabled"), Some(true));
        assert_eq!(BoolCoercion::ENABLED.coerce("ENABLED"), Some(true));
        assert_eq!(BoolCoercion::ENABLED.coerce("Disabled"), Some(false));
        assert_eq!(BoolCoercion::ENABLED.coerce("unknown"), Some(false));
    }

    #[test]
    fn test_false_on_defaults_to_true() {
        assert_eq!(BoolCoercion::UNLESS_DISABLED.coerce("Disabled"), Some(false));
        assert_eq!(BoolCoercion::UNLESS_DISABLED.coerce("Enabled"), Some(true));
        assert_eq!(BoolCoercion::UNLESS_DISABLED.coerce("periodic"), Some(true));
    }

    #[test]
    fn test_strict_rejects_unknown_tokens() {
        assert_eq!(BoolCoercion::YES_NO.coerce("yes"), Some(true));
        assert_eq!(BoolCoercion::YES_NO.coerce("Off"), Some(false));
        assert_eq!(BoolCoercion::YES_NO.coerce("maybe"), None);
    }

    #[test]
    fn test_parse_int_accepts_only_digit_runs() {
        assert_eq!(parse_int("3600"), Some(3600));
        assert_eq!(parse_int("-1"), Some(-1));
        assert_eq!(parse_int("0x1"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("+5"), None);
    }
}
