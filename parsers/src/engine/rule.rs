//! Rules, rule tables and the captures handed to rule handlers.

use std::fmt;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::Scan;
use super::coerce::{BoolCoercion, parse_int};
use super::normalize::DEFAULT_TAB_WIDTH;
use crate::error::{ParseError, Result};

/// Handler invoked when a rule's pattern matches a line.
pub type Handler = fn(&Hit<'_>, &mut Scan) -> Result<()>;

/// How a rule's pattern is applied to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The handler runs once with the first match. Patterns carry their own
    /// `^`/`$` anchors.
    Anchored,
    /// The handler runs once per non-overlapping match anywhere in the line.
    /// Used for counter grids that pack several `Key = Value` pairs per line.
    Repeated,
}

/// One entry of a rule table.
#[derive(Clone)]
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    mode: MatchMode,
    handler: Handler,
}

impl Rule {
    /// An [`Anchored`](MatchMode::Anchored) rule.
    ///
    /// Rule patterns are compile-time constants; an invalid pattern is a
    /// programming error and panics when the table is first built.
    pub fn new(name: &'static str, pattern: &str, handler: Handler) -> Self {
        Self::with_mode(name, pattern, MatchMode::Anchored, handler)
    }

    /// A [`Repeated`](MatchMode::Repeated) rule.
    pub fn repeated(name: &'static str, pattern: &str, handler: Handler) -> Self {
        Self::with_mode(name, pattern, MatchMode::Repeated, handler)
    }

    fn with_mode(name: &'static str, pattern: &str, mode: MatchMode, handler: Handler) -> Self {
        // SAFETY: rule patterns are literals validated by each table's tests.
        let pattern = Regex::new(pattern).expect("static regex must compile");
        Self {
            name,
            pattern,
            mode,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Runs the rule against `line`. Returns `true` if it fired.
    pub(crate) fn apply(&self, line: &str, scan: &mut Scan) -> Result<bool> {
        match self.mode {
            MatchMode::Anchored => {
                let Some(caps) = self.pattern.captures(line) else {
                    return Ok(false);
                };
                scan.set_rule(self.name);
                (self.handler)(&Hit { rule: self, caps }, scan)?;
                Ok(true)
            }
            MatchMode::Repeated => {
                let mut fired = false;
                for caps in self.pattern.captures_iter(line) {
                    fired = true;
                    scan.set_rule(self.name);
                    (self.handler)(&Hit { rule: self, caps }, scan)?;
                }
                Ok(fired)
            }
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Scan settings a rule table may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Number of spaces each tab expands to.
    pub tab_width: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Ordered list of rules. The first rule that fires on a line wins.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    options: ScanOptions,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Tries each rule in order until one fires.
    pub(crate) fn dispatch(&self, line: &str, scan: &mut Scan) -> Result<Option<&'static str>> {
        for rule in &self.rules {
            if rule.apply(line, scan)? {
                return Ok(Some(rule.name));
            }
        }
        Ok(None)
    }
}

/// Named captures of one match, with typed accessors.
///
/// Accessors that fail report the firing rule's name, so a defect in a rule
/// table points at the rule that caused it.
#[derive(Debug)]
pub struct Hit<'a> {
    rule: &'a Rule,
    caps: Captures<'a>,
}

impl<'a> Hit<'a> {
    pub fn rule(&self) -> &'static str {
        self.rule.name
    }

    /// Capture text, or `None` when the group did not participate.
    pub fn get(&self, group: &str) -> Option<&'a str> {
        self.caps.name(group).map(|m| m.as_str())
    }

    /// Capture text of a group the pattern always sets.
    pub fn text(&self, group: &'static str) -> Result<&'a str> {
        self.get(group).ok_or(ParseError::MissingCapture {
            rule: self.rule.name,
            group,
        })
    }

    pub fn lower(&self, group: &'static str) -> Result<String> {
        Ok(self.text(group)?.to_lowercase())
    }

    pub fn int(&self, group: &'static str) -> Result<i64> {
        let text = self.text(group)?;
        parse_int(text).ok_or_else(|| ParseError::InvalidInteger {
            rule: self.rule.name,
            group,
            value: text.to_string(),
        })
    }

    pub fn flag(&self, group: &'static str, coercion: BoolCoercion) -> Result<bool> {
        let text = self.text(group)?;
        coercion
            .coerce(text)
            .ok_or_else(|| ParseError::InvalidBoolean {
                rule: self.rule.name,
                group,
                value: text.to_string(),
            })
    }

    /// Named groups that participated in the match, in pattern order.
    pub fn groups(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        let rule: &'a Rule = self.rule;
        rule.pattern
            .capture_names()
            .flatten()
            .filter_map(|name| self.caps.name(name).map(|m| (name, m.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Context;
    use showparse_core::Value;

    fn noop(_: &Hit<'_>, _: &mut Scan) -> Result<()> {
        Ok(())
    }

    fn count(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
        let key = hit.lower("key")?;
        let value = hit.int("val")?;
        scan.root().insert(key, Value::from(value));
        Ok(())
    }

    #[test]
    fn test_anchored_rule_fires_once() {
        let rule = Rule::new("counter", r"(?P<key>\w+) += +(?P<val>\d+)", count);
        let mut scan = Scan::new(Context::new());
        assert!(rule.apply("RxStart = 2 RxLogoff = 0", &mut scan).unwrap());
        let output = scan.into_output();
        assert_eq!(output.len(), 1);
        assert_eq!(output["rxstart"], Value::from(2));
    }

    #[test]
    fn test_repeated_rule_fires_per_match() {
        let rule = Rule::repeated("counter", r"(?P<key>\w+) += +(?P<val>\d+)", count);
        let mut scan = Scan::new(Context::new());
        assert!(rule.apply("RxStart = 2 RxLogoff = 0", &mut scan).unwrap());
        let output = scan.into_output();
        assert_eq!(output["rxstart"], Value::from(2));
        assert_eq!(output["rxlogoff"], Value::from(0));
    }

    #[test]
    fn test_rule_that_does_not_match_reports_false() {
        let rule = Rule::repeated("counter", r"(?P<key>\w+) += +(?P<val>\d+)", noop);
        let mut scan = Scan::new(Context::new());
        assert!(!rule.apply("Dot1x Info for Gi1", &mut scan).unwrap());
    }

    #[test]
    fn test_int_accessor_reports_authoring_defect() {
        let rule = Rule::new("bad_int", r"^(?P<key>\w+) = (?P<val>\w+)$", count);
        let mut scan = Scan::new(Context::new());
        let err = rule.apply("MaxReq = two", &mut scan).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidInteger { rule: "bad_int", group: "val", ref value } if value == "two"
        ));
    }

    #[test]
    fn test_missing_group_is_reported() {
        fn needs_suffix(hit: &Hit<'_>, _: &mut Scan) -> Result<()> {
            hit.text("suffix").map(|_| ())
        }
        let rule = Rule::new("optional_suffix", r"^PAE(?: = (?P<suffix>\w+))?$", needs_suffix);
        let mut scan = Scan::new(Context::new());
        let err = rule.apply("PAE", &mut scan).unwrap_err();
        assert!(matches!(err, ParseError::MissingCapture { group: "suffix", .. }));
    }

    #[test]
    fn test_strict_flag_rejects_unknown_token() {
        fn strict(hit: &Hit<'_>, _: &mut Scan) -> Result<()> {
            hit.flag("state", BoolCoercion::YES_NO).map(|_| ())
        }
        let rule = Rule::new("strict", r"^State (?P<state>\w+)$", strict);
        let mut scan = Scan::new(Context::new());
        assert!(rule.apply("State yes", &mut scan).unwrap());
        let err = rule.apply("State maybe", &mut scan).unwrap_err();
        assert!(matches!(err, ParseError::InvalidBoolean { .. }));
    }

    #[test]
    fn test_groups_lists_participating_captures_in_order() {
        fn collect(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
            let names: Vec<Value> = hit.groups().map(|(name, _)| Value::from(name)).collect();
            scan.root().insert("groups".into(), Value::from(names));
            Ok(())
        }
        let rule = Rule::new("row", r"^(?:(?P<pae>\w+) +)?(?P<client>\S+) +(?P<status>\w+)$", collect);
        let mut scan = Scan::new(Context::new());
        rule.apply("aaaa.bbbb.cccc UNAUTHORIZED", &mut scan).unwrap();
        let output = scan.into_output();
        assert_eq!(
            output["groups"],
            Value::from(vec![Value::from("client"), Value::from("status")])
        );
    }

    #[test]
    fn test_scan_options_default_tab_width() {
        assert_eq!(ScanOptions::default().tab_width, DEFAULT_TAB_WIDTH);
        let options: ScanOptions = serde_yaml::from_str("{}").unwrap();
        assert_eq!(options, ScanOptions::default());
    }
}
