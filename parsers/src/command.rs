//! Command templates with named placeholders.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ParseError, Result};

// SAFETY: This regex is a compile-time constant and is validated by tests.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("static regex must compile"));

/// A show command with `{name}` placeholders.
///
/// # Examples
///
/// ```
/// use showparse_parsers::CommandTemplate;
///
/// let template = CommandTemplate::new("show dot1x interface {interface} statistics");
/// assert_eq!(
///     template.render(&[("interface", "GigabitEthernet1/0/9")]).unwrap(),
///     "show dot1x interface GigabitEthernet1/0/9 statistics"
/// );
/// assert!(template.render(&[]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate(&'static str);

impl CommandTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        PLACEHOLDER_RE
            .captures_iter(self.0)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Substitutes every placeholder. Unused parameters are ignored.
    pub fn render(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut rendered = String::with_capacity(self.0.len());
        let mut last = 0;
        for caps in PLACEHOLDER_RE.captures_iter(self.0) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some((_, value)) = params.iter().find(|(key, _)| *key == name.as_str()) else {
                return Err(ParseError::MissingParameter {
                    template: self.0.to_string(),
                    name: name.as_str().to_string(),
                });
            };
            rendered.push_str(&self.0[last..whole.start()]);
            rendered.push_str(value.trim());
            last = whole.end();
        }
        rendered.push_str(&self.0[last..]);
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_without_placeholders_renders_verbatim() {
        let template = CommandTemplate::new("show dot1x all details");
        assert!(template.placeholders().is_empty());
        assert_eq!(template.render(&[]).unwrap(), "show dot1x all details");
    }

    #[test]
    fn test_placeholders_in_order() {
        let template = CommandTemplate::new("show ip bgp vrf {vrf} {address_family} neighbors {neighbor}");
        assert_eq!(template.placeholders(), vec!["vrf", "address_family", "neighbor"]);
    }

    #[test]
    fn test_missing_parameter_names_template_and_placeholder() {
        let template = CommandTemplate::new("show vrf detail {vrf}");
        let err = template.render(&[("interface", "Gi1")]).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingParameter { ref template, ref name }
                if template == "show vrf detail {vrf}" && name == "vrf"
        ));
    }

    #[test]
    fn test_parameter_values_are_trimmed() {
        let template = CommandTemplate::new("show vrf detail {vrf}");
        assert_eq!(template.render(&[("vrf", " red ")]).unwrap(), "show vrf detail red");
    }
}
