//! Shared helpers for rule tables.

use regex::Regex;
use std::sync::LazyLock;

/// Abbreviations devices use for interface types.
const INTERFACE_PREFIXES: &[(&str, &str)] = &[
    ("Twe", "TwentyFiveGigE"),
    ("Eth", "Ethernet"),
    ("Gi", "GigabitEthernet"),
    ("Fa", "FastEthernet"),
    ("Te", "TenGigabitEthernet"),
    ("Tw", "TwoGigabitEthernet"),
    ("Fo", "FortyGigabitEthernet"),
    ("Hu", "HundredGigE"),
    ("Et", "Ethernet"),
    ("Lo", "Loopback"),
    ("Po", "Port-channel"),
    ("Vl", "Vlan"),
    ("Tu", "Tunnel"),
    ("Se", "Serial"),
];

/// Expands an abbreviated interface name to its canonical form.
///
/// Only the exact abbreviation followed by the port number is rewritten;
/// names that are already canonical, or whose prefix is unknown, come back
/// unchanged.
///
/// # Examples
///
/// ```
/// use showparse_parsers::util::canonical_interface_name;
///
/// assert_eq!(canonical_interface_name("Fa1"), "FastEthernet1");
/// assert_eq!(canonical_interface_name("Gi1/0/9"), "GigabitEthernet1/0/9");
/// assert_eq!(canonical_interface_name("GigabitEthernet1/0/9"), "GigabitEthernet1/0/9");
/// ```
pub fn canonical_interface_name(name: &str) -> String {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static SPLIT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(?P<kind>[A-Za-z\-]+)(?P<port>\d[\w/\.:]*)$").expect("static regex must compile"));

    let name = name.trim();
    let Some(caps) = SPLIT_RE.captures(name) else {
        return name.to_string();
    };
    let (Some(kind), Some(port)) = (caps.name("kind"), caps.name("port")) else {
        return name.to_string();
    };

    INTERFACE_PREFIXES
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(kind.as_str()))
        .map(|(_, long)| format!("{long}{}", port.as_str()))
        .unwrap_or_else(|| name.to_string())
}
