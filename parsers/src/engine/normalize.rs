//! Device-output normalization.

use regex::Regex;
use std::sync::LazyLock;

/// Tab expansion width used when a rule table does not override it.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Splits raw output into scan-ready lines.
///
/// Terminal escape sequences and pager overstrikes are removed, line endings
/// are unified, each line is trimmed, and remaining tabs are expanded to a
/// fixed run of `tab_width` spaces so fixed-column patterns stay reliable.
/// Blank lines are kept (as empty strings) so line numbers in diagnostics
/// match the original output.
pub fn normalize_output(raw: &str, tab_width: usize) -> Vec<String> {
    // SAFETY: These regexes are compile-time constants and are validated by tests.
    static ANSI_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile"));
    static OVERSTRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".\x08").expect("static regex must compile"));

    let stripped = ANSI_RE.replace_all(raw, "");
    let mut cleaned = stripped.into_owned();
    while OVERSTRIKE_RE.is_match(&cleaned) {
        cleaned = OVERSTRIKE_RE.replace_all(&cleaned, "").into_owned();
    }
    let replaced = cleaned.replace("\r\n", "\n").replace('\r', "\n");
    let tab = " ".repeat(tab_width);

    replaced
        .lines()
        .map(|line| line.trim().replace('\t', &tab))
        .collect()
}
