//! Call-scoped parsing context.
//!
//! A [`Context`] records which scopes are currently bound (the current
//! interface, client, VRF, address family, ...) and where in the output tree
//! each one lives. Scopes nest in the order they are entered: re-entering a
//! scope supersedes its previous binding together with every scope bound
//! after it, so a new interface header also ends the previous interface's
//! client and session scopes.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Frame {
    scope: &'static str,
    path: Vec<String>,
    carried: BTreeMap<&'static str, String>,
}

/// Location of the list field that continuation lines append to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) path: Vec<String>,
    pub(crate) key: String,
}

/// Set of bound scopes for one scan.
///
/// # Examples
///
/// ```
/// use showparse_parsers::engine::Context;
///
/// // Pre-bind the interface scope for a single-interface command
/// let context = Context::new().bind("interface", ["interface", "GigabitEthernet1/0/9"]);
/// assert!(context.is_bound("interface"));
/// assert_eq!(
///     context.path("interface"),
///     Some(&["interface".to_string(), "GigabitEthernet1/0/9".to_string()][..])
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    frames: Vec<Frame>,
    last_list: Option<ListCursor>,
}

impl Context {
    /// A context with nothing bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `scope` to `path` before scanning starts.
    pub fn bind<I, S>(mut self, scope: &'static str, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enter(scope, path.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_bound(&self, scope: &str) -> bool {
        self.position(scope).is_some()
    }

    /// Output-tree path the scope is bound to.
    pub fn path(&self, scope: &str) -> Option<&[String]> {
        self.position(scope).map(|idx| self.frames[idx].path.as_slice())
    }

    /// Bound scopes, outermost first.
    pub fn scopes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.frames.iter().map(|frame| frame.scope)
    }

    pub(crate) fn enter(&mut self, scope: &'static str, path: Vec<String>) {
        if let Some(idx) = self.position(scope) {
            self.frames.truncate(idx);
        }
        self.frames.push(Frame {
            scope,
            path,
            carried: BTreeMap::new(),
        });
        self.last_list = None;
    }

    /// Stores `value` under `name` in the frame of `scope`.
    ///
    /// Returns `false` when the scope is unbound.
    pub(crate) fn carry(&mut self, scope: &str, name: &'static str, value: String) -> bool {
        match self.position(scope) {
            Some(idx) => {
                self.frames[idx].carried.insert(name, value);
                true
            }
            None => false,
        }
    }

    pub(crate) fn carried(&self, scope: &str, name: &str) -> Option<&str> {
        let idx = self.position(scope)?;
        self.frames[idx].carried.get(name).map(String::as_str)
    }

    pub(crate) fn last_list(&self) -> Option<&ListCursor> {
        self.last_list.as_ref()
    }

    pub(crate) fn set_last_list(&mut self, cursor: ListCursor) {
        self.last_list = Some(cursor);
    }

    fn position(&self, scope: &str) -> Option<usize> {
        self.frames.iter().position(|frame| frame.scope == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_reentering_scope_drops_inner_scopes() {
        let mut context = Context::new();
        context.enter("interface", path(&["interfaces", "Gi1"]));
        context.enter("client", path(&["interfaces", "Gi1", "clients", "aaaa.bbbb.cccc"]));
        context.enter("session", path(&["interfaces", "Gi1", "clients", "aaaa.bbbb.cccc", "session", "01"]));

        context.enter("interface", path(&["interfaces", "Gi2"]));

        assert_eq!(context.scopes().collect::<Vec<_>>(), vec!["interface"]);
        assert!(!context.is_bound("client"));
        assert!(!context.is_bound("session"));
    }

    #[test]
    fn test_reentering_inner_scope_keeps_outer() {
        let mut context = Context::new();
        context.enter("interface", path(&["interfaces", "Gi1"]));
        context.enter("client", path(&["interfaces", "Gi1", "clients", "a"]));
        context.enter("session", path(&["interfaces", "Gi1", "clients", "a", "session", "1"]));
        context.enter("client", path(&["interfaces", "Gi1", "clients", "b"]));

        assert_eq!(context.scopes().collect::<Vec<_>>(), vec!["interface", "client"]);
        assert_eq!(
            context.path("client"),
            Some(path(&["interfaces", "Gi1", "clients", "b"]).as_slice())
        );
    }

    #[test]
    fn test_carried_values_die_with_their_scope() {
        let mut context = Context::new();
        context.enter("interface", path(&["interfaces", "Gi1"]));
        assert!(context.carry("interface", "pae", "authenticator".into()));
        assert_eq!(context.carried("interface", "pae"), Some("authenticator"));

        context.enter("interface", path(&["interfaces", "Gi2"]));
        assert_eq!(context.carried("interface", "pae"), None);
    }

    #[test]
    fn test_carry_into_unbound_scope_is_refused() {
        let mut context = Context::new();
        assert!(!context.carry("interface", "pae", "supplicant".into()));
    }

    #[test]
    fn test_entering_any_scope_closes_open_list() {
        let mut context = Context::new();
        context.enter("vrf", path(&["vrf", "red"]));
        context.set_last_list(ListCursor {
            path: path(&["vrf", "red"]),
            key: "interfaces".into(),
        });
        context.enter("address_family", path(&["vrf", "red", "address_family", "ipv4 unicast"]));
        assert!(context.last_list().is_none());
    }
}
