//! Line-scan extraction engine.
//!
//! Every text decoder in this crate is a [`RuleTable`] run through one
//! dispatch loop:
//!
//! 1. the raw output is normalized into trimmed lines ([`normalize_output`]),
//! 2. each non-empty line is offered to the rules in table order and the
//!    first rule that fires wins,
//! 3. the firing rule's handler writes into the output [`Mapping`] through
//!    the [`Scan`] cursor, relative to the scopes bound in its [`Context`].
//!
//! Unmatched lines are never an error; they are counted in
//! [`ScanDiagnostics`]. Handler errors abort the scan immediately.
//!
//! # Example
//!
//! ```
//! use showparse_core::Value;
//! use showparse_parsers::engine::{self, Context, Hit, Rule, RuleTable, Scan};
//! use showparse_parsers::Result;
//!
//! fn interface(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
//!     let name = hit.text("intf")?;
//!     scan.enter("interface", vec!["interfaces".into(), name.into()])?
//!         .insert("interface".into(), Value::from(name));
//!     Ok(())
//! }
//!
//! fn max_req(hit: &Hit<'_>, scan: &mut Scan) -> Result<()> {
//!     let value = hit.int("value")?;
//!     scan.at("interface")?.insert("max_req".into(), Value::from(value));
//!     Ok(())
//! }
//!
//! let table = RuleTable::new(vec![
//!     Rule::new("interface", r"^Dot1x Info for (?P<intf>\S+)$", interface),
//!     Rule::new("max_req", r"^MaxReq += +(?P<value>\d+)$", max_req),
//! ]);
//!
//! let output = engine::parse(
//!     "Dot1x Info for Gi1\nMaxReq = 2\n",
//!     &table,
//!     Context::new(),
//! )?;
//! let value = Value::from(output);
//! assert_eq!(value.get_path(&["interfaces", "Gi1", "max_req"]), Some(&Value::from(2)));
//! # Ok::<(), showparse_parsers::ParseError>(())
//! ```

pub mod coerce;
mod context;
pub mod normalize;
mod rule;

use showparse_core::{Mapping, Value};
use tracing::{debug, trace};

use crate::error::{ParseError, Result};

pub use coerce::BoolCoercion;
pub use context::Context;
pub use normalize::{DEFAULT_TAB_WIDTH, normalize_output};
pub use rule::{Handler, Hit, MatchMode, Rule, RuleTable, ScanOptions};

use context::ListCursor;

/// Line accounting for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanDiagnostics {
    /// Non-empty lines offered to the rule table.
    pub relevant_lines: usize,
    /// Lines on which some rule fired.
    pub recognized_lines: usize,
    /// Lines no rule matched, in input order.
    pub unresolved_lines: Vec<String>,
}

impl ScanDiagnostics {
    /// Fraction of relevant lines that some rule recognized.
    pub fn coverage(&self) -> f64 {
        if self.relevant_lines == 0 {
            return 0.0;
        }
        self.recognized_lines as f64 / self.relevant_lines as f64
    }
}

/// Result of [`scan`]: the output tree and its diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub output: Mapping,
    pub diagnostics: ScanDiagnostics,
}

/// Handler-facing cursor over the output tree and the bound scopes.
#[derive(Debug, Default)]
pub struct Scan {
    output: Mapping,
    context: Context,
    rule: &'static str,
}

impl Scan {
    pub(crate) fn new(context: Context) -> Self {
        Self {
            output: Mapping::new(),
            context,
            rule: "",
        }
    }

    pub(crate) fn set_rule(&mut self, rule: &'static str) {
        self.rule = rule;
    }

    pub(crate) fn into_output(self) -> Mapping {
        self.output
    }

    /// Scopes bound so far.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The top-level mapping.
    pub fn root(&mut self) -> &mut Mapping {
        &mut self.output
    }

    /// Top-level child mapping, created on first use.
    pub fn root_child(&mut self, key: &str) -> Result<&mut Mapping> {
        resolve(&mut self.output, &[key.to_string()], self.rule)
    }

    /// Binds `scope` to `path`, creating every missing mapping on the way.
    ///
    /// Any previous binding of `scope` is superseded together with every
    /// scope bound after it. The open list, if any, is closed.
    pub fn enter(&mut self, scope: &'static str, path: Vec<String>) -> Result<&mut Mapping> {
        debug!(rule = self.rule, scope, path = ?path, "Entering scope");
        resolve(&mut self.output, &path, self.rule)?;
        self.context.enter(scope, path);
        self.at(scope)
    }

    /// Binds `scope` to `relative` below the bound `parent` scope.
    ///
    /// Fails with [`ParseError::UndefinedContext`] when `parent` is unbound.
    pub fn enter_within(
        &mut self,
        parent: &'static str,
        scope: &'static str,
        relative: &[&str],
    ) -> Result<&mut Mapping> {
        let mut path = self.bound_path(parent)?.to_vec();
        path.extend(relative.iter().map(|segment| segment.to_string()));
        self.enter(scope, path)
    }

    /// The subtree `scope` is bound to.
    ///
    /// Fails with [`ParseError::UndefinedContext`] when the scope is unbound,
    /// which means a field line showed up before its header.
    pub fn at(&mut self, scope: &'static str) -> Result<&mut Mapping> {
        let rule = self.rule;
        let Some(path) = self.context.path(scope) else {
            return Err(ParseError::UndefinedContext { rule, scope });
        };
        resolve(&mut self.output, path, rule)
    }

    /// Mapping at `relative` below the bound `scope`, created on demand.
    ///
    /// Unlike [`enter_within`](Self::enter_within) no scope is bound.
    pub fn at_within(&mut self, scope: &'static str, relative: &[&str]) -> Result<&mut Mapping> {
        let rule = self.rule;
        let Some(base) = self.context.path(scope) else {
            return Err(ParseError::UndefinedContext { rule, scope });
        };
        let path: Vec<String> = base
            .iter()
            .cloned()
            .chain(relative.iter().map(|segment| segment.to_string()))
            .collect();
        resolve(&mut self.output, &path, rule)
    }

    /// Like [`at`](Self::at) for scopes a field may legitimately appear
    /// without.
    pub fn at_optional(&mut self, scope: &'static str) -> Result<Option<&mut Mapping>> {
        let rule = self.rule;
        match self.context.path(scope) {
            Some(path) => resolve(&mut self.output, path, rule).map(Some),
            None => Ok(None),
        }
    }

    /// Carries `value` under `name` for as long as `scope` stays bound.
    pub fn remember(
        &mut self,
        scope: &'static str,
        name: &'static str,
        value: impl Into<String>,
    ) -> Result<()> {
        if self.context.carry(scope, name, value.into()) {
            Ok(())
        } else {
            Err(ParseError::UndefinedContext {
                rule: self.rule,
                scope,
            })
        }
    }

    /// A value carried in `scope`, if an earlier line set one.
    pub fn recall(&self, scope: &str, name: &str) -> Option<&str> {
        self.context.carried(scope, name)
    }

    /// A carried value the current line cannot do without.
    pub fn recall_required(&self, scope: &'static str, name: &'static str) -> Result<String> {
        match self.context.carried(scope, name) {
            Some(value) => Ok(value.to_string()),
            None => Err(ParseError::MissingCarriedValue {
                rule: self.rule,
                scope,
                name,
            }),
        }
    }

    /// Ensures `key` under `scope` holds a list and makes it the list that
    /// [`append_to_last`](Self::append_to_last) extends.
    pub fn open_list(&mut self, scope: &'static str, key: &str) -> Result<()> {
        let rule = self.rule;
        let mapping = self.at(scope)?;
        let slot = mapping
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        if slot.as_list().is_none() {
            return Err(ParseError::PathConflict {
                rule,
                path: key.to_string(),
                found: slot.kind_name(),
            });
        }
        let path = self.bound_path(scope)?.to_vec();
        self.context.set_last_list(ListCursor {
            path,
            key: key.to_string(),
        });
        Ok(())
    }

    /// Appends `value` to the list `key` under `scope`.
    pub fn append(&mut self, scope: &'static str, key: &str, value: impl Into<Value>) -> Result<()> {
        self.open_list(scope, key)?;
        self.append_to_last(value)
    }

    /// Appends to the list most recently opened, without any new header.
    ///
    /// Fails with [`ParseError::NoOpenList`] when no list is open.
    pub fn append_to_last(&mut self, value: impl Into<Value>) -> Result<()> {
        let rule = self.rule;
        let Some(cursor) = self.context.last_list() else {
            return Err(ParseError::NoOpenList { rule });
        };
        let mapping = resolve(&mut self.output, &cursor.path, rule)?;
        match mapping.get_mut(&cursor.key) {
            Some(Value::List(items)) => {
                items.push(value.into());
                Ok(())
            }
            Some(other) => Err(ParseError::PathConflict {
                rule,
                path: cursor.key.clone(),
                found: other.kind_name(),
            }),
            None => Err(ParseError::NoOpenList { rule }),
        }
    }

    fn bound_path(&self, scope: &'static str) -> Result<&[String]> {
        self.context.path(scope).ok_or(ParseError::UndefinedContext {
            rule: self.rule,
            scope,
        })
    }
}

/// Walks `path` from `output`, creating missing mappings.
fn resolve<'m>(output: &'m mut Mapping, path: &[String], rule: &'static str) -> Result<&'m mut Mapping> {
    let mut current = output;
    for (depth, segment) in path.iter().enumerate() {
        let node = current.entry(segment.clone()).or_insert_with(Value::map);
        let found = node.kind_name();
        current = match node {
            Value::Map(map) => map,
            _ => {
                return Err(ParseError::PathConflict {
                    rule,
                    path: path[..=depth].join("."),
                    found,
                });
            }
        };
    }
    Ok(current)
}

/// Scans `raw` with the table's own options.
pub fn scan(raw: &str, table: &RuleTable, context: Context) -> Result<ScanOutcome> {
    scan_with_options(raw, table, context, table.options())
}

/// Scans `raw`, overriding the table's options.
pub fn scan_with_options(
    raw: &str,
    table: &RuleTable,
    context: Context,
    options: ScanOptions,
) -> Result<ScanOutcome> {
    let mut cursor = Scan::new(context);
    let mut diagnostics = ScanDiagnostics::default();

    for line in normalize_output(raw, options.tab_width) {
        if line.is_empty() {
            continue;
        }
        diagnostics.relevant_lines += 1;
        match table.dispatch(&line, &mut cursor)? {
            Some(rule) => {
                trace!(rule, line = %line, "Rule fired");
                diagnostics.recognized_lines += 1;
            }
            None => {
                trace!(line = %line, "No rule matched");
                diagnostics.unresolved_lines.push(line);
            }
        }
    }

    debug!(
        relevant = diagnostics.relevant_lines,
        recognized = diagnostics.recognized_lines,
        "Scan finished"
    );
    Ok(ScanOutcome {
        output: cursor.into_output(),
        diagnostics,
    })
}

/// Scans `raw` and returns only the output tree.
pub fn parse(raw: &str, table: &RuleTable, context: Context) -> Result<Mapping> {
    scan(raw, table, context).map(|outcome| outcome.output)
}
