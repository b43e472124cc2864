//! # Grammar
//!
//! Grammar definition and the clause arena the parser runs against.
//!
//! ## Overview
//!
//! A grammar is a set of named rules. Rules are written as [`Expr`] trees,
//! collected with a [`GrammarBuilder`], and lowered into an immutable
//! [`Grammar`]: a flat arena of [`Clause`]s addressed by [`ClauseId`], with
//! every rule reference resolved eagerly. A grammar is cheap to clone and can
//! be reused, read-only, by any number of parses.
//!
//! Rule names starting with `~` mark the rule *transparent*. The prefix is
//! stripped before storage; transparency only affects AST construction
//! ([`crate::tree`]), never matching.
//!
//! ## Example
//!
//! ```rust
//! use squirrel::grammar::{Expr, GrammarBuilder};
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("Sum", Expr::first([
//!         Expr::seq([Expr::rule("Sum"), Expr::lit("+"), Expr::rule("Num")]),
//!         Expr::rule("Num"),
//!     ]))
//!     .rule("Num", Expr::plus(Expr::range('0', '9')))
//!     .build()
//!     .expect("valid grammar");
//!
//! assert!(grammar.rule("Sum").is_some());
//! ```

mod builder;
mod clause;
pub mod escape;
mod expr;

pub use builder::GrammarBuilder;
pub use clause::{CharRange, Clause, ClauseId};
pub use expr::Expr;

use escape::{escape_char, escape_string};
use hashbrown::{HashMap, HashSet};
use lasso::{RodeoReader, Spur};
use std::fmt;
use std::sync::Arc;

/// An immutable, validated grammar.
///
/// Cloning shares the underlying arena.
#[derive(Clone)]
pub struct Grammar {
    inner: Arc<GrammarInner>,
}

struct GrammarInner {
    clauses: Vec<Clause>,
    /// Rule name -> body clause
    rules: HashMap<Spur, ClauseId, ahash::RandomState>,
    /// Definition order, for deterministic listing and printing
    rule_order: Vec<Spur>,
    transparent: HashSet<Spur, ahash::RandomState>,
    names: RodeoReader,
}

impl Grammar {
    pub(crate) fn from_parts(
        clauses: Vec<Clause>,
        rules: HashMap<Spur, ClauseId, ahash::RandomState>,
        rule_order: Vec<Spur>,
        transparent: HashSet<Spur, ahash::RandomState>,
        names: RodeoReader,
    ) -> Self {
        Self {
            inner: Arc::new(GrammarInner {
                clauses,
                rules,
                rule_order,
                transparent,
                names,
            }),
        }
    }

    /// The clause stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was produced by a different grammar.
    #[must_use]
    pub fn clause(&self, id: ClauseId) -> &Clause {
        &self.inner.clauses[id.index()]
    }

    /// Number of clauses in the arena.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.inner.clauses.len()
    }

    /// Body clause of the named rule. A leading `~` is ignored.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<ClauseId> {
        let name = name.strip_prefix('~').unwrap_or(name);
        let key = self.inner.names.get(name)?;
        self.inner.rules.get(&key).copied()
    }

    /// Rule names in definition order, without the `~` prefix.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner
            .rule_order
            .iter()
            .map(|key| self.inner.names.resolve(key))
    }

    /// Whether the named rule was declared with a `~` prefix.
    #[must_use]
    pub fn is_transparent(&self, name: &str) -> bool {
        self.inner
            .names
            .get(name)
            .is_some_and(|key| self.inner.transparent.contains(&key))
    }

    /// Transparent rule names in definition order.
    pub fn transparent_rules(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner
            .rule_order
            .iter()
            .filter(|key| self.inner.transparent.contains(*key))
            .map(|key| self.inner.names.resolve(key))
    }

    /// Rule name referenced by `id`, if `id` is a rule reference.
    #[must_use]
    pub fn rule_name(&self, id: ClauseId) -> Option<&str> {
        match self.clause(id) {
            Clause::RuleRef { name, .. } => Some(self.inner.names.resolve(name)),
            _ => None,
        }
    }

    /// Rule name referenced by `id` when that rule is not transparent.
    #[must_use]
    pub(crate) fn visible_rule_name(&self, id: ClauseId) -> Option<&str> {
        match self.clause(id) {
            Clause::RuleRef { name, .. } if !self.inner.transparent.contains(name) => {
                Some(self.inner.names.resolve(name))
            }
            _ => None,
        }
    }

    /// Grammar-notation rendering of a clause.
    #[must_use]
    pub fn display(&self, id: ClauseId) -> ClauseDisplay<'_> {
        ClauseDisplay { grammar: self, id }
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .field("clauses", &self.clause_count())
            .finish()
    }
}

/// Prints every rule in definition order, one per line, in the notation
/// accepted by [`Grammar::from_spec`].
impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.inner.rule_order {
            let name = self.inner.names.resolve(key);
            let tilde = if self.inner.transparent.contains(key) {
                "~"
            } else {
                ""
            };
            let body = self.inner.rules[key];
            writeln!(f, "{tilde}{name} <- {} ;", self.display(body))?;
        }
        Ok(())
    }
}

/// See [`Grammar::display`].
pub struct ClauseDisplay<'a> {
    grammar: &'a Grammar,
    id: ClauseId,
}

impl ClauseDisplay<'_> {
    fn child(&self, id: ClauseId) -> Self {
        Self {
            grammar: self.grammar,
            id,
        }
    }

    fn join(&self, f: &mut fmt::Formatter<'_>, ids: &[ClauseId], sep: &str) -> fmt::Result {
        f.write_str("(")?;
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", self.child(*id))?;
        }
        f.write_str(")")
    }
}

fn class_char(c: char) -> String {
    match c {
        '[' | ']' | '-' => format!("\\{c}"),
        c => escape_char(c),
    }
}

impl fmt::Display for ClauseDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.grammar.clause(self.id) {
            Clause::Literal(chars) => {
                let text: String = chars.iter().collect();
                write!(f, "\"{}\"", escape_string(&text))
            }
            Clause::Char(c) => write!(f, "'{}'", escape_char(*c)),
            Clause::CharSet { ranges, inverted } => {
                f.write_str(if *inverted { "[^" } else { "[" })?;
                for r in ranges {
                    if r.lo == r.hi {
                        f.write_str(&class_char(r.lo))?;
                    } else {
                        write!(f, "{}-{}", class_char(r.lo), class_char(r.hi))?;
                    }
                }
                f.write_str("]")
            }
            Clause::AnyChar => f.write_str("."),
            Clause::Empty => f.write_str("()"),
            Clause::Sequence(ids) => self.join(f, ids, " "),
            Clause::OrderedChoice(ids) => self.join(f, ids, " / "),
            Clause::Repetition { child, one_or_more } => {
                let op = if *one_or_more { '+' } else { '*' };
                write!(f, "{}{op}", self.child(*child))
            }
            Clause::Optional(child) => write!(f, "{}?", self.child(*child)),
            Clause::RuleRef { name, .. } => f.write_str(self.grammar.inner.names.resolve(name)),
            Clause::PositiveLookahead(child) => write!(f, "&{}", self.child(*child)),
            Clause::NegativeLookahead(child) => write!(f, "!{}", self.child(*child)),
        }
    }
}
