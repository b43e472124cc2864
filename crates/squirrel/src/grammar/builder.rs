use super::clause::{Clause, ClauseId};
use super::{Expr, Grammar};
use crate::error::GrammarError;
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use lasso::{Rodeo, Spur};
use smallvec::SmallVec;

/// Builder for constructing grammars
///
/// Rules are collected in order and lowered all at once by [`build`](Self::build),
/// so rules may reference rules defined after them.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<(CompactString, Expr)>,
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Prefix the name with `~` to make the rule transparent.
    #[must_use]
    pub fn rule(mut self, name: impl Into<CompactString>, body: Expr) -> Self {
        self.add_rule(name, body);
        self
    }

    pub fn add_rule(&mut self, name: impl Into<CompactString>, body: Expr) {
        self.rules.push((name.into(), body));
    }

    /// Lower all rules into a clause arena and resolve every rule reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder is empty, a rule is defined twice (or
    /// both with and without `~`), a sequence, choice or character class is
    /// empty, a rule reference names a rule that does not exist, or rules
    /// refer to each other in a cycle of bare references.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::NoRules);
        }

        let mut lowering = Lowering::default();
        let mut rules: HashMap<Spur, ClauseId, ahash::RandomState> = HashMap::default();
        let mut transparency: HashMap<Spur, bool, ahash::RandomState> = HashMap::default();
        let mut rule_order = Vec::with_capacity(self.rules.len());

        for (raw_name, body) in self.rules {
            let (name, transparent) = match raw_name.strip_prefix('~') {
                Some(stripped) => (stripped, true),
                None => (raw_name.as_str(), false),
            };
            let key = lowering.names.get_or_intern(name);
            match transparency.get(&key) {
                Some(&previous) if previous != transparent => {
                    return Err(GrammarError::TransparencyConflict(name.to_string()));
                }
                Some(_) => return Err(GrammarError::DuplicateRule(name.to_string())),
                None => {}
            }
            transparency.insert(key, transparent);

            lowering.rule = CompactString::from(name);
            let id = lowering.lower(body)?;
            rules.insert(key, id);
            rule_order.push(key);
        }

        // Resolve references now that every rule body has an id.
        for (clause_index, rule_name) in std::mem::take(&mut lowering.pending_refs) {
            let resolved = lowering
                .names
                .get(rule_name.as_str())
                .and_then(|key| rules.get(&key).copied());
            let Some(body) = resolved else {
                return Err(GrammarError::UndefinedRule(rule_name.to_string()));
            };
            if let Clause::RuleRef { target, .. } = &mut lowering.clauses[clause_index] {
                *target = body;
            }
        }

        for &key in &rule_order {
            let Some(&start) = rules.get(&key) else {
                continue;
            };
            if lowering.is_reference_cycle(start) {
                return Err(GrammarError::CyclicReference(
                    lowering.names.resolve(&key).to_string(),
                ));
            }
        }

        let transparent: HashSet<Spur, ahash::RandomState> = transparency
            .into_iter()
            .filter_map(|(key, transparent)| transparent.then_some(key))
            .collect();

        let grammar = Grammar::from_parts(
            lowering.clauses,
            rules,
            rule_order,
            transparent,
            lowering.names.into_reader(),
        );
        tracing::debug!(
            rules = grammar.rule_names().count(),
            clauses = grammar.clause_count(),
            "built grammar"
        );
        Ok(grammar)
    }
}

#[derive(Default)]
struct Lowering {
    clauses: Vec<Clause>,
    names: Rodeo,
    /// Arena index of each `RuleRef` and the (unprefixed) name it points at
    pending_refs: Vec<(usize, CompactString)>,
    /// Rule currently being lowered, for error messages
    rule: CompactString,
}

impl Lowering {
    fn push(&mut self, clause: Clause) -> ClauseId {
        let id = ClauseId::new(self.clauses.len());
        self.clauses.push(clause);
        id
    }

    /// Whether following rule bodies that are bare references from `start`
    /// comes back around without ever reaching a matching clause.
    fn is_reference_cycle(&self, start: ClauseId) -> bool {
        let mut seen: HashSet<ClauseId, ahash::RandomState> = HashSet::default();
        let mut current = start;
        while let Clause::RuleRef { target, .. } = &self.clauses[current.index()] {
            if !seen.insert(current) {
                return true;
            }
            current = *target;
        }
        false
    }

    fn empty_clause(&self, kind: &'static str) -> GrammarError {
        GrammarError::EmptyClause {
            rule: self.rule.to_string(),
            kind,
        }
    }

    fn lower_all(
        &mut self,
        exprs: Vec<Expr>,
        kind: &'static str,
    ) -> Result<SmallVec<[ClauseId; 4]>, GrammarError> {
        if exprs.is_empty() {
            return Err(self.empty_clause(kind));
        }
        exprs.into_iter().map(|e| self.lower(e)).collect()
    }

    /// Every `Expr` node becomes its own clause, children before parents.
    fn lower(&mut self, expr: Expr) -> Result<ClauseId, GrammarError> {
        let clause = match expr {
            Expr::Literal(text) => Clause::Literal(text.chars().collect()),
            Expr::Char(c) => Clause::Char(c),
            Expr::CharSet { ranges, inverted } => {
                if ranges.is_empty() {
                    return Err(self.empty_clause("character class"));
                }
                Clause::CharSet {
                    ranges: ranges.into_iter().collect(),
                    inverted,
                }
            }
            Expr::AnyChar => Clause::AnyChar,
            Expr::Empty => Clause::Empty,
            Expr::Seq(exprs) => Clause::Sequence(self.lower_all(exprs, "sequence")?),
            Expr::First(exprs) => Clause::OrderedChoice(self.lower_all(exprs, "choice")?),
            Expr::Repeat { expr, one_or_more } => Clause::Repetition {
                child: self.lower(*expr)?,
                one_or_more,
            },
            Expr::Opt(expr) => Clause::Optional(self.lower(*expr)?),
            Expr::FollowedBy(expr) => Clause::PositiveLookahead(self.lower(*expr)?),
            Expr::NotFollowedBy(expr) => Clause::NegativeLookahead(self.lower(*expr)?),
            Expr::Rule(name) => {
                let name = CompactString::from(name.strip_prefix('~').unwrap_or(&name));
                let key = self.names.get_or_intern(name.as_str());
                self.pending_refs.push((self.clauses.len(), name));
                // Target is patched once all rule bodies are lowered.
                Clause::RuleRef {
                    name: key,
                    target: ClauseId::new(0),
                }
            }
        };
        Ok(self.push(clause))
    }
}
