//! # Parser
//!
//! The two-phase parse driver.
//!
//! ## Overview
//!
//! A [`Parser`] owns everything a single parse mutates: the input (as Unicode
//! scalar values), the memo table, the per-position version counters, and the
//! recovery flag. It borrows the [`Grammar`] read-only. [`Parser::parse`]
//! consumes the parser, so each instance parses exactly once.
//!
//! 1. **Discovery**: the top rule is matched at position 0 with recovery off.
//!    A mismatch-free match of the whole input ends the parse.
//! 2. **Recovery**: otherwise the flag is set and the top rule is matched
//!    again. Memo entries are phase-tagged and versioned, so only
//!    phase-sensitive and left-recursive results are recomputed.
//!
//! The result is finalized into a [`ParseResult`] whose root always spans the
//! whole input, together with any trailing unmatched input.
//!
//! ## Example
//!
//! ```rust
//! use squirrel::grammar::{Expr, GrammarBuilder};
//! use squirrel::parser::Parser;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("S", Expr::seq([Expr::lit("a"), Expr::lit("b"), Expr::lit("c")]))
//!     .build()?;
//!
//! let result = Parser::new(&grammar, "S", "aXbc")?.parse();
//! assert!(result.has_syntax_errors());
//! let errors = result.syntax_errors();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].skipped_text(result.input()), "X");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod matching;
mod memo;
mod parse_result;
mod recovery;
mod stats;

pub use config::ParserConfig;
pub use parse_result::ParseResult;
pub use stats::ParseStats;

use crate::error::ParseError;
use crate::grammar::{ClauseId, Grammar};
use crate::result::{MatchNode, MatchResult};
use compact_str::CompactString;
use memo::MemoTable;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A single-use parse session over one input.
pub struct Parser<'g> {
    grammar: &'g Grammar,
    top_rule: CompactString,
    top_clause: ClauseId,
    source: String,
    input: Vec<char>,
    memo: MemoTable,
    /// Per-position invalidation counters, one more than the input length
    versions: Vec<u32>,
    in_recovery_phase: bool,
    config: ParserConfig,
    stats: Option<ParseStats>,
}

impl<'g> Parser<'g> {
    /// Create a parser with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownRule`] if the grammar has no rule named
    /// `top_rule`.
    pub fn new(grammar: &'g Grammar, top_rule: &str, input: &str) -> Result<Self, ParseError> {
        Self::with_config(grammar, top_rule, input, ParserConfig::default())
    }

    /// Create a parser with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownRule`] if the grammar has no rule named
    /// `top_rule`.
    pub fn with_config(
        grammar: &'g Grammar,
        top_rule: &str,
        input: &str,
        config: ParserConfig,
    ) -> Result<Self, ParseError> {
        let top_clause = grammar
            .rule(top_rule)
            .ok_or_else(|| ParseError::UnknownRule(top_rule.to_string()))?;
        let chars: Vec<char> = input.chars().collect();
        Ok(Self {
            grammar,
            top_rule: CompactString::from(top_rule.strip_prefix('~').unwrap_or(top_rule)),
            top_clause,
            source: input.to_string(),
            versions: vec![0; chars.len() + 1],
            input: chars,
            memo: MemoTable::default(),
            in_recovery_phase: false,
            config,
            stats: config.collect_stats.then(ParseStats::new),
        })
    }

    /// Input length in Unicode scalar values.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    /// Whether the recovery phase is active.
    #[must_use]
    pub const fn in_recovery_phase(&self) -> bool {
        self.in_recovery_phase
    }

    /// Match `clause` at `pos`. Rule references delegate straight to their
    /// target; every other clause goes through its memo entry.
    pub(crate) fn match_clause(
        &mut self,
        clause: ClauseId,
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        if pos > self.input.len() {
            return MatchResult::Mismatch;
        }
        if self.grammar.clause(clause).is_rule_ref() {
            return self.match_uncached(clause, pos, bound);
        }
        self.match_memoized(clause, pos, bound)
    }

    /// Match with the recovery flag forced off, restoring it afterwards.
    pub(crate) fn probe(&mut self, clause: ClauseId, pos: usize) -> MatchResult {
        let saved = self.in_recovery_phase;
        self.in_recovery_phase = false;
        let result = self.match_clause(clause, pos, None);
        self.in_recovery_phase = saved;
        result
    }

    /// Whether `clause` matches a non-empty span at `pos` (probed).
    pub(crate) fn can_match_nonzero_at(&mut self, clause: ClauseId, pos: usize) -> bool {
        self.probe(clause, pos).len().is_some_and(|len| len > 0)
    }

    /// Run both phases and assemble the result.
    #[must_use]
    pub fn parse(mut self) -> ParseResult {
        let start = Instant::now();
        let input_len = self.input.len();
        debug!(rule = %self.top_rule, input_len, "discovery phase");

        let mut result = self.match_clause(self.top_clause, 0, None);
        let spans_input = result
            .node()
            .is_some_and(|n| n.pos() == 0 && n.len() == input_len);
        let has_syntax_errors = !spans_input;

        if has_syntax_errors && self.config.enable_recovery {
            debug!(
                rule = %self.top_rule,
                matched = ?result.len(),
                "discovery incomplete, starting recovery phase"
            );
            self.in_recovery_phase = true;
            result = self.match_clause(self.top_clause, 0, None);
        }

        let (root, unmatched_input) = match result.into_node() {
            Some(node) if node.end() < input_len && has_syntax_errors => {
                let tail = Arc::new(MatchNode::skipped(node.end(), input_len - node.end()));
                (node, Some(tail))
            }
            Some(node) => (node, None),
            None => (Arc::new(MatchNode::skipped(0, input_len)), None),
        };

        let memo_entries = self.memo.len();
        let mut stats = self.stats.take();
        if let Some(stats) = stats.as_mut() {
            stats.parse_time = start.elapsed();
        }
        let result = ParseResult::new(
            self.grammar.clone(),
            self.top_rule,
            self.source,
            root,
            unmatched_input,
            has_syntax_errors,
            stats,
        );
        debug!(
            errors = result.error_count(),
            memo_entries,
            "parse finished"
        );
        result
    }
}

/// Parse `input` with `grammar` starting at `top_rule`, using the default
/// configuration.
///
/// # Errors
///
/// Returns [`ParseError::UnknownRule`] if `top_rule` does not exist.
pub fn parse(grammar: &Grammar, top_rule: &str, input: &str) -> Result<ParseResult, ParseError> {
    Ok(Parser::new(grammar, top_rule, input)?.parse())
}
