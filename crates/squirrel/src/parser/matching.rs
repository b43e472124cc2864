//! Clause matching.
//!
//! One dispatch function, [`Parser::match_uncached`], implements every clause
//! kind. Combinators call back into [`Parser::match_clause`] for their
//! children so that each child goes through the memo table.

use super::Parser;
use crate::grammar::{Clause, ClauseId};
use crate::result::{Children, MatchNode, MatchResult};
use std::sync::Arc;
use tracing::trace;

/// Alternatives at or above this error rate lose to any alternative below it.
const ERROR_RATE_THRESHOLD: f64 = 0.5;

impl Parser<'_> {
    /// Evaluate `id` at `pos`, bypassing the memo table for `id` itself.
    pub(super) fn match_uncached(
        &mut self,
        id: ClauseId,
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        let grammar = self.grammar;
        match grammar.clause(id) {
            Clause::Literal(text) => self.match_literal(id, text, pos),
            Clause::Char(expected) => self.match_one_char(id, pos, |c| c == *expected),
            Clause::CharSet { ranges, inverted } => self.match_one_char(id, pos, |c| {
                Clause::class_accepts(ranges.as_slice(), *inverted, c)
            }),
            Clause::AnyChar => self.match_one_char(id, pos, |_| true),
            Clause::Empty => MatchResult::matched(MatchNode::terminal(id, pos, 0)),
            Clause::Sequence(children) => self.match_sequence(id, children, pos, bound),
            Clause::OrderedChoice(children) => self.match_first(id, children, pos, bound),
            Clause::Repetition { child, one_or_more } => {
                self.match_repetition(id, *child, *one_or_more, pos, bound)
            }
            Clause::Optional(child) => self.match_optional(id, *child, pos, bound),
            Clause::RuleRef { target, .. } => self.match_rule_ref(id, *target, pos, bound),
            Clause::PositiveLookahead(child) => {
                if self.match_clause(*child, pos, bound).is_match() {
                    MatchResult::matched(MatchNode::terminal(id, pos, 0))
                } else {
                    MatchResult::Mismatch
                }
            }
            Clause::NegativeLookahead(child) => {
                if self.match_clause(*child, pos, bound).is_mismatch() {
                    MatchResult::matched(MatchNode::terminal(id, pos, 0))
                } else {
                    MatchResult::Mismatch
                }
            }
        }
    }

    fn match_literal(&self, id: ClauseId, text: &[char], pos: usize) -> MatchResult {
        match self.input.get(pos..pos + text.len()) {
            Some(window) if window == text => {
                MatchResult::matched(MatchNode::terminal(id, pos, text.len()))
            }
            _ => MatchResult::Mismatch,
        }
    }

    fn match_one_char(
        &self,
        id: ClauseId,
        pos: usize,
        accepts: impl Fn(char) -> bool,
    ) -> MatchResult {
        match self.input.get(pos) {
            Some(&c) if accepts(c) => MatchResult::matched(MatchNode::terminal(id, pos, 1)),
            _ => MatchResult::Mismatch,
        }
    }

    fn match_sequence(
        &mut self,
        id: ClauseId,
        children: &[ClauseId],
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        let mut matches = Children::new();
        let mut curr = pos;
        let mut i = 0;
        while i < children.len() {
            // During recovery each element is bounded by its successor, so a
            // repetition stops before swallowing the delimiter that follows.
            let child_bound = match children.get(i + 1) {
                Some(&next) if self.in_recovery_phase => Some(next),
                _ => bound,
            };
            let result = self.match_clause(children[i], curr, child_bound);
            let failed = match result {
                MatchResult::Matched(node) => {
                    curr += node.len();
                    matches.push(node);
                    i += 1;
                    continue;
                }
                failed => failed,
            };

            if self.in_recovery_phase && !failed.is_from_lr_context() {
                if let Some(recovery) = self.recover_sequence(children, i, curr) {
                    self.record_recovery(curr);
                    trace!(
                        clause = %self.grammar.display(id),
                        pos = curr,
                        input_skip = recovery.input_skip,
                        grammar_skip = recovery.grammar_skip,
                        "sequence recovery"
                    );
                    if recovery.input_skip > 0 {
                        matches.push(Arc::new(MatchNode::skipped(curr, recovery.input_skip)));
                    }
                    let resume = curr + recovery.input_skip;
                    for deleted in &children[i..i + recovery.grammar_skip] {
                        matches.push(Arc::new(MatchNode::deleted(resume, *deleted)));
                    }
                    match recovery.probe {
                        Some(probe) => {
                            curr = resume + probe.len();
                            matches.push(probe);
                            i += recovery.grammar_skip + 1;
                            continue;
                        }
                        None => break,
                    }
                }
            }
            return MatchResult::Mismatch;
        }

        if matches.is_empty() {
            return MatchResult::matched(MatchNode::empty(id, pos, true));
        }
        let complete = matches.iter().all(|m| m.is_complete());
        MatchResult::matched(MatchNode::wrap(id, matches, complete))
    }

    fn match_first(
        &mut self,
        id: ClauseId,
        alternatives: &[ClauseId],
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        for (i, &alternative) in alternatives.iter().enumerate() {
            let Some(node) = self.match_clause(alternative, pos, bound).into_node() else {
                continue;
            };
            let chosen = if self.in_recovery_phase && i == 0 && node.total_errors() > 0 {
                self.best_alternative(&alternatives[1..], node, pos, bound)
            } else {
                node
            };
            let complete = chosen.is_complete();
            return MatchResult::matched(MatchNode::wrap_one(id, chosen, complete));
        }
        MatchResult::Mismatch
    }

    /// Compares a recovered first alternative against the remaining ones and
    /// keeps the most plausible.
    fn best_alternative(
        &mut self,
        rest: &[ClauseId],
        first: Arc<MatchNode>,
        pos: usize,
        bound: Option<ClauseId>,
    ) -> Arc<MatchNode> {
        let mut best = first;
        for &alternative in rest {
            let Some(candidate) = self.match_clause(alternative, pos, bound).into_node() else {
                continue;
            };
            let best_rate = error_rate(&best);
            let candidate_rate = error_rate(&candidate);
            let better = (best_rate >= ERROR_RATE_THRESHOLD && candidate_rate < ERROR_RATE_THRESHOLD)
                || candidate.len() > best.len()
                || (candidate.len() == best.len() && candidate.total_errors() < best.total_errors());
            let (candidate_len, candidate_errors) = (candidate.len(), candidate.total_errors());
            if better {
                best = candidate;
            }
            if candidate_errors == 0 && candidate_len >= best.len() {
                break;
            }
        }
        best
    }

    fn match_repetition(
        &mut self,
        id: ClauseId,
        child: ClauseId,
        one_or_more: bool,
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        let input_len = self.input.len();
        let mut matches = Children::new();
        let mut curr = pos;
        let mut incomplete = false;
        let mut has_recovered = false;

        while curr <= input_len {
            if self.in_recovery_phase
                && let Some(bound) = bound
                && self.can_match_nonzero_at(bound, curr)
            {
                break;
            }

            let node = match self.match_clause(child, curr, None) {
                MatchResult::Matched(node) => node,
                _ => {
                    if !self.in_recovery_phase && curr < input_len {
                        incomplete = true;
                    }
                    if self.in_recovery_phase
                        && let Some(recovery) = self.recover_repetition(child, curr, has_recovered)
                    {
                        self.record_recovery(curr);
                        trace!(
                            clause = %self.grammar.display(id),
                            pos = curr,
                            skip = recovery.skip,
                            resumed = recovery.probe.is_some(),
                            "repetition recovery"
                        );
                        matches.push(Arc::new(MatchNode::skipped(curr, recovery.skip)));
                        has_recovered = true;
                        if let Some(probe) = recovery.probe {
                            curr += recovery.skip + probe.len();
                            matches.push(probe);
                            continue;
                        }
                    }
                    break;
                }
            };
            if node.is_empty() {
                break;
            }
            curr += node.len();
            matches.push(node);
        }

        if matches.is_empty() {
            return if one_or_more {
                MatchResult::Mismatch
            } else {
                MatchResult::matched(MatchNode::empty(id, pos, !incomplete))
            };
        }
        let complete = !incomplete && matches.iter().all(|m| m.is_complete());
        MatchResult::matched(MatchNode::wrap(id, matches, complete))
    }

    fn match_optional(
        &mut self,
        id: ClauseId,
        child: ClauseId,
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        match self.match_clause(child, pos, bound) {
            MatchResult::Matched(node) => {
                let complete = node.is_complete();
                MatchResult::matched(MatchNode::wrap_one(id, node, complete))
            }
            _ => {
                let incomplete = !self.in_recovery_phase && pos < self.input.len();
                MatchResult::matched(MatchNode::empty(id, pos, !incomplete))
            }
        }
    }

    /// Rule references are not memoized themselves; the memo entry belongs to
    /// the rule body, shared by every reference to it.
    fn match_rule_ref(
        &mut self,
        id: ClauseId,
        target: ClauseId,
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        match self.match_clause(target, pos, bound) {
            MatchResult::Matched(node) => {
                let complete = node.is_complete();
                MatchResult::matched(MatchNode::wrap_one(id, node, complete))
            }
            // LrPending must reach the caller unchanged.
            failed => failed,
        }
    }
}

fn error_rate(node: &MatchNode) -> f64 {
    if node.is_empty() {
        0.0
    } else {
        node.total_errors() as f64 / node.len() as f64
    }
}

/// Whether `needle` occurs anywhere in `haystack`; the empty needle always does.
pub(super) fn contains_chars(haystack: &[char], needle: &[char]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}
