//! Recovery search for sequences and repetitions.
//!
//! Only consulted during the recovery phase, after a child failed with a
//! genuine mismatch (never an in-progress left-recursive seed). All lookahead
//! here goes through [`Parser::probe`], so nothing computed while searching is
//! cached under the recovery phase.

use super::Parser;
use super::matching::contains_chars;
use crate::grammar::{Clause, ClauseId};
use crate::result::MatchNode;
use std::sync::Arc;

/// How a sequence resumes after child `i` failed.
#[derive(Debug)]
pub(super) struct SequenceRecovery {
    /// Input units to report as unexpected
    pub input_skip: usize,
    /// Sequence elements to report as missing, starting at the failed one
    pub grammar_skip: usize,
    /// Match of the element the sequence resumes with; `None` ends the sequence
    pub probe: Option<Arc<MatchNode>>,
}

/// How a repetition resumes after an iteration failed.
#[derive(Debug)]
pub(super) struct RepetitionRecovery {
    pub skip: usize,
    /// `None` means the rest of the input was skipped
    pub probe: Option<Arc<MatchNode>>,
}

impl Parser<'_> {
    /// Finds the smallest input skip after which the failed element of
    /// `children` matches again at `curr + skip`.
    ///
    /// Missing elements are only ever assumed at end of input, where all
    /// remaining elements are reported as deleted. Mid-input the search only
    /// skips input, subject to two guards on literals:
    ///
    /// - a failed single-character literal may not skip more than one unit
    ///   over text containing the following literal
    /// - a literal may not be re-matched after skipping more input than its
    ///   own length when that input contains it, and a multi-character
    ///   literal never
    pub(super) fn recover_sequence(
        &mut self,
        children: &[ClauseId],
        i: usize,
        curr: usize,
    ) -> Option<SequenceRecovery> {
        let grammar = self.grammar;
        let input_len = self.input.len();
        let failed = children[i];
        let failed_single_char = matches!(grammar.clause(failed), Clause::Literal(t) if t.len() == 1);
        let next_literal = match children.get(i + 1).map(|&id| grammar.clause(id)) {
            Some(Clause::Literal(text)) => Some(text),
            _ => None,
        };

        if curr >= input_len {
            return Some(SequenceRecovery {
                input_skip: 0,
                grammar_skip: children.len() - i,
                probe: None,
            });
        }

        for input_skip in 1..input_len - curr {
            let skipped = &self.input[curr..curr + input_skip];
            if failed_single_char
                && input_skip > 1
                && next_literal.is_some_and(|next| contains_chars(skipped, next))
            {
                continue;
            }

            let Some(probe) = self.probe(failed, curr + input_skip).into_node() else {
                continue;
            };
            if let Clause::Literal(text) = grammar.clause(failed)
                && input_skip > text.len()
                && (text.len() > 1 || contains_chars(&self.input[curr..curr + input_skip], text))
            {
                continue;
            }
            return Some(SequenceRecovery {
                input_skip,
                grammar_skip: 0,
                probe: Some(probe),
            });
        }
        None
    }

    /// Finds the smallest skip after which `child` matches again. Once the
    /// repetition has already recovered, an unmatched remainder is skipped
    /// whole.
    pub(super) fn recover_repetition(
        &mut self,
        child: ClauseId,
        curr: usize,
        has_recovered: bool,
    ) -> Option<RepetitionRecovery> {
        let input_len = self.input.len();
        for skip in 1..=input_len.saturating_sub(curr) {
            if let Some(probe) = self.probe(child, curr + skip).into_node() {
                return Some(RepetitionRecovery {
                    skip,
                    probe: Some(probe),
                });
            }
        }
        (has_recovered && curr < input_len).then(|| RepetitionRecovery {
            skip: input_len - curr,
            probe: None,
        })
    }

    /// Counts a recovery and invalidates memo entries at `pos`.
    pub(super) fn record_recovery(&mut self, pos: usize) {
        if let Some(stats) = self.stats.as_mut() {
            stats.record_recovery();
        }
        self.versions[pos] += 1;
    }
}
