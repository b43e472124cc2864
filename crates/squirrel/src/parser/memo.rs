//! Memoization and left-recursion resolution.
//!
//! Every `(clause, position)` pair that is not a rule reference owns one
//! [`MemoEntry`]. Besides caching, the entry detects left recursion (a lookup
//! that re-enters an entry still on the call stack) and resolves it by growing
//! a seed: the clause is re-evaluated until its match stops getting longer.
//!
//! Entries are tagged with the per-position version counter and with the phase
//! that produced them. Growing a seed bumps the version at its position, which
//! invalidates every other entry at that position that may have seen the old
//! seed.

use super::Parser;
use crate::grammar::ClauseId;
use crate::result::MatchResult;
use hashbrown::HashMap;
use tracing::trace;

/// Key for memoization table entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MemoKey {
    clause: ClauseId,
    pos: usize,
}

impl MemoKey {
    #[must_use]
    pub(crate) const fn new(clause: ClauseId, pos: usize) -> Self {
        Self { clause, pos }
    }
}

/// Mutable memo cell for one `(clause, position)`.
#[derive(Debug, Default)]
pub(crate) struct MemoEntry {
    result: Option<MatchResult>,
    /// Set while the clause is being evaluated at this position
    in_rec_path: bool,
    found_left_rec: bool,
    version: u32,
    /// Phase that produced `result`
    cached_in_recovery: bool,
}

/// Memo cells, created lazily on first lookup.
#[derive(Debug, Default)]
pub(crate) struct MemoTable {
    entries: HashMap<MemoKey, MemoEntry, ahash::RandomState>,
}

impl MemoTable {
    pub(crate) fn entry(&mut self, key: MemoKey) -> &mut MemoEntry {
        self.entries.entry(key).or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Parser<'_> {
    /// Match `clause` at `pos` through its memo entry.
    pub(super) fn match_memoized(
        &mut self,
        clause: ClauseId,
        pos: usize,
        bound: Option<ClauseId>,
    ) -> MatchResult {
        let key = MemoKey::new(clause, pos);
        let input_len = self.input.len();
        let in_recovery = self.in_recovery_phase;
        let current_version = self.versions[pos];
        let entry = self.memo.entry(key);

        if let Some(cached) = &entry.result
            && entry.version == current_version
        {
            let phase_matches = entry.cached_in_recovery == in_recovery;
            let complete_success = cached.is_match() && cached.is_complete();
            // A top-level match that fell short of the input is retried when
            // the phase changes, so recovery gets a chance to extend it.
            let retry_top_level = complete_success
                && pos == 0
                && cached.node().is_some_and(|n| n.end() < input_len)
                && !phase_matches;
            if !retry_top_level && ((complete_success && !entry.found_left_rec) || phase_matches) {
                let hit = cached.clone();
                if let Some(stats) = self.stats.as_mut() {
                    stats.record_cache_hit();
                }
                return hit;
            }
        }

        if entry.in_rec_path {
            // Re-entered while still on the call stack: left recursion.
            if entry.result.is_none() {
                entry.found_left_rec = true;
                entry.result = Some(MatchResult::Mismatch);
            }
            return match &entry.result {
                Some(seed @ MatchResult::Matched(_)) => seed.clone(),
                _ => MatchResult::LrPending,
            };
        }

        entry.in_rec_path = true;
        if entry.result.is_some()
            && (entry.version != current_version
                || (entry.found_left_rec && entry.cached_in_recovery != in_recovery))
        {
            entry.result = None;
        }

        loop {
            if let Some(stats) = self.stats.as_mut() {
                stats.record_match();
            }
            let new_result = self.match_uncached(clause, pos, bound);

            let entry = self.memo.entry(key);
            if let Some(previous) = &entry.result
                && new_result.len() <= previous.len()
            {
                break;
            }
            entry.result = Some(new_result);
            if !entry.found_left_rec {
                break;
            }

            self.versions[pos] += 1;
            entry.version = self.versions[pos];
            if let Some(stats) = self.stats.as_mut() {
                stats.record_lr_expansion();
            }
            trace!(
                clause = %self.grammar.display(clause),
                pos,
                len = ?entry.result.as_ref().and_then(MatchResult::len),
                "grew left-recursive seed"
            );
        }

        let version = self.versions[pos];
        let in_recovery = self.in_recovery_phase;
        let entry = self.memo.entry(key);
        entry.in_rec_path = false;
        entry.version = version;
        entry.cached_in_recovery = in_recovery;

        if entry.found_left_rec
            && let Some(result) = &entry.result
            && result.is_match()
            && !result.is_from_lr_context()
        {
            entry.result = Some(result.clone().with_lr_context());
        }
        entry.result.clone().unwrap_or(MatchResult::Mismatch)
    }
}
