use std::time::Duration;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Work counters for a single parse.
///
/// `clause_matches` counts clause evaluations that were not answered from the
/// memo table. For a fixed grammar it grows linearly with input length, which
/// is what the linearity tests check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ParseStats {
    /// Clause evaluations (memo misses)
    pub clause_matches: usize,
    /// Memo table hits
    pub cache_hits: usize,
    /// Extra growth iterations spent on left-recursive rules
    pub lr_expansions: usize,
    /// Recoveries applied in sequences and repetitions
    pub recovery_attempts: usize,
    /// Wall-clock time of the parse
    pub parse_time: Duration,
}

impl ParseStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total work performed: clause evaluations, excluding cache hits.
    #[must_use]
    pub const fn total_work(&self) -> usize {
        self.clause_matches
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn record_match(&mut self) {
        self.clause_matches += 1;
    }

    pub(crate) fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub(crate) fn record_lr_expansion(&mut self) {
        self.lr_expansions += 1;
    }

    pub(crate) fn record_recovery(&mut self) {
        self.recovery_attempts += 1;
    }
}
