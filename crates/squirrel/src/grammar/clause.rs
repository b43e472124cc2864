//! Lowered grammar clauses.
//!
//! A [`Clause`] is one node of a built grammar. Clauses live in an arena owned
//! by [`Grammar`](super::Grammar) and refer to each other by [`ClauseId`], so
//! recursive rules form a graph without reference cycles. Clause identity (the
//! id) rather than structure is what the parser memoizes on: two textually
//! identical sub-expressions get two ids and two sets of memo entries.

use lasso::Spur;
use smallvec::SmallVec;
use std::fmt;

/// Stable index of a clause inside its grammar's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseId(u32);

impl ClauseId {
    #[must_use]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of this clause in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inclusive character range used by character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharRange {
    pub lo: char,
    pub hi: char,
}

impl CharRange {
    #[must_use]
    pub const fn new(lo: char, hi: char) -> Self {
        Self { lo, hi }
    }

    #[must_use]
    pub const fn single(c: char) -> Self {
        Self { lo: c, hi: c }
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.lo <= c && c <= self.hi
    }
}

/// A grammar node.
///
/// Terminals match a pure function of the input at a position; combinators
/// delegate to their children through the parser so that every non-reference
/// clause is memoized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Exact character sequence.
    Literal(Box<[char]>),
    /// A single character.
    Char(char),
    /// One character inside (or, when inverted, outside) any of the ranges.
    CharSet {
        ranges: SmallVec<[CharRange; 4]>,
        inverted: bool,
    },
    /// Any single character.
    AnyChar,
    /// Always matches, consuming nothing.
    Empty,
    Sequence(SmallVec<[ClauseId; 4]>),
    /// PEG ordered choice: the first matching alternative wins.
    OrderedChoice(SmallVec<[ClauseId; 4]>),
    /// `child*` when `one_or_more` is false, `child+` otherwise.
    Repetition { child: ClauseId, one_or_more: bool },
    Optional(ClauseId),
    /// Reference to a named rule, resolved to the rule's body at build time.
    RuleRef { name: Spur, target: ClauseId },
    PositiveLookahead(ClauseId),
    NegativeLookahead(ClauseId),
}

impl Clause {
    /// Terminals consume input directly and never recurse into the parser.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Literal(_) | Self::Char(_) | Self::CharSet { .. } | Self::AnyChar | Self::Empty
        )
    }

    #[must_use]
    pub const fn is_rule_ref(&self) -> bool {
        matches!(self, Self::RuleRef { .. })
    }

    /// Direct sub-clauses, in match order. A rule reference reports its target.
    #[must_use]
    pub fn children(&self) -> &[ClauseId] {
        match self {
            Self::Sequence(ids) | Self::OrderedChoice(ids) => ids,
            Self::Repetition { child, .. }
            | Self::Optional(child)
            | Self::PositiveLookahead(child)
            | Self::NegativeLookahead(child) => std::slice::from_ref(child),
            Self::RuleRef { target, .. } => std::slice::from_ref(target),
            Self::Literal(_) | Self::Char(_) | Self::CharSet { .. } | Self::AnyChar | Self::Empty => {
                &[]
            }
        }
    }

    /// Whether a character class accepts `c`.
    pub(crate) fn class_accepts(ranges: &[CharRange], inverted: bool, c: char) -> bool {
        ranges.iter().any(|r| r.contains(c)) != inverted
    }
}
