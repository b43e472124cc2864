//! Grammar expressions
//!
//! [`Expr`] is the owned, tree-shaped form of a rule body. It is what users
//! (and the meta-grammar) write; [`GrammarBuilder::build`](super::GrammarBuilder::build)
//! lowers it into arena [`Clause`](super::Clause)s.

use super::clause::CharRange;
use compact_str::CompactString;

/// Grammar expression representing a rule body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Match an exact string
    Literal(CompactString),
    /// Match a single character
    Char(char),
    /// Match one character against a set of ranges
    CharSet {
        ranges: Vec<CharRange>,
        inverted: bool,
    },
    /// Match any single character
    AnyChar,
    /// Match nothing, always succeeding
    Empty,
    /// Match each expression in order
    Seq(Vec<Expr>),
    /// Ordered choice: the first alternative that matches
    First(Vec<Expr>),
    /// Zero-or-more (`one_or_more == false`) or one-or-more repetition
    Repeat { expr: Box<Expr>, one_or_more: bool },
    /// Optional expression
    Opt(Box<Expr>),
    /// Reference a rule by name
    Rule(CompactString),
    /// Positive lookahead
    FollowedBy(Box<Expr>),
    /// Negative lookahead
    NotFollowedBy(Box<Expr>),
}

// Builder methods
impl Expr {
    /// Create a string literal expression
    #[must_use]
    pub fn lit(text: impl Into<CompactString>) -> Self {
        Self::Literal(text.into())
    }

    /// Create a single character expression
    #[must_use]
    pub const fn chr(c: char) -> Self {
        Self::Char(c)
    }

    /// Create a character class over an inclusive range, `[lo-hi]`
    #[must_use]
    pub fn range(lo: char, hi: char) -> Self {
        Self::class([CharRange::new(lo, hi)])
    }

    /// Create a character class
    #[must_use]
    pub fn class<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = CharRange>,
    {
        Self::CharSet {
            ranges: ranges.into_iter().collect(),
            inverted: false,
        }
    }

    /// Create an inverted character class, `[^...]`
    #[must_use]
    pub fn not_class<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = CharRange>,
    {
        Self::CharSet {
            ranges: ranges.into_iter().collect(),
            inverted: true,
        }
    }

    /// Create an any-character expression
    #[must_use]
    pub const fn any() -> Self {
        Self::AnyChar
    }

    /// Create an empty expression
    #[must_use]
    pub const fn empty() -> Self {
        Self::Empty
    }

    /// Create a sequence expression
    #[must_use]
    pub fn seq<I>(exprs: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::Seq(exprs.into_iter().collect())
    }

    /// Create an ordered choice expression
    #[must_use]
    pub fn first<I>(exprs: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::First(exprs.into_iter().collect())
    }

    /// Create a Kleene star expression (zero or more)
    #[must_use]
    pub fn star(expr: Self) -> Self {
        Self::Repeat {
            expr: Box::new(expr),
            one_or_more: false,
        }
    }

    /// Create a Kleene plus expression (one or more)
    #[must_use]
    pub fn plus(expr: Self) -> Self {
        Self::Repeat {
            expr: Box::new(expr),
            one_or_more: true,
        }
    }

    /// Create an optional expression
    #[must_use]
    pub fn opt(expr: Self) -> Self {
        Self::Opt(Box::new(expr))
    }

    /// Create a rule reference
    #[must_use]
    pub fn rule(name: impl Into<CompactString>) -> Self {
        Self::Rule(name.into())
    }

    /// Create a positive lookahead, `&expr`
    #[must_use]
    pub fn followed_by(expr: Self) -> Self {
        Self::FollowedBy(Box::new(expr))
    }

    /// Create a negative lookahead, `!expr`
    #[must_use]
    pub fn not_followed_by(expr: Self) -> Self {
        Self::NotFollowedBy(Box::new(expr))
    }
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        Self::lit(text)
    }
}

impl From<char> for Expr {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}
