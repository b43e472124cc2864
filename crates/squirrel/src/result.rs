//! # Match Results
//!
//! The value type every clause match produces.
//!
//! ## Overview
//!
//! A [`MatchResult`] is one of:
//!
//! - [`MatchResult::Mismatch`]: the clause did not match
//! - [`MatchResult::LrPending`]: the clause is a left-recursive rule whose
//!   seed is still being grown. Callers treat it as a failure, but one that
//!   must not trigger recovery
//! - [`MatchResult::Matched`]: a shared [`MatchNode`]
//!
//! Nodes are reference counted because memoized results are adopted as
//! children by every parent that matches through the same `(clause, position)`.
//! A node is either a clause match or a syntax error: skipped input
//! (`len > 0`) or a grammar element assumed present at end of input
//! (`len == 0`, carrying the deleted clause).

use crate::grammar::{ClauseId, Grammar};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Children of a match node.
pub type Children = SmallVec<[Arc<MatchNode>; 2]>;

/// What produced a [`MatchNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Clause(ClauseId),
    /// Recovery output. `deleted` is set for zero-length errors.
    SyntaxError { deleted: Option<ClauseId> },
}

/// A successful match, or a syntax error standing in for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchNode {
    kind: NodeKind,
    pos: usize,
    len: usize,
    children: Children,
    is_complete: bool,
    is_from_lr_context: bool,
    total_errors: usize,
}

impl MatchNode {
    /// Leaf match of `clause` covering `[pos, pos + len)`.
    #[must_use]
    pub fn terminal(clause: ClauseId, pos: usize, len: usize) -> Self {
        Self {
            kind: NodeKind::Clause(clause),
            pos,
            len,
            children: Children::new(),
            is_complete: true,
            is_from_lr_context: false,
            total_errors: 0,
        }
    }

    /// Zero-length match with no children.
    #[must_use]
    pub fn empty(clause: ClauseId, pos: usize, is_complete: bool) -> Self {
        Self {
            is_complete,
            ..Self::terminal(clause, pos, 0)
        }
    }

    /// Wraps a non-empty list of child matches; the span runs from the first
    /// child's start to the last child's end.
    #[must_use]
    pub fn wrap(clause: ClauseId, children: Children, is_complete: bool) -> Self {
        debug_assert!(!children.is_empty(), "wrap requires children");
        let (pos, len) = match (children.first(), children.last()) {
            (Some(first), Some(last)) => (first.pos, last.end() - first.pos),
            _ => (0, 0),
        };
        Self {
            kind: NodeKind::Clause(clause),
            pos,
            len,
            is_from_lr_context: children.iter().any(|c| c.is_from_lr_context),
            total_errors: children.iter().map(|c| c.total_errors).sum(),
            children,
            is_complete,
        }
    }

    /// Wraps a single child.
    #[must_use]
    pub fn wrap_one(clause: ClauseId, child: Arc<Self>, is_complete: bool) -> Self {
        let mut children = Children::new();
        children.push(child);
        Self::wrap(clause, children, is_complete)
    }

    /// `len` units of unexpected input at `pos`.
    #[must_use]
    pub fn skipped(pos: usize, len: usize) -> Self {
        Self::syntax_error(pos, len, None)
    }

    /// `clause` treated as matched at `pos` without consuming input.
    #[must_use]
    pub fn deleted(pos: usize, clause: ClauseId) -> Self {
        Self::syntax_error(pos, 0, Some(clause))
    }

    fn syntax_error(pos: usize, len: usize, deleted: Option<ClauseId>) -> Self {
        Self {
            kind: NodeKind::SyntaxError { deleted },
            pos,
            len,
            children: Children::new(),
            is_complete: true,
            is_from_lr_context: false,
            total_errors: 1,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The clause that produced this node; for a deletion, the deleted clause.
    #[must_use]
    pub const fn clause(&self) -> Option<ClauseId> {
        match self.kind {
            NodeKind::Clause(id) => Some(id),
            NodeKind::SyntaxError { deleted } => deleted,
        }
    }

    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.pos + self.len
    }

    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    /// False when the match stopped where, outside recovery, more input
    /// could have been consumed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.is_complete
    }

    #[must_use]
    pub const fn is_from_lr_context(&self) -> bool {
        self.is_from_lr_context
    }

    /// Syntax errors in this subtree, this node included.
    #[must_use]
    pub const fn total_errors(&self) -> usize {
        self.total_errors
    }

    #[must_use]
    pub const fn is_syntax_error(&self) -> bool {
        matches!(self.kind, NodeKind::SyntaxError { .. })
    }

    /// Structured view of this node when it is a syntax error.
    #[must_use]
    pub const fn as_syntax_error(&self) -> Option<SyntaxError> {
        match self.kind {
            NodeKind::SyntaxError { deleted } => Some(SyntaxError {
                pos: self.pos,
                len: self.len,
                deleted_clause: deleted,
            }),
            NodeKind::Clause(_) => None,
        }
    }

    /// Appends every syntax error in this subtree to `out`, in document order.
    pub fn collect_syntax_errors(&self, out: &mut Vec<SyntaxError>) {
        if let Some(error) = self.as_syntax_error() {
            out.push(error);
            return;
        }
        for child in &self.children {
            child.collect_syntax_errors(out);
        }
    }

    /// Indented dump of the match tree: rule references by name, other
    /// clauses by kind, leaves with their matched text.
    #[must_use]
    pub fn to_pretty_string(&self, input: &str, grammar: &Grammar) -> String {
        let chars: Vec<char> = input.chars().collect();
        let mut out = String::new();
        self.write_pretty(&chars, grammar, 0, &mut out);
        out
    }

    fn write_pretty(&self, input: &[char], grammar: &Grammar, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        if let Some(error) = self.as_syntax_error() {
            out.push_str("<SyntaxError>: ");
            out.push_str(&error.describe(grammar));
            out.push('\n');
            return;
        }
        if let NodeKind::Clause(id) = self.kind {
            match grammar.rule_name(id) {
                Some(name) => out.push_str(name),
                None => out.push_str(clause_kind_name(grammar, id)),
            }
        }
        if self.children.is_empty() {
            let end = self.end().min(input.len());
            let text: String = input[self.pos.min(end)..end].iter().collect();
            out.push_str(&format!(": \"{text}\""));
        }
        out.push('\n');
        for child in &self.children {
            child.write_pretty(input, grammar, depth + 1, out);
        }
    }
}

fn clause_kind_name(grammar: &Grammar, id: ClauseId) -> &'static str {
    use crate::grammar::Clause;
    match grammar.clause(id) {
        Clause::Literal(_) => "Literal",
        Clause::Char(_) => "Char",
        Clause::CharSet { .. } => "CharSet",
        Clause::AnyChar => "AnyChar",
        Clause::Empty => "Empty",
        Clause::Sequence(_) => "Sequence",
        Clause::OrderedChoice(_) => "OrderedChoice",
        Clause::Repetition {
            one_or_more: true, ..
        } => "OneOrMore",
        Clause::Repetition { .. } => "ZeroOrMore",
        Clause::Optional(_) => "Optional",
        Clause::RuleRef { .. } => "RuleRef",
        Clause::PositiveLookahead(_) => "FollowedBy",
        Clause::NegativeLookahead(_) => "NotFollowedBy",
    }
}

/// Outcome of matching a clause at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Mismatch,
    /// A left-recursive seed that has not been grown yet.
    LrPending,
    Matched(Arc<MatchNode>),
}

impl MatchResult {
    #[must_use]
    pub fn matched(node: MatchNode) -> Self {
        Self::Matched(Arc::new(node))
    }

    /// Both sentinels count as mismatches.
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        !matches!(self, Self::Matched(_))
    }

    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    #[must_use]
    pub fn node(&self) -> Option<&Arc<MatchNode>> {
        match self {
            Self::Matched(node) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_node(self) -> Option<Arc<MatchNode>> {
        match self {
            Self::Matched(node) => Some(node),
            _ => None,
        }
    }

    /// Matched length; `None` for either sentinel, which orders below any
    /// real length.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.node().map(|n| n.len)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.node().is_some_and(|n| n.is_complete)
    }

    /// [`MatchNode::to_pretty_string`], or `MISMATCH` for either sentinel.
    #[must_use]
    pub fn to_pretty_string(&self, input: &str, grammar: &Grammar) -> String {
        match self.node() {
            Some(node) => node.to_pretty_string(input, grammar),
            None => "MISMATCH\n".to_string(),
        }
    }

    #[must_use]
    pub fn is_from_lr_context(&self) -> bool {
        match self {
            Self::Mismatch => false,
            Self::LrPending => true,
            Self::Matched(node) => node.is_from_lr_context,
        }
    }

    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.node().map_or(0, |n| n.total_errors)
    }

    /// Marks the result as produced inside a left-recursion expansion.
    ///
    /// A mismatch becomes [`MatchResult::LrPending`]; syntax errors and
    /// already-marked results are returned unchanged.
    #[must_use]
    pub fn with_lr_context(self) -> Self {
        match self {
            Self::Mismatch | Self::LrPending => Self::LrPending,
            Self::Matched(node) if node.is_from_lr_context || node.is_syntax_error() => {
                Self::Matched(node)
            }
            Self::Matched(node) => {
                let mut marked = MatchNode::clone(&node);
                marked.is_from_lr_context = true;
                Self::matched(marked)
            }
        }
    }
}

/// A syntax error reported by recovery.
///
/// `len > 0`: that much input was skipped. `len == 0`: `deleted_clause`
/// was assumed present at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SyntaxError {
    pub pos: usize,
    pub len: usize,
    #[cfg_attr(feature = "serialize", serde(skip))]
    pub deleted_clause: Option<ClauseId>,
}

impl SyntaxError {
    #[must_use]
    pub const fn is_deletion(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.pos + self.len
    }

    /// Matched-against-input text of a skip, empty for deletions.
    #[must_use]
    pub fn skipped_text(&self, input: &str) -> String {
        input.chars().skip(self.pos).take(self.len).collect()
    }

    /// Like [`Display`](fmt::Display), but names a deleted clause in grammar
    /// notation.
    #[must_use]
    pub fn describe(&self, grammar: &Grammar) -> String {
        match self.deleted_clause {
            Some(id) if self.len == 0 => {
                format!("Missing grammar element {} at pos {}", grammar.display(id), self.pos)
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            match self.deleted_clause {
                Some(id) => write!(f, "Missing grammar element {id} at pos {}", self.pos),
                None => write!(f, "Missing grammar element at pos {}", self.pos),
            }
        } else {
            write!(
                f,
                "{} characters of unexpected input at pos {}",
                self.len, self.pos
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: usize, pos: usize, len: usize) -> Arc<MatchNode> {
        Arc::new(MatchNode::terminal(ClauseId::new(id), pos, len))
    }

    #[test]
    fn test_wrap_spans_children_and_sums_errors() {
        let children: Children = [
            leaf(0, 2, 1),
            Arc::new(MatchNode::skipped(3, 2)),
            leaf(1, 5, 3),
        ]
        .into_iter()
        .collect();
        let node = MatchNode::wrap(ClauseId::new(2), children, true);
        assert_eq!(node.pos(), 2);
        assert_eq!(node.len(), 6);
        assert_eq!(node.total_errors(), 1);
        assert!(!node.is_from_lr_context());
    }

    #[test]
    fn test_with_lr_context() {
        assert_eq!(MatchResult::Mismatch.with_lr_context(), MatchResult::LrPending);

        let plain = MatchResult::matched(MatchNode::terminal(ClauseId::new(0), 0, 1));
        let marked = plain.clone().with_lr_context();
        assert!(!plain.is_from_lr_context());
        assert!(marked.is_from_lr_context());
        assert_eq!(marked.len(), Some(1));

        let error = MatchResult::matched(MatchNode::skipped(0, 1));
        assert!(!error.with_lr_context().is_from_lr_context());
    }

    #[test]
    fn test_lr_flag_propagates_to_wrappers() {
        let marked = MatchResult::matched(MatchNode::terminal(ClauseId::new(0), 0, 1))
            .with_lr_context()
            .into_node()
            .unwrap();
        let wrapper = MatchNode::wrap_one(ClauseId::new(1), marked, true);
        assert!(wrapper.is_from_lr_context());
    }

    #[test]
    fn test_sentinel_lengths_order_below_matches() {
        let empty = MatchResult::matched(MatchNode::empty(ClauseId::new(0), 4, true));
        assert!(MatchResult::Mismatch.len() < empty.len());
        assert!(MatchResult::LrPending.is_mismatch());
        assert!(MatchResult::LrPending.is_from_lr_context());
        assert!(!MatchResult::Mismatch.is_from_lr_context());
    }

    #[test]
    fn test_mismatch_pretty_string() {
        let grammar = Grammar::from_spec("S <- 'a' ;").unwrap();
        assert_eq!(MatchResult::Mismatch.to_pretty_string("b", &grammar), "MISMATCH\n");
    }

    #[test]
    fn test_syntax_error_display() {
        let skip = SyntaxError {
            pos: 3,
            len: 2,
            deleted_clause: None,
        };
        assert_eq!(skip.to_string(), "2 characters of unexpected input at pos 3");
        assert_eq!(skip.skipped_text("abcdefg"), "de");
    }
}
