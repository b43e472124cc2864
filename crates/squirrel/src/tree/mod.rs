//! # Syntax Trees
//!
//! Projections of a match tree for consumers.
//!
//! ## Overview
//!
//! The match tree produced by the parser contains a node for every clause
//! that matched. [`build_ast`] reduces it to an [`AstNode`] tree containing
//! only:
//!
//! - one node per reference to a non-transparent rule, labelled with the rule
//!   name
//! - terminal leaves, labelled [`TERMINAL_LABEL`]
//! - syntax error leaves, labelled [`SYNTAX_ERROR_LABEL`]
//!
//! Everything else is flattened into the enclosing node; references to
//! transparent rules are dropped together with their content.
//!
//! From the AST, [`build_cst`] builds arbitrary user types through per-label
//! factory closures registered in [`CstFactories`].

mod cst;

pub use cst::{CstFactories, build_cst};

use crate::grammar::Grammar;
use crate::parser::ParseResult;
use crate::result::{MatchNode, SyntaxError};
use compact_str::CompactString;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Label of AST nodes for terminal matches.
pub const TERMINAL_LABEL: &str = "<Terminal>";

/// Label of AST nodes for syntax errors.
pub const SYNTAX_ERROR_LABEL: &str = "<SyntaxError>";

/// A node of the simplified syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct AstNode {
    pub label: CompactString,
    pub pos: usize,
    pub len: usize,
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub syntax_error: Option<SyntaxError>,
    #[cfg_attr(
        feature = "serialize",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<AstNode>,
}

impl AstNode {
    #[must_use]
    pub fn terminal(pos: usize, len: usize) -> Self {
        Self {
            label: CompactString::const_new(TERMINAL_LABEL),
            pos,
            len,
            syntax_error: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn syntax_error(error: SyntaxError) -> Self {
        Self {
            label: CompactString::const_new(SYNTAX_ERROR_LABEL),
            pos: error.pos,
            len: error.len,
            syntax_error: Some(error),
            children: Vec::new(),
        }
    }

    /// Rule node spanning its children.
    ///
    /// Returns `None` when `children` is empty, since the span is undefined.
    #[must_use]
    pub fn non_terminal(label: impl Into<CompactString>, children: Vec<Self>) -> Option<Self> {
        let pos = children.first()?.pos;
        let end = children.last().map_or(pos, |last| last.pos + last.len);
        Some(Self {
            label: label.into(),
            pos,
            len: end - pos,
            syntax_error: None,
            children,
        })
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.label == TERMINAL_LABEL
    }

    #[must_use]
    pub const fn is_syntax_error(&self) -> bool {
        self.syntax_error.is_some()
    }

    /// The input text this node covers.
    #[must_use]
    pub fn text(&self, input: &str) -> String {
        input.chars().skip(self.pos).take(self.len).collect()
    }

    /// First direct child with the given label.
    #[must_use]
    pub fn child(&self, label: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.label == label)
    }

    /// Direct children with the given label.
    pub fn children_labeled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.label == label)
    }

    /// Tree dump, one node per line, children drawn with `|---` / `` `--- ``
    /// connectors. Leaves show their text.
    #[must_use]
    pub fn to_pretty_string(&self, input: &str) -> String {
        let mut out = String::new();
        self.write_tree(input, "", "", &mut out);
        out
    }

    fn write_tree(&self, input: &str, line_prefix: &str, child_prefix: &str, out: &mut String) {
        out.push_str(line_prefix);
        out.push_str(&self.label);
        if self.children.is_empty() {
            out.push_str(": \"");
            out.push_str(&self.text(input));
            out.push('"');
        }
        for (i, child) in self.children.iter().enumerate() {
            let is_last = i + 1 == self.children.len();
            let (connector, indent) = if is_last {
                ("`---", "    ")
            } else {
                ("|---", "|   ")
            };
            out.push('\n');
            child.write_tree(
                input,
                &format!("{child_prefix}{connector}"),
                &format!("{child_prefix}{indent}"),
                out,
            );
        }
    }
}

/// Build the AST for a parse, rooted at a node labelled with the top rule.
/// Unmatched trailing input becomes the root's last child.
#[must_use]
pub fn build_ast(result: &ParseResult) -> AstNode {
    let grammar = result.grammar();
    let mut children = Vec::new();
    collect_children(result.root(), grammar, &mut children);
    if let Some(tail) = result.unmatched_input().and_then(|n| n.as_syntax_error()) {
        children.push(AstNode::syntax_error(tail));
    }
    rule_node(result.top_rule_name(), result.root(), children)
}

fn rule_node(label: &str, matched: &MatchNode, children: Vec<AstNode>) -> AstNode {
    AstNode::non_terminal(label, children).unwrap_or_else(|| AstNode {
        label: label.into(),
        pos: matched.pos(),
        len: matched.len(),
        syntax_error: None,
        children: Vec::new(),
    })
}

fn collect_children(node: &MatchNode, grammar: &Grammar, out: &mut Vec<AstNode>) {
    if let Some(error) = node.as_syntax_error() {
        out.push(AstNode::syntax_error(error));
        return;
    }
    let Some(clause) = node.clause() else {
        return;
    };
    if grammar.clause(clause).is_terminal() {
        out.push(AstNode::terminal(node.pos(), node.len()));
    } else if grammar.clause(clause).is_rule_ref() {
        if let (Some(name), Some(body)) = (grammar.visible_rule_name(clause), node.children().first()) {
            let mut children = Vec::new();
            collect_children(body, grammar, &mut children);
            out.push(rule_node(name, body, children));
        }
    } else {
        for child in node.children() {
            collect_children(child, grammar, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_terminal_spans_children() {
        let node = AstNode::non_terminal(
            "Pair",
            vec![AstNode::terminal(2, 1), AstNode::terminal(4, 3)],
        )
        .unwrap();
        assert_eq!((node.pos, node.len), (2, 5));
        assert!(AstNode::non_terminal("Empty", Vec::new()).is_none());
    }

    #[test]
    fn test_pretty_string_connectors() {
        let input = "ab";
        let inner = AstNode::non_terminal("B", vec![AstNode::terminal(1, 1)]).unwrap();
        let root = AstNode::non_terminal("S", vec![AstNode::terminal(0, 1), inner]).unwrap();
        let expected = "S\n|---<Terminal>: \"a\"\n`---B\n    `---<Terminal>: \"b\"";
        assert_eq!(root.to_pretty_string(input), expected);
    }
}
