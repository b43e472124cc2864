//! # Meta-Grammar
//!
//! Grammars written as text.
//!
//! ## Overview
//!
//! The textual notation is itself described by a grammar, built once with
//! [`GrammarBuilder`] and parsed by the ordinary parser. A specification is a
//! list of rules:
//!
//! ```text
//! # comments run to end of line
//! Sum    <- Sum "+" Term / Term ;
//! Term   <- [0-9]+ ;
//! ~Space <- ' '* ;
//! ```
//!
//! Supported expressions: `"literal"`, `'c'`, `[a-z]`, `[^...]`, `.`, `()`,
//! `(...)` grouping, juxtaposition for sequences, `/` for ordered choice,
//! suffixes `*` `+` `?`, prefixes `&` `!`, and rule names. A `~` before a
//! rule name marks the rule transparent; `~` in front of an expression is
//! accepted and ignored.
//!
//! The specification must parse without syntax errors; recovery is used only
//! to report every error at once.

use crate::error::GrammarError;
use crate::grammar::escape::{unescape_char, unescape_string};
use crate::grammar::{CharRange, Expr, Grammar, GrammarBuilder};
use crate::parser::Parser;
use crate::tree::{AstNode, build_ast};
use std::sync::LazyLock;
use tracing::debug;

static META_GRAMMAR: LazyLock<Result<Grammar, GrammarError>> = LazyLock::new(build_meta_grammar);

/// The grammar of grammar specifications.
///
/// # Errors
///
/// Never fails in practice; the error is propagated rather than unwrapped.
pub fn meta_grammar() -> Result<&'static Grammar, GrammarError> {
    META_GRAMMAR.as_ref().map_err(Clone::clone)
}

fn one_of(chars: &[char]) -> Expr {
    Expr::first(chars.iter().copied().map(Expr::chr))
}

fn build_meta_grammar() -> Result<Grammar, GrammarError> {
    let ws = || Expr::rule("WS");
    let escape_sequence = Expr::seq([
        Expr::lit("\\"),
        one_of(&['n', 'r', 't', '\\', '"', '\'', '[', ']', '-']),
    ]);
    let suffix = |op: &str| Expr::seq([Expr::rule("Suffix"), ws(), Expr::lit(op)]);
    let prefix = |op: &str| Expr::seq([Expr::lit(op), ws(), Expr::rule("Prefix")]);

    GrammarBuilder::new()
        .rule(
            "Grammar",
            Expr::seq([ws(), Expr::plus(Expr::seq([Expr::rule("Rule"), ws()]))]),
        )
        .rule(
            "Rule",
            Expr::seq([
                Expr::opt(Expr::lit("~")),
                Expr::rule("Identifier"),
                ws(),
                Expr::lit("<-"),
                ws(),
                Expr::rule("Expression"),
                ws(),
                Expr::lit(";"),
                ws(),
            ]),
        )
        .rule("Expression", Expr::rule("Choice"))
        .rule(
            "Choice",
            Expr::seq([
                Expr::rule("Sequence"),
                Expr::star(Expr::seq([ws(), Expr::lit("/"), ws(), Expr::rule("Sequence")])),
            ]),
        )
        .rule(
            "Sequence",
            Expr::seq([
                Expr::rule("Prefix"),
                Expr::star(Expr::seq([ws(), Expr::rule("Prefix")])),
            ]),
        )
        .rule(
            "Prefix",
            Expr::first([prefix("&"), prefix("!"), prefix("~"), Expr::rule("Suffix")]),
        )
        .rule(
            "Suffix",
            Expr::first([suffix("*"), suffix("+"), suffix("?"), Expr::rule("Primary")]),
        )
        .rule(
            "Primary",
            Expr::first([
                Expr::rule("Identifier"),
                Expr::rule("StringLiteral"),
                Expr::rule("CharLiteral"),
                Expr::rule("CharClass"),
                Expr::rule("AnyChar"),
                Expr::rule("Parens"),
            ]),
        )
        .rule(
            "Parens",
            Expr::seq([
                Expr::lit("("),
                ws(),
                Expr::opt(Expr::rule("Expression")),
                ws(),
                Expr::lit(")"),
            ]),
        )
        .rule(
            "Identifier",
            Expr::seq([
                Expr::first([Expr::range('a', 'z'), Expr::range('A', 'Z'), Expr::chr('_')]),
                Expr::star(Expr::first([
                    Expr::range('a', 'z'),
                    Expr::range('A', 'Z'),
                    Expr::range('0', '9'),
                    Expr::chr('_'),
                ])),
            ]),
        )
        .rule(
            "StringLiteral",
            Expr::seq([
                Expr::lit("\""),
                Expr::star(Expr::first([
                    Expr::rule("EscapeSequence"),
                    Expr::seq([
                        Expr::not_followed_by(Expr::first([Expr::lit("\""), Expr::lit("\\")])),
                        Expr::any(),
                    ]),
                ])),
                Expr::lit("\""),
            ]),
        )
        .rule(
            "CharLiteral",
            Expr::seq([
                Expr::lit("'"),
                Expr::first([
                    Expr::rule("EscapeSequence"),
                    Expr::seq([
                        Expr::not_followed_by(Expr::first([Expr::lit("'"), Expr::lit("\\")])),
                        Expr::any(),
                    ]),
                ]),
                Expr::lit("'"),
            ]),
        )
        .rule("EscapeSequence", escape_sequence)
        .rule(
            "CharClass",
            Expr::seq([
                Expr::lit("["),
                Expr::opt(Expr::lit("^")),
                Expr::plus(Expr::first([
                    Expr::rule("CharRange"),
                    Expr::rule("CharClassChar"),
                ])),
                Expr::lit("]"),
            ]),
        )
        .rule(
            "CharRange",
            Expr::seq([
                Expr::rule("CharClassChar"),
                Expr::lit("-"),
                Expr::rule("CharClassChar"),
            ]),
        )
        .rule(
            "CharClassChar",
            Expr::first([
                Expr::rule("EscapeSequence"),
                Expr::seq([
                    Expr::not_followed_by(Expr::first([
                        Expr::lit("]"),
                        Expr::lit("\\"),
                        Expr::lit("-"),
                    ])),
                    Expr::any(),
                ]),
            ]),
        )
        .rule("AnyChar", Expr::lit("."))
        .rule(
            "~WS",
            Expr::star(Expr::first([one_of(&[' ', '\t', '\n', '\r']), Expr::rule("Comment")])),
        )
        .rule(
            "Comment",
            Expr::seq([
                Expr::lit("#"),
                Expr::star(Expr::seq([Expr::not_followed_by(Expr::chr('\n')), Expr::any()])),
                Expr::opt(Expr::chr('\n')),
            ]),
        )
        .build()
}

/// Parse a grammar specification into a [`Grammar`].
///
/// # Errors
///
/// - [`GrammarError::Syntax`] listing every syntax error in `spec`
/// - any validation error from [`GrammarBuilder::build`]
///
/// # Example
///
/// ```rust
/// use squirrel::meta::parse_grammar;
///
/// let grammar = parse_grammar(r#"
///     List <- Item ("," Item)* ;
///     Item <- [a-z]+ ;
/// "#)?;
/// assert_eq!(grammar.rule_names().collect::<Vec<_>>(), ["List", "Item"]);
/// # Ok::<(), squirrel::error::GrammarError>(())
/// ```
pub fn parse_grammar(spec: &str) -> Result<Grammar, GrammarError> {
    let meta = meta_grammar()?;
    let result = Parser::new(meta, "Grammar", spec)
        .map_err(|e| GrammarError::malformed(e.to_string()))?
        .parse();
    if result.has_syntax_errors() {
        let errors: Vec<String> = result
            .syntax_errors()
            .iter()
            .map(|e| e.describe(meta))
            .collect();
        debug!(errors = errors.len(), "grammar specification rejected");
        return Err(GrammarError::Syntax(errors));
    }

    let ast = build_ast(&result);
    let translator = Translator {
        input: spec.chars().collect(),
    };
    let mut builder = GrammarBuilder::new();
    for rule in &ast.children {
        let (name, body) = translator.rule(rule)?;
        builder.add_rule(name, body);
    }
    builder.build()
}

impl Grammar {
    /// Parse a grammar specification. See [`parse_grammar`].
    ///
    /// # Errors
    ///
    /// Same as [`parse_grammar`].
    pub fn from_spec(spec: &str) -> Result<Self, GrammarError> {
        parse_grammar(spec)
    }
}

/// AST to [`Expr`] translation.
struct Translator {
    input: Vec<char>,
}

impl Translator {
    fn text(&self, node: &AstNode) -> String {
        self.input[node.pos..node.pos + node.len].iter().collect()
    }

    fn is_token(&self, node: &AstNode, token: &str) -> bool {
        node.is_terminal() && self.text(node) == token
    }

    /// Returns the rule name, `~` included when transparent, and its body.
    fn rule(&self, node: &AstNode) -> Result<(String, Expr), GrammarError> {
        expect_label(node, "Rule")?;
        let ident = node
            .child("Identifier")
            .ok_or_else(|| GrammarError::malformed("rule without a name"))?;
        let body = node
            .child("Expression")
            .ok_or_else(|| GrammarError::malformed("rule without a body"))?;
        let transparent = node
            .children
            .first()
            .is_some_and(|first| self.is_token(first, "~"));

        let mut name = self.text(ident);
        if transparent {
            name.insert(0, '~');
        }
        Ok((name, self.expr(body)?))
    }

    fn expr(&self, node: &AstNode) -> Result<Expr, GrammarError> {
        match node.label.as_str() {
            "Expression" | "Primary" => self.expr(only_child(node)?),
            "Choice" => self.collapse(node, "Sequence", Expr::First),
            "Sequence" => self.collapse(node, "Prefix", Expr::Seq),
            "Prefix" => self.prefix(node),
            "Suffix" => self.suffix(node),
            "Parens" => match node.child("Expression") {
                Some(inner) => self.expr(inner),
                None => Ok(Expr::empty()),
            },
            "Identifier" => Ok(Expr::rule(self.text(node))),
            "StringLiteral" => Ok(Expr::lit(unescape_string(&self.quoted_body(node)))),
            "CharLiteral" => {
                let body = self.quoted_body(node);
                unescape_char(&body)
                    .map(Expr::chr)
                    .ok_or_else(|| GrammarError::malformed(format!("bad char literal '{body}'")))
            }
            "CharClass" => self.char_class(node),
            "AnyChar" => Ok(Expr::any()),
            other => Err(GrammarError::malformed(format!("unexpected node {other}"))),
        }
    }

    /// Translates the `label` children; a single one stands for itself.
    fn collapse(
        &self,
        node: &AstNode,
        label: &str,
        wrap: fn(Vec<Expr>) -> Expr,
    ) -> Result<Expr, GrammarError> {
        let mut items = node
            .children_labeled(label)
            .map(|child| self.expr(child))
            .collect::<Result<Vec<_>, _>>()?;
        match items.len() {
            0 => Err(GrammarError::malformed(format!("empty {}", node.label))),
            1 => Ok(items.remove(0)),
            _ => Ok(wrap(items)),
        }
    }

    fn prefix(&self, node: &AstNode) -> Result<Expr, GrammarError> {
        match node.children.as_slice() {
            [op, operand] if op.is_terminal() => {
                let inner = self.expr(operand)?;
                match self.text(op).as_str() {
                    "&" => Ok(Expr::followed_by(inner)),
                    "!" => Ok(Expr::not_followed_by(inner)),
                    "~" => Ok(inner),
                    other => Err(GrammarError::malformed(format!("unknown prefix {other}"))),
                }
            }
            [operand] => self.expr(operand),
            _ => Err(GrammarError::malformed("malformed prefix expression")),
        }
    }

    fn suffix(&self, node: &AstNode) -> Result<Expr, GrammarError> {
        match node.children.as_slice() {
            [operand, op] if op.is_terminal() => {
                let inner = self.expr(operand)?;
                match self.text(op).as_str() {
                    "*" => Ok(Expr::star(inner)),
                    "+" => Ok(Expr::plus(inner)),
                    "?" => Ok(Expr::opt(inner)),
                    other => Err(GrammarError::malformed(format!("unknown suffix {other}"))),
                }
            }
            [operand] => self.expr(operand),
            _ => Err(GrammarError::malformed("malformed suffix expression")),
        }
    }

    fn char_class(&self, node: &AstNode) -> Result<Expr, GrammarError> {
        let inverted = node
            .children
            .get(1)
            .is_some_and(|second| self.is_token(second, "^"));
        let mut ranges = Vec::new();
        for child in &node.children {
            match child.label.as_str() {
                "CharRange" => {
                    let mut bounds = child.children_labeled("CharClassChar");
                    let (Some(lo), Some(hi)) = (bounds.next(), bounds.next()) else {
                        return Err(GrammarError::malformed("incomplete character range"));
                    };
                    ranges.push(CharRange::new(self.class_char(lo)?, self.class_char(hi)?));
                }
                "CharClassChar" => ranges.push(CharRange::single(self.class_char(child)?)),
                _ => {}
            }
        }
        Ok(if inverted {
            Expr::not_class(ranges)
        } else {
            Expr::class(ranges)
        })
    }

    fn class_char(&self, node: &AstNode) -> Result<char, GrammarError> {
        let text = self.text(node);
        unescape_char(&text)
            .ok_or_else(|| GrammarError::malformed(format!("bad character class member {text}")))
    }

    /// Literal text between the delimiting quotes.
    fn quoted_body(&self, node: &AstNode) -> String {
        let end = node.pos + node.len;
        if node.len < 2 {
            return String::new();
        }
        self.input[node.pos + 1..end - 1].iter().collect()
    }
}

fn expect_label(node: &AstNode, label: &str) -> Result<(), GrammarError> {
    if node.label == label {
        Ok(())
    } else {
        Err(GrammarError::malformed(format!(
            "expected {label}, found {}",
            node.label
        )))
    }
}

fn only_child(node: &AstNode) -> Result<&AstNode, GrammarError> {
    match node.children.as_slice() {
        [child] => Ok(child),
        _ => Err(GrammarError::malformed(format!(
            "{} must have exactly one child",
            node.label
        ))),
    }
}
