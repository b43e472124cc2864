//! One-call entry points from grammar text to parse tree, AST or CST.
//!
//! Each call parses the grammar specification afresh. To parse many inputs
//! with one grammar, build it once with [`Grammar::from_spec`] and use
//! [`Parser`] directly.
//!
//! ```rust
//! use squirrel::api::squirrel_parse_ast;
//!
//! let ast = squirrel_parse_ast("Pair <- Word \"=\" Word ; Word <- [a-z]+ ;", "Pair", "k=v")?;
//! assert_eq!(ast.label, "Pair");
//! assert_eq!(ast.children_labeled("Word").count(), 2);
//! # Ok::<(), squirrel::error::SquirrelError>(())
//! ```

use crate::error::SquirrelError;
use crate::grammar::Grammar;
use crate::parser::{ParseResult, Parser};
use crate::tree::{AstNode, CstFactories, build_ast, build_cst};

/// Parse `input` with the grammar in `grammar_spec`, returning the match tree.
///
/// Syntax errors in the input do not fail the call; check
/// [`ParseResult::has_syntax_errors`] or use [`ParseResult::into_strict`].
///
/// # Errors
///
/// Fails if the specification is invalid or has no rule `top_rule`.
pub fn squirrel_parse_pt(
    grammar_spec: &str,
    top_rule: &str,
    input: &str,
) -> Result<ParseResult, SquirrelError> {
    let grammar = Grammar::from_spec(grammar_spec)?;
    Ok(Parser::new(&grammar, top_rule, input)?.parse())
}

/// Like [`squirrel_parse_pt`], projected to an [`AstNode`].
///
/// # Errors
///
/// Fails if the specification is invalid or has no rule `top_rule`.
pub fn squirrel_parse_ast(
    grammar_spec: &str,
    top_rule: &str,
    input: &str,
) -> Result<AstNode, SquirrelError> {
    let result = squirrel_parse_pt(grammar_spec, top_rule, input)?;
    Ok(build_ast(&result))
}

/// Like [`squirrel_parse_ast`], then built into a user tree with `factories`.
///
/// # Errors
///
/// Fails if the specification is invalid, has no rule `top_rule`, or the
/// CST cannot be built (see [`build_cst`]).
pub fn squirrel_parse_cst<T>(
    grammar_spec: &str,
    top_rule: &str,
    input: &str,
    factories: &CstFactories<'_, T>,
    allow_syntax_errors: bool,
) -> Result<T, SquirrelError> {
    let ast = squirrel_parse_ast(grammar_spec, top_rule, input)?;
    Ok(build_cst(&ast, factories, allow_syntax_errors)?)
}
