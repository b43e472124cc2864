//! # Error Types
//!
//! Errors raised while building grammars, setting up a parse, or projecting a
//! parse tree into user types.
//!
//! ## Overview
//!
//! Syntax errors found in the *input* are never reported through these types.
//! They are data: [`SyntaxError`](crate::result::SyntaxError) nodes embedded
//! in the parse tree and collected by
//! [`ParseResult::syntax_errors`](crate::parser::ParseResult::syntax_errors).
//! The enums here cover the cases where the caller made a mistake:
//!
//! - [`GrammarError`]: the grammar itself is invalid (undefined rules, empty
//!   sequences, a grammar specification that does not parse, ...)
//! - [`ParseError`]: a parse could not be started, or strict mode rejected a
//!   result that contained syntax errors
//! - [`CstError`]: the CST factories did not cover the tree
//! - [`SquirrelError`]: umbrella type returned by the one-call API in
//!   [`crate::api`]
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors derive
//! [`miette::Diagnostic`] with stable error codes.

use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors detected while constructing a [`Grammar`](crate::grammar::Grammar).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("Rule \"{0}\" not found")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(squirrel::grammar::undefined_rule))
    )]
    UndefinedRule(String),

    #[error("Rule \"{0}\" is defined more than once")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(squirrel::grammar::duplicate_rule))
    )]
    DuplicateRule(String),

    #[error("Rule \"{0}\" only refers to itself through other rule references")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(squirrel::grammar::cyclic_reference),
            help("at least one rule in the cycle must match something other than a rule reference")
        )
    )]
    CyclicReference(String),

    #[error("Rule \"{0}\" cannot be both transparent and non-transparent")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(squirrel::grammar::transparency_conflict))
    )]
    TransparencyConflict(String),

    #[error("Empty {kind} in rule \"{rule}\"")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(squirrel::grammar::empty_clause),
            help("sequences, choices and character classes need at least one element")
        )
    )]
    EmptyClause { rule: String, kind: &'static str },

    #[error("Grammar has no rules")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(squirrel::grammar::no_rules)))]
    NoRules,

    #[error("Syntax errors in grammar specification: {}", .0.join(", "))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(squirrel::grammar::syntax)))]
    Syntax(Vec<String>),

    #[error("Malformed grammar: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(squirrel::grammar::malformed)))]
    Malformed(String),
}

impl GrammarError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Errors from setting up or post-checking a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error("Rule \"{0}\" not found")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(squirrel::parse::unknown_rule)))]
    UnknownRule(String),

    /// Produced by strict mode; carries the rendered errors in document order.
    #[error("Input has syntax errors: {}", .0.join("; "))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(squirrel::parse::syntax_errors)))]
    SyntaxErrors(Vec<String>),
}

/// Errors while building a CST from an AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum CstError {
    #[error("Duplicate factory for rule \"{0}\"")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(squirrel::cst::duplicate_factory)))]
    DuplicateFactory(String),

    #[error("No factory found for rule \"{0}\"")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(squirrel::cst::missing_factory)))]
    MissingFactory(String),

    #[error("Syntax error: {0}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(squirrel::cst::syntax_error),
            help("pass allow_syntax_errors = true and register a <SyntaxError> factory")
        )
    )]
    SyntaxError(String),
}

/// Any error produced by the one-call API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum SquirrelError {
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Cst(#[from] CstError),
}
