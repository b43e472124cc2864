//! # Squirrel
//!
//! A PEG parser with direct and indirect left recursion and error recovery,
//! running in linear time on well-formed input.
//!
//! ## Overview
//!
//! - **Grammars**: rules are written as [`Expr`] trees or as text
//!   ([`Grammar::from_spec`]), then lowered into an immutable clause arena
//! - **Left recursion**: any rule may refer to itself in left position;
//!   results are grown from a seed until they stop getting longer
//! - **Memoization**: every `(clause, position)` pair is matched at most once
//!   per phase, which keeps parsing linear
//! - **Error recovery**: when the input does not match, a second phase skips
//!   unexpected input inside sequences and repetitions and records
//!   [`SyntaxError`]s in the tree instead of failing
//! - **Trees**: the match tree can be reduced to an [`AstNode`] tree and then
//!   built into user types with [`CstFactories`]
//!
//! ## Quick Start
//!
//! ```rust
//! use squirrel::{Grammar, Parser};
//!
//! let grammar = Grammar::from_spec(r#"
//!     Expr <- Expr "+" Term / Term ;
//!     Term <- [0-9]+ ;
//! "#)?;
//!
//! let result = Parser::new(&grammar, "Expr", "1+2+3")?.parse();
//! assert!(!result.has_syntax_errors());
//!
//! // Recovery skips unexpected input and records it in the tree.
//! let result = Parser::new(&grammar, "Expr", "1+x2")?.parse();
//! assert!(result.has_syntax_errors());
//! assert_eq!(result.syntax_errors()[0].skipped_text(result.input()), "+x");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - `serialize`: `serde` support for [`AstNode`], [`SyntaxError`],
//!   [`ParseStats`] and [`ParserConfig`]
//! - `diagnostics`: `miette::Diagnostic` for the error types

pub mod api;
pub mod error;
pub mod grammar;
pub mod meta;
pub mod parser;
pub mod result;
pub mod tree;

// Re-export commonly used types
pub use api::{squirrel_parse_ast, squirrel_parse_cst, squirrel_parse_pt};
pub use error::{CstError, GrammarError, ParseError, SquirrelError};
pub use grammar::{CharRange, Clause, ClauseId, Expr, Grammar, GrammarBuilder};
pub use meta::parse_grammar;
pub use parser::{ParseResult, ParseStats, Parser, ParserConfig};
pub use result::{MatchNode, MatchResult, SyntaxError};
pub use tree::{AstNode, CstFactories, build_ast, build_cst};
