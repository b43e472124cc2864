//! Squirrel Tools - command-line utilities for squirrel grammars
//!
//! Checks grammar specifications and parses input with them, printing the
//! result as a match tree, an AST or JSON.

pub mod cli;
pub mod report;

pub use report::{ErrorReport, ParseReport, render};
