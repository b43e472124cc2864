//! Shared helpers for the integration tests

#![allow(dead_code)]

use squirrel::{Grammar, ParseResult, Parser, ParserConfig};

/// Summary of a parse, for compact assertions
#[derive(Debug)]
pub struct Outcome {
    /// False when the top rule could not match at all
    pub ok: bool,
    pub error_count: usize,
    /// Text of every skip error, in document order
    pub skipped: Vec<String>,
    pub deletions: usize,
}

impl Outcome {
    pub fn from_result(result: &ParseResult) -> Self {
        let errors = result.syntax_errors();
        Self {
            ok: result.is_match(),
            error_count: result.error_count(),
            skipped: errors
                .iter()
                .filter(|e| !e.is_deletion())
                .map(|e| e.skipped_text(result.input()))
                .collect(),
            deletions: errors.iter().filter(|e| e.is_deletion()).count(),
        }
    }

    pub fn skipped(&self, text: &str) -> bool {
        self.skipped.iter().any(|s| s == text)
    }
}

pub fn grammar(spec: &str) -> Grammar {
    Grammar::from_spec(spec).expect("grammar should be valid")
}

pub fn parse_rule(spec: &str, rule: &str, input: &str) -> ParseResult {
    let grammar = grammar(spec);
    Parser::new(&grammar, rule, input)
        .expect("top rule should exist")
        .parse()
}

/// Parse `input` starting at rule `S`.
pub fn run(spec: &str, input: &str) -> Outcome {
    run_rule(spec, "S", input)
}

pub fn run_rule(spec: &str, rule: &str, input: &str) -> Outcome {
    Outcome::from_result(&parse_rule(spec, rule, input))
}

/// Parse with statistics enabled and return the clause evaluation count.
pub fn work(grammar: &Grammar, rule: &str, input: &str) -> (ParseResult, usize) {
    let config = ParserConfig::default().with_stats(true);
    let result = Parser::with_config(grammar, rule, input, config)
        .expect("top rule should exist")
        .parse();
    let work = result.stats().map_or(0, |s| s.total_work());
    (result, work)
}
