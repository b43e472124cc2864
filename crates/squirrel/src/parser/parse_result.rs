use super::ParseStats;
use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::result::{MatchNode, SyntaxError};
use compact_str::CompactString;
use std::sync::Arc;

/// Outcome of a complete parse.
///
/// The root is never a mismatch: a parse that could not match at all yields a
/// single syntax error over the whole input. When the top rule matched only a
/// prefix, the remainder is reported separately as
/// [`unmatched_input`](Self::unmatched_input); together they span the input.
#[derive(Debug, Clone)]
pub struct ParseResult {
    grammar: Grammar,
    top_rule: CompactString,
    input: String,
    root: Arc<MatchNode>,
    unmatched_input: Option<Arc<MatchNode>>,
    has_syntax_errors: bool,
    stats: Option<ParseStats>,
}

impl ParseResult {
    pub(crate) fn new(
        grammar: Grammar,
        top_rule: CompactString,
        input: String,
        root: Arc<MatchNode>,
        unmatched_input: Option<Arc<MatchNode>>,
        has_syntax_errors: bool,
        stats: Option<ParseStats>,
    ) -> Self {
        Self {
            grammar,
            top_rule,
            input,
            root,
            unmatched_input,
            has_syntax_errors,
            stats,
        }
    }

    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[must_use]
    pub fn top_rule_name(&self) -> &str {
        &self.top_rule
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn root(&self) -> &Arc<MatchNode> {
        &self.root
    }

    /// Trailing input the root did not cover.
    #[must_use]
    pub fn unmatched_input(&self) -> Option<&Arc<MatchNode>> {
        self.unmatched_input.as_ref()
    }

    #[must_use]
    pub const fn has_syntax_errors(&self) -> bool {
        self.has_syntax_errors
    }

    /// True when the root is a real match rather than one error over the whole
    /// input.
    #[must_use]
    pub fn is_match(&self) -> bool {
        !self.root.is_syntax_error()
    }

    /// Work counters, when the parser was configured to collect them.
    #[must_use]
    pub const fn stats(&self) -> Option<&ParseStats> {
        self.stats.as_ref()
    }

    /// All syntax errors in document order, trailing unmatched input last.
    #[must_use]
    pub fn syntax_errors(&self) -> Vec<SyntaxError> {
        let mut errors = Vec::new();
        if !self.has_syntax_errors {
            return errors;
        }
        self.root.collect_syntax_errors(&mut errors);
        if let Some(error) = self.unmatched_input.as_ref().and_then(|n| n.as_syntax_error()) {
            errors.push(error);
        }
        errors
    }

    /// Number of syntax errors, trailing unmatched input included.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.root.total_errors() + usize::from(self.unmatched_input.is_some())
    }

    /// Strict mode: turns any syntax error into an error value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::SyntaxErrors`] listing every syntax error.
    pub fn into_strict(self) -> Result<Self, ParseError> {
        if !self.has_syntax_errors {
            return Ok(self);
        }
        let messages = self
            .syntax_errors()
            .iter()
            .map(|e| e.describe(&self.grammar))
            .collect();
        Err(ParseError::SyntaxErrors(messages))
    }

    /// Indented dump of the match tree followed by any unmatched input.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let mut out = self.root.to_pretty_string(&self.input, &self.grammar);
        if let Some(tail) = &self.unmatched_input {
            out.push_str(&tail.to_pretty_string(&self.input, &self.grammar));
        }
        out
    }
}
