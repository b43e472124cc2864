//! Rendering of parse results

use crate::cli::OutputFormat;
use serde::Serialize;
use squirrel::{AstNode, ParseResult, ParseStats, build_ast};

/// One syntax error, positioned and described in grammar notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub pos: usize,
    pub len: usize,
    pub message: String,
}

/// JSON document written by `squirrel parse --format json`.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub top_rule: String,
    pub has_syntax_errors: bool,
    pub errors: Vec<ErrorReport>,
    pub ast: AstNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ParseStats>,
}

impl ParseReport {
    #[must_use]
    pub fn new(result: &ParseResult) -> Self {
        Self {
            top_rule: result.top_rule_name().to_string(),
            has_syntax_errors: result.has_syntax_errors(),
            errors: error_reports(result),
            ast: build_ast(result),
            stats: result.stats().cloned(),
        }
    }
}

#[must_use]
pub fn error_reports(result: &ParseResult) -> Vec<ErrorReport> {
    result
        .syntax_errors()
        .iter()
        .map(|e| ErrorReport {
            pos: e.pos,
            len: e.len,
            message: e.describe(result.grammar()),
        })
        .collect()
}

/// Render `result` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(result: &ParseResult, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Tree => Ok(result.to_pretty_string()),
        OutputFormat::Ast => {
            let mut out = build_ast(result).to_pretty_string(result.input());
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&ParseReport::new(result))?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Human-readable summary of the work counters.
#[must_use]
pub fn render_stats(stats: &ParseStats) -> String {
    format!(
        "clause matches: {}\ncache hits: {}\nlr expansions: {}\nrecoveries: {}\ntime: {:?}\n",
        stats.clause_matches,
        stats.cache_hits,
        stats.lr_expansions,
        stats.recovery_attempts,
        stats.parse_time
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use squirrel::{Grammar, Parser, ParserConfig};

    fn parse(input: &str) -> ParseResult {
        let grammar = Grammar::from_spec("S <- A \"+\" A ;\nA <- [0-9] ;").unwrap();
        let config = ParserConfig::new().with_stats(true);
        Parser::with_config(&grammar, "S", input, config).unwrap().parse()
    }

    #[test]
    fn test_ast_format() {
        let out = render(&parse("1+2"), OutputFormat::Ast).unwrap();
        let expected = "\
S
|---A
|   `---<Terminal>: \"1\"
|---<Terminal>: \"+\"
`---A
    `---<Terminal>: \"2\"
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_error_reports() {
        let result = parse("1+x2");
        assert_eq!(
            error_reports(&result),
            [ErrorReport {
                pos: 2,
                len: 1,
                message: "1 characters of unexpected input at pos 2".into(),
            }]
        );
    }

    #[test]
    fn test_json_format() {
        let out = render(&parse("1+"), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["top_rule"], "S");
        assert_eq!(json["has_syntax_errors"], true);
        assert_eq!(json["errors"][0]["message"], "Missing grammar element A at pos 2");
        assert_eq!(json["ast"]["label"], "S");
        assert!(json["stats"]["clause_matches"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_stats_summary() {
        let result = parse("1+2");
        let summary = render_stats(result.stats().unwrap());
        assert!(summary.starts_with("clause matches: "));
        assert!(summary.contains("recoveries: 0\n"));
    }
}
