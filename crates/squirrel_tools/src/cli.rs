//! CLI interface for squirrel-tools

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squirrel")]
#[command(about = "Check PEG grammars and parse input with them")]
#[command(version)]
pub struct Cli {
    /// Log parser phases to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse input with a grammar
    Parse(ParseArgs),

    /// Validate a grammar specification
    Check {
        /// Grammar specification file
        #[arg(short, long)]
        grammar: PathBuf,

        /// Print the normalized grammar instead of the rule names
        #[arg(short, long)]
        print: bool,
    },
}

#[derive(Args)]
pub struct ParseArgs {
    /// Grammar specification file
    #[arg(short, long)]
    pub grammar: PathBuf,

    /// Rule to start parsing from
    #[arg(short, long)]
    pub rule: String,

    /// Input file
    #[arg(short, long, conflicts_with = "text", required_unless_present = "text")]
    pub input: Option<PathBuf>,

    /// Input given inline
    #[arg(short, long)]
    pub text: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "tree")]
    pub format: OutputFormat,

    /// Print work counters
    #[arg(long)]
    pub stats: bool,

    /// Stop after the discovery phase
    #[arg(long)]
    pub no_recovery: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented match tree
    Tree,
    /// Simplified syntax tree
    Ast,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "ast" => Ok(Self::Ast),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Supported: tree, ast, json")),
        }
    }
}
