//! Squirrel Tools CLI
//!
//! Command-line tools for working with squirrel grammars.

use clap::Parser;
use squirrel::{Grammar, ParserConfig};
use squirrel_tools::cli::{Cli, Commands, ParseArgs};
use squirrel_tools::report::{render, render_stats};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "squirrel=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let outcome = match cli.command {
        Commands::Parse(args) => parse(&args),
        Commands::Check { grammar, print } => check(&grammar, print),
    };
    match outcome {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn load_grammar(path: &Path) -> Result<Grammar, Box<dyn std::error::Error>> {
    let spec = fs::read_to_string(path)
        .map_err(|e| format!("cannot read grammar {}: {e}", path.display()))?;
    info!(path = %path.display(), "loading grammar");
    Ok(Grammar::from_spec(&spec)?)
}

fn check(path: &Path, print: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let grammar = load_grammar(path)?;
    if print {
        print!("{grammar}");
    } else {
        for name in grammar.rule_names() {
            let marker = if grammar.is_transparent(name) { "~" } else { "" };
            println!("{marker}{name}");
        }
        info!(rules = grammar.rule_names().count(), "grammar ok");
    }
    Ok(ExitCode::SUCCESS)
}

fn parse(args: &ParseArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let grammar = load_grammar(&args.grammar)?;
    let input = match (&args.input, &args.text) {
        (Some(path), _) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read input {}: {e}", path.display()))?,
        (None, Some(text)) => text.clone(),
        (None, None) => return Err("no input given".into()),
    };

    let config = ParserConfig::new()
        .with_recovery(!args.no_recovery)
        .with_stats(args.stats);
    let result = squirrel::Parser::with_config(&grammar, &args.rule, &input, config)?.parse();

    print!("{}", render(&result, args.format)?);
    if let Some(stats) = result.stats() {
        eprint!("{}", render_stats(stats));
    }
    for error in result.syntax_errors() {
        eprintln!("syntax error: {}", error.describe(&grammar));
    }

    Ok(if result.has_syntax_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
