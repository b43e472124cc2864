//! Grammar construction through the builder API

use squirrel::grammar::{CharRange, Clause, Expr, GrammarBuilder};
use squirrel::{GrammarError, Parser};
use std::thread;

fn key_value() -> squirrel::Grammar {
    GrammarBuilder::new()
        .rule(
            "Pair",
            Expr::seq([Expr::rule("Key"), Expr::rule("Sep"), Expr::rule("Value")]),
        )
        .rule("Key", Expr::plus(Expr::range('a', 'z')))
        .rule("~Sep", Expr::seq([Expr::star(" ".into()), '='.into(), Expr::star(" ".into())]))
        .rule(
            "Value",
            Expr::plus(Expr::class([CharRange::new('0', '9'), CharRange::single('.')])),
        )
        .build()
        .expect("valid grammar")
}

#[test]
fn test_builder_grammar_parses() {
    let grammar = key_value();
    let result = Parser::new(&grammar, "Pair", "width = 1.5").unwrap().parse();
    assert!(!result.has_syntax_errors());
    assert_eq!(result.root().len(), 11);
}

#[test]
fn test_rule_refs_resolve_to_rule_bodies() {
    let grammar = key_value();
    let pair = grammar.rule("Pair").unwrap();
    let Clause::Sequence(children) = grammar.clause(pair) else {
        panic!("Pair should be a sequence");
    };
    assert_eq!(grammar.rule_name(children[0]), Some("Key"));
    match grammar.clause(children[0]) {
        Clause::RuleRef { target, .. } => assert_eq!(Some(*target), grammar.rule("Key")),
        other => panic!("unexpected clause {other:?}"),
    }
    assert!(grammar.rule_name(pair).is_none());
}

#[test]
fn test_transparent_rules_listed() {
    let grammar = key_value();
    assert_eq!(
        grammar.rule_names().collect::<Vec<_>>(),
        ["Pair", "Key", "Sep", "Value"]
    );
    assert_eq!(grammar.transparent_rules().collect::<Vec<_>>(), ["Sep"]);
    assert!(grammar.is_transparent("Sep"));
    assert!(!grammar.is_transparent("Key"));
}

#[test]
fn test_grammar_display() {
    let grammar = key_value();
    let expected = "Pair <- (Key Sep Value) ;\n\
                    Key <- [a-z]+ ;\n\
                    ~Sep <- (\" \"* '=' \" \"*) ;\n\
                    Value <- [0-9.]+ ;\n";
    assert_eq!(grammar.to_string(), expected);
}

#[test]
fn test_undefined_reference_message() {
    let err = GrammarBuilder::new()
        .rule("S", Expr::seq([Expr::lit("a"), Expr::rule("T")]))
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "Rule \"T\" not found");
}

#[test]
fn test_empty_choice_rejected() {
    let err = GrammarBuilder::new()
        .rule("S", Expr::first(Vec::new()))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::EmptyClause {
            rule: "S".into(),
            kind: "choice",
        }
    );
}

#[test]
fn test_unknown_top_rule() {
    let grammar = key_value();
    let err = Parser::new(&grammar, "Missing", "x").err().unwrap();
    assert_eq!(err.to_string(), "Rule \"Missing\" not found");
}

#[test]
fn test_grammar_shared_across_threads() {
    let grammar = key_value();
    let handles: Vec<_> = ["a=1", "bb = 2.0", "c=x"]
        .into_iter()
        .map(|input| {
            let grammar = grammar.clone();
            thread::spawn(move || {
                let result = Parser::new(&grammar, "Pair", input).unwrap().parse();
                result.has_syntax_errors()
            })
        })
        .collect();
    let errors: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(errors, [false, false, true]);
}

#[test]
fn test_sequential_parses_reuse_grammar() {
    let grammar = key_value();
    for _ in 0..3 {
        let result = Parser::new(&grammar, "Pair", "k=1").unwrap().parse();
        assert!(!result.has_syntax_errors());
    }
}
