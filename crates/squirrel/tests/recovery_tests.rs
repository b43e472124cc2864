//! Error recovery in sequences, repetitions and choices

mod common;

use common::{parse_rule, run, run_rule};
use squirrel::ParserConfig;

#[test]
fn test_clean_sequences_have_no_errors() {
    assert_eq!(run(r#"S <- "a" "b" ;"#, "ab").error_count, 0);
    assert_eq!(run(r#"S <- ("a" "b") "c" ;"#, "abc").error_count, 0);
    let long = run(
        r#"S <- "a" "b" "c" "d" "e" "f" "g" "h" "i" "j" "k" "l" "m" "n" "o" "p" ;"#,
        "abcdefghijklmnop",
    );
    assert!(long.ok);
    assert_eq!(long.error_count, 0);
}

#[test]
fn test_sequence_skips_inserted_input() {
    let outcome = run(r#"S <- "a" "b" "c" ;"#, "aXbc");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.skipped, ["X"]);

    let outcome = run(r#"S <- "a" "b" "c" ;"#, "aXXbc");
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.skipped("XX"));

    let outcome = run(r#"S <- "a" "b" "c" ;"#, "abXXc");
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.skipped("XX"));
}

#[test]
fn test_long_garbage_is_one_error() {
    let outcome = run(r#"S <- "a" "b" "c" ;"#, "aXXXXbc");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.skipped, ["XXXX"]);
}

#[test]
fn test_nested_sequence_recovers() {
    let outcome = run(r#"S <- ("a" "b") "c" ;"#, "aXbc");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.skipped("X"));
}

#[test]
fn test_no_mid_input_deletion() {
    // Assuming "b" is missing before "c" would be a deletion away from the
    // end of input, which recovery never does.
    let result = parse_rule(r#"S <- "a" "b" "c" ;"#, "S", "ac");
    assert!(!result.is_match());
    assert!(result.root().is_syntax_error());
    assert_eq!((result.root().pos(), result.root().len()), (0, 2));
    assert!(result.unmatched_input().is_none());
    assert_eq!(result.error_count(), 1);
}

#[test]
fn test_deletion_at_end_of_input() {
    let outcome = run(r#"S <- "a" "b" "c" ;"#, "ab");
    assert!(outcome.ok);
    assert_eq!(outcome.deletions, 1);

    let outcome = run(r#"S <- "a" "b" / "c" ;"#, "a");
    assert!(outcome.ok);
    assert_eq!(outcome.deletions, 1);
}

#[test]
fn test_empty_input_deletes_every_element() {
    let result = parse_rule(r#"S <- "a" "b" ;"#, "S", "");
    assert!(result.has_syntax_errors());
    assert!(result.is_match());
    let errors = result.syntax_errors();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.is_deletion() && e.pos == 0));
    assert!(errors[0].describe(result.grammar()).contains("\"a\""));
}

#[test]
fn test_multi_char_literal_is_atomic() {
    // "abc" cannot match "abX", and "X" cannot be skipped inside it.
    let result = parse_rule(r#"S <- "abc" "def" ;"#, "S", "abXdef");
    assert!(!result.is_match());
    assert_eq!(result.root().len(), 6);
}

#[test]
fn test_alternating_errors() {
    let outcome = run(r#"S <- "a" "b" "c" "d" ;"#, "aXbYcZd");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 3);
    assert_eq!(outcome.skipped, ["X", "Y", "Z"]);
}

#[test]
fn test_repetition_recovery() {
    let outcome = run(r#"S <- "ab"+ ;"#, "abXXab");
    assert_eq!((outcome.error_count, outcome.skipped.clone()), (1, vec!["XX".to_string()]));

    let outcome = run(r#"S <- "ab"+ ;"#, "abXabYab");
    assert_eq!(outcome.error_count, 2);
    assert!(outcome.skipped("X") && outcome.skipped("Y"));

    let outcome = run(r#"S <- "ab"+ ;"#, &format!("ab{}ab", "X".repeat(50)));
    assert_eq!(outcome.error_count, 1);

    let outcome = run(r#"S <- "ab"+ ;"#, "abXabXabXab");
    assert_eq!(outcome.error_count, 3);
}

#[test]
fn test_repetition_skips_before_first_iteration() {
    let outcome = run(r#"S <- "ab"+ ;"#, "XXab");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.skipped("XX"));

    let outcome = run(r#"S <- "ab"* "!" ;"#, "XXab!");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.skipped("XX"));
}

#[test]
fn test_trailing_input_after_clean_repetition() {
    let result = parse_rule(r#"S <- "ab"+ ;"#, "S", "ababXX");
    assert!(result.is_match());
    assert_eq!(result.error_count(), 1);
    let tail = result.unmatched_input().expect("trailing input");
    assert_eq!((tail.pos(), tail.len()), (4, 2));
}

#[test]
fn test_trailing_input_after_recovered_repetition() {
    let outcome = run("S <- A ;\nA <- (\"a\" / \"b\")+ ;", "abxbxax");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 3);
    assert_eq!(outcome.skipped, ["x", "x", "x"]);

    let outcome = run(r#"S <- "ab"+ ;"#, "XXabX");
    assert_eq!(outcome.error_count, 2);
    assert_eq!(outcome.skipped, ["XX", "X"]);

    let outcome = run(r#"S <- "a"+ ;"#, "aXaY");
    assert_eq!(outcome.error_count, 2);
}

#[test]
fn test_many_repetition_errors() {
    let input = format!("{}ab", "abZ".repeat(20));
    let outcome = run(r#"S <- "ab"+ ;"#, &input);
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 20);
}

#[test]
fn test_bound_stops_repetition_before_delimiter() {
    let outcome = run("S <- A \"end\" ;\nA <- \"x\"+ ;", "xxxxend");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 0);

    let outcome = run("S <- A \"end\" ;\nA <- \"ab\"+ ;", "abXabYabend");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 2);
    assert_eq!(outcome.skipped, ["X", "Y"]);
}

#[test]
fn test_bound_through_nested_rules() {
    let spec = "S <- A \";\" B \"end\" ;\nA <- \"x\"+ ;\nB <- \"y\"+ ;";
    assert_eq!(run(spec, "xxxx;yyyyend").error_count, 0);

    let spec = "S <- A \"end\" ;\nA <- \"a\" B / \"fallback\" ;\nB <- \"x\"+ ;";
    assert_eq!(run(spec, "axxxxend").error_count, 0);
}

#[test]
fn test_first_alternative_selection() {
    let outcome = run(r#"S <- "a" / "b" / "c" ;"#, "x");
    assert!(!outcome.ok);

    // Longer with an error beats a shorter clean alternative.
    let outcome = run(r#"S <- "a" "b" / "c" ;"#, "aXb");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);

    // An error rate of one half loses to a lower one.
    let outcome = run(r#"S <- "a" "b" "c" "d" / "a" "b" "c" ;"#, "aXbc");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.deletions, 0);

    let outcome = run(r#"S <- "x"+ "y" / "a"+ "b" ;"#, "xxxXy");
    assert_eq!(outcome.error_count, 1);
}

#[test]
fn test_trailing_input_after_complete_choice() {
    let outcome = run(r#"S <- "a" / "b" ;"#, "aXXX");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.skipped("XXX"));
}

#[test]
fn test_unicode_units() {
    let outcome = run(r#"S <- "α"+ ;"#, "αβα");
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.skipped, ["β"]);

    let outcome = run(r#"S <- "中"+ ;"#, "中文中");
    assert_eq!(outcome.skipped, ["文"]);

    let outcome = run(r#"S <- "x"+ ;"#, "x   x");
    assert_eq!(outcome.skipped, ["   "]);

    assert_eq!(run(r#"S <- "α" "中" "!" ;"#, "α中!").error_count, 0);
    assert_eq!(run(r#"S <- "a" "\t" "b" ;"#, "a\tb").error_count, 0);
}

#[test]
fn test_left_recursive_recovery() {
    let direct = "S <- E ;\nE <- E \"+n\" / \"n\" ;";
    assert!(!run(direct, "+n+n+n+").ok);

    let outcome = run(direct, "n+n+nXXX");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert!(outcome.skipped("XXX"));

    let outcome = run_rule(r#"E <- E "+" "n" / "n" ;"#, "E", "n+Xn");
    assert!(outcome.ok);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.skipped, ["X"]);
}

#[test]
fn test_recovery_disabled_stops_after_discovery() {
    let grammar = common::grammar(r#"S <- "a" "b" "c" ;"#);
    let config = ParserConfig::default().with_recovery(false);
    let result = squirrel::Parser::with_config(&grammar, "S", "aXbc", config)
        .unwrap()
        .parse();
    assert!(result.has_syntax_errors());
    assert!(!result.is_match());
    assert_eq!(result.error_count(), 1);
}

#[test]
fn test_recovery_is_counted_in_stats() {
    let grammar = common::grammar(r#"S <- "ab"+ ;"#);
    let (result, _) = common::work(&grammar, "S", "abXabYab");
    let stats = result.stats().expect("stats enabled");
    assert!(stats.recovery_attempts >= 2);
}
