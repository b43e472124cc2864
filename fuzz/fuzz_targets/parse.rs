#![no_main]
use libfuzzer_sys::fuzz_target;
use squirrel::{Grammar, Parser, build_ast};
use std::sync::LazyLock;

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| {
    Grammar::from_spec(
        r#"
        Expr   <- Expr "+" Term / Expr "-" Term / Term ;
        Term   <- Term "*" Factor / Factor ;
        Factor <- "(" Expr ")" / "-" Factor / Number ;
        Number <- [0-9]+ ("." [0-9]+)? ;
        "#,
    )
    .unwrap()
});

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let result = Parser::new(&GRAMMAR, "Expr", input).unwrap().parse();

    // The root and any unmatched tail together cover the input.
    let len = input.chars().count();
    let root = result.root();
    assert_eq!(root.pos(), 0);
    let end = result.unmatched_input().map_or(root.end(), |tail| {
        assert_eq!(tail.pos(), root.end());
        tail.end()
    });
    assert_eq!(end, len);

    for error in result.syntax_errors() {
        assert!(error.end() <= len);
    }
    let _ = build_ast(&result);
});
