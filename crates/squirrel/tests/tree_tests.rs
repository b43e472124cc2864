//! AST projection and CST construction

use pretty_assertions::assert_eq;
use squirrel::tree::{SYNTAX_ERROR_LABEL, TERMINAL_LABEL};
use squirrel::{
    AstNode, CstError, CstFactories, SquirrelError, squirrel_parse_ast, squirrel_parse_cst,
};

const ARITH: &str = r#"
    Sum  <- Sum ~Sp "+" ~Sp Num / Num ;
    Num  <- [0-9]+ ;
    ~Sp  <- ' '* ;
"#;

#[derive(Debug, PartialEq)]
enum Calc {
    Num(i64),
    Add(Box<Calc>, Box<Calc>),
    Token,
    Error,
}

impl Calc {
    fn eval(&self) -> i64 {
        match self {
            Self::Num(n) => *n,
            Self::Add(l, r) => l.eval() + r.eval(),
            Self::Token | Self::Error => 0,
        }
    }
}

fn calc_factories(input: &str) -> CstFactories<'_, Calc> {
    CstFactories::new()
        .with("Sum", |_, children| {
            let mut operands = children.into_iter().filter(|c| *c != Calc::Token);
            match (operands.next(), operands.next()) {
                (Some(l), Some(r)) => Calc::Add(Box::new(l), Box::new(r)),
                (Some(only), None) => only,
                _ => Calc::Error,
            }
        })
        .unwrap()
        .with("Num", move |node, _| {
            let digits: String = node
                .children
                .iter()
                .filter(|c| !c.is_syntax_error())
                .map(|c| c.text(input))
                .collect();
            Calc::Num(digits.parse().unwrap_or_default())
        })
        .unwrap()
        .with(TERMINAL_LABEL, |_, _| Calc::Token)
        .unwrap()
        .with(SYNTAX_ERROR_LABEL, |_, _| Calc::Error)
        .unwrap()
}

fn labels(node: &AstNode) -> Vec<&str> {
    node.children.iter().map(|c| c.label.as_str()).collect()
}

#[test]
fn test_ast_keeps_rules_and_terminals() {
    let ast = squirrel_parse_ast(ARITH, "Sum", "1 + 23").unwrap();
    assert_eq!(ast.label, "Sum");
    assert_eq!((ast.pos, ast.len), (0, 6));
    // The transparent spacing rule disappears with its content.
    assert_eq!(labels(&ast), ["Sum", TERMINAL_LABEL, "Num"]);
    assert_eq!(ast.children[1].text("1 + 23"), "+");
    assert_eq!(ast.child("Num").unwrap().text("1 + 23"), "23");
}

#[test]
fn test_ast_pretty_string() {
    let input = "1+2";
    let ast = squirrel_parse_ast(ARITH, "Sum", input).unwrap();
    let expected = "\
Sum
|---Sum
|   `---Num
|       `---<Terminal>: \"1\"
|---<Terminal>: \"+\"
`---Num
    `---<Terminal>: \"2\"";
    assert_eq!(ast.to_pretty_string(input), expected);
}

#[test]
fn test_ast_includes_syntax_errors() {
    let input = "1+x2";
    let ast = squirrel_parse_ast(ARITH, "Sum", input).unwrap();
    // Recovery happens inside the digit repetition of the only Num, which
    // skips the operator along with the garbage.
    assert_eq!(labels(&ast), ["Num"]);
    let mut errors = Vec::new();
    collect_errors(&ast, &mut errors);
    assert_eq!(errors.len(), 1);
    assert_eq!((errors[0].pos, errors[0].len), (1, 2));
    assert_eq!(errors[0].text(input), "+x");
}

fn collect_errors<'a>(node: &'a AstNode, out: &mut Vec<&'a AstNode>) {
    if node.is_syntax_error() {
        out.push(node);
    }
    for child in &node.children {
        collect_errors(child, out);
    }
}

#[test]
fn test_ast_appends_unmatched_input() {
    let spec = "Pair <- Word '=' Word ;\nWord <- [a-z]+ ;";
    let ast = squirrel_parse_ast(spec, "Pair", "k=v;;").unwrap();
    assert_eq!(labels(&ast), ["Word", TERMINAL_LABEL, "Word", SYNTAX_ERROR_LABEL]);
    let last = ast.children.last().unwrap();
    assert_eq!((last.pos, last.len), (3, 2));
    assert_eq!((ast.pos, ast.len), (0, 5));
}

#[test]
fn test_ast_recovers_trailing_garbage_inside_repetition() {
    let input = "1+2)";
    let ast = squirrel_parse_ast(ARITH, "Sum", input).unwrap();
    assert_eq!(ast.children.last().unwrap().label, "Num");
    let mut errors = Vec::new();
    collect_errors(&ast, &mut errors);
    let spans: Vec<_> = errors.iter().map(|e| (e.pos, e.len)).collect();
    assert_eq!(spans, [(1, 1), (3, 1)]);
    assert_eq!((ast.pos, ast.len), (0, 4));
}

#[test]
fn test_cst_evaluates() {
    let input = "1 + 2 + 39";
    let factories = calc_factories(input);
    let calc = squirrel_parse_cst(ARITH, "Sum", input, &factories, false).unwrap();
    assert_eq!(calc.eval(), 42);
    let Calc::Add(left, _) = &calc else {
        panic!("expected an addition, got {calc:?}");
    };
    assert!(matches!(**left, Calc::Add(..)));
}

#[test]
fn test_cst_rejects_syntax_errors_unless_allowed() {
    let input = "1+x2";
    let factories = calc_factories(input);
    let err = squirrel_parse_cst(ARITH, "Sum", input, &factories, false).unwrap_err();
    assert!(matches!(err, SquirrelError::Cst(CstError::SyntaxError(_))));

    // The skipped "+x" leaves the digits of a single number.
    let calc = squirrel_parse_cst(ARITH, "Sum", input, &factories, true).unwrap();
    assert_eq!(calc.eval(), 12);
}

#[test]
fn test_cst_missing_factory() {
    let factories = CstFactories::<()>::new()
        .with("Sum", |_, _| ())
        .unwrap()
        .with(TERMINAL_LABEL, |_, _| ())
        .unwrap();
    let err = squirrel_parse_cst(ARITH, "Sum", "7", &factories, false).unwrap_err();
    assert_eq!(err.to_string(), "No factory found for rule \"Num\"");
}
