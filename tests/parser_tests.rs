// tests/parser_tests.rs

use mdcalc::ast::{Annotation, Expr};
use mdcalc::lexer::Lexer;
use mdcalc::parser::{ParseError, Parser};

fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = Lexer::new(input).tokenize();
    Parser::new(&tokens).parse()
}

fn chain(operators: &[&str], values: Vec<Expr>) -> Expr {
    Expr::OperatorChain {
        operators: operators.iter().map(|s| s.to_string()).collect(),
        values,
    }
}

fn lit(s: &str) -> Expr {
    Expr::literal(s)
}

// ============================================================================
// Operands
// ============================================================================

#[test]
fn test_single_literal() {
    assert_eq!(parse("42").unwrap(), lit("42"));
}

#[test]
fn test_flat_chain() {
    assert_eq!(
        parse("2+3*4").unwrap(),
        chain(&["+", "*"], vec![lit("2"), lit("3"), lit("4")])
    );
}

#[test]
fn test_group_is_one_operand() {
    assert_eq!(
        parse("(a+b)*c").unwrap(),
        chain(
            &["*"],
            vec![chain(&["+"], vec![lit("a"), lit("b")]), lit("c")]
        )
    );
}

#[test]
fn test_redundant_parentheses() {
    assert_eq!(parse("((7))").unwrap(), lit("7"));
}

#[test]
fn test_unit_wraps_preceding_value() {
    assert_eq!(
        parse("5 m").unwrap(),
        Expr::UnitOverride {
            unit: "m".into(),
            child: Box::new(lit("5")),
        }
    );
}

#[test]
fn test_unit_on_group() {
    let expected = Expr::UnitOverride {
        unit: "kg".into(),
        child: Box::new(chain(&["+"], vec![lit("a"), lit("b")])),
    };
    assert_eq!(parse("(a+b)kg").unwrap(), expected);
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_function_arguments_split_on_commas() {
    let expected = Expr::Function {
        name: "max".into(),
        params: vec![lit("1"), chain(&["+"], vec![lit("2"), lit("3")])],
    };
    assert_eq!(parse("max(1, 2+3)").unwrap(), expected);
}

#[test]
fn test_nested_call_commas_belong_to_inner_call() {
    let inner = Expr::Function {
        name: "min".into(),
        params: vec![lit("a"), lit("b")],
    };
    let expected = Expr::Function {
        name: "max".into(),
        params: vec![inner, lit("c")],
    };
    assert_eq!(parse("max(min(a,b),c)").unwrap(), expected);
}

#[test]
fn test_call_without_arguments() {
    let expected = Expr::Function {
        name: "pi".into(),
        params: vec![],
    };
    assert_eq!(parse("pi()").unwrap(), expected);
}

#[test]
fn test_call_in_chain() {
    let call = Expr::Function {
        name: "sqrt".into(),
        params: vec![lit("16")],
    };
    assert_eq!(
        parse("2*sqrt(16)").unwrap(),
        chain(&["*"], vec![lit("2"), call])
    );
}

// ============================================================================
// Comments and Assignments
// ============================================================================

#[test]
fn test_assignment_with_comment() {
    let expected = Expr::VarSetter {
        name: "x".into(),
        child: Box::new(Expr::Comment {
            annotation: Annotation::parse("initial value"),
            child: Box::new(lit("10")),
        }),
    };
    assert_eq!(parse("x=10:initial value").unwrap(), expected);
}

#[test]
fn test_comment_in_group() {
    let area = Expr::Comment {
        annotation: Annotation::parse("area"),
        child: Box::new(chain(&["*"], vec![lit("w"), lit("h")])),
    };
    assert_eq!(
        parse("(w*h:area)*d").unwrap(),
        chain(&["*"], vec![area, lit("d")])
    );
}

#[test]
fn test_precision_directive() {
    let Expr::Comment { annotation, .. } = parse("1/3:#4 a third").unwrap() else {
        panic!("expected a comment");
    };
    assert_eq!(annotation.precision, 4);
    assert_eq!(annotation.caption, "a third");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_syntax_errors() {
    let test_cases = vec![
        ("", ParseError::EmptyExpression),
        ("()", ParseError::EmptyExpression),
        ("2 3", ParseError::UnexpectedLiteral("3".into())),
        ("2 (3)", ParseError::UnexpectedOpenParen),
        ("2)", ParseError::UnexpectedCloseParen),
        ("(2", ParseError::MissingCloseParen),
        ("-5", ParseError::MissingOperand("-".into())),
        ("5+", ParseError::MissingOperand("+".into())),
        ("1:a)+2", ParseError::UnexpectedComment("a".into())),
        ("(1:a)(2)", ParseError::UnexpectedOpenParen),
        ("1, 2", ParseError::UnexpectedComma),
        ("1+x=2", ParseError::UnexpectedAssignment("x".into())),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse(input), Err(expected), "Failed for input: {}", input);
    }
}

#[test]
fn test_comment_runs_to_end_of_group() {
    assert_eq!(
        parse("(1:one)+(2:two)3"),
        Err(ParseError::UnexpectedLiteral("3".into()))
    );
    assert_eq!(
        parse("(1:one 2)"),
        Ok(Expr::Comment {
            annotation: Annotation::parse("one 2"),
            child: Box::new(lit("1")),
        })
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(ParseError::EmptyExpression.to_string(), "expected expression");
    assert_eq!(
        ParseError::MissingOperand("-".into()).to_string(),
        "operator '-' is missing an operand"
    );
}
