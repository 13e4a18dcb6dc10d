// tests/evaluator_tests.rs

use mdcalc::units::SimpleUnitLibrary;
use mdcalc::{
    CalcError, Environment, EvalError, FunctionDef, LatexFormatter, MathError, OperatorDef,
    ParseError,
};

fn env() -> Environment {
    Environment::new(Box::new(SimpleUnitLibrary))
}

fn eval(code: &str) -> Result<f64, CalcError> {
    env().calculate(code).map(|c| c.value)
}

fn eval_error(code: &str) -> EvalError {
    match env().calculate(code) {
        Err(CalcError::Eval(e)) => e,
        other => panic!("expected an evaluation error for {}, got {:?}", code, other),
    }
}

// ============================================================================
// Arithmetic and Precedence
// ============================================================================

#[test]
fn test_arithmetic() {
    let test_cases = vec![
        ("2+3*4", 14.0),
        ("(2+3)*4", 20.0),
        ("10-4-3", 3.0),
        ("10-(4-3)", 9.0),
        ("2*3^2", 18.0),
        ("2^3^2", 64.0),
        ("1+2*3^2-4/2", 17.0),
        ("7//2", 3.5),
        ("7%4", 3.0),
        ("1.5*4", 6.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input), Ok(expected), "Failed for input: {}", input);
    }
}

#[test]
fn test_functions() {
    let test_cases = vec![
        ("sqrt(16)", 4.0),
        ("max(1, 2)+min(1, 2)", 3.0),
        ("floor(2.7)+ceil(2.2)", 5.0),
        ("round(2.5)", 3.0),
        ("abs(0-3)", 3.0),
        ("neg(2)*3", -6.0),
        ("ln(1)", 0.0),
        ("2*sqrt(max(9, 4))", 6.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input), Ok(expected), "Failed for input: {}", input);
    }
}

#[test]
fn test_constant_function() {
    assert_eq!(eval("pi()"), Ok(std::f64::consts::PI));
}

// ============================================================================
// Custom Tables
// ============================================================================

#[test]
fn test_custom_operator_without_precedence() {
    let mut env = env();
    env.define_operator(
        "&",
        OperatorDef::new(|a, b| Ok(a * 10.0 + b), "@l\\&@r"),
        None,
    );
    let test_cases = vec![
        // loosest
        ("1&2*3", 16.0),
        ("2*3&1", 61.0),
        ("1&2^2", 14.0),
        // left-associative, also next to `+` on the same level
        ("1&2&3", 123.0),
        ("1+2&3", 33.0),
        ("1&2+3", 15.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            env.calculate(input).map(|c| c.value),
            Ok(expected),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_bare_environment() {
    let mut env = Environment::bare(
        Box::new(LatexFormatter::default()),
        Box::new(SimpleUnitLibrary),
    );
    assert_eq!(
        env.calculate("1+1"),
        Err(CalcError::Eval(EvalError::UndefinedOperator("+".into())))
    );

    env.define_operator("+", OperatorDef::new(|a, b| Ok(a + b), "@l+@r"), Some(0));
    env.define_function("twice", 1, FunctionDef::new(|x| Ok(2.0 * x[0]), "2@1"));
    assert_eq!(env.calculate("twice(1+1)").unwrap().value, 4.0);
    assert_eq!(
        env.calculate("sqrt(4)"),
        Err(CalcError::Eval(EvalError::UndefinedFunction("sqrt".into())))
    );
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_variables_persist_between_blocks() {
    let mut env = env();
    env.calculate("x = 10 : initial value").unwrap();
    assert_eq!(env.calculate("x * 2").unwrap().value, 20.0);
    assert_eq!(env.variable("x").unwrap().value, 10.0);
}

#[test]
fn test_assignment_evaluates_before_right_operand() {
    let mut env = env();
    assert_eq!(env.calculate("(x=3)+x").unwrap().value, 6.0);
    assert_eq!(env.variable("x").unwrap().value, 3.0);
}

#[test]
fn test_reassignment() {
    let mut env = env();
    env.calculate("x = 1").unwrap();
    env.calculate("x = x + 1").unwrap();
    assert_eq!(env.variable("x").unwrap().value, 2.0);
}

#[test]
fn test_assignment_keeps_unit() {
    let mut env = env();
    env.calculate("d = 5 m").unwrap();
    let d = env.variable("d").unwrap();
    assert_eq!(d.value, 5.0);
    assert_eq!(d.unit, "m");
}

#[test]
fn test_assignment_before_failure_is_kept() {
    let mut env = env();
    let result = env.calculate("(a=2)+b");
    assert_eq!(
        result,
        Err(CalcError::Eval(EvalError::UndefinedVariable("b".into())))
    );
    assert_eq!(env.variable("a").unwrap().value, 2.0);
    assert!(env.variable("b").is_none());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_undefined_variable_leaves_store_unchanged() {
    let mut env = env();
    assert!(env.calculate("y + 1").is_err());
    assert!(env.variables().is_empty());
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        eval_error("1/0"),
        EvalError::Operator {
            symbol: "/".into(),
            error: MathError::DivisionByZero,
        }
    );
    assert!(matches!(
        eval_error("5%0"),
        EvalError::Operator {
            error: MathError::DivisionByZero,
            ..
        }
    ));
}

#[test]
fn test_function_errors() {
    assert_eq!(eval_error("foo(1)"), EvalError::UndefinedFunction("foo".into()));
    assert_eq!(
        eval_error("sqrt(1, 2)"),
        EvalError::WrongArity {
            name: "sqrt".into(),
            count: 2,
        }
    );
    assert!(matches!(
        eval_error("sqrt(0-4)"),
        EvalError::Function {
            error: MathError::Domain(_),
            ..
        }
    ));
}

#[test]
fn test_non_finite_result() {
    assert!(matches!(
        eval_error("10^400"),
        EvalError::Operator {
            error: MathError::NotFinite,
            ..
        }
    ));
}

#[test]
fn test_unknown_operator() {
    assert_eq!(eval_error("2**3"), EvalError::UndefinedOperator("**".into()));
}

#[test]
fn test_assign_to_number() {
    assert_eq!(eval_error("5 = 3"), EvalError::AssignToNumber("5".into()));
}

#[test]
fn test_syntax_error_is_reported() {
    assert_eq!(
        eval("-5"),
        Err(CalcError::Syntax(ParseError::MissingOperand("-".into())))
    );
}

#[test]
fn test_error_display() {
    assert_eq!(
        eval_error("1/0").to_string(),
        "error on operator '/': divide by zero"
    );
    assert_eq!(
        eval("-5").unwrap_err().to_string(),
        "syntax error: operator '-' is missing an operand"
    );
}
