//! Standard operator, function and precedence tables.
use std::collections::HashMap;

use crate::{
    environment::{FunctionDef, OperatorDef},
    evaluator::MathError,
};

pub fn precedence() -> HashMap<String, i32> {
    [("+", 0), ("-", 0), ("*", 1), ("/", 1), ("//", 1), ("%", 1), ("^", 2)]
        .into_iter()
        .map(|(symbol, level)| (symbol.to_string(), level))
        .collect()
}

pub fn operators() -> HashMap<String, OperatorDef> {
    let mut ops = HashMap::new();
    ops.insert(
        "+".to_string(),
        OperatorDef::new(|a, b| Ok(a + b), "@l+@r").commutative(),
    );
    ops.insert("-".to_string(), OperatorDef::new(|a, b| Ok(a - b), "@l-@r"));
    ops.insert(
        "*".to_string(),
        OperatorDef::new(|a, b| Ok(a * b), "@l\\cdot @r").commutative(),
    );
    ops.insert(
        "/".to_string(),
        OperatorDef::new(divide, "\\dfrac{@l}{@r}").parens(false, false),
    );
    ops.insert("//".to_string(), OperatorDef::new(divide, "@l/@r"));
    ops.insert(
        "%".to_string(),
        OperatorDef::new(remainder, "@l \\bmod @r"),
    );
    ops.insert(
        "^".to_string(),
        OperatorDef::new(|a, b| Ok(a.powf(b)), "@l^{@r}").parens(true, false),
    );
    ops
}

fn divide(a: f64, b: f64) -> Result<f64, MathError> {
    if b == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a / b)
}

fn remainder(a: f64, b: f64) -> Result<f64, MathError> {
    if b == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(a % b)
}

pub fn functions() -> HashMap<String, HashMap<usize, FunctionDef>> {
    let defs: [(&str, usize, FunctionDef); 20] = [
        ("floor", 1, FunctionDef::new(|x| Ok(x[0].floor()), "\\lfloor @1\\rfloor")),
        ("ceil", 1, FunctionDef::new(|x| Ok(x[0].ceil()), "\\lceil @1\\rceil")),
        ("round", 1, FunctionDef::new(|x| Ok(x[0].round()), "\\mathrm{round}(@1)")),
        ("round", 2, FunctionDef::new(round_places, "\\mathrm{round}(@1, @2)")),
        ("abs", 1, FunctionDef::new(|x| Ok(x[0].abs()), "\\left|@1\\right|")),
        ("sqrt", 1, FunctionDef::new(square_root, "\\sqrt{@1}")),
        ("root", 2, FunctionDef::new(nth_root, "\\sqrt[@2]{@1}")),
        ("neg", 1, FunctionDef::new(|x| Ok(-x[0]), "-@1").parenthesized()),
        ("ln", 1, FunctionDef::new(natural_log, "\\ln(@1)")),
        ("log", 1, FunctionDef::new(common_log, "\\log(@1)")),
        ("log", 2, FunctionDef::new(log_base, "\\log_{@2}(@1)")),
        ("exp", 1, FunctionDef::new(|x| Ok(x[0].exp()), "e^{@1}")),
        ("sin", 1, FunctionDef::new(|x| Ok(x[0].sin()), "\\sin(@1)")),
        ("cos", 1, FunctionDef::new(|x| Ok(x[0].cos()), "\\cos(@1)")),
        ("tan", 1, FunctionDef::new(|x| Ok(x[0].tan()), "\\tan(@1)")),
        ("min", 2, FunctionDef::new(|x| Ok(x[0].min(x[1])), "\\min(@1, @2)")),
        ("max", 2, FunctionDef::new(|x| Ok(x[0].max(x[1])), "\\max(@1, @2)")),
        ("pi", 0, FunctionDef::new(|_| Ok(std::f64::consts::PI), "\\pi")),
        ("e", 0, FunctionDef::new(|_| Ok(std::f64::consts::E), "e")),
        (
            "mod",
            2,
            FunctionDef::new(|x| remainder(x[0], x[1]), "@1 \\bmod @2").parenthesized(),
        ),
    ];

    let mut functions: HashMap<String, HashMap<usize, FunctionDef>> = HashMap::new();
    for (name, arity, def) in defs {
        functions
            .entry(name.to_string())
            .or_default()
            .insert(arity, def);
    }
    functions
}

fn round_places(x: &[f64]) -> Result<f64, MathError> {
    if x[1] < 0.0 || x[1].fract() != 0.0 {
        return Err(MathError::Domain(format!(
            "cannot round to {} places",
            x[1]
        )));
    }
    let factor = 10f64.powf(x[1]);
    Ok((x[0] * factor).round() / factor)
}

fn square_root(x: &[f64]) -> Result<f64, MathError> {
    if x[0] < 0.0 {
        return Err(MathError::Domain(format!(
            "square root of negative number {}",
            x[0]
        )));
    }
    Ok(x[0].sqrt())
}

fn nth_root(x: &[f64]) -> Result<f64, MathError> {
    let (value, degree) = (x[0], x[1]);
    if degree == 0.0 {
        return Err(MathError::Domain("root of degree 0".to_string()));
    }
    if value < 0.0 {
        // odd integer degrees have a real root
        if degree.fract() == 0.0 && degree % 2.0 != 0.0 {
            return Ok(-(-value).powf(1.0 / degree));
        }
        return Err(MathError::Domain(format!(
            "root of degree {} of negative number {}",
            degree, value
        )));
    }
    Ok(value.powf(1.0 / degree))
}

fn positive(name: &str, value: f64) -> Result<f64, MathError> {
    if value <= 0.0 {
        return Err(MathError::Domain(format!(
            "{} of non-positive number {}",
            name, value
        )));
    }
    Ok(value)
}

fn natural_log(x: &[f64]) -> Result<f64, MathError> {
    Ok(positive("logarithm", x[0])?.ln())
}

fn common_log(x: &[f64]) -> Result<f64, MathError> {
    Ok(positive("logarithm", x[0])?.log10())
}

fn log_base(x: &[f64]) -> Result<f64, MathError> {
    let base = positive("logarithm base", x[1])?;
    if base == 1.0 {
        return Err(MathError::Domain("logarithm base 1".to_string()));
    }
    Ok(positive("logarithm", x[0])?.log(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_arities() {
        let functions = functions();
        assert!(functions["round"].contains_key(&1));
        assert!(functions["round"].contains_key(&2));
        assert!(functions["pi"].contains_key(&0));
        assert!(!functions["sqrt"].contains_key(&2));
    }

    #[test]
    fn test_every_operator_has_a_precedence() {
        let precedence = precedence();
        for symbol in operators().keys() {
            assert!(precedence.contains_key(symbol), "{}", symbol);
        }
    }

    #[test]
    fn test_domain_errors() {
        assert!(matches!(square_root(&[-4.0]), Err(MathError::Domain(_))));
        assert!(matches!(log_base(&[8.0, 1.0]), Err(MathError::Domain(_))));
        assert!((nth_root(&[-8.0, 3.0]).unwrap() + 2.0).abs() < 1e-12);
        assert_eq!(divide(1.0, 0.0), Err(MathError::DivisionByZero));
    }
}
