//! Precedence resolution.
//!
//! The parser leaves runs like `a + b * c` as flat operator chains. This pass
//! first applies every chain strictly left to right, `((a + b) * c)`, and
//! then rotates nodes down the left spine wherever an operator binds tighter
//! than the operator below it, giving `a + (b * c)`.
use std::collections::HashMap;

use crate::ast::Expr;

/// Precedence of `symbol`; operators missing from the table bind loosest.
pub fn precedence_of(symbol: &str, table: &HashMap<String, i32>) -> i32 {
    table.get(symbol).copied().unwrap_or(0)
}

/// Rewrites every operator chain of the tree into nested binary operators.
///
/// Other nodes keep their shape. Resolving a tree without chains returns it
/// unchanged.
pub fn resolve(expr: Expr, table: &HashMap<String, i32>) -> Expr {
    match expr {
        Expr::Literal(_) => expr,
        Expr::UnitOverride { unit, child } => Expr::UnitOverride {
            unit,
            child: Box::new(resolve(*child, table)),
        },
        Expr::Comment { annotation, child } => Expr::Comment {
            annotation,
            child: Box::new(resolve(*child, table)),
        },
        Expr::VarSetter { name, child } => Expr::VarSetter {
            name,
            child: Box::new(resolve(*child, table)),
        },
        Expr::Operator {
            symbol,
            left,
            right,
        } => Expr::Operator {
            symbol,
            left: Box::new(resolve(*left, table)),
            right: Box::new(resolve(*right, table)),
        },
        Expr::Function { name, params } => Expr::Function {
            name,
            params: params.into_iter().map(|p| resolve(p, table)).collect(),
        },
        Expr::OperatorChain { operators, values } => {
            // operands are resolved after rotating, so groups stay intact
            let tree = fix_precedence(left_deep(operators, values), table);
            resolve(tree, table)
        }
    }
}

/// Applies the operators strictly left to right.
fn left_deep(operators: Vec<String>, values: Vec<Expr>) -> Expr {
    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return Expr::OperatorChain {
            operators,
            values: vec![],
        };
    };
    operators
        .into_iter()
        .zip(values)
        .fold(first, |left, (symbol, right)| Expr::Operator {
            symbol,
            left: Box::new(left),
            right: Box::new(right),
        })
}

fn fix_precedence(expr: Expr, table: &HashMap<String, i32>) -> Expr {
    let Expr::Operator {
        symbol,
        left,
        right,
    } = expr
    else {
        return expr;
    };
    if !matches!(*left, Expr::Operator { .. }) {
        return Expr::Operator {
            symbol,
            left,
            right,
        };
    }
    match fix_precedence(*left, table) {
        Expr::Operator {
            symbol: lower,
            left: lower_left,
            right: lower_right,
        } if precedence_of(&symbol, table) > precedence_of(&lower, table) => {
            // the demoted node takes over the right operand of its old child
            let demoted = Expr::Operator {
                symbol,
                left: lower_right,
                right,
            };
            Expr::Operator {
                symbol: lower,
                left: lower_left,
                right: Box::new(fix_precedence(demoted, table)),
            }
        }
        fixed => Expr::Operator {
            symbol,
            left: Box::new(fixed),
            right,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HashMap<String, i32> {
        HashMap::from([
            ("*".to_string(), 1),
            ("/".to_string(), 1),
            ("^".to_string(), 2),
        ])
    }

    fn chain(operators: &[&str], values: &[&str]) -> Expr {
        Expr::OperatorChain {
            operators: operators.iter().map(|s| s.to_string()).collect(),
            values: values.iter().map(|v| Expr::literal(v)).collect(),
        }
    }

    #[test]
    fn test_equal_precedence_stays_left_associative() {
        let resolved = resolve(chain(&["-", "-"], &["a", "b", "c"]), &table());
        let expected = Expr::operator(
            "-",
            Expr::operator("-", Expr::literal("a"), Expr::literal("b")),
            Expr::literal("c"),
        );
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_tighter_operator_nests_deeper() {
        let resolved = resolve(chain(&["+", "*"], &["a", "b", "c"]), &table());
        let expected = Expr::operator(
            "+",
            Expr::literal("a"),
            Expr::operator("*", Expr::literal("b"), Expr::literal("c")),
        );
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_three_levels() {
        let resolved = resolve(chain(&["+", "*", "^"], &["a", "b", "c", "d"]), &table());
        let expected = Expr::operator(
            "+",
            Expr::literal("a"),
            Expr::operator(
                "*",
                Expr::literal("b"),
                Expr::operator("^", Expr::literal("c"), Expr::literal("d")),
            ),
        );
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_unknown_operator_binds_loosest() {
        let resolved = resolve(chain(&["*", "?"], &["a", "b", "c"]), &table());
        let expected = Expr::operator(
            "?",
            Expr::operator("*", Expr::literal("a"), Expr::literal("b")),
            Expr::literal("c"),
        );
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_resolving_twice_changes_nothing() {
        let once = resolve(chain(&["*", "+", "^"], &["a", "b", "c", "d"]), &table());
        let twice = resolve(once.clone(), &table());
        assert_eq!(once, twice);
        assert!(!twice.has_chain());
    }
}
