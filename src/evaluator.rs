use std::fmt;

use crate::{
    ast::Expr,
    environment::{Environment, FunctionDef},
    lexer::is_numeric,
    units::NO_UNIT,
    value::Variable,
};

/// Failure inside an operator or function implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    DivisionByZero,

    /// Argument outside of the domain, e.g. the root of a negative number
    Domain(String),

    /// The result is infinite or not a number
    NotFinite,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DivisionByZero => write!(f, "divide by zero"),
            MathError::Domain(msg) => write!(f, "{}", msg),
            MathError::NotFinite => write!(f, "result is not a finite number"),
        }
    }
}

impl std::error::Error for MathError {}

/// Errors that stop the evaluation of a calculation block.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Reference to a variable no earlier assignment created
    UndefinedVariable(String),

    UndefinedOperator(String),

    UndefinedFunction(String),

    /// The function exists, but not with this many parameters
    WrongArity { name: String, count: usize },

    /// Assignment to a name made of digits only
    AssignToNumber(String),

    /// Numeral that does not parse, e.g. `1.2.3`
    InvalidNumber(String),

    /// Operator implementation failed
    Operator { symbol: String, error: MathError },

    /// Function implementation failed
    Function { name: String, error: MathError },

    /// Operator chain left in the tree by skipping precedence resolution
    UnresolvedChain,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UndefinedVariable(name) => write!(f, "variable '{}' undefined", name),
            EvalError::UndefinedOperator(symbol) => {
                write!(f, "operator '{}' not defined", symbol)
            }
            EvalError::UndefinedFunction(name) => write!(f, "function '{}' does not exist", name),
            EvalError::WrongArity { name, count } => write!(
                f,
                "function '{}' did not expect {} parameter(s)",
                name, count
            ),
            EvalError::AssignToNumber(name) => write!(f, "cannot assign to number '{}'", name),
            EvalError::InvalidNumber(text) => write!(f, "error while parsing number '{}'", text),
            EvalError::Operator { symbol, error } => {
                write!(f, "error on operator '{}': {}", symbol, error)
            }
            EvalError::Function { name, error } => {
                write!(f, "error in function '{}': {}", name, error)
            }
            EvalError::UnresolvedChain => write!(f, "operator chain was not resolved"),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Operator { error, .. } | EvalError::Function { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Values computed for a tree, in the shape of the tree.
///
/// Every node gets one `Evaluation`, with one child per child node in the
/// same order (`[child]` for wrappers, `[left, right]` for operators, the
/// parameters for functions). Rendering reads these values instead of
/// evaluating again, so it never repeats an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    /// Unit of the node, worked out once while evaluating
    pub unit: String,
    children: Vec<Evaluation>,
}

impl Evaluation {
    fn leaf(value: f64, unit: String) -> Self {
        Evaluation {
            value,
            unit,
            children: vec![],
        }
    }

    fn node(value: f64, unit: String, children: Vec<Evaluation>) -> Self {
        Evaluation {
            value,
            unit,
            children,
        }
    }

    fn wrap(child: Evaluation) -> Self {
        Evaluation::node(child.value, child.unit.clone(), vec![child])
    }

    pub fn child(&self, index: usize) -> &Evaluation {
        &self.children[index]
    }

    pub fn children(&self) -> &[Evaluation] {
        &self.children
    }
}

fn finite(value: f64) -> Result<f64, MathError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::NotFinite)
    }
}

impl Environment {
    /// Evaluates a resolved tree.
    ///
    /// Operands are evaluated left to right and each one completely,
    /// assignments included, before the next starts. The unit of every node
    /// is resolved here, once, and recorded with its value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Evaluation, EvalError> {
        match expr {
            Expr::Comment { child, .. } => Ok(Evaluation::wrap(self.evaluate(child)?)),
            Expr::UnitOverride { unit, child } => {
                let inner = self.evaluate(child)?;
                let unit = if unit == NO_UNIT { "" } else { unit.as_str() };
                Ok(Evaluation::node(inner.value, unit.to_string(), vec![inner]))
            }
            Expr::VarSetter { name, child } => {
                if is_numeric(name) {
                    return Err(EvalError::AssignToNumber(name.clone()));
                }
                let inner = self.evaluate(child)?;
                self.variables
                    .insert(name.clone(), Variable::new(inner.value, &inner.unit));
                Ok(Evaluation::wrap(inner))
            }
            Expr::Literal(text) => {
                let variable = self.lookup(text)?;
                Ok(Evaluation::leaf(variable.value, variable.unit))
            }
            Expr::Operator {
                symbol,
                left,
                right,
            } => {
                let apply = self
                    .operators
                    .get(symbol)
                    .map(|op| op.apply)
                    .ok_or_else(|| EvalError::UndefinedOperator(symbol.clone()))?;
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let value = apply(left.value, right.value)
                    .and_then(finite)
                    .map_err(|error| EvalError::Operator {
                        symbol: symbol.clone(),
                        error,
                    })?;
                let unit = self.combine_units(symbol, &left.unit, &right.unit);
                Ok(Evaluation::node(value, unit, vec![left, right]))
            }
            Expr::Function { name, params } => {
                let apply = self.function(name, params.len())?.apply;
                let mut args = Vec::with_capacity(params.len());
                for param in params {
                    args.push(self.evaluate(param)?);
                }
                let values: Vec<f64> = args.iter().map(|arg| arg.value).collect();
                let value = apply(&values)
                    .and_then(finite)
                    .map_err(|error| EvalError::Function {
                        name: name.clone(),
                        error,
                    })?;
                Ok(Evaluation::node(value, String::new(), args))
            }
            Expr::OperatorChain { .. } => Err(EvalError::UnresolvedChain),
        }
    }

    /// Reads a literal: numerals parse as numbers, anything else is a
    /// variable of the store.
    pub fn lookup(&self, text: &str) -> Result<Variable, EvalError> {
        if is_numeric(text) {
            return text
                .parse::<f64>()
                .map(|value| Variable::new(value, ""))
                .map_err(|_| EvalError::InvalidNumber(text.to_string()));
        }
        self.variables
            .get(text)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(text.to_string()))
    }

    pub(crate) fn function(&self, name: &str, arity: usize) -> Result<&FunctionDef, EvalError> {
        let overloads = self
            .functions
            .get(name)
            .ok_or_else(|| EvalError::UndefinedFunction(name.to_string()))?;
        overloads.get(&arity).ok_or_else(|| EvalError::WrongArity {
            name: name.to_string(),
            count: arity,
        })
    }
}
