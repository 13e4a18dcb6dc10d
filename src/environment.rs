use std::{collections::HashMap, fmt};

use crate::{
    ast::Expr,
    builtins,
    evaluator::{EvalError, MathError},
    format::{Formatter, LatexFormatter},
    lexer::Lexer,
    parser::{ParseError, Parser},
    resolve::{precedence_of, resolve},
    units::{UnitError, UnitLibrary},
    value::Variable,
};

/// Evaluates both operands of a binary operator.
pub type BinaryFn = fn(f64, f64) -> Result<f64, MathError>;

/// Evaluates a function call; the slice always has the registered arity.
pub type CallFn = fn(&[f64]) -> Result<f64, MathError>;

/// A binary operator of the language.
#[derive(Debug, Clone)]
pub struct OperatorDef {
    pub apply: BinaryFn,
    /// Markup with `@l` and `@r` for the rendered operands
    pub template: String,
    /// Operands may be parenthesized; false for layouts like a fraction bar
    pub paren_left: bool,
    pub paren_right: bool,
    /// False for commutative operators
    pub order_matters: bool,
}

impl OperatorDef {
    pub fn new(apply: BinaryFn, template: &str) -> Self {
        OperatorDef {
            apply,
            template: template.to_string(),
            paren_left: true,
            paren_right: true,
            order_matters: true,
        }
    }

    pub fn commutative(mut self) -> Self {
        self.order_matters = false;
        self
    }

    pub fn parens(mut self, left: bool, right: bool) -> Self {
        self.paren_left = left;
        self.paren_right = right;
        self
    }
}

/// A function of fixed arity.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub apply: CallFn,
    /// Markup with `@1`, `@2`, ... for the rendered parameters
    pub template: String,
    /// Operator and negative parameters are parenthesized
    pub paren_params: bool,
}

impl FunctionDef {
    pub fn new(apply: CallFn, template: &str) -> Self {
        FunctionDef {
            apply,
            template: template.to_string(),
            paren_params: false,
        }
    }

    /// For templates that place parameters next to other symbols, like `-@1`.
    pub fn parenthesized(mut self) -> Self {
        self.paren_params = true;
        self
    }
}

/// Failure of one calculation block.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    Syntax(ParseError),
    Eval(EvalError),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Syntax(e) => write!(f, "syntax error: {}", e),
            CalcError::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalcError::Syntax(e) => Some(e),
            CalcError::Eval(e) => Some(e),
        }
    }
}

impl From<ParseError> for CalcError {
    fn from(e: ParseError) -> Self {
        CalcError::Syntax(e)
    }
}

impl From<EvalError> for CalcError {
    fn from(e: EvalError) -> Self {
        CalcError::Eval(e)
    }
}

/// Outcome of one calculation block.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub value: f64,
    pub unit: String,
    /// Step lines; intermediate results first, the final result last
    pub lines: Vec<String>,
}

/// Compile session of one document.
///
/// Holds the operator and function tables, the variable store shared by all
/// calculation blocks of the document, and the formatter and unit library
/// used for output. Blocks must be run in document order, since a block may
/// read variables assigned by an earlier one.
///
/// # Examples
///
/// ```
/// use mdcalc::Environment;
/// use mdcalc::units::SimpleUnitLibrary;
///
/// let mut env = Environment::new(Box::new(SimpleUnitLibrary));
/// env.calculate("x = 10 : initial value").unwrap();
/// let result = env.calculate("x * 2").unwrap();
/// assert_eq!(result.value, 20.0);
/// ```
pub struct Environment {
    pub(crate) operators: HashMap<String, OperatorDef>,
    pub(crate) functions: HashMap<String, HashMap<usize, FunctionDef>>,
    pub(crate) precedence: HashMap<String, i32>,
    pub(crate) variables: HashMap<String, Variable>,
    pub(crate) formatter: Box<dyn Formatter>,
    pub(crate) units: Box<dyn UnitLibrary>,
    pub(crate) diagnostics: Vec<UnitError>,
    /// Display names resolved for the block being rendered
    pub(crate) display_names: HashMap<String, String>,
}

impl Environment {
    /// Session with the standard operators and functions and LaTeX output.
    pub fn new(units: Box<dyn UnitLibrary>) -> Self {
        Environment {
            operators: builtins::operators(),
            functions: builtins::functions(),
            precedence: builtins::precedence(),
            ..Environment::bare(Box::new(LatexFormatter::default()), units)
        }
    }

    /// Session without any operators or functions.
    pub fn bare(formatter: Box<dyn Formatter>, units: Box<dyn UnitLibrary>) -> Self {
        Environment {
            operators: HashMap::new(),
            functions: HashMap::new(),
            precedence: HashMap::new(),
            variables: HashMap::new(),
            formatter,
            units,
            diagnostics: vec![],
            display_names: HashMap::new(),
        }
    }

    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Adds or replaces an operator. Without a precedence level it binds
    /// loosest, like every symbol missing from the precedence table.
    pub fn define_operator(&mut self, symbol: &str, def: OperatorDef, precedence: Option<i32>) {
        self.operators.insert(symbol.to_string(), def);
        match precedence {
            Some(level) => self.precedence.insert(symbol.to_string(), level),
            None => self.precedence.remove(symbol),
        };
    }

    pub fn define_function(&mut self, name: &str, arity: usize, def: FunctionDef) {
        self.functions
            .entry(name.to_string())
            .or_default()
            .insert(arity, def);
    }

    pub fn precedence(&self, symbol: &str) -> i32 {
        precedence_of(symbol, &self.precedence)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> &HashMap<String, Variable> {
        &self.variables
    }

    /// Unit problems met since the last call. They never fail a block; the
    /// affected unit is rendered empty instead.
    pub fn take_diagnostics(&mut self) -> Vec<UnitError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Hands the unit library back, e.g. to reuse it for the next document.
    pub fn into_units(self) -> Box<dyn UnitLibrary> {
        self.units
    }

    /// Parses a calculation into its final tree: operator chains are
    /// resolved and the root is always a comment.
    pub fn parse(&self, code: &str) -> Result<Expr, CalcError> {
        let tokens = Lexer::new(code).tokenize();
        let tree = Parser::new(&tokens).parse()?;
        Ok(resolve(tree, &self.precedence).into_root())
    }

    /// Runs one calculation block.
    ///
    /// Evaluation (including assignments) completes before anything is
    /// rendered. Assignments made before a failure are kept.
    pub fn calculate(&mut self, code: &str) -> Result<Calculation, CalcError> {
        let tree = self.parse(code)?;
        let evaluation = self.evaluate(&tree)?;
        self.display_names.clear();
        let lines = self.render_steps(&tree, &evaluation);
        Ok(Calculation {
            value: evaluation.value,
            unit: evaluation.unit,
            lines,
        })
    }

    /// Step lines of one calculation block.
    pub fn compile(&mut self, code: &str) -> Result<Vec<String>, CalcError> {
        Ok(self.calculate(code)?.lines)
    }

    /// Appends the laid out block of one calculation to `out`. Nothing is
    /// written if the calculation fails.
    pub fn write_calculation(&mut self, code: &str, out: &mut String) -> Result<(), CalcError> {
        let lines = self.compile(code)?;
        out.push_str(&self.formatter.render_block(&lines));
        Ok(())
    }
}
