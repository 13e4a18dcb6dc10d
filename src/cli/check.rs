//! Run calculations without a document

use super::CliError;
use crate::{CalcError, Environment, LatexFormatter, UnitError, units::SimpleUnitLibrary};

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Calculations, run in order in one environment
    pub expressions: Vec<String>,
    /// Character between integer and fractional digits
    pub decimal_separator: char,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            expressions: vec![],
            decimal_separator: ',',
        }
    }
}

/// Outcome of one checked calculation
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedLine {
    pub code: String,
    pub outcome: Result<CheckedValue, CalcError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckedValue {
    pub value: f64,
    pub unit: String,
    /// Laid out block of the calculation
    pub markup: String,
}

/// Result of a check operation
#[derive(Debug)]
pub struct CheckResult {
    pub lines: Vec<CheckedLine>,
    /// Unit problems met while rendering
    pub warnings: Vec<UnitError>,
}

impl CheckResult {
    pub fn failed(&self) -> bool {
        self.lines.iter().any(|line| line.outcome.is_err())
    }
}

/// Execute a check: every expression is a calculation block, and later
/// blocks see the variables of earlier ones. Units are named after the
/// operations that produced them.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.expressions.is_empty() {
        return Err(CliError::NoInput);
    }

    let mut env = Environment::new(Box::new(SimpleUnitLibrary))
        .with_formatter(LatexFormatter::with_decimal_separator(options.decimal_separator));
    let lines = options
        .expressions
        .iter()
        .map(|code| {
            let outcome = env.calculate(code).map(|calculation| CheckedValue {
                markup: env.formatter.render_block(&calculation.lines),
                value: calculation.value,
                unit: calculation.unit,
            });
            CheckedLine {
                code: code.clone(),
                outcome,
            }
        })
        .collect();

    Ok(CheckResult {
        lines,
        warnings: env.take_diagnostics(),
    })
}
