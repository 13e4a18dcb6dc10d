//! Markup formatting of numbers, step lines and calculation blocks.
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used for numbers inside an expression.
pub const NATURAL_PLACES: u32 = 10;

/// How many decimals a rendered number keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Numbers inside an expression; rounded only to hide float noise
    Natural,
    /// Results; rounded to this many decimal places
    Places(u32),
}

impl Precision {
    pub fn places(self) -> u32 {
        match self {
            Precision::Natural => NATURAL_PLACES,
            Precision::Places(n) => n,
        }
    }
}

/// Produces the markup of a calculation.
pub trait Formatter {
    /// One step: an expression and the result it evaluates to.
    fn render_line(&self, expr: &str, result: &str) -> String;

    /// A number with its unit display name and an optional caption.
    fn render_number(&self, value: f64, precision: Precision, unit: &str, caption: &str) -> String;

    fn render_parenthesized(&self, expr: &str) -> String;

    /// Lays out the step lines of one calculation block.
    fn render_block(&self, lines: &[String]) -> String;
}

/// LaTeX `align*` output for markdown renderers with math support.
#[derive(Debug, Clone)]
pub struct LatexFormatter {
    /// Character written between the integer and fractional digits
    pub decimal_separator: char,
}

impl Default for LatexFormatter {
    fn default() -> Self {
        LatexFormatter {
            decimal_separator: ',',
        }
    }
}

impl LatexFormatter {
    pub fn with_decimal_separator(decimal_separator: char) -> Self {
        LatexFormatter { decimal_separator }
    }
}

/// Rounds half away from zero and drops trailing zeros.
///
/// # Examples
/// ```
/// use mdcalc::format::round_to;
///
/// assert_eq!(round_to(14.0, 2), "14");
/// assert_eq!(round_to(0.1 + 0.2, 10), "0.3");
/// assert_eq!(round_to(1.25, 1), "1.3");
/// assert_eq!(round_to(1e300, 10), format!("{}", 1e300));
/// ```
pub fn round_to(value: f64, places: u32) -> String {
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string(),
        // outside of the decimal range; plain float rounding is close enough
        None => {
            let factor = 10f64.powi(places.min(300) as i32);
            let scaled = value * factor;
            if value.fract() == 0.0 || !scaled.is_finite() {
                format!("{}", value)
            } else {
                format!("{}", scaled.round() / factor)
            }
        }
    }
}

impl Formatter for LatexFormatter {
    fn render_line(&self, expr: &str, result: &str) -> String {
        format!("{} &= {}\\\\ \\\\ \n", expr, result)
    }

    fn render_number(&self, value: f64, precision: Precision, unit: &str, caption: &str) -> String {
        let mut number = round_to(value, precision.places());
        if self.decimal_separator != '.' {
            number = number.replace('.', &self.decimal_separator.to_string());
        }
        let unit = if unit.is_empty() {
            String::new()
        } else {
            format!(" {}", unit)
        };
        let caption = if caption.is_empty() {
            String::new()
        } else {
            format!("\\textit{{ ({})}}", caption)
        };
        format!("\\textbf{{{}}}\\text{{\\scriptsize{{{}}}}}{}", number, unit, caption)
    }

    fn render_parenthesized(&self, expr: &str) -> String {
        format!("({})", expr)
    }

    fn render_block(&self, lines: &[String]) -> String {
        let mut block = String::from("$$\n\\begin{align*}");
        for line in lines {
            block.push('\n');
            block.push_str(line);
        }
        block.push_str("\n\\end{align*}\n$$");
        block
    }
}
