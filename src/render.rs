//! Unit propagation and rendering of evaluated trees.
//!
//! Both passes run after evaluation and read the recorded [`Evaluation`]
//! instead of evaluating again.
use crate::{
    ast::{Annotation, Expr},
    environment::Environment,
    evaluator::Evaluation,
    format::Precision,
    units::UnitError,
};

/// Which side of its parent operator an operand is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A placeholder of a markup template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `@l`
    Left,
    /// `@r`
    Right,
    /// `@1`, `@2`, ... (1-based)
    Param(usize),
}

/// Substitutes placeholders in a single pass, so substituted text is never
/// scanned again. Unknown placeholders are kept as written.
///
/// # Examples
/// ```
/// use mdcalc::render::{fill_template, Placeholder};
///
/// let out = fill_template("\\dfrac{@l}{@r}", |p| match p {
///     Placeholder::Left => Some("a".to_string()),
///     Placeholder::Right => Some("b".to_string()),
///     Placeholder::Param(_) => None,
/// });
/// assert_eq!(out, "\\dfrac{a}{b}");
/// ```
pub fn fill_template(template: &str, mut value: impl FnMut(Placeholder) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '@' {
            out.push(c);
            continue;
        }
        let (placeholder, written) = match chars.peek() {
            Some('l') => (Some(Placeholder::Left), "l".to_string()),
            Some('r') => (Some(Placeholder::Right), "r".to_string()),
            Some(d) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(*d);
                    chars.next();
                }
                (digits.parse().ok().map(Placeholder::Param), digits)
            }
            _ => (None, String::new()),
        };
        if matches!(placeholder, Some(Placeholder::Left | Placeholder::Right)) {
            chars.next();
        }
        match placeholder.and_then(&mut value) {
            Some(text) => out.push_str(&text),
            None => {
                out.push('@');
                out.push_str(&written);
            }
        }
    }
    out
}

impl Environment {
    /// Unit of `left symbol right`.
    ///
    /// An operand without a unit takes the unit of the other operand and
    /// equal units are kept; only two different units are combined by the
    /// unit library.
    pub(crate) fn combine_units(&mut self, symbol: &str, left: &str, right: &str) -> String {
        if left.is_empty() {
            return right.to_string();
        }
        if right.is_empty() || left == right {
            return left.to_string();
        }
        let Some(order_matters) = self.operators.get(symbol).map(|op| op.order_matters) else {
            return String::new();
        };
        let combined = self.units.combine(left, right, symbol, order_matters);
        self.degrade(combined)
    }

    /// Display name of a unit, looked up once per block.
    fn display_name(&mut self, unit: &str) -> String {
        if unit.is_empty() {
            return String::new();
        }
        if let Some(name) = self.display_names.get(unit) {
            return name.clone();
        }
        let name = self.units.display_name(unit);
        let name = self.degrade(name);
        self.display_names.insert(unit.to_string(), name.clone());
        name
    }

    /// A unit that cannot be resolved is rendered empty.
    fn degrade(&mut self, unit: Result<String, UnitError>) -> String {
        unit.unwrap_or_else(|e| {
            self.diagnostics.push(e);
            String::new()
        })
    }

    /// Single line markup of a node.
    ///
    /// Numbers and variables render as their values. A comment renders as
    /// its result at its own precision; its steps are shown on its own line
    /// by [`Environment::render_steps`].
    pub fn render_expr(&mut self, expr: &Expr, evaluation: &Evaluation) -> String {
        match expr {
            Expr::Literal(_) => {
                let unit = self.display_name(&evaluation.unit);
                self.formatter
                    .render_number(evaluation.value, Precision::Natural, &unit, "")
            }
            Expr::UnitOverride { child, .. } => match child.as_ref() {
                Expr::Literal(_) => {
                    let unit = self.display_name(&evaluation.unit);
                    self.formatter
                        .render_number(evaluation.value, Precision::Natural, &unit, "")
                }
                _ => self.render_expr(child, evaluation.child(0)),
            },
            Expr::Comment { annotation, .. } => {
                let unit = self.display_name(&evaluation.unit);
                self.formatter.render_number(
                    evaluation.value,
                    Precision::Places(annotation.precision),
                    &unit,
                    "",
                )
            }
            Expr::VarSetter { child, .. } => self.render_expr(child, evaluation.child(0)),
            Expr::Operator {
                symbol,
                left,
                right,
            } => self.render_operator(symbol, left, right, evaluation),
            Expr::Function { name, params } => self.render_function(name, params, evaluation),
            Expr::OperatorChain { operators, values } => {
                let mut out = String::new();
                for (i, value) in values.iter().enumerate() {
                    if let Some(symbol) = i.checked_sub(1).and_then(|j| operators.get(j)) {
                        out.push_str(symbol);
                    }
                    if let Some(evaluation) = evaluation.children().get(i) {
                        out.push_str(&self.render_expr(value, evaluation));
                    }
                }
                out
            }
        }
    }

    fn render_operator(
        &mut self,
        symbol: &str,
        left: &Expr,
        right: &Expr,
        evaluation: &Evaluation,
    ) -> String {
        let (template, paren_left, paren_right) = match self.operators.get(symbol) {
            Some(op) => (op.template.clone(), op.paren_left, op.paren_right),
            None => (format!("@l{}@r", symbol), true, true),
        };
        let precedence = self.precedence(symbol);

        let mut left_text = self.render_expr(left, evaluation.child(0));
        if paren_left && self.needs_parens(left, evaluation.child(0), precedence, Side::Left) {
            left_text = self.formatter.render_parenthesized(&left_text);
        }
        let mut right_text = self.render_expr(right, evaluation.child(1));
        if paren_right && self.needs_parens(right, evaluation.child(1), precedence, Side::Right) {
            right_text = self.formatter.render_parenthesized(&right_text);
        }

        fill_template(&template, |placeholder| match placeholder {
            Placeholder::Left => Some(left_text.clone()),
            Placeholder::Right => Some(right_text.clone()),
            Placeholder::Param(_) => None,
        })
    }

    /// An operand needs parentheses when it binds looser than its parent,
    /// or equally loose on the right: `a-(b-c)`. An operand starting with a
    /// minus binds like a product and is always wrapped on the right:
    /// `(-3)^{2}`, `2-(-3)`.
    fn needs_parens(&self, operand: &Expr, evaluation: &Evaluation, parent: i32, side: Side) -> bool {
        let (operand, evaluation) = shown(operand, evaluation);
        if self.is_signed(operand, evaluation) {
            return side == Side::Right || self.precedence("*") < parent;
        }
        let Expr::Operator { symbol, .. } = operand else {
            return false;
        };
        let own = self.precedence(symbol);
        match side {
            Side::Left => own < parent,
            Side::Right => own <= parent,
        }
    }

    /// True if the markup of a node starts with a minus sign.
    fn is_signed(&self, expr: &Expr, evaluation: &Evaluation) -> bool {
        match expr {
            Expr::Literal(_) | Expr::UnitOverride { .. } | Expr::Comment { .. } => {
                evaluation.value < 0.0
            }
            Expr::Function { name, params } => self
                .function(name, params.len())
                .is_ok_and(|def| def.template.starts_with('-')),
            _ => false,
        }
    }

    fn render_function(&mut self, name: &str, params: &[Expr], evaluation: &Evaluation) -> String {
        let (template, paren_params) = match self.function(name, params.len()) {
            Ok(def) => (def.template.clone(), def.paren_params),
            Err(_) => {
                let placeholders: Vec<String> =
                    (1..=params.len()).map(|i| format!("@{}", i)).collect();
                (format!("\\mathrm{{{}}}({})", name, placeholders.join(", ")), false)
            }
        };
        let mut rendered = Vec::with_capacity(params.len());
        for (param, evaluation) in params.iter().zip(evaluation.children()) {
            let mut text = self.render_expr(param, evaluation);
            let (param, evaluation) = shown(param, evaluation);
            if paren_params
                && (matches!(param, Expr::Operator { .. }) || self.is_signed(param, evaluation))
            {
                text = self.formatter.render_parenthesized(&text);
            }
            rendered.push(text);
        }
        fill_template(&template, |placeholder| match placeholder {
            Placeholder::Param(i) => i.checked_sub(1).and_then(|i| rendered.get(i)).cloned(),
            _ => None,
        })
    }

    /// All step lines of a calculation: one per comment node, a comment's
    /// own steps before its line, left to right. With the root being a
    /// comment, its line comes last.
    pub fn render_steps(&mut self, expr: &Expr, evaluation: &Evaluation) -> Vec<String> {
        let mut lines = vec![];
        self.collect_steps(expr, evaluation, &mut lines);
        lines
    }

    fn collect_steps(&mut self, expr: &Expr, evaluation: &Evaluation, lines: &mut Vec<String>) {
        match expr {
            Expr::Comment { annotation, child } => {
                self.collect_steps(child, evaluation.child(0), lines);
                let line = self.step_line(annotation, child, evaluation);
                lines.push(line);
            }
            Expr::UnitOverride { child, .. } | Expr::VarSetter { child, .. } => {
                self.collect_steps(child, evaluation.child(0), lines);
            }
            Expr::Operator { left, right, .. } => {
                self.collect_steps(left, evaluation.child(0), lines);
                self.collect_steps(right, evaluation.child(1), lines);
            }
            Expr::Function { params, .. } => {
                for (param, evaluation) in params.iter().zip(evaluation.children()) {
                    self.collect_steps(param, evaluation, lines);
                }
            }
            Expr::Literal(_) | Expr::OperatorChain { .. } => {}
        }
    }

    fn step_line(&mut self, annotation: &Annotation, child: &Expr, evaluation: &Evaluation) -> String {
        let expr = self.render_expr(child, evaluation.child(0));
        let unit = self.display_name(&evaluation.unit);
        let result = self.formatter.render_number(
            evaluation.value,
            Precision::Places(annotation.precision),
            &unit,
            &annotation.caption,
        );
        self.formatter.render_line(&expr, &result)
    }
}

/// The node whose markup stands for `expr`: assignments and unit overrides
/// of anything but a plain number render as their child.
fn shown<'a>(expr: &'a Expr, evaluation: &'a Evaluation) -> (&'a Expr, &'a Evaluation) {
    match expr {
        Expr::VarSetter { child, .. } => shown(child, evaluation.child(0)),
        Expr::UnitOverride { child, .. } if !matches!(child.as_ref(), Expr::Literal(_)) => {
            shown(child, evaluation.child(0))
        }
        _ => (expr, evaluation),
    }
}
