use std::fmt;

use crate::ast::{Annotation, Expr, Token};

/// Builds a syntax tree from the tokens of one calculation.
///
/// The result may still contain [`Expr::OperatorChain`] nodes; see
/// [`crate::resolve`].
pub struct Parser<'a> {
    tokens: &'a [Token],
}

/// Malformed token sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Nothing to build, e.g. `()` or an empty line
    EmptyExpression,

    /// Unit without a value in front of it
    UnitWithoutValue(String),

    /// Two values without an operator between them
    UnexpectedLiteral(String),

    /// Group directly after a value
    UnexpectedOpenParen,

    /// `)` without a matching `(`
    UnexpectedCloseParen,

    /// `(` without a matching `)`
    MissingCloseParen,

    /// Operator with nothing on one of its sides
    MissingOperand(String),

    /// Function token that is not followed by its argument list
    MissingFunctionParen(String),

    /// Comment that does not end a calculation or a group
    UnexpectedComment(String),

    /// Assignment that does not start a calculation or a group
    UnexpectedAssignment(String),

    /// Comma outside of a function call
    UnexpectedComma,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyExpression => write!(f, "expected expression"),
            ParseError::UnitWithoutValue(unit) => {
                write!(f, "cannot have unit without expression, got unit '{}'", unit)
            }
            ParseError::UnexpectedLiteral(value) => write!(
                f,
                "expected operator or ) after expression, got literal '{}'",
                value
            ),
            ParseError::UnexpectedOpenParen => {
                write!(f, "expected operator or ) after expression, got (")
            }
            ParseError::UnexpectedCloseParen => write!(f, "unexpected ')'"),
            ParseError::MissingCloseParen => write!(f, "expected )"),
            ParseError::MissingOperand(op) => {
                write!(f, "operator '{}' is missing an operand", op)
            }
            ParseError::MissingFunctionParen(name) => {
                write!(f, "missing parenthesis for function '{}'", name)
            }
            ParseError::UnexpectedComment(text) => write!(
                f,
                "unexpected comment ':{}', comments can only be at the end of code or parenthesis",
                text
            ),
            ParseError::UnexpectedAssignment(name) => {
                write!(f, "unexpected assignment to '{}'", name)
            }
            ParseError::UnexpectedComma => write!(f, "unexpected ,"),
        }
    }
}

impl std::error::Error for ParseError {}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens }
    }

    pub fn parse(&self) -> Result<Expr, ParseError> {
        build(self.tokens)
    }
}

fn build(tokens: &[Token]) -> Result<Expr, ParseError> {
    match tokens {
        [] => Err(ParseError::EmptyExpression),
        [Token::VarSetter(name), rest @ ..] => Ok(Expr::VarSetter {
            name: name.clone(),
            child: Box::new(build(rest)?),
        }),
        [rest @ .., Token::Comment(text)] => Ok(Expr::Comment {
            annotation: Annotation::parse(text),
            child: Box::new(build(rest)?),
        }),
        _ => build_chain(tokens),
    }
}

/// Collects operands and operators left to right. A run without operators
/// is returned as its single operand.
fn build_chain(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut operators = vec![];
    let mut values = vec![];
    let mut current: Option<Expr> = None;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Unit(unit) => {
                let child = current
                    .take()
                    .ok_or_else(|| ParseError::UnitWithoutValue(unit.clone()))?;
                current = Some(Expr::UnitOverride {
                    unit: unit.clone(),
                    child: Box::new(child),
                });
            }
            Token::Literal(value) => {
                if current.is_some() {
                    return Err(ParseError::UnexpectedLiteral(value.clone()));
                }
                current = Some(Expr::Literal(value.clone()));
            }
            Token::LParen => {
                if current.is_some() {
                    return Err(ParseError::UnexpectedOpenParen);
                }
                let close = closing_index(tokens, i).ok_or(ParseError::MissingCloseParen)?;
                current = Some(build(&tokens[i + 1..close])?);
                i = close;
            }
            Token::RParen => return Err(ParseError::UnexpectedCloseParen),
            Token::Function(name) => {
                if current.is_some() {
                    return Err(ParseError::UnexpectedOpenParen);
                }
                if tokens.get(i + 1) != Some(&Token::LParen) {
                    return Err(ParseError::MissingFunctionParen(name.clone()));
                }
                let close = closing_index(tokens, i + 1).ok_or(ParseError::MissingCloseParen)?;
                current = Some(build_function(name, &tokens[i + 2..close])?);
                i = close;
            }
            Token::Operator(symbol) => {
                let operand = current
                    .take()
                    .ok_or_else(|| ParseError::MissingOperand(symbol.clone()))?;
                values.push(operand);
                operators.push(symbol.clone());
            }
            Token::Comment(text) => return Err(ParseError::UnexpectedComment(text.clone())),
            Token::VarSetter(name) => return Err(ParseError::UnexpectedAssignment(name.clone())),
            Token::Comma => return Err(ParseError::UnexpectedComma),
        }
        i += 1;
    }

    let last = match (current, operators.last()) {
        (Some(expr), _) => expr,
        (None, Some(symbol)) => return Err(ParseError::MissingOperand(symbol.clone())),
        (None, None) => return Err(ParseError::EmptyExpression),
    };
    if operators.is_empty() {
        return Ok(last);
    }
    values.push(last);
    Ok(Expr::OperatorChain { operators, values })
}

/// Builds a call from the tokens between its parentheses, splitting
/// arguments on commas that are not nested in another group.
fn build_function(name: &str, inner: &[Token]) -> Result<Expr, ParseError> {
    let mut params = vec![];
    if !inner.is_empty() {
        let mut depth = 0usize;
        let mut start = 0;
        for (i, token) in inner.iter().enumerate() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                Token::Comma if depth == 0 => {
                    params.push(build(&inner[start..i])?);
                    start = i + 1;
                }
                _ => {}
            }
        }
        params.push(build(&inner[start..])?);
    }
    Ok(Expr::Function {
        name: name.to_string(),
        params,
    })
}

/// Index of the parenthesis closing the one at `start`, by depth counting.
fn closing_index(tokens: &[Token], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.checked_sub(1)?,
            _ => {}
        }
        if depth == 0 {
            return Some(i);
        }
    }
    None
}
