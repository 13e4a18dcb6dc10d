use std::fmt;

/// Lexical token of the calculation language.
///
/// Tokens carry no nesting; structure is recovered by the parser from
/// parenthesis balance.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Parameter separator inside a function call
    Comma,

    /// Opening parenthesis, either a group or the start of a call
    LParen,

    /// Closing parenthesis
    RParen,

    /// Identifier immediately followed by `(`
    ///
    /// # Examples
    /// ```text
    /// floor(2.5)
    /// max(a, b)
    /// ```
    Function(String),

    /// Numeral or bare identifier
    ///
    /// The lexer does not decide whether `x` is a number or a variable; the
    /// evaluator does, purely by character class.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// width
    /// ```
    Literal(String),

    /// Unit written directly after a value
    ///
    /// # Examples
    /// ```text
    /// 5 m
    /// (a + b)kg
    /// ```
    Unit(String),

    /// Binary operator symbol (one or two characters)
    ///
    /// # Examples
    /// ```text
    /// +  -  *  /  //  ^
    /// ```
    Operator(String),

    /// Free text between `:` and the closing `)` or end of input
    ///
    /// # Examples
    /// ```text
    /// (w * h : area)
    /// x = 10 : initial value
    /// ```
    Comment(String),

    /// Identifier immediately followed by `=`
    ///
    /// # Examples
    /// ```text
    /// x = 5
    /// ```
    VarSetter(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Comma => write!(f, ","),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Function(name) => write!(f, "{}", name),
            Token::Literal(value) => write!(f, "{}", value),
            Token::Unit(name) => write!(f, "{}", name),
            Token::Operator(symbol) => write!(f, "{}", symbol),
            Token::Comment(text) => write!(f, ":{}", text),
            Token::VarSetter(name) => write!(f, "{}=", name),
        }
    }
}
