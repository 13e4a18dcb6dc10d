use crate::ast::Token;

/// Splits one calculation into tokens.
///
/// The scan is a fold of [`ScanState`] over the characters of the input plus
/// one trailing blank. Buffers are flushed lazily by the first character
/// that cannot extend them, which is why the blank is needed.
pub struct Lexer {
    input: Vec<char>,
}

/// Mutable record threaded through the scan.
///
/// Every character goes through the handlers in a fixed order (digit, unit,
/// identifier, operator, assignment, comma, delimiter). Later handlers read
/// flags set by earlier ones for the same character.
///
/// Operator characters become tokens wherever they appear, not only after
/// a value, so a leading `-` or `2*-3` reaches the parser as an operator
/// without an operand and fails there. Negation is written `neg(x)`.
#[derive(Debug, Default)]
struct ScanState {
    tokens: Vec<Token>,
    buffer: String,
    was_digit: bool,
    was_alpha: bool,
    was_operator: bool,
    ready_for_unit: bool,
    /// Open parentheses inside the current comment, if one is open
    comment_depth: Option<usize>,
}

pub fn is_digit(c: char) -> bool {
    c == '.' || c.is_ascii_digit()
}

pub fn is_alpha(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// True for text that the evaluator reads as a number rather than a name.
pub fn is_numeric(text: &str) -> bool {
    text.chars().all(is_digit)
}

fn is_operator_char(c: char) -> bool {
    !is_digit(c)
        && !is_alpha(c)
        && !c.is_whitespace()
        && !matches!(c, '(' | ')' | ',' | ':' | '=')
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
        }
    }

    pub fn tokenize(self) -> Vec<Token> {
        let state = self
            .input
            .into_iter()
            .chain(std::iter::once(' '))
            .fold(ScanState::default(), |mut state, c| {
                state.step(c);
                state
            });
        state.finish()
    }
}

impl ScanState {
    fn step(&mut self, c: char) {
        self.digit(c);
        self.unit(c);
        self.identifier(c);
        self.operator(c);
        self.assignment(c);
        self.comma(c);
        self.delimiter(c);
        self.was_digit = is_digit(c);
        self.was_alpha = is_alpha(c);
        self.was_operator = !self.in_comment() && is_operator_char(c);
    }

    fn finish(mut self) -> Vec<Token> {
        if self.in_comment() {
            let text = self.buffer.trim().to_string();
            self.tokens.push(Token::Comment(text));
        }
        self.tokens
    }

    fn in_comment(&self) -> bool {
        self.comment_depth.is_some()
    }

    fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    fn digit(&mut self, c: char) {
        if self.in_comment() {
            return;
        }
        if is_digit(c) {
            // a number after a unit starts a new value
            if self.ready_for_unit && !self.buffer.is_empty() {
                let unit = self.take_buffer();
                self.tokens.push(Token::Unit(unit));
            }
            self.ready_for_unit = false;
            self.buffer.push(c);
        } else if self.was_digit && !self.buffer.is_empty() {
            let literal = self.take_buffer();
            self.tokens.push(Token::Literal(literal));
            self.ready_for_unit = true;
        }
    }

    fn unit(&mut self, c: char) {
        if !self.ready_for_unit || self.in_comment() {
            return;
        }
        if is_alpha(c) {
            self.buffer.push(c);
        } else if self.was_alpha && !self.buffer.is_empty() {
            let unit = self.take_buffer();
            self.tokens.push(Token::Unit(unit));
        }
    }

    fn identifier(&mut self, c: char) {
        if self.ready_for_unit || self.in_comment() {
            return;
        }
        if is_alpha(c) {
            self.buffer.push(c);
        } else if !self.buffer.is_empty() && c != '(' && !is_digit(c) {
            let literal = self.take_buffer();
            self.tokens.push(Token::Literal(literal));
            self.ready_for_unit = true;
        }
    }

    fn operator(&mut self, c: char) {
        if self.in_comment() || !is_operator_char(c) {
            return;
        }
        // `//` and friends: the same symbol twice in a row
        let doubled = self.was_operator
            && matches!(
                self.tokens.last(),
                Some(Token::Operator(previous)) if previous.chars().count() == 1 && previous.starts_with(c)
            );
        if doubled && let Some(Token::Operator(previous)) = self.tokens.last_mut() {
            previous.push(c);
        } else {
            self.tokens.push(Token::Operator(c.to_string()));
        }
        self.ready_for_unit = false;
    }

    fn assignment(&mut self, c: char) {
        if c != '=' || self.in_comment() {
            return;
        }
        if matches!(self.tokens.last(), Some(Token::Literal(_)))
            && let Some(Token::Literal(name)) = self.tokens.pop()
        {
            self.tokens.push(Token::VarSetter(name));
            self.ready_for_unit = false;
        }
    }

    fn comma(&mut self, c: char) {
        if c == ',' && !self.in_comment() {
            self.tokens.push(Token::Comma);
            self.ready_for_unit = false;
        }
    }

    fn delimiter(&mut self, c: char) {
        match (c, self.comment_depth) {
            ('(', Some(depth)) => {
                self.comment_depth = Some(depth + 1);
                self.buffer.push(c);
            }
            ('(', None) => {
                if !self.ready_for_unit && !self.buffer.is_empty() {
                    let name = self.take_buffer();
                    self.tokens.push(Token::Function(name));
                }
                self.tokens.push(Token::LParen);
                self.ready_for_unit = false;
            }
            (')', Some(0)) => {
                let text = self.take_buffer().trim().to_string();
                self.tokens.push(Token::Comment(text));
                self.tokens.push(Token::RParen);
                self.comment_depth = None;
                self.ready_for_unit = true;
            }
            (')', Some(depth)) => {
                self.comment_depth = Some(depth - 1);
                self.buffer.push(c);
            }
            (')', None) => {
                self.tokens.push(Token::RParen);
                self.ready_for_unit = true;
            }
            (':', None) => {
                self.buffer.clear();
                self.comment_depth = Some(0);
                self.ready_for_unit = false;
            }
            (_, Some(_)) => self.buffer.push(c),
            _ => {}
        }
    }
}

#[test]
fn test_operator_precedence_input() {
    let tokens = Lexer::new("2+3*4").tokenize();
    assert_eq!(
        tokens,
        vec![
            Token::Literal("2".into()),
            Token::Operator("+".into()),
            Token::Literal("3".into()),
            Token::Operator("*".into()),
            Token::Literal("4".into()),
        ]
    );
}

#[test]
fn test_assignment_with_comment() {
    let tokens = Lexer::new("x=10:initial value").tokenize();
    assert_eq!(
        tokens,
        vec![
            Token::VarSetter("x".into()),
            Token::Literal("10".into()),
            Token::Comment("initial value".into()),
        ]
    );
}
