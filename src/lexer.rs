use serde::{Deserialize, Serialize};

use crate::Real;
use crate::error::TokenizeError;
use crate::types::{Operator, Token, TokenKind, TokenKinds, TokenValue, Variable};

/// Tokenizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerOptions {
    /// Accept `X` and `Y` as well as `x` and `y`.
    pub case_insensitive: bool,
}

/// The lexer struct, which produces tokens from an input string.
///
/// The lexer on its own yields the tokens literally present in the text.
/// [`tokenize`] drives it and inserts the implicit multiplications.
#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    options: LexerOptions,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    pub fn with_options(input: &'a str, options: LexerOptions) -> Self {
        Self {
            input,
            pos: 0,
            options,
        }
    }

    /// Peek at the current character.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advance the position by one character.
    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Skip whitespace.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get the next token from the input.
    ///
    /// Returns `None` at end of input. An invalid character is consumed
    /// along with the error so iteration always terminates.
    pub fn next_token(&mut self) -> Option<Result<Token, TokenizeError>> {
        self.skip_whitespace();
        let start_pos = self.pos;
        let c = self.peek()?;

        // Integer literal; there is no decimal point
        if c.is_ascii_digit() {
            let mut value: Real = 0.0;
            while let Some(digit) = self.peek().and_then(|d| d.to_digit(10)) {
                value = value * 10.0 + digit as Real;
                self.advance();
            }
            return Some(Ok(Token::new(TokenValue::Constant(value), start_pos)));
        }

        if let Some(op) = Operator::from_char(c) {
            self.advance();
            return Some(Ok(Token::new(TokenValue::Operator(op), start_pos)));
        }

        if let Some(var) = Variable::from_char(c, self.options.case_insensitive) {
            self.advance();
            crate::registry::register(var);
            return Some(Ok(Token::new(TokenValue::Variable(var), start_pos)));
        }

        let value = match c {
            '(' => TokenValue::OpeningParen,
            ')' => TokenValue::ClosingParen,
            '=' => TokenValue::Equals,
            _ => {
                self.advance();
                return Some(Err(TokenizeError::InvalidCharacter {
                    position: start_pos,
                    found: c,
                }));
            }
        };
        self.advance();
        Some(Ok(Token::new(value, start_pos)))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// True when a multiplication sign belongs between `prev` and `next`, as in
/// `2x`, `x(1+2)` or `(1+2)(3+4)`.
pub(crate) fn needs_implicit_multiply(prev: TokenKind, next: TokenKind) -> bool {
    let after = TokenKinds::OPERAND | TokenKinds::CLOSING_PAREN;
    let before = TokenKinds::OPERAND | TokenKinds::OPENING_PAREN;
    after.intersects(prev.flag()) && before.intersects(next.flag())
}

/// Converts `input` into tokens with the default options.
///
/// # Examples
///
/// ```
/// use exp_plot::lexer::tokenize;
/// use exp_plot::types::{Operator, TokenValue, Variable};
///
/// let values: Vec<TokenValue> = tokenize("2x").unwrap().iter().map(|t| t.value).collect();
/// assert_eq!(
///     values,
///     vec![
///         TokenValue::Constant(2.0),
///         TokenValue::Operator(Operator::Multiply),
///         TokenValue::Variable(Variable::X),
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    tokenize_with(input, &LexerOptions::default())
}

/// Converts `input` into tokens, inserting implicit multiplications.
///
/// Any unrecognized character fails the whole call; no partial sequence is
/// returned.
pub fn tokenize_with(input: &str, options: &LexerOptions) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens: Vec<Token> = Vec::new();
    for token in Lexer::with_options(input, *options) {
        let token = token?;
        if let Some(prev) = tokens.last()
            && needs_implicit_multiply(prev.kind(), token.kind())
        {
            tokens.push(Token::new(TokenValue::Operator(Operator::Multiply), token.position));
        }
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(input: &str) -> Vec<TokenValue> {
        tokenize(input).unwrap().iter().map(|t| t.value).collect()
    }

    const MUL: TokenValue = TokenValue::Operator(Operator::Multiply);
    const X: TokenValue = TokenValue::Variable(Variable::X);
    const Y: TokenValue = TokenValue::Variable(Variable::Y);

    #[test]
    fn test_lexer_tokenization_all_types() {
        let kinds: Vec<TokenKind> = Lexer::new("12 + x * (y) = 3 ^ 4 - 5 / 6")
            .map(|t| t.unwrap().kind())
            .collect();
        for kind in TokenKind::ALL {
            assert!(kinds.contains(&kind), "missing {kind}");
        }
    }

    #[test]
    fn test_lexer_merges_digits_and_skips_whitespace() {
        assert_eq!(
            values(" 123  +\t4 "),
            vec![
                TokenValue::Constant(123.0),
                TokenValue::Operator(Operator::Add),
                TokenValue::Constant(4.0),
            ]
        );
    }

    #[test]
    fn test_lexer_positions_are_byte_offsets() {
        let tokens = tokenize("10 + x").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 3, 5]);
    }

    #[test]
    fn test_lexer_decimal_point_is_rejected() {
        assert_eq!(
            tokenize("1.5"),
            Err(TokenizeError::InvalidCharacter {
                position: 1,
                found: '.'
            })
        );
    }

    #[test]
    fn test_lexer_invalid_character_fails_whole_input() {
        assert_eq!(
            tokenize("x + $"),
            Err(TokenizeError::InvalidCharacter {
                position: 4,
                found: '$'
            })
        );
        assert!(tokenize("sin(x)").is_err());
        assert!(tokenize("x²").is_err());
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(values("2x"), vec![TokenValue::Constant(2.0), MUL, X]);
        assert_eq!(values("xy"), vec![X, MUL, Y]);
        assert_eq!(
            values("(1+2)(3+4)"),
            vec![
                TokenValue::OpeningParen,
                TokenValue::Constant(1.0),
                TokenValue::Operator(Operator::Add),
                TokenValue::Constant(2.0),
                TokenValue::ClosingParen,
                MUL,
                TokenValue::OpeningParen,
                TokenValue::Constant(3.0),
                TokenValue::Operator(Operator::Add),
                TokenValue::Constant(4.0),
                TokenValue::ClosingParen,
            ]
        );
        assert_eq!(
            values("(x)2"),
            vec![
                TokenValue::OpeningParen,
                X,
                TokenValue::ClosingParen,
                MUL,
                TokenValue::Constant(2.0),
            ]
        );
        assert_eq!(
            values("3(x)"),
            vec![
                TokenValue::Constant(3.0),
                MUL,
                TokenValue::OpeningParen,
                X,
                TokenValue::ClosingParen,
            ]
        );
    }

    #[test]
    fn test_no_implicit_multiplication_around_operators_and_equals() {
        assert_eq!(values("x=y"), vec![X, TokenValue::Equals, Y]);
        assert_eq!(
            values("x-(y)"),
            vec![
                X,
                TokenValue::Operator(Operator::Subtract),
                TokenValue::OpeningParen,
                Y,
                TokenValue::ClosingParen,
            ]
        );
        // digits separated by whitespace still multiply
        assert_eq!(
            values("2 3"),
            vec![TokenValue::Constant(2.0), MUL, TokenValue::Constant(3.0)]
        );
    }

    #[test]
    fn test_case_insensitive_variables() {
        assert!(tokenize("X").is_err());
        let options = LexerOptions {
            case_insensitive: true,
        };
        let tokens = tokenize_with("2X + Y", &options).unwrap();
        assert_eq!(tokens[2].value, X);
        assert_eq!(tokens[4].value, Y);
    }
}
