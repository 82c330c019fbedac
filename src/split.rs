//! Splits one token sequence into the two sides of an equation.

use crate::error::SplitError;
use crate::types::{Token, TokenKind, TokenValue, Variable};

/// Splits `tokens` at its single `=`.
///
/// Without an `=`, an expression that references `x` but not `y` is read as
/// `expr = y`, so typing `x^2` graphs the parabola. Anything else without an
/// `=` is [`SplitError::NotGraphable`]: `x*y` on its own graphs nothing.
pub fn split_tokens(mut tokens: Vec<Token>) -> Result<(Vec<Token>, Vec<Token>), SplitError> {
    let mut equals = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind() == TokenKind::Equals)
        .map(|(i, _)| i);

    match (equals.next(), equals.next()) {
        (Some(_), Some(_)) => Err(SplitError::MultipleEquals),
        (Some(at), None) => {
            let rhs = tokens.split_off(at + 1);
            tokens.truncate(at);
            Ok((tokens, rhs))
        }
        (None, _) => {
            let references =
                |var: Variable| tokens.iter().any(|t| t.value == TokenValue::Variable(var));
            if references(Variable::X) && !references(Variable::Y) {
                let position = tokens.last().map_or(0, |t| t.position + 1);
                crate::registry::register(Variable::Y);
                let rhs = vec![Token::new(TokenValue::Variable(Variable::Y), position)];
                Ok((tokens, rhs))
            } else {
                Err(SplitError::NotGraphable)
            }
        }
    }
}
