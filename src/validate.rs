//! Grammar check for one side of an equation.
//!
//! The validator is a lookahead state machine whose only state is the set of
//! token kinds allowed next, plus a parenthesis counter. A sequence that
//! passes is guaranteed to convert and build without error, so the later
//! stages do no structural checking of their own.
//!
//! | previous      | allowed next                                        |
//! |---------------|-----------------------------------------------------|
//! | (start)       | operand, `(`                                        |
//! | operator      | operand, `(`                                        |
//! | `(`           | operand, `(`                                        |
//! | `)`           | operator, `)` (strict); also operand, `(` (permissive) |
//! | operand       | operator, `)`                                       |

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{Token, TokenKind, TokenKinds};

/// Which row to use after a closing parenthesis.
///
/// The tokenizer already inserts the multiplication in `(a)(b)` and `(a)x`,
/// so `Strict` accepts everything it produces. `Permissive` also accepts
/// hand-built sequences that juxtapose a `)` with an operand or `(`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidatorMode {
    #[default]
    Strict,
    Permissive,
}

const START: TokenKinds = TokenKinds::OPERAND.union(TokenKinds::OPENING_PAREN);
const VALID_END: TokenKinds = TokenKinds::OPERAND.union(TokenKinds::CLOSING_PAREN);

fn expected_after(kind: TokenKind, mode: ValidatorMode) -> TokenKinds {
    match kind {
        TokenKind::Operator | TokenKind::OpeningParen => START,
        TokenKind::Constant | TokenKind::Variable => {
            TokenKinds::OPERATOR.union(TokenKinds::CLOSING_PAREN)
        }
        TokenKind::ClosingParen => match mode {
            ValidatorMode::Strict => TokenKinds::OPERATOR.union(TokenKinds::CLOSING_PAREN),
            ValidatorMode::Permissive => TokenKinds::OPERATOR
                .union(TokenKinds::CLOSING_PAREN)
                .union(START),
        },
        // `=` is never admitted by any row, so nothing can follow it
        TokenKind::Equals => TokenKinds::empty(),
    }
}

/// Validates `tokens` with [`ValidatorMode::Strict`].
pub fn validate(tokens: &[Token]) -> Result<(), ValidationError> {
    validate_with(tokens, ValidatorMode::Strict)
}

/// Validates `tokens`.
///
/// Fails with `UnexpectedToken` at the first token outside the allowed set,
/// `UnbalancedParentheses` as soon as a `)` has no partner or when a `(` is
/// left open, and `UnexpectedEnd` when the sequence is empty or ends on an
/// operator or `(`.
pub fn validate_with(tokens: &[Token], mode: ValidatorMode) -> Result<(), ValidationError> {
    let mut expected = START;
    let mut depth: i32 = 0;
    let mut last: Option<TokenKind> = None;

    for token in tokens {
        if !token.matches(expected) {
            return Err(ValidationError::UnexpectedToken {
                position: token.position,
                found: token.kind(),
                expected,
            });
        }

        match token.kind() {
            TokenKind::OpeningParen => depth += 1,
            TokenKind::ClosingParen => {
                depth -= 1;
                if depth < 0 {
                    return Err(ValidationError::UnbalancedParentheses);
                }
            }
            _ => {}
        }

        expected = expected_after(token.kind(), mode);
        last = Some(token.kind());
    }

    match last {
        Some(kind) if kind.flag().intersects(VALID_END) => {}
        _ => return Err(ValidationError::UnexpectedEnd),
    }

    if depth != 0 {
        return Err(ValidationError::UnbalancedParentheses);
    }

    Ok(())
}
