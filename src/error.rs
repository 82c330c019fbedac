//! Error types and handling for the exp-plot crate.
//!
//! Every stage of the compiler pipeline has its own error enum so callers can
//! tell a tokenizer failure from a grammar failure without string matching.
//! [`ParseError`] wraps them all and is what [`crate::engine::parse`] returns.
//! The plotter has no error type: it only ever runs on a successfully parsed
//! [`crate::Equation`].

use core::fmt;

use crate::types::{TokenKind, TokenKinds};

/// Result type used throughout the crate.
///
/// This is a convenience type alias that uses the `ParseError` type for the error variant.
pub type Result<T> = core::result::Result<T, ParseError>;

/// Error produced while scanning raw text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// A character that is not a digit, `x`/`y`, an operator, a parenthesis,
    /// `=` or whitespace.
    #[error("invalid character '{found}' at position {position}")]
    InvalidCharacter { position: usize, found: char },
}

/// Error produced while splitting a token sequence at its `=` sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// More than one `=` token in a single equation.
    #[error("equation contains more than one '='")]
    MultipleEquals,

    /// No `=` and the expression cannot be read as `expr = y`.
    ///
    /// This happens when `y` is referenced or when `x` is absent. Typing
    /// `x*y` on its own graphs nothing.
    #[error("expression is not graphable: it must reference x and not y, or contain '='")]
    NotGraphable,
}

/// Error produced by the grammar check that runs before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A token whose kind is not allowed after the previous token.
    #[error("unexpected {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        /// Byte offset of the offending token in the original text
        position: usize,
        /// Kind of the token that was found
        found: TokenKind,
        /// Kinds that would have been accepted
        expected: TokenKinds,
    },

    /// The sequence is empty or ends on something other than an operand or `)`.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// Parentheses do not pair up.
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
}

/// Error produced while converting to postfix or folding postfix into a tree.
///
/// Validated input never produces these; they exist so a bug upstream
/// surfaces as an error value instead of a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An operator without two operands before it, or leftover operands.
    #[error("malformed postfix sequence")]
    MalformedPostfix,

    /// A postfix sequence made of a single operator.
    #[error("operator cannot be parsed as an expression on its own")]
    BareOperator,
}

/// Which side of an equation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left-hand side"),
            Side::Right => write!(f, "right-hand side"),
        }
    }
}

/// Error type for the full text-to-equation pipeline.
///
/// `parse` stops at the first failing stage and returns that stage's error
/// unchanged, wrapped in the matching variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("tokenizer error: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("split error: {0}")]
    Split(#[from] SplitError),

    #[error("syntax error in {side}: {source}")]
    Validation {
        side: Side,
        #[source]
        source: ValidationError,
    },

    #[error("build error in {side}: {source}")]
    Build {
        side: Side,
        #[source]
        source: BuildError,
    },
}

impl ParseError {
    pub fn validation(side: Side, source: ValidationError) -> Self {
        Self::Validation { side, source }
    }

    pub fn build(side: Side, source: BuildError) -> Self {
        Self::Build { side, source }
    }
}
