//! Type definitions for the expression compiler and plotter.
//!
//! This module contains the core data structures shared by every pipeline
//! stage: tokens and their kind bitsets, the five operator descriptors, the
//! two reserved variables, the expression tree and the equation that owns a
//! pair of trees.

use core::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::Real;

bitflags! {
    /// Bitset over token kinds.
    ///
    /// Each [`TokenKind`] owns one bit. Categories are unions of those bits so
    /// that "is this token allowed here" is a single bitwise AND.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenKinds: u8 {
        const CONSTANT = 1 << 0;
        const VARIABLE = 1 << 1;
        const OPERATOR = 1 << 2;
        const OPENING_PAREN = 1 << 3;
        const CLOSING_PAREN = 1 << 4;
        const EQUALS = 1 << 5;

        /// Constants and variables.
        const OPERAND = Self::CONSTANT.bits() | Self::VARIABLE.bits();
        /// Parentheses and the equals sign.
        const PUNCTUATOR =
            Self::OPENING_PAREN.bits() | Self::CLOSING_PAREN.bits() | Self::EQUALS.bits();
    }
}

impl fmt::Display for TokenKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<TokenKind> = TokenKind::ALL
            .into_iter()
            .filter(|kind| self.contains(kind.flag()))
            .collect();
        match names.split_last() {
            None => write!(f, "nothing"),
            Some((last, [])) => write!(f, "{last}"),
            Some((last, rest)) => {
                for (i, kind) in rest.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{kind}")?;
                }
                write!(f, " or {last}")
            }
        }
    }
}

/// Classifies the kind of token produced during lexical analysis.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    /// An integer literal.
    Constant,

    /// One of the reserved variables `x` or `y`.
    Variable,

    /// One of `+ - * / ^`, or a synthesized implicit multiplication.
    Operator,

    /// `(`
    OpeningParen,

    /// `)`
    ClosingParen,

    /// `=`
    Equals,
}

impl TokenKind {
    pub const ALL: [TokenKind; 6] = [
        TokenKind::Constant,
        TokenKind::Variable,
        TokenKind::Operator,
        TokenKind::OpeningParen,
        TokenKind::ClosingParen,
        TokenKind::Equals,
    ];

    /// The single bit owned by this kind.
    pub const fn flag(self) -> TokenKinds {
        match self {
            TokenKind::Constant => TokenKinds::CONSTANT,
            TokenKind::Variable => TokenKinds::VARIABLE,
            TokenKind::Operator => TokenKinds::OPERATOR,
            TokenKind::OpeningParen => TokenKinds::OPENING_PAREN,
            TokenKind::ClosingParen => TokenKinds::CLOSING_PAREN,
            TokenKind::Equals => TokenKinds::EQUALS,
        }
    }

    /// The category this kind belongs to: operand, operator or punctuator.
    pub const fn category(self) -> TokenKinds {
        match self {
            TokenKind::Constant | TokenKind::Variable => TokenKinds::OPERAND,
            TokenKind::Operator => TokenKinds::OPERATOR,
            TokenKind::OpeningParen | TokenKind::ClosingParen | TokenKind::Equals => {
                TokenKinds::PUNCTUATOR
            }
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Constant => write!(f, "constant"),
            TokenKind::Variable => write!(f, "variable"),
            TokenKind::Operator => write!(f, "operator"),
            TokenKind::OpeningParen => write!(f, "'('"),
            TokenKind::ClosingParen => write!(f, "')'"),
            TokenKind::Equals => write!(f, "'='"),
        }
    }
}

/// Operator associativity, used by the shunting-yard tie-break.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Associativity {
    Left,
    Right,
}

/// The five binary operators.
///
/// Precedence is an integer where higher binds tighter. Only `^` is
/// right-associative, so `2^3^2` reads as `2^(3^2)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponent,
}

impl Operator {
    pub const fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
            Operator::Exponent => 3,
        }
    }

    pub const fn associativity(self) -> Associativity {
        match self {
            Operator::Exponent => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    pub const fn is_left_associative(self) -> bool {
        matches!(self.associativity(), Associativity::Left)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operator::Add => "Add",
            Operator::Subtract => "Subtract",
            Operator::Multiply => "Multiply",
            Operator::Divide => "Divide",
            Operator::Exponent => "Exponent",
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Exponent => '^',
        }
    }

    pub const fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            '^' => Some(Operator::Exponent),
            _ => None,
        }
    }

    /// Applies the operator to two already evaluated operands.
    ///
    /// Division by zero and overflowing powers follow IEEE semantics and
    /// yield infinities or NaN; callers decide what to do with them.
    pub fn apply(self, a: Real, b: Real) -> Real {
        match self {
            Operator::Add => crate::functions::add(a, b),
            Operator::Subtract => crate::functions::sub(a, b),
            Operator::Multiply => crate::functions::mul(a, b),
            Operator::Divide => crate::functions::div(a, b),
            Operator::Exponent => crate::functions::pow(a, b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The reserved variables an equation may reference.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Variable {
    X,
    Y,
}

impl Variable {
    pub const fn name(self) -> &'static str {
        match self {
            Variable::X => "x",
            Variable::Y => "y",
        }
    }

    /// Slot used by fixed-size binding tables.
    pub(crate) const fn index(self) -> usize {
        match self {
            Variable::X => 0,
            Variable::Y => 1,
        }
    }

    pub fn from_char(c: char, case_insensitive: bool) -> Option<Variable> {
        let c = if case_insensitive {
            c.to_ascii_lowercase()
        } else {
            c
        };
        match c {
            'x' => Some(Variable::X),
            'y' => Some(Variable::Y),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Payload carried by a token. The variant determines the token's kind.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TokenValue {
    Constant(Real),
    Variable(Variable),
    Operator(Operator),
    OpeningParen,
    ClosingParen,
    Equals,
}

/// A token produced by the lexer.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Token {
    pub value: TokenValue,
    /// Byte offset in the source text. Synthesized tokens carry the offset
    /// of the token that caused them.
    pub position: usize,
}

impl Token {
    pub const fn new(value: TokenValue, position: usize) -> Self {
        Self { value, position }
    }

    pub const fn kind(&self) -> TokenKind {
        match self.value {
            TokenValue::Constant(_) => TokenKind::Constant,
            TokenValue::Variable(_) => TokenKind::Variable,
            TokenValue::Operator(_) => TokenKind::Operator,
            TokenValue::OpeningParen => TokenKind::OpeningParen,
            TokenValue::ClosingParen => TokenKind::ClosingParen,
            TokenValue::Equals => TokenKind::Equals,
        }
    }

    pub const fn category(&self) -> TokenKinds {
        self.kind().category()
    }

    /// True when this token's kind intersects `kinds`.
    pub fn matches(&self, kinds: TokenKinds) -> bool {
        self.kind().flag().intersects(kinds)
    }
}

/// Expression tree node.
///
/// Each `Binary` node exclusively owns its two children, so the structure is
/// a strict tree. Evaluation lives in [`crate::eval`].
#[derive(Clone, Debug, PartialEq)]
pub enum AstExpr {
    /// A literal numerical value.
    Constant(Real),

    /// A reference to `x` or `y`, resolved against an
    /// [`EvalContext`](crate::context::EvalContext) at evaluation time.
    Variable(Variable),

    /// A binary operation.
    Binary {
        op: Operator,
        left: Box<AstExpr>,
        right: Box<AstExpr>,
    },
}

impl AstExpr {
    pub fn binary(op: Operator, left: AstExpr, right: AstExpr) -> Self {
        AstExpr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True if `var` appears anywhere in the tree.
    pub fn references(&self, var: Variable) -> bool {
        match self {
            AstExpr::Constant(_) => false,
            AstExpr::Variable(v) => *v == var,
            AstExpr::Binary { left, right, .. } => left.references(var) || right.references(var),
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            AstExpr::Constant(_) | AstExpr::Variable(_) => 1,
            AstExpr::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}

/// Fully parenthesized rendering, e.g. `((2 * x) ^ 2)`.
impl fmt::Display for AstExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstExpr::Constant(value) => write!(f, "{value}"),
            AstExpr::Variable(var) => write!(f, "{var}"),
            AstExpr::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

/// An implicit equation `lhs = rhs`.
///
/// The plotted curve is the zero set of `lhs - rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: AstExpr,
    pub rhs: AstExpr,
}

impl Equation {
    pub fn new(lhs: AstExpr, rhs: AstExpr) -> Self {
        Self { lhs, rhs }
    }

    pub fn references(&self, var: Variable) -> bool {
        self.lhs.references(var) || self.rhs.references(var)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
