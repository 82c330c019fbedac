//! Infix to postfix conversion (shunting-yard).

use crate::error::BuildError;
use crate::lexer::needs_implicit_multiply;
use crate::types::{AstExpr, Operator, Token, TokenKind, TokenValue};

/// One entry of a postfix sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum PostfixItem {
    /// A leaf (constant or variable) or an already built subtree.
    Operand(AstExpr),
    Operator(Operator),
}

#[derive(Clone, Copy)]
enum StackEntry {
    Paren,
    Operator(Operator),
}

/// Pops stack-top operators that must be emitted before `incoming` is pushed.
///
/// Equal precedence pops only when the stacked operator is left-associative,
/// which is what makes `2^3^2` group to the right.
fn push_operator(incoming: Operator, stack: &mut Vec<StackEntry>, output: &mut Vec<PostfixItem>) {
    while let Some(&StackEntry::Operator(top)) = stack.last() {
        let pops = top.precedence() > incoming.precedence()
            || (top.precedence() == incoming.precedence() && top.is_left_associative());
        if !pops {
            break;
        }
        stack.pop();
        output.push(PostfixItem::Operator(top));
    }
    stack.push(StackEntry::Operator(incoming));
}

/// Reorders a validated token sequence into postfix order.
///
/// Juxtaposed operands and parentheses that reach this point without a
/// synthesized `*` (possible after permissive validation) are multiplied.
/// Errors only on input the validator would have rejected.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<PostfixItem>, BuildError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut prev: Option<TokenKind> = None;

    for token in tokens {
        if let Some(prev) = prev
            && needs_implicit_multiply(prev, token.kind())
        {
            push_operator(Operator::Multiply, &mut stack, &mut output);
        }
        prev = Some(token.kind());

        match token.value {
            TokenValue::Constant(value) => {
                output.push(PostfixItem::Operand(AstExpr::Constant(value)))
            }
            TokenValue::Variable(var) => output.push(PostfixItem::Operand(AstExpr::Variable(var))),
            TokenValue::OpeningParen => stack.push(StackEntry::Paren),
            TokenValue::ClosingParen => loop {
                match stack.pop() {
                    Some(StackEntry::Paren) => break,
                    Some(StackEntry::Operator(op)) => output.push(PostfixItem::Operator(op)),
                    None => return Err(BuildError::MalformedPostfix),
                }
            },
            TokenValue::Operator(op) => push_operator(op, &mut stack, &mut output),
            TokenValue::Equals => return Err(BuildError::MalformedPostfix),
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Operator(op) => output.push(PostfixItem::Operator(op)),
            StackEntry::Paren => return Err(BuildError::MalformedPostfix),
        }
    }

    Ok(output)
}
