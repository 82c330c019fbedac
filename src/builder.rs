//! Folds a postfix sequence into an expression tree.

use crate::error::BuildError;
use crate::postfix::PostfixItem;
use crate::types::AstExpr;

/// Builds the tree for `postfix` with an operand stack.
///
/// Operands are pushed; each operator pops its right then left operand and
/// pushes the combined node. Exactly one entry must remain.
///
/// A single operand is returned as is. A single operator is
/// [`BuildError::BareOperator`]; every other shortfall is
/// [`BuildError::MalformedPostfix`].
pub fn build_tree(postfix: Vec<PostfixItem>) -> Result<AstExpr, BuildError> {
    if let [PostfixItem::Operator(_)] = postfix.as_slice() {
        return Err(BuildError::BareOperator);
    }

    let mut stack: Vec<AstExpr> = Vec::with_capacity(postfix.len() / 2 + 1);
    for item in postfix {
        match item {
            PostfixItem::Operand(ast) => stack.push(ast),
            PostfixItem::Operator(op) => {
                let right = stack.pop().ok_or(BuildError::MalformedPostfix)?;
                let left = stack.pop().ok_or(BuildError::MalformedPostfix)?;
                stack.push(AstExpr::binary(op, left, right));
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(root), true) => Ok(root),
        _ => Err(BuildError::MalformedPostfix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EvalContext;
    use crate::lexer::tokenize;
    use crate::postfix::to_postfix;
    use crate::types::{Operator, Variable};

    fn build(input: &str) -> AstExpr {
        build_tree(to_postfix(&tokenize(input).unwrap()).unwrap()).unwrap()
    }

    #[test]
    fn test_build_single_operand() {
        assert_eq!(build("7"), AstExpr::Constant(7.0));
        assert_eq!(build("(x)"), AstExpr::Variable(Variable::X));
    }

    #[test]
    fn test_build_shapes() {
        assert_eq!(build("2+3*4").to_string(), "(2 + (3 * 4))");
        assert_eq!(build("2^3^2").to_string(), "(2 ^ (3 ^ 2))");
        assert_eq!(build("8-3-2").to_string(), "((8 - 3) - 2)");
    }

    #[test]
    fn test_build_evaluates() {
        let ctx = EvalContext::new();
        assert_eq!(build("2+3*4").eval(&ctx), 14.0);
        assert_eq!(build("2^3^2").eval(&ctx), 512.0);
        assert_eq!(build("(2+3)*4").eval(&ctx), 20.0);
    }

    #[test]
    fn test_build_bare_operator() {
        assert_eq!(
            build_tree(vec![PostfixItem::Operator(Operator::Add)]),
            Err(BuildError::BareOperator)
        );
    }

    #[test]
    fn test_build_malformed() {
        assert_eq!(build_tree(vec![]), Err(BuildError::MalformedPostfix));

        let missing_operand = vec![
            PostfixItem::Operand(AstExpr::Constant(1.0)),
            PostfixItem::Operator(Operator::Add),
        ];
        assert_eq!(build_tree(missing_operand), Err(BuildError::MalformedPostfix));

        let leftover = vec![
            PostfixItem::Operand(AstExpr::Constant(1.0)),
            PostfixItem::Operand(AstExpr::Constant(2.0)),
        ];
        assert_eq!(build_tree(leftover), Err(BuildError::MalformedPostfix));
    }
}
