//! Expression evaluation.
//!
//! Evaluation is a pure recursive fold over [`AstExpr`]. Variables are read
//! from the [`EvalContext`] passed in; there is no hidden global state, so the
//! same tree can be evaluated from many threads at once.

use crate::Real;
use crate::context::EvalContext;
use crate::types::{AstExpr, Equation};

/// Evaluates `ast` with the variable bindings in `ctx`.
///
/// Non-finite intermediate values propagate: `1/0` evaluates to infinity and
/// `0/0` to NaN.
pub fn eval_ast(ast: &AstExpr, ctx: &EvalContext) -> Real {
    match ast {
        AstExpr::Constant(value) => *value,
        AstExpr::Variable(var) => ctx.get_parameter(*var),
        AstExpr::Binary { op, left, right } => {
            let a = eval_ast(left, ctx);
            let b = eval_ast(right, ctx);
            op.apply(a, b)
        }
    }
}

impl AstExpr {
    pub fn eval(&self, ctx: &EvalContext) -> Real {
        eval_ast(self, ctx)
    }
}

impl Equation {
    /// Value of `lhs - rhs`. The equation holds where this is zero.
    pub fn implicit(&self, ctx: &EvalContext) -> Real {
        eval_ast(&self.lhs, ctx) - eval_ast(&self.rhs, ctx)
    }
}
