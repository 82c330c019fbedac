use serde::{Deserialize, Serialize};

use crate::Real;
use crate::types::Variable;

/// Variable bindings for a single evaluation.
///
/// Both reserved variables are always bound, defaulting to zero, so
/// evaluation never observes an unbound variable. The context is a small
/// `Copy` value passed explicitly to [`crate::eval::eval_ast`]; each plotter
/// corner builds its own, which keeps concurrent evaluations independent.
///
/// # Examples
///
/// ```
/// use exp_plot::context::EvalContext;
/// use exp_plot::engine::interp;
/// use exp_plot::types::Variable;
///
/// let mut ctx = EvalContext::new();
/// ctx.set_parameter(Variable::X, 5.0);
/// ctx.set_parameter(Variable::Y, 10.0);
///
/// let result = interp("x + y", &ctx).unwrap();
/// assert_eq!(result, 15.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalContext {
    pub x: Real,
    pub y: Real,
}

impl EvalContext {
    pub const fn new() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Context with both variables bound at once, the common case for the
    /// plotter.
    pub const fn at(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    pub fn set_parameter(&mut self, var: Variable, value: Real) {
        match var {
            Variable::X => self.x = value,
            Variable::Y => self.y = value,
        }
    }

    pub const fn get_parameter(&self, var: Variable) -> Real {
        match var {
            Variable::X => self.x,
            Variable::Y => self.y,
        }
    }

    /// Copy of this context with one variable rebound.
    pub fn with_parameter(mut self, var: Variable, value: Real) -> Self {
        self.set_parameter(var, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_zero() {
        let ctx = EvalContext::new();
        assert_eq!(ctx.get_parameter(Variable::X), 0.0);
        assert_eq!(ctx.get_parameter(Variable::Y), 0.0);
        assert_eq!(ctx, EvalContext::default());
    }

    #[test]
    fn test_set_and_rebind() {
        let mut ctx = EvalContext::at(1.0, 2.0);
        ctx.set_parameter(Variable::Y, 7.5);
        assert_eq!(ctx, EvalContext::at(1.0, 7.5));

        let moved = ctx.with_parameter(Variable::X, -3.0);
        assert_eq!(moved.x, -3.0);
        // original untouched
        assert_eq!(ctx.x, 1.0);
    }

    #[test]
    fn test_deserialize_partial_context() {
        let ctx: EvalContext = serde_json::from_str(r#"{"y": 4.0}"#).unwrap();
        assert_eq!(ctx, EvalContext::at(0.0, 4.0));
    }
}
