//! Process-wide variable registry.
//!
//! Collaborators that bind variables globally (for example a UI that writes
//! the cursor position and then evaluates) use this module. The tokenizer
//! registers every variable it sees. Evaluation itself never reads the
//! registry; callers take a [`snapshot`] and pass it to
//! [`crate::eval::eval_ast`], so a write-then-evaluate pair stays consistent
//! even when another thread writes in between.
//!
//! All access goes through a `critical_section::Mutex`.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::Real;
use crate::context::EvalContext;
use crate::types::{AstExpr, Variable};

#[derive(Clone, Copy)]
struct Registry {
    bindings: EvalContext,
    registered: [bool; 2],
}

impl Registry {
    const fn new() -> Self {
        Self {
            bindings: EvalContext::new(),
            registered: [false; 2],
        }
    }
}

static REGISTRY: Mutex<RefCell<Registry>> = Mutex::new(RefCell::new(Registry::new()));

/// Marks `var` as referenced. Its value stays at the default of zero until
/// the first [`set`].
pub fn register(var: Variable) {
    critical_section::with(|cs| {
        let mut registry = REGISTRY.borrow(cs).borrow_mut();
        if !registry.registered[var.index()] {
            registry.registered[var.index()] = true;
            tracing::trace!(variable = var.name(), "registered variable");
        }
    });
}

pub fn is_registered(var: Variable) -> bool {
    critical_section::with(|cs| REGISTRY.borrow(cs).borrow().registered[var.index()])
}

/// Binds `var` to `value`, registering it if needed.
pub fn set(var: Variable, value: Real) {
    critical_section::with(|cs| {
        let mut registry = REGISTRY.borrow(cs).borrow_mut();
        registry.registered[var.index()] = true;
        registry.bindings.set_parameter(var, value);
    });
}

pub fn get(var: Variable) -> Real {
    critical_section::with(|cs| REGISTRY.borrow(cs).borrow().bindings.get_parameter(var))
}

/// Copy of the current bindings.
pub fn snapshot() -> EvalContext {
    critical_section::with(|cs| REGISTRY.borrow(cs).borrow().bindings)
}

/// Writes both variables and evaluates `ast` against them as one atomic unit.
pub fn eval_at(ast: &AstExpr, x: Real, y: Real) -> Real {
    let ctx = critical_section::with(|cs| {
        let mut registry = REGISTRY.borrow(cs).borrow_mut();
        registry.registered = [true; 2];
        registry.bindings = EvalContext::at(x, y);
        registry.bindings
    });
    crate::eval::eval_ast(ast, &ctx)
}

/// Clears every binding and registration.
pub fn reset() {
    critical_section::with(|cs| {
        *REGISTRY.borrow(cs).borrow_mut() = Registry::new();
    });
}
