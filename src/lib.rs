#![doc = r#"
# exp-plot

An implicit-equation compiler and adaptive plotter for two-variable math.

## Overview

exp-plot turns text such as `x^2 + y^2 = 25` or `y - x^2` into an expression
tree and draws the curve `lhs - rhs = 0` by recursively subdividing a
rectangular domain and running a marching-squares sign test on each cell.

Key features:
- Five binary operators (`+ - * / ^`) with right-associative exponentiation
- Implicit multiplication: `2x`, `3(x+1)`, `(x)(y)`, `2 3`
- Typed errors for every stage, each naming the side of the equation that failed
- Quadtree plotting parallelised with rayon, with deterministic output
- Cancellation of in-flight plots
- Configurable floating-point precision (f32/f64)

## Quick Start

```rust
use exp_plot::context::EvalContext;
use exp_plot::engine::{interp, parse};

fn main() {
    // Plain expressions evaluate directly
    assert_eq!(interp("2 + 3 * 4", &EvalContext::new()).unwrap(), 14.0);

    // An equation evaluates as lhs - rhs
    let eq = parse("x^2 = y^2").unwrap();
    assert_eq!(eq.implicit(&EvalContext::at(3.0, 3.0)), 0.0);

    // Without `=`, an expression in x alone is read as `expr = y`
    let parabola = parse("x^2").unwrap();
    assert_eq!(parabola.to_string(), "(x ^ 2) = y");
}
```

## Plotting

```rust
use exp_plot::engine::parse;
use exp_plot::plot::{CancelToken, PlotConfig, PlotOutcome, Rect, plot, plot_with};

fn main() {
    let eq = parse("y = 2x + 1").unwrap();
    let domain = Rect::from_ranges(-10.0, 10.0, -10.0, 10.0);

    // Default depths are (6, 11)
    let segments = plot(&eq, domain, 6, 11);
    assert!(!segments.is_empty());

    // Reduced depths for interactive redraws, with cancellation
    let cancel = CancelToken::new();
    match plot_with(&eq, domain, &PlotConfig::interactive(), &cancel) {
        PlotOutcome::Complete(output) => assert!(output.segments.len() < segments.len()),
        PlotOutcome::Cancelled => unreachable!(),
    }
}
```

## Drawing

Hosts implement [`graph::Surface`] and keep a [`graph::GraphSet`] of equation
inputs. A failed edit leaves the previous curve on screen.

```rust
use exp_plot::Real;
use exp_plot::graph::{GraphSet, Surface};
use exp_plot::plot::{PlotConfig, Point};
use exp_plot::viewport::Viewport;

struct LineCount(usize);

impl Surface for LineCount {
    fn draw_line(&mut self, _from: Point, _to: Point, _thickness: Real) {
        self.0 += 1;
    }
    fn draw_rect(&mut self, _origin: Point, _size: Point) {}
}

fn main() {
    let mut graphs = GraphSet::new();
    let slot = graphs.add_slot();
    graphs.update(slot, "x^2 + y^2 = 16").unwrap();
    assert!(graphs.update(slot, "x^2 + y^2 =").is_err());
    assert!(graphs.equation(slot).is_some());

    let mut surface = LineCount(0);
    graphs.render(&Viewport::new(400.0, 300.0), &PlotConfig::interactive(), &mut surface);
    assert!(surface.0 > 0);
}
```

## Error Handling

```rust
use exp_plot::engine::parse;
use exp_plot::error::{ParseError, Side, SplitError, ValidationError};

fn main() {
    assert_eq!(parse("x*y"), Err(ParseError::Split(SplitError::NotGraphable)));

    match parse("x = (y") {
        Err(ParseError::Validation { side, source }) => {
            assert_eq!(side, Side::Right);
            assert_eq!(source, ValidationError::UnbalancedParentheses);
        }
        other => panic!("unexpected: {:?}", other),
    }

    let err = parse("2++x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error in left-hand side: unexpected operator at position 2, expected constant, variable or '('"
    );
}
```

## Supported Grammar

| Precedence | Operators | Associativity |
|------------|-----------|---------------|
| 1          | `+` `-`   | Left          |
| 2          | `*` `/`   | Left          |
| 3          | `^`       | Right         |

Constants are non-negative integers. The only variables are `x` and `y`.
There are no functions and no unary minus; write `0 - x`.

## Feature Flags

- `libm` (default): use the `libm` crate for `^`
- `f32`: use 32-bit floating point instead of 64-bit
"#]

pub mod builder;
pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod functions;
pub mod graph;
pub mod lexer;
pub mod plot;
pub mod postfix;
pub mod registry;
pub mod split;
pub mod types;
pub mod validate;
pub mod viewport;

pub use context::EvalContext;
pub use engine::{interp, parse, parse_expression};
pub use error::{ParseError, Result};
pub use lexer::tokenize;
pub use plot::{
    CancelToken, DepthPair, PlotConfig, PlotOutcome, Point, Rect, Segment, plot, plot_with,
};
pub use types::{AstExpr, Equation, Operator, Token, TokenKind, TokenKinds, Variable};
pub use viewport::{Viewport, map_coord};

/// Define the floating-point type based on feature flags
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(not(feature = "f32"))]
pub type Real = f64;

pub mod constants {
    use super::Real;

    #[cfg(feature = "f32")]
    pub const TEST_PRECISION: Real = 1e-5;

    #[cfg(not(feature = "f32"))]
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check if two floating point values are approximately equal
/// within a specified epsilon. Supports optional format arguments like assert_eq!.
///
/// Both sides and the epsilon are coerced to [`Real`], so plain literals work.
#[macro_export]
macro_rules! assert_approx_eq {
    // assert_approx_eq!(left, right) -> use default epsilon
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    // assert_approx_eq!(left, right, epsilon)
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;
        $crate::assert_approx_eq!(
            left_val,
            right_val,
            eps,
            "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`)",
            left_val,
            right_val,
            eps
        )
    }};
    // assert_approx_eq!(left, right, epsilon, "format message", args...)
    ($left:expr, $right:expr, $epsilon:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;
        if left_val.is_nan() && right_val.is_nan() {
            // NaN == NaN for our purposes
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && left_val.signum() == right_val.signum()
        {
            // Same-signed infinities are equal
        } else {
            assert!((left_val - right_val).abs() < eps, $fmt $(, $arg)*);
        }
    }};
}
