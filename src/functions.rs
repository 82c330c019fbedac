//! Arithmetic behind the five binary operators.
//!
//! The functions follow IEEE semantics: division by zero yields an infinity
//! (or NaN for `0/0`) rather than an error, and the plotter treats any
//! non-finite result as "no crossing here".
//!
//! `pow` uses the `libm` crate when the default `libm` feature is enabled and
//! falls back to the standard library otherwise. Depending on the selected
//! floating-point precision (controlled by the "f32" feature), the matching
//! single or double precision routine is used.

#[cfg(all(feature = "libm", feature = "f32"))]
use libm::powf as libm_pow;

#[cfg(all(feature = "libm", not(feature = "f32")))]
use libm::pow as libm_pow;

use crate::Real;

/// Adds two values.
pub fn add(a: Real, b: Real) -> Real {
    a + b
}

/// Subtracts the second value from the first.
pub fn sub(a: Real, b: Real) -> Real {
    a - b
}

/// Multiplies two values.
pub fn mul(a: Real, b: Real) -> Real {
    a * b
}

/// Divides the first value by the second.
///
/// # Returns
///
/// The quotient `a / b`. A zero divisor gives positive or negative infinity
/// depending on the signs involved, and `0 / 0` gives NaN.
pub fn div(a: Real, b: Real) -> Real {
    a / b
}

/// Raises `a` to the power `b`.
///
/// # Parameters
///
/// * `a` - The base
/// * `b` - The exponent
///
/// # Returns
///
/// `a^b`. A negative base with a fractional exponent gives NaN.
pub fn pow(a: Real, b: Real) -> Real {
    #[cfg(feature = "libm")]
    {
        libm_pow(a, b)
    }
    #[cfg(not(feature = "libm"))]
    {
        a.powf(b)
    }
}
