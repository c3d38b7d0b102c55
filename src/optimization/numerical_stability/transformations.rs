//! Stable transforms between unconstrained θ-space and model space.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalue floor used when pseudo-inverting an observed
//!   information matrix.
//! - [`safe_logistic(x)`]: `1 / (1 + exp(-x))`, mapping ℝ → (0, 1) without
//!   overflow in either tail.
//! - [`logistic_array`]: elementwise [`safe_logistic`] over an `ndarray`.
//!
//! Survival fractions live on the logit scale in θ and pass through
//! [`safe_logistic`] before reaching the projection.
use ndarray::{Array, ArrayBase, Data, Dimension};

/// Eigenvalues at or below this magnitude are dropped from pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-12;

/// Numerically stable logistic: `σ(x) = 1 / (1 + exp(-x))`.
///
/// For negative `x` the algebraically equal `exp(x) / (1 + exp(x))` is used
/// so `exp` never sees a large positive argument.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Elementwise [`safe_logistic`].
pub fn logistic_array<S, D>(x: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(safe_logistic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The logistic map stays finite and inside (0, 1] in both tails.
    //
    // Given
    // -----
    // - `x ∈ {-800, 0, 800}`.
    //
    // Expect
    // ------
    // - `σ(-800) = 0`, `σ(0) = 0.5`, `σ(800) = 1`, with no NaN.
    fn logistic_is_stable_in_tails() {
        assert_eq!(safe_logistic(-800.0), 0.0);
        assert_eq!(safe_logistic(0.0), 0.5);
        assert_eq!(safe_logistic(800.0), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // The logistic map is symmetric, `σ(x) + σ(-x) = 1`, and the array form
    // matches the scalar map elementwise.
    fn logistic_is_symmetric_and_elementwise() {
        for &x in &[-6.0, -1.5, 0.0, 0.3, 4.0] {
            assert_relative_eq!(safe_logistic(x) + safe_logistic(-x), 1.0, epsilon = 1e-15);
        }
        let p = logistic_array(&array![[2.0], [-2.0]]);
        assert_eq!(p[(0, 0)], safe_logistic(2.0));
        assert_relative_eq!(p[(0, 0)] + p[(1, 0)], 1.0, epsilon = 1e-15);
    }
}
