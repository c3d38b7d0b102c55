//! Finite-difference fallbacks for gradients and Hessians.
//!
//! Both helpers validate their output and retry with a forward stencil when
//! the central one fails; the Hessian is symmetrized before it is returned.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `closure_err` is the slot `func` writes its first failure into; it is
/// cleared before differencing and checked afterwards.
///
/// # Errors
/// - The error recorded by `func`, if any.
/// - [`OptError::InvalidGradient`](crate::optimization::errors::OptError::InvalidGradient)
///   for non-finite entries.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&grad, theta.len())?;
    Ok(grad)
}

/// Hessian of the function whose gradient is `f`, evaluated at `theta`.
///
/// # Errors
/// - [`OptError::InvalidHessian`](crate::optimization::errors::OptError::InvalidHessian)
///   when neither stencil yields finite entries.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize(&mut hess);
    Ok(hess)
}

fn symmetrize(hess: &mut Hessian) {
    let n = hess.nrows();
    for i in 0..n {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Forward differences of a quadratic approximate its gradient.
    //
    // Given
    // -----
    // - f(θ) = θ·θ at θ = [0, 1].
    //
    // Expect
    // ------
    // - ∇f ≈ [0, 2].
    fn forward_gradient_of_quadratic() {
        // Arrange
        let theta = array![0.0, 1.0];
        let slot: RefCell<Option<Error>> = RefCell::new(None);

        // Act
        let grad = run_fd_diff(&theta, &|x: &Theta| x.dot(x), &slot).expect("finite gradient");

        // Assert
        assert_abs_diff_eq!(grad[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(grad[1], 2.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A recorded closure error wins over the numeric result; otherwise a
    // non-finite gradient is rejected.
    fn closure_errors_and_nan_are_reported() {
        let theta = array![1.0];
        let slot: RefCell<Option<Error>> = RefCell::new(None);
        let failing = |_: &Theta| {
            slot.replace(Some(OptError::ModelNotFitted.into()));
            f64::NAN
        };
        assert_eq!(run_fd_diff(&theta, &failing, &slot), Err(OptError::ModelNotFitted));

        let fresh: RefCell<Option<Error>> = RefCell::new(None);
        assert!(matches!(
            run_fd_diff(&theta, &|_: &Theta| f64::NAN, &fresh),
            Err(OptError::InvalidGradient { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The Hessian of a coupled quadratic is recovered and symmetric.
    //
    // Given
    // -----
    // - ∇f(θ) = [2θ_0 + θ_1, θ_0 + 4θ_1].
    //
    // Expect
    // ------
    // - H ≈ [[2, 1], [1, 4]] with exact symmetry.
    fn hessian_of_coupled_quadratic() {
        // Arrange
        let grad = |t: &Theta| array![2.0 * t[0] + t[1], t[0] + 4.0 * t[1]];

        // Act
        let h = compute_hessian(&grad, &array![0.3, -0.7]).expect("finite Hessian");

        // Assert
        assert_abs_diff_eq!(h[[0, 0]], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(h[[0, 1]], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(h[[1, 1]], 4.0, epsilon = 1e-5);
        assert_eq!(h[[0, 1]], h[[1, 0]]);
        assert!(matches!(
            compute_hessian(&|_: &Theta| array![f64::NAN], &array![0.0]),
            Err(OptError::InvalidHessian { .. })
        ));
    }
}
