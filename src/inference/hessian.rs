//! inference::hessian: standard errors from a finite-difference observed
//! information matrix.
//!
//! Purpose
//! -------
//! Turn the curvature of the reconstruction objective at `θ̂` into
//! per-parameter standard errors. The gradient of the negative log-posterior
//! is differenced once more by [`compute_hessian`], copied into `nalgebra`,
//! and pseudo-inverted through a symmetric eigendecomposition.
//!
//! Invariants & assumptions
//! ------------------------
//! - The callback passed to [`calc_standard_errors`] is the gradient of the
//!   negative log-posterior (a summed objective, not an average), so its
//!   Jacobian is the observed information `J(θ̂)`.
//! - [`compute_hessian`] returns a finite, symmetrized `n × n` matrix; this
//!   module does not symmetrize again.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped, so weakly identified
//!   directions contribute nothing rather than dividing by ~0.
//!
//! Conventions
//! -----------
//! - Only the diagonal of `J⁺` is used; no covariance matrix is returned.
//! - Errors are reported via [`OptResult<T>`].
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Standard errors `sqrt(diag(J⁺))` with `J = ∂f/∂θ` at `theta_hat`.
///
/// Parameters
/// ----------
/// - `f`: gradient of the negative log-posterior, `θ ↦ ∇nll(θ)`.
/// - `theta_hat`: point at which the information is evaluated.
///
/// Errors
/// ------
/// - Any error from [`compute_hessian`], e.g. `OptError::InvalidHessian` when
///   the differenced gradient produces non-finite entries.
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    Ok(solve_for_se(to_dmatrix(&obs_info)))
}

// ---- Helper methods ----

/// Copy an `ndarray` matrix into a column-major `DMatrix`.
fn to_dmatrix(m: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| m[[i, j]])
}

/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k` for `J = Q Λ Qᵀ`.
fn solve_for_se(obs_info: DMatrix<f64>) -> Array1<f64> {
    let n = obs_info.nrows();
    let eigen = obs_info.symmetric_eigen();
    let q = eigen.eigenvectors;
    let eigenvals = eigen.eigenvalues;
    Array1::from_shape_fn(n, |i| {
        eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum::<f64>()
            .sqrt()
    })
}
