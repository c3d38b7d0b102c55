//! Log-densities used by the priors and the observation likelihood.
//!
//! - [`dlgamma`]: log-density of `Y = log X` for `X ~ Gamma(shape, rate)`.
//! - [`dnorm_sum`]: summed Normal log-density with a common standard
//!   deviation.
//! - [`dpois_sum`]: summed Poisson log-density, defined for real-valued
//!   counts through `lnΓ(x + 1)`.
use crate::model::errors::ModelResult;
use ndarray::{ArrayBase, Data, Dimension, Zip};
use statrs::{
    distribution::{Continuous, Normal},
    function::gamma::ln_gamma,
};

/// `shape * ln(rate) - lnΓ(shape) + shape * y - rate * exp(y)`.
pub fn dlgamma(y: f64, shape: f64, rate: f64) -> f64 {
    shape * rate.ln() - ln_gamma(shape) + shape * y - rate * y.exp()
}

/// `Σ_i ln N(x_i; mean_i, sd)`.
///
/// # Errors
/// - [`ModelError::InvalidDensity`](crate::model::errors::ModelError::InvalidDensity)
///   if `sd` is not finite and strictly positive.
///
/// # Panics
/// - If `x` and `mean` have different shapes.
pub fn dnorm_sum<S1, S2, D>(
    x: &ArrayBase<S1, D>, mean: &ArrayBase<S2, D>, sd: f64,
) -> ModelResult<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let std_normal = Normal::new(0.0, sd)?;
    Ok(Zip::from(x).and(mean).fold(0.0, |acc, &xi, &mi| acc + std_normal.ln_pdf(xi - mi)))
}

/// `Σ_i (x_i ln λ_i - λ_i - lnΓ(x_i + 1))`, with the `x ln λ` term taken as
/// zero when `x_i == 0`.
///
/// Negative or NaN rates produce NaN, which callers treat as a non-finite
/// objective.
///
/// # Panics
/// - If `x` and `lambda` have different shapes.
pub fn dpois_sum<S1, S2, D>(x: &ArrayBase<S1, D>, lambda: &ArrayBase<S2, D>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    Zip::from(x).and(lambda).fold(0.0, |acc, &xi, &li| {
        let kernel = if xi == 0.0 { -li } else { xi * li.ln() - li };
        acc + kernel - ln_gamma(xi + 1.0)
    })
}
