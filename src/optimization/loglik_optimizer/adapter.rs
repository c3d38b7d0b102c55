//! Bridge from [`LogLikelihood`] to argmin's `CostFunction` / `Gradient`.
//!
//! argmin minimizes, so the adapter reports `c(θ) = -ℓ(θ)` and `-∇ℓ(θ)`.
//! A model without an analytic gradient gets central differences of the
//! cost, falling back to forward differences when the central stencil
//! produces a non-finite entry or a model error.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Borrowed model plus its fixed data.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Finite-difference gradient of the cost.
    ///
    /// The first error raised by the cost inside the stencil is kept in
    /// `first_err` and surfaced after differencing; the stencil itself only
    /// sees `NaN`.
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let first_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost = |x: &Theta| -> f64 {
            self.cost(x).unwrap_or_else(|e| {
                let mut slot = first_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            })
        };

        let central = theta.central_diff(&cost);
        if first_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }
        Ok(run_fd_diff(theta, &cost, &first_err)?)
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// # Errors
    /// - Any error from [`LogLikelihood::value`].
    /// - [`OptError::NonFiniteCost`] when `ℓ(θ)` is `NaN` or infinite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let ll = self.f.value(theta, self.data)?;
        if !ll.is_finite() {
            return Err(OptError::NonFiniteCost { value: ll }.into());
        }
        Ok(-ll)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e.into()),
        }
    }
}
