//! PopReconstruction: the fitted-model wrapper around [`evaluate`].
//!
//! Purpose
//! -------
//! Expose the reconstruction objective through the optimizer's
//! [`LogLikelihood`] trait and keep the outcome of a fit so the reconstructed
//! trajectory and standard errors can be read back at the optimum.
//!
//! Key behaviors
//! -------------
//! - `value(θ)` is the log-posterior `-nll(θ)`; no analytic gradient is
//!   provided, so the optimizer falls back to finite differences.
//! - [`PopReconstruction::fit`] runs L-BFGS with the model's `MLEOptions` and
//!   stores the [`OptimOutcome`].
//! - [`PopReconstruction::report`] re-evaluates at `θ̂` with the report flag
//!   on.
//! - [`PopReconstruction::standard_errors`] inverts the finite-difference
//!   Hessian of `nll` at `θ̂`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The model holds no per-evaluation state; every `value` call is an
//!   independent pure evaluation.
//! - `report` and `standard_errors` require a successful `fit`.
use crate::{
    inference::hessian::calc_standard_errors,
    model::{
        data::ModelData,
        errors::{ModelError, ModelResult},
        objective::evaluate,
        options::ModelOptions,
        params::ParamLayout,
        report::ModelReport,
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            LogLikelihood, OptimOutcome, Theta, builders::line_search_name, maximize,
        },
    },
};
use finitediff::FiniteDiff;
use ndarray::Array1;

/// Hierarchical population reconstruction model.
///
/// Fields
/// ------
/// - `options`: active model blocks and optimizer configuration.
/// - `results`: optimizer outcome, populated by [`fit`](Self::fit).
#[derive(Debug, Clone, PartialEq)]
pub struct PopReconstruction {
    pub options: ModelOptions,
    pub results: Option<OptimOutcome>,
}

impl PopReconstruction {
    pub fn new(options: ModelOptions) -> Self {
        PopReconstruction { options, results: None }
    }

    /// Parameter layout for `data` under the current options.
    pub fn layout(&self, data: &ModelData) -> ParamLayout {
        ParamLayout::new(data.shape(), self.options.migration)
    }

    /// Starting θ: latent blocks at their prior means, scale entries at 0.
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] if the prior means do not fill
    ///   the layout (cannot happen for validated [`ModelData`]).
    pub fn initial_theta(&self, data: &ModelData) -> ModelResult<Theta> {
        self.layout(data).initial_theta(data)
    }

    /// Negative log-posterior at `theta` without a report.
    pub fn nll(&self, theta: &Theta, data: &ModelData) -> ModelResult<f64> {
        Ok(evaluate(theta, data, &self.options, false)?.nll)
    }

    /// Maximize the log-posterior starting from `theta0` and store the
    /// outcome in `self.results`.
    ///
    /// # Errors
    /// - Any [`OptError`] from validation of `theta0`, the optimizer
    ///   configuration, or the backend run.
    pub fn fit(&mut self, theta0: Theta, data: &ModelData) -> OptResult<()> {
        log::info!(
            "fitting reconstruction: {} parameters, {} periods, {} census columns, {} line search",
            theta0.len(),
            data.shape().n_periods,
            data.census().n_census(),
            line_search_name(&self.options.mle_opts)
        );
        let outcome = maximize(self, theta0, data, &self.options.mle_opts)?;
        log::info!(
            "fit finished: status = {}, log-posterior = {:.6}, iterations = {}",
            outcome.status,
            outcome.value,
            outcome.iterations
        );
        log::debug!("function evaluations: {:?}", outcome.fn_evals);
        self.results = Some(outcome);
        Ok(())
    }

    fn theta_hat(&self) -> ModelResult<&Theta> {
        self.results.as_ref().map(|r| &r.theta_hat).ok_or(ModelError::ModelNotFitted)
    }

    /// Reconstructed schedules and trajectory at the fitted `θ̂`.
    ///
    /// # Errors
    /// - [`ModelError::ModelNotFitted`] before a successful `fit`.
    /// - Any error from [`evaluate`].
    pub fn report(&self, data: &ModelData) -> ModelResult<ModelReport> {
        let theta_hat = self.theta_hat()?;
        let eval = evaluate(theta_hat, data, &self.options, true)?;
        eval.report.ok_or(ModelError::ModelNotFitted)
    }

    /// Standard errors of `θ̂` from the observed information
    /// `∇²nll(θ̂)`, computed by finite differences.
    ///
    /// Failed evaluations inside the difference stencil become NaN and are
    /// reported by the Hessian validation as `OptError::InvalidHessian`.
    ///
    /// # Errors
    /// - `OptError::ModelNotFitted` before a successful `fit`.
    /// - Hessian validation errors from
    ///   [`compute_hessian`](crate::optimization::loglik_optimizer::finite_diff::compute_hessian).
    pub fn standard_errors(&self, data: &ModelData) -> OptResult<Array1<f64>> {
        let theta_hat = self.theta_hat()?;
        let nll = |theta: &Theta| self.nll(theta, data).unwrap_or(f64::NAN);
        let grad = |theta: &Theta| theta.central_diff(&nll);
        calc_standard_errors(&grad, theta_hat)
    }
}

impl LogLikelihood for PopReconstruction {
    type Data = ModelData;

    /// Log-posterior `-nll(θ)`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        Ok(-self.nll(theta, data)?)
    }

    /// Length and finiteness of θ against the model layout.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        self.layout(data).check(theta).map_err(OptError::from)
    }
}
