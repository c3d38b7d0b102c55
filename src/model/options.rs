//! Model options: which optional blocks of the reconstruction model are
//! active, plus the optimizer configuration used by `fit`.
//!
//! Purpose
//! -------
//! Describe every model variant with one configuration value instead of a
//! family of near-identical objective functions. The evaluator reads these
//! flags to decide which prior, parameter, and likelihood blocks exist.
//!
//! Key behaviors
//! -------------
//! - [`PriorScale`] selects how prior standard deviations are parameterized:
//!   log-precisions with log-gamma hyperpriors, or log standard deviations
//!   with a change-of-variables term.
//! - [`MigrationMode`] decides whether migration proportions are estimated
//!   (with their own prior block) or fixed at zero.
//! - `vital_registration` switches the Poisson likelihood for observed
//!   deaths and births on or off.
//! - [`EvalMode`] selects the full projection objective or the single-period
//!   operator-only mode.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`ModelOptions::new`] assumes its components were validated by their
//!   own constructors ([`HyperpriorRates::new`], `MLEOptions::new`).
//! - Whether `vital_registration` is compatible with the supplied data is
//!   checked at evaluation time, where both are available.
//!
//! Conventions
//! -----------
//! - The scale block of θ always comes first and holds one entry per active
//!   prior block, in the order `[logpop, sx, fx, gx]`.
use crate::{model::hyperpriors::HyperpriorRates, optimization::loglik_optimizer::MLEOptions};

/// Parameterization of the prior standard deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorScale {
    /// θ carries `log τ²` per block; each contributes a log-gamma hyperprior
    /// and `σ = exp(-0.5 * log τ²)`.
    #[default]
    Hyperpriors,
    /// θ carries `log σ` per block; `σ = exp(log σ)` and the objective
    /// subtracts `log σ` for the change of variables.
    LogSigma,
}

/// Whether migration proportions are part of θ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MigrationMode {
    /// θ carries an `n_ages × n_periods` migration block with a Normal prior.
    #[default]
    Estimated,
    /// Migration is fixed at zero and has no parameters.
    Zero,
}

impl MigrationMode {
    pub fn is_estimated(&self) -> bool {
        matches!(self, MigrationMode::Estimated)
    }
}

/// What the evaluator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalMode {
    /// Priors, full projection, and observation likelihood.
    #[default]
    Projection,
    /// Build the period-0 operator, report `L * basepop`, and return 0.
    LeslieOnly,
}

/// ModelOptions: one configuration for every model variant.
///
/// Fields
/// ------
/// - `prior_scale`: [`PriorScale`] parameterization of the scale block.
/// - `migration`: [`MigrationMode`].
/// - `vital_registration`: include the Poisson death/birth likelihood.
/// - `eval_mode`: [`EvalMode`].
/// - `rates`: [`HyperpriorRates`] used under [`PriorScale::Hyperpriors`].
/// - `mle_opts`: optimizer configuration used by
///   [`PopReconstruction::fit`](crate::model::reconstruction::PopReconstruction::fit).
///
/// Default
/// -------
/// Hyperpriors, estimated migration, vital registration on, full projection,
/// default rates, and `MLEOptions::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    pub prior_scale: PriorScale,
    pub migration: MigrationMode,
    pub vital_registration: bool,
    pub eval_mode: EvalMode,
    pub rates: HyperpriorRates,
    pub mle_opts: MLEOptions,
}

impl ModelOptions {
    pub fn new(
        prior_scale: PriorScale, migration: MigrationMode, vital_registration: bool,
        eval_mode: EvalMode, rates: HyperpriorRates, mle_opts: MLEOptions,
    ) -> Self {
        ModelOptions { prior_scale, migration, vital_registration, eval_mode, rates, mle_opts }
    }

    /// Number of entries in the scale block of θ.
    pub fn n_scale_params(&self) -> usize {
        if self.migration.is_estimated() { 4 } else { 3 }
    }
}

impl Default for ModelOptions {
    fn default() -> Self {
        ModelOptions {
            prior_scale: PriorScale::default(),
            migration: MigrationMode::default(),
            vital_registration: true,
            eval_mode: EvalMode::default(),
            rates: HyperpriorRates::default(),
            mle_opts: MLEOptions::default(),
        }
    }
}
