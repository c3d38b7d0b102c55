//! loglik_optimizer: L-BFGS maximization of log-likelihoods through argmin.
//!
//! Purpose
//! -------
//! Fit models that expose a scalar objective over an unconstrained θ. The
//! reconstruction model implements [`LogLikelihood`] with `ℓ(θ) = -nll(θ)`
//! and calls [`maximize`]; nothing here knows about populations.
//!
//! Key behaviors
//! -------------
//! - [`adapter`] turns `ℓ` into argmin's cost `-ℓ` and supplies
//!   finite-difference gradients when the model has no analytic one.
//! - [`builders`] configure L-BFGS with the chosen line search and
//!   tolerances; [`run`] executes it and normalizes the final state into an
//!   [`OptimOutcome`].
//! - [`finite_diff`] also provides the Hessian used for standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - A model error raised during any evaluation aborts the run and is
//!   returned as the matching [`OptError`](crate::optimization::errors::OptError).
//! - Non-finite objective values are errors, never silently skipped.
//!
//! Testing notes
//! -------------
//! - Submodule tests use small closed-form objectives (quadratic bowls, a
//!   Gaussian mean) with known optima.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
