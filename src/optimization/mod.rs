//! optimization: fitting infrastructure shared by the model layer.
//!
//! - [`loglik_optimizer`]: argmin-backed L-BFGS over a
//!   [`LogLikelihood`](loglik_optimizer::LogLikelihood).
//! - [`numerical_stability`]: an overflow-safe logistic map used to move
//!   survival proportions from θ-space into probability space.
//! - [`errors`]: [`OptError`](errors::OptError), the single error type the
//!   fitting surface returns, with conversions from argmin and model errors.
//!
//! Nothing in this module logs except [`loglik_optimizer::run`] when
//! verbose fitting is requested.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
