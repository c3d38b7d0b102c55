//! inference: uncertainty for a fitted reconstruction.
//!
//! Standard errors at `θ̂` come from the observed information of the negative
//! log-posterior, built with finite differences and pseudo-inverted by
//! eigendecomposition (see [`hessian`]). Everything is expressed in the
//! unconstrained θ-space the optimizer works in; mapping to schedule space
//! is left to callers.

pub mod hessian;

pub use self::hessian::calc_standard_errors;

pub mod prelude {
    pub use super::hessian::calc_standard_errors;
}
