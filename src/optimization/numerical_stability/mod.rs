//! numerical_stability: guarded transforms shared by the model and the
//! inference layer.
//!
//! Purpose
//! -------
//! Keep the mapping from unconstrained θ-space into bounded model quantities
//! in one place, and hold the small numerical constants those mappings and
//! the standard-error routines depend on.
//!
//! Key behaviors
//! -------------
//! - [`safe_logistic`] moves survival fractions from the logit scale carried
//!   in θ into `(0, 1)`.
//! - [`logistic_array`] applies the logistic map to whole schedule matrices.
//! - [`EIGEN_EPS`] is the eigenvalue floor used by
//!   `inference::hessian` when pseudo-inverting observed information.
//!
//! Testing notes
//! -------------
//! - Unit tests check tail behavior and symmetry of the logistic map.

pub mod transformations;

pub use self::transformations::{EIGEN_EPS, logistic_array, safe_logistic};

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, logistic_array, safe_logistic};
}
