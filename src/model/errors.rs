//! Errors for the hierarchical reconstruction model (fixed-data validation,
//! parameter-vector layout, configuration conflicts, and non-finite scales).
//!
//! This module defines [`ModelError`], raised while building [`ModelData`],
//! unpacking a parameter vector, and evaluating the objective. Projection
//! failures are wrapped via `From<ProjectionError>`, and the whole type maps
//! into the optimizer's `OptError` so `?` works inside `LogLikelihood` impls.
//!
//! ## Conventions
//! - **Indices are 0-based**. Census period indices refer to population
//!   columns (0 = base population).
//! - Shapes are reported as `(rows, cols)`.
//!
//! [`ModelData`]: crate::model::data::ModelData
use crate::projection::errors::ProjectionError;
use statrs::distribution::NormalError;

/// Result alias for model operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for the reconstruction model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Parameter vector ----
    /// θ does not match the layout implied by the shape and options.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// θ contains a NaN or ±inf entry.
    NonFiniteTheta { index: usize, value: f64 },

    /// A prior standard deviation derived from θ is zero, negative, or
    /// non-finite.
    InvalidScale { block: &'static str, value: f64 },

    /// A density could not be constructed from its parameters.
    InvalidDensity { reason: &'static str },

    // ---- Fixed data ----
    /// A prior mean vector has the wrong length.
    PriorMeanLengthMismatch { name: &'static str, expected: usize, actual: usize },

    /// An observation matrix has the wrong shape.
    DataShapeMismatch { name: &'static str, expected: (usize, usize), actual: (usize, usize) },

    /// Number of census columns and census period indices differ.
    CensusIndexCountMismatch { columns: usize, indices: usize },

    /// A census period index points past the final population column.
    CensusPeriodOutOfRange { index: usize, period: usize, n_periods: usize },

    /// Observed data contain a NaN or ±inf entry.
    NonFiniteData { name: &'static str, index: usize, value: f64 },

    /// Observed counts must be non-negative.
    NegativeCount { name: &'static str, index: usize, value: f64 },

    // ---- Configuration ----
    /// A hyperprior shape or rate is not finite and strictly positive.
    InvalidHyperprior { block: &'static str, value: f64 },

    /// Options request a block the data cannot support.
    ConfigConflict { reason: &'static str },

    // ---- Lifecycle ----
    /// Requested a fitted quantity before `fit` succeeded.
    ModelNotFitted,

    // ---- Wrapped ----
    /// Schedule or projection validation failed.
    Projection(ProjectionError),
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameter vector ----
            ModelError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector must have length {expected}; got {actual}.")
            }
            ModelError::NonFiniteTheta { index, value } => {
                write!(f, "Parameter vector entry {index} is non-finite: {value}")
            }
            ModelError::InvalidScale { block, value } => {
                write!(f, "Prior standard deviation for {block} must be finite and > 0; got {value}")
            }
            ModelError::InvalidDensity { reason } => {
                write!(f, "Invalid density parameters: {reason}")
            }

            // ---- Fixed data ----
            ModelError::PriorMeanLengthMismatch { name, expected, actual } => {
                write!(f, "Prior mean {name} must have length {expected}; got {actual}.")
            }
            ModelError::DataShapeMismatch { name, expected, actual } => {
                write!(f, "{name} must have shape {expected:?}; got {actual:?}.")
            }
            ModelError::CensusIndexCountMismatch { columns, indices } => {
                write!(f, "Census has {columns} columns but {indices} period indices.")
            }
            ModelError::CensusPeriodOutOfRange { index, period, n_periods } => {
                write!(
                    f,
                    "Census column {index} refers to period {period}; valid periods are 0..={n_periods}."
                )
            }
            ModelError::NonFiniteData { name, index, value } => {
                write!(f, "{name} entry at flat index {index} is non-finite: {value}")
            }
            ModelError::NegativeCount { name, index, value } => {
                write!(f, "{name} entry at flat index {index} must be >= 0; got {value}")
            }

            // ---- Configuration ----
            ModelError::InvalidHyperprior { block, value } => {
                write!(f, "Hyperprior parameter for {block} must be finite and > 0; got {value}")
            }
            ModelError::ConfigConflict { reason } => {
                write!(f, "Model configuration conflict: {reason}")
            }

            // ---- Lifecycle ----
            ModelError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }

            // ---- Wrapped ----
            ModelError::Projection(err) => write!(f, "Projection error: {err}"),
        }
    }
}

impl From<ProjectionError> for ModelError {
    fn from(err: ProjectionError) -> Self {
        ModelError::Projection(err)
    }
}

impl From<NormalError> for ModelError {
    fn from(err: NormalError) -> Self {
        let reason = match err {
            NormalError::StandardDeviationInvalid => {
                "Normal standard deviation must be finite and > 0."
            }
            _ => "Normal mean must be finite.",
        };
        ModelError::InvalidDensity { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Projection errors keep their message when wrapped.
    //
    // Given
    // -----
    // - `ProjectionError::InvalidInterval { value: 0.0 }`.
    //
    // Expect
    // ------
    // - `ModelError::Projection(..)` whose message contains the inner one.
    fn projection_error_is_wrapped_with_message() {
        // Arrange
        let inner = ProjectionError::InvalidInterval { value: 0.0 };

        // Act
        let err: ModelError = inner.clone().into();

        // Assert
        assert_eq!(err, ModelError::Projection(inner.clone()));
        assert!(err.to_string().contains(&inner.to_string()));
    }
}
