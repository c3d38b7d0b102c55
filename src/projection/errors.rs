//! Errors for cohort-component projection inputs (shapes, schedule
//! dimensions, and schedule domains).
//!
//! This module defines [`ProjectionError`], raised by the validated
//! constructors in `projection::core` and by the flat-array entry points.
//! The numerical kernels themselves never return errors: once a
//! [`Schedules`](crate::projection::core::schedule::Schedules) value exists
//! its dimensions are trusted, and pathological magnitudes propagate through
//! the recursion as ordinary floating-point values.
//!
//! ## Conventions
//! - **Indices are 0-based**; `fx_idx` is the first fertile age group.
//! - Survival fractions live in `[0, 1]`, fertility rates are `>= 0`, the sex
//!   ratio at birth and the projection interval are strictly positive.

/// Result alias for projection construction paths that may produce
/// [`ProjectionError`].
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Unified error type for projection inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    // ---- Shape ----
    /// A shape parameter violates its structural constraint.
    InvalidShape { param: &'static str, value: usize, reason: &'static str },

    /// The fertile age range does not fit inside the age groups.
    FertileRangeOutOfBounds { fx_idx: usize, n_fx: usize, n_ages: usize },

    // ---- Dimensions ----
    /// A vector or matrix has the wrong number of rows.
    RowMismatch { name: &'static str, expected: usize, actual: usize },

    /// A matrix has the wrong number of columns (periods).
    ColumnMismatch { name: &'static str, expected: usize, actual: usize },

    /// A flat buffer cannot be reshaped into the requested matrix.
    FlatLengthMismatch { name: &'static str, expected: usize, actual: usize },

    // ---- Schedule domains ----
    /// A schedule entry is NaN or ±inf.
    NonFiniteInput { name: &'static str, index: usize, value: f64 },

    /// A survival fraction lies outside `[0, 1]`.
    InvalidSurvival { index: usize, value: f64 },

    /// A fertility rate is negative.
    NegativeFertility { index: usize, value: f64 },

    /// A sex ratio at birth is not strictly positive.
    InvalidSexRatio { period: usize, value: f64 },

    /// The projection interval is not finite and strictly positive.
    InvalidInterval { value: f64 },

    // ---- Access ----
    /// Requested period lies beyond the projection horizon.
    PeriodOutOfRange { period: usize, n_periods: usize },
}

impl std::error::Error for ProjectionError {}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            ProjectionError::InvalidShape { param, value, reason } => {
                write!(f, "Invalid projection shape parameter {param} = {value}. {reason}")
            }
            ProjectionError::FertileRangeOutOfBounds { fx_idx, n_fx, n_ages } => {
                write!(
                    f,
                    "Fertile ages {fx_idx}..{} exceed the {n_ages} age groups.",
                    fx_idx + n_fx
                )
            }

            // ---- Dimensions ----
            ProjectionError::RowMismatch { name, expected, actual } => {
                write!(f, "{name} must have {expected} rows; got {actual}.")
            }
            ProjectionError::ColumnMismatch { name, expected, actual } => {
                write!(f, "{name} must have {expected} columns; got {actual}.")
            }
            ProjectionError::FlatLengthMismatch { name, expected, actual } => {
                write!(f, "Flat buffer {name} must have length {expected}; got {actual}.")
            }

            // ---- Schedule domains ----
            ProjectionError::NonFiniteInput { name, index, value } => {
                write!(f, "{name} entry at flat index {index} is non-finite: {value}")
            }
            ProjectionError::InvalidSurvival { index, value } => {
                write!(f, "Survival fraction at flat index {index} must lie in [0, 1]; got {value}")
            }
            ProjectionError::NegativeFertility { index, value } => {
                write!(f, "Fertility rate at flat index {index} must be >= 0; got {value}")
            }
            ProjectionError::InvalidSexRatio { period, value } => {
                write!(f, "Sex ratio at birth for period {period} must be > 0; got {value}")
            }
            ProjectionError::InvalidInterval { value } => {
                write!(f, "Projection interval must be finite and > 0; got {value}")
            }

            // ---- Access ----
            ProjectionError::PeriodOutOfRange { period, n_periods } => {
                write!(f, "Period {period} is out of range for a {n_periods}-period projection.")
            }
        }
    }
}
