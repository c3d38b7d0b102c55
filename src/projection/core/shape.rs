//! Dimensions of a cohort-component projection.
//!
//! - `n_ages`: number of age groups; the last one is the open age group.
//! - `n_periods`: number of projection steps.
//! - `n_fx`: number of fertile age groups.
//! - `fx_idx`: first fertile age group (0-based).
//!
//! The youngest age group may never be fertile: births in the second half
//! of a step would otherwise need offspring of births not yet projected.
use crate::projection::errors::{ProjectionError, ProjectionResult};

/// Dimensions of a projection run.
///
/// Invariants: `n_ages >= 2`, `n_periods >= 1`, `n_fx >= 1`, `fx_idx >= 1`
/// and `fx_idx + n_fx <= n_ages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionShape {
    pub n_ages: usize,
    pub n_periods: usize,
    pub n_fx: usize,
    pub fx_idx: usize,
}

impl ProjectionShape {
    /// Construct a validated [`ProjectionShape`].
    ///
    /// # Errors
    /// - [`ProjectionError::InvalidShape`] if `n_ages < 2`, `n_periods == 0`,
    ///   `n_fx == 0`, or `fx_idx == 0`.
    /// - [`ProjectionError::FertileRangeOutOfBounds`] if
    ///   `fx_idx + n_fx > n_ages`.
    pub fn new(
        n_ages: usize, n_periods: usize, n_fx: usize, fx_idx: usize,
    ) -> ProjectionResult<Self> {
        if n_ages < 2 {
            return Err(ProjectionError::InvalidShape {
                param: "n_ages",
                value: n_ages,
                reason: "At least two age groups are required.",
            });
        }
        if n_periods == 0 {
            return Err(ProjectionError::InvalidShape {
                param: "n_periods",
                value: n_periods,
                reason: "At least one projection period is required.",
            });
        }
        if n_fx == 0 {
            return Err(ProjectionError::InvalidShape {
                param: "n_fx",
                value: n_fx,
                reason: "At least one fertile age group is required.",
            });
        }
        if fx_idx == 0 {
            return Err(ProjectionError::InvalidShape {
                param: "fx_idx",
                value: fx_idx,
                reason: "The youngest age group cannot be fertile.",
            });
        }
        if fx_idx + n_fx > n_ages {
            return Err(ProjectionError::FertileRangeOutOfBounds { fx_idx, n_fx, n_ages });
        }
        Ok(ProjectionShape { n_ages, n_periods, n_fx, fx_idx })
    }

    /// Number of survival entries per period (`n_ages + 1`).
    pub fn n_sx(&self) -> usize {
        self.n_ages + 1
    }
}
