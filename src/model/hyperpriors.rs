//! Hyperprior rate table for the log-precision parameters.
//!
//! Each prior block (base population, survival, fertility, migration) has a
//! log-precision `log τ²` with a log-gamma hyperprior: `τ² ~ Gamma(shape,
//! rate)`. The defaults below give survival, fertility, and base population
//! the same rate and migration a larger one.
use crate::model::errors::{ModelError, ModelResult};

/// Gamma shape shared by every hyperprior.
pub const HYPERPRIOR_SHAPE: f64 = 1.0;

/// Gamma rate for the base-population log-precision.
pub const LOGPOP_RATE: f64 = 0.0109;

/// Gamma rate for the survival log-precision.
pub const SX_RATE: f64 = 0.0109;

/// Gamma rate for the fertility log-precision.
pub const FX_RATE: f64 = 0.0109;

/// Gamma rate for the migration log-precision.
pub const GX_RATE: f64 = 0.0436;

/// Shape and per-block rates passed into the prior evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperpriorRates {
    pub shape: f64,
    pub logpop: f64,
    pub sx: f64,
    pub fx: f64,
    pub gx: f64,
}

impl HyperpriorRates {
    /// Construct a validated rate table.
    ///
    /// # Errors
    /// - [`ModelError::InvalidHyperprior`] if any entry is non-finite or
    ///   not strictly positive.
    pub fn new(shape: f64, logpop: f64, sx: f64, fx: f64, gx: f64) -> ModelResult<Self> {
        for (block, value) in
            [("shape", shape), ("logpop", logpop), ("sx", sx), ("fx", fx), ("gx", gx)]
        {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::InvalidHyperprior { block, value });
            }
        }
        Ok(HyperpriorRates { shape, logpop, sx, fx, gx })
    }
}

impl Default for HyperpriorRates {
    fn default() -> Self {
        HyperpriorRates {
            shape: HYPERPRIOR_SHAPE,
            logpop: LOGPOP_RATE,
            sx: SX_RATE,
            fx: FX_RATE,
            gx: GX_RATE,
        }
    }
}
