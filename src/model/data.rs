//! Fixed data carried into every objective evaluation.
//!
//! Purpose
//! -------
//! Bundle everything the reconstruction objective needs besides θ: the
//! projection dimensions, the interval and sex ratio at birth, the prior
//! means of each latent block, the census observations, and optional vital
//! registration counts. Validation happens once in the constructors so the
//! evaluator can index freely.
//!
//! Invariants & assumptions
//! ------------------------
//! - `srb` has one strictly positive entry per period and `interval` is
//!   finite and strictly positive (reported as [`ProjectionError`] values).
//! - Prior means are finite and shaped after [`ProjectionShape`]:
//!   `log_basepop` has `n_ages` entries, `logit_sx` is
//!   `(n_ages + 1) × n_periods`, `log_fx` is `n_fx × n_periods`, and `gx`
//!   is `n_ages × n_periods`.
//! - Census log-populations are `n_ages × n_census` with one 0-based
//!   population column index per census column, each `<= n_periods`.
//! - Vital registration counts are finite and non-negative.
//!
//! Conventions
//! -----------
//! - Flat indices in error values are column-major.
use crate::{
    model::errors::{ModelError, ModelResult},
    projection::{core::ProjectionShape, errors::ProjectionError},
};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

/// Prior means of the latent blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorMeans {
    pub log_basepop: Array1<f64>,
    pub logit_sx: Array2<f64>,
    pub log_fx: Array2<f64>,
    pub gx: Array2<f64>,
}

/// Census observations on the log scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CensusData {
    pub log_pop: Array2<f64>,
    pub period_idx: Vec<usize>,
}

impl CensusData {
    /// Census data with no observations.
    pub fn empty(n_ages: usize) -> Self {
        CensusData { log_pop: Array2::zeros((n_ages, 0)), period_idx: Vec::new() }
    }

    pub fn n_census(&self) -> usize {
        self.period_idx.len()
    }
}

/// Observed period deaths and births.
#[derive(Debug, Clone, PartialEq)]
pub struct VitalRegistration {
    /// `n_ages × n_periods`.
    pub deaths: Array2<f64>,
    /// `n_fx × n_periods`.
    pub births: Array2<f64>,
}

/// Validated fixed data for [`evaluate`](crate::model::objective::evaluate).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    shape: ProjectionShape,
    interval: f64,
    srb: Array1<f64>,
    priors: PriorMeans,
    census: CensusData,
    vital: Option<VitalRegistration>,
}

impl ModelData {
    /// Construct validated model data.
    ///
    /// # Errors
    /// - [`ModelError::Projection`] wrapping `RowMismatch`, `InvalidSexRatio`,
    ///   or `InvalidInterval` for a bad `srb` or `interval`.
    /// - [`ModelError::PriorMeanLengthMismatch`] / [`ModelError::DataShapeMismatch`]
    ///   for misshapen prior means or observations.
    /// - [`ModelError::CensusIndexCountMismatch`] /
    ///   [`ModelError::CensusPeriodOutOfRange`] for inconsistent census indices.
    /// - [`ModelError::NonFiniteData`] / [`ModelError::NegativeCount`] for bad
    ///   entries.
    pub fn new(
        shape: ProjectionShape, interval: f64, srb: Array1<f64>, priors: PriorMeans,
        census: CensusData, vital: Option<VitalRegistration>,
    ) -> ModelResult<Self> {
        let ProjectionShape { n_ages, n_periods, n_fx, .. } = shape;

        if srb.len() != n_periods {
            return Err(ProjectionError::RowMismatch {
                name: "srb",
                expected: n_periods,
                actual: srb.len(),
            }
            .into());
        }
        if let Some((period, &value)) =
            srb.iter().enumerate().find(|(_, v)| !v.is_finite() || **v <= 0.0)
        {
            return Err(ProjectionError::InvalidSexRatio { period, value }.into());
        }
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ProjectionError::InvalidInterval { value: interval }.into());
        }

        if priors.log_basepop.len() != n_ages {
            return Err(ModelError::PriorMeanLengthMismatch {
                name: "log_basepop",
                expected: n_ages,
                actual: priors.log_basepop.len(),
            });
        }
        check_finite("log_basepop", priors.log_basepop.iter().copied())?;
        check_matrix("logit_sx", &priors.logit_sx, (shape.n_sx(), n_periods))?;
        check_matrix("log_fx", &priors.log_fx, (n_fx, n_periods))?;
        check_matrix("gx", &priors.gx, (n_ages, n_periods))?;

        if census.log_pop.ncols() != census.period_idx.len() {
            return Err(ModelError::CensusIndexCountMismatch {
                columns: census.log_pop.ncols(),
                indices: census.period_idx.len(),
            });
        }
        check_matrix("census_log_pop", &census.log_pop, (n_ages, census.n_census()))?;
        if let Some((index, &period)) =
            census.period_idx.iter().enumerate().find(|(_, p)| **p > n_periods)
        {
            return Err(ModelError::CensusPeriodOutOfRange { index, period, n_periods });
        }

        if let Some(vital) = &vital {
            check_matrix("deaths", &vital.deaths, (n_ages, n_periods))?;
            check_counts("deaths", &vital.deaths)?;
            check_matrix("births", &vital.births, (n_fx, n_periods))?;
            check_counts("births", &vital.births)?;
        }

        Ok(ModelData { shape, interval, srb, priors, census, vital })
    }

    pub fn shape(&self) -> ProjectionShape {
        self.shape
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn srb(&self) -> &Array1<f64> {
        &self.srb
    }

    pub fn priors(&self) -> &PriorMeans {
        &self.priors
    }

    pub fn census(&self) -> &CensusData {
        &self.census
    }

    pub fn vital(&self) -> Option<&VitalRegistration> {
        self.vital.as_ref()
    }
}

fn check_finite<I: Iterator<Item = f64>>(name: &'static str, values: I) -> ModelResult<()> {
    for (index, value) in values.enumerate() {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteData { name, index, value });
        }
    }
    Ok(())
}

/// Shape check followed by a column-major finiteness scan.
fn check_matrix<S: Data<Elem = f64>>(
    name: &'static str, m: &ArrayBase<S, Ix2>, expected: (usize, usize),
) -> ModelResult<()> {
    if m.dim() != expected {
        return Err(ModelError::DataShapeMismatch { name, expected, actual: m.dim() });
    }
    check_finite(name, m.t().iter().copied())
}

fn check_counts(name: &'static str, m: &Array2<f64>) -> ModelResult<()> {
    let col_major = m.t().iter().copied().enumerate().find(|(_, v)| *v < 0.0);
    match col_major {
        Some((index, value)) => Err(ModelError::NegativeCount { name, index, value }),
        None => Ok(()),
    }
}
