//! Diagnostic bundle returned by an evaluation when a report is requested.
use ndarray::{Array1, Array2};

/// Reconstructed schedules and trajectory at one θ.
///
/// Under [`EvalMode::LeslieOnly`](crate::model::options::EvalMode::LeslieOnly)
/// the projection fields are empty (zero columns) and `leslie_population`
/// holds `operator * basepop` for period 0. Under the full projection mode
/// `leslie_population` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    /// `n_ages × (n_periods + 1)`.
    pub population: Array2<f64>,
    /// `(n_ages + 1) × n_periods`.
    pub cohort_deaths: Array2<f64>,
    /// `n_ages × n_periods`.
    pub period_deaths: Array2<f64>,
    /// `n_fx × n_periods`.
    pub births: Array2<f64>,
    /// `n_periods`.
    pub infants: Array1<f64>,
    /// `n_ages × n_periods`.
    pub migrations: Array2<f64>,
    pub basepop: Array1<f64>,
    pub sx: Array2<f64>,
    pub fx: Array2<f64>,
    pub gx: Array2<f64>,
    pub leslie_population: Option<Array1<f64>>,
}
