//! Transition operator builder: Leslie-style age-transition matrix for one
//! period, stored as a `nalgebra-sparse` CSC matrix.
//!
//! Purpose
//! -------
//! Encode one period of cohort aging plus births as a sparse `n_ages × n_ages`
//! matrix so that `L * (p + m/2) + m/2` reproduces the arithmetic recursion in
//! [`project_step`](crate::projection::core::stepper::project_step), where `p`
//! is the start-of-period population and `m` the period's migrants.
//!
//! Layout
//! ------
//! With `fert_k = sx[0] * 0.5 * interval / (1 + srb)`:
//! - Row 0, column `fx_idx - 1 + i` for `i = 0..=n_fx` holds
//!   `fert_k * (fx[i] * sx[fx_idx + i] + fx[i - 1])`, omitting the term whose
//!   index falls outside `0..n_fx`. The first term counts births from women
//!   who age into a fertile group during the step, the second births from
//!   women already in it.
//! - Row `i` for `1 <= i < n_ages` holds `sx[i]` at column `i - 1`.
//! - Entry `(n_ages - 1, n_ages - 1)` holds `sx[n_ages]`, the open age group's
//!   own survivors.
//!
//! Every column therefore carries at most two stored entries.
//!
//! Conventions
//! -----------
//! - Entries are pushed as COO triplets and compressed once; every
//!   structural entry is stored, including zeros, so `nnz` depends only on
//!   `n_ages` and `n_fx`.
//! - Dimension mismatches are programmer errors and trip an `assert!`.
//! - The operator carries no births from open age survivors. It agrees with
//!   the recursion whenever the fertile range stops short of the open age
//!   group or `sx[n_ages] == 0`.
use crate::projection::core::schedule::AgeSchedule;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CscMatrix};
use ndarray::{Array1, Array2, ArrayView1};

/// Sparse age-transition operator for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOperator {
    matrix: CscMatrix<f64>,
}

impl TransitionOperator {
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// Underlying compressed sparse column matrix.
    pub fn matrix(&self) -> &CscMatrix<f64> {
        &self.matrix
    }

    /// Value at `(row, col)`, `0.0` for structurally empty entries.
    ///
    /// Panics
    /// ------
    /// - If the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.dim() && col < self.dim(), "index ({row}, {col}) out of bounds");
        self.matrix.get_entry(row, col).map_or(0.0, |entry| entry.into_value())
    }

    /// Stored entries as `(row, col, value)` in column order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.matrix.triplet_iter().map(|(row, col, &value)| (row, col, value))
    }

    /// Sparse matrix–vector product `L * x`.
    ///
    /// Panics
    /// ------
    /// - If `x.len() != dim`.
    pub fn apply(&self, x: ArrayView1<f64>) -> Array1<f64> {
        assert_eq!(x.len(), self.dim(), "operator dimension mismatch");
        let x = DVector::from_iterator(x.len(), x.iter().copied());
        let y = &self.matrix * &x;
        y.iter().copied().collect()
    }

    /// Materialise the operator as a dense matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        let dense = DMatrix::from(&self.matrix);
        Array2::from_shape_fn(dense.shape(), |(i, j)| dense[(i, j)])
    }
}

/// Build the transition operator for one period from raw schedule vectors.
///
/// Parameters
/// ----------
/// - `sx`: survival fractions, length `n_ages + 1`.
/// - `fx`: fertility rates for ages `fx_idx..fx_idx + fx.len()`.
/// - `srb`: sex ratio at birth.
/// - `interval`: projection step length.
/// - `fx_idx`: first fertile age group (0-based, `>= 1`).
///
/// Panics
/// ------
/// - If `sx.len() < 3`, `fx` is empty, `fx_idx == 0`, or the fertile range
///   runs past the last age group.
pub fn make_leslie_matrix(
    sx: ArrayView1<f64>, fx: ArrayView1<f64>, srb: f64, interval: f64, fx_idx: usize,
) -> TransitionOperator {
    let no_migration = Array1::zeros(sx.len().saturating_sub(1));
    leslie_for(&AgeSchedule { sx: sx.view(), fx: fx.view(), gx: no_migration.view(), srb, interval, fx_idx })
}

/// Build the transition operator from a period's schedule.
///
/// Panics
/// ------
/// - Under the same conditions as [`make_leslie_matrix`], or if
///   `sx.len() != n_ages + 1`.
pub fn leslie_for(schedule: &AgeSchedule<'_>) -> TransitionOperator {
    let dim = schedule.n_ages();
    let n_fx = schedule.fx.len();
    let fx_idx = schedule.fx_idx;
    assert!(dim >= 2, "need at least two age groups, got {dim}");
    assert_eq!(schedule.sx.len(), dim + 1, "survival length mismatch");
    assert!(n_fx >= 1, "fertility schedule is empty");
    assert!(fx_idx >= 1, "youngest age group cannot be fertile");
    assert!(fx_idx + n_fx <= dim, "fertile ages {fx_idx}..{} exceed {dim}", fx_idx + n_fx);

    let (sx, fx) = (&schedule.sx, &schedule.fx);
    let mut fert_row = vec![0.0; n_fx + 1];
    for (i, age) in schedule.fertile_ages().enumerate() {
        fert_row[i] += fx[i] * sx[age];
        fert_row[i + 1] += fx[i];
    }

    let mut coo = CooMatrix::new(dim, dim);
    let fert_k = schedule.fert_k();
    for (k, &weight) in fert_row.iter().enumerate() {
        coo.push(0, fx_idx - 1 + k, fert_k * weight);
    }
    for age in 1..dim {
        coo.push(age, age - 1, sx[age]);
    }
    coo.push(dim - 1, dim - 1, sx[dim]);

    TransitionOperator { matrix: CscMatrix::from(&coo) }
}
