//! Schedule arrays: validated per-period demographic inputs.
//!
//! Purpose
//! -------
//! Hold the survival, fertility, migration, and sex-ratio-at-birth schedules
//! for every projection period in one place, validated once at construction so
//! the projection kernels can trust their dimensions.
//!
//! Key behaviors
//! -------------
//! - [`Schedules::new`] checks every matrix against a [`ProjectionShape`] and
//!   every entry against its domain.
//! - [`Schedules::period`] hands out a borrowed [`AgeSchedule`] for a single
//!   period, which is what the operator builder and the stepper consume.
//!
//! Invariants & assumptions
//! ------------------------
//! - `sx` is `(n_ages + 1) × n_periods`; the final row is the survival of the
//!   open age group into itself.
//! - `fx` is `n_fx × n_periods` and covers ages `fx_idx..fx_idx + n_fx`.
//! - `gx` is `n_ages × n_periods` (net migration as a proportion of the
//!   start-of-period population). Any finite value is allowed.
//! - `srb` has one strictly positive entry per period.
//! - `interval` is finite and strictly positive.
//!
//! Conventions
//! -----------
//! - Columns are periods, rows are ages.
//! - The `index` carried by domain errors is the column-major flat index
//!   `t * n_rows + row`, matching how the flat entry points lay out buffers.
use crate::projection::{
    core::shape::ProjectionShape,
    errors::{ProjectionError, ProjectionResult},
};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Borrowed view of the schedule for a single projection period.
///
/// Fields
/// ------
/// - `sx`: survival fractions, length `n_ages + 1`.
/// - `fx`: fertility rates for the fertile ages, length `n_fx`.
/// - `gx`: migration proportions, length `n_ages`.
/// - `srb`: sex ratio at birth.
/// - `interval`: projection step length in years.
/// - `fx_idx`: first fertile age group.
#[derive(Debug, Clone, Copy)]
pub struct AgeSchedule<'a> {
    pub sx: ArrayView1<'a, f64>,
    pub fx: ArrayView1<'a, f64>,
    pub gx: ArrayView1<'a, f64>,
    pub srb: f64,
    pub interval: f64,
    pub fx_idx: usize,
}

impl AgeSchedule<'_> {
    /// Number of age groups covered by this schedule.
    pub fn n_ages(&self) -> usize {
        self.gx.len()
    }

    /// Constant that turns person-years of fertile exposure into surviving
    /// infants of the tracked sex: `sx[0] * 0.5 * interval / (1 + srb)`.
    pub fn fert_k(&self) -> f64 {
        self.sx[0] * 0.5 * self.interval / (1.0 + self.srb)
    }

    /// Age indices that carry fertility, `fx_idx..fx_idx + fx.len()`.
    pub fn fertile_ages(&self) -> std::ops::Range<usize> {
        self.fx_idx..self.fx_idx + self.fx.len()
    }
}

/// `Schedules`: validated multi-period projection inputs.
///
/// Purpose
/// -------
/// Own the full set of schedules consumed by
/// [`ccmpp`](crate::projection::core::trajectory::ccmpp). Construction is the
/// only place where dimensions and domains are checked.
///
/// Fields
/// ------
/// - `shape`: [`ProjectionShape`] the schedules were validated against.
/// - `sx`: `(n_ages + 1) × n_periods` survival fractions in `[0, 1]`.
/// - `fx`: `n_fx × n_periods` non-negative fertility rates.
/// - `gx`: `n_ages × n_periods` migration proportions.
/// - `srb`: length `n_periods`, strictly positive.
/// - `interval`: projection step length, finite and strictly positive.
///
/// Notes
/// -----
/// - Fields are private so the invariants cannot be broken after
///   construction; use the accessors for read-only views.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedules {
    shape: ProjectionShape,
    sx: Array2<f64>,
    fx: Array2<f64>,
    gx: Array2<f64>,
    srb: Array1<f64>,
    interval: f64,
}

impl Schedules {
    /// Construct validated [`Schedules`].
    ///
    /// Errors
    /// ------
    /// - `ProjectionError::RowMismatch` / `ColumnMismatch` when a matrix or the
    ///   `srb` vector does not match `shape`.
    /// - `ProjectionError::NonFiniteInput` for NaN or ±∞ entries.
    /// - `ProjectionError::InvalidSurvival` for `sx` outside `[0, 1]`.
    /// - `ProjectionError::NegativeFertility` for `fx < 0`.
    /// - `ProjectionError::InvalidSexRatio` for `srb <= 0`.
    /// - `ProjectionError::InvalidInterval` for a non-finite or non-positive
    ///   `interval`.
    pub fn new(
        shape: ProjectionShape, sx: Array2<f64>, fx: Array2<f64>, gx: Array2<f64>,
        srb: Array1<f64>, interval: f64,
    ) -> ProjectionResult<Self> {
        let n_periods = shape.n_periods;
        check_dims("sx", &sx, shape.n_sx(), n_periods)?;
        check_dims("fx", &fx, shape.n_fx, n_periods)?;
        check_dims("gx", &gx, shape.n_ages, n_periods)?;
        if srb.len() != n_periods {
            return Err(ProjectionError::RowMismatch {
                name: "srb",
                expected: n_periods,
                actual: srb.len(),
            });
        }
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ProjectionError::InvalidInterval { value: interval });
        }

        for_each_col_major(&sx, |index, value| {
            if !value.is_finite() {
                return Err(ProjectionError::NonFiniteInput { name: "sx", index, value });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ProjectionError::InvalidSurvival { index, value });
            }
            Ok(())
        })?;
        for_each_col_major(&fx, |index, value| {
            if !value.is_finite() {
                return Err(ProjectionError::NonFiniteInput { name: "fx", index, value });
            }
            if value < 0.0 {
                return Err(ProjectionError::NegativeFertility { index, value });
            }
            Ok(())
        })?;
        for_each_col_major(&gx, |index, value| {
            if !value.is_finite() {
                return Err(ProjectionError::NonFiniteInput { name: "gx", index, value });
            }
            Ok(())
        })?;
        for (period, &value) in srb.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProjectionError::InvalidSexRatio { period, value });
            }
        }

        Ok(Schedules { shape, sx, fx, gx, srb, interval })
    }

    /// Schedules with zero migration in every period.
    pub fn without_migration(
        shape: ProjectionShape, sx: Array2<f64>, fx: Array2<f64>, srb: Array1<f64>,
        interval: f64,
    ) -> ProjectionResult<Self> {
        let gx = Array2::zeros((shape.n_ages, shape.n_periods));
        Self::new(shape, sx, fx, gx, srb, interval)
    }

    /// Borrow the schedule for period `t`.
    ///
    /// Panics
    /// ------
    /// - If `t >= n_periods`.
    pub fn period(&self, t: usize) -> AgeSchedule<'_> {
        assert!(
            t < self.shape.n_periods,
            "period {t} out of range for {} periods",
            self.shape.n_periods
        );
        AgeSchedule {
            sx: self.sx.column(t),
            fx: self.fx.column(t),
            gx: self.gx.column(t),
            srb: self.srb[t],
            interval: self.interval,
            fx_idx: self.shape.fx_idx,
        }
    }

    pub fn shape(&self) -> ProjectionShape {
        self.shape
    }

    pub fn sx(&self) -> &Array2<f64> {
        &self.sx
    }

    pub fn fx(&self) -> &Array2<f64> {
        &self.fx
    }

    pub fn gx(&self) -> &Array2<f64> {
        &self.gx
    }

    pub fn srb(&self) -> &Array1<f64> {
        &self.srb
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }
}

fn check_dims(
    name: &'static str, m: &Array2<f64>, rows: usize, cols: usize,
) -> ProjectionResult<()> {
    if m.nrows() != rows {
        return Err(ProjectionError::RowMismatch { name, expected: rows, actual: m.nrows() });
    }
    if m.ncols() != cols {
        return Err(ProjectionError::ColumnMismatch { name, expected: cols, actual: m.ncols() });
    }
    Ok(())
}

/// Visit entries column by column, passing the column-major flat index.
fn for_each_col_major<F>(m: &Array2<f64>, mut check: F) -> ProjectionResult<()>
where
    F: FnMut(usize, f64) -> ProjectionResult<()>,
{
    let n_rows = m.nrows();
    for (t, col) in m.axis_iter(Axis(1)).enumerate() {
        for (row, &value) in col.iter().enumerate() {
            check(t * n_rows + row, value)?;
        }
    }
    Ok(())
}
