//! Flat-buffer entry points for binding layers.
//!
//! Binding layers usually hold schedules as contiguous column-major buffers.
//! These functions reshape them, validate them through [`Schedules::new`],
//! and return plain owned outputs. Dimensions are inferred:
//! `n_ages = basepop.len()` (or `sx.len() - 1` for the operator),
//! `n_periods = srb.len()`, and `n_fx = fx.len() / n_periods`.
use crate::projection::{
    core::{ProjectionShape, Schedules, ccmpp, leslie_for},
    errors::{ProjectionError, ProjectionResult},
};
use ndarray::{Array1, Array2, ArrayView1, ShapeBuilder};

/// Named outputs of [`ccmpp_flat`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatProjection {
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
}

/// Coordinate form of a transition operator, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorTriplets {
    pub dim: usize,
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<f64>,
}

/// Reshape a column-major buffer into a `rows × cols` matrix.
///
/// Errors
/// ------
/// - `ProjectionError::FlatLengthMismatch` if `data.len() != rows * cols`.
pub fn reshape_col_major(
    name: &'static str, data: &[f64], rows: usize, cols: usize,
) -> ProjectionResult<Array2<f64>> {
    let expected = rows * cols;
    if data.len() != expected {
        return Err(ProjectionError::FlatLengthMismatch { name, expected, actual: data.len() });
    }
    Array2::from_shape_vec((rows, cols).f(), data.to_vec())
        .map_err(|_| ProjectionError::FlatLengthMismatch { name, expected, actual: data.len() })
}

fn infer_n_fx(fx_len: usize, n_periods: usize) -> ProjectionResult<usize> {
    if n_periods == 0 {
        return Err(ProjectionError::InvalidShape {
            param: "n_periods",
            value: 0,
            reason: "At least one projection period is required.",
        });
    }
    if fx_len % n_periods != 0 {
        return Err(ProjectionError::FlatLengthMismatch {
            name: "fx",
            expected: (fx_len / n_periods).max(1) * n_periods,
            actual: fx_len,
        });
    }
    Ok(fx_len / n_periods)
}

/// Run a full projection from column-major buffers.
///
/// Parameters
/// ----------
/// - `basepop`: length `n_ages`.
/// - `sx`: `(n_ages + 1) × n_periods`, column-major.
/// - `fx`: `n_fx × n_periods`, column-major.
/// - `gx`: `n_ages × n_periods`, column-major.
/// - `srb`: length `n_periods`.
/// - `interval`: projection step length.
/// - `fx_idx`: first fertile age group (0-based).
///
/// Errors
/// ------
/// - Any [`ProjectionError`] raised while reshaping or validating.
pub fn ccmpp_flat(
    basepop: &[f64], sx: &[f64], fx: &[f64], gx: &[f64], srb: &[f64], interval: f64,
    fx_idx: usize,
) -> ProjectionResult<FlatProjection> {
    let n_ages = basepop.len();
    let n_periods = srb.len();
    let n_fx = infer_n_fx(fx.len(), n_periods)?;
    let shape = ProjectionShape::new(n_ages, n_periods, n_fx, fx_idx)?;

    let schedules = Schedules::new(
        shape,
        reshape_col_major("sx", sx, n_ages + 1, n_periods)?,
        reshape_col_major("fx", fx, n_fx, n_periods)?,
        reshape_col_major("gx", gx, n_ages, n_periods)?,
        Array1::from(srb.to_vec()),
        interval,
    )?;
    let proj = ccmpp(ArrayView1::from(basepop), &schedules)?;

    Ok(FlatProjection {
        period_deaths: proj.period_deaths(),
        population: proj.population().clone(),
        cohort_deaths: proj.cohort_deaths().clone(),
        births: proj.births().clone(),
        infants: proj.infants().clone(),
        migrations: proj.migrations().clone(),
    })
}

/// Build the transition operator for a single period from flat buffers.
///
/// Errors
/// ------
/// - `ProjectionError::InvalidShape` / `FertileRangeOutOfBounds` for an
///   inconsistent `sx` / `fx` / `fx_idx` combination.
/// - Domain errors from [`Schedules::new`].
pub fn leslie_flat(
    sx: &[f64], fx: &[f64], srb: f64, interval: f64, fx_idx: usize,
) -> ProjectionResult<OperatorTriplets> {
    let n_ages = sx.len().saturating_sub(1);
    let shape = ProjectionShape::new(n_ages, 1, fx.len(), fx_idx)?;
    let schedules = Schedules::without_migration(
        shape,
        reshape_col_major("sx", sx, n_ages + 1, 1)?,
        reshape_col_major("fx", fx, fx.len(), 1)?,
        Array1::from(vec![srb]),
        interval,
    )?;
    let op = leslie_for(&schedules.period(0));

    let mut triplets =
        OperatorTriplets { dim: op.dim(), rows: Vec::new(), cols: Vec::new(), values: Vec::new() };
    for (row, col, value) in op.triplets() {
        triplets.rows.push(row);
        triplets.cols.push(col);
        triplets.values.push(value);
    }
    Ok(triplets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // The flat projection reproduces the worked example and infers its
    // dimensions from buffer lengths.
    //
    // Given
    // -----
    // - Three ages, one period, `fx = [0.4]` at `fx_idx = 1`.
    //
    // Expect
    // ------
    // - Population column 1 `[34/2.05 * 0.95, 90, 68]`, period deaths with
    //   total equal to the cohort deaths total.
    fn ccmpp_flat_worked_example() {
        // Act
        let out = ccmpp_flat(
            &[100.0, 80.0, 50.0],
            &[0.95, 0.9, 0.85, 0.0],
            &[0.4],
            &[0.0, 0.0, 0.0],
            &[1.05],
            1.0,
            1,
        )
        .expect("valid inputs");

        // Assert
        assert_eq!(out.population.dim(), (3, 2));
        assert_relative_eq!(out.population[(0, 1)], 34.0 / 2.05 * 0.95, max_relative = 1e-12);
        assert_relative_eq!(out.population[(2, 1)], 68.0, max_relative = 1e-14);
        assert_relative_eq!(out.period_deaths.sum(), out.cohort_deaths.sum(), max_relative = 1e-12);
        assert_eq!(out.infants.len(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Column-major reshape places consecutive entries down a column.
    //
    // Expect
    // ------
    // - `[1, 2, 3, 4, 5, 6]` as 3 × 2 gives columns `[1, 2, 3]` and `[4, 5, 6]`.
    // - A wrong length is reported as `FlatLengthMismatch`.
    fn reshape_is_column_major() {
        let m = reshape_col_major("x", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).expect("reshape");
        assert_eq!(m.column(1).to_vec(), vec![4.0, 5.0, 6.0]);
        assert_eq!(m[(2, 0)], 3.0);

        let err = reshape_col_major("x", &[1.0, 2.0], 3, 1).unwrap_err();
        assert_eq!(err, ProjectionError::FlatLengthMismatch { name: "x", expected: 3, actual: 2 });
    }

    #[test]
    // Purpose
    // -------
    // Operator triplets come out in column order with at most two entries
    // per column.
    //
    // Given
    // -----
    // - Worked-example schedule.
    //
    // Expect
    // ------
    // - `dim = 3`, five stored entries, first entry `(0, 0)`.
    fn leslie_flat_returns_column_ordered_triplets() {
        // Act
        let t = leslie_flat(&[0.95, 0.9, 0.85, 0.0], &[0.4], 1.05, 1.0, 1).expect("valid inputs");

        // Assert
        assert_eq!(t.dim, 3);
        assert_eq!(t.values.len(), 5);
        assert_eq!((t.rows[0], t.cols[0]), (0, 0));
        assert!(t.cols.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    // Purpose
    // -------
    // Invalid fertile start and ragged fertility buffers are reported, not
    // panicked on.
    fn flat_entry_points_report_invalid_layouts() {
        assert!(matches!(
            leslie_flat(&[0.95, 0.9, 0.85, 0.0], &[0.4], 1.05, 1.0, 0),
            Err(ProjectionError::InvalidShape { param: "fx_idx", .. })
        ));
        assert!(matches!(
            ccmpp_flat(&[1.0, 1.0, 1.0], &[0.9; 8], &[0.1, 0.2, 0.3], &[0.0; 6], &[1.05, 1.05], 1.0, 1),
            Err(ProjectionError::FlatLengthMismatch { name: "fx", .. })
        ));
    }
}
