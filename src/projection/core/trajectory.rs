//! Projection trajectory: full multi-period cohort-component projection.
//!
//! Purpose
//! -------
//! Run the stepper over every period in order and own the resulting history:
//! population, cohort deaths, births, infants, and migrations. Period deaths
//! are derived on demand from the cohort deaths.
//!
//! Key behaviors
//! -------------
//! - [`ccmpp`] seeds column 0 with the base population and fills columns
//!   `1..=n_periods` strictly in period order; each column is written once.
//! - [`PopulationProjection::period_deaths`] averages the two half-step death
//!   components of each age group.
//! - [`ccmpp_leslie`] projects every period with the transition operator only
//!   and returns the population matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated by [`Schedules::new`] and the base population
//!   length/finiteness check in [`ccmpp`]. After that the recursion runs
//!   unchecked; negative or NaN populations produced by extreme schedules
//!   propagate into the outputs.
//!
//! Conventions
//! -----------
//! - `population` is `n_ages × (n_periods + 1)`, column 0 = base population.
//! - `cohort_deaths` is `(n_ages + 1) × n_periods`.
//! - `births` is `n_fx × n_periods`, `migrations` is `n_ages × n_periods`,
//!   `infants` has length `n_periods`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the worked three-age example, the death totals identity,
//!   and agreement between [`ccmpp`] and [`ccmpp_leslie`] over many periods.
//! - Trajectory-length idempotence is covered by the integration tests.
use crate::projection::{
    core::{
        schedule::Schedules,
        shape::ProjectionShape,
        stepper::{StepOutput, project_step, project_step_leslie},
    },
    errors::{ProjectionError, ProjectionResult},
};
use ndarray::{Array1, Array2, ArrayView1, Axis, s};

/// `PopulationProjection`: history of one projection run.
///
/// Fields
/// ------
/// - `shape`: dimensions of the run.
/// - `population`: `n_ages × (n_periods + 1)`.
/// - `cohort_deaths`: `(n_ages + 1) × n_periods`. Row `a` counts deaths among
///   those aging into group `a`; the last row counts deaths among open age
///   survivors.
/// - `births`: `n_fx × n_periods`, births by mother's age group.
/// - `infants`: length `n_periods`, births of the tracked sex.
/// - `migrations`: `n_ages × n_periods`, net migrants.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationProjection {
    shape: ProjectionShape,
    population: Array2<f64>,
    cohort_deaths: Array2<f64>,
    births: Array2<f64>,
    infants: Array1<f64>,
    migrations: Array2<f64>,
}

impl PopulationProjection {
    fn allocate(shape: ProjectionShape, basepop: ArrayView1<f64>) -> Self {
        let ProjectionShape { n_ages, n_periods, n_fx, .. } = shape;
        let mut population = Array2::zeros((n_ages, n_periods + 1));
        population.column_mut(0).assign(&basepop);
        PopulationProjection {
            shape,
            population,
            cohort_deaths: Array2::zeros((n_ages + 1, n_periods)),
            births: Array2::zeros((n_fx, n_periods)),
            infants: Array1::zeros(n_periods),
            migrations: Array2::zeros((n_ages, n_periods)),
        }
    }

    /// Project period `t` into column `t + 1`.
    fn step(&mut self, t: usize, schedules: &Schedules) {
        let schedule = schedules.period(t);
        let (done, mut ahead) = self.population.view_mut().split_at(Axis(1), t + 1);
        let out = StepOutput {
            population: ahead.column_mut(0),
            cohort_deaths: self.cohort_deaths.column_mut(t),
            births: self.births.column_mut(t),
            migrations: self.migrations.column_mut(t),
        };
        self.infants[t] = project_step(done.column(t), &schedule, out);
    }

    pub fn shape(&self) -> ProjectionShape {
        self.shape
    }

    pub fn population(&self) -> &Array2<f64> {
        &self.population
    }

    pub fn cohort_deaths(&self) -> &Array2<f64> {
        &self.cohort_deaths
    }

    pub fn births(&self) -> &Array2<f64> {
        &self.births
    }

    pub fn infants(&self) -> &Array1<f64> {
        &self.infants
    }

    pub fn migrations(&self) -> &Array2<f64> {
        &self.migrations
    }

    /// Population column at `period` (0 = base population).
    ///
    /// Errors
    /// ------
    /// - `ProjectionError::PeriodOutOfRange` if `period > n_periods`.
    pub fn population_at(&self, period: usize) -> ProjectionResult<ArrayView1<'_, f64>> {
        if period > self.shape.n_periods {
            return Err(ProjectionError::PeriodOutOfRange {
                period,
                n_periods: self.shape.n_periods,
            });
        }
        Ok(self.population.column(period))
    }

    /// Deaths attributed to each age group within a period.
    ///
    /// Each age group receives half of the deaths of those aging into it and
    /// half of the deaths of those aging out of it. The youngest group also
    /// keeps the other half of infant deaths, and the open age group the other
    /// half of deaths among its own survivors, so column sums equal those of
    /// [`cohort_deaths`](Self::cohort_deaths).
    pub fn period_deaths(&self) -> Array2<f64> {
        let n_ages = self.shape.n_ages;
        let mut period_deaths = &self.cohort_deaths.slice(s![..n_ages, ..]) * 0.5;
        period_deaths.scaled_add(0.5, &self.cohort_deaths.slice(s![1.., ..]));
        period_deaths.row_mut(0).scaled_add(0.5, &self.cohort_deaths.row(0));
        period_deaths.row_mut(n_ages - 1).scaled_add(0.5, &self.cohort_deaths.row(n_ages));
        period_deaths
    }
}

fn check_basepop(basepop: ArrayView1<f64>, n_ages: usize) -> ProjectionResult<()> {
    if basepop.len() != n_ages {
        return Err(ProjectionError::RowMismatch {
            name: "basepop",
            expected: n_ages,
            actual: basepop.len(),
        });
    }
    if let Some((index, &value)) = basepop.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ProjectionError::NonFiniteInput { name: "basepop", index, value });
    }
    Ok(())
}

/// Run a cohort-component projection over every period of `schedules`.
///
/// Errors
/// ------
/// - `ProjectionError::RowMismatch` if `basepop.len() != n_ages`.
/// - `ProjectionError::NonFiniteInput` if the base population has a NaN or
///   infinite entry.
pub fn ccmpp(
    basepop: ArrayView1<f64>, schedules: &Schedules,
) -> ProjectionResult<PopulationProjection> {
    let shape = schedules.shape();
    check_basepop(basepop, shape.n_ages)?;

    let mut proj = PopulationProjection::allocate(shape, basepop);
    for t in 0..shape.n_periods {
        proj.step(t, schedules);
    }
    Ok(proj)
}

/// Project every period with the transition operator and return the
/// `n_ages × (n_periods + 1)` population matrix.
///
/// Errors
/// ------
/// - Same as [`ccmpp`].
pub fn ccmpp_leslie(basepop: ArrayView1<f64>, schedules: &Schedules) -> ProjectionResult<Array2<f64>> {
    let shape = schedules.shape();
    check_basepop(basepop, shape.n_ages)?;

    let mut population = Array2::zeros((shape.n_ages, shape.n_periods + 1));
    population.column_mut(0).assign(&basepop);
    for t in 0..shape.n_periods {
        let next = project_step_leslie(population.column(t), &schedules.period(t));
        population.column_mut(t + 1).assign(&next);
    }
    Ok(population)
}
