//! Projection stepper: advance one population column by one period.
//!
//! Two formulations share the same [`AgeSchedule`]:
//! - [`project_step`]: the arithmetic recursion with half-step migration,
//!   half-exposure deaths and births averaged over the start and end of the
//!   step. Writes the full per-period detail.
//! - [`project_step_leslie`]: `L * (p + m/2) + m/2` using the operator from
//!   [`make_leslie_matrix`](crate::projection::core::leslie::make_leslie_matrix).
//!
//! The two agree to floating tolerance under the conditions documented in
//! [`leslie`](crate::projection::core::leslie).
use crate::projection::core::{leslie::leslie_for, schedule::AgeSchedule};
use ndarray::{Array1, ArrayView1, ArrayViewMut1, Zip};

/// Mutable destinations for one step of the recursion.
///
/// Fields
/// ------
/// - `population`: next-period population, length `n_ages`.
/// - `cohort_deaths`: length `n_ages + 1`; entry `a` counts deaths among
///   those aging into group `a`, the last entry deaths among open age
///   survivors.
/// - `births`: births by fertile age, length `n_fx`.
/// - `migrations`: net migrants by age, length `n_ages`.
#[derive(Debug)]
pub struct StepOutput<'a> {
    pub population: ArrayViewMut1<'a, f64>,
    pub cohort_deaths: ArrayViewMut1<'a, f64>,
    pub births: ArrayViewMut1<'a, f64>,
    pub migrations: ArrayViewMut1<'a, f64>,
}

/// Advance `population_t` by one period and return the period's infants.
///
/// Order of operations:
/// 1. Half of the period's migrants join the population.
/// 2. Deaths among existing cohorts at first-half exposure.
/// 3. First half of births from the start-of-step fertile population.
/// 4. Cohorts age by one group; the open age group keeps its own survivors.
/// 5. Second half of births from the aged fertile population.
/// 6. Infants of the tracked sex, their deaths, and their survivors.
/// 7. The other half of the migrants join.
///
/// Panics
/// ------
/// - If any output or input length disagrees with the schedule.
pub fn project_step(
    population_t: ArrayView1<f64>, schedule: &AgeSchedule<'_>, out: StepOutput<'_>,
) -> f64 {
    let n_ages = schedule.n_ages();
    let n_fx = schedule.fx.len();
    let fx_idx = schedule.fx_idx;
    let StepOutput { mut population, mut cohort_deaths, mut births, mut migrations } = out;
    assert_eq!(population_t.len(), n_ages, "population length mismatch");
    assert_eq!(population.len(), n_ages, "output population length mismatch");
    assert_eq!(cohort_deaths.len(), n_ages + 1, "cohort deaths length mismatch");
    assert_eq!(births.len(), n_fx, "births length mismatch");
    assert_eq!(migrations.len(), n_ages, "migrations length mismatch");
    assert!(fx_idx >= 1 && fx_idx + n_fx <= n_ages, "fertile range out of bounds");

    population.assign(&population_t);

    Zip::from(&mut migrations)
        .and(&population)
        .and(&schedule.gx)
        .for_each(|m, &p, &g| *m = p * g);
    population.scaled_add(0.5, &migrations);

    for age in 0..n_ages {
        cohort_deaths[age + 1] = population[age] * (1.0 - schedule.sx[age + 1]);
    }

    let half_interval = 0.5 * schedule.interval;
    for (i, age) in schedule.fertile_ages().enumerate() {
        births[i] = half_interval * schedule.fx[i] * population[age];
    }

    let open_age_survivors = population[n_ages - 1] - cohort_deaths[n_ages];
    for age in (1..n_ages).rev() {
        population[age] = population[age - 1] - cohort_deaths[age];
    }
    population[n_ages - 1] += open_age_survivors;

    for (i, age) in schedule.fertile_ages().enumerate() {
        births[i] += half_interval * schedule.fx[i] * population[age];
    }

    let infants = births.sum() / (1.0 + schedule.srb);
    cohort_deaths[0] = infants * (1.0 - schedule.sx[0]);
    population[0] = infants - cohort_deaths[0];

    population.scaled_add(0.5, &migrations);
    infants
}

/// Advance `population_t` by one period using the transition operator only.
///
/// Panics
/// ------
/// - If `population_t.len()` disagrees with the schedule.
pub fn project_step_leslie(population_t: ArrayView1<f64>, schedule: &AgeSchedule<'_>) -> Array1<f64> {
    assert_eq!(population_t.len(), schedule.n_ages(), "population length mismatch");
    let half_migrants = &population_t * &schedule.gx * 0.5;
    let leslie = leslie_for(schedule);
    leslie.apply((&population_t + &half_migrants).view()) + &half_migrants
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    struct Buffers {
        population: Array1<f64>,
        cohort_deaths: Array1<f64>,
        births: Array1<f64>,
        migrations: Array1<f64>,
    }

    impl Buffers {
        fn new(n_ages: usize, n_fx: usize) -> Self {
            Buffers {
                population: Array1::zeros(n_ages),
                cohort_deaths: Array1::zeros(n_ages + 1),
                births: Array1::zeros(n_fx),
                migrations: Array1::zeros(n_ages),
            }
        }

        fn output(&mut self) -> StepOutput<'_> {
            StepOutput {
                population: self.population.view_mut(),
                cohort_deaths: self.cohort_deaths.view_mut(),
                births: self.births.view_mut(),
                migrations: self.migrations.view_mut(),
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Reproduce the hand-worked three-age single step.
    //
    // Given
    // -----
    // - `basepop = [100, 80, 50]`, `sx = [0.95, 0.9, 0.85, 0.0]`,
    //   `fx = [0.4]` at `fx_idx = 1`, `srb = 1.05`, `interval = 1`, no
    //   migration.
    //
    // Expect
    // ------
    // - deaths = `[34/2.05 * 0.05, 10, 12, 50]`, births = `[34]`.
    // - population = `[34/2.05 * 0.95, 90, 68]`.
    fn single_step_matches_hand_computation() {
        // Arrange
        let basepop = array![100.0, 80.0, 50.0];
        let sx = array![0.95, 0.9, 0.85, 0.0];
        let fx = array![0.4];
        let gx = array![0.0, 0.0, 0.0];
        let schedule = AgeSchedule {
            sx: sx.view(),
            fx: fx.view(),
            gx: gx.view(),
            srb: 1.05,
            interval: 1.0,
            fx_idx: 1,
        };
        let mut buf = Buffers::new(3, 1);

        // Act
        let infants = project_step(basepop.view(), &schedule, buf.output());

        // Assert
        let expected_infants = 34.0 / 2.05;
        assert_relative_eq!(infants, expected_infants, max_relative = 1e-14);
        assert_relative_eq!(buf.births[0], 34.0, max_relative = 1e-14);
        assert_relative_eq!(buf.cohort_deaths[0], expected_infants * 0.05, max_relative = 1e-12);
        assert_relative_eq!(buf.cohort_deaths[1], 10.0, max_relative = 1e-14);
        assert_relative_eq!(buf.cohort_deaths[2], 12.0, max_relative = 1e-14);
        assert_relative_eq!(buf.cohort_deaths[3], 50.0, max_relative = 1e-14);
        assert_relative_eq!(buf.population[0], expected_infants * 0.95, max_relative = 1e-12);
        assert_relative_eq!(buf.population[1], 90.0, max_relative = 1e-14);
        assert_relative_eq!(buf.population[2], 68.0, max_relative = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Check the births identities of the recursion with migration switched on.
    //
    // Given
    // -----
    // - Five ages, two fertile ages, non-zero migration.
    //
    // Expect
    // ------
    // - `infants == sum(births) / (1 + srb)` exactly.
    // - `deaths[0] == infants * (1 - sx[0])` exactly.
    // - `migrations == population_t ⊙ gx`.
    fn births_identities_hold_exactly() {
        // Arrange
        let pop = array![200.0, 180.0, 150.0, 120.0, 60.0];
        let sx = array![0.97, 0.99, 0.98, 0.96, 0.9, 0.7];
        let fx = array![0.35, 0.2];
        let gx = array![0.01, -0.02, 0.03, 0.0, -0.01];
        let schedule = AgeSchedule {
            sx: sx.view(),
            fx: fx.view(),
            gx: gx.view(),
            srb: 1.06,
            interval: 5.0,
            fx_idx: 2,
        };
        let mut buf = Buffers::new(5, 2);

        // Act
        let infants = project_step(pop.view(), &schedule, buf.output());

        // Assert
        assert_eq!(infants, buf.births.sum() / (1.0 + 1.06));
        assert_eq!(buf.cohort_deaths[0], infants * (1.0 - 0.97));
        for a in 0..5 {
            assert_eq!(buf.migrations[a], pop[a] * gx[a]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Operator and recursion agree for one step with migration.
    //
    // Given
    // -----
    // - Fertile range stopping short of the open age group, non-zero
    //   open-age survival and non-zero migration.
    //
    // Expect
    // ------
    // - Next-period populations agree to ~1e-12 relative tolerance.
    fn recursion_and_operator_agree() {
        // Arrange
        let pop = array![200.0, 180.0, 150.0, 120.0, 60.0];
        let sx = array![0.97, 0.99, 0.98, 0.96, 0.9, 0.7];
        let fx = array![0.35, 0.2];
        let gx = array![0.01, -0.02, 0.03, 0.0, -0.01];
        let schedule = AgeSchedule {
            sx: sx.view(),
            fx: fx.view(),
            gx: gx.view(),
            srb: 1.06,
            interval: 5.0,
            fx_idx: 1,
        };
        let mut buf = Buffers::new(5, 2);

        // Act
        project_step(pop.view(), &schedule, buf.output());
        let via_operator = project_step_leslie(pop.view(), &schedule);

        // Assert
        for (a, b) in buf.population.iter().zip(via_operator.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Pin where the two formulations part ways: a fertile open age group
    // with positive open-age survival.
    //
    // Given
    // -----
    // - Five ages, fertility at ages 2..=4 (open age included), no migration.
    // - Open-age survival `sx[5] = 0.6`, then the same schedule with 0.
    //
    // Expect
    // ------
    // - With `sx[5] = 0.6` the operator's infants fall short by exactly
    //   `fert_k * fx[2] * sx[5] * p[4]`; every other age group agrees.
    // - With `sx[5] = 0` the formulations agree.
    fn operator_omits_births_from_open_age_survivors() {
        // Arrange
        let pop = array![200.0, 180.0, 150.0, 120.0, 90.0];
        let fx = array![0.3, 0.25, 0.1];
        let gx = Array1::zeros(5);
        let with_open = array![0.97, 0.99, 0.98, 0.96, 0.9, 0.6];
        let closed_open = array![0.97, 0.99, 0.98, 0.96, 0.9, 0.0];

        for sx in [&with_open, &closed_open] {
            let schedule = AgeSchedule {
                sx: sx.view(),
                fx: fx.view(),
                gx: gx.view(),
                srb: 1.05,
                interval: 5.0,
                fx_idx: 2,
            };
            let mut buf = Buffers::new(5, 3);

            // Act
            project_step(pop.view(), &schedule, buf.output());
            let via_operator = project_step_leslie(pop.view(), &schedule);

            // Assert
            let gap = schedule.fert_k() * fx[2] * sx[5] * pop[4];
            assert_eq!(gap > 0.0, sx[5] > 0.0);
            assert_relative_eq!(
                buf.population[0] - via_operator[0],
                gap,
                epsilon = 1e-9,
                max_relative = 1e-10
            );
            for a in 1..5 {
                assert_relative_eq!(buf.population[a], via_operator[a], max_relative = 1e-12);
            }
        }
    }
}
