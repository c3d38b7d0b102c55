//! Integration tests for projection and population reconstruction.
//!
//! Purpose
//! -------
//! - Check the projection kernels against each other and against identities
//!   that hold for any admissible input.
//! - Run the reconstruction objective and the optimizer end to end on a
//!   small, well-posed problem.
//!
//! Coverage
//! --------
//! - `projection::core`: recursion vs operator agreement across periods,
//!   population accounting, births identities, determinism and chaining of
//!   trajectories, and a single step worked out by hand.
//! - `model`: prior-only composition of the objective and a full fit with
//!   standard errors.
//!
//! Exclusions
//! ----------
//! - Validation branches and error variants of individual constructors;
//!   those are unit-tested next to each module.
use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::{Array1, Array2, array, s};
use popreconstruct::{
    model::{
        CensusData, HyperpriorRates, LatentParams, MigrationMode, ModelData, ModelOptions,
        ParamLayout, PopReconstruction, PriorMeans, VitalRegistration, densities::dlgamma,
        evaluate,
    },
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    projection::core::{ProjectionShape, Schedules, ccmpp, ccmpp_leslie, leslie_for},
};

/// Five age groups, three periods, fertility at ages 1..=3 (open age group
/// not fertile), with non-zero migration.
fn five_age_schedules() -> (Array1<f64>, Schedules) {
    let shape = ProjectionShape::new(5, 3, 3, 1).expect("valid shape");
    let sx = Array2::from_shape_fn((6, 3), |(a, t)| 0.97 - 0.04 * a as f64 - 0.01 * t as f64);
    let fx = array![[0.10, 0.12, 0.11], [0.35, 0.33, 0.30], [0.20, 0.18, 0.19]];
    let gx = Array2::from_shape_fn((5, 3), |(a, t)| 0.01 * (a as f64 - 2.0) + 0.005 * t as f64);
    let schedules =
        Schedules::new(shape, sx, fx, gx, array![1.05, 1.04, 1.06], 5.0).expect("valid schedules");
    (array![120.0, 110.0, 95.0, 80.0, 140.0], schedules)
}

/// Same shape as above without migration.
fn closed_schedules() -> (Array1<f64>, Schedules) {
    let (basepop, open) = five_age_schedules();
    let schedules = Schedules::without_migration(
        open.shape(),
        open.sx().clone(),
        open.fx().clone(),
        open.srb().clone(),
        open.interval(),
    )
    .expect("valid schedules");
    (basepop, schedules)
}

#[test]
// Purpose
// -------
// The arithmetic recursion and the operator formulation agree over every
// period, migration included.
//
// Given
// -----
// - Five ages, three periods, open age group outside the fertile range.
//
// Expect
// ------
// - Identical population matrices to floating tolerance.
fn recursion_and_operator_agree_across_periods() {
    // Arrange
    let (basepop, schedules) = five_age_schedules();

    // Act
    let recursion = ccmpp(basepop.view(), &schedules).expect("projection");
    let operator = ccmpp_leslie(basepop.view(), &schedules).expect("operator projection");

    // Assert
    assert_eq!(recursion.population().dim(), operator.dim());
    for (r, o) in recursion.population().iter().zip(operator.iter()) {
        assert_relative_eq!(r, o, max_relative = 1e-12);
    }
}

#[test]
// Purpose
// -------
// Population accounting closes every period.
//
// Given
// -----
// - The migrating five-age projection.
//
// Expect
// ------
// - `Σ p_{t+1} = Σ p_t + infants_t - Σ cohort_deaths_t + Σ migrations_t`.
// - Period and cohort deaths have equal column totals.
fn population_accounting_closes() {
    // Arrange
    let (basepop, schedules) = five_age_schedules();

    // Act
    let proj = ccmpp(basepop.view(), &schedules).expect("projection");
    let period_deaths = proj.period_deaths();

    // Assert
    for t in 0..schedules.shape().n_periods {
        let before = proj.population().column(t).sum();
        let after = proj.population().column(t + 1).sum();
        let flow = proj.infants()[t] - proj.cohort_deaths().column(t).sum()
            + proj.migrations().column(t).sum();
        assert_relative_eq!(after, before + flow, max_relative = 1e-12);
        assert_relative_eq!(
            period_deaths.column(t).sum(),
            proj.cohort_deaths().column(t).sum(),
            max_relative = 1e-12
        );
    }
}

#[test]
// Purpose
// -------
// Births average fertile exposure at both ends of the step.
//
// Given
// -----
// - The closed five-age projection (fertile ages start at 1, so the
//   end-of-step fertile population is the next population column).
//
// Expect
// ------
// - `births[i, t] = interval / 2 · fx[i, t] · (p[a, t] + p[a, t + 1])`,
//   `a = fx_idx + i`.
// - `infants_t = Σ births[·, t] / (1 + srb_t)`.
fn births_identities_hold() {
    // Arrange
    let (basepop, schedules) = closed_schedules();
    let shape = schedules.shape();

    // Act
    let proj = ccmpp(basepop.view(), &schedules).expect("projection");

    // Assert
    let pop = proj.population();
    for t in 0..shape.n_periods {
        for i in 0..shape.n_fx {
            let a = shape.fx_idx + i;
            let expected =
                0.5 * schedules.interval() * schedules.fx()[[i, t]] * (pop[[a, t]] + pop[[a, t + 1]]);
            assert_relative_eq!(proj.births()[[i, t]], expected, max_relative = 1e-12);
        }
        assert_relative_eq!(
            proj.infants()[t],
            proj.births().column(t).sum() / (1.0 + schedules.srb()[t]),
            max_relative = 1e-12
        );
    }
}

#[test]
// Purpose
// -------
// Shorter runs over a prefix of the horizon reproduce the full run.
//
// Given
// -----
// - A four-period migrating projection and, for every `k` in `1..=4`, the
//   `k`-period projection of the first `k` schedule columns from the same
//   base population.
//
// Expect
// ------
// - `population_at(k)` of the prefix run equals column `k` of the full run
//   bit for bit.
fn trajectory_prefix_matches_full_run() {
    // Arrange
    let (n_ages, n_periods, n_fx, fx_idx) = (5, 4, 3, 1);
    let sx = Array2::from_shape_fn((n_ages + 1, n_periods), |(a, t)| {
        0.96 - 0.05 * a as f64 + 0.005 * t as f64
    });
    let fx = Array2::from_shape_fn((n_fx, n_periods), |(i, t)| 0.1 + 0.12 * i as f64 - 0.01 * t as f64);
    let gx = Array2::from_shape_fn((n_ages, n_periods), |(a, t)| 0.02 * (2.0 - a as f64) - 0.004 * t as f64);
    let srb = array![1.05, 1.06, 1.04, 1.05];
    let basepop = array![150.0, 130.0, 120.0, 90.0, 160.0];
    let full_schedules = Schedules::new(
        ProjectionShape::new(n_ages, n_periods, n_fx, fx_idx).expect("valid shape"),
        sx.clone(),
        fx.clone(),
        gx.clone(),
        srb.clone(),
        5.0,
    )
    .expect("valid schedules");

    // Act
    let full = ccmpp(basepop.view(), &full_schedules).expect("projection");

    // Assert
    for k in 1..=n_periods {
        let prefix_schedules = Schedules::new(
            ProjectionShape::new(n_ages, k, n_fx, fx_idx).expect("valid shape"),
            sx.slice(s![.., ..k]).to_owned(),
            fx.slice(s![.., ..k]).to_owned(),
            gx.slice(s![.., ..k]).to_owned(),
            srb.slice(s![..k]).to_owned(),
            5.0,
        )
        .expect("valid prefix schedules");
        let prefix = ccmpp(basepop.view(), &prefix_schedules).expect("prefix projection");
        assert_eq!(
            prefix.population_at(k).expect("column in range"),
            full.population_at(k).expect("column in range"),
            "prefix of length {k} diverges"
        );
    }
}

#[test]
// Purpose
// -------
// Projection is deterministic and composes period by period.
//
// Given
// -----
// - The migrating projection, run twice, and a one-period projection of the
//   last period started from the second-to-last population column.
//
// Expect
// ------
// - Repeated runs are equal.
// - The chained step reproduces the final column.
fn trajectory_is_repeatable_and_chains() {
    // Arrange
    let (basepop, schedules) = five_age_schedules();
    let shape = schedules.shape();
    let last = shape.n_periods - 1;
    let tail = Schedules::new(
        ProjectionShape::new(shape.n_ages, 1, shape.n_fx, shape.fx_idx).expect("valid shape"),
        schedules.sx().slice(s![.., last..]).to_owned(),
        schedules.fx().slice(s![.., last..]).to_owned(),
        schedules.gx().slice(s![.., last..]).to_owned(),
        schedules.srb().slice(s![last..]).to_owned(),
        schedules.interval(),
    )
    .expect("valid tail schedules");

    // Act
    let first = ccmpp(basepop.view(), &schedules).expect("projection");
    let second = ccmpp(basepop.view(), &schedules).expect("projection");
    let start = first.population_at(last).expect("column in range");
    let chained = ccmpp(start, &tail).expect("tail projection");

    // Assert
    assert_eq!(first, second);
    let end = first.population_at(shape.n_periods).expect("column in range");
    for (c, e) in chained.population_at(1).expect("column in range").iter().zip(end.iter()) {
        assert_relative_eq!(c, e, max_relative = 1e-12);
    }
}

#[test]
// Purpose
// -------
// One closed step checked by hand.
//
// Given
// -----
// - basepop [100, 80, 50], sx [0.95, 0.9, 0.85, 0.0], fx [0.4] at age 1,
//   srb 1.05, interval 1, no migration.
//
// Expect
// ------
// - Cohort deaths [34/2.05 · 0.05, 10, 12, 50].
// - Births [34] (16 + 18) and infants 34 / 2.05.
// - Population [34 / 2.05 · 0.95, 90, 68], also produced by the operator.
fn single_step_by_hand() {
    // Arrange
    let shape = ProjectionShape::new(3, 1, 1, 1).expect("valid shape");
    let schedules = Schedules::without_migration(
        shape,
        array![[0.95], [0.9], [0.85], [0.0]],
        array![[0.4]],
        array![1.05],
        1.0,
    )
    .expect("valid schedules");
    let basepop = array![100.0, 80.0, 50.0];
    let infants = 34.0 / 2.05;

    // Act
    let proj = ccmpp(basepop.view(), &schedules).expect("projection");
    let via_operator = leslie_for(&schedules.period(0)).apply(basepop.view());

    // Assert
    let deaths = proj.cohort_deaths().column(0);
    assert_abs_diff_eq!(deaths[0], infants * 0.05, epsilon = 1e-12);
    assert_abs_diff_eq!(deaths[1], 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deaths[2], 12.0, epsilon = 1e-12);
    assert_abs_diff_eq!(deaths[3], 50.0, epsilon = 1e-12);
    assert_abs_diff_eq!(proj.births()[[0, 0]], 34.0, epsilon = 1e-12);
    assert_abs_diff_eq!(proj.infants()[0], infants, epsilon = 1e-12);

    let expected = array![infants * 0.95, 90.0, 68.0];
    let next = proj.population_at(1).expect("column in range");
    for a in 0..3 {
        assert_abs_diff_eq!(next[a], expected[a], epsilon = 1e-10);
        assert_abs_diff_eq!(via_operator[a], expected[a], epsilon = 1e-10);
    }
}

/// Three ages, two periods, one fertile age, census at the final column.
fn reconstruction_data(census: bool, vital: bool) -> ModelData {
    let shape = ProjectionShape::new(3, 2, 1, 1).expect("valid shape");
    let priors = PriorMeans {
        log_basepop: array![100.0_f64.ln(), 80.0_f64.ln(), 50.0_f64.ln()],
        logit_sx: Array2::from_elem((4, 2), 2.0),
        log_fx: Array2::from_elem((1, 2), 0.4_f64.ln()),
        gx: Array2::zeros((3, 2)),
    };
    let census = if census {
        CensusData { log_pop: array![[4.5], [4.4], [4.0]], period_idx: vec![2] }
    } else {
        CensusData::empty(3)
    };
    let vital = vital.then(|| VitalRegistration {
        deaths: array![[3.0, 3.0], [9.0, 9.0], [8.0, 8.0]],
        births: array![[30.0, 30.0]],
    });
    ModelData::new(shape, 1.0, array![1.05, 1.05], priors, census, vital).expect("valid data")
}

#[test]
// Purpose
// -------
// Without observations the objective is exactly the hyperprior plus prior
// terms.
//
// Given
// -----
// - No census, vital registration off, latent blocks at their prior means,
//   scale block y = [0.5, 1.0, -0.3, 0.2].
//
// Expect
// ------
// - `nll = Σ_k [-dlgamma(y_k) + n_k (½ ln 2π + ln σ_k)]`, `σ_k = exp(-y_k / 2)`,
//   with block sizes n = [3, 8, 2, 6].
fn prior_only_objective_composes() {
    // Arrange
    let data = reconstruction_data(false, false);
    let options = ModelOptions { vital_registration: false, ..ModelOptions::default() };
    let layout = ParamLayout::new(data.shape(), MigrationMode::Estimated);
    let priors = data.priors();
    let y = array![0.5, 1.0, -0.3, 0.2];
    let theta = layout
        .pack(&LatentParams {
            scale: y.clone(),
            log_basepop: priors.log_basepop.clone(),
            logit_sx: priors.logit_sx.clone(),
            log_fx: priors.log_fx.clone(),
            gx: Some(priors.gx.clone()),
        })
        .expect("pack");
    let rates = HyperpriorRates::default();
    let block_rates = [rates.logpop, rates.sx, rates.fx, rates.gx];
    let sizes = [3.0, 8.0, 2.0, 6.0];
    let half_ln_2pi = 0.5 * (2.0 * std::f64::consts::PI).ln();

    // Act
    let eval = evaluate(&theta, &data, &options, false).expect("evaluation");

    // Assert
    let expected: f64 = (0..4)
        .map(|k| -dlgamma(y[k], rates.shape, block_rates[k]) + sizes[k] * (half_ln_2pi - 0.5 * y[k]))
        .sum();
    assert_relative_eq!(eval.nll, expected, max_relative = 1e-12);
    assert!(eval.report.is_none());
}

#[test]
// Purpose
// -------
// A full fit improves the log-posterior and yields usable standard errors.
//
// Given
// -----
// - Census at the final column plus vital registration, default priors,
//   Hager–Zhang line search capped at 200 iterations.
//
// Expect
// ------
// - The fitted log-posterior is at least its starting value.
// - The fitted report has the projection's shapes.
// - One finite, non-negative standard error per θ entry.
fn fit_and_standard_errors() {
    // Arrange
    let data = reconstruction_data(true, true);
    let tols = Tolerances::new(Some(1e-6), None, Some(200)).expect("valid tolerances");
    let mle_opts =
        MLEOptions::new(tols, LineSearcher::HagerZhang, false, None).expect("valid options");
    let mut model = PopReconstruction::new(ModelOptions { mle_opts, ..ModelOptions::default() });
    let theta0 = model.initial_theta(&data).expect("initial theta");
    let start = -model.nll(&theta0, &data).expect("finite start");

    // Act
    model.fit(theta0.clone(), &data).expect("fit succeeds");
    let report = model.report(&data).expect("report");
    let se = model.standard_errors(&data).expect("standard errors");

    // Assert
    let outcome = model.results.as_ref().expect("stored outcome");
    assert!(outcome.value >= start - 1e-9);
    assert_eq!(outcome.theta_hat.len(), theta0.len());
    assert_eq!(report.population.dim(), (3, 3));
    assert_eq!(report.period_deaths.dim(), (3, 2));
    assert_eq!(se.len(), theta0.len());
    assert!(se.iter().all(|v| v.is_finite() && *v >= 0.0));
}
