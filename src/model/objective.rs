//! objective: the reconstruction negative log-posterior as a pure function
//! of θ.
//!
//! Purpose
//! -------
//! Evaluate every active block of the hierarchical model in a single pass
//! and return the negated total log-density. One evaluator covers all model
//! variants; [`ModelOptions`] decides which blocks exist.
//!
//! Key behaviors
//! -------------
//! - Scale block: under [`PriorScale::Hyperpriors`] each log-precision adds a
//!   log-gamma hyperprior term and yields `σ = exp(-0.5 * log τ²)`; under
//!   [`PriorScale::LogSigma`] `σ = exp(log σ)` and `log σ` is subtracted
//!   for the change of variables.
//! - Latent priors: Normal log-densities of each latent block around its
//!   prior mean with the block's σ.
//! - Transform: `exp` for base population and fertility, logistic for
//!   survival, identity for migration (zeros when migration is fixed).
//! - Projection: [`ccmpp`] over every period.
//! - Census: Normal log-density of each observed log-population column
//!   against the log of the projected column at its period index, with the
//!   base-population σ.
//! - Vital registration: Poisson log-densities of observed deaths against
//!   period deaths and observed births against projected births.
//! - [`EvalMode::LeslieOnly`]: only transforms, builds the period-0
//!   operator, and reports `operator * basepop`; the objective is 0.
//!
//! Invariants & assumptions
//! ------------------------
//! - `evaluate` is pure: no logging, no retained state, and the report flag
//!   never changes `nll`.
//! - Negative projected populations give NaN through `ln`; the optimizer
//!   adapter reports that as a non-finite cost.
//!
//! Conventions
//! -----------
//! - The returned value is a negative log-density (to be minimized).
use crate::{
    model::{
        data::ModelData,
        densities::{dlgamma, dnorm_sum, dpois_sum},
        errors::{ModelError, ModelResult},
        options::{EvalMode, MigrationMode, ModelOptions, PriorScale},
        params::{LatentParams, ParamLayout},
        report::ModelReport,
    },
    optimization::{loglik_optimizer::Theta, numerical_stability::logistic_array},
    projection::core::{PopulationProjection, Schedules, ccmpp, leslie_for},
};
use ndarray::{Array1, Array2};

/// Scale block names in θ order.
const SCALE_BLOCKS: [&str; 4] = ["logpop", "sx", "fx", "gx"];

/// Objective value plus the optional diagnostic report.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub nll: f64,
    pub report: Option<ModelReport>,
}

/// Prior standard deviations derived from the scale block.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PriorSigmas {
    logpop: f64,
    sx: f64,
    fx: f64,
    gx: Option<f64>,
}

/// Evaluate the negative log-posterior at `theta`.
///
/// # Errors
/// - [`ModelError::ThetaLengthMismatch`] / [`ModelError::NonFiniteTheta`] for a
///   malformed θ.
/// - [`ModelError::InvalidScale`] if a derived σ underflows to zero or
///   overflows.
/// - [`ModelError::ConfigConflict`] if vital registration is requested but
///   `data` carries no vital counts.
/// - [`ModelError::Projection`] if transformed schedules fail validation
///   (e.g. `exp(log_fx)` overflowing).
pub fn evaluate(
    theta: &Theta, data: &ModelData, options: &ModelOptions, report: bool,
) -> ModelResult<Evaluation> {
    let layout = ParamLayout::new(data.shape(), options.migration);
    let params = layout.unpack(theta)?;

    if options.eval_mode == EvalMode::LeslieOnly {
        return evaluate_leslie_only(&params, data, options, report);
    }
    if options.vital_registration && data.vital().is_none() {
        return Err(ModelError::ConfigConflict {
            reason: "Vital registration likelihood requested but no deaths/births were supplied.",
        });
    }

    let mut nll = 0.0;
    let sigmas = scale_block(&params.scale, options, &mut nll)?;

    let priors = data.priors();
    nll -= dnorm_sum(&params.log_basepop, &priors.log_basepop, sigmas.logpop)?;
    nll -= dnorm_sum(&params.logit_sx, &priors.logit_sx, sigmas.sx)?;
    nll -= dnorm_sum(&params.log_fx, &priors.log_fx, sigmas.fx)?;
    if let (Some(gx), Some(sigma_gx)) = (&params.gx, sigmas.gx) {
        nll -= dnorm_sum(gx, &priors.gx, sigma_gx)?;
    }

    let (basepop, schedules) = transform(&params, data, options.migration)?;
    let projection = ccmpp(basepop.view(), &schedules)?;

    let census = data.census();
    for (j, &period) in census.period_idx.iter().enumerate() {
        let log_projected = projection.population_at(period)?.mapv(f64::ln);
        nll -= dnorm_sum(&census.log_pop.column(j), &log_projected, sigmas.logpop)?;
    }

    let period_deaths = projection.period_deaths();
    if options.vital_registration {
        if let Some(vital) = data.vital() {
            nll -= dpois_sum(&vital.deaths, &period_deaths);
            nll -= dpois_sum(&vital.births, projection.births());
        }
    }

    let report = report.then(|| projection_report(&projection, period_deaths, basepop, schedules));
    Ok(Evaluation { nll, report })
}

/// Read σ for each active block and accumulate the hyperprior or Jacobian
/// terms into `nll`.
fn scale_block(
    scale: &Array1<f64>, options: &ModelOptions, nll: &mut f64,
) -> ModelResult<PriorSigmas> {
    let rates = options.rates;
    let block_rates = [rates.logpop, rates.sx, rates.fx, rates.gx];

    let mut sigmas = [0.0; 4];
    for (k, &y) in scale.iter().enumerate() {
        let sigma = match options.prior_scale {
            PriorScale::Hyperpriors => {
                *nll -= dlgamma(y, rates.shape, block_rates[k]);
                (-0.5 * y).exp()
            }
            PriorScale::LogSigma => {
                *nll -= y;
                y.exp()
            }
        };
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(ModelError::InvalidScale { block: SCALE_BLOCKS[k], value: sigma });
        }
        sigmas[k] = sigma;
    }

    Ok(PriorSigmas {
        logpop: sigmas[0],
        sx: sigmas[1],
        fx: sigmas[2],
        gx: (scale.len() == 4).then_some(sigmas[3]),
    })
}

/// Map latent blocks into a base population and validated schedules.
fn transform(
    params: &LatentParams, data: &ModelData, migration: MigrationMode,
) -> ModelResult<(Array1<f64>, Schedules)> {
    let shape = data.shape();
    let basepop = params.log_basepop.mapv(f64::exp);
    let sx = logistic_array(&params.logit_sx);
    let fx = params.log_fx.mapv(f64::exp);
    let gx = match (migration, &params.gx) {
        (MigrationMode::Estimated, Some(gx)) => gx.clone(),
        _ => Array2::zeros((shape.n_ages, shape.n_periods)),
    };
    let schedules = Schedules::new(shape, sx, fx, gx, data.srb().clone(), data.interval())?;
    Ok((basepop, schedules))
}

fn evaluate_leslie_only(
    params: &LatentParams, data: &ModelData, options: &ModelOptions, report: bool,
) -> ModelResult<Evaluation> {
    let (basepop, schedules) = transform(params, data, options.migration)?;
    if !report {
        return Ok(Evaluation { nll: 0.0, report: None });
    }

    let operator = leslie_for(&schedules.period(0));
    let leslie_population = operator.apply(basepop.view());
    let shape = data.shape();
    let report = ModelReport {
        population: Array2::zeros((shape.n_ages, 0)),
        cohort_deaths: Array2::zeros((shape.n_sx(), 0)),
        period_deaths: Array2::zeros((shape.n_ages, 0)),
        births: Array2::zeros((shape.n_fx, 0)),
        infants: Array1::zeros(0),
        migrations: Array2::zeros((shape.n_ages, 0)),
        basepop,
        sx: schedules.sx().clone(),
        fx: schedules.fx().clone(),
        gx: schedules.gx().clone(),
        leslie_population: Some(leslie_population),
    };
    Ok(Evaluation { nll: 0.0, report: Some(report) })
}

fn projection_report(
    projection: &PopulationProjection, period_deaths: Array2<f64>, basepop: Array1<f64>,
    schedules: Schedules,
) -> ModelReport {
    ModelReport {
        population: projection.population().clone(),
        cohort_deaths: projection.cohort_deaths().clone(),
        period_deaths,
        births: projection.births().clone(),
        infants: projection.infants().clone(),
        migrations: projection.migrations().clone(),
        basepop,
        sx: schedules.sx().clone(),
        fx: schedules.fx().clone(),
        gx: schedules.gx().clone(),
        leslie_population: None,
    }
}
