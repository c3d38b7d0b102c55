//! model: hierarchical Bayesian population reconstruction.
//!
//! Purpose
//! -------
//! Wrap the cohort-component projection in a hierarchical model. Latent
//! base population, survival, fertility, and migration vectors get Normal
//! priors around supplied means. Their scales either carry log-gamma
//! hyperpriors or are log standard deviations. Census counts and optional
//! vital registration enter through the observation likelihood.
//!
//! Key behaviors
//! -------------
//! - [`objective::evaluate`] is the single pure evaluator of the negative
//!   log-posterior, parameterized by [`ModelOptions`].
//! - [`params::ParamLayout`] defines the flat θ layout and maps it to and
//!   from structured latent blocks.
//! - [`data::ModelData`] validates the fixed inputs once.
//! - [`reconstruction::PopReconstruction`] plugs the evaluator into the
//!   L-BFGS optimizer and exposes fitted reports and standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - θ is unconstrained: base population and fertility are on the log
//!   scale, survival on the logit scale, and migration on its natural scale.
//! - The objective never logs and holds no state between evaluations.
//!
//! Conventions
//! -----------
//! - Census period indices are 0-based population columns
//!   (0 = base population).
//! - Reshaped blocks are column-major (periods are columns).
//!
//! Testing notes
//! -------------
//! - Unit tests per submodule cover layout arithmetic, data validation,
//!   density formulas, and additive structure of the objective.
//! - `tests/integration_reconstruction_pipeline.rs` runs projection through
//!   fitting end to end.

pub mod data;
pub mod densities;
pub mod errors;
pub mod hyperpriors;
pub mod objective;
pub mod options;
pub mod params;
pub mod reconstruction;
pub mod report;

pub use self::data::{CensusData, ModelData, PriorMeans, VitalRegistration};
pub use self::errors::{ModelError, ModelResult};
pub use self::hyperpriors::HyperpriorRates;
pub use self::objective::{Evaluation, evaluate};
pub use self::options::{EvalMode, MigrationMode, ModelOptions, PriorScale};
pub use self::params::{LatentParams, ParamLayout};
pub use self::reconstruction::PopReconstruction;
pub use self::report::ModelReport;
