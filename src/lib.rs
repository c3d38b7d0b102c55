//! popreconstruct: cohort-component population projection and hierarchical
//! population reconstruction.
//!
//! Purpose
//! -------
//! Project an age-structured population through discrete periods and embed
//! that projection in a hierarchical model whose negative log-posterior can
//! be minimized to reconstruct base population, survival, fertility, and
//! migration from census and vital registration data.
//!
//! Key behaviors
//! -------------
//! - [`projection`]: the arithmetic recursion and the sparse Leslie-style
//!   transition operator (two formulations of one step), the multi-period
//!   trajectory, and flat-buffer entry points for binding layers.
//! - [`model`]: fixed data, θ layout, densities, the configurable objective
//!   evaluator, and the [`PopReconstruction`](model::PopReconstruction) model.
//! - [`optimization`]: L-BFGS maximization of a `LogLikelihood` through
//!   argmin with finite-difference gradient fallback.
//! - [`inference`]: standard errors from the finite-difference observed
//!   information at the optimum.
//!
//! Invariants & assumptions
//! ------------------------
//! - Indices are 0-based throughout; `fx_idx` is the first fertile age group
//!   and must be at least 1.
//! - Validated constructors return typed errors; inner numerical kernels
//!   assert their dimensions and let pathological values propagate as
//!   ordinary floats.
//!
//! Conventions
//! -----------
//! - Schedules are matrices with one column per period; flattened inputs are
//!   column-major.
//! - Only the orchestration layer logs, through the `log` facade.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module. The integration test under
//!   `tests/` checks the operator/recursion equivalence, conservation and
//!   births identities, trajectory idempotence, prior-only composition, the
//!   hand-worked example, and a small end-to-end fit.

pub mod inference;
pub mod model;
pub mod optimization;
pub mod projection;
