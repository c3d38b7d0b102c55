//! core: schedules, transition operator, stepper, and trajectory.
//!
//! Purpose
//! -------
//! Collect the deterministic building blocks of a cohort-component
//! projection. Everything here is a pure computation over validated inputs:
//! no I/O, no logging, no state shared across runs.
//!
//! Key behaviors
//! -------------
//! - [`ProjectionShape`] and [`Schedules`] validate dimensions and schedule
//!   domains once, at construction.
//! - [`make_leslie_matrix`] builds the sparse [`TransitionOperator`] for one
//!   period; it is rebuilt per period because schedules vary by period.
//! - [`project_step`] advances one population column with the arithmetic
//!   recursion; [`project_step_leslie`] does the same via the operator.
//! - [`ccmpp`] runs every period in order and returns a
//!   [`PopulationProjection`]; [`ccmpp_leslie`] returns the operator-only
//!   population matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Periods are processed strictly in order; period `t + 1` consumes the
//!   freshly written column `t`.
//! - The kernels (`make_leslie_matrix`, `project_step`) assert dimensions and
//!   panic on mismatch. Validated entry points return `ProjectionError`.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; `fx_idx` is the first fertile age group.
//! - Matrices store ages in rows and periods in columns.

pub mod leslie;
pub mod schedule;
pub mod shape;
pub mod stepper;
pub mod trajectory;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::leslie::{TransitionOperator, leslie_for, make_leslie_matrix};
pub use self::schedule::{AgeSchedule, Schedules};
pub use self::shape::ProjectionShape;
pub use self::stepper::{StepOutput, project_step, project_step_leslie};
pub use self::trajectory::{PopulationProjection, ccmpp, ccmpp_leslie};
