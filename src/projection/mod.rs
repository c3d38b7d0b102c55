//! projection: deterministic cohort-component population projection.
//!
//! Purpose
//! -------
//! Step an age-structured population forward through discrete periods from
//! survival, fertility, migration, and sex-ratio-at-birth schedules. Two
//! formulations are provided and agree to floating tolerance: an arithmetic
//! recursion ([`ccmpp`](crate::projection::core::ccmpp)) and a sparse Leslie-style operator
//! ([`ccmpp_leslie`](crate::projection::core::ccmpp_leslie)).
//!
//! Layout
//! ------
//! - [`core`](self::core): shapes, schedules, the transition operator, the stepper, and
//!   the trajectory container.
//! - [`flat`]: column-major buffer entry points for binding layers.
//! - [`errors`]: [`ProjectionError`] and [`ProjectionResult`].

pub mod core;
pub mod errors;
pub mod flat;

pub use self::errors::{ProjectionError, ProjectionResult};
pub use self::flat::{FlatProjection, OperatorTriplets, ccmpp_flat, leslie_flat};
