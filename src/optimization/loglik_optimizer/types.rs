//! Numeric aliases and concrete solver types for the optimizer.
//!
//! Every optimizer module speaks in terms of these aliases so the `ndarray`
//! and argmin generics appear in one place only.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector θ.
pub type Theta = Array1<f64>;

/// Gradient with the same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `n × n` second-derivative matrix, `n = θ.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value. Inside argmin this is the cost `-ℓ(θ)`.
pub type Cost = f64;

/// argmin's named function-evaluation counters (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length used when `MLEOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
