//! L-BFGS construction from [`MLEOptions`].
//!
//! The builders pick the line search, the history length
//! (`opts.lbfgs_mem`, else [`DEFAULT_LBFGS_MEM`]), and the optional gradient
//! and cost-change tolerances. The starting point and iteration cap are set
//! later by [`run_lbfgs`](crate::optimization::loglik_optimizer::run::run_lbfgs).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::{LineSearcher, MLEOptions},
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

fn history_len(opts: &MLEOptions) -> usize {
    opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM)
}

/// L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// - Tolerances rejected by argmin, mapped through `From<argmin::core::Error>`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), history_len(opts)), opts)
}

/// L-BFGS with a More–Thuente line search.
///
/// # Errors
/// - Tolerances rejected by argmin, mapped through `From<argmin::core::Error>`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), history_len(opts)), opts)
}

/// Apply whichever of `tol_grad` / `tol_cost` are set; argmin defaults stay
/// in place for the others.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Name of the line search `opts` selects, for log messages.
pub fn line_search_name(opts: &MLEOptions) -> &'static str {
    match opts.line_searcher {
        LineSearcher::MoreThuente => "More-Thuente",
        LineSearcher::HagerZhang => "Hager-Zhang",
    }
}
