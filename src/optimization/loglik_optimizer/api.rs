//! Entry point of the optimizer.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `f` over θ starting from `theta0`.
///
/// `f.check` is applied to `theta0` first; the L-BFGS solver then uses the
/// line search named in `opts`.
///
/// ```ignore
/// use popreconstruct::model::PopReconstruction;
/// use popreconstruct::optimization::loglik_optimizer::maximize;
///
/// let model = PopReconstruction::new(options);
/// let theta0 = model.initial_theta(&data)?;
/// let outcome = maximize(&model, theta0, &data, &model.options.mle_opts)?;
/// ```
///
/// # Errors
/// - Whatever `f.check` rejects.
/// - Solver construction and run failures, including model errors raised
///   during evaluation.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            run_lbfgs(theta0, opts, problem, build_optimizer_more_thuente(opts)?)
        }
        LineSearcher::HagerZhang => {
            run_lbfgs(theta0, opts, problem, build_optimizer_hager_zhang(opts)?)
        }
    }
}
