//! Execution of a configured L-BFGS solver.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
use argmin::core::{CostFunction, Executor, Gradient, IterState, Solver, State};
use argmin_math::ArgminL2Norm;

/// Run `solver` from `theta0` and normalize the final state.
///
/// The iteration cap comes from `opts.tols.max_iter`. With `opts.verbose`
/// the initial log-likelihood is logged at debug level, and with the
/// `obs_slog` feature a terminal observer reports every iteration.
///
/// # Errors
/// - Any model error raised during the run (the run stops at the first).
/// - Outcome validation failures from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem);
    }

    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        );
    }

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}

fn log_initial_state<F: LogLikelihood>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) {
    match problem.cost(theta0) {
        Ok(c) => {
            let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
            log::debug!("initial log-likelihood {:.6}, gradient norm {:?}", -c, grad_norm);
        }
        Err(e) => log::debug!("initial log-likelihood unavailable: {e}"),
    }
}
