//! Executor wiring: run a configured argmin solver from a starting point and
//! convert its final state into an [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    minimizer::{DiffFunction, Grad, MinimizerOptions, OptimOutcome, Theta, adapter::ArgMinAdapter},
};
use argmin::core::{Executor, IterState, Solver, State};

/// Solver state shared by every L-BFGS flavor in this crate.
pub type LbfgsState = IterState<Theta, Grad, (), (), (), f64>;

/// Execute `solver` on `problem` starting at `theta0`.
///
/// `opts.tols.max_iter` caps the iteration count. With the `obs_slog`
/// feature and `opts.verbose`, argmin's terminal observer reports every
/// iteration.
///
/// # Errors
/// - argmin runtime failures (objective errors surfaced by the adapter, a
///   line search that cannot find a descent step, ...) via
///   `From<argmin::core::Error>`.
/// - Validation errors from [`OptimOutcome::new`] when the solver ends
///   without a finite best point.
pub fn execute_solver<'a, F, S>(
    problem: ArgMinAdapter<'a, F>, solver: S, theta0: Theta, opts: &MinimizerOptions,
) -> OptResult<OptimOutcome>
where
    F: DiffFunction + ?Sized,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    let max_iter = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match max_iter {
            Some(n) => state.max_iters(n as u64),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        executor
    };

    let result = executor.run()?;
    outcome_from_state(result.state().clone())
}

/// Best point, its cost, termination status, counters and final gradient.
fn outcome_from_state(mut state: LbfgsState) -> OptResult<OptimOutcome> {
    let iterations = state.get_iter();
    let counts = state.get_func_counts().clone();
    let status = state.get_termination_status().clone();
    let cost = state.get_best_cost();
    let grad = state.take_gradient();
    OptimOutcome::new(state.take_best_param(), cost, status, iterations, counts, grad)
}
