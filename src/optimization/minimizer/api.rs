//! High-level entry point for minimizing a [`DiffFunction`] with argmin.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search (optionally in OWL-QN mode), wraps the objective in an
//! `ArgMinAdapter`, and delegates the run to `execute_solver`.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_hager_zhang, build_more_thuente},
        run::execute_solver,
        traits::{DiffFunction, LineSearcher, MinimizerOptions},
        validation::validate_theta_input,
    },
};

/// Minimize `f` using L-BFGS with the configured line search.
///
/// # Behavior
/// - Validates that `theta0` has `f.domain_dimension()` finite entries.
/// - Wraps `f` in an `ArgMinAdapter`.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`; when `l1_coefficient` is
///   `Some(λ)` the solver minimizes `f(x) + λ‖x‖₁` (OWL-QN).
/// - Calls `execute_solver` and returns its [`OptimOutcome`].
///
/// # Errors
/// - `DimensionMismatch` / `NonFiniteEntry` for a bad starting point.
/// - Propagates builder errors from `build_hager_zhang` / `build_more_thuente`.
/// - Propagates runtime errors from `execute_solver` (e.g., line search failures).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_maxent::optimization::{
///     errors::OptResult,
///     minimizer::{DiffFunction, Grad, MinimizerOptions, Theta, minimize},
/// };
///
/// struct Bowl;
/// impl DiffFunction for Bowl {
///     fn domain_dimension(&self) -> usize { 3 }
///     fn calculate(&self, x: &Theta) -> OptResult<(f64, Grad)> {
///         Ok((x.dot(x), 2.0 * x))
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.1, -0.2, 0.3], &MinimizerOptions::default(), None)?;
/// println!("x̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_maxent::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: DiffFunction + ?Sized>(
    f: &F, theta0: Theta, opts: &MinimizerOptions, l1_coefficient: Option<f64>,
) -> OptResult<OptimOutcome> {
    validate_theta_input(&theta0, f.domain_dimension())?;
    let problem = ArgMinAdapter::new(f);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_more_thuente(opts, l1_coefficient)?;
            execute_solver(problem, solver, theta0, opts)
        }
        LineSearcher::HagerZhang => {
            let solver = build_hager_zhang(opts, l1_coefficient)?;
            execute_solver(problem, solver, theta0, opts)
        }
    }
}
