//! Public API surface for objective minimization.
//!
//! - [`DiffFunction`]: trait implemented by differentiable objectives.
//! - [`Minimizer`]: black-box iterative optimizer consuming a `DiffFunction`.
//! - [`MinimizerFactory`]: produces a fresh `Minimizer` for every training
//!   run so independent runs never share optimizer state.
//! - [`L1MinimizerFactory`]: the same for minimizers that add an L1
//!   penalty of a given strength.
//! - [`MinimizerOptions`] and [`Tolerances`]: configuration for the
//!   argmin-backed implementation.
//! - [`LineSearcher`]: which line search the L-BFGS solver runs.
//! - [`OptimOutcome`]: normalized result returned by every minimizer.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        Cost, FnEvalMap, Grad, Theta, api,
        validation::{
            validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad, verify_tolerance,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// A differentiable scalar function of a flat parameter vector.
///
/// Required:
/// - `domain_dimension()`: length of every admissible `x`.
/// - `calculate(x) -> (value, gradient)`: evaluate both at once. Most
///   objectives share work between the two, so this is the primitive.
///
/// Optional:
/// - `value_at` / `derivative_at`: single-output conveniences built on
///   `calculate`.
///
/// Implementations report invalid points and numerical failures as
/// [`OptError`] values, never panics.
pub trait DiffFunction {
    fn domain_dimension(&self) -> usize;
    fn calculate(&self, x: &Theta) -> OptResult<(Cost, Grad)>;

    fn value_at(&self, x: &Theta) -> OptResult<Cost> {
        self.calculate(x).map(|(value, _)| value)
    }

    fn derivative_at(&self, x: &Theta) -> OptResult<Grad> {
        self.calculate(x).map(|(_, grad)| grad)
    }
}

/// Iterative optimizer: repeatedly evaluates `f` and returns an optimum.
///
/// `tol` is a relative convergence tolerance; how it maps onto stopping
/// rules is up to the implementation. `initial` must have length
/// `f.domain_dimension()`.
pub trait Minimizer: Send {
    fn minimize(
        &mut self, f: &dyn DiffFunction, tol: f64, initial: Theta,
    ) -> OptResult<OptimOutcome>;
}

/// Source of fresh [`Minimizer`] instances.
///
/// Any `Fn() -> M` closure with `M: Minimizer` is a factory, so callers
/// inject optimizers without naming a type at runtime:
///
/// ```ignore
/// let factory = || LbfgsMinimizer::new(MinimizerOptions::default());
/// ```
pub trait MinimizerFactory: Send + Sync {
    fn create(&self) -> Box<dyn Minimizer>;
}

impl<F, M> MinimizerFactory for F
where
    F: Fn() -> M + Send + Sync,
    M: Minimizer + 'static,
{
    fn create(&self) -> Box<dyn Minimizer> {
        Box::new(self())
    }
}

/// Source of fresh minimizers that add `l1_coefficient · ‖x‖₁` to the
/// objective.
///
/// Any `Fn(f64) -> OptResult<M>` closure with `M: Minimizer` qualifies:
///
/// ```ignore
/// let factory = |c| LbfgsMinimizer::with_l1(MinimizerOptions::default(), c);
/// ```
pub trait L1MinimizerFactory: Send + Sync {
    fn create(&self, l1_coefficient: f64) -> OptResult<Box<dyn Minimizer>>;
}

impl<F, M> L1MinimizerFactory for F
where
    F: Fn(f64) -> OptResult<M> + Send + Sync,
    M: Minimizer + 'static,
{
    fn create(&self, l1_coefficient: f64) -> OptResult<Box<dyn Minimizer>> {
        Ok(Box::new(self(l1_coefficient)?))
    }
}

/// Line search run by every L-BFGS step.
///
/// Parsing accepts case-insensitive `"MoreThuente"` / `"HagerZhang"`;
/// `-`, `_` and spaces are ignored, so `"more-thuente"` also parses; unknown
/// names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.chars().filter(|c| !matches!(c, '-' | '_' | ' ')).flat_map(char::to_lowercase).collect();
        match normalized.as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch { name: s.to_string() }),
        }
    }
}

/// Settings shared by every run of an [`LbfgsMinimizer`].
///
/// `verbose` only has an effect with the `obs_slog` feature, where it
/// attaches argmin's terminal observer. `lbfgs_mem = None` falls back to
/// [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM).
///
/// The default stops at `‖∇f‖ < 1e-6` or after 500 iterations, with
/// More–Thuente steps and no observer.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MinimizerOptions {
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] for `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem { mem: 0 });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MinimizerOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(500) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules handed to argmin.
///
/// `tol_grad` bounds the gradient norm, `tol_cost` the per-iteration change
/// in cost, and `max_iter` the iteration count. Unset rules are skipped; a
/// value with every rule unset is rejected by [`Tolerances::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when all three are `None`.
    /// - [`OptError::InvalidTolerance`] for a tolerance that is not finite
    ///   and > 0.
    /// - [`OptError::InvalidMaxIter`] for `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if (tol_grad, tol_cost, max_iter) == (None, None, None) {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter { max_iter: 0 });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// What a [`Minimizer`] hands back: the best point and its objective value,
/// plus diagnostics.
///
/// `converged` is false when the solver stopped without a termination
/// reason or only because it reached `max_iter`; `status` carries the
/// reason as text. `fn_evals` holds argmin's counters keyed by
/// name (`cost_count`, `gradient_count`), and `grad_norm` is the L2 norm of
/// the last gradient the solver kept.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Outcome from the final solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::NonFiniteEntry`] for a
    ///   missing or non-finite estimate.
    /// - [`OptError::NonFiniteCost`] for a non-finite value.
    pub fn new(
        theta_hat: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        let converged = !matches!(
            termination,
            TerminationStatus::NotTerminated
                | TerminationStatus::Terminated(TerminationReason::MaxItersReached)
        );
        let status = match &termination {
            TerminationStatus::NotTerminated => "NotTerminated".to_string(),
            TerminationStatus::Terminated(reason) => format!("{reason:?}"),
        };
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}

/// L-BFGS minimizer backed by argmin, optionally in OWL-QN (L1) mode.
///
/// The `tol` passed to [`Minimizer::minimize`] is a relative cost-change
/// tolerance: it is scaled by `max(1, |f(initial)|)` and installed as the
/// solver's `tol_cost`, replacing `opts.tols.tol_cost` for that run.
#[derive(Debug, Clone, PartialEq)]
pub struct LbfgsMinimizer {
    opts: MinimizerOptions,
    l1_coefficient: Option<f64>,
}

impl LbfgsMinimizer {
    pub fn new(opts: MinimizerOptions) -> Self {
        Self { opts, l1_coefficient: None }
    }

    /// Construct an OWL-QN minimizer penalizing `l1_coefficient · ‖x‖₁`.
    ///
    /// # Errors
    /// - [`OptError::InvalidL1Coefficient`] unless the coefficient is finite
    ///   and strictly positive.
    pub fn with_l1(opts: MinimizerOptions, l1_coefficient: f64) -> OptResult<Self> {
        if !l1_coefficient.is_finite() || l1_coefficient <= 0.0 {
            return Err(OptError::InvalidL1Coefficient { value: l1_coefficient });
        }
        Ok(Self { opts, l1_coefficient: Some(l1_coefficient) })
    }

    pub fn options(&self) -> &MinimizerOptions {
        &self.opts
    }

    pub fn l1_coefficient(&self) -> Option<f64> {
        self.l1_coefficient
    }
}

impl Minimizer for LbfgsMinimizer {
    fn minimize(
        &mut self, f: &dyn DiffFunction, tol: f64, initial: Theta,
    ) -> OptResult<OptimOutcome> {
        verify_tolerance("tol", Some(tol))?;
        let initial_value = f.value_at(&initial)?;
        validate_value(initial_value)?;
        let mut opts = self.opts.clone();
        opts.tols.tol_cost = Some(tol * initial_value.abs().max(1.0));
        api::minimize(f, initial, &opts, self.l1_coefficient)
    }
}
