//! MaxentTrainer — wires data, prior, objective and minimizer together.
//!
//! Purpose
//! -------
//! Train weight vectors and classifiers. Every run builds a fresh
//! [`LogConditionalObjective`] and obtains a fresh minimizer from the
//! injected [`MinimizerFactory`], so independent runs (for example the
//! folds of a cross-validation) never share optimizer state.
//!
//! Key behaviors
//! -------------
//! - [`MaxentTrainer::train_outcome`] runs one minimization and returns the
//!   full [`OptimOutcome`] diagnostics.
//! - [`MaxentTrainer::train_weights`] returns only the flat weights
//!   (reshape with [`to_weight_matrix`](crate::maxent::models::to_weight_matrix)).
//! - [`MaxentTrainer::train_classifier`] trains on a frozen [`Dataset`] with
//!   the configured prior and binds the result to its indices.
//! - L1-penalized runs (the adaptive L1 search) take their minimizers from a
//!   separate [`L1MinimizerFactory`], settable with
//!   [`MaxentTrainer::with_l1_factory`].
//! - Regularization searches (`held_out_set_sigma`,
//!   `cross_validate_set_sigma`, `train_adaptive_l1`, ...) are further
//!   `impl MaxentTrainer` blocks in `maxent::tuning`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Training starts from zeros unless a warm start is supplied; a warm
//!   start must have `view.dimension()` entries.
//! - [`TrainerOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Logging goes through the `log` facade: one `debug!` line per run and a
//!   `warn!` when the minimizer stops without reporting convergence.
//!   Installing a logger is the caller's concern.
use crate::{
    maxent::{
        core::{
            dataset::{DataView, Dataset},
            objective::{LikelihoodMode, LogConditionalObjective},
            prior::LogPrior,
        },
        errors::{MaxentError, MaxentResult},
        models::classifier::LinearClassifier,
    },
    optimization::minimizer::{
        L1MinimizerFactory, LbfgsMinimizer, Minimizer, MinimizerFactory, MinimizerOptions,
        OptimOutcome, Theta,
    },
};
use log::{debug, warn};
use std::{fmt::Debug, hash::Hash, sync::Arc};

/// Relative convergence tolerance handed to the minimizer by default.
pub const DEFAULT_TRAINER_TOL: f64 = 1e-4;

/// Training configuration.
///
/// Fields:
/// - `prior: LogPrior`: regularization for ordinary training runs and the
///   template whose σ the sigma searches retune.
/// - `mode: LikelihoodMode`: conditional (default) or summed likelihood.
/// - `threads: usize`: shards for parallel objective evaluation.
/// - `tol: f64`: relative tolerance passed to `Minimizer::minimize`.
/// - `minimizer: MinimizerOptions`: options for the default L-BFGS and
///   OWL-QN factories.
///
/// Default:
/// - quadratic prior with σ = 1, conditional mode, threads = available
///   parallelism, `tol = 1e-4`, default minimizer options.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerOptions {
    pub prior: LogPrior,
    pub mode: LikelihoodMode,
    pub threads: usize,
    pub tol: f64,
    pub minimizer: MinimizerOptions,
}

impl TrainerOptions {
    /// # Errors
    /// - [`MaxentError::InvalidOption`] for `threads == 0` or a `tol` that is
    ///   not finite and > 0.
    pub fn new(
        prior: LogPrior, mode: LikelihoodMode, threads: usize, tol: f64, minimizer: MinimizerOptions,
    ) -> MaxentResult<Self> {
        if threads == 0 {
            return Err(MaxentError::InvalidOption {
                name: "threads",
                value: 0.0,
                reason: "at least one worker is required",
            });
        }
        if !tol.is_finite() || tol <= 0.0 {
            return Err(MaxentError::InvalidOption {
                name: "tol",
                value: tol,
                reason: "tolerance must be finite and > 0",
            });
        }
        Ok(Self { prior, mode, threads, tol, minimizer })
    }
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            prior: LogPrior::default(),
            mode: LikelihoodMode::Conditional,
            threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            tol: DEFAULT_TRAINER_TOL,
            minimizer: MinimizerOptions::default(),
        }
    }
}

/// Trainer for multiclass log-linear models.
#[derive(Clone)]
pub struct MaxentTrainer {
    options: TrainerOptions,
    factory: Arc<dyn MinimizerFactory>,
    l1_factory: Arc<dyn L1MinimizerFactory>,
}

impl MaxentTrainer {
    /// Trainer whose factory builds L-BFGS minimizers from
    /// `options.minimizer`.
    pub fn new(options: TrainerOptions) -> Self {
        let minimizer_opts = options.minimizer.clone();
        let factory = move || LbfgsMinimizer::new(minimizer_opts.clone());
        Self::with_factory(options, Arc::new(factory))
    }

    /// Trainer with an injected minimizer factory (any `Fn() -> M` closure
    /// with `M: Minimizer` qualifies). L1 runs keep the default OWL-QN
    /// factory over `options.minimizer`.
    pub fn with_factory(options: TrainerOptions, factory: Arc<dyn MinimizerFactory>) -> Self {
        let minimizer_opts = options.minimizer.clone();
        let l1_factory = move |l1: f64| LbfgsMinimizer::with_l1(minimizer_opts.clone(), l1);
        Self { options, factory, l1_factory: Arc::new(l1_factory) }
    }

    /// Replace the factory used for L1-penalized runs.
    pub fn with_l1_factory(mut self, l1_factory: Arc<dyn L1MinimizerFactory>) -> Self {
        self.l1_factory = l1_factory;
        self
    }

    pub fn options(&self) -> &TrainerOptions {
        &self.options
    }

    /// Objective over `view` with this trainer's mode and thread count.
    pub fn objective<'v>(
        &self, view: &'v DataView, prior: LogPrior,
    ) -> MaxentResult<LogConditionalObjective<'v>> {
        Ok(LogConditionalObjective::new(view, prior)?
            .with_mode(self.options.mode)
            .with_threads(self.options.threads)?)
    }

    /// Fresh minimizer from the factory.
    pub fn minimizer(&self) -> Box<dyn Minimizer> {
        self.factory.create()
    }

    /// Fresh minimizer from the L1 factory, penalizing
    /// `l1_coefficient · ‖x‖₁`.
    ///
    /// # Errors
    /// - Whatever the L1 factory rejects, e.g.
    ///   `OptError::InvalidL1Coefficient` for a non-positive coefficient.
    pub fn l1_minimizer(&self, l1_coefficient: f64) -> MaxentResult<Box<dyn Minimizer>> {
        Ok(self.l1_factory.create(l1_coefficient)?)
    }

    /// Minimize the objective over `view` with `prior`, starting from
    /// `initial` (or zeros).
    ///
    /// # Errors
    /// - [`MaxentError::EmptyDataset`] for an empty view.
    /// - [`MaxentError::DimensionMismatch`] for a warm start of the wrong
    ///   length.
    /// - Minimizer and objective failures, converted to [`MaxentError`].
    pub fn train_outcome(
        &self, view: &DataView, prior: &LogPrior, initial: Option<&Theta>,
    ) -> MaxentResult<OptimOutcome> {
        let mut minimizer = self.minimizer();
        self.train_with(minimizer.as_mut(), view, prior, initial)
    }

    /// Same as [`MaxentTrainer::train_outcome`] with a caller-supplied
    /// minimizer.
    pub fn train_with(
        &self, minimizer: &mut dyn Minimizer, view: &DataView, prior: &LogPrior,
        initial: Option<&Theta>,
    ) -> MaxentResult<OptimOutcome> {
        if view.is_empty() {
            return Err(MaxentError::EmptyDataset);
        }
        let x0 = match initial {
            Some(w) if w.len() != view.dimension() => {
                return Err(MaxentError::DimensionMismatch {
                    what: "initial weights",
                    expected: view.dimension(),
                    found: w.len(),
                });
            }
            Some(w) => w.clone(),
            None => Theta::zeros(view.dimension()),
        };
        let objective = self.objective(view, prior.clone())?;
        let outcome = minimizer.minimize(&objective, self.options.tol, x0)?;
        debug!(
            "trained {} weights on {} examples: value {:.6}, {} iterations, status {}",
            view.dimension(),
            view.len(),
            outcome.value,
            outcome.iterations,
            outcome.status
        );
        if !outcome.converged {
            warn!("minimizer stopped without converging after {} iterations", outcome.iterations);
        }
        Ok(outcome)
    }

    /// Flat trained weights (`f * num_classes + c`).
    pub fn train_weights(
        &self, view: &DataView, prior: &LogPrior, initial: Option<&Theta>,
    ) -> MaxentResult<Theta> {
        Ok(self.train_outcome(view, prior, initial)?.theta_hat)
    }

    /// Train on a frozen dataset with the configured prior.
    ///
    /// # Errors
    /// - [`MaxentError::IndexNotFrozen`] before `dataset.freeze()`.
    /// - Any training failure.
    pub fn train_classifier<F, L>(&self, dataset: &Dataset<F, L>) -> MaxentResult<LinearClassifier<F, L>>
    where
        F: Eq + Hash + Clone + Debug,
        L: Eq + Hash + Clone + Debug,
    {
        let view = dataset.view()?;
        let weights = self.train_weights(&view, &self.options.prior, None)?;
        LinearClassifier::from_weights(
            &weights,
            Arc::clone(dataset.feature_index()),
            Arc::clone(dataset.label_index()),
        )
    }
}
