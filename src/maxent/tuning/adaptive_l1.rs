//! Adaptive L1: binary search on the L1 strength λ for a target number of
//! active features.
//!
//! Purpose
//! -------
//! Train OWL-QN models at successive λ until the number of features with a
//! non-negligible weight lands within `target ± tolerance`.
//!
//! Key behaviors
//! -------------
//! - `count < target − tolerance`: penalty too strong, `hi = λ`,
//!   `λ = (λ + lo) / 2`.
//! - `count > target + tolerance`: penalty too weak, `lo = λ`,
//!   `λ = (λ + hi) / 2`.
//! - Otherwise the target is hit and the search stops.
//! - The search also stops when `hi − lo < min_step` or after
//!   `max_iterations` trials; that is logged with `warn!` and reported
//!   through `hit_target = false`, not as an error.
//! - A trial whose minimizer fails is logged and treated as "penalty too
//!   strong".
//! - Successful trials warm-start the next one.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every trial asks the trainer's L1 factory for a fresh minimizer (by
//!   default `LbfgsMinimizer::with_l1` over the trainer's
//!   `MinimizerOptions`); the trainer's prior is the smooth part of the
//!   objective (usually `Null` here).
//! - A feature is active when its largest `|weight|` over the selected
//!   labels (all labels by default) exceeds `threshold`.
use crate::{
    maxent::{
        core::dataset::DataView,
        errors::{MaxentError, MaxentResult},
        models::trainer::MaxentTrainer,
        tuning::is_recoverable,
    },
    optimization::minimizer::Theta,
};
use log::{debug, info, warn};

/// Options for [`MaxentTrainer::train_adaptive_l1`].
///
/// Defaults besides `target`/`tolerance`: λ ∈ `[0, 100]` starting at `1.0`,
/// `min_step = 1e-3`, `max_iterations = 20`, `threshold = 1e-4`, all labels.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveL1Options {
    pub target: usize,
    pub tolerance: usize,
    pub lambda_min: f64,
    pub lambda_max: f64,
    pub initial_lambda: f64,
    pub min_step: f64,
    pub max_iterations: usize,
    pub threshold: f64,
    pub labels: Option<Vec<usize>>,
}

impl AdaptiveL1Options {
    pub fn new(target: usize, tolerance: usize) -> Self {
        Self {
            target,
            tolerance,
            lambda_min: 0.0,
            lambda_max: 100.0,
            initial_lambda: 1.0,
            min_step: 1e-3,
            max_iterations: 20,
            threshold: 1e-4,
            labels: None,
        }
    }

    /// # Errors
    /// - [`MaxentError::InvalidOption`] unless
    ///   `0 <= lambda_min < initial <= lambda_max < ∞`.
    pub fn with_lambda_range(mut self, lambda_min: f64, lambda_max: f64, initial: f64) -> MaxentResult<Self> {
        self.lambda_min = lambda_min;
        self.lambda_max = lambda_max;
        self.initial_lambda = initial;
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    /// - [`MaxentError::InvalidOption`] for a negative or non-finite value.
    pub fn with_threshold(mut self, threshold: f64) -> MaxentResult<Self> {
        self.threshold = threshold;
        self.validate()?;
        Ok(self)
    }

    /// Count features only over these label ids.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidOption`] for an empty selection.
    pub fn with_labels(mut self, labels: Vec<usize>) -> MaxentResult<Self> {
        self.labels = Some(labels);
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    /// - [`MaxentError::InvalidOption`] unless `min_step > 0` and
    ///   `max_iterations >= 1`.
    pub fn with_limits(mut self, min_step: f64, max_iterations: usize) -> MaxentResult<Self> {
        self.min_step = min_step;
        self.max_iterations = max_iterations;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> MaxentResult<()> {
        let invalid = |name, value, reason| Err(MaxentError::InvalidOption { name, value, reason });
        if !(self.lambda_min.is_finite() && self.lambda_min >= 0.0) {
            return invalid("lambda_min", self.lambda_min, "lambda_min must be finite and >= 0");
        }
        if !(self.lambda_max.is_finite() && self.lambda_max > self.lambda_min) {
            return invalid("lambda_max", self.lambda_max, "lambda_max must be finite and > lambda_min");
        }
        if !(self.initial_lambda > self.lambda_min && self.initial_lambda <= self.lambda_max) {
            return invalid(
                "initial_lambda",
                self.initial_lambda,
                "initial lambda must lie in (lambda_min, lambda_max]",
            );
        }
        if !(self.min_step.is_finite() && self.min_step > 0.0) {
            return invalid("min_step", self.min_step, "min_step must be finite and > 0");
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations", 0.0, "at least one iteration is required");
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return invalid("threshold", self.threshold, "threshold must be finite and >= 0");
        }
        if self.labels.as_ref().is_some_and(Vec::is_empty) {
            return invalid("labels", 0.0, "label selection must not be empty");
        }
        Ok(())
    }
}

/// One λ trial; `feature_count` is `None` when the minimizer failed.
#[derive(Debug, Clone, PartialEq)]
pub struct L1Trial {
    pub lambda: f64,
    pub feature_count: Option<usize>,
}

/// Result of the adaptive L1 search.
///
/// When the target was not hit, `lambda`/`weights` come from the successful
/// trial whose count was closest to the target (latest on ties).
#[derive(Debug, Clone, PartialEq)]
pub struct L1Search {
    pub lambda: f64,
    pub feature_count: usize,
    pub weights: Theta,
    pub hit_target: bool,
    pub iterations: usize,
    pub trials: Vec<L1Trial>,
}

impl MaxentTrainer {
    /// Binary-search λ until the active-feature count is within
    /// `options.target ± options.tolerance`.
    ///
    /// # Errors
    /// - Option validation errors, or an out-of-range label in
    ///   `options.labels`.
    /// - [`MaxentError::EmptyDataset`] for an empty view.
    /// - [`MaxentError::SearchFailed`] when no trial trained successfully.
    /// - Non-recoverable training errors (bad prior dimension etc.).
    pub fn train_adaptive_l1(&self, view: &DataView, options: &AdaptiveL1Options) -> MaxentResult<L1Search> {
        options.validate()?;
        if view.is_empty() {
            return Err(MaxentError::EmptyDataset);
        }
        let num_classes = view.num_classes();
        if let Some(&bad) = options.labels.iter().flatten().find(|&&c| c >= num_classes) {
            return Err(MaxentError::InvalidOption {
                name: "labels",
                value: bad as f64,
                reason: "label id out of range",
            });
        }
        let all_labels: Vec<usize> = (0..num_classes).collect();
        let labels = options.labels.as_deref().unwrap_or(&all_labels);
        let low_bound = options.target.saturating_sub(options.tolerance);
        let high_bound = options.target.saturating_add(options.tolerance);

        let (mut lo, mut hi, mut lambda) = (options.lambda_min, options.lambda_max, options.initial_lambda);
        let mut trials = Vec::new();
        let mut warm: Option<Theta> = None;
        let mut best: Option<(f64, usize, Theta)> = None;
        let mut hit_target = false;

        while trials.len() < options.max_iterations {
            let mut minimizer = self.l1_minimizer(lambda)?;
            match self.train_with(minimizer.as_mut(), view, &self.options().prior, warm.as_ref()) {
                Ok(outcome) => {
                    let count = count_active_features(&outcome.theta_hat, num_classes, labels, options.threshold);
                    debug!("adaptive L1 trial λ = {lambda:.6}: {count} active features");
                    trials.push(L1Trial { lambda, feature_count: Some(count) });
                    let closer = best.as_ref().is_none_or(|(_, c, _)| {
                        count.abs_diff(options.target) <= c.abs_diff(options.target)
                    });
                    if closer {
                        best = Some((lambda, count, outcome.theta_hat.clone()));
                    }
                    warm = Some(outcome.theta_hat);
                    if count < low_bound {
                        hi = lambda;
                        lambda = (lambda + lo) / 2.0;
                    } else if count > high_bound {
                        lo = lambda;
                        lambda = (lambda + hi) / 2.0;
                    } else {
                        hit_target = true;
                        break;
                    }
                }
                Err(err) if is_recoverable(&err) => {
                    warn!("adaptive L1 trial λ = {lambda:.6} failed, treating it as too strong: {err}");
                    trials.push(L1Trial { lambda, feature_count: None });
                    hi = lambda;
                    lambda = (lambda + lo) / 2.0;
                }
                Err(err) => return Err(err),
            }
            if hi - lo < options.min_step {
                warn!(
                    "adaptive L1 interval [{lo:.6}, {hi:.6}] collapsed below {} without hitting {} ± {}",
                    options.min_step, options.target, options.tolerance
                );
                break;
            }
        }
        if !hit_target && trials.len() >= options.max_iterations {
            warn!(
                "adaptive L1 stopped after {} iterations without hitting {} ± {}",
                trials.len(),
                options.target,
                options.tolerance
            );
        }

        let iterations = trials.len();
        let (lambda, feature_count, weights) = best.ok_or_else(|| MaxentError::SearchFailed {
            reason: format!("no adaptive L1 trial succeeded in {iterations} iterations"),
        })?;
        info!("adaptive L1 chose λ = {lambda:.6} with {feature_count} active features after {iterations} trials");
        Ok(L1Search { lambda, feature_count, weights, hit_target, iterations, trials })
    }
}

/// Number of features whose largest `|weight|` over `labels` exceeds
/// `threshold`. Weights use the flat `f * num_classes + c` layout.
pub fn count_active_features(weights: &Theta, num_classes: usize, labels: &[usize], threshold: f64) -> usize {
    if num_classes == 0 {
        return 0;
    }
    let num_features = weights.len() / num_classes;
    (0..num_features)
        .filter(|&f| {
            labels
                .iter()
                .map(|&c| weights[f * num_classes + c].abs())
                .fold(0.0, f64::max)
                > threshold
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maxent::{
        core::{objective::LikelihoodMode, prior::LogPrior},
        models::trainer::TrainerOptions,
    };
    use crate::optimization::{
        errors::{OptError, OptResult, SolverFailure},
        minimizer::{DiffFunction, FnEvalMap, Minimizer, MinimizerOptions, OptimOutcome},
    };
    use ndarray::array;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    /// Keeps `floor(1/λ)` features active (class-0 weight 1.0) and fails
    /// with a line-search error for λ above `fail_above`.
    struct Staircase {
        lambda: f64,
        fail_above: f64,
    }

    impl Minimizer for Staircase {
        fn minimize(&mut self, f: &dyn DiffFunction, _tol: f64, _initial: Theta) -> OptResult<OptimOutcome> {
            if self.lambda > self.fail_above {
                return Err(OptError::solver(SolverFailure::ConditionViolated, "no descent step"));
            }
            let mut theta_hat = Theta::zeros(f.domain_dimension());
            let active = ((1.0 / self.lambda).floor() as usize).min(theta_hat.len() / 2);
            for feature in 0..active {
                theta_hat[feature * 2] = 1.0;
            }
            Ok(OptimOutcome {
                theta_hat,
                value: 0.0,
                converged: true,
                status: "staircase".to_string(),
                iterations: 1,
                fn_evals: FnEvalMap::new(),
                grad_norm: None,
            })
        }
    }

    fn sparse_trainer() -> MaxentTrainer {
        let options = TrainerOptions::new(
            LogPrior::null(),
            LikelihoodMode::Conditional,
            1,
            1e-6,
            MinimizerOptions::default(),
        )
        .expect("valid options");
        MaxentTrainer::new(options)
    }

    /// Feature 0 predicts the label; features 1..=noise are coin flips.
    fn one_informative(n: usize, noise: usize, seed: u64) -> DataView {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = Vec::with_capacity(n);
        let mut labels = Vec::with_capacity(n);
        for _ in 0..n {
            let label = usize::from(rng.gen_bool(0.5));
            let mut row: Vec<usize> = (1..=noise).filter(|_| rng.gen_bool(0.5)).collect();
            if rng.gen_bool(if label == 1 { 0.9 } else { 0.1 }) {
                row.push(0);
            }
            data.push(row);
            labels.push(label);
        }
        DataView::new(noise + 1, 2, data, labels, None, None).expect("valid view")
    }

    #[test]
    // Purpose
    // -------
    // Count active features with and without a label restriction.
    //
    // Given
    // -----
    // - 3 features × 2 classes: f0 = [0.5, 0], f1 = [0, 1e-6], f2 = [0, −2].
    //
    // Expect
    // ------
    // - 2 over all labels (f1 under threshold); 1 over label 0 only.
    fn counts_features_above_threshold() {
        let w = array![0.5, 0.0, 0.0, 1e-6, 0.0, -2.0];

        assert_eq!(count_active_features(&w, 2, &[0, 1], 1e-4), 2);
        assert_eq!(count_active_features(&w, 2, &[0], 1e-4), 1);
    }

    #[test]
    // Purpose
    // -------
    // Option builders validate their inputs.
    //
    // Given
    // -----
    // - Inverted λ range, initial λ at the lower bound, zero step, empty
    //   label list, negative threshold.
    //
    // Expect
    // ------
    // - `InvalidOption` each time; defaults validate.
    fn options_validate() {
        let base = AdaptiveL1Options::new(5, 1);
        assert!(base.validate().is_ok());
        assert!(base.clone().with_lambda_range(10.0, 1.0, 5.0).is_err());
        assert!(base.clone().with_lambda_range(0.0, 1.0, 0.0).is_err());
        assert!(base.clone().with_limits(0.0, 10).is_err());
        assert!(base.clone().with_labels(vec![]).is_err());
        assert!(base.with_threshold(-1.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The search reaches a small target on data with one informative
    // feature among many noise features.
    //
    // Given
    // -----
    // - 300 examples, 1 informative + 30 noise features, target 1 ± 1.
    //
    // Expect
    // ------
    // - Target hit within the iteration cap; the informative feature is
    //   among the active ones.
    fn finds_lambda_for_small_target() {
        // Arrange
        let view = one_informative(300, 30, 17);
        let options = AdaptiveL1Options::new(1, 1);

        // Act
        let search = sparse_trainer().train_adaptive_l1(&view, &options).expect("search runs");

        // Assert
        assert!(search.hit_target, "trials: {:?}", search.trials);
        assert!(search.feature_count <= 2);
        assert!(search.iterations <= 20);
        assert_eq!(search.iterations, search.trials.len());
        if search.feature_count > 0 {
            assert!(search.weights[0].abs().max(search.weights[1].abs()) > 1e-4);
        }
    }

    #[test]
    // Purpose
    // -------
    // An unreachable target ends as a soft failure, not an error.
    //
    // Given
    // -----
    // - Target 1000 ± 0 with only 31 features and a 3-iteration cap.
    //
    // Expect
    // ------
    // - `Ok` with `hit_target = false` and exactly 3 trials, λ shrinking.
    fn unreachable_target_is_soft_failure() {
        let view = one_informative(100, 30, 5);
        let options = AdaptiveL1Options::new(1000, 0).with_limits(1e-3, 3).expect("valid");

        let search = sparse_trainer().train_adaptive_l1(&view, &options).expect("soft failure");

        assert!(!search.hit_target);
        assert_eq!(search.trials.len(), 3);
        assert!(search.trials.windows(2).all(|w| w[1].lambda < w[0].lambda));
    }

    #[test]
    // Purpose
    // -------
    // Trials run on minimizers from the trainer's L1 factory, and a trial
    // whose minimizer fails counts as "penalty too strong".
    //
    // Given
    // -----
    // - An L1 factory whose minimizers keep floor(1/λ) features active and
    //   fail for λ > 0.6; target 3 ± 0 starting at λ = 1 in [0, 100].
    //
    // Expect
    // ------
    // - λ sequence 1, 0.5, 0.25, 0.375, 0.3125 with the first trial failed
    //   (`feature_count: None`); the target is hit at λ = 0.3125.
    // - The factory is consulted once per trial.
    fn failed_trials_move_lambda_down_and_search_continues() {
        // Arrange
        let view = one_informative(40, 10, 3);
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let factory = move |lambda: f64| -> OptResult<Staircase> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Staircase { lambda, fail_above: 0.6 })
        };
        let trainer = sparse_trainer().with_l1_factory(Arc::new(factory));
        let options = AdaptiveL1Options::new(3, 0);

        // Act
        let search = trainer.train_adaptive_l1(&view, &options).expect("search runs");

        // Assert
        let lambdas: Vec<f64> = search.trials.iter().map(|t| t.lambda).collect();
        assert_eq!(lambdas, vec![1.0, 0.5, 0.25, 0.375, 0.3125]);
        assert_eq!(search.trials[0], L1Trial { lambda: 1.0, feature_count: None });
        assert!(search.trials[1..].iter().all(|t| t.feature_count.is_some()));
        assert!(search.hit_target);
        assert_eq!((search.lambda, search.feature_count), (0.3125, 3));
        assert_eq!(created.load(Ordering::SeqCst), search.trials.len());
    }

    #[test]
    // Purpose
    // -------
    // When every trial fails there is nothing to return.
    //
    // Given
    // -----
    // - An L1 factory whose minimizers always fail and a 4-iteration cap.
    //
    // Expect
    // ------
    // - `SearchFailed` after recording the failed trials.
    fn all_failed_l1_trials_yield_search_failed() {
        let view = one_informative(40, 10, 3);
        let factory = |lambda: f64| -> OptResult<Staircase> { Ok(Staircase { lambda, fail_above: 0.0 }) };
        let trainer = sparse_trainer().with_l1_factory(Arc::new(factory));
        let options = AdaptiveL1Options::new(3, 0).with_limits(1e-3, 4).expect("valid");

        let result = trainer.train_adaptive_l1(&view, &options);

        assert!(matches!(result, Err(MaxentError::SearchFailed { .. })));
    }
}
