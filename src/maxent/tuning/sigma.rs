//! Prior-width (σ) tuning by golden-section search.
//!
//! Purpose
//! -------
//! Choose the σ of the trainer's configured prior by maximizing a
//! [`Scorer`] on held-out data, either a single train/dev split or the
//! mean over k contiguous cross-validation folds.
//!
//! Key behaviors
//! -------------
//! - The searched objective is `−score(σ)`; each evaluation retrains with
//!   `prior.with_sigma(σ)`.
//! - With `warm_start`, each trial starts from the previous trial's weights
//!   (one slot per fold under cross-validation, so parallel folds never
//!   share state).
//! - A trial whose training fails with an optimization or numerical error
//!   is logged with `warn!`, recorded as failed, and scored `−∞`; the search
//!   continues. Configuration errors abort the search.
//! - The interim weights of the best trial are returned for warm-starting
//!   final training. Under cross-validation they are the mean of the fold
//!   weights at the best σ.
//!
//! Invariants & assumptions
//! ------------------------
//! - The configured prior must accept `with_sigma` (not `Null` or
//!   `MultipleQuadratic`).
//! - Train and evaluation views share one feature/label space.
use crate::{
    maxent::{
        core::{
            dataset::{DataView, Dataset},
            prior::LogPrior,
        },
        errors::{MaxentError, MaxentResult},
        models::{
            classifier::{LinearClassifier, LinearModel},
            scorer::Scorer,
            trainer::MaxentTrainer,
        },
        tuning::{
            cross_validation::CrossValidator, golden_section::GoldenSectionSearch, is_recoverable,
        },
    },
    optimization::minimizer::Theta,
};
use log::{debug, info, warn};
use std::{
    fmt::Debug,
    hash::Hash,
    sync::{Arc, Mutex, PoisonError},
};

/// Options for the σ searches.
///
/// Fields:
/// - `sigma_min`, `sigma_max`: search bracket (default `[0.1, 10.0]`).
/// - `tol`: bracket width at which the search stops, measured in `ln σ`
///   when `geometric` (default `1e-2`).
/// - `geometric`: search on a log scale (default `true`).
/// - `warm_start`: start each trial from the previous weights (default
///   `true`).
/// - `retrain_from_scratch`: final training ignores the interim weights
///   (default `false`).
/// - `held_out_fraction`: dev share for split-based tuning (default `0.3`).
/// - `seed`: shuffle seed for the split; `None` holds out the tail.
/// - `folds`: cross-validate with this many folds instead of splitting
///   (used by `train_classifier_tuned_sigma`; default `None`).
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaSearchOptions {
    pub sigma_min: f64,
    pub sigma_max: f64,
    pub tol: f64,
    pub geometric: bool,
    pub warm_start: bool,
    pub retrain_from_scratch: bool,
    pub held_out_fraction: f64,
    pub seed: Option<u64>,
    pub folds: Option<usize>,
}

impl SigmaSearchOptions {
    /// Defaults with a custom bracket and tolerance.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidOption`] for a bracket that is not
    ///   `0 < sigma_min < sigma_max < ∞` or a non-positive `tol`.
    pub fn new(sigma_min: f64, sigma_max: f64, tol: f64) -> MaxentResult<Self> {
        let opts = Self { sigma_min, sigma_max, tol, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    /// # Errors
    /// - [`MaxentError::InvalidOption`] unless `0 < fraction < 1`.
    pub fn with_held_out_fraction(mut self, fraction: f64) -> MaxentResult<Self> {
        self.held_out_fraction = fraction;
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    /// - [`MaxentError::InvalidOption`] for fewer than two folds.
    pub fn with_folds(mut self, folds: usize) -> MaxentResult<Self> {
        self.folds = Some(folds);
        self.validate()?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.warm_start = warm_start;
        self
    }

    pub fn with_retrain_from_scratch(mut self, retrain: bool) -> Self {
        self.retrain_from_scratch = retrain;
        self
    }

    pub fn with_geometric(mut self, geometric: bool) -> Self {
        self.geometric = geometric;
        self
    }

    /// Check every field; the searches call this before running.
    pub fn validate(&self) -> MaxentResult<()> {
        if !(self.sigma_min.is_finite() && self.sigma_min > 0.0) {
            return Err(invalid("sigma_min", self.sigma_min, "sigma_min must be finite and > 0"));
        }
        if !(self.sigma_max.is_finite() && self.sigma_max > self.sigma_min) {
            return Err(invalid("sigma_max", self.sigma_max, "sigma_max must be finite and > sigma_min"));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(invalid("tol", self.tol, "search tolerance must be finite and > 0"));
        }
        if !(self.held_out_fraction > 0.0 && self.held_out_fraction < 1.0) {
            return Err(invalid(
                "held_out_fraction",
                self.held_out_fraction,
                "held-out fraction must lie in (0, 1)",
            ));
        }
        if let Some(k) = self.folds.filter(|&k| k < 2) {
            return Err(invalid("folds", k as f64, "cross-validation needs at least 2 folds"));
        }
        Ok(())
    }
}

impl Default for SigmaSearchOptions {
    fn default() -> Self {
        Self {
            sigma_min: 0.1,
            sigma_max: 10.0,
            tol: 1e-2,
            geometric: true,
            warm_start: true,
            retrain_from_scratch: false,
            held_out_fraction: 0.3,
            seed: None,
            folds: None,
        }
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> MaxentError {
    MaxentError::InvalidOption { name, value, reason }
}

/// One evaluated σ. `score` is `−∞` and `failed` is set when training
/// failed for that σ.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaTrial {
    pub sigma: f64,
    pub score: f64,
    pub failed: bool,
}

/// Result of a σ search.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaTuning {
    /// Best σ found.
    pub sigma: f64,
    /// Scorer value at `sigma` (higher is better).
    pub score: f64,
    /// Interim weights trained at `sigma`.
    pub weights: Theta,
    /// Every trial in evaluation order.
    pub trials: Vec<SigmaTrial>,
}

impl MaxentTrainer {
    /// Tune σ on an explicit train/dev pair.
    ///
    /// # Errors
    /// - Option validation errors; [`MaxentError::EmptyDataset`] for an empty
    ///   train or dev view; [`MaxentError::DimensionMismatch`] when the two
    ///   views disagree on the feature/label space.
    /// - [`MaxentError::InvalidPrior`] when the configured prior has no σ.
    /// - [`MaxentError::SearchFailed`] when every trial failed.
    pub fn held_out_set_sigma(
        &self, train: &DataView, dev: &DataView, scorer: &dyn Scorer, opts: &SigmaSearchOptions,
    ) -> MaxentResult<SigmaTuning> {
        if dev.is_empty() || train.is_empty() {
            return Err(MaxentError::EmptyDataset);
        }
        check_same_space(train, dev)?;
        let (nf, nc) = (train.num_features(), train.num_classes());
        let mut warm: Option<Theta> = None;
        self.search_sigma(opts, "held-out", |prior| {
            let initial = if opts.warm_start { warm.as_ref() } else { None };
            let weights = self.train_weights(train, prior, initial)?;
            let score = scorer.score(&LinearModel::from_flat(&weights, nf, nc)?, dev);
            if opts.warm_start {
                warm = Some(weights.clone());
            }
            Ok((score, weights))
        })
    }

    /// Split `dataset` by `opts.held_out_fraction` (shuffled when
    /// `opts.seed` is set) and tune σ on the split.
    pub fn held_out_set_sigma_split<F, L>(
        &self, dataset: &Dataset<F, L>, scorer: &dyn Scorer, opts: &SigmaSearchOptions,
    ) -> MaxentResult<SigmaTuning>
    where
        F: Eq + Hash + Clone + Debug,
        L: Eq + Hash + Clone + Debug,
    {
        opts.validate()?;
        let (train, dev) = dataset.split(opts.held_out_fraction, opts.seed)?;
        self.held_out_set_sigma(&train.view()?, &dev.view()?, scorer, opts)
    }

    /// Tune σ by mean scorer value over `k` contiguous folds of `view`.
    /// Folds train in parallel, each with a fresh minimizer.
    ///
    /// # Errors
    /// - As [`MaxentTrainer::held_out_set_sigma`], plus
    ///   [`MaxentError::InvalidOption`] unless `2 <= k <= view.len()`.
    pub fn cross_validate_set_sigma(
        &self, view: &DataView, k: usize, scorer: &dyn Scorer, opts: &SigmaSearchOptions,
    ) -> MaxentResult<SigmaTuning> {
        let validator = CrossValidator::new(k, view.len())?;
        let splits = validator.splits(view)?;
        let (nf, nc) = (view.num_features(), view.num_classes());
        let slots: Vec<Mutex<Option<Theta>>> = (0..k).map(|_| Mutex::new(None)).collect();
        self.search_sigma(opts, "cross-validated", |prior| {
            let per_fold = CrossValidator::run(&splits, |i, train, held| {
                let initial = if opts.warm_start {
                    slots[i].lock().unwrap_or_else(PoisonError::into_inner).clone()
                } else {
                    None
                };
                let weights = self.train_weights(train, prior, initial.as_ref())?;
                let score = scorer.score(&LinearModel::from_flat(&weights, nf, nc)?, held);
                if opts.warm_start {
                    *slots[i].lock().unwrap_or_else(PoisonError::into_inner) = Some(weights.clone());
                }
                Ok((score, weights))
            })?;
            let mut mean_weights = Theta::zeros(view.dimension());
            let mut mean_score = 0.0;
            for (score, weights) in &per_fold {
                mean_score += score;
                mean_weights += weights;
            }
            let folds = per_fold.len() as f64;
            mean_weights /= folds;
            Ok((mean_score / folds, mean_weights))
        })
    }

    /// Tune σ (cross-validated when `opts.folds` is set, otherwise on a
    /// held-out split), then train on the whole dataset at that σ.
    ///
    /// Final training warm-starts from the interim weights unless
    /// `opts.retrain_from_scratch`.
    pub fn train_classifier_tuned_sigma<F, L>(
        &self, dataset: &Dataset<F, L>, scorer: &dyn Scorer, opts: &SigmaSearchOptions,
    ) -> MaxentResult<(LinearClassifier<F, L>, SigmaTuning)>
    where
        F: Eq + Hash + Clone + Debug,
        L: Eq + Hash + Clone + Debug,
    {
        opts.validate()?;
        let view = dataset.view()?;
        let tuning = match opts.folds {
            Some(k) => self.cross_validate_set_sigma(&view, k, scorer, opts)?,
            None => self.held_out_set_sigma_split(dataset, scorer, opts)?,
        };
        let prior = self.options().prior.with_sigma(tuning.sigma)?;
        let initial = if opts.retrain_from_scratch { None } else { Some(&tuning.weights) };
        let weights = self.train_weights(&view, &prior, initial)?;
        info!("final model trained at σ = {:.4} on {} examples", tuning.sigma, view.len());
        let classifier = LinearClassifier::from_weights(
            &weights,
            Arc::clone(dataset.feature_index()),
            Arc::clone(dataset.label_index()),
        )?;
        Ok((classifier, tuning))
    }

    /// Golden-section search over σ. `trial` trains and scores one prior,
    /// returning `(score, interim weights)`.
    fn search_sigma<T>(
        &self, opts: &SigmaSearchOptions, label: &str, mut trial: T,
    ) -> MaxentResult<SigmaTuning>
    where
        T: FnMut(&LogPrior) -> MaxentResult<(f64, Theta)>,
    {
        opts.validate()?;
        let template = &self.options().prior;
        template.with_sigma(opts.sigma_min)?;
        let search = GoldenSectionSearch::new(opts.tol, opts.geometric)?;

        let mut trials = Vec::new();
        let mut best: Option<(f64, f64, Theta)> = None;
        search.minimize(opts.sigma_min, opts.sigma_max, |sigma| {
            let prior = template.with_sigma(sigma)?;
            match trial(&prior) {
                Ok((score, weights)) => {
                    let score = if score.is_nan() { f64::NEG_INFINITY } else { score };
                    debug!("{label} sigma trial σ = {sigma:.4}: score {score:.6}");
                    trials.push(SigmaTrial { sigma, score, failed: false });
                    if best.as_ref().is_none_or(|(_, s, _)| score > *s) {
                        best = Some((sigma, score, weights));
                    }
                    Ok(-score)
                }
                Err(err) if is_recoverable(&err) => {
                    warn!("{label} sigma trial σ = {sigma:.4} failed, scoring it as worst: {err}");
                    trials.push(SigmaTrial { sigma, score: f64::NEG_INFINITY, failed: true });
                    Ok(f64::INFINITY)
                }
                Err(err) => Err(err),
            }
        })?;

        let (sigma, score, weights) = best.ok_or_else(|| MaxentError::SearchFailed {
            reason: format!("every {label} sigma trial failed ({} trials)", trials.len()),
        })?;
        info!("{label} sigma search chose σ = {sigma:.4} (score {score:.6}) after {} trials", trials.len());
        Ok(SigmaTuning { sigma, score, weights, trials })
    }
}

fn check_same_space(train: &DataView, eval: &DataView) -> MaxentResult<()> {
    if train.num_features() != eval.num_features() {
        return Err(MaxentError::DimensionMismatch {
            what: "evaluation features",
            expected: train.num_features(),
            found: eval.num_features(),
        });
    }
    if train.num_classes() != eval.num_classes() {
        return Err(MaxentError::DimensionMismatch {
            what: "evaluation classes",
            expected: train.num_classes(),
            found: eval.num_classes(),
        });
    }
    Ok(())
}
