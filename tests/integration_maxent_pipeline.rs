//! Integration tests for maximum-entropy training and regularization tuning.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: from interned string data, through
//!   frozen views, objective evaluation and L-BFGS training, to classifiers,
//!   σ tuning and adaptive L1.
//! - Use small synthetic problems with known structure (separable classes,
//!   one informative feature among many noise features).
//!
//! Coverage
//! --------
//! - `maxent::core`: `Dataset`, `Datum`, `DataView`, `LogPrior`,
//!   `LogConditionalObjective` (gradient check through `check_gradient`).
//! - `maxent::models`: `MaxentTrainer`, `LinearClassifier`, `Accuracy`,
//!   `LogLikelihoodScorer`.
//! - `maxent::tuning`: held-out and cross-validated σ search, adaptive L1.
//!
//! Exclusions
//! ----------
//! - Low-level helpers (index locking, prior formulas, golden-section
//!   mechanics) are covered by unit tests.
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_maxent::{
    maxent::prelude::*,
    optimization::minimizer::{MinimizerOptions, Theta, finite_diff::check_gradient},
};

fn trainer_with(prior: LogPrior, tol: f64) -> MaxentTrainer {
    let options =
        TrainerOptions::new(prior, LikelihoodMode::Conditional, 2, tol, MinimizerOptions::default())
            .expect("valid trainer options");
    MaxentTrainer::new(options)
}

/// Three well-separated classes: each class owns two cue words, and every
/// document also carries one shared word.
fn separable_documents() -> Dataset<String, String> {
    let cues = [("sports", ["goal", "match"]), ("weather", ["rain", "wind"]), ("tech", ["chip", "code"])];
    let mut dataset = Dataset::new();
    for round in 0..4 {
        for (label, words) in &cues {
            let mut features = vec![words[round % 2].to_string(), "the".to_string()];
            if round >= 2 {
                features.push(words[(round + 1) % 2].to_string());
            }
            dataset.add(Datum::new(features, label.to_string())).expect("growable dataset");
        }
    }
    dataset.freeze();
    dataset
}

/// Binary data where feature `0` agrees with the label 90% of the time and
/// features `1..=noise` are independent coin flips.
fn one_informative_feature(n: usize, noise: usize, seed: u64) -> Dataset<usize, u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dataset = Dataset::new();
    for _ in 0..n {
        let label = u8::from(rng.gen_bool(0.5));
        let mut features: Vec<usize> = (1..=noise).filter(|_| rng.gen_bool(0.5)).collect();
        if rng.gen_bool(if label == 1 { 0.9 } else { 0.1 }) {
            features.push(0);
        }
        dataset.add(Datum::new(features, label)).expect("growable dataset");
    }
    dataset.freeze();
    dataset
}

#[test]
// Purpose
// -------
// Train on interned string data and classify unseen documents.
//
// Given
// -----
// - 12 documents in 3 classes, default quadratic prior.
//
// Expect
// ------
// - Each cue word alone predicts its class; unseen words are ignored;
//   class probabilities sum to one.
fn string_dataset_trains_and_classifies() {
    // Arrange
    let dataset = separable_documents();
    let trainer = trainer_with(LogPrior::default(), 1e-6);

    // Act
    let classifier = trainer.train_classifier(&dataset).expect("training succeeds");

    // Assert
    for (word, label) in [("goal", "sports"), ("wind", "weather"), ("code", "tech")] {
        let doc = Datum::new(vec![word.to_string(), "unseen".to_string()], String::new());
        assert_eq!(classifier.class_of(&doc).expect("classifies"), label);
    }
    let doc = Datum::new(vec!["rain".to_string()], String::new());
    let total: f64 = ["sports", "weather", "tech"]
        .iter()
        .map(|l| classifier.probability_of(&doc, &l.to_string()).expect("known label"))
        .sum();
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
// Purpose
// -------
// Unregularized training separates separable data.
//
// Given
// -----
// - The separable documents, `Null` prior, tight tolerance.
//
// Expect
// ------
// - 100% training accuracy and a mean loss below 0.05.
fn separable_data_with_null_prior_fits_exactly() {
    // Arrange
    let dataset = separable_documents();
    let view = dataset.view().expect("frozen");
    let trainer = trainer_with(LogPrior::null(), 1e-10);

    // Act
    let outcome = trainer.train_outcome(&view, &LogPrior::null(), None).expect("training succeeds");

    // Assert
    let model = LinearModel::from_flat(&outcome.theta_hat, view.num_features(), view.num_classes())
        .expect("weights reshape");
    assert_eq!(Accuracy.score(&model, &view), 1.0);
    let mean_loss = outcome.value / (view.len() as f64);
    assert!(mean_loss < 0.05, "mean loss {mean_loss}");
    assert!(-LogLikelihoodScorer.score(&model, &view) < 0.05);
}

#[test]
// Purpose
// -------
// The analytic gradient of the full objective matches finite differences.
//
// Given
// -----
// - The noisy binary dataset, a Huber prior, a random point.
//
// Expect
// ------
// - Max relative error below 1e-5.
fn objective_gradient_matches_finite_differences() {
    let dataset = one_informative_feature(60, 8, 4);
    let view = dataset.view().expect("frozen");
    let prior = LogPrior::huber(1.5, 0.1).expect("valid prior");
    let objective = LogConditionalObjective::new(&view, prior).expect("objective");
    let mut rng = StdRng::seed_from_u64(9);
    let x: Theta = (0..view.dimension()).map(|_| rng.gen_range(-0.5..0.5)).collect();

    let check = check_gradient(&objective, &x).expect("gradient check runs");

    assert!(check.max_relative_error < 1e-5, "worst: {check:?}");
}

#[test]
// Purpose
// -------
// Held-out σ search is deterministic under a fixed split seed.
//
// Given
// -----
// - 200 noisy examples, seed 42, two independent runs.
//
// Expect
// ------
// - Identical σ, score and trial sequence.
fn held_out_sigma_search_is_deterministic() {
    // Arrange
    let dataset = one_informative_feature(200, 10, 1);
    let trainer = trainer_with(LogPrior::default(), 1e-6);
    let opts = SigmaSearchOptions::default().with_seed(42);

    // Act
    let first = trainer.held_out_set_sigma_split(&dataset, &LogLikelihoodScorer, &opts).expect("search");
    let second = trainer.held_out_set_sigma_split(&dataset, &LogLikelihoodScorer, &opts).expect("search");

    // Assert
    assert_eq!(first.sigma, second.sigma);
    assert_eq!(first.score, second.score);
    assert_eq!(first.trials, second.trials);
    assert!((0.1..=10.0).contains(&first.sigma));
}

#[test]
// Purpose
// -------
// Cross-validated σ tuning followed by final training yields a useful model.
//
// Given
// -----
// - 160 noisy examples, 4 folds, warm-started final training.
//
// Expect
// ------
// - σ in the bracket; training accuracy of the final model ≥ 0.75 (the
//   informative feature alone gives ~0.9).
fn cross_validated_tuning_trains_final_classifier() {
    // Arrange
    let dataset = one_informative_feature(160, 10, 8);
    let trainer = trainer_with(LogPrior::default(), 1e-6);
    let opts = SigmaSearchOptions::new(0.1, 10.0, 0.1).expect("valid").with_folds(4).expect("valid folds");

    // Act
    let (classifier, tuning) =
        trainer.train_classifier_tuned_sigma(&dataset, &LogLikelihoodScorer, &opts).expect("tuning");

    // Assert
    assert!((0.1..=10.0).contains(&tuning.sigma));
    assert!(!tuning.trials.is_empty());
    let view = dataset.view().expect("frozen");
    assert!(Accuracy.score(classifier.model(), &view) >= 0.75);
}

#[test]
// Purpose
// -------
// Adaptive L1 finds a sparse model among many redundant features.
//
// Given
// -----
// - 400 examples with 1 informative and 50 noise features, `Null` smooth
//   prior, target 1 ± 1.
//
// Expect
// ------
// - The target is hit within 20 iterations.
fn adaptive_l1_reaches_target_sparsity() {
    // Arrange
    let dataset = one_informative_feature(400, 50, 21);
    let view = dataset.view().expect("frozen");
    let trainer = trainer_with(LogPrior::null(), 1e-6);
    let options = AdaptiveL1Options::new(1, 1);

    // Act
    let search = trainer.train_adaptive_l1(&view, &options).expect("search runs");

    // Assert
    assert!(search.hit_target, "trials: {:?}", search.trials);
    assert!(search.feature_count <= 2);
    assert!(search.iterations <= 20);
}
