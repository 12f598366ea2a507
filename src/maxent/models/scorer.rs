//! Scorers used to compare trained models on evaluation data.
//!
//! A [`Scorer`] maps a model and an evaluation view to a number where
//! higher is better. Regularization searches minimize the negated score.
use crate::maxent::{core::dataset::DataView, models::classifier::LinearModel};

/// Model quality on an evaluation set; higher is better.
pub trait Scorer: Send + Sync {
    fn score(&self, model: &LinearModel, eval: &DataView) -> f64;

    fn name(&self) -> &'static str;
}

/// Fraction of examples whose argmax class is the gold label.
///
/// An empty evaluation set scores 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy;

impl Scorer for Accuracy {
    fn score(&self, model: &LinearModel, eval: &DataView) -> f64 {
        if eval.is_empty() {
            return 0.0;
        }
        let correct =
            (0..eval.len()).filter(|&d| model.class_of(eval.example(d)) == eval.label(d)).count();
        correct as f64 / eval.len() as f64
    }

    fn name(&self) -> &'static str {
        "accuracy"
    }
}

/// Example-weighted mean log probability of the gold label.
///
/// An empty (or zero-weight) evaluation set scores `-∞`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogLikelihoodScorer;

impl Scorer for LogLikelihoodScorer {
    fn score(&self, model: &LinearModel, eval: &DataView) -> f64 {
        let mut total = 0.0;
        let mut mass = 0.0;
        for d in 0..eval.len() {
            let w = eval.weight(d);
            if w == 0.0 {
                continue;
            }
            let log_p =
                model.log_probability_of(eval.example(d), eval.label(d)).unwrap_or(f64::NEG_INFINITY);
            total += w * log_p;
            mass += w;
        }
        if mass == 0.0 { f64::NEG_INFINITY } else { total / mass }
    }

    fn name(&self) -> &'static str {
        "log-likelihood"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn two_feature_view() -> DataView {
        DataView::new(2, 2, vec![vec![0], vec![1], vec![0]], vec![0, 1, 1], None, None).expect("view")
    }

    #[test]
    // Purpose
    // -------
    // Check accuracy on a model that gets two of three examples right.
    //
    // Given
    // -----
    // - f0 → class 0, f1 → class 1; gold labels [0, 1, 1].
    //
    // Expect
    // ------
    // - Accuracy 2/3; empty view scores 0.
    fn accuracy_counts_argmax_hits() {
        let model = LinearModel::new(array![[1.0, 0.0], [0.0, 1.0]]).expect("model");

        let score = Accuracy.score(&model, &two_feature_view());

        assert_relative_eq!(score, 2.0 / 3.0);
        let empty = DataView::new(2, 2, vec![], vec![], None, None).expect("empty view");
        assert_eq!(Accuracy.score(&model, &empty), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the log-likelihood scorer against hand-computed values.
    //
    // Given
    // -----
    // - Same model and view; p(correct) = σ(1), p(wrong) = σ(−1).
    //
    // Expect
    // ------
    // - Mean of [ln σ(1), ln σ(1), ln σ(−1)].
    fn log_likelihood_is_mean_gold_log_probability() {
        let model = LinearModel::new(array![[1.0, 0.0], [0.0, 1.0]]).expect("model");
        let hit = -(1.0 + (-1.0f64).exp()).ln();
        let miss = -(1.0 + 1.0f64.exp()).ln();

        let score = LogLikelihoodScorer.score(&model, &two_feature_view());

        assert_relative_eq!(score, (2.0 * hit + miss) / 3.0, max_relative = 1e-14);
        assert!(score < 0.0);
    }
}
