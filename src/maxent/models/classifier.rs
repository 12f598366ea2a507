//! Trained linear models and the classifier facade over them.
//!
//! Purpose
//! -------
//! Turn the flat weight vector produced by training into something that
//! scores examples: [`LinearModel`] works on integer ids, and
//! [`LinearClassifier`] adds the frozen feature/label indices so callers can
//! classify [`Datum`] values and get labels back.
//!
//! Key behaviors
//! -------------
//! - [`to_weight_matrix`] reshapes a flat vector (`f * C + c`) into a
//!   `num_features × num_classes` matrix.
//! - `score_of(example, c) = Σ_f w[f, c]·v(f) + threshold[c]`.
//! - `class_of` is the argmax of the scores (lowest id on ties);
//!   `probability_of` is the softmax of the scores.
//!
//! Conventions
//! -----------
//! - Feature ids outside the model (and, in [`LinearClassifier`], unseen
//!   feature identifiers) are ignored when scoring.
//! - Thresholds, when present, are per-label additive offsets.
use crate::{
    maxent::{
        core::{
            dataset::{Datum, Example},
            index::{FeatureIndex, LabelIndex},
        },
        errors::{MaxentError, MaxentResult},
    },
    optimization::{minimizer::Theta, numerical_stability::log_sum_exp},
};
use ndarray::{Array1, Array2};
use std::{fmt::Debug, hash::Hash, sync::Arc};

/// Reshape a flat weight vector into a `num_features × num_classes` matrix.
///
/// # Errors
/// - [`MaxentError::DimensionMismatch`] when
///   `flat.len() != num_features * num_classes`.
pub fn to_weight_matrix(flat: &Theta, num_features: usize, num_classes: usize) -> MaxentResult<Array2<f64>> {
    let mismatch = || MaxentError::DimensionMismatch {
        what: "flat weights",
        expected: num_features * num_classes,
        found: flat.len(),
    };
    if flat.len() != num_features * num_classes {
        return Err(mismatch());
    }
    Array2::from_shape_vec((num_features, num_classes), flat.to_vec()).map_err(|_| mismatch())
}

/// Weight matrix plus optional per-label thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    weights: Array2<f64>,
    thresholds: Option<Array1<f64>>,
}

impl LinearModel {
    /// # Errors
    /// - [`MaxentError::DimensionMismatch`] for a matrix without classes.
    pub fn new(weights: Array2<f64>) -> MaxentResult<Self> {
        if weights.ncols() == 0 {
            return Err(MaxentError::DimensionMismatch { what: "classes", expected: 1, found: 0 });
        }
        Ok(Self { weights, thresholds: None })
    }

    pub fn from_flat(flat: &Theta, num_features: usize, num_classes: usize) -> MaxentResult<Self> {
        Self::new(to_weight_matrix(flat, num_features, num_classes)?)
    }

    /// # Errors
    /// - [`MaxentError::DimensionMismatch`] unless there is one threshold
    ///   per class.
    pub fn with_thresholds(mut self, thresholds: Array1<f64>) -> MaxentResult<Self> {
        if thresholds.len() != self.num_classes() {
            return Err(MaxentError::DimensionMismatch {
                what: "thresholds",
                expected: self.num_classes(),
                found: thresholds.len(),
            });
        }
        self.thresholds = Some(thresholds);
        Ok(self)
    }

    pub fn num_features(&self) -> usize {
        self.weights.nrows()
    }

    pub fn num_classes(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn thresholds(&self) -> Option<&Array1<f64>> {
        self.thresholds.as_ref()
    }

    /// Score of every class for `example`.
    pub fn scores(&self, example: Example<'_>) -> Array1<f64> {
        let mut scores = match &self.thresholds {
            Some(t) => t.clone(),
            None => Array1::zeros(self.num_classes()),
        };
        for (f, v) in example.iter() {
            if f < self.num_features() {
                scores.scaled_add(v, &self.weights.row(f));
            }
        }
        scores
    }

    pub fn score_of(&self, example: Example<'_>, label: usize) -> Option<f64> {
        (label < self.num_classes()).then(|| self.scores(example)[label])
    }

    /// Argmax class; the lowest id wins ties.
    pub fn class_of(&self, example: Example<'_>) -> usize {
        argmax(&self.scores(example))
    }

    /// Softmax of the scores.
    pub fn probabilities(&self, example: Example<'_>) -> Array1<f64> {
        let scores = self.scores(example);
        let total = log_sum_exp(&scores.to_vec());
        scores.mapv(|s| (s - total).exp())
    }

    pub fn probability_of(&self, example: Example<'_>, label: usize) -> Option<f64> {
        self.log_probability_of(example, label).map(f64::exp)
    }

    pub fn log_probability_of(&self, example: Example<'_>, label: usize) -> Option<f64> {
        if label >= self.num_classes() {
            return None;
        }
        let scores = self.scores(example).to_vec();
        Some(scores[label] - log_sum_exp(&scores))
    }
}

/// Linear model bound to the indices it was trained with.
#[derive(Debug, Clone)]
pub struct LinearClassifier<F: Eq + Hash, L: Eq + Hash> {
    model: LinearModel,
    features: Arc<FeatureIndex<F>>,
    labels: Arc<LabelIndex<L>>,
}

impl<F, L> LinearClassifier<F, L>
where
    F: Eq + Hash + Clone + Debug,
    L: Eq + Hash + Clone + Debug,
{
    /// # Errors
    /// - [`MaxentError::DimensionMismatch`] when the model's shape differs
    ///   from the index sizes.
    pub fn new(
        model: LinearModel, features: Arc<FeatureIndex<F>>, labels: Arc<LabelIndex<L>>,
    ) -> MaxentResult<Self> {
        if model.num_features() != features.len() {
            return Err(MaxentError::DimensionMismatch {
                what: "model features",
                expected: features.len(),
                found: model.num_features(),
            });
        }
        if model.num_classes() != labels.len() {
            return Err(MaxentError::DimensionMismatch {
                what: "model classes",
                expected: labels.len(),
                found: model.num_classes(),
            });
        }
        Ok(Self { model, features, labels })
    }

    /// Build from a flat weight vector over the given indices.
    pub fn from_weights(
        flat: &Theta, features: Arc<FeatureIndex<F>>, labels: Arc<LabelIndex<L>>,
    ) -> MaxentResult<Self> {
        let model = LinearModel::from_flat(flat, features.len(), labels.len())?;
        Self::new(model, features, labels)
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn feature_index(&self) -> &Arc<FeatureIndex<F>> {
        &self.features
    }

    pub fn label_index(&self) -> &Arc<LabelIndex<L>> {
        &self.labels
    }

    /// Scores in label-id order; the datum's own label is ignored.
    pub fn scores(&self, datum: &Datum<F, L>) -> MaxentResult<Array1<f64>> {
        let (ids, values) = self.encode(datum)?;
        Ok(self.model.scores(Example { features: &ids, values: Some(&values) }))
    }

    pub fn score_of(&self, datum: &Datum<F, L>, label: &L) -> MaxentResult<f64> {
        let id = self.label_id(label)?;
        Ok(self.scores(datum)?[id])
    }

    pub fn class_of(&self, datum: &Datum<F, L>) -> MaxentResult<&L> {
        let id = argmax(&self.scores(datum)?);
        self.labels.get(id).ok_or_else(|| MaxentError::UnknownItem { item: id.to_string() })
    }

    pub fn probability_of(&self, datum: &Datum<F, L>, label: &L) -> MaxentResult<f64> {
        let id = self.label_id(label)?;
        let (ids, values) = self.encode(datum)?;
        let example = Example { features: &ids, values: Some(&values) };
        self.model
            .probability_of(example, id)
            .ok_or_else(|| MaxentError::UnknownItem { item: format!("{label:?}") })
    }

    // ---- Helper Methods ----

    fn label_id(&self, label: &L) -> MaxentResult<usize> {
        self.labels.index_of(label).ok_or_else(|| MaxentError::UnknownItem { item: format!("{label:?}") })
    }

    /// Map known features to ids with their values; unseen ones are dropped.
    fn encode(&self, datum: &Datum<F, L>) -> MaxentResult<(Vec<usize>, Vec<f64>)> {
        if let Some(values) = &datum.values {
            if values.len() != datum.features.len() {
                return Err(MaxentError::SizeMismatch {
                    what: "datum values",
                    expected: datum.features.len(),
                    found: values.len(),
                });
            }
        }
        let mut ids = Vec::with_capacity(datum.features.len());
        let mut values = Vec::with_capacity(datum.features.len());
        for (j, feature) in datum.features.iter().enumerate() {
            if let Some(id) = self.features.index_of(feature) {
                ids.push(id);
                values.push(datum.values.as_ref().map_or(1.0, |v| v[j]));
            }
        }
        Ok((ids, values))
    }
}

fn argmax(scores: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}
