//! Sparse examples, the in-memory dataset, and the frozen data view.
//!
//! Purpose
//! -------
//! Provide the dataset contract consumed by the objective function: a
//! read-only [`DataView`] of integer-indexed sparse examples, plus a small
//! builder ([`Dataset`]) that interns feature/label identifiers while
//! examples are added and freezes them before training.
//!
//! Key behaviors
//! -------------
//! - [`Datum`] is one example as the caller sees it: opaque features,
//!   optional real values, a label and a weight (default 1.0).
//! - [`Dataset::add`] interns identifiers through its feature and label
//!   [`Index`]es; [`Dataset::freeze`] locks both.
//! - [`Dataset::view`] produces a validated [`DataView`] and refuses to do so
//!   until the indices are frozen.
//! - [`Dataset::split`] / [`Dataset::fold`] and the matching
//!   [`DataView::subset`] / [`DataView::fold`] carve out train / held-out
//!   parts that share the parent's indices.
//!
//! Invariants & assumptions
//! ------------------------
//! - `labels.len() == data.len()`; when present, `values` has one row per
//!   example and `values[d].len() == data[d].len()`; `weights.len() ==
//!   data.len()`.
//! - Every feature id is `< num_features`, every label id `< num_classes`.
//! - Real feature values are finite; example weights are finite and ≥ 0.
//! - A view never changes after construction.
//!
//! Conventions
//! -----------
//! - Binary features carry an implicit value of 1.0; a view stores `values`
//!   only when at least one example supplied real values.
//! - A view stores `weights` only when at least one weight differs from 1.0.
//! - Splits are deterministic: without a seed the first examples are used for
//!   training and the tail is held out; with a seed the order is shuffled by
//!   `StdRng::seed_from_u64(seed)` first.
//!
//! Testing notes
//! -------------
//! - Unit tests cover view validation (size and range checks), freezing,
//!   interning with real values, weights, and the split/fold helpers.
use crate::maxent::{
    core::index::{FeatureIndex, Index, LabelIndex},
    errors::{MaxentError, MaxentResult},
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::{fmt::Debug, hash::Hash, sync::Arc};

/// One training or evaluation example over opaque identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Datum<F, L> {
    pub features: Vec<F>,
    /// Real values aligned with `features`; `None` means all 1.0.
    pub values: Option<Vec<f64>>,
    pub label: L,
    pub weight: f64,
}

impl<F, L> Datum<F, L> {
    /// Binary-feature example with weight 1.0.
    pub fn new(features: Vec<F>, label: L) -> Self {
        Self { features, values: None, label, weight: 1.0 }
    }

    /// Real-valued example with weight 1.0.
    ///
    /// # Errors
    /// - [`MaxentError::SizeMismatch`] when `values.len() != features.len()`.
    pub fn with_values(features: Vec<F>, values: Vec<f64>, label: L) -> MaxentResult<Self> {
        if values.len() != features.len() {
            return Err(MaxentError::SizeMismatch {
                what: "datum values",
                expected: features.len(),
                found: values.len(),
            });
        }
        Ok(Self { features, values: Some(values), label, weight: 1.0 })
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Borrowed sparse row: feature ids with optional aligned values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Example<'a> {
    pub features: &'a [usize],
    pub values: Option<&'a [f64]>,
}

impl<'a> Example<'a> {
    /// `(feature id, value)` pairs, with 1.0 for binary features.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        let (features, values) = (self.features, self.values);
        features
            .iter()
            .enumerate()
            .map(move |(j, &f)| (f, values.map_or(1.0, |v| v[j])))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Validated, read-only, integer-indexed training data.
///
/// Fields
/// ------
/// - `num_features`, `num_classes`: sizes of the frozen indices; the weight
///   vector of a model over this view has `num_features * num_classes`
///   entries.
/// - `data[d]`: active feature ids of example `d`.
/// - `labels[d]`: gold label id of example `d`.
/// - `values`: optional real values aligned with `data`.
/// - `weights`: optional per-example weights.
#[derive(Debug, Clone, PartialEq)]
pub struct DataView {
    num_features: usize,
    num_classes: usize,
    data: Vec<Vec<usize>>,
    labels: Vec<usize>,
    values: Option<Vec<Vec<f64>>>,
    weights: Option<Vec<f64>>,
}

impl DataView {
    /// Construct a validated view.
    ///
    /// # Errors
    /// - [`MaxentError::SizeMismatch`] for label, value-row, value-length or
    ///   weight counts that disagree with `data`.
    /// - [`MaxentError::FeatureOutOfRange`] / [`MaxentError::LabelOutOfRange`]
    ///   for ids outside the index sizes.
    /// - [`MaxentError::NonFiniteValue`] / [`MaxentError::InvalidExampleWeight`]
    ///   for non-finite values or negative/non-finite weights.
    pub fn new(
        num_features: usize, num_classes: usize, data: Vec<Vec<usize>>, labels: Vec<usize>,
        values: Option<Vec<Vec<f64>>>, weights: Option<Vec<f64>>,
    ) -> MaxentResult<Self> {
        let n = data.len();
        if labels.len() != n {
            return Err(MaxentError::SizeMismatch { what: "labels", expected: n, found: labels.len() });
        }
        if let Some(values) = &values {
            if values.len() != n {
                return Err(MaxentError::SizeMismatch {
                    what: "value rows",
                    expected: n,
                    found: values.len(),
                });
            }
            for (example, (row, feats)) in values.iter().zip(data.iter()).enumerate() {
                if row.len() != feats.len() {
                    return Err(MaxentError::SizeMismatch {
                        what: "values of an example",
                        expected: feats.len(),
                        found: row.len(),
                    });
                }
                if let Some((position, &value)) = row.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                    return Err(MaxentError::NonFiniteValue { example, position, value });
                }
            }
        }
        if let Some(weights) = &weights {
            if weights.len() != n {
                return Err(MaxentError::SizeMismatch {
                    what: "example weights",
                    expected: n,
                    found: weights.len(),
                });
            }
            if let Some((example, &value)) =
                weights.iter().enumerate().find(|(_, w)| !w.is_finite() || **w < 0.0)
            {
                return Err(MaxentError::InvalidExampleWeight { example, value });
            }
        }
        for (example, (feats, &label)) in data.iter().zip(labels.iter()).enumerate() {
            if label >= num_classes {
                return Err(MaxentError::LabelOutOfRange { example, label, num_classes });
            }
            if let Some(&feature) = feats.iter().find(|&&f| f >= num_features) {
                return Err(MaxentError::FeatureOutOfRange { example, feature, num_features });
            }
        }
        Ok(Self { num_features, num_classes, data, labels, values, weights })
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Length of a flat weight vector over this view.
    pub fn dimension(&self) -> usize {
        self.num_features * self.num_classes
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[Vec<usize>] {
        &self.data
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn values(&self) -> Option<&[Vec<f64>]> {
        self.values.as_deref()
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn label(&self, d: usize) -> usize {
        self.labels[d]
    }

    /// Weight of example `d` (1.0 when the view carries no weights).
    pub fn weight(&self, d: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[d])
    }

    pub fn example(&self, d: usize) -> Example<'_> {
        Example {
            features: &self.data[d],
            values: self.values.as_ref().map(|v| v[d].as_slice()),
        }
    }

    /// New view over the examples at `indices`, in that order.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidSubset`] if any index is `>= self.len()`.
    pub fn subset(&self, indices: &[usize]) -> MaxentResult<DataView> {
        let len = self.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(MaxentError::InvalidSubset { start: bad, end: bad + 1, len });
        }
        Ok(DataView {
            num_features: self.num_features,
            num_classes: self.num_classes,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            values: self.values.as_ref().map(|v| indices.iter().map(|&i| v[i].clone()).collect()),
            weights: self.weights.as_ref().map(|w| indices.iter().map(|&i| w[i]).collect()),
        })
    }

    /// Split into `(train, held_out)` where `held_out` is `start..end`.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidSubset`] unless `start < end <= len` and the
    ///   remaining training part is non-empty.
    pub fn fold(&self, start: usize, end: usize) -> MaxentResult<(DataView, DataView)> {
        let (train, held) = fold_indices(start, end, self.len())?;
        Ok((self.subset(&train)?, self.subset(&held)?))
    }
}

/// Growable collection of examples with interning indices.
///
/// Examples are added while the indices are growable; [`Dataset::freeze`]
/// locks both indices, after which [`Dataset::view`] is available and adding
/// an example with an unseen feature or label fails. Datasets produced by
/// [`Dataset::split`] / [`Dataset::fold`] share the parent's indices.
#[derive(Debug, Clone)]
pub struct Dataset<F: Eq + Hash, L: Eq + Hash> {
    features: Arc<FeatureIndex<F>>,
    labels: Arc<LabelIndex<L>>,
    data: Vec<Vec<usize>>,
    label_ids: Vec<usize>,
    values: Option<Vec<Vec<f64>>>,
    weights: Vec<f64>,
}

impl<F, L> Dataset<F, L>
where
    F: Eq + Hash + Clone + Debug,
    L: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::with_indices(Arc::new(Index::new()), Arc::new(Index::new()))
    }

    /// Empty dataset over existing indices (e.g. a dev set encoded with the
    /// training set's frozen indices).
    pub fn with_indices(features: Arc<FeatureIndex<F>>, labels: Arc<LabelIndex<L>>) -> Self {
        Self { features, labels, data: Vec::new(), label_ids: Vec::new(), values: None, weights: Vec::new() }
    }

    /// Intern and append one example.
    ///
    /// # Errors
    /// - [`MaxentError::SizeMismatch`] when values and features disagree.
    /// - [`MaxentError::NonFiniteValue`] / [`MaxentError::InvalidExampleWeight`].
    /// - [`MaxentError::IndexLocked`] for an unseen identifier after
    ///   [`Dataset::freeze`]; the dataset is left unchanged.
    pub fn add(&mut self, datum: Datum<F, L>) -> MaxentResult<()> {
        let example = self.data.len();
        if let Some(values) = &datum.values {
            if values.len() != datum.features.len() {
                return Err(MaxentError::SizeMismatch {
                    what: "datum values",
                    expected: datum.features.len(),
                    found: values.len(),
                });
            }
            if let Some((position, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(MaxentError::NonFiniteValue { example, position, value });
            }
        }
        if !datum.weight.is_finite() || datum.weight < 0.0 {
            return Err(MaxentError::InvalidExampleWeight { example, value: datum.weight });
        }

        let label = intern(&mut self.labels, datum.label)?;
        let mut ids = Vec::with_capacity(datum.features.len());
        for feature in datum.features {
            ids.push(intern(&mut self.features, feature)?);
        }
        let row_len = ids.len();

        match datum.values {
            Some(values) => {
                let data = &self.data;
                let rows = self
                    .values
                    .get_or_insert_with(|| data.iter().map(|r| vec![1.0; r.len()]).collect());
                rows.push(values);
            }
            None => {
                if let Some(rows) = self.values.as_mut() {
                    rows.push(vec![1.0; row_len]);
                }
            }
        }
        self.data.push(ids);
        self.label_ids.push(label);
        self.weights.push(datum.weight);
        Ok(())
    }

    /// Lock both indices.
    pub fn freeze(&mut self) {
        if !self.features.is_locked() {
            Arc::make_mut(&mut self.features).lock();
        }
        if !self.labels.is_locked() {
            Arc::make_mut(&mut self.labels).lock();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.features.is_locked() && self.labels.is_locked()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn feature_index(&self) -> &Arc<FeatureIndex<F>> {
        &self.features
    }

    pub fn label_index(&self) -> &Arc<LabelIndex<L>> {
        &self.labels
    }

    /// Validated read-only view of the examples.
    ///
    /// # Errors
    /// - [`MaxentError::IndexNotFrozen`] before [`Dataset::freeze`].
    pub fn view(&self) -> MaxentResult<DataView> {
        if !self.is_frozen() {
            return Err(MaxentError::IndexNotFrozen);
        }
        let weights = if self.weights.iter().any(|&w| w != 1.0) {
            Some(self.weights.clone())
        } else {
            None
        };
        DataView::new(
            self.num_features(),
            self.num_classes(),
            self.data.clone(),
            self.label_ids.clone(),
            self.values.clone(),
            weights,
        )
    }

    /// Split into `(train, held_out)` with `held_out_fraction` of the
    /// examples held out (rounded, at least one in each part).
    ///
    /// With `seed = Some(s)` the examples are shuffled by a seeded `StdRng`
    /// first; otherwise the tail is held out.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidOption`] unless `0 < held_out_fraction < 1`.
    /// - [`MaxentError::InvalidSubset`] with fewer than two examples.
    pub fn split(&self, held_out_fraction: f64, seed: Option<u64>) -> MaxentResult<(Self, Self)> {
        if !(held_out_fraction > 0.0 && held_out_fraction < 1.0) {
            return Err(MaxentError::InvalidOption {
                name: "held_out_fraction",
                value: held_out_fraction,
                reason: "must lie strictly between 0 and 1",
            });
        }
        let n = self.len();
        if n < 2 {
            return Err(MaxentError::InvalidSubset { start: 0, end: n, len: n });
        }
        let mut order: Vec<usize> = (0..n).collect();
        if let Some(seed) = seed {
            order.shuffle(&mut StdRng::seed_from_u64(seed));
        }
        let held = ((n as f64) * held_out_fraction).round().clamp(1.0, (n - 1) as f64) as usize;
        let (train, test) = order.split_at(n - held);
        Ok((self.select(train), self.select(test)))
    }

    /// Split into `(train, held_out)` where `held_out` is `start..end`.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidSubset`] unless `start < end <= len` and the
    ///   training part is non-empty.
    pub fn fold(&self, start: usize, end: usize) -> MaxentResult<(Self, Self)> {
        let (train, held) = fold_indices(start, end, self.len())?;
        Ok((self.select(&train), self.select(&held)))
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: Arc::clone(&self.features),
            labels: Arc::clone(&self.labels),
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
            label_ids: indices.iter().map(|&i| self.label_ids[i]).collect(),
            values: self.values.as_ref().map(|v| indices.iter().map(|&i| v[i].clone()).collect()),
            weights: indices.iter().map(|&i| self.weights[i]).collect(),
        }
    }
}

impl<F, L> Default for Dataset<F, L>
where
    F: Eq + Hash + Clone + Debug,
    L: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

// ---- Helper Methods ----

/// Look up `item`, appending it only when the index is still growable.
fn intern<T: Eq + Hash + Clone + Debug>(index: &mut Arc<Index<T>>, item: T) -> MaxentResult<usize> {
    match index.index_of(&item) {
        Some(id) => Ok(id),
        None if index.is_locked() => Err(MaxentError::IndexLocked { item: format!("{item:?}") }),
        None => Arc::make_mut(index).add(item),
    }
}

fn fold_indices(start: usize, end: usize, len: usize) -> MaxentResult<(Vec<usize>, Vec<usize>)> {
    if start >= end || end > len || end - start == len {
        return Err(MaxentError::InvalidSubset { start, end, len });
    }
    let train = (0..start).chain(end..len).collect();
    let held = (start..end).collect();
    Ok((train, held))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_dataset() -> Dataset<&'static str, &'static str> {
        let mut dataset = Dataset::new();
        for (feats, label) in [
            (vec!["sunny", "warm"], "play"),
            (vec!["rain"], "stay"),
            (vec!["sunny", "cold"], "stay"),
            (vec!["warm"], "play"),
            (vec![], "play"),
        ] {
            dataset.add(Datum::new(feats, label)).expect("growable dataset");
        }
        dataset
    }

    #[test]
    // Purpose
    // -------
    // Ensure mismatched parallel arrays fail at view construction instead
    // of being truncated.
    //
    // Given
    // -----
    // - 2 examples with 1 label; 2 examples with 1 weight; a value row of
    //   the wrong length.
    //
    // Expect
    // ------
    // - `SizeMismatch` naming the offending array in each case.
    fn view_new_rejects_size_mismatches() {
        let data = vec![vec![0], vec![1]];
        assert!(matches!(
            DataView::new(2, 2, data.clone(), vec![0], None, None),
            Err(MaxentError::SizeMismatch { what: "labels", .. })
        ));
        assert!(matches!(
            DataView::new(2, 2, data.clone(), vec![0, 1], None, Some(vec![1.0])),
            Err(MaxentError::SizeMismatch { what: "example weights", .. })
        ));
        assert!(matches!(
            DataView::new(2, 2, data, vec![0, 1], Some(vec![vec![1.0], vec![]]), None),
            Err(MaxentError::SizeMismatch { what: "values of an example", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify range and finiteness checks on view construction.
    //
    // Given
    // -----
    // - Feature id 5 with 3 features; label 2 with 2 classes; a NaN value;
    //   a negative weight.
    //
    // Expect
    // ------
    // - The matching error variant with the offending example index.
    fn view_new_rejects_out_of_range_and_non_finite_entries() {
        assert_eq!(
            DataView::new(3, 2, vec![vec![0], vec![5]], vec![0, 1], None, None),
            Err(MaxentError::FeatureOutOfRange { example: 1, feature: 5, num_features: 3 })
        );
        assert_eq!(
            DataView::new(3, 2, vec![vec![0]], vec![2], None, None),
            Err(MaxentError::LabelOutOfRange { example: 0, label: 2, num_classes: 2 })
        );
        assert!(matches!(
            DataView::new(3, 2, vec![vec![0, 1]], vec![0], Some(vec![vec![1.0, f64::NAN]]), None),
            Err(MaxentError::NonFiniteValue { example: 0, position: 1, .. })
        ));
        assert_eq!(
            DataView::new(3, 2, vec![vec![0]], vec![0], None, Some(vec![-1.0])),
            Err(MaxentError::InvalidExampleWeight { example: 0, value: -1.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Check the freeze lifecycle: no view before freezing, locked indices
    // afterwards.
    //
    // Given
    // -----
    // - The toy dataset (5 examples, 4 features, 2 labels).
    //
    // Expect
    // ------
    // - `view()` fails with `IndexNotFrozen` before `freeze()`.
    // - After freezing the view has the right sizes and an unseen feature
    //   is rejected while a known one is accepted.
    fn freeze_gates_view_and_locks_indices() {
        // Arrange
        let mut dataset = toy_dataset();

        // Act
        let before = dataset.view();
        dataset.freeze();
        let view = dataset.view().expect("frozen dataset has a view");

        // Assert
        assert_eq!(before, Err(MaxentError::IndexNotFrozen));
        assert_eq!((view.num_features(), view.num_classes(), view.len()), (4, 2, 5));
        assert_eq!(view.dimension(), 8);
        assert!(view.example(4).is_empty());
        assert!(view.weights().is_none() && view.values().is_none());
        assert!(matches!(
            dataset.add(Datum::new(vec!["snow"], "stay")),
            Err(MaxentError::IndexLocked { .. })
        ));
        assert_eq!(dataset.len(), 5);
        dataset.add(Datum::new(vec!["rain", "warm"], "play")).expect("known identifiers");
        assert_eq!(dataset.len(), 6);
    }

    #[test]
    // Purpose
    // -------
    // Ensure real values and weights are carried into the view, with
    // binary rows back-filled as 1.0.
    //
    // Given
    // -----
    // - A binary example, then a real-valued example with weight 2.5.
    //
    // Expect
    // ------
    // - Row 0 values [1.0]; row 1 values [0.5, -2.0]; weights [1.0, 2.5].
    fn view_carries_values_and_weights() {
        // Arrange
        let mut dataset: Dataset<u32, bool> = Dataset::new();
        dataset.add(Datum::new(vec![7], true)).expect("add");
        let real = Datum::with_values(vec![7, 9], vec![0.5, -2.0], false).expect("aligned");
        dataset.add(real.with_weight(2.5)).expect("add");
        dataset.freeze();

        // Act
        let view = dataset.view().expect("view");

        // Assert
        assert_eq!(view.example(0).iter().collect::<Vec<_>>(), vec![(0, 1.0)]);
        assert_eq!(view.example(1).iter().collect::<Vec<_>>(), vec![(0, 0.5), (1, -2.0)]);
        assert_eq!(view.weights(), Some(&[1.0, 2.5][..]));
        assert_eq!(view.weight(1), 2.5);
    }

    #[test]
    // Purpose
    // -------
    // Verify that seeded splits are reproducible, partition the data, and
    // share the parent's indices.
    //
    // Given
    // -----
    // - 10 examples, held-out fraction 0.3, seed 7 twice.
    //
    // Expect
    // ------
    // - 7 train and 3 held-out examples; identical splits for the same
    //   seed; indices shared by pointer.
    fn seeded_split_is_deterministic_and_shares_indices() {
        // Arrange
        let mut dataset: Dataset<usize, usize> = Dataset::new();
        for i in 0..10 {
            dataset.add(Datum::new(vec![i], i % 2)).expect("add");
        }
        dataset.freeze();

        // Act
        let (train_a, test_a) = dataset.split(0.3, Some(7)).expect("split");
        let (train_b, test_b) = dataset.split(0.3, Some(7)).expect("split");

        // Assert
        assert_eq!((train_a.len(), test_a.len()), (7, 3));
        assert_eq!(train_a.view().expect("view"), train_b.view().expect("view"));
        assert_eq!(test_a.view().expect("view"), test_b.view().expect("view"));
        assert!(Arc::ptr_eq(train_a.feature_index(), dataset.feature_index()));
        assert!(dataset.split(1.0, None).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Check contiguous fold extraction on views.
    //
    // Given
    // -----
    // - The frozen toy view (5 examples), held-out range 1..3.
    //
    // Expect
    // ------
    // - Held-out labels are rows 1 and 2; train keeps rows 0, 3, 4.
    // - A fold covering everything is rejected.
    fn view_fold_extracts_contiguous_range() {
        let mut dataset = toy_dataset();
        dataset.freeze();
        let view = dataset.view().expect("view");

        let (train, held) = view.fold(1, 3).expect("valid fold");

        assert_eq!(held.labels(), &[view.label(1), view.label(2)]);
        assert_eq!(train.labels(), &[view.label(0), view.label(3), view.label(4)]);
        assert!(view.fold(0, 5).is_err());
        assert!(view.fold(3, 3).is_err());
    }
}
