//! Contiguous k-fold partitioning and parallel per-fold evaluation.
//!
//! Fold `i` covers `[i * ⌊n/k⌋, (i + 1) * ⌊n/k⌋)`; the last fold absorbs
//! the remainder and ends at `n`. Splits share the parent view's feature
//! and label spaces.
use crate::maxent::{
    core::dataset::DataView,
    errors::{MaxentError, MaxentResult},
};
use rayon::prelude::*;

/// Contiguous k-fold partition of `len` examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossValidator {
    len: usize,
    bounds: Vec<(usize, usize)>,
}

impl CrossValidator {
    /// # Errors
    /// - [`MaxentError::InvalidOption`] unless `2 <= k <= len`.
    pub fn new(k: usize, len: usize) -> MaxentResult<Self> {
        if k < 2 || k > len {
            return Err(MaxentError::InvalidOption {
                name: "folds",
                value: k as f64,
                reason: "fold count must be at least 2 and at most the number of examples",
            });
        }
        let size = len / k;
        let bounds = (0..k)
            .map(|i| {
                let end = if i + 1 == k { len } else { (i + 1) * size };
                (i * size, end)
            })
            .collect();
        Ok(Self { len, bounds })
    }

    pub fn num_folds(&self) -> usize {
        self.bounds.len()
    }

    /// `(start, end)` of every held-out fold.
    pub fn folds(&self) -> &[(usize, usize)] {
        &self.bounds
    }

    /// `(train, held_out)` views for every fold.
    ///
    /// # Errors
    /// - [`MaxentError::SizeMismatch`] when `view` is not the length this
    ///   validator was built for.
    pub fn splits(&self, view: &DataView) -> MaxentResult<Vec<(DataView, DataView)>> {
        if view.len() != self.len {
            return Err(MaxentError::SizeMismatch {
                what: "cross-validation examples",
                expected: self.len,
                found: view.len(),
            });
        }
        self.bounds.iter().map(|&(start, end)| view.fold(start, end)).collect()
    }

    /// Run `f(fold, train, held_out)` on every split in parallel. Results
    /// come back in fold order; any failing fold fails the whole run.
    pub fn run<T, F>(splits: &[(DataView, DataView)], f: F) -> MaxentResult<Vec<T>>
    where
        T: Send,
        F: Fn(usize, &DataView, &DataView) -> MaxentResult<T> + Sync,
    {
        splits.par_iter().enumerate().map(|(i, (train, held))| f(i, train, held)).collect()
    }
}
