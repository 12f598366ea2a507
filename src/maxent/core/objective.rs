//! Negative conditional log-likelihood of a multiclass log-linear model.
//!
//! Purpose
//! -------
//! Evaluate the training objective and its gradient for a flat weight
//! vector over a frozen [`DataView`], plus a regularization [`LogPrior`].
//! This is the function every minimizer run drives.
//!
//! Key behaviors
//! -------------
//! - For each example `d`: activations `sums[c] = Σ_f x[f·C + c]·v(f,d)`,
//!   normalizer `total = log_sum_exp(sums)`, probabilities
//!   `p_c = exp(sums[c] − total)` and loss `(total − sums[gold])·w_d`.
//! - The gradient starts from the cached *derivative numerator*
//!   (`−v(f,d)·w_d` at every observed `(f, gold)` pair, computed once per
//!   objective) and accumulates expected counts `p_c·v(f,d)·w_d`.
//! - The prior's value is added and its gradient accumulated last.
//! - [`LikelihoodMode::Summed`] instead minimizes `−Σ_d w_d·p_gold(d)`.
//! - [`LogConditionalObjective::calculate_batch`] restricts the data term
//!   to an index subset and rescales the prior by `batch / n`.
//! - [`LogConditionalObjective::hessian_vector_product`] differences the
//!   gradient along a direction.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x.len() == num_features · num_classes` with layout `f·C + c`.
//! - The derivative numerator depends only on the data; once computed it
//!   is reused unchanged for the lifetime of the objective.
//! - Examples without features contribute a uniform distribution.
//!
//! Conventions
//! -----------
//! - Parallel evaluation partitions examples round-robin over `threads`
//!   shards. Each shard accumulates into a private buffer; buffers are summed
//!   in shard order after the fork-join. Results can differ from the
//!   single-threaded sum in the last bits because of summation order.
//! - Evaluation stays single-threaded when there are fewer than
//!   `threads × MIN_EXAMPLES_PER_WORKER` examples.
//! - Non-finite inputs or outputs are reported as errors naming the first
//!   offending index; nothing panics on NaN/∞.
//!
//! Testing notes
//! -------------
//! - Unit tests compare analytic gradients with central differences
//!   (binary, real-valued and weighted data, both likelihood modes), check
//!   parallel/serial agreement, the numerator cache, minibatch evaluation,
//!   the Hessian-vector product, and failure reporting.
use crate::{
    maxent::{
        core::{dataset::DataView, prior::LogPrior},
        errors::{MaxentError, MaxentResult},
    },
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{Cost, DiffFunction, Grad, Theta, finite_diff},
        numerical_stability::softmax_in_place,
    },
};
use rayon::prelude::*;
use std::{borrow::Cow, sync::OnceLock};

/// Minimum number of examples per shard before evaluation fans out.
pub const MIN_EXAMPLES_PER_WORKER: usize = 32;

/// Likelihood formulation minimized by the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikelihoodMode {
    /// Negative conditional log-likelihood `−Σ w·ln p_gold`.
    #[default]
    Conditional,
    /// Negative summed conditional likelihood `−Σ w·p_gold`.
    Summed,
}

/// Objective over a frozen data view with a regularization prior.
#[derive(Debug)]
pub struct LogConditionalObjective<'a> {
    view: &'a DataView,
    prior: LogPrior,
    mode: LikelihoodMode,
    threads: usize,
    numerator: OnceLock<Vec<f64>>,
}

impl<'a> LogConditionalObjective<'a> {
    /// Conditional-likelihood objective evaluated on one thread.
    ///
    /// # Errors
    /// - [`MaxentError::DimensionMismatch`] when the prior carries vector
    ///   parameters whose length differs from `view.dimension()`.
    pub fn new(view: &'a DataView, prior: LogPrior) -> MaxentResult<Self> {
        if let Some(dim) = prior.dimension() {
            if dim != view.dimension() {
                return Err(MaxentError::DimensionMismatch {
                    what: "prior parameters",
                    expected: view.dimension(),
                    found: dim,
                });
            }
        }
        Ok(Self {
            view,
            prior,
            mode: LikelihoodMode::Conditional,
            threads: 1,
            numerator: OnceLock::new(),
        })
    }

    pub fn with_mode(mut self, mode: LikelihoodMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of shards used for parallel evaluation.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidOption`] when `threads == 0`.
    pub fn with_threads(mut self, threads: usize) -> MaxentResult<Self> {
        if threads == 0 {
            return Err(MaxentError::InvalidOption {
                name: "threads",
                value: 0.0,
                reason: "at least one worker is required",
            });
        }
        self.threads = threads;
        Ok(self)
    }

    pub fn view(&self) -> &DataView {
        self.view
    }

    pub fn prior(&self) -> &LogPrior {
        &self.prior
    }

    pub fn mode(&self) -> LikelihoodMode {
        self.mode
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn dimension(&self) -> usize {
        self.view.dimension()
    }

    /// Shards used for `rows` examples: `threads`, or 1 below the
    /// fan-out minimum.
    pub fn workers_for(&self, rows: usize) -> usize {
        if rows < self.threads.saturating_mul(MIN_EXAMPLES_PER_WORKER) { 1 } else { self.threads }
    }

    /// Weight-independent observed term of the gradient.
    pub fn derivative_numerator(&self) -> &[f64] {
        self.numerator.get_or_init(|| {
            let view = self.view;
            let classes = view.num_classes();
            let mut numerator = vec![0.0; view.dimension()];
            for d in 0..view.len() {
                let (gold, w) = (view.label(d), view.weight(d));
                for (f, v) in view.example(d).iter() {
                    numerator[f * classes + gold] -= v * w;
                }
            }
            numerator
        })
    }

    /// Objective value and gradient at `x` over the whole view.
    ///
    /// # Errors
    /// - [`MaxentError::DimensionMismatch`] / [`MaxentError::NonFiniteInput`]
    ///   for a malformed `x`.
    /// - [`MaxentError::NonFiniteObjective`] / [`MaxentError::NonFiniteGradient`]
    ///   when evaluation overflows.
    pub fn evaluate(&self, x: &Theta) -> MaxentResult<(Cost, Grad)> {
        self.check_input(x)?;
        let xs = contiguous(x);
        let n = self.view.len();
        let (value, grad) = match self.mode {
            LikelihoodMode::Conditional => {
                let mut grad = self.derivative_numerator().to_vec();
                let value = self.data_term(&xs, n, |i| i, &mut grad, false);
                (value, grad)
            }
            LikelihoodMode::Summed => {
                let mut grad = vec![0.0; self.dimension()];
                let value = self.data_term(&xs, n, |i| i, &mut grad, false);
                (value, grad)
            }
        };
        self.finish(x, value, Grad::from(grad), &self.prior)
    }

    /// Objective value and gradient over the examples at `indices`, with
    /// the prior scaled by `indices.len() / n`.
    ///
    /// The observed term is computed inline, so the numerator cache is not
    /// touched.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidSubset`] for an empty batch or an index
    ///   outside the view.
    /// - The same input/output errors as [`LogConditionalObjective::evaluate`].
    pub fn calculate_batch(&self, x: &Theta, indices: &[usize]) -> MaxentResult<(Cost, Grad)> {
        self.check_input(x)?;
        let n = self.view.len();
        if indices.is_empty() {
            return Err(MaxentError::InvalidSubset { start: 0, end: 0, len: n });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= n) {
            return Err(MaxentError::InvalidSubset { start: bad, end: bad + 1, len: n });
        }
        let xs = contiguous(x);
        let observed = self.mode == LikelihoodMode::Conditional;
        let mut grad = vec![0.0; self.dimension()];
        let value = self.data_term(&xs, indices.len(), |i| indices[i], &mut grad, observed);
        let prior = self.prior.scaled_for_batch(indices.len(), n)?;
        self.finish(x, value, Grad::from(grad), &prior)
    }

    /// Central finite-difference approximation of `H(x)·v`.
    ///
    /// # Errors
    /// - [`MaxentError::DimensionMismatch`] when `v` has the wrong length.
    /// - Any evaluation error at the perturbed points.
    pub fn hessian_vector_product(&self, x: &Theta, v: &Theta) -> MaxentResult<Grad> {
        self.check_input(x)?;
        if v.len() != x.len() {
            return Err(MaxentError::DimensionMismatch {
                what: "direction",
                expected: x.len(),
                found: v.len(),
            });
        }
        let grad_at =
            |p: &Theta| -> OptResult<Grad> { self.evaluate(p).map(|(_, g)| g).map_err(OptError::from) };
        Ok(finite_diff::hessian_vector_product(grad_at, x, v)?)
    }

    // ---- Helper Methods ----

    fn check_input(&self, x: &Theta) -> MaxentResult<()> {
        if x.len() != self.dimension() {
            return Err(MaxentError::DimensionMismatch {
                what: "weights",
                expected: self.dimension(),
                found: x.len(),
            });
        }
        match x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            Some((index, &value)) => Err(MaxentError::NonFiniteInput { index, value }),
            None => Ok(()),
        }
    }

    /// Add the prior and validate the result.
    fn finish(
        &self, x: &Theta, mut value: f64, mut grad: Grad, prior: &LogPrior,
    ) -> MaxentResult<(Cost, Grad)> {
        value += prior.compute(x, &mut grad)?;
        if !value.is_finite() {
            return Err(MaxentError::NonFiniteObjective { value });
        }
        if let Some((index, &bad)) = grad.iter().enumerate().find(|(_, g)| !g.is_finite()) {
            return Err(MaxentError::NonFiniteGradient { index, value: bad });
        }
        Ok((value, grad))
    }

    /// Data term over `rows` examples (`row_at(i)` is the i-th example),
    /// fanned out over round-robin shards when large enough. The gradient
    /// is added into `grad`.
    fn data_term<R>(&self, xs: &[f64], rows: usize, row_at: R, grad: &mut [f64], observed: bool) -> f64
    where
        R: Fn(usize) -> usize + Sync,
    {
        let workers = self.workers_for(rows);
        if workers == 1 {
            return self.accumulate(xs, (0..rows).map(&row_at), grad, observed);
        }
        let dim = grad.len();
        let partials: Vec<(f64, Vec<f64>)> = (0..workers)
            .into_par_iter()
            .map(|shard| {
                let mut buffer = vec![0.0; dim];
                let value = self.accumulate(
                    xs,
                    (shard..rows).step_by(workers).map(&row_at),
                    &mut buffer,
                    observed,
                );
                (value, buffer)
            })
            .collect();
        let mut value = 0.0;
        for (partial, buffer) in partials {
            value += partial;
            for (g, b) in grad.iter_mut().zip(buffer) {
                *g += b;
            }
        }
        value
    }

    /// Per-example loss and gradient terms for `rows`, added into `grad`.
    /// With `observed`, the gold-label term is included inline.
    fn accumulate<I>(&self, xs: &[f64], rows: I, grad: &mut [f64], observed: bool) -> f64
    where
        I: Iterator<Item = usize>,
    {
        let view = self.view;
        let classes = view.num_classes();
        let mut sums = vec![0.0; classes];
        let mut value = 0.0;
        for d in rows {
            let w = view.weight(d);
            if w == 0.0 {
                continue;
            }
            let gold = view.label(d);
            let example = view.example(d);
            sums.fill(0.0);
            for (f, v) in example.iter() {
                let row = &xs[f * classes..(f + 1) * classes];
                for (s, &weight) in sums.iter_mut().zip(row) {
                    *s += weight * v;
                }
            }
            let gold_score = sums[gold];
            let total = softmax_in_place(&mut sums);
            match self.mode {
                LikelihoodMode::Conditional => {
                    value += (total - gold_score) * w;
                    for (f, v) in example.iter() {
                        let base = f * classes;
                        for (c, &p) in sums.iter().enumerate() {
                            grad[base + c] += p * v * w;
                        }
                        if observed {
                            grad[base + gold] -= v * w;
                        }
                    }
                }
                LikelihoodMode::Summed => {
                    let p_gold = sums[gold];
                    value -= w * p_gold;
                    for (f, v) in example.iter() {
                        let base = f * classes;
                        let scale = w * v * p_gold;
                        for (c, &p) in sums.iter().enumerate() {
                            grad[base + c] += scale * p;
                        }
                        grad[base + gold] -= scale;
                    }
                }
            }
        }
        value
    }
}

impl DiffFunction for LogConditionalObjective<'_> {
    fn domain_dimension(&self) -> usize {
        self.dimension()
    }

    fn calculate(&self, x: &Theta) -> OptResult<(Cost, Grad)> {
        self.evaluate(x).map_err(OptError::from)
    }
}

fn contiguous(x: &Theta) -> Cow<'_, [f64]> {
    match x.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(x.to_vec()),
    }
}
