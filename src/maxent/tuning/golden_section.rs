//! Golden-section search for unimodal scalar functions.
//!
//! Purpose
//! -------
//! Derivative-free 1-D minimization used to tune the prior width σ. Each
//! evaluation is a full training run, so the search keeps every evaluated
//! point and never evaluates the same abscissa twice.
//!
//! Key behaviors
//! -------------
//! - Brackets shrink by the golden ratio; one new evaluation per step.
//! - With `geometric = true` the search runs on `ln x`, which suits scale
//!   parameters spanning orders of magnitude (σ ∈ [0.1, 10]).
//! - Stops when the bracket width (in the search coordinate) drops below
//!   `tol`, or after `max_evaluations`.
//! - Non-finite objective values are treated as `+∞`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `lo < hi`, both finite; `lo > 0` when geometric.
//! - The returned point is the best evaluated one; ties keep the earliest.
use crate::maxent::errors::{MaxentError, MaxentResult};
use std::collections::HashMap;

/// `(√5 − 1) / 2`.
pub const INV_GOLDEN_RATIO: f64 = 0.618_033_988_749_894_9;

/// Default evaluation cap.
pub const DEFAULT_MAX_EVALUATIONS: usize = 100;

/// Configured golden-section search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenSectionSearch {
    tol: f64,
    geometric: bool,
    max_evaluations: usize,
}

/// Outcome of a search: best point, its value, and every evaluation in
/// call order.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldenSectionResult {
    pub x: f64,
    pub value: f64,
    pub evaluations: Vec<(f64, f64)>,
}

impl GoldenSectionSearch {
    /// # Errors
    /// - [`MaxentError::InvalidOption`] unless `tol` is finite and > 0.
    pub fn new(tol: f64, geometric: bool) -> MaxentResult<Self> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(MaxentError::InvalidOption {
                name: "tol",
                value: tol,
                reason: "search tolerance must be finite and > 0",
            });
        }
        Ok(Self { tol, geometric, max_evaluations: DEFAULT_MAX_EVALUATIONS })
    }

    /// # Errors
    /// - [`MaxentError::InvalidOption`] for a cap below 2.
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> MaxentResult<Self> {
        if max_evaluations < 2 {
            return Err(MaxentError::InvalidOption {
                name: "max_evaluations",
                value: max_evaluations as f64,
                reason: "golden-section search needs at least two evaluations",
            });
        }
        self.max_evaluations = max_evaluations;
        Ok(self)
    }

    pub fn tol(&self) -> f64 {
        self.tol
    }

    pub fn is_geometric(&self) -> bool {
        self.geometric
    }

    /// Minimize `f` over `[lo, hi]`.
    ///
    /// # Errors
    /// - [`MaxentError::InvalidOption`] for an invalid bracket.
    /// - Any error returned by `f`, unchanged.
    pub fn minimize<F>(&self, lo: f64, hi: f64, mut f: F) -> MaxentResult<GoldenSectionResult>
    where
        F: FnMut(f64) -> MaxentResult<f64>,
    {
        self.check_bracket(lo, hi)?;
        let (to_x, from_x): (fn(f64) -> f64, fn(f64) -> f64) =
            if self.geometric { (f64::exp, f64::ln) } else { (identity, identity) };

        let mut memo: HashMap<u64, f64> = HashMap::new();
        let mut evaluations = Vec::new();
        let mut eval = |t: f64| -> MaxentResult<f64> {
            let x = to_x(t);
            if let Some(&v) = memo.get(&x.to_bits()) {
                return Ok(v);
            }
            let raw = f(x)?;
            let v = if raw.is_nan() { f64::INFINITY } else { raw };
            memo.insert(x.to_bits(), v);
            evaluations.push((x, v));
            Ok(v)
        };

        let (mut a, mut b) = (from_x(lo), from_x(hi));
        let mut c = b - INV_GOLDEN_RATIO * (b - a);
        let mut d = a + INV_GOLDEN_RATIO * (b - a);
        let mut fc = eval(c)?;
        let mut fd = eval(d)?;
        let mut calls = 2;
        while (b - a) > self.tol && calls < self.max_evaluations {
            if fc <= fd {
                b = d;
                d = c;
                fd = fc;
                c = b - INV_GOLDEN_RATIO * (b - a);
                fc = eval(c)?;
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + INV_GOLDEN_RATIO * (b - a);
                fd = eval(d)?;
            }
            calls += 1;
        }

        let mut best = evaluations[0];
        for &(x, v) in &evaluations[1..] {
            if v < best.1 {
                best = (x, v);
            }
        }
        let (x, value) = best;
        Ok(GoldenSectionResult { x, value, evaluations })
    }

    fn check_bracket(&self, lo: f64, hi: f64) -> MaxentResult<()> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(MaxentError::InvalidOption {
                name: "bracket",
                value: hi - lo,
                reason: "search bracket needs finite lo < hi",
            });
        }
        if self.geometric && lo <= 0.0 {
            return Err(MaxentError::InvalidOption {
                name: "bracket",
                value: lo,
                reason: "geometric search needs lo > 0",
            });
        }
        Ok(())
    }
}

fn identity(t: f64) -> f64 {
    t
}
