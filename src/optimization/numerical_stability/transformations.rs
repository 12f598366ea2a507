//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used by
//! log-linear models that are prone to overflow/underflow in naïve form.
//!
//! # Provided items
//! - [`log_sum_exp(values)`]: `ln Σ exp(v_i)` with a max shift, finite for
//!   any finite input.
//! - [`softmax_in_place(values)`]: normalized probabilities from scores,
//!   computed through [`log_sum_exp`].
//! - [`log_cosh(x)`]: `ln cosh(x)` that never overflows.
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`.
//!
//! # Rationale
//! Activations of a log-linear model are unbounded sums of weights times
//! real-valued features; exponentiating them directly overflows at ~710.

use std::f64::consts::LN_2;

/// Above this magnitude `ln cosh(x)` is evaluated as `|x| − ln 2`.
///
/// At 30 the dropped term `ln(1 + e^{−60})` is below `f64` resolution.
pub const COSH_LINEAR_THRESHOLD: f64 = 30.0;

/// Numerically stable `ln Σ_i exp(v_i)`.
///
/// Subtracts the maximum before exponentiating, so every exponent is ≤ 0
/// and the largest is exactly 0. The result is always `≥ max(values)`.
///
/// - Empty input returns `-∞` (the log of an empty sum).
/// - If the maximum is `+∞`, returns `+∞`; if every value is `-∞`,
///   returns `-∞`. NaN inputs propagate.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max.is_infinite() {
        return max;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Replace scores by their softmax probabilities and return the log
/// normalizer `ln Σ exp(score)`.
pub fn softmax_in_place(values: &mut [f64]) -> f64 {
    let total = log_sum_exp(values);
    for v in values.iter_mut() {
        *v = (*v - total).exp();
    }
    total
}

/// Numerically stable `ln cosh(x)`.
///
/// Uses `ln cosh(x) = |x| − ln 2 + softplus(−2|x|)`, dropping the softplus
/// term once `|x| > COSH_LINEAR_THRESHOLD`.
pub fn log_cosh(x: f64) -> f64 {
    let a = x.abs();
    if a > COSH_LINEAR_THRESHOLD { a - LN_2 } else { a - LN_2 + safe_softplus(-2.0 * a) }
}

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20.0`, `softplus(x) ≈ x`; otherwise `ln1p(exp(x))`, which is
/// accurate for large negative `x`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Verify that `log_sum_exp` stays finite and bounded below by the
    // maximum when one value is huge.
    //
    // Given
    // -----
    // - values = [1e6, 0.0, -3.0] and values = [1e6, 1e6].
    //
    // Expect
    // ------
    // - Result is finite and ≥ 1e6; two equal maxima give 1e6 + ln 2.
    fn log_sum_exp_is_stable_for_huge_values() {
        // Arrange
        let lopsided = [1e6, 0.0, -3.0];
        let tied = [1e6, 1e6];

        // Act
        let a = log_sum_exp(&lopsided);
        let b = log_sum_exp(&tied);

        // Assert
        assert!(a.is_finite());
        assert!(a >= 1e6);
        assert_relative_eq!(b, 1e6 + LN_2, max_relative = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Check agreement with the naïve formula on a safe range, and the
    // documented edge cases.
    //
    // Given
    // -----
    // - values = [0.5, -1.0, 2.0]; empty input; all −∞.
    //
    // Expect
    // ------
    // - Matches ln Σ exp to 1e-14; empty and all −∞ give −∞.
    fn log_sum_exp_matches_naive_formula_and_edge_cases() {
        let values = [0.5, -1.0, 2.0];
        let naive = values.iter().map(|v: &f64| v.exp()).sum::<f64>().ln();
        assert_relative_eq!(log_sum_exp(&values), naive, max_relative = 1e-14);
        assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
        assert_eq!(log_sum_exp(&[f64::NEG_INFINITY, f64::NEG_INFINITY]), f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Ensure softmax probabilities sum to one and keep ordering.
    //
    // Given
    // -----
    // - scores = [1000.0, 999.0, -5.0].
    //
    // Expect
    // ------
    // - Sum is 1, p₀ > p₁ > p₂, and the returned normalizer is finite.
    fn softmax_in_place_normalizes_large_scores() {
        // Arrange
        let mut scores = [1000.0, 999.0, -5.0];

        // Act
        let total = softmax_in_place(&mut scores);

        // Assert
        assert!(total.is_finite());
        assert_relative_eq!(scores.iter().sum::<f64>(), 1.0, max_relative = 1e-12);
        assert!(scores[0] > scores[1] && scores[1] > scores[2]);
    }

    #[test]
    // Purpose
    // -------
    // Compare `log_cosh` with the direct formula where it is safe, and
    // check the linear tail where the direct formula overflows.
    //
    // Given
    // -----
    // - x ∈ {−3, −0.1, 0, 0.7, 10} and x = 1e4.
    //
    // Expect
    // ------
    // - Agreement to 1e-12 on the grid; 1e4 − ln 2 for the tail.
    fn log_cosh_matches_direct_formula_and_linear_tail() {
        for x in [-3.0_f64, -0.1, 0.0, 0.7, 10.0] {
            assert_relative_eq!(log_cosh(x), x.cosh().ln(), epsilon = 1e-12, max_relative = 1e-12);
        }
        assert_relative_eq!(log_cosh(1e4), 1e4 - LN_2, max_relative = 1e-15);
    }
}
