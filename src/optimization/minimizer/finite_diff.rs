//! minimizer::finite_diff — finite-difference derivative helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference approximations that complement analytic
//! derivatives: a gradient check for any [`DiffFunction`], and a
//! Hessian-vector product built from two gradient evaluations. Both keep
//! the rest of the crate independent of the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - [`numerical_gradient`] computes a central-difference gradient of
//!   `f.value_at`, capturing any evaluation error raised inside the
//!   finite-difference closure.
//! - [`check_gradient`] compares the analytic gradient with
//!   [`numerical_gradient`] and reports the worst relative error.
//! - [`hessian_vector_product`] approximates `H(x)·v` with a central
//!   difference of the gradient along `v`; stochastic second-order
//!   minimizers use it instead of forming the Hessian.
//!
//! Conventions
//! -----------
//! - The `finitediff` closures must return `f64`, so errors are parked in a
//!   `RefCell` and the closure returns `NaN`; after differencing, a parked
//!   error is returned instead of the (meaningless) result.
//! - Relative errors use `|a − n| / max(1, |a|, |n|)` so that tiny
//!   components are compared absolutely.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        Grad, Theta,
        traits::DiffFunction,
        validation::{validate_grad, validate_theta_input},
    },
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Base step for [`hessian_vector_product`], scaled by `1 / ‖v‖`.
pub const HVP_STEP: f64 = 1e-5;

/// Result of comparing an analytic gradient with finite differences.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCheck {
    pub analytic: Grad,
    pub numerical: Grad,
    /// Largest relative error over all coordinates.
    pub max_relative_error: f64,
    /// Coordinate where `max_relative_error` occurs.
    pub worst_index: usize,
}

/// Central-difference gradient of `f` at `x` with error capture.
///
/// # Errors
/// - Any error raised by `f.value_at` during differencing.
/// - `DimensionMismatch` / `NonFiniteEntry` when the result fails
///   validation.
pub fn numerical_gradient<F: DiffFunction + ?Sized>(f: &F, x: &Theta) -> OptResult<Grad> {
    validate_theta_input(x, f.domain_dimension())?;
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let cost_func = |theta: &Theta| -> f64 {
        match f.value_at(theta) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let fd_grad = x.central_diff(&cost_func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, x.len())?;
    Ok(fd_grad)
}

/// Compare `f.derivative_at(x)` against [`numerical_gradient`].
///
/// # Errors
/// Propagates evaluation and validation errors from either gradient.
pub fn check_gradient<F: DiffFunction + ?Sized>(f: &F, x: &Theta) -> OptResult<GradientCheck> {
    let analytic = f.derivative_at(x)?;
    validate_grad(&analytic, x.len())?;
    let numerical = numerical_gradient(f, x)?;
    let mut max_relative_error = 0.0;
    let mut worst_index = 0;
    for (i, (&a, &n)) in analytic.iter().zip(numerical.iter()).enumerate() {
        let err = (a - n).abs() / a.abs().max(n.abs()).max(1.0);
        if err > max_relative_error {
            max_relative_error = err;
            worst_index = i;
        }
    }
    Ok(GradientCheck { analytic, numerical, max_relative_error, worst_index })
}

/// Approximate `H(x)·v` by `(∇f(x + h·v) − ∇f(x − h·v)) / 2h`.
///
/// `grad_fn` evaluates the gradient; `h = HVP_STEP / ‖v‖₂`. A zero
/// direction yields a zero product without evaluating anything.
///
/// # Errors
/// - `DimensionMismatch { what: "direction" }` when `v.len() != x.len()`.
/// - Any error from `grad_fn`, and validation errors on its outputs.
pub fn hessian_vector_product<G>(grad_fn: G, x: &Theta, v: &Theta) -> OptResult<Grad>
where
    G: Fn(&Theta) -> OptResult<Grad>,
{
    if v.len() != x.len() {
        return Err(OptError::DimensionMismatch {
            what: "direction",
            expected: x.len(),
            found: v.len(),
        });
    }
    let norm = v.dot(v).sqrt();
    if norm == 0.0 {
        return Ok(Grad::zeros(x.len()));
    }
    let h = HVP_STEP / norm;
    let forward = grad_fn(&(x + &(v * h)))?;
    let backward = grad_fn(&(x - &(v * h)))?;
    validate_grad(&forward, x.len())?;
    validate_grad(&backward, x.len())?;
    Ok((forward - backward) / (2.0 * h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::minimizer::Cost;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// f(x) = x₀² x₁ + sin(x₁), with an optional deliberate gradient bug.
    struct Cubic {
        broken: bool,
    }

    impl DiffFunction for Cubic {
        fn domain_dimension(&self) -> usize {
            2
        }

        fn calculate(&self, x: &Theta) -> OptResult<(Cost, Grad)> {
            let value = x[0] * x[0] * x[1] + x[1].sin();
            let mut grad = array![2.0 * x[0] * x[1], x[0] * x[0] + x[1].cos()];
            if self.broken {
                grad[1] += 0.5;
            }
            Ok((value, grad))
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `check_gradient` accepts a correct analytic gradient and
    // flags a wrong one at the right coordinate.
    //
    // Given
    // -----
    // - f(x) = x₀² x₁ + sin(x₁) at x = (0.7, −1.3), correct and broken.
    //
    // Expect
    // ------
    // - Correct: max relative error < 1e-6.
    // - Broken: error > 0.1 at index 1.
    fn check_gradient_separates_correct_from_broken_gradients() {
        // Arrange
        let x = array![0.7, -1.3];

        // Act
        let good = check_gradient(&Cubic { broken: false }, &x).expect("check should run");
        let bad = check_gradient(&Cubic { broken: true }, &x).expect("check should run");

        // Assert
        assert!(good.max_relative_error < 1e-6, "error {}", good.max_relative_error);
        assert!(bad.max_relative_error > 0.1);
        assert_eq!(bad.worst_index, 1);
    }

    #[test]
    // Purpose
    // -------
    // Check the finite-difference Hessian-vector product against the exact
    // Hessian of the cubic test function.
    //
    // Given
    // -----
    // - H(x) = [[2x₁, 2x₀], [2x₀, −sin x₁]] at x = (0.7, −1.3), v = (1, 2).
    //
    // Expect
    // ------
    // - H·v within 1e-5 of the analytic product; zero v gives zero.
    fn hessian_vector_product_matches_analytic_hessian() {
        // Arrange
        let f = Cubic { broken: false };
        let x: Theta = array![0.7, -1.3];
        let v: Theta = array![1.0, 2.0];
        let exact = array![
            2.0 * x[1] * v[0] + 2.0 * x[0] * v[1],
            2.0 * x[0] * v[0] - x[1].sin() * v[1]
        ];

        // Act
        let hv = hessian_vector_product(|p: &Theta| f.derivative_at(p), &x, &v)
            .expect("product should evaluate");
        let zero = hessian_vector_product(|p: &Theta| f.derivative_at(p), &x, &array![0.0, 0.0])
            .expect("zero direction is valid");

        // Assert
        assert_abs_diff_eq!(hv[0], exact[0], epsilon = 1e-5);
        assert_abs_diff_eq!(hv[1], exact[1], epsilon = 1e-5);
        assert_eq!(zero, array![0.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a direction of the wrong length is rejected.
    //
    // Given
    // -----
    // - x of length 2 and v of length 3.
    //
    // Expect
    // ------
    // - `DimensionMismatch { what: "direction", expected: 2, found: 3 }`.
    fn hessian_vector_product_rejects_direction_mismatch() {
        let f = Cubic { broken: false };
        let result = hessian_vector_product(
            |p: &Theta| f.derivative_at(p),
            &array![0.0, 0.0],
            &array![1.0, 0.0, 0.0],
        );
        assert_eq!(
            result,
            Err(OptError::DimensionMismatch { what: "direction", expected: 2, found: 3 })
        );
    }
}
