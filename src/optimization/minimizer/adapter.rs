//! Adapter that exposes a [`DiffFunction`] as an `argmin` problem.
//!
//! argmin asks for the cost and the gradient through two separate traits,
//! while our objectives compute both in one pass. The adapter memoizes the
//! last `(x, value, gradient)` triple so that the paired `cost`/`gradient`
//! calls argmin makes at the same point cost a single evaluation.
use std::sync::Mutex;

use crate::optimization::{
    errors::OptError,
    minimizer::{
        traits::DiffFunction,
        types::{Cost, Grad, Theta},
        validation::{validate_grad, validate_value},
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Last evaluated point together with its outputs.
#[derive(Debug, Clone)]
struct Evaluation {
    x: Theta,
    value: Cost,
    grad: Grad,
}

/// Bridges a [`DiffFunction`] to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `f(x)`; non-finite values are errors.
/// - `Gradient::gradient` returns `∇f(x)` after dimension/finiteness
///   validation.
pub struct ArgMinAdapter<'a, F: DiffFunction + ?Sized> {
    pub f: &'a F,
    last: Mutex<Option<Evaluation>>,
}

impl<'a, F: DiffFunction + ?Sized> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a differentiable function.
    pub fn new(f: &'a F) -> Self {
        Self { f, last: Mutex::new(None) }
    }

    /// Evaluate `f` at `x`, reusing the memoized result when `x` repeats.
    ///
    /// # Errors
    /// Propagates objective errors, and returns `NonFiniteCost` /
    /// `NonFiniteEntry` when the outputs fail validation.
    fn evaluate(&self, x: &Theta) -> Result<(Cost, Grad), OptError> {
        if let Ok(slot) = self.last.lock() {
            if let Some(hit) = slot.as_ref().filter(|eval| eval.x == *x) {
                return Ok((hit.value, hit.grad.clone()));
            }
        }
        let (value, grad) = self.f.calculate(x)?;
        validate_value(value)?;
        validate_grad(&grad, x.len())?;
        if let Ok(mut slot) = self.last.lock() {
            *slot = Some(Evaluation { x: x.clone(), value, grad: grad.clone() });
        }
        Ok((value, grad))
    }
}

impl<'a, F: DiffFunction + ?Sized> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let (value, _) = self.evaluate(theta)?;
        Ok(value)
    }
}

impl<'a, F: DiffFunction + ?Sized> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let (_, grad) = self.evaluate(theta)?;
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl DiffFunction for Counting {
        fn domain_dimension(&self) -> usize {
            2
        }

        fn calculate(&self, x: &Theta) -> OptResult<(Cost, Grad)> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((x.dot(x), 2.0 * x))
        }
    }

    struct Exploding;

    impl DiffFunction for Exploding {
        fn domain_dimension(&self) -> usize {
            1
        }

        fn calculate(&self, _x: &Theta) -> OptResult<(Cost, Grad)> {
            Ok((f64::INFINITY, array![0.0]))
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that paired `cost` + `gradient` calls at one point trigger a
    // single objective evaluation.
    //
    // Given
    // -----
    // - A counting objective and the same θ passed to both traits.
    //
    // Expect
    // ------
    // - Exactly one `calculate` call; a new θ triggers a second.
    fn adapter_memoizes_last_evaluation() {
        // Arrange
        let f = Counting { calls: AtomicUsize::new(0) };
        let adapter = ArgMinAdapter::new(&f);
        let theta = array![1.0, 2.0];

        // Act
        let cost = adapter.cost(&theta).expect("cost should evaluate");
        let grad = adapter.gradient(&theta).expect("gradient should evaluate");
        let _ = adapter.cost(&array![0.0, 0.0]).expect("cost should evaluate");

        // Assert
        assert_eq!(cost, 5.0);
        assert_eq!(grad, array![2.0, 4.0]);
        assert_eq!(f.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    // Purpose
    // -------
    // Ensure that a non-finite objective value is surfaced as
    // `NonFiniteCost` rather than handed to the solver.
    //
    // Given
    // -----
    // - An objective that always returns +∞.
    //
    // Expect
    // ------
    // - `cost` errors and the error converts back to `NonFiniteCost`.
    fn adapter_rejects_non_finite_cost() {
        // Arrange
        let adapter = ArgMinAdapter::new(&Exploding);

        // Act
        let err = adapter.cost(&array![0.0]).expect_err("infinite cost must fail");

        // Assert
        assert_eq!(OptError::from(err), OptError::NonFiniteCost { value: f64::INFINITY });
    }
}
