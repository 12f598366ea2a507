//! Checks applied at the minimizer boundary.
//!
//! Tolerances are validated when options are built; evaluation points and
//! gradients before and after every objective call; the final estimate
//! once the solver stops. All checks report the first offending entry.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{Grad, Theta},
};
use ndarray::Array1;

/// `Some(tol)` must be finite and > 0; `None` passes.
pub fn verify_tolerance(name: &'static str, tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(value) if !(value.is_finite() && value > 0.0) => {
            Err(OptError::InvalidTolerance { name, value })
        }
        _ => Ok(()),
    }
}

pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    verify_tolerance("tol_grad", tol)
}

pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    verify_tolerance("tol_cost", tol)
}

/// Index and value of the first NaN/±inf entry, if any.
pub fn first_non_finite(values: &Array1<f64>) -> Option<(usize, f64)> {
    values.iter().copied().enumerate().find(|(_, v)| !v.is_finite())
}

fn check_vector(what: &'static str, values: &Array1<f64>, dim: usize) -> OptResult<()> {
    if values.len() != dim {
        return Err(OptError::DimensionMismatch { what, expected: dim, found: values.len() });
    }
    match first_non_finite(values) {
        Some((index, value)) => Err(OptError::NonFiniteEntry { what, index, value }),
        None => Ok(()),
    }
}

/// Evaluation point: length `dim`, all entries finite.
pub fn validate_theta_input(theta: &Theta, dim: usize) -> OptResult<()> {
    check_vector("theta", theta, dim)
}

/// Gradient: length `dim`, all entries finite.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    check_vector("gradient", grad, dim)
}

/// Final estimate: present and finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    check_vector("theta_hat", &theta, theta.len())?;
    Ok(theta)
}

/// Objective value must be finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}
