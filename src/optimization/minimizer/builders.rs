//! L-BFGS solver construction.
//!
//! Builders pin the line search, apply `lbfgs_mem`, the optional gradient
//! and cost tolerances, and (for L1 training) argmin's OWL-QN mode, which
//! minimizes `f(x) + λ‖x‖₁` with pseudo-gradients and orthant-projected
//! steps. Starting point and `max_iters` belong to the executor
//! (`run::execute_solver`).
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::MinimizerOptions,
        types::{DEFAULT_LBFGS_MEM, HagerZhangLS, Lbfgs, MoreThuenteLS},
    },
};

/// L-BFGS with Hager–Zhang line search, configured from `opts`.
///
/// # Errors
/// - argmin's rejection of a tolerance or of the L1 coefficient, as
///   `OptError`.
pub fn build_hager_zhang(opts: &MinimizerOptions, l1_coefficient: Option<f64>) -> OptResult<Lbfgs<HagerZhangLS>> {
    configure_lbfgs(Lbfgs::new(HagerZhangLS::new(), history_len(opts)), opts, l1_coefficient)
}

/// L-BFGS with More–Thuente line search, configured from `opts`.
///
/// # Errors
/// - As [`build_hager_zhang`].
pub fn build_more_thuente(opts: &MinimizerOptions, l1_coefficient: Option<f64>) -> OptResult<Lbfgs<MoreThuenteLS>> {
    configure_lbfgs(Lbfgs::new(MoreThuenteLS::new(), history_len(opts)), opts, l1_coefficient)
}

fn history_len(opts: &MinimizerOptions) -> usize {
    opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM)
}

/// Install the tolerances that are set (argmin keeps its defaults for the
/// rest) and switch to OWL-QN when `l1_coefficient` is given.
///
/// # Errors
/// - argmin's rejection of any setting, as `OptError`.
pub fn configure_lbfgs<LS>(
    solver: Lbfgs<LS>, opts: &MinimizerOptions, l1_coefficient: Option<f64>,
) -> OptResult<Lbfgs<LS>> {
    let solver = match opts.tols.tol_grad {
        Some(tol) => solver.with_tolerance_grad(tol)?,
        None => solver,
    };
    let solver = match opts.tols.tol_cost {
        Some(tol) => solver.with_tolerance_cost(tol)?,
        None => solver,
    };
    Ok(match l1_coefficient {
        Some(l1) => solver.with_l1_regularization(l1)?,
        None => solver,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::minimizer::traits::{LineSearcher, MinimizerOptions, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover construction of both solver flavors, propagation of
    // `lbfgs_mem`, and the tolerance / L1 wiring in `configure_lbfgs`.
    // End-to-end executor behavior is exercised through `LbfgsMinimizer`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure both builders succeed with default memory and valid tolerances.
    //
    // Given
    // -----
    // - Valid `Tolerances` and `lbfgs_mem = None`.
    //
    // Expect
    // ------
    // - Both builders return `Ok(_)`.
    fn builders_use_default_memory_when_none() {
        // Arrange
        let tols =
            Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).expect("Tolerances should be valid");
        let hz = MinimizerOptions::new(tols, LineSearcher::HagerZhang, false, None)
            .expect("MinimizerOptions should be valid");
        let mt = MinimizerOptions::new(tols, LineSearcher::MoreThuente, false, None)
            .expect("MinimizerOptions should be valid");

        // Act / Assert
        assert!(build_hager_zhang(&hz, None).is_ok());
        assert!(build_more_thuente(&mt, None).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Confirm that an explicit memory size and an L1 coefficient are accepted.
    //
    // Given
    // -----
    // - `lbfgs_mem = Some(5)` and `l1_coefficient = Some(0.25)`.
    //
    // Expect
    // ------
    // - The More–Thuente builder returns `Ok(_)`.
    fn builder_accepts_memory_and_l1_coefficient() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(25)).expect("Tolerances should be valid");
        let opts = MinimizerOptions::new(tols, LineSearcher::MoreThuente, false, Some(5))
            .expect("MinimizerOptions should be valid");

        // Act
        let solver = build_more_thuente(&opts, Some(0.25));

        // Assert
        assert!(solver.is_ok(), "Builder should accept a positive L1 coefficient");
    }

    #[test]
    // Purpose
    // -------
    // Verify that Argmin's own validation of the L1 coefficient surfaces as
    // an `OptError` instead of a panic.
    //
    // Given
    // -----
    // - A raw solver and `l1_coefficient = Some(-1.0)`.
    //
    // Expect
    // ------
    // - `configure_lbfgs` returns `Err(_)`.
    fn configure_lbfgs_rejects_negative_l1_coefficient() {
        // Arrange
        let raw = Lbfgs::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).expect("Tolerances should be valid");
        let opts = MinimizerOptions::new(tols, LineSearcher::MoreThuente, false, None)
            .expect("MinimizerOptions should be valid");

        // Act
        let configured = configure_lbfgs(raw, &opts, Some(-1.0));

        // Assert
        assert!(configured.is_err());
    }
}
