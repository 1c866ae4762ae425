//! Svensson curve calibration by ordinary least squares.
//!
//! For fixed decay factors (τ₁, τ₂) the curve is linear in its betas, so the
//! betas come from a least-squares solve on the factor loadings. The taus
//! are then chosen by Nelder-Mead to minimize the resulting sum of squared
//! residuals.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::{residual_sum_of_squares, solve_least_squares};
use crate::optimization::{nelder_mead, OptimizationConfig};
use crate::svensson::Svensson;

/// Minimum number of observations: one per beta.
pub const MIN_OBSERVATIONS: usize = 4;

/// Default starting decay factors.
pub const DEFAULT_INITIAL_TAUS: (f64, f64) = (2.0, 5.0);

/// Outcome of a Svensson calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvenssonFit {
    /// Fitted model.
    pub model: Svensson,
    /// Whether the tau search met its tolerance.
    pub converged: bool,
    /// Iterations used by the tau search.
    pub iterations: u32,
    /// Sum of squared residuals at the fitted parameters.
    pub residual: f64,
    /// Number of observations fitted.
    pub points: usize,
}

/// Betas minimizing squared error for fixed taus, with the residual.
///
/// # Errors
///
/// Returns an error if a tau is not positive or the least-squares solve
/// fails.
pub fn betas_ols(
    maturities: &[f64],
    rates: &[f64],
    taus: (f64, f64),
) -> MathResult<([f64; 4], f64)> {
    if taus.0 <= 0.0 || taus.1 <= 0.0 {
        return Err(MathError::invalid_input(format!(
            "taus must be positive, got ({}, {})",
            taus.0, taus.1
        )));
    }
    let design = DMatrix::from_fn(maturities.len(), 4, |row, col| {
        Svensson::loadings(maturities[row], taus.0, taus.1)[col]
    });
    let target = DVector::from_column_slice(rates);

    let solution = solve_least_squares(&design, &target)?;
    let residual = residual_sum_of_squares(&design, &solution, &target);

    Ok(([solution[0], solution[1], solution[2], solution[3]], residual))
}

/// Calibrates a Svensson curve to `(maturity, rate)` observations.
///
/// Non-convergence of the tau search is reported through
/// [`SvenssonFit::converged`]; callers decide whether to accept it.
///
/// # Errors
///
/// Returns `MathError::InvalidInput` if the inputs differ in length or
/// contain non-finite values, `MathError::InsufficientData` with fewer than
/// [`MIN_OBSERVATIONS`] points, and propagates least-squares failures at
/// the optimum.
pub fn calibrate_svensson_ols(
    maturities: &[f64],
    rates: &[f64],
    initial_taus: (f64, f64),
    config: &OptimizationConfig,
) -> MathResult<SvenssonFit> {
    if maturities.len() != rates.len() {
        return Err(MathError::invalid_input(format!(
            "got {} maturities and {} rates",
            maturities.len(),
            rates.len()
        )));
    }
    if maturities.len() < MIN_OBSERVATIONS {
        return Err(MathError::insufficient_data(
            MIN_OBSERVATIONS,
            maturities.len(),
        ));
    }
    if maturities.iter().chain(rates).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(
            "maturities and rates must be finite",
        ));
    }

    let objective = |taus: &[f64]| {
        betas_ols(maturities, rates, (taus[0], taus[1]))
            .map_or(f64::INFINITY, |(_, residual)| residual)
    };
    let search = nelder_mead(objective, &[initial_taus.0, initial_taus.1], config)?;

    let taus = (search.parameters[0], search.parameters[1]);
    let (betas, residual) = betas_ols(maturities, rates, taus)?;
    let model = Svensson::from_parts(betas, taus)?;

    log::debug!(
        "Svensson fit on {} points: taus=({:.4}, {:.4}), residual={:.3e}, converged={}",
        maturities.len(),
        taus.0,
        taus.1,
        residual,
        search.converged
    );

    Ok(SvenssonFit {
        model,
        converged: search.converged,
        iterations: search.iterations,
        residual,
        points: maturities.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn maturities() -> Vec<f64> {
        vec![0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0, 30.0]
    }

    #[test]
    fn test_betas_exact_for_known_taus() {
        let truth = Svensson::new(300.0, -150.0, 80.0, -40.0, 1.5, 6.0).unwrap();
        let t = maturities();
        let y = truth.values(&t);

        let (betas, residual) = betas_ols(&t, &y, (1.5, 6.0)).unwrap();

        for (fitted, expected) in betas.iter().zip(truth.betas()) {
            assert_relative_eq!(*fitted, expected, epsilon = 1e-6);
        }
        assert!(residual < 1e-12);
    }

    #[test]
    fn test_calibration_reproduces_smooth_curve() {
        let truth = Svensson::new(250.0, -200.0, 100.0, 50.0, 2.0, 5.0).unwrap();
        let t = maturities();
        let y = truth.values(&t);

        let fit = calibrate_svensson_ols(&t, &y, DEFAULT_INITIAL_TAUS, &OptimizationConfig::default())
            .unwrap();

        assert!(fit.converged);
        assert_eq!(fit.points, t.len());
        for (&ti, &yi) in t.iter().zip(&y) {
            assert_relative_eq!(fit.model.value(ti), yi, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_flat_curve() {
        let t = maturities();
        let y = vec![120.0; t.len()];

        let fit = calibrate_svensson_ols(&t, &y, DEFAULT_INITIAL_TAUS, &OptimizationConfig::default())
            .unwrap();

        for ti in [0.1, 1.0, 4.0, 12.0, 25.0] {
            assert_relative_eq!(fit.model.value(ti), 120.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_too_few_points() {
        let result = calibrate_svensson_ols(
            &[1.0, 2.0, 3.0],
            &[10.0, 20.0, 30.0],
            DEFAULT_INITIAL_TAUS,
            &OptimizationConfig::default(),
        );
        assert_eq!(result.unwrap_err(), MathError::insufficient_data(4, 3));
    }

    #[test]
    fn test_mismatched_lengths() {
        let result = calibrate_svensson_ols(
            &[1.0, 2.0, 3.0, 4.0],
            &[10.0, 20.0, 30.0],
            DEFAULT_INITIAL_TAUS,
            &OptimizationConfig::default(),
        );
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let truth = Svensson::new(250.0, -200.0, 100.0, 50.0, 0.7, 9.0).unwrap();
        let t = maturities();
        let y = truth.values(&t);

        let config = OptimizationConfig::default()
            .with_tolerance(1e-14)
            .with_max_iterations(3);
        let fit = calibrate_svensson_ols(&t, &y, DEFAULT_INITIAL_TAUS, &config).unwrap();

        assert!(!fit.converged);
        assert_eq!(fit.iterations, 3);
    }

    #[test]
    fn test_non_positive_taus_rejected() {
        assert!(betas_ols(&maturities(), &[0.0; 11], (0.0, 5.0)).is_err());
    }
}
