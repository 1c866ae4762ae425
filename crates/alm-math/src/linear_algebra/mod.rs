//! Linear algebra utilities.
//!
//! Least-squares solving for the linear part of parametric curve fits.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Solves the least-squares problem `min ||A x - b||²` by SVD.
///
/// Singular values below `ε · max(m, n) · σ_max` are treated as zero, so
/// rank-deficient systems return the minimum-norm solution instead of
/// failing.
///
/// # Errors
///
/// Returns `MathError::InvalidInput` if the row counts of `a` and `b`
/// differ, the system is empty, or it contains non-finite entries.
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let (rows, cols) = a.shape();
    if rows != b.len() {
        return Err(MathError::invalid_input(format!(
            "design matrix has {rows} rows but right-hand side has {}",
            b.len()
        )));
    }
    if rows == 0 || cols == 0 {
        return Err(MathError::invalid_input("least-squares system is empty"));
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(
            "least-squares system contains non-finite values",
        ));
    }

    let svd = a.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = f64::EPSILON * rows.max(cols) as f64 * sigma_max;

    svd.solve(b, eps).map_err(|_| MathError::SingularMatrix)
}

/// Sum of squared residuals `||A x - b||²`.
pub fn residual_sum_of_squares(a: &DMatrix<f64>, x: &DVector<f64>, b: &DVector<f64>) -> f64 {
    (a * x - b).norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line_fit() {
        // y = 1 + 2x
        let a = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![1.0, 3.0, 5.0, 7.0]);

        let x = solve_least_squares(&a, &b).unwrap();

        assert_relative_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-10);
        assert_relative_eq!(residual_sum_of_squares(&a, &x, &b), 0.0, epsilon = 1e-18);
    }

    #[test]
    fn test_overdetermined_mean() {
        // Constant model fits the mean
        let a = DMatrix::from_element(3, 1, 1.0);
        let b = DVector::from_vec(vec![1.0, 2.0, 6.0]);

        let x = solve_least_squares(&a, &b).unwrap();

        assert_relative_eq!(x[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(residual_sum_of_squares(&a, &x, &b), 14.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rank_deficient_returns_minimum_norm() {
        // Two identical columns: the weight is split evenly
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let b = DVector::from_vec(vec![2.0, 4.0, 6.0]);

        let x = solve_least_squares(&a, &b).unwrap();

        assert_relative_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = DMatrix::from_element(3, 2, 1.0);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_least_squares(&a, &b),
            Err(MathError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let a = DMatrix::from_element(2, 1, 1.0);
        let b = DVector::from_vec(vec![1.0, f64::NAN]);
        assert!(solve_least_squares(&a, &b).is_err());
    }
}
