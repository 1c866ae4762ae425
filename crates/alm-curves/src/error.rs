//! Error types for curve operations.
//!
//! Fit failures carry the curve identifier so callers higher up the stack
//! can report which term structure could not be built.

use alm_core::CoreError;
use alm_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Not enough quotes to calibrate the curve.
    #[error("Insufficient points for curve '{curve_id}': need at least {required}, got {got}")]
    InsufficientPoints {
        /// Curve identifier.
        curve_id: String,
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// Calibration stopped before meeting its tolerance.
    #[error(
        "Curve '{curve_id}' did not converge after {iterations} iterations (residual: {residual:.2e})"
    )]
    NotConverged {
        /// Curve identifier.
        curve_id: String,
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// A required input sequence was empty.
    #[error("Empty input: {reason}")]
    EmptyInput {
        /// What was empty.
        reason: String,
    },

    /// Invalid argument or configuration.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the problem.
        reason: String,
    },

    /// Numerical error from calibration.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Error from core types.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an insufficient points error.
    #[must_use]
    pub fn insufficient_points(curve_id: impl Into<String>, required: usize, got: usize) -> Self {
        Self::InsufficientPoints {
            curve_id: curve_id.into(),
            required,
            got,
        }
    }

    /// Creates a not-converged error.
    #[must_use]
    pub fn not_converged(curve_id: impl Into<String>, iterations: u32, residual: f64) -> Self {
        Self::NotConverged {
            curve_id: curve_id.into(),
            iterations,
            residual,
        }
    }

    /// Creates an empty input error.
    #[must_use]
    pub fn empty_input(reason: impl Into<String>) -> Self {
        Self::EmptyInput {
            reason: reason.into(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Returns true for the two ways a fit can fail.
    #[must_use]
    pub fn is_fit_failure(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPoints { .. } | Self::NotConverged { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_curve() {
        let err = CurveError::insufficient_points("EUR01", 4, 2);
        assert_eq!(
            err.to_string(),
            "Insufficient points for curve 'EUR01': need at least 4, got 2"
        );
        assert!(err.is_fit_failure());

        let err = CurveError::not_converged("EUR01", 400, 1.5);
        assert!(err.to_string().contains("EUR01"));
        assert!(err.is_fit_failure());

        assert!(!CurveError::empty_input("repricing dates").is_fit_failure());
    }
}
