//! Configuration for yield curve fitting.

use alm_math::calibration::{DEFAULT_INITIAL_TAUS, MIN_OBSERVATIONS};
use alm_math::optimization::OptimizationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Configuration for Svensson curve calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Minimum number of quotes required to fit a curve.
    pub min_points: usize,

    /// Starting decay factors (τ₁, τ₂) for the tau search.
    pub initial_taus: (f64, f64),

    /// Convergence tolerance of the tau search.
    pub tolerance: f64,

    /// Iteration limit of the tau search. `0` uses 200 per parameter.
    pub max_iterations: u32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_points: MIN_OBSERVATIONS,
            initial_taus: DEFAULT_INITIAL_TAUS,
            tolerance: 1e-4,
            max_iterations: 0,
        }
    }
}

impl FitConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum number of quotes.
    #[must_use]
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Sets the starting decay factors.
    #[must_use]
    pub fn with_initial_taus(mut self, tau1: f64, tau2: f64) -> Self {
        self.initial_taus = (tau1, tau2);
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that the settings can drive a calibration.
    pub fn validate(&self) -> CurveResult<()> {
        if self.min_points < MIN_OBSERVATIONS {
            return Err(CurveError::invalid_argument(format!(
                "min_points must be at least {MIN_OBSERVATIONS}, got {}",
                self.min_points
            )));
        }
        let (tau1, tau2) = self.initial_taus;
        if !(tau1 > 0.0 && tau2 > 0.0 && tau1.is_finite() && tau2.is_finite()) {
            return Err(CurveError::invalid_argument(format!(
                "initial taus must be positive, got ({tau1}, {tau2})"
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(CurveError::invalid_argument(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    pub(crate) fn optimization(&self) -> OptimizationConfig {
        OptimizationConfig::default()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = FitConfig::default();
        assert_eq!(config.min_points, 4);
        assert_eq!(config.initial_taus, (2.0, 5.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = FitConfig::new()
            .with_min_points(6)
            .with_initial_taus(1.0, 8.0)
            .with_tolerance(1e-6)
            .with_max_iterations(1000);

        assert_eq!(config.min_points, 6);
        assert_eq!(config.initial_taus, (1.0, 8.0));
        assert_eq!(config.optimization().max_iterations, 1000);
    }

    #[test]
    fn test_validation() {
        assert!(FitConfig::new().with_min_points(3).validate().is_err());
        assert!(FitConfig::new().with_initial_taus(0.0, 5.0).validate().is_err());
        assert!(FitConfig::new().with_tolerance(-1.0).validate().is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let config: FitConfig = serde_json::from_str(r#"{"min_points": 5}"#).unwrap();
        assert_eq!(config.min_points, 5);
        assert_eq!(config.initial_taus, (2.0, 5.0));
    }
}
