//! Error types for risk aggregation.

use alm_cashflows::CashflowError;
use alm_core::CoreError;
use alm_curves::CurveError;
use thiserror::Error;

/// Result type for risk operations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur while building risk tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// Invalid argument to an aggregation.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the problem.
        reason: String,
    },

    /// Configuration could not be read or is inconsistent.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// Description of the problem.
        reason: String,
    },

    /// A table could not be written.
    #[error("Export failed: {reason}")]
    Export {
        /// Description of the problem.
        reason: String,
    },

    /// Core error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Curve error, e.g. the benchmark curve could not be fitted.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Cash-flow generation error.
    #[error(transparent)]
    Cashflow(#[from] CashflowError),
}

impl RiskError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create an export error.
    #[must_use]
    pub fn export(reason: impl Into<String>) -> Self {
        Self::Export {
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for RiskError {
    fn from(e: csv::Error) -> Self {
        Self::export(e.to_string())
    }
}

impl From<toml::de::Error> for RiskError {
    fn from(e: toml::de::Error) -> Self {
        Self::config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RiskError::invalid_argument("months_forward must be at least 1");
        assert!(err.to_string().contains("months_forward"));

        let err = RiskError::config("edges not increasing");
        assert!(err.to_string().contains("configuration"));
    }

    #[test]
    fn test_curve_error_is_transparent() {
        let inner = CurveError::insufficient_points("EUR01", 4, 1);
        let err: RiskError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let err: RiskError = toml::from_str::<toml::Table>("= broken").unwrap_err().into();
        assert!(matches!(err, RiskError::Config { .. }));
    }
}
