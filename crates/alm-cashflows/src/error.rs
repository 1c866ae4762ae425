//! Error types for cash-flow generation.

use alm_core::CoreError;
use alm_curves::CurveError;
use thiserror::Error;

/// A specialized Result type for cash-flow generation.
pub type CashflowResult<T> = Result<T, CashflowError>;

/// Errors that can occur while generating cash flows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CashflowError {
    /// Invalid amortization input.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the problem.
        reason: String,
    },

    /// The instrument's curve could not be fitted or queried.
    #[error("Instrument '{id}' on curve '{curve_id}': {source}")]
    Curve {
        /// Instrument identifier.
        id: String,
        /// Curve identifier.
        curve_id: String,
        /// Underlying curve failure.
        #[source]
        source: CurveError,
    },

    /// The instrument's terms are invalid.
    #[error("Instrument '{id}': {source}")]
    Instrument {
        /// Instrument identifier.
        id: String,
        /// Underlying failure.
        #[source]
        source: Box<CashflowError>,
    },

    /// Error from core types.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CashflowError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Wraps a curve failure with the instrument and curve that hit it.
    #[must_use]
    pub fn curve(id: impl Into<String>, curve_id: impl Into<String>, source: CurveError) -> Self {
        Self::Curve {
            id: id.into(),
            curve_id: curve_id.into(),
            source,
        }
    }

    /// Attaches an instrument identifier to a failure that lacks one.
    #[must_use]
    pub fn for_instrument(self, id: &str) -> Self {
        match self {
            Self::Curve { .. } | Self::Instrument { .. } => self,
            other => Self::Instrument {
                id: id.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Identifier of the instrument that failed, if known.
    #[must_use]
    pub fn instrument_id(&self) -> Option<&str> {
        match self {
            Self::Curve { id, .. } | Self::Instrument { id, .. } => Some(id),
            _ => None,
        }
    }
}
