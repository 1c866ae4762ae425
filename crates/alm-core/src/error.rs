//! Error types for the ALM core crate.
//!
//! This module defines the error types shared by dates, schedules and the
//! instrument data model.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed or contradictory parameters.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid argument.
        reason: String,
    },

    /// Error in date calculations or an unparseable date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Instrument terms violate a data-model invariant.
    #[error("Invalid instrument '{id}': {reason}")]
    InvalidInstrument {
        /// The instrument identifier.
        id: String,
        /// The violated invariant.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an invalid-argument condition.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
