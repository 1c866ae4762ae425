//! Cash-flow table rows.

use alm_core::types::Date;
use serde::{Deserialize, Serialize};

use crate::error::CashflowError;

/// One projected payment of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Instrument identifier.
    pub id: String,
    /// Account category of the instrument.
    pub account: String,
    /// Payment date.
    pub date: Date,
    /// Total payment (capital + interest).
    pub cashflow: f64,
    /// Interest component.
    pub interest: f64,
    /// Principal component.
    pub capital: f64,
    /// Outstanding balance reported for the period.
    pub remaining: f64,
}

/// Portfolio cash flows with the instruments that could not be projected.
#[derive(Debug, Clone, Default)]
pub struct PortfolioCashflows {
    /// Rows of every successfully projected instrument, in portfolio order.
    pub rows: Vec<CashflowRow>,
    /// Instrument identifiers with the failure that excluded them.
    pub failures: Vec<(String, CashflowError)>,
}

impl PortfolioCashflows {
    /// Returns true if every instrument was projected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
