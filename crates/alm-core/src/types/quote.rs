//! Market rate quotes.

use serde::{Deserialize, Serialize};

use super::Date;

/// A single point of a market term structure.
///
/// A set of quotes sharing `curve_id` is the input of one yield curve fit.
/// The loader's `type` and `comment` column names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Identifier of the curve the quote belongs to.
    #[serde(alias = "type")]
    pub curve_id: String,
    /// Maturity date of the quoted rate.
    pub date: Date,
    /// Quoted rate in basis points.
    #[serde(alias = "rate")]
    pub rate_bps: f64,
    /// Free-text tenor label.
    #[serde(default, alias = "comment")]
    pub label: String,
}

impl MarketQuote {
    /// Creates a new quote.
    #[must_use]
    pub fn new(curve_id: impl Into<String>, date: Date, rate_bps: f64, label: impl Into<String>) -> Self {
        Self {
            curve_id: curve_id.into(),
            date,
            rate_bps,
            label: label.into(),
        }
    }

    /// Returns true if the quote belongs to the given curve.
    #[must_use]
    pub fn is_for(&self, curve_id: &str) -> bool {
        self.curve_id == curve_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_loader_columns() {
        let json = r#"{"type": "EUR01", "date": "2015-09-30", "rate": 12.5, "comment": "1Y"}"#;
        let quote: MarketQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.curve_id, "EUR01");
        assert_eq!(quote.rate_bps, 12.5);
        assert_eq!(quote.label, "1Y");
        assert!(quote.is_for("EUR01"));
        assert!(!quote.is_for("USD01"));
    }
}
