//! Present value of projected cash flows.
//!
//! Each cash flow is discounted on the benchmark curve with
//! `df = (1 + spot / 10000)^(-t)`, `t` in Actual/365.25 years from the
//! valuation date, and the results are summed per instrument.

use std::collections::BTreeMap;

use alm_cashflows::CashflowRow;
use alm_core::daycounts::{time_difference, TimeUnit};
use alm_core::types::{Date, IntoDate, MarketQuote};
use alm_curves::{FitConfig, YieldCurve};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RiskConfig;
use crate::error::RiskResult;
use crate::export::Tabular;

/// Present value of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentValueRow {
    /// Instrument identifier.
    pub id: String,
    /// Account category.
    pub account: String,
    /// Sum of discounted cash flows.
    pub present_value: f64,
}

/// Present values per instrument, ordered by (id, account).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentValueTable {
    /// Valuation date.
    pub today: Date,
    /// One row per (id, account).
    pub rows: Vec<PresentValueRow>,
}

impl PresentValueTable {
    /// Sum over all instruments.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.present_value).sum()
    }

    /// Present value of one instrument, if it has cash flows.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        let matching: Vec<f64> = self
            .rows
            .iter()
            .filter(|r| r.id == id)
            .map(|r| r.present_value)
            .collect();
        (!matching.is_empty()).then(|| matching.iter().sum())
    }
}

impl Tabular for PresentValueTable {
    fn headers(&self) -> Vec<String> {
        vec!["id".into(), "account".into(), "date".into(), "present_value".into()]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.account.clone(),
                    self.today.to_string(),
                    r.present_value.to_string(),
                ]
            })
            .collect()
    }
}

/// Fits the benchmark curve and discounts every cash flow on it.
///
/// # Errors
///
/// Fails if the valuation date cannot be parsed or the benchmark curve
/// cannot be fitted from `quotes`.
pub fn present_value(
    rows: &[CashflowRow],
    quotes: &[MarketQuote],
    today: impl IntoDate,
    config: &RiskConfig,
) -> RiskResult<PresentValueTable> {
    let curve = YieldCurve::fit(&config.benchmark_curve, today, quotes, &FitConfig::default())?;
    Ok(present_value_on_curve(rows, &curve))
}

/// Discounts every cash flow on an already fitted curve.
///
/// The curve's valuation date becomes the table's.
#[must_use]
pub fn present_value_on_curve(rows: &[CashflowRow], curve: &YieldCurve) -> PresentValueTable {
    let today = curve.today();
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();

    for row in rows {
        let years = time_difference(row.date, today, TimeUnit::Years);
        let df = (1.0 + curve.spot_yield(row.date) / 10_000.0).powf(-years);
        *sums.entry((row.id.as_str(), row.account.as_str())).or_insert(0.0) += row.cashflow * df;
    }

    let table = PresentValueTable {
        today,
        rows: sums
            .into_iter()
            .map(|((id, account), present_value)| PresentValueRow {
                id: id.to_string(),
                account: account.to_string(),
                present_value,
            })
            .collect(),
    };

    info!(
        "Discounted {} cash flows of {} instruments on {}",
        rows.len(),
        table.rows.len(),
        curve.curve_id()
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use alm_math::svensson::Svensson;
    use approx::assert_relative_eq;

    fn today() -> Date {
        Date::from_ymd(2014, 9, 30).unwrap()
    }

    fn flat_curve(bps: f64) -> YieldCurve {
        YieldCurve::from_model("EUR01", today(), Svensson::new(bps, 0.0, 0.0, 0.0, 1.0, 1.0).unwrap())
    }

    fn row(id: &str, account: &str, date: Date, cashflow: f64) -> CashflowRow {
        CashflowRow {
            id: id.into(),
            account: account.into(),
            date,
            cashflow,
            interest: 0.0,
            capital: cashflow,
            remaining: 0.0,
        }
    }

    #[test]
    fn test_discount_on_flat_curve() {
        let one_year = today().add_days(365);
        let rows = vec![row("1", "LOANS", one_year, 1_000.0)];

        let table = present_value_on_curve(&rows, &flat_curve(200.0));

        let years = 365.0 / 365.25;
        assert_relative_eq!(table.rows[0].present_value, 1_000.0 * 1.02f64.powf(-years), epsilon = 1e-9);
        assert_eq!(table.today, today());
    }

    #[test]
    fn test_grouped_and_ordered() {
        let d = today().add_days(30);
        let rows = vec![
            row("2", "LOANS", d, 10.0),
            row("1", "LOANS", d, 5.0),
            row("2", "LOANS", d, 10.0),
            row("1", "DEPOSITS", d, -3.0),
        ];

        let table = present_value_on_curve(&rows, &flat_curve(0.0));

        let keys: Vec<(&str, &str)> = table
            .rows
            .iter()
            .map(|r| (r.id.as_str(), r.account.as_str()))
            .collect();
        assert_eq!(keys, vec![("1", "DEPOSITS"), ("1", "LOANS"), ("2", "LOANS")]);
        assert_relative_eq!(table.get("2").unwrap(), 20.0);
        assert_relative_eq!(table.get("1").unwrap(), 2.0);
        assert_relative_eq!(table.total(), 22.0);
        assert!(table.get("3").is_none());
    }

    #[test]
    fn test_missing_benchmark_quotes() {
        let err = present_value(&[], &[], today(), &RiskConfig::default()).unwrap_err();
        assert!(matches!(err, crate::error::RiskError::Curve(_)));
    }

    #[test]
    fn test_csv_carries_valuation_date() {
        let rows = vec![row("1", "LOANS", today().add_days(30), 10.0)];
        let csv = present_value_on_curve(&rows, &flat_curve(0.0)).to_csv_string().unwrap();
        assert!(csv.starts_with("id,account,date,present_value\n1,LOANS,2014-09-30,"));
    }
}
