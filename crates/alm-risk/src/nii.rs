//! Net interest income by account and calendar year.

use std::collections::{BTreeMap, BTreeSet};

use alm_cashflows::CashflowRow;
use alm_core::types::{Date, IntoDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RiskResult;
use crate::export::Tabular;

/// Interest income per account and year, with a cross-account total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NiiTable {
    /// Calendar years, ascending.
    pub years: Vec<i32>,
    /// Interest per account, one value per year.
    pub by_account: BTreeMap<String, Vec<f64>>,
    /// Sum across accounts, one value per year.
    pub total: Vec<f64>,
}

impl NiiTable {
    /// Interest of one account in one year.
    #[must_use]
    pub fn get(&self, account: &str, year: i32) -> Option<f64> {
        let col = self.years.iter().position(|&y| y == year)?;
        self.by_account.get(account).map(|values| values[col])
    }

    /// Total interest of one year.
    #[must_use]
    pub fn total_for(&self, year: i32) -> Option<f64> {
        let col = self.years.iter().position(|&y| y == year)?;
        Some(self.total[col])
    }
}

impl Tabular for NiiTable {
    fn headers(&self) -> Vec<String> {
        std::iter::once("account".to_string())
            .chain(self.years.iter().map(ToString::to_string))
            .collect()
    }

    fn records(&self) -> Vec<Vec<String>> {
        let line = |name: &str, values: &[f64]| {
            std::iter::once(name.to_string())
                .chain(values.iter().map(ToString::to_string))
                .collect()
        };
        self.by_account
            .iter()
            .map(|(account, values)| line(account, values))
            .chain(std::iter::once(line("total", &self.total)))
            .collect()
    }
}

/// Breaks down interest of cash flows on or after `today` by account and
/// calendar year.
///
/// # Errors
///
/// Fails only if `today` cannot be parsed.
pub fn net_interest_income(rows: &[CashflowRow], today: impl IntoDate) -> RiskResult<NiiTable> {
    let today: Date = today.into_date()?;

    let mut by_date: BTreeMap<(Date, &str), f64> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.date >= today) {
        *by_date.entry((row.date, row.account.as_str())).or_insert(0.0) += row.interest;
    }

    let years: Vec<i32> = by_date
        .keys()
        .map(|(date, _)| date.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column = |year: i32| years.binary_search(&year).unwrap_or_default();

    let mut by_account: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut total = vec![0.0; years.len()];
    for ((date, account), interest) in by_date {
        let col = column(date.year());
        by_account
            .entry(account.to_string())
            .or_insert_with(|| vec![0.0; years.len()])[col] += interest;
        total[col] += interest;
    }

    debug!(
        "NII over {} years for {} accounts",
        years.len(),
        by_account.len()
    );
    Ok(NiiTable {
        years,
        by_account,
        total,
    })
}
