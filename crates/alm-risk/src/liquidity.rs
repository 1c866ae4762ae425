//! Liquidity gap over maturity buckets.
//!
//! Cash flows on or after the valuation date are summed per account into
//! day-offset buckets. Buckets are right-inclusive: with edges
//! `e0 < e1 < ... < en`, bucket `i` holds `(e_i, e_{i+1}]`. Offsets at or
//! below `e0` land in the first bucket and offsets beyond `en` in the last,
//! so every cash flow is counted exactly once.

use std::collections::BTreeMap;

use alm_cashflows::CashflowRow;
use alm_core::daycounts::{time_difference, TimeUnit};
use alm_core::types::{Date, IntoDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RiskConfig;
use crate::error::RiskResult;
use crate::export::Tabular;

/// Cash flows per account and liquidity bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityGapTable {
    /// Bucket labels, shortest first.
    pub labels: Vec<String>,
    /// Cash flow per account, one value per bucket.
    pub by_account: BTreeMap<String, Vec<f64>>,
}

impl LiquidityGapTable {
    /// Cash flow of one account in one bucket.
    #[must_use]
    pub fn get(&self, account: &str, label: &str) -> Option<f64> {
        let col = self.labels.iter().position(|l| l == label)?;
        self.by_account.get(account).map(|values| values[col])
    }

    /// Liquidity gap per bucket, summed across accounts.
    #[must_use]
    pub fn gap_by_bucket(&self) -> Vec<f64> {
        let mut gap = vec![0.0; self.labels.len()];
        for values in self.by_account.values() {
            for (g, v) in gap.iter_mut().zip(values) {
                *g += v;
            }
        }
        gap
    }

    /// Net liquidity position: the cumulative gap.
    #[must_use]
    pub fn net_liquidity_position(&self) -> Vec<f64> {
        self.gap_by_bucket()
            .into_iter()
            .scan(0.0, |acc, v| {
                *acc += v;
                Some(*acc)
            })
            .collect()
    }

    /// Sum of every bucketed cash flow.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.gap_by_bucket().iter().sum()
    }
}

impl Tabular for LiquidityGapTable {
    fn headers(&self) -> Vec<String> {
        std::iter::once("account".to_string())
            .chain(self.labels.iter().cloned())
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
            .chain([
                line("gap", &self.gap_by_bucket()),
                line("net_position", &self.net_liquidity_position()),
            ])
            .collect()
    }
}

/// Index of the right-inclusive bucket holding `days`, clamped to the
/// outer buckets.
fn bucket_index(edges: &[i64], days: i64) -> usize {
    let last = edges.len().saturating_sub(2);
    edges[1..]
        .iter()
        .position(|&upper| days <= upper)
        .unwrap_or(last)
}

/// Buckets cash flows on or after `today` by account and day offset.
///
/// # Errors
///
/// Fails if the bucket configuration is invalid or `today` cannot be
/// parsed.
pub fn liquidity_gap(
    rows: &[CashflowRow],
    today: impl IntoDate,
    config: &RiskConfig,
) -> RiskResult<LiquidityGapTable> {
    config.validate()?;
    let today: Date = today.into_date()?;
    let edges = &config.liquidity_edges;
    let labels = config.liquidity_labels.clone();

    let mut by_date: BTreeMap<(Date, &str), f64> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.date >= today) {
        *by_date.entry((row.date, row.account.as_str())).or_insert(0.0) += row.cashflow;
    }

    let mut by_account: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for ((date, account), cashflow) in by_date {
        let days = time_difference(date, today, TimeUnit::Days) as i64;
        let bucket = bucket_index(edges, days);
        debug!("{account} {date}: day {days} -> {}", labels[bucket]);
        by_account
            .entry(account.to_string())
            .or_insert_with(|| vec![0.0; labels.len()])[bucket] += cashflow;
    }

    info!(
        "Liquidity gap for {} accounts over {} buckets",
        by_account.len(),
        labels.len()
    );
    Ok(LiquidityGapTable { labels, by_account })
}
