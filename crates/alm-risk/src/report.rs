//! One-shot risk run over a portfolio.

use std::path::Path;
use std::sync::Arc;

use alm_cashflows::{CashflowBuilder, CashflowRow};
use alm_core::types::{Date, Instrument, IntoDate, MarketQuote};
use alm_curves::CurveCache;
use tracing::info;

use crate::config::AlmConfig;
use crate::error::{RiskError, RiskResult};
use crate::export::Tabular;
use crate::liquidity::{liquidity_gap, LiquidityGapTable};
use crate::nii::{net_interest_income, NiiTable};
use crate::present_value::{present_value_on_curve, PresentValueTable};
use crate::repricing::{repricing_gap_table, RepricingGapTable};

/// Cash flows and every gap table of one portfolio on one valuation date.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskReport {
    /// Valuation date.
    pub today: Date,
    /// Projected cash flows, portfolio order.
    pub cashflows: Vec<CashflowRow>,
    /// Present value per instrument.
    pub present_value: PresentValueTable,
    /// Net interest income per account and year.
    pub nii: NiiTable,
    /// Repricing gap over the configured horizon.
    pub repricing_gap: RepricingGapTable,
    /// Liquidity gap per account and bucket.
    pub liquidity_gap: LiquidityGapTable,
}

impl RiskReport {
    /// Projects the portfolio and builds every table.
    ///
    /// Curves are fitted once per identifier with `config.fit` and shared
    /// between cash-flow generation and discounting.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, on the first instrument that
    /// cannot be projected, or if the benchmark curve cannot be fitted.
    pub fn generate(
        portfolio: &[Instrument],
        quotes: &[MarketQuote],
        today: impl IntoDate,
        config: &AlmConfig,
    ) -> RiskResult<Self> {
        config.validate()?;
        let today = today.into_date()?;
        let cache = Arc::new(CurveCache::new(config.fit));

        let builder = CashflowBuilder::new(quotes, today)?
            .with_config(config.cashflows)
            .with_cache(Arc::clone(&cache));
        let cashflows = builder.for_portfolio(portfolio)?;

        let benchmark = cache.get_or_fit(&config.risk.benchmark_curve, today, quotes)?;
        let report = Self {
            today,
            present_value: present_value_on_curve(&cashflows, &benchmark),
            nii: net_interest_income(&cashflows, today)?,
            repricing_gap: repricing_gap_table(
                portfolio,
                today,
                config.risk.months_forward,
                &config.risk,
            )?,
            liquidity_gap: liquidity_gap(&cashflows, today, &config.risk)?,
            cashflows,
        };

        info!(
            "Risk report for {} instruments on {}: {} cash flows, PV {:.2}",
            portfolio.len(),
            today,
            report.cashflows.len(),
            report.present_value.total()
        );
        Ok(report)
    }

    /// Writes each table as a CSV file into `dir`.
    ///
    /// Files: `cashflows.csv`, `present_value.csv`, `nii.csv`,
    /// `repricing_gap.csv`, `liquidity_gap.csv`.
    pub fn write_csv_dir(&self, dir: impl AsRef<Path>) -> RiskResult<()> {
        let dir = dir.as_ref();
        let create = |name: &str| {
            let path = dir.join(name);
            std::fs::File::create(&path)
                .map_err(|e| RiskError::export(format!("{}: {e}", path.display())))
        };

        self.cashflows.write_csv(create("cashflows.csv")?)?;
        self.present_value.write_csv(create("present_value.csv")?)?;
        self.nii.write_csv(create("nii.csv")?)?;
        self.repricing_gap.write_csv(create("repricing_gap.csv")?)?;
        self.liquidity_gap.write_csv(create("liquidity_gap.csv")?)?;

        info!("Wrote risk tables to {}", dir.display());
        Ok(())
    }
}
