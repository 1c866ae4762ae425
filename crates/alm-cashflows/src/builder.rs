//! Instrument and portfolio cash-flow tables.
//!
//! For each instrument the builder lays out the remaining payment dates,
//! determines the per-period rate (the spread for fixed instruments, curve
//! resets plus spread for floating ones) and amortizes the volume over the
//! remaining periods.

use std::sync::Arc;

use alm_core::schedule::ScheduleRequest;
use alm_core::types::{Date, Instrument, IntoDate, MarketQuote};
use alm_curves::{CurveCache, FitConfig};
use tracing::{debug, info, warn};

use crate::amortization::{amortization_schedule, RatePath};
use crate::config::BuildConfig;
use crate::error::{CashflowError, CashflowResult};
use crate::parallel::maybe_parallel_map;
use crate::row::{CashflowRow, PortfolioCashflows};

const MONTHS_PER_YEAR: f64 = 12.0;
const BPS: f64 = 10_000.0;

/// Generates cash-flow tables against one set of market quotes and one
/// valuation date.
///
/// Curves needed by floating instruments are fitted on first use and
/// shared through a [`CurveCache`].
///
/// # Example
///
/// ```rust
/// use alm_cashflows::CashflowBuilder;
/// use alm_core::types::{Date, Instrument, Repayment};
///
/// let today = Date::from_ymd(2014, 9, 30).unwrap();
/// let loan = Instrument::builder("1")
///     .account("LOANS")
///     .volume(1_000_000.0)
///     .issue(Date::from_ymd(2013, 9, 30).unwrap())
///     .maturity(Date::from_ymd(2015, 9, 30).unwrap())
///     .ir_binding("FIX")
///     .spread(200.0)
///     .repayment(Repayment::Bullet)
///     .build()
///     .unwrap();
///
/// let builder = CashflowBuilder::new(&[], today).unwrap();
/// let rows = builder.for_instrument(&loan).unwrap();
/// assert_eq!(rows.len(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct CashflowBuilder<'a> {
    quotes: &'a [MarketQuote],
    today: Date,
    cache: Arc<CurveCache>,
    config: BuildConfig,
}

impl<'a> CashflowBuilder<'a> {
    /// Creates a builder for the given quotes and valuation date.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::Core` if `today` cannot be parsed.
    pub fn new(quotes: &'a [MarketQuote], today: impl IntoDate) -> CashflowResult<Self> {
        Ok(Self {
            quotes,
            today: today.into_date()?,
            cache: Arc::new(CurveCache::default()),
            config: BuildConfig::default(),
        })
    }

    /// Sets the portfolio processing configuration.
    #[must_use]
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Fits curves with `fit` in a fresh cache.
    #[must_use]
    pub fn with_fit_config(mut self, fit: FitConfig) -> Self {
        self.cache = Arc::new(CurveCache::new(fit));
        self
    }

    /// Shares an existing curve cache.
    ///
    /// Cached curves are keyed by curve identifier and valuation date only,
    /// so every builder sharing `cache` must use the same quotes. A builder
    /// with other quotes gets curves fitted to the first builder's quotes.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<CurveCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn today(&self) -> Date {
        self.today
    }

    /// Returns the curve cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<CurveCache> {
        &self.cache
    }

    /// Remaining payment dates of an instrument, chronological.
    ///
    /// Dates are laid out monthly backwards from maturity, every
    /// `payment_freq`-th one after today is kept. Matured instruments have
    /// none.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::Core` if the instrument's terms are invalid.
    pub fn payment_dates(&self, instrument: &Instrument) -> CashflowResult<Vec<Date>> {
        instrument.validate()?;
        let grid = ScheduleRequest::start_end_step(instrument.maturity, self.today, 1)?.generate()?;

        let mut dates: Vec<Date> = grid
            .into_iter()
            .filter(|&date| date > self.today)
            .step_by(instrument.payment_freq as usize)
            .collect();
        dates.reverse();
        Ok(dates)
    }

    /// Remaining rate reset dates of an instrument, chronological.
    ///
    /// Resets fall every `reprice_freq` months from issue; those before
    /// today are dropped.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::Core` if the instrument's terms are invalid.
    pub fn repricing_dates(&self, instrument: &Instrument) -> CashflowResult<Vec<Date>> {
        instrument.validate()?;
        let grid =
            ScheduleRequest::start_end_step(instrument.issue, instrument.maturity, 1)?.generate()?;

        Ok(grid
            .into_iter()
            .step_by(instrument.reprice_freq as usize)
            .filter(|&date| date >= self.today)
            .collect())
    }

    /// Per-period decimal rates for the given payment dates.
    ///
    /// # Errors
    ///
    /// Fails if the instrument's terms are invalid or its curve cannot be
    /// fitted.
    pub fn period_rates(
        &self,
        instrument: &Instrument,
        payment_dates: &[Date],
    ) -> CashflowResult<RatePath> {
        instrument.validate()?;
        let scale = f64::from(instrument.payment_freq) / MONTHS_PER_YEAR;
        let to_period = |bps: f64| bps / BPS * scale;

        if instrument.is_fixed() {
            return Ok(RatePath::Flat(to_period(instrument.spread)));
        }

        let resets = self.repricing_dates(instrument)?;
        if resets.is_empty() {
            debug!(
                "Instrument {} has no remaining resets, using spread only",
                instrument.id
            );
            return Ok(RatePath::Flat(to_period(instrument.spread)));
        }

        let curve_failure =
            |e| CashflowError::curve(&instrument.id, &instrument.yield_curve, e);
        let curve = self
            .cache
            .get_or_fit(&instrument.yield_curve, self.today, self.quotes)
            .map_err(curve_failure)?;
        let rates = curve
            .floating_yields(payment_dates, &resets)
            .map_err(curve_failure)?;

        Ok(RatePath::Periodic(
            rates
                .iter()
                .map(|r| to_period(r.rate_bps + instrument.spread))
                .collect(),
        ))
    }

    /// Cash-flow rows of one instrument, chronological.
    ///
    /// # Errors
    ///
    /// Fails if the instrument's terms are invalid or its curve cannot be
    /// fitted. The error names the instrument (and curve, where relevant).
    pub fn for_instrument(&self, instrument: &Instrument) -> CashflowResult<Vec<CashflowRow>> {
        self.project(instrument)
            .map_err(|e| e.for_instrument(&instrument.id))
    }

    fn project(&self, instrument: &Instrument) -> CashflowResult<Vec<CashflowRow>> {
        instrument.validate()?;

        let dates = self.payment_dates(instrument)?;
        if dates.is_empty() {
            debug!("Instrument {} has matured, no cash flows", instrument.id);
            return Ok(Vec::new());
        }

        let rates = self.period_rates(instrument, &dates)?;
        let schedule =
            amortization_schedule(&rates, dates.len(), instrument.volume, instrument.repayment)?;

        debug!(
            "Instrument {}: {} {} periods from {}",
            instrument.id,
            dates.len(),
            instrument.repayment,
            dates[0]
        );

        Ok(dates
            .iter()
            .enumerate()
            .map(|(i, &date)| CashflowRow {
                id: instrument.id.clone(),
                account: instrument.account.clone(),
                date,
                cashflow: schedule.cashflow[i],
                interest: schedule.interest[i],
                capital: schedule.capital[i],
                remaining: schedule.remaining[i],
            })
            .collect())
    }

    /// Cash-flow rows of every instrument, in portfolio order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing instrument in portfolio order.
    pub fn for_portfolio(&self, instruments: &[Instrument]) -> CashflowResult<Vec<CashflowRow>> {
        let results = maybe_parallel_map(instruments, &self.config, |i| self.for_instrument(i));

        let mut rows = Vec::new();
        for result in results {
            rows.extend(result?);
        }

        info!(
            "Generated {} cash flows for {} instruments",
            rows.len(),
            instruments.len()
        );
        Ok(rows)
    }

    /// Cash-flow rows of every instrument that can be projected.
    ///
    /// Failing instruments are skipped and reported in
    /// [`PortfolioCashflows::failures`]; rows of the others are unaffected.
    pub fn for_portfolio_collect(&self, instruments: &[Instrument]) -> PortfolioCashflows {
        let results = maybe_parallel_map(instruments, &self.config, |i| self.for_instrument(i));

        let mut out = PortfolioCashflows::default();
        for (instrument, result) in instruments.iter().zip(results) {
            match result {
                Ok(rows) => out.rows.extend(rows),
                Err(e) => {
                    warn!("Skipping instrument {}: {}", instrument.id, e);
                    out.failures.push((instrument.id.clone(), e));
                }
            }
        }

        info!(
            "Generated {} cash flows, {} of {} instruments failed",
            out.rows.len(),
            out.failures.len(),
            instruments.len()
        );
        out
    }
}
