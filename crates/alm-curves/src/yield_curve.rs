//! Fitted Nelson-Siegel-Svensson yield curve.
//!
//! A [`YieldCurve`] is fitted once for a curve identifier and valuation date
//! and never changes afterwards. All rates are in basis points; times are
//! Actual/365.25 year fractions from the valuation date.

use alm_core::daycounts::{time_difference, time_differences, TimeUnit};
use alm_core::types::{Date, IntoDate, MarketQuote};
use alm_math::calibration::calibrate_svensson_ols;
use alm_math::svensson::Svensson;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::FitConfig;
use crate::error::{CurveError, CurveResult};

/// Outcome of the calibration that produced a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStatus {
    /// Whether the calibration met its tolerance.
    pub converged: bool,
    /// Iterations used by the tau search.
    pub iterations: u32,
    /// Sum of squared residuals in bp².
    pub residual: f64,
    /// Number of quotes fitted.
    pub points: usize,
}

/// A rate effective on a date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedRate {
    /// Date the rate applies to.
    pub date: Date,
    /// Rate in basis points.
    pub rate_bps: f64,
}

/// An immutable fitted yield curve.
///
/// # Example
///
/// ```rust
/// use alm_core::types::{Date, MarketQuote};
/// use alm_curves::prelude::*;
/// use alm_math::svensson::Svensson;
///
/// let today = Date::from_ymd(2014, 9, 30).unwrap();
/// let market = YieldCurve::from_model("EUR01", today, Svensson::new(150.0, -140.0, 40.0, 20.0, 2.0, 5.0).unwrap());
/// let quotes: Vec<MarketQuote> = [3, 12, 36, 60, 120, 360]
///     .iter()
///     .map(|&months| {
///         let date = today.add_months(months).unwrap();
///         MarketQuote::new("EUR01", date, market.spot_yield(date), format!("{months}M"))
///     })
///     .collect();
///
/// let curve = YieldCurve::fit("EUR01", today, &quotes, &FitConfig::default()).unwrap();
/// let one_year = today.add_months(12).unwrap();
/// assert!((curve.spot_yield(one_year) - market.spot_yield(one_year)).abs() < 0.01);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurve {
    curve_id: String,
    today: Date,
    model: Svensson,
    status: FitStatus,
}

impl YieldCurve {
    /// Fits a curve to the quotes carrying `curve_id`.
    ///
    /// Quotes for other curves are ignored.
    ///
    /// # Errors
    ///
    /// - `CurveError::InsufficientPoints` with fewer than `config.min_points`
    ///   matching quotes
    /// - `CurveError::NotConverged` if calibration stops at its iteration
    ///   limit
    /// - `CurveError::InvalidArgument` for an invalid config or unparseable
    ///   valuation date
    pub fn fit(
        curve_id: impl Into<String>,
        today: impl IntoDate,
        quotes: &[MarketQuote],
        config: &FitConfig,
    ) -> CurveResult<Self> {
        let curve_id = curve_id.into();
        let today = today.into_date()?;
        config.validate()?;

        let (maturities, rates): (Vec<f64>, Vec<f64>) = quotes
            .iter()
            .filter(|q| q.is_for(&curve_id))
            .map(|q| (time_difference(q.date, today, TimeUnit::Years), q.rate_bps))
            .unzip();

        if maturities.len() < config.min_points {
            return Err(CurveError::insufficient_points(
                curve_id,
                config.min_points,
                maturities.len(),
            ));
        }

        info!("Fitting curve {} on {} with {} quotes", curve_id, today, maturities.len());

        let fit = calibrate_svensson_ols(
            &maturities,
            &rates,
            config.initial_taus,
            &config.optimization(),
        )?;

        if !fit.converged {
            warn!("Curve {} did not converge after {} iterations", curve_id, fit.iterations);
            return Err(CurveError::not_converged(curve_id, fit.iterations, fit.residual));
        }

        info!(
            "Curve {} fitted: residual={:.3e}, iterations={}",
            curve_id, fit.residual, fit.iterations
        );

        Ok(Self {
            curve_id,
            today,
            model: fit.model,
            status: FitStatus {
                converged: fit.converged,
                iterations: fit.iterations,
                residual: fit.residual,
                points: fit.points,
            },
        })
    }

    /// Wraps an already calibrated model.
    #[must_use]
    pub fn from_model(curve_id: impl Into<String>, today: Date, model: Svensson) -> Self {
        Self {
            curve_id: curve_id.into(),
            today,
            model,
            status: FitStatus {
                converged: true,
                iterations: 0,
                residual: 0.0,
                points: 0,
            },
        }
    }

    /// Returns the curve identifier.
    #[must_use]
    pub fn curve_id(&self) -> &str {
        &self.curve_id
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn today(&self) -> Date {
        self.today
    }

    /// Returns the fitted model.
    #[must_use]
    pub fn model(&self) -> &Svensson {
        &self.model
    }

    /// Returns the calibration status.
    #[must_use]
    pub fn status(&self) -> &FitStatus {
        &self.status
    }

    /// Spot yield in bp for a date.
    #[must_use]
    pub fn spot_yield(&self, date: Date) -> f64 {
        self.model.value(time_difference(date, self.today, TimeUnit::Years))
    }

    /// Spot yields in bp, in input order.
    #[must_use]
    pub fn spot_yields(&self, dates: &[Date]) -> Vec<f64> {
        self.model
            .values(&time_differences(dates, self.today, TimeUnit::Years))
    }

    /// One-period forward yields in bp, in input order.
    ///
    /// Dates are ranked chronologically (stable for ties). The earliest date
    /// gets its spot yield; each later date gets the rate implied between
    /// the previous date and itself, with compounding factors
    /// `(1 + r / 10000)^τ`.
    #[must_use]
    pub fn forward_yields(&self, dates: &[Date]) -> Vec<f64> {
        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);

        let mut forwards = vec![0.0; dates.len()];
        let mut previous_factor: Option<f64> = None;
        for &i in &order {
            let date = dates[i];
            let tau = time_difference(date, self.today, TimeUnit::Years);
            let spot = self.model.value(tau);
            let factor = (1.0 + spot / 10_000.0).powf(tau);

            forwards[i] = match previous_factor {
                None => spot,
                Some(previous) => 10_000.0 * (factor / previous - 1.0),
            };
            previous_factor = Some(factor);
        }
        forwards
    }

    /// Rates in force on each repayment date for an instrument resetting on
    /// `repricing_dates`.
    ///
    /// Each reset fixes the forward yield at its date, the first reset its
    /// spot yield. A repayment date takes the rate of the latest reset on or
    /// before it; repayment dates before the first reset take the first
    /// reset's rate. Output is one entry per repayment date, chronological.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::EmptyInput` if `repricing_dates` is empty.
    pub fn floating_yields(
        &self,
        repayment_dates: &[Date],
        repricing_dates: &[Date],
    ) -> CurveResult<Vec<DatedRate>> {
        if repricing_dates.is_empty() {
            return Err(CurveError::empty_input(format!(
                "no repricing dates for curve '{}'",
                self.curve_id
            )));
        }

        let mut resets = repricing_dates.to_vec();
        resets.sort_unstable();
        resets.dedup();
        let reset_rates = self.forward_yields(&resets);

        let mut repayments = repayment_dates.to_vec();
        repayments.sort();

        debug!(
            "Floating yields on curve {}: {} resets, {} repayment dates",
            self.curve_id,
            resets.len(),
            repayments.len()
        );

        Ok(repayments
            .into_iter()
            .map(|date| {
                let in_force = resets.partition_point(|&reset| reset <= date);
                DatedRate {
                    date,
                    rate_bps: reset_rates[in_force.saturating_sub(1)],
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(2014, 9, 30)
    }

    fn sample_curve() -> YieldCurve {
        let model = Svensson::new(200.0, -150.0, 50.0, 30.0, 2.0, 5.0).unwrap();
        YieldCurve::from_model("EUR01", today(), model)
    }

    fn quotes() -> Vec<MarketQuote> {
        let model = sample_curve();
        [1, 3, 6, 12, 24, 36, 60, 84, 120, 240, 360]
            .iter()
            .map(|&m| {
                let d = today().add_months(m).unwrap();
                MarketQuote::new("EUR01", d, model.spot_yield(d), format!("{m}M"))
            })
            .collect()
    }

    #[test]
    fn test_fit_recovers_quotes() {
        let quotes = quotes();
        let curve = YieldCurve::fit("EUR01", today(), &quotes, &FitConfig::default()).unwrap();

        assert_eq!(curve.curve_id(), "EUR01");
        assert_eq!(curve.status().points, quotes.len());
        assert!(curve.status().converged);
        for q in &quotes {
            assert_relative_eq!(curve.spot_yield(q.date), q.rate_bps, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_fit_accepts_iso_date() {
        let curve = YieldCurve::fit("EUR01", "2014-09-30", &quotes(), &FitConfig::default()).unwrap();
        assert_eq!(curve.today(), today());
    }

    #[test]
    fn test_fit_ignores_other_curves() {
        let mut quotes = quotes();
        quotes.truncate(3);
        quotes.extend(
            (1..=6).map(|y| MarketQuote::new("USD01", today().add_months(12 * y).unwrap(), 300.0, "")),
        );

        let err = YieldCurve::fit("EUR01", today(), &quotes, &FitConfig::default()).unwrap_err();
        assert_eq!(err, CurveError::insufficient_points("EUR01", 4, 3));
    }

    #[test]
    fn test_fit_reports_non_convergence() {
        let config = FitConfig::default()
            .with_initial_taus(0.5, 12.0)
            .with_tolerance(1e-14)
            .with_max_iterations(2);

        let err = YieldCurve::fit("EUR01", today(), &quotes(), &config).unwrap_err();
        assert!(matches!(err, CurveError::NotConverged { iterations: 2, .. }));
    }

    #[test]
    fn test_spot_yields_preserve_order() {
        let curve = sample_curve();
        let dates = [date(2024, 9, 30), date(2015, 9, 30), date(2019, 9, 30)];

        let yields = curve.spot_yields(&dates);

        for (d, y) in dates.iter().zip(&yields) {
            assert_relative_eq!(*y, curve.spot_yield(*d));
        }
    }

    #[test]
    fn test_forward_of_single_date_is_spot() {
        let curve = sample_curve();
        let d = date(2016, 3, 31);
        assert_eq!(curve.forward_yields(&[d]), vec![curve.spot_yield(d)]);
    }

    #[test]
    fn test_forward_yields_unsorted_input() {
        let curve = sample_curve();
        let d1 = date(2015, 9, 30);
        let d2 = date(2016, 9, 30);

        let sorted = curve.forward_yields(&[d1, d2]);
        let reversed = curve.forward_yields(&[d2, d1]);

        assert_eq!(sorted[0], reversed[1]);
        assert_eq!(sorted[1], reversed[0]);

        let t1 = time_difference(d1, today(), TimeUnit::Years);
        let t2 = time_difference(d2, today(), TimeUnit::Years);
        let f1 = (1.0 + curve.spot_yield(d1) / 10_000.0).powf(t1);
        let f2 = (1.0 + curve.spot_yield(d2) / 10_000.0).powf(t2);
        assert_relative_eq!(sorted[1], 10_000.0 * (f2 / f1 - 1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_floating_single_reset_applies_everywhere() {
        let curve = sample_curve();
        let reset = date(2014, 10, 30);
        let repayments = [date(2015, 1, 30), date(2014, 10, 30), date(2014, 12, 30)];

        let rates = curve.floating_yields(&repayments, &[reset]).unwrap();

        assert_eq!(rates.len(), 3);
        assert!(rates.windows(2).all(|w| w[0].date < w[1].date));
        let expected = curve.spot_yield(reset);
        assert!(rates.iter().all(|r| r.rate_bps == expected));
    }

    #[test]
    fn test_floating_carries_last_reset_forward() {
        let curve = sample_curve();
        let resets = [date(2015, 3, 31), date(2014, 9, 30)];
        let repayments = [
            date(2014, 12, 31),
            date(2015, 3, 31),
            date(2015, 6, 30),
        ];

        let forwards = curve.forward_yields(&[date(2014, 9, 30), date(2015, 3, 31)]);
        let rates = curve.floating_yields(&repayments, &resets).unwrap();

        assert_eq!(rates[0].rate_bps, forwards[0]);
        assert_eq!(rates[1].rate_bps, forwards[1]);
        assert_eq!(rates[2].rate_bps, forwards[1]);
    }

    #[test]
    fn test_floating_backfills_before_first_reset() {
        let curve = sample_curve();
        let reset = date(2015, 6, 30);
        let rates = curve
            .floating_yields(&[date(2015, 3, 31), date(2015, 9, 30)], &[reset])
            .unwrap();

        assert_eq!(rates[0].rate_bps, curve.spot_yield(reset));
        assert_eq!(rates[1].rate_bps, curve.spot_yield(reset));
    }

    #[test]
    fn test_floating_requires_resets() {
        let curve = sample_curve();
        let err = curve.floating_yields(&[date(2015, 3, 31)], &[]).unwrap_err();
        assert!(matches!(err, CurveError::EmptyInput { .. }));
    }
}
