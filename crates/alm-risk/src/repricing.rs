//! Repricing gap over monthly buckets.
//!
//! A floating instrument contributes its full volume to every bucket in
//! which one of its remaining reset dates falls. Bucket `k` (1-based)
//! covers days `[(k - 1) * w, k * w)` after the valuation date, `w` being
//! the configured bucket width; resets beyond the horizon are ignored.
//! Fixed instruments never reprice.

use alm_cashflows::CashflowBuilder;
use alm_core::daycounts::{time_difference, TimeUnit};
use alm_core::types::{Instrument, IntoDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RiskConfig;
use crate::error::{RiskError, RiskResult};
use crate::export::Tabular;

/// Repriced volume per monthly bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricingGapTable {
    /// Volume repricing in each bucket, `1M` first.
    pub gap: Vec<f64>,
}

impl RepricingGapTable {
    /// Number of buckets.
    #[must_use]
    pub fn months_forward(&self) -> usize {
        self.gap.len()
    }

    /// Bucket labels `1M`, `2M`, ...
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        (1..=self.gap.len()).map(|m| format!("{m}M")).collect()
    }

    /// Running sum of the gap.
    #[must_use]
    pub fn cumulative(&self) -> Vec<f64> {
        self.gap
            .iter()
            .scan(0.0, |acc, v| {
                *acc += v;
                Some(*acc)
            })
            .collect()
    }
}

impl Tabular for RepricingGapTable {
    fn headers(&self) -> Vec<String> {
        std::iter::once(String::new()).chain(self.labels()).collect()
    }

    fn records(&self) -> Vec<Vec<String>> {
        let line = |name: &str, values: &[f64]| {
            std::iter::once(name.to_string())
                .chain(values.iter().map(ToString::to_string))
                .collect()
        };
        vec![line("volume", &self.gap), line("cumulative", &self.cumulative())]
    }
}

/// Repricing gap of one instrument over `months_forward` buckets.
///
/// # Errors
///
/// Fails if `months_forward` is zero, the configured bucket width is zero,
/// `today` cannot be parsed or the instrument's dates are invalid.
pub fn repricing_gap(
    instrument: &Instrument,
    today: impl IntoDate,
    months_forward: u32,
    config: &RiskConfig,
) -> RiskResult<Vec<f64>> {
    let builder = CashflowBuilder::new(&[], today)?;
    gap_of(&builder, instrument, months_forward, config)
}

/// Repricing gap of a portfolio, summed across instruments.
///
/// # Errors
///
/// Same conditions as [`repricing_gap`], for any instrument.
pub fn repricing_gap_table(
    portfolio: &[Instrument],
    today: impl IntoDate,
    months_forward: u32,
    config: &RiskConfig,
) -> RiskResult<RepricingGapTable> {
    let builder = CashflowBuilder::new(&[], today)?;

    let mut gap = vec![0.0; months_forward as usize];
    for instrument in portfolio {
        for (total, v) in gap
            .iter_mut()
            .zip(gap_of(&builder, instrument, months_forward, config)?)
        {
            *total += v;
        }
    }

    info!(
        "Repricing gap over {} months for {} instruments",
        months_forward,
        portfolio.len()
    );
    Ok(RepricingGapTable { gap })
}

fn gap_of(
    builder: &CashflowBuilder<'_>,
    instrument: &Instrument,
    months_forward: u32,
    config: &RiskConfig,
) -> RiskResult<Vec<f64>> {
    if months_forward == 0 {
        return Err(RiskError::invalid_argument("months_forward must be at least 1"));
    }
    if config.repricing_bucket_days == 0 {
        return Err(RiskError::invalid_argument(
            "repricing_bucket_days must be at least 1",
        ));
    }

    let mut gap = vec![0.0; months_forward as usize];
    if instrument.is_fixed() {
        return Ok(gap);
    }
    instrument.validate()?;

    let width = f64::from(config.repricing_bucket_days);
    for reset in builder.repricing_dates(instrument)? {
        let days = time_difference(reset, builder.today(), TimeUnit::Days);
        let bucket = (days / width).floor() as usize;
        if let Some(slot) = gap.get_mut(bucket) {
            *slot += instrument.volume;
        }
    }

    debug!("Repricing gap of {}: {:?}", instrument.id, gap);
    Ok(gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alm_core::types::{Date, Repayment};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn floater(id: &str, volume: f64, reprice_freq: u32) -> Instrument {
        Instrument::builder(id)
            .account("LOANS")
            .volume(volume)
            .issue(date(2014, 6, 30))
            .maturity(date(2016, 6, 30))
            .ir_binding("LIBOR")
            .spread(100.0)
            .repayment(Repayment::Bullet)
            .reprice_freq(reprice_freq)
            .build()
            .unwrap()
    }

    #[test]
    fn test_fixed_never_reprices() {
        let mut instrument = floater("1", 1_000.0, 1);
        instrument.ir_binding = "FIX".into();

        let gap = repricing_gap(&instrument, date(2014, 9, 30), 6, &RiskConfig::default()).unwrap();

        assert_eq!(gap, vec![0.0; 6]);
    }

    #[test]
    fn test_quarterly_resets() {
        // Resets: Jun 30, Sep 30, Dec 30 2014, then Mar 28, Jun 28, Sep 28 2015
        let gap =
            repricing_gap(&floater("1", 1_000.0, 3), date(2014, 9, 30), 12, &RiskConfig::default())
                .unwrap();

        // Sep 30 -> day 0 -> 1M, Dec 30 -> day 91 -> 4M, Mar 28 -> day 179 -> 6M,
        // Jun 28 -> day 271 -> 10M, Sep 28 -> day 363 -> past the horizon
        let mut expected = vec![0.0; 12];
        for k in [0, 3, 5, 9] {
            expected[k] = 1_000.0;
        }
        assert_eq!(gap, expected);
    }

    #[test]
    fn test_bucket_boundary_opens_next_bucket() {
        // Day 30 belongs to 2M
        let mut instrument = floater("1", 500.0, 1);
        instrument.issue = date(2014, 10, 30);
        instrument.maturity = date(2014, 11, 30);

        let gap = repricing_gap(&instrument, date(2014, 9, 30), 3, &RiskConfig::default()).unwrap();

        assert_eq!(gap, vec![0.0, 500.0, 500.0]);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let result = repricing_gap(&floater("1", 1.0, 1), date(2014, 9, 30), 0, &RiskConfig::default());
        assert!(matches!(result, Err(RiskError::InvalidArgument { .. })));
    }

    #[test]
    fn test_table_sums_and_cumulates() {
        let portfolio = vec![
            floater("1", 1_000.0, 3),
            floater("2", -400.0, 3),
            {
                let mut fixed = floater("3", 9_999.0, 1);
                fixed.ir_binding = "FIX".into();
                fixed
            },
        ];

        let table =
            repricing_gap_table(&portfolio, date(2014, 9, 30), 12, &RiskConfig::default()).unwrap();

        assert_eq!(table.months_forward(), 12);
        assert_eq!(table.labels()[11], "12M");
        assert_relative_eq!(table.gap[0], 600.0);
        assert_relative_eq!(table.gap[1], 0.0);
        assert_relative_eq!(table.cumulative()[11], 2_400.0);
    }

    #[test]
    fn test_csv_rows() {
        let table = RepricingGapTable { gap: vec![1.0, 2.0] };
        assert_eq!(
            table.to_csv_string().unwrap(),
            ",1M,2M\nvolume,1,2\ncumulative,1,3\n"
        );
    }
}
