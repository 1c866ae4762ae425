//! Actual/365.25 day count convention.

use super::DayCount;
use crate::types::Date;

/// Days in the average Julian year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Actual/365.25 day count convention.
///
/// The day count is the actual number of days between dates and the year
/// basis is the average Julian year of 365.25 days, so leap years are
/// smoothed out rather than counted.
///
/// # Usage
///
/// - Time to maturity of market quotes when fitting yield curves
/// - Discounting horizons for present value
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365.25}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act36525;

impl DayCount for Act36525 {
    fn name(&self) -> &'static str {
        "ACT/365.25"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / DAYS_PER_YEAR
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
