//! Day count conventions and time differences.
//!
//! Curve fitting and discounting measure time in Actual/365.25 years;
//! gap bucketing measures it in calendar days. Both go through
//! [`time_difference`] so the two units can never drift apart.
//!
//! # Usage
//!
//! ```rust
//! use alm_core::daycounts::{time_difference, DayCount, Act36525, TimeUnit};
//! use alm_core::types::Date;
//!
//! let today = Date::from_ymd(2014, 9, 30).unwrap();
//! let payment = Date::from_ymd(2015, 3, 31).unwrap();
//!
//! let days = time_difference(payment, today, TimeUnit::Days);
//! let years = time_difference(payment, today, TimeUnit::Years);
//! assert_eq!(days, 182.0);
//! assert_eq!(years, Act36525.year_fraction(today, payment));
//! ```

mod act365;

pub use act365::{Act36525, DAYS_PER_YEAR};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end` is before `start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Returns the number of days according to the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Unit of a time difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Actual/365.25 years.
    Years,
    /// Calendar days.
    Days,
}

impl FromStr for TimeUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "years" => Ok(Self::Years),
            "days" => Ok(Self::Days),
            other => Err(CoreError::invalid_argument(format!(
                "unit of time can be either 'years' or 'days', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years => f.write_str("years"),
            Self::Days => f.write_str("days"),
        }
    }
}

/// Time elapsed from `from` to `date` in the requested unit.
#[must_use]
pub fn time_difference(date: Date, from: Date, unit: TimeUnit) -> f64 {
    match unit {
        TimeUnit::Days => Act36525.day_count(from, date) as f64,
        TimeUnit::Years => Act36525.year_fraction(from, date),
    }
}

/// Vectorised [`time_difference`], preserving input order.
#[must_use]
pub fn time_differences(dates: &[Date], from: Date, unit: TimeUnit) -> Vec<f64> {
    dates
        .iter()
        .map(|&date| time_difference(date, from, unit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_unit_parse() {
        assert_eq!("years".parse::<TimeUnit>().unwrap(), TimeUnit::Years);
        assert_eq!("days".parse::<TimeUnit>().unwrap(), TimeUnit::Days);

        let err = "months".parse::<TimeUnit>().unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_time_differences_preserve_order() {
        let today = Date::from_ymd(2014, 9, 30).unwrap();
        let dates = vec![
            Date::from_ymd(2014, 12, 31).unwrap(),
            Date::from_ymd(2014, 10, 30).unwrap(),
            Date::from_ymd(2014, 9, 1).unwrap(),
        ];

        let days = time_differences(&dates, today, TimeUnit::Days);
        assert_eq!(days, vec![92.0, 30.0, -29.0]);
    }
}
