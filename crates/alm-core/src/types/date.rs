//! Date type for balance-sheet calculations.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{CoreError, CoreResult};

/// A calendar date, truncated to the day.
///
/// This is a newtype wrapper around `chrono::NaiveDate`. Every schedule,
/// cash flow and quote in the library is expressed in this type.
///
/// # Example
///
/// ```rust
/// use alm_core::types::Date;
///
/// let date = Date::from_ymd(2014, 9, 30).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next.month(), 10);
/// assert_eq!(next.day(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Jan 31 + 1 month),
    /// it rolls back to the last valid day of the month. Negative values
    /// move backwards.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let max_day = days_in_month(new_year, new_month);
        let new_day = self.day().min(max_day);

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<NaiveDateTime> for Date {
    /// Discards the time of day.
    fn from(datetime: NaiveDateTime) -> Self {
        Date(datetime.date())
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl std::str::FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add<i64> for Date {
    type Output = Self;

    /// Adds days to a date.
    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Self;

    /// Subtracts days from a date.
    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

/// Conversion of caller-supplied date values into a [`Date`].
///
/// Valuation dates and schedule bounds arrive either as structured dates or
/// as ISO `YYYY-MM-DD` strings. Both are normalised here, once, at the API
/// boundary.
pub trait IntoDate {
    /// Converts the value into a day-truncated [`Date`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` for strings that do not parse.
    fn into_date(self) -> CoreResult<Date>;
}

impl IntoDate for Date {
    fn into_date(self) -> CoreResult<Date> {
        Ok(self)
    }
}

impl IntoDate for NaiveDate {
    fn into_date(self) -> CoreResult<Date> {
        Ok(Date(self))
    }
}

impl IntoDate for NaiveDateTime {
    fn into_date(self) -> CoreResult<Date> {
        Ok(Date::from(self))
    }
}

impl IntoDate for &str {
    fn into_date(self) -> CoreResult<Date> {
        Date::parse(self)
    }
}

impl IntoDate for String {
    fn into_date(self) -> CoreResult<Date> {
        Date::parse(&self)
    }
}

impl IntoDate for &String {
    fn into_date(self) -> CoreResult<Date> {
        Date::parse(self)
    }
}

/// Helper function to get days in a month for a given year.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month is always normalised to 1..=12"),
    }
}

/// Helper function to check if a year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2014, 9, 30).unwrap();
        assert_eq!(date.year(), 2014);
        assert_eq!(date.month(), 9);
        assert_eq!(date.day(), 30);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let date = Date::from_ymd(2025, 1, 31).unwrap();
        let result = date.add_months(1).unwrap();
        assert_eq!(result, Date::from_ymd(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_add_negative_months_across_year() {
        let date = Date::from_ymd(2015, 1, 15).unwrap();
        assert_eq!(
            date.add_months(-2).unwrap(),
            Date::from_ymd(2014, 11, 15).unwrap()
        );
        assert_eq!(
            date.add_months(-13).unwrap(),
            Date::from_ymd(2013, 12, 15).unwrap()
        );
    }

    #[test]
    fn test_days_between() {
        let d1 = Date::from_ymd(2025, 1, 1).unwrap();
        let d2 = Date::from_ymd(2025, 1, 31).unwrap();
        assert_eq!(d1.days_between(&d2), 30);
        assert_eq!(d2 - d1, 30);
    }

    #[test]
    fn test_parse() {
        let date = Date::parse("2014-09-30").unwrap();
        assert_eq!(date, Date::from_ymd(2014, 9, 30).unwrap());
        assert!(Date::parse("30/09/2014").is_err());
    }

    #[test]
    fn test_datetime_is_truncated() {
        let dt = NaiveDate::from_ymd_opt(2014, 9, 30)
            .unwrap()
            .and_hms_opt(17, 45, 3)
            .unwrap();
        assert_eq!(Date::from(dt), Date::from_ymd(2014, 9, 30).unwrap());
    }

    #[test]
    fn test_into_date_normalises_inputs() {
        let expected = Date::from_ymd(2014, 9, 30).unwrap();
        assert_eq!("2014-09-30".into_date().unwrap(), expected);
        assert_eq!(String::from("2014-09-30").into_date().unwrap(), expected);
        assert_eq!(expected.as_naive_date().into_date().unwrap(), expected);
        assert!("not a date".into_date().is_err());
    }

    #[test]
    fn test_display() {
        let date = Date::from_ymd(2025, 6, 5).unwrap();
        assert_eq!(format!("{}", date), "2025-06-05");
    }

    #[test]
    fn test_serde() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-06-15\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);
    }
}
