//! Date schedule generation.
//!
//! Payment and repricing timelines are built from partial parameter sets:
//! two or three of start, end, length and step (in months). The four valid
//! shapes are resolved once, at the boundary, into a [`ScheduleRequest`];
//! generation then runs on a request whose shape is known.
//!
//! # Example
//!
//! ```rust
//! use alm_core::schedule::ScheduleRequest;
//! use alm_core::types::Date;
//!
//! let start = Date::from_ymd(2014, 1, 31).unwrap();
//! let dates = ScheduleRequest::start_length_step(start, 3, 1).unwrap().generate().unwrap();
//!
//! // Month stepping is applied to the running date
//! assert_eq!(dates[1], Date::from_ymd(2014, 2, 28).unwrap());
//! assert_eq!(dates[2], Date::from_ymd(2014, 3, 28).unwrap());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, IntoDate};

const MICROS_PER_DAY: i128 = 86_400_000_000;

/// A fully resolved schedule request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleRequest {
    /// `length` dates evenly spaced from `start` to `end`, both inclusive.
    StartEndLength {
        /// First date.
        start: Date,
        /// Last date.
        end: Date,
        /// Number of dates.
        length: usize,
    },
    /// `length` dates starting at `start`, `step` months apart.
    StartLengthStep {
        /// First date.
        start: Date,
        /// Number of dates.
        length: usize,
        /// Months between dates.
        step: u32,
    },
    /// `length` dates ending at `end`, generated backwards `step` months apart.
    EndLengthStep {
        /// Last date (first generated).
        end: Date,
        /// Number of dates.
        length: usize,
        /// Months between dates.
        step: u32,
    },
    /// Dates from `start` towards `end` (inclusive), `step` months apart.
    StartEndStep {
        /// First date.
        start: Date,
        /// Bound of the schedule.
        end: Date,
        /// Months between dates.
        step: u32,
    },
}

impl ScheduleRequest {
    /// Resolves a request from optional parameters.
    ///
    /// Dates may be given as anything [`IntoDate`] accepts; an absent date
    /// needs a type, e.g. `None::<Date>`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` when all parameters are absent,
    /// all are present, neither length nor step is given, length or step is
    /// not positive, or the present parameters match none of the four shapes.
    /// Returns `CoreError::InvalidDate` for a date string that does not parse.
    pub fn from_parts<S: IntoDate, E: IntoDate>(
        start: Option<S>,
        end: Option<E>,
        length: Option<i64>,
        step: Option<i64>,
    ) -> CoreResult<Self> {
        if start.is_none() && end.is_none() && length.is_none() && step.is_none() {
            return Err(CoreError::invalid_argument("all schedule parameters are missing"));
        }
        if start.is_some() && end.is_some() && length.is_some() && step.is_some() {
            return Err(CoreError::invalid_argument(
                "start, end, length and step cannot all be provided",
            ));
        }
        if length.is_none() && step.is_none() {
            return Err(CoreError::invalid_argument(
                "either length or step in months must be provided",
            ));
        }

        let start = start.map(IntoDate::into_date).transpose()?;
        let end = end.map(IntoDate::into_date).transpose()?;
        let length = length.map(positive_length).transpose()?;
        let step = step.map(positive_step).transpose()?;

        match (start, end, length, step) {
            (Some(start), Some(end), Some(length), None) => Ok(Self::StartEndLength { start, end, length }),
            (Some(start), None, Some(length), Some(step)) => Ok(Self::StartLengthStep { start, length, step }),
            (None, Some(end), Some(length), Some(step)) => Ok(Self::EndLengthStep { end, length, step }),
            (Some(start), Some(end), None, Some(step)) => Ok(Self::StartEndStep { start, end, step }),
            _ => Err(CoreError::invalid_argument(
                "valid parameter combinations are (start, end, length), (start, length, step), \
                 (end, length, step) and (start, end, step)",
            )),
        }
    }

    /// Creates a start-end-length request.
    pub fn start_end_length(start: Date, end: Date, length: i64) -> CoreResult<Self> {
        Self::from_parts(Some(start), Some(end), Some(length), None)
    }

    /// Creates a start-length-step request.
    pub fn start_length_step(start: Date, length: i64, step: i64) -> CoreResult<Self> {
        Self::from_parts(Some(start), None::<Date>, Some(length), Some(step))
    }

    /// Creates an end-length-step request.
    pub fn end_length_step(end: Date, length: i64, step: i64) -> CoreResult<Self> {
        Self::from_parts(None::<Date>, Some(end), Some(length), Some(step))
    }

    /// Creates a start-end-step request.
    pub fn start_end_step(start: Date, end: Date, step: i64) -> CoreResult<Self> {
        Self::from_parts(Some(start), Some(end), None, Some(step))
    }

    /// Generates the dates of the schedule.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if month stepping leaves the
    /// supported date range.
    pub fn generate(&self) -> CoreResult<Vec<Date>> {
        match *self {
            Self::StartEndLength { start, end, length } => Ok(evenly_spaced(start, end, length)),
            Self::StartLengthStep { start, length, step } => step_months(start, length, months(step)?),
            Self::EndLengthStep { end, length, step } => step_months(end, length, -months(step)?),
            Self::StartEndStep { start, end, step } => {
                let step = months(step)?;
                let mut dates = Vec::new();
                let mut current = start;
                if start < end {
                    while current <= end {
                        dates.push(current);
                        current = current.add_months(step)?;
                    }
                } else {
                    while current >= end {
                        dates.push(current);
                        current = current.add_months(-step)?;
                    }
                }
                Ok(dates)
            }
        }
    }
}

/// Generates a date range from optional parameters.
///
/// Shorthand for [`ScheduleRequest::from_parts`] followed by
/// [`ScheduleRequest::generate`].
pub fn date_range<S: IntoDate, E: IntoDate>(
    start: Option<S>,
    end: Option<E>,
    length: Option<i64>,
    step: Option<i64>,
) -> CoreResult<Vec<Date>> {
    ScheduleRequest::from_parts(start, end, length, step)?.generate()
}

fn positive_length(length: i64) -> CoreResult<usize> {
    if length <= 0 {
        return Err(CoreError::invalid_argument(format!(
            "length must be a positive integer, got {length}"
        )));
    }
    usize::try_from(length).map_err(|_| CoreError::invalid_argument(format!("length {length} is too large")))
}

fn positive_step(step: i64) -> CoreResult<u32> {
    if step <= 0 {
        return Err(CoreError::invalid_argument(format!(
            "step must be a positive number of months, got {step}"
        )));
    }
    u32::try_from(step).map_err(|_| CoreError::invalid_argument(format!("step {step} is too large")))
}

fn months(step: u32) -> CoreResult<i32> {
    i32::try_from(step).map_err(|_| CoreError::invalid_argument(format!("step {step} is too large")))
}

/// Evenly spaced dates with microsecond-resolution intervals, truncated to the day.
///
/// The last date is pinned to `end`; a rounded interval can otherwise land
/// one microsecond short of it.
fn evenly_spaced(start: Date, end: Date, length: usize) -> Vec<Date> {
    if length == 1 {
        return vec![start];
    }

    let total = i128::from(start.days_between(&end)) * MICROS_PER_DAY;
    let interval = div_round_half_even(total, (length - 1) as i128);

    (0..length)
        .map(|i| {
            if i == length - 1 {
                return end;
            }
            let offset = (i as i128 * interval).div_euclid(MICROS_PER_DAY);
            start.add_days(offset as i64)
        })
        .collect()
}

fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    match (2 * remainder).cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
    }
}

fn step_months(anchor: Date, length: usize, step: i32) -> CoreResult<Vec<Date>> {
    let mut dates = Vec::with_capacity(length);
    let mut current = anchor;
    for _ in 0..length {
        dates.push(current);
        current = current.add_months(step)?;
    }
    Ok(dates)
}
