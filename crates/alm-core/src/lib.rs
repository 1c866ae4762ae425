//! # ALM Core
//!
//! Core types, dates and schedules for the ALM balance-sheet risk library.
//!
//! This crate provides the foundational building blocks used throughout ALM:
//!
//! - **Types**: `Date`, `Instrument`, `MarketQuote`
//! - **Day Counts**: Actual/365.25 year fractions and day differences
//! - **Schedules**: Payment and repricing timelines from partial parameters
//!
//! ## Example
//!
//! ```rust
//! use alm_core::prelude::*;
//!
//! let dates = date_range(Some("2014-09-30"), None::<Date>, Some(4), Some(3)).unwrap();
//! assert_eq!(dates.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod daycounts;
pub mod error;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{time_difference, time_differences, Act36525, DayCount, TimeUnit};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::schedule::{date_range, ScheduleRequest};
    pub use crate::types::{Date, Instrument, InstrumentBuilder, IntoDate, MarketQuote, RateBinding, Repayment};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, Instrument, IntoDate, MarketQuote, RateBinding, Repayment};
