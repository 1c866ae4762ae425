//! # ALM Cashflows
//!
//! Amortization schedules and instrument cash-flow tables for the ALM
//! balance-sheet risk library.
//!
//! This crate provides:
//!
//! - **Amortization**: Bullet, linear and annuity repayment schedules
//! - **Builder**: Per-instrument and portfolio cash-flow tables, with
//!   floating rates taken from fitted yield curves
//! - **Parallel**: Optional rayon-backed portfolio generation (`parallel`
//!   feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use alm_cashflows::prelude::*;
//!
//! let builder = CashflowBuilder::new(&quotes, "2014-09-30")?
//!     .with_config(BuildConfig::default().with_threshold(500));
//!
//! let rows = builder.for_portfolio(&portfolio)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod amortization;
pub mod builder;
pub mod config;
pub mod error;
mod parallel;
pub mod row;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::amortization::{amortization_schedule, AmortizationSchedule, RatePath};
    pub use crate::builder::CashflowBuilder;
    pub use crate::config::BuildConfig;
    pub use crate::error::{CashflowError, CashflowResult};
    pub use crate::row::{CashflowRow, PortfolioCashflows};
}

pub use builder::CashflowBuilder;
pub use error::{CashflowError, CashflowResult};
pub use row::{CashflowRow, PortfolioCashflows};
