//! Domain types for balance-sheet risk analytics.
//!
//! - [`Date`]: Day-truncated calendar date
//! - [`Instrument`]: Loan or deposit position
//! - [`MarketQuote`]: Quoted point of a term structure

mod date;
mod instrument;
mod quote;

pub use date::{Date, IntoDate};
pub use instrument::{Instrument, InstrumentBuilder, RateBinding, Repayment};
pub use quote::MarketQuote;
