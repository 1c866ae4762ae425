//! # ALM Curves
//!
//! Nelson-Siegel-Svensson yield curves for the ALM balance-sheet risk library.
//!
//! This crate provides:
//!
//! - **Fitting**: [`YieldCurve::fit`] calibrates a curve to market quotes
//! - **Queries**: Spot, one-period forward and floating (reset) yields
//! - **Caching**: [`CurveCache`] shares fitted curves across threads
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use alm_curves::prelude::*;
//!
//! let curve = YieldCurve::fit("EUR01", "2014-09-30", &quotes, &FitConfig::default())?;
//!
//! let spot = curve.spot_yield(date);
//! let forwards = curve.forward_yields(&reset_dates);
//! let floating = curve.floating_yields(&payment_dates, &reset_dates)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]

pub mod cache;
pub mod config;
pub mod error;
pub mod yield_curve;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cache::CurveCache;
    pub use crate::config::FitConfig;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::yield_curve::{DatedRate, FitStatus, YieldCurve};
}

pub use cache::CurveCache;
pub use config::FitConfig;
pub use error::{CurveError, CurveResult};
pub use yield_curve::{DatedRate, FitStatus, YieldCurve};
