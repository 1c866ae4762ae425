//! # ALM Risk
//!
//! Balance-sheet interest-rate and liquidity risk tables built from
//! projected cash flows.
//!
//! ## Design Philosophy
//!
//! - **Pure aggregations**: Every table is computed from explicit inputs
//! - **Named columns**: Tables carry their labels and export as CSV
//! - **Config-driven buckets**: Horizons and bucket edges come from
//!   [`RiskConfig`], loadable from TOML through [`AlmConfig`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use alm_risk::prelude::*;
//!
//! let config = AlmConfig::from_file("alm.toml")?;
//! let report = RiskReport::generate(&portfolio, &quotes, "2014-09-30", &config)?;
//!
//! println!("{}", report.liquidity_gap.to_csv_string()?);
//! report.write_csv_dir("out")?;
//! ```
//!
//! ## Module Overview
//!
//! - [`present_value`] - Discounted cash flows per instrument
//! - [`nii`] - Net interest income by account and year
//! - [`repricing`] - Repricing gap over monthly buckets
//! - [`liquidity`] - Liquidity gap and net liquidity position
//! - [`report`] - All of the above in one run
//! - [`export`] - CSV writing
//! - [`config`] - Risk and whole-run configuration
//!
//! ## Feature Flags
//!
//! - `parallel`: Generate cash flows on rayon workers for large portfolios

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]

pub mod config;
pub mod error;
pub mod export;
pub mod liquidity;
pub mod nii;
pub mod present_value;
pub mod report;
pub mod repricing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{AlmConfig, RiskConfig};
    pub use crate::error::{RiskError, RiskResult};
    pub use crate::export::Tabular;
    pub use crate::liquidity::{liquidity_gap, LiquidityGapTable};
    pub use crate::nii::{net_interest_income, NiiTable};
    pub use crate::present_value::{present_value, present_value_on_curve, PresentValueTable};
    pub use crate::report::RiskReport;
    pub use crate::repricing::{repricing_gap, repricing_gap_table, RepricingGapTable};
}

pub use config::{AlmConfig, RiskConfig};
pub use error::{RiskError, RiskResult};
pub use export::Tabular;
pub use report::RiskReport;
