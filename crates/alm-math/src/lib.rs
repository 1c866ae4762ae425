//! # ALM Math
//!
//! Numerical routines for the ALM balance-sheet risk library.
//!
//! This crate provides:
//!
//! - **Svensson**: The six-parameter Nelson-Siegel-Svensson curve
//! - **Linear Algebra**: Least-squares solving via SVD
//! - **Optimization**: Nelder-Mead simplex minimization
//! - **Calibration**: OLS fit of a Svensson curve to observed rates
//!
//! ## Example
//!
//! ```rust
//! use alm_math::prelude::*;
//!
//! let t = [0.5, 1.0, 2.0, 5.0, 10.0, 20.0];
//! let y = [10.0, 15.0, 25.0, 60.0, 95.0, 120.0];
//!
//! let fit = calibrate_svensson_ols(&t, &y, DEFAULT_INITIAL_TAUS, &OptimizationConfig::default())
//!     .unwrap();
//! assert_eq!(fit.points, 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::return_self_not_must_use)]

pub mod calibration;
pub mod error;
pub mod linear_algebra;
pub mod optimization;
pub mod svensson;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calibration::{
        betas_ols, calibrate_svensson_ols, SvenssonFit, DEFAULT_INITIAL_TAUS, MIN_OBSERVATIONS,
    };
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{residual_sum_of_squares, solve_least_squares};
    pub use crate::optimization::{nelder_mead, OptimizationConfig, OptimizationResult};
    pub use crate::svensson::Svensson;
}

pub use error::{MathError, MathResult};
