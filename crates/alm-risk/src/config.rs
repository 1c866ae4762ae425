//! Configuration for risk aggregation.
//!
//! [`RiskConfig`] drives the gap tables; [`AlmConfig`] bundles it with the
//! curve-fitting and cash-flow settings and loads from TOML:
//!
//! ```toml
//! [fit]
//! max_iterations = 1000
//!
//! [cashflows]
//! parallel_threshold = 500
//!
//! [risk]
//! benchmark_curve = "EUR01"
//! months_forward = 24
//! ```

use std::path::Path;

use alm_cashflows::config::BuildConfig;
use alm_curves::FitConfig;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Default liquidity bucket edges in days.
pub const DEFAULT_LIQUIDITY_EDGES: [i64; 9] = [0, 30, 90, 180, 360, 720, 1800, 3600, 7200];

/// Default liquidity bucket labels.
pub const DEFAULT_LIQUIDITY_LABELS: [&str; 8] =
    ["1M", "2-3M", "3-6M", "6-12M", "1-2Y", "2-5Y", "5-10Y", ">10Y"];

/// Configuration for the gap tables and discounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Curve used for discounting.
    pub benchmark_curve: String,

    /// Number of monthly repricing buckets.
    pub months_forward: u32,

    /// Width of one repricing bucket in days.
    pub repricing_bucket_days: u32,

    /// Liquidity bucket edges in days, strictly increasing.
    pub liquidity_edges: Vec<i64>,

    /// One label per liquidity bucket.
    pub liquidity_labels: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            benchmark_curve: "EUR01".to_string(),
            months_forward: 12,
            repricing_bucket_days: 30,
            liquidity_edges: DEFAULT_LIQUIDITY_EDGES.to_vec(),
            liquidity_labels: DEFAULT_LIQUIDITY_LABELS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl RiskConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the discounting curve.
    #[must_use]
    pub fn with_benchmark_curve(mut self, curve_id: impl Into<String>) -> Self {
        self.benchmark_curve = curve_id.into();
        self
    }

    /// Sets the repricing horizon in months.
    #[must_use]
    pub fn with_months_forward(mut self, months: u32) -> Self {
        self.months_forward = months;
        self
    }

    /// Sets the liquidity buckets.
    #[must_use]
    pub fn with_liquidity_buckets(mut self, edges: Vec<i64>, labels: Vec<String>) -> Self {
        self.liquidity_edges = edges;
        self.liquidity_labels = labels;
        self
    }

    /// Checks that the settings describe valid buckets.
    pub fn validate(&self) -> RiskResult<()> {
        if self.benchmark_curve.is_empty() {
            return Err(RiskError::config("benchmark_curve must not be empty"));
        }
        if self.months_forward == 0 {
            return Err(RiskError::config("months_forward must be at least 1"));
        }
        if self.repricing_bucket_days == 0 {
            return Err(RiskError::config("repricing_bucket_days must be at least 1"));
        }
        if self.liquidity_edges.len() < 2 {
            return Err(RiskError::config("liquidity_edges needs at least two edges"));
        }
        if !self.liquidity_edges.windows(2).all(|w| w[0] < w[1]) {
            return Err(RiskError::config(format!(
                "liquidity_edges must be strictly increasing, got {:?}",
                self.liquidity_edges
            )));
        }
        if self.liquidity_labels.len() + 1 != self.liquidity_edges.len() {
            return Err(RiskError::config(format!(
                "{} liquidity edges need {} labels, got {}",
                self.liquidity_edges.len(),
                self.liquidity_edges.len() - 1,
                self.liquidity_labels.len()
            )));
        }
        Ok(())
    }
}

/// Complete configuration of a risk run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlmConfig {
    /// Curve fitting.
    pub fit: FitConfig,

    /// Cash-flow generation.
    pub cashflows: BuildConfig,

    /// Gap tables and discounting.
    pub risk: RiskConfig,
}

impl AlmConfig {
    /// Parses and validates a TOML document. Missing sections use defaults.
    pub fn from_toml_str(s: &str) -> RiskResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> RiskResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RiskError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Validates every section.
    pub fn validate(&self) -> RiskResult<()> {
        self.fit.validate()?;
        self.risk.validate()
    }
}
