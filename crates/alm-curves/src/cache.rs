//! Shared cache of fitted curves.

use std::sync::Arc;

use alm_core::types::{Date, MarketQuote};
use dashmap::DashMap;
use tracing::debug;

use crate::config::FitConfig;
use crate::error::CurveResult;
use crate::yield_curve::YieldCurve;

/// Fitted curves keyed by curve identifier and valuation date.
///
/// Curves are immutable once fitted, so readers on any thread share the
/// same `Arc`. A curve fitted for one valuation date is never returned for
/// another.
///
/// The key does not include the quotes: a cache holds curves for one quote
/// set. Once a curve is cached, [`get_or_fit`](Self::get_or_fit) returns it
/// whatever quotes are passed. Use a fresh cache (or [`clear`](Self::clear))
/// when the market data changes.
#[derive(Debug, Default)]
pub struct CurveCache {
    config: FitConfig,
    curves: DashMap<(String, Date), Arc<YieldCurve>>,
}

impl CurveCache {
    /// Creates an empty cache fitting with `config`.
    #[must_use]
    pub fn new(config: FitConfig) -> Self {
        Self {
            config,
            curves: DashMap::new(),
        }
    }

    /// Returns the fit configuration.
    #[must_use]
    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Returns the cached curve, fitting it from `quotes` on first use.
    ///
    /// `quotes` are only read on a miss.
    ///
    /// The fit runs without holding a map lock. If two threads race on the
    /// same key, the first curve inserted wins and both receive it.
    pub fn get_or_fit(
        &self,
        curve_id: &str,
        today: Date,
        quotes: &[MarketQuote],
    ) -> CurveResult<Arc<YieldCurve>> {
        if let Some(curve) = self.get(curve_id, today) {
            debug!("Curve cache hit: {} on {}", curve_id, today);
            return Ok(curve);
        }

        let fitted = Arc::new(YieldCurve::fit(curve_id, today, quotes, &self.config)?);
        let entry = self
            .curves
            .entry((curve_id.to_string(), today))
            .or_insert(fitted);
        Ok(Arc::clone(entry.value()))
    }

    /// Get a cached curve.
    #[must_use]
    pub fn get(&self, curve_id: &str, today: Date) -> Option<Arc<YieldCurve>> {
        self.curves
            .get(&(curve_id.to_string(), today))
            .map(|c| Arc::clone(c.value()))
    }

    /// Inserts a curve, replacing any cached curve with the same key.
    pub fn insert(&self, curve: YieldCurve) -> Arc<YieldCurve> {
        let curve = Arc::new(curve);
        self.curves.insert(
            (curve.curve_id().to_string(), curve.today()),
            Arc::clone(&curve),
        );
        curve
    }

    /// Number of cached curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if no curve is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Clear the curve cache.
    pub fn clear(&self) {
        self.curves.clear();
    }
}
