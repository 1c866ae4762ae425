//! Integration tests: fit an EUR interbank curve and query it.
//!
//! Quotes are generated from a known Svensson curve whose decay factors
//! differ from the default starting point, so the tau search has to move.
//!
//! | Tenor | Curve  |
//! |-------|--------|
//! | 1M-30Y | β = (210, -190, 90, -60), τ = (1.2, 7.0) |

use std::sync::Arc;

use alm_core::types::{Date, MarketQuote};
use alm_curves::prelude::*;
use alm_math::svensson::Svensson;
use proptest::prelude::*;

const TENORS_MONTHS: [i32; 12] = [1, 3, 6, 9, 12, 24, 36, 60, 84, 120, 240, 360];

fn today() -> Date {
    Date::from_ymd(2014, 9, 30).unwrap()
}

fn truth() -> YieldCurve {
    YieldCurve::from_model(
        "EUR01",
        today(),
        Svensson::new(210.0, -190.0, 90.0, -60.0, 1.2, 7.0).unwrap(),
    )
}

fn market() -> Vec<MarketQuote> {
    let truth = truth();
    let mut quotes: Vec<MarketQuote> = TENORS_MONTHS
        .iter()
        .map(|&m| {
            let date = today().add_months(m).unwrap();
            MarketQuote::new("EUR01", date, truth.spot_yield(date), format!("{m}M"))
        })
        .collect();
    // Noise from another curve type in the same data set
    quotes.push(MarketQuote::new("USD01", today().add_months(12).unwrap(), 500.0, "1Y"));
    quotes
}

fn config() -> FitConfig {
    FitConfig::default().with_max_iterations(1000)
}

#[test]
fn test_fit_eur_curve_from_market_data() {
    let curve = YieldCurve::fit("EUR01", today(), &market(), &config()).unwrap();
    let truth = truth();

    assert_eq!(curve.status().points, TENORS_MONTHS.len());
    for m in [2, 18, 48, 180] {
        let date = today().add_months(m).unwrap();
        let diff = (curve.spot_yield(date) - truth.spot_yield(date)).abs();
        assert!(diff < 0.05, "{m}M off by {diff}bp");
    }
}

#[test]
fn test_monthly_floating_rates_follow_forwards() {
    let curve = YieldCurve::fit("EUR01", today(), &market(), &config()).unwrap();

    let resets: Vec<Date> = (0..12).map(|m| today().add_months(m * 3).unwrap()).collect();
    let payments: Vec<Date> = (1..=36).map(|m| today().add_months(m).unwrap()).collect();

    let rates = curve.floating_yields(&payments, &resets).unwrap();
    let forwards = curve.forward_yields(&resets);

    assert_eq!(rates.len(), payments.len());
    // Payment m is governed by the reset at floor(m / 3)
    for (m, rate) in (1..=36).zip(&rates) {
        let reset_index = (m / 3).min(11);
        assert_eq!(rate.rate_bps, forwards[reset_index], "payment month {m}");
    }
}

#[test]
fn test_cache_shared_across_threads() {
    let cache = Arc::new(CurveCache::new(config()));
    let quotes = market();

    let curves: Vec<Arc<YieldCurve>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| cache.get_or_fit("EUR01", today(), &quotes).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.len(), 1);
    let cached = cache.get("EUR01", today()).unwrap();
    for curve in &curves {
        assert_eq!(curve.as_ref(), cached.as_ref());
    }
}

fn any_offset() -> impl Strategy<Value = i64> {
    0i64..(30 * 366)
}

proptest! {
    #[test]
    fn forward_of_one_date_equals_spot(offset in any_offset()) {
        let curve = truth();
        let date = today().add_days(offset);
        prop_assert_eq!(curve.forward_yields(&[date]), vec![curve.spot_yield(date)]);
    }

    #[test]
    fn early_single_reset_governs_every_payment(
        reset_offset in 0i64..60,
        payment_offsets in prop::collection::vec(60i64..3650, 1..24),
    ) {
        let curve = truth();
        let reset = today().add_days(reset_offset);
        let payments: Vec<Date> = payment_offsets.iter().map(|&d| today().add_days(d)).collect();

        let rates = curve.floating_yields(&payments, &[reset]).unwrap();

        prop_assert_eq!(rates.len(), payments.len());
        let expected = curve.spot_yield(reset);
        prop_assert!(rates.iter().all(|r| r.rate_bps == expected));
    }
}
