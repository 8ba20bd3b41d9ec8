//! Series-in, series-out view of the band engine.
//!
//! The streaming [`BandEngine`](crate::engine::BandEngine) is the primary
//! interface. `Indicator` wraps it for callers that hold a full bar series and
//! want one aligned numeric series per band, the way charting code consumes
//! them. Each band is a separate named instance.

pub mod deviation;

pub use deviation::DeviationBand;

use crate::domain::Bar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. Bars where the value is undefined hold `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "vwap_30_total").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator reaches its steady-state window.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible bars: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0,
/// volume = 1000 split 400 bid / 600 ask, one minute apart, all complete.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let timestamp = base + chrono::Duration::minutes(i as i64);
            Bar {
                timestamp,
                trade_date: Some(timestamp.date()),
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
                bid_volume: 400.0,
                ask_volume: 600.0,
                profile: Vec::new(),
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
