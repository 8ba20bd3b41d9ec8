//! Trending vs. reversion — four-way split of the close around the 1-sigma bands.
//!
//! | close                       | marker         | drawn       |
//! |-----------------------------|----------------|-------------|
//! | `>= bull_sup`               | Bull-Trending  | below low   |
//! | `(vwap, bull_sup)`          | Bull-Reversion | above high  |
//! | `<= bear_sup`               | Bear-Trending  | above high  |
//! | `(bear_sup, vwap)`          | Bear-Reversion | below low   |
//!
//! A close exactly at VWAP is neutral. The side is decided by the close's
//! position relative to VWAP first, so at most one marker fires per bar even
//! when sigma is zero and the support bands coincide with VWAP.

use crate::domain::Bar;
use crate::engine::BandSet;

use super::{MarkerKind, MarkerPlacement, SignalMarkers};

pub fn classify(bar: &Bar, bands: &BandSet, placement: MarkerPlacement) -> SignalMarkers {
    let mut markers = SignalMarkers::default();
    let price = bar.close;
    if price > bands.vwap {
        if price >= bands.bull_sup {
            markers.set(MarkerKind::BullTrending, placement.below(bar));
        } else {
            markers.set(MarkerKind::BullReversion, placement.above(bar));
        }
    } else if price < bands.vwap {
        if price <= bands.bear_sup {
            markers.set(MarkerKind::BearTrending, placement.above(bar));
        } else {
            markers.set(MarkerKind::BearReversion, placement.below(bar));
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Moments;
    use crate::indicators::make_bars;

    fn bar_closing_at(close: f64) -> Bar {
        let mut bar = make_bars(&[close]).remove(0);
        bar.high = close + 1.0;
        bar.low = close - 1.0;
        bar
    }

    fn bands(sigma: f64) -> BandSet {
        BandSet::from_moments(Moments { mean: 100.0, sigma })
    }

    fn only(m: &SignalMarkers) -> (MarkerKind, f64) {
        let fired: Vec<_> = m.fired().collect();
        assert_eq!(fired.len(), 1, "expected exactly one marker, got {fired:?}");
        fired[0]
    }

    #[test]
    fn bull_trending_at_or_above_one_sigma() {
        let p = MarkerPlacement::new(2.0, 0.25);
        assert_eq!(
            only(&classify(&bar_closing_at(105.0), &bands(2.0), p)),
            (MarkerKind::BullTrending, 104.0 - 0.5)
        );
        // boundary is inclusive
        assert_eq!(
            only(&classify(&bar_closing_at(102.0), &bands(2.0), p)).0,
            MarkerKind::BullTrending
        );
    }

    #[test]
    fn bull_reversion_between_vwap_and_one_sigma() {
        let p = MarkerPlacement::new(2.0, 0.25);
        assert_eq!(
            only(&classify(&bar_closing_at(101.0), &bands(2.0), p)),
            (MarkerKind::BullReversion, 102.0 + 0.5)
        );
    }

    #[test]
    fn bear_trending_at_or_below_one_sigma() {
        let p = MarkerPlacement::new(2.0, 0.25);
        assert_eq!(
            only(&classify(&bar_closing_at(97.0), &bands(2.0), p)),
            (MarkerKind::BearTrending, 98.0 + 0.5)
        );
        assert_eq!(
            only(&classify(&bar_closing_at(98.0), &bands(2.0), p)).0,
            MarkerKind::BearTrending
        );
    }

    #[test]
    fn bear_reversion_between_one_sigma_and_vwap() {
        let p = MarkerPlacement::new(2.0, 0.25);
        assert_eq!(
            only(&classify(&bar_closing_at(99.0), &bands(2.0), p)),
            (MarkerKind::BearReversion, 98.0 - 0.5)
        );
    }

    #[test]
    fn close_at_vwap_is_neutral() {
        let m = classify(&bar_closing_at(100.0), &bands(2.0), MarkerPlacement::new(2.0, 0.25));
        assert!(m.is_empty());
    }

    #[test]
    fn zero_sigma_still_single_marker() {
        let p = MarkerPlacement::new(1.0, 1.0);
        assert_eq!(
            only(&classify(&bar_closing_at(100.5), &bands(0.0), p)).0,
            MarkerKind::BullTrending
        );
        assert_eq!(
            only(&classify(&bar_closing_at(99.5), &bands(0.0), p)).0,
            MarkerKind::BearTrending
        );
        assert!(classify(&bar_closing_at(100.0), &bands(0.0), p).is_empty());
    }
}
