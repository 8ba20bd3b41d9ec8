//! Simple breakout — fade closes beyond the 2-sigma bands.
//!
//! A close above `bull_res` is read as exhaustion and marked as a bearish
//! reversal above the bar; a close below `bear_res` is marked as a bullish
//! reversal below the bar. The marker is named after the expected move, not
//! the direction of the breakout.

use crate::domain::Bar;
use crate::engine::BandSet;

use super::{MarkerKind, MarkerPlacement, SignalMarkers};

pub fn classify(bar: &Bar, bands: &BandSet, placement: MarkerPlacement) -> SignalMarkers {
    let mut markers = SignalMarkers::default();
    let price = bar.close;
    if price > bands.bull_res {
        markers.set(MarkerKind::BearReversal, placement.above(bar));
    }
    if price < bands.bear_res {
        markers.set(MarkerKind::BullReversal, placement.below(bar));
    }
    markers
}
