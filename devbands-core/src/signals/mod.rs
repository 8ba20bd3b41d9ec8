//! Band signals — classify a bar's settlement price against its band set.
//!
//! A policy reads one bar and the bands computed through that bar and places
//! zero or more markers. Markers sit a configured number of ticks beyond the
//! bar's high or low; the offset is cosmetic and carries no statistical meaning.

pub mod breakout;
pub mod trend_reversion;

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::engine::BandSet;

/// Which signal rules run on top of the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPolicy {
    /// Bands only.
    #[default]
    None,
    /// Fade closes beyond the 2-sigma bands.
    SimpleBreakout,
    /// Four-way trending/reversion split at the 1-sigma bands.
    TrendReversion,
}

impl SignalPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalPolicy::None => "none",
            SignalPolicy::SimpleBreakout => "simple_breakout",
            SignalPolicy::TrendReversion => "trend_reversion",
        }
    }

    /// Marker kinds this policy can emit, in output column order.
    pub fn marker_kinds(&self) -> &'static [MarkerKind] {
        match self {
            SignalPolicy::None => &[],
            SignalPolicy::SimpleBreakout => &[MarkerKind::BearReversal, MarkerKind::BullReversal],
            SignalPolicy::TrendReversion => &[
                MarkerKind::BullTrending,
                MarkerKind::BullReversion,
                MarkerKind::BearTrending,
                MarkerKind::BearReversion,
            ],
        }
    }

    pub fn classify(&self, bar: &Bar, bands: &BandSet, placement: MarkerPlacement) -> SignalMarkers {
        if !bar.close.is_finite() {
            return SignalMarkers::default();
        }
        match self {
            SignalPolicy::None => SignalMarkers::default(),
            SignalPolicy::SimpleBreakout => breakout::classify(bar, bands, placement),
            SignalPolicy::TrendReversion => trend_reversion::classify(bar, bands, placement),
        }
    }
}

/// Where markers are drawn relative to the bar: `tick_offset` ticks of `tick_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPlacement {
    pub tick_offset: f64,
    pub tick_size: f64,
}

impl MarkerPlacement {
    pub fn new(tick_offset: f64, tick_size: f64) -> Self {
        Self {
            tick_offset,
            tick_size,
        }
    }

    pub fn distance(&self) -> f64 {
        self.tick_offset * self.tick_size
    }

    pub fn above(&self, bar: &Bar) -> f64 {
        bar.high + self.distance()
    }

    pub fn below(&self, bar: &Bar) -> f64 {
        bar.low - self.distance()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Close above the upper 2-sigma band; drawn above the bar.
    BearReversal,
    /// Close below the lower 2-sigma band; drawn below the bar.
    BullReversal,
    BullTrending,
    BullReversion,
    BearTrending,
    BearReversion,
}

impl MarkerKind {
    pub fn key(&self) -> &'static str {
        match self {
            MarkerKind::BearReversal => "bear_signal",
            MarkerKind::BullReversal => "bull_signal",
            MarkerKind::BullTrending => "bull_trending",
            MarkerKind::BullReversion => "bull_reversion",
            MarkerKind::BearTrending => "bear_trending",
            MarkerKind::BearReversion => "bear_reversion",
        }
    }
}

/// Marker prices for one bar; `None` means no marker of that kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalMarkers {
    pub bear_reversal: Option<f64>,
    pub bull_reversal: Option<f64>,
    pub bull_trending: Option<f64>,
    pub bull_reversion: Option<f64>,
    pub bear_trending: Option<f64>,
    pub bear_reversion: Option<f64>,
}

impl SignalMarkers {
    pub fn get(&self, kind: MarkerKind) -> Option<f64> {
        match kind {
            MarkerKind::BearReversal => self.bear_reversal,
            MarkerKind::BullReversal => self.bull_reversal,
            MarkerKind::BullTrending => self.bull_trending,
            MarkerKind::BullReversion => self.bull_reversion,
            MarkerKind::BearTrending => self.bear_trending,
            MarkerKind::BearReversion => self.bear_reversion,
        }
    }

    pub fn set(&mut self, kind: MarkerKind, price: f64) {
        let slot = match kind {
            MarkerKind::BearReversal => &mut self.bear_reversal,
            MarkerKind::BullReversal => &mut self.bull_reversal,
            MarkerKind::BullTrending => &mut self.bull_trending,
            MarkerKind::BullReversion => &mut self.bull_reversion,
            MarkerKind::BearTrending => &mut self.bear_trending,
            MarkerKind::BearReversion => &mut self.bear_reversion,
        };
        *slot = Some(price);
    }

    /// Markers present on this bar, in declaration order.
    pub fn fired(&self) -> impl Iterator<Item = (MarkerKind, f64)> + '_ {
        const ORDER: [MarkerKind; 6] = [
            MarkerKind::BearReversal,
            MarkerKind::BullReversal,
            MarkerKind::BullTrending,
            MarkerKind::BullReversion,
            MarkerKind::BearTrending,
            MarkerKind::BearReversion,
        ];
        ORDER
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|price| (kind, price)))
    }

    pub fn is_empty(&self) -> bool {
        self.fired().next().is_none()
    }
}
