//! Bar — the fundamental market data unit.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which volume figure weights the running statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeKind {
    #[default]
    Total,
    Bid,
    Ask,
}

impl VolumeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeKind::Total => "total",
            VolumeKind::Bid => "bid",
            VolumeKind::Ask => "ask",
        }
    }
}

/// One price level of a bar's volume profile.
///
/// The three volume figures partition what traded at `price` inside the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileLevel {
    pub price: f64,
    pub volume: f64,
    #[serde(default)]
    pub bid_volume: f64,
    #[serde(default)]
    pub ask_volume: f64,
}

impl ProfileLevel {
    pub fn new(price: f64, volume: f64) -> Self {
        Self {
            price,
            volume,
            bid_volume: 0.0,
            ask_volume: 0.0,
        }
    }

    pub fn volume_of(&self, kind: VolumeKind) -> f64 {
        match kind {
            VolumeKind::Total => self.volume,
            VolumeKind::Bid => self.bid_volume,
            VolumeKind::Ask => self.ask_volume,
        }
    }
}

/// Trade bar with optional volume profile.
///
/// `trade_date` is the session marker supplied by the feed. A bar without it
/// is still being formed and must not enter the statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub trade_date: Option<NaiveDate>,
    pub high: f64,
    pub low: f64,
    /// Settlement value; the price signals are judged on.
    pub close: f64,
    pub volume: f64,
    #[serde(default)]
    pub bid_volume: f64,
    #[serde(default)]
    pub ask_volume: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<ProfileLevel>,
}

impl Bar {
    /// Returns true if the feed has stamped the bar with a trade date.
    pub fn is_complete(&self) -> bool {
        self.trade_date.is_some()
    }

    /// Typical price `(high + low + close) / 3`, the representative price of a
    /// bar that has no profile.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    pub fn volume_of(&self, kind: VolumeKind) -> f64 {
        match kind {
            VolumeKind::Total => self.volume,
            VolumeKind::Bid => self.bid_volume,
            VolumeKind::Ask => self.ask_volume,
        }
    }

    pub fn has_profile(&self) -> bool {
        !self.profile.is_empty()
    }

    /// Check that every value the statistics read is usable.
    ///
    /// Prices must be finite and volumes finite and non-negative, for the flat
    /// fields and for every profile level.
    pub fn validate(&self) -> Result<(), BarError> {
        for (field, value) in [("high", self.high), ("low", self.low), ("close", self.close)] {
            if !value.is_finite() {
                return Err(BarError::NonFinitePrice { field, value });
            }
        }
        for (field, value) in [
            ("volume", self.volume),
            ("bid_volume", self.bid_volume),
            ("ask_volume", self.ask_volume),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BarError::InvalidVolume { field, value });
            }
        }
        for (index, level) in self.profile.iter().enumerate() {
            let volumes = [level.volume, level.bid_volume, level.ask_volume];
            if !level.price.is_finite() || volumes.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(BarError::InvalidProfileLevel { index });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("{field} is not a finite price: {value}")]
    NonFinitePrice { field: &'static str, value: f64 },

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidVolume { field: &'static str, value: f64 },

    #[error("profile level {index} has a non-finite price or an invalid volume")]
    InvalidProfileLevel { index: usize },
}
