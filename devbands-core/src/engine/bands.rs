//! Deviation bands derived from the window's weighted moments.
//!
//! Seven levels per bar:
//! - VWAP: weighted mean
//! - Support: VWAP +/- 1 sigma
//! - Resistance: VWAP +/- 2 sigma
//! - Capitulation: VWAP +/- 3 sigma
//!
//! "Bull" levels sit above the mean, "bear" levels below.

use serde::{Deserialize, Serialize};

use super::state::Moments;

/// One named level of the band set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Vwap,
    BullSupport,
    BullResistance,
    BullCapitulation,
    BearSupport,
    BearResistance,
    BearCapitulation,
}

impl Band {
    pub const ALL: [Band; 7] = [
        Band::Vwap,
        Band::BullSupport,
        Band::BullResistance,
        Band::BullCapitulation,
        Band::BearSupport,
        Band::BearResistance,
        Band::BearCapitulation,
    ];

    /// Short column name (`vwap`, `bull_sup`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            Band::Vwap => "vwap",
            Band::BullSupport => "bull_sup",
            Band::BullResistance => "bull_res",
            Band::BullCapitulation => "bull_cap",
            Band::BearSupport => "bear_sup",
            Band::BearResistance => "bear_res",
            Band::BearCapitulation => "bear_cap",
        }
    }

    /// Signed sigma multiple of the band relative to VWAP.
    pub fn sigma_multiple(&self) -> f64 {
        match self {
            Band::Vwap => 0.0,
            Band::BullSupport => 1.0,
            Band::BullResistance => 2.0,
            Band::BullCapitulation => 3.0,
            Band::BearSupport => -1.0,
            Band::BearResistance => -2.0,
            Band::BearCapitulation => -3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSet {
    pub vwap: f64,
    pub sigma: f64,
    pub bull_sup: f64,
    pub bull_res: f64,
    pub bull_cap: f64,
    pub bear_sup: f64,
    pub bear_res: f64,
    pub bear_cap: f64,
}

impl BandSet {
    pub fn from_moments(m: Moments) -> Self {
        let Moments { mean: vwap, sigma } = m;
        Self {
            vwap,
            sigma,
            bull_sup: vwap + sigma,
            bull_res: vwap + sigma * 2.0,
            bull_cap: vwap + sigma * 3.0,
            bear_sup: vwap - sigma,
            bear_res: vwap - sigma * 2.0,
            bear_cap: vwap - sigma * 3.0,
        }
    }

    pub fn level(&self, band: Band) -> f64 {
        match band {
            Band::Vwap => self.vwap,
            Band::BullSupport => self.bull_sup,
            Band::BullResistance => self.bull_res,
            Band::BullCapitulation => self.bull_cap,
            Band::BearSupport => self.bear_sup,
            Band::BearResistance => self.bear_res,
            Band::BearCapitulation => self.bear_cap,
        }
    }

    /// Levels ordered from lowest to highest.
    pub fn ladder(&self) -> [f64; 7] {
        [
            self.bear_cap,
            self.bear_res,
            self.bear_sup,
            self.vwap,
            self.bull_sup,
            self.bull_res,
            self.bull_cap,
        ]
    }
}
