//! VWAP deviation bands as per-band indicator series.
//!
//! Seven bands (separate Indicator instances), each `vwap + k * sigma` for
//! k in {0, ±1, ±2, ±3}. Incomplete bars and bars whose window carries no
//! volume are NaN. Uses population sigma (divide by total volume).
//! Lookback: period (the window spans period + 1 bars).

use crate::config::EngineConfig;
use crate::domain::Bar;
use crate::engine::{Band, BandEngine, Step};

use super::Indicator;

#[derive(Debug, Clone)]
pub struct DeviationBand {
    config: EngineConfig,
    band: Band,
    name: String,
}

impl DeviationBand {
    /// # Panics
    /// If `config` fails [`EngineConfig::validate`].
    pub fn new(config: EngineConfig, band: Band) -> Self {
        if let Err(err) = config.validate() {
            panic!("DeviationBand config invalid: {err}");
        }
        let name = format!(
            "{}_{}_{}",
            band.key(),
            config.period,
            config.volume_kind.as_str()
        );
        Self { config, band, name }
    }

    /// All seven bands for one configuration.
    pub fn all(config: &EngineConfig) -> Vec<Self> {
        Band::ALL
            .iter()
            .map(|&band| Self::new(config.clone(), band))
            .collect()
    }
}

impl Indicator for DeviationBand {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.config.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut result = vec![f64::NAN; bars.len()];
        let Ok(mut engine) = BandEngine::new(self.config.clone()) else {
            return result;
        };
        for (i, bar) in bars.iter().enumerate() {
            // A rejected bar poisons everything after it; leave the tail NaN.
            match engine.advance(bar) {
                Ok(Step::Bands(bands)) => result[i] = bands.level(self.band),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        result
    }
}
