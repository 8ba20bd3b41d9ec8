use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contract metadata the band signals need: where one tick sits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    pub tick_size: f64,
}

impl Instrument {
    /// Create new instrument; the tick size must be positive and finite.
    pub fn new(symbol: impl Into<String>, tick_size: f64) -> Result<Self, InstrumentError> {
        if !(tick_size > 0.0 && tick_size.is_finite()) {
            return Err(InstrumentError::InvalidTickSize { tick_size });
        }
        Ok(Self {
            symbol: symbol.into(),
            tick_size,
        })
    }
}

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("tick_size must be positive and finite, got {tick_size}")]
    InvalidTickSize { tick_size: f64 },
}
