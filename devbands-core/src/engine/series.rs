//! Batch evaluation of a whole bar series through a fresh engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::{BandEngine, EngineError, Evaluation, Step};
use crate::config::EngineConfig;
use crate::domain::{Bar, Instrument};

/// Counts describing one series run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub symbol: String,
    pub config_fingerprint: String,
    pub bars: usize,
    pub incomplete: usize,
    pub undefined: usize,
    pub computed: usize,
    /// Marker count per marker key (`bear_signal`, `bull_trending`, ...).
    pub markers: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn new(symbol: impl Into<String>, config: &EngineConfig) -> Self {
        Self {
            symbol: symbol.into(),
            config_fingerprint: config.fingerprint(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, eval: &Evaluation) {
        self.bars += 1;
        match eval.step {
            Step::Incomplete => self.incomplete += 1,
            Step::Undefined => self.undefined += 1,
            Step::Bands(_) => self.computed += 1,
        }
        for (kind, _) in eval.markers.fired() {
            *self.markers.entry(kind.key().to_string()).or_insert(0) += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeriesRun {
    /// One evaluation per input bar, same order.
    pub evaluations: Vec<Evaluation>,
    pub summary: RunSummary,
}

/// Run `bars` through a new engine built from `config`.
pub fn run_series(
    bars: &[Bar],
    config: &EngineConfig,
    instrument: &Instrument,
) -> Result<SeriesRun, EngineError> {
    let mut engine = BandEngine::new(config.clone())?;
    let mut summary = RunSummary::new(&instrument.symbol, engine.config());
    let mut evaluations = Vec::with_capacity(bars.len());

    for bar in bars {
        let eval = engine.evaluate(bar, instrument)?;
        summary.record(&eval);
        evaluations.push(eval);
    }

    info!(
        symbol = %instrument.symbol,
        bars = summary.bars,
        computed = summary.computed,
        undefined = summary.undefined,
        incomplete = summary.incomplete,
        "series evaluated"
    );

    Ok(SeriesRun {
        evaluations,
        summary,
    })
}
