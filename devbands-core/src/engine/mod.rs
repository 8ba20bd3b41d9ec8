//! Rolling weighted statistics engine.
//!
//! The engine consumes bars one at a time, strictly in timestamp order:
//! 1. Incomplete bars (no trade date) are skipped without touching state
//! 2. The incoming bar's contribution is pushed into the window; if the window
//!    already held `period + 1` bars the oldest contribution is subtracted
//! 3. The new contribution is added to the running sums
//! 4. VWAP and sigma are read off the sums, bands derived, signals classified
//!
//! Per-bar cost is proportional to the bar's profile size. The engine keeps
//! only the contributions inside the window, never the bar history.

pub mod bands;
pub mod series;
pub mod state;
mod window;

pub use bands::{Band, BandSet};
pub use series::{run_series, RunSummary, SeriesRun};
pub use state::{Contribution, Moments, RunningState};

use window::ContributionWindow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{Bar, BarError, Instrument};
use crate::signals::{MarkerPlacement, SignalMarkers};

/// An evicted contribution this many times larger than what stays behind
/// triggers a rebuild of the sums from the window.
const CANCELLATION_RATIO: f64 = 1024.0;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bar at {timestamp} rejected: {source}")]
    InvalidBar {
        timestamp: NaiveDateTime,
        #[source]
        source: BarError,
    },

    #[error("bar at {current} arrived after bar at {previous}; bars must be in time order")]
    OutOfOrder {
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
}

/// Outcome of feeding one bar to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "bands", rename_all = "snake_case")]
pub enum Step {
    /// Bar had no trade date; nothing changed.
    Incomplete,
    /// Window holds no volume; VWAP and sigma are undefined for this bar.
    Undefined,
    Bands(BandSet),
}

impl Step {
    pub fn bands(&self) -> Option<&BandSet> {
        match self {
            Step::Bands(b) => Some(b),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Step::Incomplete => "incomplete",
            Step::Undefined => "undefined",
            Step::Bands(_) => "bands",
        }
    }
}

/// Bands plus signal markers for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub timestamp: NaiveDateTime,
    pub step: Step,
    pub markers: SignalMarkers,
}

/// Streaming VWAP deviation band engine.
///
/// One instance per bar stream. State starts at zero and is only ever reset
/// by [`BandEngine::reset`].
#[derive(Debug, Clone)]
pub struct BandEngine {
    config: EngineConfig,
    state: RunningState,
    window: ContributionWindow,
    last_timestamp: Option<NaiveDateTime>,
    accepted: usize,
}

impl BandEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = ContributionWindow::new(config.window_len());
        Ok(Self {
            config,
            state: RunningState::new(),
            window,
            last_timestamp: None,
            accepted: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &RunningState {
        &self.state
    }

    /// Bars currently contributing to the sums.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Total complete bars accepted since construction or the last reset.
    pub fn bars_accepted(&self) -> usize {
        self.accepted
    }

    /// True once the window spans its full `period + 1` bars.
    pub fn is_warm(&self) -> bool {
        self.window.is_full()
    }

    pub fn reset(&mut self) {
        self.state.clear();
        self.window.clear();
        self.last_timestamp = None;
        self.accepted = 0;
    }

    /// Feed one bar and return the statistics through it.
    ///
    /// Incomplete bars return [`Step::Incomplete`]. Invalid or out-of-order
    /// bars return an error; in every non-`Ok(Bands | Undefined)` case the
    /// engine state is left untouched.
    pub fn advance(&mut self, bar: &Bar) -> Result<Step, EngineError> {
        if !bar.is_complete() {
            debug!(timestamp = %bar.timestamp, "skipping incomplete bar");
            return Ok(Step::Incomplete);
        }
        bar.validate().map_err(|source| EngineError::InvalidBar {
            timestamp: bar.timestamp,
            source,
        })?;
        if let Some(previous) = self.last_timestamp {
            if bar.timestamp < previous {
                return Err(EngineError::OutOfOrder {
                    previous,
                    current: bar.timestamp,
                });
            }
        }
        self.last_timestamp = Some(bar.timestamp);

        let contribution = Contribution::of_bar(bar, self.config.volume_kind);
        let evicted = self.window.push(contribution);
        if let Some(old) = &evicted {
            trace!(volume = old.volume, "evicting oldest bar from window");
            self.state.remove(old);
        }
        self.state.add(&contribution);
        self.accepted += 1;
        self.settle(evicted.as_ref());

        match self.state.moments() {
            Some(moments) => Ok(Step::Bands(BandSet::from_moments(moments))),
            None => {
                debug!(timestamp = %bar.timestamp, "window carries no volume; bands undefined");
                Ok(Step::Undefined)
            }
        }
    }

    /// Advance, then classify the bar under the configured signal policy.
    pub fn evaluate(&mut self, bar: &Bar, instrument: &Instrument) -> Result<Evaluation, EngineError> {
        let step = self.advance(bar)?;
        let markers = match &step {
            Step::Bands(bands) => {
                let placement = MarkerPlacement::new(self.config.tick_offset, instrument.tick_size);
                self.config.signal_policy.classify(bar, bands, placement)
            }
            _ => SignalMarkers::default(),
        };
        Ok(Evaluation {
            timestamp: bar.timestamp,
            step,
            markers,
        })
    }

    /// Bound the drift of the incremental sums.
    fn settle(&mut self, evicted: Option<&Contribution>) {
        if self.window.weighted_len() == 0 {
            self.state.clear();
            return;
        }
        let resync_due =
            self.config.resync_every > 0 && self.accepted % self.config.resync_every == 0;
        if resync_due {
            self.state = RunningState::from_contributions(self.window.iter());
        } else if self.state.cumulative_volume < 0.0 {
            warn!(
                cumulative_volume = self.state.cumulative_volume,
                "negative cumulative volume; rebuilding sums from window"
            );
            self.state = RunningState::from_contributions(self.window.iter());
        } else if evicted.is_some_and(|old| dwarfs(old, &self.state)) {
            debug!("evicted bar dwarfs the remaining window; rebuilding sums");
            self.state = RunningState::from_contributions(self.window.iter());
        }
    }
}

/// True when removing `old` left sums small enough that its rounding error
/// is no longer negligible against them.
fn dwarfs(old: &Contribution, state: &RunningState) -> bool {
    old.volume > CANCELLATION_RATIO * state.cumulative_volume
        || old.value.abs() > CANCELLATION_RATIO * state.cumulative_value.abs()
        || old.value2 > CANCELLATION_RATIO * state.cumulative_value2
}
