//! DevBands Core — rolling volume-weighted deviation bands and band signals.
//!
//! This crate contains:
//! - Domain types (bars, volume profiles, instruments)
//! - Streaming engine maintaining windowed Σv, Σv·p, Σv·p² sums
//! - Band set derivation (VWAP ± 1/2/3 sigma)
//! - Pluggable signal policies (simple breakout, trending/reversion)
//! - Indicator adapters producing one aligned series per band
//! - Bar ingestion (CSV, JSON Lines) and deterministic synthetic data

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod signals;

pub use config::{ConfigError, EngineConfig};
pub use domain::{Bar, Instrument, ProfileLevel, VolumeKind};
pub use engine::{run_series, BandEngine, BandSet, EngineError, Evaluation, Step};
pub use signals::{MarkerKind, SignalMarkers, SignalPolicy};
