//! Domain types for DevBands

pub mod bar;
pub mod instrument;

pub use bar::{Bar, BarError, ProfileLevel, VolumeKind};
pub use instrument::{Instrument, InstrumentError};
