//! Engine configuration, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! period = 20
//! volume_kind = "bid"
//! signal_policy = "trend_reversion"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::VolumeKind;
use crate::signals::SignalPolicy;

pub const DEFAULT_PERIOD: usize = 30;
pub const DEFAULT_TICK_OFFSET: f64 = 2.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("period must be >= 1, got {period}")]
    InvalidPeriod { period: usize },

    #[error("tick_offset must be finite and non-negative, got {tick_offset}")]
    InvalidTickOffset { tick_offset: f64 },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parameters of one band engine instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Volume figure used as the statistical weight.
    pub volume_kind: VolumeKind,
    /// Rolling window length in bars. The window spans `period + 1` bars once full.
    pub period: usize,
    /// Marker distance from the bar extreme, in ticks.
    pub tick_offset: f64,
    pub signal_policy: SignalPolicy,
    /// Recompute the running sums from the window every N accepted bars.
    /// Zero disables resynchronization.
    pub resync_every: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume_kind: VolumeKind::Total,
            period: DEFAULT_PERIOD,
            tick_offset: DEFAULT_TICK_OFFSET,
            signal_policy: SignalPolicy::None,
            resync_every: 0,
        }
    }
}

impl EngineConfig {
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn with_volume_kind(mut self, volume_kind: VolumeKind) -> Self {
        self.volume_kind = volume_kind;
        self
    }

    pub fn with_signal_policy(mut self, signal_policy: SignalPolicy) -> Self {
        self.signal_policy = signal_policy;
        self
    }

    pub fn with_tick_offset(mut self, tick_offset: f64) -> Self {
        self.tick_offset = tick_offset;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period < 1 {
            return Err(ConfigError::InvalidPeriod {
                period: self.period,
            });
        }
        if !(self.tick_offset.is_finite() && self.tick_offset >= 0.0) {
            return Err(ConfigError::InvalidTickOffset {
                tick_offset: self.tick_offset,
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Number of bars the window holds once warm.
    pub fn window_len(&self) -> usize {
        self.period + 1
    }

    /// BLAKE3 hex digest of the canonical JSON form.
    ///
    /// Two runs with equal fingerprints produce identical output on identical input.
    /// Struct fields serialize in declaration order, so the JSON is deterministic.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("EngineConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.volume_kind, VolumeKind::Total);
        assert_eq!(config.period, 30);
        assert_eq!(config.tick_offset, 2.0);
        assert_eq!(config.signal_policy, SignalPolicy::None);
        assert_eq!(config.window_len(), 31);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_period() {
        let config = EngineConfig::default().with_period(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPeriod { period: 0 })
        ));
    }

    #[test]
    fn rejects_bad_tick_offset() {
        assert!(EngineConfig::default().with_tick_offset(-1.0).validate().is_err());
        assert!(EngineConfig::default().with_tick_offset(f64::NAN).validate().is_err());
        assert!(EngineConfig::default().with_tick_offset(0.0).validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            period = 20
            volume_kind = "bid"
            signal_policy = "trend_reversion"
            "#,
        )
        .unwrap();
        assert_eq!(config.period, 20);
        assert_eq!(config.volume_kind, VolumeKind::Bid);
        assert_eq!(config.signal_policy, SignalPolicy::TrendReversion);
        assert_eq!(config.tick_offset, DEFAULT_TICK_OFFSET);
    }

    #[test]
    fn toml_is_validated() {
        assert!(matches!(
            EngineConfig::from_toml_str("period = 0"),
            Err(ConfigError::InvalidPeriod { .. })
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("unknown_key = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/devbands.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn fingerprint_deterministic_and_param_sensitive() {
        let a = EngineConfig::default();
        let b = EngineConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let c = EngineConfig::default().with_period(31);
        assert_ne!(a.fingerprint(), c.fingerprint());

        let d = EngineConfig::default().with_signal_policy(SignalPolicy::SimpleBreakout);
        assert_ne!(a.fingerprint(), d.fingerprint());

        let mut e = EngineConfig::default();
        e.resync_every = 100;
        assert_ne!(a.fingerprint(), e.fingerprint());
    }

    #[test]
    fn fingerprint_hashes_canonical_json() {
        let config = EngineConfig::default()
            .with_period(14)
            .with_volume_kind(VolumeKind::Ask);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"volume_kind":"ask","period":14,"tick_offset":2.0,"signal_policy":"none","resync_every":0}"#
        );
        assert_eq!(config.fingerprint(), blake3::hash(json.as_bytes()).to_hex().to_string());
    }
}
