//! Running sufficient statistics for a volume-weighted mean and variance.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, VolumeKind};

/// What one bar adds to the running sums: `(Σv, Σv·p, Σv·p²)`.
///
/// For a bar with a volume profile every level contributes at its own price,
/// weighted by its own volume. Otherwise the bar contributes once at its
/// typical price.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contribution {
    pub volume: f64,
    pub value: f64,
    pub value2: f64,
}

impl Contribution {
    pub fn at(price: f64, volume: f64) -> Self {
        Self {
            volume,
            value: volume * price,
            value2: volume * price * price,
        }
    }

    pub fn of_bar(bar: &Bar, kind: VolumeKind) -> Self {
        if bar.has_profile() {
            bar.profile
                .iter()
                .fold(Self::default(), |acc, level| {
                    acc.plus(Self::at(level.price, level.volume_of(kind)))
                })
        } else {
            Self::at(bar.typical_price(), bar.volume_of(kind))
        }
    }

    pub fn plus(self, other: Self) -> Self {
        Self {
            volume: self.volume + other.volume,
            value: self.value + other.value,
            value2: self.value2 + other.value2,
        }
    }

    /// True when the bar carries no weight.
    pub fn is_weightless(&self) -> bool {
        self.volume == 0.0
    }
}

/// Weighted mean and population standard deviation of the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    pub sigma: f64,
}

/// Cumulative sums over the bars currently in the window.
///
/// All three sums start at zero. `add` and `remove` must be called with the
/// exact same `Contribution` for a given bar so the sums return to their
/// prior values when the bar leaves the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningState {
    pub cumulative_volume: f64,
    pub cumulative_value: f64,
    pub cumulative_value2: f64,
}

impl RunningState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, c: &Contribution) {
        self.cumulative_volume += c.volume;
        self.cumulative_value += c.value;
        self.cumulative_value2 += c.value2;
    }

    pub fn remove(&mut self, c: &Contribution) {
        self.cumulative_volume -= c.volume;
        self.cumulative_value -= c.value;
        self.cumulative_value2 -= c.value2;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Rebuild the sums from scratch.
    pub fn from_contributions<'a>(contributions: impl IntoIterator<Item = &'a Contribution>) -> Self {
        let mut state = Self::default();
        for c in contributions {
            state.add(c);
        }
        state
    }

    /// Weighted mean and sigma, or `None` when the window carries no volume.
    ///
    /// The variance estimate `Σv·p²/Σv − mean²` can dip below zero through
    /// cancellation; it is clamped to zero before the square root.
    pub fn moments(&self) -> Option<Moments> {
        if self.cumulative_volume.is_nan() || self.cumulative_volume <= 0.0 {
            return None;
        }
        let mean = self.cumulative_value / self.cumulative_volume;
        let variance = (self.cumulative_value2 / self.cumulative_volume - mean * mean).max(0.0);
        if !mean.is_finite() || !variance.is_finite() {
            return None;
        }
        Some(Moments {
            mean,
            sigma: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProfileLevel;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn empty_state_has_no_moments() {
        assert!(RunningState::new().moments().is_none());
    }

    #[test]
    fn single_price_has_zero_sigma() {
        let mut state = RunningState::new();
        state.add(&Contribution::at(100.0, 5.0));
        state.add(&Contribution::at(100.0, 7.0));
        let m = state.moments().unwrap();
        assert_approx(m.mean, 100.0, DEFAULT_EPSILON);
        assert_eq!(m.sigma, 0.0);
    }

    #[test]
    fn weighted_mean_and_sigma() {
        // 1 @ 10, 3 @ 14: mean = 13, var = (1*9 + 3*1) / 4 = 3
        let mut state = RunningState::new();
        state.add(&Contribution::at(10.0, 1.0));
        state.add(&Contribution::at(14.0, 3.0));
        let m = state.moments().unwrap();
        assert_approx(m.mean, 13.0, DEFAULT_EPSILON);
        assert_approx(m.sigma, 3.0_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn remove_restores_prior_sums() {
        let mut state = RunningState::new();
        let a = Contribution::at(10.0, 1.0);
        let b = Contribution::at(12.0, 2.0);
        state.add(&a);
        let before = state;
        state.add(&b);
        state.remove(&b);
        assert_eq!(state, before);
    }

    #[test]
    fn round_off_never_yields_negative_radicand() {
        // Large identical prices: Σv·p²/Σv and mean² cancel to within an ulp.
        let mut state = RunningState::new();
        for v in [0.1, 0.2, 0.3, 0.7] {
            state.add(&Contribution::at(4_512.33, v));
        }
        let m = state.moments().unwrap();
        assert!(m.sigma >= 0.0);
        assert!(!m.sigma.is_nan());
    }

    #[test]
    fn profile_levels_weighted_by_their_own_volume() {
        let mut bar = make_bars(&[100.0]).remove(0);
        bar.profile = vec![
            ProfileLevel {
                price: 99.0,
                volume: 2.0,
                bid_volume: 2.0,
                ask_volume: 0.0,
            },
            ProfileLevel {
                price: 101.0,
                volume: 6.0,
                bid_volume: 1.0,
                ask_volume: 5.0,
            },
        ];
        let c = Contribution::of_bar(&bar, VolumeKind::Total);
        assert_approx(c.volume, 8.0, DEFAULT_EPSILON);
        assert_approx(c.value, 2.0 * 99.0 + 6.0 * 101.0, DEFAULT_EPSILON);
        assert_approx(c.value2, 2.0 * 99.0 * 99.0 + 6.0 * 101.0 * 101.0, DEFAULT_EPSILON);

        let ask = Contribution::of_bar(&bar, VolumeKind::Ask);
        assert_approx(ask.volume, 5.0, DEFAULT_EPSILON);
        assert_approx(ask.value2, 5.0 * 101.0 * 101.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_bar_contributes_at_typical_price() {
        let bar = make_bars(&[100.0]).remove(0);
        let c = Contribution::of_bar(&bar, VolumeKind::Total);
        assert_approx(c.value / c.volume, bar.typical_price(), DEFAULT_EPSILON);
    }

    #[test]
    fn rebuild_matches_incremental() {
        let cs = [Contribution::at(1.0, 1.0), Contribution::at(2.0, 3.0)];
        let mut state = RunningState::new();
        for c in &cs {
            state.add(c);
        }
        assert_eq!(RunningState::from_contributions(&cs), state);
    }
}
