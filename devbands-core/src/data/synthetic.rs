//! Deterministic synthetic bars for demos, benchmarks and tests.
//!
//! The RNG seed is the BLAKE3 hash of the symbol, so a symbol always yields
//! the same series. Synthetic bars are complete (stamped with a trade date)
//! and optionally carry a volume profile spread across the bar's range.

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Bar, ProfileLevel};

/// Most levels a synthetic profile will carry.
const MAX_PROFILE_LEVELS: usize = 40;

#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub bars: usize,
    pub start: NaiveDateTime,
    pub interval_minutes: i64,
    pub start_price: f64,
    pub tick_size: f64,
    pub with_profile: bool,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            bars: 390,
            start: NaiveDate::from_ymd_opt(2024, 1, 2)
                .and_then(|d| d.and_hms_opt(9, 30, 0))
                .unwrap_or_default(),
            interval_minutes: 1,
            start_price: 100.0,
            tick_size: 0.25,
            with_profile: false,
        }
    }
}

pub fn generate_synthetic_bars(symbol: &str, spec: &SyntheticSpec) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::with_capacity(spec.bars);
    let mut price = spec.start_price;

    for i in 0..spec.bars {
        let timestamp = spec.start + chrono::Duration::minutes(spec.interval_minutes * i as i64);
        let step: f64 = rng.gen_range(-0.003..0.003);
        let open = price;
        let close = snap(price * (1.0 + step), spec.tick_size);
        let high = snap(open.max(close) * (1.0 + rng.gen_range(0.0..0.002)), spec.tick_size);
        let low = snap(open.min(close) * (1.0 - rng.gen_range(0.0..0.002)), spec.tick_size);
        let volume = rng.gen_range(500..5_000u32) as f64;
        let bid_share: f64 = rng.gen_range(0.3..0.7);
        let bid_volume = (volume * bid_share).round();

        let profile = if spec.with_profile {
            spread_profile(&mut rng, low, high, volume, spec.tick_size)
        } else {
            Vec::new()
        };

        bars.push(Bar {
            timestamp,
            trade_date: Some(timestamp.date()),
            high,
            low,
            close,
            volume,
            bid_volume,
            ask_volume: volume - bid_volume,
            profile,
        });

        price = close;
    }

    bars
}

fn snap(price: f64, tick_size: f64) -> f64 {
    if tick_size > 0.0 {
        (price / tick_size).round() * tick_size
    } else {
        price
    }
}

/// Split `volume` across evenly spaced levels from `low` to `high`.
fn spread_profile(rng: &mut StdRng, low: f64, high: f64, volume: f64, tick_size: f64) -> Vec<ProfileLevel> {
    let ticks = if tick_size > 0.0 {
        ((high - low) / tick_size).round() as usize
    } else {
        0
    };
    let n = (ticks + 1).clamp(1, MAX_PROFILE_LEVELS);
    let weights: Vec<f64> = (0..n).map(|_| rng.gen_range(0.1..1.0)).collect();
    let total: f64 = weights.iter().sum();

    weights
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let price = if n == 1 {
                low
            } else {
                low + (high - low) * i as f64 / (n - 1) as f64
            };
            let level_volume = volume * w / total;
            let bid_volume = level_volume * rng.gen_range(0.3..0.7);
            ProfileLevel {
                price,
                volume: level_volume,
                bid_volume,
                ask_volume: level_volume - bid_volume,
            }
        })
        .collect()
}
