//! Criterion benchmarks for DevBands hot paths.
//!
//! Benchmarks:
//! 1. Streaming advance (flat bars, profile bars)
//! 2. Full evaluation with each signal policy
//! 3. Indicator adapter (all seven band series)
//! 4. Period scaling (advance cost must not grow with the window)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use devbands_core::data::{generate_synthetic_bars, SyntheticSpec};
use devbands_core::domain::{Bar, Instrument};
use devbands_core::engine::{run_series, BandEngine};
use devbands_core::indicators::{DeviationBand, Indicator};
use devbands_core::{EngineConfig, SignalPolicy};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize, with_profile: bool) -> Vec<Bar> {
    let spec = SyntheticSpec {
        bars: n,
        with_profile,
        ..SyntheticSpec::default()
    };
    generate_synthetic_bars("BENCH", &spec)
}

fn stream(bars: &[Bar], config: &EngineConfig) -> usize {
    let mut engine = BandEngine::new(config.clone()).unwrap();
    let mut computed = 0;
    for bar in bars {
        if engine.advance(bar).unwrap().bands().is_some() {
            computed += 1;
        }
    }
    computed
}

// ── 1. Streaming advance ─────────────────────────────────────────────

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    let config = EngineConfig::default();

    for &bar_count in &[390, 3_900, 39_000] {
        let flat = make_bars(bar_count, false);
        group.bench_with_input(BenchmarkId::new("flat", bar_count), &bar_count, |b, _| {
            b.iter(|| stream(black_box(&flat), black_box(&config)));
        });

        let profiled = make_bars(bar_count, true);
        group.bench_with_input(BenchmarkId::new("profile", bar_count), &bar_count, |b, _| {
            b.iter(|| stream(black_box(&profiled), black_box(&config)));
        });
    }

    group.finish();
}

// ── 2. Evaluation with signals ───────────────────────────────────────

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_series");
    let bars = make_bars(3_900, false);
    let instrument = Instrument::new("BENCH", 0.25).unwrap();

    for policy in [
        SignalPolicy::None,
        SignalPolicy::SimpleBreakout,
        SignalPolicy::TrendReversion,
    ] {
        let config = EngineConfig::default().with_signal_policy(policy);
        group.bench_function(policy.as_str(), |b| {
            b.iter(|| run_series(black_box(&bars), black_box(&config), black_box(&instrument)));
        });
    }

    group.finish();
}

// ── 3. Indicator adapter ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_compute");
    let bars = make_bars(3_900, false);
    let indicators = DeviationBand::all(&EngineConfig::default());

    group.bench_function("all_bands_3900", |b| {
        b.iter(|| {
            for ind in &indicators {
                black_box(ind.compute(black_box(&bars)));
            }
        });
    });

    group.finish();
}

// ── 4. Period scaling ────────────────────────────────────────────────

fn bench_period_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("period_scaling");
    let bars = make_bars(3_900, false);

    for &period in &[5, 30, 300, 3_000] {
        let config = EngineConfig::default().with_period(period);
        group.bench_with_input(BenchmarkId::from_parameter(period), &period, |b, _| {
            b.iter(|| stream(black_box(&bars), black_box(&config)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_advance,
    bench_policies,
    bench_indicators,
    bench_period_scaling
);
criterion_main!(benches);
