//! Criterion benchmarks for the risk-engine hot paths.
//!
//! Benchmarks:
//! 1. Stop + ladder computation (the per-open cost)
//! 2. Transition detection (the per-snapshot cost)
//! 3. Full position lifecycle (open, five daily updates, close)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swingrisk_core::levels::{profit_ladder, AdaptiveStopEngine};
use swingrisk_core::{MarketSnapshot, PositionBook, RegimeRuleSet, RegimeTransitionManager};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_snapshots(n: usize) -> Vec<MarketSnapshot> {
    (0..n)
        .map(|i| {
            let vix = 18.0 + (i as f64 * 0.37).sin() * 12.0;
            MarketSnapshot::new(vix, i as u32)
                .with_t2108(45.0 + (i as f64 * 0.21).cos() * 30.0)
                .with_momentum(1.0 + (i as f64 * 0.13).sin() * 0.8)
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_level_computation(c: &mut Criterion) {
    let rules = RegimeRuleSet::default();
    let config = rules.bull_normal.clone();

    c.bench_function("stop_and_ladder", |b| {
        let mut engine = AdaptiveStopEngine::new();
        b.iter(|| {
            let stop = engine
                .compute(black_box("BENCH"), 45.66, 1.35, &config, Some(45.0))
                .unwrap();
            let ladder = profit_ladder(45.66, &config, 1.35).unwrap();
            black_box((stop, ladder))
        })
    });
}

fn bench_transition_detection(c: &mut Criterion) {
    let snapshots = make_snapshots(256);

    c.bench_function("transition_detect", |b| {
        let mut manager = RegimeTransitionManager::default();
        b.iter(|| {
            for pair in snapshots.windows(2) {
                black_box(manager.detect(&pair[1], Some(&pair[0])));
            }
        })
    });
}

fn bench_full_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle");
    for positions in [10usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(positions),
            &positions,
            |b, &n| {
                b.iter(|| {
                    let mut book = PositionBook::default();
                    for i in 0..n {
                        let symbol = format!("S{i}");
                        let snapshot = MarketSnapshot::new(20.0, 0);
                        book.open(&symbol, 100.0, &snapshot, 100.0, Some(2.0)).unwrap();
                        for d in 1..=5u32 {
                            let drift = 1.0 + d as f64 * 0.004;
                            let snapshot = MarketSnapshot::new(20.0, d);
                            if book.position(&symbol).is_none() {
                                break;
                            }
                            book.update(
                                &symbol,
                                100.0 * drift + 1.0,
                                100.0 * drift - 1.0,
                                100.0 * drift,
                                &snapshot,
                            )
                            .unwrap();
                        }
                    }
                    black_box(book.history().len())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_level_computation,
    bench_transition_detection,
    bench_full_lifecycle
);
criterion_main!(benches);
