//! Criterion benchmark for the Ichimoku engine over realistic series sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kumo_core::domain::PriceBar;
use kumo_core::indicators::Ichimoku;

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("ichimoku_compute");
    let engine = Ichimoku::standard();

    // 252 ≈ one trading year, 1260 ≈ five, 2520 ≈ ten.
    for &n in &[252usize, 1260, 2520] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| engine.compute(black_box(bars)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
