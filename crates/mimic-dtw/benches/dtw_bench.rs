//! Criterion benchmarks for mimic-dtw: distance-only DTW, full alignment, and DBA averaging.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use mimic_dtw::{DbaConfig, Dtw, Frame, Manhattan};

fn make_motion(n: usize, phase: f64) -> Vec<Frame> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.1 + phase;
            Frame::new(t.sin(), t.cos(), (2.0 * t).sin())
        })
        .collect()
}

fn bench_dtw_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("dtw_distance");

    for len in [32usize, 128, 512] {
        let a = make_motion(len, 0.0);
        let b = make_motion(len + len / 4, 0.3);

        group.bench_with_input(BenchmarkId::new("euclidean", len), &(&a, &b), |bencher, (a, b)| {
            let dtw = Dtw::euclidean();
            bencher.iter(|| dtw.distance(a, b));
        });
        group.bench_with_input(BenchmarkId::new("manhattan", len), &(&a, &b), |bencher, (a, b)| {
            let dtw = Dtw::new(Manhattan);
            bencher.iter(|| dtw.distance(a, b));
        });
    }

    group.finish();
}

fn bench_dtw_align(c: &mut Criterion) {
    let a = make_motion(128, 0.0);
    let b = make_motion(160, 0.3);
    let dtw = Dtw::euclidean();

    c.bench_function("dtw_align_128x160", |bencher| {
        bencher.iter(|| dtw.align(&a, &b));
    });
}

fn bench_dba_average(c: &mut Criterion) {
    let sequences: Vec<Vec<Frame>> = (0..10)
        .map(|i| make_motion(60 + i * 4, i as f64 * 0.05))
        .collect();
    let config = DbaConfig::new().with_max_iter(10);

    c.bench_function("dba_average_10x60_iter10", |bencher| {
        bencher.iter(|| config.average(&sequences).unwrap());
    });
}

criterion_group!(benches, bench_dtw_distance, bench_dtw_align, bench_dba_average);
criterion_main!(benches);
