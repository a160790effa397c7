//! Criterion benchmarks for mimic-cluster: k-means fit, single-cluster DBA, and RC4 sampling.

use criterion::{Criterion, criterion_group, criterion_main};

use mimic_cluster::{KMeansConfig, Rc4Random, SeedInput};
use mimic_dtw::Frame;

fn make_cluster_data() -> Vec<Vec<Frame>> {
    let offsets = [0.0, 5.0, 10.0, 15.0];
    let mut sequences = Vec::new();
    for &offset in &offsets {
        for j in 0..10 {
            let len = 40 + j * 2;
            let frames: Vec<Frame> = (0..len)
                .map(|i| {
                    let t = i as f64 * 0.15;
                    Frame::new(t.sin() + offset, t.cos() + offset, offset + j as f64 * 0.01)
                })
                .collect();
            sequences.push(frames);
        }
    }
    sequences
}

fn bench_kmeans_fit(c: &mut Criterion) {
    let sequences = make_cluster_data();
    let cfg = KMeansConfig::new(4).unwrap().with_max_iter(5);

    c.bench_function("kmeans_fit_40seq_k4_rounds5", |b| {
        b.iter(|| cfg.fit(&sequences).unwrap());
    });
}

fn bench_single_cluster(c: &mut Criterion) {
    let sequences: Vec<Vec<Frame>> = make_cluster_data().into_iter().take(10).collect();
    let cfg = KMeansConfig::new(1).unwrap();

    c.bench_function("kmeans_fit_10seq_k1", |b| {
        b.iter(|| cfg.fit(&sequences).unwrap());
    });
}

fn bench_choose_indices(c: &mut Criterion) {
    let seed = SeedInput::from("Labeling");

    c.bench_function("rc4_choose_1000_10", |b| {
        b.iter(|| Rc4Random::new(&seed).choose_indices(1000, 10));
    });
}

criterion_group!(benches, bench_kmeans_fit, bench_single_cluster, bench_choose_indices);
criterion_main!(benches);
