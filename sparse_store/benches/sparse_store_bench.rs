// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(missing_docs)]
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sparse_store::CsrMatrix;

fn random_triplets(n: usize, dim: usize, seed: u64) -> Vec<(usize, usize, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            (
                rng.gen_range(0..dim),
                rng.gen_range(0..dim),
                rng.gen_range(0.1..10.0),
            )
        })
        .collect()
}

fn bench_from_triplets(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_triplets");

    for size in [1_000, 10_000, 100_000] {
        let triplets = random_triplets(size, 500, 42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &triplets, |b, t| {
            b.iter(|| {
                let m = CsrMatrix::from_triplets(500, 500, t.clone()).unwrap();
                black_box(m.nnz());
            });
        });
    }

    group.finish();
}

fn bench_remove_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_node");

    let matrix = CsrMatrix::from_triplets(500, 500, random_triplets(50_000, 500, 7)).unwrap();

    group.bench_function("copy_csr", |b| {
        b.iter(|| {
            let pruned = matrix.remove_node(250).unwrap();
            black_box(pruned.nnz());
        });
    });

    group.bench_function("in_place_lil", |b| {
        let lil = matrix.to_lil();
        b.iter(|| {
            let mut m = lil.clone();
            m.remove_node_in_place(250).unwrap();
            black_box(m.nnz());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_from_triplets, bench_remove_node);
criterion_main!(benches);
