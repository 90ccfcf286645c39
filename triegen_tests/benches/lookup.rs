//! Benchmark generated lookups with [`criterion`].
#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;
use triegen_tests::keywords;

const INPUTS: [&str; 8] = [
    "while", "unsigned", "volatile", "do", "double", "dox", "", "register",
];

fn benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    group
        .noise_threshold(0.10)
        .significance_level(0.01)
        .confidence_level(0.99)
        .warm_up_time(Duration::from_millis(100))
        .measurement_time(Duration::from_secs(5));

    group.bench_function("keywords", |b| {
        b.iter(|| {
            INPUTS
                .iter()
                .map(|input| keywords(black_box(input)))
                .sum::<i64>()
        });
    });

    group.finish();
}

criterion_group!(lookup_group, benchmarks);
criterion_main!(lookup_group);
