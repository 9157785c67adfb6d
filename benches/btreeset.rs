//! Benchmarks for the Standard Library's [`BTreeSet`], as a baseline.

use std::collections::BTreeSet;

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::prelude::*;

/// Benchmarking sizes
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

fn filled(rng: &mut StdRng, size: usize) -> BTreeSet<usize> {
    std::iter::repeat_with(|| rng.random()).take(size).collect()
}

/// Benchmarking insertion
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("BTreeSet Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut set = filled(&mut rng, size);

            b.iter(|| {
                black_box(set.insert(rng.random()));
            });
        });
    }
}

/// Benchmarking lookups of present values
pub fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("BTreeSet Search");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let set = filled(&mut rng, size);
            let values: Vec<usize> = set.iter().copied().choose_multiple(&mut rng, 10);

            b.iter(|| {
                for value in &values {
                    black_box(set.contains(value));
                }
            });
        });
    }
}

/// Benchmarking rank queries, which a `BTreeSet` can only answer by walking
pub fn nth(c: &mut Criterion) {
    let mut group = c.benchmark_group("BTreeSet Nth");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let set = filled(&mut rng, size);
            let ranks: Vec<usize> = std::iter::repeat_with(|| rng.random_range(0..set.len()))
                .take(10)
                .collect();

            b.iter(|| {
                for rank in &ranks {
                    black_box(set.iter().nth(*rank));
                }
            });
        });
    }
}
