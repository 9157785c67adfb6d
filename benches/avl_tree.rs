//! Benchmarks for the [`AvlTree`].

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::prelude::*;
use skiptree::AvlTree;

/// Benchmarking sizes
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

fn filled(rng: &mut StdRng, size: usize) -> AvlTree<usize> {
    std::iter::repeat_with(|| rng.random()).take(size).collect()
}

/// Benchmarking insertion
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("AvlTree Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut tree = filled(&mut rng, size);

            b.iter(|| {
                black_box(tree.insert(rng.random()));
            });
        });
    }
}

/// Benchmarking lookups of present keys
pub fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("AvlTree Search");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let tree = filled(&mut rng, size);
            let keys: Vec<usize> = tree.iter().copied().choose_multiple(&mut rng, 10);

            b.iter(|| {
                for key in &keys {
                    black_box(tree.contains(key));
                }
            });
        });
    }
}

/// Benchmarking a removal followed by the reinsertion of the same key
pub fn remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("AvlTree Remove");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut tree = filled(&mut rng, size);
            let keys: Vec<usize> = tree.iter().copied().choose_multiple(&mut rng, 10);

            b.iter(|| {
                for key in &keys {
                    black_box(tree.remove(key));
                    tree.insert(*key);
                }
            });
        });
    }
}

/// Benchmarking in-order iteration
pub fn iter(c: &mut Criterion) {
    c.bench_function("AvlTree Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let tree = filled(&mut rng, 100_000);

        b.iter(|| {
            for key in &tree {
                black_box(key);
            }
        });
    });
}
