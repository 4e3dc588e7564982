//! Criterion benchmarks for incidence_core weighted statistics.
//!
//! Measures weighted median and KDE evaluation at survey-like sample sizes
//! to characterise scaling behaviour.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use incidence_core::math::{weighted_median, EvaluationGrid, WeightedKde, DEFAULT_GRID_POINTS};
use incidence_core::rng::SampleRng;

/// Generate a right-skewed income sample with uneven weights.
fn generate_incomes(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = SampleRng::from_seed(11);
    let incomes: Vec<f64> = (0..n)
        .map(|_| {
            let u = rng.gen_uniform();
            // inverse Pareto-like tail on top of a floor
            150_000.0 / (1.0 - 0.95 * u).powf(1.3)
        })
        .collect();
    let weights: Vec<f64> = (0..n).map(|_| 20.0 + 300.0 * rng.gen_uniform()).collect();
    (incomes, weights)
}

/// Benchmark weighted median.
fn bench_weighted_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_median");

    for size in [1_000, 10_000, 50_000] {
        let (incomes, weights) = generate_incomes(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(&incomes, &weights),
            |b, (incomes, weights)| {
                b.iter(|| weighted_median(black_box(incomes), black_box(weights)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark KDE fitting and evaluation on the default grid.
fn bench_weighted_kde(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_kde");
    group.sample_size(20);

    for size in [1_000, 10_000, 50_000] {
        let (incomes, weights) = generate_incomes(size);
        let grid = EvaluationGrid::from_max(&incomes, DEFAULT_GRID_POINTS).unwrap();

        group.bench_with_input(
            BenchmarkId::new("fit", size),
            &(&incomes, &weights),
            |b, (incomes, weights)| {
                b.iter(|| WeightedKde::new(black_box(incomes), black_box(weights)).unwrap());
            },
        );

        let kde = WeightedKde::new(&incomes, &weights).unwrap();
        group.bench_with_input(BenchmarkId::new("evaluate", size), &kde, |b, kde| {
            b.iter(|| kde.evaluate(black_box(grid.points())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_weighted_median, bench_weighted_kde);
criterion_main!(benches);
