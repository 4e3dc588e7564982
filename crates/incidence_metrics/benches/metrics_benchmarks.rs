//! Criterion benchmarks for distribution metrics.
//!
//! Measures Lorenz construction and full scenario evaluation, the latter
//! being the latency a user waits for after applying a scenario.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use incidence_core::rng::SampleRng;
use incidence_core::types::{EmployerSize, HouseholdKey, Member, MemberTable, Sector};
use incidence_metrics::{lorenz_curve, Baseline, EngineSettings, ScenarioEngine};
use incidence_shock::ShockScenario;
use std::sync::Arc;

/// Generate single-person households with skewed incomes.
fn generate_members(n: usize) -> MemberTable {
    let mut rng = SampleRng::from_seed(23);
    let members = (0..n)
        .map(|i| {
            let income = 150_000.0 / (1.0 - 0.95 * rng.gen_uniform()).powf(1.3);
            Member::new(HouseholdKey::new(i as u64, 1, 1))
                .with_sector(Sector::ALL[i % 17])
                .with_employer_size(EmployerSize::ALL[i % 4])
                .with_informality((i % 3 == 0) as u32)
                .with_first_activity(income)
                .with_baseline_per_capita(income)
                .with_expansion_factor(20.0 + 300.0 * rng.gen_uniform())
        })
        .collect();
    MemberTable::new(members).unwrap()
}

/// Benchmark Lorenz curve construction.
fn bench_lorenz(c: &mut Criterion) {
    let mut group = c.benchmark_group("lorenz_curve");

    for size in [10_000, 50_000] {
        let incomes = generate_members(size).baseline_per_capita();
        group.bench_with_input(BenchmarkId::from_parameter(size), &incomes, |b, incomes| {
            b.iter(|| lorenz_curve(black_box(incomes)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark a full scenario evaluation.
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_scenario");
    group.sample_size(10);

    let scenario = ShockScenario::new(50.0)
        .with_sectors([Sector::Commerce, Sector::Hospitality, Sector::Construction])
        .with_employer_size(EmployerSize::Small)
        .with_informality([1]);

    for size in [10_000, 50_000] {
        let members = Arc::new(generate_members(size));
        let baseline = Baseline::compute(members, EngineSettings::default()).unwrap();
        let engine = ScenarioEngine::new(Arc::new(baseline));

        group.bench_with_input(BenchmarkId::from_parameter(size), &engine, |b, engine| {
            b.iter(|| {
                let mut rng = SampleRng::default();
                engine.evaluate(black_box(&scenario), &mut rng).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lorenz, bench_evaluate);
criterion_main!(benches);
