//! Benchmarks for stream construction, consumption and scoring.
//!
//! Run with: `cargo bench -p driftbench-core --bench stream`
//!
//! These benchmarks measure:
//! - Building gradual streams from a pre-generated dataset (varying concepts)
//! - Iterating a built stream sample by sample
//! - The random RBF preset end to end
//! - Scoring reports against many true change points

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use driftbench_core::config::RbfStreamConfig;
use driftbench_core::data::{Dataset, Label, Matrix};
use driftbench_core::evaluation::{ChangePointReport, ScoringConfig};
use driftbench_core::generators::{concept_blocks, gradual_rbf, ConceptGenerator, RandomRbfGenerator};
use driftbench_core::stream::GradualStreamBuilder;

// =============================================================================
// Benchmark Configuration
// =============================================================================

const SAMPLES_PER_CONCEPT: usize = 500;
const DIMS: usize = 20;
const DRIFT_LENGTH: usize = 100;

fn rbf_dataset(num_concepts: usize) -> Dataset {
    let generator = RandomRbfGenerator::new(DIMS, 5).unwrap();
    concept_blocks(num_concepts, |i| generator.generate(i as u64, SAMPLES_PER_CONCEPT)).unwrap()
}

// =============================================================================
// Stream Benchmarks
// =============================================================================

fn bench_build_varying_concepts(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream/build_by_concepts");
    group.sample_size(20);

    for num_concepts in [5, 20, 50] {
        let dataset = rbf_dataset(num_concepts);
        group.throughput(Throughput::Elements((num_concepts * SAMPLES_PER_CONCEPT) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_concepts),
            &num_concepts,
            |b, &k| {
                b.iter(|| {
                    GradualStreamBuilder::new(black_box(dataset.clone()), k)
                        .with_drift_length(DRIFT_LENGTH)
                        .build()
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let stream = GradualStreamBuilder::new(rbf_dataset(20), 20)
        .with_drift_length(DRIFT_LENGTH)
        .build()
        .unwrap();

    let mut group = c.benchmark_group("stream/iterate");
    group.throughput(Throughput::Elements(stream.len() as u64));
    group.bench_function("sum_features", |b| {
        b.iter(|| {
            stream
                .iter()
                .map(|s| s.features.iter().sum::<f64>())
                .sum::<f64>()
        });
    });
    group.finish();
}

fn bench_rbf_preset(c: &mut Criterion) {
    let config = RbfStreamConfig {
        num_concepts: 10,
        n_per_concept: SAMPLES_PER_CONCEPT,
        dims: DIMS,
        ..Default::default()
    };
    c.bench_function("generators/gradual_rbf", |b| {
        b.iter(|| gradual_rbf(black_box(&config)).unwrap());
    });
}

// =============================================================================
// Scoring Benchmarks
// =============================================================================

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation/report");
    let config = ScoringConfig::default();

    for n in [10usize, 100, 1000] {
        let true_cps: Vec<usize> = (1..=n).map(|i| i * 100).collect();
        // Every true change point detected late, plus one false alarm in between
        let reported: Vec<usize> = true_cps.iter().flat_map(|&cp| [cp + 3, cp + 50]).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| ChangePointReport::compute(black_box(&true_cps), black_box(&reported), &config));
        });
    }
    group.finish();
}

fn label_of(i: usize) -> Label {
    (i / SAMPLES_PER_CONCEPT) as Label
}

fn bench_dataset_from_rows(c: &mut Criterion) {
    let rows: Vec<Vec<f64>> = (0..10 * SAMPLES_PER_CONCEPT)
        .map(|i| vec![i as f64; DIMS])
        .collect();
    let labels: Vec<Label> = (0..rows.len()).map(label_of).collect();
    c.bench_function("data/dataset_from_rows", |b| {
        b.iter(|| Dataset::new(Matrix::from_rows(black_box(&rows)).unwrap(), labels.clone()).unwrap());
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.05);
    targets =
        bench_build_varying_concepts,
        bench_iterate,
        bench_rbf_preset,
        bench_scoring,
        bench_dataset_from_rows,
);

criterion_main!(benches);
