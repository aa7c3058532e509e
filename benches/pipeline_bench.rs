//! Performance benchmarks for the submit pipeline
//!
//! Targets:
//! - Classification: <50µs per short submission
//! - Append: <20ms with a few hundred stored records
//! - Export/decode: linear in collection size

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use feedback_core::{
    FeedbackCollection, FeedbackRecord, FeedbackStore, Identity, LexiconBackend,
    SentimentClassifier,
};
use std::sync::Arc;
use tempfile::TempDir;

const SAMPLES: &[&str] = &[
    "Roads need repair",
    "The new clinic is great and the staff were very helpful!",
    "Water supply has NOT been restored, this is terrible",
    "Town hall meeting on Tuesday",
    "Thank you for fixing the street lights, but the drainage is still bad",
];

fn classifier() -> SentimentClassifier {
    SentimentClassifier::new(Arc::new(LexiconBackend::builtin()))
}

fn seeded_store(dir: &TempDir, records: usize) -> FeedbackStore<FeedbackRecord> {
    let classifier = classifier();
    let mut store = FeedbackStore::open(dir.path().join("feedback.csv")).unwrap();
    for i in 0..records {
        let text = SAMPLES[i % SAMPLES.len()];
        let sentiment = classifier.classify(text).unwrap();
        store
            .append(FeedbackRecord::new(Identity::named("bench"), text, sentiment))
            .unwrap();
    }
    store
}

/// Benchmark 1: Classification
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));
    let classifier = classifier();

    for (i, text) in SAMPLES.iter().enumerate() {
        group.bench_with_input(BenchmarkId::from_parameter(i), text, |b, text| {
            b.iter(|| classifier.classify(black_box(text)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark 2: Locked append against existing collections
fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    group.sample_size(20);
    let classifier = classifier();
    let sentiment = classifier.classify(SAMPLES[0]).unwrap();

    for size in [0usize, 100, 300] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let temp_dir = TempDir::new().unwrap();
            let mut store = seeded_store(&temp_dir, size);
            b.iter(|| {
                store
                    .append(FeedbackRecord::new(
                        Identity::default(),
                        black_box(SAMPLES[0]),
                        sentiment,
                    ))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark 3: Export and decode
fn bench_export_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_decode");

    for size in [10usize, 100, 500] {
        let temp_dir = TempDir::new().unwrap();
        let store = seeded_store(&temp_dir, size);
        let bytes = store.export().unwrap();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("export", size), &store, |b, store| {
            b.iter(|| store.export().unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| {
                let decoded: FeedbackCollection<FeedbackRecord> =
                    FeedbackStore::decode(black_box(bytes)).unwrap();
                decoded
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_append, bench_export_decode);
criterion_main!(benches);
