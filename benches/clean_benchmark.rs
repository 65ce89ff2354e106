//! Benchmarks for countryclean batch cleaning.
//!
//! Run with: cargo bench
//!
//! These benchmarks measure reference construction and batch cleaning at
//! various batch sizes, with a mix of clean, aliased, and garbage rows.

use countryclean::{
    build_reference, clean_batch, clean_batch_with_options, AliasTable, CleanOptions,
    CountryReference, RawRecord, Reconciler, ReconciliationStats,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const CODES: &[&str] = &["US", "usa", "GBR", "u.k.", "", "  de ", "123", "ZZ", "fr", "IND"];
const NAMES: &[&str] = &[
    "United States",
    "U.S.A.",
    "england",
    "Côte d'Ivoire",
    "",
    "Germany",
    "Atlantis",
    "Czech Republic",
    "  Brazil ",
    "Viet Nam",
];

/// Creates a synthetic survey batch with the given number of rows.
fn create_test_records(count: usize) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(42);

    (0..count)
        .map(|i| {
            RawRecord::new()
                .with("Timestamp", format!("2023-01-{:02}", i % 28 + 1))
                .with("Gender", " FEMALE ")
                .with("Country Code", *CODES.choose(&mut rng).unwrap())
                .with("Goal-Other", (i % 3) as i64)
                .with("Country name (from Country)", *NAMES.choose(&mut rng).unwrap())
                .with("Voyage Tier", "")
        })
        .collect()
}

/// Benchmark reference construction (26x26 enumeration).
fn bench_reference_build(c: &mut Criterion) {
    c.bench_function("build_reference", |b| {
        b.iter(|| black_box(build_reference()));
    });
}

/// Benchmark single-pair reconciliation.
fn bench_reconcile(c: &mut Criterion) {
    let reference = CountryReference::build();
    let aliases = AliasTable::builtin();
    let reconciler = Reconciler::new(&reference, &aliases);

    c.bench_function("reconcile_alias_name", |b| {
        b.iter(|| {
            let mut stats = ReconciliationStats::new();
            reconciler.reconcile(black_box(None), black_box(Some("Côte d'Ivoire")), &mut stats)
        });
    });

    c.bench_function("reconcile_three_letter", |b| {
        b.iter(|| {
            let mut stats = ReconciliationStats::new();
            reconciler.reconcile(black_box(Some("DEU")), black_box(Some("germany")), &mut stats)
        });
    });
}

/// Benchmark batch cleaning at various sizes.
fn bench_batch_cleaning(c: &mut Criterion) {
    let reference = build_reference();
    let mut group = c.benchmark_group("batch_cleaning");

    for count in [100, 1_000, 10_000].iter() {
        let records = create_test_records(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), &records, |b, records| {
            b.iter(|| clean_batch(black_box(records), &reference));
        });

        let options = CleanOptions::new().parallel();
        group.bench_with_input(BenchmarkId::new("parallel", count), &records, |b, records| {
            b.iter(|| clean_batch_with_options(black_box(records), &reference, &options));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_reference_build,
    bench_reconcile,
    bench_batch_cleaning,
);
criterion_main!(benches);
