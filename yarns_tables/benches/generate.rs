// Generation benchmarks.
//
// The whole run is dominated by the FM catalog (?⁻¹ over every retained
// ratio) and the Euclidean table; both are measured on their own as well.
//
// Run with: cargo bench -p yarns_tables --bench generate

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use yarns_tables::euclidean::euclidean_masks;
use yarns_tables::fm_ratios::FmCatalog;
use yarns_tables::minkowski::inverse_question_mark;
use yarns_tables::{GeneratorConfig, generate_all};

fn bench_generate_all(c: &mut Criterion) {
    let config = GeneratorConfig::default();
    c.bench_function("generate_all", |b| {
        b.iter(|| generate_all(black_box(&config)))
    });
}

fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");
    group.bench_function("euclidean_masks", |b| b.iter(euclidean_masks));
    group.bench_function("fm_catalog", |b| b.iter(|| FmCatalog::build(black_box(9))));
    group.bench_function("inverse_question_mark", |b| {
        b.iter(|| inverse_question_mark(black_box(4.0 / 9.0)))
    });
    group.finish();
}

criterion_group!(benches, bench_generate_all, bench_components);
criterion_main!(benches);
