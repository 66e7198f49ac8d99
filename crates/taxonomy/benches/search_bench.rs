use std::io::Write;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use embeddings::EmbeddingsBackend;
use tempfile::NamedTempFile;

use taxonomy::{TaxoConfig, TaxonomyStore};

fn fixture(n: usize) -> NamedTempFile {
    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        rows.push(format!(
            r#"{{"id": "c{i}", "prefLabel": {{"es": "Concepto {i}", "en": "Concept {i}"}}, "altLabel": {{"es": ["Alterno {i}"]}}}}"#
        ));
    }
    let json = format!("[{}]", rows.join(","));
    let mut f = NamedTempFile::new().expect("tempfile");
    f.write_all(json.as_bytes()).expect("write fixture");
    f
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("taxonomy_search");

    for size in [100usize, 1_000, 10_000].iter() {
        let f = fixture(*size);
        let store = TaxonomyStore::load(
            f.path(),
            TaxoConfig::default(),
            Arc::new(EmbeddingsBackend::default()),
        )
        .expect("load taxonomy fixture");

        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("concepts_{size}"), |b| {
            b.iter(|| store.search(black_box("Concepto 1"), black_box("es"), black_box(Some(10))))
        });
    }

    group.finish();
}

fn bench_autocomplete(c: &mut Criterion) {
    let f = fixture(10_000);
    let store = TaxonomyStore::load(
        f.path(),
        TaxoConfig::default(),
        Arc::new(EmbeddingsBackend::default()),
    )
    .expect("load taxonomy fixture");

    c.bench_function("taxonomy_autocomplete_10000", |b| {
        b.iter(|| store.autocomplete(black_box("conce"), black_box("es"), black_box(10)))
    });
}

criterion_group!(benches, bench_search, bench_autocomplete);
criterion_main!(benches);
