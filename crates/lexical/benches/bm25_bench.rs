use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lexical::{Bm25Config, Bm25Index};
use taxonomy::Concept;

fn fixture(n: usize) -> Vec<Concept> {
    (0..n)
        .map(|i| {
            let mut pref_label = HashMap::new();
            pref_label.insert("es".to_string(), format!("Concepto {i} de prueba"));
            Concept {
                id: format!("c{i}"),
                uri: format!("c{i}"),
                in_scheme: vec![],
                pref_label,
                alt_label: HashMap::new(),
                hidden_label: HashMap::new(),
                definition: HashMap::new(),
                scope_note: HashMap::new(),
                note: HashMap::new(),
                example: HashMap::new(),
                path: HashMap::new(),
                broader: vec![],
                narrower: vec![],
                exact_match: vec![],
                close_match: vec![],
                related: vec![],
            }
        })
        .collect()
}

fn bench_topk(c: &mut Criterion) {
    let mut group = c.benchmark_group("bm25_topk");

    for size in [100usize, 1_000, 10_000].iter() {
        let concepts = fixture(*size);
        let idx = Bm25Index::build("es", concepts.iter(), &Bm25Config::default());
        let query = lexical::tokenize_query("concepto de prueba");

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("concepts_{size}"), |b| {
            b.iter(|| idx.topk(black_box(&query), black_box(20)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_topk);
criterion_main!(benches);
