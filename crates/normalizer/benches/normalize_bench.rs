use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use normalizer::{normalize, NormalizeOptions};

fn bench_normalize(c: &mut Criterion) {
    let opts = NormalizeOptions::default();
    let mut group = c.benchmark_group("normalize");

    for size in [64, 512, 4096, 32768].iter() {
        let text = "palabras ".repeat(*size / 9);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("bytes_{size}"), |b| {
            b.iter(|| normalize(black_box(&text), black_box(opts)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
