use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dense::DenseIndex;

fn write_npy(dict_body: &str, data: &[u8]) -> tempfile::NamedTempFile {
    let mut header = format!("{{{dict_body}}}");
    let prefix_len = 6 + 2 + 2;
    let mut total = prefix_len + header.len() + 1;
    while total % 64 != 0 {
        header.push(' ');
        total += 1;
    }
    header.push('\n');

    let mut buf = Vec::new();
    buf.extend_from_slice(b"\x93NUMPY");
    buf.push(1);
    buf.push(0);
    buf.extend_from_slice(&(header.len() as u16).to_le_bytes());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(data);

    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(&buf).unwrap();
    f
}

fn fixture(n: usize, dim: usize) -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
    let mut data = Vec::with_capacity(n * dim * 4);
    for i in 0..(n * dim) {
        let v = ((i % 97) as f32) / 97.0;
        data.extend_from_slice(&v.to_le_bytes());
    }
    let matrix = write_npy(
        &format!("'descr': '<f4', 'fortran_order': False, 'shape': ({n}, {dim}), "),
        &data,
    );

    let mut id_data = Vec::with_capacity(n * 4);
    for i in 0..n {
        let digit = (b'0' + (i % 10) as u8) as u32;
        id_data.extend_from_slice(&digit.to_le_bytes());
    }
    let ids = write_npy(
        &format!("'descr': '<U1', 'fortran_order': False, 'shape': ({n},), "),
        &id_data,
    );
    (matrix, ids)
}

fn bench_topk(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_topk");

    for size in [100usize, 1_000, 10_000].iter() {
        let (matrix, ids) = fixture(*size, 768);
        let idx = DenseIndex::load(matrix.path(), ids.path()).expect("load dense fixture");
        let query = vec![0.5f32; 768];

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_function(format!("rows_{size}"), |b| {
            b.iter(|| idx.topk(black_box(&query), black_box(10)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_topk);
criterion_main!(benches);
