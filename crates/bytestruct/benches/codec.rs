use std::sync::Arc;

use bytestruct::{FieldSpec, FieldType, StructLayout};
use criterion::{Criterion, criterion_group, criterion_main};

const TYPES: [FieldType; 4] = [FieldType::U8, FieldType::I16, FieldType::F32, FieldType::U64];

fn make_layout(field_count: usize) -> Arc<StructLayout> {
    let mut fields = Vec::with_capacity(field_count);

    for i in 0..field_count {
        let count = if i % 3 == 0 { 4 } else { 1 };
        fields.push(FieldSpec::new(TYPES[i % TYPES.len()], format!("f{}", i), count));
    }

    Arc::new(StructLayout::compile(&fields).unwrap())
}

fn make_packet(total_size: usize) -> Vec<u8> {
    // Deterministic but non-trivial pattern
    (0..total_size).map(|i| (i * 31 % 256) as u8).collect()
}

fn bench_decode(c: &mut Criterion) {
    for &field_count in &[1usize, 10, 50, 100] {
        let layout = make_layout(field_count);
        let mut packet = make_packet(layout.total_size());

        c.bench_function(&format!("decode_{}_fields", field_count), |b| {
            b.iter(|| {
                let _ = layout.decode(&mut packet).unwrap();
            })
        });
    }
}

fn bench_encode(c: &mut Criterion) {
    for &field_count in &[1usize, 10, 50, 100] {
        let layout = make_layout(field_count);
        let instance = layout.decode_owned(&make_packet(layout.total_size())).unwrap();
        let mut buf = vec![0u8; layout.total_size()];

        c.bench_function(&format!("encode_{}_fields", field_count), |b| {
            b.iter(|| {
                instance.encode(&mut buf).unwrap();
            })
        });
    }
}

fn bench_compile(c: &mut Criterion) {
    let fields: Vec<FieldSpec> = (0..100)
        .map(|i| FieldSpec::new(TYPES[i % TYPES.len()], format!("f{}", i), 1 + i % 3))
        .collect();

    c.bench_function("compile_100_fields", |b| {
        b.iter(|| StructLayout::compile(&fields).unwrap())
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_compile);
criterion_main!(benches);
