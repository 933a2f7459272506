//! Criterion benchmarks for UBJSON encoding and decoding.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ubjsonr::{
    decode, encode, DecoderOptions, EncoderOptions, TypedArray, UbjsonMap, UbjsonValue,
};

fn sample_document() -> UbjsonValue {
    let records = (0..256)
        .map(|i| {
            let mut map = UbjsonMap::new();
            map.insert("id".into(), UbjsonValue::Int(i));
            map.insert("name".into(), format!("record-{i}").into());
            map.insert("score".into(), UbjsonValue::Float(i as f64 * 0.1));
            map.insert("active".into(), (i % 2 == 0).into());
            map.insert(
                "tags".into(),
                UbjsonValue::Array(vec!["a".into(), "bb".into(), "ccc".into()]),
            );
            UbjsonValue::Object(map)
        })
        .collect();
    UbjsonValue::Array(records)
}

fn bench_document(c: &mut Criterion) {
    let doc = sample_document();
    let plain = EncoderOptions::new();
    let optimized = EncoderOptions::new()
        .optimize_arrays(true)
        .optimize_objects(true);
    let bytes = encode(&doc, &optimized).unwrap();

    let mut group = c.benchmark_group("document");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode_plain", |b| {
        b.iter(|| encode(black_box(&doc), &plain).unwrap());
    });

    group.bench_function("encode_optimized", |b| {
        b.iter(|| encode(black_box(&doc), &optimized).unwrap());
    });

    group.bench_function("decode_optimized", |b| {
        let options = DecoderOptions::default();
        b.iter(|| decode(black_box(&bytes), &options).unwrap());
    });

    group.finish();
}

fn bench_typed_array(c: &mut Criterion) {
    let value = UbjsonValue::TypedArray(TypedArray::F64((0..4096).map(f64::from).collect()));
    let options = EncoderOptions::new().optimize_arrays(true);
    let bytes = encode(&value, &options).unwrap();

    let mut group = c.benchmark_group("typed_array");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode_f64", |b| {
        b.iter(|| encode(black_box(&value), &options).unwrap());
    });

    group.bench_function("decode_f64_typed", |b| {
        let options = DecoderOptions::new().use_typed_arrays(true);
        b.iter(|| decode(black_box(&bytes), &options).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_document, bench_typed_array);
criterion_main!(benches);
