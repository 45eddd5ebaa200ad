//! Benchmark for statement building and value encoding.
//!
//! Measures the performance of:
//! 1. Rendering SELECT/INSERT/UPDATE statements with their parameters
//! 2. Serializing parameter lists, from scalars to nested collections
//! 3. Decoding row cells back into values

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use scylla_query_rs::encoding::deserialize_value;
use scylla_query_rs::encoding::wire::serialize_cell;
use scylla_query_rs::{
    ColumnType, Insert, Order, QueryBuilder, Select, SerializedValues, Update, Value,
};
use std::hint::black_box;

fn bench_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("builders");

    group.bench_function("select", |b| {
        b.iter(|| {
            let select = Select::new(black_box("events"))
                .only(["kind", "at", "payload"])
                .r#where("day = ?", ("2024-01-01",))
                .unwrap()
                .r#where("at > ?", (1_700_000_000_000i64,))
                .unwrap()
                .order_by("at", Order::Desc)
                .limit(100);
            black_box(select.build().unwrap())
        });
    });

    group.bench_function("insert_ten_columns", |b| {
        b.iter(|| {
            let mut insert = Insert::new(black_box("wide"));
            for column in 0..10 {
                insert = insert.set(format!("c{column}"), column).unwrap();
            }
            black_box(insert.if_not_exists().ttl(3600).build().unwrap())
        });
    });

    group.bench_function("update_conditional", |b| {
        b.iter(|| {
            let update = Update::new(black_box("users"))
                .set("name", "Ada")
                .unwrap()
                .set("tags", vec!["a", "b", "c"])
                .unwrap()
                .if_("version = ?", (3,))
                .unwrap()
                .r#where("id = ?", (7,))
                .unwrap();
            black_box(update.build().unwrap())
        });
    });

    group.finish();
}

fn int_list(len: i32) -> Value {
    Value::list((0..len).map(Value::Int))
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    for len in [10, 100, 1000] {
        let value = int_list(len);
        let bytes = serialize_cell(&value).unwrap().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("serialize_list", len), &value, |b, value| {
            b.iter(|| black_box(SerializedValues::from_values([value]).unwrap()));
        });

        let typ = ColumnType::list(ColumnType::Int);
        group.bench_with_input(BenchmarkId::new("decode_list", len), &bytes, |b, bytes| {
            b.iter(|| black_box(deserialize_value(Some(bytes.as_slice()), &typ).unwrap()));
        });
    }

    let udt_type = ColumnType::udt(
        "ks",
        "profile",
        [
            ("name", ColumnType::Text),
            ("scores", ColumnType::map(ColumnType::Text, ColumnType::Double)),
        ],
    );
    let udt = Value::udt(
        "profile",
        [
            ("name", Value::from("Ada")),
            (
                "scores",
                Value::map((0..20).map(|i| (Value::from(format!("k{i}")), Value::Double(f64::from(i))))),
            ),
        ],
    );
    let udt_bytes = serialize_cell(&udt).unwrap().unwrap();
    group.throughput(Throughput::Bytes(udt_bytes.len() as u64));
    group.bench_function("decode_udt", |b| {
        b.iter(|| black_box(deserialize_value(Some(black_box(udt_bytes.as_slice())), &udt_type).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_builders, bench_encoding);
criterion_main!(benches);
