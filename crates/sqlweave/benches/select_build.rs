use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::SelectBuilder;
use sqlweave::prelude::*;

/// Table with `n` columns: id, col1, col2, ...
fn wide_table(name: &str, n: usize) -> Schema {
    let mut columns = vec!["id".to_string()];
    columns.extend((1..n).map(|i| format!("col{i}")));
    Schema::builder()
        .table_name(name)
        .columns(columns)
        .build()
        .expect("valid bench schema")
}

/// SELECT every column with one equality per column in WHERE.
fn select_with_filter(schema: &Schema) -> SelectBuilder {
    let conditions = schema
        .columns()
        .iter()
        .map(|c| Predicate::eq(col(c.as_str())));
    select_from(schema).filter(Predicate::and(conditions))
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select/build");

    for n in [1, 5, 10, 50, 100] {
        let schema = wide_table("t", n);
        let stmt = select_with_filter(&schema);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.build()));
        });
    }

    group.finish();
}

fn bench_select_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("select/join");

    for n in [5, 20, 100] {
        let left = wide_table("l", n);
        let right = wide_table("r", n);
        let stmt = select_with_filter(&left).left_join(
            &right,
            Predicate::eq(col("id")).var(on("col1")),
        );
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.build()));
        });
    }

    group.finish();
}

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");

    for n in [5, 50] {
        let schema = wide_table("t", n);
        group.bench_with_input(BenchmarkId::new("insert", n), &schema, |b, schema| {
            b.iter(|| black_box(insert(schema).build()));
        });
        group.bench_with_input(BenchmarkId::new("update", n), &schema, |b, schema| {
            b.iter(|| black_box(update(schema).build()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_select_join, bench_mutations);
criterion_main!(benches);
