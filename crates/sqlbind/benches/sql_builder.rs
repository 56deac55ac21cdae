use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlbind::{Condition, Predicate, QueryBuilder};

/// Build a builder with `n` columns and `n` equality predicates:
/// SELECT col0,col1,... FROM t WHERE col0 = :col0 AND col1 = :col1 ...
fn build_select(n: usize) -> QueryBuilder {
    let mut qb = QueryBuilder::new("t");
    for i in 0..n {
        qb.column(&format!("col{i}"));
    }
    for i in 0..n {
        qb.eq(&format!("col{i}"), i as i64);
    }
    qb.order_by_desc("col0").paginate(3, 25);
    qb
}

fn bench_select_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select_query");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.select_query()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let qb = build_select(n);
                black_box(qb.select_query());
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let mut qb = QueryBuilder::new("t");
                qb.in_list("id", values.iter().copied());
                black_box(qb.select_query());
            });
        });
    }

    group.finish();
}

fn bench_nested_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/nested_groups");

    for depth in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut inner = Condition::or();
                inner
                    .add(Predicate::eq("leaf_a", 1))
                    .add(Predicate::eq("leaf_b", 2));
                for level in 0..depth {
                    let mut outer = if level % 2 == 0 {
                        Condition::and()
                    } else {
                        Condition::or()
                    };
                    outer
                        .add(Predicate::eq(format!("level{level}"), level as i64))
                        .add(Predicate::group(inner));
                    inner = outer;
                }
                let mut qb = QueryBuilder::new("t");
                qb.where_group(inner);
                black_box(qb.select_query());
            });
        });
    }

    group.finish();
}

fn bench_count_query(c: &mut Criterion) {
    let qb = build_select(10);
    c.bench_function("sql_builder/count_query", |b| {
        b.iter(|| black_box(qb.count_query()));
    });
}

criterion_group!(
    benches,
    bench_select_query,
    bench_build_and_render,
    bench_in_list,
    bench_nested_groups,
    bench_count_query
);
criterion_main!(benches);
