use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use msorm::{Dialect, MutationQuery, SqlCondition, UpdateQuery};

struct SqlServer;
impl Dialect for SqlServer {}

/// UPDATE t SET [col0]=:placeholder_0, ... WHERE [id] = :db_condition_placeholder_0
fn build_update(n: usize) -> UpdateQuery {
    let mut q = UpdateQuery::new("t");
    for i in 0..n {
        q = q.set(&format!("col{i}"), i as i64);
    }
    q.condition(SqlCondition::new().eq("id", 1))
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("update/to_sql");

    for n in [1, 5, 10, 50, 100] {
        let q = build_update(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.to_sql(&SqlServer)));
        });
    }

    group.finish();
}

fn bench_expression_override(c: &mut Criterion) {
    let mut group = c.benchmark_group("update/expression_override");

    for n in [5, 20, 100] {
        let mut q = build_update(n);
        for i in (0..n).step_by(2) {
            q = q.expression(&format!("col{i}"), "DEFAULT");
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.to_sql(&SqlServer)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_to_sql, bench_expression_override);
criterion_main!(benches);
