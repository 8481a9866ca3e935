//! Route resolution benchmarks.
//!
//! Run with: `cargo bench -p switchyard-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;
use switchyard_router::{Pattern, Router};

fn build_router(num_routes: usize) -> Router<usize> {
    let mut router = Router::new();
    let third = num_routes / 3;

    for i in 0..third {
        router.register(Method::GET, &format!("/api/resource{i}"), i);
        router.register(Method::GET, &format!("/api/resource{i}/:id"), third + i);
        router.register(
            Method::GET,
            &format!("/api/org/:orgId/resource{i}/:id"),
            2 * third + i,
        );
    }

    router
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile", |b| {
        b.iter(|| black_box(Pattern::compile("/users/:id/items/:itemId")));
    });
}

fn bench_static_resolve(c: &mut Criterion) {
    let router = build_router(99);

    c.bench_function("static_resolve", |b| {
        b.iter(|| black_box(router.resolve(&Method::GET, "/api/resource20")));
    });
}

fn bench_param_resolve(c: &mut Criterion) {
    let router = build_router(99);

    c.bench_function("param_resolve", |b| {
        b.iter(|| black_box(router.resolve(&Method::GET, "/api/org/acme/resource10/12345")));
    });
}

fn bench_miss(c: &mut Criterion) {
    let router = build_router(99);

    c.bench_function("miss", |b| {
        b.iter(|| black_box(router.resolve(&Method::GET, "/api/nonexistent/path/here")));
    });
}

fn bench_table_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_size");

    for num_routes in [9, 30, 99, 300] {
        let router = build_router(num_routes);
        let last = num_routes / 3 - 1;

        group.bench_with_input(
            BenchmarkId::new("last_registered", num_routes),
            &last,
            |b, &i| {
                let path = format!("/api/resource{i}/42");
                b.iter(|| black_box(router.resolve(&Method::GET, &path)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_static_resolve,
    bench_param_resolve,
    bench_miss,
    bench_table_size
);
criterion_main!(benches);
