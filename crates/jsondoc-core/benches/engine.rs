//! Query and patch throughput.
//!
//! Compares cached against uncached path evaluation and measures patch
//! application on a document large enough that path copying matters.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use jsondoc_core::{apply_patch, compile, parse_patch_str, query, PathCache, Value};

/// A catalog of `n` products, each with a nested price record.
fn catalog(n: usize) -> Value {
    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"id":{i},"name":"item-{i}","price":{{"amount":{},"currency":"EUR"}},"tags":["a","b"]}}"#,
                i % 100
            )
        })
        .collect();
    format!(r#"{{"catalog":{{"items":[{}]}}}}"#, items.join(","))
        .parse()
        .expect("catalog JSON is valid")
}

const EXPRESSIONS: [&str; 3] = [
    "$.catalog.items[-1].name",
    "$.catalog.items[?(@.id >= 500)]",
    "$..amount",
];

fn bench_query(c: &mut Criterion) {
    let doc = catalog(1_000);
    let mut group = c.benchmark_group("query");

    for expression in EXPRESSIONS {
        let cache = PathCache::new();
        group.bench_with_input(
            BenchmarkId::new("cached", expression),
            &expression,
            |b, expression| {
                b.iter(|| {
                    let count = query(&doc, black_box(expression), &cache)
                        .map(Iterator::count)
                        .unwrap_or(0);
                    black_box(count)
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("uncached", expression),
            &expression,
            |b, expression| {
                b.iter(|| {
                    let count = compile(black_box(expression))
                        .map(|path| path.evaluate(&doc).count())
                        .unwrap_or(0);
                    black_box(count)
                })
            },
        );
    }

    group.finish();
}

fn bench_first_match(c: &mut Criterion) {
    let doc = catalog(10_000);
    let cache = PathCache::new();

    c.bench_function("query_first/descent", |b| {
        b.iter(|| black_box(query(&doc, "$..currency", &cache).ok().and_then(|mut q| q.next())))
    });
}

fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch");

    for size in [100usize, 1_000, 10_000] {
        let doc = catalog(size);
        let ops = parse_patch_str(
            r#"[
                {"op":"replace","path":"/catalog/items/0/price/amount","value":1},
                {"op":"add","path":"/catalog/items/-","value":{"id":-1}},
                {"op":"test","path":"/catalog/items/0/price/amount","value":1}
            ]"#,
        )
        .expect("bench patch is valid");

        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| black_box(apply_patch(doc, &ops)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query, bench_first_match, bench_patch);
criterion_main!(benches);
