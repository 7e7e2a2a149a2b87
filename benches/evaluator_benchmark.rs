//! Evaluator Performance Benchmarks
//!
//! Covers tree loading, direct evaluation, and cached evaluation through the engine.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jmes_eval::ast::*;
use jmes_eval::{Comparator, QueryEngine, TreeInterpreter};
use serde_json::{Value, json};
use std::hint::black_box;

fn test_trees() -> Vec<(&'static str, ExpressionNode)> {
    vec![
        ("simple", sub_expression([field("store"), field("name")])),
        (
            "medium",
            filter_projection(
                sub_expression([field("store"), field("books")]),
                field("title"),
                comparator(Comparator::Lt, field("price"), literal(20)),
            ),
        ),
        (
            "complex",
            multi_select_dict([
                (
                    "cheapest",
                    sub_expression([
                        function(
                            "min_by",
                            [sub_expression([field("store"), field("books")]), expref(field("price"))],
                        ),
                        field("title"),
                    ]),
                ),
                (
                    "authors",
                    pipe([
                        flatten(projection(
                            sub_expression([field("store"), field("books")]),
                            field("authors"),
                        )),
                        function("sort", [current()]),
                    ]),
                ),
            ]),
        ),
    ]
}

fn create_document(books: usize) -> Value {
    json!({
        "store": {
            "name": "corner",
            "books": (0..books).map(|i| json!({
                "title": format!("book-{i}"),
                "price": (i % 40) as f64 + 0.99,
                "authors": [format!("author-{}", i % 13), format!("author-{}", i % 5)]
            })).collect::<Vec<_>>()
        }
    })
}

fn bench_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading");
    group.throughput(Throughput::Elements(1));

    for (complexity, tree) in test_trees() {
        let text = tree.to_json().to_string();
        group.bench_with_input(BenchmarkId::new("from_json_str", complexity), &text, |b, text| {
            b.iter(|| black_box(ExpressionNode::from_json_str(black_box(text))))
        });
    }

    group.finish();
}

fn bench_evaluator(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator");
    let interpreter = TreeInterpreter::new();
    let document = create_document(200);
    group.throughput(Throughput::Elements(1));

    for (complexity, tree) in test_trees() {
        group.bench_with_input(BenchmarkId::new("visit", complexity), &tree, |b, tree| {
            b.iter(|| black_box(interpreter.visit(black_box(tree), &document)))
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let engine = QueryEngine::new();
    let document = create_document(200);
    group.throughput(Throughput::Elements(1));

    for (complexity, tree) in test_trees() {
        let text = tree.to_json().to_string();
        group.bench_with_input(
            BenchmarkId::new("evaluate_tree_str", complexity),
            &text,
            |b, text| b.iter(|| black_box(engine.evaluate_tree_str(black_box(text), &document))),
        );
    }

    group.finish();
}

criterion_group!(
    evaluator_benchmarks,
    bench_loading,
    bench_evaluator,
    bench_engine
);
criterion_main!(evaluator_benchmarks);
