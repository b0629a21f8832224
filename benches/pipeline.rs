use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use openapi_flow::config::Config;
use openapi_flow::layout::compute_layout;
use openapi_flow::parser::parse;
use openapi_flow::{build, try_visualize, validate};
use std::hint::black_box;

fn wide_api_source(groups: usize, paths_per_group: usize) -> String {
    let mut out = String::from("openapi: 3.0.0\ninfo:\n  title: Bench API\npaths:\n");
    for g in 0..groups {
        for p in 0..paths_per_group {
            out.push_str(&format!("  /res{g}/item{p}:\n"));
            out.push_str(&format!("    get:\n      summary: Read {g}.{p}\n"));
            out.push_str(&format!("    put:\n      summary: Write {g}.{p}\n"));
            if p % 3 == 0 {
                out.push_str("    delete: {}\n");
            }
        }
    }
    out
}

fn sizes() -> [(&'static str, usize, usize); 4] {
    [
        ("tiny", 2, 2),
        ("small", 5, 5),
        ("medium", 20, 10),
        ("large", 50, 20),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, groups, paths) in sizes() {
        let input = wide_api_source(groups, paths);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| parse(black_box(data)).expect("parse failed"));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("layout");
    for (name, groups, paths) in sizes() {
        let input = wide_api_source(groups, paths);
        let document = parse(&input)
            .expect("parse failed")
            .into_document()
            .expect("bench input is not blank");
        let graph = build(&validate(document).expect("valid"), &config.grouping);
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, data| {
            b.iter(|| {
                compute_layout(black_box(&data.nodes), black_box(&data.edges), &config.layout)
                    .expect("layout failed")
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("end_to_end");
    for (name, groups, paths) in sizes() {
        let input = wide_api_source(groups, paths);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| try_visualize(black_box(data), &config).expect("pipeline failed"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_end_to_end);
criterion_main!(benches);
