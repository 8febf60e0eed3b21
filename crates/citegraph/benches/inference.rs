//! Benchmarks for the citation graph pipeline.
//!
//! These benchmarks measure:
//! - The pairwise similarity sweep, parallel vs sequential
//! - Shortest-path and SCC queries on an inferred graph
//! - Scaling behavior with different record counts

// Benchmark code - performance of the benchmark setup is not critical
#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use citegraph::{
    AnalysisConfig, CitationAnalysis, Record, RecordId, RecordSet, infer_edges, shortest_path,
    strongly_connected_components,
};

const TOPICS: &[&str] = &[
    "graph", "neural", "citation", "network", "survey", "transformer", "retrieval", "ranking",
    "embedding", "clustering", "bibliometric", "analysis", "deep", "learning", "models", "text",
];

const AUTHORS: &[&str] = &[
    "Ada Lovelace",
    "Bob Kahn",
    "Grace Hopper",
    "Alan Turing",
    "Barbara Liskov",
    "Donald Knuth",
];

/// Deterministic synthetic corpus: overlapping titles, a few shared authors,
/// years spread over a decade and an occasional explicit citation.
fn generate_records(count: usize) -> RecordSet {
    let records = (0..count)
        .map(|i| {
            let title: Vec<&str> = (0..5).map(|k| TOPICS[(i * 7 + k * 3) % TOPICS.len()]).collect();
            let authors = [AUTHORS[i % AUTHORS.len()], AUTHORS[(i / 3) % AUTHORS.len()]];
            let record = Record::new(i, &title.join(" "))
                .with_authors(authors)
                .with_keywords([TOPICS[i % TOPICS.len()]])
                .with_year(Some(2010 + (i % 10) as i32));
            if i % 17 == 0 && i > 0 {
                record.with_citations([(i / 2) as i64])
            } else {
                record
            }
        })
        .collect();
    RecordSet::new(records).expect("generated ids are contiguous")
}

fn bench_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_inference");

    for count in &[100usize, 400, 1000] {
        let records = generate_records(*count);
        group.throughput(Throughput::Elements((*count * *count) as u64));

        for parallel in [true, false] {
            let config = AnalysisConfig {
                parallel,
                ..AnalysisConfig::default()
            };
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, count), &records, |b, records| {
                b.iter(|| infer_edges(black_box(records), &config).expect("config is valid"));
            });
        }
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_queries");

    for count in &[400usize, 1000] {
        let analysis = CitationAnalysis::build(generate_records(*count), &AnalysisConfig::default())
            .expect("analysis builds");
        let source = RecordId(*count - 1);
        let target = RecordId(0);

        group.bench_with_input(
            BenchmarkId::new("shortest_path", count),
            analysis.graph(),
            |b, graph| {
                b.iter(|| shortest_path(black_box(graph), source, target).expect("ids exist"));
            },
        );
        group.bench_with_input(BenchmarkId::new("scc", count), analysis.graph(), |b, graph| {
            b.iter(|| strongly_connected_components(black_box(graph)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_inference, bench_queries);
criterion_main!(benches);
