use criterion::{criterion_group, criterion_main, Criterion};
use search_core::{Document, Normalizer, SearchEngine};

const PLOT: &str = "A computer hacker learns from mysterious rebels about the true nature of his reality \
    and his role in the war against its controllers. Neo and the rebel leaders estimate that they have \
    72 hours until 250,000 probes discover Zion and destroy it and its inhabitants.";

fn corpus() -> Vec<Document> {
    (0..500)
        .map(|i| Document { id: i, title: format!("Movie {i}"), description: PLOT.repeat((i % 4 + 1) as usize) })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let n = Normalizer::new(["a", "the", "and", "of", "in", "its", "his"]);
    c.bench_function("normalize_plot", |b| b.iter(|| n.normalize(PLOT)));
}

fn bench_search(c: &mut Criterion) {
    let engine = SearchEngine::build(corpus(), Normalizer::new(["a", "the", "and"])).expect("build");
    c.bench_function("search_two_terms", |b| b.iter(|| engine.search("hacker reality", 10)));
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
