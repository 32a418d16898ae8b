use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docsite_search::config::SearchConfig;
use docsite_search::{SearchEngine, SearchEntry, SearchOptions};
use docsite_search::{SearchIndex, SourceId};

fn build_engine(entries: usize) -> SearchEngine {
    let entries = (0..entries)
        .map(|i| SearchEntry {
            title: format!("Page {} about theme configuration", i),
            text: format!(
                "Section {} covers installing, configuring, and extending the \
                 documentation theme, including colors, fonts, and layout.",
                i
            ),
            href: format!("pages/{}.html", i),
            object_id: Some(format!("page-{}", i)),
            section: None,
        })
        .collect();

    let mut engine = SearchEngine::new(&SearchConfig::default());
    engine.build_index(SearchIndex {
        source: SourceId::Primary,
        base_url: String::new(),
        entries,
    });
    engine
}

fn bench_search(c: &mut Criterion) {
    let engine = build_engine(2_000);
    let options = SearchOptions::with_limit(10);

    c.bench_function("search_2k_entries", |b| {
        b.iter(|| black_box(engine.search(black_box("theme colors"), &options)))
    });

    c.bench_function("search_2k_entries_miss", |b| {
        b.iter(|| black_box(engine.search(black_box("zzzzqqqq"), &options)))
    });
}

fn bench_build_index(c: &mut Criterion) {
    c.bench_function("build_index_2k_entries", |b| {
        b.iter(|| black_box(build_engine(2_000)))
    });
}

criterion_group!(benches, bench_search, bench_build_index);
criterion_main!(benches);
