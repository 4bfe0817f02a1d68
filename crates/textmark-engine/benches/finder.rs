use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use textmark_engine::content::TextContent;
use textmark_engine::dom::markup;
use textmark_engine::finder::{Query, create_finder};
mod common;

fn bench_text_finder(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_finder");
    group.sample_size(20);

    let dom = markup::parse(&common::generate_markup(200)).unwrap();
    let content = TextContent::new(&dom, dom.root());

    group.bench_function("literal_across_leaves", |b| {
        let query = Query::from("quick brown");
        b.iter(|| {
            let hits = create_finder(&dom, &content, black_box(&query))
                .unwrap()
                .count();
            black_box(hits);
        });
    });

    group.finish();
}

fn bench_path_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_finder");
    group.sample_size(20);

    let dom = markup::parse(&common::generate_markup(200)).unwrap();
    let content = TextContent::new(&dom, dom.root());
    let persisted: Vec<_> = create_finder(&dom, &content, &Query::from("lazy dog"))
        .unwrap()
        .filter_map(|range| range.to_path_range(&dom, &content))
        .collect();

    group.bench_function("restore", |b| {
        b.iter(|| {
            for range in &persisted {
                let query = Query::PathRange(range.clone());
                let restored = create_finder(&dom, &content, &query).unwrap().next();
                black_box(restored);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_text_finder, bench_path_round_trip);
criterion_main!(benches);
