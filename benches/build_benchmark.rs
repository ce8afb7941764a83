//! Benchmarks for deck building and package writing.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use deckgen::{DeckBuilder, DeckOptions, DeckRequest, PackageWriter, Sections, Template};

/// A request with `sections` sections of `bullets` bullets each.
fn create_request(sections: usize, bullets: usize) -> DeckRequest {
    let sections: Sections = (0..sections)
        .map(|s| {
            let items = (0..bullets)
                .map(|b| format!("Section {} point {} with a little more text to lay out", s, b))
                .collect();
            (format!("Section {}", s), items)
        })
        .collect();
    DeckRequest::with_sections("Benchmark Deck", sections)
}

/// Benchmark layout (normalize, paginate, size, resolve) only.
fn bench_layout(c: &mut Criterion) {
    let template = Template::builtin().unwrap();
    let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
    let mut group = c.benchmark_group("layout");

    for bullet_count in [10, 100, 1000].iter() {
        let request = create_request(4, *bullet_count / 4);
        group.throughput(Throughput::Elements(*bullet_count as u64));
        group.bench_with_input(
            BenchmarkId::new("bullets", bullet_count),
            &request,
            |b, request| {
                b.iter(|| {
                    let _ = builder.build(black_box(request.clone()));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark serialization of a built deck to .pptx bytes.
fn bench_package_writing(c: &mut Criterion) {
    let template = Template::builtin().unwrap();
    let builder = DeckBuilder::new(&template, DeckOptions::default()).unwrap();
    let writer = PackageWriter::new(&template);
    let mut group = c.benchmark_group("package_writing");

    for bullet_count in [10, 100, 1000].iter() {
        let deck = builder.build(create_request(4, *bullet_count / 4)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("bullets", bullet_count),
            &deck,
            |b, deck| {
                b.iter(|| {
                    let _ = writer.to_bytes(black_box(deck));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark template loading from package bytes.
fn bench_template_loading(c: &mut Criterion) {
    let template = Template::builtin().unwrap();
    let deck = DeckBuilder::new(&template, DeckOptions::default())
        .unwrap()
        .build(create_request(2, 10))
        .unwrap();
    let bytes = PackageWriter::new(&template).to_bytes(&deck).unwrap();

    c.bench_function("template_from_bytes", |b| {
        b.iter(|| {
            let _ = Template::from_bytes(black_box(bytes.clone()));
        });
    });
}

criterion_group!(
    benches,
    bench_layout,
    bench_package_writing,
    bench_template_loading,
);
criterion_main!(benches);
