use annotext_engine::{Span, highlight};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_highlight(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight");
    group.sample_size(20);

    let text = common::generate_document(200);
    let sparse = common::generate_spans(&text, 97, 12);
    let dense = common::generate_spans(&text, 5, 4);

    group.bench_function("no_spans", |b| {
        b.iter(|| highlight::<Span>(std::hint::black_box(&text), &[]));
    });

    group.bench_function("sparse_spans", |b| {
        b.iter(|| highlight(std::hint::black_box(&text), std::hint::black_box(&sparse)));
    });

    group.bench_function("dense_spans", |b| {
        b.iter(|| highlight(std::hint::black_box(&text), std::hint::black_box(&dense)));
    });

    group.finish();
}

criterion_group!(benches, bench_highlight);
criterion_main!(benches);
