//! Benchmark for compilation performance
//!
//! Target: compile should complete in well under a millisecond

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use segment_compiler_core::extract::extract_conditions;
use segment_compiler_core::pipeline::{clear_cache, CompileOptions, SegmentPipeline};
use segment_compiler_core::vocabulary::Vocabulary;

const REQUESTS: &[&str] = &[
    "create a segment for mobile users",
    "segment for mobile users who visited more than 5 pages",
    "build an audience of visitors from california who purchased on weekends",
    "users from email campaigns with more than 10 minutes on site who added items to cart",
];

fn benchmark_extraction(c: &mut Criterion) {
    let vocabulary = Vocabulary::builtin();

    c.bench_function("extract_conditions", |b| {
        b.iter(|| {
            for text in REQUESTS {
                black_box(extract_conditions(vocabulary, black_box(text)));
            }
        })
    });
}

fn benchmark_compile(c: &mut Criterion) {
    let pipeline = SegmentPipeline::builtin();
    let options = CompileOptions::default();

    c.bench_function("compile_cold", |b| {
        b.iter(|| {
            clear_cache();
            for text in REQUESTS {
                let _ = black_box(pipeline.compile(black_box(text), &options));
            }
        })
    });

    c.bench_function("compile_cached", |b| {
        // Warm up the extraction cache
        for text in REQUESTS {
            let _ = pipeline.compile(text, &options);
        }

        b.iter(|| {
            for text in REQUESTS {
                let _ = black_box(pipeline.compile(black_box(text), &options));
            }
        })
    });
}

fn benchmark_serialization(c: &mut Criterion) {
    use segment_compiler_core::pipeline::CompileOutcome;

    let pipeline = SegmentPipeline::builtin();
    let outcome = pipeline
        .compile(
            "segment for mobile users who visited more than 5 pages",
            &CompileOptions::default(),
        )
        .unwrap();
    let CompileOutcome::Compiled(segment) = outcome else {
        panic!("benchmark request must compile");
    };

    c.bench_function("document_to_json", |b| {
        b.iter(|| black_box(segment.document.to_json()))
    });
}

criterion_group!(
    benches,
    benchmark_extraction,
    benchmark_compile,
    benchmark_serialization
);
criterion_main!(benches);
