//! Benchmarks for field extraction.
//!
//! Run with: cargo bench
//!
//! Uses synthetic safety-data-sheet text of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use coshh::fields::FieldExtractor;

/// Creates a synthetic sheet with `sections` repeated hazard/first-aid blocks.
fn create_sheet(sections: usize) -> String {
    let mut text = String::from("SAFETY DATA SHEET\nProduct name: Benchmark Solvent\n");
    for i in 0..sections {
        text.push_str(&format!(
            "H{:03} Hazard statement number {}.\n\
             Avoid inhalation of vapour. Wear gloves and goggles.\n\
             First aid: move to fresh air, rinse skin with water.\n",
            200 + (i % 150),
            i
        ));
    }
    text
}

fn bench_extract(c: &mut Criterion) {
    let extractor = FieldExtractor::new();
    let mut group = c.benchmark_group("extract_fields");

    for sections in [1usize, 10, 100, 1000] {
        let text = create_sheet(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &text, |b, text| {
            b.iter(|| extractor.extract(black_box(text)))
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("field_extractor_new", |b| b.iter(FieldExtractor::new));
}

criterion_group!(benches, bench_extract, bench_compile);
criterion_main!(benches);
