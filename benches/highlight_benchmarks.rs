//! Benchmarks for the highlighting pipeline.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use scribe_buffer::{ErrorLineSet, TextSnapshot};
use scribe_syntax::{ConfigHighlighter, SearchQuery, SyntaxLibrary, compose, tokenize};

/// Generates Kotlin-looking source for benchmarking.
fn generate_source(lines: usize) -> TextSnapshot {
    (0..lines)
        .map(|i| match i % 4 {
            0 => format!("fun item{i}(x: Int): String {{ // line {i}\n"),
            1 => format!("    val label = \"value {i}\" + x.toString()\n"),
            2 => format!("    /* block {i} */ return label + {i}.5\n"),
            _ => "}\n".to_string(),
        })
        .collect::<String>()
        .into()
}

/// Benchmarks the built-in tokenizer.
fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for size in [100, 1000, 10000].iter() {
        let text = generate_source(*size);
        group.bench_with_input(BenchmarkId::new("kotlin", size), &text, |b, text| {
            b.iter(|| black_box(tokenize(black_box(text))))
        });
    }

    group.finish();
}

/// Benchmarks the regex highlighter with a bundled configuration.
fn bench_config_highlight(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_highlight");
    let Some(config) = SyntaxLibrary::bundled().load("java.json") else {
        return;
    };
    let highlighter = ConfigHighlighter::new(&config);

    for size in [100, 1000, 10000].iter() {
        let text = generate_source(*size);
        group.bench_with_input(BenchmarkId::new("java", size), &text, |b, text| {
            b.iter(|| black_box(highlighter.highlight(black_box(text))))
        });
    }

    group.finish();
}

/// Benchmarks the full pipeline: base, search, errors, flattened runs.
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let query = SearchQuery::new("label").whole_word(true);
    let errors: ErrorLineSet = (1..1000).step_by(7).collect();

    for size in [100, 1000].iter() {
        let text = generate_source(*size);
        group.bench_with_input(BenchmarkId::new("render_runs", size), &text, |b, text| {
            b.iter(|| {
                let base = tokenize(text);
                let styled = compose(&base, &query, &errors);
                black_box(styled.runs())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_config_highlight,
    bench_full_pipeline
);
criterion_main!(benches);
