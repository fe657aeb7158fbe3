//! Benchmarks for the Tally metrics and report path.
//!
//! Run with: cargo bench -p tally-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::DynamicImage;
use tally_core::pipeline::{preprocess, PreprocessParams};
use tally_core::{ChartRenderer, ConfusionMatrix};

const CLASSES: usize = 100;

/// Deterministic truth/prediction pairs, roughly 80% on the diagonal.
fn labelled_pairs(n: usize) -> (Vec<usize>, Vec<usize>) {
    let truths: Vec<usize> = (0..n).map(|i| i % CLASSES).collect();
    let predictions = truths
        .iter()
        .enumerate()
        .map(|(i, &t)| if i % 5 == 0 { (t + 1) % CLASSES } else { t })
        .collect();
    (truths, predictions)
}

fn benchmark_confusion_matrix(c: &mut Criterion) {
    let (truths, predictions) = labelled_pairs(50 * CLASSES);

    c.bench_function("confusion_matrix_100_classes", |b| {
        b.iter(|| {
            let _ = ConfusionMatrix::from_labels(
                black_box(&truths),
                black_box(&predictions),
                CLASSES,
            );
        })
    });
}

fn benchmark_sensitivity_precision(c: &mut Criterion) {
    let (truths, predictions) = labelled_pairs(50 * CLASSES);
    let cm = ConfusionMatrix::from_labels(&truths, &predictions, CLASSES).unwrap();

    c.bench_function("sensitivity_100_classes", |b| {
        b.iter(|| black_box(&cm).sensitivity())
    });
    c.bench_function("precision_100_classes", |b| {
        b.iter(|| black_box(&cm).precision())
    });
}

fn benchmark_render_confusion(c: &mut Criterion) {
    let (truths, predictions) = labelled_pairs(50 * 10);
    let cm = ConfusionMatrix::from_labels(&truths, &predictions, 10).unwrap();
    let names: Vec<String> = (0..10).map(|i| format!("class_{i}")).collect();
    let renderer = ChartRenderer::new(640, 480);

    c.bench_function("render_confusion_10_classes", |b| {
        b.iter(|| {
            let _ = renderer.render_confusion(black_box(&cm), &names);
        })
    });
}

fn benchmark_preprocess(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(1024, 768);
    let params = PreprocessParams::new(299, 299, 3, 128.0, 128.0).unwrap();

    c.bench_function("preprocess_299", |b| {
        b.iter(|| preprocess(black_box(&img), &params))
    });
}

criterion_group!(
    benches,
    benchmark_confusion_matrix,
    benchmark_sensitivity_precision,
    benchmark_render_confusion,
    benchmark_preprocess,
);
criterion_main!(benches);
