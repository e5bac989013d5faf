//! Criterion benchmarks for the Bhava feature pipeline.
//!
//! Covers vectorizer fitting and transformation, and SVM training on the
//! resulting features.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use bhava::analysis::analyzer::AnalyzerConfig;
use bhava::ml::classifier::{Classifier, ClassifierKind};
use bhava::ml::vectorizer::CombinedVectorizer;

/// Generate synthetic reviews for benchmarking.
fn generate_reviews(count: usize) -> (Vec<String>, Vec<String>) {
    let positive = ["बहुत", "अच्छा", "शानदार", "बढ़िया", "पसंद", "उत्तम"];
    let negative = ["बुरा", "खराब", "बेकार", "घटिया", "नापसंद", "टूटा"];
    let neutral = ["उत्पाद", "सेवा", "डिलीवरी", "कीमत", "है", "था", "यह"];

    let mut texts = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    for i in 0..count {
        let (words, label) = if i % 2 == 0 {
            (&positive, "pos")
        } else {
            (&negative, "neg")
        };
        let length = 4 + (i % 8);
        let review: Vec<&str> = (0..length)
            .map(|j| {
                if j % 2 == 0 {
                    words[(i + j) % words.len()]
                } else {
                    neutral[(i * 3 + j) % neutral.len()]
                }
            })
            .collect();
        texts.push(review.join(" "));
        labels.push(label.to_string());
    }
    (texts, labels)
}

fn bench_vectorizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorizer");
    let (texts, _) = generate_reviews(500);

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("fit_word_and_char", |b| {
        b.iter(|| {
            let vectorizer = CombinedVectorizer::fit(
                black_box(&texts),
                AnalyzerConfig::word(),
                AnalyzerConfig::char(),
            )
            .unwrap();
            black_box(vectorizer.dimension())
        })
    });

    let vectorizer =
        CombinedVectorizer::fit(&texts, AnalyzerConfig::word(), AnalyzerConfig::char()).unwrap();
    group.bench_function("transform_batch", |b| {
        b.iter(|| black_box(vectorizer.transform(black_box(&texts)).unwrap()))
    });

    group.finish();
}

fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");
    group.sample_size(20);

    let (texts, labels) = generate_reviews(300);
    let vectorizer =
        CombinedVectorizer::fit(&texts, AnalyzerConfig::word(), AnalyzerConfig::char()).unwrap();
    let features = vectorizer.transform(&texts).unwrap();
    let kind = ClassifierKind::from_name("svm").unwrap();

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("svm_fit", |b| {
        b.iter(|| black_box(Classifier::fit(&kind, &features, &labels).unwrap()))
    });

    let classifier = Classifier::fit(&kind, &features, &labels).unwrap();
    group.bench_function("svm_predict", |b| {
        b.iter(|| black_box(classifier.predict(&features).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_vectorizer, bench_classifier);
criterion_main!(benches);
