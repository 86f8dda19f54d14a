//! Criterion benchmarks for rating normalization and aggregation

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use movieheat::services::{normalize, Aggregator};
use movieheat::sources::fields::record_from_json;
use movieheat::sources::sample_records;
use movieheat::types::{MovieRecord, RatingValue, Source};
use std::hint::black_box;

fn bench_normalize(c: &mut Criterion) {
    let values = [
        ("fraction", RatingValue::fraction(Source::Imdb, "8.5/10")),
        ("percentage", RatingValue::percentage(Source::Tomato, "92%")),
        ("grade", RatingValue::grade(Source::CinemaScore, "B+")),
        ("decimal", RatingValue::decimal(Source::Letterboxd, 4.21)),
        ("unavailable", RatingValue::fraction(Source::Metacritic, "N/A")),
    ];

    let mut group = c.benchmark_group("normalize");
    for (name, value) in &values {
        group.bench_with_input(BenchmarkId::from_parameter(name), value, |b, v| {
            b.iter(|| normalize(black_box(v)));
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let pairs: Vec<(Source, RatingValue)> = vec![
        (Source::Imdb, RatingValue::fraction(Source::Imdb, "8.5/10")),
        (Source::Tomato, RatingValue::percentage(Source::Tomato, "92%")),
        (Source::Popcorn, RatingValue::percentage(Source::Popcorn, "95%")),
        (Source::Metacritic, RatingValue::fraction(Source::Metacritic, "80/100")),
        (Source::Tmdb, RatingValue::fraction(Source::Tmdb, "8.2/10")),
        (Source::CinemaScore, RatingValue::grade(Source::CinemaScore, "A")),
        (Source::Letterboxd, RatingValue::decimal(Source::Letterboxd, 4.2)),
    ];

    c.bench_function("aggregate/seven_sources", |b| {
        b.iter(|| Aggregator::aggregate(black_box(&pairs)));
    });
}

fn bench_finalize_sample(c: &mut Criterion) {
    let records = match sample_records() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Skipping finalize_sample: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("finalize");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("sample_dataset", |b| {
        b.iter(|| {
            records
                .iter()
                .cloned()
                .map(MovieRecord::finalize)
                .collect::<Vec<_>>()
        });
    });
    group.finish();
}

fn bench_field_adapter(c: &mut Criterion) {
    let movie = serde_json::json!({
        "title": "Dune: Part Two",
        "year": 2024,
        "imdbRating": "8.5/10",
        "imdbVotes": "154,502",
        "tomatometer": "92%",
        "rt_audience": 95,
        "metacritic_score": 80,
        "letterboxd": 4.2
    });

    c.bench_function("fields/record_from_json", |b| {
        b.iter(|| record_from_json(black_box(&movie)));
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_aggregate,
    bench_finalize_sample,
    bench_field_adapter
);
criterion_main!(benches);
