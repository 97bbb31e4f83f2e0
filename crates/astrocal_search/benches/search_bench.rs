//! Benchmarks for the search engine hot paths.

use criterion::{Criterion, criterion_group, criterion_main};

use astrocal_ephem::{Body, Center, Provider};
use astrocal_search::{
    Metric, RefineConfig, SearchSpan, find_crossing_brackets, phase_instants, refine_bracket,
    search_seasons,
};

fn bench_coarse_scan(c: &mut Criterion) {
    let provider = Provider::new();
    let span = SearchSpan::years(2024, 2024);
    let metric = Metric::LongitudeDifference {
        a: Body::Jupiter,
        b: Body::Uranus,
        center: Center::Earth,
    };

    c.bench_function("coarse_scan_year_pair", |b| {
        b.iter(|| {
            find_crossing_brackets(
                &provider,
                metric,
                0.0,
                std::hint::black_box(span.jd_start),
                span.jd_end,
                1.0,
            )
        })
    });
}

fn bench_refinement(c: &mut Criterion) {
    let provider = Provider::new();
    let span = SearchSpan::years(2024, 2024);
    let metric = Metric::LongitudeDifference {
        a: Body::Jupiter,
        b: Body::Uranus,
        center: Center::Earth,
    };
    let brackets = find_crossing_brackets(&provider, metric, 0.0, span.jd_start, span.jd_end, 1.0);
    let bracket = brackets[0];
    let config = RefineConfig::default();

    c.bench_function("bisect_conjunction", |b| {
        b.iter(|| refine_bracket(&provider, metric, 0.0, std::hint::black_box(&bracket), &config))
    });
}

fn bench_phase_instants(c: &mut Criterion) {
    let provider = Provider::new();
    let span = SearchSpan::years(2024, 2024);
    let config = RefineConfig::default();

    c.bench_function("phase_instants_year", |b| {
        b.iter(|| phase_instants(&provider, span.jd_start, span.jd_end, &config).unwrap())
    });
}

fn bench_season_search(c: &mut Criterion) {
    let provider = Provider::new();
    let span = SearchSpan::years(2024, 2024);
    let config = RefineConfig::default();

    c.bench_function("season_search_year", |b| {
        b.iter(|| search_seasons(&provider, &config, &span).unwrap())
    });
}

criterion_group!(
    benches,
    bench_coarse_scan,
    bench_refinement,
    bench_phase_instants,
    bench_season_search
);
criterion_main!(benches);
