//! End-to-end runner scenarios: fan-out, merge, dedup, span clipping.

use chrono::Datelike;

use astrocal_ephem::Provider;
use astrocal_search::{Category, EventKind, RunConfig, dedup_events, run};

fn report_2024(categories: Vec<Category>) -> astrocal_search::RunReport {
    let provider = Provider::new();
    let config = RunConfig {
        categories,
        ..RunConfig::for_years(2024, 2024)
    };
    run(&provider, &config).unwrap()
}

#[test]
fn mixed_run_is_clean_sorted_and_stable_under_dedup() {
    let report = report_2024(vec![
        Category::Eclipses,
        Category::Seasons,
        Category::MoonPhases,
        Category::YearProgress,
    ]);

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert!(!report.events.is_empty());

    for pair in report.events.windows(2) {
        assert!(pair[0].start_time <= pair[1].start_time);
    }

    // The merged list is already deduplicated: a second pass is identity.
    let again = dedup_events(report.events.clone());
    assert_eq!(again, report.events);

    // Every event starts inside the queried year.
    for event in &report.events {
        assert_eq!(event.start_time.year(), 2024, "{}", event.summary);
    }
}

#[test]
fn eclipses_anchor_on_their_phases() {
    let report = report_2024(vec![Category::Eclipses, Category::MoonPhases]);

    let solar: Vec<_> = report
        .events
        .iter()
        .filter(|e| e.kind == EventKind::SolarEclipse)
        .collect();
    assert!(!solar.is_empty(), "no solar eclipses in 2024");

    // Each solar eclipse sits within a day of a new moon.
    let new_moons: Vec<_> = report
        .events
        .iter()
        .filter(|e| e.summary == "New Moon")
        .collect();
    for eclipse in &solar {
        let near = new_moons.iter().any(|nm| {
            (nm.start_time - eclipse.start_time).num_hours().abs() < 36
        });
        assert!(near, "eclipse at {} far from any new moon", eclipse.start_time);
    }
}

#[test]
fn seasons_and_progress_agree_on_the_equinox() {
    let report = report_2024(vec![Category::Seasons, Category::YearProgress]);

    let vernal = report
        .events
        .iter()
        .find(|e| e.summary.contains("Vernal"))
        .expect("vernal equinox missing");

    // Solar-year markers begin at the equinox; the first 1/16 marker of
    // the solar year falls ~22.9 days later.
    let first_fraction = report
        .events
        .iter()
        .filter(|e| e.summary.starts_with("Solar Year: 1/16"))
        .min_by_key(|e| e.start_time)
        .expect("solar year fractions missing");
    let gap = (first_fraction.start_time - vernal.start_time).num_days();
    assert!((21..=25).contains(&gap), "first marker {gap} days after equinox");
}

#[test]
fn disabled_categories_produce_nothing() {
    let report = report_2024(vec![Category::Seasons]);
    assert!(report.events.iter().all(|e| e.kind == EventKind::Season));
    assert_eq!(report.events.len(), 4);
}
