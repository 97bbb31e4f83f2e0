//! Golden-value aspect scenarios against well-documented 2024 geometry.

use chrono::{Datelike, TimeZone, Utc};

use astrocal_ephem::{Body, Provider};
use astrocal_search::{Aspect, AspectConfig, EventKind, SearchSpan, search_aspects};

/// Jupiter–Uranus conjunction of 2024-04-20/21: exactly one conjunction
/// event whose orb window overlaps April 20.
#[test]
fn jupiter_uranus_conjunction_2024() {
    let provider = Provider::new();
    let config = AspectConfig {
        aspects: vec![Aspect::Conjunction],
        ..AspectConfig::geocentric(vec![Body::Jupiter, Body::Uranus])
    };
    let span = SearchSpan::years(2024, 2024);

    let events = search_aspects(&provider, &config, &span).unwrap();
    assert_eq!(events.len(), 1, "expected one conjunction, got {events:#?}");

    let event = &events[0];
    assert_eq!(event.kind, EventKind::Aspect);
    assert!(event.summary.contains("Conjunction"), "{}", event.summary);

    let mut participants = event.participants.clone();
    participants.sort();
    assert_eq!(participants, vec!["jupiter", "uranus"]);

    let apr20 = Utc.with_ymd_and_hms(2024, 4, 20, 12, 0, 0).unwrap();
    assert!(
        event.start_time <= apr20 && event.end_time() >= apr20,
        "window {} .. {} misses Apr 20",
        event.start_time,
        event.end_time()
    );
    // A 1° orb on this slow pair spans days, not minutes.
    assert!(event.duration_minutes > 24 * 60, "{}", event.duration_minutes);
}

/// Requesting aspects among a single body yields nothing.
#[test]
fn self_pair_yields_no_events() {
    let provider = Provider::new();
    let config = AspectConfig::geocentric(vec![Body::Sun]);
    let span = SearchSpan::years(2024, 2024);
    assert!(search_aspects(&provider, &config, &span).unwrap().is_empty());
}

/// Venus–Mars conjunction of 2024-02-22: detected with both bodies named.
#[test]
fn venus_mars_conjunction_feb_2024() {
    let provider = Provider::new();
    let config = AspectConfig {
        aspects: vec![Aspect::Conjunction],
        ..AspectConfig::geocentric(vec![Body::Venus, Body::Mars])
    };
    let span = SearchSpan::years(2024, 2024);

    let events = search_aspects(&provider, &config, &span).unwrap();
    let feb = events
        .iter()
        .find(|e| e.start_time.month() == 2 || e.end_time().month() == 2);
    let event = feb.expect("February Venus-Mars conjunction missing");
    assert!(event.participants.contains(&"venus".to_string()));
    assert!(event.participants.contains(&"mars".to_string()));
}

/// Events never start before the queried interval even when the orb
/// window reaches back across the year boundary.
#[test]
fn window_clamped_to_span() {
    let provider = Provider::new();
    let config = AspectConfig::geocentric(vec![Body::Jupiter, Body::Uranus, Body::Saturn]);
    let span = SearchSpan::years(2024, 2024);

    let events = search_aspects(&provider, &config, &span).unwrap();
    let start = span.start_utc();
    let end = span.end_utc();
    for event in &events {
        assert!(
            event.start_time >= start && event.start_time < end,
            "{} starts outside span at {}",
            event.summary,
            event.start_time
        );
    }
}

/// Heliocentric sweep labels its events and keeps participants intact.
#[test]
fn heliocentric_aspects_labelled() {
    let provider = Provider::new();
    let config = AspectConfig {
        aspects: vec![Aspect::Conjunction, Aspect::Opposition],
        ..AspectConfig::heliocentric(vec![Body::Venus, Body::Mars])
    };
    let span = SearchSpan::years(2024, 2024);

    let events = search_aspects(&provider, &config, &span).unwrap();
    assert!(!events.is_empty(), "helio Venus-Mars alignments expected");
    for event in &events {
        assert!(event.summary.ends_with("(Helio)"), "{}", event.summary);
        assert!(event.description.starts_with("(Heliocentric)"));
        assert_eq!(event.calendar, "Astro: Aspects Helio");
    }
}
