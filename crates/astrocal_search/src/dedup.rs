//! Suppression of near-coincident duplicate detections.
//!
//! Numerical noise around a crossing (and overlapping scan windows
//! between categories run with lookahead) can yield the same event
//! twice a short distance apart. This is a pure post-filter over a
//! time-sorted list: for events sharing an identity, later repeats
//! inside the per-kind minimum separation are dropped. Survivor order
//! is untouched and re-running the filter changes nothing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::event::{Event, EventKind};

/// Minimum separation between same-identity events, minutes.
///
/// The scales differ by orders of magnitude across kinds: rise/set-class
/// events repeat daily, stations repeat on month scales.
pub const fn min_separation_minutes(kind: EventKind) -> i64 {
    match kind {
        EventKind::Almanac => 10,
        EventKind::Aspect => 6 * 60,
        EventKind::ZodiacIngress => 6 * 60,
        EventKind::MoonPhase => 24 * 60,
        EventKind::MoonFeature => 5 * 24 * 60,
        EventKind::Retrograde => 10 * 24 * 60,
        EventKind::Season => 30 * 24 * 60,
        EventKind::SolarEclipse | EventKind::LunarEclipse => 10 * 24 * 60,
        EventKind::YearProgress => 60,
        EventKind::Pattern => 60,
    }
}

/// Drop repeats of `(kind, summary)` closer than the per-kind minimum to
/// the previously kept occurrence. Input must be sorted by start time.
pub fn dedup_events(events: Vec<Event>) -> Vec<Event> {
    let mut last_kept: HashMap<(EventKind, String), DateTime<Utc>> = HashMap::new();
    let mut out = Vec::with_capacity(events.len());

    for event in events {
        let key = (event.kind, event.summary.clone());
        let keep = match last_kept.get(&key) {
            Some(&prev) => {
                (event.start_time - prev).num_minutes() >= min_separation_minutes(event.kind)
            }
            None => true,
        };
        if keep {
            last_kept.insert(key, event.start_time);
            out.push(event);
        } else {
            log::debug!(
                "dropping duplicate {:?} '{}' at {}",
                event.kind,
                event.summary,
                event.start_time
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ev(kind: EventKind, summary: &str, minutes: i64) -> Event {
        Event {
            kind,
            summary: summary.into(),
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(minutes),
            duration_minutes: 0,
            description: String::new(),
            participants: vec![],
            calendar: "Astro: Test".into(),
        }
    }

    #[test]
    fn close_duplicate_suppressed() {
        let events = vec![
            ev(EventKind::Almanac, "Sun Rise", 0),
            ev(EventKind::Almanac, "Sun Rise", 3),
            ev(EventKind::Almanac, "Sun Rise", 24 * 60),
        ];
        let out = dedup_events(events);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].start_time.timestamp() % 86_400, 0);
    }

    #[test]
    fn different_identities_untouched() {
        let events = vec![
            ev(EventKind::Almanac, "Sun Rise", 0),
            ev(EventKind::Almanac, "Sun Set", 3),
            ev(EventKind::Aspect, "Sun Rise", 5),
        ];
        assert_eq!(dedup_events(events).len(), 3);
    }

    #[test]
    fn idempotent() {
        let events = vec![
            ev(EventKind::MoonFeature, "Moon North Node", 0),
            ev(EventKind::MoonFeature, "Moon North Node", 60),
            ev(EventKind::MoonFeature, "Moon North Node", 20 * 24 * 60),
            ev(EventKind::MoonFeature, "Moon South Node", 7 * 24 * 60),
        ];
        let once = dedup_events(events);
        let twice = dedup_events(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn order_preserved() {
        let events = vec![
            ev(EventKind::Season, "Summer Solstice", 0),
            ev(EventKind::Aspect, "Trine: Mars - Venus", 1),
            ev(EventKind::Season, "Winter Solstice", 2),
        ];
        let out = dedup_events(events);
        let summaries: Vec<_> = out.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(
            summaries,
            ["Summer Solstice", "Trine: Mars - Venus", "Winter Solstice"]
        );
    }

    #[test]
    fn retrograde_scale_threshold() {
        // Same station twice within ten days is noise; 40 days apart is real.
        let events = vec![
            ev(EventKind::Retrograde, "Mercury Retrograde", 0),
            ev(EventKind::Retrograde, "Mercury Retrograde", 5 * 24 * 60),
            ev(EventKind::Retrograde, "Mercury Retrograde", 45 * 24 * 60),
        ];
        assert_eq!(dedup_events(events).len(), 2);
    }
}
