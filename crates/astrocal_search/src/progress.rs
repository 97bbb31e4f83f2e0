//! Year-progress markers: sixteenth fractions and perfect-square day
//! indices of the calendar year and of the solar year (vernal equinox to
//! vernal equinox).
//!
//! Pure calendar arithmetic except for the solar-year anchors, which
//! come from the season search with one year of lookahead.

use astrocal_ephem::Provider;
use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::refine::RefineConfig;
use crate::season::season_instants;
use crate::support::SearchSpan;

/// Markers between `start` and `end` labelled against `year`.
fn progress_events(
    year: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    calendar: &str,
    prefix: &str,
) -> Vec<Event> {
    let mut events = Vec::new();
    let total_seconds = (end - start).num_seconds();
    if total_seconds <= 0 {
        return events;
    }

    // Sixteenth fractions.
    for k in 1..16u32 {
        let percent = k as f64 / 16.0 * 100.0;
        let offset = total_seconds * k as i64 / 16;
        events.push(Event {
            kind: EventKind::YearProgress,
            summary: format!("{prefix}: {k}/16 ({percent:.1}%)"),
            start_time: start + chrono::Duration::seconds(offset),
            duration_minutes: 0,
            description: format!("Year {year} ({prefix}) is {percent:.1}% complete."),
            participants: vec![],
            calendar: calendar.to_string(),
        });
    }

    // Perfect-square day indices: day 1, 4, 9, ... of the period.
    let days_in_period = (end - start).num_days();
    let mut n: i64 = 1;
    loop {
        let sq = n * n;
        if sq > days_in_period + 1 {
            break;
        }
        let event_time = start + chrono::Duration::days(sq - 1);
        if event_time >= end {
            break;
        }
        events.push(Event {
            kind: EventKind::YearProgress,
            summary: format!("{prefix} Day {sq} ({n}^2)"),
            start_time: event_time,
            duration_minutes: 0,
            description: format!("Day {sq} of {prefix} {year} (Square of {n})."),
            participants: vec![],
            calendar: calendar.to_string(),
        });
        n += 1;
    }

    events
}

/// Markers for each calendar year in the span.
pub fn calendar_year_events(span: &SearchSpan) -> Vec<Event> {
    let mut events = Vec::new();
    for year in span.year_start..=span.year_end {
        let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).unwrap();
        events.extend(progress_events(
            year,
            start,
            end,
            "Astro: Calendar Year Progress",
            "Calendar Year",
        ));
    }
    events
}

/// Markers for each solar year starting in the span.
///
/// Needs the vernal equinox after the span's end, hence the extra year
/// of season lookahead; the markers themselves stay bounded by their
/// opening equinox year.
pub fn solar_year_events(
    provider: &Provider,
    refine: &RefineConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    let lookahead = SearchSpan::years(span.year_start, span.year_end + 1);
    let instants = season_instants(provider, lookahead.jd_start, lookahead.jd_end, refine)?;

    let vernals: Vec<DateTime<Utc>> = instants
        .iter()
        .filter(|s| s.quadrant == 0)
        .map(|s| astrocal_time::jd_tt_to_utc(s.jd_tt))
        .collect();

    let mut events = Vec::new();
    for pair in vernals.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let year = start.year();
        if year >= span.year_start && year <= span.year_end {
            events.extend(progress_events(
                year,
                start,
                end,
                "Astro: Solar Year Progress",
                "Solar Year",
            ));
        }
    }
    // A solar year spills past Dec 31; markers beyond the queried span
    // must not leak out of it.
    let (span_start, span_end) = (span.start_utc(), span.end_utc());
    events.retain(|e| e.start_time >= span_start && e.start_time < span_end);
    Ok(events)
}
