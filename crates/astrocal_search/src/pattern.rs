//! Square–trine overlap patterns.
//!
//! Pure post-processing over the aspect events: a body simultaneously
//! inside a square window with one partner and a trine window with
//! another forms a pattern event spanning the overlap. No astronomy is
//! re-derived here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::event::{Event, EventKind};
use crate::support::title;

#[derive(Debug, Clone)]
struct AspectInterval {
    partner: String,
    is_square: bool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Derive square+trine overlap events from geocentric aspect events.
pub fn square_trine_patterns(aspect_events: &[Event]) -> Vec<Event> {
    // Index every square/trine window under both participants.
    let mut by_body: HashMap<String, Vec<AspectInterval>> = HashMap::new();

    for event in aspect_events {
        if event.kind != EventKind::Aspect || event.participants.len() != 2 {
            continue;
        }
        let is_square = event.summary.starts_with("Square");
        let is_trine = event.summary.starts_with("Trine");
        if !is_square && !is_trine {
            continue;
        }

        let (a, b) = (&event.participants[0], &event.participants[1]);
        for (body, partner) in [(a, b), (b, a)] {
            by_body.entry(body.clone()).or_default().push(AspectInterval {
                partner: partner.clone(),
                is_square,
                start: event.start_time,
                end: event.end_time(),
            });
        }
    }

    let mut patterns = Vec::new();

    for (body, intervals) in &by_body {
        let squares: Vec<_> = intervals.iter().filter(|i| i.is_square).collect();
        let trines: Vec<_> = intervals.iter().filter(|i| !i.is_square).collect();

        for sq in &squares {
            for tr in &trines {
                let start = sq.start.max(tr.start);
                let end = sq.end.min(tr.end);
                if start >= end {
                    continue;
                }
                let duration = (end - start).num_minutes();
                let (name, p_sq, p_tr) =
                    (title(body), title(&sq.partner), title(&tr.partner));

                patterns.push(Event {
                    kind: EventKind::Pattern,
                    summary: format!("{name}: Sq {p_sq} & Tri {p_tr}"),
                    start_time: start,
                    duration_minutes: duration,
                    description: format!(
                        "{name} is simultaneously Square {p_sq} and Trine {p_tr}. \
                         Overlap Duration: {duration} mins."
                    ),
                    participants: vec![
                        body.clone(),
                        sq.partner.clone(),
                        tr.partner.clone(),
                    ],
                    calendar: "Astro: Square and Trine".to_string(),
                });
            }
        }
    }

    patterns.sort_by_key(|e| e.start_time);
    patterns
}
