//! The public event record emitted by every search category.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Closed taxonomy of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Aspect,
    ZodiacIngress,
    Retrograde,
    MoonFeature,
    MoonPhase,
    SolarEclipse,
    LunarEclipse,
    Season,
    Almanac,
    YearProgress,
    Pattern,
}

/// One detected event.
///
/// `start_time` is the *entry* instant for window-bounded events (aspect
/// orb entry, eclipse first contact), not the exact/peak instant; point
/// events carry a zero duration. Downstream writers group by `calendar`
/// and can deduplicate on `(kind, participants, start_time)` without
/// re-deriving any astronomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub kind: EventKind,
    pub summary: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub description: String,
    pub participants: Vec<String>,
    pub calendar: String,
}

impl Event {
    /// End of the event window.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + chrono::Duration::minutes(self.duration_minutes)
    }
}

/// Sort a merged event list by start time, preserving the relative order
/// of simultaneous events.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|e| e.start_time);
}
