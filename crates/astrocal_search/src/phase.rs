//! Moon phase quarters.
//!
//! The phase index is the quadrant of the Moon−Sun elongation — a
//! discrete metric whose transitions are refined against the quadrant
//! boundary longitude difference. The raw instants are shared with the
//! eclipse search, which anchors on new and full moons.

use astrocal_ephem::{Body, Center, Provider};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::Metric;
use crate::refine::{RefineConfig, refine_bracket};
use crate::scan::{Bracket, find_state_changes};
use crate::support::SearchSpan;

/// Elongation quadrant width, degrees.
const QUARTER_WIDTH_DEG: f64 = 90.0;

/// Scan step, days: elongation advances ~12.2°/day.
const PHASE_STEP_DAYS: f64 = 0.25;

/// Quarter index: 0 new, 1 first quarter, 2 full, 3 last quarter.
pub const PHASE_NAMES: [&str; 4] = [
    "New Moon",
    "First Quarter Moon",
    "Full Moon",
    "Last Quarter Moon",
];

/// An exact phase instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseInstant {
    pub jd_tt: f64,
    /// 0 = new, 1 = first quarter, 2 = full, 3 = last quarter.
    pub quarter: u8,
}

/// Exact phase instants inside `[jd_start, jd_end]`.
pub fn phase_instants(
    provider: &Provider,
    jd_start: f64,
    jd_end: f64,
    refine: &RefineConfig,
) -> Result<Vec<PhaseInstant>, SearchError> {
    refine.validate().map_err(SearchError::InvalidConfig)?;

    let metric = Metric::LongitudeDifference {
        a: Body::Moon,
        b: Body::Sun,
        center: Center::Earth,
    };

    let changes = find_state_changes(
        provider,
        metric,
        QUARTER_WIDTH_DEG,
        jd_start,
        jd_end,
        PHASE_STEP_DAYS,
    );

    let mut instants = Vec::with_capacity(changes.len());
    for change in changes {
        let bracket = Bracket {
            lo_jd: change.lo_jd,
            hi_jd: change.hi_jd,
            lo_dev: 0.0,
            hi_dev: 0.0,
        };
        let Some(t) = refine_bracket(provider, metric, change.boundary_deg, &bracket, refine)
        else {
            continue;
        };
        instants.push(PhaseInstant {
            jd_tt: t,
            quarter: change.new_state.rem_euclid(4) as u8,
        });
    }

    Ok(instants)
}

/// Search for the four principal phases as events.
pub fn search_moon_phases(
    provider: &Provider,
    refine: &RefineConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    let instants = phase_instants(provider, span.jd_start, span.jd_end, refine)?;

    Ok(instants
        .into_iter()
        .filter(|p| span.contains_jd(p.jd_tt))
        .map(|p| {
            let name = PHASE_NAMES[p.quarter as usize];
            Event {
                kind: EventKind::MoonPhase,
                summary: name.to_string(),
                start_time: astrocal_time::jd_tt_to_utc(p.jd_tt),
                duration_minutes: 0,
                description: format!("{name}."),
                participants: vec![Body::Moon.name().to_string(), Body::Sun.name().to_string()],
                calendar: "Astro: Moon Phases".to_string(),
            }
        })
        .collect())
}
