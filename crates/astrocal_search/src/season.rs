//! Equinoxes and solstices.
//!
//! The apparent solar longitude quadrant is a discrete metric; each
//! transition is refined against the crossed multiple of 90°.

use astrocal_ephem::{Body, Center, Provider};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::Metric;
use crate::refine::{RefineConfig, refine_bracket};
use crate::scan::{Bracket, find_state_changes};
use crate::support::SearchSpan;

/// Quadrant width, degrees.
const QUADRANT_WIDTH_DEG: f64 = 90.0;

/// Scan step, days.
const SEASON_STEP_DAYS: f64 = 0.5;

/// Season names by new quadrant index (0 = Aries point).
const SEASON_NAMES: [&str; 4] = [
    "Vernal Equinox (Spring)",
    "Summer Solstice",
    "Autumnal Equinox (Fall)",
    "Winter Solstice",
];

/// An exact season instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonInstant {
    pub jd_tt: f64,
    /// 0 vernal equinox, 1 summer solstice, 2 autumnal, 3 winter.
    pub quadrant: u8,
}

/// Exact season instants inside `[jd_start, jd_end]`.
pub fn season_instants(
    provider: &Provider,
    jd_start: f64,
    jd_end: f64,
    refine: &RefineConfig,
) -> Result<Vec<SeasonInstant>, SearchError> {
    refine.validate().map_err(SearchError::InvalidConfig)?;

    let metric = Metric::Longitude {
        body: Body::Sun,
        center: Center::Earth,
    };

    let changes = find_state_changes(
        provider,
        metric,
        QUADRANT_WIDTH_DEG,
        jd_start,
        jd_end,
        SEASON_STEP_DAYS,
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
        instants.push(SeasonInstant {
            jd_tt: t,
            quadrant: change.new_state.rem_euclid(4) as u8,
        });
    }

    Ok(instants)
}

/// Search for the four seasonal markers as events.
pub fn search_seasons(
    provider: &Provider,
    refine: &RefineConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    let instants = season_instants(provider, span.jd_start, span.jd_end, refine)?;

    Ok(instants
        .into_iter()
        .filter(|s| span.contains_jd(s.jd_tt))
        .map(|s| {
            let name = SEASON_NAMES[s.quadrant as usize];
            Event {
                kind: EventKind::Season,
                summary: name.to_string(),
                start_time: astrocal_time::jd_tt_to_utc(s.jd_tt),
                duration_minutes: 0,
                description: format!("{name}. Exact moment."),
                participants: vec![Body::Sun.name().to_string()],
                calendar: "Astro: Seasons".to_string(),
            }
        })
        .collect())
}
