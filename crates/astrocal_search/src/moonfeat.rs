//! Lunar nodes and declination standstills.
//!
//! Nodes are sign changes of the Moon's ecliptic latitude. Standstills
//! are sign changes of the declination *rate*; note the label mapping is
//! the inverse of the naive reading — when the rate turns positive the
//! Moon has just passed its southernmost declination.

use astrocal_ephem::{Body, Provider};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::Metric;
use crate::refine::{RefineConfig, refine_bracket};
use crate::scan::find_crossing_brackets;
use crate::support::SearchSpan;

/// Scan step, days. The Moon's latitude and declination cycles run about
/// 27 days, so half-day sampling brackets every crossing.
const MOON_STEP_DAYS: f64 = 0.5;

/// Successive declination extremes sit ~13.7 days apart; rate-noise near
/// a zero crossing can flip the sign repeatedly within hours. Crossings
/// closer than this to the previous kept one are noise.
const EXTREME_MIN_GAP_DAYS: f64 = 5.0;

/// Moon feature search configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonFeatureConfig {
    pub refine: RefineConfig,
}

impl Default for MoonFeatureConfig {
    fn default() -> Self {
        Self {
            refine: RefineConfig::default(),
        }
    }
}

/// Search for lunar nodes and standstills within the span.
pub fn search_moon_features(
    provider: &Provider,
    config: &MoonFeatureConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    config.refine.validate().map_err(SearchError::InvalidConfig)?;

    let mut events = Vec::new();
    search_nodes(provider, config, span, &mut events);
    search_standstills(provider, config, span, &mut events);
    Ok(events)
}

fn search_nodes(
    provider: &Provider,
    config: &MoonFeatureConfig,
    span: &SearchSpan,
    events: &mut Vec<Event>,
) {
    let metric = Metric::EclipticLatitude { body: Body::Moon };
    let brackets = find_crossing_brackets(
        provider,
        metric,
        0.0,
        span.jd_start,
        span.jd_end,
        MOON_STEP_DAYS,
    );

    for bracket in brackets {
        let Some(t) = refine_bracket(provider, metric, 0.0, &bracket, &config.refine) else {
            continue;
        };
        if !span.contains_jd(t) {
            continue;
        }

        // Latitude rising through zero = ascending node.
        let (summary, description) = if bracket.lo_dev < 0.0 {
            (
                "Moon North Node",
                "Moon crosses ecliptic to the North (Ascending Node).",
            )
        } else {
            (
                "Moon South Node",
                "Moon crosses ecliptic to the South (Descending Node).",
            )
        };

        events.push(Event {
            kind: EventKind::MoonFeature,
            summary: summary.to_string(),
            start_time: astrocal_time::jd_tt_to_utc(t),
            duration_minutes: 0,
            description: description.to_string(),
            participants: vec![Body::Moon.name().to_string()],
            calendar: "Astro: Moon Features".to_string(),
        });
    }
}

fn search_standstills(
    provider: &Provider,
    config: &MoonFeatureConfig,
    span: &SearchSpan,
    events: &mut Vec<Event>,
) {
    let metric = Metric::DeclinationRate { body: Body::Moon };
    let brackets = find_crossing_brackets(
        provider,
        metric,
        0.0,
        span.jd_start,
        span.jd_end,
        MOON_STEP_DAYS,
    );

    let mut last_kept: Option<f64> = None;
    for bracket in brackets {
        let Some(t) = refine_bracket(provider, metric, 0.0, &bracket, &config.refine) else {
            continue;
        };
        if let Some(prev) = last_kept
            && t - prev < EXTREME_MIN_GAP_DAYS
        {
            continue;
        }
        last_kept = Some(t);
        if !span.contains_jd(t) {
            continue;
        }

        // Rate turning positive means the minimum was just passed: the
        // southern extreme. Turning negative marks the northern one.
        let (summary, description) = if bracket.lo_dev < 0.0 {
            (
                "Moon Furthest South",
                "Lunar Southern Standstill (Max South Declination).",
            )
        } else {
            (
                "Moon Furthest North",
                "Lunar Northern Standstill (Max North Declination).",
            )
        };

        events.push(Event {
            kind: EventKind::MoonFeature,
            summary: summary.to_string(),
            start_time: astrocal_time::jd_tt_to_utc(t),
            duration_minutes: 0,
            description: description.to_string(),
            participants: vec![Body::Moon.name().to_string()],
            calendar: "Astro: Moon Features".to_string(),
        });
    }
}
