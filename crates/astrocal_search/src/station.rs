//! Retrograde stations and shadow exits.
//!
//! A station is a sign change of the apparent longitude rate. After a
//! direct station the body is paired with its preceding retrograde
//! station, and the shadow exit is the first directional return to the
//! longitude where the retrograde loop began.

use astrocal_ephem::{Body, Center, PositionModel, Provider};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::{Metric, Wrap};
use crate::refine::{RefineConfig, refine_bracket};
use crate::scan::find_crossing_brackets;
use crate::support::{SearchSpan, title};
use crate::window::forward_crossing;

/// Lookback before the span so a direct station early in the range can
/// still find its retrograde partner (outer planets retrograde ~5 months).
const STATION_LOOKBACK_DAYS: f64 = 200.0;

/// Maximum shadow-exit search distance after a direct station.
const SHADOW_MAX_DAYS: f64 = 365.0;

/// Shadow-exit coarse step, days.
const SHADOW_STEP_DAYS: f64 = 2.0;

/// Station search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StationConfig {
    pub bodies: Vec<Body>,
    /// Coarse scan step for the rate sign change, days.
    pub scan_step_days: f64,
    pub refine: RefineConfig,
}

impl StationConfig {
    /// The original generator's planet list.
    pub fn all_planets() -> Self {
        Self {
            bodies: vec![
                Body::Mercury,
                Body::Venus,
                Body::Mars,
                Body::Jupiter,
                Body::Saturn,
                Body::Uranus,
                Body::Neptune,
                Body::Pluto,
            ],
            scan_step_days: 1.0,
            refine: RefineConfig::default(),
        }
    }
}

/// Sun and Moon never move retrograde geocentrically; Earth has no
/// geocentric motion at all.
fn can_station(body: Body) -> bool {
    !matches!(body, Body::Sun | Body::Moon | Body::Earth)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StationKind {
    Retrograde,
    Direct,
}

/// Transient marker pairing a station with its shadow search.
#[derive(Debug, Clone, Copy)]
struct StationMarker {
    jd: f64,
    kind: StationKind,
    longitude_deg: f64,
}

/// Search for stations and shadow exits within the span.
pub fn search_stations(
    provider: &Provider,
    config: &StationConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    config.refine.validate().map_err(SearchError::InvalidConfig)?;
    if !config.scan_step_days.is_finite() || config.scan_step_days <= 0.0 {
        return Err(SearchError::InvalidConfig("scan_step_days must be positive"));
    }

    let mut events = Vec::new();

    for &body in &config.bodies {
        if !can_station(body) {
            log::warn!("skipping {body}: no retrograde motion");
            continue;
        }
        search_body(provider, config, span, body, &mut events);
    }

    Ok(events)
}

fn search_body(
    provider: &Provider,
    config: &StationConfig,
    span: &SearchSpan,
    body: Body,
    events: &mut Vec<Event>,
) {
    let rate = Metric::LongitudeRate { body };
    let lon = Metric::Longitude {
        body,
        center: Center::Earth,
    };

    let brackets = find_crossing_brackets(
        provider,
        rate,
        0.0,
        span.jd_start - STATION_LOOKBACK_DAYS,
        span.jd_end,
        config.scan_step_days,
    );

    let mut stations: Vec<StationMarker> = Vec::new();
    for bracket in brackets {
        let Some(t_station) = refine_bracket(provider, rate, 0.0, &bracket, &config.refine) else {
            continue;
        };
        let Ok(pos) = provider.ecliptic(body, Center::Earth, t_station, PositionModel::Apparent)
        else {
            continue;
        };
        let kind = if bracket.lo_dev > 0.0 {
            StationKind::Retrograde
        } else {
            StationKind::Direct
        };
        stations.push(StationMarker {
            jd: t_station,
            kind,
            longitude_deg: pos.lon_deg,
        });
    }

    let name = title(body.name());

    for (i, station) in stations.iter().enumerate() {
        if span.contains_jd(station.jd) {
            let (label, code) = match station.kind {
                StationKind::Retrograde => ("Retrograde", "R"),
                StationKind::Direct => ("Direct", "D"),
            };
            events.push(Event {
                kind: EventKind::Retrograde,
                summary: format!("{name} {label}"),
                start_time: astrocal_time::jd_tt_to_utc(station.jd),
                duration_minutes: 0,
                description: format!(
                    "{name} stations {code} at {:.2} deg.",
                    station.longitude_deg
                ),
                participants: vec![body.name().to_string()],
                calendar: format!("Astro: {name}"),
            });
        }

        // A direct station closes a loop; hunt for the shadow exit.
        if station.kind == StationKind::Direct
            && i > 0
            && stations[i - 1].kind == StationKind::Retrograde
        {
            let target = stations[i - 1].longitude_deg;
            let f = |jd: f64| {
                lon.eval(provider, jd, PositionModel::Apparent)
            };
            let Some(exit_jd) = forward_crossing(
                &f,
                target,
                Wrap::Degrees360,
                station.jd,
                SHADOW_STEP_DAYS,
                SHADOW_MAX_DAYS,
                &config.refine,
            ) else {
                continue;
            };
            if span.contains_jd(exit_jd) {
                events.push(Event {
                    kind: EventKind::Retrograde,
                    summary: format!("{name} Shadow Exit"),
                    start_time: astrocal_time::jd_tt_to_utc(exit_jd),
                    duration_minutes: 0,
                    description: format!(
                        "{name} exits retrograde shadow at {target:.2} deg."
                    ),
                    participants: vec![body.name().to_string()],
                    calendar: format!("Astro: {name}"),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_moon_earth_cannot_station() {
        assert!(!can_station(Body::Sun));
        assert!(!can_station(Body::Moon));
        assert!(!can_station(Body::Earth));
        assert!(can_station(Body::Mercury));
        assert!(can_station(Body::Pluto));
    }

    #[test]
    fn luminaries_are_skipped_not_fatal() {
        let provider = Provider::new();
        let config = StationConfig {
            bodies: vec![Body::Sun, Body::Moon],
            scan_step_days: 1.0,
            refine: RefineConfig::default(),
        };
        let span = SearchSpan::years(2024, 2024);
        let events = search_stations(&provider, &config, &span).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn invalid_step_rejected() {
        let provider = Provider::new();
        let config = StationConfig {
            bodies: vec![Body::Mercury],
            scan_step_days: 0.0,
            refine: RefineConfig::default(),
        };
        let span = SearchSpan::years(2024, 2024);
        assert!(matches!(
            search_stations(&provider, &config, &span),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn mercury_stations_alternate_in_2024() {
        let provider = Provider::new();
        let config = StationConfig {
            bodies: vec![Body::Mercury],
            scan_step_days: 1.0,
            refine: RefineConfig::default(),
        };
        let span = SearchSpan::years(2024, 2024);
        let events = search_stations(&provider, &config, &span).unwrap();

        let stations: Vec<_> = events
            .iter()
            .filter(|e| !e.summary.contains("Shadow"))
            .collect();
        // Mercury stations six times a year (three loops).
        assert!(
            (5..=7).contains(&stations.len()),
            "got {} stations",
            stations.len()
        );
        for pair in stations.windows(2) {
            assert_ne!(
                pair[0].summary, pair[1].summary,
                "stations must alternate R/D"
            );
        }
    }
}
