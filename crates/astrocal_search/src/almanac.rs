//! Rise/set, meridian transit, and rise–set day-division events for a
//! fixed observation site.
//!
//! Rise and set are crossings of the altitude function through the
//! standard refraction horizon; transits are hour-angle crossings of 0
//! (upper) and 180° (lower). Between each rise and the following set the
//! original generator also marks fractional divisions of the up period.

use astrocal_ephem::{Body, Provider};
use chrono::{DateTime, Utc};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::{Metric, Site};
use crate::refine::{RefineConfig, refine_bracket};
use crate::scan::find_crossing_brackets;
use crate::support::{SearchSpan, title};

/// Standard refraction altitude for rise/set, degrees (34′ below the
/// geometric horizon).
const RISE_SET_ALTITUDE_DEG: f64 = -0.5667;

/// Altitude scan step, days: hourly sampling of a one-day oscillation.
const ALTITUDE_STEP_DAYS: f64 = 1.0 / 24.0;

/// Hour-angle scan step, days.
const TRANSIT_STEP_DAYS: f64 = 2.0 / 24.0;

/// Denominators of the rise–set fractional divisions.
const DIVISION_DENOMS: [u32; 3] = [3, 8, 19];

/// Almanac search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacConfig {
    pub bodies: Vec<Body>,
    pub site: Site,
    /// Human-readable site name for descriptions.
    pub location_name: String,
    /// Emit the fractional rise–set divisions.
    pub divisions: bool,
    pub refine: RefineConfig,
}

impl AlmanacConfig {
    pub fn new(bodies: Vec<Body>, site: Site, location_name: impl Into<String>) -> Self {
        Self {
            bodies,
            site,
            location_name: location_name.into(),
            divisions: true,
            refine: RefineConfig::default(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !(-90.0..=90.0).contains(&self.site.latitude_deg) {
            return Err("site latitude must be within [-90, 90]");
        }
        if !(-360.0..=360.0).contains(&self.site.longitude_deg) {
            return Err("site longitude must be within [-360, 360]");
        }
        self.refine.validate()
    }
}

/// Search rise/set/transit events for every configured body.
pub fn search_almanac(
    provider: &Provider,
    config: &AlmanacConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let mut events = Vec::new();
    for &body in &config.bodies {
        if body == Body::Earth {
            log::warn!("skipping earth: not observable from its own surface");
            continue;
        }
        rise_set_events(provider, config, span, body, &mut events);
        transit_events(provider, config, span, body, &mut events);
    }
    Ok(events)
}

fn rise_set_events(
    provider: &Provider,
    config: &AlmanacConfig,
    span: &SearchSpan,
    body: Body,
    events: &mut Vec<Event>,
) {
    let metric = Metric::Altitude {
        body,
        site: config.site,
    };
    let name = title(body.name());

    let brackets = find_crossing_brackets(
        provider,
        metric,
        RISE_SET_ALTITUDE_DEG,
        span.jd_start,
        span.jd_end,
        ALTITUDE_STEP_DAYS,
    );

    let mut last_rise: Option<DateTime<Utc>> = None;

    for bracket in brackets {
        let Some(t) =
            refine_bracket(provider, metric, RISE_SET_ALTITUDE_DEG, &bracket, &config.refine)
        else {
            continue;
        };
        if !span.contains_jd(t) {
            continue;
        }

        let rising = bracket.lo_dev < 0.0;
        let action = if rising { "Rise" } else { "Set" };
        let start = astrocal_time::jd_tt_to_utc(t);

        events.push(Event {
            kind: EventKind::Almanac,
            summary: format!("{name} {action}"),
            start_time: start,
            duration_minutes: 0,
            description: format!("{name} {action} at {}.", config.location_name),
            participants: vec![body.name().to_string()],
            calendar: format!("Astro: {name}"),
        });

        if rising {
            last_rise = Some(start);
        } else if let Some(rise) = last_rise.take() {
            if config.divisions && start > rise {
                division_events(config, body, rise, start, events);
            }
        }
    }
}

/// Fractional markers of the rise→set interval (1/3s, 1/8s, 1/19s).
fn division_events(
    config: &AlmanacConfig,
    body: Body,
    rise: DateTime<Utc>,
    set: DateTime<Utc>,
    events: &mut Vec<Event>,
) {
    let name = title(body.name());
    let total_seconds = (set - rise).num_seconds();

    for denom in DIVISION_DENOMS {
        for num in 1..denom {
            let offset = total_seconds * num as i64 / denom as i64;
            events.push(Event {
                kind: EventKind::Almanac,
                summary: format!("{name} {num}/{denom} (Rise-Set)"),
                start_time: rise + chrono::Duration::seconds(offset),
                duration_minutes: 0,
                description: format!("{name} {num}/{denom} of day (Rise to Set)."),
                participants: vec![body.name().to_string()],
                calendar: format!("Astro: {name} Divisions"),
            });
        }
    }
}

fn transit_events(
    provider: &Provider,
    config: &AlmanacConfig,
    span: &SearchSpan,
    body: Body,
    events: &mut Vec<Event>,
) {
    let metric = Metric::HourAngle {
        body,
        site: config.site,
    };
    let name = title(body.name());

    // Upper transit: hour angle through 0. Lower transit: through 180°.
    for (target, code, action) in [(0.0, "MC", "Midheaven (MC)"), (180.0, "IC", "Nadir (IC)")] {
        let brackets = find_crossing_brackets(
            provider,
            metric,
            target,
            span.jd_start,
            span.jd_end,
            TRANSIT_STEP_DAYS,
        );

        for bracket in brackets {
            let Some(t) = refine_bracket(provider, metric, target, &bracket, &config.refine)
            else {
                continue;
            };
            if !span.contains_jd(t) {
                continue;
            }
            events.push(Event {
                kind: EventKind::Almanac,
                summary: format!("{name} {code}"),
                start_time: astrocal_time::jd_tt_to_utc(t),
                duration_minutes: 0,
                description: format!("{name} {action} at {}.", config.location_name),
                participants: vec![body.name().to_string()],
                calendar: format!("Astro: {name}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn new_york() -> Site {
        Site {
            latitude_deg: 40.7128,
            longitude_deg: -74.006,
        }
    }

    #[test]
    fn config_rejects_bad_latitude() {
        let mut c = AlmanacConfig::new(vec![Body::Sun], new_york(), "New York");
        c.site.latitude_deg = 95.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn sun_rises_and_sets_daily() {
        let provider = Provider::new();
        let config = AlmanacConfig {
            divisions: false,
            ..AlmanacConfig::new(vec![Body::Sun], new_york(), "New York")
        };
        // Single year scan is slow in debug; one month is representative.
        let mut span = SearchSpan::years(2024, 2024);
        span.jd_end = span.jd_start + 31.0;
        let events = search_almanac(&provider, &config, &span).unwrap();

        let rises = events.iter().filter(|e| e.summary == "Sun Rise").count();
        let sets = events.iter().filter(|e| e.summary == "Sun Set").count();
        assert!((30..=32).contains(&rises), "{rises} rises in January");
        assert!((30..=32).contains(&sets), "{sets} sets in January");
    }

    #[test]
    fn equinox_sunrise_time_new_york() {
        // 2024-03-20: sunrise in New York ≈ 10:59 UTC.
        let provider = Provider::new();
        let config = AlmanacConfig {
            divisions: false,
            ..AlmanacConfig::new(vec![Body::Sun], new_york(), "New York")
        };
        let mut span = SearchSpan::years(2024, 2024);
        span.jd_start += 78.0; // ~Mar 19
        span.jd_end = span.jd_start + 3.0;
        let events = search_almanac(&provider, &config, &span).unwrap();

        use chrono::Datelike;
        let sunrise = events
            .iter()
            .find(|e| {
                e.summary == "Sun Rise" && e.start_time.month() == 3 && e.start_time.day() == 20
            })
            .expect("equinox sunrise missing");
        assert!(
            (10..=11).contains(&sunrise.start_time.hour()),
            "sunrise at {}",
            sunrise.start_time
        );
    }

    #[test]
    fn divisions_fall_between_rise_and_set() {
        let provider = Provider::new();
        let config = AlmanacConfig::new(vec![Body::Sun], new_york(), "New York");
        let mut span = SearchSpan::years(2024, 2024);
        span.jd_end = span.jd_start + 4.0;
        let events = search_almanac(&provider, &config, &span).unwrap();

        let rises: Vec<_> = events.iter().filter(|e| e.summary == "Sun Rise").collect();
        let halves: Vec<_> = events
            .iter()
            .filter(|e| e.summary.contains("4/8 (Rise-Set)"))
            .collect();
        assert!(!halves.is_empty());
        // A midpoint marker must sit later than some rise on the same day.
        assert!(halves[0].start_time > rises[0].start_time);
    }
}
