//! Zodiac ingress: a body's ecliptic-of-date longitude crossing a
//! 30°-sign boundary.
//!
//! The sign index is an integer step function, so the scan watches for
//! state changes and the refiner bisects the underlying longitude
//! against the crossed boundary — never the integer itself.

use astrocal_ephem::{Body, Center, Provider};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::Metric;
use crate::refine::{RefineConfig, refine_bracket};
use crate::scan::{Bracket, find_state_changes};
use crate::support::{SearchSpan, title};

/// Tropical zodiac sign names, Aries first.
pub const ZODIAC_SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Width of one sign, degrees.
const SIGN_WIDTH_DEG: f64 = 30.0;

/// Ingress search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IngressConfig {
    pub bodies: Vec<Body>,
    pub refine: RefineConfig,
}

impl IngressConfig {
    /// All major bodies, the original generator's default list.
    pub fn all_bodies() -> Self {
        Self {
            bodies: vec![
                Body::Sun,
                Body::Moon,
                Body::Mercury,
                Body::Venus,
                Body::Mars,
                Body::Jupiter,
                Body::Saturn,
                Body::Uranus,
                Body::Neptune,
                Body::Pluto,
            ],
            refine: RefineConfig::default(),
        }
    }
}

/// Scan step per body: the Moon clears a sign in ~2.3 days.
fn scan_step_days(body: Body) -> f64 {
    if body == Body::Moon { 0.1 } else { 0.5 }
}

/// Search for every sign ingress of the configured bodies in the span.
pub fn search_ingresses(
    provider: &Provider,
    config: &IngressConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    config.refine.validate().map_err(SearchError::InvalidConfig)?;

    let mut events = Vec::new();

    for &body in &config.bodies {
        if body == Body::Earth {
            log::warn!("skipping earth: has no geocentric longitude");
            continue;
        }

        let metric = Metric::Longitude {
            body,
            center: Center::Earth,
        };

        let changes = find_state_changes(
            provider,
            metric,
            SIGN_WIDTH_DEG,
            span.jd_start,
            span.jd_end,
            scan_step_days(body),
        );

        for change in changes {
            let bracket = Bracket {
                lo_jd: change.lo_jd,
                hi_jd: change.hi_jd,
                lo_dev: 0.0,
                hi_dev: 0.0,
            };
            let Some(t_exact) =
                refine_bracket(provider, metric, change.boundary_deg, &bracket, &config.refine)
            else {
                continue;
            };
            if !span.contains_jd(t_exact) {
                continue;
            }

            let sign = ZODIAC_SIGNS[change.new_state.rem_euclid(12) as usize];
            let name = title(body.name());

            events.push(Event {
                kind: EventKind::ZodiacIngress,
                summary: format!("{name} enters {sign}"),
                start_time: astrocal_time::jd_tt_to_utc(t_exact),
                duration_minutes: 0,
                description: format!("{name} enters {sign} at 0°."),
                participants: vec![body.name().to_string()],
                calendar: format!("Astro: {name} Zodiac"),
            });
        }
    }

    Ok(events)
}
