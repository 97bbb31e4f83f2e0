//! Aspect search: two bodies reaching an exact target longitude
//! separation, with orb entry/exit windows.
//!
//! Coarse scan on the geometric tier brackets each crossing of the
//! separation function, bisection on the apparent tier pins the exact
//! time, and the window finder turns the orb into an event duration.

use astrocal_ephem::{Body, Center, Provider};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::Metric;
use crate::refine::{RefineConfig, refine_bracket};
use crate::support::{SearchSpan, title};
use crate::window::{WindowConfig, find_orb_window};

/// The tracked aspect angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aspect {
    Conjunction,
    Sextile,
    Quintile,
    Square,
    Trine,
    Biquintile,
    Opposition,
}

impl Aspect {
    pub const ALL: [Aspect; 7] = [
        Aspect::Conjunction,
        Aspect::Sextile,
        Aspect::Quintile,
        Aspect::Square,
        Aspect::Trine,
        Aspect::Biquintile,
        Aspect::Opposition,
    ];

    /// Target separation in degrees.
    pub const fn angle_deg(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Quintile => 72.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Biquintile => 144.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "Conjunction",
            Self::Sextile => "Sextile",
            Self::Quintile => "Quintile",
            Self::Square => "Square",
            Self::Trine => "Trine",
            Self::Biquintile => "Biquintile",
            Self::Opposition => "Opposition",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "conjunction" => Some(Self::Conjunction),
            "sextile" => Some(Self::Sextile),
            "quintile" => Some(Self::Quintile),
            "square" => Some(Self::Square),
            "trine" => Some(Self::Trine),
            "biquintile" => Some(Self::Biquintile),
            "opposition" => Some(Self::Opposition),
            _ => None,
        }
    }

    /// The separation values to search: an aspect is direction-agnostic,
    /// so every angle but 0°/180° is matched on both sides of the circle.
    fn targets(self) -> Vec<f64> {
        let a = self.angle_deg();
        if a == 0.0 || a == 180.0 {
            vec![a]
        } else {
            vec![a, 360.0 - a]
        }
    }
}

/// Aspect search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectConfig {
    pub bodies: Vec<Body>,
    pub aspects: Vec<Aspect>,
    /// Tolerance band in degrees defining the active window.
    pub orb_deg: f64,
    /// Coarse scan step in days.
    pub scan_step_days: f64,
    pub center: Center,
    pub window: WindowConfig,
    pub refine: RefineConfig,
}

impl AspectConfig {
    /// Geocentric defaults matching the original generator.
    pub fn geocentric(bodies: Vec<Body>) -> Self {
        Self {
            bodies,
            aspects: Aspect::ALL.to_vec(),
            orb_deg: 1.0,
            scan_step_days: 1.0,
            center: Center::Earth,
            window: WindowConfig::aspect_orb(),
            refine: RefineConfig::default(),
        }
    }

    /// Same defaults observed from the Sun.
    pub fn heliocentric(bodies: Vec<Body>) -> Self {
        Self {
            center: Center::Sun,
            ..Self::geocentric(bodies)
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.orb_deg.is_finite() || self.orb_deg <= 0.0 {
            return Err("orb_deg must be positive");
        }
        if !self.scan_step_days.is_finite() || self.scan_step_days <= 0.0 {
            return Err("scan_step_days must be positive");
        }
        self.window.validate()?;
        self.refine.validate()
    }
}

/// Bodies that cannot be observed from the given center.
fn usable_body(body: Body, center: Center) -> bool {
    match center {
        Center::Earth => body != Body::Earth,
        Center::Sun => body != Body::Sun,
    }
}

/// Search all body pairs for exact aspects within the span.
pub fn search_aspects(
    provider: &Provider,
    config: &AspectConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;

    let mut bodies: Vec<Body> = Vec::new();
    for &b in &config.bodies {
        if !usable_body(b, config.center) {
            log::warn!("skipping {b}: not observable from {:?}", config.center);
            continue;
        }
        if !bodies.contains(&b) {
            bodies.push(b);
        }
    }

    let helio = config.center == Center::Sun;
    let mut events = Vec::new();

    for i in 0..bodies.len() {
        for j in i + 1..bodies.len() {
            let (a, b) = (bodies[i], bodies[j]);
            let metric = Metric::LongitudeDifference {
                a,
                b,
                center: config.center,
            };

            for &aspect in &config.aspects {
                for target in aspect.targets() {
                    search_pair_target(
                        provider, config, span, metric, a, b, aspect, target, helio, &mut events,
                    );
                }
            }
        }
    }

    Ok(events)
}

#[allow(clippy::too_many_arguments)]
fn search_pair_target(
    provider: &Provider,
    config: &AspectConfig,
    span: &SearchSpan,
    metric: Metric,
    a: Body,
    b: Body,
    aspect: Aspect,
    target: f64,
    helio: bool,
    events: &mut Vec<Event>,
) {
    let brackets = crate::scan::find_crossing_brackets(
        provider,
        metric,
        target,
        span.jd_start,
        span.jd_end,
        config.scan_step_days,
    );

    for bracket in brackets {
        let Some(t_exact) = refine_bracket(provider, metric, target, &bracket, &config.refine)
        else {
            continue;
        };
        if !span.contains_jd(t_exact) {
            continue;
        }

        let window = find_orb_window(
            provider,
            metric,
            target,
            config.orb_deg,
            t_exact,
            &config.window,
        );

        // Lookback must not leak a start before the queried span.
        let entry_jd = window.entry_jd.max(span.jd_start);
        let start = astrocal_time::jd_tt_to_utc(entry_jd);
        let end = astrocal_time::jd_tt_to_utc(window.exit_jd);
        let duration = ((end - start).num_minutes()).max(1);

        let (ta, tb) = (title(a.name()), title(b.name()));
        let mut summary = format!("{}: {} - {}", aspect.name(), ta, tb);
        if helio {
            summary.push_str(" (Helio)");
        }
        let prefix = if helio { "(Heliocentric) " } else { "" };

        events.push(Event {
            kind: EventKind::Aspect,
            summary,
            start_time: start,
            duration_minutes: duration,
            description: format!(
                "{prefix}{ta} and {tb} exact {} ({}°). Orb: {}°.",
                aspect.name().to_ascii_lowercase(),
                aspect.angle_deg(),
                config.orb_deg,
            ),
            participants: vec![a.name().to_string(), b.name().to_string()],
            calendar: if helio {
                "Astro: Aspects Helio".to_string()
            } else {
                "Astro: Aspects Geo".to_string()
            },
        });
    }
}
