//! Solar and lunar eclipse detection.
//!
//! Eclipses are anchored on new and full moons, prefiltered by the
//! Moon's ecliptic latitude, classified from distance-derived angular
//! radii, and bounded in time by the window finder running on the
//! Sun–Moon separation at the contact threshold.
//!
//! Geocentric classification only: a geocentrically partial solar
//! eclipse may well be total somewhere on the surface.

use astrocal_ephem::{Body, Center, PositionModel, Provider};

use crate::error::SearchError;
use crate::event::{Event, EventKind};
use crate::metric::Metric;
use crate::phase::phase_instants;
use crate::refine::RefineConfig;
use crate::support::SearchSpan;
use crate::window::{WindowConfig, find_orb_window};

/// Earth equatorial radius, km (IAU 2015 Resolution B3).
const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Sun nominal radius, km (IAU 2015 Resolution B3).
const SUN_RADIUS_KM: f64 = 696_000.0;

/// Moon mean radius, km (IAU 2015).
const MOON_RADIUS_KM: f64 = 1_737.4;

/// Atmospheric enlargement of the Earth's shadow (Danjon method).
const DANJON_ENLARGEMENT: f64 = 1.02;

/// Ecliptic latitude threshold for eclipse candidacy, degrees. Generous;
/// exact geometry filters afterward.
const ECLIPSE_LAT_THRESHOLD_DEG: f64 = 2.0;

const KM_PER_AU: f64 = astrocal_ephem::AU_KM;

/// Eclipse search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipseConfig {
    /// Report purely penumbral lunar eclipses.
    pub include_penumbral: bool,
    pub window: WindowConfig,
    pub refine: RefineConfig,
}

impl Default for EclipseConfig {
    fn default() -> Self {
        Self {
            include_penumbral: true,
            window: WindowConfig::eclipse_contact(),
            refine: RefineConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolarKind {
    Total,
    Annular,
    Partial,
}

impl SolarKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Total => "Total Solar Eclipse",
            Self::Annular => "Annular Solar Eclipse",
            Self::Partial => "Partial Solar Eclipse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LunarKind {
    Total,
    Partial,
    Penumbral,
}

impl LunarKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Total => "Total Lunar Eclipse",
            Self::Partial => "Partial Lunar Eclipse",
            Self::Penumbral => "Penumbral Lunar Eclipse",
        }
    }
}

/// Classify a geocentric solar eclipse from disk radii and separation.
fn classify_solar(sun_r: f64, moon_r: f64, min_sep: f64) -> Option<SolarKind> {
    if min_sep >= sun_r + moon_r {
        return None;
    }
    if min_sep < (moon_r - sun_r).abs() {
        if moon_r >= sun_r {
            Some(SolarKind::Total)
        } else {
            Some(SolarKind::Annular)
        }
    } else {
        Some(SolarKind::Partial)
    }
}

/// Classify a lunar eclipse from the Moon's offset off the shadow axis.
fn classify_lunar(
    shadow_offset: f64,
    moon_r: f64,
    umbral_r: f64,
    penumbral_r: f64,
) -> Option<LunarKind> {
    let near_edge = shadow_offset - moon_r;
    let far_edge = shadow_offset + moon_r;

    if near_edge >= penumbral_r {
        None
    } else if far_edge <= umbral_r {
        Some(LunarKind::Total)
    } else if near_edge < umbral_r {
        Some(LunarKind::Partial)
    } else {
        Some(LunarKind::Penumbral)
    }
}

/// Earth shadow angular radii (penumbral, umbral) at the Moon's
/// distance, degrees, Danjon-enlarged.
fn shadow_radii_deg(sun_dist_km: f64, moon_dist_km: f64) -> (f64, f64) {
    let pi_sun = (EARTH_RADIUS_KM / sun_dist_km).asin();
    let pi_moon = (EARTH_RADIUS_KM / moon_dist_km).asin();
    let s_sun = (SUN_RADIUS_KM / sun_dist_km).asin();

    let penumbral = DANJON_ENLARGEMENT * (pi_moon + pi_sun + s_sun);
    let umbral = DANJON_ENLARGEMENT * (pi_moon + pi_sun - s_sun);
    (penumbral.to_degrees(), umbral.to_degrees())
}

fn moon_angular_radius_deg(moon_dist_km: f64) -> f64 {
    (MOON_RADIUS_KM / moon_dist_km).asin().to_degrees()
}

fn sun_angular_radius_deg(sun_dist_km: f64) -> f64 {
    (SUN_RADIUS_KM / sun_dist_km).asin().to_degrees()
}

/// Search for solar and lunar eclipses within the span.
pub fn search_eclipses(
    provider: &Provider,
    config: &EclipseConfig,
    span: &SearchSpan,
) -> Result<Vec<Event>, SearchError> {
    config.window.validate().map_err(SearchError::InvalidConfig)?;

    let instants = phase_instants(provider, span.jd_start, span.jd_end, &config.refine)?;
    let separation = Metric::AngularSeparation {
        a: Body::Sun,
        b: Body::Moon,
    };

    let mut events = Vec::new();

    for instant in instants {
        let t = instant.jd_tt;
        let (moon_lat, moon_dist_km, sun_dist_km) = match candidate_geometry(provider, t) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("eclipse candidate at JD {t} skipped: {e}");
                continue;
            }
        };

        if moon_lat.abs() > ECLIPSE_LAT_THRESHOLD_DEG {
            continue;
        }

        match instant.quarter {
            // New moon: solar eclipse candidate.
            0 => {
                let sun_r = sun_angular_radius_deg(sun_dist_km);
                let moon_r = moon_angular_radius_deg(moon_dist_km);
                let Ok(min_sep) = provider.separation_deg(
                    Body::Sun,
                    Body::Moon,
                    t,
                    PositionModel::Apparent,
                ) else {
                    continue;
                };
                let Some(kind) = classify_solar(sun_r, moon_r, min_sep) else {
                    continue;
                };

                let contact = sun_r + moon_r;
                let window =
                    find_orb_window(provider, separation, 0.0, contact, t, &config.window);
                if let Some(event) = window_event(
                    span,
                    EventKind::SolarEclipse,
                    kind.label(),
                    min_sep,
                    window.entry_jd,
                    window.exit_jd,
                    "Astro: Solar Eclipses",
                ) {
                    events.push(event);
                }
            }
            // Full moon: lunar eclipse candidate.
            2 => {
                let (penumbral_r, umbral_r) = shadow_radii_deg(sun_dist_km, moon_dist_km);
                let moon_r = moon_angular_radius_deg(moon_dist_km);
                let Ok(sep) = provider.separation_deg(
                    Body::Sun,
                    Body::Moon,
                    t,
                    PositionModel::Apparent,
                ) else {
                    continue;
                };
                let shadow_offset = (180.0 - sep).abs();
                let Some(kind) = classify_lunar(shadow_offset, moon_r, umbral_r, penumbral_r)
                else {
                    continue;
                };
                if !config.include_penumbral && kind == LunarKind::Penumbral {
                    continue;
                }

                let contact = penumbral_r + moon_r;
                let window =
                    find_orb_window(provider, separation, 180.0, contact, t, &config.window);
                if let Some(event) = window_event(
                    span,
                    EventKind::LunarEclipse,
                    kind.label(),
                    shadow_offset,
                    window.entry_jd,
                    window.exit_jd,
                    "Astro: Lunar Eclipses",
                ) {
                    events.push(event);
                }
            }
            _ => {}
        }
    }

    Ok(events)
}

/// Moon latitude (deg) and Sun/Moon distances (km) at a candidate epoch.
fn candidate_geometry(
    provider: &Provider,
    jd_tt: f64,
) -> Result<(f64, f64, f64), SearchError> {
    let moon = provider.ecliptic(Body::Moon, Center::Earth, jd_tt, PositionModel::Apparent)?;
    let sun = provider.ecliptic(Body::Sun, Center::Earth, jd_tt, PositionModel::Apparent)?;
    Ok((moon.lat_deg, moon.dist_au * KM_PER_AU, sun.dist_au * KM_PER_AU))
}

#[allow(clippy::too_many_arguments)]
fn window_event(
    span: &SearchSpan,
    kind: EventKind,
    label: &str,
    peak_offset_deg: f64,
    entry_jd: f64,
    exit_jd: f64,
    calendar: &str,
) -> Option<Event> {
    let entry_jd = entry_jd.max(span.jd_start);
    if !span.contains_jd(entry_jd) {
        return None;
    }
    let start = astrocal_time::jd_tt_to_utc(entry_jd);
    let end = astrocal_time::jd_tt_to_utc(exit_jd);
    let duration = (end - start).num_minutes().max(0);

    Some(Event {
        kind,
        summary: label.to_string(),
        start_time: start,
        duration_minutes: duration,
        description: format!(
            "{label}. Peak offset {peak_offset_deg:.3} deg. Duration: {duration} mins."
        ),
        participants: vec![Body::Sun.name().to_string(), Body::Moon.name().to_string()],
        calendar: calendar.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_radii_reasonable() {
        // Sun at 1 AU, Moon at mean distance.
        let (pen, umb) = shadow_radii_deg(149_597_870.7, 384_400.0);
        assert!(pen > 1.1 && pen < 1.4, "penumbral = {pen}");
        assert!(umb > 0.6 && umb < 0.8, "umbral = {umb}");
    }

    #[test]
    fn disk_radii_typical() {
        let m = moon_angular_radius_deg(384_400.0);
        let s = sun_angular_radius_deg(149_597_870.7);
        assert!(m > 0.24 && m < 0.28, "moon radius = {m}");
        assert!(s > 0.25 && s < 0.28, "sun radius = {s}");
    }

    #[test]
    fn classify_solar_cases() {
        assert_eq!(classify_solar(0.266, 0.270, 0.002), Some(SolarKind::Total));
        assert_eq!(classify_solar(0.266, 0.250, 0.002), Some(SolarKind::Annular));
        assert_eq!(classify_solar(0.266, 0.260, 0.30), Some(SolarKind::Partial));
        assert_eq!(classify_solar(0.266, 0.260, 0.60), None);
    }

    #[test]
    fn classify_lunar_cases() {
        assert_eq!(classify_lunar(0.10, 0.26, 0.70, 1.25), Some(LunarKind::Total));
        assert_eq!(classify_lunar(0.55, 0.26, 0.70, 1.25), Some(LunarKind::Partial));
        assert_eq!(
            classify_lunar(1.05, 0.26, 0.70, 1.25),
            Some(LunarKind::Penumbral)
        );
        assert_eq!(classify_lunar(1.60, 0.26, 0.70, 1.25), None);
    }

    #[test]
    fn finds_april_2024_solar_eclipse() {
        use chrono::Datelike;
        let provider = Provider::new();
        let span = SearchSpan::years(2024, 2024);
        let events = search_eclipses(&provider, &EclipseConfig::default(), &span).unwrap();
        let found = events.iter().any(|e| {
            e.kind == EventKind::SolarEclipse
                && e.start_time.month() == 4
                && (7..=9).contains(&e.start_time.day())
        });
        assert!(found, "2024-04-08 solar eclipse missing; got {events:#?}");
    }

    #[test]
    fn finds_september_2024_lunar_eclipse() {
        use chrono::Datelike;
        let provider = Provider::new();
        let span = SearchSpan::years(2024, 2024);
        let events = search_eclipses(&provider, &EclipseConfig::default(), &span).unwrap();
        let found = events.iter().any(|e| {
            e.kind == EventKind::LunarEclipse
                && e.start_time.month() == 9
                && (17..=18).contains(&e.start_time.day())
        });
        assert!(found, "2024-09-18 lunar eclipse missing");
    }

    #[test]
    fn eclipse_windows_have_positive_duration() {
        let provider = Provider::new();
        let span = SearchSpan::years(2024, 2024);
        let events = search_eclipses(&provider, &EclipseConfig::default(), &span).unwrap();
        assert!(!events.is_empty());
        for e in &events {
            assert!(e.duration_minutes > 0, "{}: zero duration", e.summary);
        }
    }
}
