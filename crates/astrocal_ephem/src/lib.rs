//! Analytic position provider for the event-detection engine.
//!
//! A [`Provider`] is an explicitly constructed, immutable handle passed
//! by reference into every search. It is `Send + Sync`; workers share one
//! instance instead of keeping ambient global state. Construction is
//! cheap — element tables are compiled in, there are no data files.
//!
//! Two precision tiers are exposed, per the engine contract:
//! - [`PositionModel::Geometric`] — no light-time or aberration. Cheap,
//!   systematically displaced by up to ~25″. Used only to bracket.
//! - [`PositionModel::Apparent`] — light-time iteration, annual
//!   aberration, nutation. Required before reporting any timestamp.
//!
//! Longitudes and latitudes are returned against the ecliptic and
//! equinox of date, matching the frame zodiac boundaries and seasons are
//! defined in.

pub mod elements;
pub mod frames;
pub mod kepler;
pub mod lunar;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use frames::{Ecliptic, Equatorial};
pub use lunar::AU_KM;

use elements::{ElementSet, planet_elements};
use frames::{
    angular_separation_deg, centuries, ecliptic_to_equatorial, mean_obliquity_deg, nutation_deg,
    precession_in_longitude_deg, rect_to_spherical, spherical_to_rect,
};
use kepler::heliocentric_position;
use lunar::moon_position;

/// Speed of light, AU per day.
const C_AU_PER_DAY: f64 = 173.144_632_674;

/// Moon mass / (Earth + Moon mass); offsets the Earth from the EM barycenter.
const MOON_BARY_FRACTION: f64 = 0.012_150_5;

/// Finite-difference half-step for the observer velocity, days.
const VELOCITY_STEP_DAYS: f64 = 0.01;

/// Element tables are fitted to 1800–2050; allow modest extrapolation.
const MIN_JD: f64 = 2_305_447.5; // 1600-01-01
const MAX_JD: f64 = 2_524_593.5; // 2200-01-01

/// Bodies the provider can position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// Every supported body, Sun first.
    pub const ALL: [Body; 11] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Earth => "earth",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
        }
    }

    /// Resolve a body from a user-supplied name.
    ///
    /// Accepts any case and tolerates a ` barycenter` suffix (outer
    /// planets are barycenter entries in kernel-based ephemerides, and
    /// configs written against those spell them that way).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let stem = lower.strip_suffix(" barycenter").unwrap_or(&lower);
        match stem {
            "sun" => Some(Self::Sun),
            "moon" => Some(Self::Moon),
            "mercury" => Some(Self::Mercury),
            "venus" => Some(Self::Venus),
            "earth" => Some(Self::Earth),
            "mars" => Some(Self::Mars),
            "jupiter" => Some(Self::Jupiter),
            "saturn" => Some(Self::Saturn),
            "uranus" => Some(Self::Uranus),
            "neptune" => Some(Self::Neptune),
            "pluto" => Some(Self::Pluto),
            _ => None,
        }
    }

    const fn element_set(self) -> Option<ElementSet> {
        match self {
            Self::Mercury => Some(ElementSet::Mercury),
            Self::Venus => Some(ElementSet::Venus),
            Self::Earth => Some(ElementSet::EarthMoonBary),
            Self::Mars => Some(ElementSet::Mars),
            Self::Jupiter => Some(ElementSet::Jupiter),
            Self::Saturn => Some(ElementSet::Saturn),
            Self::Uranus => Some(ElementSet::Uranus),
            Self::Neptune => Some(ElementSet::Neptune),
            Self::Pluto => Some(ElementSet::Pluto),
            Self::Sun | Self::Moon => None,
        }
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Observation center for ecliptic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Center {
    /// Geocentric, the default for every event category.
    Earth,
    /// Heliocentric, used by the heliocentric aspect sweep.
    Sun,
}

/// Precision tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionModel {
    /// Instantaneous geometric direction; bracketing only.
    Geometric,
    /// Light-time, aberration, and nutation applied.
    Apparent,
}

/// Provider errors.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EphemError {
    /// Epoch outside the validity span of the element tables.
    EpochOutOfRange { jd_tt: f64 },
    /// The (target, center) combination is undefined, e.g. Sun from Sun.
    UnsupportedTarget(&'static str),
}

impl Display for EphemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EpochOutOfRange { jd_tt } => write!(f, "epoch out of range: JD {jd_tt}"),
            Self::UnsupportedTarget(msg) => write!(f, "unsupported target: {msg}"),
        }
    }
}

impl Error for EphemError {}

/// Immutable analytic ephemeris.
#[derive(Debug, Clone, Copy, Default)]
pub struct Provider;

impl Provider {
    pub fn new() -> Self {
        Self
    }

    /// Ecliptic-of-date longitude/latitude/distance of `body` as seen
    /// from `center`.
    pub fn ecliptic(
        &self,
        body: Body,
        center: Center,
        jd_tt: f64,
        model: PositionModel,
    ) -> Result<Ecliptic, EphemError> {
        check_epoch(jd_tt)?;
        validate_pair(body, center)?;

        let t = centuries(jd_tt);

        // The Moon's series is already geocentric of-date; only the
        // equinox correction differs between tiers.
        if body == Body::Moon && center == Center::Earth {
            let mut p = moon_position(t);
            if model == PositionModel::Apparent {
                let (dpsi, _) = nutation_deg(t);
                p.lon_deg = (p.lon_deg + dpsi).rem_euclid(360.0);
            }
            return Ok(p);
        }

        let rect = self.geocentric_or_helio_rect(body, center, jd_tt, model)?;
        let mut sph = rect_to_spherical(&rect);

        // Rotate the J2000 longitude to the equinox of date.
        let mut lon_shift = precession_in_longitude_deg(t);
        if model == PositionModel::Apparent {
            let (dpsi, _) = nutation_deg(t);
            lon_shift += dpsi;
        }
        sph.lon_deg = (sph.lon_deg + lon_shift).rem_euclid(360.0);
        Ok(sph)
    }

    /// Geocentric apparent right ascension and declination of date.
    pub fn equatorial(
        &self,
        body: Body,
        jd_tt: f64,
        model: PositionModel,
    ) -> Result<Equatorial, EphemError> {
        let ecl = self.ecliptic(body, Center::Earth, jd_tt, model)?;
        let t = centuries(jd_tt);
        let (_, deps) = nutation_deg(t);
        let eps = mean_obliquity_deg(t) + deps;
        Ok(ecliptic_to_equatorial(ecl.lon_deg, ecl.lat_deg, eps))
    }

    /// Geocentric great-circle separation between two bodies, degrees.
    pub fn separation_deg(
        &self,
        a: Body,
        b: Body,
        jd_tt: f64,
        model: PositionModel,
    ) -> Result<f64, EphemError> {
        let pa = self.ecliptic(a, Center::Earth, jd_tt, model)?;
        let pb = self.ecliptic(b, Center::Earth, jd_tt, model)?;
        Ok(angular_separation_deg(
            pa.lon_deg, pa.lat_deg, pb.lon_deg, pb.lat_deg,
        ))
    }

    /// Center-relative rectangular position in ecliptic J2000, AU.
    fn geocentric_or_helio_rect(
        &self,
        body: Body,
        center: Center,
        jd_tt: f64,
        model: PositionModel,
    ) -> Result<[f64; 3], EphemError> {
        let obs = match center {
            Center::Earth => earth_helio_rect(jd_tt),
            Center::Sun => [0.0; 3],
        };

        let mut tgt = target_helio_rect(body, jd_tt);

        if model == PositionModel::Apparent {
            // Light-time: re-evaluate the target at the retarded epoch.
            for _ in 0..2 {
                let tau = dist(&sub(&tgt, &obs)) / C_AU_PER_DAY;
                tgt = target_helio_rect(body, jd_tt - tau);
            }
        }

        let mut rel = sub(&tgt, &obs);

        if model == PositionModel::Apparent && center == Center::Earth {
            // Annual aberration: tilt the apparent direction by the
            // observer's velocity over c.
            let v = earth_velocity_rect(jd_tt);
            let r = dist(&rel);
            if r > 0.0 {
                let u = [rel[0] / r, rel[1] / r, rel[2] / r];
                let mut ua = [
                    u[0] + v[0] / C_AU_PER_DAY,
                    u[1] + v[1] / C_AU_PER_DAY,
                    u[2] + v[2] / C_AU_PER_DAY,
                ];
                let n = dist(&ua);
                ua = [ua[0] / n, ua[1] / n, ua[2] / n];
                rel = [ua[0] * r, ua[1] * r, ua[2] * r];
            }
        }

        Ok(rel)
    }
}

fn check_epoch(jd_tt: f64) -> Result<(), EphemError> {
    if !jd_tt.is_finite() || !(MIN_JD..=MAX_JD).contains(&jd_tt) {
        return Err(EphemError::EpochOutOfRange { jd_tt });
    }
    Ok(())
}

fn validate_pair(body: Body, center: Center) -> Result<(), EphemError> {
    match (body, center) {
        (Body::Sun, Center::Sun) => Err(EphemError::UnsupportedTarget(
            "sun cannot be observed from the sun",
        )),
        (Body::Earth, Center::Earth) => Err(EphemError::UnsupportedTarget(
            "earth cannot be observed from the earth",
        )),
        _ => Ok(()),
    }
}

/// Heliocentric ecliptic-J2000 rectangular position of a body, AU.
fn target_helio_rect(body: Body, jd_tt: f64) -> [f64; 3] {
    let t = centuries(jd_tt);
    match body {
        Body::Sun => [0.0; 3],
        Body::Earth => earth_helio_rect(jd_tt),
        Body::Moon => {
            let e = earth_helio_rect(jd_tt);
            let m = moon_geo_rect_j2000(t);
            add(&e, &m)
        }
        _ => {
            let set = body.element_set().expect("planets carry elements");
            heliocentric_position(&planet_elements(set).at(t))
        }
    }
}

/// Earth's center: the EM barycenter offset toward the anti-Moon side.
fn earth_helio_rect(jd_tt: f64) -> [f64; 3] {
    let t = centuries(jd_tt);
    let emb = heliocentric_position(&planet_elements(ElementSet::EarthMoonBary).at(t));
    let moon = moon_geo_rect_j2000(t);
    [
        emb[0] - moon[0] * MOON_BARY_FRACTION,
        emb[1] - moon[1] * MOON_BARY_FRACTION,
        emb[2] - moon[2] * MOON_BARY_FRACTION,
    ]
}

/// Geocentric Moon in ecliptic J2000 rectangular coordinates, AU.
fn moon_geo_rect_j2000(t: f64) -> [f64; 3] {
    let mut p = moon_position(t);
    // The series is of-date; rotate back to the J2000 equinox.
    p.lon_deg = (p.lon_deg - precession_in_longitude_deg(t)).rem_euclid(360.0);
    spherical_to_rect(&p)
}

/// Earth heliocentric velocity, AU/day, by central difference.
fn earth_velocity_rect(jd_tt: f64) -> [f64; 3] {
    let h = VELOCITY_STEP_DAYS;
    let p = earth_helio_rect(jd_tt + h);
    let m = earth_helio_rect(jd_tt - h);
    [
        (p[0] - m[0]) / (2.0 * h),
        (p[1] - m[1]) / (2.0 * h),
        (p[2] - m[2]) / (2.0 * h),
    ]
}

fn add(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dist(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
