//! Scalar function adapters: one tagged variant per physical quantity the
//! engine can search on.
//!
//! Each [`Metric`] is a small `{kind, params}` value plus a pure
//! evaluation method — no captured environment, freely copyable across
//! parallel workers. Every metric evaluates through either provider tier:
//! the geometric tier is only ever used to bracket, the apparent tier for
//! refinement and reporting.

use astrocal_ephem::{Body, Center, EphemError, PositionModel, Provider};
use astrocal_time::{delta_t_seconds, gmst_rad, local_sidereal_time_rad, SECONDS_PER_DAY};

/// Half-step for longitude-rate finite differences, days.
const LON_RATE_STEP_DAYS: f64 = 0.02;

/// Half-step for declination-rate finite differences, days.
const DEC_RATE_STEP_DAYS: f64 = 0.01;

/// Wraparound semantics of a metric's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// Plain scalar; deviations are ordinary differences.
    None,
    /// Angle on a 360° circle; deviations are normalized to [-180, 180).
    Degrees360,
}

/// An observation site for topocentric metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// Geodetic latitude, degrees north.
    pub latitude_deg: f64,
    /// Longitude, degrees east.
    pub longitude_deg: f64,
}

/// A scalar function of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// Ecliptic-of-date longitude of a body, degrees [0, 360).
    Longitude { body: Body, center: Center },
    /// Signed longitude difference `a − b`, degrees [0, 360).
    LongitudeDifference { a: Body, b: Body, center: Center },
    /// Geocentric great-circle separation, degrees [0, 180].
    AngularSeparation { a: Body, b: Body },
    /// Geocentric ecliptic latitude, degrees.
    EclipticLatitude { body: Body },
    /// Longitude rate dλ/dt, degrees per day (finite difference).
    LongitudeRate { body: Body },
    /// Declination rate dδ/dt, degrees per day (finite difference).
    DeclinationRate { body: Body },
    /// Altitude above the horizon at a site, degrees.
    Altitude { body: Body, site: Site },
    /// Local hour angle at a site, degrees [0, 360).
    HourAngle { body: Body, site: Site },
}

impl Metric {
    /// Wraparound semantics of this metric's values.
    pub const fn wrap(self) -> Wrap {
        match self {
            Self::Longitude { .. } | Self::LongitudeDifference { .. } | Self::HourAngle { .. } => {
                Wrap::Degrees360
            }
            Self::AngularSeparation { .. }
            | Self::EclipticLatitude { .. }
            | Self::LongitudeRate { .. }
            | Self::DeclinationRate { .. }
            | Self::Altitude { .. } => Wrap::None,
        }
    }

    /// Evaluate the metric at a JD (TT).
    pub fn eval(
        self,
        provider: &Provider,
        jd_tt: f64,
        model: PositionModel,
    ) -> Result<f64, EphemError> {
        match self {
            Self::Longitude { body, center } => {
                Ok(provider.ecliptic(body, center, jd_tt, model)?.lon_deg)
            }
            Self::LongitudeDifference { a, b, center } => {
                let la = provider.ecliptic(a, center, jd_tt, model)?.lon_deg;
                let lb = provider.ecliptic(b, center, jd_tt, model)?.lon_deg;
                Ok((la - lb).rem_euclid(360.0))
            }
            Self::AngularSeparation { a, b } => provider.separation_deg(a, b, jd_tt, model),
            Self::EclipticLatitude { body } => {
                Ok(provider.ecliptic(body, Center::Earth, jd_tt, model)?.lat_deg)
            }
            Self::LongitudeRate { body } => {
                let h = LON_RATE_STEP_DAYS;
                let l1 = provider.ecliptic(body, Center::Earth, jd_tt - h, model)?.lon_deg;
                let l2 = provider.ecliptic(body, Center::Earth, jd_tt + h, model)?.lon_deg;
                Ok(normalize_pm180(l2 - l1) / (2.0 * h))
            }
            Self::DeclinationRate { body } => {
                let h = DEC_RATE_STEP_DAYS;
                let d1 = provider.equatorial(body, jd_tt - h, model)?.dec_deg;
                let d2 = provider.equatorial(body, jd_tt + h, model)?.dec_deg;
                Ok((d2 - d1) / (2.0 * h))
            }
            Self::Altitude { body, site } => {
                let eq = provider.equatorial(body, jd_tt, model)?;
                let h_rad = hour_angle_rad(jd_tt, site.longitude_deg, eq.ra_deg);
                let phi = site.latitude_deg.to_radians();
                let dec = eq.dec_deg.to_radians();
                let sin_alt = phi.sin() * dec.sin() + phi.cos() * dec.cos() * h_rad.cos();
                Ok(sin_alt.clamp(-1.0, 1.0).asin().to_degrees())
            }
            Self::HourAngle { body, site } => {
                let eq = provider.equatorial(body, jd_tt, model)?;
                Ok(hour_angle_rad(jd_tt, site.longitude_deg, eq.ra_deg)
                    .to_degrees()
                    .rem_euclid(360.0))
            }
        }
    }
}

/// Local hour angle, radians.
fn hour_angle_rad(jd_tt: f64, longitude_east_deg: f64, ra_deg: f64) -> f64 {
    let jd_ut = jd_tt - delta_t_seconds(jd_tt) / SECONDS_PER_DAY;
    let lst = local_sidereal_time_rad(gmst_rad(jd_ut), longitude_east_deg.to_radians());
    lst - ra_deg.to_radians()
}

/// Normalize an angle in degrees to [-180, 180).
pub fn normalize_pm180(deg: f64) -> f64 {
    let mut d = deg.rem_euclid(360.0);
    if d >= 180.0 {
        d -= 360.0;
    }
    d
}

/// Deviation of `value` from `target` under the metric's wraparound.
pub fn deviation(value: f64, target: f64, wrap: Wrap) -> f64 {
    match wrap {
        Wrap::None => value - target,
        Wrap::Degrees360 => normalize_pm180(value - target),
    }
}
