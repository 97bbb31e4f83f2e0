//! Frame corrections and coordinate conversions.
//!
//! Ecliptic longitudes come out of the propagators referred to J2000;
//! zodiac boundaries, seasons, and equatorial coordinates are defined
//! against the equinox of date, so searches need the general precession
//! in longitude plus nutation applied on top.

use std::f64::consts::PI;

use astrocal_time::J2000_JD;

/// Spherical ecliptic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ecliptic {
    /// Longitude in degrees, [0, 360).
    pub lon_deg: f64,
    /// Latitude in degrees, [-90, 90].
    pub lat_deg: f64,
    /// Distance in AU.
    pub dist_au: f64,
}

/// Equatorial coordinates of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    /// Right ascension in degrees, [0, 360).
    pub ra_deg: f64,
    /// Declination in degrees, [-90, 90].
    pub dec_deg: f64,
}

/// Julian centuries of TT since J2000.
pub fn centuries(jd_tt: f64) -> f64 {
    (jd_tt - J2000_JD) / 36_525.0
}

/// General precession in ecliptic longitude since J2000, degrees.
pub fn precession_in_longitude_deg(t: f64) -> f64 {
    1.396_971 * t + 0.000_308_6 * t * t
}

/// Nutation in longitude Δψ and obliquity Δε, degrees.
///
/// Truncated IAU 1980 series; the four retained terms bound the error
/// near 0.5″, immaterial against the element-table accuracy.
pub fn nutation_deg(t: f64) -> (f64, f64) {
    let omega = (125.044_52 - 1934.136_261 * t).to_radians();
    let l_sun = (280.4665 + 36_000.7698 * t).to_radians();
    let l_moon = (218.3165 + 481_267.8813 * t).to_radians();

    let dpsi_arcsec = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin()
        - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps_arcsec = 9.20 * omega.cos()
        + 0.57 * (2.0 * l_sun).cos()
        + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    (dpsi_arcsec / 3600.0, deps_arcsec / 3600.0)
}

/// Mean obliquity of the ecliptic, degrees.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    23.439_291_111 - (46.8150 * t + 0.000_59 * t * t - 0.001_813 * t.powi(3)) / 3600.0
}

/// Convert rectangular ecliptic coordinates (AU) to spherical.
pub fn rect_to_spherical(v: &[f64; 3]) -> Ecliptic {
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if r == 0.0 {
        return Ecliptic {
            lon_deg: 0.0,
            lat_deg: 0.0,
            dist_au: 0.0,
        };
    }
    let lon = v[1].atan2(v[0]);
    let lat = (v[2] / r).asin();
    Ecliptic {
        lon_deg: if lon < 0.0 { lon + 2.0 * PI } else { lon }.to_degrees(),
        lat_deg: lat.to_degrees(),
        dist_au: r,
    }
}

/// Convert spherical ecliptic coordinates to rectangular (AU).
pub fn spherical_to_rect(e: &Ecliptic) -> [f64; 3] {
    let lon = e.lon_deg.to_radians();
    let lat = e.lat_deg.to_radians();
    let cl = lat.cos();
    [
        e.dist_au * cl * lon.cos(),
        e.dist_au * cl * lon.sin(),
        e.dist_au * lat.sin(),
    ]
}

/// Ecliptic-of-date spherical coordinates → equatorial of date.
///
/// `true_obliquity_deg` is ε = ε₀ + Δε at the same epoch.
pub fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, true_obliquity_deg: f64) -> Equatorial {
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();
    let eps = true_obliquity_deg.to_radians();

    let sin_dec = lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin();
    let dec = sin_dec.asin();
    let y = lon.sin() * eps.cos() - lat.tan() * eps.sin();
    let x = lon.cos();
    let ra = y.atan2(x);

    Equatorial {
        ra_deg: ra.to_degrees().rem_euclid(360.0),
        dec_deg: dec.to_degrees(),
    }
}

/// Great-circle separation between two spherical directions, degrees.
pub fn angular_separation_deg(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (l1, b1) = (lon1.to_radians(), lat1.to_radians());
    let (l2, b2) = (lon2.to_radians(), lat2.to_radians());
    let cos_d = b1.sin() * b2.sin() + b1.cos() * b2.cos() * (l1 - l2).cos();
    cos_d.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn obliquity_at_j2000() {
        assert_relative_eq!(mean_obliquity_deg(0.0), 23.439_291_111, epsilon = 1e-9);
    }

    #[test]
    fn precession_rate() {
        // ~50.3″ per year ⇒ ~1.397° per century.
        assert!((precession_in_longitude_deg(1.0) - 1.397).abs() < 0.01);
    }

    #[test]
    fn nutation_magnitude_bounded() {
        for &t in &[-1.0, 0.0, 0.24, 1.0] {
            let (dpsi, deps) = nutation_deg(t);
            assert!(dpsi.abs() < 18.0 / 3600.0 * 1.1);
            assert!(deps.abs() < 10.0 / 3600.0 * 1.1);
        }
    }

    #[test]
    fn spherical_roundtrip() {
        let e = Ecliptic {
            lon_deg: 123.4,
            lat_deg: -4.5,
            dist_au: 5.2,
        };
        let back = rect_to_spherical(&spherical_to_rect(&e));
        assert_relative_eq!(back.lon_deg, e.lon_deg, epsilon = 1e-10);
        assert_relative_eq!(back.lat_deg, e.lat_deg, epsilon = 1e-10);
        assert_relative_eq!(back.dist_au, e.dist_au, epsilon = 1e-10);
    }

    #[test]
    fn equator_crossing_has_zero_dec() {
        // A body at the equinox point (lon 0, lat 0) has dec 0, RA 0.
        let eq = ecliptic_to_equatorial(0.0, 0.0, 23.44);
        assert!(eq.dec_deg.abs() < 1e-10);
        assert!(eq.ra_deg.abs() < 1e-10 || (eq.ra_deg - 360.0).abs() < 1e-10);
    }

    #[test]
    fn solstice_point_dec_equals_obliquity() {
        let eq = ecliptic_to_equatorial(90.0, 0.0, 23.44);
        assert_relative_eq!(eq.dec_deg, 23.44, epsilon = 1e-9);
        assert_relative_eq!(eq.ra_deg, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn separation_symmetric() {
        let d1 = angular_separation_deg(10.0, 5.0, 40.0, -5.0);
        let d2 = angular_separation_deg(40.0, -5.0, 10.0, 5.0);
        assert_relative_eq!(d1, d2, epsilon = 1e-12);
        assert!(d1 > 0.0 && d1 < 90.0);
    }

    #[test]
    fn separation_wraps_through_zero() {
        let d = angular_separation_deg(359.5, 0.0, 0.5, 0.0);
        assert_relative_eq!(d, 1.0, epsilon = 1e-9);
    }
}
