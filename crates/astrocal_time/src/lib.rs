//! Time scales for the event engine: Julian Date ↔ calendar conversion,
//! ΔT (TT − UT), and sidereal time.
//!
//! All search arithmetic runs on Julian Dates in Terrestrial Time (TT),
//! carried as plain `f64` days. Conversion to UTC happens once, at the
//! event-reporting boundary, via [`jd_tt_to_utc`].

pub mod delta_t;
pub mod julian;
pub mod sidereal;

pub use delta_t::delta_t_seconds;
pub use julian::{
    J2000_JD, SECONDS_PER_DAY, calendar_to_jd, day_of_year, days_in_year, is_leap_year,
    jd_to_calendar,
};
pub use sidereal::{gmst_rad, local_sidereal_time_rad};

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

/// Convert a Julian Date in TT to a UTC calendar instant.
///
/// Applies ΔT (TT − UT) and treats UTC as UT1; the difference is under a
/// second, well below event reporting tolerance.
pub fn jd_tt_to_utc(jd_tt: f64) -> DateTime<Utc> {
    let jd_ut = jd_tt - delta_t_seconds(jd_tt) / SECONDS_PER_DAY;
    let (year, month, day_frac) = jd_to_calendar(jd_ut);
    let day = day_frac.floor();
    let frac_seconds = (day_frac - day) * SECONDS_PER_DAY;
    let secs = frac_seconds.floor();
    let nanos = ((frac_seconds - secs) * 1e9).round() as u32;
    Utc.with_ymd_and_hms(year, month, day as u32, 0, 0, 0)
        .single()
        .expect("jd_to_calendar yields valid dates")
        + chrono::Duration::seconds(secs as i64)
        + chrono::Duration::nanoseconds(nanos as i64)
}

/// Convert a UTC calendar instant to a Julian Date in TT.
pub fn utc_to_jd_tt(t: DateTime<Utc>) -> f64 {
    let day_frac = t.day() as f64
        + (t.hour() as f64 * 3600.0
            + t.minute() as f64 * 60.0
            + t.second() as f64
            + t.nanosecond() as f64 / 1e9)
            / SECONDS_PER_DAY;
    let jd_ut = calendar_to_jd(t.year(), t.month(), day_frac);
    jd_ut + delta_t_seconds(jd_ut) / SECONDS_PER_DAY
}

/// Julian Date (TT) of Jan 1, 00:00 UTC of the given year.
pub fn year_start_jd(year: i32) -> f64 {
    let jd_ut = calendar_to_jd(year, 1, 1.0);
    jd_ut + delta_t_seconds(jd_ut) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_roundtrip() {
        let t = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        let jd = utc_to_jd_tt(t);
        let back = jd_tt_to_utc(jd);
        let diff = (back - t).num_milliseconds().abs();
        assert!(diff < 5, "roundtrip drift {diff} ms");
    }

    #[test]
    fn year_start_is_midnight() {
        let jd = year_start_jd(2024);
        let t = jd_tt_to_utc(jd);
        assert_eq!(t.year(), 2024);
        assert_eq!(t.month(), 1);
        assert_eq!(t.day(), 1);
        assert_eq!(t.hour(), 0);
    }

    #[test]
    fn tt_is_ahead_of_utc() {
        // In 2024, TT - UTC ≈ 69 s, so the TT JD of a UTC instant is larger.
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let jd_tt = utc_to_jd_tt(t);
        let jd_ut = calendar_to_jd(2024, 1, 1.0);
        let dt_s = (jd_tt - jd_ut) * SECONDS_PER_DAY;
        assert!(dt_s > 60.0 && dt_s < 80.0, "ΔT = {dt_s} s");
    }
}
