//! Coarse sampling and crossing detection.
//!
//! Samples a scalar function on a fixed grid and turns sign changes of
//! the deviation from a target into brackets for the refiner. The
//! metric-backed entry points evaluate through the cheap geometric tier,
//! which is systematically displaced but close enough to bracket every
//! crossing the precise tier would see at the step sizes used here.

use astrocal_ephem::{EphemError, PositionModel, Provider};

use crate::metric::{Metric, Wrap, deviation};

/// A time interval containing exactly one sign change of the deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo_jd: f64,
    pub hi_jd: f64,
    /// Deviation at the lower end (coarse tier).
    pub lo_dev: f64,
    /// Deviation at the upper end (coarse tier).
    pub hi_dev: f64,
}

/// A discrete-state transition between adjacent samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateChange {
    pub lo_jd: f64,
    pub hi_jd: f64,
    pub old_state: i32,
    pub new_state: i32,
    /// The continuous boundary value crossed (degrees); the refiner
    /// bisects the underlying metric against this, never the integer.
    pub boundary_deg: f64,
}

/// Whether a pair of deviations marks a genuine crossing.
///
/// The second condition rejects sign flips produced by the ±180° seam of
/// the wraparound metric rather than a true pass through the target.
pub(crate) fn is_genuine_crossing(d_a: f64, d_b: f64, wrap: Wrap) -> bool {
    if d_a * d_b > 0.0 {
        return false;
    }
    match wrap {
        Wrap::Degrees360 => (d_a - d_b).abs() < 180.0,
        Wrap::None => true,
    }
}

/// Scan `[jd_start, jd_end]` for sign changes of `f − target`.
///
/// Evaluation failures at single grid points are skipped: the scan
/// restarts from the next good sample, so one bad epoch cannot abort the
/// surrounding search (at worst one crossing is missed).
pub fn scan_crossings<F>(
    f: &F,
    target: f64,
    wrap: Wrap,
    jd_start: f64,
    jd_end: f64,
    step_days: f64,
) -> Vec<Bracket>
where
    F: Fn(f64) -> Result<f64, EphemError>,
{
    let mut brackets = Vec::new();
    let mut prev: Option<(f64, f64)> = None;

    let mut t = jd_start;
    loop {
        match f(t) {
            Ok(v) => {
                let d = deviation(v, target, wrap);
                if let Some((t_prev, d_prev)) = prev
                    && is_genuine_crossing(d_prev, d, wrap)
                {
                    brackets.push(Bracket {
                        lo_jd: t_prev,
                        hi_jd: t,
                        lo_dev: d_prev,
                        hi_dev: d,
                    });
                }
                prev = Some((t, d));
            }
            Err(e) => {
                log::debug!("sample skipped at JD {t}: {e}");
                prev = None;
            }
        }

        if t >= jd_end {
            break;
        }
        t = (t + step_days).min(jd_end);
    }

    brackets
}

/// Metric-backed wrapper around [`scan_crossings`], coarse tier.
pub fn find_crossing_brackets(
    provider: &Provider,
    metric: Metric,
    target: f64,
    jd_start: f64,
    jd_end: f64,
    step_days: f64,
) -> Vec<Bracket> {
    let f = |jd: f64| metric.eval(provider, jd, PositionModel::Geometric);
    scan_crossings(&f, target, metric.wrap(), jd_start, jd_end, step_days)
}

/// Scan for changes of the integer state `floor(value / state_width)`.
///
/// `f` must be angle-valued in [0, 360); the number of states is
/// `360 / state_width`. The reported boundary is the edge the value moved
/// across, wrap-aware in both directions (a retrograde body re-entering
/// the previous sign crosses the same edge downward).
pub fn scan_state_changes<F>(
    f: &F,
    state_width_deg: f64,
    jd_start: f64,
    jd_end: f64,
    step_days: f64,
) -> Vec<StateChange>
where
    F: Fn(f64) -> Result<f64, EphemError>,
{
    let n_states = (360.0 / state_width_deg).round() as i32;
    let mut changes = Vec::new();
    let mut prev: Option<(f64, i32)> = None;

    let mut t = jd_start;
    loop {
        match f(t) {
            Ok(v) => {
                let state = (v.rem_euclid(360.0) / state_width_deg).floor() as i32 % n_states;
                if let Some((t_prev, s_prev)) = prev
                    && state != s_prev
                {
                    // Signed state delta on the cycle, in (-n/2, n/2].
                    let mut delta = (state - s_prev).rem_euclid(n_states);
                    if delta > n_states / 2 {
                        delta -= n_states;
                    }
                    let boundary_state = if delta > 0 { state } else { s_prev };
                    changes.push(StateChange {
                        lo_jd: t_prev,
                        hi_jd: t,
                        old_state: s_prev,
                        new_state: state,
                        boundary_deg: (boundary_state as f64 * state_width_deg).rem_euclid(360.0),
                    });
                }
                prev = Some((t, state));
            }
            Err(e) => {
                log::debug!("sample skipped at JD {t}: {e}");
                prev = None;
            }
        }

        if t >= jd_end {
            break;
        }
        t = (t + step_days).min(jd_end);
    }

    changes
}

/// Metric-backed wrapper around [`scan_state_changes`], coarse tier.
pub fn find_state_changes(
    provider: &Provider,
    metric: Metric,
    state_width_deg: f64,
    jd_start: f64,
    jd_end: f64,
    step_days: f64,
) -> Vec<StateChange> {
    let f = |jd: f64| metric.eval(provider, jd, PositionModel::Geometric);
    scan_state_changes(&f, state_width_deg, jd_start, jd_end, step_days)
}
