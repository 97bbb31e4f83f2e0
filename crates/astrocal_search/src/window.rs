//! Orb/duration window search around an exact crossing.
//!
//! Given an exact event time and a tolerance band, walks outward in
//! coarse steps until the absolute deviation exceeds the band, then
//! bisects the boundary to the refiner tolerance. The walk is capped;
//! when no boundary is found inside the cap the window degrades to a
//! zero-length interval at the exact time instead of searching forever.
//!
//! The same routine serves aspect orbs, eclipse contact thresholds, and
//! (through [`forward_crossing`], which drops the absolute value and
//! keeps the crossing direction) the retrograde shadow-exit search.

use astrocal_ephem::{EphemError, PositionModel, Provider};

use crate::metric::{Metric, Wrap, deviation};
use crate::refine::RefineConfig;

/// Window search control knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    /// Outward step; hours for fast metrics, days for slow aspects.
    pub step_days: f64,
    /// Cap on outward steps in each direction.
    pub max_steps: u32,
    /// Tolerance of the boundary bisection.
    pub refine: RefineConfig,
}

impl WindowConfig {
    /// The original generator's aspect setting: 4-hour steps, ~33 days.
    pub fn aspect_orb() -> Self {
        Self {
            step_days: 4.0 / 24.0,
            max_steps: 200,
            refine: RefineConfig::default(),
        }
    }

    /// Eclipse contact setting: 10-minute steps, ~33 hours.
    pub fn eclipse_contact() -> Self {
        Self {
            step_days: 10.0 / 1440.0,
            max_steps: 200,
            refine: RefineConfig::default(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if self.max_steps == 0 {
            return Err("max_steps must be > 0");
        }
        self.refine.validate()
    }
}

/// An entry/exit window around an exact crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub entry_jd: f64,
    pub exit_jd: f64,
    /// False when either boundary search exhausted its cap and the
    /// window collapsed to the exact time (degraded, not failed).
    pub bounded: bool,
}

/// Find where `|f − target|` rises through `orb` on both sides of `t_exact`.
pub fn orb_window<F>(
    f: &F,
    target: f64,
    wrap: Wrap,
    orb: f64,
    t_exact: f64,
    config: &WindowConfig,
) -> Window
where
    F: Fn(f64) -> Result<f64, EphemError>,
{
    let g = |jd: f64| -> Result<f64, EphemError> {
        Ok(deviation(f(jd)?, target, wrap).abs() - orb)
    };

    let entry = boundary_search(&g, t_exact, -config.step_days, config);
    let exit = boundary_search(&g, t_exact, config.step_days, config);

    Window {
        entry_jd: entry.unwrap_or(t_exact),
        exit_jd: exit.unwrap_or(t_exact),
        bounded: entry.is_some() && exit.is_some(),
    }
}

/// Metric-backed wrapper around [`orb_window`], precise tier.
pub fn find_orb_window(
    provider: &Provider,
    metric: Metric,
    target: f64,
    orb: f64,
    t_exact: f64,
    config: &WindowConfig,
) -> Window {
    let f = |jd: f64| metric.eval(provider, jd, PositionModel::Apparent);
    orb_window(&f, target, metric.wrap(), orb, t_exact, config)
}

/// Walk outward from `t0` in signed steps until `g` turns positive, then
/// bisect the transition. `None` when the cap is hit or evaluation fails.
fn boundary_search<G>(g: &G, t0: f64, signed_step: f64, config: &WindowConfig) -> Option<f64>
where
    G: Fn(f64) -> Result<f64, EphemError>,
{
    let mut t_inside = t0;
    for _ in 0..config.max_steps {
        let t_outside = t_inside + signed_step;
        match g(t_outside) {
            Ok(v) if v > 0.0 => {
                // Bisect g's sign change between inside and outside.
                let (lo, hi) = if t_inside < t_outside {
                    (t_inside, t_outside)
                } else {
                    (t_outside, t_inside)
                };
                return bisect_boundary(g, lo, hi, &config.refine);
            }
            Ok(_) => t_inside = t_outside,
            Err(e) => {
                log::debug!("window step failed at JD {t_outside}: {e}");
                return None;
            }
        }
    }
    None
}

fn bisect_boundary<G>(g: &G, mut lo: f64, mut hi: f64, config: &RefineConfig) -> Option<f64>
where
    G: Fn(f64) -> Result<f64, EphemError>,
{
    let mut g_lo = g(lo).ok()?;
    for _ in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let g_mid = g(mid).ok()?;
        if g_lo * g_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            g_lo = g_mid;
        }
        if (hi - lo).abs() < config.tolerance_days {
            break;
        }
    }
    Some(0.5 * (lo + hi))
}

/// First time after `t_start` where `f − target` crosses from below to
/// at-or-above zero, within `max_days`. The directional variant of the
/// window search: the sign matters, not the absolute deviation.
pub fn forward_crossing<F>(
    f: &F,
    target: f64,
    wrap: Wrap,
    t_start: f64,
    step_days: f64,
    max_days: f64,
    refine: &RefineConfig,
) -> Option<f64>
where
    F: Fn(f64) -> Result<f64, EphemError>,
{
    let d_at = |jd: f64| -> Result<f64, EphemError> { Ok(deviation(f(jd)?, target, wrap)) };

    let steps = (max_days / step_days).ceil() as u32;
    let mut t_prev = t_start;
    let mut d_prev = d_at(t_prev).ok()?;

    for _ in 0..steps {
        let t_curr = t_prev + step_days;
        let d_curr = d_at(t_curr).ok()?;
        if d_prev < 0.0 && d_curr >= 0.0 {
            return bisect_boundary(&d_at, t_prev, t_curr, refine);
        }
        t_prev = t_curr;
        d_prev = d_curr;
    }
    None
}
