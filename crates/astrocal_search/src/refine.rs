//! Interval bisection on the precise tier.
//!
//! Maintains the invariant that the deviation changes sign (or has hit
//! numerical zero) across the bracket; each step halves the width. The
//! iteration budget alone already reaches sub-second precision on
//! day-scale brackets, and the absolute tolerance stops earlier when met.

use astrocal_ephem::{EphemError, PositionModel, Provider};

use crate::metric::{Metric, Wrap, deviation};
use crate::scan::Bracket;

/// Bisection control knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Iteration budget (50 halvings of a 1-day bracket ≪ 1 ms).
    pub max_iterations: u32,
    /// Absolute bracket-width tolerance in days.
    pub tolerance_days: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance_days: 1e-8,
        }
    }
}

impl RefineConfig {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        if !self.tolerance_days.is_finite() || self.tolerance_days <= 0.0 {
            return Err("tolerance_days must be positive");
        }
        Ok(())
    }
}

/// Bisect a sign change of `f − target` inside `[lo, hi]`.
///
/// Returns the midpoint of the final bracket. Exhausting the iteration
/// budget is not an error — the current midpoint is the best available
/// answer and is returned as such. An evaluation failure fails closed:
/// the bracket is abandoned (`None`) rather than poisoning the batch.
pub fn bisect_fn<F>(
    f: &F,
    target: f64,
    wrap: Wrap,
    mut lo: f64,
    mut hi: f64,
    config: &RefineConfig,
) -> Option<f64>
where
    F: Fn(f64) -> Result<f64, EphemError>,
{
    let mut d_lo = deviation(f(lo).ok()?, target, wrap);

    for _ in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let d_mid = deviation(f(mid).ok()?, target, wrap);

        if d_lo * d_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            d_lo = d_mid;
        }

        if (hi - lo).abs() < config.tolerance_days {
            break;
        }
    }

    Some(0.5 * (lo + hi))
}

/// Refine a coarse bracket with precise-tier evaluations of `metric`.
pub fn refine_bracket(
    provider: &Provider,
    metric: Metric,
    target: f64,
    bracket: &Bracket,
    config: &RefineConfig,
) -> Option<f64> {
    let f = |jd: f64| metric.eval(provider, jd, PositionModel::Apparent);
    bisect_fn(&f, target, metric.wrap(), bracket.lo_jd, bracket.hi_jd, config)
}
