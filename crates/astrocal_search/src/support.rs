//! Shared helpers for the category searches.

use chrono::{DateTime, Utc};

use astrocal_time::{jd_tt_to_utc, year_start_jd};

/// The queried year interval in both time representations.
///
/// Category scans may look beyond the span (shadow-exit pairing, solar
/// year lookahead) but emitted events must start inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSpan {
    pub year_start: i32,
    pub year_end: i32,
    pub jd_start: f64,
    pub jd_end: f64,
}

impl SearchSpan {
    /// Inclusive year range, `[Jan 1 year_start, Jan 1 year_end+1)`.
    pub fn years(year_start: i32, year_end: i32) -> Self {
        Self {
            year_start,
            year_end,
            jd_start: year_start_jd(year_start),
            jd_end: year_start_jd(year_end + 1),
        }
    }

    pub fn contains_jd(&self, jd_tt: f64) -> bool {
        jd_tt >= self.jd_start && jd_tt < self.jd_end
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        jd_tt_to_utc(self.jd_start)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        jd_tt_to_utc(self.jd_end)
    }
}

/// Title-case a lowercase body name for summaries.
pub(crate) fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
