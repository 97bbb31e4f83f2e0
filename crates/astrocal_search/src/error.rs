//! Search engine errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

use astrocal_ephem::EphemError;

/// Errors surfaced by the search engine.
///
/// Single-evaluation provider failures are recovered locally (skipped
/// samples, abandoned brackets) and never reach this type; what remains
/// is misconfiguration and range-level provider failures.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    InvalidConfig(&'static str),
    Ephem(EphemError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Ephem(e) => write!(f, "ephemeris error: {e}"),
        }
    }
}

impl Error for SearchError {}

impl From<EphemError> for SearchError {
    fn from(e: EphemError) -> Self {
        Self::Ephem(e)
    }
}
