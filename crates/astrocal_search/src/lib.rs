//! Celestial event detection engine: aspects, zodiac ingresses,
//! retrograde stations and shadow exits, lunar nodes and standstills,
//! moon phases, eclipses, seasons, rise/set almanac, and year-progress
//! markers.
//!
//! The core is a generic root-refinement pipeline shared by every
//! category: a scalar metric of time is sampled coarsely to bracket sign
//! changes, each bracket is bisected on the precise provider tier, and
//! window-bounded events get orb entry/exit boundaries from a capped
//! outward search. A post-pass deduplicates near-coincident detections.

pub mod almanac;
pub mod aspect;
pub mod dedup;
pub mod eclipse;
pub mod error;
pub mod event;
pub mod ingress;
pub mod metric;
pub mod moonfeat;
pub mod pattern;
pub mod phase;
pub mod progress;
pub mod refine;
pub mod run;
pub mod scan;
pub mod season;
pub mod station;
pub mod support;
pub mod window;

pub use almanac::{AlmanacConfig, search_almanac};
pub use aspect::{Aspect, AspectConfig, search_aspects};
pub use dedup::{dedup_events, min_separation_minutes};
pub use eclipse::{EclipseConfig, search_eclipses};
pub use error::SearchError;
pub use event::{Event, EventKind, sort_events};
pub use ingress::{IngressConfig, ZODIAC_SIGNS, search_ingresses};
pub use metric::{Metric, Site, Wrap, deviation, normalize_pm180};
pub use moonfeat::{MoonFeatureConfig, search_moon_features};
pub use pattern::square_trine_patterns;
pub use phase::{PHASE_NAMES, PhaseInstant, phase_instants, search_moon_phases};
pub use progress::{calendar_year_events, solar_year_events};
pub use refine::{RefineConfig, bisect_fn, refine_bracket};
pub use run::{Category, RunConfig, RunReport, TaskFailure, run};
pub use scan::{
    Bracket, StateChange, find_crossing_brackets, find_state_changes, scan_crossings,
    scan_state_changes,
};
pub use season::{SeasonInstant, search_seasons, season_instants};
pub use station::{StationConfig, search_stations};
pub use support::SearchSpan;
pub use window::{Window, WindowConfig, find_orb_window, forward_crossing, orb_window};
