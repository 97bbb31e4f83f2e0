//! Parallel fan-out across event categories.
//!
//! Every category search is pure apart from read-only provider access,
//! so categories run as independent tasks on a worker pool. One failing
//! category is reported and never aborts its siblings. Results merge by
//! concatenation, then a stable start-time sort and the deduplicator
//! produce the final ordered list.

use astrocal_ephem::{Body, Provider};
use rayon::prelude::*;

use crate::almanac::{AlmanacConfig, search_almanac};
use crate::aspect::{AspectConfig, search_aspects};
use crate::dedup::dedup_events;
use crate::eclipse::{EclipseConfig, search_eclipses};
use crate::error::SearchError;
use crate::event::{Event, EventKind, sort_events};
use crate::ingress::{IngressConfig, search_ingresses};
use crate::moonfeat::{MoonFeatureConfig, search_moon_features};
use crate::pattern::square_trine_patterns;
use crate::phase::search_moon_phases;
use crate::progress::{calendar_year_events, solar_year_events};
use crate::refine::RefineConfig;
use crate::season::search_seasons;
use crate::station::{StationConfig, search_stations};
use crate::support::SearchSpan;

/// Independently runnable event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Eclipses,
    Aspects,
    Almanac,
    Retrograde,
    Seasons,
    MoonFeatures,
    ZodiacIngress,
    MoonPhases,
    YearProgress,
    Patterns,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Eclipses,
        Category::Aspects,
        Category::Almanac,
        Category::Retrograde,
        Category::Seasons,
        Category::MoonFeatures,
        Category::ZodiacIngress,
        Category::MoonPhases,
        Category::YearProgress,
        Category::Patterns,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Eclipses => "eclipses",
            Self::Aspects => "aspects",
            Self::Almanac => "almanac",
            Self::Retrograde => "retrograde",
            Self::Seasons => "seasons",
            Self::MoonFeatures => "moon_features",
            Self::ZodiacIngress => "zodiac_ingress",
            Self::MoonPhases => "moon_phases",
            Self::YearProgress => "year_progress",
            Self::Patterns => "patterns",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name.trim().to_ascii_lowercase())
    }
}

/// Full run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub year_start: i32,
    pub year_end: i32,
    pub categories: Vec<Category>,
    pub aspect: AspectConfig,
    /// Repeat the aspect sweep heliocentrically, as the original did.
    pub heliocentric_aspects: bool,
    pub ingress: IngressConfig,
    pub station: StationConfig,
    pub moon_features: MoonFeatureConfig,
    pub eclipse: EclipseConfig,
    /// Site-bound almanac events; skipped when no site is configured.
    pub almanac: Option<AlmanacConfig>,
    pub refine: RefineConfig,
}

impl RunConfig {
    /// Defaults mirroring the original generator's config file.
    pub fn for_years(year_start: i32, year_end: i32) -> Self {
        Self {
            year_start,
            year_end,
            categories: Category::ALL.to_vec(),
            aspect: AspectConfig::geocentric(vec![
                Body::Mars,
                Body::Jupiter,
                Body::Saturn,
                Body::Venus,
            ]),
            heliocentric_aspects: true,
            ingress: IngressConfig::all_bodies(),
            station: StationConfig::all_planets(),
            moon_features: MoonFeatureConfig::default(),
            eclipse: EclipseConfig::default(),
            almanac: None,
            refine: RefineConfig::default(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.year_end < self.year_start {
            return Err("year_end must not precede year_start");
        }
        Ok(())
    }
}

/// One category's failure, isolated from its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub category: Category,
    pub message: String,
}

/// Merged output of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// All surviving events, start-time sorted and deduplicated.
    pub events: Vec<Event>,
    pub failures: Vec<TaskFailure>,
}

/// Run every configured category and merge the results.
pub fn run(provider: &Provider, config: &RunConfig) -> Result<RunReport, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    let span = SearchSpan::years(config.year_start, config.year_end);

    // Patterns post-process the aspect output, so they are not an
    // independent task; everything else fans out.
    let parallel: Vec<Category> = config
        .categories
        .iter()
        .copied()
        .filter(|&c| c != Category::Patterns)
        .collect();

    let results: Vec<(Category, Result<Vec<Event>, SearchError>)> = parallel
        .par_iter()
        .map(|&category| (category, run_category(provider, config, &span, category)))
        .collect();

    let mut events = Vec::new();
    let mut failures = Vec::new();
    for (category, result) in results {
        match result {
            Ok(mut list) => events.append(&mut list),
            Err(e) => {
                log::error!("category {} failed: {e}", category.name());
                failures.push(TaskFailure {
                    category,
                    message: e.to_string(),
                });
            }
        }
    }

    if config.categories.contains(&Category::Patterns) {
        let aspect_events: Vec<Event> = events
            .iter()
            .filter(|e| e.kind == EventKind::Aspect && !e.summary.ends_with("(Helio)"))
            .cloned()
            .collect();
        events.extend(square_trine_patterns(&aspect_events));
    }

    sort_events(&mut events);
    let events = dedup_events(events);

    Ok(RunReport { events, failures })
}

fn run_category(
    provider: &Provider,
    config: &RunConfig,
    span: &SearchSpan,
    category: Category,
) -> Result<Vec<Event>, SearchError> {
    match category {
        Category::Eclipses => search_eclipses(provider, &config.eclipse, span),
        Category::Aspects => {
            let mut events = search_aspects(provider, &config.aspect, span)?;
            if config.heliocentric_aspects {
                let helio = AspectConfig {
                    center: astrocal_ephem::Center::Sun,
                    ..config.aspect.clone()
                };
                events.extend(search_aspects(provider, &helio, span)?);
            }
            Ok(events)
        }
        Category::Almanac => match &config.almanac {
            Some(almanac) => search_almanac(provider, almanac, span),
            None => Ok(Vec::new()),
        },
        Category::Retrograde => search_stations(provider, &config.station, span),
        Category::Seasons => search_seasons(provider, &config.refine, span),
        Category::MoonFeatures => search_moon_features(provider, &config.moon_features, span),
        Category::ZodiacIngress => search_ingresses(provider, &config.ingress, span),
        Category::MoonPhases => search_moon_phases(provider, &config.refine, span),
        Category::YearProgress => {
            let mut events = calendar_year_events(span);
            events.extend(solar_year_events(provider, &config.refine, span)?);
            Ok(events)
        }
        Category::Patterns => Ok(Vec::new()),
    }
}
