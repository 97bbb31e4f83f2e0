//! Run-control configuration: a TOML file mirroring the original
//! generator's config module, with CLI flags layered on top.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use astrocal_ephem::Body;
use astrocal_search::{AlmanacConfig, Aspect, Category, IngressConfig, RunConfig, Site};

/// On-disk configuration file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct FileConfig {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// `ics` or `json`.
    pub output_mode: Option<String>,
    pub output_dir: Option<String>,
    /// Category names; unset means all.
    pub categories: Option<Vec<String>>,
    pub aspect_orb: Option<f64>,
    /// Bodies swept for aspects.
    pub conjunction_planets: Option<Vec<String>>,
    pub aspects_to_track: Option<Vec<String>>,
    pub heliocentric_aspects: Option<bool>,
    pub almanac_bodies: Option<Vec<String>>,
    pub observer: Option<ObserverConfig>,
}

/// Observer site block.
#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

impl FileConfig {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Resolve body names, warning on (and skipping) unknown ones.
pub fn resolve_bodies(names: &[String]) -> Vec<Body> {
    let mut bodies = Vec::new();
    for name in names {
        match Body::from_name(name) {
            Some(body) => bodies.push(body),
            None => log::warn!("unknown body '{name}' skipped"),
        }
    }
    bodies
}

fn resolve_aspects(names: &[String]) -> Vec<Aspect> {
    let mut aspects = Vec::new();
    for name in names {
        match Aspect::from_name(name) {
            Some(aspect) => aspects.push(aspect),
            None => log::warn!("unknown aspect '{name}' skipped"),
        }
    }
    aspects
}

fn resolve_categories(names: &[String]) -> Result<Vec<Category>> {
    let mut categories = Vec::new();
    for name in names {
        match Category::from_name(name) {
            Some(c) => categories.push(c),
            None => bail!("unknown category '{name}'"),
        }
    }
    Ok(categories)
}

/// Build the engine configuration from the file settings.
pub fn build_run_config(file: &FileConfig, year_start: i32, year_end: i32) -> Result<RunConfig> {
    let mut config = RunConfig::for_years(year_start, year_end);

    if let Some(names) = &file.categories {
        config.categories = resolve_categories(names)?;
    }
    if let Some(orb) = file.aspect_orb {
        config.aspect.orb_deg = orb;
    }
    if let Some(names) = &file.conjunction_planets {
        config.aspect.bodies = resolve_bodies(names);
    }
    if let Some(names) = &file.aspects_to_track {
        config.aspect.aspects = resolve_aspects(names);
    }
    if let Some(helio) = file.heliocentric_aspects {
        config.heliocentric_aspects = helio;
    }
    // The almanac body list also drives the ingress sweep, as in the
    // original generator.
    if let Some(names) = &file.almanac_bodies {
        config.ingress = IngressConfig {
            bodies: resolve_bodies(names),
            ..IngressConfig::all_bodies()
        };
    }
    if let Some(observer) = &file.observer {
        let site = Site {
            latitude_deg: observer.latitude,
            longitude_deg: observer.longitude,
        };
        let bodies = file
            .almanac_bodies
            .as_deref()
            .map(resolve_bodies)
            .unwrap_or_else(|| IngressConfig::all_bodies().bodies);
        let name = observer.name.clone().unwrap_or_else(|| "Local Location".into());
        config.almanac = Some(AlmanacConfig::new(bodies, site, name));
    }

    Ok(config)
}

/// Pick the aspect sweep center list for logging.
pub fn describe_config(config: &RunConfig) -> String {
    format!(
        "{}–{}, {} categories, orb {}°",
        config.year_start,
        config.year_end,
        config.categories.len(),
        config.aspect.orb_deg
    )
}
