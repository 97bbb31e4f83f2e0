//! astrocal: generate astronomical event calendars.

mod config;
mod export;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use astrocal_ephem::Provider;
use astrocal_search::{Category, run};

use config::{FileConfig, build_run_config, describe_config};

#[derive(Parser)]
#[command(name = "astrocal", about = "Astronomical event calendar generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect events and export them as ICS calendars or JSON
    Generate {
        /// First year of the interval (defaults from config file)
        #[arg(long)]
        start_year: Option<i32>,
        /// Last year, inclusive
        #[arg(long)]
        end_year: Option<i32>,
        /// Output mode: ics or json
        #[arg(long)]
        output: Option<String>,
        /// Directory for ICS files / JSON document
        #[arg(long, default_value = "ics_calendars")]
        out_dir: PathBuf,
        /// TOML run-control file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the available event categories
    Categories,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            start_year,
            end_year,
            output,
            out_dir,
            config,
        } => generate(start_year, end_year, output, out_dir, config),
        Commands::Categories => {
            for category in Category::ALL {
                println!("{}", category.name());
            }
            Ok(())
        }
    }
}

fn generate(
    start_year: Option<i32>,
    end_year: Option<i32>,
    output: Option<String>,
    out_dir: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let file = match &config_path {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let year_start = start_year
        .or(file.start_year)
        .context("start year required (flag or config file)")?;
    let year_end = end_year.or(file.end_year).unwrap_or(year_start);
    let output_mode = output
        .or_else(|| file.output_mode.clone())
        .unwrap_or_else(|| "ics".into());

    let run_config = build_run_config(&file, year_start, year_end)?;
    log::info!("generating events: {}", describe_config(&run_config));

    let provider = Provider::new();
    let report = run(&provider, &run_config)?;

    for failure in &report.failures {
        log::error!(
            "category {} failed: {}",
            failure.category.name(),
            failure.message
        );
    }
    log::info!("total events generated: {}", report.events.len());

    match output_mode.as_str() {
        "json" => {
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;
            let path = out_dir.join("events.json");
            export::write_json(&path, &report.events)?;
            log::info!("wrote {} events to {}", report.events.len(), path.display());
        }
        "ics" => {
            let groups = export::group_by_calendar(&report.events);
            for (calendar, events) in &groups {
                let path = export::write_ics(&out_dir, calendar, events)?;
                log::info!("exported {} events to {}", events.len(), path.display());
            }
        }
        other => bail!("unknown output mode '{other}' (expected 'ics' or 'json')"),
    }

    if !report.failures.is_empty() {
        bail!("{} categories failed", report.failures.len());
    }
    Ok(())
}
