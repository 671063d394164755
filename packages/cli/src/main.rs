#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line driver for incident relevance and risk scoring.
//!
//! ```text
//! safepath classify --anchor lekki --state lagos [--input incidents.json]
//! safepath route --states lagos,ogun,oyo [--input incidents.json]
//! safepath score [--input zoned.json]
//! safepath dynamic --static-level moderate [--window-days 30] [--input zoned.json]
//! safepath brief --anchor lekki --state lagos --static-level moderate
//! safepath zones list
//! safepath zones validate
//! ```
//!
//! Incidents are a JSON array read from `--input` or stdin. Results are
//! written to stdout as JSON; logs go to stderr (`RUST_LOG`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use safepath_cli::{
    CliConfig, build_briefing, parse_now, parse_static_level, read_incidents, to_json,
};
use safepath_relevance::{RelevanceClassifier, classify_incidents, classify_incidents_for_route};
use safepath_risk::{compute_dynamic_risk, compute_risk_score};
use safepath_zones::ZoneRegistry;

#[derive(Parser)]
#[command(
    name = "safepath",
    about = "Classify incident relevance and score travel risk"
)]
struct Cli {
    /// Reference time as `YYYYMMDD` or `YYYYMMDDHHMMSS` (defaults to the current UTC time)
    #[arg(long, global = true)]
    now: Option<String>,
    /// Directory of extra zone registry TOML files
    #[arg(long, global = true)]
    zones_dir: Option<PathBuf>,
    /// TOML config file (`window_days`, `zones_dir`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach area relevance to incidents
    Classify {
        /// Searched area (e.g., "lekki")
        #[arg(long)]
        anchor: String,
        /// State of the searched area (e.g., "lagos")
        #[arg(long)]
        state: String,
        /// Incident JSON file (defaults to stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Attach route relevance to incidents
    Route {
        /// Comma-separated states in travel order (e.g., "lagos,ogun,oyo")
        #[arg(long, value_delimiter = ',', required = true)]
        states: Vec<String>,
        /// Incident JSON file (defaults to stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Compute the composite risk score of zoned incidents
    Score {
        /// Zoned incident JSON file (defaults to stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Adjust a static advisory level against recent incidents
    Dynamic {
        /// Baseline level: low, moderate, high, or "very high"
        #[arg(long)]
        static_level: String,
        /// Days of incidents to consider
        #[arg(long)]
        window_days: Option<u32>,
        /// Incident JSON file (defaults to stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Classify, score, and adjust in one pass
    Brief {
        /// Searched area (e.g., "lekki")
        #[arg(long)]
        anchor: String,
        /// State of the searched area (e.g., "lagos")
        #[arg(long)]
        state: String,
        /// Baseline level: low, moderate, high, or "very high"
        #[arg(long)]
        static_level: String,
        /// Days of incidents to consider
        #[arg(long)]
        window_days: Option<u32>,
        /// Incident JSON file (defaults to stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Inspect the zone registry
    Zones {
        #[command(subcommand)]
        command: ZonesCommand,
    },
}

#[derive(Subcommand)]
enum ZonesCommand {
    /// List states with their anchor and area counts
    List,
    /// Load the registry (including `--zones-dir`) and check its invariants
    Validate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let now = match &cli.now {
        Some(raw) => parse_now(raw)?,
        None => safepath_risk::utc_now(),
    };

    let zones_dir = config.zones_dir(cli.zones_dir);
    let registry = ZoneRegistry::load(zones_dir.as_deref())?;
    let classifier = RelevanceClassifier::new(&registry);

    match cli.command {
        Commands::Classify {
            anchor,
            state,
            input,
        } => {
            let incidents = read_incidents(input.as_deref())?;
            let zoned = classify_incidents(&classifier, &anchor, &state, &incidents);
            println!("{}", to_json(&zoned)?);
        }
        Commands::Route { states, input } => {
            let incidents = read_incidents(input.as_deref())?;
            let zoned = classify_incidents_for_route(&classifier, &states, &incidents);
            println!("{}", to_json(&zoned)?);
        }
        Commands::Score { input } => {
            let incidents = read_incidents(input.as_deref())?;
            if incidents.iter().any(|i| i.relevance.is_none()) {
                log::warn!("Some incidents have no relevance attached and will not be scored");
            }
            println!("{}", to_json(&compute_risk_score(&incidents, now))?);
        }
        Commands::Dynamic {
            static_level,
            window_days,
            input,
        } => {
            let static_level = parse_static_level(&static_level)?;
            let incidents = read_incidents(input.as_deref())?;
            let result = compute_dynamic_risk(
                static_level,
                &incidents,
                config.window_days(window_days),
                now,
            );
            println!("{}", to_json(&result)?);
        }
        Commands::Brief {
            anchor,
            state,
            static_level,
            window_days,
            input,
        } => {
            let static_level = parse_static_level(&static_level)?;
            let incidents = read_incidents(input.as_deref())?;
            let briefing = build_briefing(
                &registry,
                &anchor,
                &state,
                static_level,
                &incidents,
                config.window_days(window_days),
                now,
            );
            println!("{}", to_json(&briefing)?);
        }
        Commands::Zones { command } => match command {
            ZonesCommand::List => {
                println!("{:<10} {:<28} {:>7} {:>6}", "ID", "NAME", "ANCHORS", "AREAS");
                println!("{}", "-".repeat(54));
                for state in registry.states() {
                    println!(
                        "{:<10} {:<28} {:>7} {:>6}",
                        state.id,
                        state.name,
                        state.anchors.len(),
                        state.areas().count()
                    );
                }
            }
            ZonesCommand::Validate => {
                // `load` already validated; this reports what was checked.
                log::info!("Zone registry is valid");
                println!("OK: {} state(s)", registry.states().count());
            }
        },
    }

    Ok(())
}
