#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared plumbing for the `safepath` binary: configuration, incident
//! input, reference-time parsing and the combined briefing document.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use safepath_incident_models::{ClassifiedIncident, try_parse_incident_date};
use safepath_relevance::{RelevanceClassifier, classify_incidents};
use safepath_risk::{compute_dynamic_risk, compute_risk_score, dynamic::DEFAULT_WINDOW_DAYS};
use safepath_risk_models::{AdvisoryLevel, DynamicRiskResult, RiskScoreResult};
use safepath_zones::{ZoneRegistry, ZoneRegistryError};
use serde::{Deserialize, Serialize};

/// Errors surfaced by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading a file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Reading standard input failed.
    #[error("Failed to read incidents from stdin: {0}")]
    Stdin(#[source] std::io::Error),
    /// Incident input or output was not valid JSON for the expected shape.
    #[error("Invalid incident JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The config file did not match [`CliConfig`].
    #[error("Invalid config {}: {source}", path.display())]
    Config {
        /// Config file
        path: PathBuf,
        /// Underlying parse error
        source: toml::de::Error,
    },
    /// The zone registry failed to load or validate.
    #[error(transparent)]
    Zones(#[from] ZoneRegistryError),
    /// `--now` was not a compact date.
    #[error("Invalid reference time '{0}': expected YYYYMMDD or YYYYMMDDHHMMSS")]
    InvalidNow(String),
    /// A static advisory level outside `low`, `moderate`, `high`, `very high`.
    #[error("Unknown advisory level '{0}': expected low, moderate, high, or very high")]
    UnknownAdvisoryLevel(String),
}

/// Optional settings read from a TOML file. Command-line flags take
/// precedence over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Dynamic adjustment window, in days.
    pub window_days: Option<u32>,
    /// Directory of extra zone registry files.
    pub zones_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the file cannot be read and
    /// [`CliError::Config`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, CliError> {
        toml::de::from_str(content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The window to use given an optional `--window-days` flag.
    #[must_use]
    pub fn window_days(&self, flag: Option<u32>) -> u32 {
        flag.or(self.window_days).unwrap_or(DEFAULT_WINDOW_DAYS)
    }

    /// The extra zones directory to use given an optional `--zones-dir` flag.
    #[must_use]
    pub fn zones_dir(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.zones_dir.clone())
    }
}

/// Parses a `--now` value.
///
/// # Errors
///
/// Returns [`CliError::InvalidNow`] unless the value is a valid compact
/// date. Unlike incident dates, a bad reference time is never defaulted.
pub fn parse_now(raw: &str) -> Result<NaiveDateTime, CliError> {
    try_parse_incident_date(raw).ok_or_else(|| CliError::InvalidNow(raw.to_string()))
}

/// Parses a static advisory level, case-insensitively.
///
/// # Errors
///
/// Returns [`CliError::UnknownAdvisoryLevel`] for anything else.
pub fn parse_static_level(raw: &str) -> Result<AdvisoryLevel, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::UnknownAdvisoryLevel(raw.to_string()))
}

/// Parses a JSON array of incidents.
///
/// # Errors
///
/// Returns [`CliError::Json`] if `json` is not an array of incidents.
pub fn parse_incidents(json: &str) -> Result<Vec<ClassifiedIncident>, CliError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads incidents from `input`, or from stdin when `None`.
///
/// # Errors
///
/// Returns [`CliError`] if reading or parsing fails.
pub fn read_incidents(input: Option<&Path>) -> Result<Vec<ClassifiedIncident>, CliError> {
    let json = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?,
        None => std::io::read_to_string(std::io::stdin()).map_err(CliError::Stdin)?,
    };

    let incidents = parse_incidents(&json)?;
    log::info!("Read {} incident(s)", incidents.len());
    Ok(incidents)
}

/// Serializes `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CliError::Json`] if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Everything a briefing needs about one area search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Briefing {
    /// Searched area.
    pub anchor: String,
    /// State of the searched area.
    pub state: String,
    /// Incidents with area relevance attached.
    pub incidents: Vec<ClassifiedIncident>,
    /// Composite score over the zoned incidents.
    pub risk: RiskScoreResult,
    /// Static advisory level adjusted by recent incidents.
    pub dynamic: DynamicRiskResult,
}

/// Classifies, scores and adjusts in one pass.
#[must_use]
pub fn build_briefing(
    registry: &ZoneRegistry,
    anchor: &str,
    state: &str,
    static_level: AdvisoryLevel,
    incidents: &[ClassifiedIncident],
    window_days: u32,
    now: NaiveDateTime,
) -> Briefing {
    if registry.state(state).is_none() {
        log::warn!("State '{state}' is not in the zone registry; only literal matches will count");
    }

    let classifier = RelevanceClassifier::new(registry);
    let zoned = classify_incidents(&classifier, anchor, state, incidents);
    let risk = compute_risk_score(&zoned, now);
    let dynamic = compute_dynamic_risk(static_level, &zoned, window_days, now);

    Briefing {
        anchor: anchor.to_string(),
        state: state.to_string(),
        incidents: zoned,
        risk,
        dynamic,
    }
}
