#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Classified incident records and the relevance zone taxonomy.
//!
//! Incidents arrive already classified by an upstream LLM pass (type,
//! severity, extracted location, confidence). This crate defines those
//! records, the weight tables the risk engine applies to them, and the
//! zone types the relevance classifier attaches.

pub mod date;
pub mod zone;

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

pub use date::{epoch_sentinel, parse_incident_date, try_parse_incident_date};
pub use zone::{Relevance, RelevanceZone, RouteZone, Zone};

/// Weight applied to incident types and severities the engine does not
/// recognize. Sits at the midpoint so unknown categories neither inflate
/// nor suppress the score.
pub const UNRECOGNIZED_WEIGHT: f64 = 0.5;

/// The incident type assigned by the upstream classifier.
///
/// Strings outside the fixed taxonomy are preserved in
/// [`IncidentType::Unrecognized`] so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IncidentType {
    /// Abduction, including ransom kidnappings
    Kidnapping,
    /// Armed or unarmed robbery
    Robbery,
    /// Violent attack on people or property
    Attack,
    /// Bombing, insurgent or terrorist activity
    Terrorism,
    /// Clashes between rival cult groups
    CultClash,
    /// Road or industrial accident
    Accident,
    /// Protests, riots and civil unrest
    Unrest,
    /// Anything the classifier could not place elsewhere
    OtherIncident,
    /// A type string not in the taxonomy
    #[strum(default)]
    Unrecognized(String),
}

impl IncidentType {
    /// Returns the risk weight for this incident type.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Kidnapping | Self::Terrorism => 1.0,
            Self::Attack => 0.9,
            Self::CultClash => 0.8,
            Self::Robbery => 0.7,
            Self::Unrest => 0.6,
            Self::Accident | Self::OtherIncident => 0.5,
            Self::Unrecognized(_) => UNRECOGNIZED_WEIGHT,
        }
    }

    /// Returns the wire name of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kidnapping => "kidnapping",
            Self::Robbery => "robbery",
            Self::Attack => "attack",
            Self::Terrorism => "terrorism",
            Self::CultClash => "cult_clash",
            Self::Accident => "accident",
            Self::Unrest => "unrest",
            Self::OtherIncident => "other_incident",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Every recognized variant.
    pub const ALL: &'static [Self] = &[
        Self::Kidnapping,
        Self::Robbery,
        Self::Attack,
        Self::Terrorism,
        Self::CultClash,
        Self::Accident,
        Self::Unrest,
        Self::OtherIncident,
    ];

    /// Returns every recognized variant.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        Self::ALL
    }
}

impl From<String> for IncidentType {
    fn from(value: String) -> Self {
        // `#[strum(default)]` makes parsing infallible
        value
            .trim()
            .parse()
            .unwrap_or(Self::Unrecognized(value))
    }
}

impl From<IncidentType> for String {
    fn from(value: IncidentType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident severity assigned by the upstream classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IncidentSeverity {
    /// One or more deaths
    Fatal,
    /// Serious injuries or large-scale harm
    Serious,
    /// Limited harm
    Moderate,
    /// Little or no harm
    Minor,
    /// The classifier could not tell
    Unknown,
    /// A severity string not in the taxonomy
    #[strum(default)]
    Unrecognized(String),
}

impl IncidentSeverity {
    /// Returns the risk weight for this severity.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Fatal => 1.0,
            Self::Serious => 0.7,
            Self::Moderate => 0.4,
            Self::Minor => 0.2,
            Self::Unknown => 0.5,
            Self::Unrecognized(_) => UNRECOGNIZED_WEIGHT,
        }
    }

    /// Whether this severity counts as high severity (fatal or serious).
    #[must_use]
    pub const fn is_high(&self) -> bool {
        matches!(self, Self::Fatal | Self::Serious)
    }

    /// Returns the wire name of this severity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fatal => "fatal",
            Self::Serious => "serious",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
            Self::Unknown => "unknown",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Every recognized variant, most severe first.
    pub const ALL: &'static [Self] = &[
        Self::Fatal,
        Self::Serious,
        Self::Moderate,
        Self::Minor,
        Self::Unknown,
    ];

    /// Returns every recognized variant, most severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        Self::ALL
    }
}

impl From<String> for IncidentSeverity {
    fn from(value: String) -> Self {
        value
            .trim()
            .parse()
            .unwrap_or(Self::Unrecognized(value))
    }
}

impl From<IncidentSeverity> for String {
    fn from(value: IncidentSeverity) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incident as produced by the upstream LLM classification service.
///
/// The engine never mutates these; classification returns copies with
/// [`ClassifiedIncident::relevance`] attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIncident {
    /// Original news headline.
    pub headline: String,
    /// Short factual notification line.
    #[serde(default)]
    pub notification: String,
    /// Incident type.
    pub incident_type: IncidentType,
    /// Incident severity.
    pub severity: IncidentSeverity,
    /// Free-text location extracted from the headline, if any.
    #[serde(default)]
    pub location: Option<String>,
    /// Classifier confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    /// Compact date, `YYYYMMDD` or `YYYYMMDDHHMMSS`.
    pub date: String,
    /// Source article URL.
    #[serde(default)]
    pub source_url: String,
    /// Relevance attached by the classifier, `None` until classified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<Relevance>,
}

impl ClassifiedIncident {
    /// Returns a copy of this incident with the given relevance attached.
    #[must_use]
    pub fn with_relevance(&self, relevance: Relevance) -> Self {
        Self {
            relevance: Some(relevance),
            ..self.clone()
        }
    }

    /// Returns the location if present and not blank.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_weights_are_pinned() {
        assert!((IncidentType::Kidnapping.weight() - 1.0).abs() < f64::EPSILON);
        assert!((IncidentType::Terrorism.weight() - 1.0).abs() < f64::EPSILON);
        assert!((IncidentType::Attack.weight() - 0.9).abs() < f64::EPSILON);
        assert!((IncidentType::CultClash.weight() - 0.8).abs() < f64::EPSILON);
        assert!((IncidentType::Robbery.weight() - 0.7).abs() < f64::EPSILON);
        assert!((IncidentType::Unrest.weight() - 0.6).abs() < f64::EPSILON);
        assert!((IncidentType::Accident.weight() - 0.5).abs() < f64::EPSILON);
        assert!((IncidentType::OtherIncident.weight() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn severity_weights_are_pinned() {
        let expected = [1.0, 0.7, 0.4, 0.2, 0.5];
        for (severity, weight) in IncidentSeverity::all().iter().zip(expected) {
            assert!(
                (severity.weight() - weight).abs() < f64::EPSILON,
                "{severity} weight {} != {weight}",
                severity.weight()
            );
        }
    }

    #[test]
    fn unrecognized_strings_fall_back_to_midpoint() {
        let kind = IncidentType::from("piracy".to_string());
        assert_eq!(kind, IncidentType::Unrecognized("piracy".to_string()));
        assert!((kind.weight() - UNRECOGNIZED_WEIGHT).abs() < f64::EPSILON);

        let severity = IncidentSeverity::from("catastrophic".to_string());
        assert!((severity.weight() - UNRECOGNIZED_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            IncidentType::from("Cult_Clash".to_string()),
            IncidentType::CultClash
        );
        assert_eq!(
            IncidentSeverity::from(" FATAL ".to_string()),
            IncidentSeverity::Fatal
        );
    }

    #[test]
    fn deserializes_incident_without_relevance() {
        let json = r#"{
            "headline": "Gunmen abduct traveller near Lekki",
            "incident_type": "kidnapping",
            "severity": "serious",
            "location": "Lekki Phase 1",
            "confidence": 0.9,
            "date": "20260110"
        }"#;
        let incident: ClassifiedIncident = serde_json::from_str(json).unwrap();
        assert_eq!(incident.incident_type, IncidentType::Kidnapping);
        assert_eq!(incident.severity, IncidentSeverity::Serious);
        assert_eq!(incident.location(), Some("Lekki Phase 1"));
        assert!(incident.relevance.is_none());

        let out = serde_json::to_value(&incident).unwrap();
        assert_eq!(out["incident_type"], "kidnapping");
        assert!(out.get("relevance").is_none());
    }

    #[test]
    fn blank_location_is_none() {
        let incident = ClassifiedIncident {
            headline: String::new(),
            notification: String::new(),
            incident_type: IncidentType::Robbery,
            severity: IncidentSeverity::Minor,
            location: Some("   ".to_string()),
            confidence: 0.5,
            date: "20260101".to_string(),
            source_url: String::new(),
            relevance: None,
        };
        assert_eq!(incident.location(), None);
    }
}
