#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk score and dynamic adjustment result types.
//!
//! These are computed fresh on every call by the risk engine and handed
//! to the briefing generator; nothing here is persisted.

use std::collections::BTreeMap;

use safepath_incident_models::{IncidentType, RelevanceZone};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Upper bound (inclusive) of the `low` level.
pub const LOW_MAX_SCORE: f64 = 2.5;
/// Upper bound (inclusive) of the `moderate` level.
pub const MODERATE_MAX_SCORE: f64 = 4.5;
/// Upper bound (inclusive) of the `elevated` level.
pub const ELEVATED_MAX_SCORE: f64 = 6.5;

/// Discrete level of a composite risk score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    /// Score at or below 2.5
    Low,
    /// Score above 2.5, at or below 4.5
    Moderate,
    /// Score above 4.5, at or below 6.5
    Elevated,
    /// Score above 6.5
    High,
}

impl RiskLevel {
    /// Buckets a score. Boundary values belong to the lower level.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score <= LOW_MAX_SCORE {
            Self::Low
        } else if score <= MODERATE_MAX_SCORE {
            Self::Moderate
        } else if score <= ELEVATED_MAX_SCORE {
            Self::Elevated
        } else {
            Self::High
        }
    }
}

/// How much evidence stands behind a score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreConfidence {
    /// No relevant incidents
    Low,
    /// One or two relevant incidents
    Medium,
    /// Three or more relevant incidents
    High,
}

impl ScoreConfidence {
    /// Derives confidence from the number of geographically relevant
    /// incidents.
    #[must_use]
    pub const fn from_relevant_count(count: usize) -> Self {
        match count {
            0 => Self::Low,
            1 | 2 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// The five normalized score components, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    /// Zone-weighted incident count, saturating at five.
    pub volume: f64,
    /// Mean severity weight.
    pub severity: f64,
    /// Mean incident type weight.
    pub incident_type: f64,
    /// Mean exponential recency decay.
    pub recency: f64,
    /// Share of relevant incidents in the innermost zone.
    pub concentration: f64,
}

/// Diagnostic detail behind a [`RiskScoreResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    /// Incident count per zone, including zones that do not feed the score.
    pub zone_counts: BTreeMap<RelevanceZone, usize>,
    /// Incidents whose zone feeds the score.
    pub relevant_count: usize,
    /// Incidents with no relevance attached.
    pub unzoned_count: usize,
    /// Sum of relevance scores over relevant incidents.
    pub weighted_total: f64,
    /// Most frequent incident type among relevant incidents.
    pub dominant_type: Option<IncidentType>,
    /// Whether any relevant incident was fatal.
    pub has_fatality: bool,
    /// Component values before weighting.
    pub components: ScoreComponents,
}

/// Composite 1–10 risk score for a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScoreResult {
    /// Score in `[1.0, 10.0]`, rounded to one decimal.
    pub score: f64,
    /// Discrete level.
    pub level: RiskLevel,
    /// Evidence behind the score.
    pub confidence: ScoreConfidence,
    /// Label identifying the scoring method.
    pub methodology: String,
    /// Diagnostic breakdown.
    pub breakdown: RiskBreakdown,
}

/// A historically derived advisory level, as supplied by the caller and
/// as produced by the dynamic adjustment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum AdvisoryLevel {
    /// Low risk
    #[serde(rename = "low")]
    #[strum(serialize = "low")]
    Low,
    /// Moderate risk
    #[serde(rename = "moderate")]
    #[strum(serialize = "moderate")]
    Moderate,
    /// High risk
    #[serde(rename = "high")]
    #[strum(serialize = "high")]
    High,
    /// Very high risk
    #[serde(rename = "very high")]
    #[strum(to_string = "very high", serialize = "very_high")]
    VeryHigh,
}

/// Direction of recent incident activity relative to the baseline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Trend {
    /// Quiet period after a high baseline
    Improving,
    /// No change
    Stable,
    /// Recent activity warrants escalation
    Worsening,
}

/// The static advisory level re-evaluated against recent incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRiskResult {
    /// The supplied baseline level, echoed back.
    pub static_risk: AdvisoryLevel,
    /// The baseline after escalation rules.
    pub adjusted_risk: AdvisoryLevel,
    /// Whole days since the most recent in-window incident, if any.
    pub days_since_last_incident: Option<i64>,
    /// Activity trend.
    pub trend: Trend,
    /// User-facing explanation.
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries_belong_to_lower_bucket() {
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(2.5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(2.6), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(4.5), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(4.6), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(6.5), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(6.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(10.0), RiskLevel::High);
    }

    #[test]
    fn confidence_from_relevant_count() {
        assert_eq!(ScoreConfidence::from_relevant_count(0), ScoreConfidence::Low);
        assert_eq!(ScoreConfidence::from_relevant_count(1), ScoreConfidence::Medium);
        assert_eq!(ScoreConfidence::from_relevant_count(2), ScoreConfidence::Medium);
        assert_eq!(ScoreConfidence::from_relevant_count(3), ScoreConfidence::High);
    }

    #[test]
    fn advisory_level_wire_names() {
        assert_eq!("very high".parse::<AdvisoryLevel>().unwrap(), AdvisoryLevel::VeryHigh);
        assert_eq!("Very_High".parse::<AdvisoryLevel>().unwrap(), AdvisoryLevel::VeryHigh);
        assert_eq!("MODERATE".parse::<AdvisoryLevel>().unwrap(), AdvisoryLevel::Moderate);
        assert!("severe".parse::<AdvisoryLevel>().is_err());

        assert_eq!(AdvisoryLevel::VeryHigh.to_string(), "very high");
        assert_eq!(
            serde_json::to_value(AdvisoryLevel::VeryHigh).unwrap(),
            serde_json::json!("very high")
        );
    }

    #[test]
    fn dynamic_result_uses_camel_case() {
        let result = DynamicRiskResult {
            static_risk: AdvisoryLevel::Low,
            adjusted_risk: AdvisoryLevel::Moderate,
            days_since_last_incident: None,
            trend: Trend::Worsening,
            reasoning: String::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["staticRisk"], "low");
        assert_eq!(json["adjustedRisk"], "moderate");
        assert!(json["daysSinceLastIncident"].is_null());
        assert_eq!(json["trend"], "worsening");
    }
}
