//! Composite risk score.
//!
//! Only incidents whose zone counts toward the primary tally are scored.
//! Five components, each normalized to `[0, 1]`, are combined with fixed
//! weights and scaled onto `1..=10`:
//!
//! | component     | weight | value                                         |
//! |---------------|--------|-----------------------------------------------|
//! | volume        | 0.30   | `min(Σ relevance score / 5, 1)`               |
//! | severity      | 0.25   | mean severity weight                          |
//! | type          | 0.20   | mean incident type weight                     |
//! | recency       | 0.15   | mean `exp(-days_ago / 7)`                     |
//! | concentration | 0.10   | innermost-zone share of relevant incidents    |

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use safepath_incident_models::{
    ClassifiedIncident, IncidentSeverity, IncidentType, RelevanceZone, parse_incident_date,
};
use safepath_risk_models::{
    RiskBreakdown, RiskLevel, RiskScoreResult, ScoreComponents, ScoreConfidence,
};

use crate::days_between;

/// Label reported in [`RiskScoreResult::methodology`].
pub const METHODOLOGY: &str = "multi-criteria-weighted-v1";

/// Score reported when no incident is geographically relevant.
pub const NO_RELEVANT_INCIDENTS_SCORE: f64 = 1.5;

/// Weighted incident total at which the volume component saturates.
pub const VOLUME_SATURATION: f64 = 5.0;

/// Time constant, in days, of the exponential recency decay.
pub const RECENCY_DECAY_DAYS: f64 = 7.0;

/// Lowest possible score.
pub const MIN_SCORE: f64 = 1.0;

/// Highest possible score.
pub const MAX_SCORE: f64 = 10.0;

/// Weights applied to each component. They sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentWeights {
    /// Volume weight.
    pub volume: f64,
    /// Severity weight.
    pub severity: f64,
    /// Incident type weight.
    pub incident_type: f64,
    /// Recency weight.
    pub recency: f64,
    /// Concentration weight.
    pub concentration: f64,
}

/// The fixed component weights.
pub const COMPONENT_WEIGHTS: ComponentWeights = ComponentWeights {
    volume: 0.30,
    severity: 0.25,
    incident_type: 0.20,
    recency: 0.15,
    concentration: 0.10,
};

impl ComponentWeights {
    /// Combines component values into a composite in `[0, 1]`.
    #[must_use]
    pub fn combine(&self, components: &ScoreComponents) -> f64 {
        self.volume * components.volume
            + self.severity * components.severity
            + self.incident_type * components.incident_type
            + self.recency * components.recency
            + self.concentration * components.concentration
    }
}

/// Scores zoned incidents relative to `now`.
///
/// Incidents without relevance attached are counted in the breakdown but
/// never scored. When nothing is relevant the score short-circuits to
/// [`NO_RELEVANT_INCIDENTS_SCORE`]; confidence is then `high` if any
/// incidents were seen at all (they were all off-zone) and `low` if the
/// list was empty.
#[must_use]
pub fn compute_risk_score(incidents: &[ClassifiedIncident], now: NaiveDateTime) -> RiskScoreResult {
    let mut zone_counts: BTreeMap<RelevanceZone, usize> = BTreeMap::new();
    let mut unzoned_count = 0;
    for incident in incidents {
        match &incident.relevance {
            Some(relevance) => *zone_counts.entry(relevance.zone).or_insert(0) += 1,
            None => unzoned_count += 1,
        }
    }

    let relevant: Vec<&ClassifiedIncident> = incidents
        .iter()
        .filter(|i| i.relevance.as_ref().is_some_and(|r| r.zone.counts_toward_primary()))
        .collect();

    if relevant.is_empty() {
        let confidence = if incidents.is_empty() {
            ScoreConfidence::Low
        } else {
            ScoreConfidence::High
        };
        log::debug!(
            "No relevant incidents among {}; reporting baseline score",
            incidents.len()
        );
        return RiskScoreResult {
            score: NO_RELEVANT_INCIDENTS_SCORE,
            level: RiskLevel::from_score(NO_RELEVANT_INCIDENTS_SCORE),
            confidence,
            methodology: METHODOLOGY.to_string(),
            breakdown: RiskBreakdown {
                zone_counts,
                unzoned_count,
                ..RiskBreakdown::default()
            },
        };
    }

    let weighted_total: f64 = relevant.iter().map(|i| relevance_score(i)).sum();
    let components = ScoreComponents {
        volume: (weighted_total / VOLUME_SATURATION).clamp(0.0, 1.0),
        severity: mean(&relevant, |i| i.severity.weight()),
        incident_type: mean(&relevant, |i| i.incident_type.weight()),
        recency: mean(&relevant, |i| recency_weight(&i.date, now)),
        concentration: share(&relevant, |i| {
            i.relevance.as_ref().is_some_and(|r| r.zone.is_innermost())
        }),
    };

    let composite = COMPONENT_WEIGHTS.combine(&components);
    let score = round_to_tenth(MIN_SCORE + composite * (MAX_SCORE - MIN_SCORE))
        .clamp(MIN_SCORE, MAX_SCORE);

    let result = RiskScoreResult {
        score,
        level: RiskLevel::from_score(score),
        confidence: ScoreConfidence::from_relevant_count(relevant.len()),
        methodology: METHODOLOGY.to_string(),
        breakdown: RiskBreakdown {
            zone_counts,
            relevant_count: relevant.len(),
            unzoned_count,
            weighted_total,
            dominant_type: dominant_type(&relevant),
            has_fatality: relevant
                .iter()
                .any(|i| i.severity == IncidentSeverity::Fatal),
            components,
        },
    };

    log::debug!(
        "Scored {} relevant of {} incident(s): {} ({}), components {:?}",
        relevant.len(),
        incidents.len(),
        result.score,
        result.level,
        components
    );

    result
}

/// [`compute_risk_score`] against the current UTC time.
#[must_use]
pub fn compute_risk_score_now(incidents: &[ClassifiedIncident]) -> RiskScoreResult {
    compute_risk_score(incidents, crate::utc_now())
}

/// Recency weight of one incident date: `exp(-days_ago / 7)`.
///
/// Future dates weigh `1.0`. Unparsable dates resolve to the epoch
/// sentinel and so decay to effectively zero.
#[must_use]
pub fn recency_weight(date: &str, now: NaiveDateTime) -> f64 {
    let days_ago = days_between(parse_incident_date(date), now);
    if days_ago <= 0.0 {
        1.0
    } else {
        (-days_ago / RECENCY_DECAY_DAYS).exp()
    }
}

/// The attached relevance score, or the zone's fixed score when the
/// attached one is not a finite number.
fn relevance_score(incident: &ClassifiedIncident) -> f64 {
    incident.relevance.as_ref().map_or(0.0, |r| {
        if r.score.is_finite() {
            r.score
        } else {
            r.zone.score()
        }
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(incidents: &[&ClassifiedIncident], weight: impl Fn(&ClassifiedIncident) -> f64) -> f64 {
    incidents.iter().map(|i| weight(*i)).sum::<f64>() / incidents.len() as f64
}

#[allow(clippy::cast_precision_loss)]
fn share(incidents: &[&ClassifiedIncident], predicate: impl Fn(&ClassifiedIncident) -> bool) -> f64 {
    incidents.iter().filter(|i| predicate(**i)).count() as f64 / incidents.len() as f64
}

/// Most frequent type; ties go to the type seen first.
fn dominant_type(incidents: &[&ClassifiedIncident]) -> Option<IncidentType> {
    let mut counts: Vec<(&IncidentType, usize)> = Vec::new();
    for incident in incidents {
        match counts.iter_mut().find(|(kind, _)| **kind == incident.incident_type) {
            Some((_, count)) => *count += 1,
            None => counts.push((&incident.incident_type, 1)),
        }
    }

    let mut best: Option<(&IncidentType, usize)> = None;
    for (kind, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((kind, count));
        }
    }
    best.map(|(kind, _)| kind.clone())
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
