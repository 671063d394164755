//! Dynamic adjustment of a static advisory level.
//!
//! The static level is slow-moving and historically derived. This module
//! re-reads it against incidents inside a recent window and escalates it
//! when recent activity warrants. Rules are checked in priority order and
//! the first one that applies wins:
//!
//! 1. three or more incidents in the last week and a fatality: escalate to
//!    `high` (or `very high` from `high`)
//! 2. two or more incidents in the last week and a fatal or serious one:
//!    escalate `low` → `moderate` or `moderate` → `high`
//! 3. an incident in the last two days on a `low` baseline: `moderate`
//! 4. nothing for over two weeks on a `high`/`very high` baseline: the
//!    trend improves but the level is kept
//! 5. otherwise the level is unchanged and the trend is stable

use chrono::{Duration, NaiveDateTime};
use safepath_incident_models::{ClassifiedIncident, IncidentSeverity, try_parse_incident_date};
use safepath_risk_models::{AdvisoryLevel, DynamicRiskResult, Trend};

use crate::days_between;

/// Window used when the caller does not specify one.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Span, in days, that counts as "this week" for the escalation rules.
pub const RECENT_DAYS: f64 = 7.0;

/// An incident at most this many days old escalates a `low` baseline.
pub const FRESH_DAYS: i64 = 2;

/// Silence longer than this many days marks a high baseline as improving.
pub const QUIET_DAYS: i64 = 14;

/// The rule that decided an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    FatalCluster,
    SevereCluster,
    FreshIncident,
    QuietPeriod,
    NoChange,
}

/// Re-evaluates `static_level` against incidents dated within the last
/// `window_days` before `now`.
///
/// Incidents with unparsable or future dates are left out of the window.
#[must_use]
pub fn compute_dynamic_risk(
    static_level: AdvisoryLevel,
    incidents: &[ClassifiedIncident],
    window_days: u32,
    now: NaiveDateTime,
) -> DynamicRiskResult {
    // A window reaching past the representable range has no lower bound.
    let window_start = Duration::try_days(i64::from(window_days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(NaiveDateTime::MIN);

    let mut windowed: Vec<(NaiveDateTime, &ClassifiedIncident)> = incidents
        .iter()
        .filter_map(|incident| {
            try_parse_incident_date(&incident.date)
                .filter(|date| *date >= window_start && *date <= now)
                .map(|date| (date, incident))
        })
        .collect();

    let Some(most_recent) = windowed.iter().map(|(date, _)| *date).max() else {
        log::debug!(
            "No incidents within {window_days} day(s) of {now}; keeping {static_level}"
        );
        return DynamicRiskResult {
            static_risk: static_level,
            adjusted_risk: static_level,
            days_since_last_incident: None,
            trend: Trend::Stable,
            reasoning: format!(
                "No recent incidents in the last {window_days} days; risk remains {static_level}."
            ),
        };
    };

    windowed.sort_by(|a, b| b.0.cmp(&a.0));
    let days_since_last = whole_days(days_between(most_recent, now));

    let recent = windowed
        .iter()
        .filter(|(date, _)| days_between(*date, now) <= RECENT_DAYS)
        .count();
    let high_severity = windowed.iter().any(|(_, i)| i.severity.is_high());
    let fatal = windowed
        .iter()
        .any(|(_, i)| i.severity == IncidentSeverity::Fatal);

    let rule = if recent >= 3 && fatal {
        Rule::FatalCluster
    } else if recent >= 2 && high_severity {
        Rule::SevereCluster
    } else if recent >= 1 && days_since_last <= FRESH_DAYS && static_level == AdvisoryLevel::Low {
        Rule::FreshIncident
    } else if days_since_last > QUIET_DAYS
        && matches!(static_level, AdvisoryLevel::High | AdvisoryLevel::VeryHigh)
    {
        Rule::QuietPeriod
    } else {
        Rule::NoChange
    };

    let (adjusted, trend) = match rule {
        Rule::FatalCluster => (escalate_for_fatalities(static_level), Trend::Worsening),
        Rule::SevereCluster => (escalate_for_severity(static_level), Trend::Worsening),
        Rule::FreshIncident => (AdvisoryLevel::Moderate, Trend::Worsening),
        Rule::QuietPeriod => (static_level, Trend::Improving),
        Rule::NoChange => (static_level, Trend::Stable),
    };

    let incidents_in_window: Vec<&ClassifiedIncident> =
        windowed.iter().map(|(_, incident)| *incident).collect();
    let reasoning = format!(
        "{} incident(s) in the last {window_days} days ({}); most recent {days_since_last} day(s) ago. {}",
        windowed.len(),
        severity_mix(&incidents_in_window),
        verdict(rule, static_level, adjusted)
    );

    log::debug!(
        "Dynamic risk: {static_level} -> {adjusted} ({trend}) via {rule:?}, {} in window, {recent} this week",
        windowed.len()
    );

    DynamicRiskResult {
        static_risk: static_level,
        adjusted_risk: adjusted,
        days_since_last_incident: Some(days_since_last),
        trend,
        reasoning,
    }
}

/// [`compute_dynamic_risk`] against the current UTC time.
#[must_use]
pub fn compute_dynamic_risk_now(
    static_level: AdvisoryLevel,
    incidents: &[ClassifiedIncident],
    window_days: u32,
) -> DynamicRiskResult {
    compute_dynamic_risk(static_level, incidents, window_days, crate::utc_now())
}

const fn escalate_for_fatalities(level: AdvisoryLevel) -> AdvisoryLevel {
    match level {
        AdvisoryLevel::Low | AdvisoryLevel::Moderate => AdvisoryLevel::High,
        AdvisoryLevel::High | AdvisoryLevel::VeryHigh => AdvisoryLevel::VeryHigh,
    }
}

const fn escalate_for_severity(level: AdvisoryLevel) -> AdvisoryLevel {
    match level {
        AdvisoryLevel::Low => AdvisoryLevel::Moderate,
        AdvisoryLevel::Moderate => AdvisoryLevel::High,
        other => other,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole_days(days: f64) -> i64 {
    days.round() as i64
}

/// Counts per severity, most severe first, omitting zeros.
/// Severities outside the taxonomy are counted as `unknown`.
fn severity_mix(incidents: &[&ClassifiedIncident]) -> String {
    IncidentSeverity::all()
        .iter()
        .filter_map(|severity| {
            let count = incidents
                .iter()
                .filter(|i| match &i.severity {
                    IncidentSeverity::Unrecognized(_) => *severity == IncidentSeverity::Unknown,
                    other => other == severity,
                })
                .count();
            (count > 0).then(|| format!("{count} {severity}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn verdict(rule: Rule, static_level: AdvisoryLevel, adjusted: AdvisoryLevel) -> String {
    let outcome = if adjusted == static_level {
        format!("risk held at {static_level}")
    } else {
        format!("risk raised from {static_level} to {adjusted}")
    };

    match rule {
        Rule::FatalCluster => {
            format!("Several incidents this week including a fatality; {outcome}.")
        }
        Rule::SevereCluster => format!("Repeated serious incidents this week; {outcome}."),
        Rule::FreshIncident => format!("An incident in the last {FRESH_DAYS} days; {outcome}."),
        Rule::QuietPeriod => format!("Quiet for over {QUIET_DAYS} days, trend improving; {outcome}."),
        Rule::NoChange => format!("No escalation warranted; {outcome}."),
    }
}

#[cfg(test)]
mod tests {
    use safepath_incident_models::IncidentType;

    use super::*;
    use crate::test_support::{days_ago, incident, now};

    fn dated(severity: IncidentSeverity, days: i64) -> ClassifiedIncident {
        incident(IncidentType::Robbery, severity, None, &days_ago(days))
    }

    #[test]
    fn fatal_cluster_escalates_moderate_to_high() {
        let incidents = vec![
            dated(IncidentSeverity::Minor, 5),
            dated(IncidentSeverity::Fatal, 3),
            dated(IncidentSeverity::Serious, 1),
        ];
        let result = compute_dynamic_risk(AdvisoryLevel::Moderate, &incidents, 30, now());

        assert_eq!(result.static_risk, AdvisoryLevel::Moderate);
        assert_eq!(result.adjusted_risk, AdvisoryLevel::High);
        assert_eq!(result.trend, Trend::Worsening);
        assert_eq!(result.days_since_last_incident, Some(1));
        assert_eq!(
            result.reasoning,
            "3 incident(s) in the last 30 days (1 fatal, 1 serious, 1 minor); most recent 1 day(s) ago. \
             Several incidents this week including a fatality; risk raised from moderate to high."
        );
    }

    #[test]
    fn fatal_cluster_tops_out_at_very_high() {
        let incidents = vec![
            dated(IncidentSeverity::Fatal, 0),
            dated(IncidentSeverity::Fatal, 1),
            dated(IncidentSeverity::Fatal, 2),
        ];
        for (baseline, expected) in [
            (AdvisoryLevel::Low, AdvisoryLevel::High),
            (AdvisoryLevel::High, AdvisoryLevel::VeryHigh),
            (AdvisoryLevel::VeryHigh, AdvisoryLevel::VeryHigh),
        ] {
            let result = compute_dynamic_risk(baseline, &incidents, 30, now());
            assert_eq!(result.adjusted_risk, expected, "baseline {baseline}");
            assert_eq!(result.trend, Trend::Worsening);
        }
    }

    #[test]
    fn severe_pair_escalates_one_step() {
        let incidents = vec![
            dated(IncidentSeverity::Serious, 2),
            dated(IncidentSeverity::Minor, 4),
        ];

        let low = compute_dynamic_risk(AdvisoryLevel::Low, &incidents, 30, now());
        assert_eq!(low.adjusted_risk, AdvisoryLevel::Moderate);
        assert_eq!(low.trend, Trend::Worsening);

        let moderate = compute_dynamic_risk(AdvisoryLevel::Moderate, &incidents, 30, now());
        assert_eq!(moderate.adjusted_risk, AdvisoryLevel::High);

        let high = compute_dynamic_risk(AdvisoryLevel::High, &incidents, 30, now());
        assert_eq!(high.adjusted_risk, AdvisoryLevel::High);
        assert_eq!(high.trend, Trend::Worsening);
        assert!(high.reasoning.ends_with("risk held at high."), "{}", high.reasoning);
    }

    #[test]
    fn fresh_incident_lifts_low_baseline_only() {
        let fresh = vec![dated(IncidentSeverity::Minor, 1)];
        let low = compute_dynamic_risk(AdvisoryLevel::Low, &fresh, 30, now());
        assert_eq!(low.adjusted_risk, AdvisoryLevel::Moderate);
        assert_eq!(low.trend, Trend::Worsening);

        let moderate = compute_dynamic_risk(AdvisoryLevel::Moderate, &fresh, 30, now());
        assert_eq!(moderate.adjusted_risk, AdvisoryLevel::Moderate);
        assert_eq!(moderate.trend, Trend::Stable);

        let older = vec![dated(IncidentSeverity::Minor, 4)];
        let low = compute_dynamic_risk(AdvisoryLevel::Low, &older, 30, now());
        assert_eq!(low.adjusted_risk, AdvisoryLevel::Low);
        assert_eq!(low.trend, Trend::Stable);
    }

    #[test]
    fn quiet_period_improves_trend_without_relaxing_level() {
        let incidents = vec![dated(IncidentSeverity::Fatal, 20)];

        let high = compute_dynamic_risk(AdvisoryLevel::VeryHigh, &incidents, 30, now());
        assert_eq!(high.adjusted_risk, AdvisoryLevel::VeryHigh);
        assert_eq!(high.trend, Trend::Improving);
        assert_eq!(high.days_since_last_incident, Some(20));

        let moderate = compute_dynamic_risk(AdvisoryLevel::Moderate, &incidents, 30, now());
        assert_eq!(moderate.trend, Trend::Stable);
    }

    #[test]
    fn empty_window_keeps_static_level() {
        let incidents = vec![dated(IncidentSeverity::Fatal, 45)];
        let result = compute_dynamic_risk(AdvisoryLevel::Moderate, &incidents, 30, now());

        assert_eq!(result.adjusted_risk, AdvisoryLevel::Moderate);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.days_since_last_incident, None);
        assert_eq!(
            result.reasoning,
            "No recent incidents in the last 30 days; risk remains moderate."
        );
    }

    #[test]
    fn future_and_malformed_dates_are_outside_the_window() {
        let mut future = dated(IncidentSeverity::Fatal, 0);
        future.date = "20990101".to_string();
        let mut malformed = dated(IncidentSeverity::Fatal, 0);
        malformed.date = "yesterday".to_string();

        let result = compute_dynamic_risk(AdvisoryLevel::Low, &[future, malformed], 30, now());
        assert_eq!(result.adjusted_risk, AdvisoryLevel::Low);
        assert_eq!(result.days_since_last_incident, None);
    }

    #[test]
    fn window_is_closed_at_its_start() {
        let edge = vec![dated(IncidentSeverity::Minor, 30)];
        let result = compute_dynamic_risk(AdvisoryLevel::Moderate, &edge, 30, now());
        assert_eq!(result.days_since_last_incident, Some(30));

        let outside = vec![dated(IncidentSeverity::Minor, 31)];
        let result = compute_dynamic_risk(AdvisoryLevel::Moderate, &outside, 30, now());
        assert_eq!(result.days_since_last_incident, None);
        assert_eq!(result.trend, Trend::Stable);
    }

    #[test]
    fn seven_day_cutoff_is_inclusive() {
        let within = vec![
            dated(IncidentSeverity::Fatal, 7),
            dated(IncidentSeverity::Minor, 3),
            dated(IncidentSeverity::Minor, 1),
        ];
        let result = compute_dynamic_risk(AdvisoryLevel::High, &within, 30, now());
        assert_eq!(result.adjusted_risk, AdvisoryLevel::VeryHigh);
        assert_eq!(result.trend, Trend::Worsening);

        // Two incidents this week; the fatality only feeds the severe-pair rule.
        let beyond = vec![
            dated(IncidentSeverity::Fatal, 8),
            dated(IncidentSeverity::Minor, 3),
            dated(IncidentSeverity::Minor, 1),
        ];
        let result = compute_dynamic_risk(AdvisoryLevel::High, &beyond, 30, now());
        assert_eq!(result.adjusted_risk, AdvisoryLevel::High);
        assert_eq!(result.trend, Trend::Worsening);
        assert!(
            result.reasoning.contains("Repeated serious incidents this week"),
            "{}",
            result.reasoning
        );
    }

    #[test]
    fn oversized_window_has_no_lower_bound() {
        let incidents = vec![
            dated(IncidentSeverity::Minor, 1),
            dated(IncidentSeverity::Minor, 20_000),
        ];
        let result = compute_dynamic_risk(AdvisoryLevel::Low, &incidents, u32::MAX, now());
        assert_eq!(result.adjusted_risk, AdvisoryLevel::Moderate);
        assert_eq!(result.days_since_last_incident, Some(1));
        assert!(result.reasoning.starts_with("2 incident(s) in the last 4294967295 days"));
    }

    #[test]
    fn days_since_last_is_rounded() {
        let mut incident = dated(IncidentSeverity::Minor, 0);
        incident.date = (now() - Duration::hours(38))
            .format("%Y%m%d%H%M%S")
            .to_string();
        let result = compute_dynamic_risk(AdvisoryLevel::Moderate, &[incident], 30, now());
        assert_eq!(result.days_since_last_incident, Some(2));
    }

    #[test]
    fn unrecognized_severity_counts_as_unknown() {
        let incidents = vec![
            dated(IncidentSeverity::Unrecognized("grave".to_string()), 10),
            dated(IncidentSeverity::Unknown, 12),
        ];
        let result = compute_dynamic_risk(AdvisoryLevel::Moderate, &incidents, 30, now());
        assert!(result.reasoning.starts_with("2 incident(s) in the last 30 days (2 unknown);"));
    }

    #[test]
    fn adjustment_is_deterministic() {
        let incidents = vec![
            dated(IncidentSeverity::Serious, 1),
            dated(IncidentSeverity::Moderate, 6),
            dated(IncidentSeverity::Fatal, 9),
        ];
        assert_eq!(
            compute_dynamic_risk(AdvisoryLevel::Low, &incidents, 14, now()),
            compute_dynamic_risk(AdvisoryLevel::Low, &incidents, 14, now())
        );
    }
}
