//! Relevance zones attached to incidents by the relevance classifier.
//!
//! Area searches use the five-ring [`Zone`]; route searches use the
//! three-value [`RouteZone`]. Each zone carries a fixed score, display
//! label, and whether it counts toward the primary (scored) tally.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Relevance of an incident to an area search.
///
/// Variants are declared least to most specific, so the derived ordering
/// makes `Immediate > Nearby > SameRegion > SameState > Distant`.
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
pub enum Zone {
    /// Another state entirely
    Distant,
    /// Same state as the anchor but not in any known ring
    SameState,
    /// Third ring: the wider region around the anchor
    SameRegion,
    /// Second ring: neighbouring areas
    Nearby,
    /// The anchor itself or its first ring
    Immediate,
}

impl Zone {
    /// Zones in classification order, most specific first.
    pub const MOST_SPECIFIC_FIRST: [Self; 5] = [
        Self::Immediate,
        Self::Nearby,
        Self::SameRegion,
        Self::SameState,
        Self::Distant,
    ];

    /// Relevance score for this zone.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Immediate => 1.0,
            Self::Nearby => 0.7,
            Self::SameRegion => 0.4,
            Self::SameState => 0.15,
            Self::Distant => 0.0,
        }
    }

    /// Human-readable label shown in briefings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Immediate => "In your area",
            Self::Nearby => "Nearby",
            Self::SameRegion => "Same region",
            Self::SameState => "Elsewhere in state",
            Self::Distant => "Distant",
        }
    }

    /// Whether incidents in this zone feed the risk score.
    #[must_use]
    pub const fn counts_toward_primary(self) -> bool {
        matches!(self, Self::Immediate | Self::Nearby | Self::SameRegion)
    }
}

/// Relevance of an incident to a route search.
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
pub enum RouteZone {
    /// In a state the route does not pass through
    OffRoute,
    /// In a traversed state, but not a known area along the way
    RouteState,
    /// At a known area in a traversed state
    OnRoute,
}

impl RouteZone {
    /// Relevance score for this zone.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::OnRoute => 1.0,
            Self::RouteState => 0.4,
            Self::OffRoute => 0.0,
        }
    }

    /// Human-readable label shown in briefings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnRoute => "On your route",
            Self::RouteState => "Along a route state",
            Self::OffRoute => "Off route",
        }
    }

    /// Whether incidents in this zone feed the risk score.
    #[must_use]
    pub const fn counts_toward_primary(self) -> bool {
        matches!(self, Self::OnRoute | Self::RouteState)
    }
}

/// Either kind of zone, as stored on an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelevanceZone {
    /// Area-mode zone.
    Area(Zone),
    /// Route-mode zone.
    Route(RouteZone),
}

impl RelevanceZone {
    /// Relevance score for this zone.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Area(zone) => zone.score(),
            Self::Route(zone) => zone.score(),
        }
    }

    /// Human-readable label shown in briefings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Area(zone) => zone.label(),
            Self::Route(zone) => zone.label(),
        }
    }

    /// Whether incidents in this zone feed the risk score.
    #[must_use]
    pub const fn counts_toward_primary(self) -> bool {
        match self {
            Self::Area(zone) => zone.counts_toward_primary(),
            Self::Route(zone) => zone.counts_toward_primary(),
        }
    }

    /// Whether this is the innermost zone of its mode (`immediate` or
    /// `on_route`), used for the concentration component.
    #[must_use]
    pub const fn is_innermost(self) -> bool {
        matches!(
            self,
            Self::Area(Zone::Immediate) | Self::Route(RouteZone::OnRoute)
        )
    }
}

impl From<Zone> for RelevanceZone {
    fn from(value: Zone) -> Self {
        Self::Area(value)
    }
}

impl From<RouteZone> for RelevanceZone {
    fn from(value: RouteZone) -> Self {
        Self::Route(value)
    }
}

impl std::fmt::Display for RelevanceZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Area(zone) => write!(f, "{zone}"),
            Self::Route(zone) => write!(f, "{zone}"),
        }
    }
}

/// The relevance record attached to a classified incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relevance {
    /// Zone tag.
    pub zone: RelevanceZone,
    /// Zone score, copied from the zone's fixed weight.
    pub score: f64,
    /// Display label.
    pub label: String,
}

impl Relevance {
    /// Builds the relevance record for a zone from its fixed triple.
    #[must_use]
    pub fn for_zone(zone: impl Into<RelevanceZone>) -> Self {
        let zone = zone.into();
        Self {
            zone,
            score: zone.score(),
            label: zone.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_weights_are_pinned() {
        let expected = [1.0, 0.7, 0.4, 0.15, 0.0];
        for (zone, weight) in Zone::MOST_SPECIFIC_FIRST.iter().zip(expected) {
            assert!(
                (zone.score() - weight).abs() < f64::EPSILON,
                "{zone} score {} != {weight}",
                zone.score()
            );
        }
    }

    #[test]
    fn zone_ordering_matches_specificity() {
        for pair in Zone::MOST_SPECIFIC_FIRST.windows(2) {
            assert!(pair[0] > pair[1], "{} should outrank {}", pair[0], pair[1]);
            assert!(pair[0].score() > pair[1].score());
        }
    }

    #[test]
    fn primary_tally_membership() {
        assert!(Zone::Immediate.counts_toward_primary());
        assert!(Zone::SameRegion.counts_toward_primary());
        assert!(!Zone::SameState.counts_toward_primary());
        assert!(!Zone::Distant.counts_toward_primary());
        assert!(RouteZone::RouteState.counts_toward_primary());
        assert!(!RouteZone::OffRoute.counts_toward_primary());
    }

    #[test]
    fn relevance_serializes_flat_zone_tag() {
        let json = serde_json::to_value(Relevance::for_zone(Zone::SameRegion)).unwrap();
        assert_eq!(json["zone"], "same_region");
        assert_eq!(json["label"], "Same region");

        let route: Relevance = serde_json::from_str(
            r#"{"zone":"on_route","score":1.0,"label":"On your route"}"#,
        )
        .unwrap();
        assert_eq!(route.zone, RelevanceZone::Route(RouteZone::OnRoute));
    }

    #[test]
    fn zone_parses_from_str() {
        assert_eq!("same_state".parse::<Zone>().unwrap(), Zone::SameState);
        assert_eq!(RouteZone::OnRoute.as_ref(), "on_route");
    }
}
