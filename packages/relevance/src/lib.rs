#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic relevance classification.
//!
//! Given a search anchor (an area, or a route's ordered list of states)
//! and each incident's free-text location, assigns the incident a
//! relevance zone using the curated [`ZoneRegistry`] rings and the fuzzy
//! location matcher. Classification is pure: inputs are borrowed and
//! copies with relevance attached are returned.

pub mod area;
pub mod route;

use std::collections::BTreeMap;

use safepath_incident_models::{ClassifiedIncident, Relevance, RelevanceZone};
use safepath_zones::{AreaStateLookup, ZoneRegistry, normalize};

/// Classifies incident locations against the zone registry.
///
/// Holds only shared references, so one classifier can serve any number
/// of concurrent requests.
#[derive(Clone, Copy)]
pub struct RelevanceClassifier<'a> {
    registry: &'a ZoneRegistry,
    lookup: &'a dyn AreaStateLookup,
}

impl<'a> RelevanceClassifier<'a> {
    /// Creates a classifier that also uses `registry` for area→state lookup.
    #[must_use]
    pub fn new(registry: &'a ZoneRegistry) -> Self {
        Self {
            registry,
            lookup: registry,
        }
    }

    /// Creates a classifier with a separate area→state lookup.
    #[must_use]
    pub fn with_lookup(registry: &'a ZoneRegistry, lookup: &'a dyn AreaStateLookup) -> Self {
        Self { registry, lookup }
    }

    /// Resolves a state id, alias, or name to its registry id. Unknown
    /// states fall back to their normalized form.
    fn state_id(&self, state: &str) -> String {
        self.registry
            .state(state)
            .map_or_else(|| normalize(state), |s| s.id.clone())
    }

    /// Returns the state owning `location`, according to the lookup.
    fn located_state(&self, location: &str) -> Option<String> {
        self.lookup
            .locate(&normalize(location))
            .map(|found| self.state_id(&found.state))
    }
}

impl std::fmt::Debug for RelevanceClassifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelevanceClassifier")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Attaches area-mode relevance to every incident.
///
/// Returns new records; `incidents` is left untouched.
#[must_use]
pub fn classify_incidents(
    classifier: &RelevanceClassifier<'_>,
    anchor: &str,
    anchor_state: &str,
    incidents: &[ClassifiedIncident],
) -> Vec<ClassifiedIncident> {
    let zoned = incidents
        .iter()
        .map(|incident| {
            let zone = classifier.classify(anchor, incident.location(), anchor_state);
            incident.with_relevance(Relevance::for_zone(zone))
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Classified {} incident(s) around '{anchor}' ({anchor_state}): {:?}",
        zoned.len(),
        zone_distribution(&zoned)
    );

    zoned
}

/// Attaches route-mode relevance to every incident.
///
/// The incident's state is taken from the area→state lookup on its
/// location. Returns new records; `incidents` is left untouched.
#[must_use]
pub fn classify_incidents_for_route<S: AsRef<str>>(
    classifier: &RelevanceClassifier<'_>,
    route_states: &[S],
    incidents: &[ClassifiedIncident],
) -> Vec<ClassifiedIncident> {
    let zoned = incidents
        .iter()
        .map(|incident| {
            let zone = classifier.classify_for_route(route_states, incident.location(), None);
            incident.with_relevance(Relevance::for_zone(zone))
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Classified {} incident(s) along a {}-state route: {:?}",
        zoned.len(),
        route_states.len(),
        zone_distribution(&zoned)
    );

    zoned
}

/// Counts incidents per attached zone.
#[must_use]
pub fn zone_distribution(incidents: &[ClassifiedIncident]) -> BTreeMap<RelevanceZone, usize> {
    let mut counts = BTreeMap::new();
    for relevance in incidents.iter().filter_map(|i| i.relevance.as_ref()) {
        *counts.entry(relevance.zone).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
pub(crate) mod test_support {
    use safepath_incident_models::{ClassifiedIncident, IncidentSeverity, IncidentType};

    pub fn incident(location: Option<&str>) -> ClassifiedIncident {
        ClassifiedIncident {
            headline: format!("Incident at {}", location.unwrap_or("unknown location")),
            notification: String::new(),
            incident_type: IncidentType::Robbery,
            severity: IncidentSeverity::Serious,
            location: location.map(str::to_string),
            confidence: 0.8,
            date: "20260110".to_string(),
            source_url: "https://news.example/item".to_string(),
            relevance: None,
        }
    }
}
