//! Area-mode classification into the five-ring [`Zone`] scale.
//!
//! Zones are tested from most to least specific and the first match
//! wins:
//!
//! 1. no usable location → [`Zone::SameState`]
//! 2. the location matches the anchor → [`Zone::Immediate`]
//! 3. the location matches the anchor's `immediate`, `nearby`, or
//!    `same_region` ring, in that order
//! 4. the location resolves to, or mentions, the anchor's state →
//!    [`Zone::SameState`]
//! 5. otherwise → [`Zone::Distant`]

use safepath_incident_models::Zone;
use safepath_zones::{contains_token_run, locations_match, matches_any, normalize};

use crate::RelevanceClassifier;

impl RelevanceClassifier<'_> {
    /// Classifies one incident location relative to an area anchor.
    ///
    /// A missing location lands in [`Zone::SameState`] rather than being
    /// dropped, so the incident still counts toward the briefing.
    #[must_use]
    pub fn classify(&self, anchor: &str, location: Option<&str>, anchor_state: &str) -> Zone {
        let Some(location) = location.map(str::trim).filter(|s| !s.is_empty()) else {
            return Zone::SameState;
        };

        let canonical_anchor = self.registry.resolve_area(anchor);
        if locations_match(anchor, location) || locations_match(&canonical_anchor, location) {
            return Zone::Immediate;
        }

        if let Some(rings) = self.registry.anchor_rings(anchor_state, anchor) {
            let ordered = [
                (Zone::Immediate, &rings.immediate),
                (Zone::Nearby, &rings.nearby),
                (Zone::SameRegion, &rings.same_region),
            ];
            for (zone, areas) in ordered {
                if matches_any(location, areas) {
                    return zone;
                }
            }
        } else {
            log::trace!("No ring data for anchor '{anchor}' in '{anchor_state}'");
        }

        let state = self.state_id(anchor_state);
        if self.located_state(location).as_deref() == Some(state.as_str())
            || self.mentions_state(&state, location)
        {
            return Zone::SameState;
        }

        Zone::Distant
    }

    /// Whether `location` names the state as whole tokens. States missing
    /// from the registry are checked by their normalized id alone.
    pub(crate) fn mentions_state(&self, state: &str, location: &str) -> bool {
        if self.registry.state(state).is_some() {
            return self.registry.mentions_state(state, location);
        }
        contains_token_run(&normalize(location), &normalize(state))
    }
}

#[cfg(test)]
mod tests {
    use safepath_zones::{AreaStateLookup, ZoneRegistry};
    use safepath_zones_models::AreaLocation;

    use super::*;

    fn classify(anchor: &str, location: Option<&str>, state: &str) -> Zone {
        RelevanceClassifier::new(ZoneRegistry::embedded()).classify(anchor, location, state)
    }

    #[test]
    fn missing_location_is_same_state() {
        assert_eq!(classify("lekki", None, "lagos"), Zone::SameState);
        assert_eq!(classify("lekki", Some("   "), "lagos"), Zone::SameState);
    }

    #[test]
    fn anchor_match_is_immediate() {
        assert_eq!(classify("lekki", Some("Lekki Phase 1 area"), "lagos"), Zone::Immediate);
    }

    #[test]
    fn anchor_alias_is_resolved() {
        assert_eq!(classify("VI", Some("Victoria Island"), "lagos"), Zone::Immediate);
        assert_eq!(classify("Wuse 2", Some("Maitama"), "abuja"), Zone::Immediate);
    }

    #[test]
    fn rings_are_tested_in_order() {
        assert_eq!(classify("lekki", Some("Osapa London"), "lagos"), Zone::Immediate);
        assert_eq!(classify("lekki", Some("Ajah"), "lagos"), Zone::Nearby);
        assert_eq!(classify("lekki", Some("Epe"), "lagos"), Zone::SameRegion);
    }

    #[test]
    fn same_state_through_lookup() {
        assert_eq!(classify("lekki", Some("Ikeja"), "lagos"), Zone::SameState);
    }

    #[test]
    fn same_state_through_state_name() {
        assert_eq!(
            classify("ikeja", Some("Lagos-Badagry expressway"), "lagos"),
            Zone::SameState
        );
    }

    #[test]
    fn state_id_inside_another_word_is_not_a_mention() {
        assert_eq!(classify("benin-city", Some("Toledo"), "edo"), Zone::Distant);
        assert_eq!(classify("benin-city", Some("Iguobazuwa, Edo"), "edo"), Zone::SameState);
        assert_eq!(classify("anywhere", Some("Toledo"), "edo"), Zone::Distant);
    }

    #[test]
    fn other_state_is_distant() {
        assert_eq!(classify("lekki", Some("Kubwa"), "lagos"), Zone::Distant);
        assert_eq!(classify("lekki", Some("Somewhere unheard of"), "lagos"), Zone::Distant);
    }

    #[test]
    fn unknown_anchor_still_classifies() {
        assert_eq!(classify("makoko", Some("Makoko waterfront"), "lagos"), Zone::Immediate);
        assert_eq!(classify("makoko", Some("Yaba"), "lagos"), Zone::SameState);
    }

    #[test]
    fn closer_ring_outranks_wider_ring() {
        let inner = classify("lekki", Some("Agungi"), "lagos");
        let outer = classify("lekki", Some("Ibeju"), "lagos");
        assert_eq!(outer, Zone::SameRegion);
        assert!(inner > outer);
        assert!(inner.score() >= outer.score());
    }

    struct FixedLookup;

    impl AreaStateLookup for FixedLookup {
        fn locate(&self, area: &str) -> Option<AreaLocation> {
            (area == "unmapped-estate").then(|| AreaLocation {
                state: "lagos".to_string(),
                sub_zone: None,
            })
        }
    }

    #[test]
    fn custom_lookup_is_consulted() {
        let registry = ZoneRegistry::embedded();
        let lookup = FixedLookup;
        let classifier = RelevanceClassifier::with_lookup(registry, &lookup);
        assert_eq!(
            classifier.classify("lekki", Some("Unmapped Estate"), "lagos"),
            Zone::SameState
        );
        // the default lookup does not know it
        assert_eq!(classify("lekki", Some("Unmapped Estate"), "lagos"), Zone::Distant);
    }
}
