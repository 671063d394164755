//! Route-mode classification into [`RouteZone`].
//!
//! A route is only known as the ordered list of states it passes
//! through, so there is no distance decay: an incident is either off the
//! route, somewhere in a traversed state, or at an area that one of that
//! state's anchors lists in its `immediate` or `nearby` ring.

use safepath_incident_models::RouteZone;
use safepath_zones::{matches_any, normalize};

use crate::RelevanceClassifier;

impl RelevanceClassifier<'_> {
    /// Classifies one incident relative to a route.
    ///
    /// `incident_state` is used when the caller already knows it;
    /// otherwise the state comes from the area→state lookup, then from
    /// any traversed state the location text names. An incident whose
    /// state is not on the route is [`RouteZone::OffRoute`] no matter how
    /// closely its text resembles a known area.
    #[must_use]
    pub fn classify_for_route<S: AsRef<str>>(
        &self,
        route_states: &[S],
        location: Option<&str>,
        incident_state: Option<&str>,
    ) -> RouteZone {
        let route: Vec<String> = route_states
            .iter()
            .map(|state| self.state_id(state.as_ref()))
            .collect();
        let location = location.map(str::trim).filter(|s| !s.is_empty());

        let state = incident_state
            .map(|state| self.state_id(state))
            .or_else(|| location.and_then(|l| self.located_state(l)))
            .or_else(|| {
                let location = location?;
                route
                    .iter()
                    .find(|state| self.mentions_state(state, location))
                    .cloned()
            });

        let Some(state) = state.filter(|state| route.contains(state)) else {
            return RouteZone::OffRoute;
        };
        let Some(location) = location else {
            return RouteZone::RouteState;
        };

        let on_route = self.registry.state(&state).is_some_and(|zones| {
            zones.anchors.values().any(|rings| {
                matches_any(location, &rings.immediate) || matches_any(location, &rings.nearby)
            })
        });

        if on_route {
            RouteZone::OnRoute
        } else {
            log::trace!(
                "'{location}' is in route state '{state}' but not near a known anchor ({})",
                normalize(location)
            );
            RouteZone::RouteState
        }
    }
}
