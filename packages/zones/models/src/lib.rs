#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone registry schema types.
//!
//! Defines the TOML schema for a state's curated zone data: the areas it
//! contains (grouped by sub-zone), alternate spellings, and the ring
//! adjacency tables used to decide how close an incident is to a search
//! anchor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One state's zone data, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateZones {
    /// State identifier (e.g., `"lagos"`, `"fct"`).
    pub id: String,
    /// Human-readable state name (e.g., "Lagos").
    pub name: String,
    /// Other identifiers the state is known by (e.g., `"abuja"` for the FCT).
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Areas in this state, keyed by sub-zone label.
    #[serde(default)]
    pub sub_zones: BTreeMap<String, Vec<String>>,
    /// Alternate area spellings mapped to their canonical area id.
    #[serde(default)]
    pub area_aliases: BTreeMap<String, String>,
    /// Ring adjacency keyed by anchor area.
    #[serde(default)]
    pub anchors: BTreeMap<String, AnchorRings>,
}

impl StateZones {
    /// Iterates every `(area, sub_zone)` pair declared by this state.
    pub fn areas(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sub_zones.iter().flat_map(|(sub_zone, areas)| {
            areas
                .iter()
                .map(move |area| (area.as_str(), sub_zone.as_str()))
        })
    }

    /// Every identifier this state is known by: its id followed by its aliases.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// The concentric rings of known-nearby areas around one anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRings {
    /// Areas directly adjoining the anchor.
    #[serde(default)]
    pub immediate: Vec<String>,
    /// Areas a short trip away.
    #[serde(default)]
    pub nearby: Vec<String>,
    /// Areas in the same wider region.
    #[serde(default)]
    pub same_region: Vec<String>,
}

impl AnchorRings {
    /// Iterates every area listed in any ring.
    pub fn all_areas(&self) -> impl Iterator<Item = &str> {
        self.immediate
            .iter()
            .chain(&self.nearby)
            .chain(&self.same_region)
            .map(String::as_str)
    }
}

/// Where an area sits in the area→state hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaLocation {
    /// Owning state id.
    pub state: String,
    /// Sub-zone label within the state, if the area declares one.
    pub sub_zone: Option<String>,
}
