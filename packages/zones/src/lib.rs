#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Curated zone registry and location matching.
//!
//! The registry is hand-maintained reference data: which areas belong to
//! which state, alternate spellings, and for each search anchor the rings
//! of areas known to be close to it. It replaces coordinate math with an
//! explicit adjacency model. State files are embedded at compile time
//! (see [`registry`]); extra files can be loaded from a directory at
//! startup. Once built, a [`ZoneRegistry`] is read-only and can be shared
//! freely between threads.

pub mod normalize;
pub mod registry;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use safepath_zones_models::{AnchorRings, AreaLocation, StateZones};
use thiserror::Error;

pub use normalize::{
    contains_token_run, locations_match, matches_any, normalize, normalized_match,
};

/// Shape every identifier in the registry must have.
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));

static EMBEDDED: LazyLock<ZoneRegistry> =
    LazyLock::new(|| ZoneRegistry::new(registry::all_states()));

/// Errors that can occur while loading or validating zone data.
#[derive(Debug, Error)]
pub enum ZoneRegistryError {
    /// A zone file or directory could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A zone file is not valid TOML for the state schema.
    #[error("Failed to parse zone data '{name}': {source}")]
    Parse {
        /// File or embedded entry name.
        name: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// An identifier is not lowercase and hyphen-delimited.
    #[error("Invalid identifier '{identifier}' in state '{state}': expected lowercase hyphen-delimited")]
    InvalidIdentifier {
        /// State containing the identifier.
        state: String,
        /// The offending identifier.
        identifier: String,
    },

    /// Two states claim the same identifier.
    #[error("State identifier '{identifier}' is claimed by both '{first}' and '{second}'")]
    DuplicateStateIdentifier {
        /// The shared identifier.
        identifier: String,
        /// First state claiming it.
        first: String,
        /// Second state claiming it.
        second: String,
    },

    /// An area is declared by more than one state or sub-zone.
    #[error("Area '{area}' is declared more than once (in '{first}' and '{second}')")]
    DuplicateArea {
        /// The area identifier.
        area: String,
        /// First state declaring it.
        first: String,
        /// Second state declaring it.
        second: String,
    },

    /// An alias points at an area its state does not declare.
    #[error("Alias '{alias}' in state '{state}' targets undeclared area '{target}'")]
    DanglingAlias {
        /// State containing the alias.
        state: String,
        /// The alias.
        alias: String,
        /// The missing target.
        target: String,
    },

    /// An anchor is not one of its state's declared areas.
    #[error("Anchor '{anchor}' in state '{state}' is not a declared area")]
    UndeclaredAnchor {
        /// State containing the anchor.
        state: String,
        /// The anchor.
        anchor: String,
    },
}

/// Resolves an area identifier to its place in the area→state hierarchy.
///
/// [`ZoneRegistry`] implements this from its own data; callers with a
/// richer gazetteer can supply their own.
pub trait AreaStateLookup {
    /// Returns the owning state (and sub-zone) of a normalized area
    /// identifier, or `None` if the area is unknown.
    fn locate(&self, area: &str) -> Option<AreaLocation>;
}

/// Read-only, indexed view over a set of [`StateZones`].
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    states: BTreeMap<String, StateZones>,
    /// State id, alias, or normalized name → state id.
    state_index: BTreeMap<String, String>,
    /// Area id → location. Declared areas first, then ring-only areas.
    area_index: BTreeMap<String, AreaLocation>,
    /// Area alias → canonical area id.
    alias_index: BTreeMap<String, String>,
}

impl ZoneRegistry {
    /// Builds a registry from state data. A later state with the same id
    /// replaces an earlier one.
    #[must_use]
    pub fn new(states: impl IntoIterator<Item = StateZones>) -> Self {
        let mut by_id = BTreeMap::new();
        for state in states {
            if by_id.contains_key(&state.id) {
                log::debug!("Replacing zone data for state '{}'", state.id);
            }
            by_id.insert(state.id.clone(), state);
        }

        let mut registry = Self {
            states: by_id,
            ..Self::default()
        };
        registry.build_indexes();
        registry
    }

    /// Returns the registry built from the embedded state files.
    #[must_use]
    pub fn embedded() -> &'static Self {
        &EMBEDDED
    }

    /// Builds the embedded registry plus every `*.toml` state file in
    /// `extra_dir`, then validates the result.
    ///
    /// Files are applied in file-name order; a file whose `id` matches an
    /// embedded state replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneRegistryError`] if the directory or a file cannot be
    /// read, a file does not parse, or the combined data fails
    /// [`ZoneRegistry::validate`].
    pub fn load(extra_dir: Option<&Path>) -> Result<Self, ZoneRegistryError> {
        let mut states = registry::all_states();
        if let Some(dir) = extra_dir {
            let extra = read_state_dir(dir)?;
            log::info!(
                "Loaded {} extra zone file(s) from {}",
                extra.len(),
                dir.display()
            );
            states.extend(extra);
        }

        let registry = Self::new(states);
        registry.validate()?;
        log::debug!(
            "Zone registry ready: {} states, {} areas",
            registry.states.len(),
            registry.area_index.len()
        );
        Ok(registry)
    }

    /// Iterates all states in id order.
    pub fn states(&self) -> impl Iterator<Item = &StateZones> {
        self.states.values()
    }

    /// Looks up a state by id, alias, or name.
    #[must_use]
    pub fn state(&self, state: &str) -> Option<&StateZones> {
        let id = self.state_index.get(&normalize(state))?;
        self.states.get(id)
    }

    /// Normalizes an area and resolves it through the alias tables.
    #[must_use]
    pub fn resolve_area(&self, area: &str) -> String {
        let normalized = normalize(area);
        self.alias_index
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }

    /// Returns the ring adjacency for `anchor` in `state`, resolving both
    /// through their aliases.
    #[must_use]
    pub fn anchor_rings(&self, state: &str, anchor: &str) -> Option<&AnchorRings> {
        let state = self.state(state)?;
        let normalized = normalize(anchor);
        state
            .anchors
            .get(&normalized)
            .or_else(|| {
                let canonical = state.area_aliases.get(&normalized)?;
                state.anchors.get(canonical)
            })
            .or_else(|| state.anchors.get(&self.resolve_area(&normalized)))
    }

    /// Whether `text` literally mentions the state, by id, alias, or name.
    ///
    /// A mention must cover whole hyphen-delimited tokens of the
    /// normalized text. Plain substring search would let short ids such
    /// as `edo` hit inside unrelated words like "Toledo".
    #[must_use]
    pub fn mentions_state(&self, state: &str, text: &str) -> bool {
        let Some(state) = self.state(state) else {
            return false;
        };
        let text = normalize(text);
        if text.is_empty() {
            return false;
        }

        let name = normalize(&state.name);
        state
            .identifiers()
            .chain(std::iter::once(name.as_str()))
            .any(|identifier| contains_token_run(&text, identifier))
    }

    /// Checks the registry's structural invariants.
    ///
    /// Every identifier must be lowercase and hyphen-delimited, state
    /// identifiers and declared areas must be unique across states, every
    /// alias must target a declared area of its state, and every anchor
    /// must be a declared area of its state.
    ///
    /// # Errors
    ///
    /// Returns the first [`ZoneRegistryError`] found.
    pub fn validate(&self) -> Result<(), ZoneRegistryError> {
        let mut state_owners: BTreeMap<&str, &str> = BTreeMap::new();
        let mut area_owners: BTreeMap<&str, &str> = BTreeMap::new();

        for state in self.states.values() {
            let check = |identifier: &str| check_identifier(&state.id, identifier);

            for identifier in state.identifiers() {
                check(identifier)?;
                if let Some(first) = state_owners.insert(identifier, state.id.as_str())
                    && first != state.id
                {
                    return Err(ZoneRegistryError::DuplicateStateIdentifier {
                        identifier: identifier.to_string(),
                        first: first.to_string(),
                        second: state.id.clone(),
                    });
                }
            }

            let mut declared = BTreeSet::new();
            for (area, sub_zone) in state.areas() {
                check(sub_zone)?;
                check(area)?;
                if let Some(first) = area_owners.insert(area, state.id.as_str()) {
                    return Err(ZoneRegistryError::DuplicateArea {
                        area: area.to_string(),
                        first: first.to_string(),
                        second: state.id.clone(),
                    });
                }
                declared.insert(area);
            }

            for (alias, target) in &state.area_aliases {
                check(alias)?;
                check(target)?;
                if !declared.contains(target.as_str()) {
                    return Err(ZoneRegistryError::DanglingAlias {
                        state: state.id.clone(),
                        alias: alias.clone(),
                        target: target.clone(),
                    });
                }
            }

            for (anchor, rings) in &state.anchors {
                check(anchor)?;
                if !declared.contains(anchor.as_str()) {
                    return Err(ZoneRegistryError::UndeclaredAnchor {
                        state: state.id.clone(),
                        anchor: anchor.clone(),
                    });
                }
                for area in rings.all_areas() {
                    check(area)?;
                }
            }
        }

        Ok(())
    }

    fn build_indexes(&mut self) {
        for state in self.states.values() {
            let name = normalize(&state.name);
            for identifier in state.identifiers().chain(std::iter::once(name.as_str())) {
                self.state_index
                    .entry(identifier.to_string())
                    .or_insert_with(|| state.id.clone());
            }

            for (area, sub_zone) in state.areas() {
                self.area_index
                    .entry(area.to_string())
                    .or_insert_with(|| AreaLocation {
                        state: state.id.clone(),
                        sub_zone: Some(sub_zone.to_string()),
                    });
            }

            for (alias, target) in &state.area_aliases {
                self.alias_index
                    .entry(alias.clone())
                    .or_insert_with(|| target.clone());
            }
        }

        // Ring-only areas are known to belong to the anchor's state even
        // though no sub-zone declares them.
        for state in self.states.values() {
            for (anchor, rings) in &state.anchors {
                for area in std::iter::once(anchor.as_str()).chain(rings.all_areas()) {
                    self.area_index
                        .entry(area.to_string())
                        .or_insert_with(|| AreaLocation {
                            state: state.id.clone(),
                            sub_zone: None,
                        });
                }
            }
        }
    }
}

impl AreaStateLookup for ZoneRegistry {
    fn locate(&self, area: &str) -> Option<AreaLocation> {
        self.area_index.get(&self.resolve_area(area)).cloned()
    }
}

fn check_identifier(state: &str, identifier: &str) -> Result<(), ZoneRegistryError> {
    if IDENTIFIER_RE.is_match(identifier) {
        Ok(())
    } else {
        Err(ZoneRegistryError::InvalidIdentifier {
            state: state.to_string(),
            identifier: identifier.to_string(),
        })
    }
}

fn read_state_dir(dir: &Path) -> Result<Vec<StateZones>, ZoneRegistryError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ZoneRegistryError::Io { path, source }
    };

    let mut paths = std::fs::read_dir(dir)
        .map_err(io_err(dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err(dir))?;
    paths.retain(|path| path.extension().is_some_and(|ext| ext == "toml"));
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path).map_err(io_err(path))?;
            registry::parse_state(&path.display().to_string(), &content)
        })
        .collect()
}
