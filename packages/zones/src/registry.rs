//! Compile-time registry of curated state zone data.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new state requires creating a TOML file in `states/` and adding
//! a corresponding entry here.

use safepath_zones_models::StateZones;

use crate::ZoneRegistryError;

/// Number of embedded states. Updated when new states are added.
/// Enforced by a test.
#[cfg(test)]
const EXPECTED_STATE_COUNT: usize = 8;

/// Embedded TOML state definitions.
const STATE_TOMLS: &[(&str, &str)] = &[
    ("lagos", include_str!("../states/lagos.toml")),
    ("ogun", include_str!("../states/ogun.toml")),
    ("oyo", include_str!("../states/oyo.toml")),
    ("fct", include_str!("../states/fct.toml")),
    ("kaduna", include_str!("../states/kaduna.toml")),
    ("rivers", include_str!("../states/rivers.toml")),
    ("edo", include_str!("../states/edo.toml")),
    ("delta", include_str!("../states/delta.toml")),
];

/// Parses one state's zone data from TOML.
///
/// # Errors
///
/// Returns [`ZoneRegistryError::Parse`] if the TOML does not match the
/// [`StateZones`] schema.
pub fn parse_state(name: &str, toml_str: &str) -> Result<StateZones, ZoneRegistryError> {
    toml::de::from_str(toml_str).map_err(|source| ZoneRegistryError::Parse {
        name: name.to_string(),
        source,
    })
}

/// Returns all embedded states.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_states() -> Vec<StateZones> {
    STATE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            parse_state(name, toml_str).unwrap_or_else(|e| panic!("{e}"))
        })
        .collect()
}
