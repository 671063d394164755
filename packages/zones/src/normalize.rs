//! Location normalization and fuzzy matching.
//!
//! Incident locations are free text pulled out of headlines by the
//! upstream classifier ("Lekki Phase 1 area", "Port Harcourt, Rivers"),
//! while registry identifiers are curated slugs (`lekki`,
//! `port-harcourt`). Matching falls back through three tiers: exact,
//! substring, then a shared significant token. There is no edit-distance
//! or phonetic matching, so every result can be explained from the two
//! strings alone.

use regex::Regex;
use std::sync::LazyLock;

/// Characters that never appear in a normalized identifier.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").expect("valid regex"));

/// Tokens must be longer than this to count as a shared token match.
pub const MIN_SIGNIFICANT_TOKEN_LEN: usize = 3;

/// Normalizes a location string into identifier form.
///
/// The pipeline:
/// 1. Lowercase
/// 2. Trim and collapse whitespace runs into single hyphens
/// 3. Strip every character outside `[a-z0-9-]`
#[must_use]
pub fn normalize(input: &str) -> String {
    let lower = input.to_lowercase();
    let hyphenated = lower.split_whitespace().collect::<Vec<_>>().join("-");
    DISALLOWED_RE.replace_all(&hyphenated, "").into_owned()
}

/// Decides whether two location strings refer to the same place.
///
/// Both sides are normalized first. Strings that normalize to nothing
/// never match.
#[must_use]
pub fn locations_match(a: &str, b: &str) -> bool {
    normalized_match(&normalize(a), &normalize(b))
}

/// [`locations_match`] for strings that are already normalized.
#[must_use]
pub fn normalized_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    if a == b || a.contains(b) || b.contains(a) {
        return true;
    }

    significant_tokens(a).any(|token| significant_tokens(b).any(|other| other == token))
}

/// Returns `true` if `location` matches any entry in `candidates`.
#[must_use]
pub fn matches_any<S: AsRef<str>>(location: &str, candidates: &[S]) -> bool {
    let location = normalize(location);
    candidates
        .iter()
        .any(|candidate| normalized_match(&location, &normalize(candidate.as_ref())))
}

/// Whether `identifier` appears in `normalized` as a run of whole
/// hyphen-delimited tokens, so `edo` is found in `benin-edo-state` but
/// not in `toledo`. Both sides must already be normalized.
#[must_use]
pub fn contains_token_run(normalized: &str, identifier: &str) -> bool {
    !identifier.is_empty() && format!("-{normalized}-").contains(&format!("-{identifier}-"))
}

fn significant_tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split('-')
        .filter(|token| token.len() > MIN_SIGNIFICANT_TOKEN_LEN)
}
