#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk scoring over zoned incidents.
//!
//! Two independent aggregations feed a briefing:
//!
//! * [`score::compute_risk_score`] folds the geographically relevant
//!   incidents into a 1–10 composite score with a level and confidence.
//! * [`dynamic::compute_dynamic_risk`] re-evaluates a slow-moving
//!   historical advisory level against the most recent incidents.
//!
//! Both are pure functions of their inputs. The reference time `now` is
//! an explicit argument; the `*_now` wrappers read the wall clock for
//! callers that do not need reproducible output.

pub mod dynamic;
pub mod score;

use chrono::NaiveDateTime;

pub use dynamic::{compute_dynamic_risk, compute_dynamic_risk_now};
pub use score::{compute_risk_score, compute_risk_score_now};

/// Seconds in a day, for fractional day arithmetic.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Current UTC time as a naive timestamp, matching incident dates.
#[must_use]
pub fn utc_now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Fractional days from `then` to `now`. Negative when `then` is in the
/// future.
#[allow(clippy::cast_precision_loss)]
fn days_between(then: NaiveDateTime, now: NaiveDateTime) -> f64 {
    (now - then).num_seconds() as f64 / SECONDS_PER_DAY
}
