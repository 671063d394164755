//! Compact incident date parsing.
//!
//! Upstream incident dates use a compact numeric form, either `YYYYMMDD`
//! or `YYYYMMDDHHMMSS`. Anything else parses to the Unix epoch so the
//! incident always sorts oldest and carries the least recency weight.

use chrono::{NaiveDate, NaiveDateTime};

/// The date assigned to incidents whose date string cannot be parsed.
#[must_use]
pub fn epoch_sentinel() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Parses a compact incident date, returning [`epoch_sentinel`] when the
/// string is malformed.
#[must_use]
pub fn parse_incident_date(raw: &str) -> NaiveDateTime {
    try_parse_incident_date(raw).unwrap_or_else(epoch_sentinel)
}

/// Parses a compact incident date.
///
/// Accepts exactly 8 (`YYYYMMDD`) or 14 (`YYYYMMDDHHMMSS`) ASCII digits.
/// Returns `None` for any other input, including out-of-range fields.
#[must_use]
pub fn try_parse_incident_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| raw.get(range)?.parse::<u32>().ok();

    let (hour, minute, second) = match raw.len() {
        8 => (0, 0, 0),
        14 => (field(8..10)?, field(10..12)?, field(12..14)?),
        _ => return None,
    };

    let year = i32::try_from(field(0..4)?).ok()?;
    NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?.and_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_only() {
        let dt = try_parse_incident_date("20260115").unwrap();
        assert_eq!(dt.to_string(), "2026-01-15 00:00:00");
    }

    #[test]
    fn parses_date_time() {
        let dt = try_parse_incident_date("20260115143005").unwrap();
        assert_eq!(dt.to_string(), "2026-01-15 14:30:05");
    }

    #[test]
    fn rejects_malformed() {
        for raw in ["", "2026-01-15", "2026011", "202601151430", "20261315", "2026011525", "abcdefgh"] {
            assert!(
                try_parse_incident_date(raw).is_none(),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn malformed_falls_back_to_epoch() {
        let dt = parse_incident_date("yesterday");
        assert_eq!(dt, epoch_sentinel());
        assert_eq!(dt.to_string(), "1970-01-01 00:00:00");
    }
}
