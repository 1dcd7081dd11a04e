//! # Carrier Timestamps
//!
//! Carriers report delivery estimates and scan events in a handful of
//! formats: full RFC 3339, an offset-less `YYYY-MM-DDTHH:MM:SS`, or a bare
//! date. All of them are normalized to the wall-clock time the carrier
//! reported (`NaiveDateTime`); the raw upstream value stays available on
//! the result's `response` field.
//!
//! Parsing is lenient: an unrecognized value yields `None` rather than an
//! error, so one odd date never discards an otherwise valid quote.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a carrier-supplied date or date-time.
pub fn parse_carrier_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn rfc3339_keeps_reported_wall_clock() {
        let dt = parse_carrier_datetime("2018-02-02T12:01:00-07:00").unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.day(), 2);
    }

    #[test]
    fn offsetless_datetime() {
        let dt = parse_carrier_datetime("2024-06-18T10:30:00").unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour(), dt.minute()), (6, 18, 10, 30));
    }

    #[test]
    fn bare_date_is_midnight() {
        let dt = parse_carrier_datetime("2024-06-18").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.year(), 2024);
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_carrier_datetime("").is_none());
        assert!(parse_carrier_datetime("TUE").is_none());
        assert!(parse_carrier_datetime("2024-13-40").is_none());
    }
}
