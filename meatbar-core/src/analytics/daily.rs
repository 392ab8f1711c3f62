//! Daily count series shared by the streak and monthly analytics.

use crate::types::{Consumption, DailyCount};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

/// Offset-carrying layouts not covered by RFC 3339: minute precision, a space
/// separator, or an offset without a colon.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive date-time layouts accepted for `eaten_at`, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Truncate an ISO-8601 `eaten_at` value to its calendar day.
///
/// Values carrying `Z` or an offset are converted to UTC first. Naive
/// date-times keep their own date. Returns `None` for anything else.
pub fn event_day(eaten_at: &str) -> Option<NaiveDate> {
    let value = eaten_at.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    let zoned = match value.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, format) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Count consumptions per calendar day, ascending by date.
///
/// Days without consumptions are absent, never zero entries. Events whose
/// `eaten_at` does not parse are left out with a warning.
pub fn daily_counts(events: &[Consumption]) -> Vec<DailyCount> {
    let mut by_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();

    for event in events {
        match event_day(&event.eaten_at) {
            Some(date) => *by_day.entry(date).or_insert(0) += 1,
            None => tracing::warn!(
                id = event.id,
                eaten_at = %event.eaten_at,
                "Skipping consumption with unparseable date"
            ),
        }
    }

    by_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn bar(id: i64, eaten_at: &str) -> Consumption {
        Consumption {
            id,
            person_name: "bob".to_string(),
            bar_type: "beef".to_string(),
            eaten_at: eaten_at.to_string(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_day_formats() {
        assert_eq!(event_day("2025-01-01"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2025-01-01T23:30:00"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2025-01-01 08:15:00.250"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2025-01-01T12:00:00Z"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2015-01-01T03:59:02.000Z"), Some(day(2015, 1, 1)));
        assert_eq!(event_day(" 2025-03-04 "), Some(day(2025, 3, 4)));
        assert_eq!(event_day("2025-01-01T12:00Z"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2025-01-01 12:00Z"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2025-01-01T12:00+01:00"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2025-01-01T12:00:00+0100"), Some(day(2025, 1, 1)));
        assert_eq!(event_day("2025-01-01 12:00:00.5+01:00"), Some(day(2025, 1, 1)));
    }

    #[test]
    fn test_event_day_short_offsets_convert_to_utc() {
        // 00:30 at +0100 is 23:30 UTC the day before
        assert_eq!(event_day("2025-01-01T00:30:00+0100"), Some(day(2024, 12, 31)));
        assert_eq!(event_day("2025-01-01T23:30-02:00"), Some(day(2025, 1, 2)));
        assert_eq!(event_day("2025-01-01 23:30-0200"), Some(day(2025, 1, 2)));
        assert_eq!(event_day("2025-01-01T23:30Z"), Some(day(2025, 1, 1)));
    }

    #[test]
    fn test_event_day_offset_converts_to_utc() {
        // 23:30 at -02:00 is 01:30 UTC the next day
        assert_eq!(event_day("2025-01-01T23:30:00-02:00"), Some(day(2025, 1, 2)));
        assert_eq!(event_day("2025-01-02T00:30:00+01:00"), Some(day(2025, 1, 1)));
    }

    #[test]
    fn test_event_day_rejects_garbage() {
        assert_eq!(event_day(""), None);
        assert_eq!(event_day("yesterday"), None);
        assert_eq!(event_day("2025-13-01"), None);
        assert_eq!(event_day("01/02/2025"), None);
    }

    #[test]
    fn test_daily_counts_sorted_without_gaps() {
        let events = vec![
            bar(1, "2025-01-03T10:00:00Z"),
            bar(2, "2025-01-01"),
            bar(3, "2025-01-03"),
            bar(4, "2025-01-01T20:00:00"),
            bar(5, "2025-01-01"),
        ];

        let counts = daily_counts(&events);
        assert_eq!(
            counts,
            vec![
                DailyCount {
                    date: day(2025, 1, 1),
                    count: 3
                },
                DailyCount {
                    date: day(2025, 1, 3),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_daily_counts_skips_unparseable() {
        let events = vec![bar(1, "not a date"), bar(2, "2025-01-01")];
        let counts = daily_counts(&events);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 1);
    }

    #[test]
    fn test_daily_counts_empty() {
        assert!(daily_counts(&[]).is_empty());
    }
}
