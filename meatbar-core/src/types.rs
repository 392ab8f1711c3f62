//! Core domain types for meatbar
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Person** | Someone who eats meat bars, identified by a unique name |
//! | **Consumption** | One recorded instance of a person eating a typed bar |
//! | **DailyCount** | Number of consumptions on one calendar day (derived) |
//! | **Streak** | A run of 2+ present days with strictly increasing counts (derived) |
//! | **MonthlyPeak** | The busiest day of a calendar month (derived) |
//!
//! Only [`Person`] and [`Consumption`] are persisted. The derived types are
//! recomputed from the full consumption log on every request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// Persisted entities
// ============================================

/// A person, created implicitly the first time their name is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique name
    pub name: String,
}

/// A stored consumption event.
///
/// Immutable once written. `eaten_at` keeps the caller's ISO-8601 text as-is;
/// day truncation happens only when analytics are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    /// Auto-assigned row id
    pub id: i64,
    /// Name of the person (references [`Person::name`])
    pub person_name: String,
    /// Free-form bar type (e.g. "bison", "lamb")
    #[serde(rename = "type")]
    pub bar_type: String,
    /// ISO-8601 date or date-time
    pub eaten_at: String,
}

/// A consumption that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewConsumption {
    pub person_name: String,
    #[serde(rename = "type")]
    pub bar_type: String,
    pub eaten_at: String,
}

impl NewConsumption {
    pub fn new(
        person_name: impl Into<String>,
        bar_type: impl Into<String>,
        eaten_at: impl Into<String>,
    ) -> Self {
        Self {
            person_name: person_name.into(),
            bar_type: bar_type.into(),
            eaten_at: eaten_at.into(),
        }
    }

    /// Attach the id assigned by the store.
    pub fn into_stored(self, id: i64) -> Consumption {
        Consumption {
            id,
            person_name: self.person_name,
            bar_type: self.bar_type,
            eaten_at: self.eaten_at,
        }
    }
}

/// Identifier returned by the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsumptionId {
    pub id: i64,
}

// ============================================
// Derived analytics
// ============================================

/// Consumption count for one calendar day.
///
/// Only days with at least one consumption are ever materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// A run of consecutive present days whose counts strictly increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    /// Group ordinal; only meaningful for ordering
    #[serde(rename = "streak_id")]
    pub id: u32,
    /// Number of days in the run (always >= 2)
    #[serde(rename = "streak_length")]
    pub length: u32,
    #[serde(rename = "streak_start")]
    pub start_date: NaiveDate,
    #[serde(rename = "streak_end")]
    pub end_date: NaiveDate,
    /// Per-day counts in date order, joined with ", "
    #[serde(rename = "streak_counts")]
    pub daily_counts: String,
}

/// The day with the most consumptions in a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPeak {
    /// Month as `YYYY-MM`
    #[serde(rename = "consumption_month")]
    pub month: String,
    /// The peak date (`YYYY-MM-DD`)
    pub day_of_month: NaiveDate,
    pub daily_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumption_wire_names() {
        let c = NewConsumption::new("bob", "bison", "2025-01-01").into_stored(7);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["person_name"], "bob");
        assert_eq!(json["type"], "bison");
        assert_eq!(json["eaten_at"], "2025-01-01");
    }

    #[test]
    fn test_streak_wire_names() {
        let streak = Streak {
            id: 0,
            length: 2,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            daily_counts: "1, 2".to_string(),
        };
        let json = serde_json::to_value(&streak).unwrap();
        assert_eq!(json["streak_length"], 2);
        assert_eq!(json["streak_start"], "2025-01-01");
        assert_eq!(json["streak_end"], "2025-01-02");
        assert_eq!(json["streak_counts"], "1, 2");
    }

    #[test]
    fn test_monthly_peak_wire_names() {
        let peak = MonthlyPeak {
            month: "2025-03".to_string(),
            day_of_month: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            daily_count: 4,
        };
        let json = serde_json::to_value(&peak).unwrap();
        assert_eq!(json["consumption_month"], "2025-03");
        assert_eq!(json["day_of_month"], "2025-03-09");
        assert_eq!(json["daily_count"], 4);
    }

    #[test]
    fn test_new_consumption_from_json() {
        let new: NewConsumption = serde_json::from_str(
            r#"{"person_name":"ann","type":"lamb","eaten_at":"2025-02-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(new.bar_type, "lamb");
    }
}
