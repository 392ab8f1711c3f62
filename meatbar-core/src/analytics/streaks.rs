//! Increasing-consumption streak detection.
//!
//! A streak is a run of consecutive days *in the daily series* where each
//! day's count is strictly greater than the previous entry's. Calendar days
//! with no consumptions are not in the series, so they neither break nor
//! extend a run; only the count comparison does.

use super::daily::daily_counts;
use crate::types::{Consumption, DailyCount, Streak};

/// Minimum number of days for a run to be reported.
pub const MIN_STREAK_DAYS: usize = 2;

/// Detect every increasing streak in a consumption log, ordered by start date.
pub fn detect_streaks(events: &[Consumption]) -> Vec<Streak> {
    streaks_from_daily(&daily_counts(events))
}

/// Detect streaks in a daily series that is already sorted by date.
///
/// Linear scan: the first entry compares against a previous count of 0, a
/// count that is not strictly greater than its predecessor starts a new
/// group, and groups shorter than [`MIN_STREAK_DAYS`] are dropped.
pub fn streaks_from_daily(days: &[DailyCount]) -> Vec<Streak> {
    let mut streaks = Vec::new();
    let mut group_id = 0u32;
    let mut prev_count = 0u32;
    let mut group: Vec<DailyCount> = Vec::new();

    for day in days {
        if day.count <= prev_count {
            if let Some(streak) = close_group(group_id, &group) {
                streaks.push(streak);
            }
            group.clear();
            group_id += 1;
        }
        group.push(*day);
        prev_count = day.count;
    }

    if let Some(streak) = close_group(group_id, &group) {
        streaks.push(streak);
    }

    streaks
}

fn close_group(id: u32, group: &[DailyCount]) -> Option<Streak> {
    if group.len() < MIN_STREAK_DAYS {
        return None;
    }

    let first = group.first()?;
    let last = group.last()?;

    Some(Streak {
        id,
        length: group.len() as u32,
        start_date: first.date,
        end_date: last.date,
        daily_counts: group
            .iter()
            .map(|d| d.count.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
