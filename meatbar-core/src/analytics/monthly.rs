//! Busiest day per calendar month.

use super::daily::daily_counts;
use crate::types::{Consumption, DailyCount, MonthlyPeak};
use chrono::Datelike;
use std::collections::BTreeMap;

/// For each month present in the log, the day with the most consumptions.
///
/// Ordered by month ascending. Ties go to the earliest date in the month.
pub fn monthly_most_eaten(events: &[Consumption]) -> Vec<MonthlyPeak> {
    peaks_from_daily(&daily_counts(events))
}

/// Monthly peaks from a daily series sorted by date.
pub fn peaks_from_daily(days: &[DailyCount]) -> Vec<MonthlyPeak> {
    let mut peaks: BTreeMap<(i32, u32), DailyCount> = BTreeMap::new();

    for day in days {
        let key = (day.date.year(), day.date.month());
        peaks
            .entry(key)
            .and_modify(|best| {
                // Strictly greater, or earlier on a tie
                if day.count > best.count || (day.count == best.count && day.date < best.date) {
                    *best = *day;
                }
            })
            .or_insert(*day);
    }

    peaks
        .into_values()
        .map(|best| MonthlyPeak {
            month: best.date.format("%Y-%m").to_string(),
            day_of_month: best.date,
            daily_count: best.count,
        })
        .collect()
}
