//! Analytics module for meatbar
//!
//! Derives time-series views from the consumption log:
//! - Daily count series (the shared first step)
//! - Increasing-consumption streaks
//! - Busiest day per month
//!
//! Everything here is a pure function of the events passed in. Nothing is
//! cached; callers re-read the store for every request.

pub mod daily;
pub mod monthly;
pub mod streaks;

pub use daily::{daily_counts, event_day};
pub use monthly::{monthly_most_eaten, peaks_from_daily};
pub use streaks::{detect_streaks, streaks_from_daily, MIN_STREAK_DAYS};
