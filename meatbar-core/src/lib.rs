//! # meatbar-core
//!
//! Core library for meatbar - a meat bar consumption tracker.
//!
//! This library provides:
//! - Domain types for people and consumptions
//! - Database storage layer with SQLite
//! - Streak and monthly-peak analytics
//! - CSV bulk import
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through two layers:
//! - **Stored:** `people` and `meat_bars` tables, append-only
//! - **Derived:** daily counts, streaks and monthly peaks, recomputed per request
//!
//! ## Example
//!
//! ```rust,no_run
//! use meatbar_core::{Config, Database, Tracker};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let tracker = Tracker::new(db);
//! tracker.add_consumption("bob", "bison", "2025-01-01").expect("failed to record");
//! for streak in tracker.detect_streaks().expect("failed to read") {
//!     println!("{} -> {}: {}", streak.start_date, streak.end_date, streak.daily_counts);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, EventStore};
pub use error::{Error, Result};
pub use ingest::{load_csv, LoadReport};
pub use tracker::Tracker;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod tracker;
pub mod types;
