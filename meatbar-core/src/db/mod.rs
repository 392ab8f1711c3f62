//! Database layer for meatbar
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository methods for people and consumptions
//! - The [`EventStore`] seam consumed by the tracker service

pub mod repo;
pub mod schema;
pub mod store;

pub use repo::{Database, ImportCounts};
pub use store::EventStore;
