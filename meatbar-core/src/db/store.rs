//! The store seam between the tracker service and persistence.
//!
//! [`Database`] is the production implementation. Tests substitute in-memory
//! or failing stores to exercise the service without SQLite.

use crate::db::Database;
use crate::error::Result;
use crate::types::{Consumption, NewConsumption, Person};

/// Append-only log of consumptions plus the people they reference.
///
/// Implementations report failures as storage errors and do not log them;
/// logging happens once in the caller that detects the failure.
pub trait EventStore: Send + Sync {
    /// Insert the person if the name is not already present.
    ///
    /// Succeeds without change when the person exists.
    fn ensure_person(&self, name: &str) -> Result<()>;

    /// Append a consumption and return its assigned id.
    fn insert_consumption(&self, new: &NewConsumption) -> Result<i64>;

    /// Full, unfiltered read of every consumption.
    fn list_consumptions(&self) -> Result<Vec<Consumption>>;

    /// Full, unfiltered read of every person.
    fn list_people(&self) -> Result<Vec<Person>>;
}

impl EventStore for Database {
    fn ensure_person(&self, name: &str) -> Result<()> {
        Database::ensure_person(self, name).map(|_| ())
    }

    fn insert_consumption(&self, new: &NewConsumption) -> Result<i64> {
        Database::insert_consumption(self, new)
    }

    fn list_consumptions(&self) -> Result<Vec<Consumption>> {
        Database::list_consumptions(self)
    }

    fn list_people(&self) -> Result<Vec<Person>> {
        Database::list_people(self)
    }
}
