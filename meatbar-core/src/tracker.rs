//! Tracker service: the write path and the analytics read path over an
//! [`EventStore`].
//!
//! Every collaborator (CLI, HTTP server, CSV loader) goes through this type.
//! Store failures are logged here, once, and returned unchanged.

use crate::analytics::{self, event_day};
use crate::db::EventStore;
use crate::error::{Error, Result};
use crate::types::{Consumption, ConsumptionId, MonthlyPeak, NewConsumption, Person, Streak};

/// Records consumptions and derives analytics from the full log.
pub struct Tracker<S> {
    store: S,
}

impl<S: EventStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record that `person_name` ate a `bar_type` bar at `eaten_at`.
    ///
    /// Creates the person first if needed, then appends the consumption.
    /// The two steps are not a transaction: if the second fails, the person
    /// stays created.
    pub fn add_consumption(
        &self,
        person_name: &str,
        bar_type: &str,
        eaten_at: &str,
    ) -> Result<ConsumptionId> {
        self.record_consumption(person_name, bar_type, eaten_at)
            .map(|stored| ConsumptionId { id: stored.id })
    }

    /// Same as [`Tracker::add_consumption`], returning the full stored record.
    pub fn record_consumption(
        &self,
        person_name: &str,
        bar_type: &str,
        eaten_at: &str,
    ) -> Result<Consumption> {
        let new = validate(person_name, bar_type, eaten_at)?;

        self.store
            .ensure_person(&new.person_name)
            .map_err(|e| log_storage_error("ensure person", e))?;

        let id = self
            .store
            .insert_consumption(&new)
            .map_err(|e| log_storage_error("insert consumption", e))?;

        tracing::debug!(
            id,
            person = %new.person_name,
            bar_type = %new.bar_type,
            eaten_at = %new.eaten_at,
            "Recorded consumption"
        );

        Ok(new.into_stored(id))
    }

    /// Every stored consumption
    pub fn list_events(&self) -> Result<Vec<Consumption>> {
        self.store
            .list_consumptions()
            .map_err(|e| log_storage_error("list consumptions", e))
    }

    /// Every known person
    pub fn list_people(&self) -> Result<Vec<Person>> {
        self.store
            .list_people()
            .map_err(|e| log_storage_error("list people", e))
    }

    /// Increasing-consumption streaks over the whole log
    pub fn detect_streaks(&self) -> Result<Vec<Streak>> {
        let events = self.list_events()?;
        let streaks = analytics::detect_streaks(&events);
        tracing::debug!(events = events.len(), streaks = streaks.len(), "Detected streaks");
        Ok(streaks)
    }

    /// Busiest day of each month over the whole log
    pub fn monthly_most_eaten(&self) -> Result<Vec<MonthlyPeak>> {
        let events = self.list_events()?;
        let peaks = analytics::monthly_most_eaten(&events);
        tracing::debug!(events = events.len(), months = peaks.len(), "Computed monthly peaks");
        Ok(peaks)
    }
}

/// Check the write-path arguments and build the record to store.
///
/// All three fields are required and `eaten_at` must be an ISO-8601 date or
/// date-time. Values are stored trimmed.
pub fn validate(person_name: &str, bar_type: &str, eaten_at: &str) -> Result<NewConsumption> {
    let person_name = person_name.trim();
    let bar_type = bar_type.trim();
    let eaten_at = eaten_at.trim();

    let missing: Vec<&str> = [
        ("person_name", person_name),
        ("type", bar_type),
        ("eaten_at", eaten_at),
    ]
    .iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| *field)
    .collect();

    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    if event_day(eaten_at).is_none() {
        return Err(Error::Validation(format!(
            "eaten_at is not an ISO-8601 date: {:?}",
            eaten_at
        )));
    }

    Ok(NewConsumption::new(person_name, bar_type, eaten_at))
}

fn log_storage_error(operation: &str, err: Error) -> Error {
    tracing::error!(operation, error = %err, "Store operation failed");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn tracker() -> Tracker<Database> {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        Tracker::new(db)
    }

    /// Store that records call order and fails on request.
    #[derive(Default)]
    struct FakeStore {
        calls: Mutex<Vec<String>>,
        fail_reads: bool,
        fail_insert: bool,
        events: Mutex<Vec<Consumption>>,
    }

    impl FakeStore {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl EventStore for FakeStore {
        fn ensure_person(&self, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("person:{}", name));
            Ok(())
        }

        fn insert_consumption(&self, new: &NewConsumption) -> Result<i64> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("bar:{}:{}:{}", new.person_name, new.bar_type, new.eaten_at));
            if self.fail_insert {
                return Err(Error::Storage("SQLITE_CONSTRAINT".to_string()));
            }
            let mut events = self.events.lock().unwrap();
            let id = 33 + events.len() as i64;
            events.push(new.clone().into_stored(id));
            Ok(id)
        }

        fn list_consumptions(&self) -> Result<Vec<Consumption>> {
            if self.fail_reads {
                return Err(Error::Storage("SQLITE_ERROR".to_string()));
            }
            Ok(self.events.lock().unwrap().clone())
        }

        fn list_people(&self) -> Result<Vec<Person>> {
            if self.fail_reads {
                return Err(Error::Storage("SQLITE_ERROR".to_string()));
            }
            Ok(vec![])
        }
    }

    /// Counts ERROR-level events.
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Run `f` and return how many errors it logged.
    fn count_errors<F: FnOnce()>(f: F) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn test_write_then_read() {
        let tracker = tracker();

        let id = tracker.add_consumption("bob", "bison", "2025-01-01").unwrap();

        let events = tracker.list_events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id.id);
        assert_eq!(events[0].person_name, "bob");
        assert_eq!(events[0].bar_type, "bison");
        assert_eq!(events[0].eaten_at, "2025-01-01");

        tracker.add_consumption("bob", "lamb", "2025-01-02").unwrap();
        let people = tracker.list_people().unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].name, "bob");
    }

    #[test]
    fn test_person_created_before_consumption() {
        let tracker = Tracker::new(FakeStore::default());

        let id = tracker.add_consumption("bob", "bison", "2025-01-01").unwrap();

        assert_eq!(id, ConsumptionId { id: 33 });
        assert_eq!(
            tracker.store().calls(),
            vec!["person:bob", "bar:bob:bison:2025-01-01"]
        );
    }

    #[test]
    fn test_failed_insert_is_logged_and_returned() {
        let tracker = Tracker::new(FakeStore {
            fail_insert: true,
            ..Default::default()
        });

        let errors = count_errors(|| {
            let err = tracker
                .add_consumption("bob", "bison", "2025-01-01")
                .unwrap_err();
            assert_eq!(err.to_string(), "storage error: SQLITE_CONSTRAINT");
        });

        assert_eq!(errors, 1);
        // The person step already ran and is not rolled back
        assert_eq!(tracker.store().calls().len(), 2);
    }

    #[test]
    fn test_failed_read_propagates_and_logs_once() {
        let tracker = Tracker::new(FakeStore {
            fail_reads: true,
            ..Default::default()
        });

        let errors = count_errors(|| {
            let err = tracker.detect_streaks().unwrap_err();
            assert!(err.is_storage());
            assert_eq!(err.to_string(), "storage error: SQLITE_ERROR");
        });
        assert_eq!(errors, 1);

        let errors = count_errors(|| {
            let err = tracker.monthly_most_eaten().unwrap_err();
            assert!(err.is_storage());
        });
        assert_eq!(errors, 1);

        let errors = count_errors(|| {
            assert!(tracker.list_people().is_err());
        });
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_validation_rejects_before_store() {
        let tracker = Tracker::new(FakeStore::default());

        let err = tracker.add_consumption("", "bison", " ").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "validation error: missing required fields: person_name, eaten_at"
        );

        let err = tracker
            .add_consumption("bob", "bison", "last tuesday")
            .unwrap_err();
        assert!(err.is_validation());

        assert!(tracker.store().calls().is_empty());
    }

    #[test]
    fn test_record_returns_stored_values() {
        let tracker = tracker();
        let stored = tracker
            .record_consumption(" bob ", "bison", "2025-01-01T12:00:00Z")
            .unwrap();
        assert_eq!(stored.person_name, "bob");
        assert_eq!(tracker.list_events().unwrap(), vec![stored]);
    }

    #[test]
    fn test_validate_trims_values() {
        let new = validate("  bob ", " bison", "2025-01-01T12:00:00Z ").unwrap();
        assert_eq!(new, NewConsumption::new("bob", "bison", "2025-01-01T12:00:00Z"));
    }

    #[test]
    fn test_validate_accepts_offset_variants() {
        for eaten_at in [
            "2025-01-01T12:00Z",
            "2025-01-01T12:00+01:00",
            "2025-01-01T12:00:00+0100",
            "2025-01-01 12:00-05:00",
        ] {
            let new = validate("bob", "bison", eaten_at).unwrap();
            assert_eq!(new.eaten_at, eaten_at);
        }
    }

    #[test]
    fn test_empty_log_analytics() {
        let tracker = tracker();
        assert!(tracker.detect_streaks().unwrap().is_empty());
        assert!(tracker.monthly_most_eaten().unwrap().is_empty());
    }

    #[test]
    fn test_analytics_over_store() {
        let tracker = tracker();
        let log = [
            ("bob", "beef", "2025-01-01"),
            ("bob", "beef", "2025-01-02"),
            ("ann", "lamb", "2025-01-02"),
            ("bob", "bison", "2025-01-03"),
            ("ann", "beef", "2025-01-03"),
            ("cat", "beef", "2025-01-03"),
            ("cat", "lamb", "2025-01-03"),
            ("bob", "beef", "2025-01-04"),
            ("ann", "bison", "2025-01-04"),
            ("cat", "bison", "2025-01-04"),
        ];
        for (person, bar_type, eaten_at) in log {
            tracker.add_consumption(person, bar_type, eaten_at).unwrap();
        }

        let streaks = tracker.detect_streaks().unwrap();
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].daily_counts, "1, 2, 4");
        assert_eq!(streaks[0].length, 3);

        let peaks = tracker.monthly_most_eaten().unwrap();
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].month, "2025-01");
        assert_eq!(peaks[0].day_of_month.to_string(), "2025-01-03");
        assert_eq!(peaks[0].daily_count, 4);
    }
}
