//! Bulk CSV import
//!
//! Loads a file with the header `person,meat-bar-type,date` into the
//! database in one transaction. Loading the same file twice is a no-op the
//! second time.

use crate::analytics::event_day;
use crate::db::{Database, ImportCounts};
use crate::error::{Error, Result};
use crate::types::NewConsumption;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One CSV row, before validation.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    person: String,
    #[serde(rename = "meat-bar-type", default)]
    bar_type: String,
    #[serde(default)]
    date: String,
}

/// Outcome of a CSV load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data rows read from the file
    pub rows_read: usize,
    /// People that did not exist before
    pub people_inserted: usize,
    /// Consumptions added (duplicates are not counted)
    pub events_inserted: usize,
    /// Rows with an empty field or an unparseable date
    pub rows_skipped: usize,
}

/// Load a CSV file into the database.
pub fn load_csv(db: &Database, path: &Path) -> Result<LoadReport> {
    let file = std::fs::File::open(path)?;
    tracing::info!(path = %path.display(), "Loading consumptions from CSV");
    load_reader(db, file)
}

/// Load CSV data from any reader into the database.
pub fn load_reader<R: Read>(db: &Database, reader: R) -> Result<LoadReport> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut report = LoadReport::default();
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CsvRow>() {
        let row = record?;
        report.rows_read += 1;

        if row.person.is_empty() || row.bar_type.is_empty() || row.date.is_empty() {
            report.rows_skipped += 1;
            continue;
        }
        if event_day(&row.date).is_none() {
            tracing::warn!(line = report.rows_read + 1, date = %row.date, "Skipping row with unparseable date");
            report.rows_skipped += 1;
            continue;
        }

        rows.push(NewConsumption::new(row.person, row.bar_type, row.date));
    }

    if report.rows_read == 0 {
        return Err(Error::Validation("no data found in CSV".to_string()));
    }

    let ImportCounts {
        people_inserted,
        events_inserted,
    } = db.import_consumptions(&rows)?;
    report.people_inserted = people_inserted;
    report.events_inserted = events_inserted;

    tracing::info!(
        rows_read = report.rows_read,
        people_inserted,
        events_inserted,
        rows_skipped = report.rows_skipped,
        "CSV load complete"
    );

    Ok(report)
}
