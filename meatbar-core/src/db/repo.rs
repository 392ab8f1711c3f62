//! Database repository layer
//!
//! Provides query and insert operations for people and meat bar consumptions.

use crate::error::{Error, Result};
use crate::types::*;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Row counts from a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportCounts {
    /// People that did not exist before
    pub people_inserted: usize,
    /// Consumptions that were not already stored
    pub events_inserted: usize,
}

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Foreign keys back the person -> consumption reference
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        super::schema::run_migrations(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("database connection lock poisoned".to_string()))
    }

    // ============================================
    // People
    // ============================================

    /// Insert a person unless the name already exists
    ///
    /// Returns true if a row was inserted.
    pub fn ensure_person(&self, name: &str) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn.execute("INSERT OR IGNORE INTO people (name) VALUES (?1)", [name])?;
        Ok(changed > 0)
    }

    /// List all people ordered by name
    pub fn list_people(&self) -> Result<Vec<Person>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM people ORDER BY name")?;

        let people = stmt
            .query_map([], |row| Ok(Person { name: row.get(0)? }))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(people)
    }

    // ============================================
    // Consumptions
    // ============================================

    /// Insert a consumption and return its new id
    ///
    /// The person must already exist; a missing person or a duplicate
    /// `(person_name, type, eaten_at)` fails with a constraint error.
    pub fn insert_consumption(&self, new: &NewConsumption) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO meat_bars (person_name, type, eaten_at) VALUES (?1, ?2, ?3)",
            params![new.person_name, new.bar_type, new.eaten_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List every consumption ordered by id
    pub fn list_consumptions(&self) -> Result<Vec<Consumption>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, person_name, type, eaten_at FROM meat_bars ORDER BY id")?;

        let consumptions = stmt
            .query_map([], |row| Self::row_to_consumption(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(consumptions)
    }

    /// Count stored consumptions
    pub fn count_consumptions(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM meat_bars", [], |r| r.get(0))?;
        Ok(count)
    }

    /// Insert many consumptions in one transaction, skipping ones already stored
    ///
    /// People are created as needed. Either every row is applied or none is.
    pub fn import_consumptions(&self, rows: &[NewConsumption]) -> Result<ImportCounts> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut counts = ImportCounts::default();

        {
            let mut person_stmt = tx.prepare("INSERT OR IGNORE INTO people (name) VALUES (?1)")?;
            let mut bar_stmt = tx.prepare(
                "INSERT OR IGNORE INTO meat_bars (person_name, type, eaten_at) VALUES (?1, ?2, ?3)",
            )?;

            for row in rows {
                counts.people_inserted += person_stmt.execute([&row.person_name])?;
                counts.events_inserted +=
                    bar_stmt.execute(params![row.person_name, row.bar_type, row.eaten_at])?;
            }
        }

        tx.commit()?;
        Ok(counts)
    }

    fn row_to_consumption(row: &Row) -> rusqlite::Result<Consumption> {
        Ok(Consumption {
            id: row.get(0)?,
            person_name: row.get(1)?,
            bar_type: row.get(2)?,
            eaten_at: row.get(3)?,
        })
    }
}
