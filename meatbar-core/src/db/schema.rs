//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: people and their meat bars
    r#"
    CREATE TABLE IF NOT EXISTS people (
        name             TEXT PRIMARY KEY NOT NULL
    );

    CREATE TABLE IF NOT EXISTS meat_bars (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        person_name      TEXT NOT NULL,
        type             TEXT NOT NULL,
        eaten_at         TEXT NOT NULL,
        FOREIGN KEY (person_name) REFERENCES people (name),
        UNIQUE(person_name, type, eaten_at)
    );
    "#,
    // Version 2: analytics scan in date order
    r#"
    CREATE INDEX IF NOT EXISTS idx_meat_bars_eaten_at ON meat_bars(eaten_at);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["people", "meat_bars"] {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        run_migrations(&conn).unwrap();

        let fk_list: Vec<(String, String)> = conn
            .prepare("PRAGMA foreign_key_list(meat_bars)")
            .unwrap()
            .query_map([], |row| {
                Ok((row.get::<_, String>(2)?, row.get::<_, String>(3)?))
            })
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(
            fk_list,
            vec![("people".to_string(), "person_name".to_string())]
        );

        // A bar for an unknown person is rejected
        let err = conn.execute(
            "INSERT INTO meat_bars (person_name, type, eaten_at) VALUES ('ghost', 'beef', '2025-01-01')",
            [],
        );
        assert!(err.is_err());
    }
}
