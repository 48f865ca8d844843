//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- WASTE ENTRIES
        -- Food thrown away, valued at log time
        -- ============================================
        CREATE TABLE waste_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_name TEXT NOT NULL,
            quantity REAL NOT NULL,              -- as entered, e.g. 1.5
            unit TEXT NOT NULL,                  -- as entered, e.g. "cups"
            base_quantity REAL NOT NULL,         -- normalized, e.g. 360.0
            base_unit TEXT NOT NULL CHECK(base_unit IN ('g', 'ml', 'piece', 'clove', 'leaf')),
            reason TEXT NOT NULL CHECK(reason IN ('spoiled', 'leftover', 'expired', 'overcooked', 'other')) DEFAULT 'other',

            estimated_value REAL NOT NULL DEFAULT 0,       -- pesos
            estimated_carbon_kg REAL NOT NULL DEFAULT 0,   -- kg CO2e

            wasted_on TEXT NOT NULL,             -- ISO date: "2026-01-09"
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_waste_entries_date ON waste_entries(wasted_on);
        CREATE INDEX idx_waste_entries_item ON waste_entries(item_name);

        -- ============================================
        -- PANTRY ITEMS
        -- Food on hand, with predicted expiry
        -- ============================================
        CREATE TABLE pantry_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            base_quantity REAL NOT NULL,
            base_unit TEXT NOT NULL CHECK(base_unit IN ('g', 'ml', 'piece', 'clove', 'leaf')),

            estimated_value REAL NOT NULL DEFAULT 0,

            stored_on TEXT NOT NULL,             -- ISO date
            expires_on TEXT NOT NULL,            -- ISO date, predicted unless supplied
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_pantry_items_expires ON pantry_items(expires_on);
        CREATE INDEX idx_pantry_items_name ON pantry_items(item_name);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }
}
