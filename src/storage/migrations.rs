//! Versioned schema migrations.
//!
//! The `schema_version` table holds a single row with the last applied
//! version. Migrations run in order on every open and are no-ops once
//! applied.

use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use tracing::{debug, info};

/// Latest schema version known to this build.
pub const SCHEMA_VERSION: i32 = 3;

/// Applies every pending migration.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);")?;

    let current = schema_version(conn)?;
    debug!(current, latest = SCHEMA_VERSION, "Checking schema version");

    if current < 1 {
        migrate_v1(conn)?;
    }
    if current < 2 {
        migrate_v2(conn)?;
    }
    if current < 3 {
        migrate_v3(conn)?;
    }

    if current < SCHEMA_VERSION {
        info!(from = current, to = SCHEMA_VERSION, "Database schema migrated");
    }
    Ok(())
}

/// Returns the applied schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> SqliteResult<i32> {
    Ok(conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .optional()?
        .unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: the tasks table, without layout position.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS tasks (id INTEGER PRIMARY KEY, name TEXT, completed BOOLEAN);",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// v2: layout position, flattened into two columns.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "ALTER TABLE tasks ADD COLUMN position_x REAL NOT NULL DEFAULT 0;
         ALTER TABLE tasks ADD COLUMN position_y REAL NOT NULL DEFAULT 0;",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// v3: preference store.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS preferences (
            key   TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        );",
    )?;
    set_schema_version(&tx, 3)?;
    tx.commit()
}
