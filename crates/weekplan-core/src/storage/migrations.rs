//! Database schema migrations for weekplan.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: containers and their work items.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS containers (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            label       TEXT NOT NULL,
            deadline    TEXT NOT NULL,
            url         TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS work_items (
            id                TEXT PRIMARY KEY,
            container_id      TEXT NOT NULL REFERENCES containers(id) ON DELETE CASCADE,
            kind              TEXT NOT NULL,
            title             TEXT NOT NULL,
            description       TEXT,
            url               TEXT,
            hour_estimate     REAL,
            status            TEXT NOT NULL DEFAULT 'pending',
            completed_at      TEXT,
            sequence_position INTEGER,
            global_position   INTEGER,
            created_at        TEXT NOT NULL,
            UNIQUE (container_id, title)
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()?;
    Ok(())
}

/// Migration v2: indexes for per-user snapshot reads.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_containers_user_deadline ON containers(user_id, deadline);
         CREATE INDEX IF NOT EXISTS idx_work_items_container ON work_items(container_id);
         CREATE INDEX IF NOT EXISTS idx_work_items_status ON work_items(status);",
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()?;
    Ok(())
}
