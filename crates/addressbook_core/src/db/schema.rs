//! Contact table definition and idempotent creation.
//!
//! # Invariants
//! - `CREATE_TABLE_SQL` is create-if-missing; running it never drops or
//!   alters an existing table.
//! - `id` uses `AUTOINCREMENT`, so ids start at 1 and are never reused.
//! - Name and address rules live in the schema as `CHECK` constraints.

use super::SchemaResult;
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

pub const TABLE_NAME: &str = "address_book";

/// Upper bound on `address` length, enforced by the table definition.
pub const ADDRESS_MAX_CHARS: usize = 100;

pub const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS address_book (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL CHECK (length(trim(first_name)) > 0),
    last_name TEXT NOT NULL CHECK (length(trim(last_name)) > 0),
    gender TEXT,
    date_of_birth TEXT,
    phone TEXT,
    email TEXT,
    address TEXT CHECK (address IS NULL OR length(address) <= 100),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT
);";

/// Ensures the `address_book` table exists.
///
/// Safe to call on every startup.
pub fn initialize_table(conn: &Connection) -> SchemaResult<()> {
    let started_at = Instant::now();
    match conn.execute_batch(CREATE_TABLE_SQL) {
        Ok(()) => {
            info!(
                "event=schema_init module=db status=ok table={TABLE_NAME} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error table={TABLE_NAME} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

/// Returns whether the `address_book` table is present.
pub fn table_exists(conn: &Connection) -> SchemaResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [TABLE_NAME],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
