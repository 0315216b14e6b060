//! Connection bootstrap for the contact store.
//!
//! # Responsibility
//! - Open a file or in-memory SQLite connection from a parsed target.
//! - Apply connection settings the repository relies on.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a bounded busy timeout.
//! - Returned connections have been read from at least once, so a file that
//!   is not a database fails here instead of on the first query.

use super::{ConnectionError, ConnectionResult};
use crate::config::StoreTarget;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the store described by `target`.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `db_open` log events with duration and status.
pub fn connect(target: &StoreTarget) -> ConnectionResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match target {
        StoreTarget::SqliteFile(path) => Connection::open(path),
        StoreTarget::SqliteMemory => Connection::open_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(ConnectionError::Open {
                target: target.to_string(),
                source: err,
            });
        }
    };

    if let Err(err) = configure(&conn) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(ConnectionError::Configure(err));
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Parses a target string such as `sqlite:address-book.sqlite3` and opens it.
pub fn open_target(target: &str) -> ConnectionResult<Connection> {
    connect(&StoreTarget::parse(target)?)
}

/// Opens a file-backed store at `path`.
pub fn open_store(path: impl AsRef<Path>) -> ConnectionResult<Connection> {
    connect(&StoreTarget::file(path))
}

/// Opens a private in-memory store.
pub fn open_store_in_memory() -> ConnectionResult<Connection> {
    connect(&StoreTarget::SqliteMemory)
}

fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.query_row("PRAGMA schema_version;", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}
