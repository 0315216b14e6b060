//! SQLite connection bootstrap and schema initialization.
//!
//! # Responsibility
//! - Open and configure the single store connection.
//! - Ensure the `address_book` table exists before data access.
//!
//! # Invariants
//! - Driver failures are returned as typed errors, never swallowed.
//! - Schema setup is create-if-missing only; existing tables are never altered.

use crate::config::ConfigError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{connect, open_store, open_store_in_memory, open_target};
pub use schema::{initialize_table, table_exists, ADDRESS_MAX_CHARS, CREATE_TABLE_SQL, TABLE_NAME};

pub type ConnectionResult<T> = Result<T, ConnectionError>;
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Failure to open or configure the store connection.
#[derive(Debug)]
pub enum ConnectionError {
    InvalidTarget(ConfigError),
    Open {
        target: String,
        source: rusqlite::Error,
    },
    Configure(rusqlite::Error),
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTarget(err) => write!(f, "{err}"),
            Self::Open { source, .. } => write!(f, "{source}"),
            Self::Configure(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTarget(err) => Some(err),
            Self::Open { source, .. } => Some(source),
            Self::Configure(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ConnectionError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidTarget(value)
    }
}

/// DDL rejected by the store.
#[derive(Debug)]
pub enum SchemaError {
    Ddl(rusqlite::Error),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ddl(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ddl(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for SchemaError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Ddl(value)
    }
}
