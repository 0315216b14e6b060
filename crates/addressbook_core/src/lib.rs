//! Contact persistence facade over SQLite.
//! Owns the connection lifecycle, the `address_book` schema and the
//! record-store operations for contacts.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, StoreTarget, DEFAULT_STORE_TARGET};
pub use db::{ConnectionError, SchemaError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, ContactInput};
pub use repo::clock::{Clock, FixedClock, SystemClock};
pub use repo::contact_repo::{
    ContactListing, ContactRepository, DeleteSummary, InsertSummary, SqliteContactRepository,
    StoreError, StoreResult, UpdateSummary,
};
pub use service::address_book::{AddressBook, Outcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
