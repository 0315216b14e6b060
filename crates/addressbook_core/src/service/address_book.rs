//! Address book facade over one store connection.
//!
//! # Responsibility
//! - Own the connection for the facade lifetime (connect once, no reconnect).
//! - Run schema initialization at startup.
//! - Turn every repository call into an `Outcome` carrying a human-readable
//!   `message` and, on failure only, the store's `error` text.
//!
//! # Invariants
//! - No operation panics or lets a driver error escape; failures become
//!   `Outcome::error`.
//! - Zero-row results (empty search, update/delete of a missing id) are
//!   successes.
//! - Operations on a facade that failed to start return a failed outcome.

use crate::config::{StoreConfig, StoreTarget};
use crate::db::{connect, initialize_table, ConnectionError, CREATE_TABLE_SQL, TABLE_NAME};
use crate::model::contact::{Contact, ContactId, ContactInput};
use crate::repo::clock::{Clock, SystemClock};
use crate::repo::contact_repo::{
    ContactListing, ContactRepository, DeleteSummary, InsertSummary, SqliteContactRepository,
    StoreError, UpdateSummary,
};
use log::{info, warn};
use rusqlite::Connection;
use std::fmt::Display;

pub const NOT_CONNECTED_MESSAGE: &str = "Could not connect to the database";
pub const CONNECTED_MESSAGE: &str = "Successfully connected to the database";

/// Per-call status envelope.
///
/// Callers must treat a present `error` as authoritative failure even when
/// they also inspect `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    /// Payload on success. `None` on failure, except for a failed batch
    /// insert, which carries the rows committed before the failure.
    pub value: Option<T>,
    /// Human-readable description; may embed counts.
    pub message: String,
    /// Store error text as reported by the driver, set only on failure.
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    fn success(value: T, message: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            message: message.into(),
            error: None,
        }
    }

    fn failure(message: impl Into<String>, error: impl Display) -> Self {
        Self {
            value: None,
            message: message.into(),
            error: Some(error.to_string()),
        }
    }

    fn partial(value: T, message: impl Into<String>, error: impl Display) -> Self {
        Self {
            value: Some(value),
            message: message.into(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`, using the error text as the `Err` payload.
    pub fn into_result(self) -> Result<T, String> {
        match (self.value, self.error) {
            (_, Some(error)) => Err(error),
            (Some(value), None) => Ok(value),
            (None, None) => Err(self.message),
        }
    }
}

type FacadeRepository<'book> = SqliteContactRepository<'book, &'book (dyn Clock + Send)>;

/// Contact store facade: connect, initialize, then any interleaving of
/// insert, update, get, search, list and delete.
pub struct AddressBook {
    conn: Option<Connection>,
    clock: Box<dyn Clock + Send>,
    schema_ready: bool,
    startup: Outcome<()>,
}

impl AddressBook {
    /// Connects to `target` and initializes the table.
    ///
    /// Never fails; inspect `startup()` or `is_ready()` afterwards.
    pub fn open(target: &StoreTarget) -> Self {
        Self::open_with_clock(target, SystemClock)
    }

    /// Like `open`, with an explicit time source for `updated_at`.
    pub fn open_with_clock(target: &StoreTarget, clock: impl Clock + Send + 'static) -> Self {
        let conn = match connect(target) {
            Ok(conn) => conn,
            Err(err) => {
                warn!("event=address_book_open module=service status=error error={err}");
                return Self::disconnected(Outcome::failure(NOT_CONNECTED_MESSAGE, err));
            }
        };

        let mut book = Self {
            conn: Some(conn),
            clock: Box::new(clock),
            schema_ready: false,
            startup: Outcome::success((), CONNECTED_MESSAGE),
        };
        let schema = book.initialize_table();
        if let Some(error) = schema.error {
            book.startup = Outcome::failure(schema.message, error);
        }
        info!(
            "event=address_book_open module=service status={} mode={}",
            if book.is_ready() { "ok" } else { "error" },
            target.mode()
        );
        book
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::open(&config.target)
    }

    /// Opens the store named by `ADDRESS_BOOK_STORE`, or the default target.
    pub fn open_default() -> Self {
        match StoreConfig::from_env() {
            Ok(config) => Self::from_config(&config),
            Err(err) => {
                let err = ConnectionError::from(err);
                warn!("event=address_book_open module=service status=error error={err}");
                Self::disconnected(Outcome::failure(NOT_CONNECTED_MESSAGE, err))
            }
        }
    }

    fn disconnected(startup: Outcome<()>) -> Self {
        Self {
            conn: None,
            clock: Box::new(SystemClock),
            schema_ready: false,
            startup,
        }
    }

    /// Outcome of connecting and initializing at construction time.
    pub fn startup(&self) -> &Outcome<()> {
        &self.startup
    }

    pub fn is_ready(&self) -> bool {
        self.conn.is_some() && self.schema_ready
    }

    /// Re-runs the idempotent table creation.
    pub fn initialize_table(&mut self) -> Outcome<()> {
        let Some(conn) = self.conn.as_ref() else {
            return self.not_connected();
        };
        match initialize_table(conn) {
            Ok(()) => {
                self.schema_ready = true;
                let message = format!("Table {TABLE_NAME} initialized\n{CREATE_TABLE_SQL}");
                Outcome::success((), message)
            }
            Err(err) => Outcome::failure(format!("Could not initialize table {TABLE_NAME}"), err),
        }
    }

    /// Inserts `records` in order. Not atomic: on failure the outcome keeps
    /// the ids committed before the failing record in `value`.
    pub fn insert_many(&self, records: &[ContactInput]) -> Outcome<InsertSummary> {
        let repo = match self.repository() {
            Ok(repo) => repo,
            Err(outcome) => return outcome,
        };
        match repo.insert_many(records) {
            Ok(summary) => {
                let message = format!("Successfully inserted {} records", summary.inserted);
                Outcome::success(summary, message)
            }
            Err(StoreError::PartialInsert {
                inserted,
                ids,
                source,
            }) => {
                warn!(
                    "event=address_book_op module=service op=insert status=error inserted={inserted} error={source}"
                );
                let message = format!(
                    "Inserted {inserted} of {} records before failure",
                    records.len()
                );
                Outcome::partial(InsertSummary { inserted, ids }, message, source)
            }
            Err(err) => failed("insert", "Could not insert records", &err),
        }
    }

    /// Replaces all mutable fields of contact `id` and stamps `updated_at`.
    pub fn update(&self, id: ContactId, record: &ContactInput) -> Outcome<UpdateSummary> {
        let repo = match self.repository() {
            Ok(repo) => repo,
            Err(outcome) => return outcome,
        };
        match repo.update(id, record) {
            Ok(summary) => {
                let message = format!("Successfully updated {} records", summary.affected);
                Outcome::success(summary, message)
            }
            Err(err) => failed("update", format!("Could not update record {id}"), &err),
        }
    }

    pub fn get(&self, id: ContactId) -> Outcome<Option<Contact>> {
        let repo = match self.repository() {
            Ok(repo) => repo,
            Err(outcome) => return outcome,
        };
        match repo.get(id) {
            Ok(Some(contact)) => Outcome::success(Some(contact), format!("Found record {id}")),
            Ok(None) => Outcome::success(None, format!("No record with id {id}")),
            Err(err) => failed("get", format!("Could not load record {id}"), &err),
        }
    }

    /// Case-insensitive substring search over names, phone, email and address.
    pub fn search(&self, keyword: &str) -> Outcome<Vec<Contact>> {
        let repo = match self.repository() {
            Ok(repo) => repo,
            Err(outcome) => return outcome,
        };
        match repo.search(keyword) {
            Ok(contacts) => {
                let message = format!("Got {} records matching \"{keyword}\"", contacts.len());
                Outcome::success(contacts, message)
            }
            Err(err) => failed("search", "Could not search records", &err),
        }
    }

    /// Every contact in default listing order, with the table count.
    pub fn list_all(&self) -> Outcome<ContactListing> {
        let repo = match self.repository() {
            Ok(repo) => repo,
            Err(outcome) => return outcome,
        };
        match repo.list_all() {
            Ok(listing) => {
                let message = format!("Got {} records", listing.total);
                Outcome::success(listing, message)
            }
            Err(err) => failed("list", "Could not list records", &err),
        }
    }

    pub fn delete(&self, id: ContactId) -> Outcome<DeleteSummary> {
        let repo = match self.repository() {
            Ok(repo) => repo,
            Err(outcome) => return outcome,
        };
        match repo.delete(id) {
            Ok(summary) => {
                let message = format!("Deleted {} records", summary.affected);
                Outcome::success(summary, message)
            }
            Err(err) => failed("delete", format!("Could not delete record {id}"), &err),
        }
    }

    fn repository<T>(&self) -> Result<FacadeRepository<'_>, Outcome<T>> {
        let Some(conn) = self.conn.as_ref() else {
            return Err(self.not_connected());
        };
        if !self.schema_ready {
            return Err(Outcome::failure(
                format!("Table {TABLE_NAME} is not initialized"),
                format!("call initialize_table before using table {TABLE_NAME}"),
            ));
        }
        Ok(SqliteContactRepository::with_clock(conn, &*self.clock))
    }

    fn not_connected<T>(&self) -> Outcome<T> {
        let error = self
            .startup
            .error
            .clone()
            .unwrap_or_else(|| NOT_CONNECTED_MESSAGE.to_string());
        Outcome::failure(NOT_CONNECTED_MESSAGE, error)
    }
}

fn failed<T>(op: &str, message: impl Into<String>, err: &StoreError) -> Outcome<T> {
    let driver_error = err.sqlite_error();
    warn!("event=address_book_op module=service op={op} status=error error={driver_error}");
    Outcome::failure(message, driver_error)
}
