//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide batch insert, update, lookup, search, listing and delete over
//!   the `address_book` table.
//! - Report affected counts and store errors as typed values.
//!
//! # Invariants
//! - `id`, `created_at` and `updated_at` are never taken from callers.
//! - `updated_at` is computed once per `update` call, UTC.
//! - Listing order is pinned in SQL: updated rows first (newest first),
//!   never-updated rows last, then `last_name`, `first_name`, `id`.
//!
//! # Batch insert policy
//! `insert_many` is not atomic. Records are written in order and the call
//! stops at the first failure; rows written before it stay committed and are
//! reported through `StoreError::PartialInsert`. Callers that need
//! all-or-nothing must wrap the call in their own transaction.

use super::clock::{format_timestamp, Clock, SystemClock};
use crate::model::contact::{Contact, ContactId, ContactInput};
use log::{debug, error};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    gender,
    date_of_birth,
    phone,
    email,
    address,
    created_at,
    updated_at
FROM address_book";

const INSERT_SQL: &str = "INSERT INTO address_book (
    first_name,
    last_name,
    gender,
    date_of_birth,
    phone,
    email,
    address
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);";

const LIKE_ESCAPE: char = '\\';

pub type StoreResult<T> = Result<T, StoreError>;

/// Data statement rejected or failed by the store.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// A batch insert failed part way; `ids` were committed before `source`.
    PartialInsert {
        inserted: usize,
        ids: Vec<ContactId>,
        source: rusqlite::Error,
    },
}

impl StoreError {
    /// The underlying driver error.
    pub fn sqlite_error(&self) -> &rusqlite::Error {
        match self {
            Self::Sqlite(err) => err,
            Self::PartialInsert { source, .. } => source,
        }
    }

    /// Whether the store rejected the row on a schema constraint
    /// (`NOT NULL`, `CHECK`, ...).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.sqlite_error().sqlite_error_code(),
            Some(ErrorCode::ConstraintViolation)
        )
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::PartialInsert {
                inserted, source, ..
            } => write!(f, "{source} ({inserted} records inserted before failure)"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.sqlite_error())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Result of a batch insert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InsertSummary {
    pub inserted: usize,
    /// Assigned ids, in input order.
    pub ids: Vec<ContactId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// 0 when no row has the requested id.
    pub affected: usize,
    /// Timestamp written to `updated_at` by this call.
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSummary {
    /// 0 when no row has the requested id.
    pub affected: usize,
}

/// Full ordered listing plus the table row count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactListing {
    /// From `SELECT COUNT(*)`, independent of the fetched rows.
    pub total: u64,
    pub contacts: Vec<Contact>,
}

/// Repository interface for contact persistence.
pub trait ContactRepository {
    fn insert_many(&self, records: &[ContactInput]) -> StoreResult<InsertSummary>;
    fn update(&self, id: ContactId, record: &ContactInput) -> StoreResult<UpdateSummary>;
    fn get(&self, id: ContactId) -> StoreResult<Option<Contact>>;
    /// Rows where `keyword` is a substring of first name, last name, phone,
    /// email or address, ordered by id. `%` and `_` match literally.
    ///
    /// Case folding follows SQLite `LIKE`: ASCII letters only, so `ÉVA` does
    /// not match `éva`.
    fn search(&self, keyword: &str) -> StoreResult<Vec<Contact>>;
    fn count(&self) -> StoreResult<u64>;
    fn list_all(&self) -> StoreResult<ContactListing>;
    fn delete(&self, id: ContactId) -> StoreResult<DeleteSummary>;
}

/// SQLite-backed contact repository.
///
/// Expects `initialize_table` to have run on `conn`; behavior against a
/// store without the table is a plain `StoreError` from the driver.
pub struct SqliteContactRepository<'conn, C: Clock = SystemClock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn> SqliteContactRepository<'conn, SystemClock> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteContactRepository<'conn, C> {
    pub fn with_clock(conn: &'conn Connection, clock: C) -> Self {
        Self { conn, clock }
    }
}

impl<C: Clock> ContactRepository for SqliteContactRepository<'_, C> {
    fn insert_many(&self, records: &[ContactInput]) -> StoreResult<InsertSummary> {
        let mut stmt = self.conn.prepare_cached(INSERT_SQL)?;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let inserted = stmt.insert(params![
                record.first_name.as_str(),
                record.last_name.as_str(),
                record.gender.as_deref(),
                record.date_of_birth.as_deref(),
                record.phone.as_deref(),
                record.email.as_deref(),
                record.address.as_deref(),
            ]);

            match inserted {
                Ok(id) => ids.push(id),
                Err(err) => {
                    error!(
                        "event=contact_insert module=repo status=error inserted={} requested={} error={}",
                        ids.len(),
                        records.len(),
                        err
                    );
                    return Err(StoreError::PartialInsert {
                        inserted: ids.len(),
                        ids,
                        source: err,
                    });
                }
            }
        }

        debug!(
            "event=contact_insert module=repo status=ok inserted={}",
            ids.len()
        );
        Ok(InsertSummary {
            inserted: ids.len(),
            ids,
        })
    }

    fn update(&self, id: ContactId, record: &ContactInput) -> StoreResult<UpdateSummary> {
        let updated_at = format_timestamp(self.clock.now());

        let affected = self.conn.execute(
            "UPDATE address_book
             SET
                first_name = ?1,
                last_name = ?2,
                gender = ?3,
                date_of_birth = ?4,
                phone = ?5,
                email = ?6,
                address = ?7,
                updated_at = ?8
             WHERE id = ?9;",
            params![
                record.first_name.as_str(),
                record.last_name.as_str(),
                record.gender.as_deref(),
                record.date_of_birth.as_deref(),
                record.phone.as_deref(),
                record.email.as_deref(),
                record.address.as_deref(),
                updated_at.as_str(),
                id,
            ],
        )?;

        debug!("event=contact_update module=repo status=ok id={id} affected={affected}");
        Ok(UpdateSummary {
            affected,
            updated_at,
        })
    }

    fn get(&self, id: ContactId) -> StoreResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn search(&self, keyword: &str) -> StoreResult<Vec<Contact>> {
        let pattern = like_pattern(keyword);
        let mut stmt = self.conn.prepare(&format!(
            r"{CONTACT_SELECT_SQL}
             WHERE first_name LIKE ?1 ESCAPE '\'
                OR last_name LIKE ?1 ESCAPE '\'
                OR phone LIKE ?1 ESCAPE '\'
                OR email LIKE ?1 ESCAPE '\'
                OR address LIKE ?1 ESCAPE '\'
             ORDER BY id ASC;"
        ))?;

        let contacts = collect_contacts(stmt.query([pattern])?)?;
        debug!(
            "event=contact_search module=repo status=ok keyword_chars={} hits={}",
            keyword.chars().count(),
            contacts.len()
        );
        Ok(contacts)
    }

    fn count(&self) -> StoreResult<u64> {
        let total = self
            .conn
            .query_row("SELECT COUNT(*) FROM address_book;", [], |row| {
                row.get::<_, u64>(0)
            })?;
        Ok(total)
    }

    fn list_all(&self) -> StoreResult<ContactListing> {
        let total = self.count()?;
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL}
             ORDER BY
                updated_at IS NULL ASC,
                updated_at DESC,
                last_name ASC,
                first_name ASC,
                id ASC;"
        ))?;
        let contacts = collect_contacts(stmt.query([])?)?;

        debug!(
            "event=contact_list module=repo status=ok total={total} fetched={}",
            contacts.len()
        );
        Ok(ContactListing { total, contacts })
    }

    fn delete(&self, id: ContactId) -> StoreResult<DeleteSummary> {
        let affected = self
            .conn
            .execute("DELETE FROM address_book WHERE id = ?1;", [id])?;

        debug!("event=contact_delete module=repo status=ok id={id} affected={affected}");
        Ok(DeleteSummary { affected })
    }
}

fn collect_contacts(mut rows: rusqlite::Rows<'_>) -> StoreResult<Vec<Contact>> {
    let mut contacts = Vec::new();
    while let Some(row) = rows.next()? {
        contacts.push(parse_contact_row(row)?);
    }
    Ok(contacts)
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        gender: row.get("gender")?,
        date_of_birth: row.get("date_of_birth")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        address: row.get("address")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Wraps `keyword` as a literal `%keyword%` LIKE pattern.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
