use addressbook_core::{AddressBook, ContactInput, FixedClock, StoreConfig, StoreTarget};
use addressbook_core::db::initialize_table;
use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection};

#[test]
fn open_connects_and_initializes_table() {
    let book = AddressBook::open(&StoreTarget::SqliteMemory);

    assert!(book.is_ready());
    assert!(book.startup().is_ok());
    assert_eq!(
        book.startup().message,
        "Successfully connected to the database"
    );
}

#[test]
fn initialize_table_outcome_echoes_definition() {
    let mut book = AddressBook::open(&StoreTarget::SqliteMemory);

    let outcome = book.initialize_table();

    assert!(outcome.is_ok());
    assert!(outcome.message.starts_with("Table address_book initialized"));
    assert!(outcome.message.contains("CREATE TABLE IF NOT EXISTS address_book"));
}

#[test]
fn insert_update_delete_scenario() {
    let instant = Utc.with_ymd_and_hms(2030, 5, 6, 7, 8, 9).unwrap();
    let book = AddressBook::open_with_clock(&StoreTarget::SqliteMemory, FixedClock(instant));

    let inserted = book.insert_many(&[ContactInput::new("Ann", "Lee")]);
    assert!(inserted.is_ok());
    assert_eq!(inserted.message, "Successfully inserted 1 records");

    let updated = book.update(1, &ContactInput::new("Ann", "Lee").with_phone("555-1234"));
    assert_eq!(updated.message, "Successfully updated 1 records");
    assert_eq!(updated.error, None);

    let listed = book.list_all();
    assert_eq!(listed.message, "Got 1 records");
    let listing = listed.into_result().unwrap();
    assert_eq!(listing.contacts.len(), 1);
    assert_eq!(listing.contacts[0].phone.as_deref(), Some("555-1234"));
    assert_eq!(
        listing.contacts[0].updated_at.as_deref(),
        Some("2030-05-06 07:08:09")
    );

    let deleted = book.delete(1);
    assert_eq!(deleted.message, "Deleted 1 records");

    let empty = book.list_all();
    assert_eq!(empty.message, "Got 0 records");
    assert!(empty.into_result().unwrap().contacts.is_empty());
}

#[test]
fn zero_row_results_are_successes_not_errors() {
    let book = AddressBook::open(&StoreTarget::SqliteMemory);
    book.insert_many(&[ContactInput::new("Ann", "Lee")]);

    let update = book.update(404, &ContactInput::new("Bob", "Stone"));
    assert!(update.is_ok());
    assert_eq!(update.message, "Successfully updated 0 records");
    assert_eq!(update.value.unwrap().affected, 0);

    let delete = book.delete(404);
    assert!(delete.is_ok());
    assert_eq!(delete.message, "Deleted 0 records");

    let search = book.search("nobody");
    assert!(search.is_ok());
    assert_eq!(search.message, "Got 0 records matching \"nobody\"");
    assert!(search.value.unwrap().is_empty());

    let get = book.get(404);
    assert!(get.is_ok());
    assert_eq!(get.message, "No record with id 404");
    assert_eq!(get.value, Some(None));
}

#[test]
fn store_failures_surface_in_error_field() {
    let book = AddressBook::open(&StoreTarget::SqliteMemory);

    let outcome = book.insert_many(&[
        ContactInput::new("Ann", "Lee"),
        ContactInput::new("", "Blank"),
    ]);

    assert!(!outcome.is_ok());
    assert_eq!(outcome.message, "Inserted 1 of 2 records before failure");
    assert_eq!(
        outcome.error.as_deref(),
        Some(driver_error_for(&ContactInput::new("", "Blank")).as_str())
    );
    let committed = outcome.value.unwrap();
    assert_eq!(committed.inserted, 1);
    assert_eq!(committed.ids, vec![1]);

    let listing = book.list_all().into_result().unwrap();
    assert_eq!(listing.total, 1);
}

#[test]
fn failed_update_reports_driver_text_unchanged() {
    let book = AddressBook::open(&StoreTarget::SqliteMemory);
    book.insert_many(&[ContactInput::new("Ann", "Lee")]);

    let outcome = book.update(1, &ContactInput::new("Ann", " "));

    assert_eq!(outcome.message, "Could not update record 1");
    assert!(outcome.value.is_none());
    assert_eq!(
        outcome.error.as_deref(),
        Some("CHECK constraint failed: length(trim(last_name)) > 0")
    );
}

#[test]
fn failed_table_creation_reports_not_initialized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locked.sqlite3");
    let holder = Connection::open(&path).unwrap();
    holder
        .execute_batch("CREATE TABLE other (x INTEGER); BEGIN IMMEDIATE;")
        .unwrap();

    let mut book = AddressBook::open(&StoreTarget::file(&path));

    assert!(!book.is_ready());
    assert_eq!(
        book.startup().message,
        "Could not initialize table address_book"
    );
    assert_eq!(book.startup().error.as_deref(), Some("database is locked"));

    let insert = book.insert_many(&[ContactInput::new("Ann", "Lee")]);
    assert_eq!(insert.message, "Table address_book is not initialized");
    assert_eq!(
        insert.error.as_deref(),
        Some("call initialize_table before using table address_book")
    );
    assert!(insert.value.is_none());
    assert_eq!(
        book.list_all().message,
        "Table address_book is not initialized"
    );

    holder.execute_batch("COMMIT;").unwrap();
    assert!(book.initialize_table().is_ok());
    assert!(book.is_ready());
    assert!(book.insert_many(&[ContactInput::new("Ann", "Lee")]).is_ok());
}

fn driver_error_for(record: &ContactInput) -> String {
    let conn = Connection::open_in_memory().unwrap();
    initialize_table(&conn).unwrap();
    conn.execute(
        "INSERT INTO address_book (first_name, last_name) VALUES (?1, ?2);",
        params![record.first_name, record.last_name],
    )
    .unwrap_err()
    .to_string()
}

#[test]
fn unreachable_store_reports_failure_on_every_call() {
    let dir = tempfile::tempdir().unwrap();
    let target = StoreTarget::file(dir.path().join("missing").join("book.sqlite3"));

    let mut book = AddressBook::open(&target);

    assert!(!book.is_ready());
    assert_eq!(book.startup().message, "Could not connect to the database");
    let startup_error = book.startup().error.clone().unwrap();
    assert!(!startup_error.is_empty());

    let insert = book.insert_many(&[ContactInput::new("Ann", "Lee")]);
    assert_eq!(insert.message, "Could not connect to the database");
    assert_eq!(insert.error.as_deref(), Some(startup_error.as_str()));

    assert!(!book.search("").is_ok());
    assert!(!book.list_all().is_ok());
    assert!(!book.delete(1).is_ok());
    assert!(!book.initialize_table().is_ok());
}

#[test]
fn from_config_opens_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        target: StoreTarget::file(dir.path().join("book.sqlite3")),
        ..StoreConfig::default()
    };

    let book = AddressBook::from_config(&config);
    assert!(book.is_ready());
    book.insert_many(&[ContactInput::new("Ann", "Lee")]);
    drop(book);

    let reopened = AddressBook::from_config(&config);
    let found = reopened.search("lee");
    assert_eq!(found.message, "Got 1 records matching \"lee\"");
    let get = reopened.get(1);
    assert_eq!(get.message, "Found record 1");
}
