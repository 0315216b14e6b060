use addressbook_core::db::{initialize_table, open_store_in_memory};
use addressbook_core::{ContactId, ContactInput, ContactRepository, SqliteContactRepository};
use rusqlite::Connection;

#[test]
fn empty_keyword_matches_every_row() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);

    let hits = repo.search("").unwrap();

    assert_eq!(ids(&hits), vec![1, 2, 3, 4]);
}

#[test]
fn keyword_matches_any_searched_field_case_insensitively() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);

    assert_eq!(ids(&repo.search("ANN").unwrap()), vec![1]);
    assert_eq!(ids(&repo.search("stone").unwrap()), vec![2]);
    assert_eq!(ids(&repo.search("555-01").unwrap()), vec![1, 3]);
    assert_eq!(ids(&repo.search("Example.ORG").unwrap()), vec![2]);
    assert_eq!(ids(&repo.search("harbor").unwrap()), vec![3, 4]);
}

#[test]
fn keyword_matches_inner_substrings() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);

    let hits = repo.search("ton").unwrap();

    assert_eq!(ids(&hits), vec![2]);
}

#[test]
fn unsearched_fields_do_not_match() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);

    assert!(repo.search("1990-04-02").unwrap().is_empty());
    assert!(repo.search("nonbinary").unwrap().is_empty());
}

#[test]
fn no_match_returns_empty_result() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);

    assert!(repo.search("zzz-not-there").unwrap().is_empty());
}

#[test]
fn wildcard_characters_are_matched_literally() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);

    assert_eq!(ids(&repo.search("50%").unwrap()), vec![4]);
    assert_eq!(ids(&repo.search("dee_p").unwrap()), vec![4]);
    assert!(repo.search("%%%").unwrap().is_empty());
    assert!(repo.search("_").unwrap().iter().all(|c| c.id == 4));
}

#[test]
fn keyword_is_bound_not_interpolated() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);

    let hits = repo.search("' OR 1=1; DROP TABLE address_book; --").unwrap();

    assert!(hits.is_empty());
    assert_eq!(repo.count().unwrap(), 4);
}

#[test]
fn search_excludes_deleted_rows() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);
    repo.delete(3).unwrap();

    assert_eq!(ids(&repo.search("harbor").unwrap()), vec![4]);
}

#[test]
fn case_folding_covers_ascii_letters_only() {
    let conn = seeded_store();
    let repo = SqliteContactRepository::new(&conn);
    repo.insert_many(&[ContactInput::new("éva", "Núñez")])
        .unwrap();

    assert!(repo.search("ÉVA").unwrap().is_empty());
    assert_eq!(ids(&repo.search("éVA").unwrap()), vec![5]);
    assert_eq!(ids(&repo.search("núñEZ").unwrap()), vec![5]);
}

fn seeded_store() -> Connection {
    let conn = open_store_in_memory().unwrap();
    initialize_table(&conn).unwrap();
    SqliteContactRepository::new(&conn)
        .insert_many(&[
            ContactInput::new("Ann", "Lee")
                .with_phone("555-0101")
                .with_date_of_birth("1990-04-02"),
            ContactInput::new("Bob", "Stone")
                .with_email("bob@example.org")
                .with_gender("nonbinary"),
            ContactInput::new("Cy", "Adams")
                .with_phone("555-0199")
                .with_address("12 Harbor Way"),
            ContactInput::new("Dee", "Park")
                .with_email("dee_p@mail.test")
                .with_address("Unit 50%, Harbor View"),
        ])
        .unwrap();
    conn
}

fn ids(contacts: &[addressbook_core::Contact]) -> Vec<ContactId> {
    contacts.iter().map(|contact| contact.id).collect()
}
