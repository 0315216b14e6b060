//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured store through the facade and print each outcome.
//! - Keep output line-oriented for quick local sanity checks.
//!
//! The store target comes from the first argument, then `ADDRESS_BOOK_STORE`,
//! then the default `sqlite:address-book.sqlite3`. File logs are written only
//! when `ADDRESS_BOOK_LOG_DIR` is set.

use addressbook_core::{core_version, init_logging, AddressBook, Outcome, StoreConfig, StoreTarget};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("addressbook_core version={}", core_version());

    let mut config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(raw) = std::env::args().nth(1) {
        match StoreTarget::parse(&raw) {
            Ok(target) => config.target = target,
            Err(err) => {
                eprintln!("config: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging: {err}");
        }
    }

    println!("target: {}", config.target);
    let book = AddressBook::from_config(&config);

    report("open", book.startup());
    if !book.is_ready() {
        return ExitCode::FAILURE;
    }

    let listing = book.list_all();
    report("list", &listing);
    if let Some(listing) = listing.value {
        for contact in listing.contacts {
            println!(
                "  #{} {} updated_at={}",
                contact.id,
                contact.display_name(),
                contact.updated_at.as_deref().unwrap_or("-")
            );
        }
    }

    ExitCode::SUCCESS
}

fn report<T>(step: &str, outcome: &Outcome<T>) {
    match &outcome.error {
        None => println!("{step}: {}", outcome.message),
        Some(error) => eprintln!("{step}: {} ({error})", outcome.message),
    }
}
