//! Repository layer for contact persistence.
//!
//! # Responsibility
//! - Define the record-store contract over the `address_book` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every caller value reaches SQL through parameter binding.
//! - Zero affected rows is a successful outcome, not `NotFound`.

pub mod clock;
pub mod contact_repo;
