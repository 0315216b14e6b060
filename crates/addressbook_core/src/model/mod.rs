//! Contact domain model.
//!
//! # Invariants
//! - A `Contact` is identified by its store-assigned `ContactId`.
//! - Deletion is permanent; there is no tombstone state.

pub mod contact;
