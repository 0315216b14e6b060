//! Caller-facing services.
//!
//! # Responsibility
//! - Wrap repository calls in per-call status outcomes.
//! - Keep CLI/HTTP layers decoupled from storage details.

pub mod address_book;
