//! Contact records as stored and as supplied by callers.
//!
//! # Responsibility
//! - Define the persisted row shape (`Contact`).
//! - Define the caller-supplied mutable fields (`ContactInput`).
//!
//! # Invariants
//! - `id`, `created_at` and `updated_at` are owned by the store and never
//!   appear in `ContactInput`.
//! - `updated_at` stays `None` until the first explicit update.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier, unique and never reused.
pub type ContactId = i64;

/// The seven mutable contact fields a caller supplies on insert and update.
///
/// Deserializes from a mapping where every optional key may be absent or
/// `null`; the two name keys are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ContactInput {
    /// Creates an input with both names set and every optional field empty.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender: None,
            date_of_birth: None,
            phone: None,
            email: None,
            address: None,
        }
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_date_of_birth(mut self, date_of_birth: impl Into<String>) -> Self {
        self.date_of_birth = Some(date_of_birth.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// A persisted contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// UTC `YYYY-MM-DD HH:MM:SS`, set by the store on insert.
    pub created_at: String,
    /// UTC `YYYY-MM-DD HH:MM:SS`, `None` until the first update.
    pub updated_at: Option<String>,
}

impl Contact {
    /// Projects the mutable fields back into an input, e.g. to edit and
    /// resubmit through `update`.
    pub fn input(&self) -> ContactInput {
        ContactInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            date_of_birth: self.date_of_birth.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }

    /// `First Last` for list views.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn was_updated(&self) -> bool {
        self.updated_at.is_some()
    }
}
