//! Record store: the durable table of sign-up entries.
//!
//! Duplicate detection lives here, in the unique indexes, not in
//! application-level checks: a single atomic insert either lands or
//! surfaces a constraint violation, so two concurrent identical
//! submissions get exactly one success and one conflict.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::contact::{ContactMessage, NewContactMessage};
use crate::signup::{NewSignup, SignupRecord};

/// Which unique contact column collided on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Phone,
    /// Both values already exist. Only the in-memory store can report this;
    /// Postgres stops at the first violated index.
    EmailAndPhone,
}

impl DuplicateField {
    /// Field names for the conflict payload.
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            DuplicateField::Email => vec!["email"],
            DuplicateField::Phone => vec!["phone"],
            DuplicateField::EmailAndPhone => vec!["email", "phone"],
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateField::Email => write!(f, "email"),
            DuplicateField::Phone => write!(f, "phone"),
            DuplicateField::EmailAndPhone => write!(f, "email and phone"),
        }
    }
}

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {0}")]
    Duplicate(DuplicateField),

    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(e.to_string())
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}

/// Durable storage for signups, contact messages, and the daily email
/// counter.
#[async_trait]
pub trait SignupStore: Send + Sync {
    /// Insert a new signup. Duplicates are decided by the unique indexes in
    /// the same atomic operation; no record is persisted on conflict.
    async fn insert(&self, signup: &NewSignup) -> Result<SignupRecord, StoreError>;

    /// All records in creation order.
    async fn list_all(&self) -> Result<Vec<SignupRecord>, StoreError>;

    /// Number of signup records.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Persist a contact-form message.
    async fn insert_contact(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, StoreError>;

    /// Reserve one unit of `day`'s email quota with a single atomic
    /// increment. Returns `false` once `cap` sends have been reserved.
    async fn try_reserve_send(&self, day: NaiveDate, cap: u32) -> Result<bool, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
