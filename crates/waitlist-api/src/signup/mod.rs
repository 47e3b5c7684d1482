//! Signup domain: record types, contact normalization, request validation.

mod phone;
mod validate;

pub use phone::normalize_phone;
pub use validate::{normalize_email, NewSignup, SignupRequest};

pub(crate) use validate::check_email;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A persisted waitlist entry. Never mutated after creation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SignupRecord {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Normalized (trimmed, lower-cased) address; unique across all records.
    pub email: String,
    /// Canonical `+234XXXXXXXXXX` form; unique across all records.
    pub phone: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}
