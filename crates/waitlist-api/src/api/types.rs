//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::signup::SignupRecord;

pub use crate::contact::ContactRequest;
pub use crate::signup::SignupRequest;

/// Service metadata returned from `/`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub status: &'static str,
    pub health: &'static str,
}

/// Health probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub signup_count: i64,
}

/// Created waitlist entry.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SignupRecord> for SignupResponse {
    fn from(record: SignupRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            phone: record.phone,
            source: record.source,
            created_at: record.created_at,
        }
    }
}

/// Acknowledgement for a stored contact message.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for the export endpoint.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub key: Option<String>,
}
