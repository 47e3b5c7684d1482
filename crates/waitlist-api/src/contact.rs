//! Contact-form intake.
//!
//! Messages are stored as the source of truth and reviewed out of band;
//! the service never answers them automatically.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::FieldError;
use crate::signup::{check_email, normalize_email};

const MAX_NAME_LEN: usize = 100;
const MAX_SUBJECT_LEN: usize = 200;

// Column widths for the request diagnostics. Both values are
// client-controlled headers, so they are clipped rather than rejected.
const MAX_IP_LEN: usize = 45;
const MAX_USER_AGENT_LEN: usize = 500;

/// Raw contact-form payload as received over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A validated contact message ready for insertion.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A persisted contact message.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_spam: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NewContactMessage {
    /// Normalize and validate a raw request, aggregating field failures.
    pub fn parse(
        request: ContactRequest,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = request.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                format!("must be at most {MAX_NAME_LEN} characters"),
            ));
        } else if name.chars().any(char::is_control) {
            errors.push(FieldError::new(
                "name",
                "must not contain control characters",
            ));
        }

        let email = normalize_email(&request.email);
        if let Err(message) = check_email(&email) {
            errors.push(FieldError::new("email", message));
        }

        let subject = request.subject.trim().to_string();
        if subject.is_empty() {
            errors.push(FieldError::new("subject", "must not be empty"));
        } else if subject.chars().count() > MAX_SUBJECT_LEN {
            errors.push(FieldError::new(
                "subject",
                format!("must be at most {MAX_SUBJECT_LEN} characters"),
            ));
        }

        let message = request.message.trim().to_string();
        if message.is_empty() {
            errors.push(FieldError::new("message", "must not be empty"));
        }

        if errors.is_empty() {
            Ok(Self {
                name,
                email,
                subject,
                message,
                ip_address: ip_address.map(|v| clip(v, MAX_IP_LEN)),
                user_agent: user_agent.map(|v| clip(v, MAX_USER_AGENT_LEN)),
            })
        } else {
            Err(errors)
        }
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary.
fn clip(value: String, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: "Ada Obi".into(),
            email: "Ada@Example.com".into(),
            subject: "Early access".into(),
            message: "When does the beta open?".into(),
        }
    }

    #[test]
    fn test_parse_valid_message() {
        let message =
            NewContactMessage::parse(request(), Some("203.0.113.9".into()), None).unwrap();
        assert_eq!(message.email, "ada@example.com");
        assert_eq!(message.ip_address.as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_failures_are_aggregated() {
        let errors = NewContactMessage::parse(
            ContactRequest {
                name: String::new(),
                email: "nope".into(),
                subject: "  ".into(),
                message: String::new(),
            },
            None,
            None,
        )
        .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "subject", "message"]);
    }

    #[test]
    fn test_oversized_diagnostics_are_clipped_to_column_widths() {
        let long_ip = "x".repeat(80);
        let long_agent = "Mozilla/5.0 ".repeat(100);
        let message =
            NewContactMessage::parse(request(), Some(long_ip), Some(long_agent)).unwrap();
        assert_eq!(message.ip_address.unwrap().chars().count(), 45);
        assert_eq!(message.user_agent.unwrap().chars().count(), 500);
    }

    #[test]
    fn test_short_diagnostics_pass_through() {
        let message = NewContactMessage::parse(
            request(),
            Some("203.0.113.9".into()),
            Some("curl/8.0".into()),
        )
        .unwrap();
        assert_eq!(message.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(message.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_subject_bound() {
        let mut r = request();
        r.subject = "s".repeat(201);
        let errors = NewContactMessage::parse(r, None, None).unwrap_err();
        assert_eq!(errors[0].field, "subject");
    }
}
