//! Resend API request and response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /emails`.
#[derive(Debug, Clone, Serialize)]
pub struct SendEmailRequest {
    /// Sender, e.g. `Waitlist <onboarding@resend.dev>`.
    pub from: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Response for an accepted email.
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailResponse {
    /// Provider-assigned message id.
    pub id: String,
}
